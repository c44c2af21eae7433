use std::{path::PathBuf, time::Duration};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use tideloop::{
    Color, ExportRequest, ExportTarget, ExportTrigger, FixedRatePacer, FrameRenderer, GifSink,
    LoopParams, LoopScheduler, Progress, RasterSequenceExporter, RenderSettings, RenderThreading,
    Stage, StillExporter, StudioConfig, StyleKind, contrast_ratio, luminance, normalize,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "tideloop", version, about = "Seamless looping background animations")]
struct Cli {
    /// JSON file with studio defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a single frame as a PNG.
    Frame(FrameArgs),
    /// Export one full loop as an animated GIF.
    Gif(GifArgs),
    /// Run the live preview loop for a while.
    Preview(PreviewArgs),
    /// Print luminances and the contrast ratio of two colors.
    Contrast(ContrastArgs),
}

#[derive(Args, Debug)]
struct LookArgs {
    /// gradient, horizontalWave, circularWave (standingWave) or tsunami.
    #[arg(long)]
    style: Option<StyleKind>,

    /// Base and accent colors (#RRGGBB).
    #[arg(long, num_args = 2, value_names = ["BASE", "ACCENT"])]
    colors: Option<Vec<String>>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,
}

#[derive(Args, Debug)]
struct FrameArgs {
    #[command(flatten)]
    look: LookArgs,

    /// Loop position; wrapped into [0, 1).
    #[arg(long, default_value_t = 0.0)]
    progress: f64,

    /// Output PNG path (defaults to `{out_dir}/{style}-animation.png`).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct GifArgs {
    #[command(flatten)]
    look: LookArgs,

    /// Loop duration in seconds.
    #[arg(long)]
    duration: Option<f64>,

    #[arg(long)]
    fps: Option<u32>,

    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Render frames on a rayon pool.
    #[arg(long)]
    parallel: bool,

    /// Flatten transparency over this color.
    #[arg(long)]
    matte: Option<String>,

    /// Quantizer speed, 1 (best) to 30 (fastest).
    #[arg(long)]
    speed: Option<i32>,
}

#[derive(Args, Debug)]
struct PreviewArgs {
    #[command(flatten)]
    look: LookArgs,

    #[arg(long)]
    duration: Option<f64>,

    /// How long to run the preview.
    #[arg(long, default_value_t = 2.0)]
    seconds: f64,

    #[arg(long, default_value_t = 60)]
    refresh_hz: u32,

    /// Fixed progress level in [0, 1] instead of elapsed time.
    #[arg(long)]
    reactivity: Option<f64>,

    /// Save the last presented frame as a PNG.
    #[arg(long)]
    snapshot: bool,
}

#[derive(Args, Debug)]
struct ContrastArgs {
    a: String,
    b: String,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = load_config(cli.config.as_ref())?;
    match cli.cmd {
        Command::Frame(args) => cmd_frame(cfg, args),
        Command::Gif(args) => cmd_gif(cfg, args),
        Command::Preview(args) => cmd_preview(cfg, args),
        Command::Contrast(args) => cmd_contrast(args),
    }
}

fn load_config(path: Option<&PathBuf>) -> anyhow::Result<StudioConfig> {
    match path {
        Some(p) => StudioConfig::load(p).with_context(|| format!("load config '{}'", p.display())),
        None => {
            let mut cfg = StudioConfig::default();
            cfg.apply_env();
            Ok(cfg)
        }
    }
}

fn apply_look(cfg: &mut StudioConfig, look: LookArgs) {
    if let Some(style) = look.style {
        cfg.style = style;
    }
    if let Some(colors) = look.colors
        && let [base, accent] = colors.as_slice()
    {
        cfg.colors = [base.clone(), accent.clone()];
    }
    if let Some(w) = look.width {
        cfg.width = w;
    }
    if let Some(h) = look.height {
        cfg.height = h;
    }
}

fn cmd_frame(mut cfg: StudioConfig, args: FrameArgs) -> anyhow::Result<()> {
    apply_look(&mut cfg, args.look);

    let mut renderer = FrameRenderer::new(RenderSettings::default());
    let frame = renderer.render_frame(
        &cfg.animation_style(),
        cfg.palette(),
        Progress::wrapped(args.progress),
        cfg.canvas(),
    )?;

    let out = args
        .out
        .unwrap_or_else(|| cfg.out_dir.join(cfg.style.file_name("png")));
    if let Some(parent) = out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    image::save_buffer_with_format(
        &out,
        &frame.to_straight_rgba8(),
        frame.width,
        frame.height,
        image::ColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .with_context(|| format!("write png '{}'", out.display()))?;

    eprintln!("wrote {}", out.display());
    Ok(())
}

fn cmd_gif(mut cfg: StudioConfig, args: GifArgs) -> anyhow::Result<()> {
    apply_look(&mut cfg, args.look);
    if let Some(d) = args.duration {
        cfg.duration_secs = d;
    }
    if let Some(fps) = args.fps {
        cfg.frame_rate = fps;
    }
    if let Some(dir) = args.out_dir {
        cfg.out_dir = dir;
    }
    if let Some(speed) = args.speed {
        cfg.gif_speed = speed;
    }
    cfg.parallel |= args.parallel;

    let matte = args
        .matte
        .as_deref()
        .map(Color::parse_hex)
        .transpose()
        .context("parse --matte")?;

    let request = ExportRequest {
        palette: cfg.palette(),
        style: cfg.animation_style(),
        duration: cfg.duration()?,
        frame_rate: cfg.frame_rate()?,
        target: ExportTarget::Offscreen(cfg.canvas()),
    };
    let exporter = RasterSequenceExporter::new(
        RenderSettings::default(),
        RenderThreading {
            parallel: cfg.parallel,
            ..RenderThreading::default()
        },
    );
    let sink = GifSink::new().with_speed(cfg.gif_speed).with_matte(matte);

    let trigger = ExportTrigger::new(exporter);
    let blob = trigger.spawn(request, sink)?.wait()?;

    std::fs::create_dir_all(&cfg.out_dir)
        .with_context(|| format!("create output dir '{}'", cfg.out_dir.display()))?;
    let out = cfg.out_dir.join(&blob.file_name);
    std::fs::write(&out, &blob.bytes).with_context(|| format!("write gif '{}'", out.display()))?;

    eprintln!("wrote {} ({} bytes)", out.display(), blob.len());
    Ok(())
}

fn cmd_preview(mut cfg: StudioConfig, args: PreviewArgs) -> anyhow::Result<()> {
    apply_look(&mut cfg, args.look);
    if let Some(d) = args.duration {
        cfg.duration_secs = d;
    }

    let stage = Stage::new();
    let mut element = stage.mount("preview", cfg.canvas());
    let params = LoopParams {
        style: cfg.animation_style(),
        palette: cfg.palette(),
        duration: cfg.duration()?,
    };
    let mut scheduler = LoopScheduler::with_system_clock(cfg.canvas(), params)?;
    scheduler.set_reactivity(args.reactivity);

    scheduler.start();
    let stop = scheduler.stop_handle();
    let run_for = Duration::try_from_secs_f64(args.seconds.max(0.0)).context("--seconds")?;
    let timer = std::thread::spawn(move || {
        std::thread::sleep(run_for);
        stop.stop();
    });

    let mut pacer = FixedRatePacer::new(args.refresh_hz);
    let presented = scheduler.run(&mut pacer, &mut element)?;
    let _ = timer.join();
    eprintln!("presented {presented} frames");

    if args.snapshot {
        let still = StillExporter::new(&cfg.out_dir, cfg.style);
        match still.capture(&stage, element.id()) {
            Some(path) => eprintln!("wrote {}", path.display()),
            None => anyhow::bail!("snapshot failed"),
        }
    }
    Ok(())
}

fn cmd_contrast(args: ContrastArgs) -> anyhow::Result<()> {
    let a = normalize(&args.a);
    let b = normalize(&args.b);
    println!("{a}\tluminance {:.2}", luminance(a));
    println!("{b}\tluminance {:.2}", luminance(b));
    println!("contrast ratio {:.3}", contrast_ratio(a, b));
    Ok(())
}
