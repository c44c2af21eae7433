use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use crate::{
    color::model::Palette,
    foundation::core::{AnimationDuration, Canvas, Progress},
    foundation::error::TideloopResult,
    playback::clock::{Clock, SystemClock},
    render::{
        renderer::{FrameRenderer, RenderSettings},
        surface::Surface,
    },
    style::AnimationStyle,
};

/// Receives each rendered preview frame.
pub trait Presenter {
    fn present(&mut self, surface: &Surface) -> TideloopResult<()>;
}

/// Host refresh primitive: blocks until the next display refresh is due.
pub trait RefreshPacer {
    fn wait_next(&mut self);
}

/// Sleeps out the remainder of a fixed refresh interval.
#[derive(Debug)]
pub struct FixedRatePacer {
    interval: Duration,
    last: Option<Instant>,
}

impl FixedRatePacer {
    pub fn new(refresh_hz: u32) -> Self {
        Self {
            interval: Duration::from_secs_f64(1.0 / f64::from(refresh_hz.max(1))),
            last: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl RefreshPacer for FixedRatePacer {
    fn wait_next(&mut self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                std::thread::sleep(self.interval - elapsed);
            }
        }
        self.last = Some(Instant::now());
    }
}

/// Cancellation token for a running loop. Clones share one flag and may be triggered from any
/// thread.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// Snapshot of what the preview loop draws.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoopParams {
    pub style: AnimationStyle,
    pub palette: Palette,
    pub duration: AnimationDuration,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Stopped,
    Running,
}

/// Continuous-playback driver for one preview surface.
pub struct LoopScheduler<C: Clock = SystemClock> {
    clock: C,
    renderer: FrameRenderer,
    surface: Surface,
    params: LoopParams,
    state: SchedulerState,
    start_time: Duration,
    reactivity: Option<f64>,
    stop: StopHandle,
}

impl LoopScheduler<SystemClock> {
    pub fn with_system_clock(canvas: Canvas, params: LoopParams) -> TideloopResult<Self> {
        Self::new(SystemClock::new(), canvas, params)
    }
}

impl<C: Clock> LoopScheduler<C> {
    pub fn new(clock: C, canvas: Canvas, params: LoopParams) -> TideloopResult<Self> {
        Ok(Self {
            clock,
            renderer: FrameRenderer::new(RenderSettings::default()),
            surface: Surface::new(canvas)?,
            params,
            state: SchedulerState::Stopped,
            start_time: Duration::ZERO,
            reactivity: None,
            stop: StopHandle::default(),
        })
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == SchedulerState::Running
    }

    pub fn params(&self) -> &LoopParams {
        &self.params
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Stopped -> Running. Records the start time; no-op while already running.
    pub fn start(&mut self) {
        if self.is_running() {
            return;
        }
        self.stop.reset();
        self.start_time = self.clock.now();
        self.state = SchedulerState::Running;
        tracing::debug!(style = %self.params.style.kind(), "preview loop started");
    }

    pub fn stop(&mut self) {
        self.stop.stop();
        if self.is_running() {
            tracing::debug!("preview loop stopped");
        }
        self.state = SchedulerState::Stopped;
    }

    /// Reallocate the surface for `canvas`. The next tick renders at the new size.
    pub fn resize(&mut self, canvas: Canvas) -> TideloopResult<()> {
        self.surface.resize(canvas)
    }

    /// Swap parameters without resetting the start time, so the phase may jump.
    pub fn set_params(&mut self, params: LoopParams) {
        self.params = params;
    }

    /// Drive progress from an external scalar in `[0, 1]` instead of elapsed time.
    pub fn set_reactivity(&mut self, level: Option<f64>) {
        self.reactivity = level.map(|v| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 });
    }

    /// Progress the next tick would render, or `None` while stopped.
    pub fn current_progress(&self) -> Option<Progress> {
        if !self.is_running() {
            return None;
        }
        Some(match self.reactivity {
            Some(level) => Progress::wrapped(level),
            None => {
                let elapsed = self.clock.now().saturating_sub(self.start_time);
                Progress::from_elapsed(elapsed, self.params.duration)
            }
        })
    }

    /// Render one frame for the current time into the owned surface.
    pub fn tick(&mut self) -> TideloopResult<Option<Progress>> {
        if self.stop.is_stopped() {
            self.state = SchedulerState::Stopped;
        }
        let Some(progress) = self.current_progress() else {
            return Ok(None);
        };
        self.renderer.render(
            &self.params.style,
            self.params.palette,
            progress,
            &mut self.surface,
        )?;
        Ok(Some(progress))
    }

    /// Tick, present and wait for the next refresh until the stop handle fires.
    ///
    /// Starts the loop if it is stopped. Returns the number of frames presented.
    pub fn run(
        &mut self,
        pacer: &mut dyn RefreshPacer,
        presenter: &mut dyn Presenter,
    ) -> TideloopResult<u64> {
        self.start();
        let mut presented = 0u64;
        while let Some(_progress) = self.tick()? {
            presenter.present(&self.surface)?;
            presented += 1;
            pacer.wait_next();
        }
        tracing::debug!(presented, "preview loop exited");
        Ok(presented)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/scheduler.rs"]
mod tests;
