use super::*;
use serde_json::json;

#[test]
fn normalize_canonicalizes_to_uppercase() {
    assert_eq!(normalize("#ff00cc").to_hex(), "#FF00CC");
    assert_eq!(normalize("  #3333Ff ").to_hex(), "#3333FF");
}

#[test]
fn normalize_is_idempotent_for_valid_hex() {
    for input in ["#000000", "#ffffff", "#5538F6", "#aBcDeF", "#4973ff"] {
        let once = normalize(input);
        let twice = normalize(&once.to_hex());
        assert_eq!(once, twice, "{input}");
    }
}

#[test]
fn normalize_unsupported_formats_fall_back_deterministically() {
    for input in [
        "oklch(0.5 0.1 200)",
        "rgb(1, 2, 3)",
        "#fff",
        "#GGGGGG",
        "red",
        "",
        "#12345678",
    ] {
        assert_eq!(normalize(input), FALLBACK_COLOR, "{input}");
        assert_eq!(normalize(input), normalize(input));
    }
    assert_eq!(FALLBACK_COLOR.to_hex(), "#FF0000");
}

#[test]
fn parse_hex_is_strict() {
    assert!(Color::parse_hex("ff00cc").is_err());
    assert!(Color::parse_hex("#ff00c").is_err());
    assert_eq!(
        Color::parse_hex("#FF00CC").unwrap(),
        Color::rgb(0xFF, 0x00, 0xCC)
    );
    assert!("#12ab34".parse::<Color>().is_ok());
}

#[test]
fn luminance_uses_raw_channel_weights() {
    assert_eq!(luminance(Color::BLACK), 0.0);
    assert!((luminance(Color::WHITE) - 255.0).abs() < 1e-9);
    assert!((luminance(Color::rgb(0, 255, 0)) - 0.7152 * 255.0).abs() < 1e-9);
}

#[test]
fn contrast_ratio_is_symmetric() {
    let colors = [
        Color::BLACK,
        Color::WHITE,
        Color::rgb(0xFF, 0x00, 0xCC),
        Color::rgb(0x33, 0x33, 0xFF),
        Color::rgb(0x55, 0x38, 0xF6),
    ];
    for a in colors {
        for b in colors {
            assert_eq!(contrast_ratio(a, b), contrast_ratio(b, a));
        }
    }
    let bw = contrast_ratio(Color::BLACK, Color::WHITE);
    assert!((bw - (255.05 / 0.05)).abs() < 1e-6);
    assert_eq!(contrast_ratio(Color::WHITE, Color::WHITE), 1.0);
}

#[test]
fn with_alpha_rounds_to_bytes() {
    let c = Color::rgb(1, 2, 3);
    assert_eq!(c.with_alpha(0.5), Rgba8::new(1, 2, 3, 128));
    assert_eq!(c.with_alpha(2.0).a, 255);
    assert_eq!(c.opaque().a, 255);
}

#[test]
fn palette_serde_is_a_two_element_array() {
    let p: Palette = serde_json::from_value(json!(["#ff00cc", "#3333ff"])).unwrap();
    assert_eq!(p, Palette::default());
    assert_eq!(
        serde_json::to_value(p).unwrap(),
        json!(["#FF00CC", "#3333FF"])
    );
    assert!(serde_json::from_value::<Palette>(json!(["#ff00cc"])).is_err());
    assert!(serde_json::from_value::<Palette>(json!(["#ff00cc", "blue"])).is_err());
}

#[test]
fn palette_order_is_meaningful() {
    let p = Palette::from_tokens("#000000", "oklch(0.5 0.1 200)");
    assert_eq!(p.base, Color::BLACK);
    assert_eq!(p.accent, FALLBACK_COLOR);
    assert_ne!(p, p.swapped());
    assert_eq!(p.swapped().swapped(), p);
}
