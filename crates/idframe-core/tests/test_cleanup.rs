mod common;

use image::{DynamicImage, Rgba, RgbImage, RgbaImage};

use idframe_core::cleanup::{cleanup, cleanup_dynamic, SignaturePair, Threshold};

use common::{pattern_image, solid_image};

fn single(color: [u8; 4], threshold: u8) -> [u8; 4] {
    let img = solid_image(1, 1, color);
    cleanup(&img, Threshold::new(threshold)).get_pixel(0, 0).0
}

#[test]
fn test_dark_pixel_boost_values() {
    // brightness 60, boost (255 - 60) * 0.2 = 39
    assert_eq!(single([100, 50, 30, 255], 190), [61, 11, 0, 255]);
}

#[test]
fn test_pixel_at_threshold_is_background() {
    assert_eq!(single([190, 190, 190, 255], 190)[3], 0);
    assert_eq!(single([189, 190, 190, 255], 190)[3], 255);
}

#[test]
fn test_background_keeps_colour_channels() {
    assert_eq!(single([240, 230, 220, 255], 190), [240, 230, 220, 0]);
}

#[test]
fn test_ink_alpha_forced_opaque() {
    assert_eq!(single([10, 10, 10, 0], 190), [0, 0, 0, 255]);
}

#[test]
fn test_threshold_255_removes_only_pure_white() {
    let img = RgbaImage::from_fn(3, 1, |x, _| match x {
        0 => Rgba([255, 255, 255, 255]),
        1 => Rgba([254, 255, 255, 255]),
        _ => Rgba([128, 128, 128, 255]),
    });
    let out = cleanup(&img, Threshold::MAX);
    assert_eq!(out.get_pixel(0, 0).0[3], 0);
    assert_eq!(out.get_pixel(1, 0).0[3], 255);
    assert_eq!(out.get_pixel(2, 0).0[3], 255);
}

#[test]
fn test_threshold_zero_removes_nothing_and_boosts_everything() {
    let img = pattern_image(32, 16);
    let out = cleanup(&img, Threshold::MIN);
    for (src, dst) in img.pixels().zip(out.pixels()) {
        let [r, g, b, _] = src.0;
        let brightness = (r as f64 + g as f64 + b as f64) / 3.0;
        let boost = (255.0 - brightness) * 0.2;
        let expect = |c: u8| (c as f64 - boost).max(0.0).round_ties_even() as u8;
        assert_eq!(dst.0, [expect(r), expect(g), expect(b), 255]);
    }
}

#[test]
fn test_raw_is_not_modified() {
    let raw = pattern_image(20, 20);
    let copy = raw.clone();
    let _ = cleanup(&raw, Threshold::default());
    assert_eq!(raw, copy);
}

#[test]
fn test_parallel_path_matches_small_path() {
    // 300x300 crosses the parallel threshold; every pixel must match the
    // same colour cleaned on a tiny image.
    let color = [120, 90, 60, 255];
    let big = cleanup(&solid_image(300, 300, color), Threshold::default());
    let expected = single(color, Threshold::default().value());
    assert!(big.pixels().all(|p| p.0 == expected));
}

#[test]
fn test_retune_always_sources_from_raw() {
    let raw = solid_image(4, 4, [150, 150, 150, 255]);
    let t1 = Threshold::new(190);
    let t2 = Threshold::new(140);

    let direct = cleanup(&raw, t2);
    let compounded = cleanup(&cleanup(&raw, t1), t2);
    assert_ne!(direct, compounded, "compounding must give a different result here");

    let mut pair = SignaturePair::new(raw.clone(), t1);
    assert!(pair.retune(t2));
    assert_eq!(pair.cleaned(), &direct);
    assert_eq!(pair.threshold(), t2);
    assert_eq!(&**pair.raw(), &raw);

    // Back to the first threshold: identical to a fresh clean.
    pair.retune(t1);
    assert_eq!(pair.cleaned(), &cleanup(&raw, t1));
}

#[test]
fn test_retune_same_threshold_is_noop() {
    let mut pair = SignaturePair::new(pattern_image(8, 8), Threshold::default());
    assert!(!pair.retune(Threshold::default()));
}

#[test]
fn test_cleanup_dynamic_rejects_non_rgba() {
    let rgb = DynamicImage::ImageRgb8(RgbImage::new(4, 4));
    assert!(cleanup_dynamic(&rgb, Threshold::default()).is_err());

    let rgba = DynamicImage::ImageRgba8(pattern_image(4, 4));
    assert!(cleanup_dynamic(&rgba, Threshold::default()).is_ok());
}

#[test]
fn test_threshold_clamping() {
    assert_eq!(Threshold::clamped(-20), Threshold::MIN);
    assert_eq!(Threshold::clamped(999), Threshold::MAX);
    assert_eq!(Threshold::clamped(190).value(), 190);
    assert_eq!(Threshold::default().value(), 190);
    assert_eq!(format!("{}", Threshold::new(42)), "42");
}

#[test]
fn test_pair_pngs_encode() {
    let pair = SignaturePair::new(pattern_image(8, 8), Threshold::default());
    let raw = image::load_from_memory(&pair.raw_png().unwrap()).unwrap().to_rgba8();
    let cleaned = image::load_from_memory(&pair.cleaned_png().unwrap())
        .unwrap()
        .to_rgba8();
    assert_eq!(&raw, &**pair.raw());
    assert_eq!(&cleaned, pair.cleaned());
}
