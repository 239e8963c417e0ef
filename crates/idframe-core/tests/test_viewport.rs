mod common;

use approx::assert_relative_eq;
use image::RgbaImage;

use idframe_core::config::{SlotConfig, ZoomRange};
use idframe_core::viewport::{
    EventOutcome, LoadOutcome, Viewport, ViewportEvent, ViewportPhase,
};

use common::{pattern_image, png_bytes, slot, Lcg};

const EPS: f64 = 1e-9;

fn loaded(width: u32, height: u32, canvas_w: u32, canvas_h: u32) -> Viewport {
    let mut vp = Viewport::new(slot(canvas_w, canvas_h, 300)).unwrap();
    let outcome = vp.load_decoded(pattern_image(width, height));
    assert_eq!(outcome, LoadOutcome::Loaded { width, height });
    vp
}

fn assert_covered(vp: &Viewport) {
    let (dw, dh) = vp.draw_size().unwrap();
    let (cw, ch) = vp.canvas_size();
    let off = vp.offset();
    assert!(dw >= cw - EPS && dh >= ch - EPS, "draw {dw}x{dh} under canvas");
    assert!(off.x <= EPS && off.x >= cw - dw - EPS, "x offset {} out of range", off.x);
    assert!(off.y <= EPS && off.y >= ch - dh - EPS, "y offset {} out of range", off.y);
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[test]
fn test_load_computes_cover_scale_and_centres() {
    let vp = loaded(400, 300, 200, 200);

    assert_relative_eq!(vp.base_scale(), 200.0 / 300.0, epsilon = EPS);
    assert_eq!(vp.user_scale(), 1.0);

    let (dw, dh) = vp.draw_size().unwrap();
    assert_relative_eq!(dw, 400.0 * 2.0 / 3.0, epsilon = EPS);
    assert_relative_eq!(dh, 200.0, epsilon = EPS);
    assert_relative_eq!(vp.offset().x, (200.0 - dw) / 2.0, epsilon = EPS);
    assert_relative_eq!(vp.offset().y, 0.0, epsilon = EPS);
    assert_eq!(vp.phase(), ViewportPhase::Loaded);
}

#[test]
fn test_load_portrait_source_into_wide_canvas() {
    let vp = loaded(100, 400, 400, 160);
    assert_relative_eq!(vp.base_scale(), 4.0, epsilon = EPS);
    let (dw, dh) = vp.draw_size().unwrap();
    assert_relative_eq!(dw, 400.0, epsilon = EPS);
    assert_relative_eq!(dh, 1600.0, epsilon = EPS);
    assert_relative_eq!(vp.offset().y, (160.0 - 1600.0) / 2.0, epsilon = EPS);
    assert_covered(&vp);
}

#[test]
fn test_load_from_encoded_bytes() {
    let mut vp = Viewport::new(slot(200, 200, 300)).unwrap();
    let outcome = vp.load_bytes(&png_bytes(&pattern_image(40, 30)));
    assert_eq!(outcome, LoadOutcome::Loaded { width: 40, height: 30 });
    assert_eq!(vp.image_size(), Some((40, 30)));
}

#[test]
fn test_failed_load_leaves_state_unchanged() {
    let mut vp = loaded(400, 300, 200, 200);
    vp.set_zoom(2.0);
    vp.pan(15.0, -10.0);
    let before = (vp.user_scale(), vp.offset(), vp.image_size());

    assert_eq!(vp.load_bytes(b"definitely not an image"), LoadOutcome::Rejected);

    assert_eq!((vp.user_scale(), vp.offset(), vp.image_size()), before);
    assert!(vp.has_image());
}

#[test]
fn test_zero_dimension_image_rejected() {
    let mut vp = Viewport::new(slot(200, 200, 300)).unwrap();
    assert_eq!(vp.load_decoded(RgbaImage::new(0, 10)), LoadOutcome::Rejected);
    assert!(!vp.has_image());
    assert_eq!(vp.phase(), ViewportPhase::NoImage);
}

#[test]
fn test_stale_decode_is_discarded() {
    let mut vp = Viewport::new(slot(200, 200, 300)).unwrap();
    let first = vp.begin_load();
    let second = vp.begin_load();

    let outcome = vp.complete_load(second, Ok(pattern_image(50, 50)));
    assert_eq!(outcome, LoadOutcome::Loaded { width: 50, height: 50 });

    // The older decode resolves late and must not clobber the newer image.
    let outcome = vp.complete_load(first, Ok(pattern_image(80, 20)));
    assert_eq!(outcome, LoadOutcome::Stale);
    assert_eq!(vp.image_size(), Some((50, 50)));
}

#[test]
fn test_reset_invalidates_in_flight_load() {
    let mut vp = Viewport::new(slot(200, 200, 300)).unwrap();
    let ticket = vp.begin_load();
    vp.reset();
    assert_eq!(vp.complete_load(ticket, Ok(pattern_image(50, 50))), LoadOutcome::Stale);
    assert!(!vp.has_image());
}

#[test]
fn test_reset_then_reload_does_not_leak_transform() {
    let mut vp = loaded(400, 300, 200, 200);
    vp.set_zoom(2.5);
    vp.pan(-40.0, -30.0);
    assert!(matches!(vp.handle(ViewportEvent::Apply), EventOutcome::Exported(_)));
    assert_eq!(vp.phase(), ViewportPhase::Applied);

    assert!(matches!(vp.handle(ViewportEvent::Reset), EventOutcome::Cleared));
    assert_eq!(vp.phase(), ViewportPhase::NoImage);

    vp.load_decoded(pattern_image(300, 600));
    assert_eq!(vp.user_scale(), 1.0);
    assert_relative_eq!(vp.base_scale(), 200.0 / 300.0, epsilon = EPS);
    let (_, dh) = vp.draw_size().unwrap();
    assert_relative_eq!(vp.offset().x, 0.0, epsilon = EPS);
    assert_relative_eq!(vp.offset().y, (200.0 - dh) / 2.0, epsilon = EPS);
}

#[test]
fn test_new_load_replaces_previous_transform() {
    let mut vp = loaded(400, 300, 200, 200);
    vp.set_zoom(3.0);
    vp.load_decoded(pattern_image(400, 300));
    assert_eq!(vp.user_scale(), 1.0);
    assert_relative_eq!(vp.offset().x, -100.0 / 3.0, epsilon = EPS);
}

// ---------------------------------------------------------------------------
// Zoom
// ---------------------------------------------------------------------------

#[test]
fn test_set_zoom_draw_size_matches_formula() {
    let mut vp = loaded(400, 300, 200, 200);
    for z in [1.0, 1.25, 1.5, 2.0, 2.75, 3.0] {
        vp.set_zoom(z);
        let (dw, dh) = vp.draw_size().unwrap();
        assert_relative_eq!(dw, 400.0 * vp.base_scale() * z, epsilon = 1e-9);
        assert_relative_eq!(dh, 300.0 * vp.base_scale() * z, epsilon = 1e-9);
        assert_covered(&vp);
    }
}

#[test]
fn test_set_zoom_clamps_to_bounds() {
    let mut vp = loaded(400, 300, 200, 200);
    vp.set_zoom(10.0);
    assert_eq!(vp.user_scale(), 3.0);
    vp.set_zoom(0.2);
    assert_eq!(vp.user_scale(), 1.0);
    vp.set_zoom(f64::NAN);
    assert_eq!(vp.user_scale(), 1.0);
}

#[test]
fn test_zoom_keeps_canvas_centre_fixed() {
    let mut vp = loaded(400, 300, 200, 200);
    vp.set_zoom(2.0);

    // Source point under the canvas centre, before and after.
    let under_centre = |vp: &Viewport| {
        let scale = vp.base_scale() * vp.user_scale();
        let off = vp.offset();
        ((100.0 - off.x) / scale, (100.0 - off.y) / scale)
    };
    let before = under_centre(&vp);
    vp.set_zoom(2.5);
    let after = under_centre(&vp);

    assert_relative_eq!(before.0, after.0, epsilon = 1e-9);
    assert_relative_eq!(before.1, after.1, epsilon = 1e-9);
    assert_relative_eq!(after.0, 200.0, epsilon = 1e-9);
    assert_relative_eq!(after.1, 150.0, epsilon = 1e-9);
}

#[test]
fn test_zoom_out_near_edge_is_clamped() {
    let mut vp = loaded(400, 300, 200, 200);
    vp.set_zoom(3.0);
    vp.pan(1000.0, 1000.0);
    assert_relative_eq!(vp.offset().x, 0.0, epsilon = EPS);
    assert_relative_eq!(vp.offset().y, 0.0, epsilon = EPS);

    vp.set_zoom(1.2);
    assert_covered(&vp);
}

#[test]
fn test_wheel_steps_zoom() {
    let mut vp = loaded(400, 300, 200, 200);
    vp.on_wheel(-120.0);
    assert_relative_eq!(vp.user_scale(), 1.05, epsilon = EPS);
    vp.on_wheel(-1.0);
    assert_relative_eq!(vp.user_scale(), 1.10, epsilon = EPS);
    vp.on_wheel(3.0);
    assert_relative_eq!(vp.user_scale(), 1.05, epsilon = EPS);
    vp.on_wheel(0.0);
    assert_relative_eq!(vp.user_scale(), 1.05, epsilon = EPS);

    for _ in 0..10 {
        vp.on_wheel(1.0);
    }
    assert_eq!(vp.user_scale(), 1.0);
}

// ---------------------------------------------------------------------------
// Pan / drag
// ---------------------------------------------------------------------------

#[test]
fn test_drag_is_relative_to_anchor() {
    let mut vp = loaded(400, 300, 200, 200);
    vp.set_zoom(2.0);
    let start = vp.offset();

    assert!(vp.begin_drag(50.0, 50.0));
    assert_eq!(vp.phase(), ViewportPhase::Dragging);
    vp.drag_to(60.0, 40.0);
    vp.drag_to(70.0, 45.0);
    assert_relative_eq!(vp.offset().x, start.x + 20.0, epsilon = EPS);
    assert_relative_eq!(vp.offset().y, start.y - 5.0, epsilon = EPS);

    vp.end_drag();
    assert!(!vp.is_dragging());
    assert_eq!(vp.phase(), ViewportPhase::Loaded);
}

#[test]
fn test_drag_clamps_to_cover() {
    let mut vp = loaded(400, 300, 200, 200);
    vp.begin_drag(10.0, 10.0);
    vp.drag_to(500.0, -500.0);
    let (dw, _) = vp.draw_size().unwrap();
    assert_relative_eq!(vp.offset().x, 0.0, epsilon = EPS);
    assert_relative_eq!(vp.offset().y, 0.0, epsilon = EPS);

    vp.drag_to(-500.0, 0.0);
    assert_relative_eq!(vp.offset().x, 200.0 - dw, epsilon = EPS);
}

#[test]
fn test_pointer_down_outside_canvas_ignored() {
    let mut vp = loaded(400, 300, 200, 200);
    let outcome = vp.handle(ViewportEvent::PointerDown { x: 250.0, y: 10.0 });
    assert!(matches!(outcome, EventOutcome::Ignored));
    assert!(!vp.is_dragging());
}

#[test]
fn test_pointer_down_without_image_ignored() {
    let mut vp = Viewport::new(slot(200, 200, 300)).unwrap();
    assert!(!vp.begin_drag(10.0, 10.0));
    assert_eq!(vp.phase(), ViewportPhase::NoImage);
}

#[test]
fn test_pointer_leave_ends_drag() {
    let mut vp = loaded(400, 300, 200, 200);
    vp.handle(ViewportEvent::PointerDown { x: 20.0, y: 20.0 });
    assert!(vp.is_dragging());
    assert!(matches!(vp.handle(ViewportEvent::PointerLeave), EventOutcome::Updated));
    assert!(!vp.is_dragging());
    // Moves after the drag ended do nothing.
    let off = vp.offset();
    assert!(matches!(
        vp.handle(ViewportEvent::PointerMove { x: 90.0, y: 90.0 }),
        EventOutcome::Ignored
    ));
    assert_eq!(vp.offset(), off);
}

#[test]
fn test_cover_invariant_under_random_interaction() {
    let mut vp = loaded(640, 480, 280, 360);
    let mut rng = Lcg::new(7);
    for _ in 0..500 {
        let op = rng.next_range(0.0, 4.0);
        if op < 1.0 {
            vp.set_zoom(rng.next_range(0.5, 3.5));
        } else if op < 2.0 {
            vp.pan(rng.next_range(-300.0, 300.0), rng.next_range(-300.0, 300.0));
        } else if op < 3.0 {
            vp.on_wheel(rng.next_range(-1.0, 1.0));
        } else {
            vp.begin_drag(rng.next_range(0.0, 280.0), rng.next_range(0.0, 360.0));
            vp.drag_to(rng.next_range(-200.0, 500.0), rng.next_range(-200.0, 500.0));
            vp.end_drag();
        }
        assert_covered(&vp);
    }
}

// ---------------------------------------------------------------------------
// Phases, render, config
// ---------------------------------------------------------------------------

#[test]
fn test_mutation_after_apply_returns_to_loaded() {
    let mut vp = loaded(400, 300, 200, 200);
    vp.handle(ViewportEvent::Apply);
    assert_eq!(vp.phase(), ViewportPhase::Applied);
    vp.handle(ViewportEvent::SetZoom(1.5));
    assert_eq!(vp.phase(), ViewportPhase::Loaded);
    vp.handle(ViewportEvent::Apply);
    assert_eq!(vp.phase(), ViewportPhase::Applied);
}

#[test]
fn test_apply_without_image_is_ignored() {
    let mut vp = Viewport::new(slot(200, 200, 300)).unwrap();
    assert!(matches!(vp.handle(ViewportEvent::Apply), EventOutcome::Ignored));
    assert_eq!(vp.phase(), ViewportPhase::NoImage);
}

#[test]
fn test_render_canvas_with_border() {
    let vp = loaded(400, 300, 200, 120);
    let surface = vp.render().unwrap();
    assert_eq!(surface.dimensions(), (200, 120));
    assert_eq!(surface.get_pixel(0, 0).0, [0x2c, 0x2c, 0x2c, 0xff]);
    assert_eq!(surface.get_pixel(199, 119).0, [0x2c, 0x2c, 0x2c, 0xff]);
    // Interior is covered by the opaque image.
    assert_eq!(surface.get_pixel(100, 60).0[3], 255);
}

#[test]
fn test_render_is_pure() {
    let vp = loaded(123, 77, 200, 120);
    assert_eq!(vp.render().unwrap(), vp.render().unwrap());
}

#[test]
fn test_render_without_image_is_none() {
    let vp = Viewport::new(slot(200, 120, 300)).unwrap();
    assert!(vp.render().is_none());
}

#[test]
fn test_viewport_rejects_zoom_min_below_one() {
    let config = SlotConfig {
        zoom: ZoomRange {
            min: 0.5,
            max: 3.0,
            step: 0.01,
        },
        ..SlotConfig::photo()
    };
    assert!(Viewport::new(config).is_err());
}

#[test]
fn test_ticket_from_other_viewport_is_stale() {
    let mut first = Viewport::new(slot(200, 200, 300)).unwrap();
    let mut second = Viewport::new(slot(200, 200, 300)).unwrap();

    let foreign = first.begin_load();
    let own = second.begin_load();

    assert_eq!(
        second.complete_load(foreign, Ok(pattern_image(90, 60))),
        LoadOutcome::Stale
    );
    assert!(!second.has_image());
    assert_eq!(
        second.complete_load(own, Ok(pattern_image(30, 40))),
        LoadOutcome::Loaded { width: 30, height: 40 }
    );
}

#[test]
fn test_non_finite_drag_is_ignored() {
    let mut vp = Viewport::new(slot(200, 200, 300)).unwrap();
    vp.load_decoded(pattern_image(400, 300));
    vp.set_zoom(2.0);
    let before = vp.offset();

    assert!(vp.begin_drag(50.0, 50.0));
    vp.handle(ViewportEvent::PointerMove { x: f64::NAN, y: 60.0 });
    vp.drag_to(70.0, f64::INFINITY);
    assert_eq!(vp.offset(), before);

    vp.drag_to(60.0, 55.0);
    let after = vp.offset();
    assert!(after.x.is_finite() && after.y.is_finite());
    assert_relative_eq!(after.x, before.x + 10.0, epsilon = 1e-9);
    assert_relative_eq!(after.y, before.y + 5.0, epsilon = 1e-9);
}
