use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::foundation::core::Rgb8;

/// Dark square on a white field.
fn square_image(size: u32, inset: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((size * size * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let inside = x >= inset && x < size - inset && y >= inset && y < size - inset;
            let v = if inside { 0 } else { 255 };
            data.extend_from_slice(&[v, v, v, 255]);
        }
    }
    data
}

#[test]
fn bright_image_renders_only_background() {
    let white = [255u8; 4].repeat(32 * 32);
    let buf = PixelBuffer::new(32, 32, &white).unwrap();
    let canvas = Canvas::new(32, 32).unwrap();
    let mut surface = CpuSurface::new(canvas).unwrap();
    let params = StippleParams::default();
    let n = render_stipple_frame(
        &mut surface,
        &buf,
        Placement::full(canvas),
        params,
        &mut StdRng::seed_from_u64(0),
    )
    .unwrap();
    assert_eq!(n, 0);
    let frame = surface.snapshot().unwrap();
    let bg = params.background.to_rgba();
    assert!(frame.data.chunks_exact(4).all(|p| p == bg));
}

#[test]
fn dark_region_receives_icons() {
    let data = square_image(64, 16);
    let buf = PixelBuffer::new(64, 64, &data).unwrap();
    let canvas = Canvas::new(64, 64).unwrap();
    let mut surface = CpuSurface::new(canvas).unwrap();
    let params = StippleParams {
        density: 100.0,
        background: Rgb8::BLACK,
        ..StippleParams::default()
    };
    let n = render_stipple_frame(
        &mut surface,
        &buf,
        Placement::full(canvas),
        params,
        &mut StdRng::seed_from_u64(5),
    )
    .unwrap();
    assert!(n > 0);
    let frame = surface.snapshot().unwrap();
    assert!(frame.data.chunks_exact(4).any(|p| p != [0, 0, 0, 255]));
}

#[test]
fn still_render_is_deterministic_for_a_seed() {
    let data = square_image(48, 10);
    let buf = PixelBuffer::new(48, 48, &data).unwrap();
    let canvas = Canvas::new(96, 64).unwrap();
    let a = render_still(&buf, canvas, StippleParams::default(), &mut StdRng::seed_from_u64(7))
        .unwrap();
    let b = render_still(&buf, canvas, StippleParams::default(), &mut StdRng::seed_from_u64(7))
        .unwrap();
    assert_eq!((a.width, a.height), (96, 64));
    assert_eq!(a, b);
}

#[test]
fn progressive_render_reports_quick_then_full() {
    let data = square_image(40, 8);
    let buf = PixelBuffer::new(40, 40, &data).unwrap();
    let mut stages = Vec::new();
    let (frame, count) = render_still_progressive(
        &buf,
        Canvas::new(40, 40).unwrap(),
        StippleParams {
            density: 90.0,
            ..StippleParams::default()
        },
        &mut StdRng::seed_from_u64(1),
        |stage, f| stages.push((stage, f.width)),
    )
    .unwrap();
    assert_eq!(stages, vec![(StillStage::Quick, 40), (StillStage::Full, 40)]);
    assert_eq!(frame.width, 40);
    assert!(count > 0);
}
