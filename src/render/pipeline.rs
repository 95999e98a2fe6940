use rand::Rng;

use crate::foundation::core::{Canvas, Point};
use crate::foundation::error::StippleResult;
use crate::foundation::pixels::{FrameRGBA, PixelBuffer};
use crate::mask::edges::detect_edges;
use crate::mask::silhouette::extract_silhouette;
use crate::render::layout::{Placement, fit_contain};
use crate::render::surface::CpuSurface;
use crate::stipple::engine::{StippleInput, render_stipples};
use crate::stipple::params::StippleParams;

/// Density range used by the cheap first pass of [`render_still_progressive`].
pub const QUICK_PASS_DENSITY: (f64, f64) = (10.0, 30.0);

/// Which pass of a progressive still render produced a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StillStage {
    Quick,
    Full,
}

/// Stipple `pixels` onto `surface`.
///
/// The source is drawn into `placement`, read back at that size, turned into silhouette and edge
/// masks, then the surface is cleared to the background and the icons are drawn over it. Returns
/// the number of icons placed; the frame itself stays on the surface.
#[tracing::instrument(level = "trace", skip(surface, pixels, rng), fields(w = placement.width, h = placement.height))]
pub fn render_stipple_frame<R: Rng>(
    surface: &mut CpuSurface,
    pixels: &PixelBuffer<'_>,
    placement: Placement,
    params: StippleParams,
    rng: &mut R,
) -> StippleResult<usize> {
    let params = params.clamped();

    surface.clear(params.background);
    surface.draw_image(pixels, placement)?;
    let sampled = surface.read_pixels(placement)?;

    let silhouette = extract_silhouette(
        &sampled.view()?,
        params.threshold,
        params.invert_threshold,
    );
    let edges = detect_edges(&silhouette);

    surface.clear(params.background);
    let draws = render_stipples(
        &StippleInput {
            origin: Point::new(f64::from(placement.x), f64::from(placement.y)),
            silhouette: &silhouette,
            edges: &edges,
            params,
        },
        rng,
    )?;
    surface.draw_icons(&draws);
    Ok(draws.len())
}

/// Render a still image contain-fitted into `canvas`.
#[tracing::instrument(skip(pixels, rng), fields(src_w = pixels.width(), src_h = pixels.height()))]
pub fn render_still<R: Rng>(
    pixels: &PixelBuffer<'_>,
    canvas: Canvas,
    params: StippleParams,
    rng: &mut R,
) -> StippleResult<FrameRGBA> {
    render_still_progressive(pixels, canvas, params, rng, |_, _| {})
        .map(|(frame, _)| frame)
}

/// Render a quick low-density pass followed by the full pass.
///
/// `on_stage` sees each finished pass; the full frame is also returned along with its icon count.
pub fn render_still_progressive<R, F>(
    pixels: &PixelBuffer<'_>,
    canvas: Canvas,
    params: StippleParams,
    rng: &mut R,
    mut on_stage: F,
) -> StippleResult<(FrameRGBA, usize)>
where
    R: Rng,
    F: FnMut(StillStage, &FrameRGBA),
{
    let mut surface = CpuSurface::new(canvas)?;
    let source = Canvas {
        width: pixels.width(),
        height: pixels.height(),
    };
    let placement = fit_contain(source, canvas);

    let quick = StippleParams {
        density: params
            .density
            .clamp(QUICK_PASS_DENSITY.0, QUICK_PASS_DENSITY.1),
        ..params
    };
    let quick_count = render_stipple_frame(&mut surface, pixels, placement, quick, rng)?;
    tracing::debug!(icons = quick_count, "quick pass done");
    on_stage(StillStage::Quick, &surface.snapshot()?);

    let count = render_stipple_frame(&mut surface, pixels, placement, params, rng)?;
    let frame = surface.snapshot()?;
    on_stage(StillStage::Full, &frame);
    tracing::debug!(icons = count, "full pass done");
    Ok((frame, count))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
