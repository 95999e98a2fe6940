use rand::Rng;

use crate::foundation::core::Point;
use crate::foundation::error::{StippleError, StippleResult};
use crate::foundation::math::round_half_up;
use crate::mask::Mask;
use crate::stipple::icons::{IconDraw, IconStyle};
use crate::stipple::params::StippleParams;

/// Largest ring radius searched when estimating distance to the nearest edge.
pub const EDGE_SEARCH_RADIUS: i64 = 8;

/// Masks and placement for one stipple pass.
///
/// `origin` is where mask pixel `(0, 0)` lands on the output surface; both masks must share the
/// same dimensions.
#[derive(Clone, Copy, Debug)]
pub struct StippleInput<'a> {
    pub origin: Point,
    pub silhouette: &'a Mask,
    pub edges: &'a Mask,
    pub params: StippleParams,
}

/// Sampling stride for `density`: `max(2, round(35 - density / 100 * 30))`.
pub fn grid_step(density: f64) -> u32 {
    let raw = round_half_up(35.0 - (density / 100.0) * 30.0);
    if raw.is_nan() { 2 } else { raw.max(2.0) as u32 }
}

/// Approximate distance from `(x, y)` to the closest edge pixel.
///
/// Searches square rings of radius `1..=EDGE_SEARCH_RADIUS` outward, scanning each ring row by
/// row; the first edge pixel met decides the distance even when another pixel on the same ring is
/// closer. Nothing within range yields `EDGE_SEARCH_RADIUS`.
pub fn edge_distance(edges: &Mask, x: i64, y: i64) -> f64 {
    if edges.get(x, y) {
        return 0.0;
    }
    for r in 1..=EDGE_SEARCH_RADIUS {
        for oy in -r..=r {
            let yy = y + oy;
            if yy < 0 || yy >= i64::from(edges.height()) {
                continue;
            }
            let full_row = oy == -r || oy == r;
            let mut ox = -r;
            while ox <= r {
                if edges.get(x + ox, yy) {
                    return (ox as f64).hypot(oy as f64);
                }
                ox += if full_row { 1 } else { 2 * r };
            }
        }
    }
    EDGE_SEARCH_RADIUS as f64
}

/// Place one icon per grid sample inside the silhouette.
///
/// Each sample is pushed away from the region center, hardest when it sits on an edge and not at
/// all once it is `EDGE_SEARCH_RADIUS` or more pixels from one. Rotation jitter draws from `rng`
/// and shrinks the same way.
pub fn render_stipples<R: Rng>(
    input: &StippleInput<'_>,
    rng: &mut R,
) -> StippleResult<Vec<IconDraw>> {
    let StippleInput {
        origin,
        silhouette,
        edges,
        params,
    } = *input;
    if !silhouette.same_size(edges) {
        return Err(StippleError::input(format!(
            "silhouette is {}x{} but edge mask is {}x{}",
            silhouette.width(),
            silhouette.height(),
            edges.width(),
            edges.height()
        )));
    }

    let params = params.clamped();
    let (width, height) = (silhouette.width(), silhouette.height());
    let step = grid_step(params.density) as usize;
    let center = Point::new(
        origin.x + f64::from(width) / 2.0,
        origin.y + f64::from(height) / 2.0,
    );
    let max_dispersion_px = f64::from(width.max(height)) * params.dispersion_amount / 100.0;

    let mut out = Vec::new();
    for y in (0..i64::from(height)).step_by(step) {
        for x in (0..i64::from(width)).step_by(step) {
            if !silhouette.get(x, y) {
                continue;
            }

            let dist = edge_distance(edges, x, y);
            let near = 1.0 - (dist / EDGE_SEARCH_RADIUS as f64).min(1.0);

            let px = origin.x + x as f64;
            let py = origin.y + y as f64;
            let away = (py - center.y).atan2(px - center.x);
            let strength = near * max_dispersion_px;

            let jitter_deg = (rng.r#gen::<f64>() - 0.5) * params.rotation_variance_deg * near;

            out.push(IconDraw {
                x: px + away.cos() * strength,
                y: py + away.sin() * strength,
                rotation_rad: jitter_deg.to_radians(),
                icon: params.icon,
                size: params.icon_size,
                style: IconStyle::STIPPLE,
            });
        }
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/stipple/engine.rs"]
mod tests;
