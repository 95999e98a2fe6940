use kurbo::Shape as _;

use crate::foundation::core::{Affine, BezPath, Point, Rgb8, Vec2};
use crate::stipple::params::IconKind;

/// Fill/stroke style applied to an icon path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IconStyle {
    pub fill: Rgb8,
    pub stroke: Rgb8,
    pub stroke_width: f64,
}

impl IconStyle {
    /// White glyph with a thin black outline.
    pub const STIPPLE: Self = Self {
        fill: Rgb8::WHITE,
        stroke: Rgb8::BLACK,
        stroke_width: 0.6,
    };
}

/// One placed glyph: where, how rotated, which shape, and how it is painted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IconDraw {
    pub x: f64,
    pub y: f64,
    pub rotation_rad: f64,
    pub icon: IconKind,
    pub size: f64,
    pub style: IconStyle,
}

impl IconDraw {
    /// Local-to-surface transform. Circles are drawn unrotated.
    pub fn transform(&self) -> Affine {
        let translate = Affine::translate(Vec2::new(self.x, self.y));
        match self.icon {
            IconKind::Circle => translate,
            _ => translate * Affine::rotate(self.rotation_rad),
        }
    }

    /// Icon outline in local coordinates.
    pub fn local_path(&self) -> BezPath {
        icon_path(self.icon, self.size)
    }
}

/// Outline of `kind` at `size`, anchored at the local origin.
pub fn icon_path(kind: IconKind, size: f64) -> BezPath {
    match kind {
        IconKind::Cursor => cursor_path(size),
        IconKind::Circle => circle_path(size),
        IconKind::Triangle => triangle_path(size),
        IconKind::Star => star_path(size),
    }
}

/// Arrow pointer with its tip at the origin.
pub fn cursor_path(size: f64) -> BezPath {
    let s = size;
    polygon(&[
        (0.0, 0.0),
        (0.0, s * 1.5),
        (s * 0.4, s * 1.1),
        (s * 0.7, s * 1.8),
        (s * 0.9, s * 1.7),
        (s * 0.6, s),
        (s * 1.1, s * 0.95),
    ])
}

pub fn circle_path(size: f64) -> BezPath {
    kurbo::Circle::new(Point::ORIGIN, size * 0.6).to_path(0.1)
}

pub fn triangle_path(size: f64) -> BezPath {
    let h = size * 1.2;
    polygon(&[(0.0, -h * 0.6), (-h * 0.5, h * 0.6), (h * 0.5, h * 0.6)])
}

/// Five-pointed star, first point straight up.
pub fn star_path(size: f64) -> BezPath {
    let outer = size * 0.8;
    let inner = size * 0.35;
    let pts: Vec<(f64, f64)> = (0..10)
        .map(|i| {
            let r = if i % 2 == 0 { outer } else { inner };
            let a = std::f64::consts::PI / 5.0 * f64::from(i) - std::f64::consts::FRAC_PI_2;
            (a.cos() * r, a.sin() * r)
        })
        .collect();
    polygon(&pts)
}

fn polygon(points: &[(f64, f64)]) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(&(x, y)) = iter.next() {
        path.move_to((x, y));
        for &(x, y) in iter {
            path.line_to((x, y));
        }
        path.close_path();
    }
    path
}

#[cfg(test)]
#[path = "../../tests/unit/stipple/icons.rs"]
mod tests;
