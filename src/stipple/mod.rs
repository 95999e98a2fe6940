//! Icon stippling: parameters, glyph geometry and point placement.

pub mod engine;
pub mod icons;
pub mod params;
