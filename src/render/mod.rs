//! Rasterization of stipple frames.

/// Contain-fit placement and export resolutions.
pub mod layout;
/// Per-frame and still-image render pipelines.
pub mod pipeline;
/// `vello_cpu` drawing surface.
pub mod surface;
