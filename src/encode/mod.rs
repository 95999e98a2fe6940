//! Encoding sinks.
//!
//! Sinks consume rendered frames in strictly increasing index order and turn them into an output
//! artifact once the export finishes.

/// `ffmpeg`-based video sink (webm/mp4 via the system binary).
pub mod ffmpeg;
/// Animated GIF sink built on the `image` crate.
pub mod gif;
/// Sink trait and the in-memory sink.
pub mod sink;
