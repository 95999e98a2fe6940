//! Frame-exact export of stippled clips.

pub mod cancel;
pub mod exporter;
pub mod progress;
pub mod settings;
pub mod state;

pub use cancel::CancelToken;
pub use exporter::FrameExporter;
pub use progress::{NoProgress, ProgressEvent, ProgressKind, ProgressSink};
pub use settings::ExportSettings;
pub use state::{ExportJob, ExportState, frame_timestamp, total_frames};
