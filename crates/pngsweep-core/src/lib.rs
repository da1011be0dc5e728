/// PngSweep Core: scanning, conversion, and data model.
///
/// This crate contains all business logic with zero UI dependencies.
/// It is designed to be reusable across different frontends (GUI, CLI, TUI).
///
/// # Modules
///
/// - [`model`]: Scan request, counters, candidates, and run outcome.
/// - [`scanner`]: Two-phase count-then-convert engine on a background thread.
/// - [`transform`]: Per-file transform contract and the PNG implementation.
/// - [`platform`]: Elevation check and full-system scan roots.
/// - [`error`]: Configuration and scan-level error types.
pub mod error;
pub mod model;
pub mod platform;
pub mod scanner;
pub mod transform;

pub use error::{ConfigError, ScanError};
pub use model::{CandidateFile, RunOutcome, ScanCounters, ScanRequest, ScanTuning};
pub use scanner::cancel::CancellationToken;
pub use scanner::progress::{ChannelSink, LogLevel, ProgressSink, ScanEvent, TracingSink};
pub use scanner::{run_scan, ScanHandle, ScanState, ScanWorker};
pub use transform::{apply_transform, FileOutcome, PngTransform, Transform, TransformError};
