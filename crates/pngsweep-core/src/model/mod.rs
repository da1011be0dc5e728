/// Data model for a PngSweep run.
///
/// Re-exports the request, counters, and outcome types shared by the
/// scanner, the transform adapter, and any frontend.
pub mod format;
pub mod outcome;
pub mod request;

pub use outcome::{CandidateFile, FileOutcome, RunOutcome, ScanCounters, ScanState};
pub use request::{ScanRequest, ScanTuning, DEFAULT_EXTENSIONS, OUTPUT_FOLDER_NAME};
