/// Error types for the PngSweep engine.
///
/// Two failure classes surface here:
///
/// * [`ConfigError`]: the request is rejected before any worker thread is
///   spawned (missing root, empty extension set, unusable output folder).
/// * [`ScanError`]: a run-level failure: the walk itself could not proceed,
///   or a second run was requested while one is still active.
///
/// Per-file failures never appear here. They are classified by value as
/// [`crate::transform::FileOutcome::Errored`] and the run continues.
use std::path::PathBuf;
use thiserror::Error;

/// A scan request that cannot be started.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The scan root does not exist.
    #[error("scan root not found: '{}'", path.display())]
    RootNotFound { path: PathBuf },

    /// The scan root exists but is a file.
    #[error("scan root is not a directory: '{}'", path.display())]
    RootNotADirectory { path: PathBuf },

    /// No extensions were selected, so nothing could ever match.
    #[error("no file extensions selected")]
    NoExtensions,

    /// The output folder could not be created or resolved.
    #[error("cannot prepare output folder '{}': {source}", path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A failure of the run as a whole.
#[derive(Debug, Error)]
pub enum ScanError {
    /// A run is already in progress on this worker.
    #[error("a scan is already running")]
    AlreadyRunning,

    /// The request failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The directory walk failed at the root; enumeration cannot continue.
    #[error("cannot walk '{}': {message}", path.display())]
    Walk { path: PathBuf, message: String },

    /// The OS refused to start the worker thread.
    #[error("cannot spawn scanner thread: {0}")]
    Spawn(#[source] std::io::Error),

    /// The worker thread panicked.
    #[error("scan worker panicked: {0}")]
    WorkerPanicked(String),
}
