/// Per-file transform contract and the adapter that enforces it.
///
/// The decode/encode routine sits behind the [`Transform`] trait and only
/// reports success or a [`TransformError`]. [`apply_transform`] wraps every
/// call with the run-level rules:
///
/// - an existing destination is **Skipped** and the transform is never called;
/// - a successful write is **Converted**, followed by the optional deletion of
///   the source (a failed delete is a warning, not an error);
/// - anything else, including a panic inside the decoder, is **Errored**.
///
/// Nothing escapes the per-file boundary except the [`FileOutcome`] value.
pub mod png;

pub use crate::model::FileOutcome;
pub use png::PngTransform;

use crate::model::CandidateFile;
use crate::scanner::progress::{LogLevel, ProgressSink};
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Converts one source file into one destination file.
pub trait Transform: Send + Sync {
    /// Write `dest` from `source`. `dest` does not exist when this is called.
    fn convert(&self, source: &Path, dest: &Path) -> Result<(), TransformError>;
}

/// Why a single file could not be converted.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The source could not be opened or read.
    #[error("cannot read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The source is not an image in any supported format.
    #[error("unidentified image format")]
    UnidentifiedFormat,

    /// The source looked like an image but decoding failed.
    #[error("cannot decode image: {0}")]
    Decode(#[source] image::ImageError),

    /// The process may not write the destination.
    #[error("permission denied saving '{}'", path.display())]
    PermissionDenied { path: PathBuf },

    /// The destination could not be written.
    #[error("cannot write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// PNG encoding failed.
    #[error("cannot encode PNG: {0}")]
    Encode(#[source] image::ImageError),
}

/// Run `transform` on one candidate and classify the result.
pub fn apply_transform(
    transform: &dyn Transform,
    candidate: &CandidateFile,
    delete_originals: bool,
    sink: &dyn ProgressSink,
) -> FileOutcome {
    let source_name = display_name(&candidate.source);

    // Idempotence: a destination that already exists is never rewritten.
    if candidate.output.exists() {
        debug!("Skipping {}: output exists", candidate.source.display());
        return FileOutcome::Skipped;
    }

    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        transform.convert(&candidate.source, &candidate.output)
    }));

    match result {
        Ok(Ok(())) => {
            sink.log(
                &format!("Converted: {source_name} -> {}", display_name(&candidate.output)),
                LogLevel::Success,
            );
            if delete_originals {
                if let Err(err) = fs::remove_file(&candidate.source) {
                    warn!("Could not delete {}: {err}", candidate.source.display());
                    sink.log(
                        &format!("*** Warn: could not delete {source_name}: {err}"),
                        LogLevel::Warning,
                    );
                }
            }
            FileOutcome::Converted
        }
        Ok(Err(err)) => {
            debug!("Conversion failed for {}: {err}", candidate.source.display());
            sink.log(&format!("*** Error: {source_name}: {err}"), LogLevel::Error);
            FileOutcome::Errored
        }
        Err(payload) => {
            let reason = panic_message(payload.as_ref());
            warn!("Transform panicked on {}: {reason}", candidate.source.display());
            sink.log(
                &format!("*** Error converting {source_name}: {reason}"),
                LogLevel::Error,
            );
            FileOutcome::Errored
        }
    }
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
