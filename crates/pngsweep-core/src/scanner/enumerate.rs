/// Phase 1: tree enumeration using `jwalk`.
///
/// Walks the scan root and materialises every file whose name ends with one
/// of the requested extensions. Directory reads run on a rayon pool, but
/// `jwalk` yields entries to this thread in a stable depth-first order
/// (children sorted by name), so the candidate list is deterministic for a
/// given tree.
///
/// # Error tolerance
///
/// A directory that cannot be read is skipped together with its subtree and
/// counted in [`Enumeration::skipped_dirs`]. Only the first
/// `max_logged_dir_errors` are logged individually; one "omitted" notice
/// follows, then the rest are only counted. An unreadable **root** is the one
/// fatal case and returns [`ScanError::Walk`].
///
/// # Cancellation
///
/// The token is polled before each directory's children are read (inside
/// `process_read_dir`, which then yields no children), on every directory
/// entry, and every [`CANCEL_POLL_ENTRIES`] entries for very wide
/// directories. Cancellation returns a partial result with
/// `cancelled = true`, never an error.
use crate::error::ScanError;
use crate::model::{CandidateFile, ScanRequest, ScanTuning};
use crate::scanner::cancel::CancellationToken;
use crate::scanner::progress::{LogLevel, ProgressSink};
use std::path::Path;
use tracing::debug;

/// Poll the cancellation token at least this often, counted in entries.
pub const CANCEL_POLL_ENTRIES: u64 = 1_000;

/// Result of phase 1.
#[derive(Debug, Default)]
pub struct Enumeration {
    /// Matching files in enumeration order.
    pub candidates: Vec<CandidateFile>,
    /// Directories visited, including the root.
    pub dirs_visited: u64,
    /// Directories whose contents could not be read.
    pub skipped_dirs: u64,
    /// The walk stopped early because cancellation was requested.
    pub cancelled: bool,
}

/// Walk `request.root_path` and collect the candidate list.
pub fn enumerate_candidates(
    request: &ScanRequest,
    token: &CancellationToken,
    sink: &dyn ProgressSink,
    tuning: &ScanTuning,
) -> Result<Enumeration, ScanError> {
    let root = request.root_path.as_path();
    let excluded = request.output_directory.clone();
    let read_dir_token = token.clone();

    let walker = jwalk::WalkDir::new(root)
        .skip_hidden(false)
        .follow_links(false)
        .sort(true)
        .parallelism(jwalk::Parallelism::RayonNewPool(num_cpus::get()))
        .process_read_dir(move |_depth, _dir_path, _state, children| {
            if read_dir_token.is_stop_requested() {
                children.clear();
                return;
            }
            // Never descend into the output folder: freshly written PNGs
            // must not be rediscovered.
            children.retain(|child| match child {
                Ok(entry) => entry.path() != excluded,
                Err(_) => true,
            });
        });

    let status_every = tuning.status_every_dirs.max(1);
    let mut result = Enumeration::default();
    let mut entries_seen: u64 = 0;

    for entry_result in walker {
        entries_seen += 1;
        if entries_seen.is_multiple_of(CANCEL_POLL_ENTRIES) && token.is_stop_requested() {
            result.cancelled = true;
            break;
        }

        let entry = match entry_result {
            Ok(e) => e,
            Err(err) => {
                let err_path = err.path().map(Path::to_path_buf);
                if err_path.as_deref() == Some(root) {
                    return Err(ScanError::Walk {
                        path: root.to_path_buf(),
                        message: err.to_string(),
                    });
                }
                result.skipped_dirs += 1;
                note_skipped_dir(sink, tuning, result.skipped_dirs, err_path.as_deref(), &err);
                continue;
            }
        };

        let file_type = entry.file_type();
        if file_type.is_dir() {
            if token.is_stop_requested() {
                result.cancelled = true;
                break;
            }
            result.dirs_visited += 1;
            if result.dirs_visited.is_multiple_of(status_every) {
                sink.report_status(&format!(
                    "Counting... (Folder: ...{})",
                    entry.file_name().to_string_lossy()
                ));
            }
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if !request.matches(&name) {
            continue;
        }

        let path = entry.path();
        // A symlink is only a candidate when it resolves to a regular file.
        if file_type.is_symlink() && !path.is_file() {
            continue;
        }

        if let Some(output) = request.output_path_for(&path) {
            result.candidates.push(CandidateFile {
                source: path,
                output,
            });
        }
    }

    // Pruned reads yield no entries, so the loop may drain without seeing
    // the stop. Any stop observed by the end makes the result partial.
    if token.is_stop_requested() {
        result.cancelled = true;
    }

    if result.skipped_dirs > 0 {
        sink.log(
            &format!(
                "--- Skipped {} directories due to access errors.",
                result.skipped_dirs
            ),
            LogLevel::Skip,
        );
    }
    sink.report_status("");

    debug!(
        "Enumeration: {} candidates, {} dirs visited, {} skipped, cancelled={}",
        result.candidates.len(),
        result.dirs_visited,
        result.skipped_dirs,
        result.cancelled
    );

    Ok(result)
}

/// Rate-limited logging of one unreadable directory.
fn note_skipped_dir(
    sink: &dyn ProgressSink,
    tuning: &ScanTuning,
    nth: u64,
    path: Option<&Path>,
    err: &jwalk::Error,
) {
    debug!("Skipping unreadable directory {:?}: {err}", path);
    let name = path
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "<unknown>".to_string());
    let denied = matches!(
        err.io_error().map(|e| e.kind()),
        Some(std::io::ErrorKind::PermissionDenied)
    );
    if let Some(line) = skipped_dir_notice(nth, tuning.max_logged_dir_errors, &name, denied) {
        sink.log(&line, LogLevel::Skip);
    }
}

/// Log line for the `nth` skipped directory: the first `limit` are named,
/// the next one says the rest are omitted, later ones produce nothing.
fn skipped_dir_notice(nth: u64, limit: u64, name: &str, denied: bool) -> Option<String> {
    if nth <= limit {
        let reason = if denied {
            "Permission error accessing"
        } else {
            "Cannot read directory"
        };
        Some(format!("--- {reason}: {name}"))
    } else if nth == limit + 1 {
        Some("--- (Further directory errors omitted)".to_string())
    } else {
        None
    }
}
