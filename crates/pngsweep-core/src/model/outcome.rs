/// Per-run counters, candidates, and the terminal outcome.
use super::format::{format_count, format_elapsed};
use std::path::PathBuf;
use std::time::Duration;

/// Lifecycle of a single run.
///
/// `Idle` is the only entry state. `Finished` and `Stopped` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    Idle,
    Counting,
    Converting,
    Finished,
    Stopped,
}

impl ScanState {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Counting => "Counting files",
            Self::Converting => "Converting images",
            Self::Finished => "Finished",
            Self::Stopped => "Stopped",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Stopped)
    }
}

/// Classification of one candidate after the transform adapter ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Converted,
    Skipped,
    Errored,
}

/// Running totals. Only the orchestrator mutates these.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanCounters {
    pub processed: u64,
    pub converted: u64,
    pub skipped: u64,
    pub errored: u64,
}

impl ScanCounters {
    /// Count one processed file in its bucket.
    pub fn record(&mut self, outcome: FileOutcome) {
        self.processed += 1;
        match outcome {
            FileOutcome::Converted => self.converted += 1,
            FileOutcome::Skipped => self.skipped += 1,
            FileOutcome::Errored => self.errored += 1,
        }
    }

    /// `processed == converted + skipped + errored`.
    pub fn is_consistent(&self) -> bool {
        self.processed == self.converted + self.skipped + self.errored
    }
}

/// A discovered source file and the PNG it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateFile {
    pub source: PathBuf,
    pub output: PathBuf,
}

/// Everything the frontend needs for the end-of-run summary.
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub state: ScanState,
    pub counters: ScanCounters,
    /// Candidates enumerated in phase 1 (0 when counting was stopped or failed).
    pub total_candidates: u64,
    pub elapsed_count: Duration,
    pub elapsed_convert: Duration,
    /// Cancellation was observed before the run completed.
    pub stopped_early: bool,
    /// Directories skipped because they could not be read.
    pub skipped_dirs: u64,
    /// Set when the enumeration phase failed; the outcome is then incomplete.
    pub fatal_error: Option<String>,
    pub output_directory: PathBuf,
    pub delete_originals: bool,
}

impl RunOutcome {
    /// Fresh outcome for a run that has not done anything yet.
    pub(crate) fn empty(output_directory: PathBuf, delete_originals: bool) -> Self {
        Self {
            state: ScanState::Idle,
            counters: ScanCounters::default(),
            total_candidates: 0,
            elapsed_count: Duration::ZERO,
            elapsed_convert: Duration::ZERO,
            stopped_early: false,
            skipped_dirs: 0,
            fatal_error: None,
            output_directory,
            delete_originals,
        }
    }

    /// The run did everything it set out to do.
    pub fn is_complete(&self) -> bool {
        self.state == ScanState::Finished && !self.stopped_early && self.fatal_error.is_none()
    }

    /// Counting finished normally and found nothing to convert.
    pub fn nothing_to_do(&self) -> bool {
        self.is_complete() && self.total_candidates == 0
    }

    pub fn elapsed_total(&self) -> Duration {
        self.elapsed_count + self.elapsed_convert
    }

    /// Counter line shared by every summary, e.g.
    /// `Processed: 3 | Converted: 2 | Skipped: 1 | Errors: 0`.
    pub fn counts_line(&self) -> String {
        format!(
            "Processed: {} | Converted: {} | Skipped: {} | Errors: {}",
            format_count(self.counters.processed),
            format_count(self.counters.converted),
            format_count(self.counters.skipped),
            format_count(self.counters.errored),
        )
    }

    /// Multi-line summary suitable for a log entry or a dialog body.
    pub fn summary(&self) -> String {
        let heading = if let Some(ref err) = self.fatal_error {
            format!("--- Scan Failed ---\n{err}\nScan may be incomplete.")
        } else if self.stopped_early {
            format!("--- Scan Stopped ({}) ---", format_elapsed(self.elapsed_total()))
        } else if self.total_candidates == 0 {
            "--- Scan Finished ---\nNo matching files found.".to_string()
        } else {
            format!("--- Scan Finished ({}) ---", format_elapsed(self.elapsed_convert))
        };
        let originals = if self.delete_originals {
            "Originals deleted."
        } else {
            "Originals kept."
        };
        format!(
            "{heading}\n{}\nOutput: {}\n{originals}",
            self.counts_line(),
            self.output_directory.display()
        )
    }
}
