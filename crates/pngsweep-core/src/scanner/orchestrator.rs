/// Two-phase scan orchestrator: count, then convert.
///
/// ```text
///  Idle ──▶ Counting ──▶ Converting ──▶ Finished
///              │  │           │
///              │  └─(0 files)─┼────────▶ Finished
///              │              │
///              └──(stop)──────┴─(stop)─▶ Stopped
/// ```
///
/// A walk failure during Counting ends the run in `Finished` with
/// `fatal_error` set. Every path out of [`run_scan`] goes through
/// [`RunContext::finish`], which emits exactly one terminal report.
use crate::model::format::format_elapsed;
use crate::model::{CandidateFile, RunOutcome, ScanRequest, ScanState, ScanTuning};
use crate::scanner::cancel::CancellationToken;
use crate::scanner::enumerate::enumerate_candidates;
use crate::scanner::progress::{LogLevel, ProgressSink};
use crate::transform::{apply_transform, Transform};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Run a full scan on the calling thread.
///
/// `request` must already have been through [`ScanRequest::prepare`]; the
/// background [`crate::scanner::ScanWorker`] does that before spawning.
pub fn run_scan(
    request: &ScanRequest,
    token: &CancellationToken,
    sink: &dyn ProgressSink,
    transform: &dyn Transform,
    tuning: &ScanTuning,
) -> RunOutcome {
    let mut ctx = RunContext::new(request, token, sink, tuning);

    info!("Starting scan of {}", request.root_path.display());
    sink.log(
        &format!("Starting scan in: {}", request.root_path.display()),
        LogLevel::Info,
    );
    sink.log(
        &format!("Output folder: {}", request.output_directory.display()),
        LogLevel::Info,
    );
    if request.delete_originals {
        sink.log("Delete originals option is ON.", LogLevel::Warning);
    }

    let Some(candidates) = ctx.count() else {
        return ctx.finish();
    };
    if candidates.is_empty() {
        sink.log("No matching files found.", LogLevel::Info);
        ctx.enter(ScanState::Finished);
        return ctx.finish();
    }

    ctx.convert(&candidates, transform);
    ctx.finish()
}

/// Run-scoped state. Created fresh for every run and owned by the worker.
struct RunContext<'a> {
    request: &'a ScanRequest,
    token: &'a CancellationToken,
    sink: &'a dyn ProgressSink,
    tuning: &'a ScanTuning,
    outcome: RunOutcome,
}

impl<'a> RunContext<'a> {
    fn new(
        request: &'a ScanRequest,
        token: &'a CancellationToken,
        sink: &'a dyn ProgressSink,
        tuning: &'a ScanTuning,
    ) -> Self {
        Self {
            request,
            token,
            sink,
            tuning,
            outcome: RunOutcome::empty(request.output_directory.clone(), request.delete_originals),
        }
    }

    fn enter(&mut self, state: ScanState) {
        debug!("{} -> {}", self.outcome.state.label(), state.label());
        self.outcome.state = state;
        self.sink.phase_changed(state);
    }

    /// Phase 1. `None` means the run is over (stopped or failed).
    fn count(&mut self) -> Option<Vec<CandidateFile>> {
        self.enter(ScanState::Counting);
        self.sink.report_status("Counting files...");

        let start = Instant::now();
        let result = enumerate_candidates(self.request, self.token, self.sink, self.tuning);
        self.outcome.elapsed_count = start.elapsed();

        let enumeration = match result {
            Ok(e) => e,
            Err(err) => {
                warn!("Enumeration failed: {err}");
                self.sink.report_status("");
                self.sink
                    .log(&format!("*** Error counting files: {err} ***"), LogLevel::Error);
                self.outcome.fatal_error = Some(err.to_string());
                self.enter(ScanState::Finished);
                return None;
            }
        };

        self.outcome.skipped_dirs = enumeration.skipped_dirs;
        if enumeration.cancelled {
            self.sink.log("Scan stopped during counting.", LogLevel::Warning);
            self.outcome.stopped_early = true;
            self.enter(ScanState::Stopped);
            return None;
        }

        let total = enumeration.candidates.len() as u64;
        self.outcome.total_candidates = total;
        self.sink.log(
            &format!(
                "Count finished in {}. Found {} files.",
                format_elapsed(self.outcome.elapsed_count),
                total
            ),
            LogLevel::Info,
        );
        self.sink.report_progress(self.outcome.counters, total);
        Some(enumeration.candidates)
    }

    /// Phase 2 over the frozen candidate list.
    fn convert(&mut self, candidates: &[CandidateFile], transform: &dyn Transform) {
        self.enter(ScanState::Converting);
        self.sink.report_status("Converting images...");

        let total = candidates.len() as u64;
        let status_every = self.tuning.status_every_files.max(1);
        let start = Instant::now();

        for candidate in candidates {
            // Checked before each file so a stop never starts one more.
            if self.token.is_stop_requested() {
                self.sink.log("Scan stopped during conversion.", LogLevel::Warning);
                self.outcome.stopped_early = true;
                break;
            }

            let result = apply_transform(
                transform,
                candidate,
                self.request.delete_originals,
                self.sink,
            );
            let counters = &mut self.outcome.counters;
            counters.record(result);
            debug_assert!(counters.is_consistent());

            let snapshot = *counters;
            self.sink.report_progress(snapshot, total);
            if snapshot.processed.is_multiple_of(status_every) || snapshot.processed == total {
                self.sink
                    .report_status(&format!("Processing: {} / {}", snapshot.processed, total));
            }
        }

        self.outcome.elapsed_convert = start.elapsed();
        self.sink.report_status("");
        let end = if self.outcome.stopped_early {
            ScanState::Stopped
        } else {
            ScanState::Finished
        };
        self.enter(end);
    }

    /// Log the summary and emit the terminal report.
    fn finish(self) -> RunOutcome {
        let outcome = self.outcome;
        let level = if outcome.fatal_error.is_some() {
            LogLevel::Error
        } else if outcome.stopped_early {
            LogLevel::Warning
        } else {
            LogLevel::Info
        };
        self.sink.log(&outcome.summary(), level);
        info!(
            "Scan {}: {}",
            outcome.state.label().to_lowercase(),
            outcome.counts_line()
        );
        self.sink.finish(&outcome);
        outcome
    }
}
