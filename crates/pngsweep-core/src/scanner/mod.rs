/// Scanner module: orchestrates the count-then-convert run.
///
/// - [`enumerate`]: phase 1, the `jwalk` tree walk producing the candidate list.
/// - [`orchestrator`]: the state machine driving both phases ([`run_scan`]).
/// - [`progress`]: the observer trait and the channel messages.
/// - [`cancel`]: the cooperative stop flag.
///
/// [`ScanWorker::start`] runs the whole thing on one background thread and
/// hands back a [`ScanHandle`] whose channel the UI drains once per frame.
pub mod cancel;
pub mod enumerate;
pub mod orchestrator;
pub mod progress;

pub use crate::model::ScanState;
pub use orchestrator::run_scan;

use crate::error::ScanError;
use crate::model::{RunOutcome, ScanCounters, ScanRequest, ScanTuning};
use crate::transform::{panic_message, PngTransform, Transform};
use cancel::CancellationToken;
use crossbeam_channel::Receiver;
use progress::{ChannelSink, LogLevel, ProgressSink, ScanEvent};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{error, info};

/// Maximum number of progress messages that may queue up in the channel.
///
/// The UI drains this channel once per frame. When it falls behind (hidden
/// window, resizing) numeric progress and status updates are dropped while
/// log lines and the terminal report block the worker briefly rather than
/// consuming unbounded heap.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

/// Handle to a running or completed scan. Allows cancellation and
/// receiving progress updates.
pub struct ScanHandle {
    /// Receiver for events from the scan thread.
    pub events: Receiver<ScanEvent>,
    /// Flag to request cancellation.
    token: CancellationToken,
    /// Join handle for the scan thread.
    thread: Option<thread::JoinHandle<()>>,
}

impl ScanHandle {
    /// Request the scan to stop at its next poll point.
    pub fn cancel(&self) {
        self.token.request_stop();
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_stop_requested()
    }

    /// The run's stop flag, for callers that poll or set it elsewhere.
    pub fn token(&self) -> &CancellationToken {
        &self.token
    }

    /// Block until the run reports its outcome, discarding other events.
    pub fn wait(mut self) -> Result<RunOutcome, ScanError> {
        let outcome = self.events.iter().find_map(|event| match event {
            ScanEvent::Finished(outcome) => Some(outcome),
            _ => None,
        });
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
        outcome.ok_or_else(|| {
            ScanError::WorkerPanicked("scanner exited without a final report".to_string())
        })
    }
}

/// Owner of the background scan thread. Runs one scan at a time.
pub struct ScanWorker {
    transform: Arc<dyn Transform>,
    tuning: ScanTuning,
    busy: Arc<AtomicBool>,
}

impl Default for ScanWorker {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanWorker {
    /// Worker using the PNG transform and default tuning.
    pub fn new() -> Self {
        Self::with_transform(Arc::new(PngTransform))
    }

    pub fn with_transform(transform: Arc<dyn Transform>) -> Self {
        Self {
            transform,
            tuning: ScanTuning::default(),
            busy: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn with_tuning(mut self, tuning: ScanTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Whether a run started by this worker has not reported its outcome yet.
    pub fn is_running(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Validate `request` and start a scan on a background thread.
    ///
    /// Fails with [`ScanError::AlreadyRunning`] while a previous run is
    /// active, and with [`ScanError::Config`] before any thread is spawned
    /// when the request is unusable.
    pub fn start(&self, request: ScanRequest) -> Result<ScanHandle, ScanError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(ScanError::AlreadyRunning);
        }

        let request = match request.prepare() {
            Ok(r) => r,
            Err(err) => {
                self.busy.store(false, Ordering::Release);
                return Err(err.into());
            }
        };

        let (tx, events) = crossbeam_channel::bounded::<ScanEvent>(PROGRESS_CHANNEL_CAPACITY);
        let token = CancellationToken::new();
        let sink = WorkerSink {
            inner: ChannelSink::new(tx),
            busy: self.busy.clone(),
        };
        let worker_token = token.clone();
        let transform = self.transform.clone();
        let tuning = self.tuning;

        let spawned = thread::Builder::new()
            .name("pngsweep-scanner".into())
            .spawn(move || {
                let result = panic::catch_unwind(AssertUnwindSafe(|| {
                    run_scan(&request, &worker_token, &sink, transform.as_ref(), &tuning)
                }));
                match result {
                    Ok(outcome) => info!("Scanner thread done ({})", outcome.state.label()),
                    Err(payload) => {
                        let err = ScanError::WorkerPanicked(panic_message(payload.as_ref()));
                        error!("{err}");
                        let mut outcome = RunOutcome::empty(
                            request.output_directory.clone(),
                            request.delete_originals,
                        );
                        outcome.state = ScanState::Finished;
                        outcome.fatal_error = Some(err.to_string());
                        sink.log(&format!("*** {err} ***"), LogLevel::Error);
                        sink.finish(&outcome);
                    }
                }
            });

        match spawned {
            Ok(thread) => Ok(ScanHandle {
                events,
                token,
                thread: Some(thread),
            }),
            Err(err) => {
                self.busy.store(false, Ordering::Release);
                Err(ScanError::Spawn(err))
            }
        }
    }
}

/// Channel sink that frees the worker for the next run just before the
/// terminal report goes out, so a frontend reacting to `Finished` can start
/// again immediately.
struct WorkerSink {
    inner: ChannelSink,
    busy: Arc<AtomicBool>,
}

impl ProgressSink for WorkerSink {
    fn report_progress(&self, counters: ScanCounters, total: u64) {
        self.inner.report_progress(counters, total);
    }

    fn report_status(&self, text: &str) {
        self.inner.report_status(text);
    }

    fn log(&self, message: &str, level: LogLevel) {
        self.inner.log(message, level);
    }

    fn phase_changed(&self, state: ScanState) {
        self.inner.phase_changed(state);
    }

    fn finish(&self, outcome: &RunOutcome) {
        self.busy.store(false, Ordering::Release);
        self.inner.finish(outcome);
    }
}
