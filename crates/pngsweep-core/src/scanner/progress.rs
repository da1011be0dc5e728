/// Scan progress reporting: the observer interface the engine drives, and
/// the lightweight messages sent from the scan thread to the UI thread via a
/// crossbeam channel.
use crate::model::{RunOutcome, ScanCounters, ScanState};
use crossbeam_channel::{Sender, TrySendError};
use tracing::{debug, error, info, warn};

/// Severity of a log line, used by the GUI for colour coding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Success,
    Skip,
}

impl LogLevel {
    /// Short tag shown in front of log lines.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARN",
            Self::Error => "ERROR",
            Self::Success => "OK",
            Self::Skip => "SKIP",
        }
    }
}

/// Observer of a running scan.
///
/// Every method is called from the worker thread. Implementations that
/// render elsewhere must marshal the call themselves; [`ChannelSink`] does so
/// by queueing a [`ScanEvent`].
pub trait ProgressSink {
    /// Numeric progress; `counters.processed` out of `total`.
    fn report_progress(&self, counters: ScanCounters, total: u64);

    /// Replace the one-line status text. An empty string clears it.
    fn report_status(&self, text: &str);

    /// Append a line to the run log.
    fn log(&self, message: &str, level: LogLevel);

    /// The orchestrator entered `state`.
    fn phase_changed(&self, _state: ScanState) {}

    /// The single terminal report of a run.
    fn finish(&self, outcome: &RunOutcome);
}

/// Messages sent from the scan thread to the UI.
#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// The orchestrator changed state.
    Phase(ScanState),
    /// Snapshot of the counters after a file was processed.
    Progress { counters: ScanCounters, total: u64 },
    /// New status-line text.
    Status(String),
    /// A log line.
    Log { level: LogLevel, message: String },
    /// The run ended. Always the last message of a run.
    Finished(RunOutcome),
}

/// [`ProgressSink`] that forwards everything into a channel.
///
/// Numeric progress and status text are sent with `try_send`: when the
/// observer falls behind and the channel is full they are dropped, which
/// only coalesces intermediate updates. Log lines, phase changes, and the
/// terminal outcome use a blocking `send` so they are never lost. All
/// messages travel through one channel, so order is preserved.
///
/// Because the last `Progress` of a run may be one of the dropped ones,
/// [`ScanEvent::Finished`] carries the authoritative final counters.
/// Frontends must take their closing numbers from the outcome, not from the
/// most recent `Progress` they happened to receive.
pub struct ChannelSink {
    tx: Sender<ScanEvent>,
}

impl ChannelSink {
    pub fn new(tx: Sender<ScanEvent>) -> Self {
        Self { tx }
    }

    fn send_lossy(&self, event: ScanEvent) {
        match self.tx.try_send(event) {
            Ok(()) | Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {}
        }
    }

    fn send(&self, event: ScanEvent) {
        // A disconnected receiver means the frontend went away; the run
        // carries on regardless.
        let _ = self.tx.send(event);
    }
}

impl ProgressSink for ChannelSink {
    fn report_progress(&self, counters: ScanCounters, total: u64) {
        self.send_lossy(ScanEvent::Progress { counters, total });
    }

    fn report_status(&self, text: &str) {
        self.send_lossy(ScanEvent::Status(text.to_owned()));
    }

    fn log(&self, message: &str, level: LogLevel) {
        self.send(ScanEvent::Log {
            level,
            message: message.to_owned(),
        });
    }

    fn phase_changed(&self, state: ScanState) {
        self.send(ScanEvent::Phase(state));
    }

    fn finish(&self, outcome: &RunOutcome) {
        self.send(ScanEvent::Finished(outcome.clone()));
    }
}

/// [`ProgressSink`] for headless use: everything goes to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl ProgressSink for TracingSink {
    fn report_progress(&self, counters: ScanCounters, total: u64) {
        debug!(processed = counters.processed, total, "progress");
    }

    fn report_status(&self, text: &str) {
        if !text.is_empty() {
            debug!("{text}");
        }
    }

    fn log(&self, message: &str, level: LogLevel) {
        match level {
            LogLevel::Error => error!("{message}"),
            LogLevel::Warning => warn!("{message}"),
            LogLevel::Skip => debug!("{message}"),
            LogLevel::Info | LogLevel::Success => info!("{message}"),
        }
    }

    fn phase_changed(&self, state: ScanState) {
        debug!("phase: {}", state.label());
    }

    fn finish(&self, outcome: &RunOutcome) {
        info!("{}", outcome.summary());
    }
}
