/// Application state management.
///
/// Centralises all mutable state that the UI reads and writes.
/// The scan thread communicates via channels; state updates happen
/// in `process_scan_messages()` which runs once per frame.
///
/// Starting a run goes through a short confirmation chain before the worker
/// is asked for anything:
///
/// ```text
/// request_start ─▶ [full-system confirm] ─▶ [delete confirm] ─▶ start_scan
/// ```
use chrono::{DateTime, Local};
use pngsweep_core::model::ScanCounters;
use pngsweep_core::platform::{self, SystemRoot};
use pngsweep_core::scanner::progress::{LogLevel, ScanEvent};
use pngsweep_core::scanner::{ScanHandle, ScanState, ScanWorker};
use pngsweep_core::{RunOutcome, ScanRequest};
use std::collections::VecDeque;
use std::path::PathBuf;

/// The current phase of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppPhase {
    /// No run yet.
    Idle,
    /// A run is counting or converting.
    Scanning,
    /// A run has reported its outcome.
    Results,
}

/// Where the next run starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanTarget {
    /// The folder the executable lives in.
    AppDirectory,
    /// A folder typed or pasted by the user.
    Specific,
    /// A whole drive (Windows) or `/`.
    FullSystem,
}

/// A modal question waiting for the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingConfirm {
    /// About to walk an entire drive.
    FullSystem,
    /// About to delete every successfully converted original.
    DeleteOriginals,
    /// The window was closed while a run is active.
    Exit,
}

/// One timestamped entry in the log panel.
#[derive(Debug, Clone)]
pub struct LogLine {
    pub at: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
}

impl LogLine {
    /// `HH:MM:SS` prefix shown in the log panel.
    pub fn timestamp(&self) -> String {
        self.at.format("%H:%M:%S").to_string()
    }
}

/// Maximum number of scan events drained from the channel per frame.
///
/// Prevents a backlog (e.g. after the window was hidden) from blocking the
/// render thread for a perceptible duration when it is eventually shown again.
pub const MAX_MESSAGES_PER_FRAME: usize = 300;

/// Maximum lines kept in the log panel. Oldest lines are evicted first.
pub const MAX_LOG_LINES: usize = 5_000;

/// All application state.
pub struct AppState {
    // ── Target ─────────────────────────────────────────
    pub target: ScanTarget,
    /// Text of the "specific folder" field.
    pub specific_dir: String,
    pub system_roots: Vec<SystemRoot>,
    pub selected_root: Option<usize>,
    pub delete_originals: bool,
    pub output_dir: PathBuf,
    /// True if the process is running with admin privileges.
    pub is_elevated: bool,

    // ── Scan ───────────────────────────────────────────
    pub phase: AppPhase,
    /// Last engine state reported by the worker.
    pub scan_state: ScanState,
    pub worker: ScanWorker,
    pub scan_handle: Option<ScanHandle>,
    pub counters: ScanCounters,
    pub total: u64,
    pub status_text: String,
    /// A stop was requested and the worker has not acknowledged it yet.
    pub stop_requested: bool,
    pub last_outcome: Option<RunOutcome>,

    // ── Log ────────────────────────────────────────────
    pub log: VecDeque<LogLine>,

    // ── UI state ───────────────────────────────────────
    pub pending_confirm: Option<PendingConfirm>,
    pub show_summary: bool,
    pub show_about: bool,
    /// Close the window as soon as the current run reports its outcome.
    pub exit_after_scan: bool,
    /// Set once closing is allowed; the app sends the close command.
    pub close_now: bool,
    // ── Theme ──────────────────────────────────────────────
    /// `true` = dark mode (default), `false` = light mode.
    pub dark_mode: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    /// Create initial application state.
    pub fn new() -> Self {
        let system_roots = platform::system_roots();
        let selected_root = if system_roots.is_empty() { None } else { Some(0) };

        Self {
            target: ScanTarget::AppDirectory,
            specific_dir: String::new(),
            system_roots,
            selected_root,
            delete_originals: false,
            output_dir: platform::default_output_directory(),
            is_elevated: platform::is_elevated(),
            phase: AppPhase::Idle,
            scan_state: ScanState::Idle,
            worker: ScanWorker::new(),
            scan_handle: None,
            counters: ScanCounters::default(),
            total: 0,
            status_text: String::new(),
            stop_requested: false,
            last_outcome: None,
            log: VecDeque::new(),
            pending_confirm: None,
            show_summary: false,
            show_about: false,
            exit_after_scan: false,
            close_now: false,
            dark_mode: true,
        }
    }

    pub fn is_scanning(&self) -> bool {
        self.phase == AppPhase::Scanning
    }

    /// Append a line to the log panel, evicting the oldest past the cap.
    pub fn push_log(&mut self, level: LogLevel, message: impl Into<String>) {
        if self.log.len() >= MAX_LOG_LINES {
            self.log.pop_front();
        }
        self.log.push_back(LogLine {
            at: Local::now(),
            level,
            message: message.into(),
        });
    }

    /// The folder the next run would start from.
    pub fn resolve_root(&self) -> Result<PathBuf, String> {
        match self.target {
            ScanTarget::AppDirectory => Ok(platform::app_directory()),
            ScanTarget::Specific => {
                let text = self.specific_dir.trim().trim_matches('"');
                if text.is_empty() {
                    Err("Enter a folder to scan.".to_string())
                } else {
                    Ok(PathBuf::from(text))
                }
            }
            ScanTarget::FullSystem => self
                .selected_root
                .and_then(|i| self.system_roots.get(i))
                .map(|r| r.path.clone())
                .ok_or_else(|| "Select a drive to scan.".to_string()),
        }
    }

    /// Entry point for the Start button. Runs the confirmation chain.
    pub fn request_start(&mut self) {
        if self.is_scanning() || self.pending_confirm.is_some() {
            return;
        }
        if let Err(msg) = self.resolve_root() {
            self.push_log(LogLevel::Error, msg);
            return;
        }
        if self.target == ScanTarget::FullSystem {
            self.pending_confirm = Some(PendingConfirm::FullSystem);
        } else {
            self.after_full_system_confirmed();
        }
    }

    /// Answer to the full-system question.
    pub fn confirm_full_system(&mut self, accepted: bool) {
        self.pending_confirm = None;
        if accepted {
            self.after_full_system_confirmed();
        } else {
            self.push_log(LogLevel::Info, "Full system scan cancelled.");
        }
    }

    fn after_full_system_confirmed(&mut self) {
        if self.delete_originals {
            self.pending_confirm = Some(PendingConfirm::DeleteOriginals);
        } else {
            self.start_configured_scan(false);
        }
    }

    /// Answer to the delete-originals question. Declining still runs the
    /// scan, with deletion switched off.
    pub fn confirm_delete(&mut self, delete: bool) {
        self.pending_confirm = None;
        if !delete {
            self.delete_originals = false;
            self.push_log(LogLevel::Info, "Originals will be kept.");
        }
        self.start_configured_scan(delete);
    }

    /// Dismiss whatever confirmation is showing without acting on it.
    pub fn dismiss_confirm(&mut self) {
        self.pending_confirm = None;
    }

    fn start_configured_scan(&mut self, delete_originals: bool) {
        match self.resolve_root() {
            Ok(root) => {
                let request = ScanRequest::new(root, self.output_dir.clone())
                    .with_delete_originals(delete_originals);
                self.start_scan(request);
            }
            Err(msg) => self.push_log(LogLevel::Error, msg),
        }
    }

    /// Start a run for `request` immediately, skipping confirmations.
    pub fn start_scan(&mut self, request: ScanRequest) {
        match self.worker.start(request) {
            Ok(handle) => {
                // Reset scan state.
                self.log.clear();
                self.phase = AppPhase::Scanning;
                self.scan_state = ScanState::Idle;
                self.counters = ScanCounters::default();
                self.total = 0;
                self.status_text.clear();
                self.stop_requested = false;
                self.last_outcome = None;
                self.show_summary = false;
                self.scan_handle = Some(handle);
            }
            Err(err) => {
                tracing::warn!("Scan not started: {err}");
                self.push_log(LogLevel::Error, format!("Cannot start scan: {err}"));
            }
        }
    }

    /// Cancel any running scan.
    pub fn cancel_scan(&mut self) {
        if let Some(ref handle) = self.scan_handle {
            if !handle.is_cancelled() {
                handle.cancel();
                self.stop_requested = true;
                self.status_text = "Stopping...".to_string();
                self.push_log(LogLevel::Warning, "Stop requested...");
            }
        }
    }

    /// The window's close button was pressed. Returns `true` if the window
    /// may close now; otherwise a confirmation is shown.
    pub fn request_exit(&mut self) -> bool {
        if self.close_now || !self.is_scanning() {
            return true;
        }
        self.pending_confirm = Some(PendingConfirm::Exit);
        false
    }

    /// Answer to the exit-while-scanning question.
    pub fn confirm_exit(&mut self, accepted: bool) {
        self.pending_confirm = None;
        if accepted {
            self.exit_after_scan = true;
            self.cancel_scan();
        }
    }

    /// Fraction of candidates processed, for the progress bar.
    pub fn progress_fraction(&self) -> f32 {
        pngsweep_core::model::format::progress_fraction(self.counters.processed, self.total)
    }

    /// Process pending scan events. Called once per frame.
    ///
    /// Returns `true` if the UI should repaint (new data arrived).
    pub fn process_scan_messages(&mut self) -> bool {
        let mut repaint = false;

        // Drain available messages without blocking, subject to a per-frame
        // budget so a large backlog cannot stall the render thread.
        let mut messages_this_frame = 0usize;
        while messages_this_frame < MAX_MESSAGES_PER_FRAME {
            let Some(handle) = self.scan_handle.as_ref() else {
                break;
            };
            let event = match handle.events.try_recv() {
                Ok(event) => event,
                Err(crossbeam_channel::TryRecvError::Empty) => break,
                Err(crossbeam_channel::TryRecvError::Disconnected) => {
                    // The worker always sends Finished before hanging up.
                    tracing::error!("Scanner channel closed without a final report");
                    self.push_log(LogLevel::Error, "*** Scanner stopped unexpectedly ***");
                    self.scan_handle = None;
                    self.phase = AppPhase::Results;
                    self.release_exit();
                    return true;
                }
            };
            messages_this_frame += 1;
            repaint = true;
            match event {
                ScanEvent::Phase(state) => self.scan_state = state,
                ScanEvent::Progress { counters, total } => {
                    self.counters = counters;
                    self.total = total;
                }
                ScanEvent::Status(text) => {
                    // Keep "Stopping..." visible until the worker is done.
                    if !self.stop_requested {
                        self.status_text = text;
                    }
                }
                ScanEvent::Log { level, message } => self.push_log(level, message),
                ScanEvent::Finished(outcome) => {
                    self.finish_run(outcome);
                    return true;
                }
            }
        }
        repaint
    }

    fn finish_run(&mut self, outcome: RunOutcome) {
        self.scan_state = outcome.state;
        self.counters = outcome.counters;
        self.total = outcome.total_candidates;
        self.status_text.clear();
        self.stop_requested = false;
        self.phase = AppPhase::Results;
        self.scan_handle = None;
        self.show_summary = !self.exit_after_scan;
        self.last_outcome = Some(outcome);
        self.release_exit();
    }

    fn release_exit(&mut self) {
        if self.exit_after_scan {
            self.close_now = true;
        }
    }
}
