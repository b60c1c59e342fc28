//! Process-scoped diagnostics context for the INI store.
//!
//! One [`Diagnostics`] value is created by the host at start-up and handed to
//! every [`ConfigFile`](super::file::ConfigFile) it opens.  It holds a single
//! "last error" slot plus the path of the most recently opened file.  Clones
//! share the same slot.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::IniError;

/// A recorded failure, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticReport {
    /// Failure class, e.g. `"FileMissing"`.
    pub kind: &'static str,
    /// Human-readable message.
    pub message: String,
    /// Synthetic backtrace: a `"Backtrace:"` line followed by call sites.
    pub backtrace: Vec<String>,
}

impl DiagnosticReport {
    /// The report shown when nothing has gone wrong.
    pub fn no_error() -> Self {
        Self {
            kind: "NoError",
            message: "Everything is working fine.".to_string(),
            backtrace: Vec::new(),
        }
    }

    /// Builds a report for `error`, listing `frames` innermost last.
    pub fn from_error(error: &IniError, frames: &[&str]) -> Self {
        let mut backtrace = Vec::with_capacity(frames.len() + 1);
        backtrace.push("Backtrace:".to_string());
        backtrace.extend(frames.iter().map(|f| f.to_string()));
        Self {
            kind: error.kind(),
            message: error.to_string(),
            backtrace,
        }
    }

    /// `kind`, `message` and the backtrace lines joined with newlines.
    pub fn formatted(&self) -> String {
        let mut text = format!("{}\n{}\n", self.kind, self.message);
        text.push_str(&self.backtrace.join("\n"));
        text
    }
}

#[derive(Debug, Default)]
struct DiagnosticsState {
    last_error: Option<DiagnosticReport>,
    last_opened: Option<PathBuf>,
}

/// Shared last-error slot.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    state: Arc<Mutex<DiagnosticsState>>,
}

impl Diagnostics {
    /// Creates an empty context with no error recorded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `error` as the most recent failure, replacing any previous one.
    pub fn record(&self, error: &IniError, frames: &[&str]) {
        self.lock().last_error = Some(DiagnosticReport::from_error(error, frames));
    }

    /// The most recent failure, if any.
    pub fn last_error(&self) -> Option<DiagnosticReport> {
        self.lock().last_error.clone()
    }

    /// Returns `true` if a failure is recorded.
    pub fn has_error(&self) -> bool {
        self.lock().last_error.is_some()
    }

    /// Formatted text of the last failure, or the "no error" report.
    pub fn error_message(&self) -> String {
        self.last_error()
            .unwrap_or_else(DiagnosticReport::no_error)
            .formatted()
    }

    /// Resets the slot to "no error".
    pub fn flush_error(&self) {
        self.lock().last_error = None;
    }

    /// Path of the file most recently opened through this context.
    ///
    /// # Errors
    ///
    /// Returns [`IniError::NothingOpened`] if no file was opened yet.
    pub fn last_opened(&self) -> Result<PathBuf, IniError> {
        self.lock().last_opened.clone().ok_or(IniError::NothingOpened)
    }

    pub(crate) fn set_last_opened(&self, path: PathBuf) {
        self.lock().last_opened = Some(path);
    }

    fn lock(&self) -> MutexGuard<'_, DiagnosticsState> {
        // The state is plain data; a panic while holding the lock cannot leave
        // it half-updated.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
