//! Global settings.
//!
//! [`Settings`] holds the knobs the singletons read when they are
//! constructed – currently the location of the application log file.  It is
//! a process-wide singleton accessed via a `std::sync::OnceLock`.
//!
//! Values are read once, at construction time of the consuming singleton.
//! Changing a setting afterwards only takes effect for the next instance,
//! i.e. after the current one has been torn down.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock};

/// File name of the application log when no path has been configured.
pub const DEFAULT_LOG_FILE: &str = "Application.log";

/// Process-wide settings used by design-patterns-rs.
pub struct Settings {
    /// Configured log file path; `None` means [`DEFAULT_LOG_FILE`] in the
    /// current working directory.
    log_path: Mutex<Option<PathBuf>>,
}

static INSTANCE: OnceLock<Settings> = OnceLock::new();

impl Settings {
    /// Return a reference to the global singleton.
    pub fn instance() -> &'static Settings {
        INSTANCE.get_or_init(|| Settings {
            log_path: Mutex::new(None),
        })
    }

    fn log_path_slot(&self) -> MutexGuard<'_, Option<PathBuf>> {
        self.log_path
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Return the path the logger singleton opens on construction.
    pub fn log_path(&self) -> PathBuf {
        self.log_path_slot()
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
    }

    /// Set the log file path.
    pub fn set_log_path(&self, path: impl Into<PathBuf>) {
        *self.log_path_slot() = Some(path.into());
    }

    /// Restore the default log file path.
    pub fn reset_log_path(&self) {
        *self.log_path_slot() = None;
    }
}
