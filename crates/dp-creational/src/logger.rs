//! File-backed logger singleton.
//!
//! The first call to [`Logger::instance`] opens the file named by
//! [`Settings::log_path`](dp_core::Settings::log_path) in append mode.  Every
//! write goes through [`Logger::write_log`], which holds a process-wide write
//! lock while it timestamps, formats and writes one line:
//!
//! ```text
//! [2024-03-01 14:05:09] [Warning] disk almost full
//! ```
//!
//! Lines from concurrent callers therefore never interleave; their relative
//! order is the order in which the callers acquired the lock.
//!
//! # Example
//! ```no_run
//! use dp_creational::Logger;
//!
//! fn main() -> dp_core::Result<()> {
//!     let _scope = Logger::scope();
//!     let log = Logger::instance()?;
//!     log.log_error("this is an error message")?;
//!     log.log_warning("this is a warning message")?;
//!     log.log_info("this is an info message")?;
//!     Ok(())
//! }
//! ```

use std::borrow::Cow;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Local;
use dp_core::{Error, Holder, Result, Settings, SingletonScope};
use log::{debug, trace, warn};

use crate::severity::Severity;

/// `strftime` pattern of the timestamp at the start of every line.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

static INSTANCE: Holder<Logger> = Holder::new();

// Shared by every `Logger`, so writes stay serialized across standalone
// loggers and across instances of the singleton.
static WRITE_LOCK: Mutex<()> = Mutex::new(());

/// Append-only text logger.
#[derive(Debug)]
pub struct Logger {
    path: PathBuf,
    file: File,
    // Set when a failed write left a partial line in the file; only touched
    // while `WRITE_LOCK` is held.
    torn: AtomicBool,
}

impl Logger {
    /// Open `path` for appending, creating it if it does not exist.
    ///
    /// This builds a standalone logger; most code should go through
    /// [`instance`][Self::instance] instead.
    pub fn open(path: impl AsRef<Path>) -> Result<Logger> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| Error::unavailable(path, &e))?;
        debug!("opened log file {}", path.display());
        Ok(Logger {
            path: path.to_path_buf(),
            file,
            torn: AtomicBool::new(false),
        })
    }

    /// Return the shared logger, opening the configured log file on the first
    /// call.
    ///
    /// Fails with [`Error::ResourceUnavailable`] if the file cannot be
    /// opened; the slot then stays empty.  If a torn-down logger is still
    /// referenced by some caller, that logger is returned instead of a new
    /// one being opened.
    pub fn instance() -> Result<Arc<Logger>> {
        INSTANCE.get_or_try_init(|| Logger::open(Settings::instance().log_path()))
    }

    /// Return `true` if the shared logger has been constructed and not yet
    /// torn down.
    pub fn is_initialized() -> bool {
        INSTANCE.is_initialized()
    }

    /// Release the shared logger.  The file is closed once the last
    /// outstanding handle is dropped.
    pub fn teardown() -> bool {
        INSTANCE.teardown()
    }

    /// Tie the shared logger's lifetime to the returned guard.
    #[must_use = "the logger is torn down as soon as the scope guard is dropped"]
    pub fn scope() -> SingletonScope<'static, Logger> {
        INSTANCE.scope()
    }

    /// Path of the underlying log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one `[timestamp] [severity] message` line.
    ///
    /// Line breaks inside `message` are escaped, so every call yields exactly
    /// one line.  Blocks until the process-wide write lock is free.
    pub fn write_log(&self, severity: Severity, message: &str) -> Result<()> {
        // `()` guards nothing a panicking writer could leave inconsistent.
        let _guard = WRITE_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let line = format_line(&Local::now().format(TIMESTAMP_FORMAT), severity, message);
        let mut out = &self.file;
        append_line(&mut out, line.as_bytes(), &self.torn).map_err(|e| {
            warn!("write to {} failed: {e}", self.path.display());
            Error::from(e)
        })?;
        trace!("wrote {} byte(s) to {}", line.len(), self.path.display());
        Ok(())
    }

    /// Append an `Info` line.
    pub fn log_info(&self, message: &str) -> Result<()> {
        self.write_log(Severity::Info, message)
    }

    /// Append a `Warning` line.
    pub fn log_warning(&self, message: &str) -> Result<()> {
        self.write_log(Severity::Warning, message)
    }

    /// Append an `Error` line.
    pub fn log_error(&self, message: &str) -> Result<()> {
        self.write_log(Severity::Error, message)
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        debug!("closed log file {}", self.path.display());
    }
}

fn format_line(timestamp: &impl std::fmt::Display, severity: Severity, message: &str) -> String {
    format!("[{timestamp}] [{severity}] {}\n", escape_line_breaks(message))
}

fn escape_line_breaks(message: &str) -> Cow<'_, str> {
    if !message.contains(['\n', '\r']) {
        return Cow::Borrowed(message);
    }
    let mut escaped = String::with_capacity(message.len() + 2);
    for c in message.chars() {
        match c {
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

// Writes `line`, first terminating any partial line an earlier failed call
// left behind.  `torn` is set when this call itself stops mid-line.
fn append_line<W: Write>(out: &mut W, line: &[u8], torn: &AtomicBool) -> io::Result<()> {
    if torn.load(Ordering::Relaxed) {
        out.write_all(b"\n")?;
        torn.store(false, Ordering::Relaxed);
    }
    let mut written = 0;
    while written < line.len() {
        let result = match out.write(&line[written..]) {
            Ok(0) => Err(io::Error::from(io::ErrorKind::WriteZero)),
            Ok(n) => {
                written += n;
                continue;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => Err(e),
        };
        if written > 0 {
            torn.store(true, Ordering::Relaxed);
        }
        return result;
    }
    Ok(())
}
