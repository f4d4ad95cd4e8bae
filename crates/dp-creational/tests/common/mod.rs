//! Helpers shared by the logger integration tests.

#![allow(dead_code)]

use chrono::NaiveDateTime;
use dp_creational::logger::TIMESTAMP_FORMAT;
use dp_creational::Severity;

/// A parsed `[timestamp] [severity] message` line.
#[derive(Debug)]
pub struct LogLine {
    pub timestamp: NaiveDateTime,
    pub severity: Severity,
    pub message: String,
}

/// Parse one log line, returning `None` if it does not match the layout.
pub fn parse_line(line: &str) -> Option<LogLine> {
    let rest = line.strip_prefix('[')?;
    let (timestamp, rest) = rest.split_once("] [")?;
    let (severity, message) = rest.split_once("] ")?;
    Some(LogLine {
        timestamp: NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()?,
        severity: severity.parse().ok()?,
        message: message.to_owned(),
    })
}
