//! # dp-core
//!
//! Core types and error definitions for design-patterns-rs.
//!
//! This crate provides the building blocks shared by the pattern crates in
//! the workspace – the error hierarchy, the process-wide [`Settings`], and
//! the resettable singleton [`Holder`].

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Public modules ───────────────────────────────────────────────────────────

/// Error types.
pub mod errors;

/// Design patterns: singleton.
pub mod patterns;

/// Global settings (log file location, etc.).
pub mod settings;

// ── Re-exports for convenience ────────────────────────────────────────────────

pub use errors::{Error, Result};
pub use patterns::singleton::{Holder, SingletonScope};
pub use settings::Settings;
