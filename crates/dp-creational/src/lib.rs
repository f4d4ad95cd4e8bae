//! # dp-creational
//!
//! Creational patterns for design-patterns-rs.
//!
//! Both types here are singletons built on [`dp_core::Holder`]: the
//! instance is constructed lazily by the first accessor call, shared by every
//! later caller, and released when the program's scope guard is dropped.
//!
//! * [`Counter`] – a bare counter singleton.
//! * [`Logger`] – a file-backed logger whose writes are serialized by a lock.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Counter singleton.
pub mod counter;

/// File-backed logger singleton.
pub mod logger;

/// Log severity levels.
pub mod severity;

pub use counter::Counter;
pub use logger::Logger;
pub use severity::Severity;
