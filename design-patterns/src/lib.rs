//! # design-patterns
//!
//! Classical object-oriented design patterns expressed in idiomatic Rust.
//!
//! This crate is a **façade** that re-exports all public items from the
//! underlying workspace crates.
//!
//! ```rust
//! use design_patterns::creational::Counter;
//!
//! let _scope = Counter::scope();
//! Counter::instance().increment();
//! assert_eq!(Counter::instance().value(), 1);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Error types, settings, and the singleton holder.
pub use dp_core as core;

/// Creational patterns: counter and logger singletons.
pub use dp_creational as creational;
