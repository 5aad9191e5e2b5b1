//! # Segstream Testkit
//!
//! Test utilities for segstream.
//!
//! This crate provides:
//! - Deterministic catalog fixtures and call-recording page loaders
//! - Standard projectors (one-row-per-record and variant fan-out)
//! - Property-based test generators using proptest
//! - A cross-crate export harness that drains a real segmenter
//!
//! ## Usage
//!
//! ```rust,ignore
//! use segstream_testkit::prelude::*;
//!
//! #[test]
//! fn export_runs_clean() {
//!     let run = run_window(WindowConfig::new(0, 100, 0, 1000, 5000)).unwrap();
//!     assert_eq!(run.records_consumed(), 5000);
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;
