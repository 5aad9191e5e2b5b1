//! # Segstream Core
//!
//! Pull-based segmentation engine for streaming large record-set exports.
//!
//! Exporting millions of catalog rows must not materialize the full set in
//! memory. This crate provides the [`Segmenter`]: a generic windowing
//! component that decouples the physical page size fetched from a backing
//! store, the logical segment size exposed to a writer, and an optional
//! global limit/offset window, while buffering only the minimum data
//! needed to satisfy the next request.
//!
//! The engine is deliberately thin. It owns cursor and buffer state and
//! nothing else; fetching, identity indexing, and row projection are
//! supplied as callbacks:
//!
//! - [`PageLoader`] fetches the next page of raw records at a skip offset
//! - [`BatchHook`] (optional) observes each freshly loaded page
//! - [`Projector`] expands one record into zero or more [`OutputRow`]s
//!
//! Output encoding, the actual store query, fetch parallelism, and state
//! persistence are all the owning export job's concern, not this crate's.
//!
//! ## Example
//!
//! ```rust,ignore
//! use segstream_core::{OutputRow, Segmenter, WindowConfig};
//!
//! let window = WindowConfig::new(0, 100, 0, 1000, catalog.len() as u64);
//! let mut segmenter = Segmenter::new(
//!     window,
//!     Box::new(move |skip| Ok(catalog.page(skip))),
//!     Box::new(|product| Ok(vec![OutputRow::new().with("sku", product.sku())])),
//! )?;
//!
//! while let Some(rows) = segmenter.next_segment()? {
//!     writer.write_segment(&rows)?;
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod record;
mod row;
mod segmenter;
mod stats;

pub use config::WindowConfig;
pub use error::{BoxedError, ExportError, ExportResult};
pub use record::{Identified, IdentityCollector, RecordId};
pub use row::{FieldValue, OutputRow};
pub use segmenter::{BatchHook, PageLoader, Projector, Segmenter};
pub use stats::SegmenterStats;
