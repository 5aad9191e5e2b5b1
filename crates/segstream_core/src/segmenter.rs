//! Pull-based segmentation engine for windowed record-set exports.
//!
//! The segmenter decouples three independently-configurable sizes:
//!
//! - the physical page size fetched from the backing store (`take`)
//! - the logical segment size exposed to the writer (`records_per_segment`)
//! - an optional global window (`offset` / `limit`)
//!
//! while buffering only the minimum data needed to satisfy the next
//! request. It is the only component in an export pipeline with real
//! state; loading, identity indexing, and projection are delegated to
//! caller-supplied callbacks.
//!
//! # Usage
//!
//! ```rust,ignore
//! use segstream_core::{Segmenter, WindowConfig};
//!
//! let window = WindowConfig::new(0, 100, 0, 1000, total_rows);
//! let mut segmenter = Segmenter::new(window, loader, projector)?;
//!
//! while let Some(rows) = segmenter.next_segment()? {
//!     writer.write_segment(&rows)?;
//! }
//! ```
//!
//! Callers that rotate output files per segment can drive the raw
//! protocol instead: `next_batch_available()` decides whether more data
//! can be drained (fetching at most one page), `current_segment()` drains
//! the buffered portion, and a `false` return from
//! `next_batch_available()` with records still pending marks a segment
//! boundary.

use std::collections::VecDeque;
use tracing::{debug, trace};

use crate::config::WindowConfig;
use crate::error::ExportResult;
use crate::record::Identified;
use crate::row::OutputRow;
use crate::stats::SegmenterStats;

/// Fetches the next physical page of raw records starting at a skip offset.
///
/// Must return records in stable order and be deterministic for a fixed
/// offset within one job, so that [`Segmenter::reset`] can replay.
pub type PageLoader<T> = Box<dyn FnMut(u64) -> ExportResult<Vec<T>>>;

/// Observes the merged buffer once per successful physical fetch.
///
/// The slice covers exactly the records just merged into the buffer,
/// including any carried-over leftovers from earlier pages.
pub type BatchHook<T> = Box<dyn FnMut(&[T]) -> ExportResult<()>>;

/// Expands one raw record into zero or more output rows.
pub type Projector<T> = Box<dyn FnMut(&T) -> ExportResult<Vec<OutputRow>>>;

/// Memory-bounded, exactly-once, in-order iteration over a windowed
/// subset of a much larger record set, re-chunked into segments whose
/// size is independent of the physical fetch page size.
///
/// # Design
///
/// - Single-threaded and synchronous; all callbacks run on the caller's
///   thread, and `&mut self` receivers serialize access structurally.
/// - The FIFO buffer holds only fetched-but-unprojected records and is
///   bounded by `records_per_segment` plus one page of over-fetch.
/// - [`Segmenter::next_batch_available`] is the only operation that
///   performs I/O. [`Segmenter::current_segment`] never blocks and never
///   fetches.
/// - Callback failures propagate unmodified; a failed fetch mutates
///   neither the cursor nor the buffer, so a caller-level retry of the
///   same operation is safe.
pub struct Segmenter<T: Identified> {
    /// Immutable window parameters.
    window: WindowConfig,
    /// Fetches one page of raw records.
    loader: PageLoader<T>,
    /// Optional per-fetch side effect.
    batch_hook: Option<BatchHook<T>>,
    /// Maps one record to its output rows.
    projector: Projector<T>,
    /// Loaded-but-not-yet-projected records, drained strictly in fetch order.
    buffer: VecDeque<T>,
    /// Next fetch offset. Starts at `window.offset`, advances by `window.take`.
    skip: u64,
    /// Records consumed so far, monotonic within one run.
    count_records: u64,
    /// Records consumed in the current segment.
    segment_count: u64,
    /// Whether any fetch has occurred since construction or the last reset.
    fetched: bool,
    /// Cumulative telemetry.
    stats: SegmenterStats,
}

impl<T: Identified> Segmenter<T> {
    /// Creates a segmenter over the given window.
    ///
    /// # Errors
    ///
    /// Fails fast with [`crate::ExportError::InvalidWindow`] if the window
    /// parameters are invalid.
    pub fn new(
        window: WindowConfig,
        loader: PageLoader<T>,
        projector: Projector<T>,
    ) -> ExportResult<Self> {
        window.validate()?;
        Ok(Self {
            window,
            loader,
            batch_hook: None,
            projector,
            buffer: VecDeque::new(),
            skip: window.offset,
            count_records: 0,
            segment_count: 0,
            fetched: false,
            stats: SegmenterStats::new(),
        })
    }

    /// Attaches a batch-loaded hook, invoked once per physical fetch.
    #[must_use]
    pub fn with_batch_hook(mut self, hook: BatchHook<T>) -> Self {
        self.batch_hook = Some(hook);
        self
    }

    /// Returns the window parameters.
    #[must_use]
    pub fn window(&self) -> &WindowConfig {
        &self.window
    }

    /// Returns the number of records this instance will ultimately process.
    ///
    /// Pure function of the immutable window parameters; no side effect.
    #[must_use]
    pub fn record_total(&self) -> u64 {
        self.window.record_total()
    }

    /// Returns the number of records consumed so far in the current run.
    #[must_use]
    pub fn records_consumed(&self) -> u64 {
        self.count_records
    }

    /// Returns the number of records currently buffered.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Returns a snapshot of the cumulative telemetry counters.
    #[must_use]
    pub fn stats(&self) -> SegmenterStats {
        self.stats
    }

    /// Reports whether the instance may still produce records.
    ///
    /// Before the first fetch has ever occurred this reports an
    /// *optimistic* `true` rather than forcing an eager fetch purely to
    /// answer the query; the authoritative answer comes from the first
    /// [`Segmenter::next_batch_available`] call's actual fetch outcome.
    /// Downstream callers depend on this query-then-fetch ordering, so it
    /// is preserved even though an empty source misreports for one cycle.
    #[must_use]
    pub fn has_more(&self) -> bool {
        if self.window.limit > 0 && self.count_records >= self.window.limit {
            return false;
        }
        if !self.buffer.is_empty() {
            return true;
        }
        if !self.fetched {
            return true;
        }
        self.skip < self.window.total_records
    }

    /// Decides whether more records can be drained, fetching at most one
    /// physical page if the buffer needs topping up.
    ///
    /// Returns `false` when the overall `limit` is met, when the current
    /// segment is full (a *segment boundary*: the per-segment counter is
    /// rewound so the next call starts a fresh segment), or when both the
    /// source set and the buffer are exhausted. Otherwise returns whether
    /// the buffer holds records to drain.
    ///
    /// This is the only operation allowed to perform I/O.
    ///
    /// # Errors
    ///
    /// Loader and batch-hook failures propagate unmodified. A failed
    /// fetch leaves `skip` and the buffer untouched; a failed hook
    /// observes an already-committed fetch and does not roll it back.
    pub fn next_batch_available(&mut self) -> ExportResult<bool> {
        // Overall quota met.
        if self.window.limit > 0 && self.count_records >= self.window.limit {
            return Ok(false);
        }

        // Current segment full: signal the boundary and start a fresh
        // segment on the next call.
        let per_segment = self.window.records_per_segment;
        if per_segment > 0 && self.segment_count >= per_segment {
            self.segment_count = 0;
            self.stats.record_boundary();
            trace!(consumed = self.count_records, "segment boundary");
            return Ok(false);
        }

        // Enough buffered for a full segment; no fetch needed.
        if per_segment > 0 && self.buffer.len() as u64 >= per_segment {
            return Ok(true);
        }

        // Cursor past the end of the source set: only leftovers remain.
        if self.skip >= self.window.total_records {
            return Ok(!self.buffer.is_empty());
        }

        // Fetch one page. The first fetch uses the initial offset
        // unshifted; the cursor advances by exactly `take` per page, and
        // only after the loader succeeds.
        let page = (self.loader)(self.skip)?;
        let loaded = page.len();
        self.buffer.extend(page);
        self.stats.record_page(loaded as u64);
        debug!(
            skip = self.skip,
            loaded,
            buffered = self.buffer.len(),
            "page loaded"
        );
        self.skip += self.window.take;
        self.fetched = true;

        if let Some(hook) = self.batch_hook.as_mut() {
            hook(self.buffer.make_contiguous())?;
        }

        Ok(!self.buffer.is_empty())
    }

    /// Drains the buffered portion of the current segment, projecting
    /// each record and flattening the emitted rows into one ordered
    /// sequence.
    ///
    /// Consumption stops early when `count_records` reaches `limit` or
    /// the per-segment counter reaches `records_per_segment` (each when
    /// non-zero); remaining buffered records are left for a later call,
    /// never discarded. With both limits unset the whole buffer drains in
    /// one pass. A returned segment may legitimately be shorter than
    /// `records_per_segment` if the buffer runs out first.
    ///
    /// Never blocks and never fetches.
    ///
    /// # Errors
    ///
    /// Projector failures propagate unmodified; the failing record stays
    /// at the front of the buffer with the counters untouched, though
    /// rows accumulated earlier in the same call are dropped with the
    /// error.
    pub fn current_segment(&mut self) -> ExportResult<Vec<OutputRow>> {
        let mut rows = Vec::new();

        while let Some(record) = self.buffer.front() {
            let projected = (self.projector)(record)?;
            self.buffer.pop_front();
            self.count_records += 1;
            self.segment_count += 1;
            self.stats.record_processed(projected.len() as u64);
            rows.extend(projected);

            if self.window.limit > 0 && self.count_records >= self.window.limit {
                break;
            }
            let per_segment = self.window.records_per_segment;
            if per_segment > 0 && self.segment_count >= per_segment {
                break;
            }
        }

        trace!(
            rows = rows.len(),
            consumed = self.count_records,
            buffered = self.buffer.len(),
            "segment drained"
        );
        Ok(rows)
    }

    /// Produces the next full logical segment, or `None` once the window
    /// is exhausted.
    ///
    /// Convenience driver over the raw fetch/drain protocol: it loops
    /// [`Segmenter::next_batch_available`] / [`Segmenter::current_segment`]
    /// until the boundary signal, so callers cannot mis-handle the
    /// `false`-at-boundary return. A `Some` holding an empty vector is
    /// possible when every record in a segment projects to zero rows.
    ///
    /// # Errors
    ///
    /// Callback failures propagate unmodified, mid-segment.
    pub fn next_segment(&mut self) -> ExportResult<Option<Vec<OutputRow>>> {
        let consumed_before = self.count_records;
        let mut rows = Vec::new();

        while self.next_batch_available()? {
            rows.extend(self.current_segment()?);
        }

        if rows.is_empty() && self.count_records == consumed_before {
            Ok(None)
        } else {
            Ok(Some(rows))
        }
    }

    /// Rewinds the instance for a full replay.
    ///
    /// Clears the buffer and resets the cursor to the initial `offset`
    /// and both counters to zero. Window parameters and callbacks are
    /// retained, as are the cumulative [`Segmenter::stats`] counters.
    /// With a deterministic loader, a replay yields output identical to
    /// the first run.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.skip = self.window.offset;
        self.count_records = 0;
        self.segment_count = 0;
        self.fetched = false;
        debug!(offset = self.window.offset, "segmenter reset");
    }
}

impl<T: Identified> std::fmt::Debug for Segmenter<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Segmenter")
            .field("window", &self.window)
            .field("skip", &self.skip)
            .field("count_records", &self.count_records)
            .field("segment_count", &self.segment_count)
            .field("buffered", &self.buffer.len())
            .field("fetched", &self.fetched)
            .finish_non_exhaustive()
    }
}
