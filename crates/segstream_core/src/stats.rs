//! Segmenter telemetry counters.

/// Cumulative counters for one segmenter instance.
///
/// The engine is single-threaded by contract, so counters are plain fields
/// rather than atomics. Counters are cumulative across [`crate::Segmenter::reset`]
/// calls: a replayed run keeps adding to the same totals, which makes retry
/// amplification visible to the owning job runner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmenterStats {
    /// Physical pages fetched from the loader.
    pub pages_loaded: u64,
    /// Raw records returned by the loader across all pages.
    pub records_loaded: u64,
    /// Records consumed from the buffer and handed to the projector.
    pub records_processed: u64,
    /// Output rows emitted by the projector.
    pub rows_emitted: u64,
    /// Segment boundaries signalled to the caller.
    pub segment_boundaries: u64,
}

impl SegmenterStats {
    /// Creates a zeroed stats block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record_page(&mut self, records: u64) {
        self.pages_loaded += 1;
        self.records_loaded += records;
    }

    pub(crate) fn record_processed(&mut self, rows: u64) {
        self.records_processed += 1;
        self.rows_emitted += rows;
    }

    pub(crate) fn record_boundary(&mut self) {
        self.segment_boundaries += 1;
    }
}
