//! Cross-crate export harness and end-to-end properties.
//!
//! Wires a deterministic [`crate::fixtures::PagedSource`] into a real
//! segmenter and drains it to exhaustion, capturing everything a test
//! needs to assert about one complete export run.

use segstream_core::{
    ExportResult, IdentityCollector, OutputRow, RecordId, Segmenter, SegmenterStats, WindowConfig,
};

use crate::fixtures::{collect_segments, sku_projector, PagedSource};

/// Everything observable about one full export run.
#[derive(Debug)]
pub struct ExportRun {
    /// Projected rows, one entry per logical segment.
    pub segments: Vec<Vec<OutputRow>>,
    /// Skip offsets the loader was called with, in order.
    pub load_calls: Vec<u64>,
    /// Identities observed by the batch hook, first-seen order.
    pub exported_ids: Vec<RecordId>,
    /// Engine telemetry after the drain.
    pub stats: SegmenterStats,
}

impl ExportRun {
    /// Total records consumed across all segments.
    ///
    /// The standard harness projector emits exactly one row per record,
    /// so row counts equal record counts.
    #[must_use]
    pub fn records_consumed(&self) -> u64 {
        self.segments.iter().map(|s| s.len() as u64).sum()
    }

    /// Source positions of every consumed record, in consumption order.
    #[must_use]
    pub fn consumed_positions(&self) -> Vec<i64> {
        self.segments
            .iter()
            .flat_map(|segment| crate::fixtures::row_positions(segment))
            .collect()
    }
}

/// Runs one full export over a deterministic catalog sized to the window.
///
/// # Errors
///
/// Propagates construction and callback failures.
pub fn run_window(window: WindowConfig) -> ExportResult<ExportRun> {
    let source = PagedSource::with_count(window.total_records);
    let collector = IdentityCollector::new();

    let mut segmenter = Segmenter::new(window, source.loader(window.take), sku_projector())?
        .with_batch_hook(collector.hook());

    let segments = collect_segments(&mut segmenter)?;
    Ok(ExportRun {
        segments,
        load_calls: source.load_calls(),
        exported_ids: collector.ids(),
        stats: segmenter.stats(),
    })
}
