//! Deterministic catalog fixtures and export-scenario helpers.
//!
//! Provides a reproducible in-memory record source, call-recording
//! loaders, standard projectors, and a full-drain driver used across the
//! test suites.

use parking_lot::Mutex;
use segstream_core::{
    ExportError, ExportResult, Identified, OutputRow, PageLoader, Projector, RecordId, Segmenter,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

/// Initializes an env-filtered tracing subscriber for test runs.
///
/// Safe to call from every test; only the first call installs the
/// subscriber.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A deterministic catalog row used as the exportable record type.
///
/// Every field is a pure function of the record's source position, so
/// fixtures are reproducible across runs and replays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Stable record identity.
    pub id: RecordId,
    /// Source position within the full ordered set.
    pub position: u64,
    /// Stock keeping unit.
    pub sku: String,
    /// Display title.
    pub title: String,
    /// Price in cents.
    pub price_cents: i64,
    /// Number of purchasable variants (0..=3).
    pub variant_count: u64,
}

impl CatalogRecord {
    /// Builds the record at a given source position.
    #[must_use]
    pub fn at(position: u64) -> Self {
        Self {
            id: Self::id_at(position),
            position,
            sku: format!("SKU-{position:06}"),
            title: format!("Catalog item {position}"),
            price_cents: 500 + (position as i64) * 7,
            variant_count: position % 4,
        }
    }

    /// Returns the identity a record at `position` will carry.
    #[must_use]
    pub fn id_at(position: u64) -> RecordId {
        RecordId::from_uuid(Uuid::from_u128(u128::from(position) + 1))
    }
}

impl Identified for CatalogRecord {
    fn record_id(&self) -> RecordId {
        self.id
    }
}

/// Builds a deterministic catalog of `n` records.
#[must_use]
pub fn catalog(n: u64) -> Vec<CatalogRecord> {
    (0..n).map(CatalogRecord::at).collect()
}

/// An in-memory paged record source with fetch-call recording.
///
/// Loaders produced by [`PagedSource::loader`] are deterministic for a
/// fixed skip offset, as the segmenter's replay contract requires, and
/// append every requested offset to a shared call log that stays
/// observable after the loader has been boxed into a segmenter.
#[derive(Debug, Clone)]
pub struct PagedSource {
    records: Arc<Vec<CatalogRecord>>,
    calls: Arc<Mutex<Vec<u64>>>,
}

impl PagedSource {
    /// Creates a source over the given records.
    #[must_use]
    pub fn new(records: Vec<CatalogRecord>) -> Self {
        Self {
            records: Arc::new(records),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Creates a deterministic source of `n` catalog records.
    #[must_use]
    pub fn with_count(n: u64) -> Self {
        Self::new(catalog(n))
    }

    /// Returns the total number of records in the source.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.records.len() as u64
    }

    /// Returns `true` if the source holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns every skip offset the loader has been called with so far.
    #[must_use]
    pub fn load_calls(&self) -> Vec<u64> {
        self.calls.lock().clone()
    }

    /// Returns a page loader serving `take` records per fetch.
    #[must_use]
    pub fn loader(&self, take: u64) -> PageLoader<CatalogRecord> {
        let records = Arc::clone(&self.records);
        let calls = Arc::clone(&self.calls);
        Box::new(move |skip| {
            calls.lock().push(skip);
            let start = (skip as usize).min(records.len());
            let end = ((skip + take) as usize).min(records.len());
            Ok(records[start..end].to_vec())
        })
    }

    /// Returns a loader that fails exactly once, on the call with the
    /// given zero-based index, then behaves normally.
    ///
    /// Failed attempts are not recorded in the call log, mirroring a
    /// store error raised before any rows were produced.
    #[must_use]
    pub fn loader_failing_once_at(&self, take: u64, failing_call: usize) -> PageLoader<CatalogRecord> {
        let mut inner = self.loader(take);
        let mut seen = 0usize;
        let mut failed = false;
        Box::new(move |skip| {
            if seen == failing_call && !failed {
                failed = true;
                return Err(ExportError::external(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("injected load failure at call {failing_call}"),
                )));
            }
            seen += 1;
            inner(skip)
        })
    }
}

/// Projects one record to a single row with its identifying fields.
#[must_use]
pub fn sku_projector() -> Projector<CatalogRecord> {
    Box::new(|record| {
        Ok(vec![OutputRow::new()
            .with("position", record.position as i64)
            .with("sku", record.sku.as_str())
            .with("title", record.title.as_str())
            .with("price_cents", record.price_cents)])
    })
}

/// Projects one record to one row per variant.
///
/// Records with `variant_count == 0` contribute nothing, exercising the
/// zero-to-many projection contract.
#[must_use]
pub fn variant_projector() -> Projector<CatalogRecord> {
    Box::new(|record| {
        Ok((0..record.variant_count)
            .map(|variant| {
                OutputRow::new()
                    .with("sku", record.sku.as_str())
                    .with("variant", variant as i64)
                    .with("price_cents", record.price_cents)
            })
            .collect())
    })
}

/// Drains a segmenter to exhaustion, returning one entry per segment.
///
/// # Errors
///
/// Propagates any callback failure raised while draining.
pub fn collect_segments<T: Identified>(
    segmenter: &mut Segmenter<T>,
) -> ExportResult<Vec<Vec<OutputRow>>> {
    let mut segments = Vec::new();
    while let Some(rows) = segmenter.next_segment()? {
        segments.push(rows);
    }
    Ok(segments)
}

/// Extracts the `position` field from every row, in order.
#[must_use]
pub fn row_positions(rows: &[OutputRow]) -> Vec<i64> {
    rows.iter()
        .filter_map(|row| row.get("position").and_then(|v| v.as_integer()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_deterministic() {
        assert_eq!(catalog(10), catalog(10));
        assert_eq!(CatalogRecord::at(3).id, CatalogRecord::id_at(3));
    }

    #[test]
    fn loader_pages_and_records_calls() {
        let source = PagedSource::with_count(12);
        let mut loader = source.loader(5);

        assert_eq!(loader(0).unwrap().len(), 5);
        assert_eq!(loader(5).unwrap().len(), 5);
        assert_eq!(loader(10).unwrap().len(), 2);
        assert_eq!(loader(15).unwrap().len(), 0);
        assert_eq!(source.load_calls(), vec![0, 5, 10, 15]);
    }

    #[test]
    fn failing_loader_fails_exactly_once() {
        let source = PagedSource::with_count(10);
        let mut loader = source.loader_failing_once_at(5, 1);

        assert!(loader(0).is_ok());
        assert!(loader(5).is_err());
        assert!(loader(5).is_ok());
        assert_eq!(source.load_calls(), vec![0, 5]);
    }

    #[test]
    fn variant_projector_expands_zero_to_many() {
        let mut projector = variant_projector();
        assert!(projector(&CatalogRecord::at(0)).unwrap().is_empty());
        assert_eq!(projector(&CatalogRecord::at(3)).unwrap().len(), 3);
    }

    #[test]
    fn catalog_record_serde_roundtrip() {
        let record = CatalogRecord::at(42);
        let json = serde_json::to_string(&record).unwrap();
        let back: CatalogRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
    }
}
