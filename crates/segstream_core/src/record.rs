//! Record identity types and the identity-collecting batch hook.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

use crate::segmenter::BatchHook;

/// Stable identifier for an exportable record.
///
/// Record IDs are 128-bit UUIDs that are:
/// - Unique within a source set
/// - Immutable for the life of the record
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Creates a new random record ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a record ID from a UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Creates a record ID from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RecordId({})", self.0)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RecordId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<RecordId> for Uuid {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

/// Trait for records with a stable identity.
///
/// The segmenter never inspects record fields; the identity bound exists
/// so collaborators observing the batch hook can index which records are
/// about to be exported.
pub trait Identified {
    /// Returns the record's stable, immutable identifier.
    ///
    /// The ID must not change over the record's lifetime.
    fn record_id(&self) -> RecordId;
}

/// Collects the identities of every record that passes through a segmenter.
///
/// The batch hook is invoked with the full merged buffer on each physical
/// fetch, so carried-over leftovers are observed more than once; the
/// collector de-duplicates while preserving first-seen order.
///
/// # Example
///
/// ```rust,ignore
/// let collector = IdentityCollector::new();
/// let segmenter = Segmenter::new(window, loader, projector)?
///     .with_batch_hook(collector.hook());
///
/// // ... drive the export ...
///
/// let exported: Vec<RecordId> = collector.ids();
/// ```
#[derive(Debug, Clone, Default)]
pub struct IdentityCollector {
    inner: Arc<Mutex<CollectorState>>,
}

#[derive(Debug, Default)]
struct CollectorState {
    seen: HashSet<RecordId>,
    ordered: Vec<RecordId>,
}

impl IdentityCollector {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a batch hook that records identities into this collector.
    ///
    /// The hook holds a handle to the collector's shared state, so the
    /// collector remains readable after being moved into a segmenter.
    #[must_use]
    pub fn hook<T: Identified + 'static>(&self) -> BatchHook<T> {
        let inner = Arc::clone(&self.inner);
        Box::new(move |records: &[T]| {
            let mut state = inner.lock();
            for record in records {
                let id = record.record_id();
                if state.seen.insert(id) {
                    state.ordered.push(id);
                }
            }
            Ok(())
        })
    }

    /// Returns the collected identities in first-seen order.
    #[must_use]
    pub fn ids(&self) -> Vec<RecordId> {
        self.inner.lock().ordered.clone()
    }

    /// Returns the number of distinct identities collected.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().ordered.len()
    }

    /// Returns `true` if no identities have been collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.lock().ordered.is_empty()
    }

    /// Clears all collected identities.
    pub fn clear(&self) {
        let mut state = self.inner.lock();
        state.seen.clear();
        state.ordered.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        id: RecordId,
    }

    impl Identified for Row {
        fn record_id(&self) -> RecordId {
            self.id
        }
    }

    #[test]
    fn new_ids_are_unique() {
        assert_ne!(RecordId::new(), RecordId::new());
    }

    #[test]
    fn from_bytes_roundtrip() {
        let bytes = [7u8; 16];
        let id = RecordId::from_bytes(bytes);
        assert_eq!(*id.as_uuid().as_bytes(), bytes);
    }

    #[test]
    fn display_matches_uuid() {
        let uuid = Uuid::new_v4();
        assert_eq!(RecordId::from_uuid(uuid).to_string(), uuid.to_string());
    }

    #[test]
    fn collector_dedupes_leftovers() {
        let a = Row { id: RecordId::new() };
        let b = Row { id: RecordId::new() };
        let c = Row { id: RecordId::new() };

        let collector = IdentityCollector::new();
        let mut hook = collector.hook::<Row>();

        // First fetch: a, b. Second fetch re-presents the leftover b.
        hook(&[a, b]).unwrap();
        let b2 = Row { id: collector.ids()[1] };
        hook(&[b2, c]).unwrap();

        let ids = collector.ids();
        assert_eq!(ids.len(), 3);
        assert_eq!(collector.len(), 3);
    }

    #[test]
    fn collector_clear() {
        let collector = IdentityCollector::new();
        let mut hook = collector.hook::<Row>();
        hook(&[Row { id: RecordId::new() }]).unwrap();
        assert!(!collector.is_empty());

        collector.clear();
        assert!(collector.is_empty());
    }
}
