//! Property-based test generators using proptest.
//!
//! Strategies for window parameter combinations and catalog records that
//! keep the engine's construction invariants (positive page size).

use proptest::prelude::*;
use segstream_core::{RecordId, WindowConfig};

use crate::fixtures::CatalogRecord;

/// Strategy for valid window parameter combinations.
///
/// `take` is always positive; `limit` and `records_per_segment` include 0
/// (unlimited) with meaningful probability.
pub fn window_strategy() -> impl Strategy<Value = WindowConfig> {
    (
        0u64..64,  // offset
        1u64..48,  // take
        0u64..128, // limit
        0u64..48,  // records_per_segment
        0u64..256, // total_records
    )
        .prop_map(|(offset, take, limit, records_per_segment, total_records)| {
            WindowConfig::new(offset, take, limit, records_per_segment, total_records)
        })
}

/// Strategy for valid record IDs.
pub fn record_id_strategy() -> impl Strategy<Value = RecordId> {
    prop::array::uniform16(any::<u8>()).prop_map(RecordId::from_bytes)
}

/// Strategy for valid SKU strings.
pub fn sku_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[A-Z]{2,4}-[0-9]{3,6}").expect("Invalid regex")
}

/// Strategy for a single catalog record at an arbitrary position.
pub fn catalog_record_strategy() -> impl Strategy<Value = CatalogRecord> {
    (
        record_id_strategy(),
        0u64..10_000,
        sku_strategy(),
        0i64..1_000_000,
        0u64..4,
    )
        .prop_map(|(id, position, sku, price_cents, variant_count)| CatalogRecord {
            id,
            position,
            sku,
            title: format!("Generated item {position}"),
            price_cents,
            variant_count,
        })
}

/// Strategy for a catalog of up to `max_len` records.
pub fn catalog_strategy(max_len: usize) -> impl Strategy<Value = Vec<CatalogRecord>> {
    prop::collection::vec(catalog_record_strategy(), 0..max_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn windows_always_validate(window in window_strategy()) {
            prop_assert!(window.validate().is_ok());
        }

        #[test]
        fn record_total_never_exceeds_source_or_limit(window in window_strategy()) {
            let total = window.record_total();
            prop_assert!(total <= window.total_records);
            if window.limit > 0 {
                prop_assert!(total <= window.limit);
            }
        }

        #[test]
        fn generated_skus_match_shape(sku in sku_strategy()) {
            prop_assert!(sku.contains('-'));
        }
    }
}
