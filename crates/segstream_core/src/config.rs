//! Export window configuration.

use crate::error::{ExportError, ExportResult};

/// Immutable window parameters for one segmenter instance.
///
/// A window describes the sub-range of the full source set one export job
/// is responsible for, together with the physical page size used to fetch
/// it and the logical segment size exposed to the writer. All five
/// parameters are required; a value of `0` for `limit` or
/// `records_per_segment` means "unlimited".
///
/// Parameters are fixed for the life of a segmenter. [`crate::Segmenter::reset`]
/// rewinds cursor state but never alters the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    /// Records to skip before the export window starts.
    pub offset: u64,

    /// Page size requested per physical fetch. Must be positive.
    pub take: u64,

    /// Maximum records to process overall (0 = unlimited).
    pub limit: u64,

    /// Maximum records to include per logical segment (0 = unlimited).
    pub records_per_segment: u64,

    /// Size of the full source set, supplied by the caller.
    pub total_records: u64,
}

impl WindowConfig {
    /// Creates a window from its five required parameters.
    ///
    /// Validation happens separately via [`WindowConfig::validate`], which
    /// the segmenter runs at construction time.
    #[must_use]
    pub const fn new(
        offset: u64,
        take: u64,
        limit: u64,
        records_per_segment: u64,
        total_records: u64,
    ) -> Self {
        Self {
            offset,
            take,
            limit,
            records_per_segment,
            total_records,
        }
    }

    /// Checks the window parameters, failing fast on invalid combinations.
    ///
    /// Unsigned fields make negative values unrepresentable; the remaining
    /// hazard is a zero page size, which would pin the fetch cursor in
    /// place forever.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError::InvalidWindow`] if `take` is zero.
    pub fn validate(&self) -> ExportResult<()> {
        if self.take == 0 {
            return Err(ExportError::invalid_window("take must be positive"));
        }
        Ok(())
    }

    /// Returns the number of records this window will ultimately process.
    ///
    /// Derived, never stored: `total_records - offset` (saturating), capped
    /// by `limit` when a limit is set and smaller.
    #[must_use]
    pub fn record_total(&self) -> u64 {
        let available = self.total_records.saturating_sub(self.offset);
        if self.limit > 0 && self.limit < available {
            self.limit
        } else {
            available
        }
    }
}
