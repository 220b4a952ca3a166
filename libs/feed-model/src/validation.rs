//! Validation Utilities
//!
//! Batch-level checks run before a call touches the store. A failure here
//! rejects the whole call.

use errors::{FeedError, FeedResult};

use crate::records::MedianData;

/// Validate a batch length against the configured bound
///
/// # Examples
/// ```
/// use feed_model::validate_batch_len;
///
/// assert!(validate_batch_len(10, 256).is_ok());
/// assert!(validate_batch_len(257, 256).is_err());
/// ```
pub fn validate_batch_len(len: usize, max: usize) -> FeedResult<()> {
    if len > max {
        return Err(FeedError::BatchTooLarge { len, max });
    }
    Ok(())
}

/// Validate that every median record carries exactly `expected_len` samples
pub fn validate_median_batch(records: &[MedianData], expected_len: usize) -> FeedResult<()> {
    if let Some(bad) = records.iter().find(|r| r.values.len() != expected_len) {
        return Err(FeedError::invalid_parameter(
            "values",
            format!(
                "median record for {} has {} samples, expected {}",
                bad.asset_name,
                bad.values.len(),
                expected_len
            ),
        ));
    }
    Ok(())
}
