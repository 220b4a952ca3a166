//! Feed Model Library
//!
//! Domain types shared by the price-feed store and its service layer.
//! Pure data and validation, no locking or IO.
//!
//! # Modules
//!
//! - `address`: 20-byte caller/account identifiers
//! - `asset`: fixed-width asset keys derived from names such as `"asset0"`
//! - `types`: roles, feed kinds and post modes
//! - `records`: price/deviation/median records, post reports, reference data
//! - `events`: notifications emitted for every committed change
//! - `validation`: batch-level input checks
//!
//! # Example
//!
//! ```
//! use feed_model::{AssetKey, PriceData};
//!
//! let key = AssetKey::from_name("BTC").unwrap();
//! let record = PriceData::new(key, 19_343_340_000_000, 1, 1_700_000_000);
//! assert_eq!(record.asset_name.to_string(), "BTC");
//! ```

pub mod address;
pub mod asset;
pub mod events;
pub mod records;
pub mod types;
pub mod validation;

// Re-exports for convenience
pub use address::Address;
pub use asset::AssetKey;
pub use events::{EventEnvelope, FeedEvent};
pub use records::{
    FeedEntry, MedianData, PostReport, PriceData, ReferenceData, RejectReason, RejectedRecord,
};
pub use types::{FeedKind, PostMode, Role};
pub use validation::{validate_batch_len, validate_median_batch};
