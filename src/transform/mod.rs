//! Glue between raw wire records and the engine: validation, normalization
//! and summary helpers.

pub mod normalize;
pub mod stats;
pub mod validate;

pub use normalize::{to_user_record, to_user_records, TransformError};
pub use stats::{exclude_accounts, PointTotals, RecordStats};
pub use validate::{partition_valid, validate, Rejected, ValidationIssue};
