//! Core types for the RADOS Gateway admin API client.
//!
//! This crate holds everything that does not touch the network:
//!
//! - **Query serialization**: `QueryValues`, `FieldRule`, `FieldValue`, `ToQuery`
//! - **Usage**: `UsageConfig`, `UsageRemoval`, `Usage` and its entry/summary records
//! - **Users**: `CreateUserConfig`, `RemoveUserConfig`, `User`, `Quota`
//!
//! Result types mirror the JSON documents returned by the gateway. Every
//! field defaults when absent, so a sparse body still decodes.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod error;
pub mod query;
pub mod usage;
pub mod user;

pub use error::{QueryError, Result};
pub use query::{
    format_timestamp, percent_encode, serialize, FieldRule, FieldValue, QueryField, QueryValues,
    ToQuery,
};
pub use usage::{
    BucketUsage, CategoryUsage, Usage, UsageConfig, UsageEntry, UsageRemoval, UsageSummary,
    UsageTotals,
};
pub use user::{
    CreateUserConfig, KeyType, Quota, QuotaType, RemoveUserConfig, S3Key, SubUser, SwiftKey,
    User, UserCapability,
};
