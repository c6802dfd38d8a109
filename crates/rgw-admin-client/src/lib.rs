//! RADOS Gateway admin API client.
//!
//! This crate signs and sends requests to the gateway's administrative
//! endpoints (usage reporting, user management) and decodes their JSON
//! responses into the types from [`rgw_admin_core`].
//!
//! # Example
//!
//! ```no_run
//! use rgw_admin_client::{RgwAdminClient, UsageConfig};
//!
//! # async fn example() -> Result<(), rgw_admin_client::AdminError> {
//! let client = RgwAdminClient::new(
//!     "http://rgw.storage.svc:7480",
//!     "admin-access-key",
//!     "admin-secret-key",
//! )?;
//!
//! let user = client.get_user(Some("alice")).await?;
//! println!("{} suspended: {}", user.user_id, user.is_suspended());
//!
//! let usage = client
//!     .get_usage(Some(&UsageConfig::new().with_uid("alice").with_summary(true)))
//!     .await?;
//! for summary in &usage.summary {
//!     println!("{}: {} bytes sent", summary.user, summary.total.bytes_sent);
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod client;
mod config;
mod error;
mod signer;
mod transport;

pub use client::RgwAdminClient;
pub use config::{ClientConfig, DEFAULT_ADMIN_PREFIX, DEFAULT_TIMEOUT_SECONDS};
pub use error::{AdminError, Result};
pub use rgw_admin_core::{
    BucketUsage, CategoryUsage, CreateUserConfig, KeyType, QueryError, Quota, QuotaType,
    RemoveUserConfig, S3Key, SubUser, SwiftKey, Usage, UsageConfig, UsageEntry, UsageSummary,
    UsageTotals, User, UserCapability,
};
pub use signer::{payload_sha256, sign_request, Credentials, SigningScope};
