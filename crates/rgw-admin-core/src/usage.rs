//! Usage reporting types.
//!
//! The gateway records bandwidth and operation counts per user, bucket and
//! operation category. [`UsageConfig`] selects the data to read or trim and
//! [`Usage`] is the report returned by the read endpoint.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::query::{FieldRule, FieldValue, QueryField, ToQuery};

/// Parameters for usage queries and usage removal.
///
/// Timestamps are wall-clock values; convert them to the convention the
/// gateway is configured with (usually UTC) before building the config.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UsageConfig {
    /// User to restrict to. Unset or empty applies to all users.
    pub uid: Option<String>,
    /// Start of the requested window.
    pub start: Option<NaiveDateTime>,
    /// End of the requested window (non-inclusive).
    pub end: Option<NaiveDateTime>,
    /// Whether per-bucket entries should be returned.
    pub show_entries: bool,
    /// Whether the per-user summary should be returned.
    pub show_summary: bool,
    /// Acknowledge removal of every user's data when `uid` is unset.
    pub remove_all: bool,
}

impl UsageConfig {
    /// Create an empty config (all users, no window).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to a single user.
    #[must_use]
    pub fn with_uid(mut self, uid: impl Into<String>) -> Self {
        self.uid = Some(uid.into());
        self
    }

    /// Set the time window.
    #[must_use]
    pub fn with_window(mut self, start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    /// Request per-bucket entries.
    #[must_use]
    pub fn with_entries(mut self, show: bool) -> Self {
        self.show_entries = show;
        self
    }

    /// Request the per-user summary.
    #[must_use]
    pub fn with_summary(mut self, show: bool) -> Self {
        self.show_summary = show;
        self
    }

    /// Acknowledge multi-user removal.
    #[must_use]
    pub fn with_remove_all(mut self, remove_all: bool) -> Self {
        self.remove_all = remove_all;
        self
    }

    /// View of this config as usage removal parameters.
    #[must_use]
    pub fn removal(&self) -> UsageRemoval<'_> {
        UsageRemoval(self)
    }

    fn window_fields(&self) -> [QueryField<'_>; 3] {
        [
            QueryField::new(
                "uid",
                FieldRule::IfNotEmpty,
                self.uid.as_deref().map(FieldValue::Str),
            ),
            QueryField::new(
                "start",
                FieldRule::Timestamp,
                self.start.map(FieldValue::Timestamp),
            ),
            QueryField::new("end", FieldRule::Timestamp, self.end.map(FieldValue::Timestamp)),
        ]
    }
}

/// Read parameters: user, window and the entries/summary switches.
impl ToQuery for UsageConfig {
    fn query_fields(&self) -> Vec<QueryField<'_>> {
        let mut fields = self.window_fields().to_vec();
        fields.push(QueryField::new(
            "show-entries",
            FieldRule::FalseOnly,
            Some(FieldValue::Bool(self.show_entries)),
        ));
        fields.push(QueryField::new(
            "show-summary",
            FieldRule::FalseOnly,
            Some(FieldValue::Bool(self.show_summary)),
        ));
        fields
    }
}

/// Removal parameters of a [`UsageConfig`]: user, window and `remove-all`.
#[derive(Debug, Clone, Copy)]
pub struct UsageRemoval<'a>(pub &'a UsageConfig);

impl ToQuery for UsageRemoval<'_> {
    fn query_fields(&self) -> Vec<QueryField<'_>> {
        let mut fields = self.0.window_fields().to_vec();
        fields.push(QueryField::new(
            "remove-all",
            FieldRule::TrueOnly,
            Some(FieldValue::Bool(self.0.remove_all)),
        ));
        fields
    }
}

/// Usage report returned by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Usage {
    /// Per-user, per-bucket entries.
    pub entries: Vec<UsageEntry>,
    /// Per-user totals.
    pub summary: Vec<UsageSummary>,
}

/// Usage entries for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageEntry {
    /// Owning user (older gateways report this as `owner`).
    #[serde(alias = "owner")]
    pub user: String,
    /// Buckets with recorded activity.
    pub buckets: Vec<BucketUsage>,
}

/// Usage of one bucket during one logging period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketUsage {
    /// Bucket name.
    pub bucket: String,
    /// Period start as reported by the gateway.
    pub time: String,
    /// Period start as a Unix timestamp.
    pub epoch: u64,
    /// Bucket owner.
    pub owner: String,
    /// Per-category counters.
    pub categories: Vec<CategoryUsage>,
}

/// Counters for one operation category (e.g. `get_obj`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryUsage {
    /// Category name.
    pub category: String,
    /// Bytes sent by the gateway.
    pub bytes_sent: u64,
    /// Bytes received by the gateway.
    pub bytes_received: u64,
    /// Operations attempted.
    pub ops: u64,
    /// Operations that succeeded.
    pub successful_ops: u64,
}

/// Summary of one user's usage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageSummary {
    /// User ID.
    pub user: String,
    /// Per-category counters.
    pub categories: Vec<CategoryUsage>,
    /// Totals across all categories.
    pub total: UsageTotals,
}

/// Totals across all categories.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageTotals {
    /// Bytes sent by the gateway.
    pub bytes_sent: u64,
    /// Bytes received by the gateway.
    pub bytes_received: u64,
    /// Operations attempted.
    pub ops: u64,
    /// Operations that succeeded.
    pub successful_ops: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::serialize;
    use chrono::NaiveDate;

    fn noon(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, day)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("valid date")
    }

    #[test]
    fn read_query_defaults() {
        let values = serialize(&UsageConfig::new()).unwrap();
        assert_eq!(values.get("uid"), None);
        assert_eq!(values.get("show-entries"), Some("False"));
        assert_eq!(values.get("show-summary"), Some("False"));
        assert_eq!(values.get("remove-all"), None);
    }

    #[test]
    fn read_query_omits_enabled_switches() {
        let config = UsageConfig::new()
            .with_uid("alice")
            .with_entries(true)
            .with_summary(true)
            .with_window(Some(noon(1)), Some(noon(15)));
        let values = serialize(&config).unwrap();

        assert_eq!(values.get("uid"), Some("alice"));
        assert_eq!(values.get("start"), Some("2024-2-1 12:0:0"));
        assert_eq!(values.get("end"), Some("2024-2-15 12:0:0"));
        assert_eq!(values.get("show-entries"), None);
        assert_eq!(values.get("show-summary"), None);
    }

    #[test]
    fn removal_query() {
        let config = UsageConfig::new().with_remove_all(true).with_entries(false);
        let values = serialize(&config.removal()).unwrap();

        assert_eq!(values.get("remove-all"), Some("True"));
        assert_eq!(values.get("show-entries"), None);
        assert_eq!(values.len(), 1);

        let values = serialize(&UsageConfig::new().with_uid("bob").removal()).unwrap();
        assert_eq!(values.get("uid"), Some("bob"));
        assert_eq!(values.get("remove-all"), None);
    }

    #[test]
    fn usage_report_decodes() {
        let body = r#"{
            "entries": [{
                "user": "alice",
                "buckets": [{
                    "bucket": "photos",
                    "time": "2024-02-01 12:00:00.000000Z",
                    "epoch": 1706788800,
                    "owner": "alice",
                    "categories": [{
                        "category": "get_obj",
                        "bytes_sent": 2048,
                        "bytes_received": 0,
                        "ops": 4,
                        "successful_ops": 3
                    }]
                }]
            }],
            "summary": [{
                "user": "alice",
                "categories": [],
                "total": {"bytes_sent": 2048, "bytes_received": 0, "ops": 4, "successful_ops": 3}
            }]
        }"#;

        let usage: Usage = serde_json::from_str(body).unwrap();
        assert_eq!(usage.entries[0].user, "alice");
        assert_eq!(usage.entries[0].buckets[0].categories[0].successful_ops, 3);
        assert_eq!(usage.summary[0].total.bytes_sent, 2048);
    }

    #[test]
    fn legacy_owner_field() {
        let entry: UsageEntry = serde_json::from_str(r#"{"owner": "bob"}"#).unwrap();
        assert_eq!(entry.user, "bob");
        assert!(entry.buckets.is_empty());
    }

    #[test]
    fn empty_body_decodes_to_defaults() {
        let usage: Usage = serde_json::from_str("{}").unwrap();
        assert_eq!(usage, Usage::default());
    }
}
