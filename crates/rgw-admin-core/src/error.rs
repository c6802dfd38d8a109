//! Error types for query serialization.

use crate::query::FieldRule;

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, QueryError>;

/// Errors that can occur while turning a configuration record into query values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// A field carries a rule that cannot render its value type.
    #[error("field `{key}` uses rule {rule:?} which cannot render a {found} value")]
    RuleMismatch {
        /// Query key of the offending field.
        key: &'static str,
        /// The rule attached to the field.
        rule: FieldRule,
        /// Kind of value the field actually holds.
        found: &'static str,
    },
}
