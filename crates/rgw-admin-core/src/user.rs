//! User management types.

use serde::{Deserialize, Serialize};

use crate::query::{FieldRule, FieldValue, QueryField, ToQuery};

/// A gateway user as returned by the user endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    /// User ID.
    pub user_id: String,
    /// Display name.
    pub display_name: String,
    /// Email address.
    pub email: String,
    /// Non-zero when the user is suspended.
    pub suspended: i64,
    /// Maximum number of buckets the user may own.
    pub max_buckets: i64,
    /// Swift subusers.
    pub subusers: Vec<SubUser>,
    /// S3 key pairs.
    pub keys: Vec<S3Key>,
    /// Swift keys.
    pub swift_keys: Vec<SwiftKey>,
    /// Administrative capabilities granted to the user.
    pub caps: Vec<UserCapability>,
}

impl User {
    /// Whether the user is suspended.
    #[must_use]
    pub fn is_suspended(&self) -> bool {
        self.suspended != 0
    }
}

/// A Swift subuser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubUser {
    /// Subuser ID (`user:sub`).
    pub id: String,
    /// Access level.
    pub permissions: String,
}

/// An S3 access/secret key pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct S3Key {
    /// Owning user or subuser.
    pub user: String,
    /// Access key ID.
    pub access_key: String,
    /// Secret key.
    pub secret_key: String,
}

/// A Swift secret key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SwiftKey {
    /// Owning subuser.
    pub user: String,
    /// Secret key.
    pub secret_key: String,
}

/// A named capability such as `usage=read`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserCapability {
    /// Capability scope (`usage`, `users`, `buckets`, `metadata`, ...).
    #[serde(rename = "type")]
    pub kind: String,
    /// Granted permission (`read`, `write`, `*`).
    pub perm: String,
}

/// Key type for generated or supplied keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyType {
    /// S3 key pair.
    S3,
    /// Swift key.
    Swift,
}

impl KeyType {
    /// Name used in query strings.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::S3 => "s3",
            Self::Swift => "swift",
        }
    }
}

/// Parameters for creating a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserConfig {
    /// User ID to create.
    pub uid: String,
    /// Display name.
    pub display_name: String,
    /// Email address.
    pub email: Option<String>,
    /// Type of key to create or supply.
    pub key_type: Option<KeyType>,
    /// Explicit access key.
    pub access_key: Option<String>,
    /// Explicit secret key.
    pub secret_key: Option<String>,
    /// Capabilities to grant, e.g. `usage=read;users=*`.
    pub user_caps: Option<String>,
    /// Generate a key pair for the user.
    pub generate_key: Option<bool>,
    /// Bucket limit.
    pub max_buckets: Option<i64>,
    /// Create the user suspended.
    pub suspended: Option<bool>,
}

impl CreateUserConfig {
    /// Create a config with the two required fields.
    #[must_use]
    pub fn new(uid: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: display_name.into(),
            email: None,
            key_type: None,
            access_key: None,
            secret_key: None,
            user_caps: None,
            generate_key: None,
            max_buckets: None,
            suspended: None,
        }
    }

    /// Set the email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Supply an explicit S3 key pair.
    #[must_use]
    pub fn with_s3_key(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.key_type = Some(KeyType::S3);
        self.access_key = Some(access_key.into());
        self.secret_key = Some(secret_key.into());
        self
    }

    /// Grant capabilities.
    #[must_use]
    pub fn with_caps(mut self, caps: impl Into<String>) -> Self {
        self.user_caps = Some(caps.into());
        self
    }

    /// Limit the number of buckets.
    #[must_use]
    pub fn with_max_buckets(mut self, max_buckets: i64) -> Self {
        self.max_buckets = Some(max_buckets);
        self
    }
}

impl ToQuery for CreateUserConfig {
    fn query_fields(&self) -> Vec<QueryField<'_>> {
        vec![
            QueryField::new("uid", FieldRule::Always, Some(FieldValue::Str(&self.uid))),
            QueryField::new(
                "display-name",
                FieldRule::Always,
                Some(FieldValue::Str(&self.display_name)),
            ),
            optional_str("email", &self.email),
            QueryField::new(
                "key-type",
                FieldRule::IfNotEmpty,
                self.key_type.map(|k| FieldValue::Str(k.as_str())),
            ),
            optional_str("access-key", &self.access_key),
            optional_str("secret-key", &self.secret_key),
            optional_str("user-caps", &self.user_caps),
            QueryField::new(
                "generate-key",
                FieldRule::Always,
                self.generate_key.map(FieldValue::Bool),
            ),
            QueryField::new(
                "max-buckets",
                FieldRule::Always,
                self.max_buckets.map(FieldValue::Int),
            ),
            QueryField::new("suspended", FieldRule::Always, self.suspended.map(FieldValue::Bool)),
        ]
    }
}

fn optional_str<'a>(key: &'static str, value: &'a Option<String>) -> QueryField<'a> {
    QueryField::new(key, FieldRule::IfNotEmpty, value.as_deref().map(FieldValue::Str))
}

/// Parameters for removing a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveUserConfig {
    /// User ID to remove.
    pub uid: String,
    /// Also delete the user's buckets and objects.
    pub purge_data: bool,
}

impl RemoveUserConfig {
    /// Remove `uid`, keeping its data.
    #[must_use]
    pub fn new(uid: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            purge_data: false,
        }
    }

    /// Purge the user's data as well.
    #[must_use]
    pub fn with_purge_data(mut self, purge: bool) -> Self {
        self.purge_data = purge;
        self
    }
}

impl ToQuery for RemoveUserConfig {
    fn query_fields(&self) -> Vec<QueryField<'_>> {
        vec![
            QueryField::new("uid", FieldRule::Always, Some(FieldValue::Str(&self.uid))),
            QueryField::new(
                "purge-data",
                FieldRule::TrueOnly,
                Some(FieldValue::Bool(self.purge_data)),
            ),
        ]
    }
}

/// Which quota to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaType {
    /// Limits across all of a user's buckets.
    User,
    /// Limits applied to each bucket individually.
    Bucket,
}

impl QuotaType {
    /// Name used in query strings.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bucket => "bucket",
        }
    }
}

/// A user or bucket quota.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Quota {
    /// Whether the quota is enforced.
    pub enabled: bool,
    /// Whether limits apply to raw (pre-compression) sizes.
    pub check_on_raw: bool,
    /// Size limit in bytes; negative means unlimited.
    pub max_size: i64,
    /// Size limit in KiB; negative means unlimited.
    pub max_size_kb: i64,
    /// Object count limit; negative means unlimited.
    pub max_objects: i64,
}
