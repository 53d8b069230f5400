//! Contract error types for server settings
//!
//! These errors are transport-agnostic. Validation variants carry a locale
//! message key so the transport layer can render them for the caller.

use super::model::ServerSettingKey;

/// Server settings domain errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// An `IpAddresses` entry does not parse as an IP address
    #[error("invalid IP address: {entry}")]
    InvalidIpAddress { entry: String },

    /// A bounded integer setting is outside its range
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: ServerSettingKey,
        value: i64,
        min: i64,
        max: i64,
    },

    /// A value is not one of the accepted enumeration members
    #[error("invalid value '{value}' for {field}")]
    InvalidValue { field: String, value: String },

    /// The requested bookmark directory cannot be written to
    #[error("bookmark directory is not writable: {path}")]
    BookmarkDirectoryNotWritable { path: String },

    /// The requested bookmark directory lies inside the current one
    #[error("bookmark directory {path} is inside the current bookmark directory")]
    BookmarkDirectoryNested { path: String },

    /// A stored row holds a value that does not parse as its type
    #[error("stored value '{value}' for {key} is malformed")]
    CorruptValue { key: ServerSettingKey, value: String },

    /// A settings row is missing from the table
    #[error("setting not found: {key}")]
    NotFound { key: ServerSettingKey },

    /// Caller lacks the admin role
    #[error("admin privileges required")]
    Forbidden,

    /// Commit failed and was rolled back
    #[error("failed to persist settings")]
    Persistence,

    /// Internal error
    #[error("internal error")]
    Internal,
}

impl SettingsError {
    /// Locale key of the user-facing message
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::InvalidIpAddress { .. } => "ip-address-invalid",
            Self::OutOfRange {
                field: ServerSettingKey::TotalBackups,
                ..
            } => "total-backups",
            Self::OutOfRange {
                field: ServerSettingKey::TotalLogs,
                ..
            } => "total-logs",
            Self::OutOfRange { .. } => "value-out-of-range",
            Self::InvalidValue { .. } => "invalid-setting-value",
            Self::BookmarkDirectoryNotWritable { .. } => "bookmark-dir-permissions",
            Self::BookmarkDirectoryNested { .. } => "bookmark-dir-nested",
            Self::Forbidden => "permission-denied",
            Self::CorruptValue { .. }
            | Self::NotFound { .. }
            | Self::Persistence
            | Self::Internal => "generic-error",
        }
    }

    /// Positional arguments substituted into the localized message
    pub fn message_args(&self) -> Vec<String> {
        match self {
            Self::InvalidIpAddress { entry } => vec![entry.clone()],
            Self::OutOfRange {
                field, min, max, ..
            } => vec![field.to_string(), min.to_string(), max.to_string()],
            Self::InvalidValue { field, value } => vec![value.clone(), field.clone()],
            Self::BookmarkDirectoryNotWritable { path } | Self::BookmarkDirectoryNested { path } => {
                vec![path.clone()]
            }
            _ => Vec::new(),
        }
    }

    /// Whether the error was caused by the request content
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidIpAddress { .. }
                | Self::OutOfRange { .. }
                | Self::InvalidValue { .. }
                | Self::BookmarkDirectoryNotWritable { .. }
                | Self::BookmarkDirectoryNested { .. }
        )
    }
}
