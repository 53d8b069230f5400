//! Contract models for server settings
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - these are pure domain models.

use std::fmt;
use std::str::FromStr;

/// Relay endpoint used when no custom email service is configured
pub const DEFAULT_EMAIL_SERVICE_URL: &str = "https://email.kavitareader.com";

/// Bind addresses used when the allowlist is reset
pub const DEFAULT_IP_ADDRESSES: &str = "0.0.0.0,::";

/// Base URL used when the server is not hosted under a sub-path
pub const DEFAULT_BASE_URL: &str = "/";

/// Folder name every bookmark directory ends with
pub const BOOKMARKS_FOLDER: &str = "bookmarks";

/// Inclusive bounds for `TotalBackups` and `TotalLogs`
pub const RETENTION_MIN: i32 = 1;
pub const RETENTION_MAX: i32 = 30;

/// Enumerated identity of a settings row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ServerSettingKey {
    TaskScan,
    TaskBackup,
    TaskCleanup,
    LoggingLevel,
    Port,
    IpAddresses,
    CacheDirectory,
    BackupDirectory,
    BookmarkDirectory,
    AllowStatCollection,
    EnableOpds,
    BaseUrl,
    InstallVersion,
    InstallId,
    EmailServiceUrl,
    HostName,
    TotalBackups,
    TotalLogs,
    EnableFolderWatching,
    EncodeMediaAs,
    CacheSize,
    OnDeckProgressDays,
    OnDeckUpdateDays,
}

impl ServerSettingKey {
    /// Every recognized key, in table order
    pub const ALL: [ServerSettingKey; 23] = [
        Self::TaskScan,
        Self::TaskBackup,
        Self::TaskCleanup,
        Self::LoggingLevel,
        Self::Port,
        Self::IpAddresses,
        Self::CacheDirectory,
        Self::BackupDirectory,
        Self::BookmarkDirectory,
        Self::AllowStatCollection,
        Self::EnableOpds,
        Self::BaseUrl,
        Self::InstallVersion,
        Self::InstallId,
        Self::EmailServiceUrl,
        Self::HostName,
        Self::TotalBackups,
        Self::TotalLogs,
        Self::EnableFolderWatching,
        Self::EncodeMediaAs,
        Self::CacheSize,
        Self::OnDeckProgressDays,
        Self::OnDeckUpdateDays,
    ];

    /// Canonical name stored in the `key` column
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TaskScan => "TaskScan",
            Self::TaskBackup => "TaskBackup",
            Self::TaskCleanup => "TaskCleanup",
            Self::LoggingLevel => "LoggingLevel",
            Self::Port => "Port",
            Self::IpAddresses => "IpAddresses",
            Self::CacheDirectory => "CacheDirectory",
            Self::BackupDirectory => "BackupDirectory",
            Self::BookmarkDirectory => "BookmarkDirectory",
            Self::AllowStatCollection => "AllowStatCollection",
            Self::EnableOpds => "EnableOpds",
            Self::BaseUrl => "BaseUrl",
            Self::InstallVersion => "InstallVersion",
            Self::InstallId => "InstallId",
            Self::EmailServiceUrl => "EmailServiceUrl",
            Self::HostName => "HostName",
            Self::TotalBackups => "TotalBackups",
            Self::TotalLogs => "TotalLogs",
            Self::EnableFolderWatching => "EnableFolderWatching",
            Self::EncodeMediaAs => "EncodeMediaAs",
            Self::CacheSize => "CacheSize",
            Self::OnDeckProgressDays => "OnDeckProgressDays",
            Self::OnDeckUpdateDays => "OnDeckUpdateDays",
        }
    }
}

impl fmt::Display for ServerSettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServerSettingKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| format!("unknown setting key: {}", s))
    }
}

/// One persisted settings row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSetting {
    pub key: ServerSettingKey,
    /// String serialization of the typed value
    pub value: String,
}

impl ServerSetting {
    pub fn new(key: ServerSettingKey, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

/// Frequency of a recurring background task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskFrequency {
    Disabled,
    Daily,
    Weekly,
}

impl TaskFrequency {
    pub const ALL: [TaskFrequency; 3] = [Self::Disabled, Self::Daily, Self::Weekly];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Disabled => "disabled",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }

    /// Interval between runs, `None` when disabled
    pub fn period(self) -> Option<std::time::Duration> {
        const DAY: u64 = 24 * 60 * 60;
        match self {
            Self::Disabled => None,
            Self::Daily => Some(std::time::Duration::from_secs(DAY)),
            Self::Weekly => Some(std::time::Duration::from_secs(7 * DAY)),
        }
    }
}

impl FromStr for TaskFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown task frequency: {}", s))
    }
}

/// Server log verbosity as exposed to administrators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogLevel {
    Trace,
    Debug,
    Information,
    Warning,
    Critical,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        Self::Trace,
        Self::Debug,
        Self::Information,
        Self::Warning,
        Self::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "Trace",
            Self::Debug => "Debug",
            Self::Information => "Information",
            Self::Warning => "Warning",
            Self::Critical => "Critical",
        }
    }

    /// Equivalent `tracing` filter directive
    pub fn as_directive(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Information => "info",
            Self::Warning => "warn",
            Self::Critical => "error",
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|l| l.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown log level: {}", s))
    }
}

/// Image encoding used for covers and bookmarks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncodeFormat {
    Png,
    Webp,
    Avif,
}

impl EncodeFormat {
    pub const ALL: [EncodeFormat; 3] = [Self::Png, Self::Webp, Self::Avif];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "PNG",
            Self::Webp => "WEBP",
            Self::Avif => "AVIF",
        }
    }
}

impl FromStr for EncodeFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown encode format: {}", s))
    }
}

/// Kinds of libraries the server can host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LibraryType {
    Manga,
    Comic,
    Book,
    Image,
    LightNovel,
}

impl LibraryType {
    pub const ALL: [LibraryType; 5] = [
        Self::Manga,
        Self::Comic,
        Self::Book,
        Self::Image,
        Self::LightNovel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manga => "Manga",
            Self::Comic => "Comic",
            Self::Book => "Book",
            Self::Image => "Image",
            Self::LightNovel => "LightNovel",
        }
    }
}

/// Typed view of the whole settings table
///
/// Used both as the snapshot returned to callers and as the desired state
/// handed to reconciliation. `cache_directory`, `install_version` and
/// `backup_directory` are informational and never written back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub cache_directory: String,
    pub backup_directory: String,
    pub task_scan: TaskFrequency,
    pub task_backup: TaskFrequency,
    pub task_cleanup: TaskFrequency,
    pub logging_level: LogLevel,
    pub port: u16,
    /// Comma separated bind addresses
    pub ip_addresses: String,
    pub allow_stat_collection: bool,
    pub enable_opds: bool,
    pub base_url: String,
    pub bookmarks_directory: String,
    pub email_service_url: String,
    pub install_version: String,
    pub host_name: String,
    pub total_backups: i32,
    pub total_logs: i32,
    pub enable_folder_watching: bool,
    pub encode_media_as: EncodeFormat,
    /// Cache size in megabytes
    pub cache_size: i64,
    pub on_deck_progress_days: i32,
    pub on_deck_update_days: i32,
}

/// Result of probing an email relay
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EmailTestResult {
    pub successful: bool,
    pub error_message: Option<String>,
}

/// Caller identity attached to each request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuthContext {
    /// Whether the caller holds the admin role
    pub is_admin: bool,
    /// Optional user identifier for audit logging and localization
    pub user_id: Option<String>,
    /// Email address of the caller, if known
    pub email: Option<String>,
}

impl AuthContext {
    /// Create an anonymous, non-admin context
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Create an admin context
    pub fn admin(user_id: Option<String>, email: Option<String>) -> Self {
        Self {
            is_admin: true,
            user_id,
            email,
        }
    }
}
