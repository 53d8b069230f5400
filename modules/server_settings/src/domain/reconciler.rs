//! Settings reconciliation
//!
//! [`plan`] compares the stored rows against a desired state and produces the
//! rows to write, the side effects to fire and the deferred bookmark
//! migration. Every validation runs before anything is returned, so a
//! rejected request leaves no trace: nothing is applied, fired or committed.
//! Executing the plan is the service's job.

use super::collaborators::DirectoryService;
use super::converter::{canonical_value, serialize};
use crate::contract::{
    LogLevel, ServerSetting, ServerSettingKey, ServerSettings, SettingsError, BOOKMARKS_FOLDER,
    DEFAULT_EMAIL_SERVICE_URL, RETENTION_MAX, RETENTION_MIN,
};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

/// Environment the plan is computed in
pub struct ReconcileContext<'a> {
    /// Port and bind addresses are owned by the container environment
    pub containerized: bool,
    pub directories: &'a dyn DirectoryService,
}

/// Side effect fired as soon as a change is accepted, before commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideEffect {
    StatCollection(bool),
    FolderWatching(bool),
    LogLevel(LogLevel),
    EmailRelay(String),
}

/// Bookmark files to move once the new directory is committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkMigration {
    pub from: PathBuf,
    pub to: PathBuf,
}

/// Outcome of validating a desired state against the stored rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPlan {
    pub changes: Vec<ServerSetting>,
    pub effects: Vec<SideEffect>,
    pub bookmark_migration: Option<BookmarkMigration>,
}

impl SettingsPlan {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub fn changed_keys(&self) -> Vec<ServerSettingKey> {
        self.changes.iter().map(|s| s.key).collect()
    }
}

/// Compute and validate the changes needed to move `current` to `desired`
pub fn plan(
    current: &[ServerSetting],
    desired: &ServerSettings,
    ctx: &ReconcileContext<'_>,
) -> Result<SettingsPlan, SettingsError> {
    let mut plan = SettingsPlan::default();

    for setting in current {
        let proposed = match propose(setting, desired, ctx) {
            Some(value) if value != canonical_value(setting) => value,
            _ => continue,
        };

        validate(setting.key, &proposed, desired)?;

        match setting.key {
            ServerSettingKey::AllowStatCollection => plan
                .effects
                .push(SideEffect::StatCollection(desired.allow_stat_collection)),
            ServerSettingKey::EnableFolderWatching => plan
                .effects
                .push(SideEffect::FolderWatching(desired.enable_folder_watching)),
            ServerSettingKey::LoggingLevel => plan
                .effects
                .push(SideEffect::LogLevel(desired.logging_level)),
            ServerSettingKey::EmailServiceUrl => {
                plan.effects.push(SideEffect::EmailRelay(proposed.clone()))
            }
            ServerSettingKey::BookmarkDirectory => {
                plan.bookmark_migration = Some(BookmarkMigration {
                    from: PathBuf::from(&setting.value),
                    to: PathBuf::from(&proposed),
                })
            }
            _ => {}
        }

        plan.changes.push(ServerSetting::new(setting.key, proposed));
    }

    // The write probe touches the disk, so it only runs once every
    // in-memory check has passed.
    if let Some(migration) = &plan.bookmark_migration {
        let from = ctx.directories.normalize(&migration.from.to_string_lossy());
        if migration.to.starts_with(&from) {
            return Err(SettingsError::BookmarkDirectoryNested {
                path: migration.to.to_string_lossy().into_owned(),
            });
        }
        if !ctx.directories.check_write_access(&migration.to) {
            return Err(SettingsError::BookmarkDirectoryNotWritable {
                path: migration.to.to_string_lossy().into_owned(),
            });
        }
    }

    Ok(plan)
}

/// Normalized desired value for one row, `None` when the key is not
/// writable through reconciliation
fn propose(
    setting: &ServerSetting,
    desired: &ServerSettings,
    ctx: &ReconcileContext<'_>,
) -> Option<String> {
    use ServerSettingKey::*;

    match setting.key {
        InstallId | InstallVersion | CacheDirectory | BackupDirectory => None,
        Port | IpAddresses if ctx.containerized => None,
        BaseUrl => Some(normalize_base_url(&desired.base_url)),
        HostName => Some(strip_trailing_slash(desired.host_name.trim())),
        EmailServiceUrl => Some(normalize_email_url(&desired.email_service_url)),
        BookmarkDirectory => Some(bookmark_directory(
            &desired.bookmarks_directory,
            &setting.value,
            ctx.directories,
        )),
        key => serialize(key, desired),
    }
}

fn validate(
    key: ServerSettingKey,
    proposed: &str,
    desired: &ServerSettings,
) -> Result<(), SettingsError> {
    match key {
        ServerSettingKey::IpAddresses => validate_ip_addresses(proposed),
        ServerSettingKey::TotalBackups => validate_retention(key, desired.total_backups),
        ServerSettingKey::TotalLogs => validate_retention(key, desired.total_logs),
        _ => Ok(()),
    }
}

/// Every non-empty comma separated entry must be an IPv4 or IPv6 address
pub fn validate_ip_addresses(value: &str) -> Result<(), SettingsError> {
    for entry in value.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        if entry.parse::<IpAddr>().is_err() {
            return Err(SettingsError::InvalidIpAddress {
                entry: entry.to_string(),
            });
        }
    }
    Ok(())
}

fn validate_retention(key: ServerSettingKey, value: i32) -> Result<(), SettingsError> {
    if (RETENTION_MIN..=RETENTION_MAX).contains(&value) {
        return Ok(());
    }
    Err(SettingsError::OutOfRange {
        field: key,
        value: value.into(),
        min: RETENTION_MIN.into(),
        max: RETENTION_MAX.into(),
    })
}

/// `foo` becomes `/foo/`; already wrapped values are kept
pub fn normalize_base_url(value: &str) -> String {
    let mut path = if value.starts_with('/') {
        value.to_string()
    } else {
        format!("/{}", value)
    };
    if !path.ends_with('/') {
        path.push('/');
    }
    path
}

/// Empty falls back to the built-in relay; trailing slashes are dropped
pub fn normalize_email_url(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return DEFAULT_EMAIL_SERVICE_URL.to_string();
    }
    strip_trailing_slash(value)
}

fn strip_trailing_slash(value: &str) -> String {
    value.trim_end_matches('/').to_string()
}

/// Resolve the bookmark directory a request asks for.
///
/// An empty request keeps the current directory. Otherwise the path gains a
/// trailing `bookmarks` folder unless it already ends in one. A path that
/// resolves to the current directory returns the stored value untouched so
/// no migration onto itself is planned.
pub fn bookmark_directory(
    requested: &str,
    current: &str,
    directories: &dyn DirectoryService,
) -> String {
    let requested = requested.trim();
    if requested.is_empty() {
        return current.to_string();
    }

    let trimmed = requested.trim_end_matches(['/', '\\']);
    let with_folder = if Path::new(trimmed).ends_with(BOOKMARKS_FOLDER) {
        PathBuf::from(trimmed)
    } else {
        Path::new(trimmed).join(BOOKMARKS_FOLDER)
    };

    let normalized = directories.normalize(&with_folder.to_string_lossy());
    if normalized == directories.normalize(current) {
        return current.to_string();
    }
    normalized.to_string_lossy().into_owned()
}
