//! Conversion between settings rows and the typed [`ServerSettings`] view

use crate::contract::{
    EncodeFormat, LogLevel, ServerSetting, ServerSettingKey, ServerSettings, SettingsError,
    TaskFrequency, BOOKMARKS_FOLDER, DEFAULT_BASE_URL, DEFAULT_EMAIL_SERVICE_URL,
    DEFAULT_IP_ADDRESSES, RETENTION_MAX,
};
use std::str::FromStr;

/// Version recorded in the `InstallVersion` row
pub const INSTALL_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Settings a fresh install starts with
pub fn default_settings() -> ServerSettings {
    ServerSettings {
        cache_directory: "config/cache".to_string(),
        backup_directory: "config/backups".to_string(),
        task_scan: TaskFrequency::Daily,
        task_backup: TaskFrequency::Daily,
        task_cleanup: TaskFrequency::Daily,
        logging_level: LogLevel::Debug,
        port: 5000,
        ip_addresses: DEFAULT_IP_ADDRESSES.to_string(),
        allow_stat_collection: true,
        enable_opds: true,
        base_url: DEFAULT_BASE_URL.to_string(),
        bookmarks_directory: format!("config/{}", BOOKMARKS_FOLDER),
        email_service_url: DEFAULT_EMAIL_SERVICE_URL.to_string(),
        install_version: INSTALL_VERSION.to_string(),
        host_name: String::new(),
        total_backups: RETENTION_MAX,
        total_logs: RETENTION_MAX,
        enable_folder_watching: false,
        encode_media_as: EncodeFormat::Png,
        cache_size: 75,
        on_deck_progress_days: 30,
        on_deck_update_days: 7,
    }
}

/// Rows seeded into an empty table
pub fn default_rows(install_id: &str) -> Vec<ServerSetting> {
    let defaults = default_settings();
    ServerSettingKey::ALL
        .iter()
        .map(|&key| {
            let value = match key {
                ServerSettingKey::InstallId => install_id.to_string(),
                _ => serialize(key, &defaults).unwrap_or_default(),
            };
            ServerSetting::new(key, value)
        })
        .collect()
}

pub fn format_bool(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

/// String serialization of the field backing `key`, `None` for keys with no
/// field in [`ServerSettings`]
pub fn serialize(key: ServerSettingKey, settings: &ServerSettings) -> Option<String> {
    use ServerSettingKey::*;

    let value = match key {
        TaskScan => settings.task_scan.as_str().to_string(),
        TaskBackup => settings.task_backup.as_str().to_string(),
        TaskCleanup => settings.task_cleanup.as_str().to_string(),
        LoggingLevel => settings.logging_level.as_str().to_string(),
        Port => settings.port.to_string(),
        IpAddresses => settings.ip_addresses.clone(),
        CacheDirectory => settings.cache_directory.clone(),
        BackupDirectory => settings.backup_directory.clone(),
        BookmarkDirectory => settings.bookmarks_directory.clone(),
        AllowStatCollection => format_bool(settings.allow_stat_collection),
        EnableOpds => format_bool(settings.enable_opds),
        BaseUrl => settings.base_url.clone(),
        InstallVersion => settings.install_version.clone(),
        InstallId => return None,
        EmailServiceUrl => settings.email_service_url.clone(),
        HostName => settings.host_name.clone(),
        TotalBackups => settings.total_backups.to_string(),
        TotalLogs => settings.total_logs.to_string(),
        EnableFolderWatching => format_bool(settings.enable_folder_watching),
        EncodeMediaAs => settings.encode_media_as.as_str().to_string(),
        CacheSize => settings.cache_size.to_string(),
        OnDeckProgressDays => settings.on_deck_progress_days.to_string(),
        OnDeckUpdateDays => settings.on_deck_update_days.to_string(),
    };
    Some(value)
}

/// Stored value in the form [`serialize`] would write it. Rows from older
/// installs may differ in case only; values that do not parse are returned
/// as stored.
pub fn canonical_value(setting: &ServerSetting) -> String {
    to_settings(std::slice::from_ref(setting))
        .ok()
        .and_then(|settings| serialize(setting.key, &settings))
        .unwrap_or_else(|| setting.value.clone())
}

/// Build the typed view from stored rows. Keys absent from the table keep
/// their default.
pub fn to_settings(rows: &[ServerSetting]) -> Result<ServerSettings, SettingsError> {
    use ServerSettingKey::*;

    let mut settings = default_settings();
    for row in rows {
        let value = row.value.as_str();
        match row.key {
            TaskScan => settings.task_scan = parse(row)?,
            TaskBackup => settings.task_backup = parse(row)?,
            TaskCleanup => settings.task_cleanup = parse(row)?,
            LoggingLevel => settings.logging_level = parse(row)?,
            Port => settings.port = parse(row)?,
            IpAddresses => settings.ip_addresses = value.to_string(),
            CacheDirectory => settings.cache_directory = value.to_string(),
            BackupDirectory => settings.backup_directory = value.to_string(),
            BookmarkDirectory => settings.bookmarks_directory = value.to_string(),
            AllowStatCollection => settings.allow_stat_collection = parse_bool(row)?,
            EnableOpds => settings.enable_opds = parse_bool(row)?,
            BaseUrl => settings.base_url = value.to_string(),
            InstallVersion => settings.install_version = value.to_string(),
            InstallId => {}
            EmailServiceUrl => settings.email_service_url = value.to_string(),
            HostName => settings.host_name = value.to_string(),
            TotalBackups => settings.total_backups = parse(row)?,
            TotalLogs => settings.total_logs = parse(row)?,
            EnableFolderWatching => settings.enable_folder_watching = parse_bool(row)?,
            EncodeMediaAs => settings.encode_media_as = parse(row)?,
            CacheSize => settings.cache_size = parse(row)?,
            OnDeckProgressDays => settings.on_deck_progress_days = parse(row)?,
            OnDeckUpdateDays => settings.on_deck_update_days = parse(row)?,
        }
    }
    Ok(settings)
}

fn parse<T: FromStr>(row: &ServerSetting) -> Result<T, SettingsError> {
    row.value.trim().parse().map_err(|_| SettingsError::CorruptValue {
        key: row.key,
        value: row.value.clone(),
    })
}

/// Booleans written by older installs are capitalized
pub fn parse_bool(row: &ServerSetting) -> Result<bool, SettingsError> {
    match row.value.trim().to_ascii_lowercase().as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(SettingsError::CorruptValue {
            key: row.key,
            value: row.value.clone(),
        }),
    }
}
