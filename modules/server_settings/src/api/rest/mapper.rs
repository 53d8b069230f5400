//! DTO to contract model mappers

use super::dto::{EmailTestResultDto, ServerSettingsDto};
use crate::contract::{EmailTestResult, ServerSettings, SettingsError};
use std::str::FromStr;

impl From<ServerSettings> for ServerSettingsDto {
    fn from(model: ServerSettings) -> Self {
        Self {
            cache_directory: model.cache_directory,
            backup_directory: model.backup_directory,
            task_scan: model.task_scan.as_str().to_string(),
            task_backup: model.task_backup.as_str().to_string(),
            task_cleanup: model.task_cleanup.as_str().to_string(),
            logging_level: model.logging_level.as_str().to_string(),
            port: model.port,
            ip_addresses: model.ip_addresses,
            allow_stat_collection: model.allow_stat_collection,
            enable_opds: model.enable_opds,
            base_url: model.base_url,
            bookmarks_directory: model.bookmarks_directory,
            email_service_url: model.email_service_url,
            install_version: model.install_version,
            host_name: model.host_name,
            total_backups: model.total_backups,
            total_logs: model.total_logs,
            enable_folder_watching: model.enable_folder_watching,
            encode_media_as: model.encode_media_as.as_str().to_string(),
            cache_size: model.cache_size,
            on_deck_progress_days: model.on_deck_progress_days,
            on_deck_update_days: model.on_deck_update_days,
        }
    }
}

impl TryFrom<ServerSettingsDto> for ServerSettings {
    type Error = SettingsError;

    fn try_from(dto: ServerSettingsDto) -> Result<Self, Self::Error> {
        Ok(Self {
            task_scan: parse_field("taskScan", &dto.task_scan)?,
            task_backup: parse_field("taskBackup", &dto.task_backup)?,
            task_cleanup: parse_field("taskCleanup", &dto.task_cleanup)?,
            logging_level: parse_field("loggingLevel", &dto.logging_level)?,
            encode_media_as: parse_field("encodeMediaAs", &dto.encode_media_as)?,
            cache_directory: dto.cache_directory,
            backup_directory: dto.backup_directory,
            port: dto.port,
            ip_addresses: dto.ip_addresses,
            allow_stat_collection: dto.allow_stat_collection,
            enable_opds: dto.enable_opds,
            base_url: dto.base_url,
            bookmarks_directory: dto.bookmarks_directory,
            email_service_url: dto.email_service_url,
            install_version: dto.install_version,
            host_name: dto.host_name,
            total_backups: dto.total_backups,
            total_logs: dto.total_logs,
            enable_folder_watching: dto.enable_folder_watching,
            cache_size: dto.cache_size,
            on_deck_progress_days: dto.on_deck_progress_days,
            on_deck_update_days: dto.on_deck_update_days,
        })
    }
}

fn parse_field<T: FromStr>(field: &str, value: &str) -> Result<T, SettingsError> {
    value.parse().map_err(|_| SettingsError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    })
}

impl From<EmailTestResult> for EmailTestResultDto {
    fn from(model: EmailTestResult) -> Self {
        Self {
            successful: model.successful,
            error_message: model.error_message,
        }
    }
}
