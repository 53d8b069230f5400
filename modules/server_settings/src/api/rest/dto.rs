//! REST DTOs with serde derives for HTTP API

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Full server settings, returned by reads and accepted as the desired state
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServerSettingsDto {
    #[schema(example = "config/cache")]
    pub cache_directory: String,

    #[schema(example = "config/backups")]
    pub backup_directory: String,

    /// One of `disabled`, `daily`, `weekly`
    #[schema(example = "daily")]
    pub task_scan: String,

    #[schema(example = "daily")]
    pub task_backup: String,

    #[schema(example = "daily")]
    pub task_cleanup: String,

    /// One of `Trace`, `Debug`, `Information`, `Warning`, `Critical`
    #[schema(example = "Debug")]
    pub logging_level: String,

    #[schema(example = 5000)]
    pub port: u16,

    /// Comma separated bind addresses
    #[schema(example = "0.0.0.0,::")]
    pub ip_addresses: String,

    pub allow_stat_collection: bool,

    pub enable_opds: bool,

    #[schema(example = "/")]
    pub base_url: String,

    #[schema(example = "config/bookmarks")]
    pub bookmarks_directory: String,

    #[schema(example = "https://email.kavitareader.com")]
    pub email_service_url: String,

    pub install_version: String,

    #[schema(example = "https://reader.example.com")]
    pub host_name: String,

    #[schema(example = 30)]
    pub total_backups: i32,

    #[schema(example = 30)]
    pub total_logs: i32,

    pub enable_folder_watching: bool,

    /// One of `PNG`, `WEBP`, `AVIF`
    #[schema(example = "PNG")]
    pub encode_media_as: String,

    /// Cache size in megabytes
    #[schema(example = 75)]
    pub cache_size: i64,

    #[schema(example = 30)]
    pub on_deck_progress_days: i32,

    #[schema(example = 7)]
    pub on_deck_update_days: i32,
}

/// Email relay connectivity test request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TestEmailUrlRequest {
    #[schema(example = "https://email.kavitareader.com")]
    pub url: String,
}

/// Email relay connectivity test result
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailTestResultDto {
    pub successful: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}
