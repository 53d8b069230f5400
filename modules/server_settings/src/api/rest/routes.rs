//! Route registration

use super::{dto::*, error::Problem, handlers, handlers::Caller};
use crate::domain::Service;
use axum::{
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;

/// Mount every settings endpoint under `/api/settings`
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    router
        .route(
            "/api/settings",
            get(get_settings_handler).post(update_settings_handler),
        )
        .route("/api/settings/base-url", get(get_base_url_handler))
        .route("/api/settings/opds-enabled", get(get_opds_enabled_handler))
        .route("/api/settings/reset", post(reset_settings_handler))
        .route(
            "/api/settings/reset-ip-addresses",
            post(reset_ip_addresses_handler),
        )
        .route("/api/settings/reset-base-url", post(reset_base_url_handler))
        .route("/api/settings/reset-email-url", post(reset_email_url_handler))
        .route("/api/settings/test-email-url", post(test_email_url_handler))
        .route(
            "/api/settings/task-frequencies",
            get(get_task_frequencies_handler),
        )
        .route("/api/settings/library-types", get(get_library_types_handler))
        .route("/api/settings/log-levels", get(get_log_levels_handler))
        .layer(Extension(service))
}

// ===== Handler wrappers that extract service from Extension =====

async fn get_base_url_handler(
    Extension(service): Extension<Arc<Service>>,
    caller: Caller,
) -> Result<String, Problem> {
    handlers::get_base_url(service, caller).await
}

async fn get_opds_enabled_handler(
    Extension(service): Extension<Arc<Service>>,
    caller: Caller,
) -> Result<Json<bool>, Problem> {
    handlers::get_opds_enabled(service, caller).await
}

async fn get_settings_handler(
    Extension(service): Extension<Arc<Service>>,
    caller: Caller,
) -> Result<Json<ServerSettingsDto>, Problem> {
    handlers::get_settings(service, caller).await
}

async fn update_settings_handler(
    Extension(service): Extension<Arc<Service>>,
    caller: Caller,
    json: Json<ServerSettingsDto>,
) -> Result<Json<ServerSettingsDto>, Problem> {
    handlers::update_settings(service, caller, json).await
}

async fn reset_settings_handler(
    Extension(service): Extension<Arc<Service>>,
    caller: Caller,
) -> Result<Json<ServerSettingsDto>, Problem> {
    handlers::reset_settings(service, caller).await
}

async fn reset_ip_addresses_handler(
    Extension(service): Extension<Arc<Service>>,
    caller: Caller,
) -> Result<Json<ServerSettingsDto>, Problem> {
    handlers::reset_ip_addresses(service, caller).await
}

async fn reset_base_url_handler(
    Extension(service): Extension<Arc<Service>>,
    caller: Caller,
) -> Result<Json<ServerSettingsDto>, Problem> {
    handlers::reset_base_url(service, caller).await
}

async fn reset_email_url_handler(
    Extension(service): Extension<Arc<Service>>,
    caller: Caller,
) -> Result<Json<ServerSettingsDto>, Problem> {
    handlers::reset_email_url(service, caller).await
}

async fn test_email_url_handler(
    Extension(service): Extension<Arc<Service>>,
    caller: Caller,
    json: Json<TestEmailUrlRequest>,
) -> Result<Json<EmailTestResultDto>, Problem> {
    handlers::test_email_url(service, caller, json).await
}

async fn get_task_frequencies_handler(
    Extension(service): Extension<Arc<Service>>,
    caller: Caller,
) -> Result<Json<Vec<String>>, Problem> {
    handlers::get_task_frequencies(service, caller).await
}

async fn get_library_types_handler(
    Extension(service): Extension<Arc<Service>>,
    caller: Caller,
) -> Result<Json<Vec<String>>, Problem> {
    handlers::get_library_types(service, caller).await
}

async fn get_log_levels_handler(
    Extension(service): Extension<Arc<Service>>,
    caller: Caller,
) -> Result<Json<Vec<String>>, Problem> {
    handlers::get_log_levels(service, caller).await
}
