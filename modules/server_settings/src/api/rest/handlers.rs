//! HTTP request handlers - thin layer that delegates to domain service

use super::{
    dto::*,
    error::{map_domain_error, Problem},
};
use crate::contract::{AuthContext, ServerSettings, SettingsError};
use crate::domain::Service;
use axum::{extract::FromRequestParts, http::request::Parts, Json};
use std::convert::Infallible;
use std::sync::Arc;

/// Caller identity taken from the [`AuthContext`] request extension.
/// Requests without one are anonymous.
#[derive(Debug, Clone)]
pub struct Caller(pub AuthContext);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .unwrap_or_else(AuthContext::anonymous);
        Ok(Caller(auth))
    }
}

fn problem(service: &Service, auth: &AuthContext, error: SettingsError) -> Problem {
    map_domain_error(&error, service.localize(&error, auth))
}

/// Gate for reads whose service call carries no caller
fn authorize(service: &Service, auth: &AuthContext) -> Result<(), Problem> {
    Service::authorize(auth).map_err(|e| problem(service, auth, e))
}

// ===== Public Handlers =====

pub async fn get_base_url(service: Arc<Service>, Caller(auth): Caller) -> Result<String, Problem> {
    service
        .get_base_url()
        .await
        .map_err(|e| problem(&service, &auth, e))
}

pub async fn get_opds_enabled(
    service: Arc<Service>,
    Caller(auth): Caller,
) -> Result<Json<bool>, Problem> {
    service
        .is_opds_enabled()
        .await
        .map(Json)
        .map_err(|e| problem(&service, &auth, e))
}

// ===== Admin Handlers =====

pub async fn get_settings(
    service: Arc<Service>,
    Caller(auth): Caller,
) -> Result<Json<ServerSettingsDto>, Problem> {
    authorize(&service, &auth)?;
    let settings = service
        .get_settings()
        .await
        .map_err(|e| problem(&service, &auth, e))?;
    Ok(Json(settings.into()))
}

pub async fn update_settings(
    service: Arc<Service>,
    Caller(auth): Caller,
    Json(req): Json<ServerSettingsDto>,
) -> Result<Json<ServerSettingsDto>, Problem> {
    let desired = ServerSettings::try_from(req).map_err(|e| problem(&service, &auth, e))?;
    let settings = service
        .update_settings(desired, &auth)
        .await
        .map_err(|e| problem(&service, &auth, e))?;
    Ok(Json(settings.into()))
}

pub async fn reset_settings(
    service: Arc<Service>,
    Caller(auth): Caller,
) -> Result<Json<ServerSettingsDto>, Problem> {
    let settings = service
        .reset_settings(&auth)
        .await
        .map_err(|e| problem(&service, &auth, e))?;
    Ok(Json(settings.into()))
}

pub async fn reset_ip_addresses(
    service: Arc<Service>,
    Caller(auth): Caller,
) -> Result<Json<ServerSettingsDto>, Problem> {
    let settings = service
        .reset_ip_addresses(&auth)
        .await
        .map_err(|e| problem(&service, &auth, e))?;
    Ok(Json(settings.into()))
}

pub async fn reset_base_url(
    service: Arc<Service>,
    Caller(auth): Caller,
) -> Result<Json<ServerSettingsDto>, Problem> {
    let settings = service
        .reset_base_url(&auth)
        .await
        .map_err(|e| problem(&service, &auth, e))?;
    Ok(Json(settings.into()))
}

pub async fn reset_email_url(
    service: Arc<Service>,
    Caller(auth): Caller,
) -> Result<Json<ServerSettingsDto>, Problem> {
    let settings = service
        .reset_email_url(&auth)
        .await
        .map_err(|e| problem(&service, &auth, e))?;
    Ok(Json(settings.into()))
}

pub async fn test_email_url(
    service: Arc<Service>,
    Caller(auth): Caller,
    Json(req): Json<TestEmailUrlRequest>,
) -> Result<Json<EmailTestResultDto>, Problem> {
    let result = service
        .test_email_url(&req.url, &auth)
        .await
        .map_err(|e| problem(&service, &auth, e))?;
    Ok(Json(result.into()))
}

pub async fn get_task_frequencies(
    service: Arc<Service>,
    Caller(auth): Caller,
) -> Result<Json<Vec<String>>, Problem> {
    authorize(&service, &auth)?;
    let names = Service::task_frequencies()
        .iter()
        .map(|f| f.as_str().to_string())
        .collect();
    Ok(Json(names))
}

pub async fn get_library_types(
    service: Arc<Service>,
    Caller(auth): Caller,
) -> Result<Json<Vec<String>>, Problem> {
    authorize(&service, &auth)?;
    let names = Service::library_types()
        .iter()
        .map(|t| t.as_str().to_string())
        .collect();
    Ok(Json(names))
}

pub async fn get_log_levels(
    service: Arc<Service>,
    Caller(auth): Caller,
) -> Result<Json<Vec<String>>, Problem> {
    authorize(&service, &auth)?;
    let names = Service::log_levels()
        .iter()
        .map(|l| l.as_str().to_string())
        .collect();
    Ok(Json(names))
}
