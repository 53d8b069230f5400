//! Caller identification
//!
//! A request carrying the configured admin token as a bearer credential is
//! treated as the admin; every other request continues as anonymous and the
//! handlers decide what it may do.

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use server_settings::AuthContext;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct AdminCredentials {
    pub token: String,
    pub email: Option<String>,
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}

pub async fn identify_caller(
    State(admin): State<Arc<AdminCredentials>>,
    mut req: Request,
    next: Next,
) -> Response {
    let expected = admin.token.trim();
    let is_admin =
        !expected.is_empty() && extract_bearer_token(req.headers()) == Some(expected);

    let auth = if is_admin {
        AuthContext::admin(Some("admin".to_string()), admin.email.clone())
    } else {
        AuthContext::anonymous()
    };
    req.extensions_mut().insert(auth);
    next.run(req).await
}
