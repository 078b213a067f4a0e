//! HTTP request handlers
//!
//! Implementation of HTTP endpoints for the resolver server.

use crate::{
    Error,
    server::app::AppState,
    types::PingResponse,
    utils::version,
};
use axum::{
    extract::{RawQuery, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json, Response},
};

/// Query parameter carrying the page to resolve
const TARGET_PARAM: &str = "url";

/// Resolve and redirect endpoint
///
/// GET /proxy?url=<page-url>
///
/// Responds with a 302 to the direct media URL of the page.
pub async fn proxy(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let pairs: Vec<(String, String)> = query
        .as_deref()
        .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
        .unwrap_or_default();

    let Some(raw_target) = pairs
        .iter()
        .find(|(key, value)| key == TARGET_PARAM && !value.is_empty())
        .map(|(_, value)| value.clone())
    else {
        return plain_text(StatusCode::BAD_REQUEST, "Error: Missing URL parameter");
    };

    let extra: Vec<(String, String)> = pairs
        .into_iter()
        .filter(|(key, _)| key != TARGET_PARAM)
        .collect();

    let primary_domain = &state.resolver.settings().upstream.primary_domain;
    let target = match crate::resolver::target::rebuild_target(&raw_target, &extra, primary_domain) {
        Ok(target) => target,
        Err(e) => {
            tracing::warn!("Rejected target {:?}: {}", raw_target, e);
            return plain_text(StatusCode::BAD_REQUEST, "Error: Invalid URL");
        }
    };

    match state.resolver.resolve(&target).await {
        Ok(direct) => {
            tracing::info!("Redirecting {} to direct link", target);
            (StatusCode::FOUND, [(header::LOCATION, direct)]).into_response()
        }
        Err(e) => {
            let status = status_for(&e);
            if status.is_server_error() {
                tracing::error!("Failed to resolve {}: {}", target, e);
            } else {
                tracing::warn!("Could not resolve {}: {}", target, e);
            }
            plain_text(status, format_error(&e))
        }
    }
}

/// HTTP status for a resolution failure
fn status_for(error: &Error) -> StatusCode {
    match error {
        Error::InvalidInput(_) | Error::InvalidIdentifier(_) | Error::InvalidArgument(_) => {
            StatusCode::BAD_REQUEST
        }
        Error::PatternNotFound(_) | Error::FieldNotFound { .. } => StatusCode::NOT_FOUND,
        Error::MalformedJson(_) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Format error for HTTP response
fn format_error(error: &Error) -> String {
    match error {
        Error::PatternNotFound(_) => "Error: No playAddr found in HTML".to_string(),
        Error::FieldNotFound { .. } => "Error: Video URL not found in playAddr".to_string(),
        Error::MalformedJson(_) => "Error: Failed to parse playAddr JSON".to_string(),
        e if e.is_client_error() => format!("Error: {}", e),
        e => format!("An error occurred: {}", e),
    }
}

fn plain_text(status: StatusCode, body: impl Into<String>) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body.into(),
    )
        .into_response()
}

/// Ping endpoint for health checks
///
/// GET /ping
///
/// Returns server status and uptime information.
pub async fn ping(State(state): State<AppState>) -> Json<PingResponse> {
    let uptime = state.start_time.elapsed().as_secs();
    let cached = state.resolver.cached_links().await;
    let response = PingResponse::new(uptime, version::get_version(), cached);

    tracing::debug!(
        "Ping response: uptime={}s, version={}, cached={}",
        uptime,
        version::get_version(),
        cached
    );
    Json(response)
}

/// Invalidate caches endpoint
///
/// POST /invalidate_caches
///
/// Clears the resolution cache.
pub async fn invalidate_caches(State(state): State<AppState>) -> StatusCode {
    tracing::info!("Invalidating all caches");
    state.resolver.invalidate_caches().await;
    StatusCode::NO_CONTENT
}
