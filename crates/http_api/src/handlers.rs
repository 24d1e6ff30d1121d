use std::net::SocketAddr;

use axum::{
    Json,
    extract::{ConnectInfo, Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};

use app_api::RecordViewRequest;

use crate::{errors::HttpError, state::HttpState};

const UNKNOWN_CLIENT: &str = "unknown";

pub async fn view_count(
    State(state): State<HttpState>,
    Path(project_id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::view_count(&state.context, &project_id)?;
    Ok(Json(response))
}

pub async fn record_view(
    State(state): State<HttpState>,
    Path(project_id): Path<String>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, HttpError> {
    let peer = connect_info.map(|ConnectInfo(addr)| addr);
    let req = RecordViewRequest {
        client_identifier: client_identifier(&headers, peer, state.trust_forwarded_for),
        user_agent: header_text(&headers, header::USER_AGENT),
        referrer: header_text(&headers, header::REFERER),
    };
    let response = app_api::record_view(&state.context, &project_id, req)?;
    Ok(Json(response))
}

pub async fn analytics_summary(
    State(state): State<HttpState>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::analytics_summary(&state.context)?;
    Ok(Json(response))
}

pub async fn reactions(
    State(state): State<HttpState>,
    Path(project_id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::reactions(&state.context, &project_id)?;
    Ok(Json(response))
}

pub async fn add_reaction(
    State(state): State<HttpState>,
    Path((project_id, reaction_type)): Path<(String, String)>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::add_reaction(&state.context, &project_id, &reaction_type)?;
    Ok(Json(response))
}

pub async fn remove_reaction(
    State(state): State<HttpState>,
    Path((project_id, reaction_type)): Path<(String, String)>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::remove_reaction(&state.context, &project_id, &reaction_type)?;
    Ok(Json(response))
}

pub async fn reactions_summary(
    State(state): State<HttpState>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::reactions_summary(&state.context)?;
    Ok(Json(response))
}

pub async fn health(State(state): State<HttpState>) -> Result<impl IntoResponse, HttpError> {
    let response = app_api::health(&state.context)?;
    Ok(Json(response))
}

pub async fn not_found() -> HttpError {
    HttpError::new(
        StatusCode::NOT_FOUND,
        "not found",
        Some("not_found".to_string()),
    )
}

/// First `X-Forwarded-For` hop, then the socket peer, then a fixed fallback.
fn client_identifier(headers: &HeaderMap, peer: Option<SocketAddr>, trust_forwarded: bool) -> String {
    if trust_forwarded {
        let forwarded = headers
            .get("x-forwarded-for")
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|value| !value.is_empty());
        if let Some(forwarded) = forwarded {
            return forwarded.to_string();
        }
    }
    peer.map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_string())
}

fn header_text(headers: &HeaderMap, name: header::HeaderName) -> String {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwarded_header_wins_when_trusted() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "203.0.113.9, 10.0.0.1".parse().unwrap());
        let peer = Some(SocketAddr::from(([127, 0, 0, 1], 4000)));
        assert_eq!(client_identifier(&headers, peer, true), "203.0.113.9");
        assert_eq!(client_identifier(&headers, peer, false), "127.0.0.1");
    }

    #[test]
    fn missing_peer_falls_back_to_unknown() {
        assert_eq!(client_identifier(&HeaderMap::new(), None, true), UNKNOWN_CLIENT);
    }
}
