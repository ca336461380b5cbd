//! Request handlers for the extraction API and the image proxy.

use crate::server::AppState;
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::{error, info};

/// Message returned by `/proxy` for every failure.
pub const PROXY_ERROR_MESSAGE: &str = "Error fetching image";

/// `url` as a query parameter or JSON body field.
#[derive(Debug, Default, Deserialize)]
pub struct UrlParams {
    pub url: Option<String>,
}

impl UrlParams {
    /// A query string that does not deserialize (e.g. `url` given twice)
    /// counts as carrying no url.
    fn from_query(query: Result<Query<UrlParams>, QueryRejection>) -> Self {
        query.map(|Query(params)| params).unwrap_or_default()
    }

    fn into_url(self) -> Option<String> {
        self.url.filter(|u| !u.is_empty())
    }
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

/// `GET /ytdl?url=...`
pub async fn ytdl_get(
    State(state): State<AppState>,
    query: Result<Query<UrlParams>, QueryRejection>,
) -> Response {
    let Some(url) = UrlParams::from_query(query).into_url() else {
        return bad_request("URL query parameter is required");
    };
    info!("received URL: {url}");
    extract(&state, &url, "GET").await
}

/// `POST /ytdl` with `{"url": "..."}`.
///
/// Bodies not sent as `application/json`, or lacking a usable `url`, count
/// as a missing URL.
pub async fn ytdl_post(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let url = is_json(&headers)
        .then(|| serde_json::from_slice::<UrlParams>(&body).ok())
        .flatten()
        .and_then(UrlParams::into_url);
    let Some(url) = url else {
        return bad_request("URL is required in the request body");
    };
    info!("received URL: {url}");
    extract(&state, &url, "POST").await
}

/// `GET /proxy?url=...`
pub async fn proxy_image(
    State(state): State<AppState>,
    query: Result<Query<UrlParams>, QueryRejection>,
) -> Response {
    let url = UrlParams::from_query(query).url.unwrap_or_default();
    match state.proxy.fetch_image(&url).await {
        Ok(image) => ([(header::CONTENT_TYPE, image.content_type)], image.bytes).into_response(),
        Err(e) => {
            error!("error in /proxy endpoint: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, PROXY_ERROR_MESSAGE).into_response()
        }
    }
}

async fn extract(state: &AppState, url: &str, method: &str) -> Response {
    match state.invoker.extract(url).await {
        Ok(data) => Json(json!({ "success": true, "data": data })).into_response(),
        Err(e) => {
            error!("error in /ytdl {method} endpoint: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "success": false, "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

fn bad_request(message: &str) -> Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}
