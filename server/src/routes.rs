use std::sync::Arc;

use axum::{
    Json,
    extract::{Form, FromRequest, Request, State},
    http::{HeaderMap, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::AppError,
    mail::compose,
    state::AppState,
    validate::{RawSubmission, validate},
};

/// Response envelope every JSON route answers with.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            error: None,
        }
    }

    pub fn rejected(message: String) -> Self {
        Self {
            success: false,
            message,
            error: None,
        }
    }

    pub fn failed(message: String, error: String) -> Self {
        Self {
            success: false,
            message,
            error: Some(error),
        }
    }
}

/// Contact submission body, accepted as JSON or form-encoded.
pub struct ContactBody(pub RawSubmission);

impl<S> FromRequest<S> for ContactBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        if content_type.starts_with("application/json") {
            let Json(raw) = Json::<RawSubmission>::from_request(req, state)
                .await
                .map_err(|_| AppError::MalformedPayload)?;
            Ok(Self(raw))
        } else {
            let Form(raw) = Form::<RawSubmission>::from_request(req, state)
                .await
                .map_err(|_| AppError::MalformedPayload)?;
            Ok(Self(raw))
        }
    }
}

/// `POST /contact`: validate, compose, send, report.
pub async fn contact_handler(
    State(state): State<Arc<AppState>>,
    ContactBody(raw): ContactBody,
) -> Result<Json<ApiResponse>, AppError> {
    let submission = validate(&raw)?;

    let message = compose(&submission, &state.config.mail_user);
    state.mailer.send(&message).await?;

    Ok(Json(ApiResponse::ok("Email sent successfully!")))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}

/// `GET /api/health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        message: "Sachiva server is running!".to_string(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// `GET /`
pub async fn root_handler(State(state): State<Arc<AppState>>) -> Response {
    serve_asset(&state, "/", true).await
}

/// `GET /contact`
pub async fn contact_page_handler(State(state): State<Arc<AppState>>) -> Response {
    serve_asset(&state, "/contact.html", true).await
}

/// Fallback for everything else: GET requests go through the asset cache,
/// any other method is refused.
pub async fn asset_handler(State(state): State<Arc<AppState>>, req: Request) -> Response {
    if req.method() != Method::GET {
        return StatusCode::METHOD_NOT_ALLOWED.into_response();
    }

    let path = req.uri().path().to_string();
    let navigation = wants_document(req.headers());

    serve_asset(&state, &path, navigation).await
}

fn wants_document(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

async fn serve_asset(state: &AppState, path: &str, navigation: bool) -> Response {
    match state.assets.fetch(path, navigation).await {
        Ok(asset) => ([(header::CONTENT_TYPE, asset.content_type)], asset.body).into_response(),
        Err(err) => (StatusCode::NOT_FOUND, err.to_string()).into_response(),
    }
}
