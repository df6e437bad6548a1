//! REST API handlers.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use push_core::{DispatchReport, InvalidPayload, NotificationPayload, RecipientToken};
use push_gateway::{Gateway, PushService, SelfDispatchError};
use push_registrar::{
    Endpoint, NotificationResponse, ReceivedNotification, RegistrationError, TokenIssuer,
};

type SharedService<E, I, G> = Arc<PushService<E, I, G>>;

/// Dispatch request.
#[derive(Debug, Deserialize)]
pub struct DispatchRequest {
    pub payload: NotificationPayload,
    #[serde(default)]
    pub recipients: Vec<RecipientToken>,
}

/// Token response.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: RecipientToken,
}

/// Error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub kind: String,
}

/// Errors surfaced by the API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    #[error(transparent)]
    InvalidPayload(#[from] InvalidPayload),
}

impl From<SelfDispatchError> for ApiError {
    fn from(e: SelfDispatchError) -> Self {
        match e {
            SelfDispatchError::Registration(e) => e.into(),
            SelfDispatchError::InvalidPayload(e) => e.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, error) = match &self {
            ApiError::Registration(e) => {
                let (status, kind) = match e {
                    RegistrationError::UnsupportedEndpoint => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "unsupported_endpoint")
                    }
                    RegistrationError::PermissionDenied => {
                        (StatusCode::FORBIDDEN, "permission_denied")
                    }
                    RegistrationError::Platform(_) => (StatusCode::BAD_GATEWAY, "platform"),
                    RegistrationError::TokenIssuance(_) => {
                        (StatusCode::BAD_GATEWAY, "token_issuance")
                    }
                };
                (status, kind, e.to_string())
            }
            ApiError::InvalidPayload(e) => {
                (StatusCode::BAD_REQUEST, "invalid_payload", e.to_string())
            }
        };

        tracing::warn!(kind, error = %error, "request failed");

        (
            status,
            Json(ErrorResponse {
                error,
                kind: kind.to_string(),
            }),
        )
            .into_response()
    }
}

/// Liveness probe.
pub async fn health_handler() -> &'static str {
    "ok"
}

/// Register the local endpoint, replacing any cached token.
pub async fn register_handler<E, I, G>(
    State(service): State<SharedService<E, I, G>>,
) -> Result<Json<TokenResponse>, ApiError>
where
    E: Endpoint,
    I: TokenIssuer,
    G: Gateway,
{
    let token = service.register().await?;
    Ok(Json(TokenResponse { token }))
}

/// Get the local endpoint's token, registering if needed.
pub async fn token_handler<E, I, G>(
    State(service): State<SharedService<E, I, G>>,
) -> Result<Json<TokenResponse>, ApiError>
where
    E: Endpoint,
    I: TokenIssuer,
    G: Gateway,
{
    let token = service.local_token().await?;
    Ok(Json(TokenResponse { token }))
}

/// Send a payload to a list of recipients.
pub async fn dispatch_handler<E, I, G>(
    State(service): State<SharedService<E, I, G>>,
    Json(request): Json<DispatchRequest>,
) -> Result<Json<DispatchReport>, ApiError>
where
    E: Endpoint,
    I: TokenIssuer,
    G: Gateway,
{
    tracing::info!(recipients = request.recipients.len(), "dispatch requested");
    let report = service
        .dispatch(&request.payload, &request.recipients)
        .await?;
    Ok(Json(report))
}

/// Send a payload to the local endpoint.
pub async fn dispatch_self_handler<E, I, G>(
    State(service): State<SharedService<E, I, G>>,
    Json(payload): Json<NotificationPayload>,
) -> Result<Json<DispatchReport>, ApiError>
where
    E: Endpoint,
    I: TokenIssuer,
    G: Gateway,
{
    let report = service.send_to_self(&payload).await?;
    Ok(Json(report))
}

/// Report a notification the host platform showed on this endpoint.
pub async fn received_handler<E, I, G>(
    State(service): State<SharedService<E, I, G>>,
    Json(notification): Json<ReceivedNotification>,
) -> StatusCode
where
    E: Endpoint,
    I: TokenIssuer,
    G: Gateway,
{
    service.registrar().notify_received(&notification);
    StatusCode::ACCEPTED
}

/// Report a user response to a notification.
pub async fn response_handler<E, I, G>(
    State(service): State<SharedService<E, I, G>>,
    Json(response): Json<NotificationResponse>,
) -> StatusCode
where
    E: Endpoint,
    I: TokenIssuer,
    G: Gateway,
{
    service.registrar().notify_response(&response);
    StatusCode::ACCEPTED
}
