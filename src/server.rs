//! Webhook transport harness.
//!
//! Mounts the delivery endpoint behind an axum router. The handler is
//! deliberately thin: extract the two platform headers, decode the body
//! once, await the router, and translate the outcome into an HTTP
//! acknowledgement. Only a malformed payload produces a failure status;
//! every understood condition is acknowledged with 200 so the platform
//! never enters a redelivery storm for conditions already handled
//! terminally.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use bytes::Bytes;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::audit::{AuditEntry, AuditEventType, AuditLogger};
use crate::config::GlobalConfig;
use crate::models::event::WebhookEvent;
use crate::router::EventRouter;
use crate::{AppError, Result};

/// Header carrying the event kind.
const EVENT_HEADER: &str = "x-github-event";
/// Header carrying the delivery identifier.
const DELIVERY_HEADER: &str = "x-github-delivery";

/// Shared application state behind the webhook endpoint.
pub struct AppState {
    /// Validated global configuration.
    pub config: Arc<GlobalConfig>,
    /// Delivery dispatcher.
    pub router: EventRouter,
    /// Audit sink for transport-level records (malformed deliveries).
    pub audit: Option<Arc<dyn AuditLogger>>,
}

/// Handler for `GET /health` — returns 200 OK with a plain-text body.
///
/// Useful for probing liveness without sending a delivery.
async fn health() -> &'static str {
    "ok"
}

/// Build the webhook router over the given state.
#[must_use]
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/webhook", post(webhook))
        .route("/health", get(health))
        .with_state(state)
}

/// Serve the webhook listener until the cancellation token fires.
///
/// # Errors
///
/// Returns `AppError::Server` if the listener fails to bind or serve.
pub async fn serve(state: Arc<AppState>, ct: CancellationToken) -> Result<()> {
    let bind = SocketAddr::from(([0, 0, 0, 0], state.config.http_port));
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .map_err(|err| AppError::Server(format!("failed to bind {bind}: {err}")))?;

    info!(%bind, "webhook listener ready");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(async move { ct.cancelled().await })
        .await
        .map_err(|err| AppError::Server(format!("listener failed: {err}")))
}

async fn webhook(State(state): State<Arc<AppState>>, headers: HeaderMap, body: Bytes) -> Response {
    let (status, payload) = process_delivery(&state, &headers, &body).await;
    (status, Json(payload)).into_response()
}

/// Decode, route, and render one delivery.
///
/// Exposed separately from the axum handler so the acknowledgement
/// contract can be exercised without a live listener.
pub async fn process_delivery(
    state: &AppState,
    headers: &HeaderMap,
    body: &[u8],
) -> (StatusCode, serde_json::Value) {
    let kind = header_str(headers, EVENT_HEADER);
    let delivery_id = header_str(headers, DELIVERY_HEADER);
    let (Some(kind), Some(delivery_id)) = (kind, delivery_id) else {
        return (
            StatusCode::BAD_REQUEST,
            json!({ "error": "missing x-github-event or x-github-delivery header" }),
        );
    };

    match WebhookEvent::decode(kind, delivery_id, body) {
        Ok(event) => {
            let outcome = state.router.route(&event).await;
            match serde_json::to_value(&outcome) {
                Ok(rendered) => (StatusCode::OK, rendered),
                Err(err) => {
                    error!(%err, "failed to render outcome");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        json!({ "error": "failed to render outcome" }),
                    )
                }
            }
        }
        Err(err) => {
            warn!(delivery = delivery_id, kind, %err, "rejecting malformed delivery");
            if let Some(ref logger) = state.audit {
                let entry = AuditEntry::new(AuditEventType::MalformedEvent)
                    .with_delivery(delivery_id)
                    .with_detail(err.to_string());
                if let Err(audit_err) = logger.log_entry(entry) {
                    warn!(%audit_err, "audit log write failed");
                }
            }
            (StatusCode::BAD_REQUEST, json!({ "error": err.to_string() }))
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
