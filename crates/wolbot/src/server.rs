//! Webhook daemon.
//!
//! `POST /webhook` verifies the platform signature over the raw body,
//! routes every text message event concurrently, and replies through the
//! Messaging API. `GET /health` reports liveness.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures_util::FutureExt;
use futures_util::future::join_all;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use wolbot_core::{CommandRouter, DeviceControl, short_user_id};
use wolbot_line::signature::{self, SIGNATURE_HEADER};
use wolbot_line::{Event, ReplyClient, WebhookPayload};

use crate::reply;

// ── State ────────────────────────────────────────────────────────────

struct Inner<C> {
    router: CommandRouter<C>,
    replies: ReplyClient,
    channel_secret: SecretString,
}

/// Shared handler state.
pub struct AppState<C> {
    inner: Arc<Inner<C>>,
}

impl<C> Clone for AppState<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: DeviceControl + 'static> AppState<C> {
    pub fn new(router: CommandRouter<C>, replies: ReplyClient, channel_secret: SecretString) -> Self {
        Self {
            inner: Arc::new(Inner {
                router,
                replies,
                channel_secret,
            }),
        }
    }
}

// ── Router & serve loop ──────────────────────────────────────────────

pub fn app<C: DeviceControl + 'static>(state: AppState<C>) -> Router {
    Router::new()
        .route("/webhook", post(webhook::<C>))
        .route("/health", get(health))
        .with_state(state)
}

/// Serve until `shutdown` is cancelled, then drain in-flight requests.
pub async fn serve<C: DeviceControl + 'static>(
    listener: TcpListener,
    state: AppState<C>,
    shutdown: CancellationToken,
) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "webhook server listening");
    }
    axum::serve(listener, app(state))
        .with_graceful_shutdown(async move { shutdown.cancelled().await })
        .await?;
    info!("webhook server stopped");
    Ok(())
}

// ── Handlers ─────────────────────────────────────────────────────────

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn webhook<C: DeviceControl + 'static>(
    State(state): State<AppState<C>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let signature_header = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());
    let secret = state.inner.channel_secret.expose_secret().as_bytes();

    if let Err(err) = signature::verify(secret, &body, signature_header) {
        warn!(error = %err, "rejected webhook delivery");
        return error_response(StatusCode::UNAUTHORIZED, "Invalid signature");
    }

    let payload = match WebhookPayload::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(error = %err, "malformed webhook body");
            return error_response(StatusCode::BAD_REQUEST, "Malformed payload");
        }
    };
    debug!(events = payload.events.len(), "webhook delivery");

    let handled = AssertUnwindSafe(join_all(
        payload.events.iter().map(|event| handle_event(&state, event)),
    ))
    .catch_unwind()
    .await;

    match handled {
        Ok(outcomes) => Json(outcomes).into_response(),
        Err(_) => {
            error!("event handling panicked");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

/// Route one event. `None` for events that carry no text message.
async fn handle_event<C: DeviceControl + 'static>(
    state: &AppState<C>,
    event: &Event,
) -> Option<&'static str> {
    let inbound = event.inbound_text()?;
    let outcome = state.inner.router.handle(&inbound.user_id, &inbound.text).await;

    if let (Some(text), Some(token)) = (reply::render(&outcome), inbound.reply_token.as_deref()) {
        if let Err(err) = state.inner.replies.reply_text(token, &text).await {
            error!(
                user = short_user_id(&inbound.user_id),
                outcome = outcome.kind(),
                error = %err,
                "failed to send reply"
            );
        }
    }

    Some(outcome.kind())
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::{Ipv4Addr, SocketAddr};
    use std::time::Duration;

    use pretty_assertions::assert_eq;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};
    use wolbot_core::{ControlConfig, NetworkControl, Registry, RouterConfig};

    use super::*;

    const SECRET: &str = "test-channel-secret";

    struct Harness {
        base: String,
        line: MockServer,
        shutdown: CancellationToken,
        _dir: TempDir,
    }

    async fn start() -> Harness {
        let dir = tempfile::tempdir().unwrap();
        let registry = Registry::open(dir.path().join("data.json")).await.unwrap();
        let control = NetworkControl::new(ControlConfig {
            broadcast: Ipv4Addr::LOCALHOST,
            port: 9,
            ping_program: "true".into(),
        });
        let router = CommandRouter::new(Arc::new(registry), control, RouterConfig::default());

        let line = MockServer::start().await;
        let replies = ReplyClient::from_reqwest(&line.uri(), reqwest::Client::new()).unwrap();
        let state = AppState::new(router, replies, SecretString::from(SECRET.to_string()));

        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let shutdown = CancellationToken::new();
        tokio::spawn(serve(listener, state, shutdown.clone()));

        Harness {
            base,
            line,
            shutdown,
            _dir: dir,
        }
    }

    fn delivery(events: &serde_json::Value) -> Vec<u8> {
        serde_json::to_vec(&json!({ "destination": "Ubot", "events": events })).unwrap()
    }

    fn text_event(user: &str, text: &str) -> serde_json::Value {
        json!({
            "type": "message",
            "replyToken": format!("rt-{text}"),
            "source": { "type": "user", "userId": user },
            "message": { "id": "1", "type": "text", "text": text }
        })
    }

    async fn post_signed(base: &str, body: Vec<u8>) -> reqwest::Response {
        let signature = signature::sign(SECRET.as_bytes(), &body);
        reqwest::Client::new()
            .post(format!("{base}/webhook"))
            .header(SIGNATURE_HEADER, signature)
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let h = start().await;
        let body: serde_json::Value = reqwest::get(format!("{}/health", h.base))
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        assert_eq!(body["status"], "ok");
        assert!(body["timestamp"].is_string());
        h.shutdown.cancel();
    }

    #[tokio::test]
    async fn unsigned_delivery_is_rejected() {
        let h = start().await;
        let resp = reqwest::Client::new()
            .post(format!("{}/webhook", h.base))
            .body(delivery(&json!([])))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 401);

        let body = delivery(&json!([]));
        let resp = reqwest::Client::new()
            .post(format!("{}/webhook", h.base))
            .header(SIGNATURE_HEADER, signature::sign(b"wrong", &body))
            .body(body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 401);
        h.shutdown.cancel();
    }

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let h = start().await;
        let resp = post_signed(&h.base, b"{ not json".to_vec()).await;
        assert_eq!(resp.status(), 400);
        h.shutdown.cancel();
    }

    #[tokio::test]
    async fn text_events_are_routed_and_answered() {
        let h = start().await;
        Mock::given(method("POST"))
            .and(path("/v2/bot/message/reply"))
            .respond_with(ResponseTemplate::new(200))
            .expect(2)
            .mount(&h.line)
            .await;

        let body = delivery(&json!([
            text_event("U1", "#AA-BB-CC-DD-EE-FF"),
            { "type": "follow", "source": { "type": "user", "userId": "U1" } },
            text_event("U2", "hello"),
            text_event("U3", "help"),
        ]));
        let resp = post_signed(&h.base, body).await;
        assert_eq!(resp.status(), 200);

        let outcomes: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(
            outcomes,
            json!(["mac_registered", null, "ignored", "help_requested"])
        );
        h.shutdown.cancel();
    }

    #[tokio::test]
    async fn broken_event_is_skipped_and_the_rest_answered() {
        let h = start().await;
        Mock::given(method("POST"))
            .and(path("/v2/bot/message/reply"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&h.line)
            .await;

        let body = delivery(&json!([
            { "type": "message", "replyToken": "rt-x", "message": { "type": "text", "text": "help" } },
            text_event("U3", "help"),
        ]));
        let resp = post_signed(&h.base, body).await;
        assert_eq!(resp.status(), 200);

        let outcomes: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(outcomes, json!([null, "help_requested"]));
        h.shutdown.cancel();
    }

    #[tokio::test]
    async fn reply_failures_do_not_fail_the_delivery() {
        let h = start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&h.line)
            .await;

        let resp = post_signed(&h.base, delivery(&json!([text_event("U1", "status")]))).await;
        assert_eq!(resp.status(), 200);
        let outcomes: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(outcomes, json!(["not_registered"]));
        h.shutdown.cancel();
    }

    #[tokio::test]
    async fn shutdown_stops_the_server() {
        let h = start().await;
        h.shutdown.cancel();
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(reqwest::get(format!("{}/health", h.base)).await.is_err());
    }
}
