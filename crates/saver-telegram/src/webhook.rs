//! Webhook HTTP server.
//!
//! Routes:
//! - `POST /api/webhook`: one Telegram update per request
//! - `GET /api/check-reminders`: runs a reminder sweep
//! - `GET /api/status`: liveness and version

use std::future::Future;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::error::{Result, TelegramError};
use crate::state::SaverState;
use crate::update::IncomingUpdate;

type AppState = Arc<SaverState>;

/// Status endpoint body.
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

impl IntoResponse for TelegramError {
    fn into_response(self) -> Response {
        let status = match &self {
            TelegramError::BadUpdate(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(json!({
            "status": "error",
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

async fn receive_update(State(state): State<AppState>, body: String) -> Result<StatusCode> {
    let update = IncomingUpdate::from_json(&body).map_err(|e| {
        warn!(error = %e, "Rejected webhook payload");
        TelegramError::from(e)
    })?;
    let update_id = update.update_id;
    if let Err(e) = state.handle_update(update).await {
        error!(update_id, error = %e, "Error handling webhook");
        return Err(e);
    }
    Ok(StatusCode::OK)
}

async fn check_reminders(State(state): State<AppState>) -> Result<Json<serde_json::Value>> {
    info!("Manually checking reminders");
    let report = state.sweep().await?;
    Ok(Json(json!({
        "status": "success",
        "message": "Reminders checked",
        "found": report.found,
        "delivered": report.delivered,
        "failed": report.failed,
        "rescheduled": report.rescheduled,
    })))
}

async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "online".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Creates the webhook router.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/webhook", post(receive_update))
        .route("/api/check-reminders", get(check_reminders))
        .route("/api/status", get(status))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serves the router on `port` until `shutdown` resolves.
pub async fn serve<F>(port: u16, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Webhook server listening on {}", addr);
    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{state_with, store_overdue_reminder, Outbox};
    use axum_test::TestServer;

    const QUESTION: &str = r#"{"intent": "question", "data": {"answer": "پایتخت ایران تهران است."}}"#;

    fn update(text: &str) -> serde_json::Value {
        json!({
            "update_id": 9001,
            "message": {
                "message_id": 1,
                "date": 1700000000,
                "chat": {"id": 4242, "type": "private"},
                "from": {"id": 42, "is_bot": false, "first_name": "Sara"},
                "text": text
            }
        })
    }

    #[tokio::test]
    async fn test_status() {
        let server = TestServer::new(create_router(state_with(QUESTION, Arc::new(Outbox::default())))).unwrap();

        let response = server.get("/api/status").await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "online");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert!(body["timestamp"].as_str().is_some());
    }

    #[tokio::test]
    async fn test_webhook_answers_text_message() {
        let outbox = Arc::new(Outbox::default());
        let state = state_with(QUESTION, outbox.clone());
        let server = TestServer::new(create_router(Arc::clone(&state))).unwrap();

        let response = server.post("/api/webhook").json(&update("پایتخت ایران کجاست؟")).await;

        response.assert_status_ok();
        let sent = outbox.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, 4242);
        assert!(sent[0].1.contains("تهران"));

        let user = state.stores().users.load(42).unwrap();
        assert_eq!(user.chat_id, 4242);
        assert_eq!(user.history.len(), 1);
    }

    #[tokio::test]
    async fn test_webhook_ignores_updates_without_text() {
        let outbox = Arc::new(Outbox::default());
        let server = TestServer::new(create_router(state_with(QUESTION, outbox.clone()))).unwrap();

        let response = server
            .post("/api/webhook")
            .json(&json!({"update_id": 1, "edited_message": {"chat": {"id": 1}}}))
            .await;

        response.assert_status_ok();
        assert!(outbox.sent().is_empty());
    }

    #[tokio::test]
    async fn test_webhook_rejects_malformed_payload() {
        let server = TestServer::new(create_router(state_with(QUESTION, Arc::new(Outbox::default())))).unwrap();

        let response = server.post("/api/webhook").text("not json").await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "error");
    }

    #[tokio::test]
    async fn test_webhook_send_failure_is_server_error() {
        let server = TestServer::new(create_router(state_with(QUESTION, Arc::new(Outbox::failing())))).unwrap();

        let response = server.post("/api/webhook").json(&update("سلام")).await;

        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_check_reminders_runs_sweep() {
        let outbox = Arc::new(Outbox::default());
        let state = state_with(QUESTION, outbox.clone());
        store_overdue_reminder(state.stores());
        let server = TestServer::new(create_router(Arc::clone(&state))).unwrap();

        let response = server.get("/api/check-reminders").await;

        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["status"], "success");
        assert_eq!(body["found"], 1);
        assert_eq!(body["delivered"], 1);
        assert_eq!(outbox.sent().len(), 1);

        let again: serde_json::Value = server.get("/api/check-reminders").await.json();
        assert_eq!(again["found"], 0);
    }
}
