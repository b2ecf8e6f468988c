//! Webhook HTTP server: signature check, message pipeline, reply dispatch.
//!
//! Once the signature checks out, the endpoint always acknowledges with 200.
//! Generation and dispatch failures degrade the reply payload instead of the
//! HTTP status; a non-200 would make the platform re-deliver the event.

use crate::channels::{signature, ChannelHandle, InboundMessage, LineChannel, WebhookEnvelope};
use crate::config::{self, Config};
use crate::knowledge::KnowledgeSource;
use crate::llm::{GeminiClient, LlmBackend};
use crate::prompt;
use anyhow::{Context, Result};
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;

/// Header the platform signs the raw request body into.
const SIGNATURE_HEADER: &str = "X-Line-Signature";

/// Sent instead of the completion when the generation call fails at runtime.
pub const GENERATION_FALLBACK: &str =
    "Sorry, I'm a little busy right now. Please try again later.";

/// Sent when no generation backend is configured or it failed to initialize.
pub const BACKEND_UNAVAILABLE: &str =
    "Sorry, the assistant backend is not running. Please contact the administrator.";

/// Shared state for the webhook server. Built once at startup; request handlers
/// only ever read it.
#[derive(Clone)]
pub struct AppState {
    /// Shared secret the platform signs webhook bodies with.
    pub channel_secret: String,
    /// Knowledge document loaded at startup (sentinel text when the source was unreadable).
    pub knowledge: Arc<String>,
    /// Generation backend; None when disabled at init.
    pub backend: Option<Arc<dyn LlmBackend>>,
    /// Reply channel for dispatching answers back to the conversation.
    pub channel: Arc<dyn ChannelHandle>,
    pub port: u16,
}

/// Build the router: the webhook endpoint plus a health probe.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health_http))
        .route("/callback", post(callback))
        .with_state(state)
}

/// Run the webhook server; binds to config.server.bind:port (PORT env overrides).
/// Fails when no channel secret is configured: nothing could ever be verified.
/// Blocks until shutdown (Ctrl+C or SIGTERM).
pub async fn run_server(config: Config) -> Result<()> {
    let channel_secret = config::resolve_channel_secret(&config)
        .context("channel secret not configured (set CHANNEL_SECRET or channel.secret)")?;

    let knowledge_source = KnowledgeSource::from_config(&config.knowledge);
    let knowledge = knowledge_source.load_or_sentinel();
    log::info!("knowledge document loaded ({} bytes)", knowledge.len());

    let backend: Option<Arc<dyn LlmBackend>> = match config::resolve_model_api_key(&config) {
        Some(api_key) => match GeminiClient::new(api_key, config.model.name.clone()) {
            Ok(client) => {
                log::info!("generation client configured (model {})", client.model());
                Some(Arc::new(client))
            }
            Err(e) => {
                log::error!("generation client init failed: {}", e);
                None
            }
        },
        None => {
            log::warn!(
                "MODEL_API_KEY not set — every reply will report the backend as unavailable"
            );
            None
        }
    };

    let access_token = config::resolve_access_token(&config);
    if access_token.is_none() {
        log::warn!("CHANNEL_ACCESS_TOKEN not set — reply delivery will fail");
    }
    let channel = Arc::new(LineChannel::new(access_token));

    let port = config::resolve_port(&config);
    let state = AppState {
        channel_secret,
        knowledge: Arc::new(knowledge),
        backend,
        channel,
        port,
    };

    let bind_addr = format!("{}:{}", config.server.bind.trim(), port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("binding to {}", bind_addr))?;
    log::info!("webhook server listening on {}", bind_addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("webhook server exited")?;
    log::info!("webhook server stopped");
    Ok(())
}

/// Future that completes when the process should shut down (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    log::info!("shutdown signal received, draining connections");
}

/// POST /callback — verify the platform signature over the raw body, then answer
/// each text message. Replies are dispatched before the HTTP response is sent.
async fn callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, &'static str) {
    let provided = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    if !signature::verify(&state.channel_secret, &body, provided) {
        log::warn!("rejected webhook request: invalid signature");
        return (StatusCode::BAD_REQUEST, "bad signature");
    }

    log::debug!("webhook body: {}", String::from_utf8_lossy(&body));
    let envelope: WebhookEnvelope = match serde_json::from_slice(&body) {
        Ok(e) => e,
        Err(e) => {
            // Signed but unparseable: acknowledge anyway so the platform does not
            // re-deliver the event.
            log::warn!("failed to parse webhook body: {}", e);
            return (StatusCode::OK, "OK");
        }
    };

    for message in envelope.text_messages() {
        answer_message(&state, message).await;
    }

    (StatusCode::OK, "OK")
}

/// Compose the prompt, call the model, and send exactly one reply. A generation
/// failure degrades to the fixed fallback text; a dispatch failure is logged and
/// the event is still considered handled.
async fn answer_message(state: &AppState, message: InboundMessage) {
    let reply_text = match state.backend {
        Some(ref backend) => {
            let prompt = prompt::compose(&state.knowledge, &message.text);
            match backend.generate(&prompt).await {
                Ok(text) => text,
                Err(e) => {
                    log::error!("generation call failed: {}", e);
                    GENERATION_FALLBACK.to_string()
                }
            }
        }
        None => BACKEND_UNAVAILABLE.to_string(),
    };

    if let Err(e) = state.channel.reply(&message.reply_token, &reply_text).await {
        log::error!("reply dispatch failed ({}): {}", state.channel.id(), e);
    }
}

/// GET / returns a simple health JSON (for probes).
async fn health_http(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({
        "runtime": "running",
        "port": state.port,
    }))
}
