use super::handlers::{handle_health, handle_whatsapp_message, panic_message};
use super::{AppState, MAX_BODY_SIZE, twiml};

use crate::bridge::{AsyncBridge, FallbackReplies};
use crate::config::{Config, SessionConfig, TwilioConfig};
use crate::error::HandlerFault;
use crate::providers::{self, Provider};
use crate::responder::{PromptTemplate, ResponseGenerator};
use crate::session::ConversationStore;
use anyhow::{Context, Result};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::catch_panic::CatchPanicLayer;

/// Run the HTTP gateway on `config.gateway.host:port` until Ctrl-C.
pub async fn run_gateway(config: Arc<Config>) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.gateway.host, config.gateway.port)
        .parse()
        .context("parse gateway bind address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("bind gateway socket")?;

    let provider: Arc<dyn Provider> = Arc::new(providers::create_provider(&config.llm));
    run_gateway_with_listener(listener, config, provider).await
}

/// Wire store, generator and bridge around `provider`.
pub fn build_state(config: &Config, provider: Arc<dyn Provider>) -> Result<AppState> {
    let store = Arc::new(ConversationStore::with_max_turns(config.session.max_turns));
    let template = PromptTemplate::from_config(&config.llm.system_prompt, &config.llm.timezone)
        .context("build prompt template")?;
    let generator = Arc::new(ResponseGenerator::new(
        Arc::clone(&store),
        provider,
        template,
        config.llm.generation_params(),
    ));
    let bridge = Arc::new(AsyncBridge::new(
        generator,
        FallbackReplies::from(&config.bridge),
    ));

    let reply_timeout = config.bridge.reply_timeout();
    Ok(AppState {
        bridge,
        store,
        reply_timeout,
        request_timeout: config.gateway.request_timeout(reply_timeout),
    })
}

/// Run the HTTP gateway from a pre-bound listener.
pub async fn run_gateway_with_listener(
    listener: tokio::net::TcpListener,
    config: Arc<Config>,
    provider: Arc<dyn Provider>,
) -> Result<()> {
    let local_addr = listener
        .local_addr()
        .context("get gateway listener local address")?;

    if config.llm.warmup {
        match provider.warmup().await {
            Ok(()) => tracing::info!(provider = provider.name(), "provider warmed up"),
            Err(error) => tracing::warn!(
                provider = provider.name(),
                "provider warmup failed: {}",
                providers::sanitize_api_error(&format!("{error:#}"))
            ),
        }
    }

    let state = build_state(&config, provider)?;
    let sweeper = spawn_idle_sweeper(Arc::clone(&state.store), &config.session);

    print_gateway_banner(&local_addr.to_string(), &config);

    let app = build_app(state, &config.bridge.fault_reply);
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serve HTTP gateway");

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    served
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for Ctrl-C: {error}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

/// Periodically evict idle sessions when `idle_ttl_secs` is set.
fn spawn_idle_sweeper(
    store: Arc<ConversationStore>,
    session: &SessionConfig,
) -> Option<tokio::task::JoinHandle<()>> {
    if session.idle_ttl_secs == 0 {
        return None;
    }
    let ttl = Duration::from_secs(session.idle_ttl_secs);
    let every = Duration::from_secs(session.sweep_interval_secs.max(1));

    Some(tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // first tick completes immediately
        ticker.tick().await;
        loop {
            ticker.tick().await;
            store.evict_idle(ttl);
        }
    }))
}

fn print_gateway_banner(display_addr: &str, config: &Config) {
    println!("Gateway listening on {display_addr}");
    println!("  POST /whatsapp");
    println!("  GET  /health");
    println!(
        "  Model {} (reply deadline {}ms)",
        config.llm.model, config.bridge.reply_timeout_ms
    );
    if config.llm.api_key.is_none() {
        println!("  Warning: no API key set, every reply will be the error fallback");
    }
    let twilio = &config.twilio;
    println!(
        "  Twilio account {} token {} sender {}",
        TwilioConfig::masked(twilio.account_sid.as_deref()),
        TwilioConfig::masked(twilio.auth_token.as_deref()),
        twilio.whatsapp_number.as_deref().unwrap_or("(unset)")
    );
    if !twilio.is_configured() {
        println!(
            "  Twilio credentials missing: {}",
            twilio.missing_fields().join(", ")
        );
    }
}

pub fn build_app(state: AppState, fault_reply: &str) -> Router {
    let routes = Router::new()
        .route("/health", get(handle_health))
        .route("/whatsapp", post(handle_whatsapp_message))
        .with_state(state);
    with_gateway_layers(routes, fault_reply)
}

/// Body limit plus panic recovery. The request deadline lives in the
/// webhook handler so that it too ends in a TwiML 200.
fn with_gateway_layers(routes: Router, fault_reply: &str) -> Router {
    let fault_reply: Arc<str> = Arc::from(fault_reply);

    routes
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(CatchPanicLayer::custom(move |panic: Box<dyn std::any::Any + Send>| {
            let fault = HandlerFault::Panic(panic_message(panic.as_ref()));
            tracing::error!("inbound message not handled: {fault}");
            twiml::reply(&fault_reply)
        }))
}
