//! Plushpal server entry point

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use plushpal_agent::Orchestrator;
use plushpal_config::{load_settings, Settings};
use plushpal_core::ContentFilter;
use plushpal_llm::{create_chain, GenerationBackend};
use plushpal_server::{create_router, init_metrics, AppState, TokenIssuer};
use plushpal_session::{InMemorySessionStore, RedisSessionStore, SessionStore};
use plushpal_speech::{HttpSpeechToText, HttpTextToSpeech};
use plushpal_tools::WeatherClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from files and environment.
    // Priority: env vars > config/{env} > config/default > defaults
    let env = std::env::var("PLUSHPAL_ENV").ok();
    let settings = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // tracing not yet initialized, use eprintln for early logging
            eprintln!("Warning: failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };

    init_tracing();
    tracing::info!("Starting plushpal server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        environment = ?settings.environment,
        config = env.as_deref().unwrap_or("default"),
        "configuration loaded"
    );

    let _metrics_handle = init_metrics();
    tracing::info!("Prometheus metrics at /metrics");

    // Generation providers in configured fallback order
    let generator: Arc<dyn GenerationBackend> = Arc::new(create_chain(&settings.llm)?);

    // Session store: Redis when configured, in-memory otherwise
    let session_ttl = Duration::from_secs(settings.session.ttl_minutes * 60);
    let sessions: Arc<dyn SessionStore> = match &settings.session.redis_url {
        Some(url) => match RedisSessionStore::new(url, session_ttl) {
            Ok(store) => {
                tracing::info!(ttl_minutes = settings.session.ttl_minutes, "Redis session store configured");
                Arc::new(store)
            }
            Err(e) => {
                tracing::error!("failed to configure Redis: {}. Falling back to in-memory.", e);
                Arc::new(InMemorySessionStore::new(session_ttl))
            }
        },
        None => {
            tracing::info!("no Redis configured, using in-memory session store");
            Arc::new(InMemorySessionStore::new(session_ttl))
        }
    };

    let stt = Arc::new(HttpSpeechToText::new(&settings.stt)?);
    let tts = Arc::new(HttpTextToSpeech::new(&settings.tts)?);
    let filter = ContentFilter::new(settings.fallbacks.safety_replies());

    let orchestrator = Arc::new(Orchestrator::new(
        generator,
        sessions,
        stt,
        tts,
        filter,
        settings.fallbacks.clone(),
    ));

    let weather = Arc::new(WeatherClient::new(&settings.weather)?);
    let auth = Arc::new(TokenIssuer::new(&settings.auth));

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    let state = AppState::new(settings, orchestrator, weather, auth);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutdown complete");
    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
    tracing::info!("shutdown signal received");
}
