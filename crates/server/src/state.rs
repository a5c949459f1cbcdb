//! Application state
//!
//! Every collaborator is constructed once in `main` and shared by all
//! handlers. Synthesized reply audio is parked in a short-lived cache and
//! served from `/api/v1/audio/{id}` exactly once.

use std::sync::Arc;

use dashmap::DashMap;

use plushpal_agent::Orchestrator;
use plushpal_config::Settings;
use plushpal_tools::WeatherClient;

use crate::auth::TokenIssuer;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub orchestrator: Arc<Orchestrator>,
    pub weather: Arc<WeatherClient>,
    pub auth: Arc<TokenIssuer>,
    /// Synthesized audio awaiting pickup, keyed by a one-time id
    pub audio_cache: Arc<DashMap<String, Vec<u8>>>,
}

impl AppState {
    pub fn new(
        settings: Settings,
        orchestrator: Arc<Orchestrator>,
        weather: Arc<WeatherClient>,
        auth: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            orchestrator,
            weather,
            auth,
            audio_cache: Arc::new(DashMap::new()),
        }
    }
}
