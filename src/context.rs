// src/context.rs

use crate::client::{parse_base_url, ApiClient, ApiError};
use crate::config::AppConfig;
use crate::db::settings::{get_setting, API_URL_KEY};
use crate::db::Database;
use crate::domain::Normalizer;
use crate::errors::ServerError;
use crate::state::AppState;
use reqwest::blocking::Client;

/// Everything a request handler needs, passed explicitly to the router.
pub struct AppContext {
    pub config: AppConfig,
    pub db: Database,
    pub state: AppState,
    pub normalizer: Normalizer,
    http: Client,
}

impl AppContext {
    pub fn new(config: AppConfig, db: Database) -> Result<Self, ServerError> {
        parse_base_url(&config.api_url)?;
        let http = ApiClient::build_http_client(config.timeout())?;
        let normalizer = Normalizer::new(config.normalizer_options());

        Ok(Self {
            config,
            db,
            state: AppState::new(),
            normalizer,
            http,
        })
    }

    /// Persisted override first, then flag/environment.
    pub fn api_url(&self) -> Result<String, ServerError> {
        let stored = self.db.with_conn(|conn| get_setting(conn, API_URL_KEY))?;
        Ok(stored.unwrap_or_else(|| self.config.api_url.clone()))
    }

    pub fn has_api_url_override(&self) -> Result<bool, ServerError> {
        Ok(self
            .db
            .with_conn(|conn| get_setting(conn, API_URL_KEY))?
            .is_some())
    }

    pub fn api_client(&self) -> Result<ApiClient, ApiError> {
        let base = self
            .api_url()
            .map_err(|e| ApiError::Config(e.to_string()))?;
        ApiClient::new(self.http.clone(), &base, &self.config.health_path)
    }
}
