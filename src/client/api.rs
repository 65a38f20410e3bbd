// client/api.rs
use crate::client::payload::{
    decode_annonces, decode_file, decode_files, decode_health, error_message, FilePayload,
    HealthReport, RemoteFile,
};
use crate::client::ApiError;
use crate::domain::Listing;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use std::time::{Duration, Instant};
use url::Url;

const USER_AGENT: &str = concat!("annonces-viewer/", env!("CARGO_PKG_VERSION"));

/// Longest error body excerpt kept in a `Status` error.
const MAX_ERROR_EXCERPT: usize = 200;

/// Blocking client for the listings API / object-store proxy.
///
/// One attempt per call: no retries, no backoff.
pub struct ApiClient {
    client: Client,
    base: Url,
    health_path: String,
}

impl ApiClient {
    pub fn build_http_client(timeout: Duration) -> Result<Client, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))
    }

    pub fn new(client: Client, base_url: &str, health_path: &str) -> Result<Self, ApiError> {
        Ok(Self {
            client,
            base: parse_base_url(base_url)?,
            health_path: health_path.to_string(),
        })
    }

    pub fn check_connection(&self) -> Result<HealthReport, ApiError> {
        let segments: Vec<&str> = self
            .health_path
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();
        let body = self.get_text(self.endpoint(&segments)?)?;
        decode_health(&body)
    }

    pub fn fetch_annonces(&self) -> Result<Vec<Listing>, ApiError> {
        let body = self.get_text(self.endpoint(&["annonces"])?)?;
        decode_annonces(&body)
    }

    pub fn list_files(&self) -> Result<Vec<RemoteFile>, ApiError> {
        let body = self.get_text(self.endpoint(&["files"])?)?;
        decode_files(&body)
    }

    pub fn fetch_file(&self, filename: &str) -> Result<FilePayload, ApiError> {
        let filename = filename.trim();
        if filename.is_empty() {
            return Err(ApiError::Config("nom de fichier vide".into()));
        }
        // The name travels as a single percent-encoded segment.
        let body = self.get_text(self.endpoint(&["file", filename])?)?;
        decode_file(&body)
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Config(format!("URL d'API inutilisable : {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn get_text(&self, url: Url) -> Result<String, ApiError> {
        let start = Instant::now();
        log::debug!("GET {url}");

        let resp = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        log::info!("GET {url} -> {} in {:?}", status.as_u16(), start.elapsed());

        if !status.is_success() {
            let message = error_message(&text).unwrap_or_else(|| {
                let excerpt: String = text.chars().take(MAX_ERROR_EXCERPT).collect();
                if excerpt.is_empty() {
                    status.canonical_reason().unwrap_or("erreur").to_string()
                } else {
                    excerpt
                }
            });
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(text)
    }
}

/// Validates an API base URL (http or https, usable as a base).
pub fn parse_base_url(raw: &str) -> Result<Url, ApiError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ApiError::Config(format!("URL d'API invalide « {raw} » : {e}")))?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ApiError::Config(format!(
            "URL d'API invalide « {raw} » : http(s) attendu"
        )));
    }

    Ok(url)
}
