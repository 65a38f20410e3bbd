// src/config.rs

use crate::domain::metrics::LoanTerms;
use crate::domain::NormalizerOptions;
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

/// Runtime configuration. Every flag can also be injected through the
/// environment; the API URL can additionally be overridden from the
/// settings page, and that persisted value wins.
#[derive(Debug, Clone, Parser)]
#[command(name = "annonces-viewer", about = "Browse and filter real-estate listings")]
pub struct AppConfig {
    /// Base URL of the listings API.
    #[arg(long, env = "API_URL", default_value = "http://localhost:5000")]
    pub api_url: String,

    /// Bucket behind the file endpoints (display only).
    #[arg(long, env = "BUCKET_NAME", default_value = "bucket-test-new-app")]
    pub bucket_name: String,

    #[arg(long, env = "AWS_REGION", default_value = "eu-west-3")]
    pub aws_region: String,

    #[arg(long, env = "ENVIRONMENT", default_value = "dev")]
    pub environment: String,

    #[arg(long, env = "BIND_ADDR", default_value = "127.0.0.1:3000")]
    pub bind: SocketAddr,

    #[arg(long, env = "DATABASE_PATH", default_value = "annonces.sqlite3")]
    pub db_path: String,

    #[arg(long, env = "SCHEMA_PATH", default_value = "sql/schema.sql")]
    pub schema_path: String,

    /// Path of the connection-test endpoint (`/test` or `/health`).
    #[arg(long, env = "HEALTH_PATH", default_value = "/test")]
    pub health_path: String,

    #[arg(long, env = "API_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    #[arg(long, env = "MAX_WORKERS", default_value_t = 8)]
    pub max_workers: usize,

    /// Annual interest rate (percent) for the monthly payment estimate.
    #[arg(long, env = "LOAN_RATE", default_value_t = 3.5)]
    pub loan_rate: f64,

    #[arg(long, env = "LOAN_YEARS", default_value_t = 25)]
    pub loan_years: u32,

    /// Treat a literal 0 price, surface or room count as a real value.
    #[arg(long, env = "ZERO_IS_PRESENT")]
    pub zero_is_present: bool,

    /// Directory holding browser assets served under `/static/` (htmx.js).
    #[arg(long, env = "STATIC_DIR", default_value = "static")]
    pub static_dir: String,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl AppConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn loan_terms(&self) -> LoanTerms {
        LoanTerms {
            annual_rate_pct: self.loan_rate,
            years: self.loan_years,
        }
    }

    pub fn normalizer_options(&self) -> NormalizerOptions {
        NormalizerOptions {
            zero_is_present: self.zero_is_present,
        }
    }
}
