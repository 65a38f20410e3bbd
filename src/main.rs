use crate::config::AppConfig;
use crate::context::AppContext;
use crate::db::{init_db, Database};
use crate::responses::html_error_response;
use crate::router::handle;
use astra::Server;
use clap::Parser;
use std::sync::Arc;

mod client;
mod config;
mod context;
mod db;
mod domain;
mod errors;
mod loader;
mod responses;
mod router;
mod spreadsheets;
mod state;
mod templates;

#[cfg(test)]
mod tests;

fn main() {
    let config = AppConfig::parse();

    env_logger::Builder::from_env(env_logger::Env::default().filter_or("RUST_LOG", &config.log_level))
        .init();

    let db = Database::new(config.db_path.clone());
    if let Err(e) = init_db(&db, &config.schema_path) {
        log::error!("database initialization failed: {e}");
        std::process::exit(1);
    }

    let addr = config.bind;
    let max_workers = config.max_workers;
    let ctx = match AppContext::new(config, db) {
        Ok(ctx) => Arc::new(ctx),
        Err(e) => {
            log::error!("invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    log::info!(
        "starting server at http://{addr} (env {}, api {})",
        ctx.config.environment,
        ctx.config.api_url
    );

    let server = Server::bind(&addr).max_workers(max_workers);

    let result = server.serve(move |req, _info| match handle(req, &ctx) {
        Ok(resp) => resp,
        Err(err) => html_error_response(err),
    });

    if let Err(e) = result {
        log::error!("server ended with error: {e}");
    }

    log::info!("server shut down");
}
