// src/loader.rs
//
// Runs one load against the remote API and records it. A load either
// replaces the collection or leaves it untouched; there is no partial state.

use crate::client::{ApiClient, ApiError};
use crate::context::AppContext;
use crate::db::loads::{end_load_run, start_load_run};
use crate::domain::Listing;
use crate::state::{CommitOutcome, LoadSource};
use chrono::Utc;

#[derive(Debug)]
pub enum LoadOutcome {
    Loaded(usize),
    Superseded,
    Failed(ApiError),
}

pub fn load_annonces(ctx: &AppContext) -> LoadOutcome {
    run_load(ctx, LoadSource::Annonces, |api| api.fetch_annonces())
}

pub fn load_file(ctx: &AppContext, filename: &str) -> LoadOutcome {
    let name = filename.trim().to_string();
    run_load(ctx, LoadSource::File(name.clone()), move |api| {
        let payload = api.fetch_file(&name)?;
        if let Some(size) = payload.size_bytes {
            log::info!("file {name}: {size} bytes");
        }
        Ok(payload.listings)
    })
}

fn run_load<F>(ctx: &AppContext, source: LoadSource, fetch: F) -> LoadOutcome
where
    F: FnOnce(&ApiClient) -> Result<Vec<Listing>, ApiError>,
{
    let ticket = ctx.state.begin_load(source.clone());
    log::info!("load #{} from {source} started", ticket.generation());

    // History is best effort: a broken database must not block browsing.
    let run_id = ctx
        .db
        .with_conn(|conn| start_load_run(conn, &source.to_string(), Utc::now().timestamp()))
        .map_err(|e| log::warn!("could not record load start: {e}"))
        .ok();

    let result = ctx.api_client().and_then(|api| fetch(&api));

    let (outcome, count, error) = match result {
        Ok(listings) => {
            let count = listings.len();
            match ctx.state.commit(ticket, listings) {
                CommitOutcome::Applied(n) => {
                    log::info!("loaded {n} listings from {source}");
                    (LoadOutcome::Loaded(n), count, None)
                }
                CommitOutcome::Stale => (LoadOutcome::Superseded, count, None),
            }
        }
        Err(e) => {
            if e.is_network() {
                log::warn!("load from {source} failed: {e}");
            } else {
                log::error!("load from {source} failed: {e}");
            }
            ctx.state.fail(ticket, format!("Erreur : {e}"));
            let message = e.to_string();
            (LoadOutcome::Failed(e), 0, Some(message))
        }
    };

    if let Some(run_id) = run_id {
        let success = error.is_none();
        let recorded = ctx.db.with_conn(|conn| {
            end_load_run(conn, run_id, Utc::now().timestamp(), count, success, error)
        });
        if let Err(e) = recorded {
            log::warn!("could not record load end: {e}");
        }
    }

    outcome
}
