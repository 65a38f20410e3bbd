use crate::client::parse_base_url;
use crate::context::AppContext;
use crate::db::loads::get_recent_loads;
use crate::db::settings::{clear_setting, set_setting, API_URL_KEY};
use crate::domain::metrics::LoanEstimate;
use crate::domain::{
    filter, filter_indexed, summarize, FilterCriteria, NormalizedListing, RentByRooms,
};
use crate::errors::ServerError;
use crate::loader::{load_annonces, load_file, LoadOutcome};
use crate::responses::{
    css_response, html_push_url_response, html_response, js_response, redirect_response,
    ResultResp,
};
use crate::spreadsheets::{export_listings_xlsx, ExportRow};
use crate::state::{ListingCollection, StatusMessage};
use crate::templates::components::{error_banner, status_banner};
use crate::templates::pages::{
    annonces_page, annonces_section, detail_modal, detail_page, files_page, settings_page,
    AnnonceRow, AnnoncesVm, DetailVm, FilesVm, SettingsVm,
};
use crate::templates::LayoutVm;
use astra::Request;
use chrono::Utc;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use url::Url;

const MAIN_CSS: &str = include_str!("../static/main.css");
const RECENT_LOADS: usize = 10;
const MAX_FORM_BYTES: u64 = 64 * 1024;

pub fn handle(mut req: Request, ctx: &AppContext) -> ResultResp {
    let method = req.method().as_str().to_owned();
    let path = req.uri().path().to_owned();
    log::debug!("{method} {path}");

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => {
            let criteria = FilterCriteria::from_query(req.uri().query().unwrap_or(""));
            let vm = annonces_vm(ctx, criteria);
            let api_url = ctx.api_url()?;
            html_response(annonces_page(&layout_vm(ctx, &api_url), &vm))
        }
        ("GET", "/annonces/table") => {
            let criteria = FilterCriteria::from_query(req.uri().query().unwrap_or(""));
            let push_url = page_href(&criteria);
            html_push_url_response(annonces_section(&annonces_vm(ctx, criteria)), &push_url)
        }
        ("GET", "/annonces/export.xlsx") => {
            let criteria = FilterCriteria::from_query(req.uri().query().unwrap_or(""));
            export_filtered(ctx, &criteria)
        }
        ("POST", "/load") => {
            let htmx = is_htmx(&req);
            let body = read_body(&mut req)?;
            let criteria = load_criteria(&req, &body);
            let outcome = load_annonces(ctx);
            finish_load(ctx, outcome, htmx, criteria)
        }
        ("POST", "/load/file") => {
            let htmx = is_htmx(&req);
            let body = read_body(&mut req)?;
            let criteria = load_criteria(&req, &body);
            let form = parse_form(&body);
            let filename = form
                .get("filename")
                .map(|f| f.trim())
                .filter(|f| !f.is_empty())
                .ok_or_else(|| ServerError::BadRequest("nom de fichier manquant".into()))?;

            let outcome = load_file(ctx, filename);
            finish_load(ctx, outcome, htmx, criteria)
        }
        ("POST", "/connection-test") => connection_test(ctx),
        ("GET", "/files") => files(ctx),
        ("GET", "/settings") => settings(ctx, None),
        ("POST", "/settings") => {
            let form = read_form(req)?;
            save_settings(ctx, form.get("api_url").map(String::as_str).unwrap_or(""))
        }
        ("GET", "/static/main.css") => css_response(MAIN_CSS),
        ("GET", "/static/htmx.js") => htmx_script(ctx),
        ("GET", p) if p.starts_with("/annonces/") => {
            let (generation, index) =
                parse_detail_path(&p["/annonces/".len()..]).ok_or(ServerError::NotFound)?;
            detail(&req, ctx, generation, index)
        }
        _ => Err(ServerError::NotFound),
    }
}

fn is_htmx(req: &Request) -> bool {
    req.headers()
        .get("HX-Request")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "true")
}

/// Filters of the page that issued an htmx request, so a reload keeps them.
fn current_criteria(req: &Request) -> FilterCriteria {
    req.headers()
        .get("HX-Current-URL")
        .and_then(|v| v.to_str().ok())
        .and_then(|raw| Url::parse(raw).ok())
        .map(|url| FilterCriteria::from_query(url.query().unwrap_or("")))
        .unwrap_or_default()
}

/// Filters sent along with a load form (`hx-include`), else those of the
/// page that issued the request.
fn load_criteria(req: &Request, body: &str) -> FilterCriteria {
    let sent = FilterCriteria::from_query(body);
    if sent.is_empty() {
        current_criteria(req)
    } else {
        sent
    }
}

/// `{generation}/{index}`
fn parse_detail_path(rest: &str) -> Option<(u64, usize)> {
    let (generation, index) = rest.split_once('/')?;
    Some((generation.parse().ok()?, index.parse().ok()?))
}

fn page_href(criteria: &FilterCriteria) -> String {
    let query = criteria.to_query();
    if query.is_empty() {
        "/".to_string()
    } else {
        format!("/?{query}")
    }
}

fn read_body(req: &mut Request) -> Result<String, ServerError> {
    let mut body = String::new();
    std::mem::take(req.body_mut())
        .reader()
        .take(MAX_FORM_BYTES)
        .read_to_string(&mut body)
        .map_err(|e| ServerError::BadRequest(format!("corps illisible : {e}")))?;
    Ok(body)
}

fn parse_form(body: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(body.as_bytes())
        .into_owned()
        .collect()
}

fn read_form(mut req: Request) -> Result<HashMap<String, String>, ServerError> {
    read_body(&mut req).map(|body| parse_form(&body))
}

fn layout_vm<'a>(ctx: &'a AppContext, api_url: &'a str) -> LayoutVm<'a> {
    LayoutVm {
        environment: &ctx.config.environment,
        api_url,
    }
}

fn annonces_vm(ctx: &AppContext, criteria: FilterCriteria) -> AnnoncesVm {
    let snapshot = ctx.state.snapshot();
    let status = ctx.state.status();
    let is_loading = ctx.state.is_loading();

    let Some(collection) = snapshot else {
        return AnnoncesVm {
            criteria,
            rows: Vec::new(),
            total: None,
            generation: 0,
            source: None,
            loaded_at: None,
            stats: Default::default(),
            status,
            is_loading,
        };
    };

    let matched = filter_indexed(&collection.listings, &criteria, &ctx.normalizer);
    let stats = summarize(matched.iter().map(|(_, l)| *l), &ctx.normalizer);
    let rows = matched
        .into_iter()
        .map(|(index, listing)| AnnonceRow {
            index,
            listing: ctx.normalizer.normalize(listing),
        })
        .collect();

    AnnoncesVm {
        criteria,
        rows,
        total: Some(collection.listings.len()),
        generation: collection.generation,
        source: Some(collection.source.to_string()),
        loaded_at: Some(collection.loaded_at.format("%d/%m/%Y %H:%M:%S").to_string()),
        stats,
        status,
        is_loading,
    }
}

fn loan_estimate(
    ctx: &AppContext,
    rents: &RentByRooms,
    listing: &NormalizedListing,
) -> Option<LoanEstimate> {
    LoanEstimate::for_price(
        listing.price,
        ctx.config.loan_terms(),
        rents.monthly_rent(listing),
    )
}

fn export_filtered(ctx: &AppContext, criteria: &FilterCriteria) -> ResultResp {
    let rows: Vec<ExportRow> = match ctx.state.snapshot() {
        Some(collection) => {
            let rents = RentByRooms::from_listings(&collection.listings, &ctx.normalizer);
            filter(&collection.listings, criteria, &ctx.normalizer)
                .into_iter()
                .map(|listing| {
                    let listing = ctx.normalizer.normalize(listing);
                    ExportRow {
                        loan: loan_estimate(ctx, &rents, &listing),
                        listing,
                    }
                })
                .collect()
        }
        None => Vec::new(),
    };
    log::info!("exporting {} listings", rows.len());
    export_listings_xlsx(&rows)
}

/// Links carry the generation they were rendered for; after a reload they 404
/// rather than show another listing at the same position.
fn current_collection(
    ctx: &AppContext,
    generation: u64,
) -> Result<Arc<ListingCollection>, ServerError> {
    let collection = ctx.state.snapshot().ok_or(ServerError::NotFound)?;
    if collection.generation != generation {
        log::debug!(
            "detail link for generation {generation}, current is {}",
            collection.generation
        );
        return Err(ServerError::NotFound);
    }
    Ok(collection)
}

fn detail(req: &Request, ctx: &AppContext, generation: u64, index: usize) -> ResultResp {
    let collection = current_collection(ctx, generation)?;
    let listing = collection
        .listings
        .get(index)
        .ok_or(ServerError::NotFound)?;

    let rents = RentByRooms::from_listings(&collection.listings, &ctx.normalizer);
    let normalized = ctx.normalizer.normalize(listing);
    let vm = DetailVm {
        loan: loan_estimate(ctx, &rents, &normalized),
        listing: normalized,
        raw_json: listing.to_pretty_json(),
        terms: ctx.config.loan_terms(),
    };

    if is_htmx(req) {
        html_response(detail_modal(&vm))
    } else {
        let api_url = ctx.api_url()?;
        html_response(detail_page(&layout_vm(ctx, &api_url), &vm))
    }
}

/// htmx gets the refreshed section; plain forms go back to the page.
fn finish_load(
    ctx: &AppContext,
    outcome: LoadOutcome,
    htmx: bool,
    criteria: FilterCriteria,
) -> ResultResp {
    match &outcome {
        LoadOutcome::Loaded(n) => log::debug!("showing {n} freshly loaded listings"),
        LoadOutcome::Superseded => log::info!("load superseded by a newer one"),
        LoadOutcome::Failed(e) if e.is_format() => {
            log::info!("API answered with an unexpected shape, keeping previous listings")
        }
        LoadOutcome::Failed(_) => {}
    }

    if htmx {
        html_response(annonces_section(&annonces_vm(ctx, criteria)))
    } else {
        redirect_response(&page_href(&criteria))
    }
}

/// htmx is served from the static directory rather than a CDN.
fn htmx_script(ctx: &AppContext) -> ResultResp {
    let path = Path::new(&ctx.config.static_dir).join("htmx.js");
    match std::fs::read(&path) {
        Ok(script) => js_response(script),
        Err(e) => {
            log::debug!("cannot read {}: {e}", path.display());
            Err(ServerError::NotFound)
        }
    }
}

fn connection_test(ctx: &AppContext) -> ResultResp {
    let result = ctx.api_client().and_then(|api| api.check_connection());
    let markup = match result {
        Ok(report) => {
            log::info!("connection test ok: {}", report.message);
            status_banner(Some(&StatusMessage::success(format!(
                "Connexion réussie : {}",
                report.message
            ))))
        }
        Err(e) => {
            log::warn!("connection test failed: {e}");
            error_banner(&format!("Connexion impossible : {e}"))
        }
    };
    html_response(markup)
}

fn files(ctx: &AppContext) -> ResultResp {
    let files = ctx
        .api_client()
        .and_then(|api| api.list_files())
        .map_err(|e| {
            log::warn!("listing files failed: {e}");
            format!("Impossible de lister les fichiers : {e}")
        });
    let recent_loads = ctx.db.with_conn(|conn| get_recent_loads(conn, RECENT_LOADS))?;

    let vm = FilesVm {
        bucket_name: ctx.config.bucket_name.clone(),
        aws_region: ctx.config.aws_region.clone(),
        files,
        recent_loads,
    };
    let api_url = ctx.api_url()?;
    html_response(files_page(&layout_vm(ctx, &api_url), &vm))
}

fn settings(ctx: &AppContext, message: Option<StatusMessage>) -> ResultResp {
    let api_url = ctx.api_url()?;
    let vm = SettingsVm {
        api_url: api_url.clone(),
        default_api_url: ctx.config.api_url.clone(),
        has_override: ctx.has_api_url_override()?,
        bucket_name: ctx.config.bucket_name.clone(),
        aws_region: ctx.config.aws_region.clone(),
        environment: ctx.config.environment.clone(),
        health_path: ctx.config.health_path.clone(),
        zero_is_present: ctx.config.zero_is_present,
        message,
    };
    html_response(settings_page(&layout_vm(ctx, &api_url), &vm))
}

/// An empty value removes the override; anything else must be an http(s) URL.
fn save_settings(ctx: &AppContext, raw: &str) -> ResultResp {
    let raw = raw.trim();
    if raw.is_empty() {
        ctx.db.with_conn(|conn| clear_setting(conn, API_URL_KEY))?;
        log::info!("API URL override cleared");
        return settings(
            ctx,
            Some(StatusMessage::success("URL de l'API réinitialisée")),
        );
    }

    let url = parse_base_url(raw).map_err(|e| ServerError::BadRequest(e.to_string()))?;
    let value = url.as_str().trim_end_matches('/').to_string();
    ctx.db
        .with_conn(|conn| set_setting(conn, API_URL_KEY, &value, Utc::now().timestamp()))?;
    log::info!("API URL override set to {value}");

    settings(ctx, Some(StatusMessage::success("URL de l'API enregistrée")))
}
