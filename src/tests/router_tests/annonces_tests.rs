use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{
    body_bytes, body_string, detail_uri, get, htmx_get, post_form, seed, spawn_responder,
    test_context, test_context_with,
};
use crate::context::AppContext;
use serde_json::json;

const OFFLINE_API: &str = "http://127.0.0.1:9";

fn seeded_context(prefix: &str) -> AppContext {
    let ctx = test_context(prefix, OFFLINE_API);
    seed(
        &ctx,
        vec![
            json!({ "id": 1, "prix": 1000, "surface": 50, "ville": "Lyon", "pieces": 2, "url": "https://ex.test/1" }),
            json!({ "id": 2, "prix": 0, "surface": 0, "ville": "Paris" }),
            json!({ "id": 3, "prix": 250000, "surface": 80, "ville": "Marseille", "pieces": 5, "description": "Vue mer" }),
        ],
    );
    ctx
}

#[test]
fn home_page_before_any_load() {
    let ctx = test_context("home_empty", OFFLINE_API);

    let resp = handle(get("/"), &ctx).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("<!DOCTYPE html>"));
    assert!(body.contains("Aucune donnée chargée"));
    assert!(body.contains("Charger les annonces"));
}

#[test]
fn table_partial_applies_surface_filter() {
    let ctx = seeded_context("table_surface");

    let resp = handle(htmx_get("/annonces/table?surface_min=10"), &ctx).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(!body.contains("<!DOCTYPE html>"), "partial must not carry the layout");
    assert!(body.contains("id=\"annonces-section\""));
    assert!(body.contains("Lyon"));
    assert!(body.contains("Marseille"));
    assert!(!body.contains("Paris"));
    assert!(!body.contains("\"/annonces/1/1\""));
    assert!(body.contains("\"/annonces/1/0\""));
    assert!(body.contains("20.00 €/m²"));
}

#[test]
fn table_partial_pushes_the_filtered_url() {
    let ctx = seeded_context("table_push_url");

    let resp = handle(htmx_get("/annonces/table?q=lyon&surface_min="), &ctx).unwrap();
    assert_eq!(
        resp.headers().get("HX-Push-Url").unwrap().to_str().unwrap(),
        "/?q=lyon"
    );

    let resp = handle(htmx_get("/annonces/table"), &ctx).unwrap();
    assert_eq!(resp.headers().get("HX-Push-Url").unwrap().to_str().unwrap(), "/");
}

#[test]
fn table_partial_searches_and_filters_rooms() {
    let ctx = seeded_context("table_search");

    let body = body_string(handle(get("/annonces/table?q=VUE"), &ctx).unwrap());
    assert!(body.contains("Marseille"));
    assert!(!body.contains("Lyon"));

    let body = body_string(handle(get("/annonces/table?pieces=5%2B"), &ctx).unwrap());
    assert!(body.contains("Marseille"));
    assert!(!body.contains("Lyon"));

    let body = body_string(handle(get("/annonces/table?surface_min=500"), &ctx).unwrap());
    assert!(body.contains("Aucune annonce à afficher"));
}

#[test]
fn full_page_keeps_filters_in_the_form() {
    let ctx = seeded_context("home_filters");

    let body = body_string(handle(get("/?q=lyon&surface_max=60"), &ctx).unwrap());
    assert!(body.contains("value=\"lyon\""));
    assert!(body.contains("value=\"60\""));
    assert!(body.contains("/annonces/export.xlsx?"));
}

#[test]
fn detail_is_a_modal_for_htmx_and_a_page_otherwise() {
    let ctx = seeded_context("detail");

    let body = body_string(handle(htmx_get(&detail_uri(&ctx, 0)), &ctx).unwrap());
    assert!(body.contains("class=\"modal\""));
    assert!(body.contains("Annonce #1"));
    assert!(body.contains("20.00 €/m²"));
    assert!(body.contains("https://ex.test/1"));
    assert!(!body.contains("<!DOCTYPE html>"));

    let body = body_string(handle(get(&detail_uri(&ctx, 2)), &ctx).unwrap());
    assert!(body.contains("<!DOCTYPE html>"));
    assert!(body.contains("Annonce #3"));
    assert!(body.contains("Vue mer"));
    assert!(body.contains("€/mois"));
    assert!(body.contains("Différence (loyer - mensualité)"));
}

#[test]
fn detail_compares_rent_with_monthly_payment() {
    let ctx = test_context_with("detail_rent", OFFLINE_API, &["--loan-rate", "0", "--loan-years", "10"]);
    seed(
        &ctx,
        vec![
            json!({ "id": 1, "type": "Vente", "prix": 120000, "surface": 40, "pieces": 2 }),
            json!({ "id": 2, "type": "Location", "prix": 800, "surface": 38, "pieces": 2 }),
            json!({ "id": 3, "type": "Location", "prix": 1000, "surface": 45, "pieces": 2 }),
        ],
    );

    let body = body_string(handle(htmx_get(&detail_uri(&ctx, 0)), &ctx).unwrap());
    assert!(body.contains("1000.00 €/mois"));
    assert!(body.contains("moyenne des locations"));
    assert!(body.contains("Différence (loyer - mensualité)"));
    assert!(body.contains("class=\"ko\""));
    assert!(body.contains("-100 €"));
}

#[test]
fn detail_links_expire_when_a_new_load_lands() {
    let api = spawn_responder(vec![(200, r#"[{"id":"B1","ville":"Brest"}]"#)]);
    let ctx = test_context("detail_stale", &api.base_url);
    seed(&ctx, vec![json!({ "id": "A1", "ville": "Angers" })]);
    let stale = detail_uri(&ctx, 0);

    let resp = handle(post_form("/load", "", true), &ctx).unwrap();
    assert!(body_string(resp).contains("Brest"));

    assert!(matches!(handle(get(&stale), &ctx), Err(ServerError::NotFound)));
    let body = body_string(handle(get(&detail_uri(&ctx, 0)), &ctx).unwrap());
    assert!(body.contains("Annonce #B1"));
}

#[test]
fn missing_listing_is_not_found() {
    let ctx = seeded_context("detail_missing");

    assert!(matches!(handle(get("/annonces/1/99"), &ctx), Err(ServerError::NotFound)));
    assert!(matches!(handle(get("/annonces/1/abc"), &ctx), Err(ServerError::NotFound)));
    assert!(matches!(handle(get("/annonces/0"), &ctx), Err(ServerError::NotFound)));
    assert!(matches!(handle(get("/nowhere"), &ctx), Err(ServerError::NotFound)));

    let empty = test_context("detail_empty", OFFLINE_API);
    assert!(matches!(handle(get("/annonces/1/0"), &empty), Err(ServerError::NotFound)));
}

#[test]
fn export_returns_a_workbook() {
    let ctx = seeded_context("export");

    let resp = handle(get("/annonces/export.xlsx?surface_min=10"), &ctx).expect("Handler failed");
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap().to_str().unwrap(),
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert!(resp
        .headers()
        .get("Content-Disposition")
        .unwrap()
        .to_str()
        .unwrap()
        .contains("annonces.xlsx"));

    let bytes = body_bytes(resp);
    assert!(bytes.starts_with(b"PK"));
}

#[test]
fn stylesheet_is_served() {
    let ctx = test_context("css", OFFLINE_API);

    let resp = handle(get("/static/main.css"), &ctx).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp
        .headers()
        .get("Content-Type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/css"));
}

#[test]
fn htmx_is_served_from_the_static_dir() {
    let dir = std::env::temp_dir().join(format!("annonces_static_{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("htmx.js"), "var htmx = {};").unwrap();
    let ctx = test_context_with("htmx_js", OFFLINE_API, &["--static-dir", dir.to_str().unwrap()]);

    let resp = handle(get("/static/htmx.js"), &ctx).unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp
        .headers()
        .get("Content-Type")
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("application/javascript"));
    assert_eq!(body_string(resp), "var htmx = {};");

    let missing = test_context_with("htmx_js_missing", OFFLINE_API, &["--static-dir", "/nonexistent/static"]);
    assert!(matches!(handle(get("/static/htmx.js"), &missing), Err(ServerError::NotFound)));

    let body = body_string(handle(get("/"), &ctx).unwrap());
    assert!(body.contains("src=\"/static/htmx.js\""));
    assert!(!body.contains("unpkg"));
}
