use crate::db::loads::get_recent_loads;
use crate::router::handle;
use crate::tests::utils::{
    body_string, get, post_form, seed, spawn_responder, test_context,
};
use serde_json::json;

#[test]
fn load_replaces_collection_and_renders_section() {
    let api = spawn_responder(vec![(
        200,
        r#"{"annonces":[{"id":1,"prix":1000,"surface":50},{"id":2,"prix":0,"surface":0}]}"#,
    )]);
    let ctx = test_context("load_ok", &api.base_url);

    let resp = handle(post_form("/load", "", true), &ctx).expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("2 annonces chargées"));
    assert!(body.contains("20.00 €/m²"));
    assert_eq!(api.paths(), vec!["/annonces".to_string()]);

    let collection = ctx.state.snapshot().expect("collection should be loaded");
    assert_eq!(collection.listings.len(), 2);
    assert!(!ctx.state.is_loading());

    let runs = ctx.db.with_conn(|conn| get_recent_loads(conn, 5)).unwrap();
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0].source, "annonces");
    assert!(runs[0].success);
    assert_eq!(runs[0].listings_count, Some(2));
}

#[test]
fn malformed_file_keeps_previous_collection() {
    let api = spawn_responder(vec![(200, r#"{"unexpected": true}"#)]);
    let ctx = test_context("load_file_bad", &api.base_url);
    seed(&ctx, vec![json!({ "id": 1 }), json!({ "id": 2 })]);

    let resp = handle(post_form("/load/file", "filename=ventes+2024.json", true), &ctx)
        .expect("Handler failed");
    assert_eq!(resp.status(), 200);

    let body = body_string(resp);
    assert!(body.contains("error-message"));
    assert!(body.contains("Format de données invalide"));
    assert_eq!(api.paths(), vec!["/file/ventes%202024.json".to_string()]);

    let collection = ctx.state.snapshot().unwrap();
    assert_eq!(collection.listings.len(), 2);

    let runs = ctx.db.with_conn(|conn| get_recent_loads(conn, 5)).unwrap();
    assert!(!runs[0].success);
    assert_eq!(runs[0].source, "file:ventes 2024.json");
}

#[test]
fn file_with_wrapped_content_is_loaded() {
    let api = spawn_responder(vec![(
        200,
        r#"{"content":"[{\"id\":7,\"ville\":\"Nice\"}]","size_bytes":30,"filename":"nice.json"}"#,
    )]);
    let ctx = test_context("load_file_ok", &api.base_url);

    let body = body_string(handle(post_form("/load/file", "filename=nice.json", true), &ctx).unwrap());
    assert!(body.contains("Nice"));
    assert_eq!(ctx.state.snapshot().unwrap().listings.len(), 1);
}

#[test]
fn failed_plain_form_load_redirects_and_shows_error() {
    let api = spawn_responder(vec![(500, r#"{"error":"boom"}"#)]);
    let ctx = test_context("load_fail", &api.base_url);

    let resp = handle(post_form("/load", "", false), &ctx).expect("Handler failed");
    assert_eq!(resp.status(), 303);
    assert_eq!(resp.headers().get("Location").unwrap().to_str().unwrap(), "/");

    let body = body_string(handle(get("/"), &ctx).unwrap());
    assert!(body.contains("HTTP 500 : boom"));
    assert!(ctx.state.snapshot().is_none());
}

#[test]
fn load_file_requires_a_name() {
    let ctx = test_context("load_file_empty", "http://127.0.0.1:9");

    let result = handle(post_form("/load/file", "filename=++", true), &ctx);
    assert!(matches!(result, Err(crate::errors::ServerError::BadRequest(_))));
}

#[test]
fn connection_test_reports_health_message() {
    let api = spawn_responder(vec![(200, r#"{"message":"API OK"}"#)]);
    let ctx = test_context("health_ok", &api.base_url);

    let body = body_string(handle(post_form("/connection-test", "", true), &ctx).unwrap());
    assert!(body.contains("Connexion réussie : API OK"));
    assert_eq!(api.paths(), vec!["/test".to_string()]);
}

#[test]
fn connection_test_failure_is_rendered_not_raised() {
    let api = spawn_responder(vec![(503, "")]);
    let ctx = test_context("health_ko", &api.base_url);

    let resp = handle(post_form("/connection-test", "", true), &ctx).expect("Handler failed");
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("Connexion impossible"));
}

#[test]
fn files_page_lists_remote_files() {
    let api = spawn_responder(vec![(
        200,
        r#"{"files":[{"name":"ventes.json","size":1536,"last_modified":"2024-05-01T10:00:00+00:00"},"locations.json"]}"#,
    )]);
    let ctx = test_context("files_ok", &api.base_url);

    let body = body_string(handle(get("/files"), &ctx).unwrap());
    assert!(body.contains("ventes.json"));
    assert!(body.contains("locations.json"));
    assert!(body.contains("1.5 KB"));
    assert!(body.contains("01/05/2024 10:00"));
}

#[test]
fn files_page_shows_listing_errors() {
    let api = spawn_responder(vec![(502, r#"{"message":"bucket indisponible"}"#)]);
    let ctx = test_context("files_ko", &api.base_url);

    let resp = handle(get("/files"), &ctx).expect("Handler failed");
    assert_eq!(resp.status(), 200);
    let body = body_string(resp);
    assert!(body.contains("Impossible de lister les fichiers"));
    assert!(body.contains("bucket indisponible"));
}

#[test]
fn load_keeps_the_filters_sent_with_the_form() {
    let api = spawn_responder(vec![
        (200, r#"[{"id":1,"ville":"Lyon","surface":40},{"id":2,"ville":"Paris","surface":90}]"#),
        (200, r#"[{"id":3,"ville":"Lyon Vaise","surface":30},{"id":4,"ville":"Paris","surface":20}]"#),
    ]);
    let ctx = test_context("load_filtered", &api.base_url);

    let page = body_string(handle(get("/?q=lyon"), &ctx).unwrap());
    assert_eq!(page.matches("hx-include=\".filters\"").count(), 2);

    let body = body_string(handle(post_form("/load", "q=lyon", true), &ctx).unwrap());
    assert!(body.contains("Lyon"));
    assert!(!body.contains("Paris"));
    assert!(body.contains("/annonces/export.xlsx?q=lyon"));

    let resp = handle(post_form("/load", "q=lyon&surface_max=35", false), &ctx).unwrap();
    assert_eq!(resp.status(), 303);
    assert_eq!(
        resp.headers().get("Location").unwrap().to_str().unwrap(),
        "/?q=lyon&surface_max=35"
    );
    assert_eq!(ctx.state.snapshot().unwrap().listings.len(), 2);
}
