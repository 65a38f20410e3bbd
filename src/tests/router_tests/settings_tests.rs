use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_string, get, post_form, test_context};

const DEFAULT_API: &str = "http://localhost:5000";

#[test]
fn override_is_saved_then_cleared() {
    let ctx = test_context("settings_roundtrip", DEFAULT_API);
    assert!(!ctx.has_api_url_override().unwrap());

    let resp = handle(
        post_form("/settings", "api_url=https%3A%2F%2Fapi.example.test%2Fprod%2F", false),
        &ctx,
    )
    .expect("Handler failed");
    assert_eq!(resp.status(), 200);
    assert!(body_string(resp).contains("enregistrée"));
    assert_eq!(ctx.api_url().unwrap(), "https://api.example.test/prod");
    assert!(ctx.has_api_url_override().unwrap());

    let body = body_string(handle(get("/settings"), &ctx).unwrap());
    assert!(body.contains("https://api.example.test/prod"));

    let resp = handle(post_form("/settings", "api_url=", false), &ctx).unwrap();
    assert!(body_string(resp).contains("réinitialisée"));
    assert_eq!(ctx.api_url().unwrap(), DEFAULT_API);
    assert!(!ctx.has_api_url_override().unwrap());
}

#[test]
fn invalid_override_is_rejected() {
    let ctx = test_context("settings_invalid", DEFAULT_API);

    let result = handle(post_form("/settings", "api_url=ftp%3A%2F%2Fexample.test", false), &ctx);
    assert!(matches!(result, Err(ServerError::BadRequest(_))));
    assert_eq!(ctx.api_url().unwrap(), DEFAULT_API);
}
