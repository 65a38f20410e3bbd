use crate::client::{ApiClient, ApiError};
use crate::tests::utils::spawn_responder;
use std::time::Duration;

fn client_for(base_url: &str) -> ApiClient {
    let http = ApiClient::build_http_client(Duration::from_secs(5)).unwrap();
    ApiClient::new(http, base_url, "/health").unwrap()
}

#[test]
fn non_success_status_carries_message() {
    let api = spawn_responder(vec![(404, r#"{"message":"fichier introuvable"}"#)]);
    let client = client_for(&api.base_url);

    match client.fetch_file("absent.json") {
        Err(ApiError::Status { status, message }) => {
            assert_eq!(status, 404);
            assert_eq!(message, "fichier introuvable");
        }
        other => panic!("expected a status error, got {other:?}"),
    }
}

#[test]
fn html_error_body_is_kept_as_excerpt() {
    let api = spawn_responder(vec![(500, "<h1>Internal</h1>")]);
    let client = client_for(&api.base_url);

    let err = client.fetch_annonces().unwrap_err();
    assert!(err.is_network());
    assert!(err.to_string().contains("<h1>Internal</h1>"));
}

#[test]
fn non_json_success_is_a_format_error() {
    let api = spawn_responder(vec![(200, "not json")]);
    let client = client_for(&api.base_url);

    let err = client.fetch_annonces().unwrap_err();
    assert!(err.is_format());
}

#[test]
fn unreachable_api_is_a_network_error() {
    // Port 9 (discard) is not served on the test host.
    let client = client_for("http://127.0.0.1:9");
    let err = client.check_connection().unwrap_err();
    assert!(matches!(err, ApiError::Network(_)));
}

#[test]
fn base_path_and_health_path_are_joined() {
    let api = spawn_responder(vec![(200, r#"{"message":"ok"}"#), (200, r#"{"files":[]}"#)]);
    let client = client_for(&format!("{}/prod/", api.base_url));

    assert_eq!(client.check_connection().unwrap().message, "ok");
    assert!(client.list_files().unwrap().is_empty());
    assert_eq!(
        api.paths(),
        vec!["/prod/health".to_string(), "/prod/files".to_string()]
    );
}
