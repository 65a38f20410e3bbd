use crate::config::AppConfig;
use crate::context::AppContext;
use crate::db::{init_db, Database};
use crate::domain::Listing;
use crate::state::{CommitOutcome, LoadSource};
use astra::{Body, Request, Response};
use clap::Parser;
use http::Method;
use serde_json::Value;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{SystemTime, UNIX_EPOCH};

/// Fresh database file in the temp dir, with the production schema.
pub fn init_test_db(prefix: &str) -> Database {
    let path = std::env::temp_dir().join(format!(
        "{prefix}_{}.sqlite",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let db = Database::new(path.to_string_lossy().into_owned());
    init_db(&db, "sql/schema.sql").unwrap_or_else(|e| panic!("Database initialization failed: {e}"));
    db
}

pub fn test_context(prefix: &str, api_url: &str) -> AppContext {
    test_context_with(prefix, api_url, &[])
}

/// Same as `test_context`, with extra command line flags.
pub fn test_context_with(prefix: &str, api_url: &str, flags: &[&str]) -> AppContext {
    let mut args = vec!["annonces-viewer", "--api-url", api_url, "--timeout-secs", "5"];
    args.extend_from_slice(flags);
    let config = AppConfig::parse_from(args);
    AppContext::new(config, init_test_db(prefix)).expect("Failed to build context")
}

/// Href of a detail link in the current collection.
pub fn detail_uri(ctx: &AppContext, index: usize) -> String {
    let generation = ctx.state.snapshot().expect("nothing loaded").generation;
    format!("/annonces/{generation}/{index}")
}

/// Installs `values` as the current collection, as a finished load would.
pub fn seed(ctx: &AppContext, values: Vec<Value>) {
    let listings = values.into_iter().filter_map(Listing::from_value).collect();
    let ticket = ctx.state.begin_load(LoadSource::Annonces);
    assert!(matches!(ctx.state.commit(ticket, listings), CommitOutcome::Applied(_)));
}

pub fn get(uri: &str) -> Request {
    http::Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn htmx_get(uri: &str) -> Request {
    http::Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("HX-Request", "true")
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, form: &str, htmx: bool) -> Request {
    let mut builder = http::Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/x-www-form-urlencoded");
    if htmx {
        builder = builder.header("HX-Request", "true");
    }
    builder.body(Body::from(form.to_string())).unwrap()
}

pub fn body_string(resp: Response) -> String {
    let mut body = String::new();
    resp.into_body().reader().read_to_string(&mut body).unwrap();
    body
}

pub fn body_bytes(resp: Response) -> Vec<u8> {
    let mut body = Vec::new();
    resp.into_body().reader().read_to_end(&mut body).unwrap();
    body
}

/// A one-shot HTTP server on localhost answering each incoming request
/// with the next scripted `(status, body)` pair.
pub struct Responder {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl Responder {
    /// Request targets seen so far, e.g. `/file/a%20b.json`.
    pub fn paths(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

pub fn spawn_responder(responses: Vec<(u16, &str)>) -> Responder {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&requests);
    let responses: Vec<(u16, String)> = responses
        .into_iter()
        .map(|(status, body)| (status, body.to_string()))
        .collect();

    thread::spawn(move || {
        for (status, body) in responses {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };

            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                    break;
                }
            }
            if let Some(target) = request_line.split_whitespace().nth(1) {
                seen.lock().unwrap().push(target.to_string());
            }

            let response = format!(
                "HTTP/1.1 {status} Scripted\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
        }
    });

    Responder {
        base_url: format!("http://{addr}"),
        requests,
    }
}
