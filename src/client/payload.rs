// client/payload.rs
//
// Response bodies of the listings API. Each endpoint has drifted across
// deployments, so every accepted shape is an explicit variant here and
// everything else is a `Format` error.

use crate::client::ApiError;
use crate::domain::Listing;
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use serde_json::Value;

/// `GET /annonces`
#[derive(Debug, Deserialize)]
struct AnnoncesBody {
    annonces: Vec<Value>,
}

/// `GET /file/{name}`
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FileBody {
    /// `[ {...}, ... ]`
    Direct(Vec<Value>),
    /// `{ "content": ..., "size_bytes": n, "filename": "..." }`
    Envelope(Envelope),
}

#[derive(Debug, Deserialize)]
struct Envelope {
    content: Content,
    #[serde(default)]
    size_bytes: Option<u64>,
    #[serde(default)]
    filename: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Content {
    Listings(Vec<Value>),
    /// The file itself was stored as a JSON string.
    Encoded(String),
    Annonces { annonces: Vec<Value> },
    Other(Value),
}

/// `GET /files`
#[derive(Debug, Deserialize)]
struct FilesBody {
    files: Vec<FileEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FileEntry {
    Name(String),
    Detailed {
        name: String,
        #[serde(default)]
        size: Option<u64>,
        #[serde(default)]
        size_mb: Option<f64>,
        #[serde(default)]
        last_modified: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
struct HealthBody {
    #[serde(default)]
    message: Option<String>,
}

/// Listings decoded from a file endpoint, with whatever metadata came along.
#[derive(Debug, Clone, PartialEq)]
pub struct FilePayload {
    pub filename: Option<String>,
    pub size_bytes: Option<u64>,
    pub listings: Vec<Listing>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RemoteFile {
    pub name: String,
    pub size_bytes: Option<u64>,
    pub size_mb: Option<f64>,
    pub last_modified: Option<DateTime<FixedOffset>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HealthReport {
    pub message: String,
}

pub fn decode_annonces(body: &str) -> Result<Vec<Listing>, ApiError> {
    let parsed: AnnoncesBody = serde_json::from_str(body)
        .map_err(|e| ApiError::Format(format!("tableau `annonces` attendu ({e})")))?;
    Ok(listings_from_values(parsed.annonces))
}

pub fn decode_file(body: &str) -> Result<FilePayload, ApiError> {
    let parsed: FileBody = serde_json::from_str(body).map_err(|e| {
        ApiError::Format(format!(
            "tableau ou objet avec un champ `content` attendu ({e})"
        ))
    })?;

    match parsed {
        FileBody::Direct(values) => Ok(FilePayload {
            filename: None,
            size_bytes: None,
            listings: listings_from_values(values),
        }),
        FileBody::Envelope(envelope) => Ok(FilePayload {
            filename: envelope.filename,
            size_bytes: envelope.size_bytes,
            listings: decode_content(envelope.content)?,
        }),
    }
}

fn decode_content(content: Content) -> Result<Vec<Listing>, ApiError> {
    match content {
        Content::Listings(values) | Content::Annonces { annonces: values } => {
            Ok(listings_from_values(values))
        }
        Content::Encoded(raw) => match serde_json::from_str::<Content>(&raw) {
            Ok(Content::Listings(values)) | Ok(Content::Annonces { annonces: values }) => {
                Ok(listings_from_values(values))
            }
            Ok(_) => Err(ApiError::Format(
                "le contenu décodé n'est pas une liste d'annonces".into(),
            )),
            Err(e) => {
                // Not JSON after all: keep the raw string, it just isn't listings.
                log::debug!("content string is not JSON, keeping it raw: {e}");
                Err(ApiError::Format(
                    "le champ `content` est une chaîne qui ne contient pas d'annonces".into(),
                ))
            }
        },
        Content::Other(value) => Err(ApiError::Format(format!(
            "champ `content` inattendu ({})",
            json_kind(&value)
        ))),
    }
}

pub fn decode_files(body: &str) -> Result<Vec<RemoteFile>, ApiError> {
    let parsed: FilesBody = serde_json::from_str(body)
        .map_err(|e| ApiError::Format(format!("tableau `files` attendu ({e})")))?;

    Ok(parsed
        .files
        .into_iter()
        .map(|entry| match entry {
            FileEntry::Name(name) => RemoteFile {
                name,
                size_bytes: None,
                size_mb: None,
                last_modified: None,
            },
            FileEntry::Detailed {
                name,
                size,
                size_mb,
                last_modified,
            } => RemoteFile {
                name,
                size_bytes: size,
                size_mb,
                last_modified: last_modified
                    .as_deref()
                    .and_then(|s| DateTime::parse_from_rfc3339(s).ok()),
            },
        })
        .collect())
}

pub fn decode_health(body: &str) -> Result<HealthReport, ApiError> {
    let parsed: HealthBody =
        serde_json::from_str(body).map_err(|e| ApiError::Format(e.to_string()))?;
    Ok(HealthReport {
        message: parsed
            .message
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "Connexion réussie".to_string()),
    })
}

/// Pulls the most useful message out of an error body, if it is JSON.
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["message", "error"]
        .iter()
        .filter_map(|key| value.get(key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

fn listings_from_values(values: Vec<Value>) -> Vec<Listing> {
    let total = values.len();
    let listings: Vec<Listing> = values.into_iter().filter_map(Listing::from_value).collect();
    if listings.len() < total {
        log::warn!(
            "skipped {} non-object entries out of {total}",
            total - listings.len()
        );
    }
    listings
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "booléen",
        Value::Number(_) => "nombre",
        Value::String(_) => "chaîne",
        Value::Array(_) => "tableau",
        Value::Object(_) => "objet",
    }
}
