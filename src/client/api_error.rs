use thiserror::Error;

/// Failures talking to the listings API.
///
/// `Network` and `Status` are both network-class failures (nothing usable
/// came back); `Format` means a response arrived but its shape is unknown.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Erreur réseau : {0}")]
    Network(String),
    #[error("HTTP {status} : {message}")]
    Status { status: u16, message: String },
    #[error("Format de données invalide : {0}")]
    Format(String),
    #[error("Configuration invalide : {0}")]
    Config(String),
}

impl ApiError {
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_) | ApiError::Status { .. })
    }

    pub fn is_format(&self) -> bool {
        matches!(self, ApiError::Format(_))
    }
}
