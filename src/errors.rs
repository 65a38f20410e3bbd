// errors.rs
use crate::client::ApiError;
use astra::Response;
use thiserror::Error;

/// Errors originating from either the server logic
/// (routing, missing resources, etc.) or downstream layers (DB, remote API).
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Page introuvable")]
    NotFound,
    #[error("Requête invalide : {0}")]
    BadRequest(String),
    #[error("Erreur de base de données : {0}")]
    DbError(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("Erreur d'export : {0}")]
    XlsxError(String),
    #[error("Erreur interne du serveur")]
    InternalError,
}

impl ServerError {
    pub fn status_code(&self) -> u16 {
        match self {
            ServerError::NotFound => 404,
            ServerError::BadRequest(_) => 400,
            ServerError::Api(_) => 502,
            ServerError::DbError(_) | ServerError::XlsxError(_) | ServerError::InternalError => 500,
        }
    }
}

// Type alias commonly used by route handlers.
pub type ResultResp = Result<Response, ServerError>;
