mod api;
mod api_error;
pub mod payload;

pub use api::{parse_base_url, ApiClient};
pub use api_error::ApiError;
pub use payload::RemoteFile;
