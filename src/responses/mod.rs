pub mod errors;
pub mod html;
pub mod xlsx;

pub use crate::errors::ResultResp;
pub use errors::html_error_response;

pub use html::{
    css_response, html_push_url_response, html_response, js_response, redirect_response,
};
pub use xlsx::xlsx_response;
