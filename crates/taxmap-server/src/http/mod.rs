mod api_error;
pub(crate) mod handlers;

pub use api_error::{ApiError, ApiErrorCode};
