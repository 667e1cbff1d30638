pub mod auth;
pub mod response;

pub use auth::extract_caller_id;
pub use response::{ApiResponse, ApiResult};
