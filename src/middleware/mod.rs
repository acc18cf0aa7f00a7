pub mod auth;
pub mod response;

pub use auth::{access_guard, AuthUser};
pub use response::{ApiResponse, ApiResult};
