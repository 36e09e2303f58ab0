mod backend;
mod error;
mod http;

pub use backend::AgentBackend;
pub use error::{ApiError, ApiResult};
pub use http::HttpBackend;
