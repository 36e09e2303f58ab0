pub mod api;
pub mod cli;
pub mod config;
pub mod session;
pub mod types;
pub mod view;

pub use api::{AgentBackend, ApiError, ApiResult, HttpBackend};
pub use cli::run_cli;
pub use config::{Config, ServerConfig, SessionConfig, Settings};
pub use session::{ChatController, SendOutcome, SessionState, SpawnOutcome};
