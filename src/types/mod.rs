mod agent;
mod message;

pub use agent::AgentDraft;
pub use message::{ChatMessage, ChatReply, Role};
