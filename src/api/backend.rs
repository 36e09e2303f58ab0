use async_trait::async_trait;

use crate::config::Settings;
use crate::types::{AgentDraft, ChatMessage};

use super::error::ApiResult;

/// 控制器与 agent 服务之间的接口
#[async_trait]
pub trait AgentBackend: Send + Sync {
    /// GET /agents
    async fn list_agents(&self) -> ApiResult<Vec<String>>;

    /// GET /history?name=
    async fn history(&self, agent: &str) -> ApiResult<Vec<ChatMessage>>;

    /// POST /chat?name=&message=&model=&api_key=，返回回复文本
    async fn chat(&self, agent: &str, message: &str, settings: &Settings) -> ApiResult<String>;

    /// POST /spawn
    async fn spawn(&self, draft: &AgentDraft) -> ApiResult<()>;
}
