use crate::api::{AgentBackend, ApiError, ApiResult};
use crate::types::ChatMessage;

use super::state::SessionState;

/// 发送失败时追加的占位回复
pub const CONNECTION_LOST: &str = "❌ Connection Lost.";

/// `send_message` 的结果
#[derive(Debug)]
pub enum SendOutcome {
    /// 输入为空或已有请求在进行，什么都没做
    Skipped,
    Replied,
    /// 已追加占位回复
    Failed(ApiError),
}

/// `spawn_agent` 的结果
#[derive(Debug)]
pub enum SpawnOutcome {
    /// 草稿名为空，未发请求
    Skipped,
    Spawned(String),
    /// 对话框和草稿保持原样
    Failed(ApiError),
}

/// 会话控制器：把用户操作转换为后端请求，并根据响应更新状态
pub struct ChatController<B: AgentBackend> {
    backend: B,
    state: SessionState,
}

impl<B: AgentBackend> ChatController<B> {
    pub fn new(backend: B, state: SessionState) -> Self {
        ChatController { backend, state }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// 启动时调用：关闭对话框，拉取 agent 列表，加载当前 agent 的历史
    pub async fn bootstrap(&mut self) {
        self.state.show_spawn = false;
        self.state.show_settings = false;

        tracing::info!("discovering agents");
        let _ = self.refresh_agents().await;
        let active = self.state.active_agent.clone();
        let _ = self.load_history(&active).await;
    }

    /// 刷新 agent 列表，失败时保留原列表
    pub async fn refresh_agents(&mut self) -> ApiResult<()> {
        match self.backend.list_agents().await {
            Ok(agents) => {
                self.state.replace_agents(agents);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "agent discovery failed");
                Err(e)
            }
        }
    }

    /// 切换到 `name` 并加载其历史，失败时清空消息
    pub async fn load_history(&mut self, name: &str) -> ApiResult<()> {
        self.state.active_agent = name.to_string();
        self.state.loading = true;

        let result = self.backend.history(name).await;
        let outcome = match result {
            Ok(messages) => {
                self.state.messages = messages;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(agent = name, error = %e, "history load failed");
                self.state.messages = Vec::new();
                Err(e)
            }
        };

        self.state.loading = false;
        outcome
    }

    /// 发送当前输入框内容
    pub async fn send_message(&mut self) -> SendOutcome {
        if self.state.input.trim().is_empty() || self.state.loading {
            return SendOutcome::Skipped;
        }

        let text = std::mem::take(&mut self.state.input);
        self.state.messages.push(ChatMessage::user(text.clone()));
        self.state.loading = true;

        let result = self
            .backend
            .chat(&self.state.active_agent, &text, &self.state.settings)
            .await;
        let outcome = match result {
            Ok(reply) => {
                self.state.messages.push(ChatMessage::assistant(reply));
                SendOutcome::Replied
            }
            Err(e) => {
                tracing::warn!(
                    agent = %self.state.active_agent,
                    error = %e,
                    "chat request failed"
                );
                self.state.messages.push(ChatMessage::assistant(CONNECTION_LOST));
                SendOutcome::Failed(e)
            }
        };

        self.state.loading = false;
        outcome
    }

    /// 提交新建 agent 草稿
    ///
    /// 成功后以服务端列表为准；若列表刷新失败或仍不含新名字则在本地补上。
    /// 失败时草稿和对话框不动，错误交给调用方展示。
    pub async fn spawn_agent(&mut self) -> SpawnOutcome {
        if self.state.draft.is_blank() {
            return SpawnOutcome::Skipped;
        }

        let draft = self.state.draft.clone();
        if let Err(e) = self.backend.spawn(&draft).await {
            tracing::warn!(agent = %draft.name, error = %e, "spawn failed");
            return SpawnOutcome::Failed(e);
        }

        let _ = self.refresh_agents().await;
        self.state.add_agent(&draft.name);
        self.state.reset_draft();
        self.state.show_spawn = false;

        tracing::info!(agent = %draft.name, boss = %draft.boss, "agent spawned");
        SpawnOutcome::Spawned(draft.name)
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.state.input = text.into();
    }

    pub fn open_spawn_dialog(&mut self) {
        self.state.show_spawn = true;
    }

    pub fn close_spawn_dialog(&mut self) {
        self.state.show_spawn = false;
    }

    pub fn open_settings(&mut self) {
        self.state.show_settings = true;
    }

    pub fn close_settings(&mut self) {
        self.state.show_settings = false;
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.state.sidebar_open = !self.state.sidebar_open;
        self.state.sidebar_open
    }

    pub fn set_model(&mut self, model: impl Into<String>) {
        self.state.settings.model = model.into();
    }

    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        self.state.settings.api_key = api_key.into();
    }
}
