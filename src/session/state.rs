use crate::config::{Config, Settings};
use crate::types::{AgentDraft, ChatMessage};

/// 会话状态，由 `ChatController` 独占持有
#[derive(Debug, Clone)]
pub struct SessionState {
    pub active_agent: String,
    /// 已知 agent，保持顺序且不重复
    pub agents: Vec<String>,
    pub messages: Vec<ChatMessage>,
    pub input: String,
    /// 只在请求进行期间为 true
    pub loading: bool,
    pub settings: Settings,
    pub draft: AgentDraft,
    pub show_spawn: bool,
    pub show_settings: bool,
    pub sidebar_open: bool,
    default_boss: String,
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::new("Main", "Main", Settings::default())
    }
}

impl SessionState {
    pub fn new(active_agent: &str, default_boss: &str, settings: Settings) -> Self {
        SessionState {
            active_agent: active_agent.to_string(),
            agents: vec![active_agent.to_string()],
            messages: Vec::new(),
            input: String::new(),
            loading: false,
            settings,
            draft: AgentDraft::empty(default_boss),
            show_spawn: false,
            show_settings: false,
            sidebar_open: true,
            default_boss: default_boss.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        SessionState::new(
            &config.session.default_agent,
            &config.session.default_boss,
            config.settings.clone(),
        )
    }

    /// 用新列表替换 agent 列表，重复项只保留第一次出现
    pub fn replace_agents(&mut self, agents: Vec<String>) {
        let mut unique: Vec<String> = Vec::with_capacity(agents.len());
        for name in agents {
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        self.agents = unique;
    }

    /// 追加 agent，已存在则忽略
    pub fn add_agent(&mut self, name: &str) {
        if !self.has_agent(name) {
            self.agents.push(name.to_string());
        }
    }

    pub fn has_agent(&self, name: &str) -> bool {
        self.agents.iter().any(|a| a == name)
    }

    pub fn reset_draft(&mut self) {
        self.draft = AgentDraft::empty(self.default_boss.clone());
    }

    pub fn default_boss(&self) -> &str {
        &self.default_boss
    }
}
