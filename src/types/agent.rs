use serde::{Deserialize, Serialize};

/// 新建 agent 的草稿，直接作为 /spawn 的请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentDraft {
    pub name: String,
    /// 人设
    pub soul: String,
    /// 上级 agent
    pub boss: String,
}

impl AgentDraft {
    pub fn empty(boss: impl Into<String>) -> Self {
        AgentDraft {
            name: String::new(),
            soul: String::new(),
            boss: boss.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty()
    }
}
