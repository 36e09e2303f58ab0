use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::config::{ServerConfig, Settings};
use crate::types::{AgentDraft, ChatMessage, ChatReply};

use super::backend::AgentBackend;
use super::error::{ApiError, ApiResult};

/// 基于 reqwest 的后端实现
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &ServerConfig) -> ApiResult<Self> {
        reqwest::Url::parse(&config.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", config.base_url, e)))?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(HttpBackend {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// 发送请求并返回响应正文，非 2xx 状态归为 `ApiError::Status`
    async fn send(&self, request: RequestBuilder) -> ApiResult<String> {
        let response = request.send().await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            tracing::debug!(%status, body = %text, "backend returned non-success status");
            return Err(ApiError::Status { status, body: text });
        }

        Ok(text)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let text = self.send(request).await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::Decode(format!("{}，原始内容：{}", e, text)))
    }
}

#[async_trait]
impl AgentBackend for HttpBackend {
    async fn list_agents(&self) -> ApiResult<Vec<String>> {
        self.send_json(self.client.get(self.url("agents"))).await
    }

    async fn history(&self, agent: &str) -> ApiResult<Vec<ChatMessage>> {
        let request = self.client.get(self.url("history")).query(&[("name", agent)]);
        self.send_json(request).await
    }

    async fn chat(&self, agent: &str, message: &str, settings: &Settings) -> ApiResult<String> {
        let request = self.client.post(self.url("chat")).query(&[
            ("name", agent),
            ("message", message),
            ("model", settings.model.as_str()),
            ("api_key", settings.api_key.as_str()),
        ]);
        let reply: ChatReply = self.send_json(request).await?;
        Ok(reply.reply)
    }

    async fn spawn(&self, draft: &AgentDraft) -> ApiResult<()> {
        self.send(self.client.post(self.url("spawn")).json(draft))
            .await
            .map(|_| ())
    }
}
