use reqwest::StatusCode;

/// 后端调用失败的分类
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("连接后端失败：{0}")]
    Transport(String),

    #[error("后端返回错误：{status} - {body}")]
    Status { status: StatusCode, body: String },

    #[error("解析响应失败：{0}")]
    Decode(String),

    #[error("无效的地址：{0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// 网络层面的失败（请求根本没有拿到响应）
    pub fn is_connectivity(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Decode(err.to_string())
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
