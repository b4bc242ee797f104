//! # DCM Client
//!
//! 遠端 REST API 的服務物件、重試策略與本地後端

pub mod api;
pub mod memory;
pub mod retry;
pub mod store;

// Re-export 主要類型
pub use api::DemandCapacityApi;
pub use memory::InMemoryApi;
pub use retry::{RetryPolicy, Sleeper, ThreadSleeper};
pub use store::DemandStore;

/// 遠端 API 錯誤類型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("網路錯誤: {0}")]
    Network(String),

    #[error("未授權或權杖已過期")]
    Unauthorized,

    #[error("找不到資源: {0}")]
    NotFound(String),

    #[error("伺服器回應 {status}: {message}")]
    Status { status: u16, message: String },

    #[error("回應解析失敗: {0}")]
    Decode(String),

    #[error("服務已關閉（已登出或尚未初始化）")]
    StoreClosed,
}

impl ApiError {
    /// 是否值得重試（網路錯誤與 5xx）
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Network(_) => true,
            ApiError::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
