//! # DCM Editor
//!
//! 週需求編輯流程（檢視 → 編輯 → 儲存）

pub mod editor;

// Re-export 主要類型
pub use editor::{EditState, WeeklyDemandEditor};

use dcm_client::ApiError;
use dcm_core::DcmError;
use uuid::Uuid;

/// 編輯器錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("目前狀態 {state:?} 不允許 {action}")]
    InvalidTransition {
        state: EditState,
        action: &'static str,
    },

    #[error("需求類別不存在: {0}")]
    UnknownCategory(Uuid),

    #[error("需求類別 {category} 對應 {series} 個序列，請指定序列")]
    AmbiguousCategory { category: Uuid, series: usize },

    #[error("需求序列不存在: #{0}")]
    UnknownSeries(usize),

    #[error("儲存失敗: {0}")]
    Api(#[from] ApiError),

    #[error(transparent)]
    Core(#[from] DcmError),
}

pub type Result<T> = std::result::Result<T, EditorError>;
