//! # DCM Cache
//!
//! 記憶化與編輯追蹤模組

pub mod dirty_tracking;
pub mod memo;

// Re-export 主要類型
pub use dirty_tracking::DirtyTracker;
pub use memo::GridMemo;
