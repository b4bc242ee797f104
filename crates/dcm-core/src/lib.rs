//! # DCM Core
//!
//! 需求產能管理（Demand Capacity Management）核心資料模型與類型定義

pub mod calendar;
pub mod capacity;
pub mod config;
pub mod demand;
pub mod series;

// Re-export 主要類型
pub use calendar::{boundary_date, parse_boundary_date, weeks_in_year, CalendarWeek};
pub use capacity::{CapacityGroup, CapacityValue, LinkedDemandSeries};
pub use config::{BoundaryPolicy, DcmConfig, GridConfig, RetrySettings};
pub use demand::{CategoryValue, DemandCategory, DemandSeries, DemandSeriesValue, MaterialDemand};
pub use series::{AggregatedSeries, SeriesValue, WeekTotals, WeeklyQuantity};

/// DCM 錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum DcmError {
    #[error("無效的日期輸入: {0}")]
    InvalidDateInput(String),

    #[error("無效的 ISO 週次: {year}-W{week:02}")]
    InvalidWeek { year: i32, week: u32 },

    #[error("無效的日期範圍: {start} 晚於 {end}")]
    InvalidRange {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
    },

    #[error("日期溢出: {0}")]
    DateOverflow(String),

    #[error("配置錯誤: {0}")]
    Config(String),

    #[error("序列化錯誤: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DcmError>;
