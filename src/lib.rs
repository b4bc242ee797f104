//! # DCM
//!
//! 需求產能管理（Demand Capacity Management）週表格引擎
//!
//! - [`model`]：資料模型、錯誤類型與配置
//! - [`calc`]：ISO 週計算、月/週表頭、週序列彙總
//! - [`cache`]：記憶化與編輯追蹤
//! - [`client`]：遠端 API 服務物件與重試策略
//! - [`editor`]：週需求編輯流程

pub use dcm_cache as cache;
pub use dcm_calc as calc;
pub use dcm_client as client;
pub use dcm_editor as editor;
pub use dcm_core as model;

/// 常用類型
pub mod prelude {
    pub use dcm_cache::{DirtyTracker, GridMemo};
    pub use dcm_calc::{
        CapacityCheck, CapacityStatus, MonthBucket, MonthWeekGridBuilder, SeriesAggregator, WeekGrid,
        WeekMath,
    };
    pub use dcm_client::{ApiError, DemandCapacityApi, DemandStore, InMemoryApi, RetryPolicy};
    pub use dcm_core::{
        AggregatedSeries, CalendarWeek, CapacityGroup, CapacityValue, DcmConfig, DcmError,
        DemandCategory, DemandSeries, DemandSeriesValue, MaterialDemand, SeriesValue, WeekTotals,
    };
    pub use dcm_editor::{EditState, EditorError, WeeklyDemandEditor};
}
