//! # DCM Calculation
//!
//! ISO 週計算、月/週表頭生成與週序列彙總

pub mod aggregation;
pub mod capacity;
pub mod month_grid;
pub mod week_math;

// Re-export 主要類型
pub use aggregation::SeriesAggregator;
pub use capacity::{CapacityCheck, CapacityStatus, WeekCapacity};
pub use month_grid::{year_spans, MonthBucket, MonthWeekGridBuilder, WeekGrid, YearSpan};
pub use week_math::WeekMath;
