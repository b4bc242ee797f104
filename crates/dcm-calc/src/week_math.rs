//! ISO 週次換算

use chrono::NaiveDate;
use dcm_core::{parse_boundary_date, CalendarWeek, DcmError};

/// ISO 週次計算器
pub struct WeekMath;

impl WeekMath {
    /// 日期所屬的 ISO 週（12 月底可能屬於下一年第 1 週，1 月初可能屬於上一年最後一週）
    pub fn iso_week_of(date: NaiveDate) -> CalendarWeek {
        CalendarWeek::of(date)
    }

    /// 解析 API 邊界日期字串並取得所屬 ISO 週
    pub fn iso_week_of_str(raw: &str) -> dcm_core::Result<CalendarWeek> {
        parse_boundary_date(raw).map(CalendarWeek::of)
    }

    /// ISO 週的週一
    ///
    /// 週次超出該年範圍（0、54 或非 53 週年份的第 53 週）時返回錯誤，不做夾取。
    pub fn monday_of(iso_year: i32, iso_week: u32) -> dcm_core::Result<NaiveDate> {
        CalendarWeek::new(iso_year, iso_week).map(|week| week.monday())
    }

    /// 與閉區間 [start, end] 有交集的所有 ISO 週（遞增）
    pub fn weeks_between(start: NaiveDate, end: NaiveDate) -> dcm_core::Result<Vec<CalendarWeek>> {
        if start > end {
            return Err(DcmError::InvalidRange { start, end });
        }

        let mut weeks = Vec::new();
        let mut current = CalendarWeek::of(start);

        while current.monday() <= end {
            weeks.push(current);
            current = current.next()?;
        }

        Ok(weeks)
    }
}
