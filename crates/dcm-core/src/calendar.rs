//! ISO 週曆模型

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::{DcmError, Result};

/// ISO-8601 週（週一為一週的第一天，第 1 週包含該年第一個週四）
///
/// 內部只保存該週的週一日期，ISO 年與週次皆由其推導，
/// 因此不存在無效的 `CalendarWeek`。排序等同於 (iso_year, iso_week) 排序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarWeek {
    monday: NaiveDate,
}

impl CalendarWeek {
    /// 由 ISO 年與週次建立，週次超出該年範圍時返回錯誤
    pub fn new(iso_year: i32, iso_week: u32) -> Result<Self> {
        NaiveDate::from_isoywd_opt(iso_year, iso_week, Weekday::Mon)
            .map(|monday| Self { monday })
            .ok_or(DcmError::InvalidWeek {
                year: iso_year,
                week: iso_week,
            })
    }

    /// 取得任意日期所屬的 ISO 週
    ///
    /// 在 chrono 可表示範圍的最前端，週一可能不存在，此時以 `NaiveDate::MIN` 作為週起點。
    pub fn of(date: NaiveDate) -> Self {
        let offset = date.weekday().num_days_from_monday() as i64;
        Self {
            monday: date
                .checked_sub_signed(Duration::days(offset))
                .unwrap_or(NaiveDate::MIN),
        }
    }

    /// ISO 年（可能與週一所在的日曆年不同）
    pub fn iso_year(&self) -> i32 {
        self.monday.iso_week().year()
    }

    /// ISO 週次（1-53）
    pub fn iso_week(&self) -> u32 {
        self.monday.iso_week().week()
    }

    /// 該週的週一
    pub fn monday(&self) -> NaiveDate {
        self.monday
    }

    /// 該週的週日
    pub fn sunday(&self) -> NaiveDate {
        self.monday + Duration::days(6)
    }

    /// 該週中的指定星期
    pub fn day(&self, weekday: Weekday) -> NaiveDate {
        self.monday + Duration::days(weekday.num_days_from_monday() as i64)
    }

    /// 下一週（跨 ISO 年時自動進位）
    pub fn next(&self) -> Result<Self> {
        self.checked_add_weeks(1)
    }

    /// 前進（或後退）指定週數
    pub fn checked_add_weeks(&self, weeks: i64) -> Result<Self> {
        self.monday
            .checked_add_signed(Duration::weeks(weeks))
            .map(|monday| Self { monday })
            .ok_or_else(|| DcmError::DateOverflow(format!("{} + {} 週", self, weeks)))
    }

    /// 檢查日期是否落在本週
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.monday && date <= self.sunday()
    }
}

impl fmt::Display for CalendarWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.iso_year(), self.iso_week())
    }
}

impl Serialize for CalendarWeek {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("CalendarWeek", 2)?;
        state.serialize_field("isoYear", &self.iso_year())?;
        state.serialize_field("isoWeek", &self.iso_week())?;
        state.end()
    }
}

/// ISO 年的週數（52 或 53）
pub fn weeks_in_year(iso_year: i32) -> u32 {
    if NaiveDate::from_isoywd_opt(iso_year, 53, Weekday::Mon).is_some() {
        53
    } else {
        52
    }
}

/// 解析 API 邊界上的日期字串
///
/// 接受 `YYYY-MM-DD`，完整時間戳則截取 `T` 之前的日期部分。
pub fn parse_boundary_date(raw: &str) -> Result<NaiveDate> {
    let date_part = raw.trim().split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| DcmError::InvalidDateInput(format!("'{}': {}", raw, e)))
}

/// serde 輔助模組：以 `YYYY-MM-DD` 讀寫 `NaiveDate`
pub mod boundary_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        super::parse_boundary_date(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case(date(2021, 1, 1), 2020, 53)]
    #[case(date(2024, 12, 31), 2025, 1)]
    #[case(date(2024, 1, 1), 2024, 1)]
    #[case(date(2023, 1, 1), 2022, 52)]
    #[case(date(2025, 10, 12), 2025, 41)]
    fn test_week_of_date(#[case] input: NaiveDate, #[case] year: i32, #[case] week: u32) {
        let cw = CalendarWeek::of(input);
        assert_eq!(cw.iso_year(), year);
        assert_eq!(cw.iso_week(), week);
        assert!(cw.contains(input));
    }

    #[test]
    fn test_week_of_earliest_dates() {
        for days in 0..7 {
            let input = NaiveDate::MIN + Duration::days(days);
            let cw = CalendarWeek::of(input);
            assert!(cw.monday() >= NaiveDate::MIN);
            assert!(cw.contains(input));
        }
    }

    #[test]
    fn test_new_rejects_out_of_range_week() {
        assert!(CalendarWeek::new(2020, 53).is_ok());
        assert!(matches!(
            CalendarWeek::new(2021, 53),
            Err(DcmError::InvalidWeek { year: 2021, week: 53 })
        ));
        assert!(CalendarWeek::new(2024, 0).is_err());
        assert!(CalendarWeek::new(2024, 54).is_err());
    }

    #[test]
    fn test_next_rolls_over_year() {
        let last = CalendarWeek::new(2020, 53).unwrap();
        let next = last.next().unwrap();
        assert_eq!((next.iso_year(), next.iso_week()), (2021, 1));
        assert_eq!(next.monday(), date(2021, 1, 4));
    }

    #[test]
    fn test_weeks_in_year() {
        assert_eq!(weeks_in_year(2020), 53);
        assert_eq!(weeks_in_year(2021), 52);
        assert_eq!(weeks_in_year(2024), 52);
        assert_eq!(weeks_in_year(2026), 53);
    }

    #[test]
    fn test_display() {
        let cw = CalendarWeek::new(2024, 1).unwrap();
        assert_eq!(cw.to_string(), "2024-W01");
    }

    #[rstest]
    #[case("2024-01-08", date(2024, 1, 8))]
    #[case("2024-01-08T00:00:00.000Z", date(2024, 1, 8))]
    #[case(" 2023-12-25 ", date(2023, 12, 25))]
    fn test_parse_boundary_date(#[case] raw: &str, #[case] expected: NaiveDate) {
        assert_eq!(parse_boundary_date(raw).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("2024-13-01")]
    #[case("08/01/2024")]
    #[case("not-a-date")]
    fn test_parse_boundary_date_rejects(#[case] raw: &str) {
        assert!(matches!(
            parse_boundary_date(raw),
            Err(DcmError::InvalidDateInput(_))
        ));
    }
}
