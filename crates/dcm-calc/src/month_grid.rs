//! 月/週表頭生成

use chrono::{Datelike, NaiveDate, Weekday};
use dcm_core::{BoundaryPolicy, CalendarWeek, DcmError, GridConfig};
use serde::Serialize;

use crate::week_math::WeekMath;

/// 月份桶：某 (年, 月) 所屬的 ISO 週
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthBucket {
    /// 月份名稱（英文全名）
    pub month_name: String,
    /// 日曆年
    pub year: i32,
    /// 月份（1-12）
    pub month: u32,
    /// 歸屬本月的 ISO 週（遞增）
    pub weeks: Vec<CalendarWeek>,
}

impl MonthBucket {
    fn empty(year: i32, month: u32) -> dcm_core::Result<Self> {
        let first_day = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| DcmError::InvalidDateInput(format!("{}-{:02}", year, month)))?;
        Ok(Self {
            month_name: first_day.format("%B").to_string(),
            year,
            month,
            weeks: Vec::new(),
        })
    }

    /// 從 0 起算的月份索引（0-11）
    pub fn month_index(&self) -> u32 {
        self.month - 1
    }

    /// 週次數字（表頭顯示用）
    pub fn week_numbers(&self) -> Vec<u32> {
        self.weeks.iter().map(CalendarWeek::iso_week).collect()
    }

    pub fn contains(&self, week: CalendarWeek) -> bool {
        self.weeks.contains(&week)
    }
}

/// 年份表頭跨度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSpan {
    /// 日曆年
    pub year: i32,
    /// 該年所有月份桶的週數總和
    pub week_count: usize,
}

/// 依月份桶計算年份表頭跨度
pub fn year_spans(buckets: &[MonthBucket]) -> Vec<YearSpan> {
    let mut spans: Vec<YearSpan> = Vec::new();

    for bucket in buckets {
        match spans.last_mut() {
            Some(span) if span.year == bucket.year => span.week_count += bucket.weeks.len(),
            _ => spans.push(YearSpan {
                year: bucket.year,
                week_count: bucket.weeks.len(),
            }),
        }
    }

    spans
}

/// 完整的週表頭
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekGrid {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub buckets: Vec<MonthBucket>,
    pub year_spans: Vec<YearSpan>,
}

impl WeekGrid {
    /// 依表頭順序迭代所有週
    pub fn weeks(&self) -> impl Iterator<Item = CalendarWeek> + '_ {
        self.buckets.iter().flat_map(|bucket| bucket.weeks.iter().copied())
    }

    pub fn contains(&self, week: CalendarWeek) -> bool {
        self.buckets.iter().any(|bucket| bucket.contains(week))
    }

    pub fn week_count(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.weeks.len()).sum()
    }
}

/// 月/週表頭生成器
#[derive(Debug, Clone, Copy, Default)]
pub struct MonthWeekGridBuilder {
    policy: BoundaryPolicy,
}

impl MonthWeekGridBuilder {
    pub fn new(policy: BoundaryPolicy) -> Self {
        Self { policy }
    }

    pub fn from_config(config: &GridConfig) -> Self {
        Self::new(config.boundary_policy)
    }

    /// 生成 [start, end] 範圍內每個日曆月的週桶
    ///
    /// 每個與範圍有交集的 ISO 週恰好歸屬一個月份桶：
    /// 跨月週依策略決定月份；若該月份不在範圍內，歸入最近的首/尾月份桶。
    /// 範圍內的月份即使沒有分到週也會保留。
    pub fn build_range(&self, start: NaiveDate, end: NaiveDate) -> dcm_core::Result<Vec<MonthBucket>> {
        let weeks = WeekMath::weeks_between(start, end)?;

        let first = (start.year(), start.month());
        let last = (end.year(), end.month());

        let mut buckets = Vec::new();
        let mut current = first;
        while current <= last {
            buckets.push(MonthBucket::empty(current.0, current.1)?);
            current = next_month(current);
        }

        for week in weeks {
            let target = self.owning_month(week).clamp(first, last);
            let index = months_apart(first, target);
            buckets[index].weeks.push(week);
        }

        tracing::debug!(
            "月/週表頭: {} ~ {}，{} 個月份桶，策略 {:?}",
            start,
            end,
            buckets.len(),
            self.policy
        );

        Ok(buckets)
    }

    /// 生成含年份跨度的完整表頭
    pub fn build(&self, start: NaiveDate, end: NaiveDate) -> dcm_core::Result<WeekGrid> {
        let buckets = self.build_range(start, end)?;
        let year_spans = year_spans(&buckets);
        Ok(WeekGrid {
            start,
            end,
            buckets,
            year_spans,
        })
    }

    /// 依策略決定週的歸屬月份
    fn owning_month(&self, week: CalendarWeek) -> (i32, u32) {
        let anchor = match self.policy {
            BoundaryPolicy::LaterDays => week.sunday(),
            BoundaryPolicy::IsoThursday => week.day(Weekday::Thu),
        };
        (anchor.year(), anchor.month())
    }
}

fn next_month((year, month): (i32, u32)) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

fn months_apart(from: (i32, u32), to: (i32, u32)) -> usize {
    ((to.0 - from.0) * 12 + to.1 as i32 - from.1 as i32) as usize
}
