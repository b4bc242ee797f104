//! 產能檢查（需求 vs 實際/最大產能）

use dcm_core::{CalendarWeek, CapacityValue, WeekTotals};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::aggregation::SeriesAggregator;

/// 週產能狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CapacityStatus {
    /// 需求不超過實際產能
    Sufficient,
    /// 需求超過實際產能，但未超過最大產能
    AboveActual,
    /// 需求超過最大產能
    AboveMaximum,
}

/// 單週產能比較
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekCapacity {
    pub week: CalendarWeek,
    pub demand: Decimal,
    pub actual_capacity: Decimal,
    pub maximum_capacity: Decimal,
}

impl WeekCapacity {
    pub fn status(&self) -> CapacityStatus {
        if self.demand > self.maximum_capacity {
            CapacityStatus::AboveMaximum
        } else if self.demand > self.actual_capacity {
            CapacityStatus::AboveActual
        } else {
            CapacityStatus::Sufficient
        }
    }

    /// 實際產能 - 需求（負值表示不足）
    pub fn actual_headroom(&self) -> Decimal {
        self.actual_capacity - self.demand
    }

    /// 最大產能 - 需求
    pub fn maximum_headroom(&self) -> Decimal {
        self.maximum_capacity - self.demand
    }
}

/// 產能檢查器
pub struct CapacityCheck;

impl CapacityCheck {
    /// 逐週比較需求合計與產能，涵蓋任一方出現的週
    pub fn evaluate(
        demand: &WeekTotals,
        capacities: &[CapacityValue],
    ) -> BTreeMap<CalendarWeek, WeekCapacity> {
        let actual = SeriesAggregator::totals(
            &capacities.iter().map(CapacityValue::actual).collect::<Vec<_>>(),
        );
        let maximum = SeriesAggregator::totals(
            &capacities.iter().map(CapacityValue::maximum).collect::<Vec<_>>(),
        );

        let weeks: BTreeSet<CalendarWeek> = demand
            .weeks()
            .chain(actual.weeks())
            .chain(maximum.weeks())
            .collect();

        let result: BTreeMap<CalendarWeek, WeekCapacity> = weeks
            .into_iter()
            .map(|week| {
                (
                    week,
                    WeekCapacity {
                        week,
                        demand: demand.get(week),
                        actual_capacity: actual.get(week),
                        maximum_capacity: maximum.get(week),
                    },
                )
            })
            .collect();

        let overloaded = result
            .values()
            .filter(|c| c.status() == CapacityStatus::AboveMaximum)
            .count();
        if overloaded > 0 {
            tracing::debug!("產能檢查：{} 週需求超過最大產能", overloaded);
        }

        result
    }
}
