//! 週序列彙總

use dcm_core::{AggregatedSeries, WeekTotals, WeeklyQuantity};

use crate::month_grid::WeekGrid;

/// 週序列彙總器
pub struct SeriesAggregator;

impl SeriesAggregator {
    /// 依呼叫方提供的鍵分組，並把同一 (ISO 年, ISO 週) 的數量相加
    pub fn aggregate<T, K, F>(values: &[T], key_fn: F) -> AggregatedSeries<K>
    where
        T: WeeklyQuantity,
        K: Ord,
        F: Fn(&T) -> K,
    {
        let mut aggregated = AggregatedSeries::new();

        for value in values {
            aggregated.add(key_fn(value), value.calendar_week(), value.quantity());
        }

        tracing::debug!("彙總 {} 筆週資料，{} 個分組", values.len(), aggregated.len());
        aggregated
    }

    /// 只彙總落在表頭週內的資料
    pub fn aggregate_within<T, K, F>(values: &[T], key_fn: F, grid: &WeekGrid) -> AggregatedSeries<K>
    where
        T: WeeklyQuantity,
        K: Ord,
        F: Fn(&T) -> K,
    {
        let mut aggregated = AggregatedSeries::new();

        for value in values {
            let week = value.calendar_week();
            if grid.contains(week) {
                aggregated.add(key_fn(value), week, value.quantity());
            }
        }

        aggregated
    }

    /// 不分組的週合計
    pub fn totals<T: WeeklyQuantity>(values: &[T]) -> WeekTotals {
        let mut totals = WeekTotals::new();
        for value in values {
            totals.add(value.calendar_week(), value.quantity());
        }
        totals
    }

    /// 逐週計算 actual - planned（任一方缺少的週視為 0）
    pub fn delta(actual: &WeekTotals, planned: &WeekTotals) -> WeekTotals {
        actual.combine(planned, |a, p| a - p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::month_grid::MonthWeekGridBuilder;
    use chrono::NaiveDate;
    use dcm_core::{CalendarWeek, DemandSeriesValue, SeriesValue};
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    fn week(year: i32, week: u32) -> CalendarWeek {
        CalendarWeek::new(year, week).unwrap()
    }

    fn value(year: i32, w: u32, quantity: i64) -> SeriesValue {
        SeriesValue::new(week(year, w), Decimal::from(quantity))
    }

    #[test]
    fn test_sum_not_overwrite() {
        let values = vec![value(2024, 10, 3), value(2024, 10, 4)];
        let aggregated = SeriesAggregator::aggregate(&values, |_| "total");

        assert_eq!(aggregated.cell(&"total", week(2024, 10)), Decimal::from(7));
    }

    #[test]
    fn test_group_by_key() {
        let values = vec![
            Keyed { key: 1, value: value(2024, 1, 10) },
            Keyed { key: 2, value: value(2024, 1, 20) },
            Keyed { key: 1, value: value(2024, 2, 5) },
        ];
        let aggregated = SeriesAggregator::aggregate(&values, |k| k.key);

        assert_eq!(aggregated.len(), 2);
        assert_eq!(aggregated.cell(&1, week(2024, 1)), Decimal::from(10));
        assert_eq!(aggregated.cell(&1, week(2024, 2)), Decimal::from(5));
        assert_eq!(aggregated.cell(&2, week(2024, 1)), Decimal::from(20));
    }

    struct Keyed {
        key: u8,
        value: SeriesValue,
    }

    impl WeeklyQuantity for Keyed {
        fn calendar_week(&self) -> CalendarWeek {
            self.value.week
        }

        fn quantity(&self) -> Decimal {
            self.value.quantity
        }
    }

    #[test]
    fn test_empty_series() {
        let values: Vec<SeriesValue> = Vec::new();
        let aggregated = SeriesAggregator::aggregate(&values, |_| "total");

        assert!(aggregated.is_empty());
        assert!(SeriesAggregator::totals(&values).is_empty());
    }

    #[test]
    fn test_idempotent() {
        let values = vec![value(2024, 1, 1), value(2024, 1, 2), value(2025, 3, 9)];

        let first = SeriesAggregator::aggregate(&values, |_| "total");
        let second = SeriesAggregator::aggregate(&values, |_| "total");
        assert_eq!(first, second);
    }

    #[test]
    fn test_boundary_records_by_monday() {
        let values = vec![
            DemandSeriesValue::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), Decimal::from(10)),
            DemandSeriesValue::new(NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(), Decimal::from(5)),
        ];

        let aggregated = SeriesAggregator::aggregate(&values, |_| "total");
        let total = aggregated.get(&"total").unwrap();

        assert_eq!(total.get_by_number(2024, 1), Decimal::from(10));
        assert_eq!(total.get_by_number(2024, 2), Decimal::from(5));
        assert_eq!(total.len(), 2);
    }

    #[test]
    fn test_aggregate_within_grid() {
        let grid = MonthWeekGridBuilder::default()
            .build(
                NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            )
            .unwrap();
        let values = vec![value(2024, 2, 1), value(2024, 20, 1), value(2023, 52, 1)];

        let aggregated = SeriesAggregator::aggregate_within(&values, |_| (), &grid);
        let total = aggregated.get(&()).unwrap();

        assert_eq!(total.len(), 1);
        assert_eq!(total.get(week(2024, 2)), Decimal::ONE);
    }

    #[test]
    fn test_delta_union() {
        let actual = SeriesAggregator::totals(&[value(2024, 1, 10), value(2024, 2, 4)]);
        let planned = SeriesAggregator::totals(&[value(2024, 2, 6), value(2024, 3, 1)]);

        let delta = SeriesAggregator::delta(&actual, &planned);

        assert_eq!(delta.get(week(2024, 1)), Decimal::from(10));
        assert_eq!(delta.get(week(2024, 2)), Decimal::from(-2));
        assert_eq!(delta.get(week(2024, 3)), Decimal::from(-1));
        assert_eq!(delta.len(), 3);
    }

    fn arb_totals() -> impl Strategy<Value = WeekTotals> {
        prop::collection::vec((2023i32..=2025, 1u32..=52, -1_000i64..1_000), 0..20).prop_map(
            |entries| {
                let values: Vec<SeriesValue> = entries
                    .into_iter()
                    .map(|(y, w, q)| value(y, w, q))
                    .collect();
                SeriesAggregator::totals(&values)
            },
        )
    }

    proptest! {
        #[test]
        fn prop_delta_antisymmetric(a in arb_totals(), b in arb_totals()) {
            let forward = SeriesAggregator::delta(&a, &b);
            let backward = SeriesAggregator::delta(&b, &a);

            prop_assert_eq!(forward.len(), backward.len());
            for (year, week, quantity) in forward.iter() {
                prop_assert_eq!(quantity, -backward.get_by_number(year, week));
            }
        }
    }
}
