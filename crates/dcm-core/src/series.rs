//! 週序列與彙總結果模型

use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::calendar::CalendarWeek;

/// 帶週次的數量（需求量、產能）
pub trait WeeklyQuantity {
    /// 所屬 ISO 週
    fn calendar_week(&self) -> CalendarWeek;

    /// 數量
    fn quantity(&self) -> Decimal;
}

/// 週序列值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesValue {
    /// ISO 週
    pub week: CalendarWeek,
    /// 數量
    pub quantity: Decimal,
}

impl SeriesValue {
    pub fn new(week: CalendarWeek, quantity: Decimal) -> Self {
        Self { week, quantity }
    }
}

impl WeeklyQuantity for SeriesValue {
    fn calendar_week(&self) -> CalendarWeek {
        self.week
    }

    fn quantity(&self) -> Decimal {
        self.quantity
    }
}

/// 單一序列的週彙總：ISO 年 → ISO 週 → 合計
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WeekTotals(BTreeMap<i32, BTreeMap<u32, Decimal>>);

impl WeekTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// 累加到指定週（同週多筆時相加，不覆蓋）
    pub fn add(&mut self, week: CalendarWeek, quantity: Decimal) {
        *self
            .0
            .entry(week.iso_year())
            .or_default()
            .entry(week.iso_week())
            .or_insert(Decimal::ZERO) += quantity;
    }

    /// 設置指定週的值（覆蓋）
    pub fn set(&mut self, week: CalendarWeek, quantity: Decimal) {
        self.0
            .entry(week.iso_year())
            .or_default()
            .insert(week.iso_week(), quantity);
    }

    /// 查詢指定週，缺少時為 0
    pub fn get(&self, week: CalendarWeek) -> Decimal {
        self.get_by_number(week.iso_year(), week.iso_week())
    }

    /// 依 (年, 週次) 查詢，缺少時為 0
    pub fn get_by_number(&self, iso_year: i32, iso_week: u32) -> Decimal {
        self.0
            .get(&iso_year)
            .and_then(|weeks| weeks.get(&iso_week))
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// 檢查指定週是否有記錄
    pub fn contains(&self, iso_year: i32, iso_week: u32) -> bool {
        self.0
            .get(&iso_year)
            .is_some_and(|weeks| weeks.contains_key(&iso_week))
    }

    /// 依週次順序迭代 (年, 週次, 數量)
    pub fn iter(&self) -> impl Iterator<Item = (i32, u32, Decimal)> + '_ {
        self.0.iter().flat_map(|(&year, weeks)| {
            weeks.iter().map(move |(&week, &quantity)| (year, week, quantity))
        })
    }

    /// 記錄的 (年, 週次) 鍵
    pub fn keys(&self) -> impl Iterator<Item = (i32, u32)> + '_ {
        self.iter().map(|(year, week, _)| (year, week))
    }

    /// 記錄的週（鍵皆來自有效的 `CalendarWeek`）
    pub fn weeks(&self) -> impl Iterator<Item = CalendarWeek> + '_ {
        self.keys()
            .filter_map(|(year, week)| CalendarWeek::new(year, week).ok())
    }

    /// 逐週合併兩份彙總，任一方缺少的週視為 0
    pub fn combine<F>(&self, other: &WeekTotals, op: F) -> WeekTotals
    where
        F: Fn(Decimal, Decimal) -> Decimal,
    {
        let mut result = WeekTotals::new();
        for (year, week) in self.keys().chain(other.keys()) {
            if result.contains(year, week) {
                continue;
            }
            let value = op(
                self.get_by_number(year, week),
                other.get_by_number(year, week),
            );
            result.0.entry(year).or_default().insert(week, value);
        }
        result
    }

    /// 某 ISO 年的週資料
    pub fn year(&self, iso_year: i32) -> Option<&BTreeMap<u32, Decimal>> {
        self.0.get(&iso_year)
    }

    /// 總和
    pub fn sum(&self) -> Decimal {
        self.iter().map(|(_, _, quantity)| quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 記錄的週數
    pub fn len(&self) -> usize {
        self.0.values().map(BTreeMap::len).sum()
    }
}

/// 依鍵（如需求類別）分組的週彙總
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregatedSeries<K: Ord>(BTreeMap<K, WeekTotals>);

impl<K: Ord> Default for AggregatedSeries<K> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<K: Ord> AggregatedSeries<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 累加一筆數量
    pub fn add(&mut self, key: K, week: CalendarWeek, quantity: Decimal) {
        self.0.entry(key).or_default().add(week, quantity);
    }

    /// 覆寫一筆數量（編輯草稿用）
    pub fn set(&mut self, key: K, week: CalendarWeek, quantity: Decimal) {
        self.0.entry(key).or_default().set(week, quantity);
    }

    /// 取得某鍵的週彙總
    pub fn get(&self, key: &K) -> Option<&WeekTotals> {
        self.0.get(key)
    }

    /// 查詢單一儲存格，缺少時為 0
    pub fn cell(&self, key: &K, week: CalendarWeek) -> Decimal {
        self.0
            .get(key)
            .map(|totals| totals.get(week))
            .unwrap_or(Decimal::ZERO)
    }

    /// 所有鍵
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.0.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &WeekTotals)> {
        self.0.iter()
    }

    /// 合併所有鍵為單一週彙總
    pub fn total(&self) -> WeekTotals {
        let mut total = WeekTotals::new();
        for totals in self.0.values() {
            for (year, week, quantity) in totals.iter() {
                *total
                    .0
                    .entry(year)
                    .or_default()
                    .entry(week)
                    .or_insert(Decimal::ZERO) += quantity;
            }
        }
        total
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K: Ord> FromIterator<(K, WeekTotals)> for AggregatedSeries<K> {
    fn from_iter<I: IntoIterator<Item = (K, WeekTotals)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week(year: i32, week: u32) -> CalendarWeek {
        CalendarWeek::new(year, week).unwrap()
    }

    #[test]
    fn test_week_totals_accumulate() {
        let mut totals = WeekTotals::new();
        totals.add(week(2024, 1), Decimal::from(3));
        totals.add(week(2024, 1), Decimal::from(4));
        totals.add(week(2024, 2), Decimal::from(1));

        assert_eq!(totals.get(week(2024, 1)), Decimal::from(7));
        assert_eq!(totals.get(week(2024, 3)), Decimal::ZERO);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals.sum(), Decimal::from(8));
    }

    #[test]
    fn test_week_totals_iter_in_order() {
        let mut totals = WeekTotals::new();
        totals.add(week(2025, 1), Decimal::from(1));
        totals.add(week(2024, 52), Decimal::from(2));
        totals.add(week(2024, 3), Decimal::from(3));

        let keys: Vec<_> = totals.keys().collect();
        assert_eq!(keys, vec![(2024, 3), (2024, 52), (2025, 1)]);
    }

    #[test]
    fn test_aggregated_total_collapses_keys() {
        let mut series = AggregatedSeries::new();
        series.add("A", week(2024, 1), Decimal::from(10));
        series.add("B", week(2024, 1), Decimal::from(5));
        series.add("B", week(2024, 2), Decimal::from(2));

        let total = series.total();
        assert_eq!(total.get(week(2024, 1)), Decimal::from(15));
        assert_eq!(total.get(week(2024, 2)), Decimal::from(2));
        assert_eq!(series.cell(&"C", week(2024, 1)), Decimal::ZERO);
    }
}
