//! 表頭與彙總結果的記憶化
//!
//! 編輯時每次按鍵都會重新渲染，重新彙總是 O(n)。
//! 以輸入序列指紋與日期範圍為鍵，只有鍵改變時才重算。

use chrono::NaiveDate;
use dcm_calc::{MonthWeekGridBuilder, SeriesAggregator, WeekGrid};
use dcm_core::{AggregatedSeries, WeeklyQuantity};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MemoKey {
    len: usize,
    fingerprint: u64,
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Debug)]
struct MemoEntry<K: Ord> {
    key: MemoKey,
    grid: WeekGrid,
    aggregated: AggregatedSeries<K>,
}

/// 單一檢視的記憶化快取（只保留最近一次結果）
#[derive(Debug)]
pub struct GridMemo<K: Ord> {
    builder: MonthWeekGridBuilder,
    entry: Option<MemoEntry<K>>,
    hits: u64,
    misses: u64,
}

impl<K: Ord + Hash> GridMemo<K> {
    /// 創建新的快取
    pub fn new(builder: MonthWeekGridBuilder) -> Self {
        Self {
            builder,
            entry: None,
            hits: 0,
            misses: 0,
        }
    }

    /// 取得表頭與彙總，輸入或範圍未變時直接返回快取
    pub fn get_or_compute<T, F>(
        &mut self,
        values: &[T],
        key_fn: F,
        start: NaiveDate,
        end: NaiveDate,
    ) -> dcm_core::Result<(&WeekGrid, &AggregatedSeries<K>)>
    where
        T: WeeklyQuantity,
        F: Fn(&T) -> K,
    {
        let key = MemoKey {
            len: values.len(),
            fingerprint: fingerprint(values, &key_fn),
            start,
            end,
        };

        let entry = match self.entry.take() {
            Some(entry) if entry.key == key => {
                self.hits += 1;
                entry
            }
            _ => {
                self.misses += 1;
                tracing::debug!("記憶化未命中，重算 {} ~ {}（{} 筆）", start, end, values.len());
                let grid = self.builder.build(start, end)?;
                let aggregated = SeriesAggregator::aggregate_within(values, &key_fn, &grid);
                MemoEntry {
                    key,
                    grid,
                    aggregated,
                }
            }
        };

        let entry = self.entry.insert(entry);
        Ok((&entry.grid, &entry.aggregated))
    }

    /// 丟棄快取結果
    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

impl<K: Ord + Hash> Default for GridMemo<K> {
    fn default() -> Self {
        Self::new(MonthWeekGridBuilder::default())
    }
}

/// 輸入序列指紋（鍵、週、數量，含順序）
///
/// 64 位元摘要，碰撞時會返回舊結果；鍵另外保存筆數與日期範圍。
fn fingerprint<T, K, F>(values: &[T], key_fn: &F) -> u64
where
    T: WeeklyQuantity,
    K: Hash,
    F: Fn(&T) -> K,
{
    let mut hasher = DefaultHasher::new();
    values.len().hash(&mut hasher);
    for value in values {
        key_fn(value).hash(&mut hasher);
        value.calendar_week().hash(&mut hasher);
        value.quantity().hash(&mut hasher);
    }
    hasher.finish()
}
