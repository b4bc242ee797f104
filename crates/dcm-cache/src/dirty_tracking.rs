//! 髒標記追蹤（已編輯但未儲存的儲存格）

use dcm_core::CalendarWeek;
use std::collections::BTreeSet;

/// 髒標記追蹤器，以 (列鍵, 週) 標識儲存格
#[derive(Debug, Clone)]
pub struct DirtyTracker<K: Ord> {
    dirty_cells: BTreeSet<(K, CalendarWeek)>,
}

impl<K: Ord + Copy> DirtyTracker<K> {
    /// 創建新的追蹤器
    pub fn new() -> Self {
        Self {
            dirty_cells: BTreeSet::new(),
        }
    }

    /// 標記儲存格為髒
    pub fn mark_dirty(&mut self, key: K, week: CalendarWeek) {
        self.dirty_cells.insert((key, week));
    }

    /// 檢查儲存格是否為髒
    pub fn is_dirty(&self, key: K, week: CalendarWeek) -> bool {
        self.dirty_cells.contains(&(key, week))
    }

    /// 是否有任何未儲存的修改
    pub fn has_changes(&self) -> bool {
        !self.dirty_cells.is_empty()
    }

    /// 清除所有髒標記
    pub fn clear(&mut self) {
        self.dirty_cells.clear();
    }

    /// 獲取有修改的列
    pub fn dirty_keys(&self) -> BTreeSet<K> {
        self.dirty_cells.iter().map(|(key, _)| *key).collect()
    }

    /// 獲取某列的髒週
    pub fn dirty_weeks(&self, key: K) -> Vec<CalendarWeek> {
        self.dirty_cells
            .iter()
            .filter(|(k, _)| *k == key)
            .map(|(_, week)| *week)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.dirty_cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dirty_cells.is_empty()
    }
}

impl<K: Ord + Copy> Default for DirtyTracker<K> {
    fn default() -> Self {
        Self::new()
    }
}
