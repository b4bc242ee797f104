//! 週需求編輯器
//!
//! 儲存格以類別顯示，但草稿以序列（`demand_series` 中的位置）保存：
//! 同一類別可能有多個客戶地點的序列，儲存時每個序列只寫回自己的值。

use dcm_cache::DirtyTracker;
use dcm_calc::{SeriesAggregator, WeekGrid, WeekMath};
use dcm_client::{ApiResult, DemandCapacityApi, DemandStore};
use dcm_core::{AggregatedSeries, CalendarWeek, DemandSeriesValue, MaterialDemand, WeekTotals};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{EditorError, Result};

/// 編輯狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    /// 唯讀，儲存格顯示彙總值
    Viewing,
    /// 修改本地草稿，尚未送出
    Editing,
    /// 草稿已送出，等待遠端回應
    Saving,
}

/// 單一物料需求的週需求編輯器
#[derive(Debug)]
pub struct WeeklyDemandEditor {
    state: EditState,

    /// 最近一次取得的資料
    demand: MaterialDemand,

    /// 最近一次取得的資料依序列彙總
    fetched: AggregatedSeries<usize>,

    /// 最近一次取得的資料依類別彙總
    by_category: AggregatedSeries<Uuid>,

    /// 編輯草稿：序列位置 → ISO 年 → ISO 週 → 數量
    draft: AggregatedSeries<usize>,

    dirty: DirtyTracker<usize>,
}

impl WeeklyDemandEditor {
    /// 以取得的資料創建編輯器（檢視狀態）
    pub fn new(demand: MaterialDemand) -> Self {
        Self {
            state: EditState::Viewing,
            fetched: aggregate_by_series(&demand),
            by_category: aggregate_by_category(&demand),
            demand,
            draft: AggregatedSeries::new(),
            dirty: DirtyTracker::new(),
        }
    }

    pub fn state(&self) -> EditState {
        self.state
    }

    /// 最近一次取得的資料
    pub fn demand(&self) -> &MaterialDemand {
        &self.demand
    }

    /// 最近一次取得的資料，依類別彙總
    pub fn cells(&self) -> &AggregatedSeries<Uuid> {
        &self.by_category
    }

    /// 目前顯示的儲存格值（編輯中顯示草稿），同類別的序列相加
    pub fn cell(&self, category_id: Uuid, week: CalendarWeek) -> Decimal {
        let current = self.current();
        self.demand
            .series_indices(category_id)
            .into_iter()
            .map(|index| current.cell(&index, week))
            .sum()
    }

    /// 單一序列的儲存格值
    pub fn series_cell(&self, series_index: usize, week: CalendarWeek) -> Decimal {
        self.current().cell(&series_index, week)
    }

    /// 依表頭順序取出某類別的一列
    pub fn row(&self, category_id: Uuid, grid: &WeekGrid) -> Vec<Decimal> {
        grid.weeks().map(|week| self.cell(category_id, week)).collect()
    }

    /// 所有類別的週合計
    pub fn weekly_totals(&self) -> WeekTotals {
        self.current().total()
    }

    /// 是否有未儲存的修改
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty.has_changes()
    }

    /// 類別中任一序列的儲存格是否已修改
    pub fn is_dirty(&self, category_id: Uuid, week: CalendarWeek) -> bool {
        self.demand
            .series_indices(category_id)
            .into_iter()
            .any(|index| self.dirty.is_dirty(index, week))
    }

    /// 檢視 → 編輯，草稿取自最近一次取得的資料
    pub fn begin_edit(&mut self) -> Result<()> {
        self.expect_state(EditState::Viewing, "開始編輯")?;

        self.draft = self.fetched.clone();
        self.dirty.clear();
        self.state = EditState::Editing;

        tracing::debug!("物料需求 {} 進入編輯", self.demand.id);
        Ok(())
    }

    /// 修改草稿中某類別的儲存格
    ///
    /// 類別只對應一個序列時才可用；多個客戶地點共用類別時改用 [`Self::set_series_cell`]。
    pub fn set_cell(&mut self, category_id: Uuid, week: CalendarWeek, value: Decimal) -> Result<()> {
        self.expect_state(EditState::Editing, "修改儲存格")?;

        match self.demand.series_indices(category_id).as_slice() {
            [] => Err(EditorError::UnknownCategory(category_id)),
            [index] => self.set_series_cell(*index, week, value),
            indices => Err(EditorError::AmbiguousCategory {
                category: category_id,
                series: indices.len(),
            }),
        }
    }

    /// 修改草稿中某序列的儲存格
    pub fn set_series_cell(
        &mut self,
        series_index: usize,
        week: CalendarWeek,
        value: Decimal,
    ) -> Result<()> {
        self.expect_state(EditState::Editing, "修改儲存格")?;

        if series_index >= self.demand.demand_series.len() {
            return Err(EditorError::UnknownSeries(series_index));
        }

        self.draft.set(series_index, week, value);
        self.dirty.mark_dirty(series_index, week);
        Ok(())
    }

    /// 編輯 → 檢視，丟棄草稿
    pub fn revert(&mut self) -> Result<()> {
        self.expect_state(EditState::Editing, "還原")?;

        self.draft = AggregatedSeries::new();
        self.dirty.clear();
        self.state = EditState::Viewing;

        tracing::debug!("物料需求 {} 已還原", self.demand.id);
        Ok(())
    }

    /// 編輯 → 儲存中，把草稿展開為待送出的物料需求
    ///
    /// 每個序列的值改為 (該週週一, 數量)，依週次遞增。
    pub fn start_save(&mut self) -> Result<MaterialDemand> {
        self.expect_state(EditState::Editing, "儲存")?;

        let payload = self.flatten_draft()?;
        self.state = EditState::Saving;
        Ok(payload)
    }

    /// 儲存中 → 檢視（成功）或 編輯（失敗，草稿保留）
    pub fn finish_save(&mut self, result: ApiResult<MaterialDemand>) -> Result<()> {
        self.expect_state(EditState::Saving, "完成儲存")?;

        match result {
            Ok(saved) => {
                tracing::info!("物料需求 {} 儲存成功", saved.id);
                self.replace_demand(saved);
                self.draft = AggregatedSeries::new();
                self.dirty.clear();
                self.state = EditState::Viewing;
                Ok(())
            }
            Err(error) => {
                tracing::warn!(
                    "物料需求 {} 儲存失敗，保留 {} 個修改: {}",
                    self.demand.id,
                    self.dirty.len(),
                    error
                );
                self.state = EditState::Editing;
                Err(EditorError::Api(error))
            }
        }
    }

    /// 透過服務物件儲存（含重試）
    pub fn save<A: DemandCapacityApi>(&mut self, store: &mut DemandStore<A>) -> Result<()> {
        let payload = self.start_save()?;
        let result = store.save_demand(&payload);
        self.finish_save(result)
    }

    /// 以重新取得的資料取代目前資料（僅限檢視狀態）
    pub fn refresh(&mut self, demand: MaterialDemand) -> Result<()> {
        self.expect_state(EditState::Viewing, "重新載入")?;

        self.replace_demand(demand);
        Ok(())
    }

    fn replace_demand(&mut self, demand: MaterialDemand) {
        self.fetched = aggregate_by_series(&demand);
        self.by_category = aggregate_by_category(&demand);
        self.demand = demand;
    }

    fn current(&self) -> &AggregatedSeries<usize> {
        match self.state {
            EditState::Viewing => &self.fetched,
            EditState::Editing | EditState::Saving => &self.draft,
        }
    }

    fn flatten_draft(&self) -> Result<MaterialDemand> {
        let mut payload = self.demand.clone();

        for (index, series) in payload.demand_series.iter_mut().enumerate() {
            series.demand_series_values = match self.draft.get(&index) {
                Some(totals) => totals
                    .iter()
                    .map(|(year, week, quantity)| {
                        WeekMath::monday_of(year, week)
                            .map(|monday| DemandSeriesValue::new(monday, quantity))
                    })
                    .collect::<dcm_core::Result<Vec<_>>>()?,
                None => Vec::new(),
            };
        }

        Ok(payload)
    }

    fn expect_state(&self, expected: EditState, action: &'static str) -> Result<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(EditorError::InvalidTransition {
                state: self.state,
                action,
            })
        }
    }
}

fn aggregate_by_series(demand: &MaterialDemand) -> AggregatedSeries<usize> {
    SeriesAggregator::aggregate(&demand.category_values(), |value| value.series_index)
}

fn aggregate_by_category(demand: &MaterialDemand) -> AggregatedSeries<Uuid> {
    SeriesAggregator::aggregate(&demand.category_values(), |value| value.category_id)
}
