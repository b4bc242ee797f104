//! 記憶體內後端（離線模式與測試）

use dcm_core::{CapacityGroup, MaterialDemand};
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::api::DemandCapacityApi;
use crate::{ApiError, ApiResult};

#[derive(Debug, Default)]
struct MemoryState {
    demands: BTreeMap<Uuid, MaterialDemand>,
    capacity_groups: BTreeMap<Uuid, CapacityGroup>,
    failures: VecDeque<ApiError>,
    calls: usize,
}

/// 記憶體內的 API 實作，可注入失敗
#[derive(Debug, Default)]
pub struct InMemoryApi {
    state: Mutex<MemoryState>,
}

impl InMemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：加入物料需求
    pub fn with_demand(self, demand: MaterialDemand) -> Self {
        self.lock().demands.insert(demand.id, demand);
        self
    }

    /// 建構器模式：加入產能群組
    pub fn with_capacity_group(self, group: CapacityGroup) -> Self {
        self.lock().capacity_groups.insert(group.capacity_group_id, group);
        self
    }

    /// 讓接下來的呼叫依序失敗
    pub fn fail_next(&self, error: ApiError) {
        self.lock().failures.push_back(error);
    }

    /// 累計呼叫次數
    pub fn calls(&self) -> usize {
        self.lock().calls
    }

    /// 後端目前保存的物料需求
    pub fn stored_demand(&self, id: Uuid) -> Option<MaterialDemand> {
        self.lock().demands.get(&id).cloned()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// 記錄呼叫並取出注入的失敗
    fn begin_call(&self) -> ApiResult<MutexGuard<'_, MemoryState>> {
        let mut state = self.lock();
        state.calls += 1;
        match state.failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(state),
        }
    }
}

impl DemandCapacityApi for InMemoryApi {
    fn list_demands(&self) -> ApiResult<Vec<MaterialDemand>> {
        let state = self.begin_call()?;
        Ok(state.demands.values().cloned().collect())
    }

    fn fetch_demand(&self, id: Uuid) -> ApiResult<MaterialDemand> {
        let state = self.begin_call()?;
        state
            .demands
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("demand/{}", id)))
    }

    fn update_demand(&self, demand: &MaterialDemand) -> ApiResult<MaterialDemand> {
        let mut state = self.begin_call()?;
        if !state.demands.contains_key(&demand.id) {
            return Err(ApiError::NotFound(format!("demand/{}", demand.id)));
        }
        state.demands.insert(demand.id, demand.clone());
        Ok(demand.clone())
    }

    fn fetch_capacity_group(&self, id: Uuid) -> ApiResult<CapacityGroup> {
        let state = self.begin_call()?;
        state
            .capacity_groups
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("capacityGroup/{}", id)))
    }
}
