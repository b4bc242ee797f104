//! 物料需求服務物件
//!
//! 明確的生命週期：應用啟動時 `init()`，登出時 `teardown()`。
//! 所有遠端呼叫都經過重試策略。

use dcm_core::{CapacityGroup, MaterialDemand};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::api::DemandCapacityApi;
use crate::retry::{RetryPolicy, Sleeper, ThreadSleeper};
use crate::{ApiError, ApiResult};

/// 物料需求服務
pub struct DemandStore<A: DemandCapacityApi> {
    api: A,
    policy: RetryPolicy,
    sleeper: Box<dyn Sleeper>,
    demands: BTreeMap<Uuid, MaterialDemand>,
    open: bool,
}

impl<A: DemandCapacityApi> DemandStore<A> {
    /// 創建新的服務（尚未初始化）
    pub fn new(api: A, policy: RetryPolicy) -> Self {
        Self {
            api,
            policy,
            sleeper: Box::new(ThreadSleeper),
            demands: BTreeMap::new(),
            open: false,
        }
    }

    /// 建構器模式：替換等待實作
    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'static) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    /// 載入物料需求清單並開啟服務
    pub fn init(&mut self) -> ApiResult<usize> {
        let demands = self
            .policy
            .run("載入物料需求", self.sleeper.as_ref(), || self.api.list_demands())?;

        self.demands = demands.into_iter().map(|d| (d.id, d)).collect();
        self.open = true;

        tracing::info!("物料需求服務初始化完成，{} 筆", self.demands.len());
        Ok(self.demands.len())
    }

    /// 關閉服務並清除快取資料（登出）
    pub fn teardown(&mut self) {
        self.demands.clear();
        self.open = false;
        tracing::info!("物料需求服務已關閉");
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// 已載入的物料需求
    pub fn demands(&self) -> impl Iterator<Item = &MaterialDemand> {
        self.demands.values()
    }

    /// 已載入的單一物料需求
    pub fn demand(&self, id: Uuid) -> Option<&MaterialDemand> {
        self.demands.get(&id)
    }

    /// 從遠端重新讀取物料需求
    pub fn refresh_demand(&mut self, id: Uuid) -> ApiResult<&MaterialDemand> {
        self.ensure_open()?;

        let demand = self
            .policy
            .run("讀取物料需求", self.sleeper.as_ref(), || self.api.fetch_demand(id))?;

        self.demands.insert(id, demand);
        self.demands
            .get(&id)
            .ok_or_else(|| ApiError::NotFound(format!("demand/{}", id)))
    }

    /// 儲存物料需求，成功後以伺服器返回的資料更新快取
    pub fn save_demand(&mut self, demand: &MaterialDemand) -> ApiResult<MaterialDemand> {
        self.ensure_open()?;

        let saved = self
            .policy
            .run("儲存物料需求", self.sleeper.as_ref(), || self.api.update_demand(demand))?;

        self.demands.insert(saved.id, saved.clone());
        tracing::debug!("物料需求 {} 已儲存", saved.id);
        Ok(saved)
    }

    /// 讀取產能群組
    pub fn capacity_group(&self, id: Uuid) -> ApiResult<CapacityGroup> {
        self.ensure_open()?;

        self.policy
            .run("讀取產能群組", self.sleeper.as_ref(), || self.api.fetch_capacity_group(id))
    }

    /// 獲取 API 引用
    pub fn api(&self) -> &A {
        &self.api
    }

    fn ensure_open(&self) -> ApiResult<()> {
        if self.open {
            Ok(())
        } else {
            Err(ApiError::StoreClosed)
        }
    }
}
