//! 遠端 API 介面
//!
//! 對應 `GET /demand`、`GET/PUT /demand/{id}`、`GET /capacityGroup/{id}`。
//! 傳輸層（HTTPS、權杖）由實作方負責。

use dcm_core::{CapacityGroup, MaterialDemand};
use uuid::Uuid;

use crate::ApiResult;

/// 需求產能管理 API
pub trait DemandCapacityApi {
    /// 列出所有物料需求
    fn list_demands(&self) -> ApiResult<Vec<MaterialDemand>>;

    /// 讀取單一物料需求
    fn fetch_demand(&self, id: Uuid) -> ApiResult<MaterialDemand>;

    /// 更新物料需求，返回伺服器端的最新資料
    fn update_demand(&self, demand: &MaterialDemand) -> ApiResult<MaterialDemand>;

    /// 讀取產能群組
    fn fetch_capacity_group(&self, id: Uuid) -> ApiResult<CapacityGroup>;
}

impl<A: DemandCapacityApi + ?Sized> DemandCapacityApi for &A {
    fn list_demands(&self) -> ApiResult<Vec<MaterialDemand>> {
        (**self).list_demands()
    }

    fn fetch_demand(&self, id: Uuid) -> ApiResult<MaterialDemand> {
        (**self).fetch_demand(id)
    }

    fn update_demand(&self, demand: &MaterialDemand) -> ApiResult<MaterialDemand> {
        (**self).update_demand(demand)
    }

    fn fetch_capacity_group(&self, id: Uuid) -> ApiResult<CapacityGroup> {
        (**self).fetch_capacity_group(id)
    }
}
