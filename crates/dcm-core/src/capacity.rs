//! 產能群組模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::{boundary_date, CalendarWeek};
use crate::series::SeriesValue;

/// 週產能（API 邊界記錄）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityValue {
    /// 該週週一（`YYYY-MM-DD`）
    #[serde(with = "boundary_date")]
    pub calendar_week: NaiveDate,

    /// 實際產能
    #[serde(with = "rust_decimal::serde::float")]
    pub actual_capacity: Decimal,

    /// 最大產能
    #[serde(with = "rust_decimal::serde::float")]
    pub maximum_capacity: Decimal,
}

impl CapacityValue {
    pub fn new(calendar_week: NaiveDate, actual_capacity: Decimal, maximum_capacity: Decimal) -> Self {
        Self {
            calendar_week,
            actual_capacity,
            maximum_capacity,
        }
    }

    /// 實際產能的週序列值
    pub fn actual(&self) -> SeriesValue {
        SeriesValue::new(CalendarWeek::of(self.calendar_week), self.actual_capacity)
    }

    /// 最大產能的週序列值
    pub fn maximum(&self) -> SeriesValue {
        SeriesValue::new(CalendarWeek::of(self.calendar_week), self.maximum_capacity)
    }
}

/// 產能群組所連結的需求序列
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedDemandSeries {
    /// 物料需求ID
    pub material_demand_id: Uuid,

    /// 需求類別ID
    pub demand_category_id: Uuid,

    /// 客戶地點
    pub customer_location_id: Uuid,
}

/// 產能群組
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityGroup {
    /// 群組ID
    pub capacity_group_id: Uuid,

    /// 群組名稱
    pub name: String,

    /// 客戶公司
    pub customer_id: Uuid,

    /// 供應商公司
    pub supplier_id: Uuid,

    /// 計量單位
    pub unit_measure_id: Uuid,

    /// 週產能
    #[serde(default)]
    pub capacities: Vec<CapacityValue>,

    /// 連結的需求序列
    #[serde(default)]
    pub linked_demand_series: Vec<LinkedDemandSeries>,
}

impl CapacityGroup {
    /// 創建新的產能群組
    pub fn new(name: String, customer_id: Uuid, supplier_id: Uuid, unit_measure_id: Uuid) -> Self {
        Self {
            capacity_group_id: Uuid::new_v4(),
            name,
            customer_id,
            supplier_id,
            unit_measure_id,
            capacities: Vec::new(),
            linked_demand_series: Vec::new(),
        }
    }

    /// 建構器模式：設置週產能
    pub fn with_capacities(mut self, capacities: Vec<CapacityValue>) -> Self {
        self.capacities = capacities;
        self
    }

    /// 建構器模式：連結需求序列
    pub fn with_linked_series(mut self, linked: LinkedDemandSeries) -> Self {
        self.linked_demand_series.push(linked);
        self
    }

    /// 檢查物料需求的某類別是否連結到本群組
    pub fn is_linked(&self, material_demand_id: Uuid, demand_category_id: Uuid) -> bool {
        self.linked_demand_series.iter().any(|link| {
            link.material_demand_id == material_demand_id
                && link.demand_category_id == demand_category_id
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_capacity_group() {
        let json = r#"{
            "capacityGroupId": "7c1c5c59-5a2a-4c6e-9e2e-0d0c3c2f1a01",
            "name": "Press line",
            "customerId": "7c1c5c59-5a2a-4c6e-9e2e-0d0c3c2f1a02",
            "supplierId": "7c1c5c59-5a2a-4c6e-9e2e-0d0c3c2f1a03",
            "unitMeasureId": "7c1c5c59-5a2a-4c6e-9e2e-0d0c3c2f1a04",
            "capacities": [
                {"calendarWeek": "2024-01-01", "actualCapacity": 80, "maximumCapacity": 100}
            ]
        }"#;

        let group: CapacityGroup = serde_json::from_str(json).unwrap();
        assert_eq!(group.name, "Press line");
        assert_eq!(group.capacities.len(), 1);
        assert!(group.linked_demand_series.is_empty());

        let actual = group.capacities[0].actual();
        assert_eq!(actual.week.iso_week(), 1);
        assert_eq!(actual.quantity, Decimal::from(80));
        assert_eq!(group.capacities[0].maximum().quantity, Decimal::from(100));
    }

    #[test]
    fn test_is_linked() {
        let demand_id = Uuid::new_v4();
        let category_id = Uuid::new_v4();
        let group = CapacityGroup::new(
            "Group".to_string(),
            Uuid::new_v4(),
            Uuid::new_v4(),
            Uuid::new_v4(),
        )
        .with_linked_series(LinkedDemandSeries {
            material_demand_id: demand_id,
            demand_category_id: category_id,
            customer_location_id: Uuid::new_v4(),
        });

        assert!(group.is_linked(demand_id, category_id));
        assert!(!group.is_linked(demand_id, Uuid::new_v4()));
    }
}
