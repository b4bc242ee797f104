//! 物料需求模型

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::{boundary_date, CalendarWeek};
use crate::series::WeeklyQuantity;

/// 需求類別
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandCategory {
    /// 類別ID
    pub id: Uuid,

    /// 類別代碼
    pub demand_category_code: String,

    /// 類別名稱
    pub demand_category_name: String,
}

impl DemandCategory {
    pub fn new(code: String, name: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            demand_category_code: code,
            demand_category_name: name,
        }
    }
}

/// 需求序列值（API 邊界記錄）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandSeriesValue {
    /// 該週週一（`YYYY-MM-DD`）
    #[serde(with = "boundary_date")]
    pub calendar_week: NaiveDate,

    /// 需求數量
    #[serde(with = "rust_decimal::serde::float")]
    pub demand: Decimal,
}

impl DemandSeriesValue {
    pub fn new(calendar_week: NaiveDate, demand: Decimal) -> Self {
        Self {
            calendar_week,
            demand,
        }
    }
}

impl WeeklyQuantity for DemandSeriesValue {
    fn calendar_week(&self) -> CalendarWeek {
        CalendarWeek::of(self.calendar_week)
    }

    fn quantity(&self) -> Decimal {
        self.demand
    }
}

/// 需求序列（單一客戶地點 × 需求類別）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemandSeries {
    /// 序列ID（本地新建、尚未儲存的序列沒有ID）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demand_series_id: Option<Uuid>,

    /// 客戶地點
    pub customer_location_id: Uuid,

    /// 預期供應商地點
    #[serde(default)]
    pub expected_supplier_location_ids: Vec<Uuid>,

    /// 需求類別
    pub demand_category: DemandCategory,

    /// 週需求值
    #[serde(default)]
    pub demand_series_values: Vec<DemandSeriesValue>,
}

impl DemandSeries {
    /// 創建新的需求序列
    pub fn new(customer_location_id: Uuid, demand_category: DemandCategory) -> Self {
        Self {
            demand_series_id: None,
            customer_location_id,
            expected_supplier_location_ids: Vec::new(),
            demand_category,
            demand_series_values: Vec::new(),
        }
    }

    /// 建構器模式：設置週需求值
    pub fn with_values(mut self, values: Vec<DemandSeriesValue>) -> Self {
        self.demand_series_values = values;
        self
    }

    /// 建構器模式：設置序列ID
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.demand_series_id = Some(id);
        self
    }

    /// 建構器模式：設置預期供應商地點
    pub fn with_supplier_locations(mut self, locations: Vec<Uuid>) -> Self {
        self.expected_supplier_location_ids = locations;
        self
    }

    /// 類別ID
    pub fn category_id(&self) -> Uuid {
        self.demand_category.id
    }
}

/// 帶類別的週需求（彙總輸入）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryValue {
    /// 所屬序列在 `demand_series` 中的位置
    pub series_index: usize,
    pub category_id: Uuid,
    pub week: CalendarWeek,
    pub quantity: Decimal,
}

impl WeeklyQuantity for CategoryValue {
    fn calendar_week(&self) -> CalendarWeek {
        self.week
    }

    fn quantity(&self) -> Decimal {
        self.quantity
    }
}

/// 物料需求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialDemand {
    /// 需求ID
    pub id: Uuid,

    /// 客戶料號
    pub material_number_customer: String,

    /// 供應商料號
    #[serde(default)]
    pub material_number_supplier: Option<String>,

    /// 客戶物料描述
    #[serde(default)]
    pub material_description_customer: String,

    /// 客戶公司
    pub customer_id: Uuid,

    /// 供應商公司
    pub supplier_id: Uuid,

    /// 計量單位
    pub unit_measure_id: Uuid,

    /// 需求序列
    #[serde(default)]
    pub demand_series: Vec<DemandSeries>,
}

impl MaterialDemand {
    /// 創建新的物料需求
    pub fn new(
        material_number_customer: String,
        customer_id: Uuid,
        supplier_id: Uuid,
        unit_measure_id: Uuid,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            material_number_customer,
            material_number_supplier: None,
            material_description_customer: String::new(),
            customer_id,
            supplier_id,
            unit_measure_id,
            demand_series: Vec::new(),
        }
    }

    /// 建構器模式：設置物料描述
    pub fn with_description(mut self, description: String) -> Self {
        self.material_description_customer = description;
        self
    }

    /// 建構器模式：設置供應商料號
    pub fn with_supplier_material_number(mut self, number: String) -> Self {
        self.material_number_supplier = Some(number);
        self
    }

    /// 建構器模式：添加需求序列
    pub fn with_series(mut self, series: DemandSeries) -> Self {
        self.demand_series.push(series);
        self
    }

    /// 展開所有序列值並標記類別
    pub fn category_values(&self) -> Vec<CategoryValue> {
        self.demand_series
            .iter()
            .enumerate()
            .flat_map(|(series_index, series)| {
                let category_id = series.category_id();
                series
                    .demand_series_values
                    .iter()
                    .map(move |value| CategoryValue {
                        series_index,
                        category_id,
                        week: value.calendar_week(),
                        quantity: value.demand,
                    })
            })
            .collect()
    }

    /// 某類別的所有序列位置（同一類別可能對應多個客戶地點）
    pub fn series_indices(&self, category_id: Uuid) -> Vec<usize> {
        self.demand_series
            .iter()
            .enumerate()
            .filter(|(_, series)| series.category_id() == category_id)
            .map(|(index, _)| index)
            .collect()
    }

    /// 依類別ID查找第一個序列
    pub fn series_for_category(&self, category_id: Uuid) -> Option<&DemandSeries> {
        self.demand_series
            .iter()
            .find(|series| series.category_id() == category_id)
    }

    /// 需求日期範圍（最早週一, 最晚週一）
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self
            .demand_series
            .iter()
            .flat_map(|series| series.demand_series_values.iter())
            .map(|value| value.calendar_week);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(min, max), d| (min.min(d), max.max(d))))
    }
}
