//! 編輯流程示例：服務物件、草稿修改、儲存失敗與重試

use chrono::NaiveDate;
use dcm::prelude::*;
use dcm::model::RetrySettings;
use rust_decimal::Decimal;
use uuid::Uuid;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== 編輯流程示例 ===\n");

    let category = DemandCategory::new("0001".to_string(), "Default".to_string());
    let category_id = category.id;
    let monday = NaiveDate::from_ymd_opt(2024, 1, 1).ok_or_else(|| anyhow::anyhow!("無效日期"))?;
    let demand = MaterialDemand::new("MAT-001".to_string(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
        .with_series(
            DemandSeries::new(Uuid::new_v4(), category)
                .with_values(vec![DemandSeriesValue::new(monday, Decimal::from(10))]),
        );
    let demand_id = demand.id;

    // 不等待的重試設定，方便示範
    let api = InMemoryApi::new().with_demand(demand);
    let mut store = DemandStore::new(api, RetryPolicy::from_settings(&RetrySettings::immediate(2)));
    store.init()?;

    let fetched = store
        .demand(demand_id)
        .cloned()
        .ok_or_else(|| anyhow::anyhow!("找不到物料需求 {}", demand_id))?;
    let mut editor = WeeklyDemandEditor::new(fetched);

    let week2 = CalendarWeek::new(2024, 2)?;
    editor.begin_edit()?;
    editor.set_cell(category_id, week2, Decimal::from(25))?;

    // 兩次伺服器錯誤：用完重試次數，編輯器保留草稿
    for _ in 0..2 {
        store.api().fail_next(ApiError::Status {
            status: 503,
            message: "unavailable".to_string(),
        });
    }
    if let Err(error) = editor.save(&mut store) {
        println!("儲存失敗：{}（狀態 {:?}，未儲存修改 {}）", error, editor.state(), editor.has_unsaved_changes());
    }

    // 再試一次
    editor.save(&mut store)?;
    println!("儲存成功，狀態 {:?}", editor.state());
    println!("{} 的需求: {}", week2, editor.cell(category_id, week2));

    store.teardown();
    Ok(())
}
