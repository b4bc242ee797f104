//! 週表格示例：表頭生成、需求彙總與產能比較

use chrono::NaiveDate;
use dcm::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== 週表格示例 ===\n");

    let config = DcmConfig::from_json_str(r#"{"grid": {"horizonWeeks": 10}}"#)?;
    let start = NaiveDate::from_ymd_opt(2024, 12, 2).ok_or_else(|| anyhow::anyhow!("無效日期"))?;
    let (start, end) = config.grid.default_range(start)?;

    // 創建需求
    let category = DemandCategory::new("0001".to_string(), "Default".to_string());
    let category_id = category.id;
    let values = [(2024, 12, 2, 40), (2024, 12, 9, 55), (2024, 12, 30, 70), (2025, 1, 6, 120)]
        .iter()
        .map(|&(y, m, d, q)| {
            NaiveDate::from_ymd_opt(y, m, d)
                .map(|date| DemandSeriesValue::new(date, Decimal::from(q)))
                .ok_or_else(|| anyhow::anyhow!("無效日期 {}-{}-{}", y, m, d))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let demand = MaterialDemand::new("MAT-4711".to_string(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4())
        .with_description("Brake disc".to_string())
        .with_series(DemandSeries::new(Uuid::new_v4(), category).with_values(values));

    // 表頭與彙總（記憶化）
    let mut memo = GridMemo::new(MonthWeekGridBuilder::from_config(&config.grid));
    let category_values = demand.category_values();
    let (grid, aggregated) = memo.get_or_compute(&category_values, |v| v.category_id, start, end)?;

    for span in &grid.year_spans {
        println!("{}: {} 週", span.year, span.week_count);
    }
    for bucket in &grid.buckets {
        println!("  {} {}: {:?}", bucket.month_name, bucket.year, bucket.week_numbers());
    }

    println!("\n需求:");
    for week in grid.weeks() {
        println!("  {}: {}", week, aggregated.cell(&category_id, week));
    }

    // 產能比較
    let capacities: Vec<CapacityValue> = grid
        .weeks()
        .map(|week| CapacityValue::new(week.monday(), Decimal::from(60), Decimal::from(100)))
        .collect();
    let demand_totals = aggregated.total();

    println!("\n產能:");
    for (week, capacity) in CapacityCheck::evaluate(&demand_totals, &capacities) {
        println!(
            "  {}: 需求 {} / 實際 {} / 最大 {} → {:?}",
            week,
            capacity.demand,
            capacity.actual_capacity,
            capacity.maximum_capacity,
            capacity.status()
        );
    }

    Ok(())
}
