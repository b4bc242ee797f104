//! DCM 配置模型

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{DcmError, Result};

/// 跨月週的歸屬策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoundaryPolicy {
    /// 跨月週歸屬週日所在的月份（週內較晚的日子）
    #[default]
    LaterDays,

    /// 跨月週歸屬週四所在的月份（與 ISO 年歸屬一致）
    IsoThursday,
}

/// 週表格配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    /// 跨月週的歸屬策略
    pub boundary_policy: BoundaryPolicy,

    /// 預設顯示週數（從今天起算）
    pub horizon_weeks: u32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            boundary_policy: BoundaryPolicy::LaterDays,
            horizon_weeks: 52,
        }
    }
}

impl GridConfig {
    /// 建構器模式：設置歸屬策略
    pub fn with_boundary_policy(mut self, policy: BoundaryPolicy) -> Self {
        self.boundary_policy = policy;
        self
    }

    /// 建構器模式：設置預設顯示週數
    pub fn with_horizon_weeks(mut self, weeks: u32) -> Self {
        self.horizon_weeks = weeks;
        self
    }

    /// 使用者未選擇日期時的預設範圍
    pub fn default_range(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate)> {
        let end = today
            .checked_add_signed(Duration::weeks(self.horizon_weeks as i64))
            .ok_or_else(|| DcmError::DateOverflow(format!("{} + {} 週", today, self.horizon_weeks)))?;
        Ok((today, end))
    }
}

/// 遠端 API 重試設定
///
/// 預設值對應既有行為：固定間隔 30 秒，最多 3 次。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RetrySettings {
    /// 最多嘗試次數（含第一次）
    pub max_attempts: u32,

    /// 第一次重試前的等待（毫秒）
    pub initial_delay_ms: u64,

    /// 每次重試的等待倍數（1.0 表示固定間隔）
    pub backoff_factor: f64,

    /// 等待上限（毫秒）
    pub max_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 30_000,
            backoff_factor: 1.0,
            max_delay_ms: 30_000,
        }
    }
}

impl RetrySettings {
    /// 建構器模式：設置最多嘗試次數
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// 建構器模式：設置指數退避
    pub fn with_backoff(mut self, initial_delay_ms: u64, factor: f64, max_delay_ms: u64) -> Self {
        self.initial_delay_ms = initial_delay_ms;
        self.backoff_factor = factor;
        self.max_delay_ms = max_delay_ms;
        self
    }

    /// 不等待（測試與離線模式）
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            initial_delay_ms: 0,
            backoff_factor: 1.0,
            max_delay_ms: 0,
        }
    }
}

/// DCM 總配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DcmConfig {
    /// 週表格
    pub grid: GridConfig,

    /// 重試
    pub retry: RetrySettings,
}

impl DcmConfig {
    /// 建構器模式：設置週表格配置
    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    /// 建構器模式：設置重試設定
    pub fn with_retry(mut self, retry: RetrySettings) -> Self {
        self.retry = retry;
        self
    }

    /// 從 JSON 載入配置，缺少的欄位使用預設值
    ///
    /// # 範例
    /// ```
    /// # use dcm_core::{BoundaryPolicy, DcmConfig};
    /// let config = DcmConfig::from_json_str(r#"{"grid": {"boundaryPolicy": "isoThursday"}}"#).unwrap();
    /// assert_eq!(config.grid.boundary_policy, BoundaryPolicy::IsoThursday);
    /// assert_eq!(config.retry.max_attempts, 3);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 檢查配置是否合理
    pub fn validate(&self) -> Result<()> {
        if self.grid.horizon_weeks == 0 {
            return Err(DcmError::Config("horizonWeeks 必須至少為 1".to_string()));
        }
        if self.retry.max_attempts == 0 {
            return Err(DcmError::Config("maxAttempts 必須至少為 1".to_string()));
        }
        if !(self.retry.backoff_factor >= 1.0) {
            return Err(DcmError::Config(format!(
                "backoffFactor 必須 >= 1.0，實際為 {}",
                self.retry.backoff_factor
            )));
        }
        if self.retry.initial_delay_ms > self.retry.max_delay_ms {
            return Err(DcmError::Config(
                "initialDelayMs 不可大於 maxDelayMs".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DcmConfig::default();

        assert_eq!(config.grid.boundary_policy, BoundaryPolicy::LaterDays);
        assert_eq!(config.grid.horizon_weeks, 52);
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.initial_delay_ms, 30_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = DcmConfig::default()
            .with_grid(GridConfig::default().with_horizon_weeks(12))
            .with_retry(RetrySettings::default().with_max_attempts(5).with_backoff(1_000, 2.0, 8_000));

        assert_eq!(config.grid.horizon_weeks, 12);
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.backoff_factor, 2.0);
    }

    #[test]
    fn test_from_json_partial() {
        let config = DcmConfig::from_json_str(r#"{"retry": {"maxAttempts": 5}}"#).unwrap();

        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.initial_delay_ms, 30_000);
        assert_eq!(config.grid, GridConfig::default());
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            DcmConfig::from_json_str(r#"{"retry": {"maxAttempts": 0}}"#),
            Err(DcmError::Config(_))
        ));
        assert!(matches!(
            DcmConfig::from_json_str(r#"{"grid": {"horizonWeeks": 0}}"#),
            Err(DcmError::Config(_))
        ));
        assert!(matches!(
            DcmConfig::from_json_str("not json"),
            Err(DcmError::Serialization(_))
        ));
    }

    #[test]
    fn test_default_range() {
        let today = NaiveDate::from_ymd_opt(2025, 10, 6).unwrap();
        let (start, end) = GridConfig::default()
            .with_horizon_weeks(4)
            .default_range(today)
            .unwrap();

        assert_eq!(start, today);
        assert_eq!(end, NaiveDate::from_ymd_opt(2025, 11, 3).unwrap());
    }
}
