//! 計價配置模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{QuoteError, Result};

/// 計價參數配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// 列印機時費率（每小時）
    pub hourly_rate: Decimal,

    /// 找不到材料時的處理策略
    #[serde(default)]
    pub missing_material_policy: MissingMaterialPolicy,
}

impl PricingConfig {
    /// 創建新的計價配置
    pub fn new(hourly_rate: Decimal) -> Self {
        Self {
            hourly_rate,
            missing_material_policy: MissingMaterialPolicy::default(),
        }
    }

    /// 建構器模式：設置機時費率
    pub fn with_hourly_rate(mut self, hourly_rate: Decimal) -> Self {
        self.hourly_rate = hourly_rate;
        self
    }

    /// 建構器模式：設置材料缺失策略
    pub fn with_missing_material_policy(mut self, policy: MissingMaterialPolicy) -> Self {
        self.missing_material_policy = policy;
        self
    }

    /// 從 JSON 載入配置
    ///
    /// # 範例
    /// ```
    /// # use quote_core::{MissingMaterialPolicy, PricingConfig};
    /// let config = PricingConfig::from_json(r#"{"hourly_rate": "30"}"#).unwrap();
    /// assert_eq!(config.missing_material_policy, MissingMaterialPolicy::ZeroCost);
    /// ```
    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)
            .map_err(|e| QuoteError::validation(format!("計價配置格式錯誤: {}", e)))?;

        if config.hourly_rate < Decimal::ZERO {
            return Err(QuoteError::validation("機時費率不可為負數"));
        }

        Ok(config)
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self::new(Decimal::ZERO)
    }
}

/// 材料缺失策略
///
/// 零件引用的材料名稱在目錄中找不到時的行為。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingMaterialPolicy {
    /// 以每克成本 0 計價（相容既有行為）
    #[default]
    ZeroCost,
    /// 回報 NotFound 錯誤
    Reject,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = PricingConfig::new(Decimal::from(30))
            .with_missing_material_policy(MissingMaterialPolicy::Reject);

        assert_eq!(config.hourly_rate, Decimal::from(30));
        assert_eq!(config.missing_material_policy, MissingMaterialPolicy::Reject);
    }

    #[test]
    fn test_from_json() {
        let config =
            PricingConfig::from_json(r#"{"hourly_rate": "45.5", "missing_material_policy": "reject"}"#)
                .unwrap();

        assert_eq!(config.hourly_rate, Decimal::new(455, 1));
        assert_eq!(config.missing_material_policy, MissingMaterialPolicy::Reject);
    }

    #[test]
    fn test_from_json_rejects_negative_rate() {
        let err = PricingConfig::from_json(r#"{"hourly_rate": "-1"}"#).unwrap_err();
        assert!(matches!(err, QuoteError::Validation(_)));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(PricingConfig::from_json("not json").is_err());
    }
}
