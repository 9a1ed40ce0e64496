//! 材料模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 每公斤成本換算為每克成本的固定係數（0.017）
///
/// 並非 1/1000，沿用既有報價的換算方式。
pub const COST_PER_GRAM_FACTOR: Decimal = Decimal::from_parts(17, 0, 0, false, 3);

/// 材料（線材/樹脂）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// 材料ID
    pub id: Uuid,

    /// 材料名稱（零件以名稱引用）
    pub name: String,

    /// 每公斤成本
    pub cost_per_kilogram: Decimal,
}

impl Material {
    /// 創建新的材料
    pub fn new(name: impl Into<String>, cost_per_kilogram: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            cost_per_kilogram,
        }
    }

    /// 每克成本
    pub fn cost_per_gram(&self) -> Decimal {
        self.cost_per_kilogram * COST_PER_GRAM_FACTOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_value() {
        assert_eq!(COST_PER_GRAM_FACTOR, Decimal::new(17, 3));
    }

    #[test]
    fn test_cost_per_gram() {
        let pla = Material::new("PLA", Decimal::from(60));
        assert_eq!(pla.cost_per_gram(), Decimal::new(102, 2));

        let resin = Material::new("Resina", Decimal::new(1255, 1));
        assert_eq!(resin.cost_per_gram(), Decimal::new(21335, 4));
    }
}
