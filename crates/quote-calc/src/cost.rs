//! 零件與產品成本計算
//!
//! 中間值（零件、單價）保持完整精度，只有寫回產品項目或報價單時才四捨五入到分。

use quote_core::{LineProduct, Material, MissingMaterialPolicy, Piece, PricingConfig, QuoteError};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

/// 金額小數位數
pub const MONEY_SCALE: u32 = 2;

/// 金額四捨五入（half-up，到分）
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// 金額運算超出 `Decimal` 可表示範圍
pub(crate) fn amount_overflow(subject: &str) -> QuoteError {
    QuoteError::validation(format!("{} 的金額超出可表示範圍", subject))
}

/// 依名稱解析材料每克成本
///
/// 找不到材料時依 `policy` 決定：`ZeroCost` 以 0 計價，`Reject` 回報 NotFound。
pub fn resolve_cost_per_gram(
    cost_table: &HashMap<String, Decimal>,
    material: &str,
    policy: MissingMaterialPolicy,
) -> quote_core::Result<Decimal> {
    if let Some(cost) = cost_table.get(material) {
        return Ok(*cost);
    }

    match policy {
        MissingMaterialPolicy::ZeroCost => {
            tracing::warn!("找不到材料 {}，每克成本以 0 計價", material);
            Ok(Decimal::ZERO)
        }
        MissingMaterialPolicy::Reject => Err(QuoteError::not_found("材料", material)),
    }
}

/// 成本計算器
pub struct CostCalculator {
    /// 材料名稱 -> 每克成本
    cost_per_gram: HashMap<String, Decimal>,

    /// 計價配置
    config: PricingConfig,
}

impl CostCalculator {
    /// 以材料目錄快照創建計算器
    pub fn new(materials: &[Material], config: PricingConfig) -> Self {
        let cost_per_gram = materials
            .iter()
            .map(|m| (m.name.clone(), m.cost_per_gram()))
            .collect();

        Self {
            cost_per_gram,
            config,
        }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// 零件價值：重量 × 每克成本 + 列印時數 × 機時費率 + 額外成本（不四捨五入）
    ///
    /// 溢位時回報驗證錯誤。
    pub fn piece_value(
        piece: &Piece,
        cost_per_gram: Decimal,
        hourly_rate: Decimal,
    ) -> quote_core::Result<Decimal> {
        let material = piece.weight_grams.checked_mul(cost_per_gram);
        let machine = piece.print_hours.checked_mul(hourly_rate);

        material
            .zip(machine)
            .and_then(|(material, machine)| material.checked_add(machine))
            .and_then(|value| value.checked_add(piece.additional_cost))
            .ok_or_else(|| amount_overflow(&piece.name))
    }

    /// 以目錄與配置計算零件價值
    pub fn value_of_piece(&self, piece: &Piece) -> quote_core::Result<Decimal> {
        let cost_per_gram = resolve_cost_per_gram(
            &self.cost_per_gram,
            &piece.material,
            self.config.missing_material_policy,
        )?;

        Self::piece_value(piece, cost_per_gram, self.config.hourly_rate)
    }

    /// 產品單價（未四捨五入）：Σ 零件價值 × 零件數量
    pub fn product_unit_value(&self, product: &LineProduct) -> quote_core::Result<Decimal> {
        let mut unit = Decimal::ZERO;
        for piece in &product.pieces {
            unit = self
                .value_of_piece(piece)?
                .checked_mul(Decimal::from(piece.quantity))
                .and_then(|value| unit.checked_add(value))
                .ok_or_else(|| amount_overflow(&product.name))?;
        }
        Ok(unit)
    }

    /// 產品總價（未四捨五入）：單價 × 產品數量
    pub fn product_total_value(&self, product: &LineProduct) -> quote_core::Result<Decimal> {
        self.product_unit_value(product)?
            .checked_mul(Decimal::from(product.quantity))
            .ok_or_else(|| amount_overflow(&product.name))
    }

    /// 重新計算並寫回產品的單價與總價快取
    ///
    /// 總價以未四捨五入的單價相乘後再四捨五入。
    pub fn price_product(&self, product: &mut LineProduct) -> quote_core::Result<()> {
        let unit = self.product_unit_value(product)?;
        let total = self.product_total_value(product)?;
        product.unit_value = round_money(unit);
        product.total_value = round_money(total);

        tracing::debug!(
            "產品 {} 單價 {} 總價 {}",
            product.name,
            product.unit_value,
            product.total_value
        );

        Ok(())
    }

    /// 產品項目中引用但目錄沒有的材料名稱
    pub fn missing_materials<'a>(&self, products: &'a [LineProduct]) -> Vec<&'a str> {
        let mut missing: Vec<&str> = products
            .iter()
            .flat_map(|p| p.pieces.iter())
            .map(|piece| piece.material.as_str())
            .filter(|name| !self.cost_per_gram.contains_key(*name))
            .collect();
        missing.sort_unstable();
        missing.dedup();
        missing
    }
}
