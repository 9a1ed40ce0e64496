//! 產品與零件模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 零件（單一列印件）
///
/// 零件價值不單獨儲存，每次由計價引擎依輸入重新計算。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    /// 零件ID
    pub id: Uuid,

    /// 零件名稱
    pub name: String,

    /// 每個產品所需數量
    pub quantity: u32,

    /// 材料名稱
    pub material: String,

    /// 重量（克）
    pub weight_grams: Decimal,

    /// 列印時間（小時）
    pub print_hours: Decimal,

    /// 額外成本（後處理、耗材等）
    pub additional_cost: Decimal,
}

impl Piece {
    /// 創建新的零件（數量預設 1）
    pub fn new(
        name: impl Into<String>,
        material: impl Into<String>,
        weight_grams: Decimal,
        print_hours: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            quantity: 1,
            material: material.into(),
            weight_grams,
            print_hours,
            additional_cost: Decimal::ZERO,
        }
    }

    /// 建構器模式：設置數量
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// 建構器模式：設置額外成本
    pub fn with_additional_cost(mut self, additional_cost: Decimal) -> Self {
        self.additional_cost = additional_cost;
        self
    }
}

/// 報價單上的產品項目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineProduct {
    /// 產品ID
    pub id: Uuid,

    /// 產品名稱
    pub name: String,

    /// 訂購數量
    pub quantity: u32,

    /// 組成零件
    pub pieces: Vec<Piece>,

    /// 單價（已四捨五入，快取值）
    pub unit_value: Decimal,

    /// 總價（已四捨五入，快取值）
    pub total_value: Decimal,
}

impl LineProduct {
    /// 創建新的產品項目
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            quantity,
            pieces: Vec::new(),
            unit_value: Decimal::ZERO,
            total_value: Decimal::ZERO,
        }
    }

    /// 建構器模式：設置零件
    pub fn with_pieces(mut self, pieces: Vec<Piece>) -> Self {
        self.pieces = pieces;
        self
    }

    /// 添加零件
    pub fn add_piece(&mut self, piece: Piece) {
        self.pieces.push(piece);
    }

    /// 引用到的材料名稱（去重）
    pub fn material_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.pieces.iter().map(|p| p.material.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        names
    }
}
