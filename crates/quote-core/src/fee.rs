//! 服務費用模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 專案類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    /// 建模設計
    Design,
    /// 3D 掃描
    Scan,
    /// 客戶自備檔案
    None,
}

/// 費用種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeKind {
    /// 專案類型費（每張報價單最多一項）
    Project(ProjectType),
    /// 其他附加費用
    Extra,
}

/// 服務費用
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceFee {
    pub id: Uuid,
    pub name: String,
    pub amount: Decimal,
    pub kind: FeeKind,
}

impl ServiceFee {
    /// 專案類型費
    pub fn project(name: impl Into<String>, project_type: ProjectType, amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            kind: FeeKind::Project(project_type),
        }
    }

    /// 附加費用
    pub fn extra(name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            kind: FeeKind::Extra,
        }
    }

    pub fn is_project(&self) -> bool {
        matches!(self.kind, FeeKind::Project(_))
    }
}
