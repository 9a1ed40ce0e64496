//! # Quote Core
//!
//! 報價與生產流程的核心資料模型與類型定義

pub mod company;
pub mod config;
pub mod fee;
pub mod material;
pub mod product;
pub mod production;
pub mod quote;
pub mod store;

// Re-export 主要類型
pub use company::CompanyProfile;
pub use config::{MissingMaterialPolicy, PricingConfig};
pub use fee::{FeeKind, ProjectType, ServiceFee};
pub use material::{Material, COST_PER_GRAM_FACTOR};
pub use product::{LineProduct, Piece};
pub use production::{ProductionPlan, SectorKey, SectorPatch, SectorState, SectorStatus};
pub use quote::{Artifact, NewQuote, Priority, Quote, QuoteStatus};
pub use store::{CatalogSource, InMemoryStore, QuoteFilter, QuoteStore};

/// 報價引擎錯誤類型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuoteError {
    #[error("資料驗證失敗: {0}")]
    Validation(String),

    #[error("找不到{entity}: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("報價單編號重複: {0}")]
    DuplicateCode(String),

    #[error("儲存層暫時性錯誤: {0}")]
    TransientStorage(String),

    #[error("文件產生失敗: {0}")]
    Rendering(String),
}

impl QuoteError {
    /// 建立驗證錯誤
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// 建立找不到資源的錯誤
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// 是否為編號衝突（呼叫端可重新產生編號後再試）
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::DuplicateCode(_))
    }

    /// 是否為儲存層暫時性錯誤
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::TransientStorage(_))
    }
}

pub type Result<T> = std::result::Result<T, QuoteError>;
