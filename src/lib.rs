//! # PrintQuote
//!
//! 3D 列印報價與生產流程引擎
//!
//! - `quote_core`：資料模型、錯誤、配置與儲存介面
//! - `quote_calc`：計價、彙總、交期分級、生產進度
//! - `quote_cache`：報價文件快取與報價服務

pub use quote_cache;
pub use quote_calc;
pub use quote_core;

/// 常用類型
pub mod prelude {
    pub use quote_cache::{
        ArtifactCache, DocumentRenderer, QuoteService, RefreshOutcome, RenderedDocument,
        SummaryRenderer,
    };
    pub use quote_calc::{
        classify, classify_str, parse_discount, CostCalculator, Dashboard, DeadlineBucket,
        ProductionWorkflow, QuoteAggregator,
    };
    pub use quote_core::{
        CompanyProfile, InMemoryStore, LineProduct, Material, NewQuote, Piece, PricingConfig,
        Priority, ProductionPlan, ProjectType, Quote, QuoteError, QuoteFilter, QuoteStatus,
        SectorKey, SectorPatch, SectorState, SectorStatus, ServiceFee,
    };
}

/// 初始化日誌輸出
///
/// 重複呼叫時回傳 false（已有全域 subscriber）。
pub fn init_tracing(level: tracing::Level) -> bool {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .is_ok()
}
