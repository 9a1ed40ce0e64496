//! # Quote Cache
//!
//! 報價文件（衍生產物）快取與失效處理

pub mod artifact;
pub mod dirty_tracking;
pub mod renderer;
pub mod service;

// Re-export 主要類型
pub use artifact::{ArtifactCache, RefreshOutcome, RefreshReport};
pub use dirty_tracking::StaleArtifactTracker;
pub use renderer::{DocumentRenderer, RenderedDocument, SummaryRenderer};
pub use service::QuoteService;

/// 文件產生錯誤（可恢復，不會中斷觸發的操作）
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("報價內容無法序列化: {0}")]
    Serialization(String),

    #[error("報價內容不完整: {0}")]
    InvalidInput(String),

    #[error("文件服務錯誤: {0}")]
    Backend(String),
}

impl From<RenderError> for quote_core::QuoteError {
    fn from(err: RenderError) -> Self {
        quote_core::QuoteError::Rendering(err.to_string())
    }
}
