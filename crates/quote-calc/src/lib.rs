//! # Quote Calculation Engine
//!
//! 計價、彙總、交期分級與生產進度計算

pub mod aggregate;
pub mod cost;
pub mod dashboard;
pub mod deadline;
pub mod workflow;

// Re-export 主要類型
pub use aggregate::{parse_discount, QuoteAggregator, QuoteBreakdown};
pub use cost::{resolve_cost_per_gram, round_money, CostCalculator};
pub use dashboard::{Dashboard, DashboardEntry, DashboardSummary};
pub use deadline::{classify, classify_str, Deadline, DeadlineBucket};
pub use workflow::ProductionWorkflow;

/// 計價警告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingWarning {
    /// 相關對象（材料名稱、費用ID等）
    pub subject: String,
    /// 說明文字
    pub message: String,
    /// 嚴重程度，決定記錄層級
    pub severity: WarningSeverity,
}

impl PricingWarning {
    pub fn new(subject: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            subject,
            message,
            severity,
        }
    }

    pub fn info(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Info)
    }

    pub fn warning(subject: String, message: String) -> Self {
        Self::new(subject, message, WarningSeverity::Warning)
    }
}

/// 計價警告的嚴重程度
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningSeverity {
    /// 輸入已被正規化（例如去除百分號），計價結果仍符合輸入意圖
    Info,
    /// 計價結果可能不符預期（缺少材料、未知費用、負折扣等）
    Warning,
}
