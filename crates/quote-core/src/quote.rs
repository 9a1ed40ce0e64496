//! 報價單模型

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::{LineProduct, ProductionPlan, QuoteError, ServiceFee};

/// 報價單狀態
///
/// 狀態以直接指派更新，不檢查轉換路徑（任一狀態可接任一狀態）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuoteStatus {
    /// 草稿
    Draft,
    /// 已送出
    Sent,
    /// 已核准（進入生產）
    Accepted,
    /// 已拒絕
    Rejected,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Draft => "draft",
            QuoteStatus::Sent => "sent",
            QuoteStatus::Accepted => "accepted",
            QuoteStatus::Rejected => "rejected",
        }
    }

    /// 是否可作為建立時的初始狀態
    pub fn is_initial(&self) -> bool {
        matches!(self, QuoteStatus::Draft | QuoteStatus::Sent)
    }
}

impl fmt::Display for QuoteStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuoteStatus {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Ok(QuoteStatus::Draft),
            "sent" => Ok(QuoteStatus::Sent),
            "accepted" => Ok(QuoteStatus::Accepted),
            "rejected" => Ok(QuoteStatus::Rejected),
            _ => Err(QuoteError::validation(format!(
                "無效的報價單狀態: {}（可用 draft, sent, accepted, rejected）",
                s
            ))),
        }
    }
}

/// 優先級
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

impl FromStr for Priority {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(QuoteError::validation(format!(
                "無效的優先級: {}（可用 low, medium, high）",
                s
            ))),
        }
    }
}

/// 報價文件（衍生產物）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// 文件位置
    pub uri: String,

    /// 檔名
    pub file_name: String,

    /// 產生時間
    pub generated_at: DateTime<Utc>,
}

impl Artifact {
    /// 是否指向同一份文件（不比較產生時間）
    pub fn same_document(&self, other: &Artifact) -> bool {
        self.uri == other.uri && self.file_name == other.file_name
    }
}

/// 報價單
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// 報價單ID
    pub id: Uuid,

    /// 報價單編號（全域唯一）
    pub code: String,

    /// 客戶ID
    pub client_id: String,

    pub status: QuoteStatus,
    pub priority: Priority,

    /// 產品項目
    pub items: Vec<LineProduct>,

    /// 折扣（使用者輸入原文）
    pub discount_input: String,

    /// 已選取的服務費用
    pub selected_fees: Vec<ServiceFee>,

    /// 總金額（快取值）
    pub total: Decimal,

    pub created_at: DateTime<Utc>,
    pub planned_start: Option<DateTime<Utc>>,
    pub planned_delivery: Option<DateTime<Utc>>,

    /// 目前階段（自由文字）
    pub current_stage: String,

    /// 負責人
    pub responsible: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_plan: Option<ProductionPlan>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<Artifact>,
}

impl Quote {
    /// 是否已進入生產流程
    pub fn is_in_production(&self) -> bool {
        self.status == QuoteStatus::Accepted && self.production_plan.is_some()
    }

    /// 渲染用的內容快照（不含文件本身）
    pub fn content_snapshot(&self) -> Quote {
        Quote {
            artifact: None,
            ..self.clone()
        }
    }
}

/// 新報價單輸入
#[derive(Debug, Clone)]
pub struct NewQuote {
    pub code: String,
    pub client_id: String,
    pub status: QuoteStatus,
    pub priority: Priority,
    pub items: Vec<LineProduct>,
    pub discount_input: String,

    /// 選取的服務費用ID（從目錄解析）
    pub fee_ids: Vec<Uuid>,

    pub planned_start: Option<DateTime<Utc>>,
    pub planned_delivery: Option<DateTime<Utc>>,
    pub current_stage: String,
    pub responsible: String,
    pub production_plan: Option<ProductionPlan>,
}

impl NewQuote {
    /// 創建新報價單輸入（預設草稿、中優先級）
    pub fn new(code: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            client_id: client_id.into(),
            status: QuoteStatus::Draft,
            priority: Priority::default(),
            items: Vec::new(),
            discount_input: String::new(),
            fee_ids: Vec::new(),
            planned_start: None,
            planned_delivery: None,
            current_stage: String::new(),
            responsible: String::new(),
            production_plan: None,
        }
    }

    pub fn with_status(mut self, status: QuoteStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_item(mut self, item: LineProduct) -> Self {
        self.items.push(item);
        self
    }

    pub fn with_discount(mut self, discount_input: impl Into<String>) -> Self {
        self.discount_input = discount_input.into();
        self
    }

    pub fn with_fee(mut self, fee_id: Uuid) -> Self {
        self.fee_ids.push(fee_id);
        self
    }

    /// 建構器模式：設置計劃期間
    pub fn with_schedule(
        mut self,
        planned_start: Option<DateTime<Utc>>,
        planned_delivery: Option<DateTime<Utc>>,
    ) -> Self {
        self.planned_start = planned_start;
        self.planned_delivery = planned_delivery;
        self
    }

    pub fn with_responsible(mut self, responsible: impl Into<String>) -> Self {
        self.responsible = responsible.into();
        self
    }

    pub fn with_current_stage(mut self, stage: impl Into<String>) -> Self {
        self.current_stage = stage.into();
        self
    }

    pub fn with_production_plan(mut self, plan: ProductionPlan) -> Self {
        self.production_plan = Some(plan);
        self
    }
}
