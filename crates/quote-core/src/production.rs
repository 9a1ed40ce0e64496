//! 生產計劃模型
//!
//! 已核准報價單的六段式生產流程。每個工段保存獨立狀態，工段之間不強制先後順序。

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::QuoteError;

/// 生產工段（固定六個，順序即流程順序）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectorKey {
    /// 列印
    Printing,
    /// 表面處理
    Finishing,
    /// 塗裝
    Painting,
    /// 組裝
    Assembly,
    /// 品檢
    Review,
    /// 物流出貨
    Logistics,
}

impl SectorKey {
    /// 全部工段（依流程順序）
    pub const ALL: [SectorKey; 6] = [
        SectorKey::Printing,
        SectorKey::Finishing,
        SectorKey::Painting,
        SectorKey::Assembly,
        SectorKey::Review,
        SectorKey::Logistics,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SectorKey::Printing => "printing",
            SectorKey::Finishing => "finishing",
            SectorKey::Painting => "painting",
            SectorKey::Assembly => "assembly",
            SectorKey::Review => "review",
            SectorKey::Logistics => "logistics",
        }
    }
}

impl fmt::Display for SectorKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectorKey {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        SectorKey::ALL
            .into_iter()
            .find(|key| key.as_str() == normalized)
            .ok_or_else(|| QuoteError::validation(format!("無效的工段: {}", s)))
    }
}

/// 工段狀態
///
/// 開放式字彙：已知狀態有對應變體，其他字串原樣保存在 `Other`。
/// 比對不做大小寫或空白正規化，未知字串序列化時逐字寫回。
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SectorStatus {
    /// 等待中（預設）
    #[default]
    Awaiting,
    /// 準備中
    InPreparation,
    /// 進行中
    InProgress,
    /// 已完成
    Completed,
    /// 未識別的狀態
    Other(String),
}

impl SectorStatus {
    pub fn as_str(&self) -> &str {
        match self {
            SectorStatus::Awaiting => "awaiting",
            SectorStatus::InPreparation => "in-preparation",
            SectorStatus::InProgress => "in-progress",
            SectorStatus::Completed => "completed",
            SectorStatus::Other(raw) => raw,
        }
    }

    /// 是否為作業中（準備中或進行中）
    pub fn is_active(&self) -> bool {
        matches!(self, SectorStatus::InPreparation | SectorStatus::InProgress)
    }

    pub fn is_awaiting(&self) -> bool {
        *self == SectorStatus::Awaiting
    }

    /// 是否為已識別的狀態
    pub fn is_known(&self) -> bool {
        !matches!(self, SectorStatus::Other(_))
    }
}

impl From<&str> for SectorStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "awaiting" => SectorStatus::Awaiting,
            "in-preparation" => SectorStatus::InPreparation,
            "in-progress" => SectorStatus::InProgress,
            "completed" => SectorStatus::Completed,
            _ => SectorStatus::Other(raw.to_string()),
        }
    }
}

impl From<String> for SectorStatus {
    fn from(raw: String) -> Self {
        SectorStatus::from(raw.as_str())
    }
}

impl From<SectorStatus> for String {
    fn from(status: SectorStatus) -> Self {
        match status {
            SectorStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for SectorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 工段狀態資料
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SectorState {
    /// 狀態
    pub status: SectorStatus,

    /// 負責人
    pub responsible: String,

    /// 計劃開始日
    pub planned_start: Option<NaiveDate>,

    /// 計劃完成日
    pub planned_end: Option<NaiveDate>,

    /// 備註
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// 完成百分比（0-100），未設定時不計入整體進度
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_complete: Option<Decimal>,
}

impl SectorState {
    /// 創建新的工段狀態
    pub fn new(status: impl Into<SectorStatus>, responsible: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            responsible: responsible.into(),
            ..Self::default()
        }
    }

    /// 建構器模式：設置計劃期間
    pub fn with_schedule(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.planned_start = Some(start);
        self.planned_end = Some(end);
        self
    }

    /// 建構器模式：設置完成百分比
    pub fn with_percent_complete(mut self, percent: impl Into<Decimal>) -> Self {
        self.percent_complete = Some(percent.into());
        self
    }

    /// 建構器模式：設置備註
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// 套用部分更新：只覆寫 patch 中有值的欄位
    pub fn apply(&mut self, patch: SectorPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(responsible) = patch.responsible {
            self.responsible = responsible;
        }
        if let Some(start) = patch.planned_start {
            self.planned_start = Some(start);
        }
        if let Some(end) = patch.planned_end {
            self.planned_end = Some(end);
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
        if let Some(percent) = patch.percent_complete {
            self.percent_complete = percent;
        }
    }
}

/// 工段部分更新
///
/// `notes` 與 `percent_complete` 為三態：`None` 不變更，`Some(None)` 清除，
/// `Some(Some(v))` 設定新值。JSON 中缺少欄位即不變更，明確的 `null` 即清除。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectorPatch {
    pub status: Option<SectorStatus>,
    pub responsible: Option<String>,
    pub planned_start: Option<NaiveDate>,
    pub planned_end: Option<NaiveDate>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_field"
    )]
    pub notes: Option<Option<String>>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_field"
    )]
    pub percent_complete: Option<Option<Decimal>>,
}

// 欄位出現在輸入中（包含 null）即視為要變更
fn present_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl SectorPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: impl Into<SectorStatus>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn responsible(mut self, responsible: impl Into<String>) -> Self {
        self.responsible = Some(responsible.into());
        self
    }

    pub fn schedule(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.planned_start = Some(start);
        self.planned_end = Some(end);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(Some(notes.into()));
        self
    }

    pub fn clear_notes(mut self) -> Self {
        self.notes = Some(None);
        self
    }

    pub fn percent_complete(mut self, percent: impl Into<Decimal>) -> Self {
        self.percent_complete = Some(Some(percent.into()));
        self
    }

    /// 清除完成百分比，該工段不再計入整體進度
    pub fn clear_percent_complete(mut self) -> Self {
        self.percent_complete = Some(None);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// 生產計劃
///
/// 每張報價單最多一份，建立時即包含全部六個工段。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionPlan {
    /// 生產摘要
    pub summary: String,

    /// 各工段狀態（依流程順序）
    pub sectors: BTreeMap<SectorKey, SectorState>,
}

impl ProductionPlan {
    /// 創建生產計劃，未提供的工段補上預設「等待中」狀態
    pub fn new(
        summary: impl Into<String>,
        provided: impl IntoIterator<Item = (SectorKey, SectorState)>,
    ) -> Self {
        let mut plan = Self {
            summary: summary.into(),
            sectors: provided.into_iter().collect(),
        };
        plan.fill_missing();
        plan
    }

    /// 補齊缺少的工段
    pub fn fill_missing(&mut self) {
        for key in SectorKey::ALL {
            self.sectors.entry(key).or_default();
        }
    }

    /// 是否包含全部工段
    pub fn is_complete(&self) -> bool {
        SectorKey::ALL.iter().all(|key| self.sectors.contains_key(key))
    }

    pub fn sector(&self, key: SectorKey) -> Option<&SectorState> {
        self.sectors.get(&key)
    }

    /// 可變存取；缺少的工段會先以預設狀態補上
    pub fn sector_mut(&mut self, key: SectorKey) -> &mut SectorState {
        self.sectors.entry(key).or_default()
    }

    /// 依流程順序遍歷工段
    pub fn iter(&self) -> impl Iterator<Item = (SectorKey, &SectorState)> {
        self.sectors.iter().map(|(key, state)| (*key, state))
    }
}
