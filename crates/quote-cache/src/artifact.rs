//! 報價文件快取
//!
//! 每張報價單的文件必須等於以「目前」報價內容與「目前」公司資料產生的結果。
//! 每次觸發都同步重新產生；只有 uri 或檔名改變時才寫回報價單，避免多餘的下游通知。

use chrono::{DateTime, Utc};
use quote_core::{Artifact, CompanyProfile, Quote};
use uuid::Uuid;

use crate::dirty_tracking::StaleArtifactTracker;
use crate::renderer::DocumentRenderer;

/// 單次重新產生的結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// 原本沒有文件，已建立
    Created,
    /// 內容改變，已取代
    Replaced,
    /// 與現有文件相同，未修改
    Unchanged,
    /// 產生失敗，保留原文件（或維持無文件）
    Failed(String),
}

impl RefreshOutcome {
    /// 報價單是否需要寫回儲存層
    pub fn changed(&self) -> bool {
        matches!(self, RefreshOutcome::Created | RefreshOutcome::Replaced)
    }
}

/// 批次重新產生的統計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    pub created: Vec<Uuid>,
    pub replaced: Vec<Uuid>,
    pub unchanged: Vec<Uuid>,
    pub failed: Vec<Uuid>,
}

impl RefreshReport {
    /// 需要寫回的報價單
    pub fn changed(&self) -> impl Iterator<Item = &Uuid> {
        self.created.iter().chain(self.replaced.iter())
    }

    /// 處理的報價單總數
    pub fn total(&self) -> usize {
        self.created.len() + self.replaced.len() + self.unchanged.len() + self.failed.len()
    }

    fn record(&mut self, quote_id: Uuid, outcome: &RefreshOutcome) {
        match outcome {
            RefreshOutcome::Created => self.created.push(quote_id),
            RefreshOutcome::Replaced => self.replaced.push(quote_id),
            RefreshOutcome::Unchanged => self.unchanged.push(quote_id),
            RefreshOutcome::Failed(_) => self.failed.push(quote_id),
        }
    }
}

/// 文件快取
pub struct ArtifactCache<R> {
    renderer: R,
    stale: StaleArtifactTracker,
}

impl<R: DocumentRenderer> ArtifactCache<R> {
    pub fn new(renderer: R) -> Self {
        Self {
            renderer,
            stale: StaleArtifactTracker::new(),
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// 過期文件追蹤器
    pub fn stale(&self) -> &StaleArtifactTracker {
        &self.stale
    }

    /// 標記報價文件為過期（例如寫回失敗時）
    pub fn mark_stale(&mut self, quote_id: Uuid) {
        self.stale.mark_stale(quote_id);
    }

    /// 重新產生單張報價單的文件
    ///
    /// 新文件與現有文件的 uri、檔名皆相同時視為未變更，保留原產生時間。
    pub fn refresh(
        &mut self,
        quote: &mut Quote,
        company: &CompanyProfile,
        now: DateTime<Utc>,
    ) -> RefreshOutcome {
        let rendered = match self.renderer.render(quote, company) {
            Ok(rendered) => rendered,
            Err(err) => {
                tracing::warn!("報價單 {} 文件產生失敗，保留原文件: {}", quote.code, err);
                self.stale.mark_stale(quote.id);
                return RefreshOutcome::Failed(err.to_string());
            }
        };

        self.stale.clear(quote.id);

        let fresh = Artifact {
            uri: rendered.uri,
            file_name: rendered.file_name,
            generated_at: now,
        };

        let outcome = match &quote.artifact {
            Some(existing) if existing.same_document(&fresh) => RefreshOutcome::Unchanged,
            Some(_) => RefreshOutcome::Replaced,
            None => RefreshOutcome::Created,
        };

        if outcome.changed() {
            tracing::debug!("報價單 {} 文件更新: {}", quote.code, fresh.uri);
            quote.artifact = Some(fresh);
        }

        outcome
    }

    /// 重新產生所有報價單的文件（公司資料變更時使用）
    pub fn refresh_all(
        &mut self,
        quotes: &mut [Quote],
        company: &CompanyProfile,
        now: DateTime<Utc>,
    ) -> RefreshReport {
        let mut report = RefreshReport::default();

        for quote in quotes.iter_mut() {
            let outcome = self.refresh(quote, company, now);
            report.record(quote.id, &outcome);
        }

        tracing::info!(
            "文件重新產生完成: 共 {} 張，建立 {}，取代 {}，未變 {}，失敗 {}",
            report.total(),
            report.created.len(),
            report.replaced.len(),
            report.unchanged.len(),
            report.failed.len()
        );

        report
    }
}
