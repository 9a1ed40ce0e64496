//! 生產流程計算
//!
//! 工段之間不檢查先後順序：後段可以先標記完成，前段仍在等待中。

use quote_core::{ProductionPlan, QuoteError, SectorKey, SectorPatch, SectorStatus};
use rust_decimal::Decimal;

/// 完成百分比上限
const MAX_PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// 生產流程計算器
pub struct ProductionWorkflow;

impl ProductionWorkflow {
    /// 更新指定工段
    ///
    /// 只覆寫 patch 中有值的欄位。狀態接受任何字串，只檢查完成百分比範圍。
    pub fn update_sector(
        plan: &mut ProductionPlan,
        key: SectorKey,
        patch: SectorPatch,
    ) -> quote_core::Result<()> {
        if let Some(Some(percent)) = patch.percent_complete {
            Self::check_percent(key, percent)?;
        }

        if let Some(SectorStatus::Other(raw)) = &patch.status {
            tracing::debug!("工段 {} 使用未識別狀態: {}", key, raw);
        }

        plan.sector_mut(key).apply(patch);
        Ok(())
    }

    /// 完成百分比必須介於 0 到 100（可含小數）
    pub fn check_percent(key: SectorKey, percent: Decimal) -> quote_core::Result<()> {
        if percent < Decimal::ZERO || percent > MAX_PERCENT {
            return Err(QuoteError::validation(format!(
                "工段 {} 完成百分比超出範圍: {}",
                key, percent
            )));
        }
        Ok(())
    }

    /// 檢查整份計劃中已設定的完成百分比
    pub fn validate_plan(plan: &ProductionPlan) -> quote_core::Result<()> {
        plan.iter().try_for_each(|(key, state)| match state.percent_complete {
            Some(percent) => Self::check_percent(key, percent),
            None => Ok(()),
        })
    }

    /// 整體進度：有設定完成百分比的工段取平均；皆未設定時為 0
    pub fn aggregate_progress(plan: &ProductionPlan) -> Decimal {
        let defined: Vec<Decimal> = plan
            .iter()
            .filter_map(|(_, state)| state.percent_complete)
            .collect();

        if defined.is_empty() {
            return Decimal::ZERO;
        }

        defined.iter().sum::<Decimal>() / Decimal::from(defined.len())
    }

    /// 目前作業中的工段
    ///
    /// 依流程順序取第一個準備中/進行中的工段；若無，取第一個非等待中的工段；
    /// 仍無則回傳 None（尚在規劃）。
    pub fn active_sector(plan: &ProductionPlan) -> Option<SectorKey> {
        plan.iter()
            .find(|(_, state)| state.status.is_active())
            .or_else(|| plan.iter().find(|(_, state)| !state.status.is_awaiting()))
            .map(|(key, _)| key)
    }

    /// 已完成的工段數
    pub fn completed_sectors(plan: &ProductionPlan) -> usize {
        plan.iter()
            .filter(|(_, state)| state.status == SectorStatus::Completed)
            .count()
    }

    /// 全部工段是否皆已完成
    pub fn is_finished(plan: &ProductionPlan) -> bool {
        Self::completed_sectors(plan) == SectorKey::ALL.len()
    }
}
