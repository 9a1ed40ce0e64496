//! 生產看板彙總

use chrono::{DateTime, Utc};
use quote_core::{Priority, Quote, SectorKey};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::cost::round_money;
use crate::deadline::{classify, Deadline, DeadlineBucket};
use crate::workflow::ProductionWorkflow;

/// 看板上的單張報價單
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardEntry {
    pub quote_id: Uuid,
    pub code: String,
    pub priority: Priority,

    /// 整體進度（0-100）
    pub progress: Decimal,

    /// 目前工段；None 表示尚在規劃
    pub active_sector: Option<SectorKey>,

    pub deadline: Deadline,
}

/// 看板統計
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardSummary {
    /// 已有工段開始作業的報價單數
    pub in_production: usize,
    /// 尚在規劃的報價單數
    pub in_planning: usize,
    pub overdue: usize,
    pub due_today: usize,
    pub due_soon: usize,
    /// 平均進度（到小數兩位）
    pub average_progress: Decimal,
}

/// 生產看板
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dashboard {
    pub entries: Vec<DashboardEntry>,
    pub summary: DashboardSummary,
}

impl Dashboard {
    /// 由報價單建立看板
    ///
    /// 只納入已核准且有生產計劃的報價單；排序為優先級高者在前，同級依剩餘天數由少到多，
    /// 未設定交期者排最後。
    pub fn build(quotes: &[Quote], now: DateTime<Utc>) -> Self {
        let mut entries: Vec<DashboardEntry> = quotes
            .iter()
            .filter(|q| q.is_in_production())
            .filter_map(|q| {
                let plan = q.production_plan.as_ref()?;
                Some(DashboardEntry {
                    quote_id: q.id,
                    code: q.code.clone(),
                    priority: q.priority,
                    progress: ProductionWorkflow::aggregate_progress(plan),
                    active_sector: ProductionWorkflow::active_sector(plan),
                    deadline: classify(q.planned_delivery, now),
                })
            })
            .collect();

        entries.sort_by(|a, b| {
            b.priority
                .cmp(&a.priority)
                .then_with(|| match (a.deadline.days_delta, b.deadline.days_delta) {
                    (Some(x), Some(y)) => x.cmp(&y),
                    (Some(_), None) => std::cmp::Ordering::Less,
                    (None, Some(_)) => std::cmp::Ordering::Greater,
                    (None, None) => std::cmp::Ordering::Equal,
                })
                .then_with(|| a.code.cmp(&b.code))
        });

        let summary = Self::summarize(&entries);
        tracing::debug!(
            "看板: {} 張報價單生產中, {} 張規劃中, {} 張逾期",
            summary.in_production,
            summary.in_planning,
            summary.overdue
        );

        Self { entries, summary }
    }

    fn summarize(entries: &[DashboardEntry]) -> DashboardSummary {
        let count = |bucket: DeadlineBucket| {
            entries
                .iter()
                .filter(|e| e.deadline.bucket == bucket)
                .count()
        };

        let average_progress = if entries.is_empty() {
            Decimal::ZERO
        } else {
            let total: Decimal = entries.iter().map(|e| e.progress).sum();
            round_money(total / Decimal::from(entries.len()))
        };

        DashboardSummary {
            in_production: entries.iter().filter(|e| e.active_sector.is_some()).count(),
            in_planning: entries.iter().filter(|e| e.active_sector.is_none()).count(),
            overdue: count(DeadlineBucket::Overdue),
            due_today: count(DeadlineBucket::Today),
            due_soon: count(DeadlineBucket::Warning),
            average_progress,
        }
    }

    /// 取得指定報價單的看板項目
    pub fn entry(&self, quote_id: Uuid) -> Option<&DashboardEntry> {
        self.entries.iter().find(|e| e.quote_id == quote_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use quote_core::{ProductionPlan, QuoteStatus, SectorState, SectorStatus};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 10, 9, 0, 0).unwrap()
    }

    fn quote(
        code: &str,
        status: QuoteStatus,
        priority: Priority,
        delivery: Option<DateTime<Utc>>,
        plan: Option<ProductionPlan>,
    ) -> Quote {
        Quote {
            id: Uuid::new_v4(),
            code: code.to_string(),
            client_id: "CLI-1".to_string(),
            status,
            priority,
            items: Vec::new(),
            discount_input: String::new(),
            selected_fees: Vec::new(),
            total: Decimal::ZERO,
            created_at: now(),
            planned_start: None,
            planned_delivery: delivery,
            current_stage: String::new(),
            responsible: String::new(),
            production_plan: plan,
            artifact: None,
        }
    }

    fn running_plan(percent: u8) -> ProductionPlan {
        ProductionPlan::new(
            "",
            vec![(
                SectorKey::Printing,
                SectorState::new(SectorStatus::InProgress, "Ana").with_percent_complete(percent),
            )],
        )
    }

    #[test]
    fn test_dashboard_filters_and_orders() {
        let quotes = vec![
            quote(
                "ORC-1",
                QuoteStatus::Accepted,
                Priority::Medium,
                Some(now() + Duration::days(5)),
                Some(running_plan(40)),
            ),
            quote(
                "ORC-2",
                QuoteStatus::Accepted,
                Priority::High,
                Some(now() - Duration::days(1)),
                Some(ProductionPlan::new("", Vec::new())),
            ),
            quote("ORC-3", QuoteStatus::Sent, Priority::High, None, None),
            quote(
                "ORC-4",
                QuoteStatus::Accepted,
                Priority::Medium,
                Some(now() + Duration::days(1)),
                Some(running_plan(80)),
            ),
            quote(
                "ORC-5",
                QuoteStatus::Accepted,
                Priority::Medium,
                None,
                Some(running_plan(0)),
            ),
        ];

        let dashboard = Dashboard::build(&quotes, now());
        let codes: Vec<_> = dashboard.entries.iter().map(|e| e.code.as_str()).collect();
        assert_eq!(codes, vec!["ORC-2", "ORC-4", "ORC-1", "ORC-5"]);

        let summary = &dashboard.summary;
        assert_eq!(summary.in_production, 3);
        assert_eq!(summary.in_planning, 1);
        assert_eq!(summary.overdue, 1);
        assert_eq!(summary.due_soon, 1);
        assert_eq!(summary.due_today, 0);
        assert_eq!(summary.average_progress, Decimal::from(30));
    }

    #[test]
    fn test_entry_lookup() {
        let q = quote(
            "ORC-9",
            QuoteStatus::Accepted,
            Priority::Low,
            None,
            Some(running_plan(10)),
        );
        let id = q.id;
        let dashboard = Dashboard::build(&[q], now());

        let entry = dashboard.entry(id).unwrap();
        assert_eq!(entry.active_sector, Some(SectorKey::Printing));
        assert_eq!(entry.deadline.bucket, DeadlineBucket::Undefined);
    }

    #[test]
    fn test_empty_dashboard() {
        let dashboard = Dashboard::build(&[], now());
        assert!(dashboard.entries.is_empty());
        assert_eq!(dashboard.summary, DashboardSummary::default());
    }
}
