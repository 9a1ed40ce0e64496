//! 報價服務
//!
//! 串接儲存層、目錄、計價與文件快取。所有狀態都在傳入的 store 中，服務本身不持有全域資料。

use chrono::{DateTime, Utc};
use quote_calc::{
    classify, CostCalculator, Dashboard, Deadline, ProductionWorkflow, QuoteAggregator,
    QuoteBreakdown, WarningSeverity,
};
use quote_core::{
    CatalogSource, CompanyProfile, NewQuote, PricingConfig, Quote, QuoteError, QuoteFilter,
    QuoteStatus, QuoteStore, SectorKey, SectorPatch,
};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::artifact::{ArtifactCache, RefreshOutcome, RefreshReport};
use crate::renderer::DocumentRenderer;

/// 報價服務
pub struct QuoteService<S, R> {
    store: S,
    cache: ArtifactCache<R>,
    config: PricingConfig,
}

impl<S, R> QuoteService<S, R>
where
    S: QuoteStore + CatalogSource,
    R: DocumentRenderer,
{
    /// 創建報價服務
    pub fn new(store: S, renderer: R, config: PricingConfig) -> Self {
        Self {
            store,
            cache: ArtifactCache::new(renderer),
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn cache(&self) -> &ArtifactCache<R> {
        &self.cache
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// 以目前材料目錄快照建立成本計算器
    fn calculator(&self) -> CostCalculator {
        CostCalculator::new(&self.store.materials(), self.config.clone())
    }

    /// 建立報價單
    ///
    /// 報價單、產品、零件、生產計劃與工段一次寫入；之後才產生文件，文件失敗不影響建立結果。
    pub fn create_quote(&mut self, input: NewQuote) -> quote_core::Result<Quote> {
        Self::validate(&input)?;

        let selected_fees =
            QuoteAggregator::resolve_fees(&self.store.service_fees(), &input.fee_ids)?;

        let production_plan = input.production_plan.map(|mut plan| {
            plan.fill_missing();
            plan
        });

        let mut quote = Quote {
            id: Uuid::new_v4(),
            code: input.code.trim().to_string(),
            client_id: input.client_id,
            status: input.status,
            priority: input.priority,
            items: input.items,
            discount_input: input.discount_input,
            selected_fees,
            total: Decimal::ZERO,
            created_at: Utc::now(),
            planned_start: input.planned_start,
            planned_delivery: input.planned_delivery,
            current_stage: input.current_stage,
            responsible: input.responsible,
            production_plan,
            artifact: None,
        };

        let breakdown = QuoteAggregator::price_quote(&mut quote, &self.calculator())?;
        Self::log_warnings(&quote, &breakdown);

        let quote = self.store.create_quote_atomic(quote)?;
        tracing::info!("建立報價單 {}，總計 {}", quote.code, quote.total);

        let (quote, _) = self.refresh_and_persist(quote);
        Ok(quote)
    }

    pub fn get_quote(&self, id: Uuid) -> quote_core::Result<Quote> {
        self.store.get_quote(id)
    }

    pub fn list_quotes(&self, filter: Option<&QuoteFilter>) -> quote_core::Result<Vec<Quote>> {
        self.store.list_quotes(filter)
    }

    /// 列出報價單並附上交期分級
    pub fn list_with_deadlines(
        &self,
        filter: Option<&QuoteFilter>,
        now: DateTime<Utc>,
    ) -> quote_core::Result<Vec<(Quote, Deadline)>> {
        Ok(self
            .store
            .list_quotes(filter)?
            .into_iter()
            .map(|q| {
                let deadline = classify(q.planned_delivery, now);
                (q, deadline)
            })
            .collect())
    }

    /// 更新報價單狀態（直接指派，不檢查轉換路徑）
    pub fn update_status(&mut self, id: Uuid, status: QuoteStatus) -> quote_core::Result<Quote> {
        let quote = self.store.update_quote_status(id, status)?;
        tracing::info!("報價單 {} 狀態更新為 {}", quote.code, status);

        let (quote, _) = self.refresh_and_persist(quote);
        Ok(quote)
    }

    /// 以字串更新狀態；不在列舉內的值回報驗證錯誤
    pub fn update_status_str(&mut self, id: Uuid, raw: &str) -> quote_core::Result<Quote> {
        let status: QuoteStatus = raw.parse()?;
        self.update_status(id, status)
    }

    /// 更新生產工段
    pub fn update_sector(
        &mut self,
        id: Uuid,
        key: SectorKey,
        patch: SectorPatch,
    ) -> quote_core::Result<Quote> {
        let mut quote = self.store.get_quote(id)?;

        let plan = quote
            .production_plan
            .as_mut()
            .ok_or_else(|| QuoteError::not_found("生產計劃", &quote.code))?;
        ProductionWorkflow::update_sector(plan, key, patch)?;

        self.store.save_quote(&quote)?;
        tracing::info!("報價單 {} 工段 {} 已更新", quote.code, key);

        let (quote, _) = self.refresh_and_persist(quote);
        Ok(quote)
    }

    /// 修改報價單欄位
    ///
    /// 修改後重新計價並寫回；ID 不可修改，既有的生產計劃不可移除。
    pub fn edit_quote<F>(&mut self, id: Uuid, mutate: F) -> quote_core::Result<Quote>
    where
        F: FnOnce(&mut Quote),
    {
        let original = self.store.get_quote(id)?;
        let mut quote = original.clone();
        mutate(&mut quote);

        quote.id = original.id;
        quote.artifact = original.artifact.clone();

        // 生產計劃只在建立時附上，之後只能逐一更新工段
        match (&original.production_plan, &quote.production_plan) {
            (Some(_), None) => {
                return Err(QuoteError::validation("生產計劃建立後不可移除"));
            }
            (None, Some(_)) => {
                return Err(QuoteError::validation("生產計劃只能在建立報價單時設定"));
            }
            _ => {}
        }
        if quote.code.trim().is_empty() {
            return Err(QuoteError::validation("報價單編號不可空白"));
        }
        if let Some(plan) = quote.production_plan.as_mut() {
            plan.fill_missing();
            ProductionWorkflow::validate_plan(plan)?;
        }

        let breakdown = QuoteAggregator::price_quote(&mut quote, &self.calculator())?;
        Self::log_warnings(&quote, &breakdown);

        self.store.save_quote(&quote)?;
        let (quote, _) = self.refresh_and_persist(quote);
        Ok(quote)
    }

    /// 以目前目錄重新計價
    ///
    /// 金額有變化時才寫回。
    pub fn reprice_quote(&mut self, id: Uuid) -> quote_core::Result<(Quote, QuoteBreakdown)> {
        let original = self.store.get_quote(id)?;
        let mut quote = original.clone();
        let breakdown = QuoteAggregator::price_quote(&mut quote, &self.calculator())?;

        if quote == original {
            return Ok((quote, breakdown));
        }

        self.store.save_quote(&quote)?;
        let (quote, _) = self.refresh_and_persist(quote);
        Ok((quote, breakdown))
    }

    /// 明確觸發單張報價單的文件重新產生
    pub fn refresh_artifact(&mut self, id: Uuid) -> quote_core::Result<RefreshOutcome> {
        let quote = self.store.get_quote(id)?;
        let (_, outcome) = self.refresh_and_persist(quote);
        Ok(outcome)
    }

    /// 更新公司資料並重新產生所有報價單的文件
    pub fn update_company_profile(
        &mut self,
        profile: CompanyProfile,
    ) -> quote_core::Result<RefreshReport> {
        self.store.save_company_profile(profile.clone())?;
        tracing::info!("公司資料已更新，重新產生所有報價文件");

        let mut quotes = self.store.list_quotes(None)?;
        let report = self.cache.refresh_all(&mut quotes, &profile, Utc::now());

        for quote in quotes.iter().filter(|q| report.changed().any(|id| *id == q.id)) {
            if let Err(err) = self.store.save_quote(quote) {
                tracing::warn!("報價單 {} 文件寫回失敗: {}", quote.code, err);
                self.cache.mark_stale(quote.id);
            }
        }

        Ok(report)
    }

    /// 生產看板
    pub fn dashboard(&self, now: DateTime<Utc>) -> quote_core::Result<Dashboard> {
        let filter = QuoteFilter::new().with_status(QuoteStatus::Accepted);
        let quotes = self.store.list_quotes(Some(&filter))?;
        Ok(Dashboard::build(&quotes, now))
    }

    /// 重新產生文件，有變更時寫回
    ///
    /// 任何失敗都只記錄並標記過期，不影響呼叫端的操作結果。
    fn refresh_and_persist(&mut self, mut quote: Quote) -> (Quote, RefreshOutcome) {
        let company = match self.store.company_profile() {
            Ok(company) => company,
            Err(err) => {
                tracing::warn!("讀取公司資料失敗，報價單 {} 文件未更新: {}", quote.code, err);
                self.cache.mark_stale(quote.id);
                return (quote, RefreshOutcome::Failed(err.to_string()));
            }
        };

        let previous = quote.artifact.clone();
        let outcome = self.cache.refresh(&mut quote, &company, Utc::now());

        if outcome.changed() {
            if let Err(err) = self.store.save_quote(&quote) {
                tracing::warn!("報價單 {} 文件寫回失敗: {}", quote.code, err);
                self.cache.mark_stale(quote.id);
                quote.artifact = previous;
                return (quote, RefreshOutcome::Failed(err.to_string()));
            }
        }

        (quote, outcome)
    }

    fn log_warnings(quote: &Quote, breakdown: &QuoteBreakdown) {
        for warning in &breakdown.warnings {
            match warning.severity {
                WarningSeverity::Info => tracing::info!(
                    "報價單 {} 計價提示 [{}]: {}",
                    quote.code,
                    warning.subject,
                    warning.message
                ),
                WarningSeverity::Warning => tracing::warn!(
                    "報價單 {} 計價警告 [{}]: {}",
                    quote.code,
                    warning.subject,
                    warning.message
                ),
            }
        }
    }

    /// 建立前的輸入檢查
    fn validate(input: &NewQuote) -> quote_core::Result<()> {
        if input.code.trim().is_empty() {
            return Err(QuoteError::validation("報價單編號不可空白"));
        }
        if input.client_id.trim().is_empty() {
            return Err(QuoteError::validation("必須指定客戶"));
        }
        if !input.status.is_initial() {
            return Err(QuoteError::validation(format!(
                "新報價單狀態只能是 draft 或 sent，收到 {}",
                input.status
            )));
        }
        if input.items.is_empty() {
            return Err(QuoteError::validation("報價單至少需要一項產品"));
        }

        for product in &input.items {
            if product.quantity == 0 {
                return Err(QuoteError::validation(format!(
                    "產品 {} 數量必須大於 0",
                    product.name
                )));
            }
            if product.pieces.is_empty() {
                return Err(QuoteError::validation(format!(
                    "產品 {} 至少需要一個零件",
                    product.name
                )));
            }
            for piece in &product.pieces {
                if piece.quantity == 0 {
                    return Err(QuoteError::validation(format!(
                        "零件 {} 數量必須大於 0",
                        piece.name
                    )));
                }
                if piece.weight_grams < Decimal::ZERO
                    || piece.print_hours < Decimal::ZERO
                    || piece.additional_cost < Decimal::ZERO
                {
                    return Err(QuoteError::validation(format!(
                        "零件 {} 的重量、時數與額外成本不可為負數",
                        piece.name
                    )));
                }
            }
        }

        match &input.production_plan {
            Some(plan) => ProductionWorkflow::validate_plan(plan),
            None => Ok(()),
        }
    }
}
