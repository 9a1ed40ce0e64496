//! 儲存與目錄介面
//!
//! 引擎不持有全域狀態，所有讀寫都經由呼叫端傳入的 store 物件。

use std::collections::HashMap;
use uuid::Uuid;

use crate::{
    CompanyProfile, Material, Priority, Quote, QuoteError, QuoteStatus, Result, ServiceFee,
};

/// 報價單查詢條件
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuoteFilter {
    pub status: Option<QuoteStatus>,
    pub priority: Option<Priority>,
    pub client_id: Option<String>,
}

impl QuoteFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: QuoteStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.client_id = Some(client_id.into());
        self
    }

    /// 檢查報價單是否符合條件
    pub fn matches(&self, quote: &Quote) -> bool {
        self.status.map_or(true, |s| quote.status == s)
            && self.priority.map_or(true, |p| quote.priority == p)
            && self
                .client_id
                .as_deref()
                .map_or(true, |c| quote.client_id == c)
    }
}

/// 目錄來源（材料與服務費用的唯讀快照）
pub trait CatalogSource {
    fn materials(&self) -> Vec<Material>;
    fn service_fees(&self) -> Vec<ServiceFee>;
}

/// 報價單儲存介面
pub trait QuoteStore {
    /// 原子建立報價單（連同產品、零件、生產計劃與工段）
    ///
    /// 失敗時不得留下任何部分資料。
    fn create_quote_atomic(&mut self, quote: Quote) -> Result<Quote>;

    /// 列出報價單（依建立順序）
    fn list_quotes(&self, filter: Option<&QuoteFilter>) -> Result<Vec<Quote>>;

    fn get_quote(&self, id: Uuid) -> Result<Quote>;

    fn update_quote_status(&mut self, id: Uuid, status: QuoteStatus) -> Result<Quote>;

    /// 覆寫既有報價單
    fn save_quote(&mut self, quote: &Quote) -> Result<()>;

    fn company_profile(&self) -> Result<CompanyProfile>;

    fn save_company_profile(&mut self, profile: CompanyProfile) -> Result<()>;
}

/// 記憶體儲存
#[derive(Debug, Default)]
pub struct InMemoryStore {
    quotes: HashMap<Uuid, Quote>,
    codes: HashMap<String, Uuid>,
    order: Vec<Uuid>,
    materials: Vec<Material>,
    service_fees: Vec<ServiceFee>,
    company: CompanyProfile,
    writes: u64,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置材料目錄
    pub fn with_materials(mut self, materials: Vec<Material>) -> Self {
        self.materials = materials;
        self
    }

    /// 建構器模式：設置服務費用目錄
    pub fn with_service_fees(mut self, service_fees: Vec<ServiceFee>) -> Self {
        self.service_fees = service_fees;
        self
    }

    /// 建構器模式：設置公司資料
    pub fn with_company_profile(mut self, company: CompanyProfile) -> Self {
        self.company = company;
        self
    }

    /// 新增或整筆取代材料（以名稱比對）
    pub fn upsert_material(&mut self, material: Material) {
        match self.materials.iter_mut().find(|m| m.name == material.name) {
            Some(existing) => *existing = material,
            None => self.materials.push(material),
        }
    }

    /// 已提交的寫入次數
    pub fn write_count(&self) -> u64 {
        self.writes
    }

    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

impl CatalogSource for InMemoryStore {
    fn materials(&self) -> Vec<Material> {
        self.materials.clone()
    }

    fn service_fees(&self) -> Vec<ServiceFee> {
        self.service_fees.clone()
    }
}

impl QuoteStore for InMemoryStore {
    fn create_quote_atomic(&mut self, quote: Quote) -> Result<Quote> {
        // 先完成所有檢查，再一次寫入
        if self.codes.contains_key(&quote.code) {
            return Err(QuoteError::DuplicateCode(quote.code));
        }
        if self.quotes.contains_key(&quote.id) {
            return Err(QuoteError::validation(format!("報價單ID已存在: {}", quote.id)));
        }

        self.codes.insert(quote.code.clone(), quote.id);
        self.order.push(quote.id);
        self.quotes.insert(quote.id, quote.clone());
        self.writes += 1;

        Ok(quote)
    }

    fn list_quotes(&self, filter: Option<&QuoteFilter>) -> Result<Vec<Quote>> {
        Ok(self
            .order
            .iter()
            .filter_map(|id| self.quotes.get(id))
            .filter(|q| filter.map_or(true, |f| f.matches(q)))
            .cloned()
            .collect())
    }

    fn get_quote(&self, id: Uuid) -> Result<Quote> {
        self.quotes
            .get(&id)
            .cloned()
            .ok_or_else(|| QuoteError::not_found("報價單", id))
    }

    fn update_quote_status(&mut self, id: Uuid, status: QuoteStatus) -> Result<Quote> {
        let quote = self
            .quotes
            .get_mut(&id)
            .ok_or_else(|| QuoteError::not_found("報價單", id))?;

        quote.status = status;
        self.writes += 1;

        Ok(quote.clone())
    }

    fn save_quote(&mut self, quote: &Quote) -> Result<()> {
        let previous_code = self
            .quotes
            .get(&quote.id)
            .map(|q| q.code.clone())
            .ok_or_else(|| QuoteError::not_found("報價單", quote.id))?;

        if previous_code != quote.code {
            if self.codes.contains_key(&quote.code) {
                return Err(QuoteError::DuplicateCode(quote.code.clone()));
            }
            self.codes.remove(&previous_code);
            self.codes.insert(quote.code.clone(), quote.id);
        }

        self.quotes.insert(quote.id, quote.clone());
        self.writes += 1;

        Ok(())
    }

    fn company_profile(&self) -> Result<CompanyProfile> {
        Ok(self.company.clone())
    }

    fn save_company_profile(&mut self, profile: CompanyProfile) -> Result<()> {
        self.company = profile;
        self.writes += 1;
        Ok(())
    }
}
