//! 報價單金額彙總

use quote_core::{LineProduct, Quote, QuoteError, ServiceFee};
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use crate::cost::{amount_overflow, round_money, CostCalculator};
use crate::PricingWarning;

/// `Decimal` 可保存的有效位數
const MAX_SIGNIFICANT_DIGITS: usize = 28;

/// 解析折扣輸入
///
/// 只保留數字、`.`、`,`、`-`，逗號視為小數點，取開頭可解析的數值；沒有任何數字時為 0。
/// 整數部分超出 `Decimal` 範圍時飽和到 `Decimal::MAX` / `Decimal::MIN`，過長的小數位截斷。
///
/// 注意：`%` 會被移除，`"10%"` 解析為金額 10，而不是小計的 10%。
///
/// ```
/// # use quote_calc::parse_discount;
/// # use rust_decimal::Decimal;
/// assert_eq!(parse_discount("10%"), Decimal::from(10));
/// assert_eq!(parse_discount("R$ 25,50"), Decimal::new(2550, 2));
/// assert_eq!(parse_discount("abc"), Decimal::ZERO);
/// assert_eq!(parse_discount("99999999999999999999999999999999"), Decimal::MAX);
/// ```
pub fn parse_discount(input: &str) -> Decimal {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ',' | '-'))
        .map(|c| if c == ',' { '.' } else { c })
        .collect();

    match leading_number(&cleaned) {
        Some(number) => number.to_decimal(),
        None => Decimal::ZERO,
    }
}

/// 字串開頭的數值片段
struct LeadingNumber<'a> {
    negative: bool,
    int_part: &'a str,
    frac_part: &'a str,
}

impl LeadingNumber<'_> {
    fn to_decimal(&self) -> Decimal {
        let int_part = self.int_part.trim_start_matches('0');
        let int_part = if int_part.is_empty() { "0" } else { int_part };

        let frac_room = MAX_SIGNIFICANT_DIGITS.saturating_sub(int_part.len());
        let frac_part = &self.frac_part[..self.frac_part.len().min(frac_room)];

        let sign = if self.negative { "-" } else { "" };
        let text = if frac_part.is_empty() {
            format!("{}{}", sign, int_part)
        } else {
            format!("{}{}.{}", sign, int_part, frac_part)
        };

        Decimal::from_str(&text).unwrap_or(if self.negative {
            Decimal::MIN
        } else {
            Decimal::MAX
        })
    }
}

/// 取字串開頭最長的 `-?digits(.digits)?` 片段
fn leading_number(s: &str) -> Option<LeadingNumber<'_>> {
    let (negative, rest) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s),
    };

    let int_len = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
    let (int_part, tail) = rest.split_at(int_len);

    let frac_part = tail
        .strip_prefix('.')
        .map(|t| {
            let len = t.find(|c: char| !c.is_ascii_digit()).unwrap_or(t.len());
            &t[..len]
        })
        .unwrap_or("");

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    Some(LeadingNumber {
        negative,
        int_part,
        frac_part,
    })
}

/// 逐項加總；溢位時回傳 None
fn checked_sum(values: impl IntoIterator<Item = Decimal>) -> Option<Decimal> {
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| acc.checked_add(value))
}

/// 報價單金額明細
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteBreakdown {
    /// 產品總價合計
    pub products_total: Decimal,
    /// 專案類型費
    pub project_fee: Decimal,
    /// 附加費用合計
    pub extra_fees: Decimal,
    pub subtotal: Decimal,
    /// 解析後的折扣金額
    pub discount: Decimal,
    pub total: Decimal,
    pub warnings: Vec<PricingWarning>,
}

/// 報價單彙總器
pub struct QuoteAggregator;

impl QuoteAggregator {
    /// 小計：Σ 產品總價 + 專案類型費 + Σ 附加費用
    ///
    /// 加總溢位時回報驗證錯誤。
    pub fn subtotal(
        products: &[LineProduct],
        project_fee: Decimal,
        extra_fees: &[ServiceFee],
    ) -> quote_core::Result<Decimal> {
        let products_total = checked_sum(products.iter().map(|p| p.total_value));
        let extras_total = checked_sum(extra_fees.iter().map(|f| f.amount));

        products_total
            .zip(extras_total)
            .and_then(|(products, extras)| products.checked_add(project_fee)?.checked_add(extras))
            .ok_or_else(|| amount_overflow("小計"))
    }

    /// 總計：max(小計 - 折扣, 0)，四捨五入到分
    ///
    /// 相減溢位時飽和：負折扣往上溢位得 `Decimal::MAX`，往下溢位得 0。
    pub fn total(subtotal: Decimal, discount: Decimal) -> Decimal {
        let net = subtotal.checked_sub(discount).unwrap_or(if discount.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::ZERO
        });

        round_money(net.max(Decimal::ZERO))
    }

    /// 依ID從目錄快照解析服務費用
    pub fn resolve_fees(catalog: &[ServiceFee], ids: &[Uuid]) -> quote_core::Result<Vec<ServiceFee>> {
        ids.iter()
            .map(|id| {
                catalog
                    .iter()
                    .find(|fee| fee.id == *id)
                    .cloned()
                    .ok_or_else(|| QuoteError::not_found("服務費用", id))
            })
            .collect()
    }

    /// 拆分專案類型費與附加費用
    ///
    /// 每張報價單最多一項專案類型費；未選時為 0。
    pub fn split_fees(selected: &[ServiceFee]) -> quote_core::Result<(Decimal, Vec<ServiceFee>)> {
        let (project, extras): (Vec<&ServiceFee>, Vec<&ServiceFee>) =
            selected.iter().partition(|fee| fee.is_project());

        if project.len() > 1 {
            return Err(QuoteError::validation(format!(
                "專案類型費最多選一項，收到 {} 項",
                project.len()
            )));
        }

        let project_fee = project.first().map_or(Decimal::ZERO, |fee| fee.amount);
        Ok((project_fee, extras.into_iter().cloned().collect()))
    }

    /// 重新計算報價單所有快取金額
    ///
    /// 逐項重算產品單價與總價，再以報價單本身的費用與折扣輸入重算總計並寫回 `quote.total`。
    pub fn price_quote(quote: &mut Quote, calc: &CostCalculator) -> quote_core::Result<QuoteBreakdown> {
        let mut warnings: Vec<PricingWarning> = calc
            .missing_materials(&quote.items)
            .into_iter()
            .map(|name| {
                PricingWarning::warning(name.to_string(), "材料不在目錄中，每克成本以 0 計價".to_string())
            })
            .collect();

        for product in quote.items.iter_mut() {
            calc.price_product(product)?;
        }

        let (project_fee, extras) = Self::split_fees(&quote.selected_fees)?;
        let products_total = checked_sum(quote.items.iter().map(|p| p.total_value))
            .ok_or_else(|| amount_overflow("產品總價"))?;
        let extra_fees = checked_sum(extras.iter().map(|f| f.amount))
            .ok_or_else(|| amount_overflow("附加費用"))?;
        let subtotal = Self::subtotal(&quote.items, project_fee, &extras)?;

        let discount = parse_discount(&quote.discount_input);
        if quote.discount_input.contains('%') {
            warnings.push(PricingWarning::info(
                quote.discount_input.clone(),
                "折扣中的 % 被忽略，數值以金額扣除".to_string(),
            ));
        }
        if discount < Decimal::ZERO {
            warnings.push(PricingWarning::warning(
                quote.discount_input.clone(),
                "折扣為負數，總計將高於小計".to_string(),
            ));
        }

        let total = Self::total(subtotal, discount);
        quote.total = total;

        tracing::info!(
            "報價單 {} 小計 {} 折扣 {} 總計 {}",
            quote.code,
            subtotal,
            discount,
            total
        );

        Ok(QuoteBreakdown {
            products_total,
            project_fee,
            extra_fees,
            subtotal,
            discount,
            total,
            warnings,
        })
    }
}
