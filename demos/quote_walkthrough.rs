//! 報價流程示範
//!
//! 建立報價單、核准、推進工段、更新公司資料，最後印出生產看板。

use anyhow::Result;
use chrono::{Duration, Utc};
use printquote::prelude::*;
use rust_decimal::Decimal;

fn main() -> Result<()> {
    printquote::init_tracing(tracing::Level::INFO);

    println!("=== PrintQuote 報價流程示範 ===\n");

    // 1. 目錄與公司資料
    let design = ServiceFee::project("Modelagem 3D", ProjectType::Design, Decimal::from(80));
    let store = InMemoryStore::new()
        .with_materials(vec![
            Material::new("PLA", Decimal::from(60)),
            Material::new("Resina", Decimal::from(180)),
        ])
        .with_service_fees(vec![design.clone()])
        .with_company_profile(CompanyProfile::new("Camada Impressões 3D"));

    let mut service = QuoteService::new(
        store,
        SummaryRenderer::default(),
        PricingConfig::new(Decimal::from(30)),
    );

    // 2. 建立報價單
    let now = Utc::now();
    let quote = service.create_quote(
        NewQuote::new("ORC-2025-0042", "CLI-ACME")
            .with_priority(Priority::High)
            .with_item(LineProduct::new("Redutor", 2).with_pieces(vec![
                Piece::new("Engrenagem", "PLA", Decimal::from(10), Decimal::from(2))
                    .with_quantity(3)
                    .with_additional_cost(Decimal::from(5)),
            ]))
            .with_item(LineProduct::new("Miniatura", 1).with_pieces(vec![Piece::new(
                "Figura",
                "Resina",
                Decimal::from(35),
                Decimal::new(45, 1),
            )]))
            .with_fee(design.id)
            .with_discount("10%")
            .with_schedule(Some(now), Some(now + Duration::days(2)))
            .with_production_plan(ProductionPlan::new("Lote único", Vec::new())),
    )?;

    println!("報價單 {} 建立完成", quote.code);
    for item in &quote.items {
        println!(
            "  {:<12} 數量 {:>3}  單價 {:>10}  總價 {:>10}",
            item.name, item.quantity, item.unit_value, item.total_value
        );
    }
    println!("  總計: {}", quote.total);
    if let Some(artifact) = &quote.artifact {
        println!("  文件: {}", artifact.uri);
    }

    // 3. 核准並推進工段
    service.update_status(quote.id, QuoteStatus::Accepted)?;
    service.update_sector(
        quote.id,
        SectorKey::Printing,
        SectorPatch::new()
            .status(SectorStatus::InProgress)
            .responsible("Ana")
            .percent_complete(60),
    )?;

    // 4. 公司資料變更，所有文件重新產生
    let report = service.update_company_profile(
        CompanyProfile::new("Camada Impressões 3D Ltda").with_address("Rua das Impressoras, 42"),
    )?;
    println!(
        "\n文件重新產生: 取代 {}，未變 {}，失敗 {}",
        report.replaced.len(),
        report.unchanged.len(),
        report.failed.len()
    );

    // 5. 生產看板
    let dashboard = service.dashboard(Utc::now())?;
    println!("\n=== 生產看板 ===");
    for entry in &dashboard.entries {
        let sector = entry
            .active_sector
            .map(|s| s.to_string())
            .unwrap_or_else(|| "規劃中".to_string());
        let days = entry
            .deadline
            .magnitude()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {} [{}] 工段 {} 進度 {}% 交期 {} ({} 天)",
            entry.code, entry.priority, sector, entry.progress, entry.deadline.bucket, days
        );
    }
    println!(
        "\n生產中 {}，規劃中 {}，逾期 {}，平均進度 {}%",
        dashboard.summary.in_production,
        dashboard.summary.in_planning,
        dashboard.summary.overdue,
        dashboard.summary.average_progress
    );

    Ok(())
}
