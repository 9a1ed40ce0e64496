//! 集成測試

use chrono::{Duration, TimeZone, Utc};
use printquote::prelude::*;
use quote_calc::{DeadlineBucket, QuoteBreakdown};
use quote_core::QuoteStore;
use rust_decimal::Decimal;

fn catalog_store() -> (InMemoryStore, ServiceFee, ServiceFee) {
    let design = ServiceFee::project("Modelagem 3D", ProjectType::Design, Decimal::from(120));
    let packaging = ServiceFee::extra("Embalagem especial", Decimal::new(1550, 2));

    let store = InMemoryStore::new()
        .with_materials(vec![
            Material::new("PLA", Decimal::from(60)),
            Material::new("PETG", Decimal::from(90)),
        ])
        .with_service_fees(vec![design.clone(), packaging.clone()])
        .with_company_profile(
            CompanyProfile::new("Camada Impressões 3D")
                .with_tax_id("12.345.678/0001-90")
                .with_contact("contato@camada.dev", "+55 11 4000-1234"),
        );

    (store, design, packaging)
}

#[test]
fn test_single_product_scenario() {
    // 場景：PLA 每公斤 60，零件 10g、2 小時、額外 5，機時 30，數量 3；產品數量 2

    // 1. 目錄與配置
    let (store, _, _) = catalog_store();
    let mut service = QuoteService::new(
        store,
        SummaryRenderer::default(),
        PricingConfig::new(Decimal::from(30)),
    );

    // 2. 建立報價單
    let piece = Piece::new("Engrenagem", "PLA", Decimal::from(10), Decimal::from(2))
        .with_quantity(3)
        .with_additional_cost(Decimal::from(5));
    let quote = service
        .create_quote(
            NewQuote::new("ORC-2025-0001", "CLI-ACME")
                .with_item(LineProduct::new("Redutor", 2).with_pieces(vec![piece]))
                .with_discount("0"),
        )
        .unwrap();

    // 3. 驗證金額
    assert_eq!(quote.items[0].unit_value, Decimal::new(2256, 1));
    assert_eq!(quote.items[0].total_value, Decimal::new(4512, 1));
    assert_eq!(quote.total, Decimal::new(4512, 1));
    assert_eq!(quote.status, QuoteStatus::Draft);

    // 4. 文件已產生
    let artifact = quote.artifact.as_ref().unwrap();
    assert_eq!(artifact.file_name, "orcamento-ORC-2025-0001.pdf");
}

#[test]
fn test_multi_product_quote_with_fees() {
    // 場景：兩項產品 + 設計費 + 包裝費，折扣輸入 "10%"（以金額 10 扣除）
    let (store, design, packaging) = catalog_store();
    let mut service = QuoteService::new(
        store,
        SummaryRenderer::default(),
        PricingConfig::new(Decimal::from(25)),
    );

    // 燈罩：PETG 每克 1.53；40g × 1.53 + 3h × 25 = 136.2
    let shade = LineProduct::new("Cúpula", 1).with_pieces(vec![Piece::new(
        "Cúpula",
        "PETG",
        Decimal::from(40),
        Decimal::from(3),
    )]);

    // 底座：PLA 每克 1.02；(25g × 1.02 + 1h × 25 + 2.5) × 2 = 106
    let base = LineProduct::new("Base", 3).with_pieces(vec![Piece::new(
        "Base",
        "PLA",
        Decimal::from(25),
        Decimal::ONE,
    )
    .with_quantity(2)
    .with_additional_cost(Decimal::new(25, 1))]);

    let quote = service
        .create_quote(
            NewQuote::new("ORC-2025-0002", "CLI-LUZ")
                .with_status(QuoteStatus::Sent)
                .with_priority(Priority::High)
                .with_item(shade)
                .with_item(base)
                .with_fee(design.id)
                .with_fee(packaging.id)
                .with_discount("10%"),
        )
        .unwrap();

    assert_eq!(quote.items[0].total_value, Decimal::new(1362, 1));
    assert_eq!(quote.items[1].unit_value, Decimal::from(106));
    assert_eq!(quote.items[1].total_value, Decimal::from(318));

    // 136.2 + 318 + 120 + 15.5 - 10 = 579.7
    assert_eq!(quote.total, Decimal::new(5797, 1));

    let (_, breakdown): (Quote, QuoteBreakdown) = service.reprice_quote(quote.id).unwrap();
    assert_eq!(breakdown.project_fee, Decimal::from(120));
    assert_eq!(breakdown.extra_fees, Decimal::new(1550, 2));
    assert_eq!(breakdown.discount, Decimal::from(10));
}

#[test]
fn test_catalog_change_reprices_on_request() {
    let (store, _, _) = catalog_store();
    let piece = Piece::new("Suporte", "PLA", Decimal::from(100), Decimal::ZERO);

    // 先以原價建立
    let mut service = QuoteService::new(
        store,
        SummaryRenderer::default(),
        PricingConfig::new(Decimal::ZERO),
    );
    let quote = service
        .create_quote(
            NewQuote::new("ORC-2025-0003", "CLI-1")
                .with_item(LineProduct::new("Suporte", 1).with_pieces(vec![piece])),
        )
        .unwrap();
    assert_eq!(quote.total, Decimal::from(102));

    // 材料目錄整筆取代後重新計價
    let mut store = service.into_store();
    store.upsert_material(Material::new("PLA", Decimal::from(100)));
    let mut service = QuoteService::new(
        store,
        SummaryRenderer::default(),
        PricingConfig::new(Decimal::ZERO),
    );

    let (repriced, _) = service.reprice_quote(quote.id).unwrap();
    assert_eq!(repriced.total, Decimal::from(170));
    assert_ne!(repriced.artifact, quote.artifact);
}

#[test]
fn test_production_workflow_lifecycle() {
    let (store, _, _) = catalog_store();
    let mut service = QuoteService::new(
        store,
        SummaryRenderer::default(),
        PricingConfig::new(Decimal::from(30)),
    );
    let now = Utc.with_ymd_and_hms(2025, 11, 10, 8, 0, 0).unwrap();

    // 1. 建立含生產計劃的報價單（只指定列印工段）
    let plan = ProductionPlan::new(
        "Lote único, PLA preto",
        vec![(
            SectorKey::Printing,
            SectorState::new(SectorStatus::Awaiting, "Ana"),
        )],
    );
    let quote = service
        .create_quote(
            NewQuote::new("ORC-2025-0004", "CLI-ROBO")
                .with_item(LineProduct::new("Chassi", 1).with_pieces(vec![Piece::new(
                    "Chassi",
                    "PLA",
                    Decimal::from(200),
                    Decimal::from(12),
                )]))
                .with_schedule(Some(now), Some(now + Duration::days(2)))
                .with_production_plan(plan),
        )
        .unwrap();
    assert!(quote.production_plan.as_ref().unwrap().is_complete());

    // 2. 核准前不在看板上
    assert!(service.dashboard(now).unwrap().entries.is_empty());

    // 3. 核准（直接指派，無轉換檢查）
    service.update_status(quote.id, QuoteStatus::Accepted).unwrap();
    let board = service.dashboard(now).unwrap();
    let entry = board.entry(quote.id).unwrap();
    assert_eq!(entry.active_sector, None);
    assert_eq!(entry.deadline.bucket, DeadlineBucket::Warning);
    assert_eq!(entry.progress, Decimal::ZERO);

    // 4. 物流先完成，列印進行中（不檢查工段順序）
    service
        .update_sector(
            quote.id,
            SectorKey::Logistics,
            SectorPatch::new().status(SectorStatus::Completed).percent_complete(100),
        )
        .unwrap();
    let updated = service
        .update_sector(
            quote.id,
            SectorKey::Printing,
            SectorPatch::new().status("in-progress").percent_complete(50),
        )
        .unwrap();

    let plan = updated.production_plan.as_ref().unwrap();
    assert_eq!(ProductionWorkflow::active_sector(plan), Some(SectorKey::Printing));
    assert_eq!(ProductionWorkflow::aggregate_progress(plan), Decimal::from(75));

    // 5. 看板統計
    let board = service.dashboard(now + Duration::days(3)).unwrap();
    assert_eq!(board.summary.in_production, 1);
    assert_eq!(board.summary.overdue, 1);
    assert_eq!(board.summary.average_progress, Decimal::from(75));
}

#[test]
fn test_company_profile_change_invalidates_all_documents() {
    let (store, _, _) = catalog_store();
    let mut service = QuoteService::new(
        store,
        SummaryRenderer::default(),
        PricingConfig::new(Decimal::from(30)),
    );

    let mut originals = Vec::new();
    for n in 1..=4 {
        let quote = service
            .create_quote(
                NewQuote::new(format!("ORC-2025-01{:02}", n), "CLI-1").with_item(
                    LineProduct::new("Peça", n).with_pieces(vec![Piece::new(
                        "Peça",
                        "PLA",
                        Decimal::from(5),
                        Decimal::ONE,
                    )]),
                ),
            )
            .unwrap();
        originals.push(quote);
    }

    // 公司資料未變：全部不變
    let current = service.store().company_profile().unwrap();
    let same = service.update_company_profile(current).unwrap();
    assert_eq!(same.unchanged.len(), 4);

    // 公司資料變更：全部重新產生
    let report = service
        .update_company_profile(CompanyProfile::new("Camada Ltda").with_address("Av. Paulista, 1000"))
        .unwrap();
    assert_eq!(report.replaced.len(), 4);

    for original in originals {
        let stored = service.get_quote(original.id).unwrap();
        let before = original.artifact.unwrap();
        let after = stored.artifact.unwrap();
        assert_eq!(before.file_name, after.file_name);
        assert_ne!(before.uri, after.uri);
    }
}

#[test]
fn test_listing_with_deadlines() {
    let (store, _, _) = catalog_store();
    let mut service = QuoteService::new(
        store,
        SummaryRenderer::default(),
        PricingConfig::new(Decimal::from(30)),
    );
    let now = Utc.with_ymd_and_hms(2025, 11, 10, 12, 0, 0).unwrap();

    for (code, delivery) in [
        ("ORC-A", Some(now - Duration::days(3))),
        ("ORC-B", Some(now + Duration::hours(6))),
        ("ORC-C", None),
    ] {
        service
            .create_quote(
                NewQuote::new(code, "CLI-1")
                    .with_item(LineProduct::new("Item", 1).with_pieces(vec![Piece::new(
                        "Item",
                        "PLA",
                        Decimal::ONE,
                        Decimal::ONE,
                    )]))
                    .with_schedule(None, delivery),
            )
            .unwrap();
    }

    let listed = service.list_with_deadlines(None, now).unwrap();
    let buckets: Vec<_> = listed.iter().map(|(_, d)| d.bucket).collect();
    assert_eq!(
        buckets,
        vec![
            DeadlineBucket::Overdue,
            DeadlineBucket::Warning,
            DeadlineBucket::Undefined
        ]
    );
    assert_eq!(listed[0].1.magnitude(), Some(3));

    let filtered = service
        .list_quotes(Some(&QuoteFilter::new().with_status(QuoteStatus::Accepted)))
        .unwrap();
    assert!(filtered.is_empty());
}
