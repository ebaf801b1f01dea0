//! # Cross-Period Credit Rollover
//!
//! The 2%-track payment booked for one period offsets the next
//! period's obligation. These flows follow a credit across periods,
//! across a year boundary, and across a process restart through the
//! file-backed store.

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;

    use parking_lot::Mutex;
    use tempfile::TempDir;

    use ap_01_source_scanner::{
        IcmsExecutor, InMemoryProcessedRegistry, ProtegeExecutor, ScannerConfig, ScannerService,
        SourceScannerApi,
    };
    use ap_02_icms_engine::IcmsEngineService;
    use ap_03_protege_engine::ProtegeService;
    use ap_04_period_ledger::{
        FileBackedKVStore, InMemoryKVStore, KeyValueStore, PeriodCreditLedger, PeriodLedgerApi,
    };
    use ap_05_rule_repository::{InMemoryRuleRepository, RuleRepositoryApi};
    use apura_runtime::{
        DirScheduleExtractor, EngineBridge, JsonLineItemProducer, LedgerBridge,
        RepoProtegeRuleSource, RepoRuleSource, RuntimeScanner, SharedPeriodLedger,
    };
    use shared_types::{
        CanonicalLineItem, Period, ProtegeRule, ProtegeTrack, RuleConfiguration, RuleFilter,
    };

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    struct Stack {
        bridge: Arc<EngineBridge>,
        ledger: SharedPeriodLedger,
        repository: Arc<InMemoryRuleRepository>,
    }

    /// Engines, repository, and ledger over the given KV backend.
    fn stack_over(store: Box<dyn KeyValueStore>) -> Stack {
        let repository = Arc::new(InMemoryRuleRepository::new());
        let ledger: SharedPeriodLedger = Arc::new(Mutex::new(PeriodCreditLedger::new(store)));

        let icms = Arc::new(IcmsEngineService::new(Arc::new(RepoRuleSource::new(
            Arc::clone(&repository),
        ))));
        let protege = Arc::new(ProtegeService::new(
            Arc::new(RepoProtegeRuleSource::new(Arc::clone(&repository))),
            Arc::new(LedgerBridge::new(Arc::clone(&ledger))),
        ));
        let bridge = Arc::new(EngineBridge::new(icms, protege, Arc::clone(&repository)));

        Stack {
            bridge,
            ledger,
            repository,
        }
    }

    fn scanner_for(s: &Stack) -> Arc<RuntimeScanner> {
        Arc::new(ScannerService::new(
            ScannerConfig::default(),
            Arc::new(JsonLineItemProducer::new()),
            Arc::new(DirScheduleExtractor::new()),
            Arc::clone(&s.bridge),
            Arc::clone(&s.bridge),
            Arc::clone(&s.bridge),
            Arc::new(InMemoryProcessedRegistry::new()),
        ))
    }

    fn item(date: &str, base: f64) -> CanonicalLineItem {
        CanonicalLineItem {
            document_ref: "NF-201".to_string(),
            transaction_date: date.to_string(),
            company_cnpj: "06354976000141".to_string(),
            product_code: "CIM-50".to_string(),
            product_description: "Cimento CP-II 50kg".to_string(),
            ncm: "25232910".to_string(),
            cfop: "5101".to_string(),
            cst: "000".to_string(),
            operation_value: base,
            icms_base: base,
            icms_rate: 18.0,
            icms_amount: base * 0.18,
        }
    }

    fn track2_config() -> RuleConfiguration {
        RuleConfiguration {
            rules: vec![ProtegeRule {
                id: "protege-2-cimento".to_string(),
                priority: 10,
                filter: RuleFilter::default(),
                track: ProtegeTrack::Protege2,
                rate: 2.0,
                benefits: Vec::new(),
                product_keywords: vec!["cimento".to_string()],
            }],
            benefits: Vec::new(),
            active: true,
            start_date: None,
        }
    }

    const SPED_CONTENT: &str =
        "|0000|017|0|01032025|31032025|ACME LTDA|06354976000141|\n|9999|2|";

    const RULES_JSON: &str = r#"{
        "rules": [
            {
                "id": "protege-2-cimento",
                "priority": 10,
                "track": "PROTEGE_2",
                "rate": 2.0,
                "product_keywords": ["cimento"]
            }
        ],
        "active": true
    }"#;

    fn items_json(date: &str, base: f64) -> String {
        format!(
            r#"[
            {{
                "document_ref": "NF-201",
                "transaction_date": "{date}",
                "company_cnpj": "06354976000141",
                "product_code": "CIM-50",
                "product_description": "Cimento CP-II 50kg",
                "ncm": "25232910",
                "cfop": "5101",
                "cst": "000",
                "operation_value": {base:.1},
                "icms_base": {base:.1},
                "icms_rate": 18.0,
                "icms_amount": {amount:.1}
            }}
        ]"#,
            date = date,
            base = base,
            amount = base * 0.18,
        )
    }

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    // =========================================================================
    // FLOWS
    // =========================================================================

    /// March brings a SPED file and a schedule; April brings only a
    /// schedule. One pass handles both months in path order, so April's
    /// computation sees March's payment as credit.
    #[tokio::test]
    async fn test_march_payment_offsets_april_through_a_scan() {
        let root = TempDir::new().unwrap();
        let march_dir = root.path().join("empresa/ACME/2025/03");
        write(&march_dir.join("efd_icms.txt"), SPED_CONTENT);
        write(
            &march_dir.join("efd_icms.txt.items.json"),
            &items_json("2025-03-10", 50_000.0),
        );
        write(&march_dir.join("guia_protege_go.pdf"), "%PDF-1.7");
        write(&march_dir.join("guia_protege_go.pdf.rules.json"), RULES_JSON);

        let april_dir = root.path().join("empresa/ACME/2025/04");
        write(&april_dir.join("guia_protege_go.pdf"), "%PDF-1.7");
        write(&april_dir.join("guia_protege_go.pdf.rules.json"), RULES_JSON);

        let s = stack_over(Box::new(InMemoryKVStore::new()));
        let scanner = scanner_for(&s);

        let summary = scanner.scan(root.path()).await.unwrap();
        assert_eq!(summary.sped_dispatched, 1);
        assert_eq!(summary.schedules_dispatched, 2);

        let march = Period::parse("202503").unwrap();
        let april = Period::parse("202504").unwrap();

        // March booked 2% of 50000; April booked zero (no April items).
        let ledger = s.ledger.lock();
        assert!((ledger.credit_for("ACME", march).unwrap() - 1000.0).abs() < 1e-9);
        let april_entry = ledger.entry_for("ACME", april).unwrap();
        assert_eq!(april_entry.expect("april entry").amount, 0.0);
        drop(ledger);

        // Recomputing April shows the offset itself.
        let r = s.bridge.run_protege(Some("ACME"), april).await;
        assert!((r.protege2_credit - 1000.0).abs() < 1e-9);
        assert!((r.saldo_protege2 + 1000.0).abs() < 1e-9);
        assert!((r.valor_final + 1000.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_rollover_chain_across_three_periods() {
        let s = stack_over(Box::new(InMemoryKVStore::new()));
        s.repository
            .apply_configuration("ACME", track2_config())
            .unwrap();

        s.bridge
            .run_icms(Some("ACME"), vec![item("2025-03-10", 50_000.0)])
            .await;
        let march = s
            .bridge
            .run_protege(Some("ACME"), Period::parse("202503").unwrap())
            .await;
        assert!((march.protege2_payment - 1000.0).abs() < 1e-9);
        assert_eq!(march.protege2_credit, 0.0);

        s.bridge
            .run_icms(Some("ACME"), vec![item("2025-04-08", 10_000.0)])
            .await;
        let april = s
            .bridge
            .run_protege(Some("ACME"), Period::parse("202504").unwrap())
            .await;
        assert!((april.protege2_payment - 200.0).abs() < 1e-9);
        assert!((april.protege2_credit - 1000.0).abs() < 1e-9);
        assert!((april.saldo_protege2 + 800.0).abs() < 1e-9);

        // May has no items at all; only April's smaller payment carries.
        let may = s
            .bridge
            .run_protege(Some("ACME"), Period::parse("202505").unwrap())
            .await;
        assert_eq!(may.protege2_payment, 0.0);
        assert!((may.protege2_credit - 200.0).abs() < 1e-9);
        assert!((may.saldo_protege2 + 200.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_rollover_crosses_the_year_boundary() {
        let s = stack_over(Box::new(InMemoryKVStore::new()));
        s.repository
            .apply_configuration("ACME", track2_config())
            .unwrap();

        s.bridge
            .run_icms(Some("ACME"), vec![item("2024-12-15", 50_000.0)])
            .await;
        let december = s
            .bridge
            .run_protege(Some("ACME"), Period::parse("202412").unwrap())
            .await;
        assert!((december.protege2_payment - 1000.0).abs() < 1e-9);

        let january = s
            .bridge
            .run_protege(Some("ACME"), Period::parse("202501").unwrap())
            .await;
        assert!((january.protege2_credit - 1000.0).abs() < 1e-9);
        assert!((january.saldo_protege2 + 1000.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_credit_survives_restart_through_the_file_store() {
        let data = TempDir::new().unwrap();
        let db = data.path().join("ledger.db");
        let march = Period::parse("202503").unwrap();
        let april = Period::parse("202504").unwrap();

        {
            let s = stack_over(Box::new(FileBackedKVStore::new(&db)));
            s.repository
                .apply_configuration("ACME", track2_config())
                .unwrap();
            s.bridge
                .run_icms(Some("ACME"), vec![item("2025-03-10", 50_000.0)])
                .await;
            let r = s.bridge.run_protege(Some("ACME"), march).await;
            assert!((r.protege2_payment - 1000.0).abs() < 1e-9);
        }

        // A fresh stack over the same file sees March's payment.
        let s = stack_over(Box::new(FileBackedKVStore::new(&db)));
        s.repository
            .apply_configuration("ACME", track2_config())
            .unwrap();
        let r = s.bridge.run_protege(Some("ACME"), april).await;
        assert!((r.protege2_credit - 1000.0).abs() < 1e-9);
        assert!((r.saldo_protege2 + 1000.0).abs() < 1e-9);
        assert!((r.valor_final + 1000.0).abs() < 1e-9);
    }
}
