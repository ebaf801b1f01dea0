//! # Dispatch Idempotency
//!
//! The processed registry is all that stands between a periodic rescan
//! and double-counted fiscal totals. These flows verify that rescans
//! dispatch nothing new, that an explicit clear recomputes without
//! accumulating, and that registries sharing one KV store share one
//! dispatch history.

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;

    use parking_lot::Mutex;
    use tempfile::TempDir;

    use ap_01_source_scanner::{
        InMemoryProcessedRegistry, ProcessedRegistry, ScannerConfig, ScannerService,
        SourceScannerApi,
    };
    use ap_02_icms_engine::IcmsEngineService;
    use ap_03_protege_engine::ProtegeService;
    use ap_04_period_ledger::{InMemoryKVStore, KeyValueStore, PeriodCreditLedger, PeriodLedgerApi};
    use ap_05_rule_repository::InMemoryRuleRepository;
    use apura_runtime::{
        DirScheduleExtractor, EngineBridge, JsonLineItemProducer, KvProcessedRegistry,
        LedgerBridge, RepoProtegeRuleSource, RepoRuleSource, SharedPeriodLedger,
    };
    use shared_types::Period;

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    struct Pipeline<R: ProcessedRegistry + 'static> {
        scanner: Arc<
            ScannerService<
                JsonLineItemProducer,
                DirScheduleExtractor,
                EngineBridge,
                EngineBridge,
                EngineBridge,
                R,
            >,
        >,
        icms: Arc<IcmsEngineService<RepoRuleSource>>,
        ledger: SharedPeriodLedger,
    }

    fn pipeline_with<R: ProcessedRegistry + 'static>(registry: Arc<R>) -> Pipeline<R> {
        let repository = Arc::new(InMemoryRuleRepository::new());
        let store: Box<dyn KeyValueStore> = Box::new(InMemoryKVStore::new());
        let ledger: SharedPeriodLedger = Arc::new(Mutex::new(PeriodCreditLedger::new(store)));

        let icms = Arc::new(IcmsEngineService::new(Arc::new(RepoRuleSource::new(
            Arc::clone(&repository),
        ))));
        let protege = Arc::new(ProtegeService::new(
            Arc::new(RepoProtegeRuleSource::new(Arc::clone(&repository))),
            Arc::new(LedgerBridge::new(Arc::clone(&ledger))),
        ));
        let bridge = Arc::new(EngineBridge::new(Arc::clone(&icms), protege, repository));

        let scanner = Arc::new(ScannerService::new(
            ScannerConfig::default(),
            Arc::new(JsonLineItemProducer::new()),
            Arc::new(DirScheduleExtractor::new()),
            Arc::clone(&bridge),
            Arc::clone(&bridge),
            bridge,
            registry,
        ));

        Pipeline {
            scanner,
            icms,
            ledger,
        }
    }

    fn pipeline() -> Pipeline<InMemoryProcessedRegistry> {
        pipeline_with(Arc::new(InMemoryProcessedRegistry::new()))
    }

    const SPED_CONTENT: &str =
        "|0000|017|0|01032025|31032025|ACME LTDA|06354976000141|\n|9999|2|";

    const ITEMS_JSON: &str = r#"[
        {
            "document_ref": "NF-101",
            "transaction_date": "2025-03-10",
            "company_cnpj": "06354976000141",
            "product_code": "CIM-50",
            "product_description": "Cimento CP-II 50kg",
            "ncm": "25232910",
            "cfop": "5101",
            "cst": "000",
            "operation_value": 1000.0,
            "icms_base": 1000.0,
            "icms_rate": 18.0,
            "icms_amount": 180.0
        }
    ]"#;

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

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn build_acme_march(root: &Path) {
        let month = root.join("empresa/ACME/2025/03");
        write(&month.join("efd_icms.txt"), SPED_CONTENT);
        write(&month.join("efd_icms.txt.items.json"), ITEMS_JSON);
        write(&month.join("guia_protege_go.pdf"), "%PDF-1.7");
        write(&month.join("guia_protege_go.pdf.rules.json"), RULES_JSON);
    }

    // =========================================================================
    // FLOWS
    // =========================================================================

    #[tokio::test]
    async fn test_second_pass_dispatches_nothing_new() {
        let root = TempDir::new().unwrap();
        build_acme_march(root.path());
        let p = pipeline();

        let first = p.scanner.scan(root.path()).await.unwrap();
        assert_eq!(first.sped_dispatched, 1);
        assert_eq!(first.schedules_dispatched, 1);

        let second = p.scanner.scan(root.path()).await.unwrap();
        assert_eq!(second.sped_dispatched, 0);
        assert_eq!(second.schedules_dispatched, 0);
        assert_eq!(second.discovered, 4);
        // Two sidecars filtered by extension, two processed paths.
        assert_eq!(second.skipped, 4);

        // The engines ran once; the booked payment is unchanged.
        assert_eq!(p.icms.metrics().runs_completed, 1);
        let march = Period::parse("202503").unwrap();
        let credit = p.ledger.lock().credit_for("ACME", march).unwrap();
        assert!((credit - 20.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_clear_processed_recomputes_without_double_counting() {
        let root = TempDir::new().unwrap();
        build_acme_march(root.path());
        let p = pipeline();

        p.scanner.scan(root.path()).await.unwrap();
        p.scanner.clear_processed();
        let rerun = p.scanner.scan(root.path()).await.unwrap();

        assert_eq!(rerun.sped_dispatched, 1);
        assert_eq!(rerun.schedules_dispatched, 1);
        assert_eq!(p.icms.metrics().runs_completed, 2);

        // record_payment overwrites the period entry, so the credit is
        // replaced rather than accumulated.
        let march = Period::parse("202503").unwrap();
        let credit = p.ledger.lock().credit_for("ACME", march).unwrap();
        assert!((credit - 20.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_registries_over_one_store_share_dispatch_history() {
        let root = TempDir::new().unwrap();
        build_acme_march(root.path());

        // Two scanner instances, each with its own registry, over one
        // shared KV store: the second sees the first's history.
        let store = Arc::new(Mutex::new(InMemoryKVStore::new()));
        let first = pipeline_with(Arc::new(KvProcessedRegistry::new(Arc::clone(&store))));
        let second = pipeline_with(Arc::new(KvProcessedRegistry::new(store)));

        let a = first.scanner.scan(root.path()).await.unwrap();
        assert_eq!(a.sped_dispatched, 1);
        assert_eq!(a.schedules_dispatched, 1);

        let b = second.scanner.scan(root.path()).await.unwrap();
        assert_eq!(b.sped_dispatched, 0);
        assert_eq!(b.schedules_dispatched, 0);
        assert_eq!(b.skipped, 4);

        // The second instance's engines never ran.
        assert_eq!(second.icms.metrics().runs_completed, 0);
        assert_eq!(second.scanner.stats().processed_count, 2);
    }
}
