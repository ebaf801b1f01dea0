//! # End-to-End Pipeline Flow
//!
//! Drives one scanner over a real directory tree with the runtime's
//! sidecar adapters, so a single pass exercises the whole chain:
//!
//! ```text
//! scan root ──▶ Scanner (ap-01) ──SPED──▶ ICMS Engine (ap-02)
//!                    │                          │ buffered items
//!                    └─schedule─▶ Repository (ap-05)
//!                    │                          ▼
//!                    └─trigger──▶ PROTEGE Engine (ap-03)
//!                                               │ payments
//!                                               ▼
//!                                    Period Ledger (ap-04)
//! ```
//!
//! ## Flows Tested
//!
//! 1. **SPED lane**: sidecar items reach the ICMS engine under the
//!    company's installed rules
//! 2. **Schedule lane**: the rules sidecar lands in the repository and
//!    the triggered PROTEGE run books its payment in the ledger
//! 3. **Degradation**: missing rules fall back, broken sidecars hold
//!    the file for the next pass

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;

    use parking_lot::Mutex;
    use tempfile::TempDir;

    use ap_01_source_scanner::{
        InMemoryProcessedRegistry, ScannerConfig, ScannerService, SourceScannerApi,
    };
    use ap_02_icms_engine::IcmsEngineService;
    use ap_03_protege_engine::ProtegeService;
    use ap_04_period_ledger::{InMemoryKVStore, KeyValueStore, PeriodCreditLedger, PeriodLedgerApi};
    use ap_05_rule_repository::{InMemoryRuleRepository, RuleRepositoryApi};
    use apura_runtime::{
        DirScheduleExtractor, EngineBridge, JsonLineItemProducer, LedgerBridge,
        RepoProtegeRuleSource, RepoRuleSource, RuntimeScanner, SharedPeriodLedger,
    };
    use shared_types::{Period, RuleFilter, TaxRule};

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    struct Pipeline {
        scanner: Arc<RuntimeScanner>,
        icms: Arc<IcmsEngineService<RepoRuleSource>>,
        ledger: SharedPeriodLedger,
        repository: Arc<InMemoryRuleRepository>,
    }

    /// The runtime wiring, minus telemetry and the scan loop.
    fn pipeline() -> Pipeline {
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
        let bridge = Arc::new(EngineBridge::new(
            Arc::clone(&icms),
            protege,
            Arc::clone(&repository),
        ));

        let scanner = Arc::new(ScannerService::new(
            ScannerConfig::default(),
            Arc::new(JsonLineItemProducer::new()),
            Arc::new(DirScheduleExtractor::new()),
            Arc::clone(&bridge),
            Arc::clone(&bridge),
            bridge,
            Arc::new(InMemoryProcessedRegistry::new()),
        ));

        Pipeline {
            scanner,
            icms,
            ledger,
            repository,
        }
    }

    /// SPED content carrying the block markers the classifier probes.
    const SPED_CONTENT: &str = "|0000|017|0|01032025|31032025|ACME LTDA|06354976000141|\n|C100|0|1|NF|00|101|\n|9999|3|";

    /// Two March items: cement (NCM 25232910) and electricity
    /// (NCM 27160000).
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
        },
        {
            "document_ref": "NF-102",
            "transaction_date": "2025-03-12",
            "company_cnpj": "06354976000141",
            "product_code": "EE-IND",
            "product_description": "Energia Eletrica Industrial",
            "ncm": "27160000",
            "cfop": "1253",
            "cst": "000",
            "operation_value": 5000.0,
            "icms_base": 5000.0,
            "icms_rate": 18.0,
            "icms_amount": 900.0
        }
    ]"#;

    /// The 2% rule is NCM-gated to cement so electricity falls through
    /// to the 15% rule.
    const RULES_JSON: &str = r#"{
        "rules": [
            {
                "id": "protege-2-cimento",
                "priority": 10,
                "track": "PROTEGE_2",
                "rate": 2.0,
                "filter": { "ncm": "25232910" },
                "product_keywords": ["cimento"]
            },
            {
                "id": "protege-15-geral",
                "priority": 20,
                "track": "PROTEGE_15",
                "rate": 15.0
            }
        ],
        "active": true
    }"#;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn standard_icms_rule() -> TaxRule {
        TaxRule {
            id: "icms-go-padrao".to_string(),
            priority: 10,
            filter: RuleFilter::default(),
            rate: 17.0,
            base_reduction_percent: None,
            benefit: None,
            protege: false,
            difal: false,
            ciap: false,
        }
    }

    /// ACME's March tree: one SPED file, one schedule, both with
    /// sidecars.
    fn build_acme_march(root: &Path) {
        let month = root.join("empresa/ACME/2025/03");
        write(&month.join("efd_icms.txt"), SPED_CONTENT);
        write(&month.join("efd_icms.txt.items.json"), ITEMS_JSON);
        write(&month.join("guia_protege_go.pdf"), "%PDF-1.7");
        write(&month.join("guia_protege_go.pdf.rules.json"), RULES_JSON);
    }

    // =========================================================================
    // FLOW 1: SPED + SCHEDULE IN ONE PASS
    // =========================================================================

    #[tokio::test]
    async fn test_one_pass_processes_sped_and_schedule_together() {
        let root = TempDir::new().unwrap();
        build_acme_march(root.path());

        let p = pipeline();
        p.repository
            .apply_icms_rules("ACME", vec![standard_icms_rule()])
            .unwrap();

        let summary = p.scanner.scan(root.path()).await.unwrap();

        // Four files found; the two .json sidecars are skipped by the
        // extension filter, never dispatched.
        assert_eq!(summary.discovered, 4);
        assert_eq!(summary.sped_dispatched, 1);
        assert_eq!(summary.schedules_dispatched, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.failed, 0);
        assert_eq!(summary.generic_files, 0);

        // The ICMS engine saw both items, no fallbacks.
        let m = p.icms.metrics();
        assert_eq!(m.runs_completed, 1);
        assert_eq!(m.items_apportioned, 2);
        assert_eq!(m.fallback_items, 0);

        // The schedule installed both rules, ascending priority.
        let rules = p.repository.protege_rules("ACME").unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].id, "protege-2-cimento");
        assert_eq!(rules[1].id, "protege-15-geral");

        // The triggered PROTEGE run booked 2% of the cement base. The
        // SPED file sorts before the schedule, so March items were
        // already buffered when the trigger fired.
        let march = Period::parse("202503").unwrap();
        let recorded = p.ledger.lock().credit_for("ACME", march).unwrap();
        assert!((recorded - 20.0).abs() < 1e-9);
    }

    // =========================================================================
    // FLOW 2: DEGRADED PATHS
    // =========================================================================

    #[tokio::test]
    async fn test_items_without_rules_fall_back_and_still_count() {
        let root = TempDir::new().unwrap();
        let month = root.path().join("empresa/ACME/2025/03");
        write(&month.join("efd_icms.txt"), SPED_CONTENT);
        write(&month.join("efd_icms.txt.items.json"), ITEMS_JSON);

        // No rules installed anywhere: every item takes the recorded
        // amount under the fallback label.
        let p = pipeline();
        let summary = p.scanner.scan(root.path()).await.unwrap();

        assert_eq!(summary.sped_dispatched, 1);
        let m = p.icms.metrics();
        assert_eq!(m.runs_completed, 1);
        assert_eq!(m.items_apportioned, 2);
        assert_eq!(m.fallback_items, 2);
    }

    #[tokio::test]
    async fn test_schedule_without_sped_books_a_zero_payment() {
        let root = TempDir::new().unwrap();
        let month = root.path().join("cliente/BETA/2025/07");
        write(&month.join("guia_protege_go.pdf"), "%PDF-1.7");
        write(&month.join("guia_protege_go.pdf.rules.json"), RULES_JSON);

        let p = pipeline();
        let summary = p.scanner.scan(root.path()).await.unwrap();
        assert_eq!(summary.schedules_dispatched, 1);

        // No items were ever produced for BETA, so the computation ran
        // over an empty batch; the zero payment is still recorded so a
        // later reprocess overwrites rather than accumulates.
        let july = Period::parse("202507").unwrap();
        let entry = p.ledger.lock().entry_for("BETA", july).unwrap();
        let entry = entry.expect("zero payment should be recorded");
        assert_eq!(entry.amount, 0.0);
        assert_eq!(entry.company_id, "BETA");
    }

    #[tokio::test]
    async fn test_malformed_items_sidecar_holds_the_file_for_retry() {
        let root = TempDir::new().unwrap();
        let month = root.path().join("empresa/ACME/2025/03");
        write(&month.join("efd_icms.txt"), SPED_CONTENT);
        write(&month.join("efd_icms.txt.items.json"), "{ not json");

        let p = pipeline();
        p.repository
            .apply_icms_rules("ACME", vec![standard_icms_rule()])
            .unwrap();

        let first = p.scanner.scan(root.path()).await.unwrap();
        assert_eq!(first.failed, 1);
        assert_eq!(first.sped_dispatched, 0);
        // The failed file was not marked processed.
        assert_eq!(p.scanner.stats().processed_count, 0);

        // The exporter fixes the sidecar; the next pass picks the file
        // up again.
        write(&month.join("efd_icms.txt.items.json"), ITEMS_JSON);
        let second = p.scanner.scan(root.path()).await.unwrap();
        assert_eq!(second.failed, 0);
        assert_eq!(second.sped_dispatched, 1);
        assert_eq!(p.scanner.stats().processed_count, 1);
        assert_eq!(p.icms.metrics().runs_completed, 1);
    }

    #[tokio::test]
    async fn test_unmarked_files_take_the_generic_lane() {
        let root = TempDir::new().unwrap();
        let month = root.path().join("empresa/ACME/2025/03");
        write(&month.join("observacoes.txt"), "notas soltas, sem marcadores");
        write(&month.join("relatorio.pdf"), "%PDF-1.7");

        let p = pipeline();
        let summary = p.scanner.scan(root.path()).await.unwrap();

        // A txt without SPED markers and a pdf without a schedule name
        // are both recognized, dispatched nowhere, and not retried.
        assert_eq!(summary.generic_files, 2);
        assert_eq!(summary.sped_dispatched, 0);
        assert_eq!(summary.schedules_dispatched, 0);
        assert_eq!(p.scanner.stats().processed_count, 2);
        assert_eq!(p.icms.metrics().runs_completed, 0);
    }
}
