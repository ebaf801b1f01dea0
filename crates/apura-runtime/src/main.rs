//! # Apura Fiscal Runtime
//!
//! The main entry point for the Apura fiscal computation pipeline.
//!
//! ## Pipeline
//!
//! ```text
//! scan root ──▶ Scanner (ap-01) ──SPED──▶ ICMS Engine (ap-02)
//!                    │                          │ buffered items
//!                    └─schedule─▶ Repository (ap-05)
//!                    │                          ▼
//!                    └─trigger──▶ PROTEGE Engine (ap-03)
//!                                               │ payments / credits
//!                                               ▼
//!                                    Period Ledger (ap-04)
//! ```
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (from `AP_*` environment)
//! 2. Load and validate configuration (from `APURA_*` environment)
//! 3. Open the ledger store (file-backed and locked, or in-memory)
//! 4. Preload per-company rules from the rules directory
//! 5. Wire the engines behind the scanner's ports
//! 6. Run the scan loop and stats ticker until Ctrl+C

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use ap_01_source_scanner::{
    run_scan_loop, InMemoryProcessedRegistry, ScannerService, SourceScannerApi,
};
use ap_02_icms_engine::IcmsEngineService;
use ap_03_protege_engine::ProtegeService;
use ap_04_period_ledger::{
    FileBackedKVStore, InMemoryKVStore, KeyValueStore, PeriodCreditLedger, StoreLock,
};
use ap_05_rule_repository::InMemoryRuleRepository;
use fiscal_telemetry::{init_telemetry, TelemetryConfig};

use apura_runtime::{
    load_config, DirScheduleExtractor, EngineBridge, JsonLineItemProducer, LedgerBridge,
    RepoProtegeRuleSource, RepoRuleSource, RuntimeConfig, RuntimeScanner, SharedPeriodLedger,
};

/// Open the ledger's KV backend per configuration.
///
/// A configured data dir gets the durable store behind an exclusive
/// lock; without one the runtime stays up on an in-memory store, which
/// loses cross-period credits on restart.
fn build_store(config: &RuntimeConfig) -> Result<(Box<dyn KeyValueStore>, Option<StoreLock>)> {
    match &config.ledger.data_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating ledger data dir {}", dir.display()))?;
            let lock = StoreLock::acquire(dir)
                .with_context(|| format!("locking ledger data dir {}", dir.display()))?;
            let store = FileBackedKVStore::new(dir.join("ledger.db"));
            Ok((Box::new(store), Some(lock)))
        }
        None => {
            warn!("[apura] ⚠️ No ledger data dir configured; credits are lost on restart");
            Ok((Box::new(InMemoryKVStore::new()), None))
        }
    }
}

/// Periodic operator snapshot of scanner state and counters.
async fn run_stats_ticker(
    scanner: Arc<RuntimeScanner>,
    interval_secs: u64,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let stats = scanner.stats();
                let m = scanner.metrics();
                info!(
                    "[apura] 📊 Stats: running={} processed={} passes={} sped={} schedules={} skipped={} failed={}",
                    stats.running,
                    stats.processed_count,
                    m.passes_completed,
                    m.sped_dispatched,
                    m.schedules_dispatched,
                    m.files_skipped,
                    m.files_failed,
                );
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let _telemetry =
        init_telemetry(TelemetryConfig::from_env()).context("initializing telemetry")?;

    let config = load_config();
    config.validate().context("invalid runtime configuration")?;

    info!("===========================================");
    info!("  Apura Fiscal Runtime v0.1.0");
    info!("  ICMS Apportionment + PROTEGE Dual-Track");
    info!("===========================================");
    info!("Scan Root: {}", config.scanner.root.display());
    info!("Scan Interval: {}ms", config.scanner.pass.scan_interval_ms);
    info!("Ledger Data Dir: {:?}", config.ledger.data_dir);
    info!("Rules Dir: {:?}", config.rules.rules_dir);

    // Ledger store, chosen once; the lock guard lives until exit.
    let (store, _store_lock) = build_store(&config)?;
    let ledger: SharedPeriodLedger = Arc::new(Mutex::new(PeriodCreditLedger::new(store)));

    // Rule repository, preloaded from disk when a rules dir exists.
    let repository = Arc::new(InMemoryRuleRepository::new());
    match &config.rules.rules_dir {
        Some(dir) if dir.is_dir() => {
            let summary = repository
                .load_from_dir(dir)
                .with_context(|| format!("loading rules from {}", dir.display()))?;
            info!(
                "[apura] 📚 Preloaded rules: {} companies, {} poisoned",
                summary.companies_loaded, summary.entries_poisoned
            );
        }
        Some(dir) => {
            info!(
                "[apura] No rules dir at {}; companies start without rules until a schedule arrives",
                dir.display()
            );
        }
        None => {
            info!("[apura] Rules dir disabled; companies start without rules");
        }
    }

    // Engines behind the repository and the shared ledger.
    let icms = Arc::new(IcmsEngineService::new(Arc::new(RepoRuleSource::new(
        Arc::clone(&repository),
    ))));
    let protege = Arc::new(ProtegeService::new(
        Arc::new(RepoProtegeRuleSource::new(Arc::clone(&repository))),
        Arc::new(LedgerBridge::new(Arc::clone(&ledger))),
    ));
    let bridge = Arc::new(EngineBridge::new(icms, protege, Arc::clone(&repository)));

    // One bridge serves all three engine-facing ports.
    let scanner: Arc<RuntimeScanner> = Arc::new(ScannerService::new(
        config.scanner.pass.clone(),
        Arc::new(JsonLineItemProducer::new()),
        Arc::new(DirScheduleExtractor::new()),
        Arc::clone(&bridge),
        Arc::clone(&bridge),
        Arc::clone(&bridge),
        Arc::new(InMemoryProcessedRegistry::new()),
    ));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let scan_handle = tokio::spawn(run_scan_loop(
        Arc::clone(&scanner),
        config.scanner.root.clone(),
        shutdown_rx.clone(),
    ));
    let stats_handle = tokio::spawn(run_stats_ticker(
        Arc::clone(&scanner),
        config.telemetry.stats_interval_secs,
        shutdown_rx,
    ));

    info!("[apura] Runtime is up. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c()
        .await
        .context("waiting for shutdown signal")?;

    info!("[apura] 🛑 Shutdown signal received; finishing the in-flight pass");
    shutdown_tx.send(true).ok();
    let _ = scan_handle.await;
    let _ = stats_handle.await;

    info!("[apura] Runtime stopped");
    Ok(())
}
