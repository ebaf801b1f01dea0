//! Scan pass orchestration
//!
//! One pass = walk the root, filter, infer, classify, dispatch, record.
//! Per-file work is sequential; a pass-in-progress flag keeps scheduled
//! ticks from overlapping a slow pass.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::classify::{classify, is_schedule_by_name};
use crate::domain::config::ScannerConfig;
use crate::domain::infer::infer_from_path;
use crate::domain::source_file::{SourceFile, SourceLane};
use crate::metrics::{ScannerMetrics, ScannerMetricsSnapshot};
use crate::ports::inbound::{ScanPassSummary, ScannerStats, SourceScannerApi};
use crate::ports::outbound::{
    IcmsExecutor, LineItemProducer, ProcessedRegistry, ProtegeExecutor, RuleConfigurator,
    ScheduleExtractor, ScheduleFile,
};

/// Source scanner service implementation
///
/// Generic over every outbound port so the runtime can wire real
/// adapters while tests plug in mocks. Holds no filesystem state of its
/// own; the processed registry is the only memory between passes.
pub struct ScannerService<P, X, I, G, C, R>
where
    P: LineItemProducer,
    X: ScheduleExtractor,
    I: IcmsExecutor,
    G: ProtegeExecutor,
    C: RuleConfigurator,
    R: ProcessedRegistry,
{
    config: ScannerConfig,
    producer: Arc<P>,
    extractor: Arc<X>,
    icms: Arc<I>,
    protege: Arc<G>,
    configurator: Arc<C>,
    registry: Arc<R>,
    metrics: ScannerMetrics,
    running: AtomicBool,
    pass_in_progress: AtomicBool,
}

/// Clears the pass-in-progress flag when a pass ends, on every exit
/// path.
struct PassFlag<'a>(&'a AtomicBool);

impl Drop for PassFlag<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// A regular file found by the walk, with the metadata captured at
/// discovery time.
struct Candidate {
    path: PathBuf,
    size_bytes: u64,
    modified_at: Option<std::time::SystemTime>,
}

/// Per-pass dispositions; folded into the summary at the end of the
/// pass.
#[derive(Default)]
struct PassTally {
    discovered: u64,
    sped: u64,
    schedules: u64,
    generic: u64,
    skipped: u64,
    failed: u64,
}

impl<P, X, I, G, C, R> ScannerService<P, X, I, G, C, R>
where
    P: LineItemProducer + 'static,
    X: ScheduleExtractor + 'static,
    I: IcmsExecutor + 'static,
    G: ProtegeExecutor + 'static,
    C: RuleConfigurator + 'static,
    R: ProcessedRegistry + 'static,
{
    /// Create a scanner over the given ports. Starts in the running
    /// state.
    pub fn new(
        config: ScannerConfig,
        producer: Arc<P>,
        extractor: Arc<X>,
        icms: Arc<I>,
        protege: Arc<G>,
        configurator: Arc<C>,
        registry: Arc<R>,
    ) -> Self {
        Self {
            config,
            producer,
            extractor,
            icms,
            protege,
            configurator,
            registry,
            metrics: ScannerMetrics::new(),
            running: AtomicBool::new(true),
            pass_in_progress: AtomicBool::new(false),
        }
    }

    /// The active configuration.
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Get current metrics snapshot
    pub fn metrics(&self) -> ScannerMetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Walk the root and collect every regular file, depth-first with
    /// sorted entries so passes visit files in a stable order.
    fn collect_candidates(root: &Path) -> Vec<Candidate> {
        let mut candidates = Vec::new();
        Self::walk(root, &mut candidates);
        candidates
    }

    fn walk(dir: &Path, out: &mut Vec<Candidate>) {
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("[ap-01] ⚠️ Unreadable directory {}: {}", dir.display(), e);
                return;
            }
        };

        let mut entries: Vec<_> = entries.flatten().collect();
        entries.sort_by_key(|entry| entry.path());

        for entry in entries {
            let path = entry.path();
            let Ok(file_type) = entry.file_type() else {
                warn!("[ap-01] ⚠️ Unreadable entry {}", path.display());
                continue;
            };

            if file_type.is_dir() {
                Self::walk(&path, out);
            } else if file_type.is_file() {
                let Ok(metadata) = entry.metadata() else {
                    warn!("[ap-01] ⚠️ Unreadable metadata for {}", path.display());
                    continue;
                };
                out.push(Candidate {
                    path,
                    size_bytes: metadata.len(),
                    modified_at: metadata.modified().ok(),
                });
            }
        }
    }

    /// Filter, infer, classify, and dispatch one discovered file.
    async fn analyze(&self, candidate: Candidate, tally: &mut PassTally) {
        tally.discovered += 1;
        self.metrics.record_discovered();

        let path = candidate.path;
        if self.registry.seen(&path) {
            debug!("[ap-01] Already processed, skipping {}", path.display());
            tally.skipped += 1;
            self.metrics.record_skipped();
            return;
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        if !self.config.allows_extension(&extension) {
            debug!(
                "[ap-01] Extension '{}' not analyzed, skipping {}",
                extension,
                path.display()
            );
            tally.skipped += 1;
            self.metrics.record_skipped();
            return;
        }

        if candidate.size_bytes > self.config.max_file_size_bytes {
            debug!(
                "[ap-01] Oversize ({} bytes), skipping {}",
                candidate.size_bytes,
                path.display()
            );
            tally.skipped += 1;
            self.metrics.record_skipped();
            return;
        }

        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .unwrap_or_default();

        // Schedule PDFs are identified by name alone; everything else
        // needs its content probed for SPED block markers.
        let content = if is_schedule_by_name(&file_name, &extension) {
            Vec::new()
        } else {
            match std::fs::read(&path) {
                Ok(content) => content,
                Err(e) => {
                    warn!(
                        "[ap-01] ⚠️ Unreadable file {}: {}. Retried next pass",
                        path.display(),
                        e
                    );
                    tally.failed += 1;
                    self.metrics.record_failed();
                    return;
                }
            }
        };
        let lane = classify(&file_name, &extension, &content);

        let inference = infer_from_path(&path, &self.config);
        let file = SourceFile {
            path,
            file_name,
            size_bytes: candidate.size_bytes,
            extension,
            company_id: inference.company_id,
            year: inference.year,
            month: inference.month,
            modified_at: candidate.modified_at,
            lane,
        };

        self.dispatch(file, tally).await;
    }

    /// Route one classified file to its lane handler. Handler errors
    /// leave the file unmarked so the next pass retries it.
    async fn dispatch(&self, file: SourceFile, tally: &mut PassTally) {
        let company = file.company_id.as_deref();
        let company_label = company.unwrap_or("-");

        match file.lane {
            SourceLane::Sped => {
                let items = match self.producer.produce(&file.path, company).await {
                    Ok(items) => items,
                    Err(e) => {
                        warn!("[ap-01] ⚠️ {}. Retried next pass", e);
                        tally.failed += 1;
                        self.metrics.record_failed();
                        return;
                    }
                };
                let item_count = items.len();
                let result = self.icms.run_icms(company, items).await;
                info!(
                    "[ap-01] 📄 SPED {} ({}): {} items, status {:?}, ICMS R$ {:.2}",
                    file.file_name, company_label, item_count, result.status, result.total_icms
                );
                self.registry.mark_seen(&file.path);
                tally.sped += 1;
                self.metrics.record_sped();
            }
            SourceLane::ProtegeSchedule => {
                let documents = vec![ScheduleFile {
                    name: file.file_name.clone(),
                    path: file.path.clone(),
                }];
                let configuration = match self.extractor.extract(company, &documents).await {
                    Ok(configuration) => configuration,
                    Err(e) => {
                        warn!("[ap-01] ⚠️ {}. Retried next pass", e);
                        tally.failed += 1;
                        self.metrics.record_failed();
                        return;
                    }
                };
                if let Err(e) = self.configurator.apply(company, configuration).await {
                    warn!("[ap-01] ⚠️ {}. Retried next pass", e);
                    tally.failed += 1;
                    self.metrics.record_failed();
                    return;
                }
                info!(
                    "[ap-01] 📋 Schedule {} applied for {}",
                    file.file_name, company_label
                );

                match file.period() {
                    Some(period) => {
                        let result = self.protege.run_protege(company, period).await;
                        info!(
                            "[ap-01] PROTEGE triggered for {} period {}: status {:?}, final R$ {:.2}",
                            company_label, period, result.status, result.valor_final
                        );
                    }
                    None => {
                        debug!(
                            "[ap-01] No period inferred for {}; configuration installed without a run",
                            file.file_name
                        );
                    }
                }

                self.registry.mark_seen(&file.path);
                tally.schedules += 1;
                self.metrics.record_schedule();
            }
            SourceLane::Generic => {
                debug!(
                    "[ap-01] GENERIC file noted, no computation: {}",
                    file.path.display()
                );
                self.registry.mark_seen(&file.path);
                tally.generic += 1;
                self.metrics.record_generic();
            }
        }
    }
}

#[async_trait]
impl<P, X, I, G, C, R> SourceScannerApi for ScannerService<P, X, I, G, C, R>
where
    P: LineItemProducer + 'static,
    X: ScheduleExtractor + 'static,
    I: IcmsExecutor + 'static,
    G: ProtegeExecutor + 'static,
    C: RuleConfigurator + 'static,
    R: ProcessedRegistry + 'static,
{
    async fn scan(&self, root: &Path) -> Option<ScanPassSummary> {
        if !self.running.load(Ordering::SeqCst) {
            debug!("[ap-01] Scan requested while stopped, ignoring");
            return None;
        }
        if self
            .pass_in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            info!("[ap-01] ⏭ Tick skipped: previous pass still in progress");
            return None;
        }
        let _flag = PassFlag(&self.pass_in_progress);

        let pass_id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();
        self.metrics.record_pass_started();
        debug!("[ap-01] Scan pass {} over {}", pass_id, root.display());

        let mut tally = PassTally::default();
        for candidate in Self::collect_candidates(root) {
            self.analyze(candidate, &mut tally).await;
        }

        let duration_ms = started.elapsed().as_millis() as u64;
        self.metrics.record_pass_completed();
        info!(
            "[ap-01] 🔍 Pass {} complete in {}ms: {} discovered, {} sped, {} schedules, {} generic, {} skipped, {} failed",
            pass_id,
            duration_ms,
            tally.discovered,
            tally.sped,
            tally.schedules,
            tally.generic,
            tally.skipped,
            tally.failed
        );

        Some(ScanPassSummary {
            pass_id,
            discovered: tally.discovered,
            sped_dispatched: tally.sped,
            schedules_dispatched: tally.schedules,
            generic_files: tally.generic,
            skipped: tally.skipped,
            failed: tally.failed,
            duration_ms,
        })
    }

    fn start(&self) {
        self.running.store(true, Ordering::SeqCst);
        info!("[ap-01] ▶ Scanner started");
    }

    fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
        info!("[ap-01] ⏸ Scanner stopped; an in-flight pass finishes");
    }

    fn stats(&self) -> ScannerStats {
        ScannerStats {
            running: self.running.load(Ordering::SeqCst),
            pass_in_progress: self.pass_in_progress.load(Ordering::SeqCst),
            processed_count: self.registry.len(),
            config: self.config.clone(),
        }
    }

    fn clear_processed(&self) {
        self.registry.clear();
        info!("[ap-01] 🧹 Processed registry cleared; next pass re-dispatches everything");
    }
}

/// Background scan loop: one pass immediately, then one per configured
/// interval. A slow pass absorbs missed ticks instead of bursting.
/// Exits when the shutdown channel flips to `true` or closes; the
/// in-flight pass (or the sleep) finishes first.
pub async fn run_scan_loop<P, X, I, G, C, R>(
    service: Arc<ScannerService<P, X, I, G, C, R>>,
    root: PathBuf,
    mut shutdown: watch::Receiver<bool>,
) where
    P: LineItemProducer + 'static,
    X: ScheduleExtractor + 'static,
    I: IcmsExecutor + 'static,
    G: ProtegeExecutor + 'static,
    C: RuleConfigurator + 'static,
    R: ProcessedRegistry + 'static,
{
    let mut ticker = tokio::time::interval(service.config().scan_interval());
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    info!(
        "[ap-01] 🔁 Scan loop started: every {}ms over {}",
        service.config().scan_interval_ms,
        root.display()
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                service.scan(&root).await;
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    info!("[ap-01] Scan loop stopping");
                    break;
                }
            }
        }
    }
}
