//! Engine, repository, and ledger bridges
//!
//! The scanner speaks only its own outbound ports; these adapters
//! connect them to the real engines, the rule repository, and the
//! period credit ledger. A file with no inferred company maps to the
//! repository's `"default"` entry here, in exactly one place.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tracing::debug;

use ap_01_source_scanner::{IcmsExecutor, ProtegeExecutor, RuleConfigurator, ScannerError};
use ap_02_icms_engine::{IcmsEngineApi, IcmsEngineService, IcmsError, RuleSource};
use ap_03_protege_engine::{
    CreditLedger, ProtegeEngineApi, ProtegeError, ProtegeRuleSource, ProtegeService,
};
use ap_04_period_ledger::{KeyValueStore, PeriodCreditEntry, PeriodCreditLedger, PeriodLedgerApi};
use ap_05_rule_repository::{InMemoryRuleRepository, RuleRepositoryApi, DEFAULT_COMPANY};
use shared_types::{
    ApportionmentResult, CanonicalLineItem, Period, ProtegeResult, ProtegeRule,
    RuleConfiguration, TaxRule,
};

/// The ledger shape the runtime wires: any KV backend, boxed at
/// startup, behind one mutex shared by the bridge and the operator
/// surface.
pub type SharedPeriodLedger = Arc<Mutex<PeriodCreditLedger<Box<dyn KeyValueStore>>>>;

/// ICMS rule source backed by the shared rule repository.
pub struct RepoRuleSource {
    repository: Arc<InMemoryRuleRepository>,
}

impl RepoRuleSource {
    pub fn new(repository: Arc<InMemoryRuleRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl RuleSource for RepoRuleSource {
    async fn icms_rules(&self, company_id: &str) -> Result<Arc<[TaxRule]>, IcmsError> {
        self.repository
            .icms_rules(company_id)
            .map_err(|e| IcmsError::RuleSetUnavailable {
                company_id: company_id.to_string(),
                message: e.to_string(),
            })
    }
}

/// PROTEGE rule source backed by the shared rule repository.
pub struct RepoProtegeRuleSource {
    repository: Arc<InMemoryRuleRepository>,
}

impl RepoProtegeRuleSource {
    pub fn new(repository: Arc<InMemoryRuleRepository>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl ProtegeRuleSource for RepoProtegeRuleSource {
    async fn protege_rules(&self, company_id: &str) -> Result<Arc<[ProtegeRule]>, ProtegeError> {
        self.repository
            .protege_rules(company_id)
            .map_err(|e| ProtegeError::RuleSetUnavailable {
                company_id: company_id.to_string(),
                message: e.to_string(),
            })
    }
}

/// Credit ledger adapter over the period ledger crate.
///
/// The ledger API is synchronous and takes `&mut self` for writes; the
/// shared mutex serializes engine access with the operator surface.
pub struct LedgerBridge {
    ledger: SharedPeriodLedger,
}

impl LedgerBridge {
    pub fn new(ledger: SharedPeriodLedger) -> Self {
        Self { ledger }
    }

    fn epoch_secs() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

#[async_trait]
impl CreditLedger for LedgerBridge {
    async fn credit_or_zero(&self, company_id: &str, period: Period) -> f64 {
        self.ledger.lock().credit_or_zero(company_id, period)
    }

    async fn record_payment(
        &self,
        company_id: &str,
        period: Period,
        amount: f64,
    ) -> Result<(), ProtegeError> {
        let entry = PeriodCreditEntry {
            company_id: company_id.to_string(),
            period,
            amount,
            recorded_at: Self::epoch_secs(),
            pass_id: uuid::Uuid::new_v4().to_string(),
        };
        self.ledger
            .lock()
            .record_payment(entry)
            .map_err(|e| ProtegeError::LedgerWrite {
                company_id: company_id.to_string(),
                period: period.to_string(),
                message: e.to_string(),
            })
    }
}

/// One adapter implementing all three engine-facing scanner ports.
///
/// Also owns the item buffer that carries produced SPED items from an
/// ICMS run to a later PROTEGE trigger: schedules name a company and a
/// period but carry no items of their own, so the PROTEGE computation
/// runs over the latest batch buffered for that key. An empty buffer is
/// a valid zero-item run.
pub struct EngineBridge {
    icms: Arc<IcmsEngineService<RepoRuleSource>>,
    protege: Arc<ProtegeService<RepoProtegeRuleSource, LedgerBridge>>,
    repository: Arc<InMemoryRuleRepository>,
    items: RwLock<HashMap<(String, Period), Vec<CanonicalLineItem>>>,
}

impl EngineBridge {
    pub fn new(
        icms: Arc<IcmsEngineService<RepoRuleSource>>,
        protege: Arc<ProtegeService<RepoProtegeRuleSource, LedgerBridge>>,
        repository: Arc<InMemoryRuleRepository>,
    ) -> Self {
        Self {
            icms,
            protege,
            repository,
            items: RwLock::new(HashMap::new()),
        }
    }

    /// Period of one item, from its ISO `YYYY-MM-DD` transaction date.
    fn period_of(item: &CanonicalLineItem) -> Option<Period> {
        let date = item.transaction_date.as_str();
        let year: u16 = date.get(0..4)?.parse().ok()?;
        let month: u8 = date.get(5..7)?.parse().ok()?;
        Period::new(year, month).ok()
    }

    /// Buffer a produced batch per (company, period). The latest batch
    /// for a key replaces the previous one, so a reprocessed SPED file
    /// never double-counts its items.
    fn buffer_items(&self, company_id: &str, items: &[CanonicalLineItem]) {
        let mut grouped: HashMap<Period, Vec<CanonicalLineItem>> = HashMap::new();
        for item in items {
            if let Some(period) = Self::period_of(item) {
                grouped.entry(period).or_default().push(item.clone());
            }
        }
        if grouped.is_empty() {
            return;
        }

        let mut buffer = self.items.write();
        for (period, batch) in grouped {
            buffer.insert((company_id.to_string(), period), batch);
        }
    }

    fn buffered_for(&self, company_id: &str, period: Period) -> Vec<CanonicalLineItem> {
        self.items
            .read()
            .get(&(company_id.to_string(), period))
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl IcmsExecutor for EngineBridge {
    async fn run_icms(
        &self,
        company_id: Option<&str>,
        items: Vec<CanonicalLineItem>,
    ) -> ApportionmentResult {
        let company = company_id.unwrap_or(DEFAULT_COMPANY);
        self.buffer_items(company, &items);
        self.icms.apportion_for_company(company, &items).await
    }
}

#[async_trait]
impl ProtegeExecutor for EngineBridge {
    async fn run_protege(&self, company_id: Option<&str>, period: Period) -> ProtegeResult {
        let company = company_id.unwrap_or(DEFAULT_COMPANY);
        let items = self.buffered_for(company, period);
        if items.is_empty() {
            debug!(
                "[apura] No buffered items for {} period {}; computing an empty batch",
                company, period
            );
        }
        self.protege.compute_for_company(company, period, &items).await
    }
}

#[async_trait]
impl RuleConfigurator for EngineBridge {
    async fn apply(
        &self,
        company_id: Option<&str>,
        configuration: RuleConfiguration,
    ) -> Result<(), ScannerError> {
        let company = company_id.unwrap_or(DEFAULT_COMPANY);
        self.repository
            .apply_configuration(company, configuration)
            .map_err(|e| ScannerError::Configure {
                company_id: company.to_string(),
                message: e.to_string(),
            })
    }
}
