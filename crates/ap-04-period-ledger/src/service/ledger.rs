//! Ledger API implementation.

use shared_types::Period;

use crate::domain::{company_prefix, credit_key, PeriodCreditEntry};
use crate::error::LedgerError;
use crate::metrics::LedgerMetrics;
use crate::ports::inbound::PeriodLedgerApi;
use crate::ports::outbound::KeyValueStore;

/// The Period Credit Ledger service.
///
/// Stores one [`PeriodCreditEntry`] per company per period, keyed as
/// `protege2:{company}:{period}`. The engine reads the previous period's
/// entry as the current period's opening credit.
pub struct PeriodCreditLedger<KV: KeyValueStore> {
    kv_store: KV,
    metrics: LedgerMetrics,
}

impl<KV: KeyValueStore> PeriodCreditLedger<KV> {
    /// Create a ledger over the given store.
    pub fn new(kv_store: KV) -> Self {
        Self {
            kv_store,
            metrics: LedgerMetrics::new(),
        }
    }

    /// Metrics collected since startup.
    pub fn metrics(&self) -> &LedgerMetrics {
        &self.metrics
    }

    fn decode_entry(key: &str, bytes: &[u8]) -> Result<PeriodCreditEntry, LedgerError> {
        bincode::deserialize(bytes).map_err(|e| LedgerError::CorruptEntry {
            key: key.to_string(),
            message: e.to_string(),
        })
    }
}

impl<KV: KeyValueStore> PeriodLedgerApi for PeriodCreditLedger<KV> {
    fn record_payment(&mut self, entry: PeriodCreditEntry) -> Result<(), LedgerError> {
        let key = entry.key();
        let bytes =
            bincode::serialize(&entry).map_err(|e| LedgerError::Serialization(e.to_string()))?;

        self.kv_store.put(key.as_bytes(), &bytes)?;
        self.metrics.record_payment();

        tracing::info!(
            "[ap-04] 💾 Recorded PROTEGE 2% payment: {} = {:.2}",
            key,
            entry.amount
        );
        Ok(())
    }

    fn credit_for(&self, company_id: &str, period: Period) -> Result<f64, LedgerError> {
        let key = credit_key(company_id, period);

        match self.kv_store.get(key.as_bytes())? {
            Some(bytes) => {
                let entry = Self::decode_entry(&key, &bytes)?;
                self.metrics.record_credit_hit();
                Ok(entry.amount)
            }
            None => {
                self.metrics.record_credit_miss();
                Ok(0.0)
            }
        }
    }

    fn credit_or_zero(&self, company_id: &str, period: Period) -> f64 {
        match self.credit_for(company_id, period) {
            Ok(amount) => amount,
            Err(e) => {
                self.metrics.record_degraded_read();
                tracing::warn!(
                    "[ap-04] ⚠️ Credit lookup failed for {} {}: {}; using 0.00",
                    company_id,
                    period,
                    e
                );
                0.0
            }
        }
    }

    fn entry_for(
        &self,
        company_id: &str,
        period: Period,
    ) -> Result<Option<PeriodCreditEntry>, LedgerError> {
        let key = credit_key(company_id, period);

        match self.kv_store.get(key.as_bytes())? {
            Some(bytes) => Ok(Some(Self::decode_entry(&key, &bytes)?)),
            None => Ok(None),
        }
    }

    fn entries_for_company(
        &self,
        company_id: &str,
    ) -> Result<Vec<PeriodCreditEntry>, LedgerError> {
        let prefix = company_prefix(company_id);
        let pairs = self.kv_store.prefix_scan(prefix.as_bytes())?;

        let mut entries = Vec::with_capacity(pairs.len());
        for (key, bytes) in pairs {
            let key = String::from_utf8_lossy(&key).into_owned();
            entries.push(Self::decode_entry(&key, &bytes)?);
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::outbound::InMemoryKVStore;

    fn entry(company: &str, period: &str, amount: f64) -> PeriodCreditEntry {
        PeriodCreditEntry {
            company_id: company.to_string(),
            period: Period::parse(period).unwrap(),
            amount,
            recorded_at: 1_735_000_000,
            pass_id: "pass-1".to_string(),
        }
    }

    #[test]
    fn test_payment_becomes_next_period_credit() {
        let mut ledger = PeriodCreditLedger::new(InMemoryKVStore::new());

        ledger
            .record_payment(entry("06354976000141", "202503", 840.0))
            .unwrap();

        let march = Period::parse("202503").unwrap();
        assert_eq!(ledger.credit_for("06354976000141", march).unwrap(), 840.0);
    }

    #[test]
    fn test_missing_entry_reads_as_zero() {
        let ledger = PeriodCreditLedger::new(InMemoryKVStore::new());
        let period = Period::parse("202501").unwrap();

        assert_eq!(ledger.credit_for("99999999000199", period).unwrap(), 0.0);
        assert_eq!(ledger.metrics().snapshot().credit_misses, 1);
    }

    #[test]
    fn test_recompute_overwrites_earlier_payment() {
        let mut ledger = PeriodCreditLedger::new(InMemoryKVStore::new());
        let period = Period::parse("202504").unwrap();

        ledger
            .record_payment(entry("06354976000141", "202504", 100.0))
            .unwrap();
        ledger
            .record_payment(entry("06354976000141", "202504", 250.0))
            .unwrap();

        assert_eq!(ledger.credit_for("06354976000141", period).unwrap(), 250.0);
        assert_eq!(ledger.entries_for_company("06354976000141").unwrap().len(), 1);
    }

    #[test]
    fn test_corrupt_entry_surfaces_as_error_but_degrades_to_zero() {
        struct Corrupting(InMemoryKVStore);
        impl KeyValueStore for Corrupting {
            fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>, crate::error::KVStoreError> {
                self.0.get(key).map(|v| v.map(|_| vec![0xFF, 0x01]))
            }
            fn put(&mut self, key: &[u8], value: &[u8]) -> Result<(), crate::error::KVStoreError> {
                self.0.put(key, value)
            }
            fn delete(&mut self, key: &[u8]) -> Result<(), crate::error::KVStoreError> {
                self.0.delete(key)
            }
            fn atomic_batch_write(
                &mut self,
                operations: Vec<crate::ports::outbound::BatchOperation>,
            ) -> Result<(), crate::error::KVStoreError> {
                self.0.atomic_batch_write(operations)
            }
            fn exists(&self, key: &[u8]) -> Result<bool, crate::error::KVStoreError> {
                self.0.exists(key)
            }
            fn prefix_scan(
                &self,
                prefix: &[u8],
            ) -> Result<Vec<(Vec<u8>, Vec<u8>)>, crate::error::KVStoreError> {
                self.0.prefix_scan(prefix)
            }
        }

        let mut ledger = PeriodCreditLedger::new(Corrupting(InMemoryKVStore::new()));
        ledger
            .record_payment(entry("06354976000141", "202502", 75.0))
            .unwrap();

        let period = Period::parse("202502").unwrap();
        assert!(ledger.credit_for("06354976000141", period).is_err());
        assert_eq!(ledger.credit_or_zero("06354976000141", period), 0.0);
        assert_eq!(ledger.metrics().snapshot().degraded_reads, 1);
    }

    #[test]
    fn test_entries_for_company_isolated_by_cnpj() {
        let mut ledger = PeriodCreditLedger::new(InMemoryKVStore::new());

        ledger
            .record_payment(entry("06354976000141", "202501", 10.0))
            .unwrap();
        ledger
            .record_payment(entry("06354976000141", "202502", 20.0))
            .unwrap();
        ledger
            .record_payment(entry("11222333000181", "202501", 30.0))
            .unwrap();

        let mine = ledger.entries_for_company("06354976000141").unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|e| e.company_id == "06354976000141"));
    }
}
