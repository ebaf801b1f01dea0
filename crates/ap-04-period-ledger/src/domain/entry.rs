//! Ledger entry and key construction.
//!
//! Every PROTEGE 2% payment is keyed by company and period so the next
//! period's computation can find its credit with a single point lookup.

use serde::{Deserialize, Serialize};
use shared_types::Period;

/// Key namespace for 2%-track payment records.
pub const CREDIT_KEY_PREFIX: &str = "protege2:";

/// Build the store key for a company's payment in a period.
///
/// Format: `protege2:{company}:{period}`, e.g.
/// `protege2:06354976000141:202504`.
pub fn credit_key(company_id: &str, period: Period) -> String {
    format!("{}{}:{}", CREDIT_KEY_PREFIX, company_id, period)
}

/// Build the scan prefix covering every period of one company.
pub fn company_prefix(company_id: &str) -> String {
    format!("{}{}:", CREDIT_KEY_PREFIX, company_id)
}

/// A recorded PROTEGE 2% payment.
///
/// Written when a period's computation finishes; read back by the next
/// period's computation as its opening credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodCreditEntry {
    /// Company the payment belongs to.
    pub company_id: String,
    /// Period in which the payment was due.
    pub period: Period,
    /// Payment amount; becomes the next period's credit.
    pub amount: f64,
    /// Seconds since epoch when the entry was recorded.
    pub recorded_at: u64,
    /// Computation pass that produced this entry.
    pub pass_id: String,
}

impl PeriodCreditEntry {
    /// The store key this entry lives under.
    pub fn key(&self) -> String {
        credit_key(&self.company_id, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credit_key_format() {
        let period = Period::parse("202504").unwrap();
        assert_eq!(
            credit_key("06354976000141", period),
            "protege2:06354976000141:202504"
        );
    }

    #[test]
    fn test_company_prefix_covers_entry_keys() {
        let period = Period::parse("202501").unwrap();
        let key = credit_key("11222333000181", period);
        assert!(key.starts_with(&company_prefix("11222333000181")));
    }

    #[test]
    fn test_entry_round_trips_through_bincode() {
        let entry = PeriodCreditEntry {
            company_id: "06354976000141".to_string(),
            period: Period::parse("202503").unwrap(),
            amount: 1520.75,
            recorded_at: 1_735_000_000,
            pass_id: "pass-1".to_string(),
        };

        let bytes = bincode::serialize(&entry).unwrap();
        let decoded: PeriodCreditEntry = bincode::deserialize(&bytes).unwrap();
        assert_eq!(decoded, entry);
    }
}
