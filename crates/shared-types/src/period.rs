//! # Fiscal Period Value Object
//!
//! A `Period` is one fiscal month, written `YYYYMM` everywhere: ledger
//! keys, log lines, result payloads. The PROTEGE 2% credit crosses period
//! boundaries through `next()` / `prev()`, so the month arithmetic here
//! must roll the year over symmetrically in both directions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Errors from constructing or parsing a fiscal period.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("period must be 6 digits (YYYYMM), got '{0}'")]
    Malformed(String),

    #[error("month out of range: {0} (expected 1-12)")]
    MonthOutOfRange(u8),

    #[error("year out of range: {0} (expected 1000-9999)")]
    YearOutOfRange(u16),
}

/// A validated `YYYYMM` fiscal month.
///
/// Ordering follows calendar order, which makes period ranges sortable
/// without further ceremony.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Period {
    year: u16,
    month: u8,
}

impl Period {
    /// Construct a period from its parts, validating both.
    pub fn new(year: u16, month: u8) -> Result<Self, PeriodError> {
        if !(1000..=9999).contains(&year) {
            return Err(PeriodError::YearOutOfRange(year));
        }
        if !(1..=12).contains(&month) {
            return Err(PeriodError::MonthOutOfRange(month));
        }
        Ok(Self { year, month })
    }

    /// Parse a 6-digit `YYYYMM` string.
    pub fn parse(s: &str) -> Result<Self, PeriodError> {
        if s.len() != 6 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PeriodError::Malformed(s.to_string()));
        }
        let year: u16 = s[..4]
            .parse()
            .map_err(|_| PeriodError::Malformed(s.to_string()))?;
        let month: u8 = s[4..]
            .parse()
            .map_err(|_| PeriodError::Malformed(s.to_string()))?;
        Self::new(year, month)
    }

    /// Calendar year.
    pub fn year(&self) -> u16 {
        self.year
    }

    /// Calendar month (1-12).
    pub fn month(&self) -> u8 {
        self.month
    }

    /// The immediately following calendar month. December rolls the year
    /// forward.
    pub fn next(&self) -> Period {
        if self.month == 12 {
            Period {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Period {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The immediately preceding calendar month. January rolls the year
    /// back.
    pub fn prev(&self) -> Period {
        if self.month == 1 {
            Period {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Period {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Period::parse(s)
    }
}

// Serialized as the 6-digit string so JSON documents, ledger keys, and
// log lines all show the same representation.
impl Serialize for Period {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
