use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Which rule produced a year's amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RateBasis {
    /// Inside the nationwide electric exemption window. `year` is the
    /// 1-based position within the window (zero or negative for vehicles
    /// registered after the calendar year).
    ElectricExemption { year: i32, of: u32 },
    /// Electric vehicle past its exemption window, paying a quarter rate.
    ElectricReduced,
    /// Inside a regional hybrid exemption window.
    HybridExemption { year: i32, of: u32 },
    Standard,
    /// LPG or natural gas reduction.
    Ecological,
}

/// Structured status of one projected year: the rate basis plus the
/// direct-debit discount, if one was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BolloStatus {
    pub basis: RateBasis,
    pub direct_debit_discount: Option<Decimal>,
}

impl BolloStatus {
    pub fn new(basis: RateBasis) -> Self {
        Self {
            basis,
            direct_debit_discount: None,
        }
    }

    /// Records the direct-debit discount. Applying it again replaces the
    /// rate rather than adding a second note.
    pub fn with_direct_debit(
        mut self,
        rate: Decimal,
    ) -> Self {
        self.direct_debit_discount = Some(rate);
        self
    }

    /// Replaces the rate basis, keeping any discount already recorded.
    pub fn with_basis(
        mut self,
        basis: RateBasis,
    ) -> Self {
        self.basis = basis;
        self
    }
}

impl fmt::Display for BolloStatus {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self.basis {
            RateBasis::ElectricExemption { year, of } => {
                write!(f, "Electric exemption (year {year} of {of})")?
            }
            RateBasis::ElectricReduced => f.write_str("Reduced rate (25%) after exemption")?,
            RateBasis::HybridExemption { year, of } => {
                write!(f, "Hybrid exemption (year {year} of {of})")?
            }
            RateBasis::Standard => f.write_str("Standard rate")?,
            RateBasis::Ecological => f.write_str("Ecological reduced rate")?,
        }

        if let Some(rate) = self.direct_debit_discount {
            let percent = (rate * Decimal::ONE_HUNDRED).round_dp(0).normalize();
            write!(f, " + direct debit discount (-{percent}%)")?;
        }
        Ok(())
    }
}

/// One element of a projected bollo sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearResult {
    pub calendar_year: i32,
    /// `"Year {position} ({calendar_year})"`, position starting at 1.
    pub label: String,
    /// Amount due, rounded to cents. Always zero when exempt.
    pub amount: Decimal,
    pub is_exempt: bool,
    pub status: BolloStatus,
}

impl YearResult {
    pub fn status_message(&self) -> String {
        self.status.to_string()
    }
}
