//! Tariff reference data: per-kW rates, regional modifiers, direct-debit
//! discounts and exemption windows.

mod italy_2024;
mod table;

pub use table::{BaseRate, ExemptionRules, POWER_THRESHOLD_KW, TariffTable, TariffTableError};
