use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::models::{EmissionsClass, FuelType, Region};

/// Power, in kW, at which the per-kW rate switches from the lower to the
/// upper tier.
pub const POWER_THRESHOLD_KW: Decimal = Decimal::ONE_HUNDRED;

/// Errors raised when building a [`TariffTable`] from external data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TariffTableError {
    #[error("tariff table must define at least one emissions class rate")]
    NoBaseRates,

    #[error("base rate for {class} must be non-negative, got {rate}")]
    NegativeBaseRate { class: EmissionsClass, rate: Decimal },

    #[error("regional modifier for {region} must be non-negative, got {modifier}")]
    NegativeModifier { region: Region, modifier: Decimal },

    #[error("direct debit discount for {region} must be in [0, 1), got {rate}")]
    InvalidDiscount { region: Region, rate: Decimal },
}

/// Per-kW rates for one emissions class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseRate {
    /// Rate applied to each of the first 100 kW.
    pub under_threshold: Decimal,
    /// Rate applied to each kW above 100.
    pub over_threshold: Decimal,
}

impl BaseRate {
    pub fn new(
        under_threshold: Decimal,
        over_threshold: Decimal,
    ) -> Self {
        Self {
            under_threshold,
            over_threshold,
        }
    }
}

/// How many years after registration a vehicle owes no bollo.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ExemptionRules {
    /// Nationwide exemption for electric vehicles.
    pub electric_years: u32,
    /// Hybrid exemption for regions with a specific policy.
    pub hybrid_by_region: BTreeMap<Region, u32>,
    /// Hybrid exemption for every other region.
    pub hybrid_default_years: u32,
}

/// Reference data for one tax year.
///
/// Every lookup is total: a missing emissions class falls back to the
/// cleanest class the table defines, a missing region is neutral (modifier
/// 1, no discount). Tables built from external data go through
/// [`TariffTable::new`], which checks the values once so lookups never have
/// to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TariffTable {
    pub(super) base_rates: BTreeMap<EmissionsClass, BaseRate>,
    pub(super) regional_modifiers: BTreeMap<Region, Decimal>,
    pub(super) direct_debit_discounts: BTreeMap<Region, Decimal>,
    pub(super) exemptions: ExemptionRules,
}

impl TariffTable {
    /// Builds a table, rejecting values no tariff year could contain.
    ///
    /// # Errors
    ///
    /// Returns [`TariffTableError`] if:
    /// - `base_rates` is empty
    /// - any base rate or regional modifier is negative
    /// - any direct debit discount is outside `[0, 1)`
    pub fn new(
        base_rates: BTreeMap<EmissionsClass, BaseRate>,
        regional_modifiers: BTreeMap<Region, Decimal>,
        direct_debit_discounts: BTreeMap<Region, Decimal>,
        exemptions: ExemptionRules,
    ) -> Result<Self, TariffTableError> {
        if base_rates.is_empty() {
            return Err(TariffTableError::NoBaseRates);
        }
        for (&class, rate) in &base_rates {
            for value in [rate.under_threshold, rate.over_threshold] {
                if value < Decimal::ZERO {
                    return Err(TariffTableError::NegativeBaseRate { class, rate: value });
                }
            }
        }
        for (&region, &modifier) in &regional_modifiers {
            if modifier < Decimal::ZERO {
                return Err(TariffTableError::NegativeModifier { region, modifier });
            }
        }
        for (&region, &rate) in &direct_debit_discounts {
            if rate < Decimal::ZERO || rate >= Decimal::ONE {
                return Err(TariffTableError::InvalidDiscount { region, rate });
            }
        }

        Ok(Self {
            base_rates,
            regional_modifiers,
            direct_debit_discounts,
            exemptions,
        })
    }

    /// Per-kW rates for `class`, or for the cleanest class defined when
    /// `class` has no entry.
    pub fn base_rate(
        &self,
        class: EmissionsClass,
    ) -> BaseRate {
        if let Some(rate) = self.base_rates.get(&class) {
            return *rate;
        }

        let fallback = self.base_rates.iter().next_back();
        warn!(
            requested = %class,
            fallback = ?fallback.map(|(c, _)| *c),
            "no base rate for emissions class; using cleanest defined tier"
        );
        fallback.map(|(_, rate)| *rate).unwrap_or_default()
    }

    /// Multiplier applied to the national amount. Neutral when unset.
    pub fn regional_modifier(
        &self,
        region: Region,
    ) -> Decimal {
        self.regional_modifiers
            .get(&region)
            .copied()
            .unwrap_or(Decimal::ONE)
    }

    /// Direct-debit discount rate. Zero when the region offers none.
    pub fn direct_debit_discount(
        &self,
        region: Region,
    ) -> Decimal {
        self.direct_debit_discounts
            .get(&region)
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Length of the exemption window for `fuel` registered in `region`.
    pub fn exemption_years(
        &self,
        fuel: FuelType,
        region: Region,
    ) -> u32 {
        match fuel {
            FuelType::Electric => self.exemptions.electric_years,
            FuelType::Hybrid => self
                .exemptions
                .hybrid_by_region
                .get(&region)
                .copied()
                .unwrap_or(self.exemptions.hybrid_default_years),
            FuelType::Petrol | FuelType::Diesel | FuelType::Lpg | FuelType::NaturalGas => 0,
        }
    }

    pub fn exemptions(&self) -> &ExemptionRules {
        &self.exemptions
    }

    /// Emissions classes with an explicit entry, dirtiest first.
    pub fn defined_classes(&self) -> impl Iterator<Item = EmissionsClass> + '_ {
        self.base_rates.keys().copied()
    }
}
