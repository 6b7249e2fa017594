//! Fuel running-cost projection.
//!
//! Annual litres are `annual_km / 100 × consumption`; annual cost is annual
//! litres × price per litre. The projection repeats that year `n` times,
//! reporting cumulative distance, litres (rounded to one decimal) and cost
//! (rounded to cents).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{round_dp_half_up, round_half_up};

/// Cumulative figures after `year` years of driving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelYear {
    /// 1-based position in the projection.
    pub year: u32,
    pub total_km: Decimal,
    pub liters: Decimal,
    pub cost: Decimal,
}

/// Result of [`FuelProjector::project`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuelProjection {
    /// Litres per 100 km.
    pub consumption: Decimal,
    /// Price per litre.
    pub price: Decimal,
    pub annual_km: Decimal,
    pub annual_liters: Decimal,
    pub annual_cost: Decimal,
    /// Zero when `annual_km` is zero.
    pub cost_per_km: Decimal,
    pub years: Vec<FuelYear>,
}

impl FuelProjection {
    /// Cumulative cost over the whole projection.
    pub fn total_cost(&self) -> Decimal {
        self.years.last().map_or(Decimal::ZERO, |y| y.cost)
    }
}

/// Stateless projector for fuel spending.
///
/// Inputs are expected to be non-negative; checking them is the caller's
/// job. Products saturate at [`Decimal::MAX`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FuelProjector;

impl FuelProjector {
    pub fn annual_liters(
        consumption: Decimal,
        annual_km: Decimal,
    ) -> Decimal {
        (annual_km / Decimal::ONE_HUNDRED).saturating_mul(consumption)
    }

    pub fn annual_cost(
        consumption: Decimal,
        price: Decimal,
        annual_km: Decimal,
    ) -> Decimal {
        Self::annual_liters(consumption, annual_km).saturating_mul(price)
    }

    pub fn project(
        consumption: Decimal,
        price: Decimal,
        annual_km: Decimal,
        years: u32,
    ) -> FuelProjection {
        let annual_liters = Self::annual_liters(consumption, annual_km);
        let annual_cost = annual_liters.saturating_mul(price);
        let cost_per_km = if annual_km > Decimal::ZERO {
            annual_cost.checked_div(annual_km).unwrap_or(Decimal::MAX)
        } else {
            Decimal::ZERO
        };

        let years = (1..=years)
            .map(|year| {
                let n = Decimal::from(year);
                FuelYear {
                    year,
                    total_km: annual_km.saturating_mul(n),
                    liters: round_dp_half_up(annual_liters.saturating_mul(n), 1),
                    cost: round_half_up(annual_cost.saturating_mul(n)),
                }
            })
            .collect();

        FuelProjection {
            consumption,
            price,
            annual_km,
            annual_liters,
            annual_cost,
            cost_per_km,
            years,
        }
    }
}
