//! Multi-year bollo projection.
//!
//! For each projected calendar year the calculator decides which rule
//! applies to the vehicle (exemption window, reduced electric rate, ecological
//! reduction or the standard rate), applies the regional direct-debit
//! discount when the owner pays that way, and rounds the result to cents.
//!
//! # Standard Amount
//!
//! | Power        | National amount                                   |
//! |--------------|---------------------------------------------------|
//! | ≤ 100 kW     | power × under-threshold rate                      |
//! | > 100 kW     | 100 × under-threshold rate + (power − 100) × over-threshold rate |
//!
//! The national amount is then multiplied by the regional modifier.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use bollo_core::calculations::BolloCalculator;
//! use bollo_core::tariff::TariffTable;
//! use bollo_core::{EmissionsClass, FuelType, Region, VehicleDescriptor};
//!
//! let table = TariffTable::italy_2024();
//! let vehicle = VehicleDescriptor {
//!     power_kw: dec!(120),
//!     region: Region::Lombardia,
//!     fuel_type: FuelType::Petrol,
//!     emissions_class: EmissionsClass::Euro6,
//!     registration_year: 2020,
//!     direct_debit: true,
//! };
//!
//! let sequence = BolloCalculator::new(&table).compute_sequence(&vehicle, 1, 2024);
//!
//! assert_eq!(sequence[0].amount, dec!(285.09));
//! assert_eq!(
//!     sequence[0].status_message(),
//!     "Standard rate + direct debit discount (-15%)"
//! );
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use crate::calculations::common::round_half_up;
use crate::clock::Clock;
use crate::models::{
    BolloStatus, EmissionsClass, FuelType, RateBasis, Region, VehicleDescriptor, YearResult,
};
use crate::tariff::{POWER_THRESHOLD_KW, TariffTable};

/// Share of the standard amount an electric vehicle pays once its
/// exemption window has ended.
pub const ELECTRIC_REDUCED_FACTOR: Decimal = dec!(0.25);

/// Share of the standard amount paid by LPG and natural gas vehicles.
pub const ECOLOGICAL_FACTOR: Decimal = dec!(0.75);

/// Projects the bollo owed by one vehicle over consecutive calendar years.
#[derive(Debug, Clone, Copy)]
pub struct BolloCalculator<'a> {
    table: &'a TariffTable,
}

impl<'a> BolloCalculator<'a> {
    pub fn new(table: &'a TariffTable) -> Self {
        Self { table }
    }

    /// Computes one [`YearResult`] per year, starting at `current_year`.
    ///
    /// Never fails: unknown classes and regions degrade to the table's
    /// fallbacks, and `years_to_project == 0` yields an empty sequence.
    pub fn compute_sequence(
        &self,
        vehicle: &VehicleDescriptor,
        years_to_project: u32,
        current_year: i32,
    ) -> Vec<YearResult> {
        debug!(
            fuel = %vehicle.fuel_type,
            region = %vehicle.region,
            power_kw = %vehicle.power_kw,
            years_to_project,
            current_year,
            "Projecting bollo sequence"
        );

        (0..years_to_project)
            .map(|offset| {
                let calendar_year = current_year.saturating_add_unsigned(offset);
                self.compute_year(vehicle, u64::from(offset) + 1, calendar_year)
            })
            .collect()
    }

    /// Same as [`compute_sequence`](Self::compute_sequence), taking the
    /// starting year from `clock`.
    pub fn compute_sequence_now(
        &self,
        vehicle: &VehicleDescriptor,
        years_to_project: u32,
        clock: &impl Clock,
    ) -> Vec<YearResult> {
        self.compute_sequence(vehicle, years_to_project, clock.current_year())
    }

    /// Unrounded amount before fuel-specific reductions and discounts.
    ///
    /// Saturates at [`Decimal::MAX`] instead of overflowing.
    pub fn standard_amount(
        &self,
        power_kw: Decimal,
        emissions_class: EmissionsClass,
        region: Region,
    ) -> Decimal {
        let rate = self.table.base_rate(emissions_class);

        let national = if power_kw <= POWER_THRESHOLD_KW {
            power_kw.saturating_mul(rate.under_threshold)
        } else {
            POWER_THRESHOLD_KW.saturating_mul(rate.under_threshold).saturating_add(
                (power_kw - POWER_THRESHOLD_KW).saturating_mul(rate.over_threshold),
            )
        };

        national.saturating_mul(self.table.regional_modifier(region))
    }

    fn compute_year(
        &self,
        vehicle: &VehicleDescriptor,
        position: u64,
        calendar_year: i32,
    ) -> YearResult {
        let age = calendar_year.saturating_sub(vehicle.registration_year);
        if age < 0 {
            warn!(
                registration_year = vehicle.registration_year,
                calendar_year,
                "Vehicle registered after the projected year; treating it as inside any exemption window"
            );
        }

        let window = self
            .table
            .exemption_years(vehicle.fuel_type, vehicle.region);
        let in_window = i64::from(age) < i64::from(window);
        let standard = || {
            self.standard_amount(vehicle.power_kw, vehicle.emissions_class, vehicle.region)
        };

        let (mut amount, mut status, is_exempt) = match vehicle.fuel_type {
            FuelType::Electric if in_window => (
                Decimal::ZERO,
                BolloStatus::new(RateBasis::ElectricExemption {
                    year: age.saturating_add(1),
                    of: window,
                }),
                true,
            ),
            FuelType::Electric => (
                standard().saturating_mul(ELECTRIC_REDUCED_FACTOR),
                BolloStatus::new(RateBasis::ElectricReduced),
                false,
            ),
            FuelType::Hybrid if in_window => (
                Decimal::ZERO,
                BolloStatus::new(RateBasis::HybridExemption {
                    year: age.saturating_add(1),
                    of: window,
                }),
                true,
            ),
            FuelType::Hybrid
            | FuelType::Petrol
            | FuelType::Diesel
            | FuelType::Lpg
            | FuelType::NaturalGas => (standard(), BolloStatus::new(RateBasis::Standard), false),
        };

        if !is_exempt && vehicle.fuel_type.is_ecological() {
            amount = amount.saturating_mul(ECOLOGICAL_FACTOR);
            status = status.with_basis(RateBasis::Ecological);
        }

        let discount = self.table.direct_debit_discount(vehicle.region);
        if !is_exempt && vehicle.direct_debit && amount > Decimal::ZERO && discount > Decimal::ZERO
        {
            amount = amount.saturating_mul(Decimal::ONE - discount);
            status = status.with_direct_debit(discount);
        }

        let amount = if is_exempt {
            Decimal::ZERO
        } else {
            round_half_up(amount)
        };

        debug!(
            calendar_year,
            age,
            amount = %amount,
            is_exempt,
            "Computed bollo year"
        );

        YearResult {
            calendar_year,
            label: format!("Year {position} ({calendar_year})"),
            amount,
            is_exempt,
            status,
        }
    }
}

/// Sum of the amounts in a projected sequence, saturating at [`Decimal::MAX`].
pub fn sequence_total(results: &[YearResult]) -> Decimal {
    results
        .iter()
        .fold(Decimal::ZERO, |total, r| total.saturating_add(r.amount))
}
