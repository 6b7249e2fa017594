//! Side-by-side cost of ownership for every vehicle in the garage.
//!
//! Each saved vehicle is projected with its own direct-debit preference.
//! Fuel is a constant annual cost derived from the vehicle's consumption and
//! yearly distance, falling back to [`ComparisonConfig`] defaults when the
//! record leaves them unset or zero.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::calculations::bollo::BolloCalculator;
use crate::calculations::common::{round_dp_half_up, round_half_up};
use crate::calculations::fuel::FuelProjector;
use crate::models::SavedVehicle;
use crate::tariff::TariffTable;

/// Fuel assumptions shared by every vehicle in a comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonConfig {
    /// Average price per litre.
    pub fuel_price: Decimal,
    /// Litres per 100 km used when a vehicle has none recorded.
    pub default_consumption: Decimal,
    /// Yearly distance used when a vehicle has none recorded.
    pub default_annual_km: Decimal,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            fuel_price: dec!(1.85),
            default_consumption: dec!(15),
            default_annual_km: dec!(10000),
        }
    }
}

/// One projected year for one vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonYear {
    pub calendar_year: i32,
    pub label: String,
    pub bollo: Decimal,
    pub fuel: Decimal,
    pub total_yearly: Decimal,
    /// Running total from the first projected year through this one.
    pub cumulative: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleComparison {
    pub vehicle_id: Uuid,
    pub name: String,
    pub annual_fuel_cost: Decimal,
    pub years: Vec<ComparisonYear>,
    pub total_bollo: Decimal,
    pub total_fuel: Decimal,
    pub total_cost: Decimal,
}

/// Cumulative cost of every vehicle at one year position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CumulativePoint {
    /// `"Year {n}"`, 1-based.
    pub label: String,
    /// Vehicle id and cumulative cost rounded to whole euros, in garage order.
    pub totals: Vec<(Uuid, Decimal)>,
}

/// Output of [`GarageComparison::compare`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub years: u32,
    pub vehicles: Vec<VehicleComparison>,
}

impl ComparisonReport {
    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn cumulative_series(&self) -> Vec<CumulativePoint> {
        if self.vehicles.is_empty() {
            return Vec::new();
        }

        (0..self.years as usize)
            .map(|i| CumulativePoint {
                label: format!("Year {}", i + 1),
                totals: self
                    .vehicles
                    .iter()
                    .filter_map(|v| {
                        v.years
                            .get(i)
                            .map(|y| (v.vehicle_id, round_dp_half_up(y.cumulative, 0)))
                    })
                    .collect(),
            })
            .collect()
    }
}

/// Projects bollo plus fuel for a set of saved vehicles.
#[derive(Debug, Clone, Copy)]
pub struct GarageComparison<'a> {
    calculator: BolloCalculator<'a>,
    config: ComparisonConfig,
}

impl<'a> GarageComparison<'a> {
    pub fn new(
        table: &'a TariffTable,
        config: ComparisonConfig,
    ) -> Self {
        Self {
            calculator: BolloCalculator::new(table),
            config,
        }
    }

    pub fn config(&self) -> &ComparisonConfig {
        &self.config
    }

    /// One [`VehicleComparison`] per vehicle, in input order.
    pub fn compare(
        &self,
        vehicles: &[SavedVehicle],
        years: u32,
        current_year: i32,
    ) -> ComparisonReport {
        debug!(
            vehicles = vehicles.len(),
            years,
            current_year,
            fuel_price = %self.config.fuel_price,
            "Comparing garage"
        );

        ComparisonReport {
            years,
            vehicles: vehicles
                .iter()
                .map(|v| self.compare_vehicle(v, years, current_year))
                .collect(),
        }
    }

    /// Yearly fuel cost for `vehicle`, rounded to cents.
    pub fn annual_fuel_cost(
        &self,
        vehicle: &SavedVehicle,
    ) -> Decimal {
        let consumption = vehicle
            .consumption
            .filter(|c| *c > Decimal::ZERO)
            .unwrap_or(self.config.default_consumption);
        let annual_km = vehicle
            .annual_km
            .filter(|km| *km > Decimal::ZERO)
            .unwrap_or(self.config.default_annual_km);

        round_half_up(FuelProjector::annual_cost(
            consumption,
            self.config.fuel_price,
            annual_km,
        ))
    }

    fn compare_vehicle(
        &self,
        vehicle: &SavedVehicle,
        years: u32,
        current_year: i32,
    ) -> VehicleComparison {
        let fuel = self.annual_fuel_cost(vehicle);
        let sequence = self
            .calculator
            .compute_sequence(&vehicle.vehicle, years, current_year);

        let mut cumulative = Decimal::ZERO;
        let rows: Vec<ComparisonYear> = sequence
            .into_iter()
            .map(|result| {
                let total_yearly = result.amount.saturating_add(fuel);
                cumulative = cumulative.saturating_add(total_yearly);
                ComparisonYear {
                    calendar_year: result.calendar_year,
                    label: result.label,
                    bollo: result.amount,
                    fuel,
                    total_yearly,
                    cumulative,
                }
            })
            .collect();

        let total_bollo = rows
            .iter()
            .fold(Decimal::ZERO, |total, r| total.saturating_add(r.bollo));
        let total_fuel = rows
            .iter()
            .fold(Decimal::ZERO, |total, r| total.saturating_add(r.fuel));

        VehicleComparison {
            vehicle_id: vehicle.id,
            name: vehicle.name.clone(),
            annual_fuel_cost: fuel,
            years: rows,
            total_bollo,
            total_fuel,
            total_cost: cumulative,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::models::{EmissionsClass, FuelType, Region, VehicleDescriptor};

    const CURRENT_YEAR: i32 = 2024;

    fn saved(
        name: &str,
        fuel_type: FuelType,
        power_kw: Decimal,
        registration_year: i32,
        direct_debit: bool,
        consumption: Option<Decimal>,
        annual_km: Option<Decimal>,
    ) -> SavedVehicle {
        SavedVehicle {
            id: Uuid::new_v4(),
            name: name.to_string(),
            vehicle: VehicleDescriptor {
                power_kw,
                region: Region::Lombardia,
                fuel_type,
                emissions_class: EmissionsClass::Euro6,
                registration_year,
                direct_debit,
            },
            consumption,
            annual_km,
            created_at: Utc::now(),
        }
    }

    fn petrol_car(direct_debit: bool) -> SavedVehicle {
        saved(
            "Petrol",
            FuelType::Petrol,
            dec!(120),
            2020,
            direct_debit,
            Some(dec!(6.5)),
            Some(dec!(12000)),
        )
    }

    fn new_electric_car() -> SavedVehicle {
        saved("EV", FuelType::Electric, dec!(150), 2024, true, None, None)
    }

    // =========================================================================
    // ComparisonConfig tests
    // =========================================================================

    #[test]
    fn default_config_matches_average_assumptions() {
        let config = ComparisonConfig::default();

        assert_eq!(config.fuel_price, dec!(1.85));
        assert_eq!(config.default_consumption, dec!(15));
        assert_eq!(config.default_annual_km, dec!(10000));
    }

    // =========================================================================
    // annual_fuel_cost tests
    // =========================================================================

    #[test]
    fn annual_fuel_cost_uses_recorded_values() {
        let table = TariffTable::italy_2024();
        let comparison = GarageComparison::new(&table, ComparisonConfig::default());

        assert_eq!(comparison.annual_fuel_cost(&petrol_car(false)), dec!(1443.00));
    }

    #[test]
    fn annual_fuel_cost_falls_back_to_defaults() {
        let table = TariffTable::italy_2024();
        let comparison = GarageComparison::new(&table, ComparisonConfig::default());

        // 10 000 km at 15 L/100km and 1.85 €/L
        assert_eq!(comparison.annual_fuel_cost(&new_electric_car()), dec!(2775.00));
    }

    #[test]
    fn zero_consumption_is_treated_as_missing() {
        let table = TariffTable::italy_2024();
        let comparison = GarageComparison::new(&table, ComparisonConfig::default());
        let mut car = petrol_car(false);
        car.consumption = Some(Decimal::ZERO);

        // 120 × 15 × 1.85
        assert_eq!(comparison.annual_fuel_cost(&car), dec!(3330.00));
    }

    #[test]
    fn fuel_price_is_configurable() {
        let table = TariffTable::italy_2024();
        let config = ComparisonConfig {
            fuel_price: dec!(2.00),
            ..ComparisonConfig::default()
        };
        let comparison = GarageComparison::new(&table, config);

        assert_eq!(comparison.annual_fuel_cost(&petrol_car(false)), dec!(1560.00));
    }

    // =========================================================================
    // compare tests
    // =========================================================================

    #[test]
    fn compare_builds_running_totals() {
        let table = TariffTable::italy_2024();
        let comparison = GarageComparison::new(&table, ComparisonConfig::default());
        let car = petrol_car(false);

        let report = comparison.compare(std::slice::from_ref(&car), 3, CURRENT_YEAR);

        let result = &report.vehicles[0];
        assert_eq!(result.vehicle_id, car.id);
        assert_eq!(result.name, "Petrol");
        let cumulative: Vec<_> = result.years.iter().map(|y| y.cumulative).collect();
        assert_eq!(cumulative, vec![dec!(1778.40), dec!(3556.80), dec!(5335.20)]);
        assert_eq!(result.years[0].label, "Year 1 (2024)");
        assert_eq!(result.years[0].total_yearly, dec!(1778.40));
        assert_eq!(result.total_bollo, dec!(1006.20));
        assert_eq!(result.total_fuel, dec!(4329.00));
        assert_eq!(result.total_cost, dec!(5335.20));
    }

    #[test]
    fn compare_uses_each_vehicles_direct_debit_preference() {
        let table = TariffTable::italy_2024();
        let comparison = GarageComparison::new(&table, ComparisonConfig::default());
        let cars = vec![petrol_car(false), petrol_car(true)];

        let report = comparison.compare(&cars, 1, CURRENT_YEAR);

        assert_eq!(report.vehicles[0].years[0].bollo, dec!(335.40));
        assert_eq!(report.vehicles[1].years[0].bollo, dec!(285.09));
    }

    #[test]
    fn compare_keeps_input_order() {
        let table = TariffTable::italy_2024();
        let comparison = GarageComparison::new(&table, ComparisonConfig::default());
        let cars = vec![new_electric_car(), petrol_car(false)];

        let report = comparison.compare(&cars, 2, CURRENT_YEAR);

        let ids: Vec<_> = report.vehicles.iter().map(|v| v.vehicle_id).collect();
        assert_eq!(ids, vec![cars[0].id, cars[1].id]);
    }

    #[test]
    fn exempt_electric_car_only_pays_fuel() {
        let table = TariffTable::italy_2024();
        let comparison = GarageComparison::new(&table, ComparisonConfig::default());

        let report = comparison.compare(&[new_electric_car()], 3, CURRENT_YEAR);

        let result = &report.vehicles[0];
        assert_eq!(result.total_bollo, Decimal::ZERO);
        assert_eq!(result.total_cost, dec!(8325.00));
    }

    #[test]
    fn empty_garage_yields_empty_report() {
        let table = TariffTable::italy_2024();
        let comparison = GarageComparison::new(&table, ComparisonConfig::default());

        let report = comparison.compare(&[], 10, CURRENT_YEAR);

        assert!(report.is_empty());
        assert!(report.cumulative_series().is_empty());
    }

    #[test]
    fn huge_vehicle_totals_saturate() {
        let table = TariffTable::italy_2024();
        let comparison = GarageComparison::new(&table, ComparisonConfig::default());
        let huge = saved(
            "Huge",
            FuelType::Petrol,
            dec!(30000000000000000000000000000),
            2020,
            false,
            Some(dec!(30000000000000000000000000000)),
            Some(dec!(30000000000000000000000000000)),
        );

        let report = comparison.compare(&[huge], 2, CURRENT_YEAR);

        let result = &report.vehicles[0];
        assert_eq!(result.years.len(), 2);
        assert_eq!(result.total_cost, Decimal::MAX);
        assert_eq!(result.total_bollo, Decimal::MAX);
    }

    // =========================================================================
    // cumulative_series tests
    // =========================================================================

    #[test]
    fn cumulative_series_rounds_to_whole_euros() {
        let table = TariffTable::italy_2024();
        let comparison = GarageComparison::new(&table, ComparisonConfig::default());
        let petrol = petrol_car(false);
        let ev = new_electric_car();

        let report = comparison.compare(&[petrol.clone(), ev.clone()], 3, CURRENT_YEAR);
        let series = report.cumulative_series();

        assert_eq!(
            series,
            vec![
                CumulativePoint {
                    label: "Year 1".to_string(),
                    totals: vec![(petrol.id, dec!(1778)), (ev.id, dec!(2775))],
                },
                CumulativePoint {
                    label: "Year 2".to_string(),
                    totals: vec![(petrol.id, dec!(3557)), (ev.id, dec!(5550))],
                },
                CumulativePoint {
                    label: "Year 3".to_string(),
                    totals: vec![(petrol.id, dec!(5335)), (ev.id, dec!(8325))],
                },
            ]
        );
    }
}
