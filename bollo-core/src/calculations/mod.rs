//! Bollo, fuel and whole-garage cost calculations.
//!
//! Everything here is synchronous and pure: the tariff table and the
//! current year come in as arguments, and no calculation can fail.

pub mod bollo;
pub mod common;
pub mod comparison;
pub mod fuel;

pub use bollo::{BolloCalculator, ECOLOGICAL_FACTOR, ELECTRIC_REDUCED_FACTOR, sequence_total};
pub use comparison::{
    ComparisonConfig, ComparisonReport, ComparisonYear, CumulativePoint, GarageComparison,
    VehicleComparison,
};
pub use fuel::{FuelProjection, FuelProjector, FuelYear};
