use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{EmissionsClass, FuelType, Region};

/// Raised by upstream input checks before a descriptor reaches the
/// calculator. The calculator itself never rejects a descriptor.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum VehicleValidationError {
    #[error("power must be non-negative, got {0} kW")]
    NegativePower(Decimal),
}

/// Everything the bollo calculation needs to know about one vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VehicleDescriptor {
    /// Engine power in kilowatts.
    pub power_kw: Decimal,
    pub region: Region,
    pub fuel_type: FuelType,
    pub emissions_class: EmissionsClass,
    /// Calendar year of first registration. May lie in the future.
    pub registration_year: i32,
    /// Whether tax is paid by recurring bank debit (domiciliazione).
    pub direct_debit: bool,
}

impl VehicleDescriptor {
    pub fn validate(&self) -> Result<(), VehicleValidationError> {
        if self.power_kw < Decimal::ZERO {
            return Err(VehicleValidationError::NegativePower(self.power_kw));
        }
        Ok(())
    }
}
