use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::VehicleDescriptor;

/// A vehicle stored in the user's garage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedVehicle {
    pub id: Uuid,
    pub name: String,
    #[serde(flatten)]
    pub vehicle: VehicleDescriptor,
    /// Litres per 100 km.
    pub consumption: Option<Decimal>,
    pub annual_km: Option<Decimal>,
    pub created_at: DateTime<Utc>,
}

/// For saving a vehicle to the garage (no id or timestamp)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSavedVehicle {
    pub name: Option<String>,
    #[serde(flatten)]
    pub vehicle: VehicleDescriptor,
    pub consumption: Option<Decimal>,
    pub annual_km: Option<Decimal>,
}

impl NewSavedVehicle {
    /// The name to store: the user's choice, or one derived from fuel and
    /// power when the name is missing or blank.
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!(
                "Car {} {}kW",
                self.vehicle.fuel_type.label(),
                self.vehicle.power_kw.normalize()
            ),
        }
    }
}
