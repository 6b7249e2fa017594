mod code;
mod emissions_class;
mod fuel_type;
mod region;
mod saved_vehicle;
mod vehicle;
mod year_result;

pub use code::UnknownCode;
pub use emissions_class::EmissionsClass;
pub use fuel_type::FuelType;
pub use region::Region;
pub use saved_vehicle::{NewSavedVehicle, SavedVehicle};
pub use vehicle::{VehicleDescriptor, VehicleValidationError};
pub use year_result::{BolloStatus, RateBasis, YearResult};
