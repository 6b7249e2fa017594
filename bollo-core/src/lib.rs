pub mod calculations;
pub mod clock;
pub mod db;
pub mod models;
pub mod tariff;

pub use calculations::{BolloCalculator, ComparisonConfig, FuelProjector, GarageComparison};
pub use clock::{Clock, FixedClock, SystemClock};
pub use db::repository::{GarageRepository, RepositoryError};
pub use models::*;
pub use tariff::{TariffTable, TariffTableError};
