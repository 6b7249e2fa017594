//! CSV import for tariff tables and garage records.

mod garage_loader;
mod tariff_loader;

pub use garage_loader::{GarageLoader, GarageLoaderError};
pub use tariff_loader::{
    BASE_RATES_FILE, BaseRateRecord, REGIONS_FILE, RegionRecord, TariffLoader, TariffLoaderError,
};
