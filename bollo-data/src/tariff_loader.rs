use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use bollo_core::tariff::{BaseRate, ExemptionRules, TariffTable, TariffTableError};
use bollo_core::{EmissionsClass, Region, UnknownCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

/// File name [`TariffLoader::load_dir`] reads base rates from.
pub const BASE_RATES_FILE: &str = "base_rates.csv";
/// File name [`TariffLoader::load_dir`] reads regional data from.
pub const REGIONS_FILE: &str = "regions.csv";

/// Errors that can occur when loading tariff data.
#[derive(Debug, Error)]
pub enum TariffLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("{source} on row {row}")]
    UnknownCode { source: UnknownCode, row: usize },

    #[error("duplicate {kind} '{value}' on row {row}")]
    Duplicate {
        kind: &'static str,
        value: String,
        row: usize,
    },

    #[error("Invalid tariff table: {0}")]
    Table(#[from] TariffTableError),

    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<csv::Error> for TariffLoaderError {
    fn from(err: csv::Error) -> Self {
        TariffLoaderError::CsvParse(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct BaseRateRow {
    emissions_class: String,
    under_threshold: Decimal,
    over_threshold: Decimal,
}

#[derive(Debug, Deserialize)]
struct RegionRow {
    region: String,
    modifier: Option<Decimal>,
    direct_debit_discount: Option<Decimal>,
    hybrid_exemption_years: Option<u32>,
}

/// One row of `base_rates.csv`.
///
/// ```csv
/// emissions_class,under_threshold,over_threshold
/// euro6,2.58,3.87
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseRateRecord {
    pub emissions_class: EmissionsClass,
    pub rate: BaseRate,
}

/// One row of `regions.csv`. Empty cells leave the table's fallback in
/// place for that region.
///
/// ```csv
/// region,modifier,direct_debit_discount,hybrid_exemption_years
/// lombardia,1.00,0.15,5
/// lazio,1.10,,0
/// sicilia,1.00,,
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRecord {
    pub region: Region,
    pub modifier: Option<Decimal>,
    pub direct_debit_discount: Option<Decimal>,
    pub hybrid_exemption_years: Option<u32>,
}

fn csv_reader<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(false)
        .from_reader(reader)
}

fn check_unique<T: Ord + Copy + std::fmt::Display>(
    seen: &mut BTreeSet<T>,
    kind: &'static str,
    value: T,
    row: usize,
) -> Result<(), TariffLoaderError> {
    if !seen.insert(value) {
        return Err(TariffLoaderError::Duplicate {
            kind,
            value: value.to_string(),
            row,
        });
    }
    Ok(())
}

/// Builds a [`TariffTable`] from CSV files.
pub struct TariffLoader;

impl TariffLoader {
    /// Parse `emissions_class,under_threshold,over_threshold` rows.
    ///
    /// Row numbers in errors are 1-based, not counting the header.
    pub fn parse_base_rates<R: Read>(
        reader: R
    ) -> Result<Vec<BaseRateRecord>, TariffLoaderError> {
        let mut seen = BTreeSet::new();
        let mut records = Vec::new();

        for (idx, result) in csv_reader(reader).deserialize::<BaseRateRow>().enumerate() {
            let row = result?;
            let row_number = idx + 1;
            let emissions_class = row
                .emissions_class
                .parse::<EmissionsClass>()
                .map_err(|source| TariffLoaderError::UnknownCode {
                    source,
                    row: row_number,
                })?;
            check_unique(&mut seen, "emissions class", emissions_class, row_number)?;

            records.push(BaseRateRecord {
                emissions_class,
                rate: BaseRate::new(row.under_threshold, row.over_threshold),
            });
        }

        Ok(records)
    }

    /// Parse `region,modifier,direct_debit_discount,hybrid_exemption_years`
    /// rows.
    pub fn parse_regions<R: Read>(reader: R) -> Result<Vec<RegionRecord>, TariffLoaderError> {
        let mut seen = BTreeSet::new();
        let mut records = Vec::new();

        for (idx, result) in csv_reader(reader).deserialize::<RegionRow>().enumerate() {
            let row = result?;
            let row_number = idx + 1;
            let region = row
                .region
                .parse::<Region>()
                .map_err(|source| TariffLoaderError::UnknownCode {
                    source,
                    row: row_number,
                })?;
            check_unique(&mut seen, "region", region, row_number)?;

            records.push(RegionRecord {
                region,
                modifier: row.modifier,
                direct_debit_discount: row.direct_debit_discount,
                hybrid_exemption_years: row.hybrid_exemption_years,
            });
        }

        Ok(records)
    }

    /// Assemble and validate a table.
    ///
    /// # Errors
    ///
    /// Returns [`TariffLoaderError::Table`] when the assembled values fail
    /// [`TariffTable::new`] validation.
    pub fn build(
        base_rates: &[BaseRateRecord],
        regions: &[RegionRecord],
        electric_exemption_years: u32,
        hybrid_default_years: u32,
    ) -> Result<TariffTable, TariffLoaderError> {
        let rates: BTreeMap<_, _> = base_rates
            .iter()
            .map(|r| (r.emissions_class, r.rate))
            .collect();

        let mut modifiers = BTreeMap::new();
        let mut discounts = BTreeMap::new();
        let mut hybrid_by_region = BTreeMap::new();
        for record in regions {
            if let Some(modifier) = record.modifier {
                modifiers.insert(record.region, modifier);
            }
            if let Some(discount) = record.direct_debit_discount {
                discounts.insert(record.region, discount);
            }
            if let Some(years) = record.hybrid_exemption_years {
                hybrid_by_region.insert(record.region, years);
            }
        }

        let exemptions = ExemptionRules {
            electric_years: electric_exemption_years,
            hybrid_by_region,
            hybrid_default_years,
        };

        Ok(TariffTable::new(rates, modifiers, discounts, exemptions)?)
    }

    /// Read [`BASE_RATES_FILE`] and [`REGIONS_FILE`] from `dir`.
    ///
    /// Electric and default hybrid exemption lengths are national rules and
    /// come from the built-in table.
    pub fn load_dir(dir: &Path) -> Result<TariffTable, TariffLoaderError> {
        let base_rates = Self::parse_base_rates(open(&dir.join(BASE_RATES_FILE))?)?;
        let regions = Self::parse_regions(open(&dir.join(REGIONS_FILE))?)?;

        let built_in = TariffTable::italy_2024();
        let national = built_in.exemptions();

        Self::build(
            &base_rates,
            &regions,
            national.electric_years,
            national.hybrid_default_years,
        )
    }
}

fn open(path: &Path) -> Result<File, TariffLoaderError> {
    File::open(path).map_err(|source| TariffLoaderError::Io {
        path: path.to_path_buf(),
        source,
    })
}
