//! CSV import for garage records.
//!
//! ## CSV Format
//!
//! Headers are matched by name, so column order does not matter. Optional
//! columns may be left empty or omitted.
//!
//! | Column              | Required | Type    | Notes                                      |
//! |---------------------|----------|---------|--------------------------------------------|
//! | `name`              | no       | string  | Defaults to `Car {fuel} {power}kW`         |
//! | `power`             | yes      | decimal | kW, non-negative                           |
//! | `region`            | yes      | string  | e.g. `lombardia`, `Emilia Romagna`         |
//! | `fuel`              | yes      | string  | `petrol`, `diesel`, `lpg`, `natural-gas`, `hybrid`, `electric`, or the Italian label |
//! | `emissions_class`   | yes      | string  | `euro6`, `Euro 6` or `6`                   |
//! | `registration_year` | yes      | integer |                                            |
//! | `direct_debit`      | no       | bool    | `true` / `false`, empty means `false`      |
//! | `consumption`       | no       | decimal | L/100km                                    |
//! | `annual_km`         | no       | decimal |                                            |
//!
//! ```csv
//! name,power,region,fuel,emissions_class,registration_year,direct_debit,consumption,annual_km
//! Daily driver,120,lombardia,petrol,euro6,2020,true,6.5,12000
//! ,85,Veneto,Ibrida,Euro 6,2022,,,
//! ```

use std::io::Read;
use std::path::Path;

use bollo_core::{
    EmissionsClass, FuelType, GarageRepository, NewSavedVehicle, Region, RepositoryError,
    UnknownCode, VehicleDescriptor, VehicleValidationError,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    name: Option<String>,
    power: Decimal,
    region: String,
    fuel: String,
    emissions_class: String,
    registration_year: i32,
    #[serde(default)]
    direct_debit: Option<bool>,
    #[serde(default)]
    consumption: Option<Decimal>,
    #[serde(default)]
    annual_km: Option<Decimal>,
}

/// Errors that can occur while importing garage records.
#[derive(Debug, Error)]
pub enum GarageLoaderError {
    /// Bad structure, missing required column or type mismatch.
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A region, fuel or class cell did not name a known value. `row` is
    /// 1-based, not counting the header.
    #[error("{source} on row {row}")]
    UnknownCode { source: UnknownCode, row: usize },

    #[error("{source} on row {row}")]
    InvalidVehicle {
        source: VehicleValidationError,
        row: usize,
    },

    #[error("negative {field} on row {row}")]
    NegativeValue { field: &'static str, row: usize },

    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

fn convert_row(
    row: CsvRow,
    row_number: usize,
) -> Result<NewSavedVehicle, GarageLoaderError> {
    let unknown = |source: UnknownCode| GarageLoaderError::UnknownCode {
        source,
        row: row_number,
    };

    let vehicle = VehicleDescriptor {
        power_kw: row.power,
        region: row.region.parse::<Region>().map_err(unknown)?,
        fuel_type: row.fuel.parse::<FuelType>().map_err(unknown)?,
        emissions_class: row
            .emissions_class
            .parse::<EmissionsClass>()
            .map_err(unknown)?,
        registration_year: row.registration_year,
        direct_debit: row.direct_debit.unwrap_or(false),
    };
    vehicle
        .validate()
        .map_err(|source| GarageLoaderError::InvalidVehicle {
            source,
            row: row_number,
        })?;

    for (field, value) in [
        ("consumption", row.consumption),
        ("annual_km", row.annual_km),
    ] {
        if value.is_some_and(|v| v < Decimal::ZERO) {
            return Err(GarageLoaderError::NegativeValue {
                field,
                row: row_number,
            });
        }
    }

    Ok(NewSavedVehicle {
        name: row.name.filter(|n| !n.trim().is_empty()),
        vehicle,
        consumption: row.consumption,
        annual_km: row.annual_km,
    })
}

/// Imports garage records from CSV into any [`GarageRepository`].
pub struct GarageLoader;

impl GarageLoader {
    /// Parse vehicles in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<NewSavedVehicle>, GarageLoaderError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(false)
            .from_reader(reader);

        reader
            .deserialize::<CsvRow>()
            .enumerate()
            .map(|(idx, result)| {
                let row = result?;
                convert_row(row, idx + 1)
            })
            .collect()
    }

    /// Convenience wrapper: open `path` and delegate to [`GarageLoader::parse`].
    pub fn parse_file(path: &Path) -> Result<Vec<NewSavedVehicle>, GarageLoaderError> {
        let file = std::fs::File::open(path).map_err(|source| GarageLoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(file)
    }

    /// Insert every record, returning how many were stored.
    pub async fn load<R: GarageRepository + ?Sized>(
        repo: &R,
        records: &[NewSavedVehicle],
    ) -> Result<usize, GarageLoaderError> {
        let mut inserted = 0;
        for record in records {
            repo.create_vehicle(record.clone()).await?;
            inserted += 1;
        }
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const HEADER: &str =
        "name,power,region,fuel,emissions_class,registration_year,direct_debit,consumption,annual_km";

    fn csv(rows: &[&str]) -> String {
        let mut out = HEADER.to_string();
        for row in rows {
            out.push('\n');
            out.push_str(row);
        }
        out.push('\n');
        out
    }

    // -----------------------------------------------------------------------
    // happy paths
    // -----------------------------------------------------------------------
    #[test]
    fn test_full_row_parses_every_field() {
        let input = csv(&["Daily driver,120,lombardia,petrol,euro6,2020,true,6.5,12000"]);

        let records = GarageLoader::parse(input.as_bytes()).expect("should parse");

        assert_eq!(
            records,
            vec![NewSavedVehicle {
                name: Some("Daily driver".to_string()),
                vehicle: VehicleDescriptor {
                    power_kw: dec!(120),
                    region: Region::Lombardia,
                    fuel_type: FuelType::Petrol,
                    emissions_class: EmissionsClass::Euro6,
                    registration_year: 2020,
                    direct_debit: true,
                },
                consumption: Some(dec!(6.5)),
                annual_km: Some(dec!(12000)),
            }]
        );
    }

    #[test]
    fn test_empty_optional_cells() {
        let input = csv(&[",85,Veneto,Ibrida,Euro 6,2022,,,"]);

        let records = GarageLoader::parse(input.as_bytes()).expect("should parse");

        let r = &records[0];
        assert_eq!(r.name, None);
        assert_eq!(r.vehicle.fuel_type, FuelType::Hybrid);
        assert!(!r.vehicle.direct_debit);
        assert_eq!(r.consumption, None);
        assert_eq!(r.annual_km, None);
        assert_eq!(r.display_name(), "Car Hybrid 85kW");
    }

    #[test]
    fn test_optional_columns_may_be_omitted() {
        let input = "power,region,fuel,emissions_class,registration_year\n95,Sicilia,GPL,4,2012\n";

        let records = GarageLoader::parse(input.as_bytes()).expect("should parse");

        assert_eq!(records[0].vehicle.fuel_type, FuelType::Lpg);
        assert_eq!(records[0].vehicle.emissions_class, EmissionsClass::Euro4);
        assert_eq!(records[0].name, None);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        let input = csv(&["  Van , 100 , emilia romagna , diesel , euro5 , 2016 , false , , "]);

        let records = GarageLoader::parse(input.as_bytes()).expect("should parse");

        assert_eq!(records[0].name.as_deref(), Some("Van"));
        assert_eq!(records[0].vehicle.region, Region::EmiliaRomagna);
    }

    #[test]
    fn test_empty_csv_yields_no_records() {
        let records = GarageLoader::parse(csv(&[]).as_bytes()).expect("should parse");

        assert!(records.is_empty());
    }

    // -----------------------------------------------------------------------
    // errors
    // -----------------------------------------------------------------------
    #[test]
    fn test_unknown_fuel_reports_row_number() {
        let input = csv(&[
            "A,120,lombardia,petrol,euro6,2020,,,",
            "B,120,lombardia,steam,euro6,2020,,,",
        ]);

        let err = GarageLoader::parse(input.as_bytes()).expect_err("should fail");

        assert_eq!(err.to_string(), "unknown fuel type 'steam' on row 2");
    }

    #[test]
    fn test_unknown_region_reports_row_number() {
        let input = csv(&["A,120,narnia,petrol,euro6,2020,,,"]);

        let err = GarageLoader::parse(input.as_bytes()).expect_err("should fail");

        match err {
            GarageLoaderError::UnknownCode { source, row } => {
                assert_eq!(source.kind, "region");
                assert_eq!(row, 1);
            }
            other => panic!("expected UnknownCode, got {other:?}"),
        }
    }

    #[test]
    fn test_negative_power_is_rejected() {
        let input = csv(&["A,-5,lombardia,petrol,euro6,2020,,,"]);

        let err = GarageLoader::parse(input.as_bytes()).expect_err("should fail");

        assert!(
            matches!(err, GarageLoaderError::InvalidVehicle { row: 1, .. }),
            "got {err:?}"
        );
    }

    #[test]
    fn test_negative_consumption_is_rejected() {
        let input = csv(&["A,90,lombardia,petrol,euro6,2020,,-1,"]);

        let err = GarageLoader::parse(input.as_bytes()).expect_err("should fail");

        assert_eq!(err.to_string(), "negative consumption on row 1");
    }

    #[test]
    fn test_wrong_column_count_is_a_parse_error() {
        let input = csv(&["A,90,lombardia,petrol"]);

        let err = GarageLoader::parse(input.as_bytes()).expect_err("should fail");

        assert!(matches!(err, GarageLoaderError::Parse(_)), "got {err:?}");
    }
}
