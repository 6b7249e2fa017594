//! Integration tests for tariff and garage loading against the SQLite backend.

use std::path::{Path, PathBuf};

use bollo_core::calculations::{ComparisonConfig, GarageComparison};
use bollo_core::tariff::TariffTable;
use bollo_core::{FuelType, GarageRepository, Region};
use bollo_data::{GarageLoader, GarageLoaderError, TariffLoader};
use bollo_db_sqlite::SqliteGarageRepository;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

const GARAGE_CSV: &str = include_str!("../test-data/garage.csv");

fn test_data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data")
}

async fn setup_test_db() -> SqliteGarageRepository {
    let repo = SqliteGarageRepository::new(":memory:")
        .await
        .expect("Failed to create in-memory database");
    repo.run_migrations()
        .await
        .expect("Failed to run migrations");
    repo
}

#[test]
fn test_load_dir_reproduces_built_in_table() {
    let table = TariffLoader::load_dir(&test_data_dir()).expect("Failed to load tariffs");

    assert_eq!(table, TariffTable::italy_2024());
}

#[tokio::test]
async fn test_load_garage_csv() {
    let repo = setup_test_db().await;

    let records = GarageLoader::parse(GARAGE_CSV.as_bytes()).expect("Failed to parse CSV");
    let inserted = GarageLoader::load(&repo, &records)
        .await
        .expect("Failed to load vehicles");

    assert_eq!(inserted, 3);

    let vehicles = repo.list_vehicles().await.expect("Failed to list vehicles");
    let names: Vec<_> = vehicles.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["Daily driver", "Car Electric 150kW", "Weekend van"]);
    assert_eq!(vehicles[1].vehicle.fuel_type, FuelType::Electric);
    assert_eq!(vehicles[2].vehicle.region, Region::Campania);
    assert_eq!(vehicles[2].consumption, Some(dec!(7.5)));
}

#[tokio::test]
async fn test_load_through_trait_object() {
    let repo: Box<dyn GarageRepository> = Box::new(setup_test_db().await);

    let records = GarageLoader::parse(GARAGE_CSV.as_bytes()).expect("Failed to parse CSV");
    let inserted = GarageLoader::load(repo.as_ref(), &records)
        .await
        .expect("Failed to load vehicles");

    assert_eq!(inserted, 3);
}

#[tokio::test]
async fn test_loaded_garage_compares_with_loaded_tariffs() {
    let repo = setup_test_db().await;
    let table = TariffLoader::load_dir(&test_data_dir()).expect("Failed to load tariffs");
    let records = GarageLoader::parse(GARAGE_CSV.as_bytes()).expect("Failed to parse CSV");
    GarageLoader::load(&repo, &records)
        .await
        .expect("Failed to load vehicles");
    let vehicles = repo.list_vehicles().await.expect("Failed to list vehicles");

    let report = GarageComparison::new(&table, ComparisonConfig::default()).compare(&vehicles, 1, 2024);

    // Lombardia petrol with direct debit; electric car still exempt.
    assert_eq!(report.vehicles[0].years[0].bollo, dec!(285.09));
    assert_eq!(report.vehicles[1].years[0].bollo, dec!(0));
    assert_eq!(report.vehicles[1].annual_fuel_cost, dec!(2775.00));
}

#[test]
fn test_parse_file_missing() {
    let err = GarageLoader::parse_file(Path::new("/nonexistent/garage.csv"))
        .expect_err("should fail for missing file");

    assert!(matches!(err, GarageLoaderError::Io { .. }), "got {err:?}");
}
