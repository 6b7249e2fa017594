use std::path::Path;

use anyhow::{Context, Result};
use bollo_core::calculations::common::round_dp_half_up;
use bollo_core::calculations::{
    ComparisonReport, FuelProjection, FuelProjector, sequence_total,
};
use bollo_core::db::{DbConfig, RepositoryRegistry};
use bollo_core::{
    BolloCalculator, Clock, ComparisonConfig, GarageComparison, GarageRepository,
    NewSavedVehicle, RepositoryError, SavedVehicle, SystemClock, TariffTable, VehicleDescriptor,
    YearResult,
};
use bollo_data::{TariffLoader, TariffLoaderError};
use bollo_db_sqlite::SqliteRepositoryFactory;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::cli::{Cli, Command, GarageCommand, OutputFormat};
use crate::utils::{format_amount, opt_decimal_display};

/// Registry with every backend this binary ships with.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

/// Tariffs from `dir` when given, the built-in 2024 table otherwise.
pub fn load_tariffs(dir: Option<&Path>) -> Result<TariffTable, TariffLoaderError> {
    match dir {
        Some(dir) => {
            info!(dir = %dir.display(), "Loading tariff tables");
            TariffLoader::load_dir(dir)
        }
        None => {
            debug!("Using built-in 2024 tariff table");
            Ok(TariffTable::italy_2024())
        }
    }
}

/// Bollo projection for a single vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EstimateReport {
    pub vehicle: VehicleDescriptor,
    pub years: Vec<YearResult>,
    pub total: Decimal,
}

pub fn estimate(
    table: &TariffTable,
    vehicle: VehicleDescriptor,
    years: u32,
    current_year: i32,
) -> EstimateReport {
    let sequence = BolloCalculator::new(table).compute_sequence(&vehicle, years, current_year);
    EstimateReport {
        total: sequence_total(&sequence),
        vehicle,
        years: sequence,
    }
}

#[derive(Debug, Serialize)]
struct Deleted {
    deleted: Uuid,
}

/// Execute the parsed command and return what should be printed.
pub async fn run(cli: Cli) -> Result<String> {
    let current_year = cli
        .current_year
        .unwrap_or_else(|| SystemClock.current_year());
    let format = cli.format;
    let db_config = DbConfig {
        backend: cli.backend,
        connection_string: cli.db,
    };

    match cli.command {
        Command::Estimate { vehicle, years } => {
            let table = load_tariffs(cli.tariffs.as_deref()).context("Failed to load tariffs")?;
            let report = estimate(&table, vehicle.into(), years, current_year);
            render(format, &report, render_estimate)
        }
        Command::Fuel(args) => {
            let projection = FuelProjector::project(args.consumption, args.price, args.km, args.years);
            render(format, &projection, render_fuel)
        }
        Command::Garage(command) => {
            let repo = open_repository(&db_config).await?;
            run_garage(repo.as_ref(), command, format).await
        }
        Command::Compare { years, fuel_price } => {
            let table = load_tariffs(cli.tariffs.as_deref()).context("Failed to load tariffs")?;
            let repo = open_repository(&db_config).await?;
            let vehicles = repo
                .list_vehicles()
                .await
                .context("Failed to list vehicles")?;

            let config = ComparisonConfig {
                fuel_price,
                ..ComparisonConfig::default()
            };
            let report = GarageComparison::new(&table, config).compare(&vehicles, years, current_year);
            render(format, &report, render_comparison)
        }
    }
}

async fn open_repository(config: &DbConfig) -> Result<Box<dyn GarageRepository>> {
    debug!(backend = %config.backend, "Opening garage");
    build_registry()
        .create(config)
        .await
        .with_context(|| format!("Failed to open garage '{}'", config.connection_string))
}

/// Garage subcommands against an already open repository.
pub async fn run_garage(
    repo: &dyn GarageRepository,
    command: GarageCommand,
    format: OutputFormat,
) -> Result<String> {
    match command {
        GarageCommand::Add {
            vehicle,
            name,
            consumption,
            km,
        } => {
            let saved = repo
                .create_vehicle(NewSavedVehicle {
                    name,
                    vehicle: vehicle.into(),
                    consumption,
                    annual_km: km,
                })
                .await
                .context("Failed to save vehicle")?;
            render(format, &saved, |v| {
                format!("Saved '{}' as {}", v.name, v.id)
            })
        }
        GarageCommand::List => {
            let vehicles = repo
                .list_vehicles()
                .await
                .context("Failed to list vehicles")?;
            render(format, &vehicles, |v| render_garage(v))
        }
        GarageCommand::Delete { id } => match repo.delete_vehicle(id).await {
            Ok(()) => render(format, &Deleted { deleted: id }, |d| {
                format!("Deleted {}", d.deleted)
            }),
            Err(RepositoryError::NotFound) => anyhow::bail!("No saved vehicle with id {id}"),
            Err(e) => Err(e).context("Failed to delete vehicle"),
        },
    }
}

fn render<T: Serialize + ?Sized>(
    format: OutputFormat,
    value: &T,
    table: impl FnOnce(&T) -> String,
) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(value).context("Failed to serialize output")
        }
        OutputFormat::Table => Ok(table(value)),
    }
}

// ─── table rendering ─────────────────────────────────────────────────────────

fn describe_vehicle(vehicle: &VehicleDescriptor) -> String {
    let mut description = format!(
        "{}, {} kW, {}, {}, registered {}",
        vehicle.fuel_type.label(),
        vehicle.power_kw.normalize(),
        vehicle.emissions_class.label(),
        vehicle.region.label(),
        vehicle.registration_year
    );
    if vehicle.direct_debit {
        description.push_str(", direct debit");
    }
    description
}

pub fn render_estimate(report: &EstimateReport) -> String {
    let mut lines = vec![
        format!("Vehicle: {}", describe_vehicle(&report.vehicle)),
        String::new(),
        format!("{:<16} {:>10}  {}", "Year", "Bollo", "Status"),
    ];
    for year in &report.years {
        lines.push(format!(
            "{:<16} {:>10}  {}",
            year.label,
            format_amount(year.amount),
            year.status_message()
        ));
    }
    lines.push(format!("{:<16} {:>10}", "Total", format_amount(report.total)));
    lines.join("\n")
}

pub fn render_fuel(projection: &FuelProjection) -> String {
    let mut lines = vec![
        format!(
            "Consumption {} L/100km, price {} per litre, {} km per year",
            projection.consumption.normalize(),
            format_amount(projection.price),
            projection.annual_km.normalize()
        ),
        format!(
            "Per year: {:.1} L, {} ({:.3} per km)",
            round_dp_half_up(projection.annual_liters, 1),
            format_amount(projection.annual_cost),
            round_dp_half_up(projection.cost_per_km, 3)
        ),
        String::new(),
        format!("{:<6} {:>12} {:>12} {:>14}", "Year", "Km", "Litres", "Cumulative"),
    ];
    for year in &projection.years {
        lines.push(format!(
            "{:<6} {:>12} {:>12} {:>14}",
            year.year,
            year.total_km.normalize().to_string(),
            format!("{:.1}", year.liters),
            format_amount(year.cost)
        ));
    }
    lines.push(format!(
        "{:<6} {:>12} {:>12} {:>14}",
        "Total",
        "",
        "",
        format_amount(projection.total_cost())
    ));
    lines.join("\n")
}

pub fn render_garage(vehicles: &[SavedVehicle]) -> String {
    if vehicles.is_empty() {
        return "The garage is empty.".to_string();
    }

    let mut lines = vec![format!(
        "{:<36}  {:<24} {:<12} {:>8} {:<22} {:<7} {:>5} {:>5} {:>8} {:>8}",
        "ID", "Name", "Fuel", "kW", "Region", "Class", "Reg.", "RID", "L/100km", "Km/year"
    )];
    for saved in vehicles {
        let v = &saved.vehicle;
        lines.push(format!(
            "{:<36}  {:<24} {:<12} {:>8} {:<22} {:<7} {:>5} {:>5} {:>8} {:>8}",
            saved.id,
            saved.name,
            v.fuel_type.label(),
            v.power_kw.normalize().to_string(),
            v.region.label(),
            v.emissions_class.label(),
            v.registration_year,
            if v.direct_debit { "yes" } else { "no" },
            opt_decimal_display(&saved.consumption),
            opt_decimal_display(&saved.annual_km)
        ));
    }
    lines.join("\n")
}

pub fn render_comparison(report: &ComparisonReport) -> String {
    if report.is_empty() {
        return "The garage is empty; add vehicles with `bollo garage add`.".to_string();
    }

    let mut lines = Vec::new();
    for vehicle in &report.vehicles {
        lines.push(format!(
            "{} (fuel {} per year)",
            vehicle.name,
            format_amount(vehicle.annual_fuel_cost)
        ));
        lines.push(format!(
            "  {:<16} {:>10} {:>10} {:>10} {:>12}",
            "Year", "Bollo", "Fuel", "Total", "Cumulative"
        ));
        for year in &vehicle.years {
            lines.push(format!(
                "  {:<16} {:>10} {:>10} {:>10} {:>12}",
                year.label,
                format_amount(year.bollo),
                format_amount(year.fuel),
                format_amount(year.total_yearly),
                format_amount(year.cumulative)
            ));
        }
        lines.push(format!(
            "  {:<16} {:>10} {:>10} {:>10}",
            "Total",
            format_amount(vehicle.total_bollo),
            format_amount(vehicle.total_fuel),
            format_amount(vehicle.total_cost)
        ));
        lines.push(String::new());
    }

    lines.push("Cumulative cost".to_string());
    let mut header = format!("  {:<8}", "");
    for vehicle in &report.vehicles {
        header.push_str(&format!(" {:>14}", truncate(&vehicle.name, 14)));
    }
    lines.push(header);
    for point in report.cumulative_series() {
        let mut row = format!("  {:<8}", point.label);
        for (_, total) in &point.totals {
            row.push_str(&format!(" {:>14}", format!("{total:.0}")));
        }
        lines.push(row);
    }
    lines.join("\n")
}

fn truncate(
    name: &str,
    width: usize,
) -> String {
    if name.chars().count() <= width {
        name.to_string()
    } else {
        let mut short: String = name.chars().take(width.saturating_sub(1)).collect();
        short.push('…');
        short
    }
}
