//! Command-line definition for the `bollo` binary.

use std::path::PathBuf;

use bollo_core::{EmissionsClass, FuelType, Region, VehicleDescriptor};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::utils::{parse_annual_km, parse_consumption, parse_power, parse_price};

/// Italian vehicle tax (bollo) and running-cost estimator.
///
/// Projects the yearly bollo for a vehicle, estimates fuel spending and
/// compares the cost of ownership of the vehicles saved in a local garage.
#[derive(Debug, Parser)]
#[command(name = "bollo", version, about, long_about = None)]
pub struct Cli {
    /// Database backend for the garage.
    #[arg(long, global = true, default_value = "sqlite")]
    pub backend: String,

    /// Database connection string.
    /// For SQLite this is a file path (e.g. `garage.db`) or `:memory:`.
    #[arg(long, global = true, env = "BOLLO_DB", default_value = "garage.db")]
    pub db: String,

    /// Directory holding `base_rates.csv` and `regions.csv`.
    /// The built-in 2024 table is used when omitted.
    #[arg(long, global = true, env = "BOLLO_TARIFFS_DIR")]
    pub tariffs: Option<PathBuf>,

    /// First projected year; defaults to the current calendar year.
    #[arg(long, global = true)]
    pub current_year: Option<i32>,

    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Log filter, e.g. `debug` or `warn,bollo_core=debug`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Append log records to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Silence log output on stderr.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Project the bollo for one vehicle.
    Estimate {
        #[command(flatten)]
        vehicle: VehicleArgs,

        /// Number of years to project (1-50).
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=50))]
        years: u32,
    },

    /// Project fuel spending from consumption, price and yearly distance.
    Fuel(FuelArgs),

    /// Manage the saved vehicles.
    #[command(subcommand)]
    Garage(GarageCommand),

    /// Compare bollo plus fuel across every saved vehicle.
    Compare {
        /// Number of years to project (1-50).
        #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=50))]
        years: u32,

        /// Fuel price per litre.
        #[arg(long, default_value = "1.85", value_parser = parse_price)]
        fuel_price: Decimal,
    },
}

/// Attributes that determine the bollo.
#[derive(Debug, Clone, Args)]
pub struct VehicleArgs {
    /// Engine power in kW (0-10,000).
    #[arg(long, value_parser = parse_power)]
    pub power: Decimal,

    /// Region of registration, e.g. `lombardia` or `"Emilia Romagna"`.
    #[arg(long)]
    pub region: Region,

    /// petrol, diesel, lpg, natural-gas, hybrid or electric.
    #[arg(long)]
    pub fuel: FuelType,

    /// Emissions class, e.g. `euro6`, `"Euro 6"` or `6`.
    #[arg(long = "class")]
    pub emissions_class: EmissionsClass,

    /// Year of first registration.
    #[arg(long)]
    pub registration_year: i32,

    /// Pay by direct debit where the region offers a discount.
    #[arg(long)]
    pub direct_debit: bool,
}

impl From<VehicleArgs> for VehicleDescriptor {
    fn from(args: VehicleArgs) -> Self {
        Self {
            power_kw: args.power,
            region: args.region,
            fuel_type: args.fuel,
            emissions_class: args.emissions_class,
            registration_year: args.registration_year,
            direct_debit: args.direct_debit,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct FuelArgs {
    /// Litres per 100 km (0-100).
    #[arg(long, value_parser = parse_consumption)]
    pub consumption: Decimal,

    /// Price per litre (0-100).
    #[arg(long, value_parser = parse_price)]
    pub price: Decimal,

    /// Kilometres driven per year (0-1,000,000).
    #[arg(long, value_parser = parse_annual_km)]
    pub km: Decimal,

    /// Number of years to project (1-50).
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=50))]
    pub years: u32,
}

#[derive(Debug, Subcommand)]
pub enum GarageCommand {
    /// Save a vehicle.
    Add {
        #[command(flatten)]
        vehicle: VehicleArgs,

        /// Display name; generated from fuel and power when omitted.
        #[arg(long)]
        name: Option<String>,

        /// Litres per 100 km.
        #[arg(long, value_parser = parse_consumption)]
        consumption: Option<Decimal>,

        /// Kilometres driven per year.
        #[arg(long, value_parser = parse_annual_km)]
        km: Option<Decimal>,
    },

    /// List saved vehicles, oldest first.
    List,

    /// Remove a saved vehicle.
    Delete {
        id: Uuid,
    },
}
