use std::path::PathBuf;

use anyhow::{Context, Result};
use bollo_data::GarageLoader;
use bollo_db_sqlite::SqliteGarageRepository;
use clap::Parser;

/// Import vehicles from a CSV file into the garage database.
///
/// The CSV file should have the following columns:
/// - name: Display name (empty for a generated one)
/// - power: Engine power in kW
/// - region: Region of registration (e.g., lombardia)
/// - fuel: petrol, diesel, lpg, natural-gas, hybrid or electric
/// - emissions_class: euro0 through euro6
/// - registration_year: Year of first registration
/// - direct_debit: true or false (empty for false)
/// - consumption: L/100km (optional)
/// - annual_km: Yearly distance (optional)
#[derive(Parser, Debug)]
#[command(name = "bollo-data-loader")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the CSV file containing vehicles
    #[arg(short, long)]
    file: PathBuf,

    /// SQLite database file or URL; created if missing
    #[arg(short, long, default_value = "garage.db")]
    database: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let repo = SqliteGarageRepository::new(&args.database)
        .await
        .with_context(|| format!("Failed to open database: {}", args.database))?;
    repo.run_migrations()
        .await
        .context("Failed to run migrations")?;

    println!("Loading vehicles from: {}", args.file.display());

    let records = GarageLoader::parse_file(&args.file)
        .with_context(|| format!("Failed to parse CSV: {}", args.file.display()))?;

    println!("Parsed {} records from CSV", records.len());

    let inserted = GarageLoader::load(&repo, &records)
        .await
        .context("Failed to load vehicles into database")?;

    println!("Successfully loaded {inserted} vehicles into the garage.");

    Ok(())
}
