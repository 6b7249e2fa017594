use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use bollo_core::{
    EmissionsClass, FuelType, GarageRepository, NewSavedVehicle, Region, RepositoryError,
    SavedVehicle, VehicleDescriptor,
};
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;
use tracing::{debug, info};
use uuid::Uuid;

use crate::decimal::{decimal_to_f64, get_decimal, get_optional_decimal};

const SELECT_VEHICLES: &str = "SELECT id, name, power_kw, region, fuel_type, emissions_class,
        registration_year, direct_debit, consumption, annual_km, created_at
     FROM saved_vehicles";

pub struct SqliteGarageRepository {
    pool: SqlitePool,
}

fn is_in_memory(database: &str) -> bool {
    matches!(database, ":memory:" | "sqlite::memory:" | "sqlite://:memory:")
}

/// Accepts a bare file path, `:memory:`, or a `sqlite:` URL.
fn connect_options(database: &str) -> Result<SqliteConnectOptions> {
    let options = if is_in_memory(database) || database.starts_with("sqlite:") {
        SqliteConnectOptions::from_str(database)
            .with_context(|| format!("Invalid SQLite connection string: {database}"))?
    } else {
        SqliteConnectOptions::new().filename(database)
    };
    Ok(options.create_if_missing(true))
}

impl SqliteGarageRepository {
    pub async fn new(database: &str) -> Result<Self> {
        let options = connect_options(database)?;

        // An in-memory database lives only as long as its connection.
        let pool_options = if is_in_memory(database) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {database}"))?;

        debug!(database, "Opened SQLite garage");
        Ok(Self { pool })
    }

    pub fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn db_error(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

fn parse_code<T>(
    row: &SqliteRow,
    column: &str,
) -> Result<T, RepositoryError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let code: String = row.try_get(column).map_err(db_error)?;
    code.parse()
        .map_err(|e: T::Err| RepositoryError::Database(format!("Invalid {column}: {e}")))
}

fn row_to_saved_vehicle(row: &SqliteRow) -> Result<SavedVehicle, RepositoryError> {
    let id: String = row.try_get("id").map_err(db_error)?;

    Ok(SavedVehicle {
        id: Uuid::parse_str(&id)
            .map_err(|e| RepositoryError::Database(format!("Invalid id '{id}': {e}")))?,
        name: row.try_get("name").map_err(db_error)?,
        vehicle: VehicleDescriptor {
            power_kw: get_decimal(row, "power_kw")?,
            region: parse_code::<Region>(row, "region")?,
            fuel_type: parse_code::<FuelType>(row, "fuel_type")?,
            emissions_class: parse_code::<EmissionsClass>(row, "emissions_class")?,
            registration_year: row.try_get("registration_year").map_err(db_error)?,
            direct_debit: row.try_get("direct_debit").map_err(db_error)?,
        },
        consumption: get_optional_decimal(row, "consumption")?,
        annual_km: get_optional_decimal(row, "annual_km")?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(|e| RepositoryError::Database(format!("Failed to get created_at: {e}")))?,
    })
}

#[async_trait]
impl GarageRepository for SqliteGarageRepository {
    async fn create_vehicle(
        &self,
        vehicle: NewSavedVehicle,
    ) -> Result<SavedVehicle, RepositoryError> {
        let id = Uuid::new_v4();
        let name = vehicle.display_name();
        let now = Utc::now();
        let descriptor = &vehicle.vehicle;

        sqlx::query(
            "INSERT INTO saved_vehicles (
                id, name, power_kw, region, fuel_type, emissions_class,
                registration_year, direct_debit, consumption, annual_km, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&name)
        .bind(decimal_to_f64(descriptor.power_kw))
        .bind(descriptor.region.as_str())
        .bind(descriptor.fuel_type.as_str())
        .bind(descriptor.emissions_class.as_str())
        .bind(descriptor.registration_year)
        .bind(descriptor.direct_debit)
        .bind(vehicle.consumption.map(decimal_to_f64))
        .bind(vehicle.annual_km.map(decimal_to_f64))
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_error)?;

        info!(%id, name = %name, "Saved vehicle to garage");
        self.get_vehicle(id).await
    }

    async fn get_vehicle(
        &self,
        id: Uuid,
    ) -> Result<SavedVehicle, RepositoryError> {
        let row = sqlx::query(&format!("{SELECT_VEHICLES} WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error)?
            .ok_or(RepositoryError::NotFound)?;

        row_to_saved_vehicle(&row)
    }

    async fn list_vehicles(&self) -> Result<Vec<SavedVehicle>, RepositoryError> {
        let rows = sqlx::query(&format!("{SELECT_VEHICLES} ORDER BY created_at, rowid"))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error)?;

        rows.iter().map(row_to_saved_vehicle).collect()
    }

    async fn delete_vehicle(
        &self,
        id: Uuid,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM saved_vehicles WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        info!(%id, "Deleted vehicle from garage");
        Ok(())
    }
}
