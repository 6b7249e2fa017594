use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{NewSavedVehicle, SavedVehicle};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Persistent store for the user's garage.
#[async_trait]
pub trait GarageRepository: Send + Sync {
    /// Stores a new vehicle, assigning its id and creation timestamp.
    async fn create_vehicle(
        &self,
        vehicle: NewSavedVehicle,
    ) -> Result<SavedVehicle, RepositoryError>;

    async fn get_vehicle(&self, id: Uuid) -> Result<SavedVehicle, RepositoryError>;

    /// Every stored vehicle, oldest first.
    async fn list_vehicles(&self) -> Result<Vec<SavedVehicle>, RepositoryError>;

    async fn delete_vehicle(&self, id: Uuid) -> Result<(), RepositoryError>;
}
