//! Record-access layer for vehicle records.
//!
//! This module handles:
//! - The [`VehicleStore`] boundary used by the HTTP handlers
//! - SQLite persistence ([`SqliteVehicleStore`])
//! - An in-memory store for tests ([`MemoryVehicleStore`])

pub mod memory;
pub mod sqlite;

use std::fmt::Debug;

use strum::{Display, IntoStaticStr};

use crate::error::StorageResult;
use crate::vehicle::{NewVehicle, Vehicle, VehicleUpdate};

pub use memory::MemoryVehicleStore;
pub use sqlite::SqliteVehicleStore;

/// Record-access operations over vehicle records.
///
/// Implementations are blocking; async callers should run them on the
/// blocking thread pool.
pub trait VehicleStore: Debug + Send + Sync {
    /// Persist a new record and return it with its assigned id.
    fn create(&self, vehicle: NewVehicle) -> StorageResult<Vehicle>;

    /// All records, ordered by id.
    fn list(&self) -> StorageResult<Vec<Vehicle>>;

    /// Fetch one record or fail with `NotFound`.
    fn get(&self, id: i64) -> StorageResult<Vehicle>;

    /// Overwrite the fields present in `update` and return the stored record.
    fn update(&self, id: i64, update: VehicleUpdate) -> StorageResult<Vehicle>;

    /// Permanently remove a record or fail with `NotFound`.
    fn delete(&self, id: i64) -> StorageResult<()>;

    /// Number of stored records.
    fn count(&self) -> StorageResult<usize>;
}

/// Store operation, used as a metrics label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum StoreOperation {
    /// Insert.
    Create,
    /// Select all.
    List,
    /// Select one.
    Get,
    /// Merge update.
    Update,
    /// Delete.
    Delete,
}
