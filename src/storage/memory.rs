//! In-memory vehicle store for unit testing.
//!
//! Each instance is isolated, so tests can build a fresh router per case
//! without touching the filesystem.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::error::{StorageError, StorageResult};
use crate::vehicle::{NewVehicle, Vehicle, VehicleUpdate};

use super::VehicleStore;

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i64,
    vehicles: BTreeMap<i64, Vehicle>,
}

/// In-memory vehicle store.
#[derive(Debug, Default)]
pub struct MemoryVehicleStore {
    /// Fail every operation with [`StorageError::Unavailable`].
    fail_all: bool,
    state: Mutex<MemoryState>,
}

impl MemoryVehicleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose every operation fails.
    pub fn failing() -> Self {
        Self {
            fail_all: true,
            ..Self::default()
        }
    }

    fn state(&self) -> StorageResult<MutexGuard<'_, MemoryState>> {
        if self.fail_all {
            return Err(StorageError::Unavailable("simulated failure".to_string()));
        }
        self.state.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

impl VehicleStore for MemoryVehicleStore {
    fn create(&self, vehicle: NewVehicle) -> StorageResult<Vehicle> {
        let mut state = self.state()?;
        state.last_id += 1;
        let vehicle = vehicle.into_vehicle(state.last_id);
        state.vehicles.insert(vehicle.id, vehicle.clone());
        Ok(vehicle)
    }

    fn list(&self) -> StorageResult<Vec<Vehicle>> {
        Ok(self.state()?.vehicles.values().cloned().collect())
    }

    fn get(&self, id: i64) -> StorageResult<Vehicle> {
        self.state()?
            .vehicles
            .get(&id)
            .cloned()
            .ok_or(StorageError::NotFound { id })
    }

    fn update(&self, id: i64, update: VehicleUpdate) -> StorageResult<Vehicle> {
        let mut state = self.state()?;
        let vehicle = state
            .vehicles
            .get_mut(&id)
            .ok_or(StorageError::NotFound { id })?;
        update.apply(vehicle);
        Ok(vehicle.clone())
    }

    fn delete(&self, id: i64) -> StorageResult<()> {
        self.state()?
            .vehicles
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::NotFound { id })
    }

    fn count(&self) -> StorageResult<usize> {
        Ok(self.state()?.vehicles.len())
    }
}
