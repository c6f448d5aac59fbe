//! SQLite-backed vehicle store.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};
use crate::vehicle::{NewVehicle, Vehicle, VehicleUpdate};

use super::VehicleStore;

/// Table definition, applied on every read-write open.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS vehicles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    make TEXT NOT NULL,
    model TEXT NOT NULL,
    year INTEGER NOT NULL,
    mileage INTEGER NOT NULL,
    error_code TEXT
);
"#;

const SELECT_COLUMNS: &str = "SELECT id, make, model, year, mileage, error_code FROM vehicles";

/// Vehicle store over a single SQLite connection.
///
/// The connection is shared for the process lifetime; the mutex serializes
/// all access, so concurrent updates to the same id are last-write-wins.
#[derive(Debug)]
pub struct SqliteVehicleStore {
    conn: Mutex<Connection>,
}

impl SqliteVehicleStore {
    /// Open (or create) the database file and ensure the table exists.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        info!("Opening vehicle database at {}", path.display());
        Self::with_connection(Connection::open(path)?)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    /// Open an existing database without write access.
    ///
    /// The schema is not created; a missing table surfaces on first query.
    pub fn open_read_only(path: impl AsRef<Path>) -> StorageResult<Self> {
        let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn with_connection(conn: Connection) -> StorageResult<Self> {
        conn.execute_batch(SCHEMA)?;
        debug!("Vehicle schema ready");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

fn row_to_vehicle(row: &Row<'_>) -> rusqlite::Result<Vehicle> {
    Ok(Vehicle {
        id: row.get(0)?,
        make: row.get(1)?,
        model: row.get(2)?,
        year: row.get(3)?,
        mileage: row.get(4)?,
        error_code: row.get(5)?,
    })
}

fn fetch(conn: &Connection, id: i64) -> StorageResult<Vehicle> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE id = ?1"),
        [id],
        row_to_vehicle,
    )
    .optional()?
    .ok_or(StorageError::NotFound { id })
}

impl VehicleStore for SqliteVehicleStore {
    fn create(&self, vehicle: NewVehicle) -> StorageResult<Vehicle> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO vehicles (make, model, year, mileage, error_code) VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                vehicle.make,
                vehicle.model,
                vehicle.year,
                vehicle.mileage,
                vehicle.error_code
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, "Inserted vehicle");
        Ok(vehicle.into_vehicle(id))
    }

    fn list(&self) -> StorageResult<Vec<Vehicle>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id"))?;
        let vehicles = stmt
            .query_map([], row_to_vehicle)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(vehicles)
    }

    fn get(&self, id: i64) -> StorageResult<Vehicle> {
        let conn = self.lock()?;
        fetch(&conn, id)
    }

    fn update(&self, id: i64, update: VehicleUpdate) -> StorageResult<Vehicle> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let mut vehicle = fetch(&tx, id)?;
        update.apply(&mut vehicle);

        tx.execute(
            "UPDATE vehicles SET make = ?1, model = ?2, year = ?3, mileage = ?4, error_code = ?5 WHERE id = ?6",
            params![
                vehicle.make,
                vehicle.model,
                vehicle.year,
                vehicle.mileage,
                vehicle.error_code,
                id
            ],
        )?;
        tx.commit()?;

        debug!(id, "Updated vehicle");
        Ok(vehicle)
    }

    fn delete(&self, id: i64) -> StorageResult<()> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM vehicles WHERE id = ?1", [id])?;
        if removed == 0 {
            return Err(StorageError::NotFound { id });
        }
        debug!(id, "Deleted vehicle");
        Ok(())
    }

    fn count(&self) -> StorageResult<usize> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM vehicles", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }
}
