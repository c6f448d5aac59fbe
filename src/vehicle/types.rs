//! Vehicle record types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored vehicle record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Vehicle {
    /// Storage-assigned identifier. Never reused.
    pub id: i64,
    /// Manufacturer (e.g., "Toyota").
    pub make: String,
    /// Model name (e.g., "Corolla").
    pub model: String,
    /// Model year.
    pub year: i64,
    /// Odometer reading.
    pub mileage: i64,
    /// Diagnostic trouble code, if one is recorded (e.g., "P0420").
    pub error_code: Option<String>,
}

impl Vehicle {
    /// Fixed-format single line used by the `dump` command.
    pub fn summary_line(&self) -> String {
        format!(
            "ID: {}, Make: {}, Model: {}, Year: {}, Mileage: {}, Error Code: {}",
            self.id,
            self.make,
            self.model,
            self.year,
            self.mileage,
            self.error_code.as_deref().unwrap_or("None"),
        )
    }
}

/// Validated input for creating a vehicle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVehicle {
    /// Manufacturer.
    pub make: String,
    /// Model name.
    pub model: String,
    /// Model year.
    pub year: i64,
    /// Odometer reading.
    pub mileage: i64,
    /// Optional diagnostic trouble code.
    pub error_code: Option<String>,
}

impl NewVehicle {
    /// Create a new vehicle input without an error code.
    pub fn new(make: impl Into<String>, model: impl Into<String>, year: i64, mileage: i64) -> Self {
        Self {
            make: make.into(),
            model: model.into(),
            year,
            mileage,
            error_code: None,
        }
    }

    /// Set the diagnostic trouble code.
    pub fn with_error_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self
    }

    /// Attach a storage-assigned id.
    pub fn into_vehicle(self, id: i64) -> Vehicle {
        Vehicle {
            id,
            make: self.make,
            model: self.model,
            year: self.year,
            mileage: self.mileage,
            error_code: self.error_code,
        }
    }
}

/// Validated partial update.
///
/// `None` leaves the stored value untouched. For `error_code`, `Some(None)`
/// clears the stored code while `None` keeps it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VehicleUpdate {
    /// New manufacturer.
    pub make: Option<String>,
    /// New model name.
    pub model: Option<String>,
    /// New model year.
    pub year: Option<i64>,
    /// New odometer reading.
    pub mileage: Option<i64>,
    /// New diagnostic trouble code, or `Some(None)` to clear it.
    pub error_code: Option<Option<String>>,
}

impl VehicleUpdate {
    /// Check whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.make.is_none()
            && self.model.is_none()
            && self.year.is_none()
            && self.mileage.is_none()
            && self.error_code.is_none()
    }

    /// Overwrite the fields present in this update.
    pub fn apply(self, vehicle: &mut Vehicle) {
        if let Some(make) = self.make {
            vehicle.make = make;
        }
        if let Some(model) = self.model {
            vehicle.model = model;
        }
        if let Some(year) = self.year {
            vehicle.year = year;
        }
        if let Some(mileage) = self.mileage {
            vehicle.mileage = mileage;
        }
        if let Some(error_code) = self.error_code {
            vehicle.error_code = error_code;
        }
    }
}
