//! Vehicle domain module.
//!
//! This module handles:
//! - The stored vehicle record and its create/update inputs
//! - Request bodies and field validation

pub mod request;
pub mod types;

pub use request::{decode_object, CreateVehicleRequest, UpdateVehicleRequest};
pub use types::{NewVehicle, Vehicle, VehicleUpdate};
