//! Console listing of stored vehicles, used by the `dump` command.

use std::io::Write;

use crate::error::Result;
use crate::storage::VehicleStore;

/// Write one summary line per stored vehicle and return how many were written.
pub fn write_vehicles(store: &dyn VehicleStore, out: &mut impl Write) -> Result<usize> {
    let vehicles = store.list()?;
    for vehicle in &vehicles {
        writeln!(out, "{}", vehicle.summary_line())?;
    }
    out.flush()?;
    Ok(vehicles.len())
}
