//! Prometheus metrics for storage latency and record mutations.
//!
//! This module provides:
//! - Storage operation latency, labelled by operation
//! - Counters for created, updated, and deleted vehicles
//! - A counter for storage failures

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

use crate::storage::StoreOperation;

// === Metric Name Constants ===

/// Storage operation latency metric name.
pub const METRIC_STORAGE_LATENCY: &str = "storage_operation_latency_ms";
/// Vehicles created counter metric name.
pub const METRIC_VEHICLES_CREATED: &str = "vehicles_created_total";
/// Vehicles updated counter metric name.
pub const METRIC_VEHICLES_UPDATED: &str = "vehicles_updated_total";
/// Vehicles deleted counter metric name.
pub const METRIC_VEHICLES_DELETED: &str = "vehicles_deleted_total";
/// Storage errors counter metric name.
pub const METRIC_STORAGE_ERRORS: &str = "storage_errors_total";

/// Install the Prometheus recorder and describe all metrics.
/// Call this once at startup; the handle renders the `/metrics` page.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    describe_histogram!(
        METRIC_STORAGE_LATENCY,
        "Storage operation latency in milliseconds"
    );
    describe_counter!(METRIC_VEHICLES_CREATED, "Total number of vehicles created");
    describe_counter!(METRIC_VEHICLES_UPDATED, "Total number of vehicles updated");
    describe_counter!(METRIC_VEHICLES_DELETED, "Total number of vehicles deleted");
    describe_counter!(
        METRIC_STORAGE_ERRORS,
        "Total number of storage operations that failed"
    );

    debug!("Metrics initialized");
    Ok(handle)
}

/// Increment vehicles created counter.
pub fn inc_vehicles_created() {
    counter!(METRIC_VEHICLES_CREATED).increment(1);
}

/// Increment vehicles updated counter.
pub fn inc_vehicles_updated() {
    counter!(METRIC_VEHICLES_UPDATED).increment(1);
}

/// Increment vehicles deleted counter.
pub fn inc_vehicles_deleted() {
    counter!(METRIC_VEHICLES_DELETED).increment(1);
}

/// Increment storage errors counter.
pub fn inc_storage_errors(operation: StoreOperation) {
    let label: &'static str = operation.into();
    counter!(METRIC_STORAGE_ERRORS, "operation" => label).increment(1);
}

/// RAII guard for timing storage operations.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    operation: StoreOperation,
}

impl LatencyTimer {
    /// Create a new latency timer for the given operation.
    pub fn new(operation: StoreOperation) -> Self {
        Self {
            start: Instant::now(),
            operation,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        let label: &'static str = self.operation.into();
        histogram!(METRIC_STORAGE_LATENCY, "operation" => label).record(self.elapsed_ms());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn latency_timer_measures_time() {
        let timer = LatencyTimer::new(StoreOperation::Get);
        sleep(Duration::from_millis(10));
        let elapsed = timer.elapsed_ms();
        assert!(elapsed >= 9.0); // Allow some tolerance
    }

    #[test]
    fn operation_labels_are_snake_case() {
        let label: &'static str = StoreOperation::Create.into();
        assert_eq!(label, "create");
        assert_eq!(StoreOperation::Delete.to_string(), "delete");
    }
}
