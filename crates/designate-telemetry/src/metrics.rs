//! Fault metrics.
//!
//! Recorded through the `metrics` facade. Without an installed recorder
//! every call is a no-op.

use metrics::{counter, describe_counter};

/// Counter of error responses rendered by a fault boundary.
pub const API_FAULTS_TOTAL: &str = "designate_api_faults_total";

/// Counter of requests rejected by maintenance mode.
pub const MAINTENANCE_REJECTIONS_TOTAL: &str = "designate_maintenance_rejections_total";

/// Counter of fault notifications that were not delivered.
pub const NOTIFICATIONS_DROPPED_TOTAL: &str = "designate_fault_notifications_dropped_total";

/// Registers descriptions for all standard metrics.
///
/// Call once after installing a recorder.
pub fn describe_metrics() {
    describe_counter!(
        API_FAULTS_TOTAL,
        "Error responses rendered by the fault boundaries"
    );
    describe_counter!(
        MAINTENANCE_REJECTIONS_TOTAL,
        "Requests rejected while maintenance mode was enabled"
    );
    describe_counter!(
        NOTIFICATIONS_DROPPED_TOTAL,
        "Fault notifications dropped because the queue was full or delivery failed"
    );
}

/// Records an error response.
///
/// # Arguments
///
/// * `error_type` - The envelope `type` (e.g. `timeout`, `unknown`)
/// * `status_code` - The response status
pub fn record_api_fault(error_type: &str, status_code: u16) {
    counter!(
        API_FAULTS_TOTAL,
        "type" => error_type.to_string(),
        "status" => status_code.to_string()
    )
    .increment(1);
}

/// Records a maintenance-mode rejection.
pub fn record_maintenance_rejection() {
    counter!(MAINTENANCE_REJECTIONS_TOTAL).increment(1);
}

/// Records a dropped fault notification.
///
/// `reason` is one of `queue_full`, `closed`, `timeout` or `sink_error`.
pub fn record_notification_dropped(reason: &'static str) {
    counter!(NOTIFICATIONS_DROPPED_TOTAL, "reason" => reason).increment(1);
}
