use once_cell::sync::Lazy;
use prometheus::{register_histogram, register_int_counter, Encoder, Histogram, IntCounter, TextEncoder};

// Prometheus metrics (default registry)
pub static INCREMENTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "typed_store_increments_total",
        "Total increments applied"
    )
    .expect("register increments_total")
});

pub static INCREMENT_RESETS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "typed_store_increment_resets_total",
        "Increments that replaced a non-numeric value with the delta"
    )
    .expect("register increment_resets_total")
});

pub static LOCK_TIMEOUTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "typed_store_lock_timeouts_total",
        "Lock acquisitions that gave up after the configured timeout"
    )
    .expect("register lock_timeouts_total")
});

pub static DECODE_ERRORS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "typed_store_decode_errors_total",
        "Stored values that could not be decoded"
    )
    .expect("register decode_errors_total")
});

pub static LOCK_WAIT_SECONDS: Lazy<Histogram> = Lazy::new(|| {
    register_histogram!(
        "typed_store_lock_wait_seconds",
        "Time spent waiting for a per-key lock",
        vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0]
    )
    .expect("register lock_wait_seconds")
});

/// Render the default registry in the Prometheus text format.
pub fn gather_text() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if encoder.encode(&metric_families, &mut buffer).is_err() {
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
