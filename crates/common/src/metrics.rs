use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec, TextEncoder,
};

// Prometheus metrics (default registry)
pub static ROUTINE_CALLS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "tekus_routine_calls_total",
        "Stored routine executions by shape and outcome",
        &["routine", "shape", "outcome"]
    )
    .expect("register routine_calls_total")
});

pub static ROUTINE_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "tekus_routine_duration_seconds",
        "Stored routine round-trip duration in seconds",
        &["shape"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    )
    .expect("register routine_duration")
});

pub static COUNTRY_CACHE_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "tekus_country_cache_total",
        "Country catalog cache lookups by result",
        &["result"]
    )
    .expect("register country_cache_total")
});

/// Record one finished routine call.
pub fn record_routine(routine: &str, shape: &str, success: bool, elapsed_secs: f64) {
    let outcome = if success { "success" } else { "failure" };
    ROUTINE_CALLS_TOTAL.with_label_values(&[routine, shape, outcome]).inc();
    ROUTINE_DURATION.with_label_values(&[shape]).observe(elapsed_secs);
}

pub fn record_country_cache(hit: bool) {
    COUNTRY_CACHE_TOTAL.with_label_values(&[if hit { "hit" } else { "miss" }]).inc();
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_routines_show_up_in_encoded_output() {
        record_routine("dbo.sp_MetricsProbe", "list", true, 0.01);
        let (status, body) = encode_metrics();
        assert_eq!(status, axum::http::StatusCode::OK);
        assert!(body.contains("tekus_routine_calls_total"));
        assert!(body.contains("dbo.sp_MetricsProbe"));
    }
}
