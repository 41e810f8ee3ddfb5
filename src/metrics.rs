// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Prometheus metrics for meshvet.
//!
//! All metrics share the namespace prefix `meshvet_`.
//!
//! # Metrics Categories
//!
//! - **Vetter Metrics** - Track vetter runs, their outcomes and duration
//! - **Finding Metrics** - Track findings by vetter and kind
//! - **Error Metrics** - Track hostname normalization failures
//!
//! # Example
//!
//! ```rust,no_run
//! use meshvet::metrics::{gather_metrics, record_vet_success};
//!
//! record_vet_success("ConflictingVirtualServiceHost", std::time::Duration::from_millis(5), &[]);
//! println!("{}", gather_metrics().unwrap());
//! ```

use crate::finding::Finding;
use prometheus::{CounterVec, Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder};
use std::sync::LazyLock;
use std::time::Duration;

// ============================================================================
// Metric Name Constants
// ============================================================================

/// Namespace prefix for all meshvet metrics
const METRICS_NAMESPACE: &str = "meshvet";

// ============================================================================
// Global Metrics Registry
// ============================================================================

/// Global Prometheus metrics registry
pub static METRICS_REGISTRY: LazyLock<Registry> = LazyLock::new(Registry::new);

// ============================================================================
// Vetter Metrics
// ============================================================================

/// Total number of vetter runs by vetter and status
///
/// Labels:
/// - `vetter`: Vetter identifier (e.g., `ConflictingVirtualServiceHost`)
/// - `status`: Outcome (`success`, or the error category)
pub static VET_RUNS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_vet_runs_total"),
        "Total number of vetter runs by vetter and status",
    );
    let counter = CounterVec::new(opts, &["vetter", "status"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

/// Duration of vetter runs in seconds
///
/// Labels:
/// - `vetter`: Vetter identifier
pub static VET_DURATION_SECONDS: LazyLock<HistogramVec> = LazyLock::new(|| {
    let opts = HistogramOpts::new(
        format!("{METRICS_NAMESPACE}_vet_duration_seconds"),
        "Duration of vetter runs in seconds by vetter",
    )
    .buckets(vec![0.001, 0.01, 0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0]);
    let histogram = HistogramVec::new(opts, &["vetter"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(histogram.clone()))
        .unwrap();
    histogram
});

// ============================================================================
// Finding Metrics
// ============================================================================

/// Total number of findings reported
///
/// Labels:
/// - `vetter`: Vetter identifier
/// - `kind`: Finding kind (e.g., `host-in-multiple-vs`)
pub static FINDINGS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_findings_total"),
        "Total number of findings by vetter and kind",
    );
    let counter = CounterVec::new(opts, &["vetter", "kind"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Error Metrics
// ============================================================================

/// Total number of runs aborted by a malformed host
///
/// Labels:
/// - `vetter`: Vetter identifier
pub static NORMALIZATION_ERRORS_TOTAL: LazyLock<CounterVec> = LazyLock::new(|| {
    let opts = Opts::new(
        format!("{METRICS_NAMESPACE}_normalization_errors_total"),
        "Total number of vetter runs aborted by a host that could not be normalized",
    );
    let counter = CounterVec::new(opts, &["vetter"]).unwrap();
    METRICS_REGISTRY
        .register(Box::new(counter.clone()))
        .unwrap();
    counter
});

// ============================================================================
// Helper Functions
// ============================================================================

/// Record a successful vetter run and its findings
///
/// # Arguments
/// * `vetter` - Vetter identifier
/// * `duration` - Duration of the run
/// * `findings` - Findings returned by the run
pub fn record_vet_success(vetter: &str, duration: Duration, findings: &[Finding]) {
    VET_RUNS_TOTAL.with_label_values(&[vetter, "success"]).inc();
    VET_DURATION_SECONDS
        .with_label_values(&[vetter])
        .observe(duration.as_secs_f64());
    for finding in findings {
        FINDINGS_TOTAL
            .with_label_values(&[vetter, finding.kind.as_str()])
            .inc();
    }
}

/// Record a failed vetter run
///
/// # Arguments
/// * `vetter` - Vetter identifier
/// * `duration` - Duration of the run before failure
/// * `category` - Error category (e.g., `normalization`, `kube_api`)
pub fn record_vet_error(vetter: &str, duration: Duration, category: &str) {
    VET_RUNS_TOTAL.with_label_values(&[vetter, category]).inc();
    VET_DURATION_SECONDS
        .with_label_values(&[vetter])
        .observe(duration.as_secs_f64());
}

/// Record a run aborted by a malformed host
pub fn record_normalization_error(vetter: &str) {
    NORMALIZATION_ERRORS_TOTAL.with_label_values(&[vetter]).inc();
}

/// Gather and encode all metrics in Prometheus text format
///
/// # Errors
/// Returns error if encoding fails
pub fn gather_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = METRICS_REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(format!("UTF-8 error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::Severity;
    use std::collections::BTreeMap;

    fn finding(kind: &str) -> Finding {
        Finding {
            id: String::new(),
            kind: kind.to_string(),
            summary: String::new(),
            message: String::new(),
            severity: Severity::Error,
            attributes: BTreeMap::new(),
        }
    }

    #[test]
    fn test_record_vet_success() {
        let vetter = "TestVetterSuccess";

        record_vet_success(
            vetter,
            Duration::from_millis(5),
            &[finding("test-kind"), finding("test-kind")],
        );

        let runs = VET_RUNS_TOTAL.with_label_values(&[vetter, "success"]);
        assert!(runs.get() > 0.0);

        let findings = FINDINGS_TOTAL.with_label_values(&[vetter, "test-kind"]);
        assert!(findings.get() >= 2.0);

        let histogram = VET_DURATION_SECONDS.with_label_values(&[vetter]);
        assert!(histogram.get_sample_count() > 0);
    }

    #[test]
    fn test_record_vet_error() {
        let vetter = "TestVetterError";

        record_vet_error(vetter, Duration::from_millis(1), "normalization");
        record_normalization_error(vetter);

        let runs = VET_RUNS_TOTAL.with_label_values(&[vetter, "normalization"]);
        assert!(runs.get() > 0.0);
        assert!(NORMALIZATION_ERRORS_TOTAL.with_label_values(&[vetter]).get() > 0.0);
    }

    #[test]
    fn test_gather_metrics() {
        record_vet_success("GatherTest", Duration::from_millis(1), &[]);

        let metrics_text = gather_metrics().expect("Gathering metrics should succeed");
        assert!(
            metrics_text.contains("meshvet_vet_runs_total"),
            "Metrics should contain the run counter"
        );
    }
}
