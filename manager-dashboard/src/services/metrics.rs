use prometheus::{Encoder, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder};
use std::sync::OnceLock;

pub struct DashboardMetrics {
    pub registry: Registry,
    pub http_requests_total: IntCounterVec,
    pub http_request_duration_seconds: HistogramVec,
    pub backend_requests_total: IntCounterVec,
    pub decisions_total: IntCounterVec,
}

static METRICS: OnceLock<DashboardMetrics> = OnceLock::new();

/// Process-wide metrics, registered on first use.
pub fn metrics() -> &'static DashboardMetrics {
    METRICS.get_or_init(|| {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let http_request_duration_seconds = HistogramVec::new(
            prometheus::HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            ),
            &["method", "path", "status"],
        )
        .expect("metric can be created");

        let backend_requests_total = IntCounterVec::new(
            Opts::new(
                "enrollment_backend_requests_total",
                "Calls made to the enrollment backend",
            ),
            &["operation", "outcome"],
        )
        .expect("metric can be created");

        let decisions_total = IntCounterVec::new(
            Opts::new(
                "enrollment_decisions_total",
                "Accept and refuse decisions submitted by managers",
            ),
            &["decision", "outcome"],
        )
        .expect("metric can be created");

        for collector in [
            Box::new(http_requests_total.clone()) as Box<dyn prometheus::core::Collector>,
            Box::new(http_request_duration_seconds.clone()),
            Box::new(backend_requests_total.clone()),
            Box::new(decisions_total.clone()),
        ] {
            registry
                .register(collector)
                .expect("collector can be registered");
        }

        DashboardMetrics {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            backend_requests_total,
            decisions_total,
        }
    })
}

pub fn record_backend_call(operation: &str, success: bool) {
    metrics()
        .backend_requests_total
        .with_label_values(&[operation, outcome(success)])
        .inc();
}

pub fn record_decision(decision: &str, success: bool) {
    metrics()
        .decisions_total
        .with_label_values(&[decision, outcome(success)])
        .inc();
}

fn outcome(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "failure"
    }
}

pub fn get_metrics() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    let metric_families = metrics().registry.gather();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
