//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::MetricsConfig;

static UUID_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}")
        .expect("uuid pattern is valid")
});

static NUMERIC_SEGMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"/\d+(/|$)").expect("numeric segment pattern is valid")
});

const MAX_PATH_LABEL_LENGTH: usize = 50;

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("virtua_backend_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            tracing::info!("Prometheus metrics initialized at /metrics");

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Record the outcome of a register or login attempt
pub fn record_auth_event(event: &'static str, success: bool) {
    counter!(
        "auth_events_total",
        "event" => event,
        "outcome" => outcome(success)
    )
    .increment(1);
}

/// Record a contact email delivery attempt
pub fn record_contact_email(success: bool) {
    counter!("contact_emails_total", "outcome" => outcome(success)).increment(1);
}

fn outcome(success: bool) -> &'static str {
    if success {
        "success"
    } else {
        "error"
    }
}

/// Sanitize URL path for metric labels (remove IDs, limit cardinality)
fn sanitize_path(path: &str) -> String {
    if path.starts_with("/assets/") {
        return "/assets/*".to_string();
    }

    let path = UUID_SEGMENT.replace_all(path, "{id}");
    let path = NUMERIC_SEGMENT.replace_all(&path, "/{id}$1");

    path.chars().take(MAX_PATH_LABEL_LENGTH).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path_uuid() {
        let path = "/api/users/550e8400-e29b-41d4-a716-446655440000";
        assert_eq!(sanitize_path(path), "/api/users/{id}");
    }

    #[test]
    fn test_sanitize_path_numeric_id() {
        assert_eq!(sanitize_path("/api/users/123/orders"), "/api/users/{id}/orders");
    }

    #[test]
    fn test_sanitize_path_no_id() {
        assert_eq!(sanitize_path("/api/login"), "/api/login");
        assert_eq!(sanitize_path("/send-contact-email"), "/send-contact-email");
    }

    #[test]
    fn test_sanitize_path_collapses_assets() {
        assert_eq!(sanitize_path("/assets/logo.png"), "/assets/*");
        assert_eq!(sanitize_path("/assets/img/a/b/c.jpg"), "/assets/*");
    }

    #[test]
    fn test_sanitize_path_truncates_long_paths() {
        let path = "/very/long/path/that/exceeds/the/maximum/allowed/length/for/metrics";
        assert!(sanitize_path(path).chars().count() <= MAX_PATH_LABEL_LENGTH);
    }

    #[test]
    fn test_disabled_metrics() {
        assert!(init_metrics(&MetricsConfig { enabled: false }).is_none());
    }
}
