//! # Prometheus Metrics
//!
//! Operational metrics for the board server, scraped from `/metrics` on a
//! dedicated port — the protocol owns `/{key}` for 64-character hex keys,
//! and we'd rather not gamble on routing precedence with a path that looks
//! like a word.
//!
//! All metrics live in a dedicated [`prometheus::Registry`] so they can't
//! collide with any default global registry consumers.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, Registry, TextEncoder};

/// Holds all Prometheus metric handles for the server.
pub struct NodeMetrics {
    /// Registry that owns every metric below.
    registry: Registry,
    /// Total requests handled on the board API, any verb, any outcome.
    pub requests_total: IntCounter,
    /// Successful board GETs (status 200).
    pub boards_served_total: IntCounter,
    /// Successful board PUTs (status 200).
    pub boards_updated_total: IntCounter,
    /// Request handling latency in seconds, timeouts included.
    pub request_latency_seconds: Histogram,
}

impl NodeMetrics {
    /// Creates and registers all metrics. Call once at startup.
    pub fn new() -> Self {
        let registry = Registry::new_custom(Some("vernal".into()), None)
            .expect("failed to create prometheus registry");

        let requests_total = IntCounter::new(
            "requests_total",
            "Total requests handled on the board API",
        )
        .expect("metric creation");
        registry
            .register(Box::new(requests_total.clone()))
            .expect("metric registration");

        let boards_served_total =
            IntCounter::new("boards_served_total", "Successful board fetches")
                .expect("metric creation");
        registry
            .register(Box::new(boards_served_total.clone()))
            .expect("metric registration");

        let boards_updated_total =
            IntCounter::new("boards_updated_total", "Successful board updates")
                .expect("metric creation");
        registry
            .register(Box::new(boards_updated_total.clone()))
            .expect("metric registration");

        let request_latency_seconds = Histogram::with_opts(HistogramOpts::new(
            "request_latency_seconds",
            "Board API request latency in seconds",
        ))
        .expect("metric creation");
        registry
            .register(Box::new(request_latency_seconds.clone()))
            .expect("metric registration");

        Self {
            registry,
            requests_total,
            boards_served_total,
            boards_updated_total,
            request_latency_seconds,
        }
    }

    /// Renders the registry in Prometheus text exposition format.
    pub fn render(&self) -> Result<String, prometheus::Error> {
        let mut buf = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buf)?;
        Ok(String::from_utf8(buf).expect("text encoding is UTF-8"))
    }
}

impl Default for NodeMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// `GET /metrics` on the metrics listener.
pub async fn metrics_handler(State(metrics): State<Arc<NodeMetrics>>) -> impl IntoResponse {
    match metrics.render() {
        Ok(body) => (StatusCode::OK, body).into_response(),
        Err(err) => {
            tracing::error!("failed to encode metrics: {err}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_all_metric_families() {
        let metrics = NodeMetrics::new();
        metrics.requests_total.inc();
        metrics.boards_served_total.inc();
        metrics.request_latency_seconds.observe(0.01);

        let rendered = metrics.render().unwrap();
        assert!(rendered.contains("vernal_requests_total 1"));
        assert!(rendered.contains("vernal_boards_served_total 1"));
        assert!(rendered.contains("vernal_request_latency_seconds"));
    }
}
