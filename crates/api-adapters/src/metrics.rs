//! Prometheus counters for the HTTP surface.

use std::fmt;

use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;

/// Route label used when no route matched.
pub const UNMATCHED_ROUTE: &str = "unmatched";

#[derive(Debug, Clone, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct RequestLabels {
    pub method: String,
    /// Route template, never the raw path, so ids do not explode cardinality.
    pub route: String,
    pub status: String,
}

#[derive(Debug)]
pub struct HttpMetrics {
    registry: Registry,
    requests: Family<RequestLabels, Counter>,
}

impl Default for HttpMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpMetrics {
    pub fn new() -> Self {
        let mut registry = Registry::with_prefix("rightpool");
        let requests = Family::<RequestLabels, Counter>::default();
        registry.register("http_requests", "HTTP requests handled", requests.clone());
        Self { registry, requests }
    }

    pub fn record(&self, method: &str, route: &str, status: u16) {
        self.requests
            .get_or_create(&RequestLabels {
                method: method.to_string(),
                route: route.to_string(),
                status: status.to_string(),
            })
            .inc();
    }

    /// Text exposition format.
    pub fn render(&self) -> Result<String, fmt::Error> {
        let mut out = String::new();
        encode(&mut out, &self.registry)?;
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_by_route_template() {
        let metrics = HttpMetrics::new();
        metrics.record("GET", "/api/opportunities/{id}", 200);
        metrics.record("GET", "/api/opportunities/{id}", 200);
        metrics.record("GET", UNMATCHED_ROUTE, 404);

        let text = metrics.render().unwrap();
        assert!(text.contains("rightpool_http_requests_total"));
        assert!(text.contains(r#"route="/api/opportunities/{id}",status="200"} 2"#));
        assert!(text.contains(r#"route="unmatched",status="404"} 1"#));
    }
}
