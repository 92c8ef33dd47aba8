use prometheus::{Encoder, IntCounter, Opts, Registry, TextEncoder};

#[derive(Clone)]
pub struct Telemetry {
    pub requests: IntCounter,
    pub backend_failures: IntCounter,
    pub csv_responses: IntCounter,
    pub registry: Registry,
}

impl Telemetry {
    pub fn new() -> Self {
        let registry = Registry::new();

        let requests =
            IntCounter::with_opts(Opts::new("http_requests_total", "Total handled requests")).unwrap();
        let backend_failures = IntCounter::with_opts(Opts::new(
            "backend_failures_total",
            "Total failed collaborator calls",
        ))
        .unwrap();
        let csv_responses =
            IntCounter::with_opts(Opts::new("csv_responses_total", "Total CSV-encoded responses"))
                .unwrap();

        registry.register(Box::new(requests.clone())).ok();
        registry.register(Box::new(backend_failures.clone())).ok();
        registry.register(Box::new(csv_responses.clone())).ok();

        Telemetry {
            requests,
            backend_failures,
            csv_responses,
            registry,
        }
    }

    /// Gather metrics in Prometheus text format.
    pub fn gather(&self) -> String {
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        let mf = self.registry.gather();
        encoder.encode(&mf, &mut buffer).unwrap_or_default();
        String::from_utf8(buffer).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gather_contains_metric_names() {
        let t = Telemetry::new();
        t.requests.inc();
        let out = t.gather();
        assert!(out.contains("http_requests_total"), "gather output should contain metric name");
    }
}
