//! Prometheus text exposition of the orchestrator metrics
//!
//! Served by the orchestrator router at `GET /metrics`.

use crate::infra::metrics::{MetricsSummary, Route, Upstream, LATENCY_BUCKET_BOUNDS, LATENCY_NUM_BUCKETS};
use std::fmt::Write;

pub const CONTENT_TYPE_PROMETHEUS: &str = "text/plain; version=0.0.4";

/// Prometheus metric type
enum MetricType {
    Counter,
    Gauge,
}

impl MetricType {
    fn as_str(&self) -> &'static str {
        match self {
            MetricType::Counter => "counter",
            MetricType::Gauge => "gauge",
        }
    }
}

fn write_header(output: &mut String, name: &str, help: &str, typ: MetricType) {
    let _ = writeln!(output, "# HELP {name} {help}");
    let _ = writeln!(output, "# TYPE {name} {}", typ.as_str());
}

/// One series per route, labelled `route="..."`
fn write_per_route(output: &mut String, name: &str, help: &str, value: impl Fn(Route) -> u64) {
    write_header(output, name, help, MetricType::Counter);
    for route in Route::ALL {
        let _ = writeln!(output, "{name}{{route=\"{}\"}} {}", route.as_str(), value(route));
    }
}

fn write_histogram(output: &mut String, name: &str, help: &str, buckets: &[u64; LATENCY_NUM_BUCKETS], sum: u64) {
    let _ = writeln!(output, "# HELP {name} {help}");
    let _ = writeln!(output, "# TYPE {name} histogram");

    let mut cumulative = 0u64;
    for (i, &bound) in LATENCY_BUCKET_BOUNDS.iter().enumerate() {
        cumulative += buckets[i];
        let _ = writeln!(output, "{name}_bucket{{le=\"{bound}\"}} {cumulative}");
    }
    cumulative += buckets[LATENCY_NUM_BUCKETS - 1];
    let _ = writeln!(output, "{name}_bucket{{le=\"+Inf\"}} {cumulative}");
    let _ = writeln!(output, "{name}_sum {sum}");
    let _ = writeln!(output, "{name}_count {cumulative}");
}

pub fn format_prometheus_metrics(summary: &MetricsSummary) -> String {
    let mut output = String::with_capacity(2048);

    write_header(&mut output, "transit_uptime_seconds", "Seconds since the orchestrator started", MetricType::Gauge);
    let _ = writeln!(output, "transit_uptime_seconds {}", summary.uptime_secs);

    write_per_route(&mut output, "transit_requests_total", "Requests handled per route", |route| {
        summary.requests(route)
    });
    write_per_route(&mut output, "transit_request_errors_total", "Requests answered with an error per route", |route| {
        summary.request_errors(route)
    });

    write_header(
        &mut output,
        "transit_upstream_failures_total",
        "Failed calls per upstream service",
        MetricType::Counter,
    );
    for upstream in Upstream::ALL {
        let _ = writeln!(
            output,
            "transit_upstream_failures_total{{upstream=\"{upstream}\"}} {}",
            summary.upstream_failures(upstream)
        );
    }

    write_histogram(
        &mut output,
        "transit_plan_trip_latency_ms",
        "End-to-end planTrip latency in milliseconds",
        &summary.plan_latency_buckets,
        summary.plan_latency_sum_ms,
    );

    write_header(&mut output, "transit_plan_trip_latency_p99_ms", "planTrip p99 latency estimate", MetricType::Gauge);
    let _ = writeln!(output, "transit_plan_trip_latency_p99_ms {}", summary.plan_latency_p99_ms);

    output
}
