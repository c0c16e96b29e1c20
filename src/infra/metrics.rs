//! Lock-free orchestrator metrics
//!
//! Counters are plain atomics updated on the request path. They never feed
//! back into responses, so the orchestrator stays stateless per request.
//!
//! NOTE: All atomics use Relaxed ordering intentionally; these are statistical
//! counters only.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Exponential bucket boundaries for plan-trip latency (milliseconds)
/// Buckets: ≤5, ≤10, ≤25, ≤50, ≤100, ≤250, ≤500, ≤1000, ≤2500, ≤5000, >5000
pub const LATENCY_BUCKET_BOUNDS: [u64; 10] = [5, 10, 25, 50, 100, 250, 500, 1000, 2500, 5000];
pub const LATENCY_NUM_BUCKETS: usize = 11;

/// Orchestrator routes that are counted individually
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    PlanTrip,
    Aqi,
    SendAlert,
}

impl Route {
    pub const ALL: [Route; 3] = [Route::PlanTrip, Route::Aqi, Route::SendAlert];

    pub fn as_str(&self) -> &'static str {
        match self {
            Route::PlanTrip => "plan_trip",
            Route::Aqi => "aqi",
            Route::SendAlert => "send_alert",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

/// Upstream services the orchestrator depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upstream {
    Air,
    Transport,
    Places,
    Alerts,
}

impl Upstream {
    pub const ALL: [Upstream; 4] = [Upstream::Air, Upstream::Transport, Upstream::Places, Upstream::Alerts];

    pub fn as_str(&self) -> &'static str {
        match self {
            Upstream::Air => "air",
            Upstream::Transport => "transport",
            Upstream::Places => "places",
            Upstream::Alerts => "alerts",
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute bucket index for a latency value using binary search
#[inline]
fn bucket_index(latency_ms: u64) -> usize {
    LATENCY_BUCKET_BOUNDS.partition_point(|&bound| bound < latency_ms)
}

/// Update an atomic max value using compare-and-swap loop
#[inline]
fn update_atomic_max(atomic_max: &AtomicU64, new_value: u64) {
    let mut current_max = atomic_max.load(Ordering::Relaxed);
    while new_value > current_max {
        match atomic_max.compare_exchange_weak(
            current_max,
            new_value,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => break,
            Err(actual) => current_max = actual,
        }
    }
}

/// Compute percentile from histogram buckets
/// Returns the upper bound of the bucket containing the percentile
fn percentile_from_buckets(buckets: &[u64; LATENCY_NUM_BUCKETS], percentile: f64) -> u64 {
    let total: u64 = buckets.iter().sum();
    if total == 0 {
        return 0;
    }

    let target = (total as f64 * percentile).ceil() as u64;
    let mut cumulative = 0u64;
    for (i, &count) in buckets.iter().enumerate() {
        cumulative += count;
        if cumulative >= target {
            return if i < LATENCY_BUCKET_BOUNDS.len() {
                LATENCY_BUCKET_BOUNDS[i]
            } else {
                // Overflow bucket: report the last finite bound doubled
                LATENCY_BUCKET_BOUNDS[LATENCY_BUCKET_BOUNDS.len() - 1] * 2
            };
        }
    }
    0
}

pub struct Metrics {
    started_at: Instant,
    requests: [AtomicU64; 3],
    request_errors: [AtomicU64; 3],
    upstream_failures: [AtomicU64; 4],
    plan_latency_buckets: [AtomicU64; LATENCY_NUM_BUCKETS],
    plan_latency_sum_ms: AtomicU64,
    plan_latency_max_ms: AtomicU64,
}

/// Point-in-time copy of all counters
#[derive(Debug, Clone)]
pub struct MetricsSummary {
    pub uptime_secs: u64,
    pub requests: [u64; 3],
    pub request_errors: [u64; 3],
    pub upstream_failures: [u64; 4],
    pub plan_latency_buckets: [u64; LATENCY_NUM_BUCKETS],
    pub plan_latency_sum_ms: u64,
    pub plan_latency_max_ms: u64,
    pub plan_latency_p50_ms: u64,
    pub plan_latency_p99_ms: u64,
}

impl MetricsSummary {
    pub fn requests(&self, route: Route) -> u64 {
        self.requests[route.index()]
    }

    pub fn request_errors(&self, route: Route) -> u64 {
        self.request_errors[route.index()]
    }

    pub fn upstream_failures(&self, upstream: Upstream) -> u64 {
        self.upstream_failures[upstream.index()]
    }

    pub fn plan_latency_count(&self) -> u64 {
        self.plan_latency_buckets.iter().sum()
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            requests: Default::default(),
            request_errors: Default::default(),
            upstream_failures: Default::default(),
            plan_latency_buckets: Default::default(),
            plan_latency_sum_ms: AtomicU64::new(0),
            plan_latency_max_ms: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn record_request(&self, route: Route) {
        self.requests[route.index()].fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_request_error(&self, route: Route) {
        self.request_errors[route.index()].fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_upstream_failure(&self, upstream: Upstream) {
        self.upstream_failures[upstream.index()].fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_plan_latency(&self, latency_ms: u64) {
        self.plan_latency_buckets[bucket_index(latency_ms)].fetch_add(1, Ordering::Relaxed);
        self.plan_latency_sum_ms.fetch_add(latency_ms, Ordering::Relaxed);
        update_atomic_max(&self.plan_latency_max_ms, latency_ms);
    }

    /// Read all counters without resetting them (Prometheus counters are cumulative)
    pub fn summary(&self) -> MetricsSummary {
        let load = |a: &AtomicU64| a.load(Ordering::Relaxed);
        let plan_latency_buckets: [u64; LATENCY_NUM_BUCKETS] =
            std::array::from_fn(|i| load(&self.plan_latency_buckets[i]));

        MetricsSummary {
            uptime_secs: self.started_at.elapsed().as_secs(),
            requests: std::array::from_fn(|i| load(&self.requests[i])),
            request_errors: std::array::from_fn(|i| load(&self.request_errors[i])),
            upstream_failures: std::array::from_fn(|i| load(&self.upstream_failures[i])),
            plan_latency_p50_ms: percentile_from_buckets(&plan_latency_buckets, 0.50),
            plan_latency_p99_ms: percentile_from_buckets(&plan_latency_buckets, 0.99),
            plan_latency_buckets,
            plan_latency_sum_ms: load(&self.plan_latency_sum_ms),
            plan_latency_max_ms: load(&self.plan_latency_max_ms),
        }
    }
}
