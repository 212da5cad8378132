//! Cache metrics for observability

use prometheus::{CounterVec, Opts, Registry};
use std::sync::OnceLock;

static METRICS: OnceLock<CacheMetricsInner> = OnceLock::new();

struct CacheMetricsInner {
    hits: CounterVec,
    misses: CounterVec,
    writes: CounterVec,
    invalidations: CounterVec,
    evictions: CounterVec,
    errors: CounterVec,
}

impl CacheMetricsInner {
    fn new() -> Self {
        Self {
            hits: CounterVec::new(
                Opts::new("tenant_cache_hits_total", "Total cache hits"),
                &["cache"],
            )
            .expect("valid metric definition"),
            misses: CounterVec::new(
                Opts::new("tenant_cache_misses_total", "Total cache misses"),
                &["cache"],
            )
            .expect("valid metric definition"),
            writes: CounterVec::new(
                Opts::new("tenant_cache_writes_total", "Total cache writes"),
                &["cache"],
            )
            .expect("valid metric definition"),
            invalidations: CounterVec::new(
                Opts::new(
                    "tenant_cache_invalidations_total",
                    "Total entries removed on request",
                ),
                &["cache"],
            )
            .expect("valid metric definition"),
            evictions: CounterVec::new(
                Opts::new(
                    "tenant_cache_evictions_total",
                    "Total entries evicted by TTL or capacity",
                ),
                &["cache"],
            )
            .expect("valid metric definition"),
            errors: CounterVec::new(
                Opts::new("tenant_cache_errors_total", "Total cache errors"),
                &["cache", "error_type"],
            )
            .expect("valid metric definition"),
        }
    }

    fn register(&self, registry: &Registry) -> Result<(), prometheus::Error> {
        registry.register(Box::new(self.hits.clone()))?;
        registry.register(Box::new(self.misses.clone()))?;
        registry.register(Box::new(self.writes.clone()))?;
        registry.register(Box::new(self.invalidations.clone()))?;
        registry.register(Box::new(self.evictions.clone()))?;
        registry.register(Box::new(self.errors.clone()))?;
        Ok(())
    }
}

fn get_metrics() -> &'static CacheMetricsInner {
    METRICS.get_or_init(CacheMetricsInner::new)
}

/// Cache metrics wrapper, labeled by cache name.
#[derive(Clone, Debug, Default)]
pub struct CacheMetrics;

impl CacheMetrics {
    pub fn new() -> Self {
        Self
    }

    /// Register the counters with a Prometheus registry.
    pub fn register(registry: &Registry) -> Result<(), prometheus::Error> {
        get_metrics().register(registry)
    }

    pub fn record_hit(&self, cache: &str) {
        get_metrics().hits.with_label_values(&[cache]).inc();
    }

    pub fn record_miss(&self, cache: &str) {
        get_metrics().misses.with_label_values(&[cache]).inc();
    }

    pub fn record_write(&self, cache: &str) {
        get_metrics().writes.with_label_values(&[cache]).inc();
    }

    pub fn record_invalidation(&self, cache: &str) {
        get_metrics().invalidations.with_label_values(&[cache]).inc();
    }

    pub fn record_clear(&self, cache: &str, count: usize) {
        get_metrics()
            .invalidations
            .with_label_values(&[cache])
            .inc_by(count as f64);
    }

    pub fn record_eviction(&self, cache: &str) {
        get_metrics().evictions.with_label_values(&[cache]).inc();
    }

    pub fn record_error(&self, cache: &str, error_type: &str) {
        get_metrics()
            .errors
            .with_label_values(&[cache, error_type])
            .inc();
    }
}
