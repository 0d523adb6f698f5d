use std::sync::Once;

use metrics::{Unit, describe_counter, describe_gauge, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "comanda_cache_hit_total",
            Unit::Count,
            "Total number of reads served from a fresh cache entry."
        );
        describe_counter!(
            "comanda_cache_miss_total",
            Unit::Count,
            "Total number of reads that required a network fetch."
        );
        describe_counter!(
            "comanda_cache_superseded_total",
            Unit::Count,
            "Total number of fetch results discarded because a newer fetch was issued."
        );
        describe_counter!(
            "comanda_cache_evict_total",
            Unit::Count,
            "Total number of parameterized entries evicted due to capacity."
        );
        describe_gauge!(
            "comanda_cache_event_queue_len",
            Unit::Count,
            "Current number of pending write events in the queue."
        );
        describe_counter!(
            "comanda_cache_event_dropped_total",
            Unit::Count,
            "Total number of write events dropped due to queue overflow."
        );
        describe_histogram!(
            "comanda_cache_consume_ms",
            Unit::Milliseconds,
            "Write-event consumption latency in milliseconds."
        );
        describe_histogram!(
            "comanda_cache_prime_ms",
            Unit::Milliseconds,
            "Cache prime phase latency in milliseconds."
        );
    });
}
