//! Tracing and OpenTelemetry setup for binaries and integration harnesses.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::{
    trace::{RandomIdGenerator, Sampler, TracerProvider},
    Resource,
};
use opentelemetry_stdout::SpanExporter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Filter used when `RUST_LOG` is not set.
const DEFAULT_FILTER: &str = "comicvine=info,comicvine_rate_limit=info,comicvine_cache=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Initialize tracing with an OpenTelemetry stdout span exporter.
///
/// Spans from the request pipeline (limiter turns, physical calls, retries)
/// are exported under the `comicvine` service name, and a human-readable fmt
/// layer is installed next to it. Both honor `RUST_LOG`.
///
/// # Errors
///
/// Returns error if a global subscriber is already installed.
pub fn init_telemetry() -> Result<(), Box<dyn std::error::Error>> {
    let provider = TracerProvider::builder()
        .with_simple_exporter(SpanExporter::default())
        .with_id_generator(RandomIdGenerator::default())
        .with_sampler(Sampler::AlwaysOn)
        .with_resource(Resource::new(vec![KeyValue::new("service.name", "comicvine")]))
        .build();

    let tracer = provider.tracer("comicvine");
    opentelemetry::global::set_tracer_provider(provider);

    let telemetry_layer = tracing_opentelemetry::layer()
        .with_tracer(tracer)
        .with_filter(env_filter());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_filter(env_filter());

    tracing_subscriber::registry()
        .with(telemetry_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Flush pending spans and shut the exporter down.
pub fn shutdown_telemetry() {
    opentelemetry::global::shutdown_tracer_provider();
}
