//! Tracing subscriber setup, with optional OTLP export.

use anyhow::{Context, Error, Result};
use once_cell::sync::OnceCell;
use opentelemetry::{KeyValue, global, trace::TracerProvider};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    trace::{RandomIdGenerator, Sampler, SdkTracer, SdkTracerProvider},
};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

static TRACING_INIT: OnceCell<()> = OnceCell::new();

/// Initialize the tracing subscriber once.
///
/// With `OTEL_EXPORTER_OTLP_ENDPOINT` set, spans are exported over OTLP in
/// addition to the JSON fmt layer; otherwise only the fmt layer is
/// installed. A failed exporter setup falls back to local logging.
///
/// # Errors
/// Fails when the subscriber cannot be installed.
pub fn init() -> Result<()> {
    TRACING_INIT.get_or_try_init(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false).json();

        let otel_endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").ok();
        if let Some(endpoint) = otel_endpoint {
            match init_tracer(&endpoint) {
                Ok(tracer) => {
                    let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);
                    tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt_layer)
                        .with(otel_layer)
                        .try_init()
                        .map_err(|e| Error::msg(e.to_string()))?;
                    info!(otel_enabled = true, endpoint = %endpoint, "tracing initialized");
                    return Ok::<(), Error>(());
                }
                Err(error) => {
                    tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt_layer)
                        .try_init()
                        .map_err(|e| Error::msg(e.to_string()))?;
                    info!(
                        otel_enabled = false,
                        error = %error,
                        "tracing initialized without OTLP export (exporter setup failed)"
                    );
                    return Ok::<(), Error>(());
                }
            }
        }

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .map_err(|e| Error::msg(e.to_string()))?;
        info!(otel_enabled = false, "tracing initialized");
        Ok::<(), Error>(())
    })?;
    Ok(())
}

/// Build an OTLP tracer. Sampling ratio comes from `OTEL_SAMPLING_RATIO`
/// (default 1.0).
fn init_tracer(endpoint: &str) -> Result<SdkTracer> {
    let sampling_ratio = std::env::var("OTEL_SAMPLING_RATIO")
        .ok()
        .and_then(|s| s.parse::<f64>().ok())
        .unwrap_or(1.0);

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .context("failed to build OTLP span exporter")?;

    let resource = Resource::builder()
        .with_attributes([
            KeyValue::new("service.name", "lantern-scout"),
            KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
        ])
        .build();

    let tracer_provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_sampler(Sampler::TraceIdRatioBased(sampling_ratio))
        .with_id_generator(RandomIdGenerator::default())
        .with_resource(resource)
        .build();

    let tracer = tracer_provider.tracer("lantern-scout");
    global::set_tracer_provider(tracer_provider);

    Ok(tracer)
}
