//! Tracing subscriber setup.
//!
//! Logs are always written as JSON to stdout, filtered by `RUST_LOG`
//! (default `info`). When an OTLP endpoint is configured, spans are also
//! exported over gRPC.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::AppError;

/// Flushes exported spans when dropped. Keep it alive for the lifetime of
/// the server.
#[derive(Debug)]
pub struct TelemetryGuard {
    provider: Option<SdkTracerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        let Some(provider) = self.provider.take() else {
            return;
        };
        if let Err(err) = provider.shutdown() {
            tracing::warn!(%err, "failed to flush exported spans");
        }
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global tracing subscriber.
///
/// # Errors
///
/// Returns `AppError::Telemetry` if the OTLP exporter cannot be built or a
/// global subscriber is already installed.
pub fn init(
    service_name: &'static str,
    otlp_endpoint: Option<&str>,
) -> Result<TelemetryGuard, AppError> {
    let fmt_layer = tracing_subscriber::fmt::layer().json();

    let Some(endpoint) = otlp_endpoint else {
        tracing_subscriber::registry()
            .with(env_filter())
            .with(fmt_layer)
            .try_init()
            .map_err(|e| AppError::Telemetry(e.to_string()))?;
        return Ok(TelemetryGuard { provider: None });
    };

    let exporter = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| AppError::Telemetry(format!("OTLP exporter: {e}")))?;
    let provider = SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(Resource::builder().with_service_name(service_name).build())
        .build();
    let tracer = provider.tracer(service_name);
    opentelemetry::global::set_tracer_provider(provider.clone());

    tracing_subscriber::registry()
        .with(env_filter())
        .with(fmt_layer)
        .with(tracing_opentelemetry::layer().with_tracer(tracer))
        .try_init()
        .map_err(|e| AppError::Telemetry(e.to_string()))?;

    Ok(TelemetryGuard {
        provider: Some(provider),
    })
}
