//! Initializes logging and, optionally, OpenTelemetry tracing.
use std::env;

use opentelemetry::{trace::TracerProvider, KeyValue};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::Resource;
use tracing::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Environment variable with the OTLP endpoint that spans are exported to.
pub const OTLP_URL_ENVVAR: &str = "STABLE_ROUTER_OTLP_URL";

/// Environment variable with a label appended to the whoami string, to tell apart several
/// instances of the same service.
pub const SVC_LABEL_ENVVAR: &str = "STABLE_ROUTER_SVC_LABEL";

/// Configuration for the logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    /// Identifies the service in logs and exported spans.
    whoami: String,

    /// The OpenTelemetry URL for exporting traces.
    otel_url: Option<String>,
}

impl LoggerConfig {
    /// Creates a config that only logs to stdout.
    pub const fn new(whoami: String) -> Self {
        Self {
            whoami,
            otel_url: None,
        }
    }

    /// Creates a config whose whoami is `base` followed by the service label, if one is set.
    pub fn with_base_name(base: &str) -> Self {
        Self::new(get_whoami_string(base))
    }

    /// Exports spans to `url`.
    pub fn set_otlp_url(&mut self, url: String) {
        self.otel_url = Some(url);
    }

    /// The whoami string.
    pub fn whoami(&self) -> &str {
        &self.whoami
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self::with_base_name("(stable-router)")
    }
}

/// Initializes the logging subsystem with the provided config.
///
/// If the OTLP exporter cannot be built, logging continues on stdout alone.
pub fn init(config: LoggerConfig) {
    let filt = tracing_subscriber::EnvFilter::from_default_env();

    let log_file = env::var("LOG_FILE").is_ok_and(|v| v == "1");
    let log_line_num = env::var("LOG_LINE_NUM").is_ok_and(|v| v == "1");

    let stdout_sub = tracing_subscriber::fmt::layer()
        .compact()
        .event_format(
            tracing_subscriber::fmt::format()
                .with_file(log_file)
                .with_line_number(log_line_num),
        )
        .with_filter(filt);

    let Some(otel_url) = &config.otel_url else {
        tracing_subscriber::registry().with(stdout_sub).init();
        info!(whoami = %config.whoami, "logging started");
        return;
    };

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(otel_url)
        .build();

    match exporter {
        Ok(exporter) => {
            let resource = Resource::builder()
                .with_attribute(KeyValue::new("service.name", config.whoami.clone()))
                .build();

            let tp = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                .with_resource(resource)
                .with_batch_exporter(exporter)
                .build();

            let tracer = tp.tracer("stable-router");
            let otel_sub = tracing_opentelemetry::layer().with_tracer(tracer);

            tracing_subscriber::registry()
                .with(stdout_sub)
                .with(otel_sub)
                .init();

            info!(whoami = %config.whoami, %otel_url, "logging started");
        }
        Err(err) => {
            tracing_subscriber::registry().with(stdout_sub).init();

            warn!(whoami = %config.whoami, %otel_url, %err, "could not build otlp exporter");
            info!(whoami = %config.whoami, "logging started");
        }
    }
}

/// Gets the OTLP URL from the standard envvar.
pub fn get_otlp_url_from_env() -> Option<String> {
    env::var(OTLP_URL_ENVVAR).ok()
}

/// Gets the service label from the standard envvar.
pub fn get_service_label_from_env() -> Option<String> {
    env::var(SVC_LABEL_ENVVAR).ok()
}

/// Computes a standard whoami string.
pub fn get_whoami_string(base: &str) -> String {
    match get_service_label_from_env() {
        Some(label) => format_whoami(base, &label),
        None => base.to_owned(),
    }
}

fn format_whoami(base: &str, label: &str) -> String {
    format!("{base}%{label}")
}
