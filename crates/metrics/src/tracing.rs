use crate::collector::MetricsCollector;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt as fmt_layer, EnvFilter, Layer};

/// Install the global subscriber: env filter, plain or JSON formatting, and
/// the metrics layer.
///
/// `RUST_LOG` wins over `default_level` when set.
pub fn init_tracing_with_metrics(
    collector: Arc<MetricsCollector>,
    default_level: &str,
    json: bool,
) -> Result<(), TracingError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{default_level},gasless_swap=debug")));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json.then(|| fmt_layer::layer().json()))
        .with((!json).then(fmt_layer::layer))
        .with(MetricsLayer::new(collector))
        .try_init()
        .map_err(|e| TracingError::InitError(e.to_string()))
}

/// Counts warnings and errors by their `error_kind` field
pub struct MetricsLayer {
    collector: Arc<MetricsCollector>,
}

impl MetricsLayer {
    pub fn new(collector: Arc<MetricsCollector>) -> Self {
        Self { collector }
    }
}

impl<S: Subscriber> Layer<S> for MetricsLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = *event.metadata().level();
        if level != Level::ERROR && level != Level::WARN {
            return;
        }

        let mut visitor = ErrorKindVisitor::default();
        event.record(&mut visitor);
        if let Some(kind) = visitor.kind {
            self.collector.record_logged_error(&kind);
        }
    }
}

#[derive(Default)]
struct ErrorKindVisitor {
    kind: Option<String>,
}

impl Visit for ErrorKindVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "error_kind" {
            self.kind = Some(value.to_string());
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "error_kind" && self.kind.is_none() {
            self.kind = Some(format!("{value:?}").trim_matches('"').to_string());
        }
    }
}

#[derive(Debug, Error)]
pub enum TracingError {
    #[error("Failed to initialize tracing: {0}")]
    InitError(String),
}
