//! Metrics and monitoring for the gasless swap engine
//!
//! This crate turns engine events into Prometheus metrics and installs the
//! tracing subscriber used by binaries.
//!
//! # Features
//!
//! - Prometheus counters for swaps, failures, payouts and administration
//! - [`MetricsCollector`] as an engine event sink
//! - Tracing initialisation with an error-counting layer
//!
//! # Example
//!
//! ```no_run
//! use gasless_swap_metrics::{init_tracing_with_metrics, MetricsCollector};
//! use std::sync::Arc;
//!
//! let collector = Arc::new(MetricsCollector::new());
//! init_tracing_with_metrics(collector.clone(), "info", true).unwrap();
//!
//! // Register `collector` with the engine builder as an event sink, then:
//! println!("{}", collector.export_metrics().unwrap());
//! ```

pub mod collector;
pub mod metrics;
pub mod tracing;

pub use collector::{to_gwei, MetricsCollector, MetricsError};
pub use tracing::{init_tracing_with_metrics, MetricsLayer, TracingError};
