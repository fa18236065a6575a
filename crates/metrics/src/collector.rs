use crate::metrics::*;
use gasless_swap_engine::SwapError;
use gasless_swap_types::{CompletionRecord, EngineEvent, EventSink, U256};
use prometheus::{Encoder, TextEncoder};
use thiserror::Error;
use tracing::trace;

const GWEI: u64 = 1_000_000_000;

/// Convert a wei amount to whole gwei, saturating at `u64::MAX`
pub fn to_gwei(amount: U256) -> u64 {
    u64::try_from(amount / U256::from(GWEI)).unwrap_or(u64::MAX)
}

/// Feeds engine events into the process-wide Prometheus registry
#[derive(Debug, Default)]
pub struct MetricsCollector;

impl MetricsCollector {
    pub fn new() -> Self {
        Self
    }

    pub fn record_completion(&self, record: &CompletionRecord) {
        SWAPS_COMPLETED.inc();

        let proceeds = to_gwei(record.total_proceeds);
        PROCEEDS_GWEI.inc_by(proceeds);
        SWAP_PROCEEDS.observe(proceeds as f64 / GWEI as f64);

        for (recipient, amount) in [
            ("owner", record.amount_to_owner),
            ("maintainer", record.amount_to_maintainer),
            ("treasury", record.amount_to_treasury),
        ] {
            DISTRIBUTED_GWEI
                .with_label_values(&[recipient])
                .inc_by(to_gwei(amount));
        }
        TREASURY_BALANCE_GWEI.add(gauge_delta(record.amount_to_treasury));
    }

    /// Count an aborted swap under its error kind
    pub fn record_failure(&self, error: &SwapError) {
        SWAP_FAILURES.with_label_values(&[error.kind()]).inc();
    }

    pub fn record_logged_error(&self, kind: &str) {
        LOGGED_ERRORS.with_label_values(&[kind]).inc();
    }

    /// Overwrite the treasury gauge with an observed ledger balance
    pub fn set_treasury_balance(&self, balance: U256) {
        TREASURY_BALANCE_GWEI.set(gauge_delta(balance));
    }

    /// Export metrics in Prometheus text format
    pub fn export_metrics(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = prometheus::gather();
        let mut buffer = Vec::new();
        encoder
            .encode(&metric_families, &mut buffer)
            .map_err(|e| MetricsError::EncodingError(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| MetricsError::EncodingError(e.to_string()))
    }
}

fn gauge_delta(amount: U256) -> i64 {
    i64::try_from(to_gwei(amount)).unwrap_or(i64::MAX)
}

impl EventSink for MetricsCollector {
    fn publish(&self, event: &EngineEvent) {
        trace!(event = event.name(), "Recording engine event");
        match event {
            EngineEvent::SwapCompleted(record) => self.record_completion(record),
            EngineEvent::MaintainerUpdated { enabled, .. } => {
                let action = if *enabled { "added" } else { "removed" };
                MAINTAINER_CHANGES.with_label_values(&[action]).inc();
            }
            EngineEvent::FeesUpdated { .. } => FEE_UPDATES.inc(),
            EngineEvent::TreasuryWithdrawn { amount, .. } => {
                TREASURY_WITHDRAWALS.inc();
                TREASURY_WITHDRAWN_GWEI.inc_by(to_gwei(*amount));
                TREASURY_BALANCE_GWEI.sub(gauge_delta(*amount));
            }
            EngineEvent::OwnershipTransferred { .. } => OWNERSHIP_TRANSFERS.inc(),
        }
    }
}

#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("Encoding error: {0}")]
    EncodingError(String),
}
