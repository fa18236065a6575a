use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter, register_int_counter_vec, register_int_gauge,
    Histogram, IntCounter, IntCounterVec, IntGauge,
};

lazy_static! {
    // ═══════════════════════════════════════════════════════════════════════════
    // SWAP METRICS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Swaps that committed and distributed proceeds
    pub static ref SWAPS_COMPLETED: IntCounter = register_int_counter!(
        "gasless_swap_swaps_completed_total",
        "Total number of completed swaps"
    )
    .unwrap();

    /// Swaps that rolled back, by error kind
    pub static ref SWAP_FAILURES: IntCounterVec = register_int_counter_vec!(
        "gasless_swap_swap_failures_total",
        "Total number of aborted swaps",
        &["kind"]
    )
    .unwrap();

    /// Native proceeds per swap
    pub static ref SWAP_PROCEEDS: Histogram = register_histogram!(
        "gasless_swap_proceeds_native",
        "Native proceeds per completed swap, in whole native units",
        vec![0.001, 0.01, 0.1, 1.0, 10.0, 100.0]
    )
    .unwrap();

    // ═══════════════════════════════════════════════════════════════════════════
    // DISTRIBUTION METRICS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Total native proceeds, in gwei
    pub static ref PROCEEDS_GWEI: IntCounter = register_int_counter!(
        "gasless_swap_proceeds_gwei_total",
        "Total native proceeds distributed, in gwei"
    )
    .unwrap();

    /// Native paid out per recipient class (owner, maintainer, treasury), in gwei
    pub static ref DISTRIBUTED_GWEI: IntCounterVec = register_int_counter_vec!(
        "gasless_swap_distributed_gwei_total",
        "Native distributed per recipient class, in gwei",
        &["recipient"]
    )
    .unwrap();

    /// Treasury accrual minus withdrawals, in gwei
    pub static ref TREASURY_BALANCE_GWEI: IntGauge = register_int_gauge!(
        "gasless_swap_treasury_balance_gwei",
        "Native held for the treasury, in gwei"
    )
    .unwrap();

    // ═══════════════════════════════════════════════════════════════════════════
    // ADMINISTRATION METRICS
    // ═══════════════════════════════════════════════════════════════════════════

    pub static ref MAINTAINER_CHANGES: IntCounterVec = register_int_counter_vec!(
        "gasless_swap_maintainer_changes_total",
        "Maintainer allowlist changes",
        &["action"]
    )
    .unwrap();

    pub static ref FEE_UPDATES: IntCounter = register_int_counter!(
        "gasless_swap_fee_updates_total",
        "Fee parameter updates"
    )
    .unwrap();

    pub static ref TREASURY_WITHDRAWALS: IntCounter = register_int_counter!(
        "gasless_swap_treasury_withdrawals_total",
        "Treasury withdrawals"
    )
    .unwrap();

    pub static ref TREASURY_WITHDRAWN_GWEI: IntCounter = register_int_counter!(
        "gasless_swap_treasury_withdrawn_gwei_total",
        "Native withdrawn from the treasury, in gwei"
    )
    .unwrap();

    pub static ref OWNERSHIP_TRANSFERS: IntCounter = register_int_counter!(
        "gasless_swap_ownership_transfers_total",
        "Ownership transfers"
    )
    .unwrap();

    // ═══════════════════════════════════════════════════════════════════════════
    // LOG METRICS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Warning and error log events that carry an `error_kind` field
    pub static ref LOGGED_ERRORS: IntCounterVec = register_int_counter_vec!(
        "gasless_swap_logged_errors_total",
        "Logged warnings and errors by error kind",
        &["error_kind"]
    )
    .unwrap();
}
