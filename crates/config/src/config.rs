//! Core settings structures for a gasless swap engine deployment

use std::str::FromStr;

use gasless_swap_types::{Address, FeeMode, FeeSchedule, U256};
use serde::{Deserialize, Serialize};

use crate::{ConfigError, Result};

/// Main deployment settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct EngineSettings {
    /// Network configuration
    #[serde(default)]
    pub network: NetworkConfig,

    /// Engine wiring and behavior
    #[serde(default)]
    pub engine: EngineSection,

    /// Fee schedule
    #[serde(default)]
    pub fees: FeeSettings,

    /// Initial maintainer allowlist
    #[serde(default)]
    pub maintainers: Vec<Address>,
}

/// Network environment configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NetworkConfig {
    /// Environment type (mainnet, testnet, local)
    pub environment: Environment,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub json_logs: bool,

    /// Enable metrics collection
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

/// Environment types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Mainnet,
    Testnet,
    Local,
}

/// How maintainers describe the route to the base asset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoutingMode {
    /// Fixed single pool, exact input
    #[default]
    SingleHop,
    /// Opaque command program for a generalized router
    Routed,
}

/// Addresses the engine is wired to, and its behavior switches
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineSection {
    /// Chain the authorizations are bound to
    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    /// The engine's own ledger address
    #[serde(default)]
    pub engine_address: Address,

    /// Administrative owner
    #[serde(default)]
    pub owner: Address,

    /// Wrapped native token
    #[serde(default)]
    pub base_asset: Address,

    /// Exchange router
    #[serde(default)]
    pub exchange: Address,

    /// Check signatures before asking the token to consume them
    #[serde(default = "default_true")]
    pub prevalidate_signatures: bool,

    #[serde(default)]
    pub routing: RoutingMode,
}

/// Fee schedule as written in settings files.
///
/// Amounts are strings so they can carry full 256-bit values; decimal and
/// `0x` hex are both accepted. Proportional fees are basis points.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FeeSettings {
    #[serde(default = "default_fee_mode")]
    pub mode: FeeMode,

    #[serde(default = "default_fixed_fee")]
    pub maintainer_fee: String,

    #[serde(default = "default_fixed_fee")]
    pub treasury_fee: String,

    #[serde(default = "default_fixed_max_fee")]
    pub max_fee: String,
}

impl FeeSettings {
    /// Basis-point schedule
    pub fn proportional(maintainer_bps: u64, treasury_bps: u64, max_bps: u64) -> Self {
        Self {
            mode: FeeMode::Proportional,
            maintainer_fee: maintainer_bps.to_string(),
            treasury_fee: treasury_bps.to_string(),
            max_fee: max_bps.to_string(),
        }
    }

    /// Build the engine's fee schedule, enforcing its bounds
    pub fn schedule(&self) -> Result<FeeSchedule> {
        FeeSchedule::new(
            self.mode,
            parse_amount("fees.maintainer_fee", &self.maintainer_fee)?,
            parse_amount("fees.treasury_fee", &self.treasury_fee)?,
            parse_amount("fees.max_fee", &self.max_fee)?,
        )
        .map_err(|e| ConfigError::ValidationError(format!("fees: {e}")))
    }
}

/// Parse a decimal or `0x` hex amount
pub fn parse_amount(field: &str, value: &str) -> Result<U256> {
    U256::from_str(value.trim())
        .map_err(|e| ConfigError::ParseError(format!("{field}: invalid amount '{value}': {e}")))
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}

fn default_chain_id() -> u64 {
    1
}

fn default_fee_mode() -> FeeMode {
    FeeMode::Fixed
}

fn default_fixed_fee() -> String {
    "10000000000000000".to_string() // 0.01 native
}

fn default_fixed_max_fee() -> String {
    "100000000000000000".to_string() // 0.1 native
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Local,
            log_level: default_log_level(),
            json_logs: false,
            metrics_enabled: default_true(),
        }
    }
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            chain_id: default_chain_id(),
            engine_address: Address::ZERO,
            owner: Address::ZERO,
            base_asset: Address::ZERO,
            exchange: Address::ZERO,
            prevalidate_signatures: default_true(),
            routing: RoutingMode::default(),
        }
    }
}

impl Default for FeeSettings {
    fn default() -> Self {
        Self {
            mode: default_fee_mode(),
            maintainer_fee: default_fixed_fee(),
            treasury_fee: default_fixed_fee(),
            max_fee: default_fixed_max_fee(),
        }
    }
}
