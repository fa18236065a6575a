//! Settings validation

use crate::{parse_amount, ConfigError, EngineSettings, Environment, FeeSettings, Result};
use gasless_swap_types::{Address, FeeMode, U256, BPS_DENOMINATOR};
use std::collections::HashSet;

/// Validation error details
#[derive(Debug, Clone)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate the entire deployment settings, reporting every problem at once
pub fn validate_settings(settings: &EngineSettings) -> Result<()> {
    let mut errors = Vec::new();

    // Validate network config
    if let Err(e) = validate_log_level(&settings.network.log_level) {
        errors.push(e);
    }

    // Validate engine wiring
    let engine = &settings.engine;
    if engine.chain_id == 0 {
        errors.push(ValidationError::new(
            "engine.chain_id",
            "must be greater than 0",
        ));
    }

    for (field, address) in [
        ("engine.engine_address", engine.engine_address),
        ("engine.owner", engine.owner),
        ("engine.base_asset", engine.base_asset),
        ("engine.exchange", engine.exchange),
    ] {
        if address.is_zero() {
            errors.push(ValidationError::new(field, "address must not be zero"));
        }
    }

    if engine.exchange == engine.engine_address && !engine.exchange.is_zero() {
        errors.push(ValidationError::new(
            "engine.exchange",
            "exchange cannot be the engine itself",
        ));
    }

    if settings.network.environment == Environment::Mainnet && !engine.prevalidate_signatures {
        errors.push(ValidationError::new(
            "engine.prevalidate_signatures",
            "must stay enabled on mainnet",
        ));
    }

    // Validate fees
    errors.extend(validate_fee_settings(&settings.fees));

    // Validate maintainers
    if settings.maintainers.is_empty() {
        errors.push(ValidationError::new(
            "maintainers",
            "at least one maintainer must be configured",
        ));
    }

    for (idx, maintainer) in settings.maintainers.iter().enumerate() {
        if maintainer.is_zero() {
            errors.push(ValidationError::new(
                format!("maintainers[{idx}]"),
                "address must not be zero",
            ));
        }
    }

    let unique: HashSet<&Address> = settings.maintainers.iter().collect();
    if unique.len() != settings.maintainers.len() {
        errors.push(ValidationError::new(
            "maintainers",
            "duplicate maintainer addresses found",
        ));
    }

    // Return all errors if any were found
    if !errors.is_empty() {
        let error_msg = errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ConfigError::ValidationError(error_msg));
    }

    Ok(())
}

/// Check fee amounts parse and sit inside their caps
pub fn validate_fee_settings(fees: &FeeSettings) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let mut amount = |field: &str, value: &str| match parse_amount(field, value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            errors.push(ValidationError::new(field, e.to_string()));
            None
        }
    };
    let maintainer = amount("fees.maintainer_fee", &fees.maintainer_fee);
    let treasury = amount("fees.treasury_fee", &fees.treasury_fee);
    let max = amount("fees.max_fee", &fees.max_fee);

    let Some(max) = max else {
        return errors;
    };

    for (field, fee) in [
        ("fees.maintainer_fee", maintainer),
        ("fees.treasury_fee", treasury),
    ] {
        if let Some(fee) = fee {
            if fee > max {
                errors.push(ValidationError::new(
                    field,
                    format!("fee {fee} exceeds max_fee {max}"),
                ));
            }
        }
    }

    if fees.mode == FeeMode::Proportional {
        let denominator = U256::from(BPS_DENOMINATOR);
        if max > denominator {
            errors.push(ValidationError::new(
                "fees.max_fee",
                format!("must be <= {BPS_DENOMINATOR} bps (100%)"),
            ));
        }
        if let (Some(maintainer), Some(treasury)) = (maintainer, treasury) {
            if maintainer.saturating_add(treasury) > denominator {
                errors.push(ValidationError::new(
                    "fees",
                    format!("maintainer_fee + treasury_fee must be <= {BPS_DENOMINATOR} bps"),
                ));
            }
        }
    }

    errors
}

/// Validate log level
fn validate_log_level(level: &str) -> std::result::Result<(), ValidationError> {
    match level.to_lowercase().as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ValidationError::new(
            "network.log_level",
            format!(
                "invalid log level '{level}', must be one of: trace, debug, info, warn, error"
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{EngineSection, NetworkConfig};

    fn valid_settings() -> EngineSettings {
        EngineSettings {
            network: NetworkConfig {
                environment: Environment::Testnet,
                ..Default::default()
            },
            engine: EngineSection {
                engine_address: Address::repeat_byte(0xe9),
                owner: Address::repeat_byte(0x0a),
                base_asset: Address::repeat_byte(0xee),
                exchange: Address::repeat_byte(0x99),
                ..Default::default()
            },
            fees: FeeSettings::default(),
            maintainers: vec![Address::repeat_byte(0x0b)],
        }
    }

    fn message(settings: &EngineSettings) -> String {
        match validate_settings(settings) {
            Err(ConfigError::ValidationError(msg)) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_valid_settings() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut settings = valid_settings();
        settings.network.log_level = "verbose".to_string();

        assert!(message(&settings).contains("network.log_level"));
    }

    #[test]
    fn test_validate_collects_all_zero_addresses() {
        let mut settings = valid_settings();
        settings.engine.owner = Address::ZERO;
        settings.engine.exchange = Address::ZERO;

        let msg = message(&settings);
        assert!(msg.contains("engine.owner"));
        assert!(msg.contains("engine.exchange"));
    }

    #[test]
    fn test_validate_fee_above_max() {
        let mut settings = valid_settings();
        settings.fees.treasury_fee = "200000000000000000".to_string();

        assert!(message(&settings).contains("fees.treasury_fee"));
    }

    #[test]
    fn test_validate_proportional_limits() {
        let mut settings = valid_settings();
        settings.fees = FeeSettings::proportional(6_000, 6_000, 10_000);
        assert!(message(&settings).contains("maintainer_fee + treasury_fee"));

        settings.fees = FeeSettings::proportional(100, 100, 20_000);
        assert!(message(&settings).contains("fees.max_fee"));
    }

    #[test]
    fn test_validate_duplicate_maintainers() {
        let mut settings = valid_settings();
        settings.maintainers.push(Address::repeat_byte(0x0b));

        assert!(message(&settings).contains("duplicate"));
    }

    #[test]
    fn test_validate_mainnet_requires_prevalidation() {
        let mut settings = valid_settings();
        settings.network.environment = Environment::Mainnet;
        settings.engine.prevalidate_signatures = false;

        assert!(message(&settings).contains("engine.prevalidate_signatures"));
    }

    #[test]
    fn test_validate_unparseable_fee() {
        let mut settings = valid_settings();
        settings.fees.maintainer_fee = "one cent".to_string();

        assert!(message(&settings).contains("fees.maintainer_fee"));
    }
}
