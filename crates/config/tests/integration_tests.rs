//! Integration tests for the config crate

use gasless_swap_config::{
    validate_settings, ConfigError, EngineSettings, Environment, RoutingMode, SettingsLoader,
};
use gasless_swap_types::{Address, FeeMode, FeeSchedule};
use std::io::Write;
use std::path::{Path, PathBuf};

fn sample(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../../config")
        .join(name)
}

#[test]
fn test_load_mainnet_config() {
    let settings =
        SettingsLoader::from_file(&sample("mainnet.toml")).expect("Failed to load mainnet config");

    assert_eq!(settings.network.environment, Environment::Mainnet);
    assert!(settings.network.json_logs);
    assert_eq!(settings.engine.chain_id, 1);
    assert_eq!(settings.engine.routing, RoutingMode::Routed);
    assert_eq!(settings.fees.mode, FeeMode::Proportional);
    assert_eq!(settings.maintainers.len(), 2);
    assert!(validate_settings(&settings).is_ok());
}

#[test]
fn test_load_local_config() {
    let settings =
        SettingsLoader::from_file(&sample("local.toml")).expect("Failed to load local config");

    assert_eq!(settings.network.environment, Environment::Local);
    assert_eq!(settings.network.log_level, "trace");
    assert_eq!(settings.fees.schedule().unwrap(), FeeSchedule::default());
    assert!(validate_settings(&settings).is_ok());
}

#[test]
fn test_mainnet_fee_schedule() {
    let settings = SettingsLoader::from_file(&sample("mainnet.toml")).unwrap();
    let schedule = settings.fees.schedule().unwrap();

    assert_eq!(schedule.mode(), FeeMode::Proportional);
    assert_eq!(schedule.maintainer_fee(), gasless_swap_types::U256::from(150u64));
    assert_eq!(schedule.max_fee(), gasless_swap_types::U256::from(500u64));
}

#[test]
fn test_default_settings_fail_validation() {
    let err = validate_settings(&EngineSettings::default()).unwrap_err();

    match err {
        ConfigError::ValidationError(msg) => {
            assert!(msg.contains("engine.engine_address"));
            assert!(msg.contains("engine.owner"));
            assert!(msg.contains("maintainers"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_yaml_and_toml_agree() {
    let yaml = r#"
network:
  environment: local
  log_level: trace
  metrics_enabled: true
engine:
  chain_id: 31337
  engine_address: "0xe9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9e9"
  owner: "0x0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a0a"
  base_asset: "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee"
  exchange: "0x9999999999999999999999999999999999999999"
  prevalidate_signatures: true
  routing: single_hop
fees:
  mode: fixed
  maintainer_fee: "10000000000000000"
  treasury_fee: "10000000000000000"
  max_fee: "100000000000000000"
maintainers:
  - "0x0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b0b"
"#;

    let mut file = tempfile::Builder::new()
        .suffix(".yaml")
        .tempfile()
        .unwrap();
    file.write_all(yaml.as_bytes()).unwrap();

    let from_yaml = SettingsLoader::from_file(file.path()).unwrap();
    let from_toml = SettingsLoader::from_file(&sample("local.toml")).unwrap();
    assert_eq!(from_yaml, from_toml);
}

#[test]
fn test_invalid_toml_reports_parse_error() {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(b"[network\nenvironment = ").unwrap();

    let result = SettingsLoader::from_file(file.path());
    assert!(matches!(result, Err(ConfigError::TomlError(_))));
}

#[test]
fn test_json_settings_file() {
    let mut file = tempfile::Builder::new()
        .suffix(".json")
        .tempfile()
        .unwrap();
    file.write_all(br#"{"network": {"environment": "testnet"}, "maintainers": []}"#)
        .unwrap();

    let settings = SettingsLoader::from_file(file.path()).unwrap();
    assert_eq!(settings.network.environment, Environment::Testnet);
    assert_eq!(settings.network.log_level, "info");
    assert!(settings.maintainers.is_empty());
}

#[test]
fn test_missing_file() {
    let result =
        SettingsLoader::from_file_with_env(Path::new("/nonexistent/settings.toml"), "GS_MISSING");
    assert!(matches!(result, Err(ConfigError::LoadError(_))));
}

#[test]
fn test_file_with_env_overrides() {
    std::env::set_var("GS_ITEST_NETWORK__LOG_LEVEL", "warn");
    std::env::set_var("GS_ITEST_ENGINE__CHAIN_ID", "10");
    std::env::set_var(
        "GS_ITEST_MAINTAINERS",
        "0x0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c0c,0x0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d0d",
    );

    let settings = SettingsLoader::from_file_with_env(&sample("local.toml"), "GS_ITEST").unwrap();

    std::env::remove_var("GS_ITEST_NETWORK__LOG_LEVEL");
    std::env::remove_var("GS_ITEST_ENGINE__CHAIN_ID");
    std::env::remove_var("GS_ITEST_MAINTAINERS");

    assert_eq!(settings.network.log_level, "warn");
    assert_eq!(settings.engine.chain_id, 10);
    // Untouched keys still come from the file
    assert_eq!(settings.engine.owner, Address::repeat_byte(0x0a));
    assert_eq!(
        settings.maintainers,
        vec![Address::repeat_byte(0x0c), Address::repeat_byte(0x0d)]
    );
}
