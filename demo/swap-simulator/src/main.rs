//! Swap Simulator
//!
//! Loads deployment settings, wires the engine onto an in-memory chain with a
//! constant-rate router, and runs a single owner-signed USDC swap. The
//! completion record is printed as JSON, followed by the Prometheus metrics.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use tracing::{error, info};

use gasless_swap_config::{validate_settings, RoutingMode, SettingsLoader, ENV_PREFIX};
use gasless_swap_engine::{FungibleToken, Host, SimulatedChain, SimulatedRouter, SwapEngine, SwapRequest};
use gasless_swap_metrics::{init_tracing_with_metrics, MetricsCollector};
use gasless_swap_types::route::encode_v3_path;
use gasless_swap_types::{
    address_of, sign_permit, Address, Bytes, Permit, RoutedSwap, SingleHopSwap, SwapRoute, U256,
};

const SIMULATED_START: u64 = 1_700_000_000;

/// Swap Simulator CLI
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings file (TOML, YAML or JSON)
    #[arg(long, default_value = "config/local.toml")]
    config: PathBuf,

    /// Hex-encoded secp256k1 key of the asset owner
    #[arg(
        long,
        default_value = "4242424242424242424242424242424242424242424242424242424242424242"
    )]
    owner_key: String,

    /// USDC to swap, in base units (6 decimals)
    #[arg(long, default_value = "2000000000")]
    amount: u64,

    /// Wei paid per USDC base unit
    #[arg(long, default_value = "500000000")]
    rate: u64,

    /// Minimum base-asset output, in wei
    #[arg(long, default_value = "0")]
    min_out: u128,

    /// Authorization lifetime in seconds
    #[arg(long, default_value = "600")]
    ttl: u64,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let settings = SettingsLoader::from_file_with_env(&args.config, ENV_PREFIX)
        .with_context(|| format!("loading {}", args.config.display()))?;
    validate_settings(&settings)?;

    let collector = Arc::new(MetricsCollector::new());
    init_tracing_with_metrics(
        collector.clone(),
        &settings.network.log_level,
        settings.network.json_logs,
    )?;

    let section = &settings.engine;
    let maintainer = *settings
        .maintainers
        .first()
        .ok_or_else(|| anyhow!("no maintainer configured"))?;

    info!("Starting Swap Simulator");
    info!("  Settings: {}", args.config.display());
    info!("  Chain: {}", section.chain_id);
    info!("  Routing: {:?}", section.routing);

    // Chain, tokens and a router with enough base asset to pay out
    let usdc = Address::repeat_byte(0xaa);
    let chain = Arc::new(SimulatedChain::new(section.chain_id, section.base_asset));
    chain.register_token(usdc, "USD Coin");
    chain.set_timestamp(SIMULATED_START);

    let router = Arc::new(SimulatedRouter::new(section.exchange, chain.clone()));
    router.set_rate(usdc, section.base_asset, U256::from(args.rate), U256::from(1u64));
    let liquidity = router.quote(usdc, section.base_asset, U256::from(args.amount))?;
    chain.mint_wrapped(section.exchange, liquidity)?;

    let mut builder = SwapEngine::builder()
        .address(section.engine_address)
        .owner(section.owner)
        .host(chain.clone())
        .tokens(chain.clone())
        .exchange(router)
        .wrapped_native(chain.clone())
        .fees(settings.fees.schedule()?)
        .prevalidate_signatures(section.prevalidate_signatures)
        .event_sink(collector.clone());
    for account in &settings.maintainers {
        builder = builder.maintainer(*account);
    }
    let engine = builder.build()?;

    // Owner holds the input and signs a grant to the engine
    let key = hex::decode(args.owner_key.trim_start_matches("0x")).context("decoding owner key")?;
    let owner = address_of(&key)?;
    let amount = U256::from(args.amount);
    chain.mint(usdc, owner, amount)?;

    let deadline = chain.block_timestamp() + args.ttl;
    let permit = Permit {
        owner,
        spender: engine.address(),
        value: amount,
        nonce: chain.nonces(usdc, owner)?,
        deadline: U256::from(deadline),
    };
    let signature = sign_permit(&permit, chain.domain_separator(usdc)?, &key)?;
    info!("  Owner: {}", owner);
    info!("  Signature: {}", signature.to_hex());

    let amount_out_min = U256::from(args.min_out);
    let route = match section.routing {
        RoutingMode::SingleHop => SwapRoute::SingleHop(SingleHopSwap {
            pool_fee: 500,
            amount_out_min,
            sqrt_price_limit_x96: U256::ZERO,
        }),
        RoutingMode::Routed => {
            let path = encode_v3_path(&[usdc, section.base_asset], &[500])?;
            SwapRoute::Routed(RoutedSwap::v3_exact_in(
                engine.address(),
                amount,
                amount_out_min,
                path,
            ))
        }
    };

    let request = SwapRequest {
        input_asset: usdc,
        amount,
        route,
        owner,
        metadata: Bytes::from_static(b"swap-simulator"),
        deadline,
        signature,
    };

    match engine.execute_swap(maintainer, request) {
        Ok(record) => {
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Err(e) => {
            collector.record_failure(&e);
            error!("Swap failed: {}", e);
            if settings.network.metrics_enabled {
                println!("{}", collector.export_metrics()?);
            }
            bail!("swap failed: {e}");
        }
    }

    if settings.network.metrics_enabled {
        println!("{}", collector.export_metrics()?);
    }

    Ok(())
}
