use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Command bytes understood by the generalized router
pub mod command {
    /// High bit: the router may continue if this command fails
    pub const FLAG_ALLOW_REVERT: u8 = 0x80;
    pub const COMMAND_TYPE_MASK: u8 = 0x3f;

    pub const V3_SWAP_EXACT_IN: u8 = 0x00;
    pub const V3_SWAP_EXACT_OUT: u8 = 0x01;
    pub const V2_SWAP_EXACT_IN: u8 = 0x08;
    pub const V2_SWAP_EXACT_OUT: u8 = 0x09;

    /// Strip flag bits from a raw command byte
    pub fn kind(raw: u8) -> u8 {
        raw & COMMAND_TYPE_MASK
    }

    pub fn is_swap(raw: u8) -> bool {
        matches!(
            kind(raw),
            V3_SWAP_EXACT_IN | V3_SWAP_EXACT_OUT | V2_SWAP_EXACT_IN | V2_SWAP_EXACT_OUT
        )
    }
}

const ADDR_SIZE: usize = 20;
const FEE_SIZE: usize = 3;
const HOP_SIZE: usize = ADDR_SIZE + FEE_SIZE;

/// ABI layout of a V3 swap input: `(recipient, amount, amountLimit, path, payerIsUser)`
pub type V3SwapInput = (Address, U256, U256, Bytes, bool);

/// ABI layout of a V2 swap input: `(recipient, amount, amountLimit, path, payerIsUser)`
pub type V2SwapInput = (Address, U256, U256, Vec<Address>, bool);

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("routing commands are empty")]
    EmptyCommands,

    #[error("routing inputs are empty")]
    EmptyInputs,

    #[error("routing commands and inputs differ in length: {commands} commands, {inputs} inputs")]
    MismatchedLengths { commands: usize, inputs: usize },

    #[error("malformed routing instruction: {0}")]
    Malformed(String),
}

/// How the input asset reaches the base asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SwapRoute {
    /// One pool, input asset straight to the base asset
    SingleHop(SingleHopSwap),
    /// Opaque command program for a generalized router
    Routed(RoutedSwap),
}

impl SwapRoute {
    /// Validate the instruction shape without decoding payloads
    pub fn validate_shape(&self) -> Result<(), RouteError> {
        match self {
            SwapRoute::SingleHop(_) => Ok(()),
            SwapRoute::Routed(routed) => routed.validate_shape(),
        }
    }
}

/// Fixed single-hop descriptor. The amount in is the authorized amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleHopSwap {
    /// Pool fee tier in hundredths of a basis point
    pub pool_fee: u32,
    pub amount_out_min: U256,
    /// Zero disables the price limit
    pub sqrt_price_limit_x96: U256,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutedSwap {
    /// One opcode byte per command
    pub commands: Bytes,
    /// One ABI-encoded parameter blob per command
    pub inputs: Vec<Bytes>,
}

impl RoutedSwap {
    pub fn new(commands: impl Into<Bytes>, inputs: Vec<Bytes>) -> Self {
        Self {
            commands: commands.into(),
            inputs,
        }
    }

    /// Single V3 exact-input swap over a packed path
    pub fn v3_exact_in(recipient: Address, amount_in: U256, amount_out_min: U256, path: Bytes) -> Self {
        let input: V3SwapInput = (recipient, amount_in, amount_out_min, path, true);
        Self::new(
            vec![command::V3_SWAP_EXACT_IN],
            vec![Bytes::from(input.abi_encode_params())],
        )
    }

    /// Single V2 exact-input swap over an address path
    pub fn v2_exact_in(
        recipient: Address,
        amount_in: U256,
        amount_out_min: U256,
        path: Vec<Address>,
    ) -> Self {
        let input: V2SwapInput = (recipient, amount_in, amount_out_min, path, true);
        Self::new(
            vec![command::V2_SWAP_EXACT_IN],
            vec![Bytes::from(input.abi_encode_params())],
        )
    }

    /// Single V3 exact-output swap; `path` is packed output-first
    pub fn v3_exact_out(recipient: Address, amount_out: U256, amount_in_max: U256, path: Bytes) -> Self {
        let input: V3SwapInput = (recipient, amount_out, amount_in_max, path, true);
        Self::new(
            vec![command::V3_SWAP_EXACT_OUT],
            vec![Bytes::from(input.abi_encode_params())],
        )
    }

    /// Single V2 exact-output swap over an input-first address path
    pub fn v2_exact_out(
        recipient: Address,
        amount_out: U256,
        amount_in_max: U256,
        path: Vec<Address>,
    ) -> Self {
        let input: V2SwapInput = (recipient, amount_out, amount_in_max, path, true);
        Self::new(
            vec![command::V2_SWAP_EXACT_OUT],
            vec![Bytes::from(input.abi_encode_params())],
        )
    }

    pub fn validate_shape(&self) -> Result<(), RouteError> {
        if self.commands.is_empty() {
            return Err(RouteError::EmptyCommands);
        }
        if self.inputs.is_empty() {
            return Err(RouteError::EmptyInputs);
        }
        if self.commands.len() != self.inputs.len() {
            return Err(RouteError::MismatchedLengths {
                commands: self.commands.len(),
                inputs: self.inputs.len(),
            });
        }
        Ok(())
    }

    /// Asset produced by the last swap command in the program
    pub fn final_output_asset(&self) -> Result<Address, RouteError> {
        self.validate_shape()?;

        let (index, raw) = self
            .commands
            .iter()
            .enumerate()
            .rev()
            .find(|(_, raw)| command::is_swap(**raw))
            .ok_or_else(|| RouteError::Malformed("no swap command in program".to_string()))?;

        let input = &self.inputs[index];
        match command::kind(*raw) {
            command::V3_SWAP_EXACT_IN => {
                let (_, _, _, path, _) = decode_v3(input)?;
                let tokens = decode_v3_path(&path)?;
                tokens
                    .last()
                    .copied()
                    .ok_or_else(|| RouteError::Malformed("empty v3 path".to_string()))
            }
            // Exact-output paths are encoded output-first.
            command::V3_SWAP_EXACT_OUT => {
                let (_, _, _, path, _) = decode_v3(input)?;
                let tokens = decode_v3_path(&path)?;
                tokens
                    .first()
                    .copied()
                    .ok_or_else(|| RouteError::Malformed("empty v3 path".to_string()))
            }
            _ => {
                let (_, _, _, path, _) = decode_v2(input)?;
                if path.len() < 2 {
                    return Err(RouteError::Malformed(format!(
                        "v2 path needs at least 2 assets, got {}",
                        path.len()
                    )));
                }
                path.last()
                    .copied()
                    .ok_or_else(|| RouteError::Malformed("empty v2 path".to_string()))
            }
        }
    }
}

pub fn decode_v3(input: &[u8]) -> Result<V3SwapInput, RouteError> {
    V3SwapInput::abi_decode_params(input, true)
        .map_err(|e| RouteError::Malformed(format!("v3 swap input: {e}")))
}

pub fn decode_v2(input: &[u8]) -> Result<V2SwapInput, RouteError> {
    V2SwapInput::abi_decode_params(input, true)
        .map_err(|e| RouteError::Malformed(format!("v2 swap input: {e}")))
}

/// Pack `token (fee token)+` the way V3 pools expect
pub fn encode_v3_path(tokens: &[Address], fees: &[u32]) -> Result<Bytes, RouteError> {
    if tokens.len() < 2 || fees.len() != tokens.len() - 1 {
        return Err(RouteError::Malformed(format!(
            "v3 path needs n+1 tokens for n fees, got {} tokens and {} fees",
            tokens.len(),
            fees.len()
        )));
    }

    let mut out = Vec::with_capacity(ADDR_SIZE + fees.len() * HOP_SIZE);
    out.extend_from_slice(tokens[0].as_slice());
    for (fee, token) in fees.iter().zip(&tokens[1..]) {
        if *fee >= 1 << 24 {
            return Err(RouteError::Malformed(format!("fee {fee} exceeds uint24")));
        }
        out.extend_from_slice(&fee.to_be_bytes()[1..]);
        out.extend_from_slice(token.as_slice());
    }
    Ok(Bytes::from(out))
}

/// Split a packed V3 path into its token sequence
pub fn decode_v3_path(path: &[u8]) -> Result<Vec<Address>, RouteError> {
    if path.len() < ADDR_SIZE + HOP_SIZE || (path.len() - ADDR_SIZE) % HOP_SIZE != 0 {
        return Err(RouteError::Malformed(format!(
            "invalid v3 path length {}",
            path.len()
        )));
    }

    let hops = (path.len() - ADDR_SIZE) / HOP_SIZE;
    let mut tokens = Vec::with_capacity(hops + 1);
    tokens.push(Address::from_slice(&path[..ADDR_SIZE]));
    for hop in 0..hops {
        let start = ADDR_SIZE + hop * HOP_SIZE + FEE_SIZE;
        tokens.push(Address::from_slice(&path[start..start + ADDR_SIZE]));
    }
    Ok(tokens)
}

/// Fee tiers of a packed V3 path, one per hop
pub fn decode_v3_fees(path: &[u8]) -> Result<Vec<u32>, RouteError> {
    decode_v3_path(path)?;
    let hops = (path.len() - ADDR_SIZE) / HOP_SIZE;
    Ok((0..hops)
        .map(|hop| {
            let start = ADDR_SIZE + hop * HOP_SIZE;
            u32::from_be_bytes([0, path[start], path[start + 1], path[start + 2]])
        })
        .collect())
}
