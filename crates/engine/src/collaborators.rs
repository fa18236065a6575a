//! Interfaces the engine consumes but does not implement.
//!
//! Every call is synchronous and runs inside the caller's unit of execution.
//! Implementations that share state (a token ledger touched by both the
//! exchange and the wrapped native asset) are expected to use interior
//! mutability; the engine only ever holds shared references.

use gasless_swap_types::{Address, Authorization, Bytes, B256, U256};
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CollaboratorError {
    /// The callee rejected the call
    #[error("reverted: {0}")]
    Reverted(String),

    /// The callee does not exist or does not implement the call
    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl CollaboratorError {
    pub fn reverted(reason: impl Into<String>) -> Self {
        CollaboratorError::Reverted(reason.into())
    }
}

/// Opaque handle for a host-ledger checkpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Checkpoint(pub u64);

/// The ledger the engine executes on: clock, native currency, atomicity
pub trait Host: Send + Sync {
    /// Current block time in seconds
    fn block_timestamp(&self) -> u64;

    fn native_balance(&self, account: Address) -> U256;

    fn transfer_native(
        &self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), CollaboratorError>;

    /// Begin an all-or-nothing section
    fn checkpoint(&self) -> Checkpoint;

    /// Undo every mutation since `checkpoint`
    fn revert_to(&self, checkpoint: Checkpoint);

    /// Keep every mutation since `checkpoint`
    fn commit(&self, checkpoint: Checkpoint);
}

/// Fungible tokens with signed-authorization support, addressed by token
pub trait FungibleToken: Send + Sync {
    fn balance_of(&self, token: Address, account: Address) -> Result<U256, CollaboratorError>;

    /// Next authorization nonce for `owner`
    fn nonces(&self, token: Address, owner: Address) -> Result<U256, CollaboratorError>;

    fn domain_separator(&self, token: Address) -> Result<B256, CollaboratorError>;

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256, CollaboratorError>;

    /// Consume a signed authorization, granting `spender` an allowance
    fn permit(&self, token: Address, authorization: &Authorization) -> Result<(), CollaboratorError>;

    fn transfer_from(
        &self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), CollaboratorError>;

    fn approve(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), CollaboratorError>;
}

/// Parameters of a fixed single-pool exact-input swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactInputSingle {
    pub token_in: Address,
    pub token_out: Address,
    pub fee: u32,
    pub recipient: Address,
    pub amount_in: U256,
    pub amount_out_minimum: U256,
    pub sqrt_price_limit_x96: U256,
}

/// External exchange, callable either way
pub trait Exchange: Send + Sync {
    /// Address token allowances are granted to
    fn address(&self) -> Address;

    /// Returns the amount the exchange claims to have delivered
    fn exact_input_single(
        &self,
        caller: Address,
        params: &ExactInputSingle,
    ) -> Result<U256, CollaboratorError>;

    /// Run an opaque command program; delivers nothing back but side effects
    fn execute(
        &self,
        caller: Address,
        commands: &[u8],
        inputs: &[Bytes],
        deadline: u64,
    ) -> Result<(), CollaboratorError>;
}

/// The base asset: a token that converts one-to-one into native currency
pub trait WrappedNative: Send + Sync {
    fn address(&self) -> Address;

    /// Burn `amount` of `holder`'s wrapped balance and credit native currency
    fn withdraw(&self, holder: Address, amount: U256) -> Result<(), CollaboratorError>;
}
