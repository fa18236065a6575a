use gasless_swap_types::{Address, FeeError, RouteError, U256};
use thiserror::Error;

use crate::collaborators::CollaboratorError;

/// Every way an orchestration or administrative call can fail.
///
/// All of them abort the call; nothing is retried inside the engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SwapError {
    // ═══════════════════════════════════════════════════════════════════════════
    // AUTHORIZATION
    // ═══════════════════════════════════════════════════════════════════════════
    #[error("authorization expired: deadline {deadline}, now {now}")]
    AuthorizationExpired { deadline: u64, now: u64 },

    #[error("authorization was not signed by owner {owner}")]
    AuthorizationInvalidSigner { owner: Address },

    // ═══════════════════════════════════════════════════════════════════════════
    // ADDRESSES AND ACCESS
    // ═══════════════════════════════════════════════════════════════════════════
    #[error("owner address is zero")]
    ZeroOwner,

    #[error("recipient address is zero")]
    ZeroRecipient,

    #[error("maintainer address is zero")]
    ZeroMaintainer,

    #[error("collaborator address is zero: {0}")]
    ZeroCollaboratorAddress(&'static str),

    #[error("caller {0} is not a maintainer")]
    CallerNotMaintainer(Address),

    #[error("caller {0} is not the owner")]
    CallerNotOwner(Address),

    #[error("reentrant call")]
    ReentrantCall,

    // ═══════════════════════════════════════════════════════════════════════════
    // FEES AND TREASURY
    // ═══════════════════════════════════════════════════════════════════════════
    #[error("{which} fee {fee} exceeds maximum {max}")]
    FeeExceedsMaximum {
        which: &'static str,
        fee: U256,
        max: U256,
    },

    #[error("invalid fee configuration: {0}")]
    InvalidFeeConfiguration(String),

    #[error("treasury holds {available}, requested {requested}")]
    InsufficientTreasuryBalance { requested: U256, available: U256 },

    #[error("proceeds {proceeds} do not cover fees {required}")]
    InsufficientProceedsForFees { proceeds: U256, required: U256 },

    #[error("arithmetic overflow")]
    ArithmeticOverflow,

    // ═══════════════════════════════════════════════════════════════════════════
    // ROUTING
    // ═══════════════════════════════════════════════════════════════════════════
    #[error("routing commands are empty")]
    EmptyRoutingCommands,

    #[error("routing inputs are empty")]
    EmptyRoutingInputs,

    #[error("routing commands ({commands}) and inputs ({inputs}) differ in length")]
    MismatchedRoutingLengths { commands: usize, inputs: usize },

    #[error("malformed routing instruction: {0}")]
    MalformedRoutingInstruction(String),

    #[error("route ends in {actual}, expected base asset {expected}")]
    UnexpectedOutputAsset { expected: Address, actual: Address },

    #[error("exchange spent {spent} of the {expected} input pulled from the owner")]
    UnspentInput { expected: U256, spent: U256 },

    #[error("exchange delivered no base asset to the engine")]
    NoSwapProceeds,

    // ═══════════════════════════════════════════════════════════════════════════
    // COLLABORATORS
    // ═══════════════════════════════════════════════════════════════════════════
    #[error("token transfer failed: {0}")]
    TokenTransferFailed(CollaboratorError),

    #[error("exchange approval failed: {0}")]
    ApprovalFailed(CollaboratorError),

    #[error("exchange call failed: {0}")]
    ExchangeFailed(CollaboratorError),

    #[error("unwrap failed: {0}")]
    UnwrapFailed(CollaboratorError),

    #[error("unwrap credited {received}, expected at least {expected}")]
    InsufficientUnwrapOutput { expected: U256, received: U256 },

    #[error("native transfer to {recipient} failed: {source}")]
    NativeTransferFailed {
        recipient: Address,
        source: CollaboratorError,
    },

    #[error("collaborator query failed: {0}")]
    CollaboratorQueryFailed(CollaboratorError),
}

impl SwapError {
    /// Stable label for logs and metrics
    pub fn kind(&self) -> &'static str {
        match self {
            SwapError::AuthorizationExpired { .. } => "authorization_expired",
            SwapError::AuthorizationInvalidSigner { .. } => "authorization_invalid_signer",
            SwapError::ZeroOwner => "zero_owner",
            SwapError::ZeroRecipient => "zero_recipient",
            SwapError::ZeroMaintainer => "zero_maintainer",
            SwapError::ZeroCollaboratorAddress(_) => "zero_collaborator_address",
            SwapError::CallerNotMaintainer(_) => "caller_not_maintainer",
            SwapError::CallerNotOwner(_) => "caller_not_owner",
            SwapError::ReentrantCall => "reentrant_call",
            SwapError::FeeExceedsMaximum { .. } => "fee_exceeds_maximum",
            SwapError::InvalidFeeConfiguration(_) => "invalid_fee_configuration",
            SwapError::InsufficientTreasuryBalance { .. } => "insufficient_treasury_balance",
            SwapError::InsufficientProceedsForFees { .. } => "insufficient_proceeds_for_fees",
            SwapError::ArithmeticOverflow => "arithmetic_overflow",
            SwapError::EmptyRoutingCommands => "empty_routing_commands",
            SwapError::EmptyRoutingInputs => "empty_routing_inputs",
            SwapError::MismatchedRoutingLengths { .. } => "mismatched_routing_lengths",
            SwapError::MalformedRoutingInstruction(_) => "malformed_routing_instruction",
            SwapError::UnexpectedOutputAsset { .. } => "unexpected_output_asset",
            SwapError::UnspentInput { .. } => "unspent_input",
            SwapError::NoSwapProceeds => "no_swap_proceeds",
            SwapError::TokenTransferFailed(_) => "token_transfer_failed",
            SwapError::ApprovalFailed(_) => "approval_failed",
            SwapError::ExchangeFailed(_) => "exchange_failed",
            SwapError::UnwrapFailed(_) => "unwrap_failed",
            SwapError::InsufficientUnwrapOutput { .. } => "insufficient_unwrap_output",
            SwapError::NativeTransferFailed { .. } => "native_transfer_failed",
            SwapError::CollaboratorQueryFailed(_) => "collaborator_query_failed",
        }
    }
}

impl From<RouteError> for SwapError {
    fn from(err: RouteError) -> Self {
        match err {
            RouteError::EmptyCommands => SwapError::EmptyRoutingCommands,
            RouteError::EmptyInputs => SwapError::EmptyRoutingInputs,
            RouteError::MismatchedLengths { commands, inputs } => {
                SwapError::MismatchedRoutingLengths { commands, inputs }
            }
            RouteError::Malformed(reason) => SwapError::MalformedRoutingInstruction(reason),
        }
    }
}

impl From<FeeError> for SwapError {
    fn from(err: FeeError) -> Self {
        match err {
            FeeError::ExceedsMaximum { which, fee, max } => {
                SwapError::FeeExceedsMaximum { which, fee, max }
            }
            FeeError::InsufficientProceeds { proceeds, required } => {
                SwapError::InsufficientProceedsForFees { proceeds, required }
            }
            FeeError::InvalidSchedule(reason) => SwapError::InvalidFeeConfiguration(reason),
            FeeError::Overflow => SwapError::ArithmeticOverflow,
        }
    }
}
