//! Shared types for the gasless swap-and-distribute engine
//!
//! - [`authorization`]: the owner-signed grant and its typed-data message
//! - [`verification`]: typed-data hashing and signer recovery
//! - [`route`]: single-hop and generalized routing instructions
//! - [`fees`]: fee schedule and proceeds split
//! - [`event`]: completion records and engine events

pub mod authorization;
pub mod event;
pub mod fees;
pub mod route;
pub mod verification;

pub use authorization::*;
pub use event::*;
pub use fees::*;
pub use route::{RouteError, RoutedSwap, SingleHopSwap, SwapRoute};
pub use verification::{
    address_of, domain_separator, permit_digest, recover_signer, sign_permit,
    verify_authorization, VerificationError,
};

pub use alloy_primitives::{Address, Bytes, B256, U256};
