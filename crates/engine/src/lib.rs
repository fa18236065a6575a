//! Signature-authorized swap-and-distribute engine.
//!
//! A maintainer submits an owner's signed authorization; the engine pulls the
//! owner's tokens, routes them to the base asset, unwraps to native currency
//! and splits the proceeds between owner, maintainer and treasury. Any
//! failure reverts every effect of the call.

pub mod access;
pub mod collaborators;
pub mod distributor;
pub mod engine;
pub mod error;
pub mod exchange;
pub mod guard;
pub mod intake;
pub mod simulated;
pub mod unwrap;


pub use access::AccessRegistry;
pub use collaborators::*;
pub use distributor::FeeDistributor;
pub use engine::{SwapEngine, SwapEngineBuilder, SwapRequest, SwapStage};
pub use error::*;
pub use exchange::ExchangeAdapter;
pub use guard::{GuardStatus, GuardToken, ReentrancyGuard};
pub use intake::{AssetIntake, PermitOutcome};
pub use simulated::{SimulatedChain, SimulatedRouter};
pub use unwrap::Unwrapper;
