use gasless_swap_types::{Address, Authorization, PermitSignature, B256, U256};
use tracing::{debug, warn};

use crate::collaborators::{CollaboratorError, FungibleToken};
use crate::SwapError;

/// What happened to the signed authorization on the token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermitOutcome {
    /// The token accepted and consumed it
    Consumed,
    /// The token refused it, typically because someone else submitted it
    /// first. Not fatal on its own: the transfer decides.
    AlreadyConsumed { reason: String },
}

/// Pulls an owner's tokens into the engine and readies them for routing
pub struct AssetIntake<'a> {
    tokens: &'a dyn FungibleToken,
    engine: Address,
    exchange: Address,
    base_asset: Address,
    prevalidate: bool,
}

impl<'a> AssetIntake<'a> {
    pub fn new(
        tokens: &'a dyn FungibleToken,
        engine: Address,
        exchange: Address,
        base_asset: Address,
        prevalidate: bool,
    ) -> Self {
        Self {
            tokens,
            engine,
            exchange,
            base_asset,
            prevalidate,
        }
    }

    /// Reconstruct the authorization the owner signed, using the token's
    /// current nonce for them.
    pub fn authorization(
        &self,
        token: Address,
        owner: Address,
        amount: U256,
        deadline: u64,
        signature: PermitSignature,
    ) -> Result<Authorization, SwapError> {
        let nonce = self
            .tokens
            .nonces(token, owner)
            .map_err(SwapError::CollaboratorQueryFailed)?;

        Ok(Authorization {
            owner,
            spender: self.engine,
            amount,
            deadline,
            nonce,
            signature,
        })
    }

    /// Fail fast if the signature does not belong to the owner.
    ///
    /// A signature made for the previous nonce is accepted when the allowance
    /// it granted is still unspent, so a front-run submission of the same
    /// authorization does not block the swap.
    pub fn prevalidate(&self, token: Address, authorization: &Authorization) -> Result<(), SwapError> {
        let separator = self
            .tokens
            .domain_separator(token)
            .map_err(SwapError::CollaboratorQueryFailed)?;

        if authorization.verify(separator) || self.already_granted(token, authorization, separator)? {
            return Ok(());
        }
        Err(SwapError::AuthorizationInvalidSigner {
            owner: authorization.owner,
        })
    }

    fn already_granted(
        &self,
        token: Address,
        authorization: &Authorization,
        separator: B256,
    ) -> Result<bool, SwapError> {
        if authorization.nonce.is_zero() {
            return Ok(false);
        }
        let previous = Authorization {
            nonce: authorization.nonce - U256::from(1u8),
            ..authorization.clone()
        };
        if !previous.verify(separator) {
            return Ok(false);
        }

        let allowance = self
            .tokens
            .allowance(token, authorization.owner, self.engine)
            .map_err(SwapError::CollaboratorQueryFailed)?;
        if allowance < authorization.amount {
            return Ok(false);
        }
        debug!(
            %token,
            owner = %authorization.owner,
            nonce = %previous.nonce,
            "Authorization already submitted by someone else, allowance still in place"
        );
        Ok(true)
    }

    pub fn pull_and_approve(
        &self,
        token: Address,
        owner: Address,
        amount: U256,
        deadline: u64,
        signature: PermitSignature,
    ) -> Result<PermitOutcome, SwapError> {
        let authorization = self.authorization(token, owner, amount, deadline, signature)?;

        if self.prevalidate {
            self.prevalidate(token, &authorization)?;
        }

        let outcome = self.consume(token, &authorization);

        self.tokens
            .transfer_from(token, self.engine, owner, self.engine, amount)
            .map_err(SwapError::TokenTransferFailed)?;
        debug!(%token, %owner, %amount, "Pulled tokens into engine");

        if token != self.base_asset {
            self.tokens
                .approve(token, self.engine, self.exchange, amount)
                .map_err(SwapError::ApprovalFailed)?;
            debug!(%token, spender = %self.exchange, %amount, "Approved exchange");
        }

        Ok(outcome)
    }

    fn consume(&self, token: Address, authorization: &Authorization) -> PermitOutcome {
        match self.tokens.permit(token, authorization) {
            Ok(()) => PermitOutcome::Consumed,
            Err(err) => {
                warn!(
                    %token,
                    owner = %authorization.owner,
                    nonce = %authorization.nonce,
                    error = %err,
                    "Authorization not consumed, relying on existing allowance"
                );
                PermitOutcome::AlreadyConsumed {
                    reason: describe(&err),
                }
            }
        }
    }
}

fn describe(err: &CollaboratorError) -> String {
    match err {
        CollaboratorError::Reverted(reason) | CollaboratorError::Unavailable(reason) => {
            reason.clone()
        }
    }
}
