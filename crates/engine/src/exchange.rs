use gasless_swap_types::{Address, SwapRoute, U256};
use tracing::{debug, warn};

use crate::collaborators::{ExactInputSingle, Exchange, FungibleToken};
use crate::SwapError;

/// Routes the input asset to the base asset through the external exchange.
///
/// Proceeds are measured as the engine's base-asset balance delta around the
/// exchange call. That holds because nothing else moves the engine's balance
/// while a call is in flight. The same delta on the input asset must show the
/// whole pulled amount spent, so no owner tokens stay behind in the engine.
pub struct ExchangeAdapter<'a> {
    exchange: &'a dyn Exchange,
    tokens: &'a dyn FungibleToken,
    engine: Address,
    base_asset: Address,
}

impl<'a> ExchangeAdapter<'a> {
    pub fn new(
        exchange: &'a dyn Exchange,
        tokens: &'a dyn FungibleToken,
        engine: Address,
        base_asset: Address,
    ) -> Self {
        Self {
            exchange,
            tokens,
            engine,
            base_asset,
        }
    }

    /// Check the instruction before anything moves.
    ///
    /// Shape is always checked; the output asset only when a swap will run.
    pub fn validate(&self, input_asset: Address, route: &SwapRoute) -> Result<(), SwapError> {
        route.validate_shape()?;

        if input_asset == self.base_asset {
            return Ok(());
        }

        if let SwapRoute::Routed(routed) = route {
            let actual = routed.final_output_asset()?;
            if actual != self.base_asset {
                return Err(SwapError::UnexpectedOutputAsset {
                    expected: self.base_asset,
                    actual,
                });
            }
        }
        Ok(())
    }

    /// Returns the base-asset proceeds held by the engine
    pub fn swap(
        &self,
        input_asset: Address,
        amount: U256,
        route: &SwapRoute,
        deadline: u64,
    ) -> Result<U256, SwapError> {
        if input_asset == self.base_asset {
            debug!(%amount, "Input is already the base asset, skipping exchange");
            return Ok(amount);
        }

        let input_before = self.balance(input_asset)?;
        let before = self.balance(self.base_asset)?;

        let proceeds = match route {
            SwapRoute::SingleHop(hop) => {
                let params = ExactInputSingle {
                    token_in: input_asset,
                    token_out: self.base_asset,
                    fee: hop.pool_fee,
                    recipient: self.engine,
                    amount_in: amount,
                    amount_out_minimum: hop.amount_out_min,
                    sqrt_price_limit_x96: hop.sqrt_price_limit_x96,
                };
                let reported = self
                    .exchange
                    .exact_input_single(self.engine, &params)
                    .map_err(SwapError::ExchangeFailed)?;

                let proceeds = self.proceeds_since(before)?;
                if reported != proceeds {
                    warn!(%reported, measured = %proceeds, "Exchange reported a different output than it delivered");
                }
                proceeds
            }
            SwapRoute::Routed(routed) => {
                self.exchange
                    .execute(self.engine, &routed.commands, &routed.inputs, deadline)
                    .map_err(SwapError::ExchangeFailed)?;
                self.proceeds_since(before)?
            }
        };

        self.ensure_input_spent(input_asset, input_before, amount)?;
        if proceeds.is_zero() {
            return Err(SwapError::NoSwapProceeds);
        }
        Ok(proceeds)
    }

    /// The exchange must consume exactly what intake pulled
    fn ensure_input_spent(
        &self,
        input_asset: Address,
        before: U256,
        amount: U256,
    ) -> Result<(), SwapError> {
        let after = self.balance(input_asset)?;
        let spent = before.saturating_sub(after);
        if spent != amount {
            return Err(SwapError::UnspentInput {
                expected: amount,
                spent,
            });
        }
        Ok(())
    }

    fn balance(&self, asset: Address) -> Result<U256, SwapError> {
        self.tokens
            .balance_of(asset, self.engine)
            .map_err(SwapError::CollaboratorQueryFailed)
    }

    fn proceeds_since(&self, before: U256) -> Result<U256, SwapError> {
        let after = self.balance(self.base_asset)?;
        let proceeds = after.checked_sub(before).ok_or(SwapError::ArithmeticOverflow)?;
        debug!(%before, %after, %proceeds, "Measured exchange proceeds");
        Ok(proceeds)
    }
}
