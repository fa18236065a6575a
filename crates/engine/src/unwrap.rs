use gasless_swap_types::{Address, U256};
use tracing::debug;

use crate::collaborators::{Host, WrappedNative};
use crate::SwapError;

/// Converts the engine's base-asset holdings into native currency
pub struct Unwrapper<'a> {
    wrapped: &'a dyn WrappedNative,
    host: &'a dyn Host,
    engine: Address,
}

impl<'a> Unwrapper<'a> {
    pub fn new(wrapped: &'a dyn WrappedNative, host: &'a dyn Host, engine: Address) -> Self {
        Self {
            wrapped,
            host,
            engine,
        }
    }

    /// Fails unless native balance grew by at least `amount`
    pub fn unwrap(&self, amount: U256) -> Result<U256, SwapError> {
        let before = self.host.native_balance(self.engine);

        self.wrapped
            .withdraw(self.engine, amount)
            .map_err(SwapError::UnwrapFailed)?;

        let after = self.host.native_balance(self.engine);
        let received = after.saturating_sub(before);
        if received < amount {
            return Err(SwapError::InsufficientUnwrapOutput {
                expected: amount,
                received,
            });
        }

        debug!(%amount, %received, "Unwrapped base asset");
        Ok(amount)
    }
}
