use gasless_swap_types::{Address, FeeSchedule, FeeSplit, U256};
use tracing::debug;

use crate::collaborators::Host;
use crate::SwapError;

/// Pays the maintainer, then the owner. The treasury share never leaves the
/// engine's balance.
pub struct FeeDistributor<'a> {
    host: &'a dyn Host,
    engine: Address,
}

impl<'a> FeeDistributor<'a> {
    pub fn new(host: &'a dyn Host, engine: Address) -> Self {
        Self { host, engine }
    }

    pub fn distribute(
        &self,
        schedule: &FeeSchedule,
        proceeds: U256,
        owner: Address,
        maintainer: Address,
    ) -> Result<FeeSplit, SwapError> {
        let split = schedule.split(proceeds)?;

        self.pay(maintainer, split.maintainer)?;
        self.pay(owner, split.owner)?;

        debug!(
            %proceeds,
            owner_share = %split.owner,
            maintainer_share = %split.maintainer,
            treasury_share = %split.treasury,
            "Distributed proceeds"
        );
        Ok(split)
    }

    fn pay(&self, recipient: Address, amount: U256) -> Result<(), SwapError> {
        if amount.is_zero() {
            return Ok(());
        }

        self.host
            .transfer_native(self.engine, recipient, amount)
            .map_err(|source| SwapError::NativeTransferFailed { recipient, source })
    }
}
