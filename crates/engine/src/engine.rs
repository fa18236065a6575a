use std::sync::Arc;

use gasless_swap_types::{
    verify_authorization, Address, Bytes, CompletionRecord, EngineEvent, EventSink, FeeSchedule,
    PermitSignature, SwapRoute, B256, U256,
};
use parking_lot::RwLock;
use tracing::{debug, info, info_span, warn};

use crate::access::AccessRegistry;
use crate::collaborators::{Exchange, FungibleToken, Host, WrappedNative};
use crate::distributor::FeeDistributor;
use crate::exchange::ExchangeAdapter;
use crate::guard::{GuardStatus, ReentrancyGuard};
use crate::intake::{AssetIntake, PermitOutcome};
use crate::unwrap::Unwrapper;
use crate::SwapError;

// ═══════════════════════════════════════════════════════════════════════════
// REQUEST
// ═══════════════════════════════════════════════════════════════════════════

/// Everything a maintainer submits on an owner's behalf
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapRequest {
    pub input_asset: Address,
    /// Authorized amount; also the exchange input
    pub amount: U256,
    pub route: SwapRoute,
    pub owner: Address,
    pub metadata: Bytes,
    pub deadline: u64,
    pub signature: PermitSignature,
}

/// Pipeline stage, for logs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapStage {
    Validating,
    Intake,
    Exchanging,
    Unwrapping,
    Distributing,
}

// ═══════════════════════════════════════════════════════════════════════════
// ENGINE
// ═══════════════════════════════════════════════════════════════════════════

pub struct SwapEngine {
    address: Address,
    base_asset: Address,
    host: Arc<dyn Host>,
    tokens: Arc<dyn FungibleToken>,
    exchange: Arc<dyn Exchange>,
    wrapped: Arc<dyn WrappedNative>,
    access: RwLock<AccessRegistry>,
    fees: RwLock<FeeSchedule>,
    prevalidate: bool,
    guard: ReentrancyGuard,
    sinks: Vec<Arc<dyn EventSink>>,
}

impl std::fmt::Debug for SwapEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SwapEngine")
            .field("address", &self.address)
            .field("base_asset", &self.base_asset)
            .field("exchange", &self.exchange.address())
            .field("owner", &self.owner())
            .field("prevalidate", &self.prevalidate)
            .finish_non_exhaustive()
    }
}

impl SwapEngine {
    pub fn builder() -> SwapEngineBuilder {
        SwapEngineBuilder::default()
    }

    /// Pull, swap, unwrap and distribute in one all-or-nothing call.
    ///
    /// `caller` is the maintainer submitting the request.
    pub fn execute_swap(
        &self,
        caller: Address,
        request: SwapRequest,
    ) -> Result<CompletionRecord, SwapError> {
        let span = info_span!(
            "execute_swap",
            %caller,
            owner = %request.owner,
            input_asset = %request.input_asset,
        );
        let _entered = span.enter();

        let _token = self.guard.enter()?;

        debug!(stage = ?SwapStage::Validating, "Checking preconditions");
        self.check_preconditions(caller, &request)?;

        let checkpoint = self.host.checkpoint();
        match self.run_pipeline(caller, &request) {
            Ok(record) => {
                self.host.commit(checkpoint);
                info!(
                    amount_in = %record.amount_in,
                    proceeds = %record.total_proceeds,
                    to_owner = %record.amount_to_owner,
                    to_maintainer = %record.amount_to_maintainer,
                    to_treasury = %record.amount_to_treasury,
                    "Swap completed"
                );
                self.emit(EngineEvent::SwapCompleted(record.clone()));
                Ok(record)
            }
            Err(err) => {
                self.host.revert_to(checkpoint);
                warn!(error = %err, error_kind = err.kind(), "Swap aborted, state reverted");
                Err(err)
            }
        }
    }

    fn check_preconditions(&self, caller: Address, request: &SwapRequest) -> Result<(), SwapError> {
        self.access.read().ensure_maintainer(caller)?;

        if request.owner.is_zero() {
            return Err(SwapError::ZeroOwner);
        }

        let now = self.host.block_timestamp();
        if now > request.deadline {
            return Err(SwapError::AuthorizationExpired {
                deadline: request.deadline,
                now,
            });
        }

        self.exchange_adapter()
            .validate(request.input_asset, &request.route)
    }

    fn run_pipeline(
        &self,
        caller: Address,
        request: &SwapRequest,
    ) -> Result<CompletionRecord, SwapError> {
        let schedule = self.fees.read().clone();

        debug!(stage = ?SwapStage::Intake, amount = %request.amount, "Pulling tokens");
        let outcome = self.intake().pull_and_approve(
            request.input_asset,
            request.owner,
            request.amount,
            request.deadline,
            request.signature,
        )?;
        if let PermitOutcome::AlreadyConsumed { reason } = &outcome {
            debug!(%reason, "Proceeding on pre-existing allowance");
        }

        debug!(stage = ?SwapStage::Exchanging, "Routing to base asset");
        let proceeds = self.exchange_adapter().swap(
            request.input_asset,
            request.amount,
            &request.route,
            request.deadline,
        )?;

        debug!(stage = ?SwapStage::Unwrapping, %proceeds, "Unwrapping proceeds");
        let native = Unwrapper::new(self.wrapped.as_ref(), self.host.as_ref(), self.address)
            .unwrap(proceeds)?;

        debug!(stage = ?SwapStage::Distributing, %native, "Distributing proceeds");
        let split = FeeDistributor::new(self.host.as_ref(), self.address).distribute(
            &schedule,
            native,
            request.owner,
            caller,
        )?;

        Ok(CompletionRecord {
            owner: request.owner,
            input_asset: request.input_asset,
            amount_in: request.amount,
            total_proceeds: native,
            amount_to_owner: split.owner,
            amount_to_maintainer: split.maintainer,
            amount_to_treasury: split.treasury,
            metadata: request.metadata.clone(),
            maintainer: caller,
        })
    }

    fn intake(&self) -> AssetIntake<'_> {
        AssetIntake::new(
            self.tokens.as_ref(),
            self.address,
            self.exchange.address(),
            self.base_asset,
            self.prevalidate,
        )
    }

    fn exchange_adapter(&self) -> ExchangeAdapter<'_> {
        ExchangeAdapter::new(
            self.exchange.as_ref(),
            self.tokens.as_ref(),
            self.address,
            self.base_asset,
        )
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // ADMINISTRATION
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn set_maintainer(
        &self,
        caller: Address,
        maintainer: Address,
        enabled: bool,
    ) -> Result<(), SwapError> {
        let changed = {
            let mut access = self.access.write();
            access.ensure_owner(caller)?;
            access.set_maintainer(maintainer, enabled)?
        };

        info!(%maintainer, enabled, changed, "Maintainer updated");
        self.emit(EngineEvent::MaintainerUpdated {
            maintainer,
            enabled,
        });
        Ok(())
    }

    pub fn set_fee_parameters(
        &self,
        caller: Address,
        maintainer_fee: U256,
        treasury_fee: U256,
    ) -> Result<(), SwapError> {
        self.access.read().ensure_owner(caller)?;

        {
            let mut fees = self.fees.write();
            *fees = fees.with_fees(maintainer_fee, treasury_fee)?;
        }

        info!(%maintainer_fee, %treasury_fee, "Fee parameters updated");
        self.emit(EngineEvent::FeesUpdated {
            maintainer_fee,
            treasury_fee,
        });
        Ok(())
    }

    pub fn withdraw_treasury(
        &self,
        caller: Address,
        recipient: Address,
        amount: U256,
    ) -> Result<(), SwapError> {
        self.access.read().ensure_owner(caller)?;

        if recipient.is_zero() {
            return Err(SwapError::ZeroRecipient);
        }

        let available = self.treasury_balance();
        if amount > available {
            return Err(SwapError::InsufficientTreasuryBalance {
                requested: amount,
                available,
            });
        }

        self.host
            .transfer_native(self.address, recipient, amount)
            .map_err(|source| SwapError::NativeTransferFailed { recipient, source })?;

        info!(%recipient, %amount, "Treasury withdrawn");
        self.emit(EngineEvent::TreasuryWithdrawn { recipient, amount });
        Ok(())
    }

    pub fn transfer_ownership(&self, caller: Address, new_owner: Address) -> Result<(), SwapError> {
        let previous_owner = {
            let mut access = self.access.write();
            access.ensure_owner(caller)?;
            access.transfer_ownership(new_owner)?
        };

        info!(%previous_owner, %new_owner, "Ownership transferred");
        self.emit(EngineEvent::OwnershipTransferred {
            previous_owner,
            new_owner,
        });
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // QUERIES
    // ═══════════════════════════════════════════════════════════════════════════

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn base_asset(&self) -> Address {
        self.base_asset
    }

    pub fn owner(&self) -> Address {
        self.access.read().owner()
    }

    pub fn is_maintainer(&self, account: Address) -> bool {
        self.access.read().is_maintainer(account)
    }

    pub fn fee_schedule(&self) -> FeeSchedule {
        self.fees.read().clone()
    }

    /// The engine's own native balance
    pub fn treasury_balance(&self) -> U256 {
        self.host.native_balance(self.address)
    }

    pub fn guard_status(&self) -> GuardStatus {
        self.guard.status()
    }

    /// Pure signature check; usable without touching any collaborator
    #[allow(clippy::too_many_arguments)]
    pub fn verify_signature(
        &self,
        owner: Address,
        spender: Address,
        amount: U256,
        deadline: u64,
        nonce: U256,
        domain_separator: B256,
        signature: &PermitSignature,
    ) -> bool {
        verify_authorization(owner, spender, amount, deadline, nonce, domain_separator, signature)
    }

    /// Fan out to registered sinks; the engine keeps no event history
    fn emit(&self, event: EngineEvent) {
        for sink in &self.sinks {
            sink.publish(&event);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// BUILDER
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Default)]
pub struct SwapEngineBuilder {
    address: Option<Address>,
    owner: Option<Address>,
    host: Option<Arc<dyn Host>>,
    tokens: Option<Arc<dyn FungibleToken>>,
    exchange: Option<Arc<dyn Exchange>>,
    wrapped: Option<Arc<dyn WrappedNative>>,
    fees: FeeSchedule,
    prevalidate: Option<bool>,
    maintainers: Vec<Address>,
    sinks: Vec<Arc<dyn EventSink>>,
}

impl SwapEngineBuilder {
    /// The engine's own ledger address (spender in every authorization)
    pub fn address(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    pub fn owner(mut self, owner: Address) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn host(mut self, host: Arc<dyn Host>) -> Self {
        self.host = Some(host);
        self
    }

    pub fn tokens(mut self, tokens: Arc<dyn FungibleToken>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    pub fn exchange(mut self, exchange: Arc<dyn Exchange>) -> Self {
        self.exchange = Some(exchange);
        self
    }

    pub fn wrapped_native(mut self, wrapped: Arc<dyn WrappedNative>) -> Self {
        self.wrapped = Some(wrapped);
        self
    }

    pub fn fees(mut self, fees: FeeSchedule) -> Self {
        self.fees = fees;
        self
    }

    /// Verify signatures before touching the token (default: on)
    pub fn prevalidate_signatures(mut self, enabled: bool) -> Self {
        self.prevalidate = Some(enabled);
        self
    }

    pub fn maintainer(mut self, maintainer: Address) -> Self {
        self.maintainers.push(maintainer);
        self
    }

    pub fn event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn build(self) -> Result<SwapEngine, SwapError> {
        let address = non_zero(self.address, "engine")?;
        let host = self.host.ok_or(SwapError::ZeroCollaboratorAddress("host"))?;
        let tokens = self.tokens.ok_or(SwapError::ZeroCollaboratorAddress("tokens"))?;
        let exchange = self
            .exchange
            .ok_or(SwapError::ZeroCollaboratorAddress("exchange"))?;
        let wrapped = self
            .wrapped
            .ok_or(SwapError::ZeroCollaboratorAddress("wrapped native"))?;

        non_zero(Some(exchange.address()), "exchange")?;
        let base_asset = non_zero(Some(wrapped.address()), "wrapped native")?;

        let mut access = AccessRegistry::new(self.owner.unwrap_or(Address::ZERO))?;
        for maintainer in self.maintainers {
            access.set_maintainer(maintainer, true)?;
        }

        Ok(SwapEngine {
            address,
            base_asset,
            host,
            tokens,
            exchange,
            wrapped,
            access: RwLock::new(access),
            fees: RwLock::new(self.fees),
            prevalidate: self.prevalidate.unwrap_or(true),
            guard: ReentrancyGuard::new(),
            sinks: self.sinks,
        })
    }
}

fn non_zero(address: Option<Address>, what: &'static str) -> Result<Address, SwapError> {
    match address {
        Some(address) if !address.is_zero() => Ok(address),
        _ => Err(SwapError::ZeroCollaboratorAddress(what)),
    }
}
