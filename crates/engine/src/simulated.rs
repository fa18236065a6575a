//! In-memory ledger and router implementing every collaborator interface.
//!
//! Used by the test suites and the demo simulator. Token balances, native
//! balances, allowances and authorization nonces all live in one
//! snapshot-able ledger so a checkpoint covers every effect of a call.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use gasless_swap_types::route::{command, decode_v2, decode_v3, decode_v3_path};
use gasless_swap_types::{domain_separator, Address, Authorization, Bytes, B256, U256};
use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::collaborators::{
    Checkpoint, CollaboratorError, ExactInputSingle, Exchange, FungibleToken, Host, WrappedNative,
};

/// Version string every simulated token signs its domain with
pub const TOKEN_DOMAIN_VERSION: &str = "1";

#[derive(Debug, Clone, Default)]
struct TokenLedger {
    name: String,
    separator: B256,
    supports_permit: bool,
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    nonces: HashMap<Address, U256>,
}

#[derive(Debug, Clone, Default)]
struct Ledger {
    timestamp: u64,
    native: HashMap<Address, U256>,
    tokens: HashMap<Address, TokenLedger>,
}

#[derive(Debug, Default)]
struct ChainState {
    ledger: Ledger,
    snapshots: Vec<(u64, Ledger)>,
    next_checkpoint: u64,
    rejects_native: HashSet<Address>,
}

/// Host ledger, token registry and wrapped native asset in one
#[derive(Debug)]
pub struct SimulatedChain {
    chain_id: u64,
    wrapped: Address,
    state: Mutex<ChainState>,
}

impl SimulatedChain {
    /// A chain whose wrapped native token lives at `wrapped`
    pub fn new(chain_id: u64, wrapped: Address) -> Self {
        let chain = Self {
            chain_id,
            wrapped,
            state: Mutex::new(ChainState::default()),
        };
        chain.register_token(wrapped, "Wrapped Ether");
        chain
    }

    /// Deploy a permit-capable token
    pub fn register_token(&self, token: Address, name: &str) {
        let separator = domain_separator(name, TOKEN_DOMAIN_VERSION, self.chain_id, token);
        self.state.lock().ledger.tokens.insert(
            token,
            TokenLedger {
                name: name.to_string(),
                separator,
                supports_permit: true,
                ..Default::default()
            },
        );
    }

    /// Deploy a token with no signed-authorization entry point
    pub fn register_legacy_token(&self, token: Address, name: &str) {
        self.register_token(token, name);
        if let Some(ledger) = self.state.lock().ledger.tokens.get_mut(&token) {
            ledger.supports_permit = false;
        }
    }

    pub fn set_timestamp(&self, timestamp: u64) {
        self.state.lock().ledger.timestamp = timestamp;
    }

    pub fn advance_time(&self, seconds: u64) {
        let mut state = self.state.lock();
        state.ledger.timestamp = state.ledger.timestamp.saturating_add(seconds);
    }

    pub fn fund_native(&self, account: Address, amount: U256) {
        let mut state = self.state.lock();
        let balance = state.ledger.native.entry(account).or_default();
        *balance = balance.saturating_add(amount);
    }

    /// Credit `amount` of `token` out of thin air
    pub fn mint(&self, token: Address, account: Address, amount: U256) -> Result<(), CollaboratorError> {
        let mut state = self.state.lock();
        let ledger = token_mut(&mut state.ledger, token)?;
        let balance = ledger.balances.entry(account).or_default();
        *balance = balance.saturating_add(amount);
        Ok(())
    }

    /// Mint wrapped native, backed one-to-one by native held by the wrapper
    pub fn mint_wrapped(&self, account: Address, amount: U256) -> Result<(), CollaboratorError> {
        self.mint(self.wrapped, account, amount)?;
        self.fund_native(self.wrapped, amount);
        Ok(())
    }

    /// Make native transfers to `account` revert, like a contract with no
    /// payable fallback
    pub fn reject_native_transfers_to(&self, account: Address) {
        self.state.lock().rejects_native.insert(account);
    }

    /// Allowance lookup that treats unknown tokens as empty
    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        FungibleToken::allowance(self, token, owner, spender).unwrap_or_default()
    }

    /// Balance lookup that treats unknown tokens as empty
    pub fn token_balance(&self, token: Address, account: Address) -> U256 {
        self.balance_of(token, account).unwrap_or_default()
    }

    /// Move tokens the holder owns, no allowance involved
    pub fn transfer(
        &self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), CollaboratorError> {
        let mut state = self.state.lock();
        let ledger = token_mut(&mut state.ledger, token)?;
        move_balance(ledger, from, to, amount)
    }

    /// Open snapshots, innermost last
    pub fn checkpoint_depth(&self) -> usize {
        self.state.lock().snapshots.len()
    }
}

fn token_mut(ledger: &mut Ledger, token: Address) -> Result<&mut TokenLedger, CollaboratorError> {
    ledger
        .tokens
        .get_mut(&token)
        .ok_or_else(|| CollaboratorError::Unavailable(format!("no token deployed at {token}")))
}

fn move_balance(
    ledger: &mut TokenLedger,
    from: Address,
    to: Address,
    amount: U256,
) -> Result<(), CollaboratorError> {
    let from_balance = ledger.balances.get(&from).copied().unwrap_or_default();
    let remaining = from_balance
        .checked_sub(amount)
        .ok_or_else(|| CollaboratorError::reverted("transfer amount exceeds balance"))?;
    ledger.balances.insert(from, remaining);

    let to_balance = ledger.balances.entry(to).or_default();
    *to_balance = to_balance
        .checked_add(amount)
        .ok_or_else(|| CollaboratorError::reverted("balance overflow"))?;
    Ok(())
}

impl Host for SimulatedChain {
    fn block_timestamp(&self) -> u64 {
        self.state.lock().ledger.timestamp
    }

    fn native_balance(&self, account: Address) -> U256 {
        self.state
            .lock()
            .ledger
            .native
            .get(&account)
            .copied()
            .unwrap_or_default()
    }

    fn transfer_native(
        &self,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), CollaboratorError> {
        let mut state = self.state.lock();
        if state.rejects_native.contains(&to) {
            return Err(CollaboratorError::reverted(format!("{to} rejects native currency")));
        }

        let native = &mut state.ledger.native;
        let from_balance = native.get(&from).copied().unwrap_or_default();
        let remaining = from_balance
            .checked_sub(amount)
            .ok_or_else(|| CollaboratorError::reverted("insufficient native balance"))?;
        native.insert(from, remaining);

        let to_balance = native.entry(to).or_default();
        *to_balance = to_balance.saturating_add(amount);
        trace!(%from, %to, %amount, "Native transfer");
        Ok(())
    }

    fn checkpoint(&self) -> Checkpoint {
        let mut state = self.state.lock();
        let id = state.next_checkpoint;
        state.next_checkpoint += 1;
        let snapshot = state.ledger.clone();
        state.snapshots.push((id, snapshot));
        Checkpoint(id)
    }

    fn revert_to(&self, checkpoint: Checkpoint) {
        let mut state = self.state.lock();
        let Some(position) = state.snapshots.iter().position(|(id, _)| *id == checkpoint.0) else {
            return;
        };
        let mut discarded = state.snapshots.split_off(position);
        if let Some((_, ledger)) = discarded.drain(..).next() {
            state.ledger = ledger;
        }
        debug!(checkpoint = checkpoint.0, "Reverted ledger");
    }

    fn commit(&self, checkpoint: Checkpoint) {
        let mut state = self.state.lock();
        if let Some(position) = state.snapshots.iter().position(|(id, _)| *id == checkpoint.0) {
            state.snapshots.truncate(position);
        }
    }
}

impl FungibleToken for SimulatedChain {
    fn balance_of(&self, token: Address, account: Address) -> Result<U256, CollaboratorError> {
        let mut state = self.state.lock();
        let ledger = token_mut(&mut state.ledger, token)?;
        Ok(ledger.balances.get(&account).copied().unwrap_or_default())
    }

    fn nonces(&self, token: Address, owner: Address) -> Result<U256, CollaboratorError> {
        let mut state = self.state.lock();
        let ledger = token_mut(&mut state.ledger, token)?;
        Ok(ledger.nonces.get(&owner).copied().unwrap_or_default())
    }

    fn domain_separator(&self, token: Address) -> Result<B256, CollaboratorError> {
        let mut state = self.state.lock();
        Ok(token_mut(&mut state.ledger, token)?.separator)
    }

    fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256, CollaboratorError> {
        let mut state = self.state.lock();
        let ledger = token_mut(&mut state.ledger, token)?;
        Ok(ledger.allowances.get(&(owner, spender)).copied().unwrap_or_default())
    }

    fn permit(&self, token: Address, authorization: &Authorization) -> Result<(), CollaboratorError> {
        let mut state = self.state.lock();
        let now = state.ledger.timestamp;
        let ledger = token_mut(&mut state.ledger, token)?;

        if !ledger.supports_permit {
            return Err(CollaboratorError::Unavailable(format!(
                "{} has no permit entry point",
                ledger.name
            )));
        }
        if authorization.is_expired(now) {
            return Err(CollaboratorError::reverted("permit expired"));
        }

        let nonce = ledger
            .nonces
            .get(&authorization.owner)
            .copied()
            .unwrap_or_default();
        if authorization.nonce != nonce || !authorization.verify(ledger.separator) {
            return Err(CollaboratorError::reverted("invalid signature"));
        }

        ledger.nonces.insert(authorization.owner, nonce + U256::from(1u8));
        ledger.allowances.insert(
            (authorization.owner, authorization.spender),
            authorization.amount,
        );
        Ok(())
    }

    fn transfer_from(
        &self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), CollaboratorError> {
        let mut state = self.state.lock();
        let ledger = token_mut(&mut state.ledger, token)?;

        if spender != from {
            let allowance = ledger
                .allowances
                .get(&(from, spender))
                .copied()
                .unwrap_or_default();
            let remaining = allowance
                .checked_sub(amount)
                .ok_or_else(|| CollaboratorError::reverted("insufficient allowance"))?;
            ledger.allowances.insert((from, spender), remaining);
        }

        move_balance(ledger, from, to, amount)
    }

    fn approve(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), CollaboratorError> {
        let mut state = self.state.lock();
        let ledger = token_mut(&mut state.ledger, token)?;
        ledger.allowances.insert((owner, spender), amount);
        Ok(())
    }
}

impl WrappedNative for SimulatedChain {
    fn address(&self) -> Address {
        self.wrapped
    }

    fn withdraw(&self, holder: Address, amount: U256) -> Result<(), CollaboratorError> {
        {
            let mut state = self.state.lock();
            let ledger = token_mut(&mut state.ledger, self.wrapped)?;
            let balance = ledger.balances.get(&holder).copied().unwrap_or_default();
            let remaining = balance
                .checked_sub(amount)
                .ok_or_else(|| CollaboratorError::reverted("burn amount exceeds balance"))?;
            ledger.balances.insert(holder, remaining);
        }
        self.transfer_native(self.wrapped, holder, amount)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// ROUTER
// ═══════════════════════════════════════════════════════════════════════════

/// Recipient placeholder for "whoever called the router"
pub const MSG_SENDER: Address = Address::with_last_byte(1);

/// Recipient placeholder for "the router itself"
pub const ADDRESS_THIS: Address = Address::with_last_byte(2);

/// Constant-rate exchange over the simulated chain.
///
/// Each pool is a directed pair with a `numerator / denominator` rate. The
/// router pays out of its own token balances, so it must be seeded with
/// liquidity.
#[derive(Debug)]
pub struct SimulatedRouter {
    address: Address,
    chain: Arc<SimulatedChain>,
    rates: Mutex<HashMap<(Address, Address), (U256, U256)>>,
}

impl SimulatedRouter {
    pub fn new(address: Address, chain: Arc<SimulatedChain>) -> Self {
        Self {
            address,
            chain,
            rates: Mutex::new(HashMap::new()),
        }
    }

    /// One unit of `token_in` buys `numerator / denominator` of `token_out`
    pub fn set_rate(&self, token_in: Address, token_out: Address, numerator: U256, denominator: U256) {
        self.rates
            .lock()
            .insert((token_in, token_out), (numerator, denominator));
    }

    pub fn quote(
        &self,
        token_in: Address,
        token_out: Address,
        amount_in: U256,
    ) -> Result<U256, CollaboratorError> {
        let (numerator, denominator) = self.rate(token_in, token_out)?;
        amount_in
            .checked_mul(numerator)
            .map(|scaled| scaled / denominator)
            .ok_or_else(|| CollaboratorError::reverted("quote overflow"))
    }

    fn rate(&self, token_in: Address, token_out: Address) -> Result<(U256, U256), CollaboratorError> {
        let (numerator, denominator) = self
            .rates
            .lock()
            .get(&(token_in, token_out))
            .copied()
            .ok_or_else(|| CollaboratorError::reverted(format!("no pool {token_in} -> {token_out}")))?;
        if numerator.is_zero() || denominator.is_zero() {
            return Err(CollaboratorError::reverted("pool has a zero rate"));
        }
        Ok((numerator, denominator))
    }

    fn quote_path(&self, path: &[Address], amount_in: U256) -> Result<U256, CollaboratorError> {
        path.windows(2)
            .try_fold(amount_in, |amount, pair| self.quote(pair[0], pair[1], amount))
    }

    /// Input needed along `path` (input-first) to receive `amount_out`, rounded up
    fn quote_path_in(&self, path: &[Address], amount_out: U256) -> Result<U256, CollaboratorError> {
        path.windows(2).rev().try_fold(amount_out, |amount, pair| {
            let (numerator, denominator) = self.rate(pair[0], pair[1])?;
            amount
                .checked_mul(denominator)
                .map(|scaled| (scaled + numerator - U256::from(1)) / numerator)
                .ok_or_else(|| CollaboratorError::reverted("quote overflow"))
        })
    }

    fn resolve(&self, caller: Address, recipient: Address) -> Address {
        match recipient {
            r if r == MSG_SENDER => caller,
            r if r == ADDRESS_THIS => self.address,
            r => r,
        }
    }

    /// Pull input, pay output along a multi-hop path
    fn swap_path(
        &self,
        caller: Address,
        payer_is_user: bool,
        path: &[Address],
        amount_in: U256,
        amount_out_min: U256,
        recipient: Address,
    ) -> Result<U256, CollaboratorError> {
        let amount_out = self.quote_path(path, amount_in)?;
        if amount_out < amount_out_min {
            return Err(CollaboratorError::reverted("too little received"));
        }
        self.settle(caller, payer_is_user, path, amount_in, amount_out, recipient)?;
        Ok(amount_out)
    }

    /// Pay exactly `amount_out`, pulling whatever input that costs
    fn swap_path_exact_out(
        &self,
        caller: Address,
        payer_is_user: bool,
        path: &[Address],
        amount_out: U256,
        amount_in_max: U256,
        recipient: Address,
    ) -> Result<U256, CollaboratorError> {
        let amount_in = self.quote_path_in(path, amount_out)?;
        if amount_in > amount_in_max {
            return Err(CollaboratorError::reverted("too much requested"));
        }
        self.settle(caller, payer_is_user, path, amount_in, amount_out, recipient)?;
        Ok(amount_in)
    }

    fn settle(
        &self,
        caller: Address,
        payer_is_user: bool,
        path: &[Address],
        amount_in: U256,
        amount_out: U256,
        recipient: Address,
    ) -> Result<(), CollaboratorError> {
        let (Some(&token_in), Some(&token_out)) = (path.first(), path.last()) else {
            return Err(CollaboratorError::reverted("empty path"));
        };

        if payer_is_user {
            self.chain
                .transfer_from(token_in, self.address, caller, self.address, amount_in)?;
        }
        self.chain.transfer(token_out, self.address, recipient, amount_out)?;

        debug!(%token_in, %token_out, %amount_in, %amount_out, "Router swap");
        Ok(())
    }

    fn run_command(&self, caller: Address, raw: u8, input: &[u8]) -> Result<(), CollaboratorError> {
        let malformed = |e: gasless_swap_types::RouteError| CollaboratorError::reverted(e.to_string());

        match command::kind(raw) {
            command::V3_SWAP_EXACT_IN => {
                let (recipient, amount_in, amount_out_min, path, payer_is_user) =
                    decode_v3(input).map_err(malformed)?;
                let tokens = decode_v3_path(&path).map_err(malformed)?;
                let recipient = self.resolve(caller, recipient);
                self.swap_path(caller, payer_is_user, &tokens, amount_in, amount_out_min, recipient)?;
                Ok(())
            }
            command::V2_SWAP_EXACT_IN => {
                let (recipient, amount_in, amount_out_min, path, payer_is_user) =
                    decode_v2(input).map_err(malformed)?;
                let recipient = self.resolve(caller, recipient);
                self.swap_path(caller, payer_is_user, &path, amount_in, amount_out_min, recipient)?;
                Ok(())
            }
            command::V3_SWAP_EXACT_OUT => {
                let (recipient, amount_out, amount_in_max, path, payer_is_user) =
                    decode_v3(input).map_err(malformed)?;
                // Exact-output paths are packed output-first
                let mut tokens = decode_v3_path(&path).map_err(malformed)?;
                tokens.reverse();
                let recipient = self.resolve(caller, recipient);
                self.swap_path_exact_out(caller, payer_is_user, &tokens, amount_out, amount_in_max, recipient)?;
                Ok(())
            }
            command::V2_SWAP_EXACT_OUT => {
                let (recipient, amount_out, amount_in_max, path, payer_is_user) =
                    decode_v2(input).map_err(malformed)?;
                let recipient = self.resolve(caller, recipient);
                self.swap_path_exact_out(caller, payer_is_user, &path, amount_out, amount_in_max, recipient)?;
                Ok(())
            }
            other => Err(CollaboratorError::reverted(format!(
                "unsupported command {other:#04x}"
            ))),
        }
    }
}

impl Exchange for SimulatedRouter {
    fn address(&self) -> Address {
        self.address
    }

    fn exact_input_single(
        &self,
        caller: Address,
        params: &ExactInputSingle,
    ) -> Result<U256, CollaboratorError> {
        let recipient = self.resolve(caller, params.recipient);
        self.swap_path(
            caller,
            true,
            &[params.token_in, params.token_out],
            params.amount_in,
            params.amount_out_minimum,
            recipient,
        )
    }

    fn execute(
        &self,
        caller: Address,
        commands: &[u8],
        inputs: &[Bytes],
        deadline: u64,
    ) -> Result<(), CollaboratorError> {
        if self.chain.block_timestamp() > deadline {
            return Err(CollaboratorError::reverted("transaction deadline passed"));
        }
        if commands.len() != inputs.len() {
            return Err(CollaboratorError::reverted("length mismatch"));
        }

        for (raw, input) in commands.iter().zip(inputs) {
            let checkpoint = self.chain.checkpoint();
            match self.run_command(caller, *raw, input) {
                Ok(()) => self.chain.commit(checkpoint),
                Err(err) => {
                    self.chain.revert_to(checkpoint);
                    if raw & command::FLAG_ALLOW_REVERT == 0 {
                        return Err(err);
                    }
                    debug!(command = *raw, error = %err, "Allowed command failed, continuing");
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gasless_swap_types::route::encode_v3_path;
    use gasless_swap_types::{address_of, sign_permit, Permit, RoutedSwap};

    fn weth() -> Address {
        Address::repeat_byte(0xee)
    }

    fn usdc() -> Address {
        Address::repeat_byte(0xaa)
    }

    #[test]
    fn test_checkpoint_revert_restores_everything() {
        let chain = SimulatedChain::new(1, weth());
        let alice = Address::repeat_byte(1);
        chain.fund_native(alice, U256::from(10u64));

        let checkpoint = chain.checkpoint();
        chain.fund_native(alice, U256::from(5u64));
        chain.mint_wrapped(alice, U256::from(7u64)).unwrap();
        chain.revert_to(checkpoint);

        assert_eq!(chain.native_balance(alice), U256::from(10u64));
        assert_eq!(chain.token_balance(weth(), alice), U256::ZERO);
        assert_eq!(chain.checkpoint_depth(), 0);
    }

    #[test]
    fn test_nested_commit_keeps_outer_checkpoint() {
        let chain = SimulatedChain::new(1, weth());
        let alice = Address::repeat_byte(1);

        let outer = chain.checkpoint();
        let inner = chain.checkpoint();
        chain.fund_native(alice, U256::from(3u64));
        chain.commit(inner);
        assert_eq!(chain.checkpoint_depth(), 1);

        chain.revert_to(outer);
        assert_eq!(chain.native_balance(alice), U256::ZERO);
    }

    #[test]
    fn test_permit_consumes_nonce_once() {
        let chain = SimulatedChain::new(1, weth());
        chain.register_token(usdc(), "USD Coin");

        let key = [0x11u8; 32];
        let owner = address_of(&key).unwrap();
        let spender = Address::repeat_byte(0x42);
        let permit = Permit {
            owner,
            spender,
            value: U256::from(100u64),
            nonce: U256::ZERO,
            deadline: U256::from(1_000u64),
        };
        let separator = chain.domain_separator(usdc()).unwrap();
        let signature = sign_permit(&permit, separator, &key).unwrap();
        let authorization = Authorization {
            owner,
            spender,
            amount: U256::from(100u64),
            deadline: 1_000,
            nonce: U256::ZERO,
            signature,
        };

        chain.permit(usdc(), &authorization).unwrap();
        assert_eq!(chain.allowance(usdc(), owner, spender), U256::from(100u64));
        assert_eq!(chain.nonces(usdc(), owner).unwrap(), U256::from(1u64));

        assert!(chain.permit(usdc(), &authorization).is_err());
    }

    #[test]
    fn test_withdraw_converts_wrapped_to_native() {
        let chain = SimulatedChain::new(1, weth());
        let holder = Address::repeat_byte(3);
        chain.mint_wrapped(holder, U256::from(50u64)).unwrap();

        chain.withdraw(holder, U256::from(20u64)).unwrap();

        assert_eq!(chain.token_balance(weth(), holder), U256::from(30u64));
        assert_eq!(chain.native_balance(holder), U256::from(20u64));
        assert_eq!(chain.native_balance(weth()), U256::from(30u64));
    }

    #[test]
    fn test_router_allow_revert_command_is_skipped() {
        let chain = Arc::new(SimulatedChain::new(1, weth()));
        chain.register_token(usdc(), "USD Coin");
        let router = SimulatedRouter::new(Address::repeat_byte(0x99), chain.clone());
        let caller = Address::repeat_byte(5);

        let commands = vec![0x3f | command::FLAG_ALLOW_REVERT];
        let inputs = vec![Bytes::from(vec![0u8; 32])];
        router.execute(caller, &commands, &inputs, 10).unwrap();

        let strict = vec![0x3fu8];
        assert!(router.execute(caller, &strict, &inputs, 10).is_err());
    }

    #[test]
    fn test_router_exact_out_pulls_only_the_quoted_input() {
        let chain = Arc::new(SimulatedChain::new(1, weth()));
        chain.register_token(usdc(), "USD Coin");
        let router_address = Address::repeat_byte(0x99);
        let router = SimulatedRouter::new(router_address, chain.clone());
        // 3 USDC buys 1 WETH unit
        router.set_rate(usdc(), weth(), U256::from(1u64), U256::from(3u64));
        chain.mint_wrapped(router_address, U256::from(100u64)).unwrap();

        let caller = Address::repeat_byte(5);
        chain.mint(usdc(), caller, U256::from(1_000u64)).unwrap();
        chain.approve(usdc(), caller, router_address, U256::from(1_000u64)).unwrap();

        let route = RoutedSwap::v2_exact_out(caller, U256::from(10u64), U256::from(40u64), vec![usdc(), weth()]);
        router.execute(caller, &route.commands, &route.inputs, 10).unwrap();

        assert_eq!(chain.token_balance(weth(), caller), U256::from(10u64));
        assert_eq!(chain.token_balance(usdc(), caller), U256::from(970u64));
        assert_eq!(chain.allowance(usdc(), caller, router_address), U256::from(970u64));

        let greedy = RoutedSwap::v2_exact_out(caller, U256::from(10u64), U256::from(29u64), vec![usdc(), weth()]);
        assert!(router.execute(caller, &greedy.commands, &greedy.inputs, 10).is_err());
        assert_eq!(chain.token_balance(usdc(), caller), U256::from(970u64));
    }

    #[test]
    fn test_router_v3_exact_out_reads_path_output_first() {
        let chain = Arc::new(SimulatedChain::new(1, weth()));
        chain.register_token(usdc(), "USD Coin");
        let router_address = Address::repeat_byte(0x99);
        let router = SimulatedRouter::new(router_address, chain.clone());
        // 5 USDC buys 2 WETH units
        router.set_rate(usdc(), weth(), U256::from(2u64), U256::from(5u64));
        chain.mint_wrapped(router_address, U256::from(100u64)).unwrap();

        let caller = Address::repeat_byte(5);
        chain.mint(usdc(), caller, U256::from(1_000u64)).unwrap();
        chain.approve(usdc(), caller, router_address, U256::from(1_000u64)).unwrap();

        // 7 units cost 17.5, rounded up to 18
        let path = encode_v3_path(&[weth(), usdc()], &[500]).unwrap();
        let route = RoutedSwap::v3_exact_out(MSG_SENDER, U256::from(7u64), U256::from(18u64), path);
        router.execute(caller, &route.commands, &route.inputs, 10).unwrap();

        assert_eq!(chain.token_balance(weth(), caller), U256::from(7u64));
        assert_eq!(chain.token_balance(usdc(), caller), U256::from(982u64));
    }
}
