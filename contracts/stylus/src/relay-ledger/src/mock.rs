//! In-memory store and host for driving the processor without a chain.

use std::collections::{BTreeMap, BTreeSet};

use alloy_primitives::{Address, FixedBytes, U256};
use relay_encoder::{signer::recover_signer, tokens::MockTokens};
use relay_types::{Allowance, Revert, SigningDomain};

use crate::{
    events::LedgerEvent,
    host::{LedgerHost, LedgerStore},
};

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pub allowances: BTreeMap<(Address, Address, Address), Allowance>,
    pub balances: BTreeMap<(Address, Address), U256>,
    pub used: BTreeSet<(Address, FixedBytes<32>)>,
}

impl LedgerStore for MemoryStore {
    fn allowance(&self, owner: Address, signer: Address, token: Address) -> Allowance {
        self.allowances
            .get(&(owner, signer, token))
            .copied()
            .unwrap_or_default()
    }

    fn set_allowance(&mut self, owner: Address, signer: Address, token: Address, allowance: Allowance) {
        self.allowances.insert((owner, signer, token), allowance);
    }

    fn balance(&self, owner: Address, token: Address) -> U256 {
        self.balances.get(&(owner, token)).copied().unwrap_or_default()
    }

    fn set_balance(&mut self, owner: Address, token: Address, amount: U256) {
        self.balances.insert((owner, token), amount);
    }

    fn is_nonce_used(&self, signer: Address, nonce: FixedBytes<32>) -> bool {
        self.used.contains(&(signer, nonce))
    }

    fn mark_nonce_used(&mut self, signer: Address, nonce: FixedBytes<32>) {
        self.used.insert((signer, nonce));
    }
}

#[derive(Clone, Debug)]
pub struct MockHost {
    pub now: u64,
    pub domain: SigningDomain,
    pub tokens: MockTokens,
    pub events: Vec<LedgerEvent>,
}

impl MockHost {
    pub fn new(now: u64, domain: SigningDomain) -> Self {
        Self {
            now,
            domain,
            tokens: MockTokens::new(),
            events: Vec::new(),
        }
    }
}

impl LedgerHost for MockHost {
    fn now(&self) -> u64 {
        self.now
    }

    fn domain(&self) -> SigningDomain {
        self.domain
    }

    fn recover(&self, digest: FixedBytes<32>, signature: &[u8]) -> Address {
        recover_signer(digest, signature).unwrap_or(Address::ZERO)
    }

    fn transfer_from(&mut self, token: Address, from: Address, to: Address, amount: U256) -> Result<(), Revert> {
        let spender = self.this();
        self.tokens.transfer_from(token, spender, from, to, amount)
    }

    fn transfer(&mut self, token: Address, to: Address, amount: U256) -> Result<(), Revert> {
        let this = self.this();
        self.tokens.transfer(token, this, to, amount)
    }

    fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }
}

/// Run `f` as one transaction: on error both store and host roll back, like an EVM revert.
pub fn transact<T, E>(
    store: &mut MemoryStore,
    host: &mut MockHost,
    f: impl FnOnce(&mut MemoryStore, &mut MockHost) -> Result<T, E>,
) -> Result<T, E> {
    let (store_snapshot, host_snapshot) = (store.clone(), host.clone());
    let out = f(store, host);
    if out.is_err() {
        *store = store_snapshot;
        *host = host_snapshot;
    }
    out
}
