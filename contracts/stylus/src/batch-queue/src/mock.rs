//! In-memory queue store and a host whose call targets are plain functions.

use std::collections::{BTreeMap, BTreeSet};

use alloy_primitives::{Address, FixedBytes, U256};
use relay_encoder::tokens::MockTokens;
use relay_types::Revert;

use crate::{
    events::QueueEvent,
    host::{QueueHost, QueueStore},
};

pub const QUEUE: Address = Address::repeat_byte(0x9E);
pub const CHAIN_ID: u64 = 42161;

pub type Target = fn(value: U256, data: &[u8]) -> Result<Vec<u8>, Revert>;

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pub owner: Address,
    pub max_actions: U256,
    pub max_value: U256,
    pub allow_all: bool,
    pub listed: BTreeSet<Address>,
    pub counter: U256,
    pub executed: BTreeSet<FixedBytes<32>>,
}

impl QueueStore for MemoryStore {
    fn owner(&self) -> Address {
        self.owner
    }

    fn set_owner(&mut self, owner: Address) {
        self.owner = owner;
    }

    fn max_actions(&self) -> U256 {
        self.max_actions
    }

    fn set_max_actions(&mut self, max_actions: U256) {
        self.max_actions = max_actions;
    }

    fn max_value(&self) -> U256 {
        self.max_value
    }

    fn set_max_value(&mut self, max_value: U256) {
        self.max_value = max_value;
    }

    fn allow_all_targets(&self) -> bool {
        self.allow_all
    }

    fn set_allow_all_targets(&mut self, allow_all: bool) {
        self.allow_all = allow_all;
    }

    fn is_target_listed(&self, target: Address) -> bool {
        self.listed.contains(&target)
    }

    fn set_target_listed(&mut self, target: Address, allowed: bool) {
        if allowed {
            self.listed.insert(target);
        } else {
            self.listed.remove(&target);
        }
    }

    fn batch_counter(&self) -> U256 {
        self.counter
    }

    fn set_batch_counter(&mut self, counter: U256) {
        self.counter = counter;
    }

    fn is_batch_executed(&self, batch_id: FixedBytes<32>) -> bool {
        self.executed.contains(&batch_id)
    }

    fn mark_batch_executed(&mut self, batch_id: FixedBytes<32>) {
        self.executed.insert(batch_id);
    }
}

#[derive(Clone, Default)]
pub struct MockHost {
    pub tokens: MockTokens,
    pub targets: BTreeMap<Address, Target>,
    /// (target, value, data) of every call that went through.
    pub calls: Vec<(Address, U256, Vec<u8>)>,
    pub events: Vec<QueueEvent>,
}

impl QueueHost for MockHost {
    fn chain_id(&self) -> u64 {
        CHAIN_ID
    }

    fn native_balance(&self) -> U256 {
        self.tokens.native_balance(QUEUE)
    }

    /// Unknown targets behave like accounts without code: the call succeeds.
    fn call(&mut self, target: Address, value: U256, data: &[u8]) -> Result<Vec<u8>, Revert> {
        let snapshot = self.tokens.clone();
        self.tokens.send_native(QUEUE, target, value)?;
        let out = match self.targets.get(&target) {
            Some(f) => f(value, data),
            None => Ok(Vec::new()),
        };
        match out {
            Ok(ret) => {
                self.calls.push((target, value, data.to_vec()));
                Ok(ret)
            }
            Err(reason) => {
                self.tokens = snapshot;
                Err(reason)
            }
        }
    }

    fn send_native(&mut self, to: Address, amount: U256) -> Result<(), Revert> {
        self.tokens.send_native(QUEUE, to, amount)
    }

    fn emit(&mut self, event: QueueEvent) {
        self.events.push(event);
    }
}

/// Run `f` atomically: store and host roll back when it fails.
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
