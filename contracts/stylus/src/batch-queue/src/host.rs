//! Seams between the batch logic and the chain.

use alloc::vec::Vec;

use alloy_primitives::{Address, FixedBytes, U256};
use relay_types::Revert;

use crate::events::QueueEvent;

/// Persistent queue configuration and replay registry.
pub trait QueueStore {
    fn owner(&self) -> Address;
    fn set_owner(&mut self, owner: Address);

    fn max_actions(&self) -> U256;
    fn set_max_actions(&mut self, max_actions: U256);
    fn max_value(&self) -> U256;
    fn set_max_value(&mut self, max_value: U256);

    fn allow_all_targets(&self) -> bool;
    fn set_allow_all_targets(&mut self, allow_all: bool);
    fn is_target_listed(&self, target: Address) -> bool;
    fn set_target_listed(&mut self, target: Address, allowed: bool);

    fn batch_counter(&self) -> U256;
    fn set_batch_counter(&mut self, counter: U256);
    fn is_batch_executed(&self, batch_id: FixedBytes<32>) -> bool;
    /// One-way.
    fn mark_batch_executed(&mut self, batch_id: FixedBytes<32>);
}

pub trait QueueHost {
    fn chain_id(&self) -> u64;
    /// Native balance held by the queue when the call started.
    fn native_balance(&self) -> U256;
    /// Call `target` with `value`; `Err` carries the callee's revert data.
    fn call(&mut self, target: Address, value: U256, data: &[u8]) -> Result<Vec<u8>, Revert>;
    fn send_native(&mut self, to: Address, amount: U256) -> Result<(), Revert>;
    fn emit(&mut self, event: QueueEvent);
}
