//! Stylus entrypoint for the batch queue.

use alloc::vec::Vec;

use stylus_sdk::{
    abi::Bytes,
    alloy_primitives::{Address, FixedBytes, U256},
    call::RawCall,
    prelude::*,
    stylus_core::log,
};

use relay_types::Revert;

use crate::{
    batch,
    errors::{QueueError, ReentrantCall},
    events::{Action, QueueEvent},
    host::{QueueHost, QueueStore},
};

/// ABI shape of one action: (target, value, data).
pub type ActionTuple = (Address, U256, Bytes);

sol_storage! {
    #[entrypoint]
    pub struct BatchQueue {
        address owner;
        uint256 max_actions;
        uint256 max_value;

        bool allow_all_targets;
        mapping(address => bool) allowed_targets;

        uint256 batch_counter;
        mapping(bytes32 => bool) executed_batches;

        bool entered;
    }
}

#[public]
impl BatchQueue {
    pub fn initialize(&mut self, owner: Address, max_actions: U256, max_value: U256) -> Result<(), QueueError> {
        let mut host = self._host();
        batch::initialize(self, &mut host, owner, max_actions, max_value)?;
        self._publish(host.events);
        Ok(())
    }

    /// Owner only. Returns (results, batchId).
    #[payable]
    pub fn execute_batch(
        &mut self,
        actions: Vec<ActionTuple>,
        allow_failure_map: U256,
    ) -> Result<(Vec<bool>, FixedBytes<32>), QueueError> {
        if self.entered.get() {
            return Err(QueueError::ReentrantCall(ReentrantCall {}));
        }
        self.entered.set(true);
        let caller = self.vm().msg_sender();
        let actions = to_actions(actions);
        let mut host = self._host();
        let out = batch::execute_batch(self, &mut host, caller, &actions, allow_failure_map)?;
        self.entered.set(false);
        self._publish(host.events);
        Ok(out)
    }

    pub fn set_max_actions(&mut self, max_actions: U256) -> Result<(), QueueError> {
        let caller = self.vm().msg_sender();
        let mut host = self._host();
        batch::set_max_actions(self, &mut host, caller, max_actions)?;
        self._publish(host.events);
        Ok(())
    }

    pub fn set_max_value(&mut self, max_value: U256) -> Result<(), QueueError> {
        let caller = self.vm().msg_sender();
        let mut host = self._host();
        batch::set_max_value(self, &mut host, caller, max_value)?;
        self._publish(host.events);
        Ok(())
    }

    pub fn set_target_allowed(&mut self, target: Address, allowed: bool) -> Result<(), QueueError> {
        let caller = self.vm().msg_sender();
        let mut host = self._host();
        batch::set_target_allowed(self, &mut host, caller, target, allowed)?;
        self._publish(host.events);
        Ok(())
    }

    pub fn set_allow_all_targets(&mut self, allow_all: bool) -> Result<(), QueueError> {
        let caller = self.vm().msg_sender();
        let mut host = self._host();
        batch::set_allow_all_targets(self, &mut host, caller, allow_all)?;
        self._publish(host.events);
        Ok(())
    }

    /// Emergency withdrawal of `amount` native currency.
    pub fn withdraw(&mut self, to: Address, amount: U256) -> Result<(), QueueError> {
        self._withdraw(to, Some(amount))
    }

    /// Emergency withdrawal of the whole native balance.
    pub fn withdraw_all(&mut self, to: Address) -> Result<(), QueueError> {
        self._withdraw(to, None)
    }

    pub fn transfer_ownership(&mut self, new_owner: Address) -> Result<(), QueueError> {
        let caller = self.vm().msg_sender();
        let mut host = self._host();
        batch::transfer_ownership(self, &mut host, caller, new_owner)?;
        self._publish(host.events);
        Ok(())
    }

    pub fn advance_batch_counter(&mut self) -> Result<U256, QueueError> {
        let caller = self.vm().msg_sender();
        let mut host = self._host();
        let counter = batch::advance_batch_counter(self, &mut host, caller)?;
        self._publish(host.events);
        Ok(counter)
    }

    /// Top up the native balance used by action values.
    #[payable]
    pub fn fund(&mut self) {}

    pub fn compute_batch_id(&self, actions: Vec<ActionTuple>, allow_failure_map: U256) -> FixedBytes<32> {
        batch::batch_id(
            &to_actions(actions),
            allow_failure_map,
            self.vm().chain_id(),
            self.batch_counter.get(),
        )
    }

    pub fn is_batch_executed(&self, batch_id: FixedBytes<32>) -> bool {
        self.executed_batches.get(batch_id)
    }

    pub fn is_target_allowed(&self, target: Address) -> bool {
        batch::is_target_allowed(self, target)
    }

    pub fn owner(&self) -> Address {
        self.owner.get()
    }

    pub fn max_actions(&self) -> U256 {
        self.max_actions.get()
    }

    pub fn max_value(&self) -> U256 {
        self.max_value.get()
    }

    pub fn allow_all_targets(&self) -> bool {
        self.allow_all_targets.get()
    }

    pub fn batch_counter(&self) -> U256 {
        self.batch_counter.get()
    }
}

fn to_actions(actions: Vec<ActionTuple>) -> Vec<Action> {
    actions
        .into_iter()
        .map(|(target, value, data)| Action {
            target,
            value,
            data: data.to_vec().into(),
        })
        .collect()
}

impl BatchQueue {
    fn _host(&self) -> OnchainHost {
        OnchainHost {
            chain_id: self.vm().chain_id(),
            balance: self.vm().balance(self.vm().contract_address()),
            events: Vec::new(),
        }
    }

    fn _withdraw(&mut self, to: Address, amount: Option<U256>) -> Result<(), QueueError> {
        if self.entered.get() {
            return Err(QueueError::ReentrantCall(ReentrantCall {}));
        }
        self.entered.set(true);
        let caller = self.vm().msg_sender();
        let mut host = self._host();
        batch::withdraw_native(self, &mut host, caller, to, amount)?;
        self.entered.set(false);
        self._publish(host.events);
        Ok(())
    }

    fn _publish(&self, events: Vec<QueueEvent>) {
        for event in events {
            match event {
                QueueEvent::BatchExecuted(e) => log(self.vm(), e),
                QueueEvent::ActionFailed(e) => log(self.vm(), e),
                QueueEvent::OwnershipTransferred(e) => log(self.vm(), e),
                QueueEvent::MaxActionsUpdated(e) => log(self.vm(), e),
                QueueEvent::MaxValueUpdated(e) => log(self.vm(), e),
                QueueEvent::TargetAllowanceUpdated(e) => log(self.vm(), e),
                QueueEvent::AllowAllTargetsUpdated(e) => log(self.vm(), e),
                QueueEvent::NativeWithdrawn(e) => log(self.vm(), e),
                QueueEvent::BatchCounterAdvanced(e) => log(self.vm(), e),
            }
        }
    }
}

impl QueueStore for BatchQueue {
    fn owner(&self) -> Address {
        self.owner.get()
    }

    fn set_owner(&mut self, owner: Address) {
        self.owner.set(owner);
    }

    fn max_actions(&self) -> U256 {
        self.max_actions.get()
    }

    fn set_max_actions(&mut self, max_actions: U256) {
        self.max_actions.set(max_actions);
    }

    fn max_value(&self) -> U256 {
        self.max_value.get()
    }

    fn set_max_value(&mut self, max_value: U256) {
        self.max_value.set(max_value);
    }

    fn allow_all_targets(&self) -> bool {
        self.allow_all_targets.get()
    }

    fn set_allow_all_targets(&mut self, allow_all: bool) {
        self.allow_all_targets.set(allow_all);
    }

    fn is_target_listed(&self, target: Address) -> bool {
        self.allowed_targets.get(target)
    }

    fn set_target_listed(&mut self, target: Address, allowed: bool) {
        self.allowed_targets.insert(target, allowed);
    }

    fn batch_counter(&self) -> U256 {
        self.batch_counter.get()
    }

    fn set_batch_counter(&mut self, counter: U256) {
        self.batch_counter.set(counter);
    }

    fn is_batch_executed(&self, batch_id: FixedBytes<32>) -> bool {
        self.executed_batches.get(batch_id)
    }

    fn mark_batch_executed(&mut self, batch_id: FixedBytes<32>) {
        self.executed_batches.insert(batch_id, true);
    }
}

pub struct OnchainHost {
    chain_id: u64,
    balance: U256,
    events: Vec<QueueEvent>,
}

impl QueueHost for OnchainHost {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn native_balance(&self) -> U256 {
        self.balance
    }

    fn call(&mut self, target: Address, value: U256, data: &[u8]) -> Result<Vec<u8>, Revert> {
        unsafe { RawCall::new_with_value(value).call(target, data) }
    }

    fn send_native(&mut self, to: Address, amount: U256) -> Result<(), Revert> {
        unsafe { RawCall::new_with_value(amount).call(to, &[]) }.map(|_| ())
    }

    fn emit(&mut self, event: QueueEvent) {
        self.events.push(event);
    }
}
