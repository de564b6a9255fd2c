//! Batch execution and queue configuration.
//!
//! A batch is validated in full before the first call is made, then marked executed, then run
//! in order. A failing action is tolerated only when its bit in `allow_failure_map` is set.

use alloc::vec::Vec;

use alloy_primitives::{keccak256, Address, Bytes, FixedBytes, U256};
use alloy_sol_types::SolValue;

use crate::{
    access::ensure_owner,
    errors::{
        ActionExecutionFailed, AlreadyInitialized, BatchAlreadyExecuted, BatchSizeExceedsMaximum,
        InsufficientBalance, InvalidActionCount, InvalidAddress, InvalidFailureMap,
        InvalidMaxActions, InvalidTargetAddress, NativeTransferFailed, QueueError,
        TargetNotAllowed, ValueExceedsMaximum,
    },
    events::{
        Action, ActionFailed, AllowAllTargetsUpdated, BatchCounterAdvanced, BatchExecuted,
        MaxActionsUpdated, MaxValueUpdated, NativeWithdrawn, OwnershipTransferred, QueueEvent,
        TargetAllowanceUpdated,
    },
    host::{QueueHost, QueueStore},
};

/// Width of `allowFailureMap`, and so the largest batch ever accepted.
pub const MAX_BATCH_SIZE: u64 = 256;

/// keccak256(abi.encode(actions, allowFailureMap, chainId, counter))
pub fn batch_id(actions: &[Action], allow_failure_map: U256, chain_id: u64, counter: U256) -> FixedBytes<32> {
    keccak256((actions.to_vec(), allow_failure_map, U256::from(chain_id), counter).abi_encode_params())
}

pub fn is_target_allowed<S: QueueStore>(store: &S, target: Address) -> bool {
    store.allow_all_targets() || store.is_target_listed(target)
}

fn check_shape<S: QueueStore>(store: &S, actions: &[Action], allow_failure_map: U256) -> Result<(), QueueError> {
    if actions.is_empty() {
        return Err(QueueError::InvalidActionCount(InvalidActionCount {}));
    }
    let size = U256::from(actions.len());
    if size > store.max_actions() {
        return Err(QueueError::BatchSizeExceedsMaximum(BatchSizeExceedsMaximum {
            size,
            maxActions: store.max_actions(),
        }));
    }
    if actions.len() < 256 && !(allow_failure_map >> actions.len()).is_zero() {
        return Err(QueueError::InvalidFailureMap(InvalidFailureMap {
            allowFailureMap: allow_failure_map,
            actionCount: size,
        }));
    }
    Ok(())
}

fn check_actions<S: QueueStore, H: QueueHost>(store: &S, host: &H, actions: &[Action]) -> Result<(), QueueError> {
    let max_value = store.max_value();
    let mut total = U256::ZERO;
    for (i, action) in actions.iter().enumerate() {
        let index = U256::from(i);
        if action.target.is_zero() {
            return Err(QueueError::InvalidTargetAddress(InvalidTargetAddress { index }));
        }
        if action.value > max_value {
            return Err(QueueError::ValueExceedsMaximum(ValueExceedsMaximum {
                index,
                value: action.value,
                maxValue: max_value,
            }));
        }
        if !is_target_allowed(store, action.target) {
            return Err(QueueError::TargetNotAllowed(TargetNotAllowed {
                index,
                target: action.target,
            }));
        }
        total = total.saturating_add(action.value);
    }
    let available = host.native_balance();
    if total > available {
        return Err(QueueError::InsufficientBalance(InsufficientBalance {
            available,
            required: total,
        }));
    }
    Ok(())
}

/// Run `actions` in order. Returns each action's success flag and the batch id.
pub fn execute_batch<S: QueueStore, H: QueueHost>(
    store: &mut S,
    host: &mut H,
    caller: Address,
    actions: &[Action],
    allow_failure_map: U256,
) -> Result<(Vec<bool>, FixedBytes<32>), QueueError> {
    ensure_owner(store, caller)?;
    check_shape(store, actions, allow_failure_map)?;

    let id = batch_id(actions, allow_failure_map, host.chain_id(), store.batch_counter());
    if store.is_batch_executed(id) {
        return Err(QueueError::BatchAlreadyExecuted(BatchAlreadyExecuted { batchId: id }));
    }
    check_actions(store, host, actions)?;
    store.mark_batch_executed(id);

    let mut results = Vec::with_capacity(actions.len());
    for (i, action) in actions.iter().enumerate() {
        match host.call(action.target, action.value, &action.data) {
            Ok(_) => results.push(true),
            Err(reason) if allow_failure_map.bit(i) => {
                host.emit(QueueEvent::ActionFailed(ActionFailed {
                    batchId: id,
                    index: U256::from(i),
                    reason: Bytes::from(reason),
                }));
                results.push(false);
            }
            Err(_) => {
                return Err(QueueError::ActionExecutionFailed(ActionExecutionFailed {
                    index: U256::from(i),
                }))
            }
        }
    }

    host.emit(QueueEvent::BatchExecuted(BatchExecuted {
        batchId: id,
        actions: actions.to_vec(),
        results: results.clone(),
        allowFailureMap: allow_failure_map,
    }));
    Ok((results, id))
}

fn check_max_actions(max_actions: U256) -> Result<(), QueueError> {
    if max_actions.is_zero() || max_actions > U256::from(MAX_BATCH_SIZE) {
        return Err(QueueError::InvalidMaxActions(InvalidMaxActions {
            maxActions: max_actions,
        }));
    }
    Ok(())
}

/// One-shot setup: owner and both limits. The allowlist starts empty with allow-all off.
pub fn initialize<S: QueueStore, H: QueueHost>(
    store: &mut S,
    host: &mut H,
    owner: Address,
    max_actions: U256,
    max_value: U256,
) -> Result<(), QueueError> {
    if !store.owner().is_zero() {
        return Err(QueueError::AlreadyInitialized(AlreadyInitialized {}));
    }
    if owner.is_zero() {
        return Err(QueueError::InvalidAddress(InvalidAddress {}));
    }
    check_max_actions(max_actions)?;

    store.set_owner(owner);
    store.set_max_actions(max_actions);
    store.set_max_value(max_value);
    host.emit(QueueEvent::OwnershipTransferred(OwnershipTransferred {
        previousOwner: Address::ZERO,
        newOwner: owner,
    }));
    host.emit(QueueEvent::MaxActionsUpdated(MaxActionsUpdated { maxActions: max_actions }));
    host.emit(QueueEvent::MaxValueUpdated(MaxValueUpdated { maxValue: max_value }));
    Ok(())
}

pub fn set_max_actions<S: QueueStore, H: QueueHost>(
    store: &mut S,
    host: &mut H,
    caller: Address,
    max_actions: U256,
) -> Result<(), QueueError> {
    ensure_owner(store, caller)?;
    check_max_actions(max_actions)?;
    store.set_max_actions(max_actions);
    host.emit(QueueEvent::MaxActionsUpdated(MaxActionsUpdated { maxActions: max_actions }));
    Ok(())
}

pub fn set_max_value<S: QueueStore, H: QueueHost>(
    store: &mut S,
    host: &mut H,
    caller: Address,
    max_value: U256,
) -> Result<(), QueueError> {
    ensure_owner(store, caller)?;
    store.set_max_value(max_value);
    host.emit(QueueEvent::MaxValueUpdated(MaxValueUpdated { maxValue: max_value }));
    Ok(())
}

pub fn set_target_allowed<S: QueueStore, H: QueueHost>(
    store: &mut S,
    host: &mut H,
    caller: Address,
    target: Address,
    allowed: bool,
) -> Result<(), QueueError> {
    ensure_owner(store, caller)?;
    if target.is_zero() {
        return Err(QueueError::InvalidAddress(InvalidAddress {}));
    }
    store.set_target_listed(target, allowed);
    host.emit(QueueEvent::TargetAllowanceUpdated(TargetAllowanceUpdated { target, allowed }));
    Ok(())
}

pub fn set_allow_all_targets<S: QueueStore, H: QueueHost>(
    store: &mut S,
    host: &mut H,
    caller: Address,
    allow_all: bool,
) -> Result<(), QueueError> {
    ensure_owner(store, caller)?;
    store.set_allow_all_targets(allow_all);
    host.emit(QueueEvent::AllowAllTargetsUpdated(AllowAllTargetsUpdated { allowAll: allow_all }));
    Ok(())
}

/// Send `amount` of native currency to `to`; `None` withdraws the whole balance.
pub fn withdraw_native<S: QueueStore, H: QueueHost>(
    store: &mut S,
    host: &mut H,
    caller: Address,
    to: Address,
    amount: Option<U256>,
) -> Result<U256, QueueError> {
    ensure_owner(store, caller)?;
    if to.is_zero() {
        return Err(QueueError::InvalidAddress(InvalidAddress {}));
    }
    let available = host.native_balance();
    let amount = amount.unwrap_or(available);
    if amount > available {
        return Err(QueueError::InsufficientBalance(InsufficientBalance {
            available,
            required: amount,
        }));
    }
    if !amount.is_zero() {
        host.send_native(to, amount)
            .map_err(|_| QueueError::NativeTransferFailed(NativeTransferFailed { to, amount }))?;
    }
    host.emit(QueueEvent::NativeWithdrawn(NativeWithdrawn { to, amount }));
    Ok(amount)
}

pub fn transfer_ownership<S: QueueStore, H: QueueHost>(
    store: &mut S,
    host: &mut H,
    caller: Address,
    new_owner: Address,
) -> Result<(), QueueError> {
    ensure_owner(store, caller)?;
    if new_owner.is_zero() {
        return Err(QueueError::InvalidAddress(InvalidAddress {}));
    }
    store.set_owner(new_owner);
    host.emit(QueueEvent::OwnershipTransferred(OwnershipTransferred {
        previousOwner: caller,
        newOwner: new_owner,
    }));
    Ok(())
}

/// Start a new batch-id epoch so a batch identical to an executed one can run again.
pub fn advance_batch_counter<S: QueueStore, H: QueueHost>(
    store: &mut S,
    host: &mut H,
    caller: Address,
) -> Result<U256, QueueError> {
    ensure_owner(store, caller)?;
    let counter = store.batch_counter() + U256::from(1u64);
    store.set_batch_counter(counter);
    host.emit(QueueEvent::BatchCounterAdvanced(BatchCounterAdvanced { counter }));
    Ok(counter)
}
