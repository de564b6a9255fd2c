//! SafeERC20-style token calls made from the orchestrator, routed through the contract's VM so
//! they follow its reentrancy and storage-cache rules.

use alloc::vec::Vec;

use alloy_sol_types::SolCall;
use relay_types::{interfaces::IERC20, Revert};
use stylus_sdk::{
    alloy_primitives::{Address, U256},
    stylus_core::{
        calls::{CallAccess, MutatingCallContext, StaticCallContext},
        Host,
    },
};

fn succeeded(out: &[u8]) -> bool {
    out.is_empty() || (out.len() >= 32 && U256::from_be_slice(&out[0..32]) != U256::ZERO)
}

fn call_token(
    vm: &dyn Host,
    context: &dyn MutatingCallContext,
    token: Address,
    calldata: &[u8],
) -> Result<(), Revert> {
    let out = vm.call(context, token, calldata)?;
    if succeeded(&out) {
        Ok(())
    } else {
        Err(Vec::new())
    }
}

pub fn balance_of(
    vm: &dyn Host,
    context: &dyn StaticCallContext,
    token: Address,
    account: Address,
) -> Result<U256, Revert> {
    let out = vm.static_call(context, token, &IERC20::balanceOfCall { account }.abi_encode())?;
    IERC20::balanceOfCall::abi_decode_returns(&out, false)
        .map(|r| r._0)
        .map_err(|_| Vec::new())
}

pub fn safe_transfer_from(
    vm: &dyn Host,
    context: &dyn MutatingCallContext,
    token: Address,
    from: Address,
    to: Address,
    amount: U256,
) -> Result<(), Revert> {
    call_token(vm, context, token, &IERC20::transferFromCall { from, to, amount }.abi_encode())
}

pub fn safe_transfer(
    vm: &dyn Host,
    context: &dyn MutatingCallContext,
    token: Address,
    to: Address,
    amount: U256,
) -> Result<(), Revert> {
    call_token(vm, context, token, &IERC20::transferCall { to, amount }.abi_encode())
}

/// Approve `amount`, resetting to zero first for tokens that refuse non-zero to non-zero changes.
pub fn force_approve(
    vm: &dyn Host,
    context: &dyn MutatingCallContext,
    token: Address,
    spender: Address,
    amount: U256,
) -> Result<(), Revert> {
    let approve = |amount: U256| IERC20::approveCall { spender, amount }.abi_encode();
    if call_token(vm, context, token, &approve(amount)).is_ok() {
        return Ok(());
    }
    call_token(vm, context, token, &approve(U256::ZERO))?;
    call_token(vm, context, token, &approve(amount))
}
