//! SafeERC20-style token calls: success is "no revert, and no data or an ABI `true`".

use alloc::vec::Vec;

use alloy_sol_types::SolCall;
use relay_types::{interfaces::IERC20, Revert};
use stylus_sdk::{
    alloy_primitives::{Address, U256},
    call::RawCall,
};

use super::calls::static_call;

fn call_token(token: Address, calldata: &[u8]) -> Result<(), Revert> {
    let out = unsafe { RawCall::new().call(token, calldata) }?;
    if out.is_empty() || (out.len() >= 32 && U256::from_be_slice(&out[0..32]) != U256::ZERO) {
        Ok(())
    } else {
        Err(Vec::new())
    }
}

pub fn balance_of(token: Address, account: Address) -> Result<U256, Revert> {
    static_call(token, &IERC20::balanceOfCall { account }).map(|r| r._0)
}

pub fn safe_transfer_from(token: Address, from: Address, to: Address, amount: U256) -> Result<(), Revert> {
    call_token(token, &IERC20::transferFromCall { from, to, amount }.abi_encode())
}

pub fn safe_transfer(token: Address, to: Address, amount: U256) -> Result<(), Revert> {
    call_token(token, &IERC20::transferCall { to, amount }.abi_encode())
}

pub fn safe_approve(token: Address, spender: Address, amount: U256) -> Result<(), Revert> {
    call_token(token, &IERC20::approveCall { spender, amount }.abi_encode())
}
