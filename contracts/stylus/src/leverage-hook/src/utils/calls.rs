use alloc::vec::Vec;

use alloy_sol_types::SolCall;
use relay_types::Revert;
use stylus_sdk::{alloy_primitives::Address, call::RawCall};

/// State-changing call decoding the typed return value.
pub fn call<C: SolCall>(to: Address, call: &C) -> Result<C::Return, Revert> {
    let out = unsafe { RawCall::new().call(to, &call.abi_encode()) }?;
    C::abi_decode_returns(&out, true).map_err(|_| Vec::new())
}

pub fn static_call<C: SolCall>(to: Address, call: &C) -> Result<C::Return, Revert> {
    let out = unsafe { RawCall::new_static().call(to, &call.abi_encode()) }?;
    C::abi_decode_returns(&out, true).map_err(|_| Vec::new())
}
