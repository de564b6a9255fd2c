//! Host-side helpers for the ledger contract.
//!
//! These run inside Stylus / WASM and talk to precompiles and token contracts via `RawCall`.

pub mod crypto;
pub mod erc20;
