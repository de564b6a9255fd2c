//! Relay ledger: signed, replay-protected, allowance-gated internal accounting.
//!
//! A relayer submits `Authorization`s signed by an owner (or by a delegate the owner granted
//! quotas to); the ledger verifies them and moves external tokens or internal custodial balances
//! without the signer paying gas.

#![cfg_attr(not(test), no_std)]

#[macro_use]
extern crate alloc;

pub mod errors;
pub mod events;
pub mod host;
pub mod ledger;
pub mod processor;
pub mod utils;
pub mod validation;

#[cfg(test)]
mod mock;

pub use ledger::RelayLedger;
