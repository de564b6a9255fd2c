//! Types shared between the Stylus contracts and off-chain tooling.
//!
//! Everything here is deterministic and allocation-light so it can run inside Stylus / WASM
//! as well as in relayer-side encoders.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod authorization;
pub mod interfaces;
pub mod kinds;
pub mod market;
pub mod signing;

pub use authorization::{Allowance, Authorization, CancelAuthorization};
pub use kinds::{LeverageOpcode, OperationKind};
pub use market::{MarketParams, Position};
pub use signing::SigningDomain;

/// Raw revert payload returned by a failed external call.
pub type Revert = alloc::vec::Vec<u8>;
