//! Leverage hook for the flashloan orchestrator.
//!
//! Interprets a one-byte opcode and moves a caller's position in a lending market whose
//! collateral is the share token of a yield vault on the loan token.

#![cfg_attr(not(test), no_std)]

#[macro_use]
extern crate alloc;

pub mod errors;
pub mod events;
pub mod hook;
pub mod host;
pub mod leverage;
pub mod utils;

#[cfg(test)]
mod mock;
#[cfg(test)]
mod tests;

pub use hook::LeverageHook;
