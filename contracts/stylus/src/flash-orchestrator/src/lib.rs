//! Flashloan orchestrator: borrow, run hook actions, repay, all inside one call.
//!
//! `workflow` holds the state machine over the `FlashHost` trait; `orchestrator` is the Stylus
//! contract binding it to storage, token calls and the lending protocol.

#![cfg_attr(not(test), no_std)]

#[macro_use]
extern crate alloc;

pub mod context;
pub mod errors;
pub mod events;
pub mod host;
pub mod orchestrator;
pub mod utils;
pub mod workflow;

#[cfg(test)]
mod mock;

pub use orchestrator::FlashOrchestrator;
