//! Batch queue: owner-only execution of arbitrary calls, each optionally allowed to fail.

#![cfg_attr(not(test), no_std)]

#[macro_use]
extern crate alloc;

pub mod access;
pub mod batch;
pub mod errors;
pub mod events;
pub mod host;
pub mod queue;

#[cfg(test)]
mod mock;

pub use queue::BatchQueue;
