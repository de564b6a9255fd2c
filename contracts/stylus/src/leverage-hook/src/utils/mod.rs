//! `RawCall` plumbing for the hook contract.

pub mod calls;
pub mod erc20;
