//! Relayer-side tooling for the relay ledger.
//!
//! - `encoder`: digest computation (independent of the on-chain code path) and calldata encoding.
//! - `signer`: secp256k1 signing / recovery for authorizations.
//! - `tokens`: in-memory ERC-20 + native balance book used by contract test hosts.

pub mod encoder;
pub mod signer;
pub mod tokens;
pub mod types;
