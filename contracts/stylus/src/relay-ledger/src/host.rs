//! Seams between the pure processor and its environment.

use alloy_primitives::{Address, FixedBytes, U256};
use relay_types::{Allowance, Revert, SigningDomain};

use crate::events::LedgerEvent;

/// Persistent ledger state: allowances, internal balances and the nonce registry.
pub trait LedgerStore {
    fn allowance(&self, owner: Address, signer: Address, token: Address) -> Allowance;
    fn set_allowance(&mut self, owner: Address, signer: Address, token: Address, allowance: Allowance);

    fn balance(&self, owner: Address, token: Address) -> U256;
    fn set_balance(&mut self, owner: Address, token: Address, amount: U256);

    fn is_nonce_used(&self, signer: Address, nonce: FixedBytes<32>) -> bool;
    /// One-way: a used nonce is never cleared.
    fn mark_nonce_used(&mut self, signer: Address, nonce: FixedBytes<32>);
}

/// Execution environment: clock, signing domain, signature recovery, the external token and
/// the audit log.
pub trait LedgerHost {
    fn now(&self) -> u64;

    /// Domain bound to this deployment (chain id + ledger address).
    fn domain(&self) -> SigningDomain;

    /// Recover the signer of `digest`; `Address::ZERO` when recovery fails.
    fn recover(&self, digest: FixedBytes<32>, signature: &[u8]) -> Address;

    fn transfer_from(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), Revert>;

    /// Send `amount` of `token` out of ledger custody.
    fn transfer(&mut self, token: Address, to: Address, amount: U256) -> Result<(), Revert>;

    fn emit(&mut self, event: LedgerEvent);

    fn this(&self) -> Address {
        self.domain().verifying_contract
    }
}
