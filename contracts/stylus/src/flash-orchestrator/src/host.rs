//! Environment the orchestration workflow runs against.

use alloc::vec::Vec;

use alloy_primitives::{Address, U256};
use relay_types::Revert;

use crate::{context::FlashContext, events::FlashEvent};

pub trait FlashHost {
    fn this(&self) -> Address;
    /// Lending protocol that serves flash loans and calls back `onMorphoFlashLoan`.
    fn lender(&self) -> Address;

    fn balance_of(&self, token: Address) -> Result<U256, Revert>;
    /// Move `amount` of `token` from `from` into orchestrator custody.
    fn pull(&mut self, token: Address, from: Address, amount: U256) -> Result<(), Revert>;
    fn transfer(&mut self, token: Address, to: Address, amount: U256) -> Result<(), Revert>;
    /// Set the allowance of `spender` to exactly `amount`.
    fn force_approve(&mut self, token: Address, spender: Address, amount: U256) -> Result<(), Revert>;

    fn native_balance(&self) -> U256;
    fn send_native(&mut self, to: Address, amount: U256) -> Result<(), Revert>;

    /// Borrow `amount` of `token`. The lender's callback runs `workflow::on_flash_loan` against
    /// `ctx` before this returns, and then pulls repayment.
    fn flash_loan(&mut self, token: Address, amount: U256, ctx: &mut FlashContext) -> Result<(), Revert>;

    /// Invoke `target.onFlashloanHook(data)` with `value`; `ctx` is what the hook observes
    /// through `context()`. Returns the hook's result bytes.
    fn call_hook(
        &mut self,
        target: Address,
        value: U256,
        data: &[u8],
        ctx: &FlashContext,
    ) -> Result<Vec<u8>, Revert>;

    fn emit(&mut self, event: FlashEvent);
}
