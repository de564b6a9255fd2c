//! In-process lender, hooks and tokens for exercising the workflow.

use std::collections::BTreeMap;

use alloy_primitives::{Address, U256};
use relay_encoder::tokens::MockTokens;
use relay_types::Revert;

use crate::{context::FlashContext, events::FlashEvent, host::FlashHost, workflow};

pub const ORCHESTRATOR: Address = Address::repeat_byte(0x0C);
pub const LENDER: Address = Address::repeat_byte(0x1E);

/// What a hook sees when invoked.
pub struct HookCall<'a> {
    pub hook: Address,
    pub value: U256,
    pub data: &'a [u8],
    pub ctx: &'a FlashContext,
}

pub type Hook = fn(&mut MockTokens, HookCall<'_>) -> Result<Vec<u8>, Revert>;

#[derive(Clone)]
pub struct MockHost {
    pub tokens: MockTokens,
    pub hooks: BTreeMap<Address, Hook>,
    /// Charged on top of the borrowed amount.
    pub fee: U256,
    pub events: Vec<FlashEvent>,
}

impl MockHost {
    pub fn new() -> Self {
        Self {
            tokens: MockTokens::new(),
            hooks: BTreeMap::new(),
            fee: U256::ZERO,
            events: Vec::new(),
        }
    }
}

impl FlashHost for MockHost {
    fn this(&self) -> Address {
        ORCHESTRATOR
    }

    fn lender(&self) -> Address {
        LENDER
    }

    fn balance_of(&self, token: Address) -> Result<U256, Revert> {
        Ok(self.tokens.balance_of(token, ORCHESTRATOR))
    }

    fn pull(&mut self, token: Address, from: Address, amount: U256) -> Result<(), Revert> {
        self.tokens
            .transfer_from(token, ORCHESTRATOR, from, ORCHESTRATOR, amount)
    }

    fn transfer(&mut self, token: Address, to: Address, amount: U256) -> Result<(), Revert> {
        self.tokens.transfer(token, ORCHESTRATOR, to, amount)
    }

    fn force_approve(&mut self, token: Address, spender: Address, amount: U256) -> Result<(), Revert> {
        self.tokens.approve(token, ORCHESTRATOR, spender, amount);
        Ok(())
    }

    fn native_balance(&self) -> U256 {
        self.tokens.native_balance(ORCHESTRATOR)
    }

    fn send_native(&mut self, to: Address, amount: U256) -> Result<(), Revert> {
        self.tokens.send_native(ORCHESTRATOR, to, amount)
    }

    /// Morpho-style: send the assets, call back, then pull `amount + fee` using the allowance
    /// the callback granted.
    fn flash_loan(&mut self, token: Address, amount: U256, ctx: &mut FlashContext) -> Result<(), Revert> {
        self.tokens.transfer(token, LENDER, ORCHESTRATOR, amount)?;
        let owed = amount + self.fee;
        workflow::on_flash_loan(self, ctx, owed).map_err(Vec::<u8>::from)?;
        self.tokens
            .transfer_from(token, LENDER, ORCHESTRATOR, LENDER, owed)
    }

    fn call_hook(
        &mut self,
        target: Address,
        value: U256,
        data: &[u8],
        ctx: &FlashContext,
    ) -> Result<Vec<u8>, Revert> {
        let hook = *self.hooks.get(&target).ok_or_else(Revert::new)?;
        if !value.is_zero() {
            self.tokens.send_native(ORCHESTRATOR, target, value)?;
        }
        hook(
            &mut self.tokens,
            HookCall {
                hook: target,
                value,
                data,
                ctx,
            },
        )
    }

    fn emit(&mut self, event: FlashEvent) {
        self.events.push(event);
    }
}

/// Run `f` atomically: state rolls back when it fails.
pub fn transact<T, E>(host: &mut MockHost, f: impl FnOnce(&mut MockHost) -> Result<T, E>) -> Result<T, E> {
    let snapshot = host.clone();
    let out = f(host);
    if out.is_err() {
        *host = snapshot;
    }
    out
}
