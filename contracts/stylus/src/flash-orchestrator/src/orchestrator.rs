//! Stylus entrypoint for the flashloan orchestrator.
//!
//! The contract is its own `FlashHost`. While a flash loan is in flight the context is kept as
//! an ABI blob in `context`, so the lender callback and the hooks' `context()` queries see the
//! same state; `execute` erases it before returning. Token and lender calls go through the VM;
//! calls carrying value use `RawCall`.

use alloc::vec::Vec;

use stylus_sdk::{
    abi::Bytes,
    alloy_primitives::{Address, U256},
    call::RawCall,
    prelude::*,
    storage::Erase,
    stylus_core::{calls::CallAccess, log},
};

use alloy_sol_types::SolCall;
use relay_types::{
    interfaces::{IFlashloanHook, ILendingProtocol},
    Revert,
};

use crate::{
    context::{Action, FlashContext, FlashRequest},
    errors::{
        AlreadyInitialized, FlashError, InvalidAddress, NotInitialized, NotLender,
        OrchestratorError, ReentrantCall, UnexpectedCallback,
    },
    events::FlashEvent,
    host::FlashHost,
    utils::erc20,
    workflow,
};

/// ABI shape of one action: (target, value, data).
pub type ActionTuple = (Address, U256, Bytes);

sol_storage! {
    #[entrypoint]
    pub struct FlashOrchestrator {
        address lender;

        /// ABI-encoded `FlashContext`; empty outside of `execute`.
        bytes context;

        bool entered;
    }
}

#[public]
impl FlashOrchestrator {
    /// One-shot configuration of the lending protocol.
    pub fn initialize(&mut self, lender: Address) -> Result<(), OrchestratorError> {
        if !self.lender.get().is_zero() {
            return Err(OrchestratorError::AlreadyInitialized(AlreadyInitialized {}));
        }
        if lender.is_zero() {
            return Err(OrchestratorError::InvalidAddress(InvalidAddress {}));
        }
        self.lender.set(lender);
        Ok(())
    }

    /// Pull `amounts[i]` of `tokens[i]` from the caller, flash-borrow `flash_amount` of
    /// `flash_token`, run `actions` in the callback, then return leftovers to the caller.
    #[payable]
    pub fn execute(
        &mut self,
        tokens: Vec<Address>,
        amounts: Vec<U256>,
        flash_token: Address,
        flash_amount: U256,
        actions: Vec<ActionTuple>,
    ) -> Result<Vec<Bytes>, FlashError> {
        if self.lender.get().is_zero() {
            return Err(OrchestratorError::NotInitialized(NotInitialized {}).into());
        }
        if self.entered.get() {
            return Err(OrchestratorError::ReentrantCall(ReentrantCall {}).into());
        }
        self.entered.set(true);

        let sender = self.vm().msg_sender();
        let request = FlashRequest {
            tokens,
            amounts,
            flash_token,
            flash_amount,
            actions: actions
                .into_iter()
                .map(|(target, value, data)| Action {
                    target,
                    value,
                    data: data.to_vec(),
                })
                .collect(),
        };
        let results = workflow::execute(self, sender, request)?;

        self.context.erase();
        self.entered.set(false);
        Ok(results.into_iter().map(Bytes::from).collect())
    }

    /// Lender callback. Only valid from the lender while `execute` has a loan in flight.
    pub fn on_morpho_flash_loan(&mut self, assets: U256, _data: Bytes) -> Result<(), FlashError> {
        let caller = self.vm().msg_sender();
        if caller != self.lender.get() || caller.is_zero() {
            return Err(OrchestratorError::NotLender(NotLender { caller }).into());
        }
        let mut ctx = FlashContext::decode(&self.context.get_bytes())
            .ok_or(OrchestratorError::UnexpectedCallback(UnexpectedCallback {}))?;
        workflow::on_flash_loan(self, &mut ctx, assets)?;
        self.context.set_bytes(ctx.encode());
        Ok(())
    }

    /// In-flight context for hooks: (sender, flashToken, flashAmount, tokens, amounts,
    /// actionIndex). All zero when no loan is in flight.
    pub fn context(&self) -> (Address, Address, U256, Vec<Address>, Vec<U256>, U256) {
        let ctx = FlashContext::decode(&self.context.get_bytes()).unwrap_or_default();
        (
            ctx.sender,
            ctx.flash_token,
            ctx.flash_amount,
            ctx.tokens,
            ctx.amounts,
            U256::from(ctx.action_index),
        )
    }

    pub fn lender(&self) -> Address {
        self.lender.get()
    }
}

impl FlashHost for FlashOrchestrator {
    fn this(&self) -> Address {
        self.vm().contract_address()
    }

    fn lender(&self) -> Address {
        self.lender.get()
    }

    fn balance_of(&self, token: Address) -> Result<U256, Revert> {
        let this = FlashHost::this(self);
        erc20::balance_of(self.vm(), &self, token, this)
    }

    fn pull(&mut self, token: Address, from: Address, amount: U256) -> Result<(), Revert> {
        let this = FlashHost::this(self);
        erc20::safe_transfer_from(self.vm(), &self, token, from, this, amount)
    }

    fn transfer(&mut self, token: Address, to: Address, amount: U256) -> Result<(), Revert> {
        erc20::safe_transfer(self.vm(), &self, token, to, amount)
    }

    fn force_approve(&mut self, token: Address, spender: Address, amount: U256) -> Result<(), Revert> {
        erc20::force_approve(self.vm(), &self, token, spender, amount)
    }

    fn native_balance(&self) -> U256 {
        self.vm().balance(FlashHost::this(self))
    }

    fn send_native(&mut self, to: Address, amount: U256) -> Result<(), Revert> {
        unsafe { RawCall::new_with_value(amount).flush_storage_cache().call(to, &[]) }.map(|_| ())
    }

    fn flash_loan(&mut self, token: Address, amount: U256, ctx: &mut FlashContext) -> Result<(), Revert> {
        self.context.set_bytes(ctx.encode());
        let call = ILendingProtocol::flashLoanCall {
            token,
            assets: amount,
            data: Default::default(),
        };
        let lender = self.lender.get();
        self.vm().call(&self, lender, &call.abi_encode())?;
        // The callback stored the context with its results.
        *ctx = FlashContext::decode(&self.context.get_bytes()).ok_or_else(Revert::new)?;
        Ok(())
    }

    fn call_hook(
        &mut self,
        target: Address,
        value: U256,
        data: &[u8],
        ctx: &FlashContext,
    ) -> Result<Vec<u8>, Revert> {
        self.context.set_bytes(ctx.encode());
        let call = IFlashloanHook::onFlashloanHookCall {
            data: data.to_vec().into(),
        };
        let out = unsafe {
            RawCall::new_with_value(value)
                .clear_storage_cache()
                .call(target, &call.abi_encode())
        }?;
        IFlashloanHook::onFlashloanHookCall::abi_decode_returns(&out, false)
            .map(|r| r.result.to_vec())
            .map_err(|_| Vec::new())
    }

    fn emit(&mut self, event: FlashEvent) {
        match event {
            FlashEvent::HookExecuted(e) => log(self.vm(), e),
            FlashEvent::FlashExecuted(e) => log(self.vm(), e),
        }
    }
}
