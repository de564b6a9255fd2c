//! Orchestration state machine.
//!
//! `execute` validates the request, takes custody of the user tokens and asks the lender for the
//! flash loan. The lender's callback lands in `on_flash_loan`, which runs every action with a
//! bracketed approval and finally approves the lender for the amount owed. Back in `execute`,
//! residual user tokens and native currency go back to the sender.
//!
//! Repayment is not checked here: if the hooks leave too little of the flash token, the
//! lender's own pull fails and its revert data is what the caller sees.

use alloc::vec::Vec;

use alloy_primitives::{Address, Bytes, U256};

use crate::{
    context::{FlashContext, FlashRequest},
    errors::{
        ArrayLengthMismatch, FlashError, InvalidAddress, NoActionsProvided, OrchestratorError,
        RecursiveCallNotAllowed,
    },
    events::{FlashEvent, FlashExecuted, HookExecuted},
    host::FlashHost,
};

fn validate(request: &FlashRequest) -> Result<(), OrchestratorError> {
    if request.tokens.len() != request.amounts.len() {
        return Err(OrchestratorError::ArrayLengthMismatch(ArrayLengthMismatch {
            tokens: U256::from(request.tokens.len()),
            amounts: U256::from(request.amounts.len()),
        }));
    }
    if request.flash_token == Address::ZERO {
        return Err(OrchestratorError::InvalidAddress(InvalidAddress {}));
    }
    if request.actions.is_empty() {
        return Err(OrchestratorError::NoActionsProvided(NoActionsProvided {}));
    }
    Ok(())
}

/// Run one orchestration for `sender`. Returns the result bytes of every action, in order.
pub fn execute<H: FlashHost>(
    host: &mut H,
    sender: Address,
    request: FlashRequest,
) -> Result<Vec<Vec<u8>>, FlashError> {
    validate(&request)?;

    for (token, amount) in request.tokens.iter().zip(&request.amounts) {
        if !amount.is_zero() {
            host.pull(*token, sender, *amount).map_err(FlashError::Reverted)?;
        }
    }

    let mut ctx = FlashContext::open(sender, request);
    host.flash_loan(ctx.flash_token, ctx.flash_amount, &mut ctx)
        .map_err(FlashError::Reverted)?;

    for token in ctx.user_tokens() {
        let residual = host.balance_of(token).map_err(FlashError::Reverted)?;
        if !residual.is_zero() {
            host.transfer(token, sender, residual)
                .map_err(FlashError::Reverted)?;
        }
    }
    let native = host.native_balance();
    if !native.is_zero() {
        host.send_native(sender, native).map_err(FlashError::Reverted)?;
    }

    host.emit(FlashEvent::FlashExecuted(FlashExecuted {
        sender,
        flashToken: ctx.flash_token,
        flashAmount: ctx.flash_amount,
        actionCount: U256::from(ctx.actions.len()),
    }));
    Ok(ctx.results)
}

/// Lender callback body. `assets` is the amount owed back, fee included.
pub fn on_flash_loan<H: FlashHost>(
    host: &mut H,
    ctx: &mut FlashContext,
    assets: U256,
) -> Result<(), FlashError> {
    let this = host.this();
    let held = ctx.held_tokens();

    for index in 0..ctx.actions.len() {
        ctx.action_index = index;
        let action = ctx.actions[index].clone();
        if action.target == Address::ZERO {
            return Err(OrchestratorError::InvalidAddress(InvalidAddress {}).into());
        }
        if action.target == this {
            return Err(OrchestratorError::RecursiveCallNotAllowed(RecursiveCallNotAllowed {
                index: U256::from(index),
            })
            .into());
        }

        for token in &held {
            let balance = host.balance_of(*token).map_err(FlashError::Reverted)?;
            host.force_approve(*token, action.target, balance)
                .map_err(FlashError::Reverted)?;
        }
        let result = host
            .call_hook(action.target, action.value, &action.data, ctx)
            .map_err(FlashError::Reverted)?;
        for token in &held {
            host.force_approve(*token, action.target, U256::ZERO)
                .map_err(FlashError::Reverted)?;
        }

        host.emit(FlashEvent::HookExecuted(HookExecuted {
            index: U256::from(index),
            target: action.target,
            value: action.value,
            result: Bytes::from(result.clone()),
        }));
        ctx.results.push(result);
    }

    let lender = host.lender();
    host.force_approve(ctx.flash_token, lender, assets)
        .map_err(FlashError::Reverted)?;
    Ok(())
}
