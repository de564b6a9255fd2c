//! Opcode interpreter.
//!
//! Every opcode starts by pulling the orchestrator's whole loan-token balance (the flash amount
//! plus any loan token the caller provided) and must leave exactly `flash_amount` of the loan
//! token back on the orchestrator, which then repays the lender. Vault shares are pulled only up
//! to what the caller declared in the context. The hook itself holds nothing once an opcode
//! returns.

use alloc::vec::Vec;

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolValue;
use relay_types::LeverageOpcode;

use crate::{
    errors::{HookError, InvalidMarket, InvalidOpcode, LeverageError, MathOverflow, MissingOpcode, NotOrchestrator},
    events::{LeverageEvent, LeverageExecuted},
    host::{FlashView, LeverageConfig, LeverageHost},
};

/// What one opcode moved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Outcome {
    /// Vault shares supplied (increase) or withdrawn (others) as collateral.
    pub collateral: U256,
    /// Loan assets borrowed (increase) or repaid (others).
    pub assets: U256,
}

impl Outcome {
    pub fn encode(&self) -> Vec<u8> {
        (self.collateral, self.assets).abi_encode_params()
    }
}

pub fn parse_opcode(data: &[u8]) -> Result<LeverageOpcode, LeverageError> {
    let byte = *data
        .first()
        .ok_or(LeverageError::MissingOpcode(MissingOpcode {}))?;
    LeverageOpcode::try_from(byte).map_err(|_| LeverageError::InvalidOpcode(InvalidOpcode { opcode: byte }))
}

/// `onFlashloanHook` body. `caller` must be the configured orchestrator.
pub fn run<H: LeverageHost>(
    host: &mut H,
    config: &LeverageConfig,
    caller: Address,
    data: &[u8],
) -> Result<Vec<u8>, HookError> {
    if caller != config.orchestrator {
        return Err(LeverageError::NotOrchestrator(NotOrchestrator { caller }).into());
    }
    let opcode = parse_opcode(data)?;
    let flash = host.flash_context(config.orchestrator)?;
    if flash.flash_token != config.market.loan_token {
        return Err(LeverageError::InvalidMarket(InvalidMarket {}).into());
    }

    let this = host.this();
    let loan = config.market.loan_token;
    let available = host.balance_of(loan, config.orchestrator)?;
    if !available.is_zero() {
        host.transfer_from(loan, config.orchestrator, this, available)?;
    }

    let outcome = match opcode {
        LeverageOpcode::IncreaseLeverage => increase(host, config, &flash, available)?,
        LeverageOpcode::DecreaseLeverage => decrease(host, config, &flash, available)?,
        LeverageOpcode::CloseToLoan => close(host, config, &flash, available, false)?,
        LeverageOpcode::CloseToCollateral => close(host, config, &flash, available, true)?,
    };

    host.emit(LeverageEvent::LeverageExecuted(LeverageExecuted {
        account: flash.sender,
        opcode: opcode as u8,
        flashAmount: flash.flash_amount,
        collateral: outcome.collateral,
        assets: outcome.assets,
    }));
    Ok(outcome.encode())
}

/// Vault the loan token, post the shares (plus any shares the caller provided) as collateral,
/// and borrow the flash amount straight back to the orchestrator.
fn increase<H: LeverageHost>(
    host: &mut H,
    config: &LeverageConfig,
    flash: &FlashView,
    available: U256,
) -> Result<Outcome, HookError> {
    let this = host.this();
    let market = &config.market;

    let minted = if available.is_zero() {
        U256::ZERO
    } else {
        host.approve(market.loan_token, config.vault, available)?;
        host.vault_deposit(available, this)?
    };

    let declared = flash.provided(market.collateral_token);
    let provided = if declared.is_zero() {
        U256::ZERO
    } else {
        declared.min(host.balance_of(market.collateral_token, config.orchestrator)?)
    };
    if !provided.is_zero() {
        host.transfer_from(market.collateral_token, config.orchestrator, this, provided)?;
    }

    let collateral = minted
        .checked_add(provided)
        .ok_or(LeverageError::MathOverflow(MathOverflow {}))?;
    host.approve(market.collateral_token, config.lender, collateral)?;
    host.supply_collateral(market, collateral, flash.sender)?;

    let (borrowed, _) = host.borrow(
        market,
        flash.flash_amount,
        U256::ZERO,
        flash.sender,
        config.orchestrator,
    )?;
    Ok(Outcome {
        collateral,
        assets: borrowed,
    })
}

/// Repay with everything pulled, capped at the position's debt, then free just enough
/// collateral to cover what the repayment left short of the flash amount. Loan token beyond the
/// debt and the flash amount goes back to the caller.
fn decrease<H: LeverageHost>(
    host: &mut H,
    config: &LeverageConfig,
    flash: &FlashView,
    available: U256,
) -> Result<Outcome, HookError> {
    let this = host.this();
    let market = &config.market;
    let id = market.id();
    let position = host.position(id, flash.sender)?;
    let debt = host
        .market_totals(id)?
        .debt_of(position.borrow_shares)
        .ok_or(LeverageError::MathOverflow(MathOverflow {}))?;

    let repaid = if available.is_zero() || debt.is_zero() {
        U256::ZERO
    } else {
        host.approve(market.loan_token, config.lender, available)?;
        // Full repayment goes by shares so no borrow dust remains.
        let (repaid, _) = if available >= debt {
            host.repay(market, U256::ZERO, position.borrow_shares, flash.sender)?
        } else {
            host.repay(market, available, U256::ZERO, flash.sender)?
        };
        host.approve(market.loan_token, config.lender, U256::ZERO)?;
        repaid
    };

    let short = flash.flash_amount.saturating_sub(available.saturating_sub(repaid));
    let shares = if short.is_zero() {
        U256::ZERO
    } else {
        let shares = host.vault_preview_withdraw(short)?;
        host.withdraw_collateral(market, shares, flash.sender, this)?;
        let burned = host.vault_withdraw(short, this, this)?;
        let leftover = shares.saturating_sub(burned);
        if !leftover.is_zero() {
            host.transfer(market.collateral_token, flash.sender, leftover)?;
        }
        shares
    };

    host.transfer(market.loan_token, config.orchestrator, flash.flash_amount)?;
    pay_out(host, market.loan_token, flash.sender)?;
    Ok(Outcome {
        collateral: shares,
        assets: repaid,
    })
}

/// Repay the whole position by shares and withdraw all of its collateral. The caller's equity
/// is paid out in loan token, or in vault shares when `to_collateral` is set.
fn close<H: LeverageHost>(
    host: &mut H,
    config: &LeverageConfig,
    flash: &FlashView,
    available: U256,
    to_collateral: bool,
) -> Result<Outcome, HookError> {
    let this = host.this();
    let market = &config.market;
    let position = host.position(market.id(), flash.sender)?;

    let repaid = if position.borrow_shares.is_zero() {
        U256::ZERO
    } else {
        host.approve(market.loan_token, config.lender, available)?;
        let (repaid, _) = host.repay(market, U256::ZERO, position.borrow_shares, flash.sender)?;
        host.approve(market.loan_token, config.lender, U256::ZERO)?;
        repaid
    };
    if !position.collateral.is_zero() {
        host.withdraw_collateral(market, position.collateral, flash.sender, this)?;
    }

    if to_collateral {
        let balance = host.balance_of(market.loan_token, this)?;
        if balance < flash.flash_amount {
            host.vault_withdraw(flash.flash_amount - balance, this, this)?;
        } else if balance > flash.flash_amount {
            let surplus = balance - flash.flash_amount;
            host.approve(market.loan_token, config.vault, surplus)?;
            host.vault_deposit(surplus, this)?;
        }
        host.transfer(market.loan_token, config.orchestrator, flash.flash_amount)?;
        pay_out(host, market.collateral_token, flash.sender)?;
    } else {
        if !position.collateral.is_zero() {
            host.vault_redeem(position.collateral, this, this)?;
        }
        host.transfer(market.loan_token, config.orchestrator, flash.flash_amount)?;
        pay_out(host, market.loan_token, flash.sender)?;
    }

    Ok(Outcome {
        collateral: position.collateral,
        assets: repaid,
    })
}

fn pay_out<H: LeverageHost>(host: &mut H, token: Address, to: Address) -> Result<(), HookError> {
    let this = host.this();
    let balance = host.balance_of(token, this)?;
    if !balance.is_zero() {
        host.transfer(token, to, balance)?;
    }
    Ok(())
}

/// Loan assets `account` owes, rounded up.
pub fn debt_of<H: LeverageHost>(host: &H, config: &LeverageConfig, account: Address) -> Result<U256, HookError> {
    let id = config.market.id();
    let position = host.position(id, account)?;
    let totals = host.market_totals(id)?;
    totals
        .debt_of(position.borrow_shares)
        .ok_or_else(|| LeverageError::MathOverflow(MathOverflow {}).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_parsing() {
        assert!(matches!(parse_opcode(&[0]), Ok(LeverageOpcode::IncreaseLeverage)));
        assert!(matches!(parse_opcode(&[3, 0xFF]), Ok(LeverageOpcode::CloseToCollateral)));
        assert!(matches!(parse_opcode(&[]), Err(LeverageError::MissingOpcode(_))));
        match parse_opcode(&[4]) {
            Err(LeverageError::InvalidOpcode(e)) => assert_eq!(e.opcode, 4),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
