//! Pure precondition checks. Each takes the state it needs explicitly.

use alloy_primitives::{Address, U256};
use relay_types::{Allowance, OperationKind};

use crate::errors::{
    AuthorizationExpired, AuthorizationNotYetValid, InsufficientBalance, InvalidValidityWindow,
    LedgerError, NotAuthorized,
};

/// `valid_after <= now <= valid_before`, with a non-empty window.
pub fn check_window(now: u64, valid_after: U256, valid_before: U256) -> Result<(), LedgerError> {
    if valid_after >= valid_before {
        return Err(LedgerError::InvalidValidityWindow(InvalidValidityWindow {
            validAfter: valid_after,
            validBefore: valid_before,
        }));
    }
    let now = U256::from(now);
    if now < valid_after {
        return Err(LedgerError::AuthorizationNotYetValid(AuthorizationNotYetValid {
            validAfter: valid_after,
            timestamp: now,
        }));
    }
    if now > valid_before {
        return Err(LedgerError::AuthorizationExpired(AuthorizationExpired {
            validBefore: valid_before,
            timestamp: now,
        }));
    }
    Ok(())
}

/// Allowance left after a delegated execution of `amount`, or `NotAuthorized`.
pub fn consume_allowance(
    current: Allowance,
    kind: OperationKind,
    amount: U256,
    from: Address,
    signer: Address,
) -> Result<Allowance, LedgerError> {
    let available = current.of(kind);
    if available < amount {
        return Err(LedgerError::NotAuthorized(NotAuthorized {
            from,
            signer,
            kind: kind as u8,
            allowance: available,
        }));
    }
    Ok(current.with(kind, available - amount))
}

/// Internal balance after debiting `need`, or `InsufficientBalance`. Never clamps.
pub fn debit(have: U256, owner: Address, token: Address, need: U256) -> Result<U256, LedgerError> {
    if have < need {
        return Err(LedgerError::InsufficientBalance(InsufficientBalance {
            owner,
            token,
            have,
            need,
        }));
    }
    Ok(have - need)
}
