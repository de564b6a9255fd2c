//! Authorization processing.
//!
//! Every entrypoint runs its checks in a fixed order: signature, nonce, validity window,
//! allowance, then bookkeeping (allowance, nonce) and finally the kind-specific effect, which
//! re-checks internal balances right before mutating them. The host reverts the whole call on
//! any error, so no partial application is observable.

use alloy_primitives::{Address, FixedBytes, U256};
use relay_types::{Allowance, Authorization, CancelAuthorization, OperationKind};

use crate::{
    errors::{
        AllowanceOverflow, BalanceOverflow, EmptyBatch, LedgerError, NonceAlreadyUsed,
        SignatureInvalid, TokenCallFailed,
    },
    events::{
        AllowanceUsed, AuthorizationCanceled, Authorized, Claim, Deposit, LedgerEvent, NonceUsed,
        Process, Transfer,
    },
    host::{LedgerHost, LedgerStore},
    validation::{check_window, consume_allowance, debit},
};

/// Verify and apply one signed authorization. Returns the recovered signer.
pub fn execute<S: LedgerStore, H: LedgerHost>(
    store: &mut S,
    host: &mut H,
    auth: &Authorization,
) -> Result<Address, LedgerError> {
    let signer = host.recover(auth.digest(&host.domain()), &auth.signature);
    if signer == Address::ZERO {
        return Err(LedgerError::SignatureInvalid(SignatureInvalid {}));
    }

    if store.is_nonce_used(signer, auth.nonce) {
        return Err(LedgerError::NonceAlreadyUsed(NonceAlreadyUsed {
            signer,
            nonce: auth.nonce,
        }));
    }

    check_window(host.now(), auth.valid_after, auth.valid_before)?;

    let remaining = if auth.from != signer {
        let current = store.allowance(auth.from, signer, auth.token);
        Some(consume_allowance(current, auth.kind, auth.amount, auth.from, signer)?)
    } else {
        None
    };

    if let Some(remaining) = remaining {
        store.set_allowance(auth.from, signer, auth.token, remaining);
        host.emit(LedgerEvent::AllowanceUsed(AllowanceUsed {
            owner: auth.from,
            signer,
            token: auth.token,
            kind: auth.kind as u8,
            amount: auth.amount,
        }));
    }

    store.mark_nonce_used(signer, auth.nonce);
    host.emit(LedgerEvent::NonceUsed(NonceUsed {
        signer,
        nonce: auth.nonce,
    }));

    apply(store, host, auth, signer)?;
    Ok(signer)
}

fn apply<S: LedgerStore, H: LedgerHost>(
    store: &mut S,
    host: &mut H,
    auth: &Authorization,
    signer: Address,
) -> Result<(), LedgerError> {
    let Authorization {
        kind,
        from,
        to,
        token,
        amount,
        ..
    } = *auth;

    match kind {
        OperationKind::Transfer => {
            host.transfer_from(token, from, to, amount)
                .map_err(|_| token_failure(token))?;
            host.emit(LedgerEvent::Transfer(Transfer {
                from,
                to,
                token,
                amount,
                signer,
            }));
        }
        OperationKind::Deposit => {
            let this = host.this();
            host.transfer_from(token, from, this, amount)
                .map_err(|_| token_failure(token))?;
            credit(store, to, token, amount)?;
            host.emit(LedgerEvent::Deposit(Deposit {
                from,
                to,
                token,
                amount,
                signer,
            }));
        }
        OperationKind::Process => {
            let left = debit(store.balance(from, token), from, token, amount)?;
            store.set_balance(from, token, left);
            credit(store, to, token, amount)?;
            host.emit(LedgerEvent::Process(Process {
                from,
                to,
                token,
                amount,
                signer,
            }));
        }
        OperationKind::Claim => {
            let left = debit(store.balance(from, token), from, token, amount)?;
            store.set_balance(from, token, left);
            host.transfer(token, to, amount)
                .map_err(|_| token_failure(token))?;
            host.emit(LedgerEvent::Claim(Claim {
                from,
                to,
                token,
                amount,
                signer,
            }));
        }
    }
    Ok(())
}

fn credit<S: LedgerStore>(
    store: &mut S,
    owner: Address,
    token: Address,
    amount: U256,
) -> Result<(), LedgerError> {
    let balance = store
        .balance(owner, token)
        .checked_add(amount)
        .ok_or(LedgerError::BalanceOverflow(BalanceOverflow { owner, token }))?;
    store.set_balance(owner, token, balance);
    Ok(())
}

fn token_failure(token: Address) -> LedgerError {
    LedgerError::TokenCallFailed(TokenCallFailed { token })
}

/// Execute authorizations strictly in order; any failure fails the whole batch.
pub fn batch_execute<S: LedgerStore, H: LedgerHost>(
    store: &mut S,
    host: &mut H,
    auths: &[Authorization],
) -> Result<(), LedgerError> {
    if auths.is_empty() {
        return Err(LedgerError::EmptyBatch(EmptyBatch {}));
    }
    for auth in auths {
        execute(store, host, auth)?;
    }
    Ok(())
}

/// Overwrite the full allowance record `owner` grants `signer` for `token`.
pub fn authorize<S: LedgerStore, H: LedgerHost>(
    store: &mut S,
    host: &mut H,
    owner: Address,
    signer: Address,
    token: Address,
    allowance: Allowance,
) {
    store.set_allowance(owner, signer, token, allowance);
    host.emit(authorized_event(owner, signer, token, allowance));
}

/// Add `amount` to one counter of the current allowance, then store the whole record.
pub fn authorize_auth<S: LedgerStore, H: LedgerHost>(
    store: &mut S,
    host: &mut H,
    owner: Address,
    signer: Address,
    token: Address,
    kind: OperationKind,
    amount: U256,
) -> Result<Allowance, LedgerError> {
    let current = store.allowance(owner, signer, token);
    let raised = current.of(kind).checked_add(amount).ok_or(LedgerError::AllowanceOverflow(
        AllowanceOverflow {
            owner,
            signer,
            token,
            kind: kind as u8,
        },
    ))?;
    let allowance = current.with(kind, raised);
    authorize(store, host, owner, signer, token, allowance);
    Ok(allowance)
}

fn authorized_event(owner: Address, signer: Address, token: Address, a: Allowance) -> LedgerEvent {
    LedgerEvent::Authorized(Authorized {
        owner,
        signer,
        token,
        deposit: a.deposit,
        transfer: a.transfer,
        process: a.process,
        claim: a.claim,
    })
}

/// Burn an unused nonce without executing anything.
pub fn cancel_nonce<S: LedgerStore, H: LedgerHost>(
    store: &mut S,
    host: &mut H,
    signer: Address,
    nonce: FixedBytes<32>,
) -> Result<(), LedgerError> {
    if store.is_nonce_used(signer, nonce) {
        return Err(LedgerError::NonceAlreadyUsed(NonceAlreadyUsed { signer, nonce }));
    }
    store.mark_nonce_used(signer, nonce);
    host.emit(LedgerEvent::AuthorizationCanceled(AuthorizationCanceled {
        signer,
        nonce,
    }));
    Ok(())
}

/// Relayed cancellation: the signer signs a `CancelAuthorization` for the nonce.
pub fn cancel_authorization<S: LedgerStore, H: LedgerHost>(
    store: &mut S,
    host: &mut H,
    cancel: &CancelAuthorization,
    signature: &[u8],
) -> Result<(), LedgerError> {
    let recovered = host.recover(cancel.digest(&host.domain()), signature);
    if recovered == Address::ZERO || recovered != cancel.signer {
        return Err(LedgerError::SignatureInvalid(SignatureInvalid {}));
    }
    cancel_nonce(store, host, cancel.signer, cancel.nonce)
}
