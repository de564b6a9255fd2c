//! Stylus entrypoint for the relay ledger.
//!
//! Storage layout and the ABI surface live here; every state transition is delegated to
//! `processor`, with this contract acting as the `LedgerStore` and `OnchainHost` providing
//! clock, signature recovery, token calls and the event buffer.

use alloc::vec::Vec;

use stylus_sdk::{
    abi::Bytes,
    alloy_primitives::{Address, FixedBytes, U256},
    prelude::*,
    stylus_core::log,
};

use relay_types::{Allowance, Authorization, CancelAuthorization, OperationKind, Revert, SigningDomain};

use crate::{
    errors::{InvalidOperationKind, LedgerError, ReentrantCall},
    events::LedgerEvent,
    host::{LedgerHost, LedgerStore},
    processor,
    utils::{
        crypto::ecrecover_address,
        erc20::{safe_transfer, safe_transfer_from},
    },
};

/// ABI shape of one authorization inside `batchExecute`:
/// (kind, from, to, token, amount, nonce, validAfter, validBefore, signature).
pub type AuthorizationTuple = (u8, Address, Address, Address, U256, FixedBytes<32>, U256, U256, Bytes);

sol_storage! {
    #[entrypoint]
    pub struct RelayLedger {
        /// owner => delegate signer => token => quotas.
        mapping(address => mapping(address => mapping(address => AllowanceSlot))) allowances;

        /// owner => token => custodial balance.
        mapping(address => mapping(address => uint256)) balances;

        /// signer => nonce => used. Never cleared.
        mapping(address => mapping(bytes32 => bool)) used_nonces;

        bool entered;
    }

    pub struct AllowanceSlot {
        uint256 deposit;
        uint256 transfer;
        uint256 process;
        uint256 claim;
    }
}

#[public]
impl RelayLedger {
    /// Overwrite the allowance the caller grants `signer` for `token`.
    pub fn authorize(
        &mut self,
        signer: Address,
        token: Address,
        deposit: U256,
        transfer: U256,
        process: U256,
        claim: U256,
    ) -> Result<(), LedgerError> {
        self._enter()?;
        let owner = self.vm().msg_sender();
        let mut host = self._host();
        let allowance = Allowance {
            deposit,
            transfer,
            process,
            claim,
        };
        processor::authorize(self, &mut host, owner, signer, token, allowance);
        self._exit(host.events);
        Ok(())
    }

    /// Raise a single counter of the caller's allowance for `signer` by `amount`.
    pub fn authorize_auth(
        &mut self,
        kind: u8,
        signer: Address,
        token: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let kind = parse_kind(kind)?;
        self._enter()?;
        let owner = self.vm().msg_sender();
        let mut host = self._host();
        processor::authorize_auth(self, &mut host, owner, signer, token, kind, amount)?;
        self._exit(host.events);
        Ok(())
    }

    pub fn execute(
        &mut self,
        kind: u8,
        from: Address,
        to: Address,
        token: Address,
        amount: U256,
        nonce: FixedBytes<32>,
        valid_after: U256,
        valid_before: U256,
        signature: Bytes,
    ) -> Result<(), LedgerError> {
        let auth = Authorization {
            kind: parse_kind(kind)?,
            from,
            to,
            token,
            amount,
            nonce,
            valid_after,
            valid_before,
            signature: signature.to_vec(),
        };
        self._enter()?;
        let mut host = self._host();
        processor::execute(self, &mut host, &auth)?;
        self._exit(host.events);
        Ok(())
    }

    /// Execute authorizations in order; one failure reverts them all.
    pub fn batch_execute(&mut self, authorizations: Vec<AuthorizationTuple>) -> Result<(), LedgerError> {
        let mut auths = Vec::with_capacity(authorizations.len());
        for (kind, from, to, token, amount, nonce, valid_after, valid_before, signature) in authorizations {
            auths.push(Authorization {
                kind: parse_kind(kind)?,
                from,
                to,
                token,
                amount,
                nonce,
                valid_after,
                valid_before,
                signature: signature.to_vec(),
            });
        }
        self._enter()?;
        let mut host = self._host();
        processor::batch_execute(self, &mut host, &auths)?;
        self._exit(host.events);
        Ok(())
    }

    /// Burn one of the caller's unused nonces.
    pub fn cancel_nonce(&mut self, nonce: FixedBytes<32>) -> Result<(), LedgerError> {
        self._enter()?;
        let signer = self.vm().msg_sender();
        let mut host = self._host();
        processor::cancel_nonce(self, &mut host, signer, nonce)?;
        self._exit(host.events);
        Ok(())
    }

    /// Relayed cancellation carrying the signer's `CancelAuthorization` signature.
    pub fn cancel_authorization(
        &mut self,
        signer: Address,
        nonce: FixedBytes<32>,
        signature: Bytes,
    ) -> Result<(), LedgerError> {
        self._enter()?;
        let mut host = self._host();
        let cancel = CancelAuthorization { signer, nonce };
        processor::cancel_authorization(self, &mut host, &cancel, &signature)?;
        self._exit(host.events);
        Ok(())
    }

    /// (deposit, transfer, process, claim) quotas `owner` granted `signer` for `token`.
    #[selector(name = "allowance")]
    pub fn allowance_of(&self, owner: Address, signer: Address, token: Address) -> (U256, U256, U256, U256) {
        let a = LedgerStore::allowance(self, owner, signer, token);
        (a.deposit, a.transfer, a.process, a.claim)
    }

    pub fn balance_of(&self, owner: Address, token: Address) -> U256 {
        LedgerStore::balance(self, owner, token)
    }

    #[selector(name = "isNonceUsed")]
    pub fn nonce_used(&self, signer: Address, nonce: FixedBytes<32>) -> bool {
        LedgerStore::is_nonce_used(self, signer, nonce)
    }

    pub fn domain_separator(&self) -> FixedBytes<32> {
        self._domain().separator()
    }

    /// Digest a signer must sign for the given authorization fields.
    pub fn hash_authorization(
        &self,
        kind: u8,
        from: Address,
        to: Address,
        token: Address,
        amount: U256,
        nonce: FixedBytes<32>,
        valid_after: U256,
        valid_before: U256,
    ) -> Result<FixedBytes<32>, LedgerError> {
        let auth = Authorization {
            kind: parse_kind(kind)?,
            from,
            to,
            token,
            amount,
            nonce,
            valid_after,
            valid_before,
            signature: Vec::new(),
        };
        Ok(auth.digest(&self._domain()))
    }
}

impl RelayLedger {
    fn _domain(&self) -> SigningDomain {
        SigningDomain::new(self.vm().chain_id(), self.vm().contract_address())
    }

    fn _host(&self) -> OnchainHost {
        OnchainHost {
            now: self.vm().block_timestamp(),
            domain: self._domain(),
            events: Vec::new(),
        }
    }

    fn _enter(&mut self) -> Result<(), LedgerError> {
        if self.entered.get() {
            return Err(LedgerError::ReentrantCall(ReentrantCall {}));
        }
        self.entered.set(true);
        Ok(())
    }

    /// Release the lock and publish buffered events. Only reached on success.
    fn _exit(&mut self, events: Vec<LedgerEvent>) {
        self.entered.set(false);
        for event in events {
            match event {
                LedgerEvent::Authorized(e) => log(self.vm(), e),
                LedgerEvent::AllowanceUsed(e) => log(self.vm(), e),
                LedgerEvent::NonceUsed(e) => log(self.vm(), e),
                LedgerEvent::AuthorizationCanceled(e) => log(self.vm(), e),
                LedgerEvent::Deposit(e) => log(self.vm(), e),
                LedgerEvent::Transfer(e) => log(self.vm(), e),
                LedgerEvent::Process(e) => log(self.vm(), e),
                LedgerEvent::Claim(e) => log(self.vm(), e),
            }
        }
    }
}

fn parse_kind(kind: u8) -> Result<OperationKind, LedgerError> {
    OperationKind::try_from(kind)
        .map_err(|_| LedgerError::InvalidOperationKind(InvalidOperationKind { kind }))
}

impl LedgerStore for RelayLedger {
    fn allowance(&self, owner: Address, signer: Address, token: Address) -> Allowance {
        let by_owner = self.allowances.getter(owner);
        let by_signer = by_owner.getter(signer);
        let slot = by_signer.getter(token);
        Allowance {
            deposit: slot.deposit.get(),
            transfer: slot.transfer.get(),
            process: slot.process.get(),
            claim: slot.claim.get(),
        }
    }

    fn set_allowance(&mut self, owner: Address, signer: Address, token: Address, allowance: Allowance) {
        let mut by_owner = self.allowances.setter(owner);
        let mut by_signer = by_owner.setter(signer);
        let mut slot = by_signer.setter(token);
        slot.deposit.set(allowance.deposit);
        slot.transfer.set(allowance.transfer);
        slot.process.set(allowance.process);
        slot.claim.set(allowance.claim);
    }

    fn balance(&self, owner: Address, token: Address) -> U256 {
        self.balances.getter(owner).get(token)
    }

    fn set_balance(&mut self, owner: Address, token: Address, amount: U256) {
        self.balances.setter(owner).insert(token, amount);
    }

    fn is_nonce_used(&self, signer: Address, nonce: FixedBytes<32>) -> bool {
        self.used_nonces.getter(signer).get(nonce)
    }

    fn mark_nonce_used(&mut self, signer: Address, nonce: FixedBytes<32>) {
        self.used_nonces.setter(signer).insert(nonce, true);
    }
}

/// Host backed by the live chain. Events are buffered and logged once the call succeeds.
pub struct OnchainHost {
    now: u64,
    domain: SigningDomain,
    events: Vec<LedgerEvent>,
}

impl LedgerHost for OnchainHost {
    fn now(&self) -> u64 {
        self.now
    }

    fn domain(&self) -> SigningDomain {
        self.domain
    }

    fn recover(&self, digest: FixedBytes<32>, signature: &[u8]) -> Address {
        ecrecover_address(digest, signature).unwrap_or(Address::ZERO)
    }

    fn transfer_from(&mut self, token: Address, from: Address, to: Address, amount: U256) -> Result<(), Revert> {
        safe_transfer_from(token, from, to, amount)
    }

    fn transfer(&mut self, token: Address, to: Address, amount: U256) -> Result<(), Revert> {
        safe_transfer(token, to, amount)
    }

    fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }
}
