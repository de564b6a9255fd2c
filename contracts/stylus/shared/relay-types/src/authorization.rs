//! Signed authorization payloads and the per-delegate allowance record.

use alloc::vec::Vec;

use alloy_primitives::{keccak256, Address, FixedBytes, U256};

use crate::{
    kinds::OperationKind,
    signing::{address_word, u8_word, SigningDomain},
};

/// keccak256("Authorization(uint8 kind,address from,address to,address token,uint256 amount,bytes32 nonce,uint256 validAfter,uint256 validBefore)")
pub fn authorization_type_hash() -> FixedBytes<32> {
    keccak256(
        b"Authorization(uint8 kind,address from,address to,address token,uint256 amount,bytes32 nonce,uint256 validAfter,uint256 validBefore)",
    )
}

/// keccak256("CancelAuthorization(address signer,bytes32 nonce)")
pub fn cancel_authorization_type_hash() -> FixedBytes<32> {
    keccak256(b"CancelAuthorization(address signer,bytes32 nonce)")
}

/// A signed, time-bounded fund-movement instruction. Constructed per call, never stored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Authorization {
    pub kind: OperationKind,
    pub from: Address,
    pub to: Address,
    pub token: Address,
    pub amount: U256,
    /// One-time token, unique per signer.
    pub nonce: FixedBytes<32>,
    pub valid_after: U256,
    pub valid_before: U256,
    /// ECDSA signature (r||s||v) over `digest(domain)`.
    pub signature: Vec<u8>,
}

impl Authorization {
    /// EIP-712 struct hash over every field except the signature.
    pub fn struct_hash(&self) -> FixedBytes<32> {
        let mut struct_buf = Vec::with_capacity(32 * 9);
        struct_buf.extend_from_slice(authorization_type_hash().as_slice());
        struct_buf.extend_from_slice(&u8_word(self.kind as u8));
        struct_buf.extend_from_slice(&address_word(self.from));
        struct_buf.extend_from_slice(&address_word(self.to));
        struct_buf.extend_from_slice(&address_word(self.token));
        struct_buf.extend_from_slice(&self.amount.to_be_bytes::<32>());
        struct_buf.extend_from_slice(self.nonce.as_slice());
        struct_buf.extend_from_slice(&self.valid_after.to_be_bytes::<32>());
        struct_buf.extend_from_slice(&self.valid_before.to_be_bytes::<32>());
        keccak256(struct_buf)
    }

    pub fn digest(&self, domain: &SigningDomain) -> FixedBytes<32> {
        domain.digest(self.struct_hash())
    }
}

/// Signer-issued request to burn an unused nonce.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CancelAuthorization {
    pub signer: Address,
    pub nonce: FixedBytes<32>,
}

impl CancelAuthorization {
    pub fn struct_hash(&self) -> FixedBytes<32> {
        let mut struct_buf = Vec::with_capacity(32 * 3);
        struct_buf.extend_from_slice(cancel_authorization_type_hash().as_slice());
        struct_buf.extend_from_slice(&address_word(self.signer));
        struct_buf.extend_from_slice(self.nonce.as_slice());
        keccak256(struct_buf)
    }

    pub fn digest(&self, domain: &SigningDomain) -> FixedBytes<32> {
        domain.digest(self.struct_hash())
    }
}

/// Quotas an owner grants a delegate signer for one token, one counter per operation kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Allowance {
    pub deposit: U256,
    pub transfer: U256,
    pub process: U256,
    pub claim: U256,
}

impl Allowance {
    pub fn of(&self, kind: OperationKind) -> U256 {
        match kind {
            OperationKind::Transfer => self.transfer,
            OperationKind::Deposit => self.deposit,
            OperationKind::Process => self.process,
            OperationKind::Claim => self.claim,
        }
    }

    pub fn with(mut self, kind: OperationKind, value: U256) -> Self {
        match kind {
            OperationKind::Transfer => self.transfer = value,
            OperationKind::Deposit => self.deposit = value,
            OperationKind::Process => self.process = value,
            OperationKind::Claim => self.claim = value,
        }
        self
    }
}
