//! EIP-712 signing domain shared by every signed payload shape.
//!
//! The domain binds chain id and verifying contract into the digest, so a signature produced for
//! one ledger deployment is never valid on another. Payload types only supply a struct hash.

use alloc::vec::Vec;

use alloy_primitives::{keccak256, Address, FixedBytes, U256};

pub const DOMAIN_NAME: &[u8] = b"Relay Ledger";
pub const DOMAIN_VERSION: &[u8] = b"1";

/// keccak256("EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)")
pub fn domain_type_hash() -> FixedBytes<32> {
    keccak256(b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SigningDomain {
    pub chain_id: u64,
    pub verifying_contract: Address,
}

impl SigningDomain {
    pub fn new(chain_id: u64, verifying_contract: Address) -> Self {
        Self {
            chain_id,
            verifying_contract,
        }
    }

    pub fn separator(&self) -> FixedBytes<32> {
        let mut domain_buf = Vec::with_capacity(32 * 5);
        domain_buf.extend_from_slice(domain_type_hash().as_slice());
        domain_buf.extend_from_slice(keccak256(DOMAIN_NAME).as_slice());
        domain_buf.extend_from_slice(keccak256(DOMAIN_VERSION).as_slice());
        domain_buf.extend_from_slice(&U256::from(self.chain_id).to_be_bytes::<32>());
        domain_buf.extend_from_slice(&address_word(self.verifying_contract));
        keccak256(domain_buf)
    }

    /// Digest a signer must sign for a payload whose EIP-712 struct hash is `struct_hash`.
    pub fn digest(&self, struct_hash: FixedBytes<32>) -> FixedBytes<32> {
        typed_data_digest(self.separator(), struct_hash)
    }
}

/// keccak256("\x19\x01" || domainSeparator || structHash)
pub fn typed_data_digest(domain_separator: FixedBytes<32>, struct_hash: FixedBytes<32>) -> FixedBytes<32> {
    let mut final_buf = Vec::with_capacity(2 + 32 + 32);
    final_buf.extend_from_slice(b"\x19\x01");
    final_buf.extend_from_slice(domain_separator.as_slice());
    final_buf.extend_from_slice(struct_hash.as_slice());
    keccak256(final_buf)
}

/// Left-pad an address into a 32-byte ABI word.
pub fn address_word(address: Address) -> [u8; 32] {
    let mut padded = [0u8; 32];
    padded[12..32].copy_from_slice(address.as_slice());
    padded
}

pub fn u8_word(value: u8) -> [u8; 32] {
    let mut padded = [0u8; 32];
    padded[31] = value;
    padded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separator_depends_on_chain_and_contract() {
        let contract = Address::repeat_byte(0x11);
        let a = SigningDomain::new(1, contract).separator();
        let b = SigningDomain::new(42161, contract).separator();
        let c = SigningDomain::new(1, Address::repeat_byte(0x22)).separator();
        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn digest_is_prefixed_hash() {
        let domain = SigningDomain::new(1, Address::ZERO);
        let struct_hash = FixedBytes::<32>::repeat_byte(7);
        let mut buf = Vec::new();
        buf.extend_from_slice(b"\x19\x01");
        buf.extend_from_slice(domain.separator().as_slice());
        buf.extend_from_slice(struct_hash.as_slice());
        assert_eq!(domain.digest(struct_hash), keccak256(buf));
    }
}
