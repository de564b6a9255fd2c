//! secp256k1 signing and recovery for EIP-712 digests.

use alloy_primitives::{Address, FixedBytes};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use relay_types::{Authorization, CancelAuthorization};
use sha3::{Digest, Keccak256};

use crate::encoder::{authorization_digest, cancel_digest};

/// Ethereum address of a verifying key: last 20 bytes of keccak256(uncompressed point without prefix).
pub fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    let hash = Keccak256::digest(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..32])
}

pub fn signer_address(signing_key: &SigningKey) -> Address {
    address_of(signing_key.verifying_key())
}

/// Sign a 32-byte digest, returning `r || s || v` with `v` in {27, 28}.
pub fn sign_digest(
    signing_key: &SigningKey,
    digest: FixedBytes<32>,
) -> Result<[u8; 65], k256::ecdsa::Error> {
    let (signature, recovery_id) = signing_key.sign_prehash_recoverable(digest.as_slice())?;
    let mut out = [0u8; 65];
    out[..64].copy_from_slice(&signature.to_bytes());
    out[64] = 27 + recovery_id.to_byte();
    Ok(out)
}

/// Recover the signer of `digest`. Accepts `v` in {0, 1, 27, 28}; anything else is rejected.
pub fn recover_signer(digest: FixedBytes<32>, sig: &[u8]) -> Option<Address> {
    if sig.len() != 65 {
        return None;
    }
    let v = match sig[64] {
        27 | 28 => sig[64] - 27,
        0 | 1 => sig[64],
        _ => return None,
    };
    let signature = Signature::from_slice(&sig[..64]).ok()?;
    let recovery_id = RecoveryId::from_byte(v)?;
    let key = VerifyingKey::recover_from_prehash(digest.as_slice(), &signature, recovery_id).ok()?;
    Some(address_of(&key))
}

/// Fill `auth.signature` with a signature over its digest for the given ledger deployment.
pub fn sign_authorization(
    auth: &mut Authorization,
    chain_id: u64,
    verifying_contract: Address,
    signing_key: &SigningKey,
) -> Result<(), k256::ecdsa::Error> {
    let digest = authorization_digest(chain_id, verifying_contract, auth);
    auth.signature = sign_digest(signing_key, digest)?.to_vec();
    Ok(())
}

pub fn sign_cancel(
    cancel: &CancelAuthorization,
    chain_id: u64,
    verifying_contract: Address,
    signing_key: &SigningKey,
) -> Result<[u8; 65], k256::ecdsa::Error> {
    sign_digest(signing_key, cancel_digest(chain_id, verifying_contract, cancel))
}
