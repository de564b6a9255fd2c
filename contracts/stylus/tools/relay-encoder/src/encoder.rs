use alloy_primitives::{Address, Bytes, FixedBytes, U256};
use alloy_sol_types::SolCall;
use relay_types::{Authorization, CancelAuthorization};
use sha3::{Digest, Keccak256};

use crate::types::IRelayLedger;

fn keccak256_bytes(bytes: &[u8]) -> FixedBytes<32> {
    let mut h = Keccak256::new();
    h.update(bytes);
    let out = h.finalize();
    let mut b = [0u8; 32];
    b.copy_from_slice(out.as_slice());
    FixedBytes(b)
}

fn word_address(address: Address) -> [u8; 32] {
    let mut padded = [0u8; 32];
    padded[12..32].copy_from_slice(address.as_slice());
    padded
}

fn domain_separator(chain_id: u64, verifying_contract: Address) -> FixedBytes<32> {
    let domain_type_hash = keccak256_bytes(
        b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)",
    );
    let domain_name_hash = keccak256_bytes(b"Relay Ledger");
    let domain_version_hash = keccak256_bytes(b"1");

    let mut domain_buf = Vec::with_capacity(32 * 5);
    domain_buf.extend_from_slice(domain_type_hash.as_slice());
    domain_buf.extend_from_slice(domain_name_hash.as_slice());
    domain_buf.extend_from_slice(domain_version_hash.as_slice());
    domain_buf.extend_from_slice(&U256::from(chain_id).to_be_bytes::<32>());
    domain_buf.extend_from_slice(&word_address(verifying_contract));
    keccak256_bytes(&domain_buf)
}

fn finalize(separator: FixedBytes<32>, struct_hash: FixedBytes<32>) -> FixedBytes<32> {
    let mut final_buf = Vec::with_capacity(2 + 32 + 32);
    final_buf.extend_from_slice(b"\x19\x01");
    final_buf.extend_from_slice(separator.as_slice());
    final_buf.extend_from_slice(struct_hash.as_slice());
    keccak256_bytes(&final_buf)
}

/// Compute the authorization EIP-712 digest (must match the ledger's on-chain digest).
pub fn authorization_digest(
    chain_id: u64,
    verifying_contract: Address,
    auth: &Authorization,
) -> FixedBytes<32> {
    let msg_type_hash = keccak256_bytes(
        b"Authorization(uint8 kind,address from,address to,address token,uint256 amount,bytes32 nonce,uint256 validAfter,uint256 validBefore)",
    );

    let mut struct_buf = Vec::with_capacity(32 * 9);
    struct_buf.extend_from_slice(msg_type_hash.as_slice());
    let mut kind_padded = [0u8; 32];
    kind_padded[31] = auth.kind as u8;
    struct_buf.extend_from_slice(&kind_padded);
    struct_buf.extend_from_slice(&word_address(auth.from));
    struct_buf.extend_from_slice(&word_address(auth.to));
    struct_buf.extend_from_slice(&word_address(auth.token));
    struct_buf.extend_from_slice(&auth.amount.to_be_bytes::<32>());
    struct_buf.extend_from_slice(auth.nonce.as_slice());
    struct_buf.extend_from_slice(&auth.valid_after.to_be_bytes::<32>());
    struct_buf.extend_from_slice(&auth.valid_before.to_be_bytes::<32>());
    let struct_hash = keccak256_bytes(&struct_buf);

    finalize(domain_separator(chain_id, verifying_contract), struct_hash)
}

/// Compute the cancel-authorization EIP-712 digest.
pub fn cancel_digest(
    chain_id: u64,
    verifying_contract: Address,
    cancel: &CancelAuthorization,
) -> FixedBytes<32> {
    let msg_type_hash = keccak256_bytes(b"CancelAuthorization(address signer,bytes32 nonce)");
    let mut struct_buf = Vec::with_capacity(32 * 3);
    struct_buf.extend_from_slice(msg_type_hash.as_slice());
    struct_buf.extend_from_slice(&word_address(cancel.signer));
    struct_buf.extend_from_slice(cancel.nonce.as_slice());
    let struct_hash = keccak256_bytes(&struct_buf);

    finalize(domain_separator(chain_id, verifying_contract), struct_hash)
}

fn as_tuple(
    auth: &Authorization,
) -> (u8, Address, Address, Address, U256, FixedBytes<32>, U256, U256, Bytes) {
    (
        auth.kind as u8,
        auth.from,
        auth.to,
        auth.token,
        auth.amount,
        auth.nonce,
        auth.valid_after,
        auth.valid_before,
        Bytes::from(auth.signature.clone()),
    )
}

/// Calldata for `execute(...)` carrying one signed authorization.
pub fn encode_execute(auth: &Authorization) -> Vec<u8> {
    IRelayLedger::executeCall {
        kind: auth.kind as u8,
        from: auth.from,
        to: auth.to,
        token: auth.token,
        amount: auth.amount,
        nonce: auth.nonce,
        validAfter: auth.valid_after,
        validBefore: auth.valid_before,
        signature: Bytes::from(auth.signature.clone()),
    }
    .abi_encode()
}

/// Calldata for `batchExecute(...)`; entries execute on-chain in the given order.
pub fn encode_batch_execute(auths: &[Authorization]) -> Vec<u8> {
    IRelayLedger::batchExecuteCall {
        authorizations: auths.iter().map(as_tuple).collect(),
    }
    .abi_encode()
}

/// Calldata for `cancelAuthorization(signer, nonce, signature)`.
pub fn encode_cancel(cancel: &CancelAuthorization, signature: &[u8]) -> Vec<u8> {
    IRelayLedger::cancelAuthorizationCall {
        signer: cancel.signer,
        nonce: cancel.nonce,
        signature: Bytes::copy_from_slice(signature),
    }
    .abi_encode()
}
