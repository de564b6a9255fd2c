//! Signature recovery via the EVM `ecrecover` precompile.

use alloc::vec::Vec;

use stylus_sdk::{
    alloy_primitives::{Address, FixedBytes},
    call::RawCall,
};

/// Recover an EOA address from a 32-byte digest and an ECDSA signature (r||s||v).
///
/// Notes:
/// - We use the EVM `ecrecover` precompile at address `0x01`.
/// - We accept v in {0,1,27,28}; any other v or length is rejected.
pub fn ecrecover_address(digest: FixedBytes<32>, sig: &[u8]) -> Result<Address, ()> {
    if sig.len() != 65 {
        return Err(());
    }

    // Precompile address 0x01.
    let mut precompile = [0u8; 20];
    precompile[19] = 1;
    let to = Address::from_slice(&precompile);

    let r = &sig[0..32];
    let s = &sig[32..64];
    let v = match sig[64] {
        27 | 28 => sig[64],
        0 | 1 => sig[64] + 27,
        _ => return Err(()),
    };

    let mut input = Vec::with_capacity(128);
    input.extend_from_slice(digest.as_slice());
    // v as 32-byte big-endian word.
    input.extend_from_slice(&[0u8; 31]);
    input.push(v);
    input.extend_from_slice(r);
    input.extend_from_slice(s);

    let out = unsafe { RawCall::new_static().gas(50_000).call(to, &input) }.map_err(|_| ())?;
    if out.len() < 32 {
        return Err(());
    }
    // precompile returns 32-byte word with address in the low 20 bytes.
    Ok(Address::from_slice(&out[12..32]))
}
