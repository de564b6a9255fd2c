//! Lending-market parameters and share/asset conversion (Morpho Blue conventions).

use alloc::vec::Vec;

use alloy_primitives::{keccak256, Address, FixedBytes, U256};

use crate::signing::address_word;

/// Virtual offsets added to every share/asset conversion.
pub const VIRTUAL_SHARES: U256 = U256::from_limbs([1_000_000, 0, 0, 0]);
pub const VIRTUAL_ASSETS: U256 = U256::from_limbs([1, 0, 0, 0]);

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MarketParams {
    pub loan_token: Address,
    pub collateral_token: Address,
    pub oracle: Address,
    pub irm: Address,
    pub lltv: U256,
}

impl MarketParams {
    /// keccak256(abi.encode(marketParams))
    pub fn id(&self) -> FixedBytes<32> {
        let mut buf = Vec::with_capacity(32 * 5);
        buf.extend_from_slice(&address_word(self.loan_token));
        buf.extend_from_slice(&address_word(self.collateral_token));
        buf.extend_from_slice(&address_word(self.oracle));
        buf.extend_from_slice(&address_word(self.irm));
        buf.extend_from_slice(&self.lltv.to_be_bytes::<32>());
        keccak256(buf)
    }
}

/// An account's position in one market.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Position {
    pub supply_shares: U256,
    pub borrow_shares: U256,
    pub collateral: U256,
}

/// Market totals needed to convert between borrow shares and assets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MarketTotals {
    pub total_borrow_assets: U256,
    pub total_borrow_shares: U256,
}

fn mul_div_down(x: U256, y: U256, d: U256) -> Option<U256> {
    x.checked_mul(y)?.checked_div(d)
}

fn mul_div_up(x: U256, y: U256, d: U256) -> Option<U256> {
    let numerator = x.checked_mul(y)?.checked_add(d.checked_sub(U256::from(1u64))?)?;
    numerator.checked_div(d)
}

pub fn to_shares_down(assets: U256, total_assets: U256, total_shares: U256) -> Option<U256> {
    mul_div_down(assets, total_shares + VIRTUAL_SHARES, total_assets + VIRTUAL_ASSETS)
}

pub fn to_shares_up(assets: U256, total_assets: U256, total_shares: U256) -> Option<U256> {
    mul_div_up(assets, total_shares + VIRTUAL_SHARES, total_assets + VIRTUAL_ASSETS)
}

pub fn to_assets_down(shares: U256, total_assets: U256, total_shares: U256) -> Option<U256> {
    mul_div_down(shares, total_assets + VIRTUAL_ASSETS, total_shares + VIRTUAL_SHARES)
}

pub fn to_assets_up(shares: U256, total_assets: U256, total_shares: U256) -> Option<U256> {
    mul_div_up(shares, total_assets + VIRTUAL_ASSETS, total_shares + VIRTUAL_SHARES)
}

impl MarketTotals {
    /// Assets owed for `borrow_shares`, rounded against the borrower.
    pub fn debt_of(&self, borrow_shares: U256) -> Option<U256> {
        to_assets_up(borrow_shares, self.total_borrow_assets, self.total_borrow_shares)
    }
}
