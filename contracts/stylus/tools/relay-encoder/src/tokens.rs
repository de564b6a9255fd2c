//! Mock token book for off-chain testing.
//!
//! Tracks ERC-20 balances/allowances per token address plus native balances, with the same
//! failure cases a standard ERC-20 reverts on. Revert payloads are ABI-encoded custom errors so
//! callers can bubble them exactly like on-chain revert data.

use std::collections::BTreeMap;

use alloy_primitives::{Address, U256};
use alloy_sol_types::{sol, SolError};
use relay_types::Revert;

sol! {
    error ERC20InsufficientBalance(address sender, uint256 balance, uint256 needed);
    error ERC20InsufficientAllowance(address spender, uint256 allowance, uint256 needed);
    error NativeInsufficientBalance(address sender, uint256 balance, uint256 needed);
}

#[derive(Clone, Debug, Default)]
pub struct MockTokens {
    balances: BTreeMap<(Address, Address), U256>,
    allowances: BTreeMap<(Address, Address, Address), U256>,
    native: BTreeMap<Address, U256>,
}

impl MockTokens {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, token: Address, owner: Address) -> U256 {
        self.balances.get(&(token, owner)).copied().unwrap_or_default()
    }

    pub fn allowance(&self, token: Address, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(token, owner, spender))
            .copied()
            .unwrap_or_default()
    }

    pub fn total_supply(&self, token: Address) -> U256 {
        self.balances
            .iter()
            .filter(|((t, _), _)| *t == token)
            .fold(U256::ZERO, |acc, (_, v)| acc + *v)
    }

    pub fn mint(&mut self, token: Address, to: Address, amount: U256) {
        let balance = self.balance_of(token, to);
        self.balances.insert((token, to), balance + amount);
    }

    pub fn burn(&mut self, token: Address, from: Address, amount: U256) -> Result<(), Revert> {
        let balance = self.balance_of(token, from);
        if balance < amount {
            return Err(ERC20InsufficientBalance {
                sender: from,
                balance,
                needed: amount,
            }
            .abi_encode());
        }
        self.balances.insert((token, from), balance - amount);
        Ok(())
    }

    pub fn approve(&mut self, token: Address, owner: Address, spender: Address, amount: U256) {
        self.allowances.insert((token, owner, spender), amount);
    }

    pub fn transfer(
        &mut self,
        token: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), Revert> {
        self.burn(token, from, amount)?;
        self.mint(token, to, amount);
        Ok(())
    }

    /// `spender` moves `amount` of `from`'s tokens; an allowance of `U256::MAX` is never decremented.
    pub fn transfer_from(
        &mut self,
        token: Address,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), Revert> {
        let allowance = self.allowance(token, from, spender);
        if allowance < amount {
            return Err(ERC20InsufficientAllowance {
                spender,
                allowance,
                needed: amount,
            }
            .abi_encode());
        }
        self.transfer(token, from, to, amount)?;
        if allowance != U256::MAX {
            self.allowances
                .insert((token, from, spender), allowance - amount);
        }
        Ok(())
    }

    pub fn native_balance(&self, owner: Address) -> U256 {
        self.native.get(&owner).copied().unwrap_or_default()
    }

    pub fn set_native(&mut self, owner: Address, amount: U256) {
        self.native.insert(owner, amount);
    }

    pub fn send_native(&mut self, from: Address, to: Address, amount: U256) -> Result<(), Revert> {
        let balance = self.native_balance(from);
        if balance < amount {
            return Err(NativeInsufficientBalance {
                sender: from,
                balance,
                needed: amount,
            }
            .abi_encode());
        }
        self.native.insert(from, balance - amount);
        let to_balance = self.native_balance(to);
        self.native.insert(to, to_balance + amount);
        Ok(())
    }
}
