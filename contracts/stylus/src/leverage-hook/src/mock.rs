//! In-memory lending market, vault and tokens around the hook.
//!
//! The market follows Morpho Blue share accounting; the vault prices one share at
//! `RATE_NUM / RATE_DEN` loan tokens and uses its own address as the share token.

use std::collections::{BTreeMap, BTreeSet};

use alloy_primitives::{Address, FixedBytes, U256};
use relay_encoder::tokens::MockTokens;
use relay_types::{
    market::{to_assets_up, to_shares_down, to_shares_up, MarketTotals},
    MarketParams, Position, Revert,
};

use crate::{
    events::LeverageEvent,
    host::{FlashView, LeverageConfig, LeverageHost},
};

pub const HOOK: Address = Address::repeat_byte(0x40);
pub const ORCHESTRATOR: Address = Address::repeat_byte(0x0C);
pub const LENDER: Address = Address::repeat_byte(0x1E);
pub const VAULT: Address = Address::repeat_byte(0x7A);
pub const LOAN: Address = Address::repeat_byte(0xB2);

pub const RATE_NUM: u64 = 11;
pub const RATE_DEN: u64 = 10;

pub fn config() -> LeverageConfig {
    LeverageConfig {
        orchestrator: ORCHESTRATOR,
        lender: LENDER,
        vault: VAULT,
        market: MarketParams {
            loan_token: LOAN,
            collateral_token: VAULT,
            oracle: Address::repeat_byte(0x0A),
            irm: Address::repeat_byte(0x1A),
            lltv: U256::from(860_000_000_000_000_000u64),
        },
    }
}

fn fail(reason: &str) -> Revert {
    reason.as_bytes().to_vec()
}

#[derive(Clone, Debug, Default)]
pub struct MockHost {
    pub tokens: MockTokens,
    pub positions: BTreeMap<Address, Position>,
    pub totals: MarketTotals,
    /// (owner, operator) pairs allowed to manage the owner's position.
    pub authorized: BTreeSet<(Address, Address)>,
    pub flash: FlashView,
    pub events: Vec<LeverageEvent>,
}

impl MockHost {
    fn check_authorized(&self, on_behalf: Address) -> Result<(), Revert> {
        if on_behalf == HOOK || self.authorized.contains(&(on_behalf, HOOK)) {
            Ok(())
        } else {
            Err(fail("unauthorized"))
        }
    }

    fn position_mut(&mut self, user: Address) -> &mut Position {
        self.positions.entry(user).or_default()
    }

    /// Open a position as if `user` had supplied and borrowed directly.
    pub fn open_position(&mut self, user: Address, collateral: U256, debt: U256) {
        let shares = to_shares_up(debt, self.totals.total_borrow_assets, self.totals.total_borrow_shares)
            .unwrap_or_default();
        self.tokens.mint(VAULT, LENDER, collateral);
        self.tokens.mint(LOAN, user, debt);
        self.totals.total_borrow_assets += debt;
        self.totals.total_borrow_shares += shares;
        let position = self.position_mut(user);
        position.collateral += collateral;
        position.borrow_shares += shares;
    }
}

impl LeverageHost for MockHost {
    fn this(&self) -> Address {
        HOOK
    }

    fn flash_context(&self, _orchestrator: Address) -> Result<FlashView, Revert> {
        Ok(self.flash.clone())
    }

    fn balance_of(&self, token: Address, owner: Address) -> Result<U256, Revert> {
        Ok(self.tokens.balance_of(token, owner))
    }

    fn transfer_from(&mut self, token: Address, from: Address, to: Address, amount: U256) -> Result<(), Revert> {
        self.tokens.transfer_from(token, HOOK, from, to, amount)
    }

    fn transfer(&mut self, token: Address, to: Address, amount: U256) -> Result<(), Revert> {
        self.tokens.transfer(token, HOOK, to, amount)
    }

    fn approve(&mut self, token: Address, spender: Address, amount: U256) -> Result<(), Revert> {
        self.tokens.approve(token, HOOK, spender, amount);
        Ok(())
    }

    fn supply_collateral(&mut self, market: &MarketParams, assets: U256, on_behalf: Address) -> Result<(), Revert> {
        self.tokens
            .transfer_from(market.collateral_token, LENDER, HOOK, LENDER, assets)?;
        self.position_mut(on_behalf).collateral += assets;
        Ok(())
    }

    fn withdraw_collateral(
        &mut self,
        market: &MarketParams,
        assets: U256,
        on_behalf: Address,
        receiver: Address,
    ) -> Result<(), Revert> {
        self.check_authorized(on_behalf)?;
        let position = self.position_mut(on_behalf);
        position.collateral = position
            .collateral
            .checked_sub(assets)
            .ok_or_else(|| fail("insufficient collateral"))?;
        self.tokens
            .transfer(market.collateral_token, LENDER, receiver, assets)
    }

    fn borrow(
        &mut self,
        market: &MarketParams,
        assets: U256,
        _shares: U256,
        on_behalf: Address,
        receiver: Address,
    ) -> Result<(U256, U256), Revert> {
        self.check_authorized(on_behalf)?;
        let shares = to_shares_up(assets, self.totals.total_borrow_assets, self.totals.total_borrow_shares)
            .ok_or_else(|| fail("overflow"))?;
        self.totals.total_borrow_assets += assets;
        self.totals.total_borrow_shares += shares;
        self.position_mut(on_behalf).borrow_shares += shares;
        self.tokens.transfer(market.loan_token, LENDER, receiver, assets)?;
        Ok((assets, shares))
    }

    fn repay(
        &mut self,
        market: &MarketParams,
        assets: U256,
        shares: U256,
        on_behalf: Address,
    ) -> Result<(U256, U256), Revert> {
        let MarketTotals {
            total_borrow_assets,
            total_borrow_shares,
        } = self.totals;
        let (assets, shares) = if shares.is_zero() {
            let shares = to_shares_down(assets, total_borrow_assets, total_borrow_shares)
                .ok_or_else(|| fail("overflow"))?;
            (assets, shares)
        } else {
            let assets = to_assets_up(shares, total_borrow_assets, total_borrow_shares)
                .ok_or_else(|| fail("overflow"))?;
            (assets, shares)
        };
        let position = self.position_mut(on_behalf);
        position.borrow_shares = position
            .borrow_shares
            .checked_sub(shares)
            .ok_or_else(|| fail("repay exceeds debt"))?;
        self.totals.total_borrow_shares -= shares;
        self.totals.total_borrow_assets = total_borrow_assets.saturating_sub(assets);
        self.tokens
            .transfer_from(market.loan_token, LENDER, HOOK, LENDER, assets)?;
        Ok((assets, shares))
    }

    fn position(&self, _id: FixedBytes<32>, user: Address) -> Result<Position, Revert> {
        Ok(self.positions.get(&user).copied().unwrap_or_default())
    }

    fn market_totals(&self, _id: FixedBytes<32>) -> Result<MarketTotals, Revert> {
        Ok(self.totals)
    }

    fn vault_deposit(&mut self, assets: U256, receiver: Address) -> Result<U256, Revert> {
        let shares = assets * U256::from(RATE_DEN) / U256::from(RATE_NUM);
        self.tokens.transfer_from(LOAN, VAULT, HOOK, VAULT, assets)?;
        self.tokens.mint(VAULT, receiver, shares);
        Ok(shares)
    }

    fn vault_redeem(&mut self, shares: U256, receiver: Address, owner: Address) -> Result<U256, Revert> {
        let assets = shares * U256::from(RATE_NUM) / U256::from(RATE_DEN);
        self.tokens.burn(VAULT, owner, shares)?;
        self.tokens.transfer(LOAN, VAULT, receiver, assets)?;
        Ok(assets)
    }

    fn vault_withdraw(&mut self, assets: U256, receiver: Address, owner: Address) -> Result<U256, Revert> {
        let shares = self.vault_preview_withdraw(assets)?;
        self.tokens.burn(VAULT, owner, shares)?;
        self.tokens.transfer(LOAN, VAULT, receiver, assets)?;
        Ok(shares)
    }

    fn vault_preview_withdraw(&self, assets: U256) -> Result<U256, Revert> {
        let num = U256::from(RATE_NUM);
        Ok((assets * U256::from(RATE_DEN) + num - U256::from(1u64)) / num)
    }

    fn emit(&mut self, event: LeverageEvent) {
        self.events.push(event);
    }
}
