//! Collaborators of the leverage logic: tokens, the lending market, the vault and the
//! orchestrator's context accessor.

use alloc::vec::Vec;

use alloy_primitives::{Address, FixedBytes, U256};
use relay_types::{market::MarketTotals, MarketParams, Position, Revert};

use crate::events::LeverageEvent;

/// Deployment configuration, fixed at `initialize`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LeverageConfig {
    pub orchestrator: Address,
    pub lender: Address,
    /// ERC-4626 vault on the loan token; its share token is `market.collateral_token`.
    pub vault: Address,
    pub market: MarketParams,
}

/// The part of the orchestrator's in-flight context the hook acts on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlashView {
    pub sender: Address,
    /// Tokens and amounts the caller handed to the orchestrator, duplicates allowed.
    pub tokens: Vec<Address>,
    pub amounts: Vec<U256>,
    pub flash_token: Address,
    pub flash_amount: U256,
}

impl FlashView {
    /// Total of `token` the caller provided. Saturates rather than overflowing.
    pub fn provided(&self, token: Address) -> U256 {
        self.tokens
            .iter()
            .zip(&self.amounts)
            .filter(|(t, _)| **t == token)
            .fold(U256::ZERO, |sum, (_, amount)| sum.saturating_add(*amount))
    }
}

pub trait LeverageHost {
    fn this(&self) -> Address;
    fn flash_context(&self, orchestrator: Address) -> Result<FlashView, Revert>;

    fn balance_of(&self, token: Address, owner: Address) -> Result<U256, Revert>;
    fn transfer_from(&mut self, token: Address, from: Address, to: Address, amount: U256) -> Result<(), Revert>;
    fn transfer(&mut self, token: Address, to: Address, amount: U256) -> Result<(), Revert>;
    fn approve(&mut self, token: Address, spender: Address, amount: U256) -> Result<(), Revert>;

    fn supply_collateral(&mut self, market: &MarketParams, assets: U256, on_behalf: Address) -> Result<(), Revert>;
    fn withdraw_collateral(
        &mut self,
        market: &MarketParams,
        assets: U256,
        on_behalf: Address,
        receiver: Address,
    ) -> Result<(), Revert>;
    /// Returns (assets, shares) borrowed.
    fn borrow(
        &mut self,
        market: &MarketParams,
        assets: U256,
        shares: U256,
        on_behalf: Address,
        receiver: Address,
    ) -> Result<(U256, U256), Revert>;
    /// Returns (assets, shares) repaid. Exactly one of `assets` / `shares` is non-zero.
    fn repay(
        &mut self,
        market: &MarketParams,
        assets: U256,
        shares: U256,
        on_behalf: Address,
    ) -> Result<(U256, U256), Revert>;
    fn position(&self, id: FixedBytes<32>, user: Address) -> Result<Position, Revert>;
    fn market_totals(&self, id: FixedBytes<32>) -> Result<MarketTotals, Revert>;

    fn vault_deposit(&mut self, assets: U256, receiver: Address) -> Result<U256, Revert>;
    fn vault_redeem(&mut self, shares: U256, receiver: Address, owner: Address) -> Result<U256, Revert>;
    fn vault_withdraw(&mut self, assets: U256, receiver: Address, owner: Address) -> Result<U256, Revert>;
    fn vault_preview_withdraw(&self, assets: U256) -> Result<U256, Revert>;

    fn emit(&mut self, event: LeverageEvent);
}
