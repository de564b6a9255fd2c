//! Stylus entrypoint for the leverage hook.

use alloc::vec::Vec;

use stylus_sdk::{
    abi::Bytes,
    alloy_primitives::{Address, FixedBytes, U256},
    prelude::*,
    stylus_core::log,
};

use relay_types::{
    interfaces::{IFlashOrchestrator, ILendingProtocol, IYieldVault, MarketParamsAbi},
    market::MarketTotals,
    MarketParams, Position, Revert,
};

use crate::{
    errors::{AlreadyInitialized, HookError, InvalidAddress, LeverageError, NotInitialized, ReentrantCall},
    events::LeverageEvent,
    host::{FlashView, LeverageConfig, LeverageHost},
    leverage,
    utils::{
        calls::{call, static_call},
        erc20,
    },
};

sol_storage! {
    #[entrypoint]
    pub struct LeverageHook {
        address orchestrator;
        address lender;
        /// Also the market's collateral token.
        address vault;
        address loan_token;
        address oracle;
        address irm;
        uint256 lltv;

        bool entered;
    }
}

#[public]
impl LeverageHook {
    /// One-shot configuration. The market is (loan_token, vault, oracle, irm, lltv).
    pub fn initialize(
        &mut self,
        orchestrator: Address,
        lender: Address,
        vault: Address,
        loan_token: Address,
        oracle: Address,
        irm: Address,
        lltv: U256,
    ) -> Result<(), LeverageError> {
        if !self.orchestrator.get().is_zero() {
            return Err(LeverageError::AlreadyInitialized(AlreadyInitialized {}));
        }
        if [orchestrator, lender, vault, loan_token].iter().any(|a| a.is_zero()) {
            return Err(LeverageError::InvalidAddress(InvalidAddress {}));
        }
        self.orchestrator.set(orchestrator);
        self.lender.set(lender);
        self.vault.set(vault);
        self.loan_token.set(loan_token);
        self.oracle.set(oracle);
        self.irm.set(irm);
        self.lltv.set(lltv);
        Ok(())
    }

    /// Called by the orchestrator for each queued action; `data[0]` is the opcode.
    #[payable]
    pub fn on_flashloan_hook(&mut self, data: Bytes) -> Result<Bytes, HookError> {
        let config = self._config()?;
        if self.entered.get() {
            return Err(LeverageError::ReentrantCall(ReentrantCall {}).into());
        }
        self.entered.set(true);
        let caller = self.vm().msg_sender();
        let result = leverage::run(self, &config, caller, &data)?;
        self.entered.set(false);
        Ok(Bytes::from(result))
    }

    /// Loan assets `account` owes in the configured market, rounded up.
    pub fn debt_of(&self, account: Address) -> Result<U256, HookError> {
        let config = self._config()?;
        leverage::debt_of(self, &config, account)
    }

    pub fn market_id(&self) -> Result<FixedBytes<32>, HookError> {
        Ok(self._config()?.market.id())
    }
}

impl LeverageHook {
    fn _config(&self) -> Result<LeverageConfig, LeverageError> {
        let orchestrator = self.orchestrator.get();
        if orchestrator.is_zero() {
            return Err(LeverageError::NotInitialized(NotInitialized {}));
        }
        let vault = self.vault.get();
        Ok(LeverageConfig {
            orchestrator,
            lender: self.lender.get(),
            vault,
            market: MarketParams {
                loan_token: self.loan_token.get(),
                collateral_token: vault,
                oracle: self.oracle.get(),
                irm: self.irm.get(),
                lltv: self.lltv.get(),
            },
        })
    }
}

fn market_abi(m: &MarketParams) -> MarketParamsAbi {
    MarketParamsAbi {
        loanToken: m.loan_token,
        collateralToken: m.collateral_token,
        oracle: m.oracle,
        irm: m.irm,
        lltv: m.lltv,
    }
}

impl LeverageHost for LeverageHook {
    fn this(&self) -> Address {
        self.vm().contract_address()
    }

    fn flash_context(&self, orchestrator: Address) -> Result<FlashView, Revert> {
        let ctx = static_call(orchestrator, &IFlashOrchestrator::contextCall {})?;
        Ok(FlashView {
            sender: ctx.sender,
            tokens: ctx.tokens,
            amounts: ctx.amounts,
            flash_token: ctx.flashToken,
            flash_amount: ctx.flashAmount,
        })
    }

    fn balance_of(&self, token: Address, owner: Address) -> Result<U256, Revert> {
        erc20::balance_of(token, owner)
    }

    fn transfer_from(&mut self, token: Address, from: Address, to: Address, amount: U256) -> Result<(), Revert> {
        erc20::safe_transfer_from(token, from, to, amount)
    }

    fn transfer(&mut self, token: Address, to: Address, amount: U256) -> Result<(), Revert> {
        erc20::safe_transfer(token, to, amount)
    }

    fn approve(&mut self, token: Address, spender: Address, amount: U256) -> Result<(), Revert> {
        erc20::safe_approve(token, spender, amount)
    }

    fn supply_collateral(&mut self, market: &MarketParams, assets: U256, on_behalf: Address) -> Result<(), Revert> {
        let c = ILendingProtocol::supplyCollateralCall {
            marketParams: market_abi(market),
            assets,
            onBehalf: on_behalf,
            data: Default::default(),
        };
        call(self.lender.get(), &c).map(|_| ())
    }

    fn withdraw_collateral(
        &mut self,
        market: &MarketParams,
        assets: U256,
        on_behalf: Address,
        receiver: Address,
    ) -> Result<(), Revert> {
        let c = ILendingProtocol::withdrawCollateralCall {
            marketParams: market_abi(market),
            assets,
            onBehalf: on_behalf,
            receiver,
        };
        call(self.lender.get(), &c).map(|_| ())
    }

    fn borrow(
        &mut self,
        market: &MarketParams,
        assets: U256,
        shares: U256,
        on_behalf: Address,
        receiver: Address,
    ) -> Result<(U256, U256), Revert> {
        let c = ILendingProtocol::borrowCall {
            marketParams: market_abi(market),
            assets,
            shares,
            onBehalf: on_behalf,
            receiver,
        };
        let r = call(self.lender.get(), &c)?;
        Ok((r.assetsBorrowed, r.sharesBorrowed))
    }

    fn repay(
        &mut self,
        market: &MarketParams,
        assets: U256,
        shares: U256,
        on_behalf: Address,
    ) -> Result<(U256, U256), Revert> {
        let c = ILendingProtocol::repayCall {
            marketParams: market_abi(market),
            assets,
            shares,
            onBehalf: on_behalf,
            data: Default::default(),
        };
        let r = call(self.lender.get(), &c)?;
        Ok((r.assetsRepaid, r.sharesRepaid))
    }

    fn position(&self, id: FixedBytes<32>, user: Address) -> Result<Position, Revert> {
        let r = static_call(self.lender.get(), &ILendingProtocol::positionCall { id, user })?;
        Ok(Position {
            supply_shares: r.supplyShares,
            borrow_shares: U256::from(r.borrowShares),
            collateral: U256::from(r.collateral),
        })
    }

    fn market_totals(&self, id: FixedBytes<32>) -> Result<MarketTotals, Revert> {
        let r = static_call(self.lender.get(), &ILendingProtocol::marketCall { id })?;
        Ok(MarketTotals {
            total_borrow_assets: U256::from(r.totalBorrowAssets),
            total_borrow_shares: U256::from(r.totalBorrowShares),
        })
    }

    fn vault_deposit(&mut self, assets: U256, receiver: Address) -> Result<U256, Revert> {
        call(self.vault.get(), &IYieldVault::depositCall { assets, receiver }).map(|r| r.shares)
    }

    fn vault_redeem(&mut self, shares: U256, receiver: Address, owner: Address) -> Result<U256, Revert> {
        let c = IYieldVault::redeemCall {
            shares,
            receiver,
            owner,
        };
        call(self.vault.get(), &c).map(|r| r.assets)
    }

    fn vault_withdraw(&mut self, assets: U256, receiver: Address, owner: Address) -> Result<U256, Revert> {
        let c = IYieldVault::withdrawCall {
            assets,
            receiver,
            owner,
        };
        call(self.vault.get(), &c).map(|r| r.shares)
    }

    fn vault_preview_withdraw(&self, assets: U256) -> Result<U256, Revert> {
        static_call(self.vault.get(), &IYieldVault::previewWithdrawCall { assets }).map(|r| r.shares)
    }

    fn emit(&mut self, event: LeverageEvent) {
        match event {
            LeverageEvent::LeverageExecuted(e) => log(self.vm(), e),
        }
    }
}
