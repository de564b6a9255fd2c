//! Solidity ABI of the external collaborators and of the hook <-> orchestrator seam.
//!
//! Contracts encode calls with `SolCall::abi_encode` and dispatch them through `RawCall`.

use alloy_sol_types::sol;

sol! {
    interface IERC20 {
        function transfer(address to, uint256 amount) external returns (bool);
        function transferFrom(address from, address to, uint256 amount) external returns (bool);
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
    }

    struct MarketParamsAbi {
        address loanToken;
        address collateralToken;
        address oracle;
        address irm;
        uint256 lltv;
    }

    /// Lending protocol surface (Morpho Blue subset).
    interface ILendingProtocol {
        function flashLoan(address token, uint256 assets, bytes data) external;
        function supplyCollateral(MarketParamsAbi marketParams, uint256 assets, address onBehalf, bytes data) external;
        function withdrawCollateral(MarketParamsAbi marketParams, uint256 assets, address onBehalf, address receiver) external;
        function borrow(MarketParamsAbi marketParams, uint256 assets, uint256 shares, address onBehalf, address receiver)
            external
            returns (uint256 assetsBorrowed, uint256 sharesBorrowed);
        function repay(MarketParamsAbi marketParams, uint256 assets, uint256 shares, address onBehalf, bytes data)
            external
            returns (uint256 assetsRepaid, uint256 sharesRepaid);
        function position(bytes32 id, address user)
            external
            view
            returns (uint256 supplyShares, uint128 borrowShares, uint128 collateral);
        function market(bytes32 id)
            external
            view
            returns (
                uint128 totalSupplyAssets,
                uint128 totalSupplyShares,
                uint128 totalBorrowAssets,
                uint128 totalBorrowShares,
                uint128 lastUpdate,
                uint128 fee
            );
    }

    /// Yield-bearing vault (ERC-4626 subset). Its share token is the market collateral.
    interface IYieldVault {
        function deposit(uint256 assets, address receiver) external returns (uint256 shares);
        function redeem(uint256 shares, address receiver, address owner) external returns (uint256 assets);
        function withdraw(uint256 assets, address receiver, address owner) external returns (uint256 shares);
        function previewWithdraw(uint256 assets) external view returns (uint256 shares);
    }

    /// Implemented by hooks; invoked by the orchestrator once per queued action.
    interface IFlashloanHook {
        function onFlashloanHook(bytes data) external payable returns (bytes result);
    }

    /// Read-only accessor hooks use to query the in-flight orchestration context.
    interface IFlashOrchestrator {
        function context()
            external
            view
            returns (
                address sender,
                address flashToken,
                uint256 flashAmount,
                address[] tokens,
                uint256[] amounts,
                uint256 actionIndex
            );
    }
}
