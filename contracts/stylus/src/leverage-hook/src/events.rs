use alloy_sol_types::sol;

sol! {
    #![sol(all_derives)]

    /// `collateral`: vault shares supplied or withdrawn. `assets`: loan assets borrowed or repaid.
    event LeverageExecuted(
        address indexed account,
        uint8 indexed opcode,
        uint256 flashAmount,
        uint256 collateral,
        uint256 assets
    );
}

#[derive(Clone, Debug, PartialEq)]
pub enum LeverageEvent {
    LeverageExecuted(LeverageExecuted),
}
