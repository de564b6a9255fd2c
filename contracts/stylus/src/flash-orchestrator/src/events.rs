use alloy_sol_types::sol;

sol! {
    #![sol(all_derives)]

    event HookExecuted(uint256 indexed index, address indexed target, uint256 value, bytes result);
    event FlashExecuted(
        address indexed sender,
        address indexed flashToken,
        uint256 flashAmount,
        uint256 actionCount
    );
}

#[derive(Clone, Debug, PartialEq)]
pub enum FlashEvent {
    HookExecuted(HookExecuted),
    FlashExecuted(FlashExecuted),
}
