use alloy_sol_types::sol;
use stylus_sdk::stylus_proc::SolidityError;

sol! {
    #![sol(all_derives)]

    error Unauthorized(address caller);
    error InvalidActionCount();
    error BatchSizeExceedsMaximum(uint256 size, uint256 maxActions);
    error BatchAlreadyExecuted(bytes32 batchId);
    error InvalidTargetAddress(uint256 index);
    error ValueExceedsMaximum(uint256 index, uint256 value, uint256 maxValue);
    error TargetNotAllowed(uint256 index, address target);
    error InsufficientBalance(uint256 available, uint256 required);
    error ActionExecutionFailed(uint256 index);
    error InvalidFailureMap(uint256 allowFailureMap, uint256 actionCount);
    error InvalidMaxActions(uint256 maxActions);
    error InvalidAddress();
    error AlreadyInitialized();
    error NativeTransferFailed(address to, uint256 amount);
    error ReentrantCall();
}

#[derive(SolidityError, Debug)]
pub enum QueueError {
    Unauthorized(Unauthorized),
    InvalidActionCount(InvalidActionCount),
    BatchSizeExceedsMaximum(BatchSizeExceedsMaximum),
    BatchAlreadyExecuted(BatchAlreadyExecuted),
    InvalidTargetAddress(InvalidTargetAddress),
    ValueExceedsMaximum(ValueExceedsMaximum),
    TargetNotAllowed(TargetNotAllowed),
    InsufficientBalance(InsufficientBalance),
    ActionExecutionFailed(ActionExecutionFailed),
    InvalidFailureMap(InvalidFailureMap),
    InvalidMaxActions(InvalidMaxActions),
    InvalidAddress(InvalidAddress),
    AlreadyInitialized(AlreadyInitialized),
    NativeTransferFailed(NativeTransferFailed),
    ReentrantCall(ReentrantCall),
}
