//! Batch action type and the queue's audit events.

use alloy_sol_types::sol;

sol! {
    #![sol(all_derives)]

    /// One queued call.
    struct Action {
        address target;
        uint256 value;
        bytes data;
    }

    event BatchExecuted(bytes32 indexed batchId, Action[] actions, bool[] results, uint256 allowFailureMap);
    event ActionFailed(bytes32 indexed batchId, uint256 indexed index, bytes reason);

    event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);
    event MaxActionsUpdated(uint256 maxActions);
    event MaxValueUpdated(uint256 maxValue);
    event TargetAllowanceUpdated(address indexed target, bool allowed);
    event AllowAllTargetsUpdated(bool allowAll);
    event NativeWithdrawn(address indexed to, uint256 amount);
    event BatchCounterAdvanced(uint256 counter);
}

#[derive(Clone, Debug, PartialEq)]
pub enum QueueEvent {
    BatchExecuted(BatchExecuted),
    ActionFailed(ActionFailed),
    OwnershipTransferred(OwnershipTransferred),
    MaxActionsUpdated(MaxActionsUpdated),
    MaxValueUpdated(MaxValueUpdated),
    TargetAllowanceUpdated(TargetAllowanceUpdated),
    AllowAllTargetsUpdated(AllowAllTargetsUpdated),
    NativeWithdrawn(NativeWithdrawn),
    BatchCounterAdvanced(BatchCounterAdvanced),
}
