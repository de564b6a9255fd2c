use alloc::vec::Vec;

use alloy_sol_types::sol;
use relay_types::Revert;
use stylus_sdk::stylus_proc::SolidityError;

sol! {
    #![sol(all_derives)]

    error NotOrchestrator(address caller);
    error MissingOpcode();
    error InvalidOpcode(uint8 opcode);
    error InvalidMarket();
    error InvalidAddress();
    error AlreadyInitialized();
    error NotInitialized();
    error ReentrantCall();
    error MathOverflow();
}

#[derive(SolidityError, Debug)]
pub enum LeverageError {
    NotOrchestrator(NotOrchestrator),
    MissingOpcode(MissingOpcode),
    InvalidOpcode(InvalidOpcode),
    InvalidMarket(InvalidMarket),
    InvalidAddress(InvalidAddress),
    AlreadyInitialized(AlreadyInitialized),
    NotInitialized(NotInitialized),
    ReentrantCall(ReentrantCall),
    MathOverflow(MathOverflow),
}

/// A rejection raised by the hook, or revert data from the token, lending market or vault.
#[derive(Debug)]
pub enum HookError {
    Rejected(LeverageError),
    Reverted(Revert),
}

impl From<LeverageError> for HookError {
    fn from(e: LeverageError) -> Self {
        HookError::Rejected(e)
    }
}

impl From<Revert> for HookError {
    fn from(data: Revert) -> Self {
        HookError::Reverted(data)
    }
}

impl From<HookError> for Vec<u8> {
    fn from(e: HookError) -> Vec<u8> {
        match e {
            HookError::Rejected(e) => e.into(),
            HookError::Reverted(data) => data,
        }
    }
}
