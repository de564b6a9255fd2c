use alloc::vec::Vec;

use alloy_sol_types::sol;
use relay_types::Revert;
use stylus_sdk::stylus_proc::SolidityError;

sol! {
    #![sol(all_derives)]

    error ArrayLengthMismatch(uint256 tokens, uint256 amounts);
    error InvalidAddress();
    error NoActionsProvided();
    error NotLender(address caller);
    error RecursiveCallNotAllowed(uint256 index);
    error ReentrantCall();
    error AlreadyInitialized();
    error NotInitialized();
    error UnexpectedCallback();
}

#[derive(SolidityError, Debug)]
pub enum OrchestratorError {
    ArrayLengthMismatch(ArrayLengthMismatch),
    InvalidAddress(InvalidAddress),
    NoActionsProvided(NoActionsProvided),
    NotLender(NotLender),
    RecursiveCallNotAllowed(RecursiveCallNotAllowed),
    ReentrantCall(ReentrantCall),
    AlreadyInitialized(AlreadyInitialized),
    NotInitialized(NotInitialized),
    UnexpectedCallback(UnexpectedCallback),
}

/// Either a rejection raised here, or revert data from a token, hook or the lender, passed
/// through untouched.
#[derive(Debug)]
pub enum FlashError {
    Rejected(OrchestratorError),
    Reverted(Revert),
}

impl From<OrchestratorError> for FlashError {
    fn from(e: OrchestratorError) -> Self {
        FlashError::Rejected(e)
    }
}

impl From<FlashError> for Vec<u8> {
    fn from(e: FlashError) -> Vec<u8> {
        match e {
            FlashError::Rejected(e) => e.into(),
            FlashError::Reverted(data) => data,
        }
    }
}
