use alloy_sol_types::sol;
use stylus_sdk::stylus_proc::SolidityError;

sol! {
    #![sol(all_derives)]

    error SignatureInvalid();
    error NonceAlreadyUsed(address signer, bytes32 nonce);
    error AuthorizationNotYetValid(uint256 validAfter, uint256 timestamp);
    error AuthorizationExpired(uint256 validBefore, uint256 timestamp);
    error InvalidValidityWindow(uint256 validAfter, uint256 validBefore);
    error NotAuthorized(address from, address signer, uint8 kind, uint256 allowance);
    error InsufficientBalance(address owner, address token, uint256 have, uint256 need);
    error InvalidOperationKind(uint8 kind);
    error TokenCallFailed(address token);
    error AllowanceOverflow(address owner, address signer, address token, uint8 kind);
    error BalanceOverflow(address owner, address token);
    error EmptyBatch();
    error ReentrantCall();
}

#[derive(SolidityError, Debug)]
pub enum LedgerError {
    SignatureInvalid(SignatureInvalid),
    NonceAlreadyUsed(NonceAlreadyUsed),
    AuthorizationNotYetValid(AuthorizationNotYetValid),
    AuthorizationExpired(AuthorizationExpired),
    InvalidValidityWindow(InvalidValidityWindow),
    NotAuthorized(NotAuthorized),
    InsufficientBalance(InsufficientBalance),
    InvalidOperationKind(InvalidOperationKind),
    TokenCallFailed(TokenCallFailed),
    AllowanceOverflow(AllowanceOverflow),
    BalanceOverflow(BalanceOverflow),
    EmptyBatch(EmptyBatch),
    ReentrantCall(ReentrantCall),
}
