//! Audit events. Core logic records them on the host; the contract shell logs them.

use alloy_sol_types::sol;

sol! {
    #![sol(all_derives)]

    event Authorized(
        address indexed owner,
        address indexed signer,
        address indexed token,
        uint256 deposit,
        uint256 transfer,
        uint256 process,
        uint256 claim
    );
    event AllowanceUsed(
        address indexed owner,
        address indexed signer,
        address indexed token,
        uint8 kind,
        uint256 amount
    );
    event NonceUsed(address indexed signer, bytes32 indexed nonce);
    event AuthorizationCanceled(address indexed signer, bytes32 indexed nonce);

    event Deposit(address indexed from, address indexed to, address indexed token, uint256 amount, address signer);
    event Transfer(address indexed from, address indexed to, address indexed token, uint256 amount, address signer);
    event Process(address indexed from, address indexed to, address indexed token, uint256 amount, address signer);
    event Claim(address indexed from, address indexed to, address indexed token, uint256 amount, address signer);
}

#[derive(Clone, Debug, PartialEq)]
pub enum LedgerEvent {
    Authorized(Authorized),
    AllowanceUsed(AllowanceUsed),
    NonceUsed(NonceUsed),
    AuthorizationCanceled(AuthorizationCanceled),
    Deposit(Deposit),
    Transfer(Transfer),
    Process(Process),
    Claim(Claim),
}
