use alloy_sol_types::sol;

sol! {
    /// Relay ledger entrypoints a relayer submits.
    interface IRelayLedger {
        function execute(
            uint8 kind,
            address from,
            address to,
            address token,
            uint256 amount,
            bytes32 nonce,
            uint256 validAfter,
            uint256 validBefore,
            bytes signature
        ) external;

        function batchExecute(
            (uint8, address, address, address, uint256, bytes32, uint256, uint256, bytes)[] authorizations
        ) external;

        function cancelAuthorization(address signer, bytes32 nonce, bytes signature) external;
    }
}
