//! ABI of the bridge endpoints the router calls.
#![allow(missing_docs)]

use alloy_sol_types::sol;

sol! {
    /// Burn/mint token messenger.
    interface ITokenMessenger {
        /// Burns `amount` of `burnToken` and sends a message minting it on `destinationDomain`.
        function depositForBurn(
            uint256 amount,
            uint32 destinationDomain,
            bytes32 mintRecipient,
            address burnToken
        ) external returns (bytes32 messageHash);

        /// Same as `depositForBurn`, with a hook executed by the destination receiver.
        function depositForBurnWithHook(
            uint256 amount,
            uint32 destinationDomain,
            bytes32 mintRecipient,
            address burnToken,
            bytes hookData
        ) external returns (bytes32 messageHash);
    }

    /// Omnichain fungible token endpoint.
    interface IOftEndpoint {
        function send(
            uint32 dstEid,
            bytes32 to,
            uint256 amountLD,
            bytes composeMsg
        ) external returns (bytes32 guid);
    }

    /// Liquidity pool bridge.
    interface IPoolBridge {
        function bridge(
            uint256 poolId,
            uint256 amount,
            uint32 dstDomain,
            address recipient,
            address swapPool,
            bytes payload
        ) external returns (bytes32 transferId);
    }

    /// Hook payload attached to burn/mint messages. The destination receiver swaps the minted
    /// tokens into `destToken` through `swapPool` when they differ.
    struct HookPayload {
        address swapPool;
        address destToken;
        address recipient;
        bytes extraData;
    }
}
