// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! OFT contract bindings for balance, quote and send operations
//!
//! Only the subset of the omnichain fungible token interface used by the
//! transfer task is bound here.

use alloy_contract::CallBuilder;
use alloy_network::Ethereum;
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use alloy_rpc_types::TransactionRequest;
use alloy_sol_types::sol;
use std::marker::PhantomData;
use tracing::{debug, info};

use IOFT::{sendCall, IOFTInstance};

/// OFT contract wrapper
///
/// # Example
///
/// ```rust,no_run
/// use lz_oft_ops::OftContract;
/// use alloy_primitives::address;
/// use alloy_provider::ProviderBuilder;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = ProviderBuilder::new().connect("http://localhost:8545").await?;
/// let token = address!("85576DEa799eC912AAf05566922EaC75fC97Bd79");
///
/// let oft = OftContract::new(token, provider);
/// let decimals = oft.decimals().await?;
/// # Ok(())
/// # }
/// ```
pub struct OftContract<P: Provider<Ethereum>> {
    instance: IOFTInstance<P>,
}

impl<P: Provider<Ethereum>> OftContract<P> {
    pub fn new(address: Address, provider: P) -> Self {
        debug!(
            contract_address = %address,
            event = "oft_contract_initialized"
        );
        Self {
            instance: IOFTInstance::new(address, provider),
        }
    }

    pub async fn balance_of(&self, account: Address) -> Result<U256, alloy_contract::Error> {
        let result = self.instance.balanceOf(account).call().await?;

        debug!(
            account = %account,
            balance = %result,
            contract_address = %self.instance.address(),
            event = "balance_retrieved"
        );

        Ok(result)
    }

    pub async fn decimals(&self) -> Result<u8, alloy_contract::Error> {
        self.instance.decimals().call().await
    }

    /// Quotes the messaging fee for `send_param`
    ///
    /// # Arguments
    ///
    /// * `send_param` - The exact parameters that will later be sent
    /// * `pay_in_lz_token` - Whether the fee is paid in the LZ token instead of native gas
    pub async fn quote_send(
        &self,
        send_param: &SendParam,
        pay_in_lz_token: bool,
    ) -> Result<MessagingFee, alloy_contract::Error> {
        let fee = self
            .instance
            .quoteSend(send_param.clone(), pay_in_lz_token)
            .call()
            .await?;

        info!(
            destination_eid = send_param.dstEid,
            native_fee = %fee.nativeFee,
            lz_token_fee = %fee.lzTokenFee,
            contract_address = %self.instance.address(),
            event = "send_quoted"
        );

        Ok(fee)
    }

    /// Call builder for `send`, with the native fee attached as value.
    pub fn send_call_builder(
        &self,
        send_param: SendParam,
        fee: MessagingFee,
        refund_address: Address,
    ) -> CallBuilder<&P, PhantomData<sendCall>> {
        let value = fee.nativeFee;
        self.instance
            .send(send_param, fee, refund_address)
            .value(value)
    }

    /// Transaction request for `send` that the caller signs and submits
    pub fn send_transaction(
        &self,
        from: Address,
        send_param: SendParam,
        fee: MessagingFee,
    ) -> TransactionRequest {
        info!(
            from = %from,
            destination_eid = send_param.dstEid,
            amount = %send_param.amountLD,
            contract_address = %self.instance.address(),
            event = "send_transaction_created"
        );

        self.send_call_builder(send_param, fee, from)
            .from(from)
            .into_transaction_request()
    }

    pub fn address(&self) -> Address {
        *self.instance.address()
    }
}

sol!(
    #[derive(Debug, PartialEq, Eq)]
    struct SendParam {
        uint32 dstEid;
        bytes32 to;
        uint256 amountLD;
        uint256 minAmountLD;
        bytes extraOptions;
        bytes composeMsg;
        bytes oftCmd;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct MessagingFee {
        uint256 nativeFee;
        uint256 lzTokenFee;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct MessagingReceipt {
        bytes32 guid;
        uint64 nonce;
        MessagingFee fee;
    }

    #[derive(Debug, PartialEq, Eq)]
    struct OFTReceipt {
        uint256 amountSentLD;
        uint256 amountReceivedLD;
    }

    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IOFT {
        function balanceOf(address account) external view returns (uint256);
        function decimals() external view returns (uint8);
        function quoteSend(SendParam calldata _sendParam, bool _payInLzToken) external view returns (MessagingFee memory msgFee);
        function send(SendParam calldata _sendParam, MessagingFee calldata _fee, address _refundAddress) external payable returns (MessagingReceipt memory msgReceipt, OFTReceipt memory oftReceipt);
    }
);
