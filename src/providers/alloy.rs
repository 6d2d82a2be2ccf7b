//! Alloy-based OFT endpoint.

use alloy_network::{Ethereum, ReceiptResponse, TransactionBuilder};
use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::{PendingTransactionBuilder, Provider};
use async_trait::async_trait;
use tracing::{debug, info, instrument, trace};

use crate::contracts::oft::{MessagingFee, OftContract, SendParam};
use crate::error::{OftError, Result};
use crate::traits::OftEndpoint;
use crate::transfer::{SendReceipt, TxOverrides};

/// OFT endpoint over an Alloy provider.
///
/// The provider must carry a wallet for `account` when the endpoint is used
/// as a transfer source; read-only providers are enough for the destination.
///
/// # Examples
///
/// ```rust,no_run
/// use lz_oft_ops::providers::AlloyOftEndpoint;
/// use alloy_primitives::address;
/// use alloy_provider::ProviderBuilder;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = ProviderBuilder::new()
///     .connect("https://sepolia-rollup.arbitrum.io/rpc")
///     .await?;
///
/// let endpoint = AlloyOftEndpoint::new(
///     provider,
///     address!("85576DEa799eC912AAf05566922EaC75fC97Bd79"),
///     address!("f39Fd6e51aad88F6F4ce6aB8827279cffFb92266"),
/// );
/// # Ok(())
/// # }
/// ```
pub struct AlloyOftEndpoint<P>
where
    P: Provider<Ethereum> + Clone,
{
    provider: P,
    oft: OftContract<P>,
    account: Address,
}

impl<P> AlloyOftEndpoint<P>
where
    P: Provider<Ethereum> + Clone,
{
    pub fn new(provider: P, token: Address, account: Address) -> Self {
        Self {
            oft: OftContract::new(token, provider.clone()),
            provider,
            account,
        }
    }
}

fn contract_err(e: alloy_contract::Error) -> OftError {
    OftError::ContractCall(e.to_string())
}

#[async_trait]
impl<P> OftEndpoint for AlloyOftEndpoint<P>
where
    P: Provider<Ethereum> + Clone + Send + Sync,
{
    fn token(&self) -> Address {
        self.oft.address()
    }

    fn account(&self) -> Address {
        self.account
    }

    async fn balance_of(&self, account: Address) -> Result<U256> {
        self.oft.balance_of(account).await.map_err(contract_err)
    }

    async fn decimals(&self) -> Result<u8> {
        self.oft.decimals().await.map_err(contract_err)
    }

    async fn quote_send(&self, send_param: &SendParam) -> Result<MessagingFee> {
        self.oft
            .quote_send(send_param, false)
            .await
            .map_err(contract_err)
    }

    async fn gas_price(&self) -> Result<u128> {
        trace!("Fetching gas price");
        Ok(self.provider.get_gas_price().await?)
    }

    async fn pending_nonce(&self) -> Result<u64> {
        let nonce = self
            .provider
            .get_transaction_count(self.account)
            .pending()
            .await?;
        Ok(nonce)
    }

    #[instrument(skip_all, fields(token = %self.oft.address(), nonce = overrides.nonce))]
    async fn submit_send(
        &self,
        send_param: SendParam,
        fee: MessagingFee,
        overrides: TxOverrides,
    ) -> Result<TxHash> {
        let request = self
            .oft
            .send_transaction(self.account, send_param, fee)
            .with_value(overrides.value)
            .with_gas_price(overrides.gas_price)
            .with_nonce(overrides.nonce);

        let pending = self
            .provider
            .send_transaction(request)
            .await
            .map_err(|e| OftError::TransactionFailed {
                reason: e.to_string(),
            })?;
        let tx_hash = *pending.tx_hash();

        info!(tx_hash = %tx_hash, event = "send_transaction_broadcast");
        Ok(tx_hash)
    }

    #[instrument(skip(self), fields(tx_hash = %tx_hash))]
    async fn wait_for_inclusion(&self, tx_hash: TxHash) -> Result<SendReceipt> {
        let receipt = PendingTransactionBuilder::new(self.provider.root().clone(), tx_hash)
            .get_receipt()
            .await
            .map_err(|e| OftError::Provider(e.to_string()))?;

        debug!(
            block_number = ?receipt.block_number(),
            status = receipt.status(),
            event = "send_transaction_included"
        );

        Ok(SendReceipt {
            tx_hash,
            block_number: receipt.block_number(),
            success: receipt.status(),
        })
    }
}
