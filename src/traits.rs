//! Seams between the transfer task and the outside world.
//!
//! The transfer task only talks to chains through [`OftEndpoint`] and only
//! waits through [`Clock`], so the whole send-and-confirm sequence can run
//! against in-memory fakes (see [`crate::testing`]).
//!
//! # Example: Implementing a Test Fake
//!
//! ```rust,ignore
//! use lz_oft_ops::traits::OftEndpoint;
//!
//! struct FixedBalance(U256);
//!
//! #[async_trait::async_trait]
//! impl OftEndpoint for FixedBalance {
//!     async fn balance_of(&self, _account: Address) -> Result<U256> {
//!         Ok(self.0)
//!     }
//!     // ...
//! }
//! ```

use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use std::time::{Duration, Instant};

use crate::contracts::oft::{MessagingFee, SendParam};
use crate::error::Result;
use crate::transfer::{SendReceipt, TxOverrides};

/// One OFT deployment as seen by one signing account.
///
/// The source side of a transfer uses every method; the destination side is
/// only asked for balances.
#[async_trait]
pub trait OftEndpoint: Send + Sync {
    /// Token contract address
    fn token(&self) -> Address;

    /// Account that signs transactions on this endpoint
    fn account(&self) -> Address;

    async fn balance_of(&self, account: Address) -> Result<U256>;

    async fn decimals(&self) -> Result<u8>;

    /// Quotes the messaging fee for `send_param`, paid in native gas.
    async fn quote_send(&self, send_param: &SendParam) -> Result<MessagingFee>;

    /// Current gas price in wei
    async fn gas_price(&self) -> Result<u128>;

    /// Next nonce for [`Self::account`], including pending transactions
    async fn pending_nonce(&self) -> Result<u64>;

    /// Signs and broadcasts `send` with the given overrides.
    ///
    /// Returns once the node accepted the transaction; inclusion is awaited
    /// separately with [`Self::wait_for_inclusion`].
    async fn submit_send(
        &self,
        send_param: SendParam,
        fee: MessagingFee,
        overrides: TxOverrides,
    ) -> Result<TxHash>;

    /// Blocks until `tx_hash` is included in a block.
    async fn wait_for_inclusion(&self, tx_hash: TxHash) -> Result<SendReceipt>;
}

/// Trait for time-based operations.
///
/// Lets tests run the destination poll loop without actually waiting.
#[async_trait]
pub trait Clock: Send + Sync {
    async fn sleep(&self, duration: Duration);

    fn now(&self) -> Instant;
}
