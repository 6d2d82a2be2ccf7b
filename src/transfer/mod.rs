// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Cross-chain OFT transfer with destination confirmation
//!
//! A [`TransferTask`] runs one transfer end to end:
//!
//! 1. reads the sender's source balance and the recipient's destination balance
//! 2. quotes the messaging fee
//! 3. submits `send` with a multiplied gas price and the sender's pending nonce
//! 4. waits for the transaction to be included
//! 5. polls the destination balance until the tokens arrive
//!
//! A [`Cancellation`] stops the run at any of these steps once the send has
//! been prepared; a send already broadcast is not recalled.
//!
//! Each run is independent; nothing is persisted between runs.

mod config;
mod intent;

pub use config::{
    ArrivalCheck, Cancellation, PollingConfig, SubmitFailurePolicy, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_POLL_INTERVAL_SECS,
};
pub use intent::{parse_amount, scan_url, SendReceipt, TransferIntent, TxOverrides};

use alloy_primitives::utils::format_units;
use alloy_primitives::{Address, U256};
use bon::Builder;
use tracing::{debug, error, info, warn, Instrument};

use crate::contracts::oft::{MessagingFee, SendParam};
use crate::error::{OftError, Result};
use crate::spans;
use crate::traits::{Clock, OftEndpoint};

/// Gas price multiplier applied to the source chain's current price
pub const DEFAULT_GAS_PRICE_MULTIPLIER: u128 = 2;

/// Outcome of the submit-and-include step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// Stopped after the fee quote
    Skipped,
    /// Included successfully
    Included(SendReceipt),
    /// Submission or inclusion failed and polling continued anyway
    Failed { reason: String },
}

/// Destination balance that satisfied the arrival check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    pub balance: U256,
    /// Balance checks made, including the successful one
    pub attempts: u32,
}

/// Everything observed during one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReport {
    /// Amount in base units
    pub amount: U256,
    pub fee: MessagingFee,
    pub source_before: U256,
    pub destination_before: U256,
    /// Sender balance after inclusion; only read when the send was included
    pub source_after: Option<U256>,
    pub submission: Submission,
    /// `None` when the run stopped after the quote
    pub delivery: Option<Delivery>,
}

impl TransferReport {
    /// True when the tokens were seen on the destination
    pub fn is_delivered(&self) -> bool {
        self.delivery.is_some()
    }
}

/// Sends tokens from `source` to `destination` and waits for them to land.
///
/// # Example
///
/// ```rust,no_run
/// use lz_oft_ops::providers::TokioClock;
/// use lz_oft_ops::testing::FakeOftEndpoint;
/// use lz_oft_ops::{EndpointId, PollingConfig, TransferIntent, TransferTask};
/// use alloy_primitives::Address;
///
/// # async fn example() -> lz_oft_ops::Result<()> {
/// let source = FakeOftEndpoint::new(Address::repeat_byte(1), Address::repeat_byte(2));
/// let destination = FakeOftEndpoint::new(Address::repeat_byte(3), Address::repeat_byte(2));
///
/// let task = TransferTask::builder()
///     .source(source)
///     .destination(destination)
///     .clock(TokioClock::new())
///     .intent(
///         TransferIntent::builder()
///             .source(EndpointId::BaseSepolia)
///             .destination(EndpointId::ArbitrumSepolia)
///             .recipient(Address::repeat_byte(2))
///             .amount("10")
///             .build(),
///     )
///     .polling(PollingConfig::default().with_max_attempts(60))
///     .build();
///
/// let report = task.run().await?;
/// println!("delivered after {:?} checks", report.delivery.map(|d| d.attempts));
/// # Ok(())
/// # }
/// ```
#[derive(Builder)]
pub struct TransferTask<S, D, C>
where
    S: OftEndpoint,
    D: OftEndpoint,
    C: Clock,
{
    source: S,
    destination: D,
    clock: C,
    intent: TransferIntent,
    #[builder(default)]
    polling: PollingConfig,
    #[builder(default = DEFAULT_GAS_PRICE_MULTIPLIER)]
    gas_price_multiplier: u128,
    #[builder(default)]
    arrival: ArrivalCheck,
    #[builder(default)]
    on_submit_failure: SubmitFailurePolicy,
    #[builder(default)]
    cancellation: Cancellation,
    /// Stop after the fee quote without sending
    #[builder(default)]
    quote_only: bool,
}

impl<S, D, C> TransferTask<S, D, C>
where
    S: OftEndpoint,
    D: OftEndpoint,
    C: Clock,
{
    pub fn intent(&self) -> &TransferIntent {
        &self.intent
    }

    /// Handle that stops the destination poll loop
    pub fn cancellation(&self) -> &Cancellation {
        &self.cancellation
    }

    pub async fn run(&self) -> Result<TransferReport> {
        let span = spans::transfer(
            self.intent.source(),
            self.intent.destination(),
            self.intent.recipient(),
            self.intent.amount(),
        );
        async {
            let result = self.execute().await;
            if let Err(e) = &result {
                spans::record_error(e);
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn execute(&self) -> Result<TransferReport> {
        let sender = self.source.account();
        let recipient = self.intent.recipient();

        let decimals = self.source.decimals().await?;
        let amount = self.intent.amount_ld(decimals)?;

        let source_before = self.source.balance_of(sender).await?;
        let destination_before = self.destination.balance_of(recipient).await?;
        info!(
            sender = %sender,
            recipient = %recipient,
            source_balance = %display_units(source_before, decimals),
            destination_balance = %display_units(destination_before, decimals),
            event = "balances_before_transfer"
        );

        if source_before < amount {
            warn!(
                source_balance = %source_before,
                amount = %amount,
                event = "insufficient_source_balance"
            );
        }

        let send_param = self.intent.send_param(amount);
        let fee = self.source.quote_send(&send_param).await?;
        info!(
            native_fee = %fee.nativeFee,
            lz_token_fee = %fee.lzTokenFee,
            event = "transfer_fee_quoted"
        );

        if self.quote_only {
            info!(event = "transfer_quote_only");
            return Ok(TransferReport {
                amount,
                fee,
                source_before,
                destination_before,
                source_after: None,
                submission: Submission::Skipped,
                delivery: None,
            });
        }

        let overrides = self.overrides(&fee).await?;

        if self.cancellation.is_cancelled() {
            warn!(event = "transfer_cancelled_before_send");
            return Err(OftError::Cancelled { attempts: 0 });
        }
        let submitted = tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => {
                warn!(event = "transfer_cancelled_during_send");
                return Err(OftError::Cancelled { attempts: 0 });
            }
            result = self.submit(send_param, fee.clone(), overrides) => result,
        };

        let submission = match submitted {
            Ok(receipt) => Submission::Included(receipt),
            Err(e) => match self.on_submit_failure {
                SubmitFailurePolicy::Abort => {
                    error!(error = %e, event = "send_failed_aborting");
                    return Err(e);
                }
                SubmitFailurePolicy::ContinuePolling => {
                    error!(error = %e, event = "send_failed_polling_anyway");
                    Submission::Failed {
                        reason: e.to_string(),
                    }
                }
            },
        };

        let source_after = match &submission {
            Submission::Included(_) => self.check_source_debit(sender, source_before, amount).await,
            _ => None,
        };

        let delivery = self
            .poll_destination(recipient, destination_before, amount)
            .await?;
        info!(
            destination_balance = %display_units(delivery.balance, decimals),
            attempts = delivery.attempts,
            event = "transfer_delivered"
        );

        Ok(TransferReport {
            amount,
            fee,
            source_before,
            destination_before,
            source_after,
            submission,
            delivery: Some(delivery),
        })
    }

    /// Value, gas price and nonce for the send. Read before submitting, so a
    /// failure here ends the run regardless of the failure policy.
    async fn overrides(&self, fee: &MessagingFee) -> Result<TxOverrides> {
        let gas_price = self
            .source
            .gas_price()
            .await?
            .saturating_mul(self.gas_price_multiplier);
        let nonce = self.source.pending_nonce().await?;
        let overrides = TxOverrides {
            value: fee.nativeFee,
            gas_price,
            nonce,
        };
        debug!(
            gas_price = gas_price,
            nonce = nonce,
            value = %overrides.value,
            event = "send_overrides"
        );
        Ok(overrides)
    }

    async fn submit(
        &self,
        send_param: SendParam,
        fee: MessagingFee,
        overrides: TxOverrides,
    ) -> Result<SendReceipt> {
        let tx_hash = self.source.submit_send(send_param, fee, overrides).await?;
        info!(
            tx_hash = %tx_hash,
            scan_url = %scan_url(self.intent.source(), tx_hash),
            event = "send_submitted"
        );

        let receipt = self.source.wait_for_inclusion(tx_hash).await?;
        if !receipt.success {
            return Err(OftError::TransactionFailed {
                reason: format!("send transaction {tx_hash} reverted"),
            });
        }
        info!(
            tx_hash = %tx_hash,
            block_number = ?receipt.block_number,
            event = "send_included"
        );
        Ok(receipt)
    }

    /// Sender balance after inclusion, or `None` when it cannot be read.
    async fn check_source_debit(
        &self,
        sender: Address,
        before: U256,
        amount: U256,
    ) -> Option<U256> {
        let after = match self.source.balance_of(sender).await {
            Ok(after) => after,
            Err(e) => {
                warn!(error = %e, event = "source_balance_unreadable");
                return None;
            }
        };
        if before.checked_sub(amount) != Some(after) {
            warn!(
                before = %before,
                after = %after,
                amount = %amount,
                event = "source_debit_mismatch"
            );
        }
        Some(after)
    }

    async fn poll_destination(
        &self,
        recipient: Address,
        baseline: U256,
        amount: U256,
    ) -> Result<Delivery> {
        let span = spans::poll_destination(
            self.intent.destination(),
            recipient,
            self.polling.max_attempts,
            self.polling.interval.as_secs(),
        );
        async {
            let started = self.clock.now();
            let mut attempts = 0u32;
            loop {
                if self.cancellation.is_cancelled() {
                    warn!(attempts = attempts, event = "destination_polling_cancelled");
                    return Err(OftError::Cancelled { attempts });
                }

                attempts += 1;
                let balance = self.destination.balance_of(recipient).await?;
                if self.arrival.is_satisfied(baseline, amount, balance) {
                    debug!(
                        elapsed_secs = self.clock.now().duration_since(started).as_secs(),
                        event = "destination_balance_changed"
                    );
                    return Ok(Delivery { balance, attempts });
                }

                if self.polling.max_attempts.is_some_and(|max| attempts >= max) {
                    error!(
                        attempts = attempts,
                        balance = %balance,
                        event = "destination_polling_timeout"
                    );
                    return Err(OftError::DeliveryTimeout { attempts });
                }

                debug!(
                    attempt = attempts,
                    balance = %balance,
                    event = "destination_balance_unchanged"
                );
                tokio::select! {
                    biased;
                    _ = self.cancellation.cancelled() => {}
                    _ = self.clock.sleep(self.polling.interval) => {}
                }
            }
        }
        .instrument(span)
        .await
    }
}

fn display_units(value: U256, decimals: u8) -> String {
    format_units(value, decimals).unwrap_or_else(|_| value.to_string())
}
