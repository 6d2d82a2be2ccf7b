//! Test utilities and fake implementations
//!
//! In-memory stand-ins for [`OftEndpoint`] and [`Clock`] so the transfer task
//! can be driven through success, failure and timeout paths without a chain.

use alloy_primitives::{Address, TxHash, U256};
use alloy_transport::TransportErrorKind;
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crate::contracts::oft::{MessagingFee, SendParam};
use crate::traits::{Clock, OftEndpoint};
use crate::transfer::{SendReceipt, TxOverrides};
use crate::{OftError, Result};

// ============================================================================
// Fake OFT Endpoint
// ============================================================================

/// A `send` the fake accepted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSend {
    pub send_param: SendParam,
    pub fee: MessagingFee,
    pub overrides: TxOverrides,
}

#[derive(Debug)]
struct EndpointState {
    balances: HashMap<Address, VecDeque<U256>>,
    balance_reads: HashMap<Address, usize>,
    balance_read_limits: HashMap<Address, usize>,
    decimals: u8,
    fee: MessagingFee,
    gas_price: u128,
    nonce: u64,
    gas_price_failure: Option<String>,
    submit_failure: Option<String>,
    reverts: bool,
    hangs: bool,
    sends: Vec<RecordedSend>,
    submit_attempts: usize,
    quotes: usize,
}

/// A fake OFT deployment with scripted balances.
///
/// Balances are consumed as a sequence per account: each read pops the next
/// value, and the last value repeats forever. Accounts with no script read as
/// zero.
#[derive(Clone, Debug)]
pub struct FakeOftEndpoint {
    token: Address,
    account: Address,
    state: Arc<Mutex<EndpointState>>,
}

impl FakeOftEndpoint {
    pub fn new(token: Address, account: Address) -> Self {
        Self {
            token,
            account,
            state: Arc::new(Mutex::new(EndpointState {
                balances: HashMap::new(),
                balance_reads: HashMap::new(),
                balance_read_limits: HashMap::new(),
                decimals: 18,
                fee: MessagingFee {
                    nativeFee: U256::from(1_000_000_000_000_000u64),
                    lzTokenFee: U256::ZERO,
                },
                gas_price: 1_000_000_000,
                nonce: 0,
                gas_price_failure: None,
                submit_failure: None,
                reverts: false,
                hangs: false,
                sends: Vec::new(),
                submit_attempts: 0,
                quotes: 0,
            })),
        }
    }

    pub fn with_decimals(self, decimals: u8) -> Self {
        self.state.lock().unwrap().decimals = decimals;
        self
    }

    /// Script the balances returned for `account`, in read order
    pub fn set_balances(&self, account: Address, balances: Vec<U256>) {
        self.state
            .lock()
            .unwrap()
            .balances
            .insert(account, balances.into());
    }

    /// Let `reads` balance reads for `account` succeed, then fail every
    /// later one with a provider error
    pub fn fail_balance_reads_after(&self, account: Address, reads: usize) {
        self.state
            .lock()
            .unwrap()
            .balance_read_limits
            .insert(account, reads);
    }

    pub fn set_fee(&self, fee: MessagingFee) {
        self.state.lock().unwrap().fee = fee;
    }

    pub fn set_gas_price(&self, gas_price: u128) {
        self.state.lock().unwrap().gas_price = gas_price;
    }

    pub fn set_nonce(&self, nonce: u64) {
        self.state.lock().unwrap().nonce = nonce;
    }

    /// Make every gas price read fail with a transport error
    pub fn fail_gas_price(&self, reason: &str) {
        self.state.lock().unwrap().gas_price_failure = Some(reason.to_string());
    }

    /// Make every `submit_send` fail with `reason`
    pub fn fail_submissions(&self, reason: &str) {
        self.state.lock().unwrap().submit_failure = Some(reason.to_string());
    }

    /// Accept submissions but report them as reverted
    pub fn revert_submissions(&self) {
        self.state.lock().unwrap().reverts = true;
    }

    /// Accept submissions but never report them as included
    pub fn hang_inclusion(&self) {
        self.state.lock().unwrap().hangs = true;
    }

    /// Sends accepted so far
    pub fn sends(&self) -> Vec<RecordedSend> {
        self.state.lock().unwrap().sends.clone()
    }

    /// Submission attempts, including failed ones
    pub fn submit_count(&self) -> usize {
        self.state.lock().unwrap().submit_attempts
    }

    pub fn quote_count(&self) -> usize {
        self.state.lock().unwrap().quotes
    }

    /// Number of balance reads for `account`
    pub fn balance_reads(&self, account: Address) -> usize {
        self.state
            .lock()
            .unwrap()
            .balance_reads
            .get(&account)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl OftEndpoint for FakeOftEndpoint {
    fn token(&self) -> Address {
        self.token
    }

    fn account(&self) -> Address {
        self.account
    }

    async fn balance_of(&self, account: Address) -> Result<U256> {
        let mut state = self.state.lock().unwrap();
        let reads = {
            let count = state.balance_reads.entry(account).or_default();
            *count += 1;
            *count
        };
        if state
            .balance_read_limits
            .get(&account)
            .is_some_and(|limit| reads > *limit)
        {
            return Err(OftError::Provider("simulated RPC error".to_string()));
        }

        let Some(sequence) = state.balances.get_mut(&account) else {
            return Ok(U256::ZERO);
        };
        let balance = if sequence.len() > 1 {
            sequence.pop_front()
        } else {
            sequence.front().copied()
        };
        Ok(balance.unwrap_or_default())
    }

    async fn decimals(&self) -> Result<u8> {
        Ok(self.state.lock().unwrap().decimals)
    }

    async fn quote_send(&self, _send_param: &SendParam) -> Result<MessagingFee> {
        let mut state = self.state.lock().unwrap();
        state.quotes += 1;
        Ok(state.fee.clone())
    }

    async fn gas_price(&self) -> Result<u128> {
        let state = self.state.lock().unwrap();
        match &state.gas_price_failure {
            Some(reason) => Err(TransportErrorKind::custom_str(reason).into()),
            None => Ok(state.gas_price),
        }
    }

    async fn pending_nonce(&self) -> Result<u64> {
        Ok(self.state.lock().unwrap().nonce)
    }

    async fn submit_send(
        &self,
        send_param: SendParam,
        fee: MessagingFee,
        overrides: TxOverrides,
    ) -> Result<TxHash> {
        let mut state = self.state.lock().unwrap();
        state.submit_attempts += 1;
        if let Some(reason) = &state.submit_failure {
            return Err(OftError::TransactionFailed {
                reason: reason.clone(),
            });
        }
        state.sends.push(RecordedSend {
            send_param,
            fee,
            overrides,
        });
        state.nonce += 1;
        Ok(TxHash::repeat_byte(state.sends.len() as u8))
    }

    async fn wait_for_inclusion(&self, tx_hash: TxHash) -> Result<SendReceipt> {
        let (hangs, reverts) = {
            let state = self.state.lock().unwrap();
            (state.hangs, state.reverts)
        };
        if hangs {
            std::future::pending::<()>().await;
        }
        Ok(SendReceipt {
            tx_hash,
            block_number: Some(100),
            success: !reverts,
        })
    }
}

// ============================================================================
// Fake Clock
// ============================================================================

/// A fake clock that allows fast-forwarding time in tests.
#[derive(Clone, Debug)]
pub struct FakeClock {
    current_time: Arc<Mutex<Instant>>,
    sleep_log: Arc<Mutex<Vec<Duration>>>,
}

impl Default for FakeClock {
    fn default() -> Self {
        Self {
            current_time: Arc::new(Mutex::new(Instant::now())),
            sleep_log: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fast-forward the clock by the given duration
    pub fn advance(&self, duration: Duration) {
        let mut time = self.current_time.lock().unwrap();
        *time += duration;
    }

    /// Get the total time "slept" by this clock
    pub fn total_sleep_time(&self) -> Duration {
        self.sleep_log.lock().unwrap().iter().sum()
    }

    /// Get the number of times sleep was called
    pub fn sleep_count(&self) -> usize {
        self.sleep_log.lock().unwrap().len()
    }
}

#[async_trait]
impl Clock for FakeClock {
    async fn sleep(&self, duration: Duration) {
        self.sleep_log.lock().unwrap().push(duration);
        self.advance(duration);
    }

    fn now(&self) -> Instant {
        *self.current_time.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_clock_tracks_sleep_calls() {
        let clock = FakeClock::new();
        let start = clock.now();

        clock.sleep(Duration::from_secs(5)).await;
        clock.sleep(Duration::from_secs(10)).await;

        assert_eq!(clock.sleep_count(), 2);
        assert_eq!(clock.total_sleep_time(), Duration::from_secs(15));
        assert_eq!(clock.now() - start, Duration::from_secs(15));
    }

    #[tokio::test]
    async fn test_balance_sequence_repeats_last() {
        let holder = Address::repeat_byte(2);
        let endpoint = FakeOftEndpoint::new(Address::repeat_byte(1), holder);
        endpoint.set_balances(holder, vec![U256::ZERO, U256::from(10u64)]);

        assert_eq!(endpoint.balance_of(holder).await.unwrap(), U256::ZERO);
        assert_eq!(endpoint.balance_of(holder).await.unwrap(), U256::from(10u64));
        assert_eq!(endpoint.balance_of(holder).await.unwrap(), U256::from(10u64));
        assert_eq!(endpoint.balance_reads(holder), 3);

        let stranger = Address::repeat_byte(9);
        assert_eq!(endpoint.balance_of(stranger).await.unwrap(), U256::ZERO);
    }

    #[tokio::test]
    async fn test_failed_submission_is_not_recorded() {
        let endpoint = FakeOftEndpoint::new(Address::repeat_byte(1), Address::repeat_byte(2));
        endpoint.fail_submissions("nonce too low");

        let fee = MessagingFee {
            nativeFee: U256::from(1u64),
            lzTokenFee: U256::ZERO,
        };
        let overrides = TxOverrides {
            value: U256::from(1u64),
            gas_price: 2,
            nonce: 0,
        };
        let param = SendParam {
            dstEid: 40231,
            to: Default::default(),
            amountLD: U256::from(1u64),
            minAmountLD: U256::from(1u64),
            extraOptions: Default::default(),
            composeMsg: Default::default(),
            oftCmd: Default::default(),
        };

        let result = endpoint.submit_send(param, fee, overrides).await;
        assert!(matches!(result, Err(OftError::TransactionFailed { .. })));
        assert!(endpoint.sends().is_empty());
        assert_eq!(endpoint.submit_count(), 1);
    }
}
