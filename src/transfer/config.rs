use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use alloy_primitives::U256;
use tokio::sync::watch;

/// Default seconds between destination balance checks
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Default number of destination balance checks (30 minutes at 5 s)
pub const DEFAULT_MAX_ATTEMPTS: u32 = 360;

/// Configuration for destination balance polling.
///
/// # Examples
///
/// ```rust
/// use lz_oft_ops::PollingConfig;
/// use std::time::Duration;
///
/// // 5 second interval, 360 checks
/// let config = PollingConfig::default();
///
/// let config = PollingConfig::default()
///     .with_max_attempts(20)
///     .with_interval_secs(10);
/// assert_eq!(config.total_timeout(), Some(Duration::from_secs(190)));
///
/// // Poll until delivered or cancelled
/// let config = PollingConfig::unbounded();
/// assert_eq!(config.total_timeout(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    /// Wait between balance checks.
    pub interval: Duration,
    /// Maximum balance checks; `None` polls until delivery or cancellation.
    pub max_attempts: Option<u32>,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_attempts: Some(DEFAULT_MAX_ATTEMPTS),
        }
    }
}

impl PollingConfig {
    /// Polls forever at the default interval.
    pub fn unbounded() -> Self {
        Self {
            max_attempts: None,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    pub fn with_interval_secs(mut self, secs: u64) -> Self {
        self.interval = Duration::from_secs(secs);
        self
    }

    /// Upper bound on time spent sleeping between checks
    ///
    /// Saturates at [`Duration::MAX`].
    pub fn total_timeout(&self) -> Option<Duration> {
        self.max_attempts.map(|attempts| {
            self.interval
                .checked_mul(attempts.saturating_sub(1))
                .unwrap_or(Duration::MAX)
        })
    }
}

/// When the destination balance counts as delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrivalCheck {
    /// Any increase over the pre-transfer balance
    #[default]
    ExceedsBaseline,
    /// Exactly the pre-transfer balance plus the sent amount
    ExactIncrease,
}

impl ArrivalCheck {
    pub fn is_satisfied(&self, baseline: U256, amount: U256, balance: U256) -> bool {
        match self {
            Self::ExceedsBaseline => balance > baseline,
            Self::ExactIncrease => Some(balance) == baseline.checked_add(amount),
        }
    }
}

impl FromStr for ArrivalCheck {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exceeds-baseline" => Ok(Self::ExceedsBaseline),
            "exact-increase" => Ok(Self::ExactIncrease),
            other => Err(format!(
                "unknown arrival check {other:?}, expected exceeds-baseline or exact-increase"
            )),
        }
    }
}

impl fmt::Display for ArrivalCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ExceedsBaseline => "exceeds-baseline",
            Self::ExactIncrease => "exact-increase",
        })
    }
}

/// What the task does when submitting or confirming `send` fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmitFailurePolicy {
    /// Log the failure and poll the destination anyway. Useful when the same
    /// transfer may have been submitted out of band.
    #[default]
    ContinuePolling,
    /// Return the submission error without polling.
    Abort,
}

impl FromStr for SubmitFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "continue" | "continue-polling" => Ok(Self::ContinuePolling),
            "abort" => Ok(Self::Abort),
            other => Err(format!(
                "unknown submit failure policy {other:?}, expected continue or abort"
            )),
        }
    }
}

impl fmt::Display for SubmitFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ContinuePolling => "continue",
            Self::Abort => "abort",
        })
    }
}

/// Shared stop signal for a transfer.
///
/// Clones observe the same signal. The task checks it before sending and
/// before every destination check, and races it against the inclusion wait
/// and the sleeps between checks.
#[derive(Debug, Clone)]
pub struct Cancellation(Arc<watch::Sender<bool>>);

impl Default for Cancellation {
    fn default() -> Self {
        Self(Arc::new(watch::channel(false).0))
    }
}

impl Cancellation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolves once [`Self::cancel`] has been called on any clone
    pub async fn cancelled(&self) {
        let mut rx = self.0.subscribe();
        // The sender lives as long as `self`, so this only returns on cancel
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_polling() {
        let config = PollingConfig::default();
        assert_eq!(config.interval, Duration::from_secs(5));
        assert_eq!(config.max_attempts, Some(360));
    }

    #[test]
    fn test_unbounded_polling() {
        let config = PollingConfig::unbounded().with_interval_secs(10);
        assert_eq!(config.max_attempts, None);
        assert_eq!(config.interval, Duration::from_secs(10));
        assert_eq!(config.total_timeout(), None);
    }

    #[rstest]
    #[case(ArrivalCheck::ExceedsBaseline, 100, 10, 101, true)]
    #[case(ArrivalCheck::ExceedsBaseline, 100, 10, 100, false)]
    #[case(ArrivalCheck::ExceedsBaseline, 100, 10, 99, false)]
    #[case(ArrivalCheck::ExactIncrease, 100, 10, 110, true)]
    #[case(ArrivalCheck::ExactIncrease, 100, 10, 105, false)]
    #[case(ArrivalCheck::ExactIncrease, 100, 10, 120, false)]
    fn test_arrival_check(
        #[case] check: ArrivalCheck,
        #[case] baseline: u64,
        #[case] amount: u64,
        #[case] balance: u64,
        #[case] expected: bool,
    ) {
        assert_eq!(
            check.is_satisfied(U256::from(baseline), U256::from(amount), U256::from(balance)),
            expected
        );
    }

    #[rstest]
    #[case("continue", SubmitFailurePolicy::ContinuePolling)]
    #[case("continue-polling", SubmitFailurePolicy::ContinuePolling)]
    #[case("abort", SubmitFailurePolicy::Abort)]
    fn test_policy_from_str(#[case] input: &str, #[case] expected: SubmitFailurePolicy) {
        assert_eq!(input.parse::<SubmitFailurePolicy>().unwrap(), expected);
    }

    #[test]
    fn test_arrival_check_round_trip() {
        for check in [ArrivalCheck::ExceedsBaseline, ArrivalCheck::ExactIncrease] {
            assert_eq!(check.to_string().parse::<ArrivalCheck>().unwrap(), check);
        }
        assert!("eventually".parse::<ArrivalCheck>().is_err());
    }

    #[test]
    fn test_cancellation_is_shared() {
        let token = Cancellation::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());
        token.cancel();
        assert!(clone.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_wakes_waiter() {
        let token = Cancellation::new();
        let waiter = token.clone();
        let handle = tokio::spawn(async move { waiter.cancelled().await });

        tokio::task::yield_now().await;
        token.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_cancelled_after_the_fact() {
        let token = Cancellation::new();
        token.cancel();
        // Already cancelled tokens resolve immediately
        token.cancelled().await;
    }

    #[test]
    fn test_total_timeout_saturates() {
        let config = PollingConfig::default()
            .with_interval_secs(u64::MAX)
            .with_max_attempts(3);
        assert_eq!(config.total_timeout(), Some(Duration::MAX));
    }
}
