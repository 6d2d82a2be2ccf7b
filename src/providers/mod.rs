//! Production implementations of the [`crate::traits`] seams.
//!
//! [`AlloyOftEndpoint`] talks to a live chain over JSON-RPC and
//! [`TokioClock`] sleeps for real. Tests use the fakes in [`crate::testing`].

mod alloy;
mod tokio_clock;

pub use self::alloy::AlloyOftEndpoint;
pub use self::tokio_clock::TokioClock;
