//! Span helpers for deployment and transfer operations
//!
//! Span names are static and carry structured attributes only, so they can
//! be exported to OpenTelemetry as-is. The helpers are used internally by
//! [`register_proxy`](crate::register_proxy) and
//! [`TransferTask`](crate::TransferTask) but are public for callers that wrap
//! those operations in their own instrumentation.
//!
//! # Example
//!
//! ```rust
//! use lz_oft_ops::{spans, EndpointId};
//! use alloy_primitives::Address;
//!
//! let span = spans::poll_destination(EndpointId::ArbitrumSepolia, Address::ZERO, Some(360), 5);
//! let _guard = span.enter();
//! ```

use alloy_primitives::Address;
use tracing::Span;

use crate::EndpointId;

/// Create span for registering a proxy deployment.
///
/// Parent: caller
/// Children: None
#[inline]
pub fn register_proxy(deployment_name: &str, chain_id: u64) -> Span {
    tracing::info_span!(
        "lz_oft_ops.register_proxy",
        deployment_name = deployment_name,
        chain_id = chain_id,
    )
}

/// Create span for a whole transfer run.
///
/// Parent: caller
/// Children: lz_oft_ops.poll_destination, endpoint RPC spans
#[inline]
pub fn transfer(
    source: EndpointId,
    destination: EndpointId,
    recipient: Address,
    amount: &str,
) -> Span {
    tracing::info_span!(
        "lz_oft_ops.transfer",
        source_eid = source.as_u32(),
        source_chain = source.name(),
        destination_eid = destination.as_u32(),
        destination_chain = destination.name(),
        recipient = %recipient,
        amount = amount,
        error.type = tracing::field::Empty,
        error.message = tracing::field::Empty,
        error.source = tracing::field::Empty,
        otel.status_code = "OK",
    )
}

/// Create span for the destination balance poll loop.
///
/// Parent: lz_oft_ops.transfer
/// Children: balance reads
#[inline]
pub fn poll_destination(
    destination: EndpointId,
    recipient: Address,
    max_attempts: Option<u32>,
    poll_interval_secs: u64,
) -> Span {
    tracing::info_span!(
        "lz_oft_ops.poll_destination",
        destination_eid = destination.as_u32(),
        recipient = %recipient,
        max_attempts = ?max_attempts,
        poll_interval_secs = poll_interval_secs,
    )
}

/// Record error attributes on the current span.
///
/// Sets `error.type`, `error.message`, `error.source` (when present) and
/// flips `otel.status_code` to `ERROR`.
pub fn record_error<E: std::error::Error>(error: &E) {
    let current_span = Span::current();
    let message = error.to_string();
    current_span.record("error.type", message.split(':').next().unwrap_or("Unknown"));
    current_span.record("error.message", message.as_str());
    current_span.record("otel.status_code", "ERROR");

    if let Some(source) = error.source() {
        current_span.record("error.source", source.to_string());
    }
}
