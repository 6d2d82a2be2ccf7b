//! LayerZero protocol-level types
//!
//! Endpoint identifiers and the executor options encoding shared by the route
//! table and the transfer task.

mod endpoint_id;
mod options;

pub use endpoint_id::{EndpointId, InvalidEndpointId, UnknownEndpoint};
pub use options::{
    address_to_bytes32, ExecutorOptions, DEFAULT_LZ_RECEIVE_GAS, EXECUTOR_WORKER_ID, TYPE_3,
};
