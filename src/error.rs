// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OftError {
    #[error("Endpoint not supported: {endpoint}")]
    EndpointNotSupported { endpoint: String },

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Contract call failed: {0}")]
    ContractCall(String),

    #[error("Transaction failed: {reason}")]
    TransactionFailed { reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid amount {amount:?}: {reason}")]
    InvalidAmount { amount: String, reason: String },

    #[error("Invalid route table: {0}")]
    InvalidRoute(String),

    #[error("Broadcast file {path} could not be read: {source}")]
    BroadcastUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No {kind} transaction for contract {contract_name} in broadcast record")]
    TransactionNotFound { contract_name: String, kind: String },

    #[error("Transaction for contract {contract_name} has no contract address")]
    MissingAddress { contract_name: String },

    #[error("Deployment not found: {name}")]
    DeploymentNotFound { name: String },

    #[error("Artifact not found: {name}")]
    ArtifactNotFound { name: String },

    #[error("Tokens not delivered after {attempts} balance checks")]
    DeliveryTimeout { attempts: u32 },

    #[error("Transfer cancelled after {attempts} destination balance checks")]
    Cancelled { attempts: u32 },

    #[error("RPC error: {0}")]
    Rpc(#[from] alloy_json_rpc::RpcError<alloy_transport::TransportErrorKind>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OftError>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_transport::TransportErrorKind;

    #[test]
    fn test_transport_errors_convert_to_rpc() {
        let err: OftError = TransportErrorKind::custom_str("connection reset").into();
        assert!(matches!(err, OftError::Rpc(_)));
        assert!(err.to_string().contains("connection reset"));
    }

    #[test]
    fn test_cancelled_message() {
        let err = OftError::Cancelled { attempts: 3 };
        assert_eq!(
            err.to_string(),
            "Transfer cancelled after 3 destination balance checks"
        );
    }
}
