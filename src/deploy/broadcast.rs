// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Forge broadcast records and contract address resolution
//!
//! `forge script --broadcast` writes one JSON log per run under
//! `broadcast/<Script>.s.sol/<chainId>/run-<timestamp>.json` and keeps a copy
//! of the newest run as `run-latest.json`. Contracts deployed by those scripts
//! are located here by contract name and creation kind.

use std::fmt;
use std::path::{Path, PathBuf};

use alloy_primitives::{Address, TxHash};
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

use crate::error::{OftError, Result};

const SCRIPT_SUFFIX: &str = ".s.sol";

/// Kind of transaction recorded in a broadcast run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Create,
    Create2,
    Call,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Create => "CREATE",
            Self::Create2 => "CREATE2",
            Self::Call => "CALL",
            Self::Unknown => "UNKNOWN",
        };
        f.write_str(s)
    }
}

/// A single transaction of a broadcast run
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastTransaction {
    #[serde(default)]
    pub hash: Option<TxHash>,
    pub transaction_type: TransactionKind,
    #[serde(default)]
    pub contract_name: Option<String>,
    #[serde(default)]
    pub contract_address: Option<Address>,
    #[serde(default)]
    pub arguments: Option<Vec<String>>,
}

impl BroadcastTransaction {
    fn is(&self, contract_name: &str, kind: TransactionKind) -> bool {
        self.transaction_type == kind && self.contract_name.as_deref() == Some(contract_name)
    }

    /// First constructor argument parsed as an address, if it is one
    pub fn first_argument_address(&self) -> Option<Address> {
        self.arguments
            .as_ref()
            .and_then(|args| args.first())
            .and_then(|arg| arg.trim().parse::<Address>().ok())
    }

    /// Deployed address, or an error naming the contract
    pub fn address(&self) -> Result<Address> {
        self.contract_address.ok_or_else(|| OftError::MissingAddress {
            contract_name: self.contract_name.clone().unwrap_or_default(),
        })
    }
}

/// Parsed content of a `run-*.json` broadcast file
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BroadcastRecord {
    pub transactions: Vec<BroadcastTransaction>,
    #[serde(default)]
    pub chain: Option<u64>,
    #[serde(default)]
    pub timestamp: Option<u64>,
    #[serde(default)]
    pub commit: Option<String>,
}

impl BroadcastRecord {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the first transaction in file order matching name and kind.
    pub fn find(
        &self,
        contract_name: &str,
        kind: TransactionKind,
    ) -> Result<&BroadcastTransaction> {
        self.transactions
            .iter()
            .find(|tx| tx.is(contract_name, kind))
            .ok_or_else(|| {
                error!(
                    contract_name = contract_name,
                    kind = %kind,
                    transactions = self.transactions.len(),
                    event = "broadcast_transaction_not_found"
                );
                OftError::TransactionNotFound {
                    contract_name: contract_name.to_string(),
                    kind: kind.to_string(),
                }
            })
    }

    /// Address of the first `CREATE` of `contract_name`
    pub fn contract_address(&self, contract_name: &str) -> Result<Address> {
        let address = self.find(contract_name, TransactionKind::Create)?.address()?;
        debug!(
            contract_name = contract_name,
            contract_address = %address,
            event = "contract_address_resolved"
        );
        Ok(address)
    }

    /// Address of the first `CREATE` of `proxy_name` whose first constructor
    /// argument is `implementation`.
    pub fn proxy_address(&self, proxy_name: &str, implementation: Address) -> Result<Address> {
        let tx = self
            .transactions
            .iter()
            .filter(|tx| tx.is(proxy_name, TransactionKind::Create))
            .find(|tx| tx.first_argument_address() == Some(implementation))
            .ok_or_else(|| {
                error!(
                    proxy_name = proxy_name,
                    implementation = %implementation,
                    event = "proxy_transaction_not_found"
                );
                OftError::TransactionNotFound {
                    contract_name: format!("{proxy_name}({implementation})"),
                    kind: TransactionKind::Create.to_string(),
                }
            })?;

        let address = tx.address()?;
        debug!(
            proxy_name = proxy_name,
            implementation = %implementation,
            proxy_address = %address,
            event = "proxy_address_resolved"
        );
        Ok(address)
    }
}

/// Which run of a script to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunSelector {
    #[default]
    Latest,
    Timestamp(u64),
}

impl RunSelector {
    pub fn file_name(&self) -> String {
        match self {
            Self::Latest => "run-latest.json".to_string(),
            Self::Timestamp(ts) => format!("run-{ts}.json"),
        }
    }
}

impl From<Option<u64>> for RunSelector {
    fn from(timestamp: Option<u64>) -> Self {
        timestamp.map_or(Self::Latest, Self::Timestamp)
    }
}

/// Locates broadcast files below a forge `broadcast/` directory
#[derive(Debug, Clone)]
pub struct BroadcastLocator {
    root: PathBuf,
}

impl BroadcastLocator {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<script>.s.sol/<chain_id>/run-<latest|timestamp>.json`
    ///
    /// ```rust
    /// use lz_oft_ops::{BroadcastLocator, RunSelector};
    /// use std::path::Path;
    ///
    /// let locator = BroadcastLocator::new("broadcast");
    /// assert_eq!(
    ///     locator.path("Deploy", 31337, RunSelector::Latest),
    ///     Path::new("broadcast/Deploy.s.sol/31337/run-latest.json"),
    /// );
    /// ```
    pub fn path(&self, script: &str, chain_id: u64, run: RunSelector) -> PathBuf {
        let script = script.strip_suffix(SCRIPT_SUFFIX).unwrap_or(script);
        self.root
            .join(format!("{script}{SCRIPT_SUFFIX}"))
            .join(chain_id.to_string())
            .join(run.file_name())
    }

    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub fn load(&self, script: &str, chain_id: u64, run: RunSelector) -> Result<BroadcastRecord> {
        let path = self.path(script, chain_id, run);
        let content = std::fs::read_to_string(&path).map_err(|source| {
            error!(path = %path.display(), error = %source, event = "broadcast_unreadable");
            OftError::BroadcastUnreadable {
                path: path.clone(),
                source,
            }
        })?;
        let record = BroadcastRecord::from_json(&content)?;

        info!(
            path = %path.display(),
            transactions = record.transactions.len(),
            event = "broadcast_loaded"
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const IMPL: &str = "0xabcdef0000000000000000000000000000000001";
    const OTHER_IMPL: &str = "0x2222222222222222222222222222222222222222";

    fn record() -> BroadcastRecord {
        let json = format!(
            r#"{{
                "transactions": [
                    {{"hash": null, "transactionType": "CREATE", "contractName": "DebtTokenWithLz",
                      "contractAddress": "{IMPL}", "arguments": null}},
                    {{"transactionType": "CREATE", "contractName": "ERC1967Proxy",
                      "contractAddress": "0x000000000000000000000000000000000000aaaa",
                      "arguments": ["{OTHER_IMPL}", "0x"]}},
                    {{"transactionType": "CREATE", "contractName": "ERC1967Proxy",
                      "contractAddress": "0x000000000000000000000000000000000000bbbb",
                      "arguments": ["{}", "0x8129fc1c"]}},
                    {{"transactionType": "CALL", "contractName": "DebtTokenWithLz",
                      "contractAddress": "0x000000000000000000000000000000000000bbbb",
                      "function": "setPeer(uint32,bytes32)"}},
                    {{"transactionType": "CREATE2", "contractName": "Factory",
                      "contractAddress": "0x000000000000000000000000000000000000cccc"}}
                ],
                "receipts": [],
                "libraries": [],
                "timestamp": 1718000000,
                "chain": 421614,
                "commit": "8c2b3f1"
            }}"#,
            IMPL.to_uppercase().replace("0X", "0x")
        );
        BroadcastRecord::from_json(&json).unwrap()
    }

    #[test]
    fn test_contract_address_first_create() {
        let record = record();
        assert_eq!(
            record.contract_address("DebtTokenWithLz").unwrap(),
            address!("abcdef0000000000000000000000000000000001")
        );
        assert_eq!(record.chain, Some(421614));
    }

    #[test]
    fn test_proxy_address_matches_implementation_case_insensitively() {
        let record = record();
        let proxy = record
            .proxy_address(
                "ERC1967Proxy",
                address!("abcdef0000000000000000000000000000000001"),
            )
            .unwrap();
        assert_eq!(proxy, address!("000000000000000000000000000000000000bbbb"));
    }

    #[test]
    fn test_first_in_file_order_wins() {
        let record = record();
        let tx = record
            .find("ERC1967Proxy", TransactionKind::Create)
            .unwrap();
        assert_eq!(
            tx.contract_address,
            Some(address!("000000000000000000000000000000000000aaaa"))
        );
    }

    #[test]
    fn test_kind_filter() {
        let record = record();
        assert!(record.find("Factory", TransactionKind::Create).is_err());
        assert!(record.find("Factory", TransactionKind::Create2).is_ok());
    }

    #[test]
    fn test_missing_contract_fails() {
        let err = record().contract_address("SatoshiXApp").unwrap_err();
        assert!(matches!(err, OftError::TransactionNotFound { .. }));
    }

    #[test]
    fn test_unknown_kind_and_missing_address() {
        let record = BroadcastRecord::from_json(
            r#"{"transactions": [
                {"transactionType": "CREATE", "contractName": "X", "contractAddress": null},
                {"transactionType": "SOMETHING_NEW", "contractName": "Y"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(
            record.transactions[1].transaction_type,
            TransactionKind::Unknown
        );
        assert!(matches!(
            record.contract_address("X").unwrap_err(),
            OftError::MissingAddress { .. }
        ));
    }

    #[test]
    fn test_run_selector_paths() {
        let locator = BroadcastLocator::new("/repo/broadcast");
        assert_eq!(
            locator.path("Deploy.s.sol", 11155111, RunSelector::Timestamp(1718000000)),
            PathBuf::from("/repo/broadcast/Deploy.s.sol/11155111/run-1718000000.json")
        );
        assert_eq!(RunSelector::from(None), RunSelector::Latest);
        assert_eq!(RunSelector::from(Some(5)), RunSelector::Timestamp(5));
    }
}
