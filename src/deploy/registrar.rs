//! Deployment bookkeeping in the hardhat-deploy layout
//!
//! A deployment record is the contract's extended artifact with the deployed
//! address folded in, stored as `<deployments>/<network>/<Name>.json`. Saving a
//! record under an existing name overwrites it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::error::{OftError, Result};

/// Interface description of a compiled contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedArtifact {
    pub contract_name: String,
    pub abi: Value,
    #[serde(default)]
    pub bytecode: String,
    #[serde(default)]
    pub deployed_bytecode: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// A named deployment: an address plus the artifact describing it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentRecord {
    pub address: Address,
    #[serde(flatten)]
    pub artifact: ExtendedArtifact,
}

/// Persistence for named deployments
pub trait DeploymentStore {
    fn get(&self, name: &str) -> Result<DeploymentRecord>;

    /// Stores `record` under `name`, replacing any previous record.
    fn save(&self, name: &str, record: &DeploymentRecord) -> Result<()>;

    fn get_extended_artifact(&self, name: &str) -> Result<ExtendedArtifact>;
}

/// Forge output artifact (`out/<Name>.sol/<Name>.json`)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ForgeArtifact {
    abi: Value,
    #[serde(default)]
    bytecode: Option<ForgeBytecode>,
    #[serde(default)]
    deployed_bytecode: Option<ForgeBytecode>,
    #[serde(default)]
    metadata: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ForgeBytecode {
    object: String,
}

impl ForgeArtifact {
    fn into_extended(self, contract_name: &str) -> ExtendedArtifact {
        ExtendedArtifact {
            contract_name: contract_name.to_string(),
            abi: self.abi,
            bytecode: self.bytecode.map(|b| b.object).unwrap_or_default(),
            deployed_bytecode: self.deployed_bytecode.map(|b| b.object).unwrap_or_default(),
            metadata: self.metadata,
        }
    }
}

/// Filesystem deployment store
///
/// # Example
///
/// ```rust,no_run
/// use lz_oft_ops::{DeploymentStore, DeploymentsDir};
///
/// # fn example() -> lz_oft_ops::Result<()> {
/// let store = DeploymentsDir::new("deployments", "arbitrum-sepolia", "out")
///     .with_chain_id(421614);
/// let debt_token = store.get("DebtTokenWithLz")?;
/// println!("{}", debt_token.address);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DeploymentsDir {
    deployments_root: PathBuf,
    network: String,
    artifacts_root: PathBuf,
    chain_id: Option<u64>,
}

impl DeploymentsDir {
    pub fn new(
        deployments_root: impl Into<PathBuf>,
        network: impl Into<String>,
        artifacts_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            deployments_root: deployments_root.into(),
            network: network.into(),
            artifacts_root: artifacts_root.into(),
            chain_id: None,
        }
    }

    /// Writes a `.chainId` marker next to saved records
    pub fn with_chain_id(mut self, chain_id: u64) -> Self {
        self.chain_id = Some(chain_id);
        self
    }

    pub fn network_dir(&self) -> PathBuf {
        self.deployments_root.join(&self.network)
    }

    pub fn record_path(&self, name: &str) -> PathBuf {
        self.network_dir().join(format!("{name}.json"))
    }

    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.artifacts_root
            .join(format!("{name}.sol"))
            .join(format!("{name}.json"))
    }
}

fn read_if_exists(path: &Path) -> Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl DeploymentStore for DeploymentsDir {
    fn get(&self, name: &str) -> Result<DeploymentRecord> {
        let path = self.record_path(name);
        let content = read_if_exists(&path)?.ok_or_else(|| OftError::DeploymentNotFound {
            name: name.to_string(),
        })?;
        Ok(serde_json::from_str(&content)?)
    }

    #[instrument(skip(self, record), fields(network = %self.network, address = %record.address))]
    fn save(&self, name: &str, record: &DeploymentRecord) -> Result<()> {
        let dir = self.network_dir();
        std::fs::create_dir_all(&dir)?;
        if let Some(chain_id) = self.chain_id {
            std::fs::write(dir.join(".chainId"), chain_id.to_string())?;
        }

        let path = self.record_path(name);
        std::fs::write(&path, serde_json::to_string_pretty(record)?)?;
        info!(path = %path.display(), event = "deployment_saved");
        Ok(())
    }

    fn get_extended_artifact(&self, name: &str) -> Result<ExtendedArtifact> {
        let path = self.artifact_path(name);
        let content = read_if_exists(&path)?.ok_or_else(|| OftError::ArtifactNotFound {
            name: name.to_string(),
        })?;
        let artifact: ForgeArtifact = serde_json::from_str(&content)?;
        debug!(path = %path.display(), event = "artifact_loaded");
        Ok(artifact.into_extended(name))
    }
}

/// In-memory deployment store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<HashMap<String, DeploymentRecord>>>,
    artifacts: Arc<Mutex<HashMap<String, ExtendedArtifact>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_artifact(&self, artifact: ExtendedArtifact) {
        self.lock_artifacts()
            .insert(artifact.contract_name.clone(), artifact);
    }

    pub fn len(&self) -> usize {
        self.lock_records().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock_records(&self) -> std::sync::MutexGuard<'_, HashMap<String, DeploymentRecord>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_artifacts(&self) -> std::sync::MutexGuard<'_, HashMap<String, ExtendedArtifact>> {
        self.artifacts.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl DeploymentStore for MemoryStore {
    fn get(&self, name: &str) -> Result<DeploymentRecord> {
        self.lock_records()
            .get(name)
            .cloned()
            .ok_or_else(|| OftError::DeploymentNotFound {
                name: name.to_string(),
            })
    }

    fn save(&self, name: &str, record: &DeploymentRecord) -> Result<()> {
        self.lock_records().insert(name.to_string(), record.clone());
        Ok(())
    }

    fn get_extended_artifact(&self, name: &str) -> Result<ExtendedArtifact> {
        self.lock_artifacts()
            .get(name)
            .cloned()
            .ok_or_else(|| OftError::ArtifactNotFound {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;
    use serde_json::json;

    fn artifact(name: &str) -> ExtendedArtifact {
        ExtendedArtifact {
            contract_name: name.to_string(),
            abi: json!([{"type": "function", "name": "decimals", "inputs": [], "outputs": []}]),
            bytecode: "0x6080".to_string(),
            deployed_bytecode: "0x6080".to_string(),
            metadata: None,
        }
    }

    #[test]
    fn test_record_flattens_artifact() {
        let record = DeploymentRecord {
            address: address!("85576DEa799eC912AAf05566922EaC75fC97Bd79"),
            artifact: artifact("DebtTokenWithLz"),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["contractName"], "DebtTokenWithLz");
        assert!(value["abi"].is_array());
        assert!(value.get("artifact").is_none());
        assert!(value.get("metadata").is_none());

        let back: DeploymentRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_memory_store_last_write_wins() {
        let store = MemoryStore::new();
        let first = DeploymentRecord {
            address: address!("0000000000000000000000000000000000000001"),
            artifact: artifact("DebtTokenWithLz"),
        };
        let second = DeploymentRecord {
            address: address!("0000000000000000000000000000000000000002"),
            ..first.clone()
        };

        store.save("DebtTokenWithLz", &first).unwrap();
        store.save("DebtTokenWithLz", &second).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("DebtTokenWithLz").unwrap().address, second.address);
    }

    #[test]
    fn test_memory_store_missing() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.get("EndpointV2").unwrap_err(),
            OftError::DeploymentNotFound { .. }
        ));
        assert!(matches!(
            store.get_extended_artifact("EndpointV2").unwrap_err(),
            OftError::ArtifactNotFound { .. }
        ));
    }

    #[test]
    fn test_forge_artifact_conversion() {
        let forge: ForgeArtifact = serde_json::from_value(json!({
            "abi": [],
            "bytecode": {"object": "0x6001", "linkReferences": {}},
            "deployedBytecode": {"object": "0x6002"},
            "methodIdentifiers": {}
        }))
        .unwrap();
        let extended = forge.into_extended("DebtToken");
        assert_eq!(extended.contract_name, "DebtToken");
        assert_eq!(extended.bytecode, "0x6001");
        assert_eq!(extended.deployed_bytecode, "0x6002");
    }

    #[test]
    fn test_deployments_dir_paths() {
        let store = DeploymentsDir::new("deployments", "base-sepolia", "out");
        assert_eq!(
            store.record_path("DebtTokenWithLz"),
            PathBuf::from("deployments/base-sepolia/DebtTokenWithLz.json")
        );
        assert_eq!(
            store.artifact_path("DebtTokenWithLz"),
            PathBuf::from("out/DebtTokenWithLz.sol/DebtTokenWithLz.json")
        );
    }
}
