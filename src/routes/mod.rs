//! LayerZero OApp routing tables
//!
//! A routing table lists the token contracts on every endpoint and the
//! directional links between them, each optionally pinned to specific message
//! libraries, executor and DVN sets. The JSON shape matches what the LayerZero
//! configuration tooling consumes (`contracts` / `connections`).

pub mod testnet;

use std::path::Path;

use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::error::{OftError, Result};
use crate::EndpointId;

/// A token contract on one endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OmniPoint {
    pub eid: EndpointId,
    pub contract_name: String,
    /// Unknown until the contract is deployed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

impl OmniPoint {
    pub fn new(
        eid: EndpointId,
        contract_name: impl Into<String>,
        address: Option<Address>,
    ) -> Self {
        Self {
            eid,
            contract_name: contract_name.into(),
            address,
        }
    }

    /// Deployed address, or an error naming the endpoint
    pub fn deployed_address(&self) -> Result<Address> {
        self.address.ok_or_else(|| {
            OftError::InvalidConfig(format!(
                "{} has no deployed address on {}",
                self.contract_name, self.eid
            ))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractNode {
    pub contract: OmniPoint,
}

/// Ultra light node verification settings for one direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UlnConfig {
    /// Block confirmations required on the source chain
    pub confirmations: u64,
    #[serde(rename = "requiredDVNs")]
    pub required_dvns: Vec<Address>,
    #[serde(rename = "optionalDVNs", default)]
    pub optional_dvns: Vec<Address>,
    #[serde(rename = "optionalDVNThreshold", default)]
    pub optional_dvn_threshold: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorConfig {
    pub max_message_size: u32,
    pub executor: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveLibraryConfig {
    pub receive_library: Address,
    #[serde(default)]
    pub grace_period: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendConfig {
    pub executor_config: ExecutorConfig,
    pub uln_config: UlnConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveConfig {
    pub uln_config: UlnConfig,
}

/// Transport parameters for one directional link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
    pub send_library: Address,
    pub receive_library_config: ReceiveLibraryConfig,
    pub send_config: SendConfig,
    pub receive_config: ReceiveConfig,
}

/// Directional link `from -> to`; the reverse direction is a separate entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from: OmniPoint,
    pub to: OmniPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<ConnectionConfig>,
}

/// The full routing table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OAppGraph {
    pub contracts: Vec<ContractNode>,
    pub connections: Vec<Connection>,
}

impl OAppGraph {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let graph = Self::from_json(&std::fs::read_to_string(path)?)?;
        graph.validate()?;
        Ok(graph)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Declared contract on `eid`
    pub fn point(&self, eid: EndpointId) -> Option<&OmniPoint> {
        self.contracts
            .iter()
            .map(|node| &node.contract)
            .find(|point| point.eid == eid)
    }

    pub fn connection(&self, from: EndpointId, to: EndpointId) -> Option<&Connection> {
        self.connections
            .iter()
            .find(|c| c.from.eid == from && c.to.eid == to)
    }

    fn declares(&self, point: &OmniPoint) -> bool {
        self.contracts.iter().any(|node| {
            node.contract.eid == point.eid && node.contract.contract_name == point.contract_name
        })
    }

    /// Checks that every link references declared contracts and that DVN
    /// thresholds are satisfiable. Graph connectivity is not checked.
    ///
    /// A link endpoint matches a declared contract on `eid` and
    /// `contract_name`; addresses are not compared.
    pub fn validate(&self) -> Result<()> {
        for connection in &self.connections {
            let (from, to) = (&connection.from, &connection.to);
            if from.eid == to.eid {
                return Err(invalid(format!("connection {} -> {} loops", from.eid, to.eid)));
            }
            for point in [from, to] {
                if !self.declares(point) {
                    return Err(invalid(format!(
                        "connection {} -> {} references undeclared contract {} on {}",
                        from.eid, to.eid, point.contract_name, point.eid
                    )));
                }
            }
            if let Some(config) = &connection.config {
                for (side, uln) in [
                    ("send", &config.send_config.uln_config),
                    ("receive", &config.receive_config.uln_config),
                ] {
                    if usize::from(uln.optional_dvn_threshold) > uln.optional_dvns.len() {
                        return Err(invalid(format!(
                            "connection {} -> {} {side} optional DVN threshold {} exceeds {} \
                             optional DVNs",
                            from.eid,
                            to.eid,
                            uln.optional_dvn_threshold,
                            uln.optional_dvns.len()
                        )));
                    }
                }
            }
        }

        debug!(
            contracts = self.contracts.len(),
            connections = self.connections.len(),
            event = "route_table_validated"
        );
        Ok(())
    }
}

fn invalid(reason: String) -> OftError {
    error!(reason = %reason, event = "route_table_invalid");
    OftError::InvalidRoute(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    fn point(eid: EndpointId) -> OmniPoint {
        OmniPoint::new(eid, "DebtToken", None)
    }

    fn uln(threshold: u8, optional: usize) -> UlnConfig {
        UlnConfig {
            confirmations: 1,
            required_dvns: vec![address!("e1a12515f9ab2764b887bf60b923ca494ebbb2d6")],
            optional_dvns: vec![Address::ZERO; optional],
            optional_dvn_threshold: threshold,
        }
    }

    fn config(send: UlnConfig) -> ConnectionConfig {
        ConnectionConfig {
            send_library: Address::ZERO,
            receive_library_config: ReceiveLibraryConfig {
                receive_library: Address::ZERO,
                grace_period: 0,
            },
            send_config: SendConfig {
                executor_config: ExecutorConfig {
                    max_message_size: 10_000,
                    executor: Address::ZERO,
                },
                uln_config: send,
            },
            receive_config: ReceiveConfig {
                uln_config: uln(0, 0),
            },
        }
    }

    fn graph(connections: Vec<Connection>) -> OAppGraph {
        OAppGraph {
            contracts: vec![
                ContractNode {
                    contract: point(EndpointId::BaseSepolia),
                },
                ContractNode {
                    contract: point(EndpointId::ArbitrumSepolia),
                },
            ],
            connections,
        }
    }

    #[test]
    fn test_valid_graph() {
        let g = graph(vec![Connection {
            from: point(EndpointId::BaseSepolia),
            to: point(EndpointId::ArbitrumSepolia),
            config: Some(config(uln(1, 2))),
        }]);
        assert!(g.validate().is_ok());
        assert!(g
            .connection(EndpointId::BaseSepolia, EndpointId::ArbitrumSepolia)
            .is_some());
        assert!(g
            .connection(EndpointId::ArbitrumSepolia, EndpointId::BaseSepolia)
            .is_none());
    }

    #[test]
    fn test_undeclared_endpoint_rejected() {
        let g = graph(vec![Connection {
            from: point(EndpointId::OptimismSepolia),
            to: point(EndpointId::ArbitrumSepolia),
            config: None,
        }]);
        let err = g.validate().unwrap_err();
        assert!(matches!(err, OftError::InvalidRoute(msg) if msg.contains("undeclared")));
    }

    #[test]
    fn test_mismatched_point_rejected() {
        let g = graph(vec![Connection {
            from: OmniPoint::new(EndpointId::BaseSepolia, "OtherToken", None),
            to: point(EndpointId::ArbitrumSepolia),
            config: None,
        }]);
        assert!(g.validate().is_err());
    }

    #[test]
    fn test_self_loop_rejected() {
        let g = graph(vec![Connection {
            from: point(EndpointId::BaseSepolia),
            to: point(EndpointId::BaseSepolia),
            config: None,
        }]);
        assert!(g.validate().is_err());
    }

    #[test]
    fn test_optional_threshold_rejected() {
        let g = graph(vec![Connection {
            from: point(EndpointId::BaseSepolia),
            to: point(EndpointId::ArbitrumSepolia),
            config: Some(config(uln(2, 1))),
        }]);
        assert!(g.validate().is_err());
    }

    #[test]
    fn test_link_point_without_address_matches_deployed_contract() {
        let mut g = graph(vec![Connection {
            from: point(EndpointId::BaseSepolia),
            to: point(EndpointId::ArbitrumSepolia),
            config: None,
        }]);
        g.contracts[0].contract.address =
            Some(address!("bed1808e6dec5adee59b1671da8cfa81a9a1f2d3"));
        assert!(g.validate().is_ok());
    }

    #[test]
    fn test_same_endpoint_declared_twice_is_accepted() {
        let mut g = graph(vec![]);
        g.contracts.push(ContractNode {
            contract: point(EndpointId::BaseSepolia),
        });
        assert!(g.validate().is_ok());
    }

    #[test]
    fn test_uln_field_names() {
        let value = serde_json::to_value(uln(0, 0)).unwrap();
        assert!(value.get("requiredDVNs").is_some());
        assert!(value.get("optionalDVNs").is_some());
        assert!(value.get("optionalDVNThreshold").is_some());
    }

    #[test]
    fn test_deployed_address() {
        assert!(point(EndpointId::Holesky).deployed_address().is_err());
    }
}
