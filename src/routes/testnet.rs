// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! DebtToken testnet deployments and routing
//!
//! Message library, executor and DVN addresses follow LayerZero's default
//! testnet configuration:
//! <https://docs.layerzero.network/v2/developers/evm/protocol-gas-settings/default-config>

use alloy_primitives::{address, Address};

use super::{
    Connection, ConnectionConfig, ContractNode, ExecutorConfig, OAppGraph, OmniPoint, ReceiveConfig,
    ReceiveLibraryConfig, SendConfig, UlnConfig,
};
use crate::EndpointId;

/// Contract name of the token on every endpoint
pub const CONTRACT_NAME: &str = "DebtToken";

/// Max message size enforced by the default executors
pub const MAX_MESSAGE_SIZE: u32 = 10_000;

// Token deployments

pub const ARBITRUM_SEPOLIA_DEBT_TOKEN: Address =
    address!("85576DEa799eC912AAf05566922EaC75fC97Bd79");

pub const BASE_SEPOLIA_DEBT_TOKEN: Address =
    address!("BeD1808E6Dec5aDee59B1671Da8CFa81a9A1F2D3");

pub const OPTIMISM_SEPOLIA_DEBT_TOKEN: Address =
    address!("512F0966853cE4f7F64094E42426a0deB16085Fb");

pub const HOLESKY_DEBT_TOKEN: Address = address!("4716c7b4fb7d8eD75B4D8904209b213308de837f");

pub const SEPOLIA_DEBT_TOKEN: Address = address!("45186cf2F66f43cf0a777a753b4ABBcD812204E6");

// Base Sepolia messaging stack

pub const BASE_SEPOLIA_SEND_LIBRARY: Address =
    address!("C1868e054425D378095A003EcbA3823a5D0135C9");

pub const BASE_SEPOLIA_RECEIVE_LIBRARY: Address =
    address!("12523de19dc41c91F7d2093E0CFbB76b17012C8d");

pub const BASE_SEPOLIA_EXECUTOR: Address = address!("8A3D588D9f6AC041476b094f97FF94ec30169d3D");

pub const BASE_SEPOLIA_DVN: Address = address!("e1a12515f9ab2764b887bf60b923ca494ebbb2d6");

// Arbitrum Sepolia messaging stack

pub const ARBITRUM_SEPOLIA_SEND_LIBRARY: Address =
    address!("4f7cd4DA19ABB31b0eC98b9066B9e857B1bf9C0E");

pub const ARBITRUM_SEPOLIA_RECEIVE_LIBRARY: Address =
    address!("75Db67CDab2824970131D5aa9CECfC9F69c69636");

pub const ARBITRUM_SEPOLIA_EXECUTOR: Address =
    address!("5Df3a1cEbBD9c8BA7F8dF51Fd632A9aef8308897");

pub const ARBITRUM_SEPOLIA_DVN: Address = address!("53f488E93b4f1b60E8E83aa374dBe1780A1EE8a8");

pub fn arbitrum_sepolia() -> OmniPoint {
    OmniPoint::new(
        EndpointId::ArbitrumSepolia,
        CONTRACT_NAME,
        Some(ARBITRUM_SEPOLIA_DEBT_TOKEN),
    )
}

pub fn base_sepolia() -> OmniPoint {
    OmniPoint::new(
        EndpointId::BaseSepolia,
        CONTRACT_NAME,
        Some(BASE_SEPOLIA_DEBT_TOKEN),
    )
}

pub fn optimism_sepolia() -> OmniPoint {
    OmniPoint::new(
        EndpointId::OptimismSepolia,
        CONTRACT_NAME,
        Some(OPTIMISM_SEPOLIA_DEBT_TOKEN),
    )
}

pub fn holesky() -> OmniPoint {
    OmniPoint::new(EndpointId::Holesky, CONTRACT_NAME, Some(HOLESKY_DEBT_TOKEN))
}

pub fn sepolia() -> OmniPoint {
    OmniPoint::new(EndpointId::Sepolia, CONTRACT_NAME, Some(SEPOLIA_DEBT_TOKEN))
}

/// Every testnet deployment of the token, wired or not
pub fn known_points() -> Vec<OmniPoint> {
    vec![
        arbitrum_sepolia(),
        base_sepolia(),
        optimism_sepolia(),
        holesky(),
        sepolia(),
    ]
}

fn uln(confirmations: u64, dvn: Address) -> UlnConfig {
    UlnConfig {
        confirmations,
        required_dvns: vec![dvn],
        optional_dvns: vec![],
        optional_dvn_threshold: 0,
    }
}

fn link(
    send_library: Address,
    receive_library: Address,
    executor: Address,
    dvn: Address,
) -> ConnectionConfig {
    ConnectionConfig {
        send_library,
        receive_library_config: ReceiveLibraryConfig {
            receive_library,
            grace_period: 0,
        },
        send_config: SendConfig {
            executor_config: ExecutorConfig {
                max_message_size: MAX_MESSAGE_SIZE,
                executor,
            },
            uln_config: uln(2, dvn),
        },
        receive_config: ReceiveConfig {
            uln_config: uln(1, dvn),
        },
    }
}

/// The live testnet routing table: Base Sepolia <-> Arbitrum Sepolia
pub fn debt_token_graph() -> OAppGraph {
    OAppGraph {
        contracts: vec![
            ContractNode {
                contract: base_sepolia(),
            },
            ContractNode {
                contract: arbitrum_sepolia(),
            },
        ],
        connections: vec![
            Connection {
                from: base_sepolia(),
                to: arbitrum_sepolia(),
                config: Some(link(
                    BASE_SEPOLIA_SEND_LIBRARY,
                    BASE_SEPOLIA_RECEIVE_LIBRARY,
                    BASE_SEPOLIA_EXECUTOR,
                    BASE_SEPOLIA_DVN,
                )),
            },
            Connection {
                from: arbitrum_sepolia(),
                to: base_sepolia(),
                config: Some(link(
                    ARBITRUM_SEPOLIA_SEND_LIBRARY,
                    ARBITRUM_SEPOLIA_RECEIVE_LIBRARY,
                    ARBITRUM_SEPOLIA_EXECUTOR,
                    ARBITRUM_SEPOLIA_DVN,
                )),
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_graph_is_valid() {
        debt_token_graph().validate().unwrap();
    }

    #[test]
    fn test_links_are_directional() {
        let graph = debt_token_graph();
        let forward = graph
            .connection(EndpointId::BaseSepolia, EndpointId::ArbitrumSepolia)
            .unwrap();
        let backward = graph
            .connection(EndpointId::ArbitrumSepolia, EndpointId::BaseSepolia)
            .unwrap();
        assert_ne!(forward.config, backward.config);
    }

    #[test]
    fn test_route_summary() {
        let summary = debt_token_graph()
            .connections
            .iter()
            .map(|c| {
                let config = c.config.as_ref().unwrap();
                format!(
                    "{} -> {}: send confirmations {}, receive confirmations {}, {} required DVN",
                    c.from.eid,
                    c.to.eid,
                    config.send_config.uln_config.confirmations,
                    config.receive_config.uln_config.confirmations,
                    config.send_config.uln_config.required_dvns.len(),
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        insta::assert_snapshot!(summary, @r"
        Base Sepolia (40245) -> Arbitrum Sepolia (40231): send confirmations 2, receive confirmations 1, 1 required DVN
        Arbitrum Sepolia (40231) -> Base Sepolia (40245): send confirmations 2, receive confirmations 1, 1 required DVN
        ");
    }

    #[test]
    fn test_known_points_have_addresses() {
        for point in known_points() {
            assert!(point.deployed_address().is_ok());
            assert_eq!(point.contract_name, CONTRACT_NAME);
        }
    }

    #[test]
    fn test_json_round_trip_through_export() {
        let graph = debt_token_graph();
        let json = graph.to_json_pretty().unwrap();
        assert!(json.contains("\"requiredDVNs\""));
        assert!(json.contains("\"eid\": 40245"));
        assert_eq!(OAppGraph::from_json(&json).unwrap(), graph);
    }
}
