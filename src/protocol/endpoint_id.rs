// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! LayerZero v2 endpoint identifiers
//!
//! The messaging protocol addresses every network by an endpoint ID (EID)
//! that is unrelated to the EVM chain ID. Mainnet EIDs live in the `30xxx`
//! range and testnet EIDs in the `40xxx` range.
//!
//! Reference: <https://docs.layerzero.network/v2/deployments/deployed-contracts>

use std::fmt;
use std::str::FromStr;

use alloy_chains::NamedChain;

/// LayerZero v2 endpoint identifier for the networks this tooling deploys to
///
/// # Example
///
/// ```rust
/// use lz_oft_ops::EndpointId;
///
/// let eid = EndpointId::ArbitrumSepolia;
/// let value: u32 = eid.into();
/// assert_eq!(value, 40231);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
#[non_exhaustive]
pub enum EndpointId {
    /// Ethereum mainnet (EID: 30101)
    Ethereum = 30101,
    /// Arbitrum One (EID: 30110)
    Arbitrum = 30110,
    /// OP Mainnet (EID: 30111)
    Optimism = 30111,
    /// CoreDAO mainnet (EID: 30153)
    CoreDao = 30153,
    /// Base mainnet (EID: 30184)
    Base = 30184,
    /// CoreDAO testnet (EID: 40153)
    CoreDaoTestnet = 40153,
    /// Base Goerli, retired (EID: 40160)
    BaseGoerli = 40160,
    /// Ethereum Sepolia (EID: 40161)
    Sepolia = 40161,
    /// Ethereum Holesky (EID: 40217)
    Holesky = 40217,
    /// Arbitrum Sepolia (EID: 40231)
    ArbitrumSepolia = 40231,
    /// Optimism Sepolia (EID: 40232)
    OptimismSepolia = 40232,
    /// Base Sepolia (EID: 40245)
    BaseSepolia = 40245,
}

impl EndpointId {
    /// Every endpoint known to this crate, in ascending EID order
    pub const ALL: [EndpointId; 12] = [
        Self::Ethereum,
        Self::Arbitrum,
        Self::Optimism,
        Self::CoreDao,
        Self::Base,
        Self::CoreDaoTestnet,
        Self::BaseGoerli,
        Self::Sepolia,
        Self::Holesky,
        Self::ArbitrumSepolia,
        Self::OptimismSepolia,
        Self::BaseSepolia,
    ];

    /// Returns the numeric endpoint ID
    #[inline]
    pub const fn as_u32(self) -> u32 {
        self as u32
    }

    /// Attempts to create an EndpointId from a u32 value
    ///
    /// ```rust
    /// use lz_oft_ops::EndpointId;
    ///
    /// assert_eq!(EndpointId::from_u32(40245), Some(EndpointId::BaseSepolia));
    /// assert_eq!(EndpointId::from_u32(1), None);
    /// ```
    #[inline]
    pub const fn from_u32(value: u32) -> Option<Self> {
        match value {
            30101 => Some(Self::Ethereum),
            30110 => Some(Self::Arbitrum),
            30111 => Some(Self::Optimism),
            30153 => Some(Self::CoreDao),
            30184 => Some(Self::Base),
            40153 => Some(Self::CoreDaoTestnet),
            40160 => Some(Self::BaseGoerli),
            40161 => Some(Self::Sepolia),
            40217 => Some(Self::Holesky),
            40231 => Some(Self::ArbitrumSepolia),
            40232 => Some(Self::OptimismSepolia),
            40245 => Some(Self::BaseSepolia),
            _ => None,
        }
    }

    /// Human readable network name
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Ethereum => "Ethereum",
            Self::Arbitrum => "Arbitrum",
            Self::Optimism => "Optimism",
            Self::CoreDao => "CoreDAO",
            Self::Base => "Base",
            Self::CoreDaoTestnet => "CoreDAO Testnet",
            Self::BaseGoerli => "Base Goerli",
            Self::Sepolia => "Sepolia",
            Self::Holesky => "Holesky",
            Self::ArbitrumSepolia => "Arbitrum Sepolia",
            Self::OptimismSepolia => "Optimism Sepolia",
            Self::BaseSepolia => "Base Sepolia",
        }
    }

    /// Kebab-case identifier accepted on the command line
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Arbitrum => "arbitrum",
            Self::Optimism => "optimism",
            Self::CoreDao => "coredao",
            Self::Base => "base",
            Self::CoreDaoTestnet => "coredao-testnet",
            Self::BaseGoerli => "base-goerli",
            Self::Sepolia => "sepolia",
            Self::Holesky => "holesky",
            Self::ArbitrumSepolia => "arbitrum-sepolia",
            Self::OptimismSepolia => "optimism-sepolia",
            Self::BaseSepolia => "base-sepolia",
        }
    }

    /// Upper snake-case key used to look up per-network environment variables
    ///
    /// ```rust
    /// use lz_oft_ops::EndpointId;
    ///
    /// assert_eq!(EndpointId::ArbitrumSepolia.env_key(), "ARBITRUM_SEPOLIA");
    /// ```
    pub fn env_key(self) -> String {
        self.slug().replace('-', "_").to_ascii_uppercase()
    }

    /// The EVM chain this endpoint lives on, when alloy knows it
    pub const fn named_chain(self) -> Option<NamedChain> {
        match self {
            Self::Ethereum => Some(NamedChain::Mainnet),
            Self::Arbitrum => Some(NamedChain::Arbitrum),
            Self::Optimism => Some(NamedChain::Optimism),
            Self::Base => Some(NamedChain::Base),
            Self::BaseGoerli => Some(NamedChain::BaseGoerli),
            Self::Sepolia => Some(NamedChain::Sepolia),
            Self::Holesky => Some(NamedChain::Holesky),
            Self::ArbitrumSepolia => Some(NamedChain::ArbitrumSepolia),
            Self::OptimismSepolia => Some(NamedChain::OptimismSepolia),
            Self::BaseSepolia => Some(NamedChain::BaseSepolia),
            Self::CoreDao | Self::CoreDaoTestnet => None,
        }
    }

    /// Returns true for endpoints in the testnet EID range
    #[inline]
    pub const fn is_testnet(self) -> bool {
        self.as_u32() >= 40000
    }
}

impl From<EndpointId> for u32 {
    #[inline]
    fn from(eid: EndpointId) -> Self {
        eid.as_u32()
    }
}

impl TryFrom<u32> for EndpointId {
    type Error = InvalidEndpointId;

    #[inline]
    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::from_u32(value).ok_or(InvalidEndpointId(value))
    }
}

impl FromStr for EndpointId {
    type Err = UnknownEndpoint;

    /// Parses either a kebab-case slug (`arbitrum-sepolia`) or a numeric EID.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase().replace('_', "-");
        if let Ok(value) = needle.parse::<u32>() {
            return Self::from_u32(value).ok_or_else(|| UnknownEndpoint(s.to_string()));
        }
        Self::ALL
            .into_iter()
            .find(|eid| eid.slug() == needle)
            .ok_or_else(|| UnknownEndpoint(s.to_string()))
    }
}

impl fmt::Display for EndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.as_u32())
    }
}

impl serde::Serialize for EndpointId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.as_u32())
    }
}

impl<'de> serde::Deserialize<'de> for EndpointId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = u32::deserialize(deserializer)?;
        Self::try_from(value).map_err(serde::de::Error::custom)
    }
}

/// Error returned when a u32 is not a known endpoint ID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidEndpointId(pub u32);

impl fmt::Display for InvalidEndpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid LayerZero endpoint ID: {}", self.0)
    }
}

impl std::error::Error for InvalidEndpointId {}

/// Error returned when a network name does not match any endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEndpoint(pub String);

impl fmt::Display for UnknownEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown LayerZero endpoint: {}", self.0)
    }
}

impl std::error::Error for UnknownEndpoint {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(EndpointId::Sepolia, 40161)]
    #[case(EndpointId::Holesky, 40217)]
    #[case(EndpointId::ArbitrumSepolia, 40231)]
    #[case(EndpointId::OptimismSepolia, 40232)]
    #[case(EndpointId::BaseSepolia, 40245)]
    #[case(EndpointId::Ethereum, 30101)]
    fn test_endpoint_values(#[case] eid: EndpointId, #[case] expected: u32) {
        assert_eq!(eid.as_u32(), expected);
        assert_eq!(EndpointId::from_u32(expected), Some(eid));
    }

    #[test]
    fn test_from_u32_invalid() {
        assert_eq!(EndpointId::from_u32(0), None);
        assert_eq!(EndpointId::from_u32(40000), None);
        assert_eq!(
            EndpointId::try_from(12345).unwrap_err(),
            InvalidEndpointId(12345)
        );
    }

    #[test]
    fn test_all_is_complete() {
        for eid in EndpointId::ALL {
            assert_eq!(EndpointId::from_u32(eid.as_u32()), Some(eid));
            assert_eq!(eid.slug().parse::<EndpointId>().unwrap(), eid);
        }
    }

    #[rstest]
    #[case("arbitrum-sepolia", EndpointId::ArbitrumSepolia)]
    #[case("BASE_SEPOLIA", EndpointId::BaseSepolia)]
    #[case("40232", EndpointId::OptimismSepolia)]
    #[case(" holesky ", EndpointId::Holesky)]
    fn test_from_str(#[case] input: &str, #[case] expected: EndpointId) {
        assert_eq!(input.parse::<EndpointId>().unwrap(), expected);
    }

    #[test]
    fn test_from_str_unknown() {
        assert!("solana".parse::<EndpointId>().is_err());
        assert!("99999".parse::<EndpointId>().is_err());
    }

    #[test]
    fn test_display_and_env_key() {
        assert_eq!(
            EndpointId::ArbitrumSepolia.to_string(),
            "Arbitrum Sepolia (40231)"
        );
        assert_eq!(EndpointId::CoreDaoTestnet.env_key(), "COREDAO_TESTNET");
    }

    #[test]
    fn test_testnet_split() {
        assert!(EndpointId::BaseSepolia.is_testnet());
        assert!(!EndpointId::Base.is_testnet());
        assert_eq!(
            EndpointId::ArbitrumSepolia.named_chain(),
            Some(NamedChain::ArbitrumSepolia)
        );
        assert_eq!(EndpointId::CoreDaoTestnet.named_chain(), None);
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&EndpointId::BaseSepolia).unwrap();
        assert_eq!(json, "40245");
        let parsed: EndpointId = serde_json::from_str("40231").unwrap();
        assert_eq!(parsed, EndpointId::ArbitrumSepolia);
        assert!(serde_json::from_str::<EndpointId>("7").is_err());
    }
}
