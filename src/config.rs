//! Signer and RPC settings for a transfer
//!
//! Values come from the environment (after `.env` is loaded by the binary):
//!
//! - `DEPLOYMENT_PRIVATE_KEY`: signs on the source chain
//! - `DEPLOYMENT_PRIVATE_KEY_2`: account on the destination chain, defaults to
//!   the source key
//! - `RPC_URL_<ENDPOINT>`: one per chain, e.g. `RPC_URL_BASE_SEPOLIA`
//!
//! Settings are built once and handed to the task; nothing is read from the
//! environment after that.

use alloy_primitives::Address;
use alloy_signer_local::PrivateKeySigner;
use std::fmt;
use url::Url;

use crate::error::{OftError, Result};
use crate::EndpointId;

pub const SOURCE_KEY_VAR: &str = "DEPLOYMENT_PRIVATE_KEY";
pub const DESTINATION_KEY_VAR: &str = "DEPLOYMENT_PRIVATE_KEY_2";

/// Name of the RPC URL variable for `eid`
pub fn rpc_url_var(eid: EndpointId) -> String {
    format!("RPC_URL_{}", eid.env_key())
}

/// Connection settings for one side of a transfer
#[derive(Clone)]
pub struct ChainSettings {
    pub eid: EndpointId,
    pub rpc_url: Url,
    pub signer: PrivateKeySigner,
}

impl ChainSettings {
    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

impl fmt::Debug for ChainSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainSettings")
            .field("eid", &self.eid)
            .field("rpc_url", &self.rpc_url.as_str())
            .field("address", &self.address())
            .finish()
    }
}

/// Source and destination settings for one transfer
#[derive(Debug, Clone)]
pub struct Settings {
    pub source: ChainSettings,
    pub destination: ChainSettings,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env(source: EndpointId, destination: EndpointId) -> Result<Self> {
        Self::from_lookup(source, destination, |key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which returns `None` for unset keys.
    pub fn from_lookup<F>(source: EndpointId, destination: EndpointId, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let source_key = require(&lookup, SOURCE_KEY_VAR)?;
        let destination_key = lookup(DESTINATION_KEY_VAR)
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| source_key.clone());

        Ok(Self {
            source: ChainSettings {
                eid: source,
                rpc_url: rpc_url(&lookup, source)?,
                signer: parse_signer(SOURCE_KEY_VAR, &source_key)?,
            },
            destination: ChainSettings {
                eid: destination,
                rpc_url: rpc_url(&lookup, destination)?,
                signer: parse_signer(DESTINATION_KEY_VAR, &destination_key)?,
            },
        })
    }
}

fn require<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| OftError::InvalidConfig(format!("{key} is not set")))
}

fn rpc_url<F>(lookup: &F, eid: EndpointId) -> Result<Url>
where
    F: Fn(&str) -> Option<String>,
{
    let key = rpc_url_var(eid);
    let raw = require(lookup, &key)?;
    Url::parse(raw.trim())
        .map_err(|e| OftError::InvalidConfig(format!("{key} is not a valid URL: {e}")))
}

fn parse_signer(key: &str, value: &str) -> Result<PrivateKeySigner> {
    value
        .trim()
        .parse::<PrivateKeySigner>()
        .map_err(|e| OftError::InvalidConfig(format!("{key} is not a valid private key: {e}")))
}
