// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0
//! Post-deployment bookkeeping
//!
//! Contracts are deployed by forge scripts. This module reads the resulting
//! broadcast records and registers the upgradeable proxy under a logical name
//! so later tooling can look it up with its implementation's ABI.

mod broadcast;
mod registrar;

pub use broadcast::{
    BroadcastLocator, BroadcastRecord, BroadcastTransaction, RunSelector, TransactionKind,
};
pub use registrar::{
    DeploymentRecord, DeploymentStore, DeploymentsDir, ExtendedArtifact, MemoryStore,
};

use bon::Builder;
use tracing::info;

use crate::error::Result;
use crate::spans;

/// Proxy contract emitted by the deploy script for every upgradeable token
pub const DEFAULT_PROXY_CONTRACT: &str = "ERC1967Proxy";

/// Forge script that deploys the token stack
pub const DEFAULT_DEPLOY_SCRIPT: &str = "Deploy";

/// Inputs for [`register_proxy`]
#[derive(Builder, Debug, Clone)]
pub struct ProxyRegistration {
    /// Contract name of the implementation as it appears in the broadcast
    #[builder(into)]
    implementation: String,
    /// Name to save the deployment under; defaults to the implementation name
    #[builder(into)]
    deployment_name: Option<String>,
    #[builder(into, default = DEFAULT_PROXY_CONTRACT.to_string())]
    proxy_contract: String,
    #[builder(into, default = DEFAULT_DEPLOY_SCRIPT.to_string())]
    script: String,
    chain_id: u64,
    #[builder(default)]
    run: RunSelector,
}

impl ProxyRegistration {
    pub fn implementation(&self) -> &str {
        &self.implementation
    }

    pub fn deployment_name(&self) -> &str {
        self.deployment_name
            .as_deref()
            .unwrap_or(&self.implementation)
    }

    pub fn proxy_contract(&self) -> &str {
        &self.proxy_contract
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn run(&self) -> RunSelector {
        self.run
    }
}

/// Registers the proxy fronting `implementation` under its logical name.
///
/// Loads the implementation's extended artifact, finds the implementation's
/// `CREATE` in the broadcast record, finds the proxy created with that
/// implementation as first constructor argument, and saves
/// `{address: proxy, ..artifact}`.
pub fn register_proxy<S: DeploymentStore + ?Sized>(
    locator: &BroadcastLocator,
    store: &S,
    registration: &ProxyRegistration,
) -> Result<DeploymentRecord> {
    let span = spans::register_proxy(registration.deployment_name(), registration.chain_id());
    let _guard = span.enter();

    let artifact = store.get_extended_artifact(registration.implementation())?;
    let record = locator.load(
        registration.script(),
        registration.chain_id(),
        registration.run(),
    )?;

    let implementation = record.contract_address(registration.implementation())?;
    info!(
        implementation_name = registration.implementation(),
        implementation = %implementation,
        event = "implementation_resolved"
    );

    let proxy = record.proxy_address(registration.proxy_contract(), implementation)?;

    let deployment = DeploymentRecord {
        address: proxy,
        artifact,
    };
    store.save(registration.deployment_name(), &deployment)?;

    info!(
        deployment_name = registration.deployment_name(),
        proxy = %proxy,
        implementation = %implementation,
        event = "proxy_registered"
    );
    Ok(deployment)
}
