//! # lz-oft-ops
//!
//! Operational tooling for an upgradeable token bridged with LayerZero's
//! omnichain fungible token (OFT) standard.
//!
//! The crate covers the glue around already-deployed contracts:
//!
//! - resolving deployed addresses from forge broadcast records
//! - registering the upgradeable proxy under a logical deployment name
//! - the OApp routing table consumed by LayerZero's configuration tooling
//! - sending tokens across chains and waiting until they arrive
//!
//! ## Resolving and registering a deployment
//!
//! ```rust,no_run
//! use lz_oft_ops::{register_proxy, BroadcastLocator, DeploymentsDir, ProxyRegistration};
//!
//! # fn example() -> lz_oft_ops::Result<()> {
//! let locator = BroadcastLocator::new("broadcast");
//! let store = DeploymentsDir::new("deployments", "arbitrum-sepolia", "out").with_chain_id(421614);
//!
//! let registration = ProxyRegistration::builder()
//!     .implementation("DebtTokenWithLz")
//!     .deployment_name("DebtToken")
//!     .chain_id(421614)
//!     .build();
//!
//! let record = register_proxy(&locator, &store, &registration)?;
//! println!("DebtToken proxy at {}", record.address);
//! # Ok(())
//! # }
//! ```
//!
//! ## Sending tokens
//!
//! ```rust,no_run
//! use lz_oft_ops::providers::{AlloyOftEndpoint, TokioClock};
//! use lz_oft_ops::{routes::testnet, EndpointId, TransferIntent, TransferTask};
//! use alloy_provider::ProviderBuilder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let base = ProviderBuilder::new().connect("https://sepolia.base.org").await?;
//! let arb = ProviderBuilder::new().connect("https://sepolia-rollup.arbitrum.io/rpc").await?;
//! let me = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse()?;
//!
//! let task = TransferTask::builder()
//!     .source(AlloyOftEndpoint::new(base, testnet::BASE_SEPOLIA_DEBT_TOKEN, me))
//!     .destination(AlloyOftEndpoint::new(arb, testnet::ARBITRUM_SEPOLIA_DEBT_TOKEN, me))
//!     .clock(TokioClock::new())
//!     .intent(
//!         TransferIntent::builder()
//!             .source(EndpointId::BaseSepolia)
//!             .destination(EndpointId::ArbitrumSepolia)
//!             .recipient(me)
//!             .amount("10")
//!             .build(),
//!     )
//!     .build();
//!
//! let report = task.run().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Public API
//!
//! - [`EndpointId`] and [`ExecutorOptions`] - LayerZero endpoint identifiers and message options
//! - [`BroadcastLocator`], [`BroadcastRecord`] - forge broadcast records
//! - [`register_proxy`], [`DeploymentStore`], [`DeploymentsDir`] - deployment bookkeeping
//! - [`routes`] - the OApp routing table
//! - [`TransferTask`] - cross-chain send and destination confirmation
//! - [`OftError`] and [`Result`] - Error types for error handling

mod contracts;
mod deploy;
mod error;
mod protocol;
mod transfer;

pub mod config;
pub mod providers;
pub mod routes;
pub mod testing;
pub mod traits;

pub use contracts::oft::{MessagingFee, MessagingReceipt, OFTReceipt, OftContract, SendParam};
pub use deploy::{
    register_proxy, BroadcastLocator, BroadcastRecord, BroadcastTransaction, DeploymentRecord,
    DeploymentStore, DeploymentsDir, ExtendedArtifact, MemoryStore, ProxyRegistration, RunSelector,
    TransactionKind, DEFAULT_DEPLOY_SCRIPT, DEFAULT_PROXY_CONTRACT,
};
pub use error::{OftError, Result};
pub use protocol::{
    address_to_bytes32, EndpointId, ExecutorOptions, InvalidEndpointId, UnknownEndpoint,
    DEFAULT_LZ_RECEIVE_GAS, EXECUTOR_WORKER_ID, TYPE_3,
};
pub use transfer::{
    parse_amount, scan_url, ArrivalCheck, Cancellation, Delivery, PollingConfig, SendReceipt,
    Submission, SubmitFailurePolicy, TransferIntent, TransferReport, TransferTask, TxOverrides,
    DEFAULT_GAS_PRICE_MULTIPLIER, DEFAULT_MAX_ATTEMPTS, DEFAULT_POLL_INTERVAL_SECS,
};

// Public module for advanced users who need custom instrumentation
pub mod spans;
