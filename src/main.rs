use std::path::PathBuf;

use alloy_network::EthereumWallet;
use alloy_primitives::Address;
use alloy_provider::{Provider, ProviderBuilder};
use clap::{Args, Parser, Subcommand};
use lz_oft_ops::config::Settings;
use lz_oft_ops::providers::{AlloyOftEndpoint, TokioClock};
use lz_oft_ops::routes::{testnet, OAppGraph, OmniPoint};
use lz_oft_ops::{
    register_proxy, ArrivalCheck, BroadcastLocator, Cancellation, DeploymentsDir, EndpointId,
    ExecutorOptions, OftError, PollingConfig, ProxyRegistration, Submission, SubmitFailurePolicy,
    TransactionKind, TransferIntent, TransferTask, DEFAULT_DEPLOY_SCRIPT,
    DEFAULT_GAS_PRICE_MULTIPLIER, DEFAULT_LZ_RECEIVE_GAS, DEFAULT_POLL_INTERVAL_SECS,
    DEFAULT_PROXY_CONTRACT,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "lz-oft", version)]
#[command(about = "Deployment bookkeeping and cross-chain transfers for LayerZero OFTs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the address a forge broadcast assigns to a contract
    Resolve(ResolveArgs),
    /// Save the proxy of an implementation as a named deployment
    Register(RegisterArgs),
    /// Export or validate the OApp routing table
    Routes {
        #[command(subcommand)]
        action: RoutesAction,
    },
    /// Send tokens to another chain and wait for them to arrive
    Send(SendArgs),
}

#[derive(Args)]
struct BroadcastArgs {
    /// Forge broadcast directory
    #[arg(long, default_value = "broadcast")]
    broadcast_dir: PathBuf,
    /// Deploy script name, with or without `.s.sol`
    #[arg(long, default_value = DEFAULT_DEPLOY_SCRIPT)]
    script: String,
    #[arg(long)]
    chain_id: u64,
    /// Read `run-<timestamp>.json` instead of `run-latest.json`
    #[arg(long)]
    timestamp: Option<u64>,
}

#[derive(Args)]
struct ResolveArgs {
    /// Contract name as recorded in the broadcast
    contract: String,
    #[command(flatten)]
    broadcast: BroadcastArgs,
    /// Match CREATE2 instead of CREATE transactions
    #[arg(long)]
    create2: bool,
    /// Treat `contract` as a proxy and pick the one fronting this implementation
    #[arg(long, conflicts_with = "create2")]
    implementation: Option<String>,
}

#[derive(Args)]
struct RegisterArgs {
    /// Implementation contract name
    implementation: String,
    /// Deployment name; defaults to the implementation name
    #[arg(long)]
    name: Option<String>,
    /// Network directory under the deployments root
    #[arg(long)]
    network: String,
    #[command(flatten)]
    broadcast: BroadcastArgs,
    #[arg(long, default_value = "deployments")]
    deployments_dir: PathBuf,
    /// Forge artifacts directory
    #[arg(long, default_value = "out")]
    artifacts_dir: PathBuf,
    #[arg(long, default_value = DEFAULT_PROXY_CONTRACT)]
    proxy_contract: String,
}

#[derive(Subcommand)]
enum RoutesAction {
    /// Print the testnet routing table as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Check a routing table file
    Validate { path: PathBuf },
}

#[derive(Args)]
struct SendArgs {
    /// Source endpoint, e.g. base-sepolia or 40245
    #[arg(long)]
    from: EndpointId,
    /// Destination endpoint
    #[arg(long)]
    to: EndpointId,
    /// Amount in whole tokens
    #[arg(long)]
    amount: String,
    /// Recipient on the destination chain; defaults to the destination signer
    #[arg(long)]
    recipient: Option<Address>,
    /// Routing table to take token addresses from; defaults to the testnet table
    #[arg(long)]
    routes: Option<PathBuf>,
    #[arg(long)]
    source_token: Option<Address>,
    #[arg(long)]
    destination_token: Option<Address>,
    #[arg(long, default_value_t = DEFAULT_GAS_PRICE_MULTIPLIER)]
    gas_multiplier: u128,
    #[arg(long, default_value_t = DEFAULT_LZ_RECEIVE_GAS)]
    lz_receive_gas: u128,
    /// Seconds between destination balance checks
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    interval: u64,
    #[arg(long)]
    max_attempts: Option<u32>,
    /// Poll until delivered or interrupted
    #[arg(long, conflicts_with = "max_attempts")]
    unbounded: bool,
    #[arg(long, default_value_t = ArrivalCheck::ExceedsBaseline)]
    arrival: ArrivalCheck,
    /// `continue` polls even when the send failed; `abort` stops
    #[arg(long, default_value_t = SubmitFailurePolicy::ContinuePolling)]
    on_submit_failure: SubmitFailurePolicy,
    /// Stop after printing the fee quote
    #[arg(long)]
    quote_only: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match Cli::parse().command {
        Command::Resolve(args) => resolve(args)?,
        Command::Register(args) => register(args)?,
        Command::Routes { action } => routes(action)?,
        Command::Send(args) => send(args).await?,
    }
    Ok(())
}

fn resolve(args: ResolveArgs) -> lz_oft_ops::Result<()> {
    let b = &args.broadcast;
    let record = BroadcastLocator::new(&b.broadcast_dir).load(
        &b.script,
        b.chain_id,
        b.timestamp.into(),
    )?;

    let address = match &args.implementation {
        Some(implementation) => {
            let implementation = record.contract_address(implementation)?;
            record.proxy_address(&args.contract, implementation)?
        }
        None => {
            let kind = if args.create2 {
                TransactionKind::Create2
            } else {
                TransactionKind::Create
            };
            record.find(&args.contract, kind)?.address()?
        }
    };
    println!("{address}");
    Ok(())
}

fn register(args: RegisterArgs) -> lz_oft_ops::Result<()> {
    let b = &args.broadcast;
    let locator = BroadcastLocator::new(&b.broadcast_dir);
    let store = DeploymentsDir::new(&args.deployments_dir, &args.network, &args.artifacts_dir)
        .with_chain_id(b.chain_id);

    let registration = ProxyRegistration::builder()
        .implementation(args.implementation.clone())
        .maybe_deployment_name(args.name.clone())
        .proxy_contract(args.proxy_contract.clone())
        .script(b.script.clone())
        .chain_id(b.chain_id)
        .run(b.timestamp.into())
        .build();

    let record = register_proxy(&locator, &store, &registration)?;
    println!(
        "{} -> {} ({})",
        registration.deployment_name(),
        record.address,
        store.record_path(registration.deployment_name()).display()
    );
    Ok(())
}

fn routes(action: RoutesAction) -> lz_oft_ops::Result<()> {
    match action {
        RoutesAction::Export { output } => {
            let graph = testnet::debt_token_graph();
            graph.validate()?;
            let json = graph.to_json_pretty()?;
            match output {
                Some(path) => std::fs::write(path, json)?,
                None => println!("{json}"),
            }
        }
        RoutesAction::Validate { path } => {
            let graph = OAppGraph::load(&path)?;
            for c in &graph.connections {
                println!("{} -> {}", c.from.eid, c.to.eid);
            }
            println!(
                "{}: {} contracts, {} connections",
                path.display(),
                graph.contracts.len(),
                graph.connections.len()
            );
        }
    }
    Ok(())
}

fn token_address(
    explicit: Option<Address>,
    points: &[OmniPoint],
    eid: EndpointId,
) -> lz_oft_ops::Result<Address> {
    if let Some(address) = explicit {
        return Ok(address);
    }
    points
        .iter()
        .find(|p| p.eid == eid)
        .ok_or_else(|| OftError::EndpointNotSupported {
            endpoint: eid.to_string(),
        })?
        .deployed_address()
}

async fn send(args: SendArgs) -> lz_oft_ops::Result<()> {
    let settings = Settings::from_env(args.from, args.to)?;

    let points = match &args.routes {
        Some(path) => OAppGraph::load(path)?
            .contracts
            .into_iter()
            .map(|node| node.contract)
            .collect(),
        None => testnet::known_points(),
    };
    let source_token = token_address(args.source_token, &points, args.from)?;
    let destination_token = token_address(args.destination_token, &points, args.to)?;

    let source_provider = ProviderBuilder::new()
        .wallet(EthereumWallet::from(settings.source.signer.clone()))
        .connect_http(settings.source.rpc_url.clone())
        .erased();
    let destination_provider = ProviderBuilder::new()
        .connect_http(settings.destination.rpc_url.clone())
        .erased();

    let recipient = args
        .recipient
        .unwrap_or_else(|| settings.destination.address());

    let polling = if args.unbounded {
        PollingConfig::unbounded()
    } else {
        let polling = PollingConfig::default();
        match args.max_attempts {
            Some(max) => polling.with_max_attempts(max),
            None => polling,
        }
    }
    .with_interval_secs(args.interval);

    let intent = TransferIntent::builder()
        .source(args.from)
        .destination(args.to)
        .recipient(recipient)
        .amount(args.amount)
        .options(ExecutorOptions::new().add_lz_receive(args.lz_receive_gas, 0))
        .build();

    let cancellation = Cancellation::new();
    let on_interrupt = cancellation.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!(event = "interrupt_received");
            on_interrupt.cancel();
        }
        // A second interrupt exits without waiting for the task to unwind
        if tokio::signal::ctrl_c().await.is_ok() {
            std::process::exit(130);
        }
    });

    let task = TransferTask::builder()
        .source(AlloyOftEndpoint::new(
            source_provider,
            source_token,
            settings.source.address(),
        ))
        .destination(AlloyOftEndpoint::new(
            destination_provider,
            destination_token,
            settings.destination.address(),
        ))
        .clock(TokioClock::new())
        .intent(intent)
        .polling(polling)
        .gas_price_multiplier(args.gas_multiplier)
        .arrival(args.arrival)
        .on_submit_failure(args.on_submit_failure)
        .cancellation(cancellation)
        .quote_only(args.quote_only)
        .build();

    info!(
        source = %args.from,
        destination = %args.to,
        recipient = %recipient,
        event = "transfer_starting"
    );
    let report = task.run().await?;

    println!("amount (base units): {}", report.amount);
    println!("native fee: {}", report.fee.nativeFee);
    println!(
        "balances before: source {}, destination {}",
        report.source_before, report.destination_before
    );
    match &report.submission {
        Submission::Skipped => println!("quote only, nothing sent"),
        Submission::Included(receipt) => println!(
            "sent {} ({})",
            receipt.tx_hash,
            lz_oft_ops::scan_url(args.from, receipt.tx_hash)
        ),
        Submission::Failed { reason } => println!("send failed: {reason}"),
    }
    if let Some(delivery) = report.delivery {
        println!(
            "delivered: destination balance {} after {} checks",
            delivery.balance, delivery.attempts
        );
    }
    Ok(())
}
