mod cli;
mod crypto;
mod election;
mod fee;
mod mining;
mod network;
mod oracle;
mod primitives;
mod replication;
mod roster;
mod storage;
mod transaction;
mod validation;

use clap::Parser;
use cli::CliOpts;
use crypto::Keystore;
use election::ElectionConstraints;
use mining::MiningNode;
use network::tcp::TcpNetworkClient;
use oracle::FixedPriceOracle;
use primitives::{Keypair, OriginId, Timestamp};
use roster::{Roster, RosterSnapshot};
use std::sync::Arc;
use storage::sled_store::SledStore;
use tracing::{info, Level};
use tracing_subscriber::{filter::filter_fn, layer::SubscriberExt, util::SubscriberInitExt, Layer};

#[global_allocator]
static ALLOC: jemallocator::Jemalloc = jemallocator::Jemalloc;

fn parse_seed(encoded: &str) -> anyhow::Result<[u8; 32]> {
  let bytes = bs58::decode(encoded).into_vec()?;
  bytes.try_into().map_err(|_| anyhow::anyhow!("seed must be exactly 32 bytes"))
}

fn print_essentials(opts: &CliOpts, node_public_key: &primitives::PublicKey) {
  info!("Starting mining node");
  info!("Version: {}", env!("CARGO_PKG_VERSION"));
  info!("Listening on: {}", opts.listen);
  info!("Node identity: {node_public_key}");
  info!("Data directory: {}", opts.data_dir.display());
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> anyhow::Result<()> {
  let opts = CliOpts::parse();

  let loglevel = match opts.verbose {
    1 => Level::DEBUG,
    2.. => Level::TRACE,
    _ => Level::INFO,
  };
  tracing_subscriber::registry()
    .with(tracing_subscriber::fmt::layer().with_filter(filter_fn(move |metadata| metadata.level() <= &loglevel)))
    .init();

  let node_seed = match &opts.node_seed {
    Some(encoded) => parse_seed(encoded)?,
    None => {
      let seed = rand::random::<[u8; 32]>();
      info!("No --node-seed given, generated one: {}", bs58::encode(seed).into_string());
      seed
    }
  };
  let root_seed = match &opts.root_seed {
    Some(encoded) => parse_seed(encoded)?,
    None => {
      let seed = rand::random::<[u8; 32]>();
      info!("No --root-seed given, generated one: {}", bs58::encode(seed).into_string());
      seed
    }
  };

  let node_keypair = Keypair::from_seed(&node_seed, OriginId::Software);
  let node_public_key = node_keypair.public();
  print_essentials(&opts, &node_public_key);

  let keystore = Arc::new(Keystore::new(node_keypair, root_seed, Timestamp::now()));
  std::fs::create_dir_all(&opts.data_dir)?;
  let store = Arc::new(SledStore::new(&opts.data_dir)?);
  let roster = Arc::new(Roster::new(RosterSnapshot::default()));
  let oracle = Arc::new(FixedPriceOracle::usd(1.0));
  let timeouts = opts.workflow_timeouts();

  let listener = tokio::net::TcpListener::bind(opts.listen).await?;
  let network = Arc::new(TcpNetworkClient::new(node_public_key, roster.clone()));
  let (inbox_tx, inbox) = tokio::sync::mpsc::unbounded_channel();
  tokio::spawn({
    let network = network.clone();
    async move { network.serve(listener, inbox_tx, timeouts.message).await }
  });

  let constraints: ElectionConstraints = opts.election_constraints();
  let node = MiningNode::new(
    node_public_key,
    keystore,
    store,
    network,
    oracle,
    roster,
    constraints,
    opts.fee_schedule(),
    timeouts,
  );

  info!("Mining node ready, awaiting StartMining messages");
  node.run(inbox).await;
  Ok(())
}
