use crate::election::ElectionConstraints;
use crate::fee::FeeSchedule;
use crate::mining::WorkflowTimeouts;
use clap::Parser;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// Command-line configuration for a mining node: identity material, the
/// storage directory, listen address, and the committee-sizing knobs
/// [`ElectionConstraints`] exposes. Fee and timeout tuning is left at
/// defaults; operators who need to override them can still construct
/// [`FeeSchedule`]/[`WorkflowTimeouts`] directly when embedding the crate.
#[derive(Parser, Debug)]
#[clap(name = "veridian-mining", about = "Consensus mining node")]
pub struct CliOpts {
  /// Seed for this node's permanent keypair, base58-encoded (32 bytes). A
  /// random seed is generated and printed once if omitted.
  #[clap(long)]
  pub node_seed: Option<String>,

  /// Root seed this node derives its rotating daily key from,
  /// base58-encoded (32 bytes).
  #[clap(long)]
  pub root_seed: Option<String>,

  /// Directory the sled-backed transaction store lives in.
  #[clap(long, parse(from_os_str), default_value = "./data")]
  pub data_dir: PathBuf,

  /// Address this node listens on for mining protocol messages.
  #[clap(long, default_value = "0.0.0.0:30333")]
  pub listen: SocketAddr,

  /// Minimum validation committee size, before the `log2(|roster|)`
  /// formula can grow it further.
  #[clap(long, default_value = "3")]
  pub min_validators: usize,

  #[clap(long, default_value = "3")]
  pub chain_replication_factor: usize,

  #[clap(long, default_value = "2")]
  pub beacon_replication_factor: usize,

  #[clap(long, default_value = "2")]
  pub io_replication_factor: usize,

  /// Verbosity: unset is INFO, `-v` is DEBUG, `-vv` is TRACE.
  #[clap(short, long, parse(from_occurrences))]
  pub verbose: u8,
}

impl CliOpts {
  pub fn election_constraints(&self) -> ElectionConstraints {
    ElectionConstraints {
      min_validators: self.min_validators,
      chain_replication_factor: self.chain_replication_factor,
      beacon_replication_factor: self.beacon_replication_factor,
      io_replication_factor: self.io_replication_factor,
    }
  }

  pub fn fee_schedule(&self) -> FeeSchedule {
    FeeSchedule::default()
  }

  pub fn workflow_timeouts(&self) -> WorkflowTimeouts {
    WorkflowTimeouts::default()
  }

  pub fn listen_ip(&self) -> IpAddr {
    self.listen.ip()
  }

  pub fn listen_port(&self) -> u16 {
    self.listen.port()
  }
}

impl Default for CliOpts {
  fn default() -> Self {
    Self {
      node_seed: None,
      root_seed: None,
      data_dir: PathBuf::from("./data"),
      listen: SocketAddr::new(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)), 30333),
      min_validators: 3,
      chain_replication_factor: 3,
      beacon_replication_factor: 2,
      io_replication_factor: 2,
      verbose: 0,
    }
  }
}
