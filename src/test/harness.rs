use crate::crypto::Keystore;
use crate::election::{self, ElectionConstraints, ElectionResult, Node};
use crate::fee::FeeSchedule;
use crate::mining::{MiningNode, WorkflowTimeouts};
use crate::network::memory::InMemoryNetwork;
use crate::network::{Inbox, WireMessage};
use crate::oracle::{FixedPriceOracle, UcoPriceOracle};
use crate::primitives::{Keypair, OriginId, PublicKey, Timestamp};
use crate::roster::{Roster, RosterSnapshot};
use crate::storage::inmemory::InMemoryStore;
use crate::storage::TransactionStore;
use crate::transaction::Transaction;
use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// A root seed every node in a harness shares, standing in for the
/// network-wide node-shared-secret that really produces the daily nonce
/// (§ crypto design note): in production a `node_shared_secrets`
/// transaction distributes it; here every [`Keystore`] just derives from
/// the same bytes so every node's election and signature-verification
/// agree, exactly like the real network's daily key does.
const TEST_ROOT_SEED: [u8; 32] = [0x42; 32];

fn test_now() -> Timestamp {
  Timestamp::from_micros(1_700_000_000_000_000)
}

/// Short but non-zero: long enough that in-process message passing
/// always lands within the window, short enough that a genuinely
/// unreachable peer (an unregistered key) fails the deadline quickly.
pub fn fast_timeouts() -> WorkflowTimeouts {
  WorkflowTimeouts {
    message: Duration::from_millis(100),
    context_collection: Duration::from_millis(60),
    cross_validate_base: Duration::from_millis(60),
    replication: Duration::from_millis(80),
  }
}

/// Both nonce seeds depend only on the shared root seed and the day, not
/// on which node asks — any throwaway [`Keystore`] sharing
/// [`TEST_ROOT_SEED`] reproduces exactly what every harness node derives.
pub fn test_nonce_seeds() -> ([u8; 32], [u8; 32]) {
  let throwaway = Keystore::new(Keypair::from_seed(&[0xAB; 32], OriginId::Software), TEST_ROOT_SEED, test_now());
  (throwaway.daily_nonce_seed(), throwaway.storage_nonce_seed())
}

/// Builds the roster this module's harnesses use: `node_count` nodes
/// alternating EU/US geo patches, all already authorized as of the
/// nonce's epoch.
pub fn make_roster(node_count: usize) -> (Vec<Node>, Vec<Keypair>) {
  let mut roster_nodes = Vec::with_capacity(node_count);
  let mut keypairs = Vec::with_capacity(node_count);
  for i in 0..node_count {
    let seed = [i as u8 + 1; 32];
    let keypair = Keypair::from_seed(&seed, OriginId::Software);
    let patch = if i % 2 == 0 { "EU" } else { "US" };
    let node = Node::new(
      keypair.public(),
      Timestamp::from_micros(0),
      patch,
      IpAddr::V4(Ipv4Addr::new(127, 0, 0, i as u8 + 1)),
      9000 + i as u16,
    );
    roster_nodes.push(node);
    keypairs.push(keypair);
  }
  (roster_nodes, keypairs)
}

/// Elects the committee for `tx` against `roster_nodes`, exactly as
/// [`TestHarness::submit`] does internally — exposed standalone so a
/// scenario can look up which roster index lands where (e.g. to give a
/// specific cross-validator a dissenting oracle price) before the
/// harness is even built.
pub fn elect_committee(roster_nodes: &[Node], constraints: &ElectionConstraints, tx: &Transaction) -> ElectionResult {
  let (daily_nonce_seed, storage_nonce_seed) = test_nonce_seeds();
  election::elect(tx, roster_nodes, &daily_nonce_seed, &storage_nonce_seed, constraints)
}

/// Wires up `node_count` [`MiningNode`]s over one [`InMemoryNetwork`],
/// all sharing one [`InMemoryStore`] (a test-only simplification: in
/// production each node keeps its own store, but the only thing these
/// scenarios check through the store is "was this transaction
/// persisted", which a shared store answers just as well as querying
/// each chain-storage node individually would).
pub struct TestHarness {
  pub network: InMemoryNetwork,
  pub store: Arc<InMemoryStore>,
  pub roster_nodes: Vec<Node>,
  pub keypairs: Vec<Keypair>,
  pub nodes: Vec<Arc<MiningNode>>,
  pub constraints: ElectionConstraints,
  pub welcome_key: PublicKey,
  welcome_inbox: Mutex<Inbox>,
}

impl TestHarness {
  pub async fn build(node_count: usize, constraints: ElectionConstraints) -> Self {
    let oracle: Arc<dyn UcoPriceOracle> = Arc::new(FixedPriceOracle::usd(1.0));
    Self::build_with_oracles(node_count, constraints, vec![oracle.clone(); node_count]).await
  }

  /// Like [`Self::build`], but each node reads the UCO price from its own
  /// oracle instance — used by the fee-mismatch scenario (S3), where one
  /// cross-validator legitimately recomputes a different fee because it
  /// observes a different price.
  pub async fn build_with_oracles(
    node_count: usize,
    constraints: ElectionConstraints,
    oracles: Vec<Arc<dyn UcoPriceOracle>>,
  ) -> Self {
    assert_eq!(oracles.len(), node_count);
    let network = InMemoryNetwork::new();
    let store = Arc::new(InMemoryStore::new());
    let roster_arc = Arc::new(Roster::new(RosterSnapshot::default()));

    let (roster_nodes, keypairs) = make_roster(node_count);
    roster_arc.replace(RosterSnapshot { authorized: Arc::new(roster_nodes.clone()), ..Default::default() });

    let mut nodes = Vec::with_capacity(node_count);
    for (i, keypair) in keypairs.iter().enumerate() {
      let keystore = Arc::new(Keystore::new(keypair.clone(), TEST_ROOT_SEED, test_now()));
      let (node_network, inbox) = network.register(keypair.public());
      let node = MiningNode::new(
        keypair.public(),
        keystore,
        store.clone(),
        Arc::new(node_network),
        oracles[i].clone(),
        roster_arc.clone(),
        constraints.clone(),
        FeeSchedule::default(),
        fast_timeouts(),
      );
      tokio::spawn(node.clone().run(inbox));
      nodes.push(node);
    }

    let welcome_keypair = Keypair::from_seed(&[0xEE; 32], OriginId::Software);
    let welcome_key = welcome_keypair.public();
    let (_welcome_network, welcome_inbox) = network.register(welcome_key);

    Self {
      network,
      store,
      roster_nodes,
      keypairs,
      nodes,
      constraints,
      welcome_key,
      welcome_inbox: Mutex::new(welcome_inbox),
    }
  }

  /// Elects the committee for `tx` exactly as a welcome node would, and
  /// broadcasts `StartMining` to it.
  pub async fn submit(&self, tx: Transaction) {
    let election_result = elect_committee(&self.roster_nodes, &self.constraints, &tx);
    let committee_keys: Vec<PublicKey> =
      election_result.validation_committee.iter().map(|n| n.public_key).collect();

    self
      .network
      .broadcast_message(
        &committee_keys,
        WireMessage::StartMining {
          transaction: tx,
          welcome_node_public_key: self.welcome_key,
          validation_node_public_keys: committee_keys.clone(),
        },
      )
      .await;
  }

  /// Waits for the one message the welcome node receives back: either
  /// an `AcknowledgeStorage` (success) or an `Error` (abort).
  pub async fn recv_welcome(&self, timeout: Duration) -> Option<WireMessage> {
    let mut inbox = self.welcome_inbox.lock().await;
    let envelope = tokio::time::timeout(timeout, inbox.recv()).await.ok().flatten()?;
    Some(envelope.message)
  }

  pub async fn get_transaction(&self, address: &crate::primitives::Address) -> Option<Transaction> {
    self.store.get_transaction(address).await.ok().flatten()
  }

  /// Drops a node from the network entirely: any `send_message` to it
  /// henceforth fails as `Unreachable`, modeling an unresponsive storage
  /// node for the replication-timeout scenario (S5).
  pub fn drop_node(&self, public_key: &PublicKey) {
    self.network.unregister(public_key);
  }
}
