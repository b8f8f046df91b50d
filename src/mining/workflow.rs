//! The coordinator/cross-validator state machine (§4.3): a per-address
//! task spawned off an inbound `StartMining`, driven by the messages the
//! rest of the committee sends back to it, ending in either a stored,
//! replicated transaction or an abort reported to the welcome node.

use crate::crypto::Keystore;
use crate::election::{self, ElectionConstraints, ElectionResult, Node};
use crate::fee::FeeSchedule;
use crate::mining::commitment;
use crate::mining::context::{AggregatedContext, MiningContext};
use crate::mining::coordinator::{compute_validation_stamp, StampInputs};
use crate::mining::cross_validator::check_against_coordinator;
use crate::mining::Error;
use crate::network::{Envelope, ErrorReason, Inbox, NetworkClient, WireMessage};
use crate::oracle::UcoPriceOracle;
use crate::primitives::{Address, Bitset, Digest, HashAlgo, PublicKey, Timestamp};
use crate::replication::{build_replication_tree, ReplicationTree};
use crate::roster::{Roster, RosterSnapshot};
use crate::storage::{StoreError, TransactionStore};
use crate::transaction::{CrossValidationStamp, InconsistencyKind, Transaction, UnspentOutput};
use crate::validation::{validate_pending_transaction, NetworkChainKind, ValidationContext};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::timeout;

/// `ceil(2n/3)`: the replication commit quorum size over chain-storage
/// targets (§5). Hand-rolled rather than `usize::div_ceil`, which isn't
/// guaranteed available at this crate's MSRV.
fn ceil_two_thirds(n: usize) -> usize {
  (2 * n + 2) / 3
}

/// Messages routed from the node's inbox into a running per-address
/// workflow. Unlike [`WireMessage`] these already carry the sender where
/// that matters, so a workflow never has to re-derive who it's hearing
/// from.
enum Routed {
  Context(MiningContext),
  CrossValidate { validation_stamp: crate::transaction::ValidationStamp, replication_tree: ReplicationTree },
  CrossValidationDone(CrossValidationStamp),
}

/// Tunable timeouts for one node's mining workflows. Separate from
/// [`ElectionConstraints`] and [`FeeSchedule`] since they govern timing,
/// not protocol shape.
#[derive(Debug, Clone, Copy)]
pub struct WorkflowTimeouts {
  pub message: Duration,
  pub context_collection: Duration,
  pub cross_validate_base: Duration,
  pub replication: Duration,
}

impl Default for WorkflowTimeouts {
  fn default() -> Self {
    Self {
      message: Duration::from_secs(2),
      context_collection: Duration::from_millis(500),
      cross_validate_base: Duration::from_millis(500),
      replication: Duration::from_secs(3),
    }
  }
}

/// One node's mining runtime: everything a workflow needs to run, plus
/// the registry of workflows currently in flight keyed by transaction
/// address. A `StartMining` for an address already in the registry, or
/// already durably stored, is dropped rather than restarted (§5 stale
/// resubmission).
pub struct MiningNode {
  pub public_key: PublicKey,
  pub keystore: Arc<Keystore>,
  pub store: Arc<dyn TransactionStore>,
  pub network: Arc<dyn NetworkClient>,
  pub oracle: Arc<dyn UcoPriceOracle>,
  pub roster: Arc<Roster>,
  pub constraints: ElectionConstraints,
  pub fee_schedule: FeeSchedule,
  pub timeouts: WorkflowTimeouts,
  registry: DashMap<Address, mpsc::UnboundedSender<Routed>>,
}

impl MiningNode {
  pub fn new(
    public_key: PublicKey,
    keystore: Arc<Keystore>,
    store: Arc<dyn TransactionStore>,
    network: Arc<dyn NetworkClient>,
    oracle: Arc<dyn UcoPriceOracle>,
    roster: Arc<Roster>,
    constraints: ElectionConstraints,
    fee_schedule: FeeSchedule,
    timeouts: WorkflowTimeouts,
  ) -> Arc<Self> {
    Arc::new(Self {
      public_key,
      keystore,
      store,
      network,
      oracle,
      roster,
      constraints,
      fee_schedule,
      timeouts,
      registry: DashMap::new(),
    })
  }

  pub fn in_flight(&self) -> usize {
    self.registry.len()
  }

  /// The node's inbound message loop: every envelope is routed either to
  /// a freshly spawned workflow (`StartMining`), to an already-running
  /// one (`AddMiningContext`/`CrossValidate`/`CrossValidationDone`), or
  /// handled inline (replication requests, which need no workflow state
  /// on the storage-node side).
  pub async fn run(self: Arc<Self>, mut inbox: Inbox) {
    while let Some(envelope) = inbox.recv().await {
      let this = self.clone();
      tokio::spawn(async move { this.handle_envelope(envelope).await });
    }
  }

  async fn handle_envelope(self: Arc<Self>, envelope: Envelope) {
    let reply = envelope.reply;
    match envelope.message {
      WireMessage::StartMining { transaction, welcome_node_public_key, validation_node_public_keys } => {
        self.spawn_workflow(transaction, welcome_node_public_key, validation_node_public_keys).await;
      }
      WireMessage::AddMiningContext { address, context } => {
        self.forward(&address, Routed::Context(context));
      }
      WireMessage::CrossValidate { address, validation_stamp, replication_tree, .. } => {
        self.forward(&address, Routed::CrossValidate { validation_stamp, replication_tree });
      }
      WireMessage::CrossValidationDone { address, cross_validation_stamp } => {
        self.forward(&address, Routed::CrossValidationDone(cross_validation_stamp));
      }
      WireMessage::ReplicateTransactionChain { transaction } | WireMessage::ReplicateTransaction { transaction } => {
        let ack = self.store_and_acknowledge(transaction).await;
        if let Some(reply) = reply {
          let _ = reply.send(ack);
        }
      }
      _ => {}
    }
  }

  fn forward(&self, address: &Address, message: Routed) {
    if let Some(sender) = self.registry.get(address) {
      let _ = sender.send(message);
    }
  }

  async fn store_and_acknowledge(&self, transaction: Transaction) -> WireMessage {
    let address = transaction.address.clone();
    match self.store.write_transaction(&transaction).await {
      Ok(()) => {
        let signature = self.keystore.sign_with_node_key(address.to_b58().as_bytes());
        WireMessage::AcknowledgeStorage { address, node_public_key: self.public_key, signature }
      }
      Err(_) => WireMessage::Error { reason: ErrorReason::NetworkIssue, address },
    }
  }

  async fn spawn_workflow(
    self: Arc<Self>,
    transaction: Transaction,
    welcome_node_public_key: PublicKey,
    validation_node_public_keys: Vec<PublicKey>,
  ) {
    let address = transaction.address.clone();
    if self.registry.contains_key(&address) {
      return;
    }
    if matches!(self.store.get_transaction(&address).await, Ok(Some(_))) {
      self
        .network
        .send_message(
          &welcome_node_public_key,
          WireMessage::Error { reason: ErrorReason::TransactionAlreadyExists, address },
          self.timeouts.message,
        )
        .await
        .ok();
      return;
    }

    let (sender, inbox) = mpsc::unbounded_channel();
    self.registry.insert(address.clone(), sender);
    let this = self.clone();
    tokio::spawn(async move {
      this.clone().run_workflow(transaction, welcome_node_public_key, validation_node_public_keys, inbox).await;
      this.registry.remove(&address);
    });
  }

  fn validation_context<'a>(
    &self,
    roster: &'a RosterSnapshot,
    genesis: &'a HashMap<NetworkChainKind, Address>,
  ) -> ValidationContext<'a> {
    ValidationContext {
      now: Timestamp::now(),
      max_content_size: 1 << 22,
      allowed_origin_families: &roster.allowed_origin_families,
      root_ca_keys: &roster.root_ca_keys,
      authorized_nodes: &roster.authorized,
      renewal_candidates: &roster.renewal_candidates,
      scheduled_renewal_slot: Timestamp::from_micros(0),
      technical_council: &roster.technical_council,
      oracle_schedule: roster.oracle_schedule,
      last_summary_burned_fees: roster.last_summary_burned_fees,
      reward_distribution: &roster.reward_distribution,
      known_genesis_addresses: genesis,
      existing_live_nodes: &roster.existing_live_nodes,
    }
  }

  /// The genesis address of each network chain, resolved as the
  /// chronologically first stored transaction of its rooting type —
  /// `known_genesis_addresses` in the validation context is built from
  /// this, not hardcoded, so chain-continuity checks (§ pending
  /// validation) actually have something to compare against.
  async fn genesis_addresses(&self) -> HashMap<NetworkChainKind, Address> {
    let mut out = HashMap::new();
    for kind in NetworkChainKind::ALL {
      if let Ok(addresses) = self.store.list_addresses_by_type(kind.transaction_type()).await {
        if let Some(genesis) = addresses.into_iter().next() {
          out.insert(kind, genesis);
        }
      }
    }
    out
  }

  async fn send_error(&self, to: &PublicKey, reason: ErrorReason, address: &Address) {
    let _ = self
      .network
      .send_message(to, WireMessage::Error { reason, address: address.clone() }, self.timeouts.message)
      .await;
  }

  async fn prior_utxos(&self, previous_public_key: &PublicKey) -> Result<Vec<UnspentOutput>, StoreError> {
    match self.store.get_last_chain_address(previous_public_key).await? {
      Some(address) => Ok(
        self
          .store
          .get_transaction(&address)
          .await?
          .and_then(|tx| tx.validation_stamp)
          .map(|stamp| stamp.ledger_operations.unspent_outputs)
          .unwrap_or_default(),
      ),
      None => Ok(vec![]),
    }
  }

  async fn previous_poi(&self, previous_public_key: &PublicKey) -> Result<Option<Digest>, StoreError> {
    match self.store.get_last_chain_address(previous_public_key).await? {
      Some(address) => Ok(
        self
          .store
          .get_transaction(&address)
          .await?
          .and_then(|tx| tx.validation_stamp)
          .map(|stamp| stamp.proof_of_integrity),
      ),
      None => Ok(None),
    }
  }

  fn recipients(transaction: &Transaction) -> Vec<Address> {
    let mut out = Vec::new();
    for transfer in transaction.data.ledger.uco.iter().chain(transaction.data.ledger.token.iter()) {
      if !out.contains(&transfer.to) {
        out.push(transfer.to.clone());
      }
    }
    out
  }

  #[allow(clippy::too_many_arguments)]
  async fn run_workflow(
    self: Arc<Self>,
    transaction: Transaction,
    welcome_node_public_key: PublicKey,
    validation_node_public_keys: Vec<PublicKey>,
    mut inbox: mpsc::UnboundedReceiver<Routed>,
  ) {
    let address = transaction.address.clone();
    let roster = self.roster.snapshot();
    let genesis = self.genesis_addresses().await;

    let daily_nonce_seed = self.keystore.daily_nonce_seed();
    if !election::is_valid_election(
      &transaction,
      &validation_node_public_keys,
      &roster.authorized,
      &daily_nonce_seed,
      &self.constraints,
    ) {
      self.send_error(&welcome_node_public_key, ErrorReason::InvalidTransaction, &address).await;
      return;
    }

    if validate_pending_transaction(&transaction, &self.validation_context(&roster, &genesis)).is_err() {
      self.send_error(&welcome_node_public_key, ErrorReason::InvalidTransaction, &address).await;
      return;
    }

    let Some(my_rank) = validation_node_public_keys.iter().position(|pk| *pk == self.public_key) else {
      return;
    };

    let storage_nonce_seed = self.keystore.storage_nonce_seed();
    let election_result =
      election::elect(&transaction, &roster.authorized, &daily_nonce_seed, &storage_nonce_seed, &self.constraints);

    let uco_price = self.oracle.get_uco_price(transaction.timestamp).await;
    let prior_utxos = self.prior_utxos(&transaction.previous_public_key).await.unwrap_or_default();
    let previous_poi = self.previous_poi(&transaction.previous_public_key).await.unwrap_or(None);
    let change_address = Address::from_public_key(&transaction.previous_public_key, HashAlgo::Sha3_256);
    let proof_of_election = election::seed::sorting_seed(&transaction, &daily_nonce_seed);
    let recipients = Self::recipients(&transaction);

    let stamp_inputs = StampInputs {
      tx: &transaction,
      uco_price_usd: uco_price.usd,
      fee_schedule: &self.fee_schedule,
      prior_utxos: &prior_utxos,
      change_address: &change_address,
      origin_candidates: &roster.origin_keys,
      previous_poi: previous_poi.as_ref(),
      proof_of_election,
      recipients,
      protocol_version: 1,
    };

    if validation_node_public_keys.len() <= 1 {
      self.run_standalone(transaction, welcome_node_public_key, &stamp_inputs, &election_result).await;
      return;
    }

    if my_rank == 0 {
      self
        .run_coordinator(transaction, welcome_node_public_key, validation_node_public_keys, &stamp_inputs, &election_result, &mut inbox)
        .await;
    } else {
      self
        .run_cross_validator(
          transaction,
          welcome_node_public_key,
          validation_node_public_keys,
          my_rank,
          &stamp_inputs,
          &election_result,
          &mut inbox,
        )
        .await;
    }
  }

  async fn run_standalone(
    &self,
    mut transaction: Transaction,
    welcome_node_public_key: PublicKey,
    stamp_inputs: &StampInputs<'_>,
    election_result: &ElectionResult,
  ) {
    let Ok(mut stamp) = compute_validation_stamp(stamp_inputs) else {
      self.send_error(&welcome_node_public_key, ErrorReason::InvalidTransaction, &transaction.address).await;
      return;
    };
    stamp.sign(|bytes| self.keystore.sign_with_daily_key(bytes));
    transaction.validation_stamp = Some(stamp);

    let tree = build_replication_tree(
      &election_result.validation_committee,
      &election_result.chain_storage,
      &election_result.beacon_storage,
      &election_result.io_storage,
    );
    self
      .replicate_and_finish(transaction, welcome_node_public_key, 0, &tree, election_result)
      .await;
  }

  #[allow(clippy::too_many_arguments)]
  async fn run_coordinator(
    &self,
    mut transaction: Transaction,
    welcome_node_public_key: PublicKey,
    committee: Vec<PublicKey>,
    stamp_inputs: &StampInputs<'_>,
    election_result: &ElectionResult,
    inbox: &mut mpsc::UnboundedReceiver<Routed>,
  ) {
    let mut contexts = Vec::new();
    let _ = timeout(self.timeouts.context_collection, async {
      while contexts.len() + 1 < committee.len() {
        match inbox.recv().await {
          Some(Routed::Context(ctx)) => contexts.push(ctx),
          Some(_) => {}
          None => break,
        }
      }
    })
    .await;
    let aggregated = AggregatedContext::merge(&contexts);
    tracing::debug!(
      address = %transaction.address.to_b58(),
      reporting = contexts.len(),
      expected = committee.len() - 1,
      available_chain_nodes = aggregated.chain_storage_nodes_view.map(|v| v.count_ones()),
      "coordinator collected mining contexts"
    );

    let Ok(mut stamp) = compute_validation_stamp(stamp_inputs) else {
      self.send_error(&welcome_node_public_key, ErrorReason::InvalidTransaction, &transaction.address).await;
      return;
    };
    stamp.sign(|bytes| self.keystore.sign_with_daily_key(bytes));

    let tree = build_replication_tree(
      &election_result.validation_committee,
      &election_result.chain_storage,
      &election_result.beacon_storage,
      &election_result.io_storage,
    );

    let confirmed = Bitset::from_bits(vec![true; committee.len()]);
    self
      .network
      .broadcast_message(
        &committee,
        WireMessage::CrossValidate {
          address: transaction.address.clone(),
          validation_stamp: stamp.clone(),
          replication_tree: tree.clone(),
          confirmed_validation_nodes: confirmed,
        },
      )
      .await;

    let stamps = self
      .collect_cross_validation(inbox, committee.len() - 1, self.timeouts.cross_validate_base * (committee.len() as u32 + 1))
      .await;
    transaction.validation_stamp = Some(stamp);
    self.finish_after_cross_validation(transaction, welcome_node_public_key, 0, &tree, election_result, stamps).await;
  }

  #[allow(clippy::too_many_arguments)]
  async fn run_cross_validator(
    &self,
    mut transaction: Transaction,
    welcome_node_public_key: PublicKey,
    committee: Vec<PublicKey>,
    my_rank: usize,
    stamp_inputs: &StampInputs<'_>,
    election_result: &ElectionResult,
    inbox: &mut mpsc::UnboundedReceiver<Routed>,
  ) {
    let my_context = MiningContext {
      validation_node_public_key: self.public_key,
      previous_storage_nodes_keys: vec![],
      cross_validation_nodes_view: Bitset::from_bits(vec![true; committee.len()]),
      chain_storage_nodes_view: Bitset::from_bits(vec![true; election_result.chain_storage.len()]),
      beacon_storage_nodes_view: Bitset::from_bits(vec![true; election_result.beacon_storage.len()]),
      io_storage_nodes_view: Bitset::from_bits(vec![true; election_result.io_storage.len()]),
    };
    self
      .network
      .send_message(
        &committee[0],
        WireMessage::AddMiningContext { address: transaction.address.clone(), context: my_context },
        self.timeouts.message,
      )
      .await
      .ok();

    let deadline = self.timeouts.cross_validate_base * (my_rank as u32 + 1);
    let received = timeout(deadline, async {
      loop {
        match inbox.recv().await {
          Some(Routed::CrossValidate { validation_stamp, replication_tree }) => {
            return Some((validation_stamp, replication_tree));
          }
          Some(_) => continue,
          None => return None,
        }
      }
    })
    .await
    .ok()
    .flatten();

    let expected_tree = build_replication_tree(
      &election_result.validation_committee,
      &election_result.chain_storage,
      &election_result.beacon_storage,
      &election_result.io_storage,
    );

    let (coordinator_stamp, coordinator_tree) = match received {
      Some(value) => value,
      None => {
        // Node-responsiveness fallback: nobody ranked ahead of us produced
        // a CrossValidate within our deadline, so we deterministically
        // recompute it ourselves and broadcast it, acting as coordinator.
        let Ok(mut stamp) = compute_validation_stamp(stamp_inputs) else {
          self.send_error(&welcome_node_public_key, ErrorReason::InvalidTransaction, &transaction.address).await;
          return;
        };
        stamp.sign(|bytes| self.keystore.sign_with_daily_key(bytes));
        let confirmed = Bitset::from_bits(vec![true; committee.len()]);
        self
          .network
          .broadcast_message(
            &committee,
            WireMessage::CrossValidate {
              address: transaction.address.clone(),
              validation_stamp: stamp.clone(),
              replication_tree: expected_tree.clone(),
              confirmed_validation_nodes: confirmed,
            },
          )
          .await;
        (stamp, expected_tree.clone())
      }
    };

    // The daily key is a network-wide shared secret every node derives
    // identically (§ crypto), so each validator can check the coordinator's
    // signature against its own copy without the coordinator ever sending
    // its public half over the wire.
    let coordinator_daily_key = self.keystore.daily_public_key();
    let inconsistencies = check_against_coordinator(
      stamp_inputs,
      &coordinator_stamp,
      &coordinator_daily_key,
      &coordinator_tree,
      &expected_tree,
    )
    .unwrap_or_else(|_| vec![InconsistencyKind::TransactionFee]);

    let own_stamp = CrossValidationStamp::new(self.public_key, &coordinator_stamp, inconsistencies, |bytes| {
      self.keystore.sign_with_node_key(bytes)
    });
    self
      .network
      .broadcast_message(
        &committee,
        WireMessage::CrossValidationDone { address: transaction.address.clone(), cross_validation_stamp: own_stamp.clone() },
      )
      .await;

    let mut stamps = vec![own_stamp];
    stamps.extend(
      self
        .collect_cross_validation(inbox, committee.len().saturating_sub(2), self.timeouts.cross_validate_base * (committee.len() as u32 + 1))
        .await,
    );

    transaction.validation_stamp = Some(coordinator_stamp);
    self
      .finish_after_cross_validation(transaction, welcome_node_public_key, my_rank, &coordinator_tree, election_result, stamps)
      .await;
  }

  async fn collect_cross_validation(
    &self,
    inbox: &mut mpsc::UnboundedReceiver<Routed>,
    want: usize,
    deadline: Duration,
  ) -> Vec<CrossValidationStamp> {
    let mut out = Vec::new();
    let _ = timeout(deadline, async {
      while out.len() < want {
        match inbox.recv().await {
          Some(Routed::CrossValidationDone(stamp)) => out.push(stamp),
          Some(_) => {}
          None => break,
        }
      }
    })
    .await;
    out
  }

  #[allow(clippy::too_many_arguments)]
  async fn finish_after_cross_validation(
    &self,
    mut transaction: Transaction,
    welcome_node_public_key: PublicKey,
    my_row: usize,
    tree: &ReplicationTree,
    election_result: &ElectionResult,
    stamps: Vec<CrossValidationStamp>,
  ) {
    if !stamps.is_empty() && !commitment::commits(&stamps) {
      let dishonest = commitment::dishonest_validators(&stamps);
      let all_inconsistencies: Vec<_> = stamps.iter().flat_map(|s| s.inconsistencies.clone()).collect();
      tracing::warn!(
        address = %transaction.address.to_b58(),
        dishonest = ?dishonest.iter().map(|k| k.to_b58()).collect::<Vec<_>>(),
        error = %Error::Inconsistency(all_inconsistencies),
        "cross-validation found inconsistencies, aborting"
      );
      self.send_error(&welcome_node_public_key, ErrorReason::InvalidTransaction, &transaction.address).await;
      return;
    }
    transaction.cross_validation_stamps = stamps;
    self.replicate_and_finish(transaction, welcome_node_public_key, my_row, tree, election_result).await;
  }

  fn owned_nodes(row: Option<&Bitset>, storage_nodes: &[Node]) -> Vec<PublicKey> {
    let Some(row) = row else { return vec![] };
    storage_nodes.iter().enumerate().filter(|(i, _)| row.get(*i)).map(|(_, n)| n.public_key).collect()
  }

  /// Replicates `transaction` to this validator's own row of `tree`
  /// across the three storage classes. Commitment is gated on a
  /// two-thirds ack quorum over the chain-storage targets alone (the
  /// class the transaction chain itself lives in); beacon and I/O
  /// storage are replicated to in parallel but don't block success. On
  /// a missed quorum the workflow aborts without ever deleting whatever
  /// was durably written (a late ack still lands safely).
  async fn replicate_and_finish(
    &self,
    transaction: Transaction,
    welcome_node_public_key: PublicKey,
    my_row: usize,
    tree: &ReplicationTree,
    election_result: &ElectionResult,
  ) {
    let chain_targets: Vec<(PublicKey, WireMessage)> =
      Self::owned_nodes(tree.chain.get(my_row), &election_result.chain_storage)
        .into_iter()
        .map(|node| (node, WireMessage::ReplicateTransactionChain { transaction: transaction.clone() }))
        .collect();

    let mut other_targets: Vec<(PublicKey, WireMessage)> = Vec::new();
    for node in Self::owned_nodes(tree.beacon.get(my_row), &election_result.beacon_storage) {
      other_targets.push((node, WireMessage::ReplicateTransaction { transaction: transaction.clone() }));
    }
    for node in Self::owned_nodes(tree.io.get(my_row), &election_result.io_storage) {
      other_targets.push((node, WireMessage::ReplicateTransaction { transaction: transaction.clone() }));
    }

    if chain_targets.is_empty() && other_targets.is_empty() {
      if self.store.write_transaction(&transaction).await.is_err() {
        self.send_error(&welcome_node_public_key, ErrorReason::NetworkIssue, &transaction.address).await;
        return;
      }
      self.acknowledge_welcome_node(&transaction.address, &welcome_node_public_key).await;
      return;
    }

    let needed = ceil_two_thirds(chain_targets.len());
    let (chain_acks, _other_acks) = futures::future::join(
      futures::future::join_all(
        chain_targets
          .into_iter()
          .map(|(node, msg)| async move { self.network.send_message(&node, msg, self.timeouts.replication).await }),
      ),
      futures::future::join_all(
        other_targets
          .into_iter()
          .map(|(node, msg)| async move { self.network.send_message(&node, msg, self.timeouts.replication).await }),
      ),
    )
    .await;
    let received = chain_acks.into_iter().filter(|r| matches!(r, Ok(WireMessage::AcknowledgeStorage { .. }))).count();

    if received < needed {
      tracing::warn!(
        address = %transaction.address.to_b58(),
        received,
        needed,
        error = %Error::ReplicationTimeout,
        "replication quorum not reached before deadline"
      );
      self.send_error(&welcome_node_public_key, ErrorReason::NetworkIssue, &transaction.address).await;
      return;
    }

    self.acknowledge_welcome_node(&transaction.address, &welcome_node_public_key).await;
  }

  async fn acknowledge_welcome_node(&self, address: &Address, welcome_node_public_key: &PublicKey) {
    let signature = self.keystore.sign_with_node_key(address.to_b58().as_bytes());
    self
      .network
      .send_message(
        welcome_node_public_key,
        WireMessage::AcknowledgeStorage { address: address.clone(), node_public_key: self.public_key, signature },
        self.timeouts.message,
      )
      .await
      .ok();
  }
}
