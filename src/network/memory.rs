//! An in-memory `NetworkClient`, the fake the test suite and the
//! single-process demo binary run the mining protocol against. Each
//! registered node owns an inbox; `send_message` posts an envelope with
//! a reply channel and awaits it (or the timeout), `broadcast_message`
//! posts the same envelope to every target without waiting on a reply.

use super::{Envelope, Inbox, NetworkError, NetworkClient, WireMessage};
use crate::primitives::PublicKey;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// A registry of node inboxes shared by every handle cloned from the
/// same [`InMemoryNetwork::new`] call. Registering a node returns the
/// receiving half; dropping it unregisters the node implicitly on the
/// next send (a closed channel is treated as `Unreachable`).
#[derive(Clone, Default)]
pub struct InMemoryNetwork {
  inboxes: Arc<DashMap<PublicKey, mpsc::UnboundedSender<Envelope>>>,
  self_key: Option<PublicKey>,
}

impl InMemoryNetwork {
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers `node` and returns the inbox it should poll for incoming
  /// messages, plus a handle scoped to sending *as* that node (so
  /// `Envelope::from` is always populated correctly).
  pub fn register(&self, node: PublicKey) -> (Self, Inbox) {
    let (tx, rx) = mpsc::unbounded_channel();
    self.inboxes.insert(node, tx);
    (Self { inboxes: self.inboxes.clone(), self_key: Some(node) }, rx)
  }

  pub fn unregister(&self, node: &PublicKey) {
    self.inboxes.remove(node);
  }

  fn from_key(&self) -> PublicKey {
    self.self_key.expect("InMemoryNetwork handle used to send must come from register()")
  }
}

#[async_trait]
impl NetworkClient for InMemoryNetwork {
  async fn send_message(
    &self,
    node: &PublicKey,
    msg: WireMessage,
    timeout: Duration,
  ) -> Result<WireMessage, NetworkError> {
    let sender = self
      .inboxes
      .get(node)
      .map(|e| e.value().clone())
      .ok_or_else(|| NetworkError::Unreachable(node.to_b58()))?;
    let (reply_tx, reply_rx) = oneshot::channel();
    sender
      .send(Envelope { from: self.from_key(), message: msg, reply: Some(reply_tx) })
      .map_err(|_| NetworkError::Unreachable(node.to_b58()))?;

    tokio::time::timeout(timeout, reply_rx)
      .await
      .map_err(|_| NetworkError::Timeout(node.to_b58()))?
      .map_err(|_| NetworkError::Unreachable(node.to_b58()))
  }

  async fn broadcast_message(&self, nodes: &[PublicKey], msg: WireMessage) {
    for node in nodes {
      if let Some(sender) = self.inboxes.get(node) {
        let _ = sender.send(Envelope { from: self.from_key(), message: msg.clone(), reply: None });
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::primitives::{Keypair, OriginId};

  #[tokio::test]
  async fn send_message_round_trips_through_reply() {
    let net = InMemoryNetwork::new();
    let a = Keypair::from_seed(&[1u8; 32], OriginId::Software).public();
    let b = Keypair::from_seed(&[2u8; 32], OriginId::Software).public();
    let (net_a, _inbox_a) = net.register(a);
    let (_net_b, mut inbox_b) = net.register(b);

    tokio::spawn(async move {
      let envelope = inbox_b.recv().await.unwrap();
      if let Some(reply) = envelope.reply {
        let _ = reply.send(WireMessage::Ack);
      }
    });

    let reply = net_a.send_message(&b, WireMessage::Ack, Duration::from_secs(1)).await.unwrap();
    assert!(matches!(reply, WireMessage::Ack));
  }

  #[tokio::test]
  async fn send_to_unregistered_node_is_unreachable() {
    let net = InMemoryNetwork::new();
    let a = Keypair::from_seed(&[1u8; 32], OriginId::Software).public();
    let ghost = Keypair::from_seed(&[9u8; 32], OriginId::Software).public();
    let (net_a, _inbox_a) = net.register(a);
    let err = net_a.send_message(&ghost, WireMessage::Ack, Duration::from_millis(50)).await;
    assert!(matches!(err, Err(NetworkError::Unreachable(_))));
  }

  #[tokio::test]
  async fn send_without_a_reply_times_out() {
    let net = InMemoryNetwork::new();
    let a = Keypair::from_seed(&[1u8; 32], OriginId::Software).public();
    let b = Keypair::from_seed(&[2u8; 32], OriginId::Software).public();
    let (net_a, _inbox_a) = net.register(a);
    let (_net_b, mut inbox_b) = net.register(b);

    tokio::spawn(async move {
      let _envelope = inbox_b.recv().await.unwrap();
      // never replies
    });

    let err = net_a.send_message(&b, WireMessage::Ack, Duration::from_millis(50)).await;
    assert!(matches!(err, Err(NetworkError::Timeout(_))));
  }
}
