//! The P2P transport collaborator (§6): `send_message` / `broadcast_message`
//! / `quorum_read`, narrowed to the mining subset of wire messages.
//! [`tcp::TcpNetworkClient`] is the transport the node binary runs over
//! the wire with; [`memory::InMemoryNetwork`] is the in-process fake the
//! test suite drives instead. The real libp2p gossip transport is out
//! of scope (§1 Non-goals) — both implementations here are unicast
//! request/reply plus fire-and-forget broadcast, keyed by the same
//! trait a fuller transport would implement.

pub mod memory;
pub mod message;
pub mod tcp;

pub use message::{ErrorReason, WireMessage};

use crate::primitives::PublicKey;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NetworkError {
  #[error("peer {0} is unreachable")]
  Unreachable(String),
  #[error("request to {0} timed out")]
  Timeout(String),
  #[error("no quorum reached among {0} queried nodes")]
  NoQuorum(usize),
}

/// A message delivered to a node's inbox, optionally carrying a channel
/// the receiver can reply on (present for `send_message`, absent for
/// `broadcast_message`). Transport-agnostic: both [`memory`] and [`tcp`]
/// feed the same inbox shape into [`crate::mining::MiningNode::run`].
pub struct Envelope {
  pub from: PublicKey,
  pub message: WireMessage,
  pub reply: Option<oneshot::Sender<WireMessage>>,
}

pub type Inbox = mpsc::UnboundedReceiver<Envelope>;

/// The narrow P2P contract mining depends on. `send_message` is a
/// unicast request/reply with an explicit timeout; `broadcast_message`
/// is fire-and-forget to many peers (the caller doesn't block on
/// delivery, matching the "non-blocking send+await-reply" model of §5);
/// `quorum_read` queries many peers in parallel and folds the first
/// majority-class set of replies through a caller-provided resolver.
#[async_trait]
pub trait NetworkClient: Send + Sync {
  async fn send_message(
    &self,
    node: &PublicKey,
    msg: WireMessage,
    timeout: Duration,
  ) -> Result<WireMessage, NetworkError>;

  async fn broadcast_message(&self, nodes: &[PublicKey], msg: WireMessage);
}

/// Queries `nodes` in parallel for `msg`, and once `ceil(n/2)+1` replies
/// of the expected class have arrived, folds them through `resolve` (a
/// caller-supplied tie-breaker, e.g. newest timestamp or longest chain).
/// Outstanding requests beyond quorum are simply left to finish and are
/// dropped by the caller: the in-memory transport cancels nothing
/// explicitly, but nothing here awaits them either.
pub async fn quorum_read(
  client: &(dyn NetworkClient + Sync),
  nodes: &[PublicKey],
  msg: WireMessage,
  timeout: Duration,
  resolve: impl Fn(Vec<WireMessage>) -> WireMessage,
) -> Result<WireMessage, NetworkError> {
  let quorum = nodes.len() / 2 + 1;
  let mut futures: futures::stream::FuturesUnordered<_> = nodes
    .iter()
    .map(|node| {
      let msg = msg.clone();
      async move { client.send_message(node, msg, timeout).await }
    })
    .collect();

  let mut replies = Vec::with_capacity(nodes.len());
  use futures::StreamExt;
  while let Some(result) = futures.next().await {
    if let Ok(reply) = result {
      replies.push(reply);
      if replies.len() >= quorum {
        break;
      }
    }
  }
  if replies.len() < quorum {
    return Err(NetworkError::NoQuorum(nodes.len()));
  }
  Ok(resolve(replies))
}
