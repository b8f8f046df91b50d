//! The node binary's real `NetworkClient`: one TCP connection per
//! request, each message length-prefixed and `borsh`-encoded per §6
//! ("each message is length-prefixed and type-tagged"). Peer addresses
//! are resolved from the roster's own `Node::ip`/`Node::port` fields
//! rather than a separate registry, so a roster update (a replicated
//! `node` transaction) is automatically reflected in where the next
//! message is dialed.

use super::{Envelope, NetworkClient, NetworkError, WireMessage};
use crate::primitives::PublicKey;
use crate::roster::Roster;
use async_trait::async_trait;
use borsh::BorshDeserialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::{mpsc, oneshot};

async fn write_frame(stream: &mut TcpStream, bytes: &[u8]) -> std::io::Result<()> {
  stream.write_u32(bytes.len() as u32).await?;
  stream.write_all(bytes).await
}

async fn read_frame(stream: &mut TcpStream) -> std::io::Result<Vec<u8>> {
  let len = stream.read_u32().await?;
  let mut buf = vec![0u8; len as usize];
  stream.read_exact(&mut buf).await?;
  Ok(buf)
}

async fn round_trip(addr: SocketAddr, msg: &WireMessage) -> Result<WireMessage, NetworkError> {
  let unreachable = || NetworkError::Unreachable(addr.to_string());
  let mut stream = TcpStream::connect(addr).await.map_err(|_| unreachable())?;
  let bytes = borsh::to_vec(msg).map_err(|_| unreachable())?;
  write_frame(&mut stream, &bytes).await.map_err(|_| unreachable())?;
  let reply_bytes = read_frame(&mut stream).await.map_err(|_| unreachable())?;
  WireMessage::try_from_slice(&reply_bytes).map_err(|_| unreachable())
}

#[derive(Clone)]
pub struct TcpNetworkClient {
  self_key: PublicKey,
  roster: Arc<Roster>,
}

impl TcpNetworkClient {
  pub fn new(self_key: PublicKey, roster: Arc<Roster>) -> Self {
    Self { self_key, roster }
  }

  fn resolve(&self, node: &PublicKey) -> Option<SocketAddr> {
    let snapshot = self.roster.snapshot();
    snapshot
      .authorized
      .iter()
      .chain(snapshot.renewal_candidates.iter())
      .find(|n| n.public_key == *node)
      .map(|n| SocketAddr::new(n.ip, n.port))
  }

  /// Accepts connections on `listener` forever. Each connection carries
  /// exactly one request: decode it, hand it to `inbox_tx` as an
  /// `Envelope`, and write back whatever the workflow replies with
  /// before `reply_timeout` elapses (an untimely reply is reported as
  /// `WireMessage::Ack` so the caller's own request timeout, not this
  /// one, is what governs retry behavior).
  pub async fn serve(&self, listener: TcpListener, inbox_tx: mpsc::UnboundedSender<Envelope>, reply_timeout: Duration) {
    loop {
      let (stream, peer_addr) = match listener.accept().await {
        Ok(pair) => pair,
        Err(error) => {
          tracing::warn!(%error, "tcp accept failed");
          continue;
        }
      };
      let inbox_tx = inbox_tx.clone();
      tokio::spawn(Self::handle_connection(stream, peer_addr, self.self_key, inbox_tx, reply_timeout));
    }
  }

  async fn handle_connection(
    mut stream: TcpStream,
    peer_addr: SocketAddr,
    self_key: PublicKey,
    inbox_tx: mpsc::UnboundedSender<Envelope>,
    reply_timeout: Duration,
  ) {
    let bytes = match read_frame(&mut stream).await {
      Ok(bytes) => bytes,
      Err(error) => {
        tracing::debug!(%peer_addr, %error, "failed to read request frame");
        return;
      }
    };
    let message = match WireMessage::try_from_slice(&bytes) {
      Ok(message) => message,
      Err(error) => {
        tracing::debug!(%peer_addr, %error, "failed to decode wire message");
        return;
      }
    };
    let (reply_tx, reply_rx) = oneshot::channel();
    if inbox_tx.send(Envelope { from: self_key, message, reply: Some(reply_tx) }).is_err() {
      return;
    }
    let reply = tokio::time::timeout(reply_timeout, reply_rx).await.ok().and_then(|r| r.ok()).unwrap_or(WireMessage::Ack);
    if let Ok(bytes) = borsh::to_vec(&reply) {
      let _ = write_frame(&mut stream, &bytes).await;
    }
  }
}

#[async_trait]
impl NetworkClient for TcpNetworkClient {
  async fn send_message(&self, node: &PublicKey, msg: WireMessage, timeout: Duration) -> Result<WireMessage, NetworkError> {
    let addr = self.resolve(node).ok_or_else(|| NetworkError::Unreachable(node.to_b58()))?;
    tokio::time::timeout(timeout, round_trip(addr, &msg))
      .await
      .map_err(|_| NetworkError::Timeout(node.to_b58()))?
  }

  async fn broadcast_message(&self, nodes: &[PublicKey], msg: WireMessage) {
    let targets: Vec<SocketAddr> = nodes.iter().filter_map(|n| self.resolve(n)).collect();
    let sends = targets.into_iter().map(|addr| {
      let msg = msg.clone();
      async move {
        let _ = round_trip(addr, &msg).await;
      }
    });
    futures::future::join_all(sends).await;
  }
}
