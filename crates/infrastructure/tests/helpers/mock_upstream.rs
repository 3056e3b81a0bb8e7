#![allow(dead_code)]
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

/// A scripted upstream nameserver on 127.0.0.1. Either answers every query
/// with a single A record, or swallows everything (for timeout paths).
pub struct MockUpstream {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockUpstream {
    pub async fn answering(address: Ipv4Addr) -> std::io::Result<Self> {
        Self::start(Some(address)).await
    }

    pub async fn silent() -> std::io::Result<Self> {
        Self::start(None).await
    }

    async fn start(answer: Option<Ipv4Addr>) -> std::io::Result<Self> {
        let socket = UdpSocket::bind((Ipv4Addr::LOCALHOST, 0)).await?;
        let addr = socket.local_addr()?;
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_task = hits.clone();
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = socket.recv_from(&mut buf) => {
                        let Ok((len, peer)) = result else { break };
                        hits_task.fetch_add(1, Ordering::SeqCst);
                        if let Some(address) = answer {
                            let response = build_response(&buf[..len], address);
                            let _ = socket.send_to(&response, peer).await;
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            hits,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Number of queries this upstream has received.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

/// Echoes the query id and question, then appends one A record whose name
/// is a compression pointer to the question — the shape real resolvers
/// send back.
fn build_response(query: &[u8], address: Ipv4Addr) -> Vec<u8> {
    if query.len() < 12 {
        return Vec::new();
    }

    let mut response = Vec::with_capacity(512);
    response.extend_from_slice(&query[0..2]);
    response.push(0x81); // QR + RD
    response.push(0x80); // RA
    response.extend_from_slice(&query[4..6]);
    response.extend_from_slice(&[0x00, 0x01]); // ancount
    response.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
    response.extend_from_slice(&query[12..]);
    response.extend_from_slice(&[0xC0, 0x0C]);
    response.extend_from_slice(&[0x00, 0x01, 0x00, 0x01]);
    response.extend_from_slice(&[0x00, 0x00, 0x00, 0x3C]);
    response.extend_from_slice(&[0x00, 0x04]);
    response.extend_from_slice(&address.octets());
    response
}
