use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use switchyard_dns_application::ports::UpstreamForwarder;
use switchyard_dns_domain::DomainError;
use tokio::net::UdpSocket;
use tracing::{debug, warn};

/// Largest upstream response this forwarder will accept.
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

/// UDP failover forwarder. Tries each upstream in configured order with a
/// bounded wait; the first response wins. Every attempt uses a fresh
/// ephemeral socket so stray late answers from a slow server cannot be
/// mistaken for the next query's response.
pub struct UdpForwarder;

impl UdpForwarder {
    pub fn new() -> Self {
        Self
    }

    async fn query_one(
        &self,
        query_bytes: &[u8],
        server: SocketAddr,
        timeout: Duration,
    ) -> Result<Vec<u8>, DomainError> {
        let bind_addr: SocketAddr = if server.is_ipv4() {
            (std::net::Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (std::net::Ipv6Addr::UNSPECIFIED, 0).into()
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| DomainError::IoError(format!("failed to bind UDP socket: {}", e)))?;

        tokio::time::timeout(timeout, socket.send_to(query_bytes, server))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: server.to_string(),
            })?
            .map_err(|e| {
                DomainError::IoError(format!("failed to send query to {}: {}", server, e))
            })?;

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let (received, from) = tokio::time::timeout(timeout, socket.recv_from(&mut recv_buf))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: server.to_string(),
            })?
            .map_err(|e| {
                DomainError::IoError(format!("failed to receive from {}: {}", server, e))
            })?;

        if from.ip() != server.ip() {
            warn!(expected = %server, received_from = %from, "Response from unexpected source");
        }

        recv_buf.truncate(received);
        debug!(server = %server, bytes = received, "Upstream responded");
        Ok(recv_buf)
    }
}

impl Default for UdpForwarder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UpstreamForwarder for UdpForwarder {
    async fn forward(
        &self,
        query_bytes: &[u8],
        upstreams: &[SocketAddr],
        timeout: Duration,
    ) -> Result<Vec<u8>, DomainError> {
        for (position, server) in upstreams.iter().enumerate() {
            match self.query_one(query_bytes, *server, timeout).await {
                Ok(bytes) => return Ok(bytes),
                Err(error) => {
                    warn!(server = %server, position, error = %error, "Failing over");
                }
            }
        }
        Err(DomainError::UpstreamUnavailable)
    }
}
