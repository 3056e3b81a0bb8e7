use async_trait::async_trait;
use std::net::SocketAddr;
use std::time::Duration;
use switchyard_dns_domain::DomainError;

/// Sends an already-encoded query to upstream servers, trying each address
/// in order with a bounded wait, and returns the first raw response.
#[async_trait]
pub trait UpstreamForwarder: Send + Sync {
    async fn forward(
        &self,
        query_bytes: &[u8],
        upstreams: &[SocketAddr],
        timeout: Duration,
    ) -> Result<Vec<u8>, DomainError>;
}
