use async_trait::async_trait;
use std::net::{Ipv4Addr, SocketAddr};
use switchyard_dns_domain::DomainError;

/// Resolves a nameserver hostname to an IPv4 address by asking the given
/// servers. Runs once per hostname at config load, never per query.
#[async_trait]
pub trait HostResolver: Send + Sync {
    async fn resolve_ipv4(
        &self,
        hostname: &str,
        via: &[SocketAddr],
    ) -> Result<Ipv4Addr, DomainError>;
}
