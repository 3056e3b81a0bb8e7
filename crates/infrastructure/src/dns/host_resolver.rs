use super::wire::{encode_query, extract_a_records, peek_id};
use async_trait::async_trait;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use switchyard_dns_application::ports::{HostResolver, UpstreamForwarder};
use switchyard_dns_domain::{DomainError, Question, RecordType};
use tracing::debug;

/// Resolves nameserver hostnames from the config by asking the default
/// upstreams directly: build an A query, forward it, scan the answer.
/// Only runs at config load, never on the per-request path.
pub struct ForwardingHostResolver {
    forwarder: Arc<dyn UpstreamForwarder>,
    timeout: Duration,
}

impl ForwardingHostResolver {
    pub fn new(forwarder: Arc<dyn UpstreamForwarder>, timeout: Duration) -> Self {
        Self { forwarder, timeout }
    }
}

#[async_trait]
impl HostResolver for ForwardingHostResolver {
    async fn resolve_ipv4(
        &self,
        hostname: &str,
        via: &[SocketAddr],
    ) -> Result<Ipv4Addr, DomainError> {
        let id = fastrand::u16(..);
        let question = Question::new(hostname, RecordType::A, 1);
        let query_bytes = encode_query(id, &question);

        let response = self
            .forwarder
            .forward(&query_bytes, via, self.timeout)
            .await
            .map_err(|e| DomainError::UnresolvableHost(format!("{}: {}", hostname, e)))?;

        if peek_id(&response) != Some(id) {
            return Err(DomainError::InvalidDnsResponse(format!(
                "response id mismatch while resolving '{}'",
                hostname
            )));
        }

        let (rcode, addresses) = extract_a_records(&response)?;
        if rcode != 0 {
            return Err(DomainError::UnresolvableHost(format!(
                "{}: upstream answered rcode {}",
                hostname, rcode
            )));
        }

        let address = addresses
            .first()
            .copied()
            .ok_or_else(|| DomainError::UnresolvableHost(hostname.to_string()))?;

        debug!(hostname, address = %address, "Resolved nameserver hostname");
        Ok(address)
    }
}
