#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use switchyard_dns_application::ports::{HostResolver, UpstreamForwarder};
use switchyard_dns_domain::DomainError;

/// Scripted forwarder that records every call it receives.
#[derive(Clone)]
pub struct MockForwarder {
    response: Arc<Mutex<Result<Vec<u8>, DomainError>>>,
    calls: Arc<Mutex<Vec<(Vec<u8>, Vec<SocketAddr>)>>>,
}

impl MockForwarder {
    pub fn new() -> Self {
        Self {
            response: Arc::new(Mutex::new(Ok(Vec::new()))),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_response(&self, bytes: Vec<u8>) {
        *self.response.lock().unwrap() = Ok(bytes);
    }

    pub fn set_error(&self, error: DomainError) {
        *self.response.lock().unwrap() = Err(error);
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_query_bytes(&self) -> Option<Vec<u8>> {
        self.calls.lock().unwrap().last().map(|(bytes, _)| bytes.clone())
    }

    pub fn last_upstreams(&self) -> Option<Vec<SocketAddr>> {
        self.calls
            .lock()
            .unwrap()
            .last()
            .map(|(_, upstreams)| upstreams.clone())
    }
}

#[async_trait]
impl UpstreamForwarder for MockForwarder {
    async fn forward(
        &self,
        query_bytes: &[u8],
        upstreams: &[SocketAddr],
        _timeout: Duration,
    ) -> Result<Vec<u8>, DomainError> {
        self.calls
            .lock()
            .unwrap()
            .push((query_bytes.to_vec(), upstreams.to_vec()));
        self.response.lock().unwrap().clone()
    }
}

/// Hostname lookup backed by a fixed map; unknown names fail to resolve.
#[derive(Clone)]
pub struct MockHostResolver {
    addresses: Arc<Mutex<HashMap<String, Ipv4Addr>>>,
    requests: Arc<Mutex<Vec<(String, Vec<SocketAddr>)>>>,
}

impl MockHostResolver {
    pub fn new() -> Self {
        Self {
            addresses: Arc::new(Mutex::new(HashMap::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_address(&self, hostname: &str, address: Ipv4Addr) {
        self.addresses
            .lock()
            .unwrap()
            .insert(hostname.to_string(), address);
    }

    pub fn requests(&self) -> Vec<(String, Vec<SocketAddr>)> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HostResolver for MockHostResolver {
    async fn resolve_ipv4(
        &self,
        hostname: &str,
        via: &[SocketAddr],
    ) -> Result<Ipv4Addr, DomainError> {
        self.requests
            .lock()
            .unwrap()
            .push((hostname.to_string(), via.to_vec()));
        self.addresses
            .lock()
            .unwrap()
            .get(hostname)
            .copied()
            .ok_or_else(|| DomainError::UnresolvableHost(hostname.to_string()))
    }
}
