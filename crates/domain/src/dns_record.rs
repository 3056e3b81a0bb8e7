pub mod record_type;

pub use record_type::RecordType;

use std::net::Ipv4Addr;
use std::sync::Arc;

/// An answer record this server builds itself. Only IPv4 address records
/// are ever fabricated locally; everything else is relayed from upstreams.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    pub name: Arc<str>,
    pub record_type: RecordType,
    pub class: u16,
    pub ttl: u32,
    pub address: Ipv4Addr,
}

impl DnsRecord {
    pub fn new(
        name: impl Into<Arc<str>>,
        record_type: RecordType,
        class: u16,
        ttl: u32,
        address: Ipv4Addr,
    ) -> Self {
        Self {
            name: name.into(),
            record_type,
            class,
            ttl,
            address,
        }
    }
}
