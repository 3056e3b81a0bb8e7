pub mod host_resolver;
pub mod upstream_forwarder;

pub use host_resolver::HostResolver;
pub use upstream_forwarder::UpstreamForwarder;
