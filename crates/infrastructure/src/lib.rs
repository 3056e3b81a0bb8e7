//! Switchyard DNS infrastructure layer
//!
//! Adapters behind the application ports: the hand-rolled wire codec, the
//! UDP failover forwarder, the request server, and the hot-reload watcher
//! that owns the live rule table snapshot.
pub mod config_watch;
pub mod dns;

pub use config_watch::ConfigWatcher;
pub use dns::forwarder::UdpForwarder;
pub use dns::host_resolver::ForwardingHostResolver;
pub use dns::server::DnsServer;
