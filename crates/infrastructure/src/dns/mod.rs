pub mod forwarder;
pub mod host_resolver;
pub mod server;
pub mod wire;
