use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use switchyard_dns_application::{BuildRuleTableUseCase, ResolveQueryUseCase};
use switchyard_dns_domain::{CliOverrides, Config};
use switchyard_dns_infrastructure::{ConfigWatcher, DnsServer, ForwardingHostResolver, UdpForwarder};
use tracing::info;

/// Wires the ports to their adapters and builds the server. The initial
/// rule table build happens here and is fatal on failure; everything after
/// startup reloads fail-soft through the watcher.
pub struct Services {
    pub server: DnsServer,
}

impl Services {
    pub async fn build(
        config: &Config,
        config_path: String,
        overrides: CliOverrides,
    ) -> anyhow::Result<Self> {
        let upstream_timeout = Duration::from_secs(config.server.query_timeout);

        let forwarder = Arc::new(UdpForwarder::new());
        let host_resolver = Arc::new(ForwardingHostResolver::new(
            forwarder.clone(),
            upstream_timeout,
        ));
        let builder = BuildRuleTableUseCase::new(host_resolver);

        let table = builder.execute(config).await?;
        info!(rules = table.rule_count(), "Routing table ready");

        let watcher = Arc::new(ConfigWatcher::new(config_path, overrides, builder, table));
        let resolver = Arc::new(ResolveQueryUseCase::new(forwarder, upstream_timeout));

        let bind_addr: SocketAddr =
            format!("{}:{}", config.server.bind_address, config.server.port).parse()?;
        let server = DnsServer::bind(bind_addr, resolver, watcher).await?;

        Ok(Self { server })
    }
}
