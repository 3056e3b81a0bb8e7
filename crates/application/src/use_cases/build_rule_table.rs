use crate::ports::HostResolver;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use switchyard_dns_domain::{
    Config, ConfigError, Rule, RuleAction, RuleMatcher, RuleSet, RuleTable, RuleValue,
    UpstreamAddr,
};
use tracing::{debug, warn};

/// Turns a parsed config into a routing table. Hostname entries in forward
/// lists resolve here, one by one, through the default upstreams.
pub struct BuildRuleTableUseCase {
    resolver: Arc<dyn HostResolver>,
}

impl BuildRuleTableUseCase {
    pub fn new(resolver: Arc<dyn HostResolver>) -> Self {
        Self { resolver }
    }

    pub async fn execute(&self, config: &Config) -> Result<RuleTable, ConfigError> {
        let default_upstreams = default_upstreams(&config.rules)?;

        let mut rules = Vec::new();
        for (key, value) in config.rules.routes() {
            let matcher = match RuleMatcher::compile(key) {
                Ok(matcher) => matcher,
                Err(error) => {
                    warn!(
                        rule = key,
                        error = %error,
                        "Rule key is not a valid pattern, matching it verbatim only"
                    );
                    RuleMatcher::exact(key)
                }
            };

            let action = match value {
                RuleValue::Address(address) => {
                    let address = address.parse().map_err(|_| {
                        ConfigError::Validation(format!(
                            "rule '{}' has invalid address '{}'",
                            key, address
                        ))
                    })?;
                    RuleAction::StaticAnswer(address)
                }
                RuleValue::Nameservers(entries) => {
                    let upstreams = self
                        .resolve_upstreams(key, entries, &default_upstreams)
                        .await?;
                    RuleAction::Forward(upstreams)
                }
            };

            rules.push(Rule::new(matcher, action));
        }

        debug!(rules = rules.len(), "Compiled routing table");
        Ok(RuleTable::new(rules, default_upstreams))
    }

    async fn resolve_upstreams(
        &self,
        rule: &str,
        entries: &[String],
        default_upstreams: &[SocketAddr],
    ) -> Result<Arc<[SocketAddr]>, ConfigError> {
        if entries.is_empty() {
            return Err(ConfigError::Validation(format!(
                "rule '{}' has an empty nameserver list",
                rule
            )));
        }

        let mut upstreams = Vec::with_capacity(entries.len());
        for entry in entries {
            let addr = entry
                .parse::<UpstreamAddr>()
                .map_err(|e| ConfigError::Validation(format!("rule '{}': {}", rule, e)))?;
            let socket = match addr {
                UpstreamAddr::Resolved(socket) => socket,
                UpstreamAddr::Unresolved { hostname, port } => {
                    let address = self
                        .resolver
                        .resolve_ipv4(&hostname, default_upstreams)
                        .await
                        .map_err(|e| {
                            ConfigError::Validation(format!(
                                "rule '{}': cannot resolve nameserver '{}': {}",
                                rule, hostname, e
                            ))
                        })?;
                    debug!(
                        rule = rule,
                        hostname = %hostname,
                        address = %address,
                        "Resolved nameserver hostname"
                    );
                    SocketAddr::new(IpAddr::V4(address), port)
                }
            };
            upstreams.push(socket);
        }

        Ok(upstreams.into())
    }
}

fn default_upstreams(rules: &RuleSet) -> Result<Arc<[SocketAddr]>, ConfigError> {
    let default = rules.default_entry().ok_or_else(|| {
        ConfigError::Validation("rules must define a 'default' nameserver list".to_string())
    })?;

    let entries = match default {
        RuleValue::Nameservers(entries) if !entries.is_empty() => entries,
        _ => {
            return Err(ConfigError::Validation(
                "'default' must be a non-empty list of nameservers".to_string(),
            ))
        }
    };

    entries
        .iter()
        .map(|entry| {
            entry
                .parse::<UpstreamAddr>()
                .ok()
                .and_then(|addr| addr.socket_addr())
                .ok_or_else(|| {
                    ConfigError::Validation(format!(
                        "bad default nameserver '{}': must be a literal IP address",
                        entry
                    ))
                })
        })
        .collect()
}
