use crate::rule::{Rule, RuleAction};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

/// Where a query should go: a locally fabricated answer, or a list of
/// upstream servers to try in order.
#[derive(Debug, Clone)]
pub struct RouteDecision {
    pub answer: Option<Ipv4Addr>,
    pub upstreams: Arc<[SocketAddr]>,
}

/// The routing table built from one config snapshot. Rules keep their
/// configured order and the first match wins; the default upstream list
/// never participates in matching.
#[derive(Debug)]
pub struct RuleTable {
    rules: Vec<Rule>,
    default_upstreams: Arc<[SocketAddr]>,
}

impl RuleTable {
    pub fn new(rules: Vec<Rule>, default_upstreams: Arc<[SocketAddr]>) -> Self {
        Self {
            rules,
            default_upstreams,
        }
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn default_upstreams(&self) -> Arc<[SocketAddr]> {
        self.default_upstreams.clone()
    }

    /// Routes a query name. A single trailing dot is ignored so absolute
    /// and relative spellings of the same name route identically.
    pub fn lookup(&self, domain: &str) -> RouteDecision {
        let name = domain.strip_suffix('.').unwrap_or(domain);
        for rule in &self.rules {
            if rule.matcher.matches(name) {
                return match &rule.action {
                    RuleAction::StaticAnswer(address) => RouteDecision {
                        answer: Some(*address),
                        upstreams: self.default_upstreams.clone(),
                    },
                    RuleAction::Forward(upstreams) => RouteDecision {
                        answer: None,
                        upstreams: upstreams.clone(),
                    },
                };
            }
        }
        RouteDecision {
            answer: None,
            upstreams: self.default_upstreams.clone(),
        }
    }
}
