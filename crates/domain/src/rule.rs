use fancy_regex::Regex;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

/// A compiled rule key. Matching tries exact equality against the raw key
/// first, then an unanchored pattern search anywhere in the name. Keys that
/// failed to compile as a pattern stay usable as exact matchers.
#[derive(Debug)]
pub struct RuleMatcher {
    key: Arc<str>,
    pattern: Option<Regex>,
}

impl RuleMatcher {
    pub fn compile(key: &str) -> Result<Self, String> {
        let pattern = Regex::new(key).map_err(|e| e.to_string())?;
        Ok(Self {
            key: key.into(),
            pattern: Some(pattern),
        })
    }

    pub fn exact(key: &str) -> Self {
        Self {
            key: key.into(),
            pattern: None,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn matches(&self, domain: &str) -> bool {
        if self.key.as_ref() == domain {
            return true;
        }
        match &self.pattern {
            Some(pattern) => pattern.is_match(domain).unwrap_or(false),
            None => false,
        }
    }
}

/// What a matched rule does with the query. Decided once at load time,
/// never re-inferred per lookup.
#[derive(Debug, Clone)]
pub enum RuleAction {
    StaticAnswer(Ipv4Addr),
    Forward(Arc<[SocketAddr]>),
}

#[derive(Debug)]
pub struct Rule {
    pub matcher: RuleMatcher,
    pub action: RuleAction,
}

impl Rule {
    pub fn new(matcher: RuleMatcher, action: RuleAction) -> Self {
        Self { matcher, action }
    }
}
