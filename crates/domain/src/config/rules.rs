use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::net::Ipv4Addr;

use super::errors::ConfigError;
use crate::dns_protocol::UpstreamAddr;

/// A rule value as written in the config file: a single IPv4 string is a
/// static answer, a list of nameservers is a forward route.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RuleValue {
    Address(String),
    Nameservers(Vec<String>),
}

/// Routing rules in document order. File order is match order, which rules
/// out the usual map types; entries live in a plain vector instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    entries: Vec<(String, RuleValue)>,
}

impl RuleSet {
    pub const DEFAULT_KEY: &'static str = "default";

    pub fn from_entries(entries: Vec<(String, RuleValue)>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Every entry except `default`, in match order.
    pub fn routes(&self) -> impl Iterator<Item = (&str, &RuleValue)> {
        self.entries
            .iter()
            .filter(|(key, _)| key != Self::DEFAULT_KEY)
            .map(|(key, value)| (key.as_str(), value))
    }

    pub fn default_entry(&self) -> Option<&RuleValue> {
        self.entries
            .iter()
            .find(|(key, _)| key == Self::DEFAULT_KEY)
            .map(|(_, value)| value)
    }

    /// Replaces the `default` upstream list, appending one if the file had
    /// none. Used for command-line overrides.
    pub fn set_default(&mut self, nameservers: Vec<String>) {
        let value = RuleValue::Nameservers(nameservers);
        match self
            .entries
            .iter_mut()
            .find(|(key, _)| key == Self::DEFAULT_KEY)
        {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((Self::DEFAULT_KEY.to_string(), value)),
        }
    }

    /// Structural checks that need no network: `default` must exist as a
    /// non-empty list of literal addresses, static answers must be IPv4,
    /// and forward lists must be non-empty with parseable entries.
    /// Hostname entries in non-default lists are resolved later.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let default = self.default_entry().ok_or_else(|| {
            ConfigError::Validation("rules must define a 'default' nameserver list".to_string())
        })?;

        match default {
            RuleValue::Address(_) => {
                return Err(ConfigError::Validation(
                    "'default' must be a list of nameservers, not a single address".to_string(),
                ));
            }
            RuleValue::Nameservers(list) => {
                if list.is_empty() {
                    return Err(ConfigError::Validation(
                        "'default' nameserver list cannot be empty".to_string(),
                    ));
                }
                for entry in list {
                    let addr = entry.parse::<UpstreamAddr>().map_err(|e| {
                        ConfigError::Validation(format!("bad default nameserver: {}", e))
                    })?;
                    if addr.is_unresolved() {
                        return Err(ConfigError::Validation(format!(
                            "bad default nameserver '{}': must be a literal IP address",
                            entry
                        )));
                    }
                }
            }
        }

        for (key, value) in self.routes() {
            match value {
                RuleValue::Address(address) => {
                    if address.parse::<Ipv4Addr>().is_err() {
                        return Err(ConfigError::Validation(format!(
                            "rule '{}' has invalid address '{}'",
                            key, address
                        )));
                    }
                }
                RuleValue::Nameservers(list) => {
                    if list.is_empty() {
                        return Err(ConfigError::Validation(format!(
                            "rule '{}' has an empty nameserver list",
                            key
                        )));
                    }
                    for entry in list {
                        entry.parse::<UpstreamAddr>().map_err(|e| {
                            ConfigError::Validation(format!("rule '{}': {}", key, e))
                        })?;
                    }
                }
            }
        }

        Ok(())
    }
}

impl<'de> Deserialize<'de> for RuleSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RuleSetVisitor;

        impl<'de> Visitor<'de> for RuleSetVisitor {
            type Value = RuleSet;

            fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
                formatter.write_str("a table of rule entries")
            }

            fn visit_map<A>(self, mut map: A) -> Result<RuleSet, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::new();
                while let Some((key, value)) = map.next_entry::<String, RuleValue>()? {
                    entries.push((key, value));
                }
                Ok(RuleSet { entries })
            }
        }

        deserializer.deserialize_map(RuleSetVisitor)
    }
}
