//! Switchyard DNS domain layer
pub mod config;
pub mod dns_protocol;
pub mod dns_query;
pub mod dns_record;
pub mod dns_response;
pub mod errors;
pub mod rule;
pub mod rule_table;

pub use config::{CliOverrides, Config, ConfigError, RuleSet, RuleValue};
pub use dns_protocol::UpstreamAddr;
pub use dns_query::{DnsQuery, Question};
pub use dns_record::{DnsRecord, RecordType};
pub use dns_response::{DnsResponse, ResponseCode};
pub use errors::DomainError;
pub use rule::{Rule, RuleAction, RuleMatcher};
pub use rule_table::{RouteDecision, RuleTable};
