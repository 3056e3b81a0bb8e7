//! Switchyard DNS application layer
pub mod ports;
pub mod use_cases;

pub use ports::{HostResolver, UpstreamForwarder};
pub use use_cases::{BuildRuleTableUseCase, Resolution, ResolveQueryUseCase, STATIC_ANSWER_TTL};
