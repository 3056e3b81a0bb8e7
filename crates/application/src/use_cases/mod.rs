pub mod build_rule_table;
pub mod resolve_query;

pub use build_rule_table::BuildRuleTableUseCase;
pub use resolve_query::{Resolution, ResolveQueryUseCase, STATIC_ANSWER_TTL};
