pub mod errors;
pub mod logging;
pub mod root;
pub mod rules;
pub mod server;

pub use errors::ConfigError;
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use rules::{RuleSet, RuleValue};
pub use server::ServerConfig;
