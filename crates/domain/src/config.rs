pub mod errors;
pub mod load;
pub mod logging;
pub mod resolver;
pub mod root;
pub mod target;

pub use errors::ConfigError;
pub use load::LoadConfig;
pub use logging::LoggingConfig;
pub use resolver::{ResolverConfig, ResolverSettings};
pub use root::{CliOverrides, Config};
pub use target::TargetConfig;
