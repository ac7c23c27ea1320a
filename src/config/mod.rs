//! Layered configuration.

mod loader;

pub use loader::{AuditConfig, Config, ConfigError, ProviderConfig};
