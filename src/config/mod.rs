//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, or defaults)
//!     → loader.rs (environment overrides, e.g. ETHERSCAN_API_KEY)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → explorer clients built from their section
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - No API key default lives here; the binary supplies the placeholder

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve_config, ConfigError};
pub use schema::AppConfig;
pub use schema::BitcoinConfig;
pub use schema::EthereumConfig;
pub use schema::ObservabilityConfig;
