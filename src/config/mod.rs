//! Pipeline configuration.
//!
//! # Data Flow
//! ```text
//! TOML text or file
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → handed to App::with_config
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so an empty document is a valid config
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{from_toml_str, load_config, ConfigError};
pub use schema::AppConfig;
pub use validation::ValidationError;
