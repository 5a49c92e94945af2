//! Tool configuration and interface drafts.
//!
//! # Data Flow
//! ```text
//! tool config (TOML)
//!     → loader.rs (read & deserialize)
//!     → validation.rs (semantic checks)
//!     → ToolConfig (validated, immutable)
//!
//! interface draft (TOML)
//!     → draft.rs (read & deserialize, no validation)
//!     → InterfaceProxy (staged text)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults to allow minimal files
//! - Validation separates syntactic (serde) from semantic checks
//! - Drafts are never validated here; that is what resolving a proxy is for

pub mod draft;
pub mod loader;
pub mod schema;
pub mod validation;

pub use draft::{load_draft, InterfaceDraft};
pub use loader::{load_config, ConfigError};
pub use schema::{LogFormat, ObservabilityConfig, ToolConfig};
pub use validation::ValidationError;
