//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields, never key material)
//!
//! Consumers:
//!     → logging.rs (fmt layer on stderr, filtered by level)
//! ```
//!
//! # Design Decisions
//! - stdout stays free for command output; logs go to stderr
//! - `RUST_LOG` overrides the configured level

pub mod logging;

pub use logging::init_logging;
