//! Validated tunnel interface configuration.
//!
//! # Data Flow
//! ```text
//! attribute text (one field at a time)
//!     → builder.rs (parse_* : syntax, range, key decoding)
//!     → builder.rs (build : required fields, cross-field rules)
//!     → Interface (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Every failure is a `BadConfigError` naming the attribute and the rejected text
//! - Lists keep insertion order and drop duplicates
//! - DNS servers and search domains share one attribute and are told apart by syntax

pub mod attribute;
pub mod builder;
pub mod error;
pub mod inet;
pub mod model;

pub use builder::InterfaceBuilder;
pub use error::{BadConfigError, ConfigResult, Location, ParseError, Reason};
pub use inet::InetNetwork;
pub use model::Interface;
