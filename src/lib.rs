//! Staged editing of WireGuard / AmneziaWG interface configuration.
//!
//! # Architecture Overview
//!
//! ```text
//!   editor / CLI / draft file
//!             │  free-form text, one field at a time
//!             ▼
//!   ┌─────────────────────────┐  change events  ┌───────────┐
//!   │ staging::InterfaceProxy │ ──────────────▶ │ observers │
//!   └────────────┬────────────┘                 └───────────┘
//!        resolve │        ▲ from_interface
//!                ▼        │
//!   ┌─────────────────────┴───┐
//!   │ interface::Interface    │ ◀── InterfaceBuilder
//!   └────────────┬────────────┘
//!                │ keys
//!                ▼
//!   ┌─────────────────────────┐
//!   │ crypto (x25519)         │
//!   └─────────────────────────┘
//!
//!   Cross-cutting: config (TOML), observability (tracing)
//! ```

// Core subsystems
pub mod crypto;
pub mod interface;
pub mod staging;

// Cross-cutting concerns
pub mod config;
pub mod observability;

pub use crypto::{Key, KeyPair};
pub use interface::{BadConfigError, Interface, InterfaceBuilder};
pub use staging::{InterfaceProxy, Property};
