//! Editable, observable staging area for interface configuration.
//!
//! # Responsibilities
//! - Hold every interface attribute as free-form text while it is being edited
//! - Tell observers which field changed, synchronously and in mutation order
//! - Convert to and from a validated [`Interface`](crate::interface::Interface)
//! - Move a staging record across a process boundary as flat bytes
//!
//! # Data Flow
//! ```text
//! Interface ──from_interface──▶ InterfaceProxy ──resolve──▶ InterfaceBuilder ──▶ Interface
//!                                  │    ▲
//!                          to_bytes│    │from_bytes
//!                                  ▼    │
//!                               parcel bytes
//! ```

pub mod observable;
pub mod parcel;
pub mod proxy;

pub use observable::{Property, PropertyChangeRegistry, SubscriptionId};
pub use parcel::{ParcelError, ParcelResult};
pub use proxy::{InterfaceProxy, PARCEL_VERSION};
