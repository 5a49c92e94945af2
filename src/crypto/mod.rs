//! Curve25519 key material for tunnel interfaces.
//!
//! # Responsibilities
//! - Decode and encode 32-byte keys in their 44-character base64 form
//! - Generate clamped private keys from the OS CSPRNG
//! - Derive the public half of a key pair from its private key
//!
//! # Design Decisions
//! - A `KeyPair` can only be built from a private key, so both halves always agree
//! - Key bytes never appear in `Debug` output
//! - Comparison runs in constant time

pub mod key;

pub use key::{Key, KeyFormatError, KeyPair, KEY_LENGTH, KEY_LENGTH_BASE64};
