//! X25519 keys and key pairs.

use base64::engine::general_purpose::STANDARD as BASE64_STD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;
use x25519_dalek::{PublicKey as X25519Public, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of a raw key in bytes.
pub const KEY_LENGTH: usize = 32;

/// Length of a key in padded base64.
pub const KEY_LENGTH_BASE64: usize = 44;

/// Errors produced when decoding key text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyFormatError {
    /// Input (or its decoded form) has the wrong length.
    #[error("key must be 44 base64 characters encoding 32 bytes, got {actual} characters")]
    Length { actual: usize },

    /// Input is well-formed base64 of the right length but does not decode to 32 bytes.
    #[error("key must decode to 32 bytes, got {actual} bytes")]
    DecodedLength { actual: usize },

    /// Input has the right length but is not canonical base64.
    #[error("key is not valid base64")]
    Contents,
}

/// A 32-byte Curve25519 key, private or public.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Key {
    bytes: [u8; KEY_LENGTH],
}

impl Key {
    /// Create from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { bytes }
    }

    /// Decode a key from its padded base64 text.
    pub fn from_base64(text: &str) -> Result<Self, KeyFormatError> {
        if text.len() != KEY_LENGTH_BASE64 || !text.ends_with('=') {
            return Err(KeyFormatError::Length { actual: text.len() });
        }

        let mut decoded = BASE64_STD
            .decode(text.as_bytes())
            .map_err(|_| KeyFormatError::Contents)?;
        if decoded.len() != KEY_LENGTH {
            let actual = decoded.len();
            decoded.zeroize();
            return Err(KeyFormatError::DecodedLength { actual });
        }

        let mut bytes = [0u8; KEY_LENGTH];
        bytes.copy_from_slice(&decoded);
        decoded.zeroize();
        Ok(Self { bytes })
    }

    /// Generate a new private key.
    ///
    /// The random bytes are clamped the same way `wg genkey` clamps them.
    pub fn generate_private_key() -> Self {
        let mut bytes = [0u8; KEY_LENGTH];
        OsRng.fill_bytes(&mut bytes);
        bytes[0] &= 248;
        bytes[31] &= 127;
        bytes[31] |= 64;
        Self { bytes }
    }

    /// Derive the public key paired with `private_key`.
    pub fn generate_public_key(private_key: &Key) -> Self {
        let secret = StaticSecret::from(private_key.bytes);
        let public = X25519Public::from(&secret);
        Self {
            bytes: public.to_bytes(),
        }
    }

    /// Get raw bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.bytes
    }

    /// Encode as padded base64.
    pub fn to_base64(&self) -> String {
        BASE64_STD.encode(self.bytes)
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.bytes
            .iter()
            .zip(other.bytes.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

impl Eq for Key {}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Key(..)")
    }
}

/// A private key together with its derived public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPair {
    private_key: Key,
    public_key: Key,
}

impl KeyPair {
    /// Generate a fresh random key pair.
    pub fn generate() -> Self {
        Self::from_private_key(Key::generate_private_key())
    }

    /// Create from an existing private key.
    pub fn from_private_key(private_key: Key) -> Self {
        let public_key = Key::generate_public_key(&private_key);
        Self {
            private_key,
            public_key,
        }
    }

    pub fn private_key(&self) -> &Key {
        &self.private_key
    }

    pub fn public_key(&self) -> &Key {
        &self.public_key
    }
}
