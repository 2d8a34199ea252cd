//! ED25519 keys.
//!
//! Private keys are accepted as 64 hex characters or as the DER-encoded hex form
//! (`302e020100300506032b657004220420` followed by the raw key), optionally
//! prefixed with `0x`. Keys are displayed in their DER form.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Debug, Display};
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

const PRIVATE_KEY_DER_PREFIX: &str = "302e020100300506032b657004220420";
const PUBLIC_KEY_DER_PREFIX: &str = "302a300506032b6570032100";

#[derive(Debug, Clone, Error, PartialEq)]
pub enum KeyError {
    #[error("key is not valid hex: {0}")]
    Hex(String),
    #[error("expected a 32 byte ED25519 key, got {0} bytes")]
    Length(usize),
    #[error("not a valid ED25519 public key")]
    InvalidPublicKey,
}

fn decode_key_bytes(input: &str, der_prefix: &str) -> Result<[u8; 32], KeyError> {
    let trimmed = input.trim();
    let hex_str = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    let hex_str = hex_str.strip_prefix(der_prefix).unwrap_or(hex_str);
    let bytes = hex::decode(hex_str).map_err(|e| KeyError::Hex(e.to_string()))?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| KeyError::Length(len))
}

/// An ED25519 private key.
#[derive(Clone)]
pub struct PrivateKey(SigningKey);

impl PrivateKey {
    pub fn generate_ed25519() -> Self {
        Self(SigningKey::generate(&mut OsRng))
    }

    pub fn from_str_ed25519(s: &str) -> Result<Self, KeyError> {
        let bytes = decode_key_bytes(s, PRIVATE_KEY_DER_PREFIX)?;
        Ok(Self(SigningKey::from_bytes(&bytes)))
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.0.verifying_key())
    }

    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.0.sign(message).to_bytes().to_vec()
    }
}

impl FromStr for PrivateKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_ed25519(s)
    }
}

impl Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", PRIVATE_KEY_DER_PREFIX, hex::encode(self.0.to_bytes()))
    }
}

impl Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PrivateKey").field(&self.public_key()).finish()
    }
}

/// An ED25519 public key.
#[derive(Clone, Copy)]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    pub fn from_str_ed25519(s: &str) -> Result<Self, KeyError> {
        let bytes = decode_key_bytes(s, PUBLIC_KEY_DER_PREFIX)?;
        VerifyingKey::from_bytes(&bytes)
            .map(Self)
            .map_err(|_| KeyError::InvalidPublicKey)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes()
    }

    /// True when `signature` is this key's signature over `message`.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        Signature::from_slice(signature)
            .map(|sig| self.0.verify(message, &sig).is_ok())
            .unwrap_or(false)
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.to_bytes() == other.to_bytes()
    }
}

impl Eq for PublicKey {}

impl Hash for PublicKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_bytes().hash(state);
    }
}

impl FromStr for PublicKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_ed25519(s)
    }
}

impl Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", PUBLIC_KEY_DER_PREFIX, hex::encode(self.to_bytes()))
    }
}

impl Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.to_bytes()))
    }
}

impl Serialize for PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
