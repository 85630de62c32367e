//! Encrypted term codec.
//!
//! This module encodes sensitive numeric agreement terms into an opaque
//! tagged string form (`FHE-<payload>`) and reverses that encoding. The
//! current scheme is a reversible placeholder, not real encryption; the
//! [`TermCipher`] trait is the boundary where a genuine homomorphic scheme
//! plugs in without changing callers.

use std::fmt;

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};

/// Scheme marker prepended to every encrypted payload.
pub const SCHEME_PREFIX: &str = "FHE-";

/// Error types for term encryption and decryption.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Payload under the scheme prefix is not valid base64 text
    #[error("Malformed encrypted payload: {0}")]
    MalformedPayload(String),

    /// Input does not parse as a finite number under either path
    #[error("Not a finite numeric value: {0}")]
    NotNumeric(String),

    /// NaN and infinities have no encrypted representation
    #[error("Cannot encrypt non-finite value")]
    NonFinite,
}

/// An encrypted numeric term as stored on the ledger.
///
/// Opaque to everything except the cipher that produced it. Serializes as a
/// plain string so agreement records keep the same JSON layout regardless of
/// scheme.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncryptedValue(String);

impl EncryptedValue {
    /// View the stored string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the value carries the scheme marker (as opposed to a bare
    /// numeric string laid down before the marker existed).
    pub fn has_scheme_prefix(&self) -> bool {
        self.0.starts_with(SCHEME_PREFIX)
    }
}

impl From<String> for EncryptedValue {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for EncryptedValue {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for EncryptedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cipher contract for individual numeric terms.
///
/// This is a clean abstraction over the field-level encryption scheme,
/// allowing different implementations (placeholder, real scheme, counting
/// test doubles). `decrypt(encrypt(v))` must return exactly `v` for every
/// finite `v`, and `encrypt` must be deterministic for a given input.
pub trait TermCipher: Send + Sync {
    /// Encrypt a single numeric term.
    fn encrypt(&self, value: f64) -> Result<EncryptedValue, CodecError>;

    /// Decrypt a stored term.
    ///
    /// Accepts both scheme-prefixed payloads and bare numeric strings.
    /// Never yields NaN; unparsable input is an error.
    fn decrypt(&self, stored: &str) -> Result<f64, CodecError>;
}

/// Reversible placeholder cipher tagging payloads with the `FHE-` marker.
///
/// The payload is base64 of the shortest decimal rendering of the value.
/// Kept for its stable wire contract only; it offers no confidentiality.
#[derive(Debug, Clone, Copy, Default)]
pub struct FheCodec;

impl FheCodec {
    /// Create a new codec.
    pub fn new() -> Self {
        Self
    }
}

impl TermCipher for FheCodec {
    fn encrypt(&self, value: f64) -> Result<EncryptedValue, CodecError> {
        if !value.is_finite() {
            return Err(CodecError::NonFinite);
        }
        let payload = general_purpose::STANDARD.encode(value.to_string());
        Ok(EncryptedValue(format!("{SCHEME_PREFIX}{payload}")))
    }

    fn decrypt(&self, stored: &str) -> Result<f64, CodecError> {
        let text = match stored.strip_prefix(SCHEME_PREFIX) {
            Some(payload) => {
                let bytes = general_purpose::STANDARD
                    .decode(payload)
                    .map_err(|e| CodecError::MalformedPayload(e.to_string()))?;
                String::from_utf8(bytes).map_err(|e| CodecError::MalformedPayload(e.to_string()))?
            }
            None => stored.to_string(),
        };

        let value: f64 = text
            .parse()
            .map_err(|_| CodecError::NotNumeric(text.clone()))?;
        if !value.is_finite() {
            return Err(CodecError::NotNumeric(text));
        }
        Ok(value)
    }
}
