//! Message signing capability.
//!
//! Signing is external to this crate: a wallet or key custodian holds the
//! account key and may refuse any request, possibly after a human prompt.
//! This module defines the capability trait plus a static implementation
//! used by tests and offline development. Signature verification is the
//! collaborator's concern, never ours.

use async_trait::async_trait;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use covenant_core::Address;

/// Error types for signing requests.
///
/// Refusal by the holder stays distinguishable from a mechanical failure so
/// callers can present "rejected" differently from "failed".
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SignerError {
    /// The holder declined to sign
    #[error("Signature request rejected by user")]
    Rejected,

    /// The signing backend failed
    #[error("Signing failed: {0}")]
    Failed(String),
}

/// A detached signature over a canonical message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(Vec<u8>);

impl Signature {
    /// Wrap raw signature bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// The raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// `0x`-prefixed hex rendering.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Capability to sign canonical messages on behalf of a connected account.
///
/// This is a clean abstraction over the wallet boundary, allowing different
/// implementations (browser wallet bridge, key file, test doubles). A
/// request may suspend indefinitely on holder approval; timeouts are the
/// implementation's concern.
#[async_trait]
pub trait MessageSigner: Send + Sync {
    /// The connected account, if any.
    fn address(&self) -> Option<Address>;

    /// Request a signature over `message`. May be refused by the holder.
    async fn sign_message(&self, message: &str) -> Result<Signature, SignerError>;
}

/// Signer with a fixed address and a canned signature.
///
/// Used by tests and offline development. Configurable refusal drives the
/// authorization-denied paths.
pub struct StaticSigner {
    address: Option<Address>,
    rejecting: AtomicBool,
    sign_count: AtomicU32,
}

impl StaticSigner {
    /// Create a signer for the given account.
    pub fn new(address: impl Into<Address>) -> Self {
        Self {
            address: Some(address.into()),
            rejecting: AtomicBool::new(false),
            sign_count: AtomicU32::new(0),
        }
    }

    /// A signer with no connected account.
    pub fn disconnected() -> Self {
        Self {
            address: None,
            rejecting: AtomicBool::new(false),
            sign_count: AtomicU32::new(0),
        }
    }

    /// Refuse every signature request.
    pub fn with_rejection(self) -> Self {
        self.rejecting.store(true, Ordering::SeqCst);
        self
    }

    /// Number of signature requests received, including refused ones.
    pub fn sign_count(&self) -> u32 {
        self.sign_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageSigner for StaticSigner {
    fn address(&self) -> Option<Address> {
        self.address.clone()
    }

    async fn sign_message(&self, _message: &str) -> Result<Signature, SignerError> {
        self.sign_count.fetch_add(1, Ordering::SeqCst);

        if self.rejecting.load(Ordering::SeqCst) {
            return Err(SignerError::Rejected);
        }
        Ok(Signature::from_bytes(vec![0x42; 65]))
    }
}
