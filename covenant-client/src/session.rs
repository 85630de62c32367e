//! Disclosure sessions.
//!
//! Revealing an encrypted term is a fresh authorization act every time:
//!
//! 1. Build the canonical authorization message for this session
//! 2. Obtain a signature over it from the connected signer
//! 3. Only after the signature succeeds, decrypt the value
//!
//! If the signature is refused or fails, the cipher is never consulted. The
//! revealed plaintext is transient view state: [`DisclosureSession::hide`]
//! discards it without touching the signer or the ledger, and revealing
//! again requires a new signature.

use std::sync::Arc;

use tracing::{debug, info};

use covenant_core::{DisclosureRequest, EncryptedValue, TermCipher};

use crate::error::ClientError;
use crate::signer::MessageSigner;

/// One signature-gated decryption session.
pub struct DisclosureSession<S> {
    signer: Arc<S>,
    cipher: Arc<dyn TermCipher>,
    request: DisclosureRequest,
    revealed: Option<f64>,
}

impl<S: MessageSigner> DisclosureSession<S> {
    /// Bind a session to its authorization parameters.
    pub fn new(signer: Arc<S>, cipher: Arc<dyn TermCipher>, request: DisclosureRequest) -> Self {
        Self {
            signer,
            cipher,
            request,
            revealed: None,
        }
    }

    /// The authorization parameters this session signs over.
    pub fn request(&self) -> &DisclosureRequest {
        &self.request
    }

    /// The currently revealed value, if any.
    pub fn revealed(&self) -> Option<f64> {
        self.revealed
    }

    /// Sign the authorization message, then decrypt.
    ///
    /// Refusal or signer failure aborts before any decryption and surfaces
    /// as [`ClientError::AuthorizationDenied`].
    pub async fn reveal(&mut self, value: &EncryptedValue) -> Result<f64, ClientError> {
        let message = self.request.message();
        debug!(
            chain_id = self.request.chain_id,
            duration_days = self.request.duration_days,
            "Requesting disclosure authorization"
        );

        self.signer.sign_message(&message).await?;

        let plain = self.cipher.decrypt(value.as_str())?;
        self.revealed = Some(plain);
        info!("Disclosure authorized");
        Ok(plain)
    }

    /// Discard the revealed value. No signing, no ledger interaction.
    pub fn hide(&mut self) {
        self.revealed = None;
    }
}
