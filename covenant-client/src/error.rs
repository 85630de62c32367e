//! Client error taxonomy.
//!
//! One umbrella enum so callers match on a single type, with the kinds a
//! presentation layer must distinguish kept distinct: wrong state, not
//! permitted, signature rejected, record missing, record orphaned. Lower
//! layers convert in via `#[from]`.

use covenant_core::{CodecError, LifecycleError};

use crate::ledger::LedgerError;
use crate::signer::SignerError;

/// Error types for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// No agreement stored under the id
    #[error("Agreement not found: {0}")]
    NotFound(String),

    /// Record written but the index append failed; the record exists and is
    /// not enumerable
    #[error("Agreement {id} stored but not indexed: {reason}")]
    OrphanRecord { id: String, reason: String },

    /// Stored index bytes are not a JSON id array; callers recover this as
    /// an empty index
    #[error("Agreement index is corrupt: {0}")]
    IndexCorrupt(String),

    /// No account is connected
    #[error("No connected account")]
    NotConnected,

    /// Signature refused or failed; no decryption was performed
    #[error("Disclosure authorization denied: {0}")]
    AuthorizationDenied(#[from] SignerError),

    /// Ledger access failed
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Term encryption or decryption failed
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Lifecycle guard violation
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    /// Record or index JSON could not be produced or parsed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Whether this failure is the holder refusing to approve, as opposed
    /// to a mechanical error. Refusals need a fresh user-initiated attempt
    /// and must never be retried automatically.
    pub fn is_user_rejection(&self) -> bool {
        matches!(
            self,
            Self::Ledger(LedgerError::Rejected) | Self::AuthorizationDenied(SignerError::Rejected)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_detection() {
        assert!(ClientError::from(LedgerError::Rejected).is_user_rejection());
        assert!(ClientError::from(SignerError::Rejected).is_user_rejection());

        assert!(!ClientError::NotConnected.is_user_rejection());
        assert!(!ClientError::from(SignerError::Failed("boom".into())).is_user_rejection());
        assert!(!ClientError::from(LedgerError::Backend("boom".into())).is_user_rejection());
    }

    #[test]
    fn test_lifecycle_kinds_distinct() {
        use covenant_core::{AgreementStatus, LifecycleEvent};

        let invalid = ClientError::from(LifecycleError::InvalidTransition {
            from: AgreementStatus::Draft,
            event: LifecycleEvent::Execute,
        });
        let unauthorized = ClientError::from(LifecycleError::Unauthorized {
            event: LifecycleEvent::Sign,
        });

        assert!(matches!(
            invalid,
            ClientError::Lifecycle(LifecycleError::InvalidTransition { .. })
        ));
        assert!(matches!(
            unauthorized,
            ClientError::Lifecycle(LifecycleError::Unauthorized { .. })
        ));
    }
}
