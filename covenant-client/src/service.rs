//! CovenantClient - main entry point for agreement operations.
//!
//! This client orchestrates the store, the lifecycle rules, and disclosure
//! sessions over injected ledger and signer capabilities. It holds no cached
//! view state: every listing reads the store again, so callers always see
//! store-consistent data after a transition completes. Failed writes are
//! reported and never retried; a refused write needs a fresh user-initiated
//! attempt.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use covenant_core::{
    generate_session_key, lifecycle, Address, AgreementCategory, AgreementRecord, AgreementTerms,
    DisclosureRequest, FheCodec, LifecycleEvent, TermCipher,
};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::ledger::LedgerWriter;
use crate::session::DisclosureSession;
use crate::signer::MessageSigner;
use crate::store::AgreementStore;

/// Presentation message for a write the holder refused.
pub const USER_REJECTED_MESSAGE: &str = "Transaction rejected by user";

/// Phase of a state-changing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TxPhase {
    Pending,
    Success,
    Error,
}

/// Typed outcome of a state-changing operation, for presentation layers.
///
/// Carries no business state; the record itself comes back from the
/// operation. User refusal maps to a fixed message so it is never presented
/// as a generic failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxStatus {
    pub phase: TxPhase,
    pub message: String,
}

impl TxStatus {
    /// An operation still in flight.
    pub fn pending(message: impl Into<String>) -> Self {
        Self {
            phase: TxPhase::Pending,
            message: message.into(),
        }
    }

    /// A completed operation.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            phase: TxPhase::Success,
            message: message.into(),
        }
    }

    /// A failed operation, with refusal kept distinct from failure.
    pub fn from_error(error: &ClientError) -> Self {
        let message = if error.is_user_rejection() {
            USER_REJECTED_MESSAGE.to_string()
        } else {
            error.to_string()
        };
        Self {
            phase: TxPhase::Error,
            message,
        }
    }
}

/// Input for a new agreement.
#[derive(Debug, Clone)]
pub struct NewAgreement {
    /// The second party
    pub counterparty: Address,
    /// Contract category
    pub category: AgreementCategory,
    /// Contract price (encrypted at rest)
    pub price: f64,
    /// Delivery deadline in days (encrypted at rest)
    pub delivery_date: f64,
    /// Penalty amount (encrypted at rest)
    pub penalty_clause: f64,
    /// Plaintext free-text terms
    pub general_terms: String,
}

impl Default for NewAgreement {
    fn default() -> Self {
        Self {
            counterparty: Address::new(""),
            category: AgreementCategory::Nda,
            price: 0.0,
            delivery_date: 0.0,
            penalty_clause: 0.0,
            general_terms: String::new(),
        }
    }
}

/// Per-status counts over the current listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AgreementStats {
    pub total: usize,
    pub draft: usize,
    pub signed: usize,
    pub executed: usize,
    pub disputed: usize,
}

impl AgreementStats {
    /// Count statuses across a listing.
    pub fn tally(records: &[AgreementRecord]) -> Self {
        use covenant_core::AgreementStatus;

        let mut stats = Self {
            total: records.len(),
            ..Self::default()
        };
        for record in records {
            match record.status {
                AgreementStatus::Draft => stats.draft += 1,
                AgreementStatus::Signed => stats.signed += 1,
                AgreementStatus::Executed => stats.executed += 1,
                AgreementStatus::Disputed => stats.disputed += 1,
            }
        }
        stats
    }
}

/// Main entry point for agreement operations.
///
/// Generic over the ledger and signer capabilities; the term cipher is a
/// trait object so the placeholder scheme can be swapped without touching
/// this type.
///
/// # Example
///
/// ```ignore
/// use covenant_client::{ClientConfig, CovenantClient, MemoryLedger, NewAgreement, StaticSigner};
///
/// let client = CovenantClient::new(
///     ClientConfig::default(),
///     Arc::new(MemoryLedger::new()),
///     Arc::new(StaticSigner::new("0xCreator")),
/// );
/// let record = client.create_agreement(NewAgreement::default()).await?;
/// let record = client.sign_agreement(&record.id).await?;
/// ```
pub struct CovenantClient<L, S> {
    /// Configuration
    config: ClientConfig,
    /// Write-capable ledger handle
    ledger: Arc<L>,
    /// Signing capability
    signer: Arc<S>,
    /// Record persistence
    store: AgreementStore<L>,
    /// Field-level encryption scheme
    cipher: Arc<dyn TermCipher>,
}

impl<L, S> CovenantClient<L, S>
where
    L: LedgerWriter,
    S: MessageSigner,
{
    /// Create a client with the placeholder cipher.
    pub fn new(config: ClientConfig, ledger: Arc<L>, signer: Arc<S>) -> Self {
        Self::with_cipher(config, ledger, signer, Arc::new(FheCodec::new()))
    }

    /// Create a client with a specific cipher implementation.
    pub fn with_cipher(
        config: ClientConfig,
        ledger: Arc<L>,
        signer: Arc<S>,
        cipher: Arc<dyn TermCipher>,
    ) -> Self {
        Self {
            config,
            store: AgreementStore::new(ledger.clone()),
            ledger,
            signer,
            cipher,
        }
    }

    /// Check if the backing ledger is reachable.
    pub async fn is_ledger_available(&self) -> bool {
        self.ledger.is_available().await
    }

    /// The connected account, or [`ClientError::NotConnected`].
    fn connected_address(&self) -> Result<Address, ClientError> {
        self.signer.address().ok_or(ClientError::NotConnected)
    }

    /// Encrypt the terms and persist a new draft agreement.
    pub async fn create_agreement(
        &self,
        new: NewAgreement,
    ) -> Result<AgreementRecord, ClientError> {
        let creator = self.connected_address()?;

        let terms = AgreementTerms {
            price: self.cipher.encrypt(new.price)?,
            delivery_date: self.cipher.encrypt(new.delivery_date)?,
            penalty_clause: self.cipher.encrypt(new.penalty_clause)?,
            general_terms: new.general_terms,
        };
        let record = AgreementRecord::new_draft(
            creator,
            new.counterparty,
            new.category,
            terms.to_blob()?,
        );

        self.store.create(&record).await?;
        Ok(record)
    }

    /// Load one agreement.
    pub async fn get_agreement(&self, id: &str) -> Result<AgreementRecord, ClientError> {
        self.store.get(id).await
    }

    /// All readable agreements, newest first.
    pub async fn list_agreements(&self) -> Result<Vec<AgreementRecord>, ClientError> {
        self.store.list_all().await
    }

    /// Per-status counts, computed fresh from the listing.
    pub async fn stats(&self) -> Result<AgreementStats, ClientError> {
        let records = self.list_agreements().await?;
        Ok(AgreementStats::tally(&records))
    }

    /// Sign a draft agreement. Reserved to the creator.
    pub async fn sign_agreement(&self, id: &str) -> Result<AgreementRecord, ClientError> {
        self.transition(id, LifecycleEvent::Sign).await
    }

    /// Execute a signed agreement.
    pub async fn execute_agreement(&self, id: &str) -> Result<AgreementRecord, ClientError> {
        self.transition(id, LifecycleEvent::Execute).await
    }

    /// Dispute a signed or executed agreement.
    pub async fn dispute_agreement(&self, id: &str) -> Result<AgreementRecord, ClientError> {
        self.transition(id, LifecycleEvent::Dispute).await
    }

    /// Open a signature-gated decryption session with fresh key material.
    pub fn open_disclosure(&self) -> DisclosureSession<S> {
        let mut request = DisclosureRequest::new(
            generate_session_key(self.config.session_key_hex_chars),
            self.config.ledger_address.clone(),
            self.config.chain_id,
        );
        request.duration_days = self.config.authorization_validity_days;
        DisclosureSession::new(self.signer.clone(), self.cipher.clone(), request)
    }

    /// Guard, transition, persist. Nothing is written when a guard fails.
    async fn transition(
        &self,
        id: &str,
        event: LifecycleEvent,
    ) -> Result<AgreementRecord, ClientError> {
        let actor = self.connected_address()?;
        let record = self.store.get(id).await?;
        let next = lifecycle::apply(&record, &actor, event)?;

        let updated = self.store.update(id, |r| r.status = next).await?;
        info!(id = %id, event = %event, status = %updated.status, "Agreement transition applied");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{LedgerError, MemoryLedger};
    use crate::signer::StaticSigner;
    use covenant_core::AgreementStatus;

    fn client_for(
        signer: StaticSigner,
    ) -> (
        Arc<MemoryLedger>,
        CovenantClient<MemoryLedger, StaticSigner>,
    ) {
        let ledger = Arc::new(MemoryLedger::new());
        let client = CovenantClient::new(
            ClientConfig::default(),
            ledger.clone(),
            Arc::new(signer),
        );
        (ledger, client)
    }

    #[tokio::test]
    async fn test_requires_connected_account() {
        let (_ledger, client) = client_for(StaticSigner::disconnected());
        let result = client.create_agreement(NewAgreement::default()).await;
        assert!(matches!(result, Err(ClientError::NotConnected)));
    }

    #[tokio::test]
    async fn test_create_starts_draft() {
        let (_ledger, client) = client_for(StaticSigner::new("0xCreator"));
        let record = client
            .create_agreement(NewAgreement {
                counterparty: Address::new("0xCounterparty"),
                price: 1.5,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(record.status, AgreementStatus::Draft);
        assert_eq!(record.creator.as_str(), "0xCreator");

        // Terms were encrypted on the way in
        let terms = record.terms().unwrap();
        assert!(terms.price.has_scheme_prefix());
    }

    #[tokio::test]
    async fn test_stats() {
        let (_ledger, client) = client_for(StaticSigner::new("0xCreator"));
        let a = client.create_agreement(NewAgreement::default()).await.unwrap();
        let _b = client.create_agreement(NewAgreement::default()).await.unwrap();
        client.sign_agreement(&a.id).await.unwrap();

        let stats = client.stats().await.unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.draft, 1);
        assert_eq!(stats.signed, 1);
        assert_eq!(stats.executed, 0);
        assert_eq!(stats.disputed, 0);
    }

    #[test]
    fn test_rejection_message() {
        let refused = ClientError::from(LedgerError::Rejected);
        let status = TxStatus::from_error(&refused);
        assert_eq!(status.phase, TxPhase::Error);
        assert_eq!(status.message, USER_REJECTED_MESSAGE);

        let failed = ClientError::NotFound("contract-1-aaaa".to_string());
        let status = TxStatus::from_error(&failed);
        assert_eq!(status.phase, TxPhase::Error);
        assert_eq!(status.message, "Agreement not found: contract-1-aaaa");
    }

    #[tokio::test]
    async fn test_disclosure_uses_config() {
        let ledger = Arc::new(MemoryLedger::new());
        let config = ClientConfig {
            ledger_address: "0x1234".to_string(),
            chain_id: 11155111,
            authorization_validity_days: 7,
            session_key_hex_chars: 64,
        };
        let client =
            CovenantClient::new(config, ledger, Arc::new(StaticSigner::new("0xCreator")));

        let session = client.open_disclosure();
        let request = session.request();
        assert_eq!(request.ledger_address, "0x1234");
        assert_eq!(request.chain_id, 11155111);
        assert_eq!(request.duration_days, 7);
        assert_eq!(request.public_key.len(), 2 + 64);
    }
}
