//! Agreement record persistence.
//!
//! One record per `contract_<id>` ledger key, with the id list maintained
//! through [`AgreementIndex`]. Creation writes the record first and indexes
//! it second; if the second write fails the record is an orphan, surfaced as
//! an error rather than silently ignored. Listing skips unreadable records
//! so one corrupt entry cannot take down the whole view.

use std::sync::Arc;

use tracing::{info, warn};

use covenant_core::{record_key, AgreementRecord};

use crate::error::ClientError;
use crate::index::AgreementIndex;
use crate::ledger::{LedgerReader, LedgerWriter};

/// Durable storage for agreement records, keyed by agreement id.
pub struct AgreementStore<L> {
    ledger: Arc<L>,
    index: AgreementIndex<L>,
}

impl<L> AgreementStore<L> {
    /// Wrap a ledger handle.
    pub fn new(ledger: Arc<L>) -> Self {
        Self {
            index: AgreementIndex::new(ledger.clone()),
            ledger,
        }
    }

    /// The id index backing this store.
    pub fn index(&self) -> &AgreementIndex<L> {
        &self.index
    }
}

impl<L: LedgerReader> AgreementStore<L> {
    /// Load one record. The id comes from the key, not the stored value.
    pub async fn get(&self, id: &str) -> Result<AgreementRecord, ClientError> {
        let bytes = self.ledger.get_data(&record_key(id)).await?;
        if bytes.is_empty() {
            return Err(ClientError::NotFound(id.to_string()));
        }
        let mut record: AgreementRecord = serde_json::from_slice(&bytes)?;
        record.id = id.to_string();
        Ok(record)
    }

    /// All readable records, newest first.
    ///
    /// Ids whose record is missing or unparsable are skipped with a warning;
    /// a single corrupt record must not make the listing unusable.
    pub async fn list_all(&self) -> Result<Vec<AgreementRecord>, ClientError> {
        let ids = self.index.list_ids().await?;
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            match self.get(&id).await {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(id = %id, error = %e, "Skipping unreadable agreement record");
                }
            }
        }
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(records)
    }
}

impl<L: LedgerWriter> AgreementStore<L> {
    /// Persist a new record and index its id.
    ///
    /// Both writes must land for the agreement to be enumerable. A failed
    /// index append after a successful record write leaves an orphan, which
    /// is reported, never retried here.
    pub async fn create(&self, record: &AgreementRecord) -> Result<(), ClientError> {
        let bytes = serde_json::to_vec(record)?;
        self.ledger.set_data(&record.key(), &bytes).await?;

        if let Err(e) = self.index.append_id(&record.id).await {
            warn!(id = %record.id, error = %e, "Record stored but index append failed");
            return Err(ClientError::OrphanRecord {
                id: record.id.clone(),
                reason: e.to_string(),
            });
        }

        info!(id = %record.id, category = %record.category, "Created agreement");
        Ok(())
    }

    /// Read-modify-write of one record. Only the status is expected to
    /// change through this path.
    pub async fn update<F>(&self, id: &str, mutate: F) -> Result<AgreementRecord, ClientError>
    where
        F: FnOnce(&mut AgreementRecord),
    {
        let mut record = self.get(id).await?;
        mutate(&mut record);
        let bytes = serde_json::to_vec(&record)?;
        self.ledger.set_data(&record.key(), &bytes).await?;
        info!(id = %record.id, status = %record.status, "Updated agreement");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;
    use covenant_core::{Address, AgreementCategory, AgreementStatus};

    fn record(id: &str, timestamp: u64) -> AgreementRecord {
        AgreementRecord {
            id: id.to_string(),
            encrypted_terms: "{}".to_string(),
            timestamp,
            creator: Address::new("0xCreator"),
            counterparty: Address::new("0xCounterparty"),
            status: AgreementStatus::Draft,
            category: AgreementCategory::Nda,
        }
    }

    fn store() -> (Arc<MemoryLedger>, AgreementStore<MemoryLedger>) {
        let ledger = Arc::new(MemoryLedger::new());
        (ledger.clone(), AgreementStore::new(ledger))
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let (_ledger, store) = store();
        let r = record("contract-1-aaaa", 100);

        store.create(&r).await.unwrap();

        assert_eq!(store.get("contract-1-aaaa").await.unwrap(), r);
        assert_eq!(
            store.index().list_ids().await.unwrap(),
            vec!["contract-1-aaaa"]
        );
    }

    #[tokio::test]
    async fn test_get_missing() {
        let (_ledger, store) = store();
        assert!(matches!(
            store.get("contract-9-zzzz").await,
            Err(ClientError::NotFound(id)) if id == "contract-9-zzzz"
        ));
    }

    #[tokio::test]
    async fn test_list_sorted_newest_first() {
        let (_ledger, store) = store();
        store.create(&record("contract-1-aaaa", 100)).await.unwrap();
        store.create(&record("contract-2-bbbb", 300)).await.unwrap();
        store.create(&record("contract-3-cccc", 200)).await.unwrap();

        let listed = store.list_all().await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["contract-2-bbbb", "contract-3-cccc", "contract-1-aaaa"]
        );
    }

    #[tokio::test]
    async fn test_list_skips_corrupt() {
        let (ledger, store) = store();
        store.create(&record("contract-1-aaaa", 100)).await.unwrap();

        // A second id whose record bytes are garbage
        ledger.seed(record_key("contract-2-bbbb"), &b"{broken"[..]).await;
        store.index().append_id("contract-2-bbbb").await.unwrap();

        let listed = store.list_all().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "contract-1-aaaa");
    }

    #[tokio::test]
    async fn test_orphan_on_index_failure() {
        let (ledger, store) = store();
        ledger.deny_writes_on(covenant_core::INDEX_KEY).await;

        let r = record("contract-1-aaaa", 100);
        let result = store.create(&r).await;
        assert!(matches!(
            result,
            Err(ClientError::OrphanRecord { ref id, .. }) if id == "contract-1-aaaa"
        ));

        // The record itself landed; it is readable but not enumerable
        assert!(store.get("contract-1-aaaa").await.is_ok());
        assert!(store.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_status() {
        let (_ledger, store) = store();
        store.create(&record("contract-1-aaaa", 100)).await.unwrap();

        let updated = store
            .update("contract-1-aaaa", |r| r.status = AgreementStatus::Signed)
            .await
            .unwrap();
        assert_eq!(updated.status, AgreementStatus::Signed);

        let reloaded = store.get("contract-1-aaaa").await.unwrap();
        assert_eq!(reloaded.status, AgreementStatus::Signed);
        assert_eq!(reloaded.timestamp, 100);
    }

    #[tokio::test]
    async fn test_update_missing() {
        let (_ledger, store) = store();
        let result = store
            .update("contract-9-zzzz", |r| r.status = AgreementStatus::Signed)
            .await;
        assert!(matches!(result, Err(ClientError::NotFound(_))));
    }
}
