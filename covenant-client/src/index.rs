//! Agreement id index.
//!
//! All known agreement ids live as one JSON array under the well-known
//! `contract_keys` ledger key. Append is read-modify-write: two concurrent
//! writers can race and the later write wins, which the single-writer-per-
//! session model accepts. A corrupt index never takes the client down; it
//! reads as empty and is rebuilt by the next append.

use std::sync::Arc;

use tracing::{debug, warn};

use covenant_core::INDEX_KEY;

use crate::error::ClientError;
use crate::ledger::{LedgerReader, LedgerWriter};

/// The enumerable set of agreement ids, append-only.
pub struct AgreementIndex<L> {
    ledger: Arc<L>,
}

impl<L> AgreementIndex<L> {
    /// Wrap a ledger handle.
    pub fn new(ledger: Arc<L>) -> Self {
        Self { ledger }
    }
}

impl<L: LedgerReader> AgreementIndex<L> {
    /// All known ids, in append order.
    ///
    /// An absent index reads as empty. An unparsable one is logged and also
    /// reads as empty rather than failing every listing.
    pub async fn list_ids(&self) -> Result<Vec<String>, ClientError> {
        let bytes = self.ledger.get_data(INDEX_KEY).await?;
        if bytes.is_empty() {
            return Ok(Vec::new());
        }
        match parse_ids(&bytes) {
            Ok(ids) => Ok(ids),
            Err(e) => {
                warn!(error = %e, "Agreement index unparsable, reading as empty");
                Ok(Vec::new())
            }
        }
    }
}

impl<L: LedgerWriter> AgreementIndex<L> {
    /// Append an id: fetch the current array, push, write back.
    ///
    /// Not atomic against concurrent writers; the later write wins.
    pub async fn append_id(&self, id: &str) -> Result<(), ClientError> {
        let mut ids = self.list_ids().await?;
        ids.push(id.to_string());
        let bytes = serde_json::to_vec(&ids)?;
        self.ledger.set_data(INDEX_KEY, &bytes).await?;
        debug!(id = %id, total = ids.len(), "Appended agreement id to index");
        Ok(())
    }
}

fn parse_ids(bytes: &[u8]) -> Result<Vec<String>, ClientError> {
    serde_json::from_slice(bytes).map_err(|e| ClientError::IndexCorrupt(e.to_string()))
}
