//! Key-value ledger access.
//!
//! The backing ledger is an opaque namespaced byte store reached through
//! read-capable and write-capable handles. Reads need no signing identity;
//! writes go through a signing-capable connection and can be refused by the
//! holder. The network layer serializes writes, so the client keeps no
//! locking of its own.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Error types for ledger access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// Ledger is not reachable
    #[error("Ledger unavailable: {0}")]
    Unavailable(String),

    /// The holder refused to approve the write
    #[error("Write rejected by user")]
    Rejected,

    /// The ledger reported a failure
    #[error("Ledger error: {0}")]
    Backend(String),
}

/// Read-capable handle to the ledger.
///
/// This is a clean abstraction over the key-value store, allowing different
/// implementations (live chain adapter, in-memory, test doubles).
#[async_trait]
pub trait LedgerReader: Send + Sync {
    /// Check if the ledger is reachable.
    async fn is_available(&self) -> bool;

    /// Fetch the bytes stored under `key`. Absent keys read as empty bytes.
    async fn get_data(&self, key: &str) -> Result<Vec<u8>, LedgerError>;
}

/// Write-capable handle to the ledger.
///
/// A write may suspend on external approval. Once submitted it either
/// completes or fails; there is no rollback, and a failed write is never
/// retried automatically.
#[async_trait]
pub trait LedgerWriter: LedgerReader {
    /// Store `value` under `key`.
    async fn set_data(&self, key: &str, value: &[u8]) -> Result<(), LedgerError>;
}

/// In-memory ledger for tests and offline development.
///
/// Behaves like the live adapter from the caller's point of view: absent
/// keys read as empty, writes land atomically. Failure injection (denied
/// keys, user rejection, unavailability) drives the error-path tests.
pub struct MemoryLedger {
    entries: Arc<RwLock<HashMap<String, Vec<u8>>>>,
    denied_keys: Arc<RwLock<HashSet<String>>>,
    available: AtomicBool,
    rejecting: AtomicBool,
    write_attempts: AtomicU32,
}

impl MemoryLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            denied_keys: Arc::new(RwLock::new(HashSet::new())),
            available: AtomicBool::new(true),
            rejecting: AtomicBool::new(false),
            write_attempts: AtomicU32::new(0),
        }
    }

    /// Seed raw bytes under a key, bypassing the write path.
    pub async fn seed(&self, key: impl Into<String>, value: impl Into<Vec<u8>>) {
        let mut entries = self.entries.write().await;
        entries.insert(key.into(), value.into());
    }

    /// Make every write to `key` fail with a backend error.
    pub async fn deny_writes_on(&self, key: impl Into<String>) {
        let mut denied = self.denied_keys.write().await;
        denied.insert(key.into());
    }

    /// Simulate the holder refusing all writes.
    pub fn set_rejecting(&self, rejecting: bool) {
        self.rejecting.store(rejecting, Ordering::SeqCst);
    }

    /// Flip reachability.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    /// Number of writes attempted, including refused ones.
    pub fn write_attempts(&self) -> u32 {
        self.write_attempts.load(Ordering::SeqCst)
    }
}

impl Default for MemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerReader for MemoryLedger {
    async fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    async fn get_data(&self, key: &str) -> Result<Vec<u8>, LedgerError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(LedgerError::Unavailable("ledger offline".to_string()));
        }
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl LedgerWriter for MemoryLedger {
    async fn set_data(&self, key: &str, value: &[u8]) -> Result<(), LedgerError> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);

        if !self.available.load(Ordering::SeqCst) {
            return Err(LedgerError::Unavailable("ledger offline".to_string()));
        }
        if self.rejecting.load(Ordering::SeqCst) {
            return Err(LedgerError::Rejected);
        }
        {
            let denied = self.denied_keys.read().await;
            if denied.contains(key) {
                return Err(LedgerError::Backend(format!("write denied: {key}")));
            }
        }

        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
