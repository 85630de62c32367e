//! Async ledger client for Covenant Protocol agreements.
//!
//! This crate drives lifecycle-governed agreements over an opaque key-value
//! ledger: creating records with encrypted numeric terms, walking them
//! through draft/signed/executed/disputed, enumerating them through the
//! append-only id index, and gating decryption behind a fresh signature.
//! The ledger and the signer are injected capabilities; the pure domain
//! rules live in `covenant-core`.
//!
//! # Key Components
//!
//! - [`CovenantClient`]: create/sign/execute/dispute/list over a ledger
//! - [`AgreementStore`] and [`AgreementIndex`]: the persisted layout
//! - [`DisclosureSession`]: sign-then-decrypt reveal with re-hide
//! - [`LedgerReader`]/[`LedgerWriter`] and [`MessageSigner`]: the
//!   capability seams, with [`MemoryLedger`] and [`StaticSigner`] for
//!   tests and offline development
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use covenant_client::{ClientConfig, CovenantClient, MemoryLedger, NewAgreement, StaticSigner};
//!
//! let client = CovenantClient::new(
//!     ClientConfig::default(),
//!     Arc::new(MemoryLedger::new()),
//!     Arc::new(StaticSigner::new("0xCreator")),
//! );
//!
//! let record = client.create_agreement(NewAgreement::default()).await?;
//! let signed = client.sign_agreement(&record.id).await?;
//! ```

pub mod config;
pub mod error;
pub mod index;
pub mod ledger;
pub mod service;
pub mod session;
pub mod signer;
pub mod store;

// Re-export main types
pub use config::ClientConfig;
pub use error::ClientError;
pub use index::AgreementIndex;
pub use ledger::{LedgerError, LedgerReader, LedgerWriter, MemoryLedger};
pub use service::{
    AgreementStats, CovenantClient, NewAgreement, TxPhase, TxStatus, USER_REJECTED_MESSAGE,
};
pub use session::DisclosureSession;
pub use signer::{MessageSigner, Signature, SignerError, StaticSigner};
pub use store::AgreementStore;
