//! Core domain for Covenant Protocol agreements.
//!
//! This crate holds the pure, I/O-free half of the system: the agreement
//! record and its stored JSON layout, the lifecycle state machine, the
//! encrypted term codec, and the disclosure authorization message. The
//! async ledger client lives in `covenant-client`.
//!
//! # Key Components
//!
//! - [`AgreementRecord`]: the durable contract record and its key scheme
//! - [`lifecycle`]: transition legality and actor authorization
//! - [`TermCipher`]: the field-level encryption seam, with the placeholder
//!   [`FheCodec`] implementation
//! - [`DisclosureRequest`]: the canonical sign-before-decrypt message
//!
//! # Example
//!
//! ```ignore
//! use covenant_core::{lifecycle, AgreementRecord, AgreementStatus, LifecycleEvent};
//!
//! let next = lifecycle::apply(&record, &actor, LifecycleEvent::Sign)?;
//! assert_eq!(next, AgreementStatus::Signed);
//! ```

pub mod codec;
pub mod disclosure;
pub mod lifecycle;
pub mod types;

// Re-export main types
pub use codec::{CodecError, EncryptedValue, FheCodec, TermCipher, SCHEME_PREFIX};
pub use disclosure::{
    generate_session_key, DisclosureRequest, DEFAULT_VALIDITY_DAYS, SESSION_KEY_HEX_CHARS,
};
pub use lifecycle::{LifecycleError, LifecycleEvent};
pub use types::{
    generate_agreement_id, record_key, Address, AgreementCategory, AgreementRecord,
    AgreementStatus, AgreementTerms, INDEX_KEY,
};
