//! Core types for Covenant agreements.
//!
//! These types model the durable agreement record, its enumerated status and
//! category, and the on-ledger key scheme. The stored JSON layout is fixed:
//! one record per `contract_<id>` key, the id list under `contract_keys`.

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::codec::EncryptedValue;

/// Well-known ledger key holding the JSON array of all agreement ids.
pub const INDEX_KEY: &str = "contract_keys";

/// Ledger key for a single agreement record.
pub fn record_key(id: &str) -> String {
    format!("contract_{id}")
}

/// An account address as supplied by the identity collaborator.
///
/// Stored verbatim (mixed-case forms survive round-trips); capability checks
/// go through [`Address::matches`], which compares case-insensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Wrap an address string as-is.
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    /// The raw string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison. Two spellings of the same hex address
    /// are the same identity.
    pub fn matches(&self, other: &Address) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lifecycle status of an agreement.
///
/// The only mutable attribute of a record after creation. `Disputed` is a
/// sink: no transition out of it is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgreementStatus {
    /// Created, awaiting the creator's signature
    Draft,
    /// Signed by the creator
    Signed,
    /// Terms carried out
    Executed,
    /// Under dispute review
    Disputed,
}

impl AgreementStatus {
    /// Wire/string form, matching the stored JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Signed => "signed",
            Self::Executed => "executed",
            Self::Disputed => "disputed",
        }
    }

    /// All statuses in lifecycle order.
    pub fn all() -> [Self; 4] {
        [Self::Draft, Self::Signed, Self::Executed, Self::Disputed]
    }
}

impl Default for AgreementStatus {
    fn default() -> Self {
        Self::Draft
    }
}

impl fmt::Display for AgreementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Contract category of an agreement.
///
/// Records laid down with a category this build does not know deserialize as
/// [`AgreementCategory::General`] rather than failing the whole record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum AgreementCategory {
    #[serde(rename = "NDA")]
    Nda,
    Service,
    Sales,
    Partnership,
    Employment,
    /// Fallback for missing or unrecognized categories
    General,
}

impl From<String> for AgreementCategory {
    fn from(s: String) -> Self {
        match s.as_str() {
            "NDA" => Self::Nda,
            "Service" => Self::Service,
            "Sales" => Self::Sales,
            "Partnership" => Self::Partnership,
            "Employment" => Self::Employment,
            _ => Self::General,
        }
    }
}

impl AgreementCategory {
    /// Wire/string form, matching the stored JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Nda => "NDA",
            Self::Service => "Service",
            Self::Sales => "Sales",
            Self::Partnership => "Partnership",
            Self::Employment => "Employment",
            Self::General => "General",
        }
    }

    /// Human-readable name for presentation.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Nda => "Non-Disclosure Agreement",
            Self::Service => "Service Agreement",
            Self::Sales => "Sales Contract",
            Self::Partnership => "Partnership Agreement",
            Self::Employment => "Employment Contract",
            Self::General => "General Agreement",
        }
    }

    /// Categories offered at creation time (excludes the fallback).
    pub fn selectable() -> [Self; 5] {
        [
            Self::Nda,
            Self::Service,
            Self::Sales,
            Self::Partnership,
            Self::Employment,
        ]
    }
}

impl Default for AgreementCategory {
    fn default() -> Self {
        Self::General
    }
}

impl fmt::Display for AgreementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The term sheet of an agreement: three encrypted numeric fields plus the
/// free-text general terms, serialized as one JSON blob inside the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementTerms {
    /// Encrypted contract price
    pub price: EncryptedValue,
    /// Encrypted delivery deadline (days)
    pub delivery_date: EncryptedValue,
    /// Encrypted penalty amount
    pub penalty_clause: EncryptedValue,
    /// Plaintext free-text terms
    pub general_terms: String,
}

impl AgreementTerms {
    /// Serialize to the stored blob form.
    pub fn to_blob(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse a stored blob.
    pub fn from_blob(blob: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(blob)
    }
}

/// A durable agreement record.
///
/// The id lives in the storage key (`contract_<id>`), not in the stored JSON
/// value; [`AgreementRecord::id`] is populated when a record is loaded. All
/// fields except `status` are immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgreementRecord {
    /// Unique id, carried by the storage key
    #[serde(skip)]
    pub id: String,
    /// Serialized [`AgreementTerms`] blob
    pub encrypted_terms: String,
    /// Creation time, seconds since the Unix epoch
    pub timestamp: u64,
    /// Account that created the agreement
    pub creator: Address,
    /// The second party
    pub counterparty: Address,
    /// Lifecycle status; missing in stored JSON means `draft`
    #[serde(default)]
    pub status: AgreementStatus,
    /// Contract category; missing in stored JSON means `General`
    #[serde(default)]
    pub category: AgreementCategory,
}

impl AgreementRecord {
    /// Build a fresh draft record with a generated id and the current time.
    pub fn new_draft(
        creator: Address,
        counterparty: Address,
        category: AgreementCategory,
        encrypted_terms: String,
    ) -> Self {
        Self {
            id: generate_agreement_id(),
            encrypted_terms,
            timestamp: Utc::now().timestamp() as u64,
            creator,
            counterparty,
            status: AgreementStatus::Draft,
            category,
        }
    }

    /// Whether `actor` holds the creator capability for this record.
    pub fn is_creator(&self, actor: &Address) -> bool {
        self.creator.matches(actor)
    }

    /// Parse the term sheet out of the stored blob.
    pub fn terms(&self) -> Result<AgreementTerms, serde_json::Error> {
        AgreementTerms::from_blob(&self.encrypted_terms)
    }

    /// The ledger key this record is stored under.
    pub fn key(&self) -> String {
        record_key(&self.id)
    }
}

const ID_SUFFIX_LEN: usize = 4;
const ID_SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generate a fresh agreement id: `contract-<unix-millis>-<random base36>`.
pub fn generate_agreement_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_SUFFIX_ALPHABET[rng.gen_range(0..ID_SUFFIX_ALPHABET.len())] as char)
        .collect();
    format!("contract-{millis}-{suffix}")
}
