//! Agreement lifecycle state machine.
//!
//! Pure transition legality and actor authorization. This module never
//! persists anything; callers read the current record, compute the next
//! status here, and write it back through the store.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Address, AgreementRecord, AgreementStatus};

/// Error types for lifecycle transitions.
///
/// The two kinds stay distinguishable so callers can present "wrong state"
/// and "not permitted" differently.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LifecycleError {
    /// The event is not legal from the current status
    #[error("Cannot {event} an agreement in status {from}")]
    InvalidTransition {
        from: AgreementStatus,
        event: LifecycleEvent,
    },

    /// The acting identity does not hold the required capability
    #[error("Only the creator may {event} this agreement")]
    Unauthorized { event: LifecycleEvent },
}

/// A requested status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleEvent {
    /// Creator signs the draft
    Sign,
    /// Carry out the signed terms
    Execute,
    /// Raise a dispute for review
    Dispute,
}

impl LifecycleEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sign => "sign",
            Self::Execute => "execute",
            Self::Dispute => "dispute",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compute the status a legal event leads to.
///
/// Legal transitions: draft --sign--> signed, signed --execute--> executed,
/// signed --dispute--> disputed, executed --dispute--> disputed. `disputed`
/// is a sink; nothing leaves it.
pub fn transition(
    from: AgreementStatus,
    event: LifecycleEvent,
) -> Result<AgreementStatus, LifecycleError> {
    match (from, event) {
        (AgreementStatus::Draft, LifecycleEvent::Sign) => Ok(AgreementStatus::Signed),
        (AgreementStatus::Signed, LifecycleEvent::Execute) => Ok(AgreementStatus::Executed),
        (AgreementStatus::Signed, LifecycleEvent::Dispute) => Ok(AgreementStatus::Disputed),
        (AgreementStatus::Executed, LifecycleEvent::Dispute) => Ok(AgreementStatus::Disputed),
        _ => Err(LifecycleError::InvalidTransition { from, event }),
    }
}

/// Check that the actor holds whatever capability the event requires.
///
/// Signing is reserved to the record's creator; execute and dispute are open
/// to any connected party.
pub fn authorize(
    record: &AgreementRecord,
    actor: &Address,
    event: LifecycleEvent,
) -> Result<(), LifecycleError> {
    match event {
        LifecycleEvent::Sign if !record.is_creator(actor) => {
            Err(LifecycleError::Unauthorized { event })
        }
        _ => Ok(()),
    }
}

/// Legality check followed by capability check; returns the next status.
///
/// Nothing is written on failure: the caller only persists the returned
/// status.
pub fn apply(
    record: &AgreementRecord,
    actor: &Address,
    event: LifecycleEvent,
) -> Result<AgreementStatus, LifecycleError> {
    let next = transition(record.status, event)?;
    authorize(record, actor, event)?;
    Ok(next)
}
