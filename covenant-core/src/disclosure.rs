//! Disclosure authorization material.
//!
//! Revealing an encrypted term requires a fresh signature over a canonical
//! authorization message that binds a session public key to the ledger
//! address, the chain id, and a validity window. This module owns the
//! message format and the session key material; the sequencing (sign first,
//! decrypt only after) lives in the client's disclosure session.
//!
//! The canonical message is the exact string that gets signed, so its field
//! order and formatting are frozen:
//!
//! ```text
//! publickey:<hex>
//! contractAddresses:<address>
//! contractsChainId:<int>
//! startTimestamp:<unix-seconds>
//! durationDays:<int>
//! ```

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Default validity window for a disclosure authorization.
pub const DEFAULT_VALIDITY_DAYS: u32 = 30;

/// Hex length of a generated session public key, `0x` prefix excluded.
pub const SESSION_KEY_HEX_CHARS: usize = 2000;

/// Parameters bound into one disclosure authorization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisclosureRequest {
    /// Session public key, `0x`-prefixed hex
    pub public_key: String,
    /// Ledger contract address the authorization applies to
    pub ledger_address: String,
    /// Chain the ledger lives on
    pub chain_id: u64,
    /// Window start, seconds since the Unix epoch
    pub start_timestamp: u64,
    /// Window length in days
    pub duration_days: u32,
}

impl DisclosureRequest {
    /// Build a request starting now with the default validity window.
    pub fn new(public_key: String, ledger_address: String, chain_id: u64) -> Self {
        Self {
            public_key,
            ledger_address,
            chain_id,
            start_timestamp: Utc::now().timestamp() as u64,
            duration_days: DEFAULT_VALIDITY_DAYS,
        }
    }

    /// The canonical newline-joined message to sign.
    pub fn message(&self) -> String {
        format!(
            "publickey:{}\ncontractAddresses:{}\ncontractsChainId:{}\nstartTimestamp:{}\ndurationDays:{}",
            self.public_key,
            self.ledger_address,
            self.chain_id,
            self.start_timestamp,
            self.duration_days
        )
    }
}

/// Generate a fresh `0x`-prefixed session public key of `hex_chars` digits.
pub fn generate_session_key(hex_chars: usize) -> String {
    const HEX: &[u8] = b"0123456789abcdef";
    let mut rng = rand::thread_rng();
    let body: String = (0..hex_chars)
        .map(|_| HEX[rng.gen_range(0..HEX.len())] as char)
        .collect();
    format!("0x{body}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_format() {
        let request = DisclosureRequest {
            public_key: "0xdeadbeef".to_string(),
            ledger_address: "0x1234".to_string(),
            chain_id: 11155111,
            start_timestamp: 1_700_000_000,
            duration_days: 30,
        };

        assert_eq!(
            request.message(),
            "publickey:0xdeadbeef\n\
             contractAddresses:0x1234\n\
             contractsChainId:11155111\n\
             startTimestamp:1700000000\n\
             durationDays:30"
        );
    }

    #[test]
    fn test_message_deterministic() {
        let request =
            DisclosureRequest::new("0xabc".to_string(), "0x1234".to_string(), 1);
        assert_eq!(request.message(), request.message());
        assert_eq!(request.duration_days, DEFAULT_VALIDITY_DAYS);
    }

    #[test]
    fn test_session_key_shape() {
        let key = generate_session_key(SESSION_KEY_HEX_CHARS);
        assert!(key.starts_with("0x"));
        assert_eq!(key.len(), 2 + SESSION_KEY_HEX_CHARS);
        assert!(key[2..]
            .chars()
            .all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
