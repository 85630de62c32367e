//! Client configuration.
//!
//! Network parameters for disclosure authorizations plus session key sizing.
//! The embedding application owns where the values come from (file, env,
//! wallet handshake); this struct only carries them, with serde defaults so
//! partial sources deserialize cleanly.

use serde::{Deserialize, Serialize};

use covenant_core::{DEFAULT_VALIDITY_DAYS, SESSION_KEY_HEX_CHARS};

/// Configuration for a [`crate::service::CovenantClient`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Ledger contract address bound into disclosure authorizations
    #[serde(default)]
    pub ledger_address: String,

    /// Chain the ledger lives on
    #[serde(default)]
    pub chain_id: u64,

    /// Validity window of a disclosure authorization, in days
    #[serde(default = "default_validity_days")]
    pub authorization_validity_days: u32,

    /// Hex length of generated session public keys
    #[serde(default = "default_session_key_hex_chars")]
    pub session_key_hex_chars: usize,
}

fn default_validity_days() -> u32 {
    DEFAULT_VALIDITY_DAYS
}

fn default_session_key_hex_chars() -> usize {
    SESSION_KEY_HEX_CHARS
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            ledger_address: String::new(),
            chain_id: 0,
            authorization_validity_days: default_validity_days(),
            session_key_hex_chars: default_session_key_hex_chars(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"ledger_address": "0x1234", "chain_id": 11155111}"#).unwrap();
        assert_eq!(config.ledger_address, "0x1234");
        assert_eq!(config.chain_id, 11155111);
        assert_eq!(config.authorization_validity_days, 30);
        assert_eq!(config.session_key_hex_chars, 2000);
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert!(config.ledger_address.is_empty());
        assert_eq!(config.chain_id, 0);
        assert_eq!(config.authorization_validity_days, 30);
    }
}
