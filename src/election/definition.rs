//! Hashed election definition.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::Election;
use crate::error::LayoutError;

/// An election together with its serialized form and the SHA-256 of that form.
///
/// The hash is what ballots embed in their QR metadata, so it must be computed
/// over exactly the bytes that get published.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionDefinition {
    pub election: Election,
    pub election_data: String,
    pub election_hash: String,
}

impl ElectionDefinition {
    /// Serialize (pretty-printed JSON) and hash an election.
    pub fn from_election(election: Election) -> Result<Self, LayoutError> {
        let election_data = serde_json::to_string_pretty(&election)?;
        let election_hash = hash_hex(election_data.as_bytes());
        Ok(Self {
            election,
            election_data,
            election_hash,
        })
    }

    /// Parse an election definition from its published JSON.
    pub fn from_json(election_data: &str) -> Result<Self, LayoutError> {
        let election = serde_json::from_str(election_data)?;
        Ok(Self {
            election,
            election_data: election_data.to_string(),
            election_hash: hash_hex(election_data.as_bytes()),
        })
    }
}

fn hash_hex(data: &[u8]) -> String {
    Sha256::digest(data)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
