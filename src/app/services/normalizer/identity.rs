//! Surrogate identifiers for importers and exporters
//!
//! An identifier is `<PREFIX>-<16 hex digits>`: the first 64 bits of
//! SHA-256 over the optional key, the party kind and the normalized name.
//! Names are normalized by trimming, collapsing whitespace and lowercasing,
//! so `" Acme  Co"` and `"ACME CO"` share an identifier.
//!
//! With 64-bit identifiers the chance of any collision among `n` distinct
//! names is roughly `n² / 2⁶⁵` (about 3·10⁻⁸ for a million names).

use crate::app::adapters::key_store::EncryptionKey;
use crate::constants::{EXPORTER_ID_PREFIX, IMPORTER_ID_PREFIX, SURROGATE_ID_BYTES};
use sha2::{Digest, Sha256};

/// Which side of a shipment a party is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyKind {
    Importer,
    Exporter,
}

impl PartyKind {
    pub fn prefix(self) -> &'static str {
        match self {
            PartyKind::Importer => IMPORTER_ID_PREFIX,
            PartyKind::Exporter => EXPORTER_ID_PREFIX,
        }
    }
}

/// Deterministic name → identifier function, optionally keyed
#[derive(Debug, Clone, Default)]
pub struct SurrogateIdGenerator {
    key: Option<Vec<u8>>,
}

impl SurrogateIdGenerator {
    /// Unkeyed generator; identifiers can be recomputed from names alone
    pub fn new() -> Self {
        Self::default()
    }

    /// Generator keyed with the process encryption key
    pub fn keyed(key: &EncryptionKey) -> Self {
        Self {
            key: Some(key.as_bytes().to_vec()),
        }
    }

    pub fn is_keyed(&self) -> bool {
        self.key.is_some()
    }

    pub fn importer_id(&self, name: &str) -> String {
        self.generate(PartyKind::Importer, name)
    }

    pub fn exporter_id(&self, name: &str) -> String {
        self.generate(PartyKind::Exporter, name)
    }

    pub fn generate(&self, kind: PartyKind, name: &str) -> String {
        let mut hasher = Sha256::new();
        if let Some(key) = &self.key {
            hasher.update(key);
        }
        hasher.update([0u8]);
        hasher.update(kind.prefix().as_bytes());
        hasher.update([0u8]);
        hasher.update(normalize_party_name(name).as_bytes());

        let digest = hasher.finalize();
        format!("{}-{}", kind.prefix(), hex::encode(&digest[..SURROGATE_ID_BYTES]))
    }
}

/// Name form identifiers are derived from
pub fn normalize_party_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
