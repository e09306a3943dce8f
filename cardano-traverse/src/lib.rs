//! Hashing helpers for Conway-era transaction bodies and auxiliary data.

use std::fmt::Display;

use thiserror::Error;

mod hashes;

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct OutputRef(cardano_crypto::hash::Hash<32>, u64);

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid CBOR structure: {0}")]
    InvalidCbor(String),

    #[error("Invalid UTxO ref: {0}")]
    InvalidUtxoRef(String),
}

impl Error {
    pub fn invalid_cbor(error: impl Display) -> Self {
        Error::InvalidCbor(format!("{error}"))
    }

    pub fn invalid_utxo_ref(str: &str) -> Self {
        Error::InvalidUtxoRef(str.to_owned())
    }
}

/// Computes the canonical hash of a CBOR-serializable structure, per the
/// tagging scheme each concrete type requires (transaction bodies, native
/// scripts, Plutus scripts and auxiliary data all hash differently).
pub trait ComputeHash<const BYTES: usize> {
    fn compute_hash(&self) -> cardano_crypto::hash::Hash<BYTES>;
}
