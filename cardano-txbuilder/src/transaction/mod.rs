//! Wrapper types shared by [`model`] (the staging/built transaction data
//! model) and [`serialise`] (its JSON encoding).

pub mod model;
mod serialise;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bytes32(pub [u8; 32]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bytes64(pub [u8; 64]);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bytes(pub Vec<u8>);

impl From<Vec<u8>> for Bytes {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Hash28(pub [u8; 28]);

pub type TxHash = Bytes32;
pub type PolicyId = Hash28;
pub type ScriptHash = Hash28;
pub type PubKeyHash = Hash28;
pub type PublicKey = Bytes32;
pub type Signature = Bytes64;
pub type ScriptBytes = Bytes;
pub type DatumBytes = Bytes;
pub type DatumHash = Bytes32;
pub type AssetName = Bytes;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Staging,
    Built,
}

impl Default for TransactionStatus {
    fn default() -> Self {
        Self::Staging
    }
}
