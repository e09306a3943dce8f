use cardano_configs::ProtocolParams;
use cardano_txbuilder::{Address, BuiltTransaction, Input, Output, TxHash};

use crate::Error;

/// A resolved transaction input: the reference plus the output it spends.
#[derive(Debug, Clone, PartialEq)]
pub struct Utxo {
    pub input: Input,
    pub output: Output,
}

/// The entire network-facing surface a transaction builder needs: UTxO
/// lookup, protocol parameters, submission, and the current slot. No
/// implementation of this trait is part of the core contract, only the
/// interface is — callers plug in a node client, an indexer, or (for
/// testing) [`crate::Emulator`].
#[async_trait::async_trait]
pub trait Provider {
    async fn find_utxos(&self, address: &Address) -> Result<Vec<Utxo>, Error>;

    async fn resolve_inputs(&self, inputs: &[Input]) -> Result<Vec<Utxo>, Error>;

    async fn protocol_params(&self) -> Result<ProtocolParams, Error>;

    async fn submit(&self, tx: &BuiltTransaction) -> Result<TxHash, Error>;

    async fn current_slot(&self) -> Result<u64, Error>;
}
