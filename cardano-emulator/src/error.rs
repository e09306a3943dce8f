#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("no utxo found at input {0:?}")]
    UtxoNotFound(cardano_txbuilder::Input),
    #[error("transaction rejected: {0}")]
    SubmitRejected(String),
    #[error("transaction {0:?} already seen")]
    DuplicateSubmission(cardano_txbuilder::TxHash),
}
