use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use cardano_configs::ProtocolParams;
use cardano_primitives::Fragment;
use cardano_txbuilder::{Address, BuiltTransaction, Input, Output, TxHash};

use crate::{provider::Utxo, Error, Provider};

struct State {
    utxos: HashMap<Input, Output>,
    params: ProtocolParams,
    slot: u64,
    submitted: Vec<TxHash>,
}

/// An in-memory [`Provider`], seeded by hand with whatever UTxOs a test
/// needs. `submit` does not re-validate the transaction against ledger
/// rules (that is `cardano-validate`'s job); it only decodes the built
/// bytes, retires the inputs they spend, and records the tx hash.
pub struct Emulator {
    state: Mutex<State>,
}

impl Emulator {
    pub fn new(params: ProtocolParams) -> Self {
        Self {
            state: Mutex::new(State {
                utxos: HashMap::new(),
                params,
                slot: 0,
                submitted: Vec::new(),
            }),
        }
    }

    pub fn insert_utxo(&self, input: Input, output: Output) {
        self.state.lock().unwrap().utxos.insert(input, output);
    }

    pub fn remove_utxo(&self, input: &Input) -> Option<Output> {
        self.state.lock().unwrap().utxos.remove(input)
    }

    pub fn set_slot(&self, slot: u64) {
        self.state.lock().unwrap().slot = slot;
    }

    pub fn submitted(&self) -> Vec<TxHash> {
        self.state.lock().unwrap().submitted.clone()
    }
}

#[async_trait::async_trait]
impl Provider for Emulator {
    async fn find_utxos(&self, address: &Address) -> Result<Vec<Utxo>, Error> {
        let state = self.state.lock().unwrap();

        Ok(state
            .utxos
            .iter()
            .filter(|(_, output)| &output.address == address)
            .map(|(input, output)| Utxo {
                input: *input,
                output: output.clone(),
            })
            .collect())
    }

    async fn resolve_inputs(&self, inputs: &[Input]) -> Result<Vec<Utxo>, Error> {
        let state = self.state.lock().unwrap();

        inputs
            .iter()
            .map(|input| {
                state
                    .utxos
                    .get(input)
                    .map(|output| Utxo {
                        input: *input,
                        output: output.clone(),
                    })
                    .ok_or(Error::UtxoNotFound(*input))
            })
            .collect()
    }

    async fn protocol_params(&self) -> Result<ProtocolParams, Error> {
        Ok(self.state.lock().unwrap().params.clone())
    }

    async fn submit(&self, tx: &BuiltTransaction) -> Result<TxHash, Error> {
        let mut state = self.state.lock().unwrap();

        if state.submitted.contains(&tx.tx_hash) {
            return Err(Error::DuplicateSubmission(tx.tx_hash));
        }

        let decoded = cardano_primitives::conway::Tx::decode_fragment(&tx.tx_bytes.0)
            .map_err(|e| Error::SubmitRejected(e.to_string()))?;

        for input in decoded.transaction_body.inputs.iter() {
            let removed = state.utxos.remove(&Input {
                tx_hash: cardano_txbuilder::Bytes32(*input.transaction_id),
                txo_index: input.index,
            });

            if removed.is_none() {
                return Err(Error::SubmitRejected(format!(
                    "input {:?}#{} not found in utxo set",
                    input.transaction_id, input.index
                )));
            }
        }

        state.submitted.push(tx.tx_hash);

        Ok(tx.tx_hash)
    }

    async fn current_slot(&self) -> Result<u64, Error> {
        Ok(self.state.lock().unwrap().slot)
    }
}

/// A shared handle to an [`Emulator`], cheap to clone across concurrent
/// callers.
pub type SharedEmulator = Arc<Emulator>;

#[cfg(test)]
mod tests {
    use cardano_addresses::Address as PallasAddress;

    use super::*;

    fn dummy_address() -> PallasAddress {
        PallasAddress::from_bech32(
            "addr_test1qpu5vlrf4xkxv2qpwngf6cjhtw542ayty80v8dyr49rf5ewvxwdrt70qlcpeeagscasafhffqsxy36t90ldv06wqrk2qum8x5w",
        )
        .unwrap()
    }

    fn sample_output(lovelace: u64) -> Output {
        Output::new(dummy_address(), lovelace)
    }

    fn sample_input(byte: u8) -> Input {
        Input {
            tx_hash: cardano_txbuilder::Bytes32([byte; 32]),
            txo_index: 0,
        }
    }

    #[tokio::test]
    async fn find_utxos_filters_by_address() {
        let emulator = Emulator::new(ProtocolParams::mainnet());
        let input = sample_input(1);
        let output = sample_output(5_000_000);

        emulator.insert_utxo(input, output.clone());

        let found = emulator.find_utxos(&output.address).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].output, output);
    }

    #[tokio::test]
    async fn resolve_inputs_errors_on_missing_utxo() {
        let emulator = Emulator::new(ProtocolParams::mainnet());
        let input = sample_input(2);

        let err = emulator.resolve_inputs(&[input]).await.unwrap_err();

        assert_eq!(err, Error::UtxoNotFound(input));
    }

    #[tokio::test]
    async fn set_slot_is_observed_by_current_slot() {
        let emulator = Emulator::new(ProtocolParams::mainnet());

        emulator.set_slot(12345);

        assert_eq!(emulator.current_slot().await.unwrap(), 12345);
    }
}
