use std::{collections::BTreeMap, ops::Deref};

use cardano_codec::utils::CborWrap;
use cardano_crypto::hash::Hash;
use cardano_primitives::{
    conway::{
        AuxiliaryData, DatumOption, ExUnits as PallasExUnits, NativeScript, NetworkId,
        NonZeroInt, PlutusData, PlutusScript, PostAlonzoTransactionOutput, Redeemer, RedeemerTag,
        ScriptRef, TransactionBody, TransactionInput, TransactionOutput, Tx, Value, WitnessSet,
    },
    Fragment, NonEmptySet, PositiveCoin,
};
use cardano_traverse::ComputeHash;

use crate::{
    scriptdata,
    transaction::{
        model::{
            BuilderEra, BuiltTransaction, DatumKind, ExUnits, Output, RedeemerPurpose, ScriptKind,
            StagingTransaction,
        },
        Bytes, Bytes32, TransactionStatus,
    },
    util, TxBuilderError,
};

pub trait BuildConway {
    fn build_conway_raw(self) -> Result<BuiltTransaction, TxBuilderError>;

    // fn build_babbage(staging_tx: StagingTransaction, resolver: (), params: ()) ->
    // Result<BuiltTransaction, TxBuilderError>;
}

impl BuildConway for StagingTransaction {
    fn build_conway_raw(self) -> Result<BuiltTransaction, TxBuilderError> {
        let mut inputs = self
            .inputs
            .unwrap_or_default()
            .iter()
            .map(|x| TransactionInput {
                transaction_id: x.tx_hash.0.into(),
                index: x.txo_index,
            })
            .collect::<Vec<_>>();

        inputs.sort_unstable_by_key(|x| (x.transaction_id, x.index));

        let outputs = self
            .outputs
            .unwrap_or_default()
            .iter()
            .map(Output::build_babbage_raw)
            .collect::<Result<Vec<_>, _>>()?;

        let mint = {
            let by_policy: BTreeMap<_, _> = self
                .mint
                .iter()
                .flat_map(|x| x.deref().iter())
                .map(|(pid, assets)| {
                    let by_asset: BTreeMap<_, _> = assets
                        .iter()
                        .map(|(n, x)| (n.0.clone().into(), NonZeroInt::try_from(*x).unwrap()))
                        .collect();

                    (Hash::<28>::from(pid.0), by_asset)
                })
                .collect();

            if by_policy.is_empty() {
                None
            } else {
                Some(by_policy)
            }
        };

        let collateral = NonEmptySet::try_from(
            self.collateral_inputs
                .unwrap_or_default()
                .iter()
                .map(|x| TransactionInput {
                    transaction_id: x.tx_hash.0.into(),
                    index: x.txo_index,
                })
                .collect::<Vec<_>>(),
        )
        .ok();

        let required_signers = NonEmptySet::try_from(
            self.disclosed_signers
                .unwrap_or_default()
                .iter()
                .map(|x| x.0.into())
                .collect::<Vec<_>>(),
        )
        .ok();

        let network_id = if let Some(nid) = self.network_id {
            match NetworkId::try_from(nid) {
                Err(()) => return Err(TxBuilderError::InvalidNetworkId),
                Ok(network_id) => Some(network_id),
            }
        } else {
            None
        };

        let collateral_return = self
            .collateral_output
            .as_ref()
            .map(Output::build_babbage_raw)
            .transpose()?;

        let reference_inputs = NonEmptySet::try_from(
            self.reference_inputs
                .unwrap_or_default()
                .iter()
                .map(|x| TransactionInput {
                    transaction_id: x.tx_hash.0.into(),
                    index: x.txo_index,
                })
                .collect::<Vec<_>>(),
        )
        .ok();

        let (mut native_script, mut plutus_v1_script, mut plutus_v2_script, mut plutus_v3_script) =
            (vec![], vec![], vec![], vec![]);

        for (_, script) in self.scripts.unwrap_or_default() {
            match script.kind {
                ScriptKind::Native => {
                    let script = NativeScript::decode_fragment(&script.bytes.0)
                        .map_err(|_| TxBuilderError::MalformedScript)?;

                    native_script.push(script)
                }
                ScriptKind::PlutusV1 => {
                    let script = PlutusScript::<1>(script.bytes.into());

                    plutus_v1_script.push(script)
                }
                ScriptKind::PlutusV2 => {
                    let script = PlutusScript::<2>(script.bytes.into());

                    plutus_v2_script.push(script)
                }
                ScriptKind::PlutusV3 => {
                    let script = PlutusScript::<3>(script.bytes.into());

                    plutus_v3_script.push(script)
                }
            }
        }

        let plutus_data = self
            .datums
            .unwrap_or_default()
            .iter()
            .map(|x| {
                PlutusData::decode_fragment(x.1.as_ref())
                    .map_err(|_| TxBuilderError::MalformedDatum)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut mint_policies = mint
            .iter()
            .flat_map(|x| x.keys())
            .copied()
            .collect::<Vec<_>>();

        mint_policies.sort_unstable_by_key(|x| *x);

        let mut redeemers = vec![];

        if let Some(rdmrs) = self.redeemers {
            for (purpose, (pd, ex_units)) in rdmrs.deref().iter() {
                let ex_units = if let Some(ExUnits { mem, steps }) = ex_units {
                    PallasExUnits {
                        mem: *mem,
                        steps: *steps,
                    }
                } else {
                    todo!("ExUnits budget calculation not yet implement") // TODO
                };

                let data = PlutusData::decode_fragment(pd.as_ref())
                    .map_err(|_| TxBuilderError::MalformedDatum)?;

                match purpose {
                    RedeemerPurpose::Spend(ref txin) => {
                        let index = inputs
                            .iter()
                            .position(|x| {
                                (*x.transaction_id, x.index) == (txin.tx_hash.0, txin.txo_index)
                            })
                            .ok_or(TxBuilderError::RedeemerTargetMissing)?
                            as u32;

                        redeemers.push(Redeemer {
                            tag: RedeemerTag::Spend,
                            index,
                            data,
                            ex_units,
                        })
                    }
                    RedeemerPurpose::Mint(pid) => {
                        let index = mint_policies
                            .iter()
                            .position(|x| x.as_slice() == pid.0.as_slice())
                            .ok_or(TxBuilderError::RedeemerTargetMissing)?
                            as u32;

                        redeemers.push(Redeemer {
                            tag: RedeemerTag::Mint,
                            index,
                            data,
                            ex_units,
                        })
                    } // todo!("reward and cert redeemers not yet supported"), // TODO
                }
            }
        };

        let witness_set_redeemers = cardano_primitives::conway::Redeemers::List(redeemers.clone());

        let script_data_hash = self.language_view.map(|language_view| {
            let dta = scriptdata::ScriptData {
                redeemers: witness_set_redeemers.clone(),
                datums: if !plutus_data.is_empty() {
                    Some(plutus_data.clone())
                } else {
                    None
                },
                language_view,
            };

            dta.hash()
        });

        let auxiliary_data = self
            .auxiliary_data
            .map(|bytes| {
                AuxiliaryData::decode_fragment(bytes.as_ref())
                    .map_err(|_| TxBuilderError::MalformedAuxiliaryData)
            })
            .transpose()?
            .map(util::keep_raw);

        let auxiliary_data_hash = auxiliary_data.as_ref().map(|ad| ad.compute_hash());

        let transaction_body = TransactionBody {
            inputs: cardano_primitives::Set::from(inputs),
            outputs,
            ttl: self.invalid_from_slot,
            validity_interval_start: self.valid_from_slot,
            fee: self.fee.unwrap_or_default(),
            certificates: None, // TODO
            withdrawals: None,  // TODO
            auxiliary_data_hash,
            mint,
            script_data_hash,
            collateral,
            required_signers,
            network_id,
            collateral_return,
            reference_inputs,
            total_collateral: None,    // TODO
            voting_procedures: None,   // TODO
            proposal_procedures: None, // TODO
            treasury_value: None,      // TODO
            donation: None,            // TODO
        };

        let witness_set = WitnessSet {
            vkeywitness: None,
            native_script: NonEmptySet::try_from(
                native_script.into_iter().map(util::keep_raw).collect::<Vec<_>>(),
            )
            .ok(),
            bootstrap_witness: None,
            plutus_v1_script: NonEmptySet::try_from(plutus_v1_script).ok(),
            plutus_v2_script: NonEmptySet::try_from(plutus_v2_script).ok(),
            plutus_v3_script: NonEmptySet::try_from(plutus_v3_script).ok(),
            plutus_data: NonEmptySet::try_from(
                plutus_data.iter().cloned().map(util::keep_raw).collect::<Vec<_>>(),
            )
            .ok()
            .map(util::keep_raw),
            redeemer: if redeemers.is_empty() {
                None
            } else {
                Some(util::keep_raw(witness_set_redeemers))
            },
        };

        let pallas_tx = Tx {
            transaction_body: util::keep_raw(transaction_body),
            transaction_witness_set: util::keep_raw(witness_set),
            success: true, // TODO
            auxiliary_data: auxiliary_data.into(),
        };

        Ok(BuiltTransaction {
            version: self.version,
            era: BuilderEra::Conway,
            status: TransactionStatus::Built,
            tx_hash: Bytes32(*pallas_tx.transaction_body.compute_hash()),
            tx_bytes: Bytes(pallas_tx.encode_fragment().unwrap()),
            signatures: None,
        })
    }

    // fn build_babbage(staging_tx: StagingTransaction) -> Result<BuiltTransaction,
    // TxBuilderError> {     todo!()
    // }
}

impl Output {
    pub fn build_babbage_raw(&self) -> Result<TransactionOutput, TxBuilderError> {
        let assets: BTreeMap<_, _> = self
            .assets
            .iter()
            .flat_map(|x| x.deref().iter())
            .map(|(pid, assets)| {
                let by_asset: BTreeMap<_, _> = assets
                    .iter()
                    .map(|(n, x)| (n.0.clone().into(), PositiveCoin::try_from(*x).unwrap()))
                    .collect();

                (Hash::<28>::from(pid.0), by_asset)
            })
            .collect();

        let value = if assets.is_empty() {
            Value::Coin(self.lovelace)
        } else {
            Value::Multiasset(self.lovelace, assets)
        };

        let datum_option = if let Some(ref d) = self.datum {
            match d.kind {
                DatumKind::Hash => {
                    let dh: [u8; 32] = d
                        .bytes
                        .as_ref()
                        .try_into()
                        .map_err(|_| TxBuilderError::MalformedDatumHash)?;
                    Some(DatumOption::Hash(dh.into()))
                }
                DatumKind::Inline => {
                    let pd = PlutusData::decode_fragment(d.bytes.as_ref())
                        .map_err(|_| TxBuilderError::MalformedDatum)?;
                    Some(DatumOption::Data(CborWrap(pd)))
                }
            }
        } else {
            None
        };

        let script_ref = if let Some(ref s) = self.script {
            let script = match s.kind {
                ScriptKind::Native => {
                    let native = NativeScript::decode_fragment(s.bytes.as_ref())
                        .map_err(|_| TxBuilderError::MalformedScript)?;

                    ScriptRef::NativeScript(util::keep_raw(native))
                }
                ScriptKind::PlutusV1 => {
                    ScriptRef::PlutusV1Script(PlutusScript::<1>(s.bytes.as_ref().to_vec().into()))
                }
                ScriptKind::PlutusV2 => {
                    ScriptRef::PlutusV2Script(PlutusScript::<2>(s.bytes.as_ref().to_vec().into()))
                }
                ScriptKind::PlutusV3 => {
                    ScriptRef::PlutusV3Script(PlutusScript::<3>(s.bytes.as_ref().to_vec().into()))
                }
            };

            Some(script)
        } else {
            None
        };

        Ok(TransactionOutput::PostAlonzo(PostAlonzoTransactionOutput {
            address: self.address.to_vec().into(),
            value,
            datum_option,
            script_ref,
        }))
    }
}
