//! Conversion from ledger types into [`PlutusData`], matching the
//! `plutus-ledger-api` `ToData` encoding so a script sees the same bytes a
//! node would build for it.

use cardano_addresses::{Address, ShelleyDelegationPart, ShelleyPaymentPart, StakePayload};
use cardano_codec::utils::{NonEmptyKeyValuePairs, NonZeroInt};
use cardano_primitives::conway::{
    Certificate, DatumOption, PostAlonzoTransactionOutput, StakeCredential, TransactionInput,
    TransactionOutput, Value, Voter,
};
use cardano_primitives::{AssetName, PlutusData, PolicyId};

use super::script_context::{ScriptContext, ScriptInfo, TimeRange, TxInInfo, TxInfo, TxInfoV1, TxInfoV2, TxInfoV3};

/// The `mint` field of a transaction, reshaped into the sorted,
/// non-empty-or-absent representation the script context expects.
#[derive(Debug, PartialEq, Clone)]
pub struct MintValue {
    pub mint_value: NonEmptyKeyValuePairs<PolicyId, NonEmptyKeyValuePairs<AssetName, NonZeroInt>>,
}

/// Translates a ledger type into the `PlutusData` a script receives,
/// mirroring `plutus-ledger-api`'s `ToData` instances.
pub trait ToPlutusData {
    fn to_plutus_data(&self) -> PlutusData;
}

impl ToPlutusData for Address {
    fn to_plutus_data(&self) -> PlutusData {
        match self {
            Address::Shelley(shelley) => PlutusData::constr(
                0,
                vec![
                    shelley.payment().to_plutus_data(),
                    shelley.delegation().to_plutus_data(),
                ],
            ),
            Address::Stake(stake) => {
                // only used by withdrawal translation, which unwraps this before
                // encoding; kept for completeness.
                stake.payload().to_plutus_data()
            }
            Address::Byron(byron) => PlutusData::bytestring(byron.to_vec()),
        }
    }
}

impl ToPlutusData for ShelleyPaymentPart {
    fn to_plutus_data(&self) -> PlutusData {
        match self {
            ShelleyPaymentPart::Key(hash) => {
                PlutusData::constr(0, vec![PlutusData::bytestring(hash.to_vec())])
            }
            ShelleyPaymentPart::Script(hash) => {
                PlutusData::constr(1, vec![PlutusData::bytestring(hash.to_vec())])
            }
        }
    }
}

impl ToPlutusData for ShelleyDelegationPart {
    fn to_plutus_data(&self) -> PlutusData {
        match self {
            ShelleyDelegationPart::Key(hash) => PlutusData::constr(
                0,
                vec![PlutusData::constr(
                    0,
                    vec![PlutusData::constr(0, vec![PlutusData::bytestring(hash.to_vec())])],
                )],
            ),
            ShelleyDelegationPart::Script(hash) => PlutusData::constr(
                0,
                vec![PlutusData::constr(
                    0,
                    vec![PlutusData::constr(1, vec![PlutusData::bytestring(hash.to_vec())])],
                )],
            ),
            ShelleyDelegationPart::Pointer(_) | ShelleyDelegationPart::Null => {
                PlutusData::constr(1, vec![])
            }
        }
    }
}

impl ToPlutusData for StakePayload {
    fn to_plutus_data(&self) -> PlutusData {
        match self {
            StakePayload::Stake(hash) => {
                PlutusData::constr(0, vec![PlutusData::bytestring(hash.to_vec())])
            }
            StakePayload::Script(hash) => {
                PlutusData::constr(1, vec![PlutusData::bytestring(hash.to_vec())])
            }
        }
    }
}

impl ToPlutusData for StakeCredential {
    fn to_plutus_data(&self) -> PlutusData {
        match self {
            StakeCredential::AddrKeyhash(hash) => {
                PlutusData::constr(0, vec![PlutusData::bytestring(hash.to_vec())])
            }
            StakeCredential::ScriptHash(hash) => {
                PlutusData::constr(1, vec![PlutusData::bytestring(hash.to_vec())])
            }
        }
    }
}

impl ToPlutusData for TransactionInput {
    fn to_plutus_data(&self) -> PlutusData {
        PlutusData::constr(
            0,
            vec![
                PlutusData::constr(0, vec![PlutusData::bytestring(self.transaction_id.to_vec())]),
                PlutusData::integer(self.index as i128),
            ],
        )
    }
}

impl ToPlutusData for Value {
    fn to_plutus_data(&self) -> PlutusData {
        let entries = match self {
            Value::Coin(coin) => vec![(
                PlutusData::bytestring(vec![]),
                PlutusData::map(vec![(PlutusData::bytestring(vec![]), PlutusData::integer(*coin as i128))]),
            )],
            Value::Multiasset(coin, assets) => {
                let mut out = vec![(
                    PlutusData::bytestring(vec![]),
                    PlutusData::map(vec![(PlutusData::bytestring(vec![]), PlutusData::integer(*coin as i128))]),
                )];

                for (policy, tokens) in assets.iter() {
                    let by_name = tokens
                        .iter()
                        .map(|(name, amount)| {
                            (PlutusData::bytestring(name.as_ref().to_vec()), PlutusData::integer(u64::from(*amount) as i128))
                        })
                        .collect();

                    out.push((PlutusData::bytestring(policy.to_vec()), PlutusData::map(by_name)));
                }

                out
            }
        };

        PlutusData::map(entries)
    }
}

impl ToPlutusData for DatumOption {
    fn to_plutus_data(&self) -> PlutusData {
        match self {
            DatumOption::Hash(hash) => PlutusData::constr(1, vec![PlutusData::bytestring(hash.to_vec())]),
            DatumOption::Data(data) => PlutusData::constr(2, vec![data.0.clone()]),
        }
    }
}

fn no_datum() -> PlutusData {
    PlutusData::constr(0, vec![])
}

impl<'b> ToPlutusData for TransactionOutput<'b> {
    fn to_plutus_data(&self) -> PlutusData {
        match self {
            TransactionOutput::Legacy(output) => {
                let address = cardano_addresses::Address::from_bytes(&output.address).unwrap();
                let datum = output
                    .datum_hash
                    .map(|hash| PlutusData::constr(1, vec![PlutusData::bytestring(hash.to_vec())]))
                    .unwrap_or_else(no_datum);

                PlutusData::constr(
                    0,
                    vec![
                        address.to_plutus_data(),
                        output.amount.to_plutus_data(),
                        datum,
                        PlutusData::constr(0, vec![]),
                    ],
                )
            }
            TransactionOutput::PostAlonzo(output) => output.to_plutus_data(),
        }
    }
}

impl<'b> ToPlutusData for PostAlonzoTransactionOutput<'b> {
    fn to_plutus_data(&self) -> PlutusData {
        let address = cardano_addresses::Address::from_bytes(&self.address).unwrap();
        let datum = self.datum_option.as_ref().map(ToPlutusData::to_plutus_data).unwrap_or_else(no_datum);
        let script_ref = self
            .script_ref
            .as_ref()
            .map(|script_ref| PlutusData::constr(1, vec![PlutusData::bytestring(script_ref_hash(script_ref))]))
            .unwrap_or_else(|| PlutusData::constr(0, vec![]));

        PlutusData::constr(0, vec![address.to_plutus_data(), self.value.to_plutus_data(), datum, script_ref])
    }
}

fn script_ref_hash(script_ref: &cardano_primitives::conway::ScriptRef<'_>) -> Vec<u8> {
    use cardano_traverse::ComputeHash;
    match script_ref {
        cardano_primitives::conway::ScriptRef::NativeScript(s) => s.compute_hash().to_vec(),
        cardano_primitives::conway::ScriptRef::PlutusV1Script(s) => s.compute_hash().to_vec(),
        cardano_primitives::conway::ScriptRef::PlutusV2Script(s) => s.compute_hash().to_vec(),
        cardano_primitives::conway::ScriptRef::PlutusV3Script(s) => s.compute_hash().to_vec(),
    }
}

impl<'b> ToPlutusData for TxInInfo<'b> {
    fn to_plutus_data(&self) -> PlutusData {
        PlutusData::constr(0, vec![self.out_ref.to_plutus_data(), self.resolved.to_plutus_data()])
    }
}

impl ToPlutusData for Certificate {
    fn to_plutus_data(&self) -> PlutusData {
        match self {
            Certificate::StakeRegistration(cred) => PlutusData::constr(0, vec![cred.to_plutus_data()]),
            Certificate::StakeDeregistration(cred) => PlutusData::constr(1, vec![cred.to_plutus_data()]),
            Certificate::StakeDelegation(cred, pool) => PlutusData::constr(
                2,
                vec![cred.to_plutus_data(), PlutusData::bytestring(pool.to_vec())],
            ),
            _ => PlutusData::constr(10, vec![]),
        }
    }
}

impl ToPlutusData for Voter {
    fn to_plutus_data(&self) -> PlutusData {
        match self {
            Voter::ConstitutionalCommitteeKey(hash) => {
                PlutusData::constr(0, vec![PlutusData::bytestring(hash.to_vec())])
            }
            Voter::ConstitutionalCommitteeScript(hash) => {
                PlutusData::constr(1, vec![PlutusData::bytestring(hash.to_vec())])
            }
            Voter::DRepKey(hash) => PlutusData::constr(2, vec![PlutusData::bytestring(hash.to_vec())]),
            Voter::DRepScript(hash) => PlutusData::constr(3, vec![PlutusData::bytestring(hash.to_vec())]),
            Voter::StakePoolKey(hash) => PlutusData::constr(4, vec![PlutusData::bytestring(hash.to_vec())]),
        }
    }
}

fn extended(bound: Option<u64>) -> PlutusData {
    match bound {
        None => PlutusData::constr(0, vec![]),
        Some(t) => PlutusData::constr(1, vec![PlutusData::integer(t as i128)]),
    }
}

fn lower_bound(time: Option<u64>) -> PlutusData {
    PlutusData::constr(0, vec![extended(time), PlutusData::constr(1, vec![])])
}

fn upper_bound(time: Option<u64>) -> PlutusData {
    match time {
        None => PlutusData::constr(0, vec![PlutusData::constr(2, vec![]), PlutusData::constr(1, vec![])]),
        Some(t) => PlutusData::constr(
            0,
            vec![PlutusData::constr(1, vec![PlutusData::integer(t as i128)]), PlutusData::constr(0, vec![])],
        ),
    }
}

impl ToPlutusData for TimeRange {
    fn to_plutus_data(&self) -> PlutusData {
        PlutusData::constr(0, vec![lower_bound(self.lower_bound), upper_bound(self.upper_bound)])
    }
}

impl ToPlutusData for ScriptInfo<()> {
    fn to_plutus_data(&self) -> PlutusData {
        match self {
            ScriptInfo::Minting(policy) => PlutusData::constr(0, vec![PlutusData::bytestring(policy.to_vec())]),
            ScriptInfo::Spending(out_ref, ()) => PlutusData::constr(1, vec![out_ref.to_plutus_data()]),
            ScriptInfo::Rewarding(cred) => PlutusData::constr(2, vec![cred.to_plutus_data()]),
            ScriptInfo::Certifying(ix, cert) => {
                PlutusData::constr(3, vec![PlutusData::integer(*ix as i128), cert.to_plutus_data()])
            }
            ScriptInfo::Voting(voter) => PlutusData::constr(4, vec![voter.to_plutus_data()]),
            ScriptInfo::Proposing(ix, _) => PlutusData::constr(5, vec![PlutusData::integer(*ix as i128)]),
        }
    }
}

impl<'b> ToPlutusData for TxInfoV1<'b> {
    fn to_plutus_data(&self) -> PlutusData {
        PlutusData::constr(
            0,
            vec![
                PlutusData::list(self.inputs.iter().map(ToPlutusData::to_plutus_data).collect()),
                PlutusData::list(self.outputs.iter().map(ToPlutusData::to_plutus_data).collect()),
                self.fee.to_plutus_data(),
                self.mint.to_plutus_data(),
                PlutusData::list(self.certificates.iter().map(ToPlutusData::to_plutus_data).collect()),
                PlutusData::map(
                    self.withdrawals
                        .iter()
                        .map(|(addr, coin)| (addr.to_plutus_data(), PlutusData::integer(*coin as i128)))
                        .collect(),
                ),
                self.valid_range.to_plutus_data(),
                PlutusData::list(self.signatories.iter().map(|h| PlutusData::bytestring(h.to_vec())).collect()),
                PlutusData::map(
                    self.data
                        .iter()
                        .map(|(hash, datum)| (PlutusData::bytestring(hash.to_vec()), datum.clone()))
                        .collect(),
                ),
                PlutusData::constr(0, vec![PlutusData::bytestring(self.id.to_vec())]),
            ],
        )
    }
}

impl<'b> ToPlutusData for TxInfoV2<'b> {
    fn to_plutus_data(&self) -> PlutusData {
        PlutusData::constr(
            0,
            vec![
                PlutusData::list(self.inputs.iter().map(ToPlutusData::to_plutus_data).collect()),
                PlutusData::list(self.reference_inputs.iter().map(ToPlutusData::to_plutus_data).collect()),
                PlutusData::list(self.outputs.iter().map(ToPlutusData::to_plutus_data).collect()),
                self.fee.to_plutus_data(),
                self.mint.to_plutus_data(),
                PlutusData::list(self.certificates.iter().map(ToPlutusData::to_plutus_data).collect()),
                PlutusData::map(
                    self.withdrawals
                        .iter()
                        .map(|(addr, coin)| (addr.to_plutus_data(), PlutusData::integer(*coin as i128)))
                        .collect(),
                ),
                self.valid_range.to_plutus_data(),
                PlutusData::list(self.signatories.iter().map(|h| PlutusData::bytestring(h.to_vec())).collect()),
                PlutusData::map(
                    self.data
                        .iter()
                        .map(|(hash, datum)| (PlutusData::bytestring(hash.to_vec()), datum.clone()))
                        .collect(),
                ),
                PlutusData::constr(0, vec![PlutusData::bytestring(self.id.to_vec())]),
            ],
        )
    }
}

impl<'b> ToPlutusData for TxInfoV3<'b> {
    fn to_plutus_data(&self) -> PlutusData {
        PlutusData::constr(
            0,
            vec![
                PlutusData::list(self.inputs.iter().map(ToPlutusData::to_plutus_data).collect()),
                PlutusData::list(self.reference_inputs.iter().map(ToPlutusData::to_plutus_data).collect()),
                PlutusData::list(self.outputs.iter().map(ToPlutusData::to_plutus_data).collect()),
                PlutusData::integer(self.fee as i128),
                self.mint.to_plutus_data(),
                PlutusData::list(self.certificates.iter().map(ToPlutusData::to_plutus_data).collect()),
                PlutusData::map(
                    self.withdrawals
                        .iter()
                        .map(|(addr, coin)| (addr.to_plutus_data(), PlutusData::integer(*coin as i128)))
                        .collect(),
                ),
                self.valid_range.to_plutus_data(),
                PlutusData::list(self.signatories.iter().map(|h| PlutusData::bytestring(h.to_vec())).collect()),
                PlutusData::map(
                    self.data
                        .iter()
                        .map(|(hash, datum)| (PlutusData::bytestring(hash.to_vec()), datum.clone()))
                        .collect(),
                ),
                PlutusData::constr(0, vec![PlutusData::bytestring(self.id.to_vec())]),
                PlutusData::map(
                    self.votes
                        .iter()
                        .map(|(voter, _)| (voter.to_plutus_data(), PlutusData::map(vec![])))
                        .collect(),
                ),
                PlutusData::list(vec![]),
                self.current_treasury_amount
                    .map(|a| PlutusData::constr(0, vec![PlutusData::integer(a as i128)]))
                    .unwrap_or_else(|| PlutusData::constr(1, vec![])),
                self.treasury_donation
                    .map(|a| PlutusData::constr(0, vec![PlutusData::integer(u64::from(a) as i128)]))
                    .unwrap_or_else(|| PlutusData::constr(1, vec![])),
            ],
        )
    }
}

impl<'b> ToPlutusData for TxInfo<'b> {
    fn to_plutus_data(&self) -> PlutusData {
        match self {
            TxInfo::V1(info) => info.to_plutus_data(),
            TxInfo::V2(info) => info.to_plutus_data(),
            TxInfo::V3(info) => info.to_plutus_data(),
        }
    }
}

impl ToPlutusData for MintValue {
    fn to_plutus_data(&self) -> PlutusData {
        let entries = self
            .mint_value
            .iter()
            .map(|(policy, assets)| {
                let by_name = assets
                    .iter()
                    .map(|(name, amount)| {
                        (PlutusData::bytestring(name.as_ref().to_vec()), PlutusData::integer(i64::from(*amount) as i128))
                    })
                    .collect();

                (PlutusData::bytestring(policy.to_vec()), PlutusData::map(by_name))
            })
            .collect();

        PlutusData::map(entries)
    }
}

/// Applies `script_context.to_plutus_data()` through the purpose/redeemer
/// shape a V1/V2 script expects: `[script_context]`. V3 receives the
/// redeemer data directly as its own argument (§4.6, the `ScriptContext`
/// passed to `evalPlutusScripts`).
impl<'b> ToPlutusData for ScriptContext<'b> {
    fn to_plutus_data(&self) -> PlutusData {
        match self {
            ScriptContext::V1V2 { tx_info, purpose } => {
                PlutusData::constr(0, vec![tx_info.to_plutus_data(), purpose.to_plutus_data()])
            }
            ScriptContext::V3 { tx_info, redeemer, purpose } => PlutusData::constr(
                0,
                vec![tx_info.to_plutus_data(), redeemer.clone(), script_info_v3(purpose)],
            ),
        }
    }
}

fn script_info_v3(purpose: &ScriptInfo<Option<PlutusData>>) -> PlutusData {
    match purpose {
        ScriptInfo::Minting(policy) => PlutusData::constr(0, vec![PlutusData::bytestring(policy.to_vec())]),
        ScriptInfo::Spending(out_ref, datum) => PlutusData::constr(
            1,
            vec![
                out_ref.to_plutus_data(),
                datum
                    .as_ref()
                    .map(|d| PlutusData::constr(0, vec![d.clone()]))
                    .unwrap_or_else(|| PlutusData::constr(1, vec![])),
            ],
        ),
        ScriptInfo::Rewarding(cred) => PlutusData::constr(2, vec![cred.to_plutus_data()]),
        ScriptInfo::Certifying(ix, cert) => {
            PlutusData::constr(3, vec![PlutusData::integer(*ix as i128), cert.to_plutus_data()])
        }
        ScriptInfo::Voting(voter) => PlutusData::constr(4, vec![voter.to_plutus_data()]),
        ScriptInfo::Proposing(ix, _) => PlutusData::constr(5, vec![PlutusData::integer(*ix as i128)]),
    }
}
