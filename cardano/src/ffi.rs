//! Host-language bridge (§6.1): the handful of entry points an external
//! caller (an off-chain tool, a JS/Haskell bridge) needs to apply an
//! argument to a script, run one standalone, or evaluate every redeemer
//! in a built transaction against the UTxOs it spends and references.

use std::rc::Rc;

use cardano_primitives::conway::{MintedTx, RedeemerTag, TransactionInput, TransactionOutput};
use cardano_primitives::{Fragment, PlutusData};
use cardano_uplc::ast::{Constant, Program, Term};
use cardano_uplc::machine::cost_model::{CostModel, CostModelError, ExBudget};
use cardano_validate::uplc::error::Error as ScriptContextError;
use cardano_validate::uplc::machine::{self, EvalError};
use cardano_validate::uplc::script_context::{
    DataLookupTable, ResolvedInput, ScriptVersion, TxInfoV1, TxInfoV2, TxInfoV3,
};
use cardano_validate::uplc::to_plutus_data::ToPlutusData;

pub use cardano_configs::SlotConfig;

#[derive(Debug, thiserror::Error)]
pub enum FfiError {
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("malformed script wrapper, expected a cbor-wrapped flat program")]
    MalformedScriptWrapper,
    #[error("flat decoding failed: {0}")]
    Flat(#[from] cardano_uplc::error::Error),
    #[error("invalid plutus data json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid transaction cbor: {0}")]
    MalformedTransaction(String),
    #[error("invalid utxo cbor: {0}")]
    MalformedUtxoSet(String),
    #[error(transparent)]
    ScriptContext(#[from] ScriptContextError),
    #[error("invalid cost model json: {0}")]
    CostModel(#[from] CostModelError),
    #[error("script {reason} (spent {budget_spent:?})", reason = reason, budget_spent = budget_spent)]
    ScriptFailed { reason: String, budget_spent: ExBudget, logs: Vec<String> },
    #[error("no redeemer evaluated for tag {tag:?} index {index}")]
    MissingScriptForRedeemer { tag: RedeemerTag, index: u32 },
}

impl From<EvalError> for FfiError {
    fn from(err: EvalError) -> Self {
        match err {
            EvalError::Flat(e) => FfiError::Flat(e),
            EvalError::ScriptFailed { reason, budget_spent, logs } => {
                FfiError::ScriptFailed { reason: reason.to_string(), budget_spent, logs }
            }
        }
    }
}

/// Execution units spent, in the shape §6.1 asks the FFI surface to
/// report them in (`memory`/`steps` rather than `cardano_uplc`'s
/// internal `mem`/`cpu`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Budget {
    pub memory: i64,
    pub steps: i64,
}

impl From<ExBudget> for Budget {
    fn from(b: ExBudget) -> Self {
        Budget { memory: b.mem, steps: b.cpu }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct EvaluateScriptResult {
    pub is_success: bool,
    pub budget: Budget,
    pub logs: Vec<String>,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct RedeemerResult {
    pub tag: RedeemerTag,
    pub index: u32,
    pub budget: Budget,
}

/// Strips the outer CBOR bytestring a script carries on disk (§6.2's
/// "double-CBOR" convention), returning the inner Flat-encoded program.
fn unwrap_double_cbor(bytes: &[u8]) -> Result<Vec<u8>, FfiError> {
    let inner: cardano_codec::utils::Bytes =
        cardano_codec::minicbor::decode(bytes).map_err(|_| FfiError::MalformedScriptWrapper)?;
    Ok(inner.into())
}

fn wrap_double_cbor(flat: Vec<u8>) -> Vec<u8> {
    let wrapped = cardano_codec::utils::Bytes::from(flat);
    cardano_codec::minicbor::to_vec(&wrapped).expect("cbor bytestring encoding is infallible")
}

/// §6.1 `applyDataArgToScript`: partially applies `data` to `script`'s
/// top-level term, returning the re-serialized, double-CBOR-wrapped
/// script hex.
pub fn apply_data_arg_to_script(script_hex: &str, data_json: &str) -> Result<String, FfiError> {
    let wrapped = hex::decode(script_hex)?;
    let flat = unwrap_double_cbor(&wrapped)?;
    let program = cardano_uplc::flat::decode_program(&flat)?;
    let data: PlutusData = serde_json::from_str(data_json)?;

    let arg = Term::Constant(Rc::new(Constant::Data(data)));
    let applied = Program {
        version: program.version,
        term: Term::Apply(Rc::new(program.term), Rc::new(arg)),
    };

    let flat_out = cardano_uplc::flat::encode_program(&applied);
    Ok(hex::encode(wrap_double_cbor(flat_out)))
}

/// §6.1 `evaluateScript`: runs a double-CBOR-wrapped, already fully
/// applied program to completion with the protocol-maximum budget as
/// a ceiling, reporting whatever budget it spent and logs it emitted
/// whether it succeeded or failed.
pub fn evaluate_script(script_hex: &str) -> Result<EvaluateScriptResult, FfiError> {
    let wrapped = hex::decode(script_hex)?;
    let flat = unwrap_double_cbor(&wrapped)?;
    let cost_model = CostModel::plutus_v3();

    match machine::evaluate(&flat, vec![], &cost_model, ExBudget::max()) {
        Ok(result) => Ok(EvaluateScriptResult {
            is_success: true,
            budget: result.budget_spent.into(),
            logs: result.logs,
        }),
        Err(EvalError::ScriptFailed { budget_spent, logs, .. }) => Ok(EvaluateScriptResult {
            is_success: false,
            budget: budget_spent.into(),
            logs,
        }),
        Err(e @ EvalError::Flat(_)) => Err(e.into()),
    }
}

fn local_slot_config(sc: SlotConfig) -> cardano_validate::uplc::script_context::SlotConfig {
    cardano_validate::uplc::script_context::SlotConfig {
        slot_length: sc.slot_length,
        zero_slot: sc.zero_slot,
        zero_time: sc.zero_time.max(0) as u64,
    }
}

fn decode_utxos<'b>(utxo_cbor: &'b [u8]) -> Result<Vec<ResolvedInput<'b>>, FfiError> {
    let pairs: Vec<(TransactionInput, TransactionOutput<'b>)> =
        cardano_codec::minicbor::decode(utxo_cbor).map_err(|e| FfiError::MalformedUtxoSet(e.to_string()))?;

    Ok(pairs.into_iter().map(|(input, output)| ResolvedInput { input, output }).collect())
}

fn cost_model_for(cost_models: &serde_json::Value, key: &str) -> Result<CostModel, FfiError> {
    match cost_models.get(key) {
        Some(raw) => Ok(CostModel::from_json(raw)?),
        None => Ok(CostModel::plutus_v3()),
    }
}

/// §6.1 `evalPlutusScripts`: decodes a built transaction and the UTxOs it
/// references, builds the script context for every redeemer, and runs
/// each one, returning the execution units actually spent.
pub fn eval_plutus_scripts<'b>(
    tx_cbor: &'b [u8],
    utxo_cbor: &'b [u8],
    slot_config: SlotConfig,
    cost_models: &serde_json::Value,
) -> Result<Vec<RedeemerResult>, FfiError> {
    let tx = MintedTx::decode_fragment(tx_cbor).map_err(|e| FfiError::MalformedTransaction(e.to_string()))?;
    let utxos = decode_utxos(utxo_cbor)?;
    let slot_config = local_slot_config(slot_config);

    let lookup_table = DataLookupTable::from_transaction(&tx, &utxos);

    let cost_model_v1 = cost_model_for(cost_models, "PlutusV1")?;
    let cost_model_v2 = cost_model_for(cost_models, "PlutusV2")?;
    let cost_model_v3 = cost_model_for(cost_models, "PlutusV3")?;

    let redeemers: Vec<_> = tx
        .transaction_witness_set
        .redeemer
        .as_deref()
        .map(|redeemers| match redeemers {
            cardano_primitives::conway::Redeemers::List(list) => list.clone(),
            cardano_primitives::conway::Redeemers::Map(map) => map
                .iter()
                .map(|(key, value)| cardano_primitives::conway::Redeemer {
                    tag: key.tag,
                    index: key.index,
                    data: value.data.clone(),
                    ex_units: value.ex_units,
                })
                .collect(),
        })
        .unwrap_or_default();

    let mut results = Vec::with_capacity(redeemers.len());

    for redeemer in &redeemers {
        let (version, datum) = cardano_validate::uplc::script_context::find_script(
            redeemer,
            &tx,
            &utxos,
            &lookup_table,
        )?;

        let (script_bytes, cost_model) = match &version {
            ScriptVersion::Native(_) => continue,
            ScriptVersion::V1(script) => (Vec::<u8>::from(script.0.clone()), &cost_model_v1),
            ScriptVersion::V2(script) => (Vec::<u8>::from(script.0.clone()), &cost_model_v2),
            ScriptVersion::V3(script) => (Vec::<u8>::from(script.0.clone()), &cost_model_v3),
        };

        let tx_info = match &version {
            ScriptVersion::Native(_) => unreachable!(),
            ScriptVersion::V1(_) => TxInfoV1::from_transaction(&tx, &utxos, &slot_config)?,
            ScriptVersion::V2(_) => TxInfoV2::from_transaction(&tx, &utxos, &slot_config)?,
            ScriptVersion::V3(_) => TxInfoV3::from_transaction(&tx, &utxos, &slot_config)?,
        };

        let context = tx_info
            .into_script_context(redeemer, datum.as_ref())
            .ok_or(FfiError::MissingScriptForRedeemer { tag: redeemer.tag, index: redeemer.index })?;

        let mut args = Vec::with_capacity(3);
        if !matches!(version, ScriptVersion::V3(_)) {
            if let Some(datum) = &datum {
                args.push(datum.clone());
            }
            args.push(redeemer.data.clone());
        }
        args.push(context.to_plutus_data());

        let budget = ExBudget { mem: redeemer.ex_units.mem as i64, cpu: redeemer.ex_units.steps as i64 };
        let budget = if budget.mem == 0 && budget.cpu == 0 { ExBudget::max() } else { budget };

        let result = machine::evaluate(&script_bytes, args, cost_model, budget)?;

        results.push(RedeemerResult {
            tag: redeemer.tag,
            index: redeemer.index,
            budget: result.budget_spent.into(),
        });
    }

    Ok(results)
}
