//! Loads the builtin cost-model coefficients (§4.4, §6.2) the protocol
//! ships as JSON, keyed by semantic variant (`PlutusV1`/`PlutusV2`/`PlutusV3`).

use cardano_uplc::machine::cost_model::CostModel;
use std::collections::HashMap;

#[derive(Debug, thiserror::Error)]
pub enum CostModelFileError {
    #[error("io error reading cost model file: {0}")]
    Io(#[from] std::io::Error),
    #[error("cost model file is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cost model: {0}")]
    CostModel(#[from] cardano_uplc::machine::cost_model::CostModelError),
    #[error("cost model json has no key for language {0}")]
    MissingLanguage(String),
}

/// Parses a `costModels` JSON document (one key per Plutus language
/// version, each value an object of `<builtin>-cpu-arguments`/
/// `<builtin>-mem-arguments` coefficients) into a `CostModel` per
/// language actually present.
pub fn load_cost_models(raw: &str) -> Result<HashMap<String, CostModel>, CostModelFileError> {
    let doc: serde_json::Value = serde_json::from_str(raw)?;
    let Some(map) = doc.as_object() else {
        return Ok(HashMap::new());
    };
    let mut out = HashMap::new();
    for (language, coefficients) in map {
        out.insert(language.clone(), CostModel::from_json(coefficients)?);
    }
    Ok(out)
}

/// Convenience wrapper over [`load_cost_models`] for a single language,
/// falling back to the embedded `PlutusV3` default if the file has no
/// entry for it (a cost-model file missing `PlutusV3` is still usable for
/// scripts targeting other languages).
pub fn load_cost_model_for(path: &std::path::Path, language: &str) -> Result<CostModel, CostModelFileError> {
    let raw = std::fs::read_to_string(path)?;
    let models = load_cost_models(&raw)?;
    models
        .get(language)
        .cloned()
        .ok_or_else(|| CostModelFileError::MissingLanguage(language.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_builtin_keys_are_ignored() {
        let raw = r#"{"PlutusV3": {"notARealBuiltin-cpu-arguments": 1}}"#;
        let models = load_cost_models(raw).unwrap();
        assert!(models.contains_key("PlutusV3"));
    }

    #[test]
    fn constant_cost_builtin_is_overridden() {
        let raw = r#"{"PlutusV3": {"equalsInteger-cpu-arguments": 1}}"#;
        let models = load_cost_models(raw).unwrap();
        let model = &models["PlutusV3"];
        let cost = model.builtin_cost(cardano_uplc::ast::DefaultFunction::EqualsInteger, &[0]);
        assert_eq!(cost.cpu, 1);
    }
}
