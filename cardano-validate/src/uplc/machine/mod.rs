//! Redeemer evaluation glue (§4.5 step 4): flat-decodes a script, applies
//! it to its term arguments, and drives a `cardano_uplc::machine::Machine`
//! to completion.

use cardano_primitives::PlutusData;
use cardano_uplc::ast::{Constant, DeBruijn, Term};
use cardano_uplc::machine::cost_model::{CostModel, ExBudget};
use cardano_uplc::machine::Machine;
use std::rc::Rc;

pub use cardano_uplc::machine::cost_model;

#[derive(Debug, thiserror::Error)]
pub enum EvalError {
    #[error("flat decoding failed: {0}")]
    Flat(#[from] cardano_uplc::error::Error),

    /// The script ran to a well-formed program but failed during
    /// evaluation (an `Error` term, a builtin precondition, or an
    /// exhausted budget). Carries the logs and budget spent so far, per
    /// §7's "all evaluator errors carry… the logs… and the partial
    /// budget spent".
    #[error("script evaluation failed: {reason}")]
    ScriptFailed { reason: cardano_uplc::error::Error, budget_spent: ExBudget, logs: Vec<String> },
}

/// The result of running a script to completion: the execution units it
/// actually spent and the accumulated `trace` logs.
#[derive(Debug, Clone)]
pub struct EvalResult {
    pub budget_spent: ExBudget,
    pub logs: Vec<String>,
}

/// Applies `args` (in order) to `program`'s top-level term, then runs the
/// CEK machine with `budget` as the ceiling. `args` is the redeemer's term
/// arguments in application order, e.g. `[datum?, redeemer, script_context]`
/// for a spending script.
pub fn evaluate(
    program_bytes: &[u8],
    args: Vec<PlutusData>,
    cost_model: &CostModel,
    budget: ExBudget,
) -> Result<EvalResult, EvalError> {
    let program = cardano_uplc::flat::decode_program(program_bytes)?;

    let mut term = program.term;
    for arg in args {
        let arg_term = Term::Constant(Rc::new(Constant::Data(arg)));
        term = Term::Apply(Rc::new(term), Rc::new(arg_term));
    }

    let mut machine = Machine::new(cost_model.clone(), budget);
    match machine.evaluate(term) {
        Ok((_, spent)) => Ok(EvalResult { budget_spent: spent, logs: machine.logs }),
        Err(reason) => {
            let budget_spent = budget - machine.remaining_budget();
            Err(EvalError::ScriptFailed { reason, budget_spent, logs: machine.logs })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applying_no_args_evaluates_the_bare_term() {
        // `(program 1.1.0 (con unit ()))`: a constant program needs no
        // application and should evaluate immediately.
        let cost_model = CostModel::plutus_v3();
        let program = cardano_uplc::Program {
            version: (1, 1, 0),
            term: Term::<DeBruijn>::Constant(Rc::new(Constant::Unit)),
        };
        let mut machine = Machine::new(cost_model, ExBudget::max());
        let result = machine.evaluate(program.term);
        assert!(result.is_ok());
    }
}
