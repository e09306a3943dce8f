#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("the machine encountered an explicit `Error` term")]
    ExplicitErrorTerm,

    #[error("open term: de Bruijn index {0} has no binding")]
    OpenTermEvaluated(usize),

    #[error("non-function applied as if it were one")]
    NonFunctionApplication,

    #[error("non-polymorphic term forced")]
    NonPolymorphicInstantiation,

    #[error("builtin {builtin:?} expected {expected} argument(s), got {got}")]
    BuiltinArityMismatch { builtin: crate::ast::DefaultFunction, expected: usize, got: usize },

    #[error("builtin {0:?} received an argument of the wrong type")]
    BuiltinTypeMismatch(crate::ast::DefaultFunction),

    #[error("builtin {0:?} evaluation failed: {1}")]
    BuiltinEvaluationFailure(crate::ast::DefaultFunction, String),

    #[error("execution budget exhausted")]
    OutOfBudget,

    #[error("flat decoding failed: {0}")]
    Flat(#[from] crate::flat::FlatError),
}

pub type Result<T> = std::result::Result<T, Error>;
