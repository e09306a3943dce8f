use cardano_primitives::TransactionInput;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("resolved input not found: {0:?}")]
    ResolvedInputNotFound(TransactionInput),

    #[error("byron addresses are not allowed in script-relevant positions")]
    ByronAddressNotAllowed,

    #[error("address has no payment credential")]
    NoPaymentCredential,

    #[error("inline datum not allowed in V1 script inputs")]
    InlineDatumNotAllowed,

    #[error("an input carrying a script reference cannot be spent by a V1 script")]
    ScriptAndInputRefNotAllowed,

    #[error("slot is too far in the past, oldest allowed slot is {oldest_allowed}")]
    SlotTooFarInThePast { oldest_allowed: u64 },

    #[error("withdrawal does not carry a script stake credential")]
    NonScriptWithdrawal,

    #[error("withdrawal address is not a stake address")]
    BadWithdrawalAddress,

    #[error("redeemer does not point at a known script purpose")]
    ExtraneousRedeemer,

    #[error("missing required script: {hash}")]
    MissingRequiredScript { hash: String },

    #[error("missing required datum: {hash}")]
    MissingRequiredDatum { hash: String },

    #[error("credential does not reference a script")]
    NonScriptStakeCredential,

    #[error("certificate type is not supported for redeemer resolution")]
    UnsupportedCertificateType,

    #[error("no script found for redeemer")]
    MissingScriptForRedeemer,

    #[error("V1/V2 script input is missing both an inline datum and a datum hash")]
    MissingRequiredInlineDatumOrHash,

    #[error("governance action carries no guardrail script to run")]
    NoGuardrailScriptForProcedure,
}
