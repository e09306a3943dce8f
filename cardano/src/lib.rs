//! Rust-native UPLC execution engine and Conway-era transaction builder for
//! Cardano smart contracts.
//!
//! This crate is the front door onto the workspace: it assembles the
//! ledger primitives, the UPLC evaluator, the transaction builder, the
//! wallet key derivation, and the in-memory provider into one place, and
//! exposes the host-language bridge (`ffi`) that an off-chain tool uses
//! to apply arguments to a script, run one standalone, or evaluate every
//! redeemer in a built transaction.

#![warn(missing_docs)]

mod ffi;

pub use ffi::{
    apply_data_arg_to_script, eval_plutus_scripts, evaluate_script, Budget, EvaluateScriptResult,
    FfiError, RedeemerResult, SlotConfig,
};

pub mod ledger {
    //! Ledger primitives, cbor codecs and validation for the Conway era

    #[doc(inline)]
    pub use cardano_primitives as primitives;

    #[doc(inline)]
    pub use cardano_traverse as traverse;

    #[doc(inline)]
    pub use cardano_addresses as addresses;

    #[doc(inline)]
    pub use cardano_configs as configs;

    #[doc(inline)]
    pub use cardano_validate as validate;
}

#[doc(inline)]
pub use cardano_crypto as crypto;

#[doc(inline)]
pub use cardano_codec as codec;

#[doc(inline)]
pub use cardano_uplc as uplc;

pub mod wallet {
    //! Key derivation and transaction construction

    #[doc(inline)]
    pub use cardano_txbuilder as txbuilder;

    #[doc(inline)]
    pub use cardano_wallet as keystore;
}

#[doc(inline)]
pub use cardano_emulator as emulator;
