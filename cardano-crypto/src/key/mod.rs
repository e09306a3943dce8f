pub mod bls12_381;
pub mod ed25519;
pub mod schnorr_secp256k1;
pub mod secp256k1;
