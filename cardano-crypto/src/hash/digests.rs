//! One-shot hash functions for the builtins that are not Blake2b.
//!
//! `Hasher<BITS>` in [`super::hasher`] covers Blake2b-160/224/256, which is
//! all the ledger itself ever needs. Plutus scripts can additionally reach
//! for SHA2-256/512, SHA3-256, Keccak-256 and RIPEMD-160, so those live
//! here as plain functions instead of being folded into the `Hasher`
//! machinery (there is no tagged/cbor variant of any of them).
use cryptoxide::digest::Digest as _;
use cryptoxide::{ripemd160::Ripemd160, sha2::Sha256, sha2::Sha512, sha3::Keccak256, sha3::Sha3_256};

use super::Hash;

pub fn sha2_256(bytes: &[u8]) -> Hash<32> {
    let mut hasher = Sha256::new();
    hasher.input(bytes);
    let mut out = [0u8; 32];
    hasher.result(&mut out);
    Hash::new(out)
}

pub fn sha2_512(bytes: &[u8]) -> Hash<64> {
    let mut hasher = Sha512::new();
    hasher.input(bytes);
    let mut out = [0u8; 64];
    hasher.result(&mut out);
    Hash::new(out)
}

pub fn sha3_256(bytes: &[u8]) -> Hash<32> {
    let mut hasher = Sha3_256::new();
    hasher.input(bytes);
    let mut out = [0u8; 32];
    hasher.result(&mut out);
    Hash::new(out)
}

pub fn keccak_256(bytes: &[u8]) -> Hash<32> {
    let mut hasher = Keccak256::new();
    hasher.input(bytes);
    let mut out = [0u8; 32];
    hasher.result(&mut out);
    Hash::new(out)
}

pub fn ripemd_160(bytes: &[u8]) -> Hash<20> {
    let mut hasher = Ripemd160::new();
    hasher.input(bytes);
    let mut out = [0u8; 20];
    hasher.result(&mut out);
    Hash::new(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha2_256_matches_known_vector() {
        let digest = sha2_256(b"abc");
        assert_eq!(
            hex::encode(digest.as_ref()),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn keccak_256_matches_known_vector() {
        let digest = keccak_256(b"");
        assert_eq!(
            hex::encode(digest.as_ref()),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a47"
        );
    }
}
