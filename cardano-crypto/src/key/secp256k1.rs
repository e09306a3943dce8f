//! ECDSA over secp256k1, as used by the `verifyEcdsaSecp256k1Signature` builtin.
//!
//! The low-level curve arithmetic is provided by the `secp256k1` crate on
//! native targets and by `k256` on `wasm` targets (no C bindings there);
//! both expose the same 33-byte compressed public key / 64-byte compact
//! signature / 32-byte message digest wire shapes.
use std::{fmt, str::FromStr};
use thiserror::Error;

pub const PUBLIC_KEY_SIZE: usize = 33;
pub const SIGNATURE_SIZE: usize = 64;
pub const MESSAGE_SIZE: usize = 32;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_SIZE]);

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; SIGNATURE_SIZE]);

#[derive(Debug, Error)]
pub enum TryFromPublicKeyError {
    #[error("invalid size, expecting {PUBLIC_KEY_SIZE}")]
    InvalidSize,
    #[error("not a valid compressed secp256k1 point")]
    InvalidPoint,
}

#[derive(Debug, Error)]
pub enum TryFromSignatureError {
    #[error("invalid size, expecting {SIGNATURE_SIZE}")]
    InvalidSize,
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = TryFromPublicKeyError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; PUBLIC_KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| TryFromPublicKeyError::InvalidSize)?;

        #[cfg(not(target_family = "wasm"))]
        {
            secp256k1::PublicKey::from_slice(&arr)
                .map_err(|_| TryFromPublicKeyError::InvalidPoint)?;
        }
        #[cfg(target_family = "wasm")]
        {
            use k256::elliptic_curve::sec1::FromEncodedPoint;
            let point = k256::EncodedPoint::from_bytes(arr)
                .map_err(|_| TryFromPublicKeyError::InvalidPoint)?;
            let maybe_affine = k256::AffinePoint::from_encoded_point(&point);
            if !bool::from(maybe_affine.is_some()) {
                return Err(TryFromPublicKeyError::InvalidPoint);
            }
        }

        Ok(Self(arr))
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = TryFromSignatureError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        let arr: [u8; SIGNATURE_SIZE] = bytes
            .try_into()
            .map_err(|_| TryFromSignatureError::InvalidSize)?;
        Ok(Self(arr))
    }
}

impl AsRef<[u8]> for PublicKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicKey").field(&hex::encode(self.0)).finish()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for PublicKey {
    type Err = TryFromPublicKeyError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| TryFromPublicKeyError::InvalidSize)?;
        Self::try_from(bytes.as_slice())
    }
}

/// Verify a 64-byte compact ECDSA signature over a 32-byte message digest.
///
/// A message that is not exactly 32 bytes is rejected rather than hashed,
/// matching the Plutus builtin contract (the caller is expected to have
/// already hashed the payload).
pub fn verify(public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
    if message.len() != MESSAGE_SIZE {
        return false;
    }

    #[cfg(not(target_family = "wasm"))]
    {
        let Ok(pk) = secp256k1::PublicKey::from_slice(&public_key.0) else {
            return false;
        };
        let Ok(sig) = secp256k1::ecdsa::Signature::from_compact(&signature.0) else {
            return false;
        };
        let Ok(msg) = secp256k1::Message::from_digest_slice(message) else {
            return false;
        };
        let secp = secp256k1::Secp256k1::verification_only();
        secp.verify_ecdsa(&msg, &sig, &pk).is_ok()
    }
    #[cfg(target_family = "wasm")]
    {
        use k256::ecdsa::signature::hazmat::PrehashVerifier;
        let Ok(vk) = k256::ecdsa::VerifyingKey::from_sec1_bytes(&public_key.0) else {
            return false;
        };
        let Ok(sig) = k256::ecdsa::Signature::from_slice(&signature.0) else {
            return false;
        };
        vk.verify_prehash(message, &sig).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_size_public_key() {
        assert!(matches!(
            PublicKey::try_from([0u8; 10].as_slice()),
            Err(TryFromPublicKeyError::InvalidSize)
        ));
    }

    #[test]
    fn rejects_non_32_byte_message() {
        let pk = [0x02; PUBLIC_KEY_SIZE];
        let pk = PublicKey(pk);
        let sig = Signature([0u8; SIGNATURE_SIZE]);
        assert!(!verify(&pk, b"short", &sig));
    }
}
