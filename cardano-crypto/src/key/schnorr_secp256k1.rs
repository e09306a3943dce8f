//! BIP-340 Schnorr signatures over secp256k1, for
//! `verifySchnorrSecp256k1Signature`.
use std::fmt;
use thiserror::Error;

pub const PUBLIC_KEY_SIZE: usize = 32;
pub const SIGNATURE_SIZE: usize = 64;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; PUBLIC_KEY_SIZE]);

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Signature([u8; SIGNATURE_SIZE]);

#[derive(Debug, Error)]
pub enum TryFromPublicKeyError {
    #[error("invalid size, expecting {PUBLIC_KEY_SIZE}")]
    InvalidSize,
}

#[derive(Debug, Error)]
pub enum TryFromSignatureError {
    #[error("invalid size, expecting {SIGNATURE_SIZE}")]
    InvalidSize,
}

impl TryFrom<&[u8]> for PublicKey {
    type Error = TryFromPublicKeyError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Ok(Self(
            bytes
                .try_into()
                .map_err(|_| TryFromPublicKeyError::InvalidSize)?,
        ))
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = TryFromSignatureError;
    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Ok(Self(
            bytes
                .try_into()
                .map_err(|_| TryFromSignatureError::InvalidSize)?,
        ))
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

/// Verify a BIP-340 Schnorr signature over an arbitrary-length message
/// (unlike ECDSA, the message is hashed internally per BIP-340).
pub fn verify(public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
    #[cfg(not(target_family = "wasm"))]
    {
        let Ok(xonly) = secp256k1::XOnlyPublicKey::from_slice(&public_key.0) else {
            return false;
        };
        let Ok(sig) = secp256k1::schnorr::Signature::from_slice(&signature.0) else {
            return false;
        };
        let secp = secp256k1::Secp256k1::verification_only();
        secp.verify_schnorr(&sig, message, &xonly).is_ok()
    }
    #[cfg(target_family = "wasm")]
    {
        use k256::schnorr::signature::Verifier;
        let Ok(vk) = k256::schnorr::VerifyingKey::from_bytes(&public_key.0) else {
            return false;
        };
        let Ok(sig) = k256::schnorr::Signature::try_from(signature.0.as_slice()) else {
            return false;
        };
        vk.verify(message, &sig).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_wrong_size_key() {
        assert!(PublicKey::try_from([0u8; 4].as_slice()).is_err());
    }
}
