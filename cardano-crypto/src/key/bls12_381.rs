//! BLS12-381 group operations backing the `bls12_381_G1_*`, `bls12_381_G2_*`
//! and `bls12_381_millerLoop`/`bls12_381_mulMlResult`/`bls12_381_finalVerify`
//! builtins.
use blst::min_pk as blst_impl;
use thiserror::Error;

pub const G1_COMPRESSED_SIZE: usize = 48;
pub const G2_COMPRESSED_SIZE: usize = 96;

#[derive(Debug, Error)]
pub enum Bls12_381Error {
    #[error("invalid compressed G1 point encoding")]
    InvalidG1,
    #[error("invalid compressed G2 point encoding")]
    InvalidG2,
    #[error("invalid scalar encoding")]
    InvalidScalar,
}

#[derive(Clone, Copy)]
pub struct G1Element(blst::blst_p1);

#[derive(Clone, Copy)]
pub struct G2Element(blst::blst_p2);

#[derive(Clone, Copy)]
pub struct MlResult(blst::blst_fp12);

impl G1Element {
    pub fn identity() -> Self {
        let mut out = blst::blst_p1::default();
        unsafe { blst::blst_p1_from_affine(&mut out, &blst::blst_p1_affine::default()) };
        Self(out)
    }

    pub fn from_compressed(bytes: &[u8]) -> Result<Self, Bls12_381Error> {
        if bytes.len() != G1_COMPRESSED_SIZE {
            return Err(Bls12_381Error::InvalidG1);
        }
        let mut affine = blst::blst_p1_affine::default();
        let ok = unsafe { blst::blst_p1_uncompress(&mut affine, bytes.as_ptr()) };
        if ok != blst::BLST_ERROR::BLST_SUCCESS {
            return Err(Bls12_381Error::InvalidG1);
        }
        let mut point = blst::blst_p1::default();
        unsafe { blst::blst_p1_from_affine(&mut point, &affine) };
        Ok(Self(point))
    }

    pub fn to_compressed(&self) -> [u8; G1_COMPRESSED_SIZE] {
        let mut out = [0u8; G1_COMPRESSED_SIZE];
        unsafe { blst::blst_p1_compress(out.as_mut_ptr(), &self.0) };
        out
    }

    pub fn add(&self, other: &Self) -> Self {
        let mut out = blst::blst_p1::default();
        unsafe { blst::blst_p1_add_or_double(&mut out, &self.0, &other.0) };
        Self(out)
    }

    pub fn neg(&self) -> Self {
        let mut out = self.0;
        unsafe { blst::blst_p1_cneg(&mut out, true) };
        Self(out)
    }

    pub fn scale(&self, scalar_be: &[u8]) -> Self {
        let mut out = blst::blst_p1::default();
        unsafe {
            blst::blst_p1_mult(&mut out, &self.0, scalar_be.as_ptr(), scalar_be.len() * 8);
        }
        Self(out)
    }

    pub fn hash_to_curve(message: &[u8], dst: &[u8]) -> Self {
        let mut out = blst::blst_p1::default();
        unsafe {
            blst::blst_hash_to_g1(
                &mut out,
                message.as_ptr(),
                message.len(),
                dst.as_ptr(),
                dst.len(),
                std::ptr::null(),
                0,
            );
        }
        Self(out)
    }
}

impl G2Element {
    pub fn identity() -> Self {
        let mut out = blst::blst_p2::default();
        unsafe { blst::blst_p2_from_affine(&mut out, &blst::blst_p2_affine::default()) };
        Self(out)
    }

    pub fn from_compressed(bytes: &[u8]) -> Result<Self, Bls12_381Error> {
        if bytes.len() != G2_COMPRESSED_SIZE {
            return Err(Bls12_381Error::InvalidG2);
        }
        let mut affine = blst::blst_p2_affine::default();
        let ok = unsafe { blst::blst_p2_uncompress(&mut affine, bytes.as_ptr()) };
        if ok != blst::BLST_ERROR::BLST_SUCCESS {
            return Err(Bls12_381Error::InvalidG2);
        }
        let mut point = blst::blst_p2::default();
        unsafe { blst::blst_p2_from_affine(&mut point, &affine) };
        Ok(Self(point))
    }

    pub fn to_compressed(&self) -> [u8; G2_COMPRESSED_SIZE] {
        let mut out = [0u8; G2_COMPRESSED_SIZE];
        unsafe { blst::blst_p2_compress(out.as_mut_ptr(), &self.0) };
        out
    }

    pub fn add(&self, other: &Self) -> Self {
        let mut out = blst::blst_p2::default();
        unsafe { blst::blst_p2_add_or_double(&mut out, &self.0, &other.0) };
        Self(out)
    }

    pub fn neg(&self) -> Self {
        let mut out = self.0;
        unsafe { blst::blst_p2_cneg(&mut out, true) };
        Self(out)
    }

    pub fn scale(&self, scalar_be: &[u8]) -> Self {
        let mut out = blst::blst_p2::default();
        unsafe {
            blst::blst_p2_mult(&mut out, &self.0, scalar_be.as_ptr(), scalar_be.len() * 8);
        }
        Self(out)
    }
}

/// `bls12_381_millerLoop`: pairs a G1 and a G2 point into an `Fp12` element.
pub fn miller_loop(g1: &G1Element, g2: &G2Element) -> MlResult {
    let mut g1_affine = blst::blst_p1_affine::default();
    let mut g2_affine = blst::blst_p2_affine::default();
    unsafe {
        blst::blst_p1_to_affine(&mut g1_affine, &g1.0);
        blst::blst_p2_to_affine(&mut g2_affine, &g2.0);
    }
    let mut out = blst::blst_fp12::default();
    unsafe { blst::blst_miller_loop(&mut out, &g2_affine, &g1_affine) };
    MlResult(out)
}

/// `bls12_381_mulMlResult`: multiply two `Fp12` pairing results.
pub fn mul_ml_result(a: &MlResult, b: &MlResult) -> MlResult {
    let mut out = blst::blst_fp12::default();
    unsafe { blst::blst_fp12_mul(&mut out, &a.0, &b.0) };
    MlResult(out)
}

/// `bls12_381_finalVerify`: check that two Miller-loop results are equal
/// after the final exponentiation, i.e. that `e(a) == e(b)`.
pub fn final_verify(a: &MlResult, b: &MlResult) -> bool {
    let mut fa = blst::blst_fp12::default();
    let mut fb = blst::blst_fp12::default();
    unsafe {
        blst::blst_final_exp(&mut fa, &a.0);
        blst::blst_final_exp(&mut fb, &b.0);
    }
    unsafe { blst::blst_fp12_is_equal(&fa, &fb) }
}

/// BLS signature verification (min-pk: public keys in G1, signatures in G2),
/// used by the wallet/ledger path rather than a UPLC builtin.
pub fn verify_signature(public_key: &[u8], message: &[u8], signature: &[u8]) -> bool {
    let Ok(pk) = blst_impl::PublicKey::from_bytes(public_key) else {
        return false;
    };
    let Ok(sig) = blst_impl::Signature::from_bytes(signature) else {
        return false;
    };
    sig.verify(true, message, &[], &[], &pk, true) == blst::BLST_ERROR::BLST_SUCCESS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_compresses_and_round_trips() {
        let id = G1Element::identity();
        let bytes = id.to_compressed();
        let back = G1Element::from_compressed(&bytes).unwrap();
        assert_eq!(back.to_compressed(), bytes);
    }

    #[test]
    fn rejects_wrong_size_g1() {
        assert!(matches!(
            G1Element::from_compressed(&[0u8; 10]),
            Err(Bls12_381Error::InvalidG1)
        ));
    }
}
