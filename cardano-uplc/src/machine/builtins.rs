//! Builtin function evaluation (§4.2). Each arm assumes the caller has
//! already checked the `BuiltinApp` is saturated; type mismatches on
//! individual arguments are still reported as recoverable errors rather
//! than panics, since a malformed script can apply a builtin to the
//! wrong constant type.

use super::value::{g1, g2, Value};
use crate::ast::{Constant, DefaultFunction, Type};
use crate::error::{Error, Result};
use cardano_crypto::hash::digests::{keccak_256, ripemd_160, sha2_256, sha3_256};
use cardano_crypto::hash::Hasher;
use cardano_crypto::key::{bls12_381, ed25519, schnorr_secp256k1, secp256k1};
use cardano_primitives::{BigInt as DataBigInt, BoundedBytes, Constr, PlutusData};
use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive, Zero};
use std::rc::Rc;

fn con(c: Constant) -> Value {
    Value::Con(Rc::new(c))
}

fn bool_(b: bool) -> Value {
    con(Constant::Bool(b))
}

fn mismatch(fun: DefaultFunction) -> Error {
    Error::BuiltinTypeMismatch(fun)
}

fn fail(fun: DefaultFunction, msg: impl Into<String>) -> Error {
    Error::BuiltinEvaluationFailure(fun, msg.into())
}

fn as_integer<'a>(fun: DefaultFunction, v: &'a Value) -> Result<&'a BigInt> {
    match v {
        Value::Con(c) => match c.as_ref() {
            Constant::Integer(i) => Ok(i),
            _ => Err(mismatch(fun)),
        },
        _ => Err(mismatch(fun)),
    }
}

fn as_bytestring<'a>(fun: DefaultFunction, v: &'a Value) -> Result<&'a [u8]> {
    match v {
        Value::Con(c) => match c.as_ref() {
            Constant::ByteString(b) => Ok(b),
            _ => Err(mismatch(fun)),
        },
        _ => Err(mismatch(fun)),
    }
}

fn as_string<'a>(fun: DefaultFunction, v: &'a Value) -> Result<&'a str> {
    match v {
        Value::Con(c) => match c.as_ref() {
            Constant::String(s) => Ok(s),
            _ => Err(mismatch(fun)),
        },
        _ => Err(mismatch(fun)),
    }
}

fn as_bool(fun: DefaultFunction, v: &Value) -> Result<bool> {
    match v {
        Value::Con(c) => match c.as_ref() {
            Constant::Bool(b) => Ok(*b),
            _ => Err(mismatch(fun)),
        },
        _ => Err(mismatch(fun)),
    }
}

fn as_data<'a>(fun: DefaultFunction, v: &'a Value) -> Result<&'a PlutusData> {
    match v {
        Value::Con(c) => match c.as_ref() {
            Constant::Data(d) => Ok(d),
            _ => Err(mismatch(fun)),
        },
        _ => Err(mismatch(fun)),
    }
}

fn as_list(fun: DefaultFunction, v: &Value) -> Result<(Type, &[Constant])> {
    match v {
        Value::Con(c) => match c.as_ref() {
            Constant::ProtoList(t, xs) => Ok((t.clone(), xs)),
            _ => Err(mismatch(fun)),
        },
        _ => Err(mismatch(fun)),
    }
}

fn as_pair(fun: DefaultFunction, v: &Value) -> Result<(&Constant, &Constant)> {
    match v {
        Value::Con(c) => match c.as_ref() {
            Constant::ProtoPair(_, _, a, b) => Ok((a, b)),
            _ => Err(mismatch(fun)),
        },
        _ => Err(mismatch(fun)),
    }
}

fn i64_of(i: &BigInt) -> Option<i64> {
    i.to_i64()
}

/// Evaluates a fully-saturated builtin application.
pub fn apply_builtin(fun: DefaultFunction, args: &[Value]) -> Result<Value> {
    use DefaultFunction::*;
    match fun {
        AddInteger => Ok(con(Constant::Integer(as_integer(fun, &args[0])? + as_integer(fun, &args[1])?))),
        SubtractInteger => Ok(con(Constant::Integer(as_integer(fun, &args[0])? - as_integer(fun, &args[1])?))),
        MultiplyInteger => Ok(con(Constant::Integer(as_integer(fun, &args[0])? * as_integer(fun, &args[1])?))),
        DivideInteger => {
            let (a, b) = (as_integer(fun, &args[0])?, as_integer(fun, &args[1])?);
            if b.is_zero() {
                return Err(fail(fun, "division by zero"));
            }
            Ok(con(Constant::Integer(floor_div(a, b))))
        }
        QuotientInteger => {
            let (a, b) = (as_integer(fun, &args[0])?, as_integer(fun, &args[1])?);
            if b.is_zero() {
                return Err(fail(fun, "division by zero"));
            }
            Ok(con(Constant::Integer(a / b)))
        }
        RemainderInteger => {
            let (a, b) = (as_integer(fun, &args[0])?, as_integer(fun, &args[1])?);
            if b.is_zero() {
                return Err(fail(fun, "division by zero"));
            }
            Ok(con(Constant::Integer(a % b)))
        }
        ModInteger => {
            let (a, b) = (as_integer(fun, &args[0])?, as_integer(fun, &args[1])?);
            if b.is_zero() {
                return Err(fail(fun, "division by zero"));
            }
            Ok(con(Constant::Integer(floor_mod(a, b))))
        }
        EqualsInteger => Ok(bool_(as_integer(fun, &args[0])? == as_integer(fun, &args[1])?)),
        LessThanInteger => Ok(bool_(as_integer(fun, &args[0])? < as_integer(fun, &args[1])?)),
        LessThanEqualsInteger => Ok(bool_(as_integer(fun, &args[0])? <= as_integer(fun, &args[1])?)),

        AppendByteString => {
            let mut out = as_bytestring(fun, &args[0])?.to_vec();
            out.extend_from_slice(as_bytestring(fun, &args[1])?);
            Ok(con(Constant::ByteString(out)))
        }
        ConsByteString => {
            let byte = as_integer(fun, &args[0])?;
            let byte = byte.to_u8().ok_or_else(|| fail(fun, "byte out of range"))?;
            let mut out = vec![byte];
            out.extend_from_slice(as_bytestring(fun, &args[1])?);
            Ok(con(Constant::ByteString(out)))
        }
        SliceByteString => {
            let start = i64_of(as_integer(fun, &args[0])?).unwrap_or(0).max(0) as usize;
            let len = i64_of(as_integer(fun, &args[1])?).unwrap_or(0).max(0) as usize;
            let bytes = as_bytestring(fun, &args[2])?;
            let end = (start + len).min(bytes.len());
            let start = start.min(bytes.len());
            Ok(con(Constant::ByteString(bytes[start..end].to_vec())))
        }
        LengthOfByteString => Ok(con(Constant::Integer(BigInt::from(as_bytestring(fun, &args[0])?.len())))),
        IndexByteString => {
            let bytes = as_bytestring(fun, &args[0])?;
            let index = i64_of(as_integer(fun, &args[1])?).ok_or_else(|| fail(fun, "index out of range"))?;
            let byte = bytes
                .get(usize::try_from(index).map_err(|_| fail(fun, "index out of range"))?)
                .ok_or_else(|| fail(fun, "index out of bounds"))?;
            Ok(con(Constant::Integer(BigInt::from(*byte))))
        }
        EqualsByteString => Ok(bool_(as_bytestring(fun, &args[0])? == as_bytestring(fun, &args[1])?)),
        LessThanByteString => Ok(bool_(as_bytestring(fun, &args[0])? < as_bytestring(fun, &args[1])?)),
        LessThanEqualsByteString => Ok(bool_(as_bytestring(fun, &args[0])? <= as_bytestring(fun, &args[1])?)),

        Sha2_256 => Ok(con(Constant::ByteString(sha2_256(as_bytestring(fun, &args[0])?).to_vec()))),
        Sha3_256 => Ok(con(Constant::ByteString(sha3_256(as_bytestring(fun, &args[0])?).to_vec()))),
        Blake2b_256 => Ok(con(Constant::ByteString(Hasher::<256>::hash(as_bytestring(fun, &args[0])?).to_vec()))),
        Blake2b_224 => Ok(con(Constant::ByteString(Hasher::<224>::hash(as_bytestring(fun, &args[0])?).to_vec()))),
        Keccak_256 => Ok(con(Constant::ByteString(keccak_256(as_bytestring(fun, &args[0])?).to_vec()))),
        Ripemd_160 => Ok(con(Constant::ByteString(ripemd_160(as_bytestring(fun, &args[0])?).to_vec()))),

        VerifyEd25519Signature => {
            let pk_bytes = as_bytestring(fun, &args[0])?;
            let pk: [u8; 32] = pk_bytes.try_into().map_err(|_| fail(fun, "invalid public key length"))?;
            let pk = ed25519::PublicKey::from(pk);
            let msg = as_bytestring(fun, &args[1])?;
            let sig_bytes = as_bytestring(fun, &args[2])?;
            let sig: [u8; 64] = sig_bytes.try_into().map_err(|_| fail(fun, "invalid signature length"))?;
            let sig = ed25519::Signature::from(sig);
            Ok(bool_(pk.verify(msg, &sig)))
        }
        VerifyEcdsaSecp256k1Signature => {
            let pk = secp256k1::PublicKey::try_from(as_bytestring(fun, &args[0])?).map_err(|_| fail(fun, "invalid public key"))?;
            let msg = as_bytestring(fun, &args[1])?;
            let sig = secp256k1::Signature::try_from(as_bytestring(fun, &args[2])?).map_err(|_| fail(fun, "invalid signature"))?;
            Ok(bool_(secp256k1::verify(&pk, msg, &sig)))
        }
        VerifySchnorrSecp256k1Signature => {
            let pk = schnorr_secp256k1::PublicKey::try_from(as_bytestring(fun, &args[0])?).map_err(|_| fail(fun, "invalid public key"))?;
            let msg = as_bytestring(fun, &args[1])?;
            let sig = schnorr_secp256k1::Signature::try_from(as_bytestring(fun, &args[2])?).map_err(|_| fail(fun, "invalid signature"))?;
            Ok(bool_(schnorr_secp256k1::verify(&pk, msg, &sig)))
        }

        AppendString => {
            let mut out = as_string(fun, &args[0])?.to_string();
            out.push_str(as_string(fun, &args[1])?);
            Ok(con(Constant::String(out)))
        }
        EqualsString => Ok(bool_(as_string(fun, &args[0])? == as_string(fun, &args[1])?)),
        EncodeUtf8 => Ok(con(Constant::ByteString(as_string(fun, &args[0])?.as_bytes().to_vec()))),
        DecodeUtf8 => {
            let s = String::from_utf8(as_bytestring(fun, &args[0])?.to_vec()).map_err(|_| fail(fun, "invalid utf-8"))?;
            Ok(con(Constant::String(s)))
        }

        IfThenElse => {
            let cond = as_bool(fun, &args[0])?;
            Ok(if cond { args[1].clone() } else { args[2].clone() })
        }
        ChooseUnit => {
            match &args[0] {
                Value::Con(c) if matches!(c.as_ref(), Constant::Unit) => Ok(args[1].clone()),
                _ => Err(mismatch(fun)),
            }
        }
        Trace => {
            tracing::debug!(message = %as_string(fun, &args[0])?, "uplc trace");
            Ok(args[1].clone())
        }
        FstPair => Ok(con(as_pair(fun, &args[0])?.0.clone())),
        SndPair => Ok(con(as_pair(fun, &args[0])?.1.clone())),
        ChooseList => {
            let (_, xs) = as_list(fun, &args[0])?;
            Ok(if xs.is_empty() { args[1].clone() } else { args[2].clone() })
        }
        MkCons => {
            let (t, xs) = as_list(fun, &args[1])?;
            let head = match &args[0] {
                Value::Con(c) => (**c).clone(),
                _ => return Err(mismatch(fun)),
            };
            let mut out = vec![head];
            out.extend_from_slice(xs);
            Ok(con(Constant::ProtoList(t, out)))
        }
        HeadList => {
            let (_, xs) = as_list(fun, &args[0])?;
            Ok(con(xs.first().ok_or_else(|| fail(fun, "head of empty list"))?.clone()))
        }
        TailList => {
            let (t, xs) = as_list(fun, &args[0])?;
            if xs.is_empty() {
                return Err(fail(fun, "tail of empty list"));
            }
            Ok(con(Constant::ProtoList(t, xs[1..].to_vec())))
        }
        NullList => Ok(bool_(as_list(fun, &args[0])?.1.is_empty())),

        ChooseData => {
            let data = as_data(fun, &args[0])?;
            let branch = match data {
                PlutusData::Constr(_) => &args[1],
                PlutusData::Map(_) => &args[2],
                PlutusData::Array(_) => &args[3],
                PlutusData::BigInt(_) => &args[4],
                PlutusData::BoundedBytes(_) => &args[5],
            };
            Ok(branch.clone())
        }
        ConstrData => {
            let tag = i64_of(as_integer(fun, &args[0])?).ok_or_else(|| fail(fun, "constructor tag out of range"))? as u64;
            let (_, fields) = as_list(fun, &args[1])?;
            let fields = fields
                .iter()
                .map(|c| match c {
                    Constant::Data(d) => Ok(d.clone()),
                    _ => Err(mismatch(fun)),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(con(Constant::Data(PlutusData::Constr(Constr { tag, any_constructor: None, fields }))))
        }
        MapData => {
            let (_, kvs) = as_list(fun, &args[0])?;
            let pairs = kvs
                .iter()
                .map(|c| match c {
                    Constant::ProtoPair(_, _, k, v) => {
                        let k = match k.as_ref() {
                            Constant::Data(d) => d.clone(),
                            _ => return Err(mismatch(fun)),
                        };
                        let v = match v.as_ref() {
                            Constant::Data(d) => d.clone(),
                            _ => return Err(mismatch(fun)),
                        };
                        Ok((k, v))
                    }
                    _ => Err(mismatch(fun)),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(con(Constant::Data(PlutusData::Map(pairs.into()))))
        }
        ListData => {
            let (_, xs) = as_list(fun, &args[0])?;
            let xs = xs
                .iter()
                .map(|c| match c {
                    Constant::Data(d) => Ok(d.clone()),
                    _ => Err(mismatch(fun)),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(con(Constant::Data(PlutusData::Array(xs))))
        }
        IData => Ok(con(Constant::Data(PlutusData::BigInt(integer_to_data_bigint(as_integer(fun, &args[0])?))))),
        BData => Ok(con(Constant::Data(PlutusData::BoundedBytes(BoundedBytes::from(as_bytestring(fun, &args[0])?.to_vec()))))),
        UnConstrData => match as_data(fun, &args[0])? {
            PlutusData::Constr(c) => Ok(con(Constant::ProtoPair(
                Type::Integer,
                Type::List(Box::new(Type::Data)),
                Box::new(Constant::Integer(BigInt::from(c.tag))),
                Box::new(Constant::ProtoList(Type::Data, c.fields.iter().cloned().map(Constant::Data).collect())),
            ))),
            _ => Err(fail(fun, "not a constr")),
        },
        UnMapData => match as_data(fun, &args[0])? {
            PlutusData::Map(kvs) => Ok(con(Constant::ProtoList(
                Type::Pair(Box::new(Type::Data), Box::new(Type::Data)),
                kvs.iter()
                    .map(|(k, v)| {
                        Constant::ProtoPair(
                            Type::Data,
                            Type::Data,
                            Box::new(Constant::Data(k.clone())),
                            Box::new(Constant::Data(v.clone())),
                        )
                    })
                    .collect(),
            ))),
            _ => Err(fail(fun, "not a map")),
        },
        UnListData => match as_data(fun, &args[0])? {
            PlutusData::Array(xs) => Ok(con(Constant::ProtoList(Type::Data, xs.iter().cloned().map(Constant::Data).collect()))),
            _ => Err(fail(fun, "not a list")),
        },
        UnIData => match as_data(fun, &args[0])? {
            PlutusData::BigInt(i) => Ok(con(Constant::Integer(data_bigint_to_integer(i)))),
            _ => Err(fail(fun, "not an integer")),
        },
        UnBData => match as_data(fun, &args[0])? {
            PlutusData::BoundedBytes(b) => Ok(con(Constant::ByteString(b.to_vec()))),
            _ => Err(fail(fun, "not a bytestring")),
        },
        EqualsData => Ok(bool_(as_data(fun, &args[0])? == as_data(fun, &args[1])?)),
        MkPairData => {
            let a = match &args[0] {
                Value::Con(c) => match c.as_ref() {
                    Constant::Data(d) => d.clone(),
                    _ => return Err(mismatch(fun)),
                },
                _ => return Err(mismatch(fun)),
            };
            let b = match &args[1] {
                Value::Con(c) => match c.as_ref() {
                    Constant::Data(d) => d.clone(),
                    _ => return Err(mismatch(fun)),
                },
                _ => return Err(mismatch(fun)),
            };
            Ok(con(Constant::ProtoPair(Type::Data, Type::Data, Box::new(Constant::Data(a)), Box::new(Constant::Data(b)))))
        }
        MkNilData => Ok(con(Constant::ProtoList(Type::Data, vec![]))),
        MkNilPairData => Ok(con(Constant::ProtoList(Type::Pair(Box::new(Type::Data), Box::new(Type::Data)), vec![]))),
        SerialiseData => {
            let data = as_data(fun, &args[0])?;
            let mut bytes = Vec::new();
            cardano_codec::minicbor::Encoder::new(&mut bytes)
                .encode(data)
                .map_err(|_| fail(fun, "cbor encoding failed"))?;
            Ok(con(Constant::ByteString(bytes)))
        }

        Bls12_381_G1_Add => Ok(con(Constant::Bls12_381G1(Box::new(g1(&args[0]).ok_or_else(|| mismatch(fun))?.add(&g1(&args[1]).ok_or_else(|| mismatch(fun))?))))),
        Bls12_381_G1_Neg => Ok(con(Constant::Bls12_381G1(Box::new(g1(&args[0]).ok_or_else(|| mismatch(fun))?.neg())))),
        Bls12_381_G1_ScalarMul => {
            let scalar = as_integer(fun, &args[0])?;
            let point = g1(&args[1]).ok_or_else(|| mismatch(fun))?;
            Ok(con(Constant::Bls12_381G1(Box::new(point.scale(&scalar_be_bytes(scalar))))))
        }
        Bls12_381_G1_Equal => Ok(bool_(g1(&args[0]).ok_or_else(|| mismatch(fun))?.to_compressed() == g1(&args[1]).ok_or_else(|| mismatch(fun))?.to_compressed())),
        Bls12_381_G1_Compress => Ok(con(Constant::ByteString(g1(&args[0]).ok_or_else(|| mismatch(fun))?.to_compressed().to_vec()))),
        Bls12_381_G1_Uncompress => {
            let bytes = as_bytestring(fun, &args[0])?;
            let g = bls12_381::G1Element::from_compressed(bytes).map_err(|e| fail(fun, e.to_string()))?;
            Ok(con(Constant::Bls12_381G1(Box::new(g))))
        }
        Bls12_381_G1_HashToGroup => {
            let msg = as_bytestring(fun, &args[0])?;
            let dst = as_bytestring(fun, &args[1])?;
            Ok(con(Constant::Bls12_381G1(Box::new(bls12_381::G1Element::hash_to_curve(msg, dst)))))
        }

        Bls12_381_G2_Add => Ok(con(Constant::Bls12_381G2(Box::new(g2(&args[0]).ok_or_else(|| mismatch(fun))?.add(&g2(&args[1]).ok_or_else(|| mismatch(fun))?))))),
        Bls12_381_G2_Neg => Ok(con(Constant::Bls12_381G2(Box::new(g2(&args[0]).ok_or_else(|| mismatch(fun))?.neg())))),
        Bls12_381_G2_ScalarMul => {
            let scalar = as_integer(fun, &args[0])?;
            let point = g2(&args[1]).ok_or_else(|| mismatch(fun))?;
            Ok(con(Constant::Bls12_381G2(Box::new(point.scale(&scalar_be_bytes(scalar))))))
        }
        Bls12_381_G2_Equal => Ok(bool_(g2(&args[0]).ok_or_else(|| mismatch(fun))?.to_compressed() == g2(&args[1]).ok_or_else(|| mismatch(fun))?.to_compressed())),
        Bls12_381_G2_Compress => Ok(con(Constant::ByteString(g2(&args[0]).ok_or_else(|| mismatch(fun))?.to_compressed().to_vec()))),
        Bls12_381_G2_Uncompress => {
            let bytes = as_bytestring(fun, &args[0])?;
            let g = bls12_381::G2Element::from_compressed(bytes).map_err(|e| fail(fun, e.to_string()))?;
            Ok(con(Constant::Bls12_381G2(Box::new(g))))
        }
        Bls12_381_G2_HashToGroup => {
            Err(fail(fun, "bls12_381_G2_hashToGroup is not supported by the underlying curve library"))
        }

        Bls12_381_MillerLoop => {
            let a = g1(&args[0]).ok_or_else(|| mismatch(fun))?;
            let b = g2(&args[1]).ok_or_else(|| mismatch(fun))?;
            Ok(Value::Bls12_381MlResult(Rc::new(bls12_381::miller_loop(&a, &b))))
        }
        Bls12_381_MulMlResult => {
            let a = ml_result(fun, &args[0])?;
            let b = ml_result(fun, &args[1])?;
            Ok(Value::Bls12_381MlResult(Rc::new(bls12_381::mul_ml_result(&a, &b))))
        }
        Bls12_381_FinalVerify => {
            let a = ml_result(fun, &args[0])?;
            let b = ml_result(fun, &args[1])?;
            Ok(bool_(bls12_381::final_verify(&a, &b)))
        }

        IntegerToByteString => {
            let endianness = as_bool(fun, &args[0])?;
            let width = i64_of(as_integer(fun, &args[1])?).unwrap_or(0).max(0) as usize;
            let n = as_integer(fun, &args[2])?;
            if n.is_negative() {
                return Err(fail(fun, "cannot convert a negative integer"));
            }
            let (_, mut bytes) = n.to_bytes_be();
            if width > 0 {
                if bytes.len() > width {
                    return Err(fail(fun, "integer does not fit in the requested width"));
                }
                let mut padded = vec![0u8; width - bytes.len()];
                padded.append(&mut bytes);
                bytes = padded;
            }
            if !endianness {
                bytes.reverse();
            }
            Ok(con(Constant::ByteString(bytes)))
        }
        ByteStringToInteger => {
            let endianness = as_bool(fun, &args[0])?;
            let mut bytes = as_bytestring(fun, &args[1])?.to_vec();
            if !endianness {
                bytes.reverse();
            }
            Ok(con(Constant::Integer(BigInt::from_bytes_be(num_bigint::Sign::Plus, &bytes))))
        }
        AndByteString => Ok(con(Constant::ByteString(bitwise(fun, &args[1], &args[2], as_bool(fun, &args[0])?, |a, b| a & b)?))),
        OrByteString => Ok(con(Constant::ByteString(bitwise(fun, &args[1], &args[2], as_bool(fun, &args[0])?, |a, b| a | b)?))),
        XorByteString => Ok(con(Constant::ByteString(bitwise(fun, &args[1], &args[2], as_bool(fun, &args[0])?, |a, b| a ^ b)?))),
        ComplementByteString => Ok(con(Constant::ByteString(as_bytestring(fun, &args[0])?.iter().map(|b| !b).collect()))),
        ReadBit => {
            let bytes = as_bytestring(fun, &args[0])?;
            let index = i64_of(as_integer(fun, &args[1])?).ok_or_else(|| fail(fun, "index out of range"))?;
            let (byte_ix, bit_ix) = bit_location(bytes.len(), index).ok_or_else(|| fail(fun, "bit index out of bounds"))?;
            Ok(bool_((bytes[byte_ix] >> bit_ix) & 1 == 1))
        }
        WriteBits => {
            let mut bytes = as_bytestring(fun, &args[0])?.to_vec();
            let (_, indices) = as_list(fun, &args[1])?;
            let set_to = as_bool(fun, &args[2])?;
            for idx in indices {
                let Constant::Integer(i) = idx else { return Err(mismatch(fun)) };
                let index = i64_of(i).ok_or_else(|| fail(fun, "index out of range"))?;
                let (byte_ix, bit_ix) = bit_location(bytes.len(), index).ok_or_else(|| fail(fun, "bit index out of bounds"))?;
                if set_to {
                    bytes[byte_ix] |= 1 << bit_ix;
                } else {
                    bytes[byte_ix] &= !(1 << bit_ix);
                }
            }
            Ok(con(Constant::ByteString(bytes)))
        }
        ReplicateByte => {
            let len = i64_of(as_integer(fun, &args[0])?).unwrap_or(0).max(0) as usize;
            let byte = as_integer(fun, &args[1])?.to_u8().ok_or_else(|| fail(fun, "byte out of range"))?;
            Ok(con(Constant::ByteString(vec![byte; len])))
        }
        ShiftByteString => {
            let bytes = as_bytestring(fun, &args[0])?;
            let shift = i64_of(as_integer(fun, &args[1])?).unwrap_or(0);
            Ok(con(Constant::ByteString(shift_bytes(bytes, shift))))
        }
        RotateByteString => {
            let bytes = as_bytestring(fun, &args[0])?;
            let shift = i64_of(as_integer(fun, &args[1])?).unwrap_or(0);
            Ok(con(Constant::ByteString(rotate_bytes(bytes, shift))))
        }
        CountSetBits => Ok(con(Constant::Integer(BigInt::from(
            as_bytestring(fun, &args[0])?.iter().map(|b| b.count_ones()).sum::<u32>(),
        )))),
        FindFirstSetBit => {
            let bytes = as_bytestring(fun, &args[0])?;
            for (byte_ix, byte) in bytes.iter().enumerate().rev() {
                if *byte != 0 {
                    let bit_ix = byte.trailing_zeros() as usize;
                    return Ok(con(Constant::Integer(BigInt::from(
                        (bytes.len() - 1 - byte_ix) * 8 + bit_ix,
                    ))));
                }
            }
            Ok(con(Constant::Integer(BigInt::from(-1))))
        }
    }
}

fn ml_result(fun: DefaultFunction, v: &Value) -> Result<Rc<bls12_381::MlResult>> {
    match v {
        Value::Bls12_381MlResult(r) => Ok(r.clone()),
        _ => Err(mismatch(fun)),
    }
}

fn scalar_be_bytes(scalar: &BigInt) -> Vec<u8> {
    scalar.to_bytes_be().1
}

fn floor_div(a: &BigInt, b: &BigInt) -> BigInt {
    let (q, r) = (a / b, a % b);
    if !r.is_zero() && (r.is_negative() != b.is_negative()) {
        q - 1
    } else {
        q
    }
}

fn floor_mod(a: &BigInt, b: &BigInt) -> BigInt {
    let r = a % b;
    if !r.is_zero() && (r.is_negative() != b.is_negative()) {
        r + b
    } else {
        r
    }
}

fn integer_to_data_bigint(i: &BigInt) -> DataBigInt {
    use cardano_codec::utils::Int;
    if let Some(small) = i.to_i128() {
        if let Ok(wrapped) = Int::try_from(small) {
            return DataBigInt::Int(wrapped);
        }
    }
    if i.is_negative() {
        let (_, bytes) = (-i.clone() - 1).to_bytes_be();
        DataBigInt::BigNInt(bytes.into())
    } else {
        let (_, bytes) = i.to_bytes_be();
        DataBigInt::BigUInt(bytes.into())
    }
}

fn data_bigint_to_integer(i: &DataBigInt) -> BigInt {
    match i {
        DataBigInt::Int(n) => BigInt::from(i128::from(n.clone())),
        DataBigInt::BigUInt(bytes) => BigInt::from_bytes_be(num_bigint::Sign::Plus, bytes),
        DataBigInt::BigNInt(bytes) => -(BigInt::from_bytes_be(num_bigint::Sign::Plus, bytes) + 1),
    }
}

fn bitwise(
    fun: DefaultFunction,
    a: &Value,
    b: &Value,
    pad_with_zero_extend: bool,
    op: impl Fn(u8, u8) -> u8,
) -> Result<Vec<u8>> {
    let a = as_bytestring(fun, a)?;
    let b = as_bytestring(fun, b)?;
    let len = if pad_with_zero_extend { a.len().max(b.len()) } else { a.len().min(b.len()) };
    Ok((0..len)
        .map(|i| op(a.get(i).copied().unwrap_or(0), b.get(i).copied().unwrap_or(0)))
        .collect())
}

fn bit_location(num_bytes: usize, index: i64) -> Option<(usize, u32)> {
    if index < 0 {
        return None;
    }
    let index = index as usize;
    let total_bits = num_bytes * 8;
    if index >= total_bits {
        return None;
    }
    let byte_ix = num_bytes - 1 - index / 8;
    let bit_ix = (index % 8) as u32;
    Some((byte_ix, bit_ix))
}

fn shift_bytes(bytes: &[u8], shift: i64) -> Vec<u8> {
    let total_bits = bytes.len() * 8;
    if shift.unsigned_abs() as usize >= total_bits {
        return vec![0; bytes.len()];
    }
    let mut bits: Vec<bool> = bytes.iter().flat_map(|b| (0..8).rev().map(move |i| (b >> i) & 1 == 1)).collect();
    if shift >= 0 {
        bits.rotate_left(shift as usize);
        for bit in bits.iter_mut().rev().take(shift as usize) {
            *bit = false;
        }
    } else {
        let s = (-shift) as usize;
        bits.rotate_right(s);
        for bit in bits.iter_mut().take(s) {
            *bit = false;
        }
    }
    bits_to_bytes(&bits)
}

fn rotate_bytes(bytes: &[u8], shift: i64) -> Vec<u8> {
    let total_bits = bytes.len() * 8;
    if total_bits == 0 {
        return bytes.to_vec();
    }
    let mut bits: Vec<bool> = bytes.iter().flat_map(|b| (0..8).rev().map(move |i| (b >> i) & 1 == 1)).collect();
    let s = shift.rem_euclid(total_bits as i64) as usize;
    bits.rotate_left(s);
    bits_to_bytes(&bits)
}

fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, bit| (acc << 1) | (*bit as u8)))
        .collect()
}
