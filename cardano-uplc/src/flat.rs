//! Bit-level "flat" wire codec for UPLC programs (§3.3/§6.2).
//!
//! Flat packs values MSB-first into a byte stream with no byte alignment
//! between fields; only the very end of a program is padded. Naturals are
//! split into 7-bit groups (LSB group first), each group prefixed by a
//! continuation bit; signed integers are zigzag-encoded naturals; lists
//! are a run of `1 <elem>` pairs terminated by a single `0` bit;
//! bytestrings are byte-aligned first, then chunked into length-prefixed
//! blocks of at most 255 bytes, terminated by a zero-length block.

use crate::ast::{Constant, DeBruijn, DefaultFunction, Program, Term, Type};
use cardano_primitives::PlutusData;
use num_bigint::{BigInt, Sign};
use num_traits::{Signed, Zero};
use std::rc::Rc;

#[derive(Debug, thiserror::Error)]
pub enum FlatError {
    #[error("unexpected end of flat bitstream")]
    Eof,
    #[error("unknown term tag {0}")]
    UnknownTermTag(u8),
    #[error("unknown builtin tag {0}")]
    UnknownBuiltinTag(u8),
    #[error("unknown type tag {0}")]
    UnknownTypeTag(u8),
    #[error("malformed constant encoding")]
    MalformedConstant,
    #[error("trailing bits after final filler")]
    TrailingBits,
}

type Result<T> = std::result::Result<T, FlatError>;

pub struct BitWriter {
    bytes: Vec<u8>,
    cur: u8,
    nbits: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        BitWriter { bytes: Vec::new(), cur: 0, nbits: 0 }
    }

    pub fn write_bit(&mut self, bit: bool) {
        self.cur = (self.cur << 1) | (bit as u8);
        self.nbits += 1;
        if self.nbits == 8 {
            self.bytes.push(self.cur);
            self.cur = 0;
            self.nbits = 0;
        }
    }

    pub fn write_bits(&mut self, value: u64, width: u32) {
        for i in (0..width).rev() {
            self.write_bit((value >> i) & 1 == 1);
        }
    }

    /// Byte-align, zero-padding the remainder of the current byte.
    pub fn byte_align(&mut self) {
        while self.nbits != 0 {
            self.write_bit(false);
        }
    }

    fn write_byte(&mut self, byte: u8) {
        debug_assert_eq!(self.nbits, 0);
        self.bytes.push(byte);
    }

    /// Natural number as 7-bit little-endian groups, MSB-of-group-first,
    /// each group but the last flagged with a leading continuation bit.
    pub fn write_natural(&mut self, mut value: u128) {
        loop {
            let group = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                self.write_bit(false);
                self.write_bits(group as u64, 7);
                break;
            } else {
                self.write_bit(true);
                self.write_bits(group as u64, 7);
            }
        }
    }

    pub fn write_integer(&mut self, value: &BigInt) {
        let zigzag = if value.sign() == Sign::Minus {
            (-value).to_biguint().unwrap() * 2u8 - 1u8
        } else {
            value.to_biguint().unwrap() * 2u8
        };
        self.write_biguint(&zigzag);
    }

    fn write_biguint(&mut self, value: &num_bigint::BigUint) {
        use num_traits::ToPrimitive;
        let mut v = value.clone();
        let mask = num_bigint::BigUint::from(0x7fu8);
        loop {
            let group = (&v & &mask).to_u8().unwrap();
            v >>= 7u32;
            if v.is_zero() {
                self.write_bit(false);
                self.write_bits(group as u64, 7);
                break;
            } else {
                self.write_bit(true);
                self.write_bits(group as u64, 7);
            }
        }
    }

    /// Byte-align then write `bytes` as length-prefixed (<=255) chunks,
    /// terminated by a zero-length chunk.
    pub fn write_bytestring(&mut self, bytes: &[u8]) {
        self.byte_align();
        for chunk in bytes.chunks(255) {
            self.write_byte(chunk.len() as u8);
            for b in chunk {
                self.write_byte(*b);
            }
        }
        self.write_byte(0);
    }

    pub fn write_bool(&mut self, b: bool) {
        self.write_bit(b);
    }

    pub fn write_list<T>(&mut self, items: &[T], mut f: impl FnMut(&mut Self, &T)) {
        for item in items {
            self.write_bit(true);
            f(self, item);
        }
        self.write_bit(false);
    }

    /// Pad the stream so it ends on a byte boundary, marking the end with
    /// a `1` filler bit before the zero padding.
    pub fn finish(mut self) -> Vec<u8> {
        self.write_bit(true);
        self.byte_align();
        self.bytes
    }
}

pub struct BitReader<'a> {
    bytes: &'a [u8],
    byte_pos: usize,
    bit_pos: u8,
}

impl<'a> BitReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        BitReader { bytes, byte_pos: 0, bit_pos: 0 }
    }

    pub fn read_bit(&mut self) -> Result<bool> {
        let byte = *self.bytes.get(self.byte_pos).ok_or(FlatError::Eof)?;
        let bit = (byte >> (7 - self.bit_pos)) & 1 == 1;
        self.bit_pos += 1;
        if self.bit_pos == 8 {
            self.bit_pos = 0;
            self.byte_pos += 1;
        }
        Ok(bit)
    }

    pub fn read_bits(&mut self, width: u32) -> Result<u64> {
        let mut out = 0u64;
        for _ in 0..width {
            out = (out << 1) | (self.read_bit()? as u64);
        }
        Ok(out)
    }

    pub fn byte_align(&mut self) {
        if self.bit_pos != 0 {
            self.bit_pos = 0;
            self.byte_pos += 1;
        }
    }

    fn read_byte(&mut self) -> Result<u8> {
        debug_assert_eq!(self.bit_pos, 0);
        let byte = *self.bytes.get(self.byte_pos).ok_or(FlatError::Eof)?;
        self.byte_pos += 1;
        Ok(byte)
    }

    pub fn read_natural(&mut self) -> Result<u128> {
        let mut result: u128 = 0;
        let mut shift = 0;
        loop {
            let more = self.read_bit()?;
            let group = self.read_bits(7)? as u128;
            result |= group << shift;
            shift += 7;
            if !more {
                break;
            }
        }
        Ok(result)
    }

    pub fn read_integer(&mut self) -> Result<BigInt> {
        let zigzag = self.read_biguint()?;
        let two = num_bigint::BigUint::from(2u8);
        if &zigzag % &two == num_bigint::BigUint::from(1u8) {
            Ok(-BigInt::from((zigzag + 1u8) / two))
        } else {
            Ok(BigInt::from(zigzag / two))
        }
    }

    fn read_biguint(&mut self) -> Result<num_bigint::BigUint> {
        let mut result = num_bigint::BigUint::from(0u8);
        let mut shift = 0u32;
        loop {
            let more = self.read_bit()?;
            let group = self.read_bits(7)?;
            result |= num_bigint::BigUint::from(group) << shift;
            shift += 7;
            if !more {
                break;
            }
        }
        Ok(result)
    }

    pub fn read_bytestring(&mut self) -> Result<Vec<u8>> {
        self.byte_align();
        let mut out = Vec::new();
        loop {
            let len = self.read_byte()?;
            if len == 0 {
                break;
            }
            for _ in 0..len {
                out.push(self.read_byte()?);
            }
        }
        Ok(out)
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        self.read_bit()
    }

    pub fn read_list<T>(&mut self, mut f: impl FnMut(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        let mut out = Vec::new();
        while self.read_bit()? {
            out.push(f(self)?);
        }
        Ok(out)
    }

    /// Consumes the final `1` filler bit and confirms only zero padding
    /// bits remain to the end of the buffer.
    pub fn finish(mut self) -> Result<()> {
        if !self.read_bit()? {
            return Err(FlatError::TrailingBits);
        }
        while self.bit_pos != 0 {
            if self.read_bit()? {
                return Err(FlatError::TrailingBits);
            }
        }
        Ok(())
    }
}

fn term_tag(term: &Term<DeBruijn>) -> u8 {
    match term {
        Term::Var(_) => 0,
        Term::Delay(_) => 1,
        Term::Lambda(_) => 2,
        Term::Apply(_, _) => 3,
        Term::Constant(_) => 4,
        Term::Force(_) => 5,
        Term::Error => 6,
        Term::Builtin(_) => 7,
        Term::Constr(_, _) => 8,
        Term::Case(_, _) => 9,
    }
}

fn type_tags(ty: &Type, out: &mut Vec<u8>) {
    match ty {
        Type::Integer => out.push(0),
        Type::ByteString => out.push(1),
        Type::String => out.push(2),
        Type::Unit => out.push(3),
        Type::Bool => out.push(4),
        Type::List(inner) => {
            out.push(7);
            out.push(5);
            type_tags(inner, out);
        }
        Type::Pair(a, b) => {
            out.push(7);
            out.push(7);
            out.push(6);
            type_tags(a, out);
            type_tags(b, out);
        }
        Type::Data => out.push(8),
        Type::Bls12_381G1 => out.push(9),
        Type::Bls12_381G2 => out.push(10),
        Type::Bls12_381MlResult => out.push(11),
    }
}

fn parse_type_tags(tags: &[u8], pos: &mut usize) -> Result<Type> {
    let tag = *tags.get(*pos).ok_or(FlatError::MalformedConstant)?;
    *pos += 1;
    match tag {
        0 => Ok(Type::Integer),
        1 => Ok(Type::ByteString),
        2 => Ok(Type::String),
        3 => Ok(Type::Unit),
        4 => Ok(Type::Bool),
        8 => Ok(Type::Data),
        9 => Ok(Type::Bls12_381G1),
        10 => Ok(Type::Bls12_381G2),
        11 => Ok(Type::Bls12_381MlResult),
        7 => {
            let app = *tags.get(*pos).ok_or(FlatError::MalformedConstant)?;
            *pos += 1;
            match app {
                5 => Ok(Type::List(Box::new(parse_type_tags(tags, pos)?))),
                7 => {
                    let pair_tag = *tags.get(*pos).ok_or(FlatError::MalformedConstant)?;
                    *pos += 1;
                    if pair_tag != 6 {
                        return Err(FlatError::MalformedConstant);
                    }
                    let a = parse_type_tags(tags, pos)?;
                    let b = parse_type_tags(tags, pos)?;
                    Ok(Type::Pair(Box::new(a), Box::new(b)))
                }
                _ => Err(FlatError::MalformedConstant),
            }
        }
        other => Err(FlatError::UnknownTypeTag(other)),
    }
}

fn write_constant(w: &mut BitWriter, c: &Constant) {
    let mut tags = Vec::new();
    type_tags(&c.value_type(), &mut tags);
    w.write_list(&tags, |w, t| w.write_bits(*t as u64, 4));
    write_constant_value(w, c);
}

fn write_constant_value(w: &mut BitWriter, c: &Constant) {
    match c {
        Constant::Integer(i) => w.write_integer(i),
        Constant::ByteString(b) => w.write_bytestring(b),
        Constant::String(s) => w.write_bytestring(s.as_bytes()),
        Constant::Unit => {}
        Constant::Bool(b) => w.write_bool(*b),
        Constant::ProtoList(_, items) => {
            w.write_list(items, |w, item| write_constant_value(w, item))
        }
        Constant::ProtoPair(_, _, a, b) => {
            write_constant_value(w, a);
            write_constant_value(w, b);
        }
        Constant::Data(data) => w.write_bytestring(&encode_plutus_data_cbor(data)),
        Constant::Bls12_381G1(g) => w.write_bytestring(&g.to_compressed()),
        Constant::Bls12_381G2(g) => w.write_bytestring(&g.to_compressed()),
    }
}

fn read_constant(r: &mut BitReader) -> Result<Constant> {
    let tags = r.read_list(|r| Ok(r.read_bits(4)? as u8))?;
    let mut pos = 0;
    let ty = parse_type_tags(&tags, &mut pos)?;
    if pos != tags.len() {
        return Err(FlatError::MalformedConstant);
    }
    read_constant_value(r, &ty)
}

fn read_constant_value(r: &mut BitReader, ty: &Type) -> Result<Constant> {
    Ok(match ty {
        Type::Integer => Constant::Integer(r.read_integer()?),
        Type::ByteString => Constant::ByteString(r.read_bytestring()?),
        Type::String => Constant::String(
            String::from_utf8(r.read_bytestring()?).map_err(|_| FlatError::MalformedConstant)?,
        ),
        Type::Unit => Constant::Unit,
        Type::Bool => Constant::Bool(r.read_bool()?),
        Type::List(inner) => {
            let items = r.read_list(|r| read_constant_value(r, inner))?;
            Constant::ProtoList((**inner).clone(), items)
        }
        Type::Pair(a, b) => {
            let av = read_constant_value(r, a)?;
            let bv = read_constant_value(r, b)?;
            Constant::ProtoPair((**a).clone(), (**b).clone(), Box::new(av), Box::new(bv))
        }
        Type::Data => {
            let bytes = r.read_bytestring()?;
            Constant::Data(decode_plutus_data_cbor(&bytes)?)
        }
        Type::Bls12_381G1 => {
            let bytes = r.read_bytestring()?;
            let g = cardano_crypto::key::bls12_381::G1Element::from_compressed(&bytes)
                .map_err(|_| FlatError::MalformedConstant)?;
            Constant::Bls12_381G1(Box::new(g))
        }
        Type::Bls12_381G2 => {
            let bytes = r.read_bytestring()?;
            let g = cardano_crypto::key::bls12_381::G2Element::from_compressed(&bytes)
                .map_err(|_| FlatError::MalformedConstant)?;
            Constant::Bls12_381G2(Box::new(g))
        }
        Type::Bls12_381MlResult => return Err(FlatError::MalformedConstant),
    })
}

fn encode_plutus_data_cbor(data: &PlutusData) -> Vec<u8> {
    let mut bytes = Vec::new();
    cardano_codec::minicbor::Encoder::new(&mut bytes)
        .encode(data)
        .expect("plutus data always encodes");
    bytes
}

fn decode_plutus_data_cbor(bytes: &[u8]) -> Result<PlutusData> {
    cardano_codec::minicbor::decode(bytes).map_err(|_| FlatError::MalformedConstant)
}

fn write_term(w: &mut BitWriter, term: &Term<DeBruijn>) {
    w.write_bits(term_tag(term) as u64, 4);
    match term {
        Term::Var(v) => w.write_natural(v.0 as u128),
        Term::Delay(t) => write_term(w, t),
        Term::Lambda(t) => write_term(w, t),
        Term::Apply(f, a) => {
            write_term(w, f);
            write_term(w, a);
        }
        Term::Constant(c) => write_constant(w, c),
        Term::Force(t) => write_term(w, t),
        Term::Error => {}
        Term::Builtin(f) => w.write_bits(*f as u64, 7),
        Term::Constr(tag, fields) => {
            w.write_natural(*tag as u128);
            w.write_list(fields, |w, t| write_term(w, t));
        }
        Term::Case(scrutinee, branches) => {
            write_term(w, scrutinee);
            w.write_list(branches, |w, t| write_term(w, t));
        }
    }
}

fn read_term(r: &mut BitReader) -> Result<Term<DeBruijn>> {
    let tag = r.read_bits(4)? as u8;
    Ok(match tag {
        0 => Term::Var(DeBruijn(r.read_natural()? as usize)),
        1 => Term::Delay(Rc::new(read_term(r)?)),
        2 => Term::Lambda(Rc::new(read_term(r)?)),
        3 => {
            let f = read_term(r)?;
            let a = read_term(r)?;
            Term::Apply(Rc::new(f), Rc::new(a))
        }
        4 => Term::Constant(Rc::new(read_constant(r)?)),
        5 => Term::Force(Rc::new(read_term(r)?)),
        6 => Term::Error,
        7 => Term::Builtin(builtin_from_tag(r.read_bits(7)? as u8)?),
        8 => {
            let ctor = r.read_natural()? as u64;
            let fields = r.read_list(|r| Ok(Rc::new(read_term(r)?)))?;
            Term::Constr(ctor, fields)
        }
        9 => {
            let scrutinee = Rc::new(read_term(r)?);
            let branches = r.read_list(|r| Ok(Rc::new(read_term(r)?)))?;
            Term::Case(scrutinee, branches)
        }
        other => return Err(FlatError::UnknownTermTag(other)),
    })
}

fn builtin_from_tag(tag: u8) -> Result<DefaultFunction> {
    use DefaultFunction::*;
    const TABLE: &[DefaultFunction] = &[
        AddInteger, SubtractInteger, MultiplyInteger, DivideInteger, QuotientInteger,
        RemainderInteger, ModInteger, EqualsInteger, LessThanInteger, LessThanEqualsInteger,
        AppendByteString, ConsByteString, SliceByteString, LengthOfByteString, IndexByteString,
        EqualsByteString, LessThanByteString, LessThanEqualsByteString, Sha2_256, Sha3_256,
        Blake2b_256, VerifyEd25519Signature, AppendString, EqualsString, EncodeUtf8, DecodeUtf8,
        IfThenElse, ChooseUnit, Trace, FstPair, SndPair, ChooseList, MkCons, HeadList, TailList,
        NullList, ChooseData, ConstrData, MapData, ListData, IData, BData, UnConstrData,
        UnMapData, UnListData, UnIData, UnBData, EqualsData, MkPairData, MkNilData,
        MkNilPairData, SerialiseData, VerifyEcdsaSecp256k1Signature,
        VerifySchnorrSecp256k1Signature, Bls12_381_G1_Add, Bls12_381_G1_Neg,
        Bls12_381_G1_ScalarMul, Bls12_381_G1_Equal, Bls12_381_G1_Compress,
        Bls12_381_G1_Uncompress, Bls12_381_G1_HashToGroup, Bls12_381_G2_Add, Bls12_381_G2_Neg,
        Bls12_381_G2_ScalarMul, Bls12_381_G2_Equal, Bls12_381_G2_Compress,
        Bls12_381_G2_Uncompress, Bls12_381_G2_HashToGroup, Bls12_381_MillerLoop,
        Bls12_381_MulMlResult, Bls12_381_FinalVerify, Keccak_256, Blake2b_224,
        IntegerToByteString, ByteStringToInteger, AndByteString, OrByteString, XorByteString,
        ComplementByteString, ReadBit, WriteBits, ReplicateByte, ShiftByteString,
        RotateByteString, CountSetBits, FindFirstSetBit, Ripemd_160,
    ];
    TABLE.get(tag as usize).copied().ok_or(FlatError::UnknownBuiltinTag(tag))
}

pub fn encode_program(program: &Program<DeBruijn>) -> Vec<u8> {
    let mut w = BitWriter::new();
    w.write_natural(program.version.0 as u128);
    w.write_natural(program.version.1 as u128);
    w.write_natural(program.version.2 as u128);
    write_term(&mut w, &program.term);
    w.finish()
}

pub fn decode_program(bytes: &[u8]) -> Result<Program<DeBruijn>> {
    let mut r = BitReader::new(bytes);
    let version = (
        r.read_natural()? as u64,
        r.read_natural()? as u64,
        r.read_natural()? as u64,
    );
    let term = read_term(&mut r)?;
    r.finish()?;
    Ok(Program { version, term })
}

// Re-exported so callers that already hold a CBOR-decoded `PlutusData`
// (rather than raw flat-encoded `Data` bytes) can build `Constant::Data`
// without depending on `cardano-codec` directly.
pub fn plutus_data_from_cbor(bytes: &[u8]) -> Result<PlutusData> {
    decode_plutus_data_cbor(bytes)
}
