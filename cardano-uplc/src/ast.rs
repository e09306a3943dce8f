//! Untyped Plutus Core term representation.
//!
//! Terms are generic over the variable representation so the same AST
//! serves both the parsed/named form (not used by this crate, which only
//! ever sees flat-decoded programs) and the de Bruijn-indexed form the
//! flat codec and the CEK machine operate on.

use cardano_crypto::key::bls12_381::{G1Element, G2Element};
use cardano_primitives::PlutusData;
use num_bigint::BigInt;
use std::rc::Rc;

/// A de Bruijn index: the number of enclosing lambdas to skip to reach
/// the binding site, counting outward from the variable's own position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeBruijn(pub usize);

impl From<usize> for DeBruijn {
    fn from(value: usize) -> Self {
        DeBruijn(value)
    }
}

/// The 55 builtin functions of Plutus V3, in the order the flat codec
/// assigns them tags (§6.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DefaultFunction {
    AddInteger = 0,
    SubtractInteger = 1,
    MultiplyInteger = 2,
    DivideInteger = 3,
    QuotientInteger = 4,
    RemainderInteger = 5,
    ModInteger = 6,
    EqualsInteger = 7,
    LessThanInteger = 8,
    LessThanEqualsInteger = 9,
    AppendByteString = 10,
    ConsByteString = 11,
    SliceByteString = 12,
    LengthOfByteString = 13,
    IndexByteString = 14,
    EqualsByteString = 15,
    LessThanByteString = 16,
    LessThanEqualsByteString = 17,
    Sha2_256 = 18,
    Sha3_256 = 19,
    Blake2b_256 = 20,
    VerifyEd25519Signature = 21,
    AppendString = 22,
    EqualsString = 23,
    EncodeUtf8 = 24,
    DecodeUtf8 = 25,
    IfThenElse = 26,
    ChooseUnit = 27,
    Trace = 28,
    FstPair = 29,
    SndPair = 30,
    ChooseList = 31,
    MkCons = 32,
    HeadList = 33,
    TailList = 34,
    NullList = 35,
    ChooseData = 36,
    ConstrData = 37,
    MapData = 38,
    ListData = 39,
    IData = 40,
    BData = 41,
    UnConstrData = 42,
    UnMapData = 43,
    UnListData = 44,
    UnIData = 45,
    UnBData = 46,
    EqualsData = 47,
    MkPairData = 48,
    MkNilData = 49,
    MkNilPairData = 50,
    SerialiseData = 51,
    VerifyEcdsaSecp256k1Signature = 52,
    VerifySchnorrSecp256k1Signature = 53,
    Bls12_381_G1_Add = 54,
    Bls12_381_G1_Neg = 55,
    Bls12_381_G1_ScalarMul = 56,
    Bls12_381_G1_Equal = 57,
    Bls12_381_G1_Compress = 58,
    Bls12_381_G1_Uncompress = 59,
    Bls12_381_G1_HashToGroup = 60,
    Bls12_381_G2_Add = 61,
    Bls12_381_G2_Neg = 62,
    Bls12_381_G2_ScalarMul = 63,
    Bls12_381_G2_Equal = 64,
    Bls12_381_G2_Compress = 65,
    Bls12_381_G2_Uncompress = 66,
    Bls12_381_G2_HashToGroup = 67,
    Bls12_381_MillerLoop = 68,
    Bls12_381_MulMlResult = 69,
    Bls12_381_FinalVerify = 70,
    Keccak_256 = 71,
    Blake2b_224 = 72,
    IntegerToByteString = 73,
    ByteStringToInteger = 74,
    AndByteString = 75,
    OrByteString = 76,
    XorByteString = 77,
    ComplementByteString = 78,
    ReadBit = 79,
    WriteBits = 80,
    ReplicateByte = 81,
    ShiftByteString = 82,
    RotateByteString = 83,
    CountSetBits = 84,
    FindFirstSetBit = 85,
    Ripemd_160 = 86,
}

impl DefaultFunction {
    /// Number of arguments a fully-applied call expects.
    pub fn arity(self) -> usize {
        use DefaultFunction::*;
        match self {
            Trace | IData | BData | UnConstrData | UnMapData | UnListData | UnIData | UnBData
            | SerialiseData | FstPair | SndPair | HeadList | TailList | NullList
            | LengthOfByteString | Sha2_256 | Sha3_256 | Blake2b_256 | Blake2b_224 | Keccak_256
            | Ripemd_160 | EncodeUtf8 | DecodeUtf8 | MkNilData | MkNilPairData | MapData
            | ListData | Bls12_381_G1_Neg | Bls12_381_G1_Compress | Bls12_381_G1_Uncompress
            | Bls12_381_G2_Neg | Bls12_381_G2_Compress | Bls12_381_G2_Uncompress
            | ComplementByteString | CountSetBits | FindFirstSetBit => 1,

            AddInteger | SubtractInteger | MultiplyInteger | DivideInteger | QuotientInteger
            | RemainderInteger | ModInteger | EqualsInteger | LessThanInteger
            | LessThanEqualsInteger | AppendByteString | EqualsByteString
            | LessThanByteString | LessThanEqualsByteString | AppendString | EqualsString
            | ChooseUnit | MkCons | ConstrData | EqualsData | MkPairData | ByteStringToInteger
            | Bls12_381_G1_Add | Bls12_381_G1_ScalarMul | Bls12_381_G1_Equal
            | Bls12_381_G1_HashToGroup | Bls12_381_G2_Add | Bls12_381_G2_ScalarMul
            | Bls12_381_G2_Equal | Bls12_381_G2_HashToGroup | Bls12_381_MillerLoop
            | Bls12_381_MulMlResult | IndexByteString | ReplicateByte | ReadBit
            | ShiftByteString | RotateByteString => 2,

            IfThenElse | ChooseList | SliceByteString | VerifyEd25519Signature
            | IntegerToByteString | AndByteString | OrByteString | XorByteString | WriteBits
            | Bls12_381_FinalVerify | VerifyEcdsaSecp256k1Signature
            | VerifySchnorrSecp256k1Signature => 3,

            ChooseData => 6,
        }
    }
}

/// A value-level type tag, used only inside `Constant::ProtoList` and
/// `Constant::ProtoPair` to record the element type(s) of an otherwise
/// untyped container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    Bool,
    Integer,
    String,
    ByteString,
    Unit,
    Data,
    Bls12_381G1,
    Bls12_381G2,
    Bls12_381MlResult,
    List(Box<Type>),
    Pair(Box<Type>, Box<Type>),
}

/// A constant value embedded in a program.
#[derive(Debug, Clone)]
pub enum Constant {
    Integer(BigInt),
    ByteString(Vec<u8>),
    String(String),
    Unit,
    Bool(bool),
    ProtoList(Type, Vec<Constant>),
    ProtoPair(Type, Type, Box<Constant>, Box<Constant>),
    Data(PlutusData),
    Bls12_381G1(Box<G1Element>),
    Bls12_381G2(Box<G2Element>),
}

impl Constant {
    pub fn value_type(&self) -> Type {
        match self {
            Constant::Integer(_) => Type::Integer,
            Constant::ByteString(_) => Type::ByteString,
            Constant::String(_) => Type::String,
            Constant::Unit => Type::Unit,
            Constant::Bool(_) => Type::Bool,
            Constant::ProtoList(t, _) => Type::List(Box::new(t.clone())),
            Constant::ProtoPair(a, b, _, _) => Type::Pair(Box::new(a.clone()), Box::new(b.clone())),
            Constant::Data(_) => Type::Data,
            Constant::Bls12_381G1(_) => Type::Bls12_381G1,
            Constant::Bls12_381G2(_) => Type::Bls12_381G2,
        }
    }
}

impl PartialEq for Constant {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Constant::Integer(a), Constant::Integer(b)) => a == b,
            (Constant::ByteString(a), Constant::ByteString(b)) => a == b,
            (Constant::String(a), Constant::String(b)) => a == b,
            (Constant::Unit, Constant::Unit) => true,
            (Constant::Bool(a), Constant::Bool(b)) => a == b,
            (Constant::ProtoList(ta, a), Constant::ProtoList(tb, b)) => ta == tb && a == b,
            (Constant::ProtoPair(ta1, ta2, a1, a2), Constant::ProtoPair(tb1, tb2, b1, b2)) => {
                ta1 == tb1 && ta2 == tb2 && a1 == b1 && a2 == b2
            }
            (Constant::Data(a), Constant::Data(b)) => a == b,
            (Constant::Bls12_381G1(a), Constant::Bls12_381G1(b)) => a.to_compressed() == b.to_compressed(),
            (Constant::Bls12_381G2(a), Constant::Bls12_381G2(b)) => a.to_compressed() == b.to_compressed(),
            _ => false,
        }
    }
}

/// An untyped Plutus Core term, generic over the variable representation `V`.
#[derive(Debug, Clone)]
pub enum Term<V> {
    Var(V),
    Delay(Rc<Term<V>>),
    Lambda(Rc<Term<V>>),
    Apply(Rc<Term<V>>, Rc<Term<V>>),
    Constant(Rc<Constant>),
    Force(Rc<Term<V>>),
    Error,
    Builtin(DefaultFunction),
    Constr(u64, Vec<Rc<Term<V>>>),
    Case(Rc<Term<V>>, Vec<Rc<Term<V>>>),
}

/// A full program: a version triple plus its top-level term.
#[derive(Debug, Clone)]
pub struct Program<V> {
    pub version: (u64, u64, u64),
    pub term: Term<V>,
}
