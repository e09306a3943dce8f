use crate::ToHash;

use super::{AuxiliaryData, NativeScript, PlutusData, PlutusScript, TransactionBody};
use cardano_codec::utils::KeepRaw;
use cardano_crypto::hash::{Hash, Hasher};

impl ToHash<32> for AuxiliaryData {
    fn to_hash(&self) -> cardano_crypto::hash::Hash<32> {
        Hasher::<256>::hash_cbor(self)
    }
}

impl ToHash<28> for NativeScript {
    fn to_hash(&self) -> Hash<28> {
        Hasher::<224>::hash_tagged_cbor(self, 0)
    }
}

impl ToHash<28> for PlutusScript {
    fn to_hash(&self) -> Hash<28> {
        Hasher::<224>::hash_tagged_cbor(self, 1)
    }
}

impl ToHash<32> for PlutusData {
    fn to_hash(&self) -> Hash<32> {
        Hasher::<256>::hash_cbor(self)
    }
}

impl ToHash<32> for TransactionBody {
    fn to_hash(&self) -> Hash<32> {
        Hasher::<256>::hash_cbor(self)
    }
}

impl ToHash<32> for KeepRaw<'_, TransactionBody> {
    fn to_hash(&self) -> cardano_crypto::hash::Hash<32> {
        Hasher::<256>::hash(self.raw_cbor())
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use cardano_codec::minicbor::data::Int;
    use cardano_codec::utils::MaybeIndefArray;
    use cardano_crypto::hash::Hash;

    use crate::alonzo::{BigInt, Constr, NativeScript, PlutusData};
    use crate::ToHash;

    #[test]
    fn native_script_hashes_as_cardano_cli() {
        // construct an arbitrary script to use as example
        let ns = NativeScript::ScriptAll(MaybeIndefArray::Def(vec![
            NativeScript::ScriptPubkey(
                Hash::<28>::from_str("4d04380dcb9fbad5aff8e2f4e19394ef4e5e11b37932838f01984a12")
                    .unwrap(),
            ),
            NativeScript::InvalidBefore(112500819),
        ]));

        // hash that we assume correct since it was generated through the cardano-cli
        let cardano_cli_output = "d6a8ced01ecdfbb26c90850010a06fbc20a7c23632fc92f531667f36";

        assert_eq!(
            ns.to_hash(),
            Hash::<28>::from_str(cardano_cli_output).unwrap()
        )
    }

    #[test]
    fn plutus_data_hashes_as_cardano_cli() {
        // construct an arbitrary complex datum to use as example
        let pd = PlutusData::Constr(Constr::<PlutusData> {
            tag: 1280,
            any_constructor: None,
            fields: MaybeIndefArray::Indef(vec![
                PlutusData::BigInt(BigInt::Int(Int::from(4))),
                PlutusData::Constr(Constr::<PlutusData> {
                    tag: 124,
                    any_constructor: None,
                    fields: MaybeIndefArray::Indef(vec![
                        PlutusData::BigInt(BigInt::Int(Int::from(-4))),
                        PlutusData::Constr(Constr::<PlutusData> {
                            tag: 102,
                            any_constructor: Some(453),
                            fields: MaybeIndefArray::Indef(vec![
                                PlutusData::BigInt(BigInt::Int(Int::from(2))),
                                PlutusData::BigInt(BigInt::Int(Int::from(3434))),
                            ]),
                        }),
                        PlutusData::BigInt(BigInt::Int(Int::from(-11828293))),
                    ]),
                }),
                PlutusData::BigInt(BigInt::Int(Int::from(11828293))),
            ]),
        });

        // if you need to try this out in the cardano-cli, uncomment this line to see
        // the json representation of the above struct:
        // println!("{}", crate::ToCanonicalJson::to_json(&pd));

        // hash that we assume correct since it was generated through the cardano-cli
        let cardano_cli_output = "d9bc0eb6ac664286155f70d720cafd2af16277fbd9014a930997431a2ffbe554";

        assert_eq!(
            pd.to_hash(),
            Hash::<32>::from_str(cardano_cli_output).unwrap()
        )
    }
}
