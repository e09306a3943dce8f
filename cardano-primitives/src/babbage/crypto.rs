use crate::ToHash;

use super::{Data, DatumOption, PlutusV2Script, TransactionBody};
use cardano_codec::utils::KeepRaw;
use cardano_crypto::hash::{Hash, Hasher};

impl ToHash<32> for Data {
    fn to_hash(&self) -> Hash<32> {
        self.0.to_hash()
    }
}

impl ToHash<28> for PlutusV2Script {
    fn to_hash(&self) -> Hash<28> {
        Hasher::<224>::hash_tagged_cbor(self, 2)
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

impl ToHash<32> for DatumOption {
    fn to_hash(&self) -> Hash<32> {
        match self {
            DatumOption::Hash(hash) => *hash,
            DatumOption::Data(data) => data.to_hash()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::DatumOption;
    use crate::ToHash;
    use cardano_crypto::hash::Hash;

    #[test]
    fn datum_option_hash_variant_returns_hash_directly() {
        let hash = Hash::<32>::from_str(
            "d9bc0eb6ac664286155f70d720cafd2af16277fbd9014a930997431a2ffbe55",
        )
        .unwrap();

        assert_eq!(DatumOption::Hash(hash).to_hash(), hash);
    }
}
