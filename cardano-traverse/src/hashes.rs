use crate::ComputeHash;
use cardano_codec::utils::KeepRaw;
use cardano_crypto::hash::{Hash, Hasher};
use cardano_primitives::conway;

impl ComputeHash<32> for conway::TransactionBody {
    fn compute_hash(&self) -> Hash<32> {
        Hasher::<256>::hash_cbor(self)
    }
}

impl ComputeHash<32> for KeepRaw<'_, conway::TransactionBody> {
    fn compute_hash(&self) -> Hash<32> {
        Hasher::<256>::hash(self.raw_cbor())
    }
}

impl ComputeHash<32> for conway::AuxiliaryData {
    fn compute_hash(&self) -> Hash<32> {
        Hasher::<256>::hash_cbor(self)
    }
}

impl ComputeHash<32> for KeepRaw<'_, conway::AuxiliaryData> {
    fn compute_hash(&self) -> Hash<32> {
        Hasher::<256>::hash(self.raw_cbor())
    }
}

impl ComputeHash<28> for conway::NativeScript {
    fn compute_hash(&self) -> Hash<28> {
        Hasher::<224>::hash_tagged_cbor(self, 0)
    }
}

impl<const V: usize> ComputeHash<28> for conway::PlutusScript<V> {
    fn compute_hash(&self) -> Hash<28> {
        Hasher::<224>::hash_tagged_cbor(self, V as u8)
    }
}

impl ComputeHash<32> for conway::PlutusData {
    fn compute_hash(&self) -> Hash<32> {
        Hasher::<256>::hash_cbor(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn native_script_hashes_as_cardano_cli() {
        use std::str::FromStr;

        let ns = conway::NativeScript::ScriptAll(
            vec![
                conway::NativeScript::ScriptPubkey(
                    Hash::<28>::from_str(
                        "4d04380dcb9fbad5aff8e2f4e19394ef4e5e11b37932838f01984a12",
                    )
                    .unwrap(),
                ),
                conway::NativeScript::InvalidBefore(112500819),
            ]
            .into(),
        );

        let cardano_cli_output = "d6a8ced01ecdfbb26c90850010a06fbc20a7c23632fc92f531667f36";

        assert_eq!(
            ns.compute_hash(),
            Hash::<28>::from_str(cardano_cli_output).unwrap()
        )
    }
}
