use crate::ToHash;

use super::TransactionBody;
use crate::{plutus_data::PlutusData, PlutusScript};
use cardano_codec::utils::KeepRaw;
use cardano_crypto::hash::{Hash, Hasher};

impl<const VERSION: usize> ToHash<28> for PlutusScript<VERSION> {
    fn to_hash(&self) -> Hash<28> {
        Hasher::<224>::hash_tagged_cbor(self, VERSION as u8)
    }
}

impl ToHash<32> for PlutusData {
    fn to_hash(&self) -> Hash<32> {
        Hasher::<256>::hash_cbor(self)
    }
}

impl ToHash<32> for KeepRaw<'_, PlutusData> {
    fn to_hash(&self) -> Hash<32> {
        Hasher::<256>::hash(self.raw_cbor())
    }
}

impl ToHash<32> for TransactionBody<'_> {
    fn to_hash(&self) -> Hash<32> {
        Hasher::<256>::hash_cbor(self)
    }
}

impl ToHash<32> for KeepRaw<'_, TransactionBody<'_>> {
    fn to_hash(&self) -> Hash<32> {
        Hasher::<256>::hash(self.raw_cbor())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plutus_v1_and_v2_scripts_hash_with_distinct_tags() {
        let script = PlutusScript::<1>(vec![0x01, 0x02, 0x03].into());
        let as_v2 = PlutusScript::<2>(script.0.clone());
        assert_ne!(script.to_hash(), as_v2.to_hash());
    }

    #[test]
    fn transaction_body_hash_matches_raw_cbor_hash() {
        use cardano_codec::minicbor;
        use cardano_codec::utils::Set;

        let body = TransactionBody {
            inputs: Set::from(vec![]),
            outputs: vec![],
            fee: 0,
            ttl: None,
            certificates: None,
            withdrawals: None,
            auxiliary_data_hash: None,
            validity_interval_start: None,
            mint: None,
            script_data_hash: None,
            collateral: None,
            required_signers: None,
            network_id: None,
            collateral_return: None,
            total_collateral: None,
            reference_inputs: None,
            voting_procedures: None,
            proposal_procedures: None,
            treasury_value: None,
            donation: None,
        };

        let bytes = minicbor::to_vec(&body).unwrap();
        let raw: KeepRaw<TransactionBody> = minicbor::decode(&bytes).unwrap();

        assert_eq!(body.to_hash(), raw.to_hash());
    }
}
