use crate::Error;

use super::TransactionOutput;
use bech32::{self, ToBase32};

pub fn encode_bech32_address(data: &[u8], hrp: &str) -> Result<String, Error> {
    bech32::encode(hrp, data.to_base32(), bech32::Variant::Bech32).map_err(|e| e.into())
}

impl TransactionOutput {
    pub fn to_bech32_address(&self, hrp: &str) -> Result<String, Error> {
        let address = match self {
            TransactionOutput::Legacy(x) => &x.address,
            TransactionOutput::PostAlonzo(x) => &x.address,
        };

        encode_bech32_address(address.as_slice(), hrp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::babbage::{PostAlonzoTransactionOutput, Value};

    #[test]
    fn legacy_and_post_alonzo_outputs_share_bech32_encoding() {
        let address = vec![0x61; 29];

        let post_alonzo = TransactionOutput::PostAlonzo(PostAlonzoTransactionOutput {
            address: address.clone().into(),
            value: Value::Coin(cardano_codec::utils::AnyUInt::U32(1_000_000)),
            datum_option: None,
            script_ref: None,
        });

        let direct = encode_bech32_address(&address, "addr_test").unwrap();
        assert_eq!(post_alonzo.to_bech32_address("addr_test").unwrap(), direct);
    }
}
