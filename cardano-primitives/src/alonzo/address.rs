use crate::Error;

use super::TransactionOutput;
use bech32::{self, ToBase32};

pub fn encode_bech32_address(data: &[u8], hrp: &str) -> Result<String, Error> {
    bech32::encode(hrp, data.to_base32(), bech32::Variant::Bech32).map_err(|e| e.into())
}

impl TransactionOutput {
    pub fn to_bech32_address(&self, hrp: &str) -> Result<String, Error> {
        encode_bech32_address(self.address.as_slice(), hrp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bech32_address_roundtrips_hrp() {
        let payload = vec![0x61; 29];
        let encoded = encode_bech32_address(&payload, "addr_test").unwrap();

        assert!(encoded.starts_with("addr_test1"));

        let (hrp, data, _) = bech32::decode(&encoded).unwrap();
        assert_eq!(hrp, "addr_test");
        assert_eq!(bech32::FromBase32::from_base32(&data).unwrap(), payload);
    }
}
