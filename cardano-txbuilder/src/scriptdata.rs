use cardano_codec::minicbor::{self, Encode};
use cardano_primitives::conway::{CostModel, PlutusData, Redeemers};
use serde::{Deserialize, Serialize};

pub type PlutusVersion = u8;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LanguageView(pub PlutusVersion, pub CostModel);

impl<C> Encode<C> for LanguageView {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        ctx: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        match self.0 {
            0 => {
                let mut inner = vec![];
                let mut sub = minicbor::Encoder::new(&mut inner);

                sub.begin_array().unwrap();
                for v in self.1.iter() {
                    sub.encode_with(v, ctx).unwrap();
                }
                sub.end().unwrap();

                e.map(1)?;
                e.bytes(&minicbor::to_vec(0).unwrap())?;
                e.bytes(&inner)?;
                Ok(())
            }
            _ => {
                e.map(1)?;
                e.encode(self.0)?;
                e.encode(&self.1)?;
                Ok(())
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScriptData {
    pub redeemers: Redeemers,
    pub datums: Option<Vec<PlutusData>>,
    pub language_view: LanguageView,
}

impl ScriptData {
    pub fn hash(&self) -> cardano_crypto::hash::Hash<32> {
        let mut buf = vec![];

        minicbor::encode(&self.redeemers, &mut buf).unwrap(); // infallible

        if let Some(datums) = &self.datums {
            minicbor::encode(datums, &mut buf).unwrap(); // infallible
        }

        minicbor::encode(&self.language_view, &mut buf).unwrap(); // infallible

        cardano_crypto::hash::Hasher::<256>::hash(&buf)
    }
}

#[cfg(test)]
mod tests {
    use cardano_primitives::conway::{Redeemer, RedeemerTag};

    use super::*;

    fn sample_redeemers() -> Redeemers {
        Redeemers::List(vec![Redeemer {
            tag: RedeemerTag::Spend,
            index: 0,
            data: PlutusData::Array(vec![]),
            ex_units: cardano_primitives::ExUnits { mem: 0, steps: 0 },
        }])
    }

    #[test]
    fn hash_changes_with_language_view() {
        let redeemers = sample_redeemers();

        let v1 = ScriptData {
            redeemers: redeemers.clone(),
            datums: None,
            language_view: LanguageView(0, vec![1, 2, 3]),
        };

        let v2 = ScriptData {
            redeemers,
            datums: None,
            language_view: LanguageView(1, vec![1, 2, 3]),
        };

        assert_ne!(v1.hash(), v2.hash());
    }

    #[test]
    fn hash_changes_with_datums() {
        let redeemers = sample_redeemers();
        let language_view = LanguageView(1, vec![1, 2, 3]);

        let without_datums = ScriptData {
            redeemers: redeemers.clone(),
            datums: None,
            language_view: language_view.clone(),
        };

        let with_datums = ScriptData {
            redeemers,
            datums: Some(vec![PlutusData::Array(vec![])]),
            language_view,
        };

        assert_ne!(without_datums.hash(), with_datums.hash());
    }

    #[test]
    fn hash_is_deterministic() {
        let redeemers = sample_redeemers();
        let language_view = LanguageView(1, vec![1, 2, 3]);

        let a = ScriptData {
            redeemers: redeemers.clone(),
            datums: None,
            language_view: language_view.clone(),
        };

        let b = ScriptData {
            redeemers,
            datums: None,
            language_view,
        };

        assert_eq!(a.hash(), b.hash());
    }
}
