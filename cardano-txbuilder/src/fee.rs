//! Linear fee computation: `fee = a*size + b + cpu*price_cpu + mem*price_mem`,
//! where `a`/`b` and the two execution-unit prices come from protocol
//! parameters and `size` is the length of the transaction's CBOR encoding.

use cardano_configs::ProtocolParams;
use cardano_uplc::machine::cost_model::ExBudget;
use num_rational::Ratio;

use crate::transaction::model::BuiltTransaction;

pub struct LinearFee<'a> {
    params: &'a ProtocolParams,
}

impl<'a> LinearFee<'a> {
    pub fn new(params: &'a ProtocolParams) -> Self {
        Self { params }
    }

    /// Fee for a built transaction with no script execution, i.e. the
    /// `a*size + b` component alone.
    pub fn min_fee(&self, tx: &BuiltTransaction) -> u64 {
        self.params.min_fee_a * tx.tx_bytes.0.len() as u64 + self.params.min_fee_b
    }

    /// Fee including the cost of redeemer script execution, given the total
    /// execution units consumed across every redeemer in the transaction.
    pub fn calculate(&self, tx: &BuiltTransaction, ex_units: ExBudget) -> u64 {
        let script_fee = ratio_to_u64_ceil(self.params.price_mem * ex_units.mem.max(0) as u64)
            + ratio_to_u64_ceil(self.params.price_steps * ex_units.cpu.max(0) as u64);

        self.min_fee(tx) + script_fee
    }
}

fn ratio_to_u64_ceil(r: Ratio<u64>) -> u64 {
    r.numer().div_ceil(*r.denom())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::{model::BuilderEra, Bytes, Bytes32, TransactionStatus};

    fn built_tx(size: usize) -> BuiltTransaction {
        BuiltTransaction {
            version: "v1".into(),
            era: BuilderEra::Conway,
            status: TransactionStatus::Built,
            tx_hash: Bytes32([0; 32]),
            tx_bytes: Bytes(vec![0; size]),
            signatures: None,
        }
    }

    #[test]
    fn min_fee_matches_linear_formula() {
        let params = ProtocolParams::mainnet();
        let fee = LinearFee::new(&params);
        let tx = built_tx(250);

        assert_eq!(fee.min_fee(&tx), params.min_fee_a * 250 + params.min_fee_b);
    }

    #[test]
    fn script_execution_increases_fee() {
        let params = ProtocolParams::mainnet();
        let fee = LinearFee::new(&params);
        let tx = built_tx(250);

        let without_scripts = fee.calculate(&tx, ExBudget { mem: 0, cpu: 0 });
        let with_scripts = fee.calculate(
            &tx,
            ExBudget {
                mem: 1_000_000,
                cpu: 500_000_000,
            },
        );

        assert!(with_scripts > without_scripts);
    }
}
