//! Protocol parameters (§4.5 step 5, §4.8) relevant to fee computation,
//! execution-budget ceilings, and collateral checks.

use num_rational::Ratio;

/// The subset of Conway-era protocol parameters the builder and the
/// provider abstraction need. Loaded by a `Provider` implementation (e.g.
/// from a node query or, for the emulator, a fixture); this crate only
/// defines the shape and a mainnet-shaped default.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolParams {
    /// `a` in `fee = a·size + b·cpu·price_cpu + c·mem·price_mem`.
    pub min_fee_a: u64,
    /// `b`.
    pub min_fee_b: u64,
    pub price_mem: Ratio<u64>,
    pub price_steps: Ratio<u64>,
    pub max_tx_ex_units: cardano_uplc::machine::cost_model::ExBudget,
    pub max_block_ex_units: cardano_uplc::machine::cost_model::ExBudget,
    pub max_value_size: u32,
    pub max_tx_size: u32,
    pub collateral_percentage: u32,
    pub max_collateral_inputs: u32,
    pub coins_per_utxo_byte: u64,
}

impl ProtocolParams {
    /// A reasonable mainnet-shaped default for fixtures and the in-memory
    /// emulator; a real `Provider` should fetch live values instead.
    pub fn mainnet() -> Self {
        ProtocolParams {
            min_fee_a: 44,
            min_fee_b: 155_381,
            price_mem: Ratio::new(577, 10_000),
            price_steps: Ratio::new(721, 10_000_000),
            max_tx_ex_units: cardano_uplc::machine::cost_model::ExBudget { mem: 14_000_000, cpu: 10_000_000_000 },
            max_block_ex_units: cardano_uplc::machine::cost_model::ExBudget { mem: 62_000_000, cpu: 20_000_000_000 },
            max_value_size: 5_000,
            max_tx_size: 16_384,
            collateral_percentage: 150,
            max_collateral_inputs: 3,
            coins_per_utxo_byte: 4_310,
        }
    }
}
