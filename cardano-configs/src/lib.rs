//! Protocol parameters, builtin cost-model JSON loading, and slot/time
//! configuration (§4.4, §6.1, §6.2).

pub mod cost_model;
pub mod params;
pub mod slot;

pub use params::ProtocolParams;
pub use slot::SlotConfig;
