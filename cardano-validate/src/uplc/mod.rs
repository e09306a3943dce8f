pub mod data;
pub mod error;
pub mod machine;
pub mod script_context;
pub mod to_plutus_data;
