mod emulator;
mod error;
mod provider;

pub use emulator::{Emulator, SharedEmulator};
pub use error::Error;
pub use provider::{Provider, Utxo};
