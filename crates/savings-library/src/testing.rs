#![cfg(not(target_arch = "wasm32"))]
// Only exposed on unit and integration testing, not compiled to Wasm.

mod contract;
mod token;

pub use contract::*;
pub use token::*;
