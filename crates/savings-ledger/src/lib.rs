pub mod contract;
pub mod error;
pub mod msg;
pub mod testing;

mod state;
mod strategy;

pub use crate::error::ContractError;
