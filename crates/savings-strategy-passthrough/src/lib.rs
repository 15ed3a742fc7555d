//! Strategy without a backend: tokens stay in the strategy and one share is always one token.

pub mod contract;
pub mod testing;
