//! Strategy over a per-share-price yield vault.
//!
//! The vault issues its own shares whose price floats with the assets it holds.
//! Vault shares owned by this strategy are the shares the ledger accounts for.

pub mod contract;

/// Interface of the yield vault contract.
pub mod vault;

pub mod testing;
