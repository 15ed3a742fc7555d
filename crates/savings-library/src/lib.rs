/// Single-owner admin role shared by every savings contract.
/// - `assert_owner` gates admin-only messages.
/// - `transfer_ownership` lets the current owner hand the role over.
pub mod ownership;

pub mod testing;
