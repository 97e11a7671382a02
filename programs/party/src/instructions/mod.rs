pub mod admin;
pub mod create_party;
pub mod join_party;
pub mod leave_party;
pub mod withdraw_fee;

pub use create_party::LaunchReceipt;
