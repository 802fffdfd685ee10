pub mod memory;
pub mod store;
pub mod valkey;

pub use memory::InMemoryOtpStore;
pub use store::{OtpError, OtpStore, generate_otp, hash_otp};
pub use valkey::ValkeyOtpStore;
