pub mod mocks;
pub mod setup;

// Re-export main utilities for use by test files
#[allow(unused_imports)]
pub use mocks::FlakyLocalStore;
#[allow(unused_imports)]
pub use setup::{draft, TestSetup, TestSetupBuilder, Tiers, PASSPHRASE};
