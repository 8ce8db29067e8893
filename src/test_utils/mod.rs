//! Test utilities: sample payloads shared by unit and integration tests.

pub mod samples;

pub use samples::{
    sample_accounts, sample_event, sample_for, sample_payment, sample_price, sample_robot,
    sample_service, sample_software, sample_transaction, sample_wallet_address,
};
