//! Data source subsystem
//!
//! The session core never talks to a bank directly. It consults a
//! [`DataSource`] to learn whether a citizen is known, whether consent will be
//! refused, whether the lookup is slow, and finally to fetch the payload.
//!
//! Components:
//! - `data_source_trait`: the `DataSource` trait the core depends on.
//! - `types`: the `BankData` payload forwarded to clients.
//! - `mock_bank`: in-memory implementation with a fixed table and random fallback.

pub mod data_source_trait;
pub mod mock_bank;
pub mod types;

pub use data_source_trait::DataSource;
pub use mock_bank::MockBankDataSource;
pub use types::BankData;
