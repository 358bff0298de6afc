//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL-backed repositories and ledger using Diesel.
//! - **memory**: a mutex-guarded store used when no database is configured
//!   and by the HTTP test-suite.
//!
//! Adapters translate between domain types and storage representations and
//! evaluate payment rules only through [`crate::domain::payments`].

pub mod memory;
pub mod persistence;
