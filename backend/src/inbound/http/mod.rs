//! HTTP inbound adapter exposing REST endpoints.

pub mod admin;
pub mod balances;
pub mod caller;
pub mod contracts;
pub mod error;
pub mod health;
pub mod jobs;
pub mod profiles;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
