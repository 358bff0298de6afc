//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. When a
//! migration changes the schema, regenerate them with `diesel print-schema`
//! or update them by hand.

diesel::table! {
    /// Marketplace accounts, both clients and contractors.
    profiles (id) {
        /// Primary key.
        id -> Int8,
        first_name -> Varchar,
        last_name -> Varchar,
        profession -> Varchar,
        /// Non-negative balance with two fractional digits.
        balance -> Numeric,
        /// `client` or `contractor`.
        role -> Varchar,
    }
}

diesel::table! {
    /// Agreements between one client and one contractor.
    contracts (id) {
        id -> Int8,
        terms -> Text,
        /// `new`, `in_progress` or `terminated`.
        status -> Varchar,
        client_id -> Int8,
        contractor_id -> Int8,
    }
}

diesel::table! {
    /// Priced units of work under a contract.
    jobs (id) {
        id -> Int8,
        description -> Text,
        /// Strictly positive price with two fractional digits.
        price -> Numeric,
        paid -> Bool,
        /// Set exactly when `paid` is true.
        payment_date -> Nullable<Timestamptz>,
        contract_id -> Int8,
    }
}

diesel::joinable!(jobs -> contracts (contract_id));

diesel::allow_tables_to_appear_in_same_query!(profiles, contracts, jobs);
