//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types re-validate
//! every row, so a corrupt row surfaces as a query error instead of a panic.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use rust_decimal::Decimal;

use crate::domain::{
    Contract, ContractDraft, ContractId, ContractStatus, Job, JobDraft, JobId, JobPayment, Money,
    Profile, ProfileDraft, ProfileId, ProfileRole,
};

use super::schema::{contracts, jobs, profiles};

/// A stored row that does not describe a valid domain value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {table} row {id}: {reason}")]
pub(crate) struct RowConversionError {
    table: &'static str,
    id: i64,
    reason: String,
}

impl RowConversionError {
    fn new(table: &'static str, id: i64, reason: impl ToString) -> Self {
        Self {
            table,
            id,
            reason: reason.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Profiles
// ---------------------------------------------------------------------------

/// Row struct for reading from the profiles table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = profiles)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProfileRow {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub profession: String,
    pub balance: Decimal,
    pub role: String,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = RowConversionError;

    fn try_from(row: ProfileRow) -> Result<Self, Self::Error> {
        let balance =
            Money::new(row.balance).map_err(|err| RowConversionError::new("profiles", row.id, err))?;
        let role: ProfileRole = row
            .role
            .parse()
            .map_err(|err| RowConversionError::new("profiles", row.id, err))?;
        Profile::new(ProfileDraft {
            id: ProfileId::new(row.id),
            first_name: row.first_name,
            last_name: row.last_name,
            profession: row.profession,
            balance,
            role,
        })
        .map_err(|err| RowConversionError::new("profiles", row.id, err))
    }
}

/// Insertable struct for profile records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = profiles)]
pub(crate) struct NewProfileRow<'a> {
    pub id: i64,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub profession: &'a str,
    pub balance: Decimal,
    pub role: &'a str,
}

impl<'a> From<&'a Profile> for NewProfileRow<'a> {
    fn from(profile: &'a Profile) -> Self {
        Self {
            id: profile.id().get(),
            first_name: profile.first_name(),
            last_name: profile.last_name(),
            profession: profile.profession(),
            balance: profile.balance().amount(),
            role: profile.role().as_str(),
        }
    }
}

// ---------------------------------------------------------------------------
// Contracts
// ---------------------------------------------------------------------------

/// Row struct for reading from the contracts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = contracts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ContractRow {
    pub id: i64,
    pub terms: String,
    pub status: String,
    pub client_id: i64,
    pub contractor_id: i64,
}

impl TryFrom<ContractRow> for Contract {
    type Error = RowConversionError;

    fn try_from(row: ContractRow) -> Result<Self, Self::Error> {
        let status: ContractStatus = row
            .status
            .parse()
            .map_err(|err| RowConversionError::new("contracts", row.id, err))?;
        Contract::new(ContractDraft {
            id: ContractId::new(row.id),
            terms: row.terms,
            status,
            client_id: ProfileId::new(row.client_id),
            contractor_id: ProfileId::new(row.contractor_id),
        })
        .map_err(|err| RowConversionError::new("contracts", row.id, err))
    }
}

/// Insertable struct for contract records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = contracts)]
pub(crate) struct NewContractRow<'a> {
    pub id: i64,
    pub terms: &'a str,
    pub status: &'a str,
    pub client_id: i64,
    pub contractor_id: i64,
}

impl<'a> From<&'a Contract> for NewContractRow<'a> {
    fn from(contract: &'a Contract) -> Self {
        Self {
            id: contract.id().get(),
            terms: contract.terms(),
            status: contract.status().as_str(),
            client_id: contract.client_id().get(),
            contractor_id: contract.contractor_id().get(),
        }
    }
}

// ---------------------------------------------------------------------------
// Jobs
// ---------------------------------------------------------------------------

/// Row struct for reading from the jobs table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = jobs)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct JobRow {
    pub id: i64,
    pub description: String,
    pub price: Decimal,
    pub paid: bool,
    pub payment_date: Option<DateTime<Utc>>,
    pub contract_id: i64,
}

impl TryFrom<JobRow> for Job {
    type Error = RowConversionError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        let price = Money::positive(row.price)
            .map_err(|err| RowConversionError::new("jobs", row.id, err))?;
        let payment = JobPayment::from_columns(row.paid, row.payment_date).ok_or_else(|| {
            RowConversionError::new("jobs", row.id, "paid flag and payment date disagree")
        })?;
        Job::new(JobDraft {
            id: JobId::new(row.id),
            description: row.description,
            price,
            payment,
            contract_id: ContractId::new(row.contract_id),
        })
        .map_err(|err| RowConversionError::new("jobs", row.id, err))
    }
}

/// Insertable struct for job records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = jobs)]
pub(crate) struct NewJobRow<'a> {
    pub id: i64,
    pub description: &'a str,
    pub price: Decimal,
    pub paid: bool,
    pub payment_date: Option<DateTime<Utc>>,
    pub contract_id: i64,
}

impl<'a> From<&'a Job> for NewJobRow<'a> {
    fn from(job: &'a Job) -> Self {
        Self {
            id: job.id().get(),
            description: job.description(),
            price: job.price().amount(),
            paid: job.is_paid(),
            payment_date: job.payment().paid_at(),
            contract_id: job.contract_id().get(),
        }
    }
}

/// Convert a batch of rows, failing on the first invalid one.
pub(crate) fn convert_rows<R, T>(rows: Vec<R>) -> Result<Vec<T>, RowConversionError>
where
    T: TryFrom<R, Error = RowConversionError>,
{
    rows.into_iter().map(T::try_from).collect()
}
