//! Priced units of work performed under a contract.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ContractId, Money};

/// Stable identifier for a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(i64);

impl JobId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payment state of a job. A paid job always carries its payment time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPayment {
    Unpaid,
    Paid { paid_at: DateTime<Utc> },
}

impl JobPayment {
    /// Rebuild the state from the stored flag and timestamp columns.
    pub fn from_columns(paid: bool, payment_date: Option<DateTime<Utc>>) -> Option<Self> {
        match (paid, payment_date) {
            (false, None) => Some(Self::Unpaid),
            (true, Some(paid_at)) => Some(Self::Paid { paid_at }),
            _ => None,
        }
    }

    pub fn is_paid(self) -> bool {
        matches!(self, Self::Paid { .. })
    }

    pub fn paid_at(self) -> Option<DateTime<Utc>> {
        match self {
            Self::Unpaid => None,
            Self::Paid { paid_at } => Some(paid_at),
        }
    }
}

/// Input for [`Job::new`].
#[derive(Debug, Clone)]
pub struct JobDraft {
    pub id: JobId,
    pub description: String,
    pub price: Money,
    pub payment: JobPayment,
    pub contract_id: ContractId,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobValidationError {
    #[error("job description must not be empty")]
    EmptyDescription,
    #[error("job price must be greater than zero")]
    NonPositivePrice,
}

/// A job priced in [`Money`].
///
/// ## Invariants
/// - `price` is strictly positive.
/// - Once paid, the payment timestamp never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(try_from = "JobDto", into = "JobDto")]
pub struct Job {
    id: JobId,
    description: String,
    price: Money,
    payment: JobPayment,
    contract_id: ContractId,
}

impl Job {
    pub fn new(draft: JobDraft) -> Result<Self, JobValidationError> {
        let JobDraft {
            id,
            description,
            price,
            payment,
            contract_id,
        } = draft;
        if description.trim().is_empty() {
            return Err(JobValidationError::EmptyDescription);
        }
        if price.is_zero() {
            return Err(JobValidationError::NonPositivePrice);
        }
        Ok(Self {
            id,
            description,
            price,
            payment,
            contract_id,
        })
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn payment(&self) -> JobPayment {
        self.payment
    }

    pub fn is_paid(&self) -> bool {
        self.payment.is_paid()
    }

    pub fn contract_id(&self) -> ContractId {
        self.contract_id
    }

    /// Copy of this job marked as paid at `paid_at`.
    pub(crate) fn paid(&self, paid_at: DateTime<Utc>) -> Self {
        Self {
            payment: JobPayment::Paid { paid_at },
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct JobDto {
    id: JobId,
    description: String,
    price: Money,
    paid: bool,
    payment_date: Option<DateTime<Utc>>,
    contract_id: ContractId,
}

impl From<Job> for JobDto {
    fn from(value: Job) -> Self {
        Self {
            id: value.id,
            description: value.description,
            price: value.price,
            paid: value.payment.is_paid(),
            payment_date: value.payment.paid_at(),
            contract_id: value.contract_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobDtoError {
    #[error(transparent)]
    Invalid(#[from] JobValidationError),
    #[error("paid flag and payment date disagree")]
    InconsistentPayment,
}

impl TryFrom<JobDto> for Job {
    type Error = JobDtoError;

    fn try_from(value: JobDto) -> Result<Self, Self::Error> {
        let payment = JobPayment::from_columns(value.paid, value.payment_date)
            .ok_or(JobDtoError::InconsistentPayment)?;
        Ok(Job::new(JobDraft {
            id: value.id,
            description: value.description,
            price: value.price,
            payment,
            contract_id: value.contract_id,
        })?)
    }
}
