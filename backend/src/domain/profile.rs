//! Marketplace profiles: balance-bearing accounts held by clients and
//! contractors.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Money;

/// Stable identifier for a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileId(i64);

impl ProfileId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which side of a contract a profile acts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileRole {
    Client,
    Contractor,
}

impl ProfileRole {
    /// Stable storage and wire representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Client => "client",
            Self::Contractor => "contractor",
        }
    }
}

impl fmt::Display for ProfileRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error raised when parsing an unknown role label.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown profile role: {0}")]
pub struct UnknownProfileRole(pub String);

impl FromStr for ProfileRole {
    type Err = UnknownProfileRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "client" => Ok(Self::Client),
            "contractor" => Ok(Self::Contractor),
            other => Err(UnknownProfileRole(other.to_owned())),
        }
    }
}

/// Input for [`Profile::new`].
#[derive(Debug, Clone)]
pub struct ProfileDraft {
    pub id: ProfileId,
    pub first_name: String,
    pub last_name: String,
    pub profession: String,
    pub balance: Money,
    pub role: ProfileRole,
}

/// Validation errors for profile construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileValidationError {
    #[error("first name must not be empty")]
    EmptyFirstName,
    #[error("last name must not be empty")]
    EmptyLastName,
}

/// A marketplace account.
///
/// ## Invariants
/// - Names are non-empty once trimmed.
/// - `balance` is never negative (guaranteed by [`Money`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    id: ProfileId,
    first_name: String,
    last_name: String,
    profession: String,
    balance: Money,
    #[serde(rename = "type")]
    role: ProfileRole,
}

impl Profile {
    pub fn new(draft: ProfileDraft) -> Result<Self, ProfileValidationError> {
        let ProfileDraft {
            id,
            first_name,
            last_name,
            profession,
            balance,
            role,
        } = draft;
        if first_name.trim().is_empty() {
            return Err(ProfileValidationError::EmptyFirstName);
        }
        if last_name.trim().is_empty() {
            return Err(ProfileValidationError::EmptyLastName);
        }
        Ok(Self {
            id,
            first_name,
            last_name,
            profession,
            balance,
            role,
        })
    }

    pub fn id(&self) -> ProfileId {
        self.id
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// First and last name joined by a single space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn profession(&self) -> &str {
        &self.profession
    }

    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn role(&self) -> ProfileRole {
        self.role
    }

    pub fn is_client(&self) -> bool {
        self.role == ProfileRole::Client
    }

    /// Copy of this profile carrying a new balance.
    pub(crate) fn with_balance(&self, balance: Money) -> Self {
        Self {
            balance,
            ..self.clone()
        }
    }
}
