//! Contracts binding one client to one contractor.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::ProfileId;

/// Stable identifier for a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContractId(i64);

impl ContractId {
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for ContractId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Contract lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    New,
    InProgress,
    Terminated,
}

impl ContractStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::InProgress => "in_progress",
            Self::Terminated => "terminated",
        }
    }

    /// Whether the contract still counts as active for its participants.
    pub fn is_active(self) -> bool {
        self != Self::Terminated
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown contract status: {0}")]
pub struct UnknownContractStatus(pub String);

impl FromStr for ContractStatus {
    type Err = UnknownContractStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "in_progress" => Ok(Self::InProgress),
            "terminated" => Ok(Self::Terminated),
            other => Err(UnknownContractStatus(other.to_owned())),
        }
    }
}

/// Input for [`Contract::new`].
#[derive(Debug, Clone)]
pub struct ContractDraft {
    pub id: ContractId,
    pub terms: String,
    pub status: ContractStatus,
    pub client_id: ProfileId,
    pub contractor_id: ProfileId,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContractValidationError {
    #[error("a contract cannot hire its own client ({0}) as contractor")]
    SameParticipant(ProfileId),
}

/// Agreement between exactly one client and one contractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    id: ContractId,
    terms: String,
    status: ContractStatus,
    client_id: ProfileId,
    contractor_id: ProfileId,
}

impl Contract {
    pub fn new(draft: ContractDraft) -> Result<Self, ContractValidationError> {
        let ContractDraft {
            id,
            terms,
            status,
            client_id,
            contractor_id,
        } = draft;
        if client_id == contractor_id {
            return Err(ContractValidationError::SameParticipant(client_id));
        }
        Ok(Self {
            id,
            terms,
            status,
            client_id,
            contractor_id,
        })
    }

    pub fn id(&self) -> ContractId {
        self.id
    }

    pub fn terms(&self) -> &str {
        &self.terms
    }

    pub fn status(&self) -> ContractStatus {
        self.status
    }

    pub fn client_id(&self) -> ProfileId {
        self.client_id
    }

    pub fn contractor_id(&self) -> ProfileId {
        self.contractor_id
    }

    /// Whether `profile` is either party of this contract.
    pub fn involves(&self, profile: ProfileId) -> bool {
        self.client_id == profile || self.contractor_id == profile
    }
}
