//! Workspace-scoped scalar identifiers and the membership role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for a workspace (the tenant boundary).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkspaceId(Uuid);

/// Unique identifier for a client within a workspace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(Uuid);

/// Unique identifier for any workspace member (advisor, staff, or client).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

macro_rules! uuid_id {
    ($name:ident) => {
        impl $name {
            /// Creates a new random identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the wrapped UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl AsRef<Uuid> for $name {
            fn as_ref(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

pub(crate) use uuid_id;

uuid_id!(WorkspaceId);
uuid_id!(ClientId);
uuid_id!(UserId);

impl ClientId {
    /// Returns the client as a plain workspace member for role lookups.
    #[must_use]
    pub const fn into_user_id(self) -> UserId {
        UserId::from_uuid(self.0)
    }
}

/// Membership role held by a user within one workspace.
///
/// The same closed set doubles as the assignee role copied onto task
/// templates and materialized tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Loan advisor; owns client relationships and workflow definitions.
    Advisor,
    /// Back-office staff; processes verification and paperwork steps.
    Staff,
    /// The borrowing client; completes document-provision steps.
    Client,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Advisor => "advisor",
            Self::Staff => "staff",
            Self::Client => "client",
        }
    }

    /// Returns whether the role may create, edit, and assign workflows.
    #[must_use]
    pub const fn can_manage_workflows(self) -> bool {
        matches!(self, Self::Advisor | Self::Staff)
    }
}

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "advisor" => Ok(Self::Advisor),
            "staff" => Ok(Self::Staff),
            "client" => Ok(Self::Client),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned while parsing membership roles from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown membership role: {0}")]
pub struct ParseRoleError(pub String);
