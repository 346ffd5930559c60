//! Identifier types for the assignment domain.

use crate::workspace::domain::uuid_id;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a client loan type assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientLoanTypeId(Uuid);

uuid_id!(ClientLoanTypeId);
