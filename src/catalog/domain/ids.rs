//! Identifier types for the catalog domain.

use crate::workspace::domain::uuid_id;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a loan type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanTypeId(Uuid);

/// Unique identifier for a task template definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(Uuid);

uuid_id!(LoanTypeId);
uuid_id!(TemplateId);
