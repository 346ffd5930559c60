//! Identifier types for the worklist domain.

use crate::workspace::domain::uuid_id;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a materialized client task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientTaskId(Uuid);

uuid_id!(ClientTaskId);
