//! In-memory membership directory for tests and embedded use.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::workspace::{
    domain::{Role, UserId, WorkspaceId},
    ports::{MembershipDirectory, MembershipError, MembershipResult},
};

/// Thread-safe in-memory membership directory.
///
/// Seeded explicitly via [`InMemoryMembershipDirectory::grant`]; a user with
/// no grant is treated as a non-member.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMembershipDirectory {
    state: Arc<RwLock<HashMap<(WorkspaceId, UserId), Role>>>,
}

impl InMemoryMembershipDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants a role to a user within a workspace, replacing any prior grant.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::Lookup`] when the directory state is
    /// poisoned.
    pub fn grant(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
        role: Role,
    ) -> MembershipResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| MembershipError::lookup(std::io::Error::other(err.to_string())))?;
        state.insert((workspace_id, user_id), role);
        Ok(())
    }
}

#[async_trait]
impl MembershipDirectory for InMemoryMembershipDirectory {
    async fn role_of(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> MembershipResult<Option<Role>> {
        let state = self
            .state
            .read()
            .map_err(|err| MembershipError::lookup(std::io::Error::other(err.to_string())))?;
        Ok(state.get(&(workspace_id, user_id)).copied())
    }
}
