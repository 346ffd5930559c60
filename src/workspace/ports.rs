//! Membership directory port for external role resolution.

use crate::workspace::domain::{Role, UserId, WorkspaceId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for membership directory lookups.
pub type MembershipResult<T> = Result<T, MembershipError>;

/// Read-only view onto the external membership/role service.
///
/// The core never mutates memberships; it only asks which role, if any, a
/// user holds in a workspace.
#[async_trait]
pub trait MembershipDirectory: Send + Sync {
    /// Resolves the role a user holds in the given workspace.
    ///
    /// Returns `None` when the user is not a member of the workspace.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::Lookup`] when the directory backend fails.
    async fn role_of(
        &self,
        workspace_id: WorkspaceId,
        user_id: UserId,
    ) -> MembershipResult<Option<Role>>;
}

/// Errors returned by membership directory implementations.
#[derive(Debug, Clone, Error)]
pub enum MembershipError {
    /// Directory-backend failure.
    #[error("membership lookup error: {0}")]
    Lookup(Arc<dyn std::error::Error + Send + Sync>),
}

impl MembershipError {
    /// Wraps a directory-backend error.
    pub fn lookup(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Lookup(Arc::new(err))
    }
}
