//! Identity domain models and the request-scoped context.

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// What a signed-in user may do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    /// May write movements and trades, register funds and switch funds.
    Admin,
    /// Pinned to the assigned fund, read access only.
    ReadOnly,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::ReadOnly => "readOnly",
        }
    }
}

/// Identity returned by an identity provider after a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdentity {
    pub username: String,
    pub role: Role,
    pub assigned_fund: String,
}

/// Per-request context threaded through every service call.
///
/// Replaces any notion of a global "current user" or "current fund": callers
/// build one from the authenticated identity and pass it explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContext {
    pub username: String,
    pub role: Role,
    pub assigned_fund: String,
    pub active_fund: String,
}

impl RequestContext {
    /// Starts a context on the user's assigned fund.
    pub fn from_identity(identity: UserIdentity) -> Self {
        Self {
            active_fund: identity.assigned_fund.clone(),
            username: identity.username,
            role: identity.role,
            assigned_fund: identity.assigned_fund,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fails unless the caller is an administrator.
    pub fn require_admin(&self, action: &str) -> Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(Error::PermissionDenied(format!(
                "User '{}' is read-only and cannot {}",
                self.username, action
            )))
        }
    }

    /// Administrators may read any fund; read-only users only their assigned one.
    pub fn authorize_read(&self, fund: &str) -> Result<()> {
        if self.is_admin() || self.assigned_fund == fund {
            Ok(())
        } else {
            Err(Error::PermissionDenied(format!(
                "User '{}' has no access to fund '{}'",
                self.username, fund
            )))
        }
    }

    /// Only administrators write movements and trades.
    pub fn authorize_write(&self, fund: &str) -> Result<()> {
        self.require_admin(&format!("modify fund '{}'", fund))
    }

    /// Returns a context scoped to another fund. Read-only users stay pinned.
    pub fn switch_fund(&self, fund: &str) -> Result<Self> {
        self.require_admin("switch funds")?;
        Ok(Self {
            active_fund: fund.to_string(),
            ..self.clone()
        })
    }
}
