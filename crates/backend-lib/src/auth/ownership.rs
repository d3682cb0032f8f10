//! Ownership checks for mutating actions on articles and comments.
use miniblog_common::{Action, PrincipalId, ResourceRef};

use crate::error::AppError;

/// Outcome of an ownership check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Permit,
    Deny,
}

impl Verdict {
    pub fn is_permit(self) -> bool {
        self == Verdict::Permit
    }
}

/// Permit iff a principal is present and is the recorded owner
pub fn authorize(principal: Option<PrincipalId>, owner: PrincipalId) -> Verdict {
    match principal {
        Some(principal) if principal == owner => Verdict::Permit,
        _ => Verdict::Deny,
    }
}

/// Like [`authorize`], but a denial becomes [`AppError::Forbidden`]
pub fn ensure_owner(
    principal: PrincipalId,
    owner: PrincipalId,
    resource: ResourceRef,
    action: Action,
) -> Result<(), AppError> {
    if authorize(Some(principal), owner).is_permit() {
        Ok(())
    } else {
        Err(AppError::Forbidden { action, resource })
    }
}
