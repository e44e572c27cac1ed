use uuid::Uuid;

use optica_domain::role::Role;

use crate::domain::types::Patient;
use crate::error::ApiError;

/// The authenticated caller, resolved from a bearer token. Role comes
/// from the user row at request time, never from the token.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: Uuid,
    pub role: Role,
}

impl Actor {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Admin-only operations. Denials are logged at warn.
pub fn require_admin(actor: &Actor) -> Result<(), ApiError> {
    if actor.is_admin() {
        return Ok(());
    }
    tracing::warn!(actor_id = %actor.id, "admin required");
    Err(ApiError::Forbidden)
}

/// Patient records belong to the user who registered them. Ownership is
/// not role-gated: an admin gets no pass here either.
pub fn ensure_owns_patient(actor: &Actor, patient: &Patient) -> Result<(), ApiError> {
    if patient.user_id == actor.id {
        return Ok(());
    }
    tracing::warn!(actor_id = %actor.id, patient_id = %patient.id, "patient ownership required");
    Err(ApiError::Forbidden)
}

/// An admin cannot delete their own account.
pub fn forbid_self_delete(actor: &Actor, target_user_id: Uuid) -> Result<(), ApiError> {
    if actor.id == target_user_id {
        tracing::warn!(actor_id = %actor.id, "self-delete rejected");
        return Err(ApiError::Forbidden);
    }
    Ok(())
}
