/// Authorization rules for destructive operations
///
/// Deleting a post or a comment is reserved for the ADMIN role. Authors have
/// no special rights over their own content.
use super::AuthUser;
use crate::error::{AppError, Result};
use crate::models::Role;

pub fn can_delete(actor: &AuthUser) -> bool {
    actor.role == Role::Admin
}

/// Check the delete rule before any lookup or mutation
pub fn ensure_can_delete(actor: &AuthUser) -> Result<()> {
    if can_delete(actor) {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only administrators can delete content".to_string(),
        ))
    }
}
