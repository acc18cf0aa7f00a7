use uuid::Uuid;

use crate::error::ApiError;
use crate::middleware::AuthUser;

/// What the caller is trying to touch, used for the Forbidden message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Account,
    Listings,
    Listing,
}

impl Resource {
    fn forbidden_message(self) -> &'static str {
        match self {
            Resource::Account => "You can only modify your own account",
            Resource::Listings => "You can only view your own listings",
            Resource::Listing => "You can only modify your own listings",
        }
    }
}

/// Require that the authenticated caller is the owner of a resource.
pub fn ensure_owner(caller: &AuthUser, owner_id: Uuid, resource: Resource) -> Result<(), ApiError> {
    if caller.id == owner_id {
        return Ok(());
    }

    tracing::warn!(
        "Ownership check failed: user {} attempted {:?} owned by {}",
        caller.id,
        resource,
        owner_id
    );
    Err(ApiError::forbidden(resource.forbidden_message()))
}
