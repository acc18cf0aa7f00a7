use async_trait::async_trait;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Listing, ListingDraft, NewUser, User, UserChanges};

/// Persistence boundary for accounts and listings.
///
/// Implementations enforce username/email uniqueness (`Duplicate`), the
/// owner foreign key on listings (`NotFound` when the owner is gone), the
/// listing version check (`VersionMismatch`), and cascade listing removal
/// when an account is deleted.
#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, new_user: NewUser) -> Result<User, DatabaseError>;

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError>;

    /// Returns `None` when no such user exists.
    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, DatabaseError>;

    /// Removes the user and every listing they own. Returns whether the user existed.
    async fn delete_user(&self, id: Uuid) -> Result<bool, DatabaseError>;

    async fn create_listing(&self, owner: Uuid, draft: ListingDraft) -> Result<Listing, DatabaseError>;

    async fn find_listing(&self, id: Uuid) -> Result<Option<Listing>, DatabaseError>;

    /// Listings owned by `owner`, in insertion order.
    async fn listings_by_owner(&self, owner: Uuid) -> Result<Vec<Listing>, DatabaseError>;

    /// Replace a listing's content if its version still equals `expected_version`.
    async fn update_listing(
        &self,
        id: Uuid,
        expected_version: i64,
        draft: ListingDraft,
    ) -> Result<Listing, DatabaseError>;

    /// Returns whether the listing existed.
    async fn delete_listing(&self, id: Uuid) -> Result<bool, DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;

    /// Release backing resources on shutdown.
    async fn close(&self) {}
}
