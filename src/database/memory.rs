use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::manager::DatabaseError;
use super::models::{Listing, ListingDraft, NewUser, User, UserChanges};
use super::store::Store;

/// In-process store used for local development and tests.
#[derive(Default)]
pub struct MemoryStore {
    state: RwLock<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    users: HashMap<Uuid, User>,
    // Vec keeps insertion order for listings_by_owner
    listings: Vec<Listing>,
}

impl MemoryState {
    fn check_unique(&self, id: Option<Uuid>, username: Option<&str>, email: Option<&str>) -> Result<(), DatabaseError> {
        for user in self.users.values() {
            if Some(user.id) == id {
                continue;
            }
            if username == Some(user.username.as_str()) {
                return Err(DatabaseError::Duplicate("username"));
            }
            if email == Some(user.email.as_str()) {
                return Err(DatabaseError::Duplicate("email"));
            }
        }
        Ok(())
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn user_count(&self) -> usize {
        self.state.read().await.users.len()
    }

    pub async fn listing_count(&self) -> usize {
        self.state.read().await.listings.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, DatabaseError> {
        let mut state = self.state.write().await;
        state.check_unique(None, Some(new_user.username.as_str()), Some(new_user.email.as_str()))?;

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            avatar: new_user.avatar,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, DatabaseError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&id) {
            return Ok(None);
        }
        state.check_unique(Some(id), changes.username.as_deref(), changes.email.as_deref())?;

        let Some(user) = state.users.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply(user, Utc::now());
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut state = self.state.write().await;
        let existed = state.users.remove(&id).is_some();
        if existed {
            state.listings.retain(|l| l.user_ref != id);
        }
        Ok(existed)
    }

    async fn create_listing(&self, owner: Uuid, draft: ListingDraft) -> Result<Listing, DatabaseError> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&owner) {
            return Err(DatabaseError::NotFound("User not found".to_string()));
        }

        let listing = Listing::create(owner, draft, Utc::now());
        state.listings.push(listing.clone());
        Ok(listing)
    }

    async fn find_listing(&self, id: Uuid) -> Result<Option<Listing>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state.listings.iter().find(|l| l.id == id).cloned())
    }

    async fn listings_by_owner(&self, owner: Uuid) -> Result<Vec<Listing>, DatabaseError> {
        let state = self.state.read().await;
        Ok(state
            .listings
            .iter()
            .filter(|l| l.user_ref == owner)
            .cloned()
            .collect())
    }

    async fn update_listing(
        &self,
        id: Uuid,
        expected_version: i64,
        draft: ListingDraft,
    ) -> Result<Listing, DatabaseError> {
        let mut state = self.state.write().await;
        let listing = state
            .listings
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| DatabaseError::NotFound("Listing not found".to_string()))?;

        if listing.version != expected_version {
            return Err(DatabaseError::VersionMismatch {
                expected: expected_version,
                actual: listing.version,
            });
        }

        listing.apply(draft, Utc::now());
        Ok(listing.clone())
    }

    async fn delete_listing(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let mut state = self.state.write().await;
        let before = state.listings.len();
        state.listings.retain(|l| l.id != id);
        Ok(state.listings.len() != before)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
