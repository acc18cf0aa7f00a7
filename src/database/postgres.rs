use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::manager::{map_constraint_violation, DatabaseError};
use super::models::{Listing, ListingDraft, ListingRow, NewUser, User, UserChanges};
use super::store::Store;

const USER_COLUMNS: &str = "id, username, email, password_hash, avatar, created_at, updated_at";

const LISTING_COLUMNS: &str = "id, user_ref, name, description, address, regular_price, discount_price, \
     bathrooms, bedrooms, furnished, parking, offer, listing_type, image_urls, version, \
     created_at, updated_at";

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id UUID PRIMARY KEY,
        username TEXT NOT NULL,
        email TEXT NOT NULL,
        password_hash TEXT NOT NULL,
        avatar TEXT NOT NULL,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL,
        CONSTRAINT users_username_key UNIQUE (username),
        CONSTRAINT users_email_key UNIQUE (email)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS listings (
        id UUID PRIMARY KEY,
        seq BIGSERIAL NOT NULL,
        user_ref UUID NOT NULL REFERENCES users (id) ON DELETE CASCADE,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        address TEXT NOT NULL,
        regular_price NUMERIC NOT NULL,
        discount_price NUMERIC NOT NULL,
        bathrooms INTEGER NOT NULL,
        bedrooms INTEGER NOT NULL,
        furnished BOOLEAN NOT NULL,
        parking BOOLEAN NOT NULL,
        offer BOOLEAN NOT NULL,
        listing_type TEXT NOT NULL CHECK (listing_type IN ('sell', 'rent')),
        image_urls TEXT[] NOT NULL,
        version BIGINT NOT NULL DEFAULT 1,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS listings_user_ref_seq_idx ON listings (user_ref, seq)",
];

/// Postgres-backed store. Owns the process-wide pool.
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create tables and indexes if they are missing.
    pub async fn ensure_schema(&self) -> Result<(), DatabaseError> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Database schema ready");
        Ok(())
    }

    async fn find_user_where(&self, column: &str, value: &str) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, new_user: NewUser) -> Result<User, DatabaseError> {
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO users ({}) VALUES ($1, $2, $3, $4, $5, $6, $6) RETURNING {}",
            USER_COLUMNS, USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(Uuid::new_v4())
            .bind(&new_user.username)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .bind(&new_user.avatar)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(map_constraint_violation)
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, DatabaseError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        self.find_user_where("email", email).await
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        self.find_user_where("username", username).await
    }

    async fn update_user(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, DatabaseError> {
        let sql = format!(
            "UPDATE users SET
                username = COALESCE($2, username),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                avatar = COALESCE($5, avatar),
                updated_at = $6
             WHERE id = $1
             RETURNING {}",
            USER_COLUMNS
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(changes.username)
            .bind(changes.email)
            .bind(changes.password_hash)
            .bind(changes.avatar)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_constraint_violation)
    }

    async fn delete_user(&self, id: Uuid) -> Result<bool, DatabaseError> {
        // listings go with it via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_listing(&self, owner: Uuid, draft: ListingDraft) -> Result<Listing, DatabaseError> {
        let listing = Listing::create(owner, draft, Utc::now());
        let sql = format!(
            "INSERT INTO listings ({})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17)
             RETURNING {}",
            LISTING_COLUMNS, LISTING_COLUMNS
        );

        let row = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(listing.id)
            .bind(listing.user_ref)
            .bind(&listing.name)
            .bind(&listing.description)
            .bind(&listing.address)
            .bind(listing.regular_price)
            .bind(listing.discount_price)
            .bind(listing.bathrooms)
            .bind(listing.bedrooms)
            .bind(listing.furnished)
            .bind(listing.parking)
            .bind(listing.offer)
            .bind(listing.listing_type.as_str())
            .bind(&listing.image_urls)
            .bind(listing.version)
            .bind(listing.created_at)
            .bind(listing.updated_at)
            .fetch_one(&self.pool)
            .await
            .map_err(map_constraint_violation)?;

        Listing::try_from(row)
    }

    async fn find_listing(&self, id: Uuid) -> Result<Option<Listing>, DatabaseError> {
        let sql = format!("SELECT {} FROM listings WHERE id = $1", LISTING_COLUMNS);
        sqlx::query_as::<_, ListingRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(Listing::try_from)
            .transpose()
    }

    async fn listings_by_owner(&self, owner: Uuid) -> Result<Vec<Listing>, DatabaseError> {
        let sql = format!(
            "SELECT {} FROM listings WHERE user_ref = $1 ORDER BY seq",
            LISTING_COLUMNS
        );
        sqlx::query_as::<_, ListingRow>(&sql)
            .bind(owner)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Listing::try_from)
            .collect()
    }

    async fn update_listing(
        &self,
        id: Uuid,
        expected_version: i64,
        draft: ListingDraft,
    ) -> Result<Listing, DatabaseError> {
        let sql = format!(
            "UPDATE listings SET
                name = $3, description = $4, address = $5,
                regular_price = $6, discount_price = $7,
                bathrooms = $8, bedrooms = $9,
                furnished = $10, parking = $11, offer = $12,
                listing_type = $13, image_urls = $14,
                version = version + 1, updated_at = $15
             WHERE id = $1 AND version = $2
             RETURNING {}",
            LISTING_COLUMNS
        );

        let row = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(id)
            .bind(expected_version)
            .bind(&draft.name)
            .bind(&draft.description)
            .bind(&draft.address)
            .bind(draft.regular_price)
            .bind(draft.discount_price)
            .bind(draft.bathrooms)
            .bind(draft.bedrooms)
            .bind(draft.furnished)
            .bind(draft.parking)
            .bind(draft.offer)
            .bind(draft.listing_type.as_str())
            .bind(&draft.image_urls)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?;

        if let Some(row) = row {
            return Listing::try_from(row);
        }

        // Nothing matched: either the listing is gone or someone bumped the version
        let current: Option<i64> = sqlx::query_scalar("SELECT version FROM listings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match current {
            Some(actual) => Err(DatabaseError::VersionMismatch {
                expected: expected_version,
                actual,
            }),
            None => Err(DatabaseError::NotFound("Listing not found".to_string())),
        }
    }

    async fn delete_listing(&self, id: Uuid) -> Result<bool, DatabaseError> {
        let result = sqlx::query("DELETE FROM listings WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
        info!("Closed database pool");
    }
}
