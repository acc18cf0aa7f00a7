use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::database::DatabaseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingType {
    Sell,
    Rent,
}

impl ListingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ListingType::Sell => "sell",
            ListingType::Rent => "rent",
        }
    }
}

impl fmt::Display for ListingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ListingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sell" => Ok(ListingType::Sell),
            "rent" => Ok(ListingType::Rent),
            other => Err(format!("unknown listing type '{}'", other)),
        }
    }
}

/// A stored listing. `user_ref` is fixed at creation and never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    pub id: Uuid,
    pub user_ref: Uuid,
    pub name: String,
    pub description: String,
    pub address: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub regular_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_price: Decimal,
    pub bathrooms: i32,
    pub bedrooms: i32,
    pub furnished: bool,
    pub parking: bool,
    pub offer: bool,
    #[serde(rename = "type")]
    pub listing_type: ListingType,
    pub image_urls: Vec<String>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The owner-independent content of a listing, as validated from a request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingDraft {
    pub name: String,
    pub description: String,
    pub address: String,
    pub regular_price: Decimal,
    pub discount_price: Decimal,
    pub bathrooms: i32,
    pub bedrooms: i32,
    pub furnished: bool,
    pub parking: bool,
    pub offer: bool,
    pub listing_type: ListingType,
    pub image_urls: Vec<String>,
}

impl Listing {
    pub fn create(owner: Uuid, draft: ListingDraft, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_ref: owner,
            name: draft.name,
            description: draft.description,
            address: draft.address,
            regular_price: draft.regular_price,
            discount_price: draft.discount_price,
            bathrooms: draft.bathrooms,
            bedrooms: draft.bedrooms,
            furnished: draft.furnished,
            parking: draft.parking,
            offer: draft.offer,
            listing_type: draft.listing_type,
            image_urls: draft.image_urls,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn draft(&self) -> ListingDraft {
        ListingDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            address: self.address.clone(),
            regular_price: self.regular_price,
            discount_price: self.discount_price,
            bathrooms: self.bathrooms,
            bedrooms: self.bedrooms,
            furnished: self.furnished,
            parking: self.parking,
            offer: self.offer,
            listing_type: self.listing_type,
            image_urls: self.image_urls.clone(),
        }
    }

    /// Replace the content and bump the version. Identity and owner stay.
    pub fn apply(&mut self, draft: ListingDraft, now: DateTime<Utc>) {
        self.name = draft.name;
        self.description = draft.description;
        self.address = draft.address;
        self.regular_price = draft.regular_price;
        self.discount_price = draft.discount_price;
        self.bathrooms = draft.bathrooms;
        self.bedrooms = draft.bedrooms;
        self.furnished = draft.furnished;
        self.parking = draft.parking;
        self.offer = draft.offer;
        self.listing_type = draft.listing_type;
        self.image_urls = draft.image_urls;
        self.version += 1;
        self.updated_at = now;
    }
}

/// Row shape of the `listings` table.
#[derive(Debug, FromRow)]
pub struct ListingRow {
    pub id: Uuid,
    pub user_ref: Uuid,
    pub name: String,
    pub description: String,
    pub address: String,
    pub regular_price: Decimal,
    pub discount_price: Decimal,
    pub bathrooms: i32,
    pub bedrooms: i32,
    pub furnished: bool,
    pub parking: bool,
    pub offer: bool,
    pub listing_type: String,
    pub image_urls: Vec<String>,
    pub version: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ListingRow> for Listing {
    type Error = DatabaseError;

    fn try_from(row: ListingRow) -> Result<Self, Self::Error> {
        let listing_type = row
            .listing_type
            .parse()
            .map_err(|e| DatabaseError::Corrupt(format!("listing {}: {}", row.id, e)))?;

        Ok(Self {
            id: row.id,
            user_ref: row.user_ref,
            name: row.name,
            description: row.description,
            address: row.address,
            regular_price: row.regular_price,
            discount_price: row.discount_price,
            bathrooms: row.bathrooms,
            bedrooms: row.bedrooms,
            furnished: row.furnished,
            parking: row.parking,
            offer: row.offer,
            listing_type,
            image_urls: row.image_urls,
            version: row.version,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> ListingDraft {
        ListingDraft {
            name: "Sunny two bedroom flat".to_string(),
            description: "Close to the park".to_string(),
            address: "1 Main Street".to_string(),
            regular_price: Decimal::from(1200),
            discount_price: Decimal::ZERO,
            bathrooms: 1,
            bedrooms: 2,
            furnished: false,
            parking: true,
            offer: false,
            listing_type: ListingType::Rent,
            image_urls: vec!["https://img.example.com/1.jpg".to_string()],
        }
    }

    #[test]
    fn listing_serializes_wire_names() {
        let listing = Listing::create(Uuid::new_v4(), draft(), Utc::now());
        let value = serde_json::to_value(&listing).unwrap();
        assert_eq!(value["type"], "rent");
        assert_eq!(value["regularPrice"], 1200.0);
        assert_eq!(value["userRef"], listing.user_ref.to_string());
        assert_eq!(value["imageUrls"][0], "https://img.example.com/1.jpg");
    }

    #[test]
    fn apply_keeps_owner_and_bumps_version() {
        let owner = Uuid::new_v4();
        let mut listing = Listing::create(owner, draft(), Utc::now());
        let mut changed = draft();
        changed.listing_type = ListingType::Sell;

        listing.apply(changed, Utc::now());

        assert_eq!(listing.user_ref, owner);
        assert_eq!(listing.version, 2);
        assert_eq!(listing.listing_type, ListingType::Sell);
    }

    #[test]
    fn unknown_stored_type_is_corrupt() {
        let now = Utc::now();
        let row = ListingRow {
            id: Uuid::new_v4(),
            user_ref: Uuid::new_v4(),
            name: "n".into(),
            description: "d".into(),
            address: "a".into(),
            regular_price: Decimal::ONE,
            discount_price: Decimal::ZERO,
            bathrooms: 1,
            bedrooms: 1,
            furnished: false,
            parking: false,
            offer: false,
            listing_type: "lease".into(),
            image_urls: vec![],
            version: 1,
            created_at: now,
            updated_at: now,
        };
        assert!(matches!(Listing::try_from(row), Err(DatabaseError::Corrupt(_))));
    }
}
