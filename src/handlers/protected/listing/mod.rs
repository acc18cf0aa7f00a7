// handlers/protected/listing/mod.rs - Listing mutations, owner only
//
// The owner of a listing is always the authenticated caller at creation time.
// Request bodies have no owner field; a client-sent `userRef` is ignored.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::database::models::{ListingDraft, ListingType};

pub mod create; // POST /api/listing/create
pub mod delete; // DELETE /api/listing/delete/:id
pub mod update; // POST /api/listing/update/:id

pub use create::listing_create;
pub use delete::listing_delete;
pub use update::listing_update;

/// Full listing payload for creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    pub name: String,
    pub description: String,
    pub address: String,
    pub regular_price: Decimal,
    #[serde(default)]
    pub discount_price: Decimal,
    pub bathrooms: i32,
    pub bedrooms: i32,
    #[serde(default)]
    pub furnished: bool,
    #[serde(default)]
    pub parking: bool,
    #[serde(default)]
    pub offer: bool,
    #[serde(rename = "type")]
    pub listing_type: ListingType,
    pub image_urls: Vec<String>,
}

impl CreateListingRequest {
    pub fn into_draft(self) -> ListingDraft {
        ListingDraft {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            address: self.address.trim().to_string(),
            regular_price: self.regular_price,
            discount_price: self.discount_price,
            bathrooms: self.bathrooms,
            bedrooms: self.bedrooms,
            furnished: self.furnished,
            parking: self.parking,
            offer: self.offer,
            listing_type: self.listing_type,
            image_urls: self.image_urls.into_iter().map(|url| url.trim().to_string()).collect(),
        }
    }
}

/// Partial listing update. Merged over the stored listing, then the result is
/// validated as a whole. `expected_version` opts into optimistic concurrency.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub regular_price: Option<Decimal>,
    pub discount_price: Option<Decimal>,
    pub bathrooms: Option<i32>,
    pub bedrooms: Option<i32>,
    pub furnished: Option<bool>,
    pub parking: Option<bool>,
    pub offer: Option<bool>,
    #[serde(rename = "type")]
    pub listing_type: Option<ListingType>,
    pub image_urls: Option<Vec<String>>,
    pub expected_version: Option<i64>,
}

impl ListingPatch {
    pub fn merge(self, mut base: ListingDraft) -> ListingDraft {
        if let Some(name) = self.name {
            base.name = name.trim().to_string();
        }
        if let Some(description) = self.description {
            base.description = description.trim().to_string();
        }
        if let Some(address) = self.address {
            base.address = address.trim().to_string();
        }
        if let Some(regular_price) = self.regular_price {
            base.regular_price = regular_price;
        }
        if let Some(discount_price) = self.discount_price {
            base.discount_price = discount_price;
        }
        if let Some(bathrooms) = self.bathrooms {
            base.bathrooms = bathrooms;
        }
        if let Some(bedrooms) = self.bedrooms {
            base.bedrooms = bedrooms;
        }
        if let Some(furnished) = self.furnished {
            base.furnished = furnished;
        }
        if let Some(parking) = self.parking {
            base.parking = parking;
        }
        if let Some(offer) = self.offer {
            base.offer = offer;
        }
        if let Some(listing_type) = self.listing_type {
            base.listing_type = listing_type;
        }
        if let Some(image_urls) = self.image_urls {
            base.image_urls = image_urls.into_iter().map(|url| url.trim().to_string()).collect();
        }
        base
    }
}
