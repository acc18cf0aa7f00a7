use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::database::models::ListingDraft;
use crate::error::ApiError;

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const LISTING_NAME_CHARS: (usize, usize) = (10, 62);
pub const ROOM_COUNT_RANGE: (i32, i32) = (1, 10);
pub const MAX_IMAGES: usize = 6;

/// Collects per-field problems so a client sees every issue at once.
#[derive(Debug, Default)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn check(&mut self, field: &str, result: Result<(), String>) {
        if let Err(problem) = result {
            self.0.entry(field.to_string()).or_insert(problem);
        }
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error("Invalid request payload", Some(self.0)))
        }
    }
}

pub fn validate_username_format(username: &str) -> Result<(), String> {
    if username.is_empty() {
        return Err("Username cannot be empty".to_string());
    }

    let length = username.chars().count();
    if length < 3 {
        return Err("Username must be at least 3 characters".to_string());
    }

    if length > 50 {
        return Err("Username must be less than 50 characters".to_string());
    }

    // Allow alphanumeric, underscore, hyphen
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err("Username can only contain letters, numbers, underscore, and hyphen".to_string());
    }

    // Must start with alphanumeric
    if !username.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        return Err("Username must start with a letter or number".to_string());
    }

    Ok(())
}

pub fn validate_email_format(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email cannot be empty".to_string());
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err("Invalid email format".to_string());
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err("Invalid email format".to_string());
    }

    if domain.starts_with('.') || domain.ends_with('.') || email.chars().any(char::is_whitespace) {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH));
    }
    Ok(())
}

/// Image and avatar URLs come from the external media host and must be absolute http(s).
pub fn validate_http_url(raw: &str) -> Result<(), String> {
    let url = url::Url::parse(raw).map_err(|_| format!("'{}' is not a valid URL", raw))?;
    match url.scheme() {
        "http" | "https" if url.host().is_some() => Ok(()),
        _ => Err(format!("'{}' must be an http or https URL", raw)),
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Server-side listing rules, mirroring the constraints of the listing form.
pub fn validate_listing(draft: &ListingDraft) -> Result<(), ApiError> {
    let mut errors = FieldErrors::new();

    let (min_name, max_name) = LISTING_NAME_CHARS;
    let name_length = draft.name.trim().chars().count();
    if name_length < min_name || name_length > max_name {
        errors.check(
            "name",
            Err(format!("Name must be between {} and {} characters", min_name, max_name)),
        );
    }

    if draft.description.trim().is_empty() {
        errors.check("description", Err("Description is required".to_string()));
    }

    if draft.address.trim().is_empty() {
        errors.check("address", Err("Address is required".to_string()));
    }

    errors.check("bedrooms", room_count("Bedrooms", draft.bedrooms));
    errors.check("bathrooms", room_count("Bathrooms", draft.bathrooms));

    if draft.regular_price < Decimal::ONE {
        errors.check("regularPrice", Err("Regular price must be at least 1".to_string()));
    }

    if draft.discount_price < Decimal::ZERO {
        errors.check("discountPrice", Err("Discount price cannot be negative".to_string()));
    } else if draft.discount_price > draft.regular_price {
        errors.check(
            "discountPrice",
            Err("Discount price must be lower than regular price".to_string()),
        );
    }

    if draft.image_urls.is_empty() {
        errors.check("imageUrls", Err("You must upload at least one image".to_string()));
    } else if draft.image_urls.len() > MAX_IMAGES {
        errors.check(
            "imageUrls",
            Err(format!("You can only upload {} images per listing", MAX_IMAGES)),
        );
    } else {
        for url in &draft.image_urls {
            errors.check("imageUrls", validate_http_url(url));
        }
    }

    errors.into_result()
}

fn room_count(label: &str, count: i32) -> Result<(), String> {
    let (min, max) = ROOM_COUNT_RANGE;
    if count < min || count > max {
        return Err(format!("{} must be between {} and {}", label, min, max));
    }
    Ok(())
}
