pub mod listing;
pub mod user;

pub use listing::{Listing, ListingDraft, ListingRow, ListingType};
pub use user::{NewUser, PublicUser, User, UserChanges};
