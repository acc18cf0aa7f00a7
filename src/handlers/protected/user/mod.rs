// handlers/protected/user/mod.rs - Account endpoints for the signed-in caller

pub mod avatar; // PUT /api/user/update-avatar
pub mod listings; // GET /api/user/listings/:id
pub mod profile; // GET /api/user/:id, POST /api/user/update/:id, DELETE /api/user/delete/:id

pub use avatar::avatar_put;
pub use listings::listings_get;
pub use profile::{profile_delete, profile_get, profile_update};
