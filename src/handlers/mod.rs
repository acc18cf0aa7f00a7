// handlers/mod.rs - Two-tier handler architecture
//
// Public (no session) → Protected (session cookie required, ownership checked)
//
// Protected handlers receive `Extension<AuthUser>` from the access guard and
// never trust identity fields from the request body.

pub mod protected; // Tier 2: /api/user/*, /api/listing/{create,update,delete}
pub mod public; // Tier 1: /api/auth/*, /api/listing/get/:id
pub mod utils; // Shared input validation
