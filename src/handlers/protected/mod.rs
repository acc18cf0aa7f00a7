// handlers/protected/mod.rs - Protected handlers (session required)
//
// Every route here sits behind `middleware::access_guard`, which attaches
// `AuthUser`. Handlers then check ownership with `auth::ensure_owner`
// before reading private data or mutating anything:
//
//   Unauthenticated → Authenticated (guard) → Authorized (ensure_owner) → Executed
//
// Missing records are reported before ownership (404 before 403) so that a
// repeated delete answers 404 rather than 403.

pub mod listing; // /api/listing/{create,update/:id,delete/:id}
pub mod user; // /api/user/*
