// handlers/public/mod.rs - Public handlers (no session required)
//
// Account creation, sign-in/out and read-only listing lookup. Every input is
// untrusted here, so payloads are validated before touching the store.

pub mod auth;
pub mod listing;
