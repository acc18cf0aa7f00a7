// handlers/public/auth/mod.rs - Session acquisition endpoints

pub mod signin; // POST /api/auth/signin - verify credentials, set session cookie
pub mod signout; // GET /api/auth/signout - clear session cookie
pub mod signup; // POST /api/auth/signup - create account

pub use signin::signin_post;
pub use signout::signout_get;
pub use signup::signup_post;
