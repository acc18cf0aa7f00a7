//! Session tokens, password hashing and ownership checks.

pub mod ownership;
pub mod password;
pub mod token;

pub use ownership::{ensure_owner, Resource};
pub use password::{
    hash_password, hash_password_blocking, verify_password, verify_password_blocking, PasswordError,
};
pub use token::{Claims, IssuedToken, TokenError, TokenIssuer};

/// Name of the cookie carrying the session token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// `Set-Cookie` value delivering a freshly issued token.
pub fn session_cookie(issued: &IssuedToken, secure: bool) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        ACCESS_TOKEN_COOKIE, issued.token, issued.max_age_secs
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value telling the client to drop its token.
pub fn cleared_cookie(secure: bool) -> String {
    let mut cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        ACCESS_TOKEN_COOKIE
    );
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}
