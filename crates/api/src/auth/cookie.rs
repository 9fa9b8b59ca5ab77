//! `Set-Cookie` values for the browser auth cookie.

/// Cookie carrying `token` for `max_age_secs`. With `secure` the browser only
/// sends it over HTTPS.
pub fn auth_cookie(name: &str, token: &str, max_age_secs: i64, secure: bool) -> String {
    with_secure(
        format!("{name}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={max_age_secs}"),
        secure,
    )
}

/// Cookie that makes the browser drop `name` immediately.
pub fn expired_auth_cookie(name: &str, secure: bool) -> String {
    with_secure(
        format!("{name}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0"),
        secure,
    )
}

fn with_secure(mut cookie: String, secure: bool) -> String {
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}
