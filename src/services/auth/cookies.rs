//! Browser session cookies.
//!
//! Two cookies back the cookie-based session:
//! - `access_token`: the JWT, HttpOnly (scripts must not read it)
//! - `csrf_token`: opaque random value, readable by scripts, echoed back in
//!   the `X-CSRFToken` header on mutations (double-submit check)
//!
//! Mobile/API clients use the `Authorization` header and never see these.

use axum::http::{HeaderMap, header};

pub const ACCESS_TOKEN_COOKIE: &str = "access_token";
pub const CSRF_TOKEN_COOKIE: &str = "csrf_token";
pub const CSRF_HEADER: &str = "x-csrftoken";

#[derive(Clone, Copy, Debug)]
pub struct CookiePolicy {
    // Secure attribute; on in production, off for local http development.
    pub secure: bool,
    pub max_age_seconds: u64,
}

impl CookiePolicy {
    pub fn access_cookie(&self, token: &str) -> String {
        format!(
            "{}={}; Path=/; HttpOnly; SameSite=Lax{}; Max-Age={}",
            ACCESS_TOKEN_COOKIE,
            token,
            self.secure_attr(),
            self.max_age_seconds
        )
    }

    pub fn csrf_cookie(&self, token: &str) -> String {
        // No HttpOnly: the frontend reads this to fill X-CSRFToken.
        format!(
            "{}={}; Path=/; SameSite=Lax{}; Max-Age={}",
            CSRF_TOKEN_COOKIE,
            token,
            self.secure_attr(),
            self.max_age_seconds
        )
    }

    pub fn clear_access_cookie(&self) -> String {
        format!(
            "{}=; Path=/; HttpOnly; SameSite=Lax{}; Max-Age=0",
            ACCESS_TOKEN_COOKIE,
            self.secure_attr()
        )
    }

    pub fn clear_csrf_cookie(&self) -> String {
        format!(
            "{}=; Path=/; SameSite=Lax{}; Max-Age=0",
            CSRF_TOKEN_COOKIE,
            self.secure_attr()
        )
    }

    fn secure_attr(&self) -> &'static str {
        if self.secure { "; Secure" } else { "" }
    }
}

/// Opaque CSRF token: 32 bytes of entropy -> URL-safe base64 without padding.
pub fn generate_csrf_token() -> String {
    let mut bytes = [0u8; 32];
    getrandom::fill(&mut bytes).expect("getrandom failed");

    use base64::Engine;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;

    URL_SAFE_NO_PAD.encode(bytes)
}

/// Read a single cookie value from the request `Cookie` header.
pub fn read_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;

    raw.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        (k == name).then(|| v.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn policy() -> CookiePolicy {
        CookiePolicy {
            secure: false,
            max_age_seconds: 3600,
        }
    }

    #[test]
    fn access_cookie_is_http_only() {
        let c = policy().access_cookie("tok123");

        assert!(c.starts_with("access_token=tok123;"));
        assert!(c.contains("HttpOnly"));
        assert!(c.contains("Max-Age=3600"));
        assert!(!c.contains("Secure"));
    }

    #[test]
    fn csrf_cookie_is_script_readable() {
        let c = policy().csrf_cookie("tok456");

        assert!(!c.contains("HttpOnly"));
    }

    #[test]
    fn secure_attribute_follows_policy() {
        let p = CookiePolicy {
            secure: true,
            max_age_seconds: 60,
        };

        assert!(p.access_cookie("t").contains("; Secure"));
        assert!(p.clear_access_cookie().contains("; Secure"));
    }

    #[test]
    fn clearing_sets_max_age_zero() {
        assert!(policy().clear_access_cookie().contains("Max-Age=0"));
        assert!(policy().clear_csrf_cookie().contains("Max-Age=0"));
    }

    #[test]
    fn read_cookie_picks_the_named_value() {
        let mut headers = HeaderMap::new();
        headers.insert(
            axum::http::header::COOKIE,
            HeaderValue::from_static("a=1; access_token=tok; csrf_token=xyz"),
        );

        assert_eq!(
            read_cookie(&headers, ACCESS_TOKEN_COOKIE).as_deref(),
            Some("tok")
        );
        assert_eq!(
            read_cookie(&headers, CSRF_TOKEN_COOKIE).as_deref(),
            Some("xyz")
        );
        assert_eq!(read_cookie(&headers, "missing"), None);
    }

    #[test]
    fn csrf_token_is_urlsafe() {
        let t = generate_csrf_token();

        assert_eq!(t.len(), 43); // 32 bytes, base64 no pad
        assert!(t.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
