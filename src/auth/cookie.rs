//! Session cookie transport.
//!
//! Pure helpers for the `auth` cookie: structured parsing of the request
//! `Cookie` header and construction of `Set-Cookie` values for login and
//! logout.

/// Name of the session cookie.
pub const AUTH_COOKIE: &str = "auth";

/// Epoch-0 expiry used to force immediate client-side deletion on logout.
const EPOCH_EXPIRY: &str = "Thu, 01 Jan 1970 00:00:00 GMT";

/// Extract a cookie value from a raw `Cookie` header.
///
/// Splits on `;`, trims surrounding whitespace, skips segments without an
/// `=`. When the same name appears more than once, the first match wins.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|segment| {
        let (key, value) = segment.split_once('=')?;
        if key.trim() == name {
            Some(value.trim())
        } else {
            None
        }
    })
}

/// Build the `Set-Cookie` value carrying a session credential.
///
/// Session-lifetime: no Max-Age/Expires, the cookie dies with the browser
/// session and the token's own `exp` bounds it downstream.
pub fn auth_cookie(token: &str) -> String {
    format!("{}={}; HttpOnly; Secure; Path=/", AUTH_COOKIE, token)
}

/// Build the clearing `Set-Cookie` value used by logout: empty value,
/// expiry strictly in the past.
pub fn clear_auth_cookie() -> String {
    format!(
        "{}=; HttpOnly; Secure; Path=/; Expires={}",
        AUTH_COOKIE, EPOCH_EXPIRY
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_cookie() {
        assert_eq!(cookie_value("auth=abc123", "auth"), Some("abc123"));
    }

    #[test]
    fn test_multiple_cookies_with_whitespace() {
        let header = "theme=dark; auth=tok.en.value; lang=en";
        assert_eq!(cookie_value(header, "auth"), Some("tok.en.value"));
        assert_eq!(cookie_value(header, "lang"), Some("en"));
    }

    #[test]
    fn test_value_may_contain_equals() {
        // JWT padding and similar values keep everything after the first '='
        assert_eq!(cookie_value("auth=a=b=c", "auth"), Some("a=b=c"));
    }

    #[test]
    fn test_first_match_wins() {
        let header = "auth=first; auth=second";
        assert_eq!(cookie_value(header, "auth"), Some("first"));
    }

    #[test]
    fn test_malformed_segments_skipped() {
        let header = "garbage; ;; auth=ok; =orphan";
        assert_eq!(cookie_value(header, "auth"), Some("ok"));
    }

    #[test]
    fn test_name_must_match_exactly() {
        assert_eq!(cookie_value("xauth=1; authx=2", "auth"), None);
        // substring of another cookie's value is not a match
        assert_eq!(cookie_value("other=auth=sneaky", "auth"), None);
    }

    #[test]
    fn test_missing_cookie() {
        assert_eq!(cookie_value("theme=dark", "auth"), None);
        assert_eq!(cookie_value("", "auth"), None);
    }

    #[test]
    fn test_auth_cookie_flags() {
        let cookie = auth_cookie("tok");
        assert!(cookie.starts_with("auth=tok"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        // session-lifetime: no explicit expiry at issuance
        assert!(!cookie.contains("Expires"));
        assert!(!cookie.contains("Max-Age"));
    }

    #[test]
    fn test_clear_cookie_expires_in_the_past() {
        let cookie = clear_auth_cookie();
        assert!(cookie.starts_with("auth=;"));
        assert!(cookie.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
    }
}
