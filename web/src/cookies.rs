//! Minimal cookie helpers.
//!
//! Only what the language and CSRF cookies need: reading one value from the
//! `Cookie` request headers and building a `Set-Cookie` header value.

use axum::http::{HeaderMap, HeaderValue, header};

/// Value of the cookie `name`, if the request carries it.
///
/// All `Cookie` headers are searched; the first match wins.
#[must_use]
pub fn cookie_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim_matches('"'))
}

/// `SameSite` attribute of a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
    /// Sent on same-site requests and top-level navigations
    Lax,
    /// Sent on same-site requests only
    Strict,
}

/// A `Set-Cookie` header under construction.
#[derive(Debug, Clone)]
pub struct SetCookie<'a> {
    name: &'a str,
    value: &'a str,
    max_age: Option<u64>,
    same_site: SameSite,
    http_only: bool,
    secure: bool,
}

impl<'a> SetCookie<'a> {
    /// A session cookie scoped to `/` with `SameSite=Lax`.
    #[must_use]
    pub const fn new(name: &'a str, value: &'a str) -> Self {
        Self {
            name,
            value,
            max_age: None,
            same_site: SameSite::Lax,
            http_only: false,
            secure: false,
        }
    }

    /// Persist the cookie for `seconds`.
    #[must_use]
    pub const fn max_age(mut self, seconds: u64) -> Self {
        self.max_age = Some(seconds);
        self
    }

    /// Set the `SameSite` policy.
    #[must_use]
    pub const fn same_site(mut self, same_site: SameSite) -> Self {
        self.same_site = same_site;
        self
    }

    /// Hide the cookie from scripts.
    #[must_use]
    pub const fn http_only(mut self) -> Self {
        self.http_only = true;
        self
    }

    /// Only send the cookie over HTTPS.
    #[must_use]
    pub const fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Render the header value.
    ///
    /// Returns `None` if name or value contain characters not allowed in a
    /// header.
    #[must_use]
    pub fn to_header_value(&self) -> Option<HeaderValue> {
        let mut cookie = format!("{}={}; Path=/", self.name, self.value);
        if let Some(max_age) = self.max_age {
            cookie.push_str(&format!("; Max-Age={max_age}"));
        }
        cookie.push_str(match self.same_site {
            SameSite::Lax => "; SameSite=Lax",
            SameSite::Strict => "; SameSite=Strict",
        });
        if self.http_only {
            cookie.push_str("; HttpOnly");
        }
        if self.secure {
            cookie.push_str("; Secure");
        }
        HeaderValue::from_str(&cookie).ok()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for cookie in cookies {
            headers.append(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        }
        headers
    }

    #[test]
    fn test_cookie_value() {
        let headers = headers(&["a=1; lang=fr", "csrf_token=xyz"]);
        assert_eq!(cookie_value(&headers, "lang"), Some("fr"));
        assert_eq!(cookie_value(&headers, "csrf_token"), Some("xyz"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn test_cookie_value_does_not_match_prefix() {
        let headers = headers(&["language=de; lang=en"]);
        assert_eq!(cookie_value(&headers, "lang"), Some("en"));
    }

    #[test]
    fn test_set_cookie() {
        let value = SetCookie::new("lang", "fr")
            .max_age(60)
            .to_header_value()
            .unwrap();
        assert_eq!(value, "lang=fr; Path=/; Max-Age=60; SameSite=Lax");

        let value = SetCookie::new("csrf_token", "abc")
            .same_site(SameSite::Strict)
            .http_only()
            .secure(true)
            .to_header_value()
            .unwrap();
        assert_eq!(
            value,
            "csrf_token=abc; Path=/; SameSite=Strict; HttpOnly; Secure"
        );
    }
}
