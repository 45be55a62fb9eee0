//! Hash Route Parsing
//!
//! Parses URL fragments of the form `#/<path>?<key>=<value>&…` into a path
//! plus query-parameter mapping. Parsing is pure and synchronous; the web
//! layer feeds it the fragment on every `hashchange` event.
//!
//! Examples:
//! - `#/success?session_id=cs_test_123` → path "success", session_id set
//! - `#/admin` → path "admin", no params
//! - ``, `#`, `#/` → empty route

use std::collections::HashMap;

/// Query parameter carrying the checkout session reference
pub const SESSION_ID_PARAM: &str = "session_id";

/// A parsed hash route: transient, derived from the fragment on each change
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Route {
    /// Path segment with the leading `#/` stripped
    pub path: String,

    /// Query parameters. Duplicate keys keep the first occurrence.
    pub params: HashMap<String, String>,
}

impl Route {
    /// Parse a fragment string into a route
    pub fn parse(fragment: &str) -> Self {
        if fragment.is_empty() || fragment == "#" || fragment == "#/" {
            return Self::default();
        }

        let rest = fragment
            .strip_prefix("#/")
            .or_else(|| fragment.strip_prefix('#'))
            .unwrap_or(fragment);

        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (rest, None),
        };

        let mut params = HashMap::new();
        if let Some(query) = query {
            for pair in query.split('&').filter(|p| !p.is_empty()) {
                let (key, value) = match pair.split_once('=') {
                    Some((k, v)) => (k, v),
                    None => (pair, ""),
                };
                let key = decode_component(key);
                // First occurrence wins for duplicate keys.
                params
                    .entry(key)
                    .or_insert_with(|| decode_component(value));
            }
        }

        Self {
            path: path.to_string(),
            params,
        }
    }

    /// Look up a query parameter by name
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// The checkout session reference from the payment redirect, if present
    pub fn session_id(&self) -> Option<&str> {
        self.param(SESSION_ID_PARAM)
    }

    /// Whether this is the empty route
    pub fn is_empty(&self) -> bool {
        self.path.is_empty() && self.params.is_empty()
    }

    /// Format a fragment for navigation, e.g. `#/success?session_id=cs_1`
    pub fn format_fragment(path: &str, params: &[(&str, &str)]) -> String {
        let mut fragment = format!("#/{path}");
        for (i, (key, value)) in params.iter().enumerate() {
            fragment.push(if i == 0 { '?' } else { '&' });
            fragment.push_str(&encode_component(key));
            fragment.push('=');
            fragment.push_str(&encode_component(value));
        }
        fragment
    }
}

/// Decode a `application/x-www-form-urlencoded` component: `+` as space,
/// `%XX` as the byte it names. Malformed escapes pass through untouched.
fn decode_component(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len()
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit() =>
            {
                let hex = &s[i + 1..i + 3];
                // Both bytes are ASCII hex digits, so the parse cannot fail.
                let byte = u8::from_str_radix(hex, 16).unwrap_or(b'%');
                out.push(byte);
                i += 3;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Encode a component for inclusion in a fragment query string
fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            b' ' => out.push('+'),
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_redirect_fragment() {
        let route = Route::parse("#/success?session_id=cs_test_1");
        assert_eq!(route.path, "success");
        assert_eq!(route.session_id(), Some("cs_test_1"));
    }

    #[test]
    fn test_empty_fragments() {
        for fragment in ["", "#", "#/"] {
            let route = Route::parse(fragment);
            assert_eq!(route.path, "");
            assert!(route.params.is_empty());
            assert!(route.is_empty());
        }
    }

    #[test]
    fn test_path_without_query() {
        let route = Route::parse("#/admin");
        assert_eq!(route.path, "admin");
        assert!(route.params.is_empty());
    }

    #[test]
    fn test_fragment_without_slash() {
        let route = Route::parse("#success?session_id=cs_1");
        assert_eq!(route.path, "success");
        assert_eq!(route.session_id(), Some("cs_1"));
    }

    #[test]
    fn test_multiple_params() {
        let route = Route::parse("#/success?session_id=cs_1&source=email");
        assert_eq!(route.param("session_id"), Some("cs_1"));
        assert_eq!(route.param("source"), Some("email"));
    }

    #[test]
    fn test_duplicate_keys_first_wins() {
        let route = Route::parse("#/x?a=1&a=2");
        assert_eq!(route.param("a"), Some("1"));
    }

    #[test]
    fn test_percent_and_plus_decoding() {
        let route = Route::parse("#/x?name=Joe+Foreman&mail=joe%40example.com");
        assert_eq!(route.param("name"), Some("Joe Foreman"));
        assert_eq!(route.param("mail"), Some("joe@example.com"));
    }

    #[test]
    fn test_malformed_escape_passes_through() {
        let route = Route::parse("#/x?v=50%ZZ");
        assert_eq!(route.param("v"), Some("50%ZZ"));
    }

    #[test]
    fn test_valueless_key() {
        let route = Route::parse("#/x?flag");
        assert_eq!(route.param("flag"), Some(""));
    }

    #[test]
    fn test_missing_session_id() {
        let route = Route::parse("#/success");
        assert_eq!(route.session_id(), None);
    }

    #[test]
    fn test_format_fragment() {
        let fragment = Route::format_fragment("success", &[("session_id", "cs_test_1")]);
        assert_eq!(fragment, "#/success?session_id=cs_test_1");

        let route = Route::parse(&fragment);
        assert_eq!(route.path, "success");
        assert_eq!(route.session_id(), Some("cs_test_1"));
    }

    #[test]
    fn test_format_fragment_encodes() {
        let fragment = Route::format_fragment("x", &[("q", "a b&c")]);
        assert_eq!(fragment, "#/x?q=a+b%26c");
        let route = Route::parse(&fragment);
        assert_eq!(route.param("q"), Some("a b&c"));
    }
}
