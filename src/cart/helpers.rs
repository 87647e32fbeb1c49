//! Shopping Cart Helpers
//!
//! Small pure functions shared by the client and the reference backend.

use percent_encoding::percent_decode_str;
use std::collections::HashMap;

/// Returns the URL-decoded value of cookie `name` from a `document.cookie`
/// style string (`"a=1; csrftoken=abc%3D"`), or `None` when absent.
///
/// Keys are compared after trimming whitespace. The value is everything after
/// the first `=`. Pairs without `=`, values with a `%` not followed by two hex
/// digits, and values that do not decode to UTF-8 never match, so malformed
/// input cannot make the lookup fail and later pairs are still considered.
pub fn extract_token(cookies: &str, name: &str) -> Option<String> {
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        if key.trim() != name || !has_valid_escapes(value) {
            return None;
        }
        percent_decode_str(value)
            .decode_utf8()
            .ok()
            .map(|decoded| decoded.into_owned())
    })
}

/// Every `%` must start a `%XX` hex escape.
fn has_valid_escapes(value: &str) -> bool {
    let bytes = value.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            match bytes.get(i + 1..i + 3) {
                Some([hi, lo]) if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => i += 3,
                _ => return false,
            }
        } else {
            i += 1;
        }
    }
    true
}

/// True when `pathname` is a cart page, which renders line items server-side
/// and must be reloaded to stay consistent with the counter.
pub fn is_cart_page(pathname: &str, marker: &str) -> bool {
    pathname.contains(marker)
}

/// Sum of quantities across a cart's lines.
pub fn total_items(lines: &HashMap<String, u32>) -> u32 {
    lines.values().sum()
}
