//! Cookie string lookup.

/// Find `name` in a `document.cookie` style string and URL-decode its value.
///
/// Segments are split on `;` and trimmed; the first segment starting with
/// `name=` wins. A value that is not valid UTF-8 after decoding is decoded
/// lossily.
#[must_use]
pub fn get_cookie(cookies: &str, name: &str) -> Option<String> {
    if cookies.is_empty() || name.is_empty() {
        return None;
    }

    cookies
        .split(';')
        .map(str::trim)
        .find_map(|segment| {
            segment
                .strip_prefix(name)
                .and_then(|rest| rest.strip_prefix('='))
        })
        .map(|raw| match urlencoding::decode(raw) {
            Ok(value) => value.into_owned(),
            Err(_) => String::from_utf8_lossy(&urlencoding::decode_binary(raw.as_bytes()))
                .into_owned(),
        })
}
