/// Returns `true` for any status in the 2xx class.
pub fn is_success(status: u16) -> bool { (200..300).contains(&status) }

/// `206 Partial Content`: the server honoured the `Range` header.
pub fn is_partial(status: u16) -> bool { status == 206 }

/// Whether an `Accept-Ranges` value advertises byte ranges.
pub fn accepts_byte_ranges(value: Option<&str>) -> bool {
    value.is_some_and(|v| {
        v.split(',')
            .any(|unit| unit.trim().eq_ignore_ascii_case("bytes"))
    })
}

/// Normalise a raw `ETag` into a comparable change token.
///
/// Strips the weak-validator prefix and the surrounding quotes; empty tokens
/// carry no information and become `None`.
pub fn normalize_change_token(raw: Option<&str>) -> Option<String> {
    let raw = raw?.trim();
    let raw = raw.strip_prefix("W/").unwrap_or(raw);
    let token = raw.trim_matches('"');
    (!token.is_empty()).then(|| token.to_string())
}
