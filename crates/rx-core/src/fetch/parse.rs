//! Parse HTTP response header lines and classify statuses.

/// Redirect statuses per RFC 7231 §6.4 and RFC 7238.
pub(crate) fn is_redirect(status: u32) -> bool {
    matches!(status, 300 | 301 | 302 | 303 | 307 | 308)
}

/// Collect `Name: value` lines into lowercase-name pairs, skipping the status
/// line and blanks. Repeated headers keep every occurrence in order.
pub(crate) fn parse_headers(lines: &[String]) -> Vec<(String, String)> {
    let mut headers = Vec::new();
    for line in lines {
        let line = line.trim();
        if line.is_empty() || line.starts_with("HTTP/") {
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_ascii_lowercase(), value.trim().to_string()));
        }
    }
    headers
}

/// Last value of header `name` (case-insensitive).
pub(crate) fn header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .rev()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// True if `content_type` contains one of the allowed MIME types.
pub(crate) fn content_type_allowed(content_type: &str, allowed: &[String]) -> bool {
    let ct = content_type.to_ascii_lowercase();
    allowed
        .iter()
        .any(|mime| ct.contains(&mime.to_ascii_lowercase()))
}
