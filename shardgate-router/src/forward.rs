use axum::http::header;
use axum::http::HeaderMap;

/// Headers that describe a single connection and never cross the proxy.
const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// First non-empty path segment, percent-decoded.
pub fn routing_key(path: &str) -> Option<String> {
    let segment = path.split('/').find(|s| !s.is_empty())?;
    let decoded = urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string());
    Some(decoded)
}

/// `base_url` without its trailing slash, followed by the original path and
/// query.
pub fn target_url(base_url: &str, path: &str, query: Option<&str>) -> String {
    let mut url = String::with_capacity(base_url.len() + path.len() + 1);
    url.push_str(base_url.trim_end_matches('/'));
    if !path.starts_with('/') {
        url.push('/');
    }
    url.push_str(path);
    if let Some(q) = query.filter(|q| !q.is_empty()) {
        url.push('?');
        url.push_str(q);
    }
    url
}

/// Drops hop-by-hop headers, any header named by `Connection`, and `Host`
/// when `strip_host` is set. Everything else, `x-api-key` included, passes.
pub fn filter_headers(headers: &HeaderMap, strip_host: bool) -> HeaderMap {
    let named_by_connection: Vec<String> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if HOP_BY_HOP.contains(&name.as_str())
            || (strip_host && *name == header::HOST)
            || named_by_connection.iter().any(|n| n == name.as_str())
        {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}
