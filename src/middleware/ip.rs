use axum::http::HeaderMap;
use std::net::IpAddr;

/// Resolve the client IP for rate limiting.
///
/// Proxy headers win over the socket address; a request with neither is
/// attributed to loopback.
pub fn extract_ip_from_headers(headers: &HeaderMap, fallback: Option<IpAddr>) -> IpAddr {
    if let Some(h) = headers.get("x-forwarded-for").and_then(|hv| hv.to_str().ok()) {
        if let Some(first) = h.split(',').next() {
            if let Ok(ip) = first.trim().parse::<IpAddr>() {
                return ip;
            }
        }
    }
    if let Some(h) = headers.get("x-real-ip").and_then(|hv| hv.to_str().ok()) {
        if let Ok(ip) = h.trim().parse::<IpAddr>() {
            return ip;
        }
    }
    fallback.unwrap_or(IpAddr::from([127, 0, 0, 1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn forwarded_for_takes_first_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("10.1.2.3, 192.168.0.1"));
        assert_eq!(extract_ip_from_headers(&headers, None), IpAddr::from([10, 1, 2, 3]));
    }

    #[test]
    fn falls_back_to_socket_then_loopback() {
        let headers = HeaderMap::new();
        let remote = IpAddr::from([192, 168, 1, 20]);
        assert_eq!(extract_ip_from_headers(&headers, Some(remote)), remote);
        assert_eq!(extract_ip_from_headers(&headers, None), IpAddr::from([127, 0, 0, 1]));
    }

    #[test]
    fn garbage_headers_are_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("not-an-ip"));
        headers.insert("x-real-ip", HeaderValue::from_static(" 172.16.0.9 "));
        assert_eq!(extract_ip_from_headers(&headers, None), IpAddr::from([172, 16, 0, 9]));
    }
}
