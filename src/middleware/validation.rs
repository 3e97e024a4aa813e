use axum::{
    extract::Request,
    http::{Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::error::{AppError, AppResult};

/// Upper bound for JSON request bodies. Every body is a handful of paths.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

const MAX_PATH_LENGTH: usize = 4096;
const MAX_QUERY_LENGTH: usize = 256;

/// Rejects traversal URIs and oversized bodies before routing.
///
/// * traversal sequences in the URI path answer `400 INVALID_PATH`
/// * a declared `Content-Length` over [`MAX_BODY_BYTES`] answers `413`
/// * suspicious user agents are logged, not rejected
pub async fn validate_request_middleware(req: Request, next: Next) -> Response {
    if contains_path_traversal(req.uri().path()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": {
                    "code": "INVALID_PATH",
                    "message": "Path traversal detected in request",
                },
                "status": 400,
            })),
        )
            .into_response();
    }

    if let Some(ua) = req.headers().get("user-agent").and_then(|v| v.to_str().ok()) {
        if is_suspicious_user_agent(ua) {
            tracing::warn!("Suspicious user agent detected: {}", sanitize_for_logging(ua));
        }
    }

    // DefaultBodyLimit enforces this too, but only once the body is read
    if matches!(req.method(), &Method::POST | &Method::PUT | &Method::DELETE) {
        let declared = req
            .headers()
            .get("content-length")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<usize>().ok());
        if let Some(length) = declared.filter(|&len| len > MAX_BODY_BYTES) {
            tracing::warn!("Rejecting {} byte request body", length);
            return (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(json!({
                    "error": {
                        "code": "PAYLOAD_TOO_LARGE",
                        "message": format!("Request body exceeds maximum size of {} bytes", MAX_BODY_BYTES),
                    },
                    "status": 413,
                })),
            )
                .into_response();
        }
    }

    next.run(req).await
}

/// True for `..` segments, `.` segments, NUL and their percent-encoded forms.
///
/// Applied to request URIs only. Path fields go through [`has_dot_segment`],
/// since names such as `..notes` or `a%2e%2eb` are legal on disk.
pub(crate) fn contains_path_traversal(path: &str) -> bool {
    let lower = path.to_lowercase();

    if path.contains("/..") || path.contains("\\..") || path.starts_with("..") {
        return true;
    }
    if path.contains("/./") || path.contains("\\.\\") {
        return true;
    }

    const ENCODED: &[&str] = &[
        "%2e%2e", "%252e%252e", "%2e/", "%252e%2f", "/%2e", "%2f%2e", "%2e\\", "%2e%5c", "%5c%2e", "%00",
    ];
    if ENCODED.iter().any(|pattern| lower.contains(pattern)) {
        return true;
    }

    path.contains('\0')
}

/// True when a whole segment of `path` is `.` or `..`.
fn has_dot_segment(path: &str) -> bool {
    path.split(['/', '\\']).any(|segment| segment == "." || segment == "..")
}

fn is_suspicious_user_agent(ua: &str) -> bool {
    let ua_lower = ua.to_lowercase();
    ["scanner", "nikto", "sqlmap", "havij", "acunetix"].iter().any(|needle| ua_lower.contains(needle))
}

/// Validates a client-supplied path field.
///
/// Only path *fields* pass through here; single names (`name`, `new_name`)
/// are checked by the filesystem layer, which reports `InvalidName`.
pub fn validate_file_path(field: &str, path: &str) -> AppResult<String> {
    let invalid = |message: String| AppError::ValidationError { field: field.to_string(), message };

    if path.trim().is_empty() {
        return Err(invalid("path must not be empty".into()));
    }
    if path.contains('\0') {
        return Err(invalid("path contains a null byte".into()));
    }
    if has_dot_segment(path) {
        return Err(invalid("path traversal attempt detected".into()));
    }
    if path.len() > MAX_PATH_LENGTH {
        return Err(invalid(format!("path exceeds maximum length of {} characters", MAX_PATH_LENGTH)));
    }

    #[cfg(windows)]
    {
        const INVALID_CHARS: &[char] = &['<', '>', '"', '|', '?', '*'];
        let is_extended = path.starts_with("\\\\?\\");
        if let Some(c) = INVALID_CHARS.iter().find(|c| path.contains(**c)) {
            if !is_extended {
                return Err(invalid(format!("path contains invalid character: {}", c)));
            }
        }

        let colons = path.matches(':').count();
        let is_drive_path = path.len() >= 2 && path.chars().nth(1) == Some(':');
        if colons > 1 || (colons == 1 && !is_drive_path && !is_extended) {
            return Err(invalid("invalid use of colon in path".into()));
        }
    }

    Ok(path.to_string())
}

/// Trims and bounds a search query. An empty query is a client error.
pub fn validate_search_query(query: &str) -> AppResult<String> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(AppError::ValidationError {
            field: "query".into(),
            message: "query must not be empty".into(),
        });
    }
    if trimmed.chars().count() > MAX_QUERY_LENGTH {
        return Err(AppError::ValidationError {
            field: "query".into(),
            message: format!("query exceeds {} characters", MAX_QUERY_LENGTH),
        });
    }
    Ok(trimmed.chars().filter(|c| !c.is_control()).collect())
}

/// Strips control characters and bounds the length of user input before it
/// reaches the logs.
pub fn sanitize_for_logging(input: &str) -> String {
    input
        .chars()
        .filter(|c| !c.is_control() || c.is_whitespace())
        .take(200)
        .collect::<String>()
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\'', "\\\'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_traversal_detection() {
        assert!(contains_path_traversal("../etc/passwd"));
        assert!(contains_path_traversal("./../../etc/passwd"));
        assert!(contains_path_traversal("/home/user/../root"));
        assert!(contains_path_traversal("%2e%2e/etc"));
        assert!(contains_path_traversal("path\0with\0null"));

        assert!(!contains_path_traversal("/home/user/Documents"));
        assert!(!contains_path_traversal("/home/user/.config"));
        assert!(!contains_path_traversal("C:\\Users\\test"));
    }

    #[test]
    fn test_suspicious_user_agents() {
        assert!(is_suspicious_user_agent("nikto/2.1.5"));
        assert!(is_suspicious_user_agent("sqlmap/1.0"));
        assert!(!is_suspicious_user_agent("Mozilla/5.0 (X11; Linux x86_64)"));
    }

    #[test]
    fn test_file_path_validation() {
        assert!(validate_file_path("path", "/home/user/notes.txt").is_ok());
        assert!(validate_file_path("path", "/home/user/archive.tar.gz").is_ok());

        assert!(validate_file_path("path", "").is_err());
        assert!(validate_file_path("path", "../etc/passwd").is_err());
        assert!(validate_file_path("path", "/tmp/a\0b").is_err());
        assert!(validate_file_path("path", &"a".repeat(5000)).is_err());
    }

    #[test]
    fn dotted_names_are_not_traversal() {
        assert!(validate_file_path("path", "/home/u/..notes").is_ok());
        assert!(validate_file_path("path", "/home/u/notes..").is_ok());
        assert!(validate_file_path("path", "/home/u/x..y/file").is_ok());
        assert!(validate_file_path("path", "/tmp/a%2e%2eb").is_ok());
        assert!(validate_file_path("path", "/home/u/.config/app").is_ok());

        assert!(validate_file_path("path", "/home/u/../root").is_err());
        assert!(validate_file_path("path", "/home/u/./notes").is_err());
        assert!(validate_file_path("path", "C:\\Users\\..\\Admin").is_err());
        assert!(validate_file_path("path", "/home/u/..").is_err());
    }

    #[test]
    fn path_errors_name_the_field() {
        match validate_file_path("dest_dir", "  ") {
            Err(AppError::ValidationError { field, .. }) => assert_eq!(field, "dest_dir"),
            other => panic!("expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_search_query_validation() {
        assert_eq!(validate_search_query("  report ").unwrap(), "report");
        assert!(validate_search_query("").is_err());
        assert!(validate_search_query("   ").is_err());
        assert!(validate_search_query(&"q".repeat(300)).is_err());
    }

    #[test]
    fn test_sanitize_for_logging() {
        assert_eq!(sanitize_for_logging("normal text"), "normal text");

        let sanitized = sanitize_for_logging("text\x00with\x01control");
        assert!(!sanitized.contains('\x00'));
        assert!(!sanitized.contains('\x01'));

        assert_eq!(sanitize_for_logging(&"a".repeat(300)).len(), 200);
    }
}
