use anyhow::Result;
use axum::http::HeaderMap;
use std::path::Path;
use uuid::Uuid;

/// Return the admin token for this service instance.
///
/// On first call, generates a random 32-character hex token and writes it to
/// `{data_dir}/admin_token` with user-only read/write permissions (mode 0600
/// on Unix). On subsequent calls, reads and returns the existing token.
///
/// The token stands in for the host dashboard's admin session: every REST
/// endpoint except health requires it, so a request is rejected before any
/// service or proxy code runs.
pub fn get_or_create_admin_token(data_dir: &Path) -> Result<String> {
    let path = data_dir.join("admin_token");

    if path.exists() {
        let token = std::fs::read_to_string(&path)?.trim().to_string();
        if !token.is_empty() {
            return Ok(token);
        }
    }

    // Generate a new token (UUID v4, hex without dashes = 32 chars)
    let token = Uuid::new_v4().to_string().replace('-', "");

    std::fs::create_dir_all(data_dir)?;
    std::fs::write(&path, &token)?;

    // Restrict to owner read/write only on Unix
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o600))?;
    }

    Ok(token)
}

/// Check a request's headers against the expected admin token.
///
/// Accepts either `Authorization: Bearer <token>` or `X-Admin-Token: <token>`
/// (the latter is what the embedded widget sends alongside its session).
pub fn request_is_authorized(headers: &HeaderMap, expected: &str) -> bool {
    if expected.is_empty() {
        return false;
    }
    if let Some(value) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
        if value.strip_prefix("Bearer ").map(|t| t == expected) == Some(true) {
            return true;
        }
    }
    headers
        .get("x-admin-token")
        .and_then(|v| v.to_str().ok())
        .map(|t| t == expected)
        .unwrap_or(false)
}
