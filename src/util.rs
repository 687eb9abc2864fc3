use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};

/// `iptv-checker/<version> (+<repository>)`
pub const USER_AGENT: &str = concat!(
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION"),
    " (+",
    env!("CARGO_PKG_REPOSITORY"),
    ")"
);

/// Truncates a string to a maximum length, adding `...` to the end if it was truncated.
///
/// This function will continuously try to reduce length if string is being
/// truncated in the middle of a UTF codepoint
///
/// # Arguments
/// * `string` - The string to truncate
/// * `max_length` - The maximum length of the string, at least 4
#[must_use]
pub fn truncate_string(string: &impl ToString, max_length: usize) -> String {
    let string = string.to_string();
    if string.len() <= max_length {
        return string;
    }

    let mut attempted_len = max_length;
    let mut truncated = string.get(..attempted_len - 3);
    while truncated.is_none() {
        attempted_len -= 1;
        truncated = string.get(..attempted_len - 3);
    }

    format!("{}...", truncated.unwrap_or_default())
}

/// Builds the client used to download remote playlists
///
/// # Errors
/// When the TLS backend cannot be initialized
pub fn init_http_client(insecure: bool, timeout: Duration) -> reqwest::Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert("User-Agent", HeaderValue::from_static(USER_AGENT));

    reqwest::Client::builder()
        .default_headers(headers)
        .connect_timeout(Duration::from_secs(10))
        .timeout(timeout)
        .danger_accept_invalid_certs(insecure)
        .build()
}
