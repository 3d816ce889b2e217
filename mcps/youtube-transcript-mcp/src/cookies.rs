//! Netscape `cookies.txt` support for signed-in (age-restricted) requests

use reqwest::cookie::Jar;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use url::Url;

use crate::error::{TranscriptError, TranscriptResult};

const HTTP_ONLY_PREFIX: &str = "#HttpOnly_";

/// One line of a Netscape cookie file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCookie {
    pub domain: String,
    pub include_subdomains: bool,
    pub path: String,
    pub secure: bool,
    /// Unix seconds; 0 for session cookies
    pub expires: u64,
    pub name: String,
    pub value: String,
    pub http_only: bool,
}

impl FileCookie {
    /// `Set-Cookie` style string for [`Jar::add_cookie_str`]
    pub fn header(&self) -> String {
        let mut header = format!("{}={}; Path={}", self.name, self.value, self.path);
        if self.include_subdomains {
            header.push_str(&format!("; Domain={}", self.domain.trim_start_matches('.')));
        }
        if self.secure {
            header.push_str("; Secure");
        }
        if self.http_only {
            header.push_str("; HttpOnly");
        }
        header
    }

    /// The URL the cookie is scoped to
    pub fn url(&self) -> Option<Url> {
        let host = self.domain.trim_start_matches('.');
        Url::parse(&format!("https://{}{}", host, self.path)).ok()
    }

    fn expired(&self, now: u64) -> bool {
        self.expires != 0 && self.expires < now
    }
}

/// Parse the text of a cookie file.
///
/// Comment and blank lines are skipped; `#HttpOnly_` lines are cookies.
pub fn parse_cookie_file(content: &str) -> Result<Vec<FileCookie>, String> {
    let mut cookies = Vec::new();
    for (number, line) in content.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        let (line, http_only) = match line.strip_prefix(HTTP_ONLY_PREFIX) {
            Some(rest) => (rest, true),
            None => (line, false),
        };
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        let &[domain, subdomains, path, secure, expires, name, value] = fields.as_slice() else {
            return Err(format!(
                "line {}: expected 7 tab-separated fields, found {}",
                number + 1,
                fields.len()
            ));
        };
        let expires = expires
            .trim()
            .parse::<u64>()
            .map_err(|_| format!("line {}: bad expiry '{}'", number + 1, expires))?;

        cookies.push(FileCookie {
            domain: domain.to_string(),
            include_subdomains: subdomains.eq_ignore_ascii_case("TRUE"),
            path: if path.is_empty() { "/".to_string() } else { path.to_string() },
            secure: secure.eq_ignore_ascii_case("TRUE"),
            expires,
            name: name.to_string(),
            value: value.to_string(),
            http_only,
        });
    }
    Ok(cookies)
}

/// Read a cookie file and drop expired entries
pub fn load_cookie_file(path: &Path) -> TranscriptResult<Vec<FileCookie>> {
    let error = |reason: String| TranscriptError::Cookies {
        path: path.display().to_string(),
        reason,
    };

    let content = std::fs::read_to_string(path).map_err(|e| error(e.to_string()))?;
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let cookies: Vec<FileCookie> = parse_cookie_file(&content)
        .map_err(error)?
        .into_iter()
        .filter(|cookie| !cookie.expired(now))
        .collect();

    if cookies.is_empty() {
        return Err(error("no unexpired cookies in file".to_string()));
    }
    tracing::debug!(count = cookies.len(), "Loaded cookies from {}", path.display());
    Ok(cookies)
}

/// Add cookies to a jar under their own domains
pub fn add_to_jar(jar: &Jar, cookies: &[FileCookie]) {
    for cookie in cookies {
        if let Some(url) = cookie.url() {
            jar.add_cookie_str(&cookie.header(), &url);
        }
    }
}
