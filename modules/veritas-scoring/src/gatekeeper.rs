//! Early rejection of inputs that cannot or should not be scored.
//!
//! URL checks run before any network call. Content checks run on scraped
//! text, after the fetch and before extraction.

use std::collections::HashSet;
use std::net::IpAddr;

use thiserror::Error;

/// Minimum number of characters (after trimming) a scraped page must carry.
pub const MIN_CONTENT_CHARS: usize = 200;

/// Code-density check only applies to texts with more non-empty lines than this.
const CODE_CHECK_MIN_LINES: usize = 5;

/// Share of code-like lines above which content is treated as source code.
const MAX_CODE_LINE_RATIO: f64 = 0.3;

/// Path extensions that never point to an article.
const DISALLOWED_EXTENSIONS: &[&str] = &[
    // documents
    ".pdf", ".doc", ".docx", ".xls", ".xlsx", ".ppt", ".pptx", ".odt", ".ods", ".csv",
    // archives
    ".zip", ".rar", ".7z", ".tar", ".gz", ".bz2", ".xz",
    // binaries
    ".exe", ".msi", ".dmg", ".apk", ".bin", ".iso", ".deb", ".rpm", ".jar",
    // media
    ".jpg", ".jpeg", ".png", ".gif", ".svg", ".webp", ".bmp", ".ico", ".mp3", ".mp4", ".avi",
    ".mov", ".wav", ".webm", ".mkv", ".flac", ".ogg",
    // source code and config
    ".js", ".ts", ".py", ".rs", ".java", ".c", ".cpp", ".h", ".go", ".rb", ".php", ".sh",
    ".css", ".json", ".xml", ".yaml", ".yml", ".toml", ".ini", ".env", ".lock",
];

/// Code hosting, social networks and local addresses.
const BLOCKED_HOSTS: &[&str] = &[
    "github.com",
    "gitlab.com",
    "bitbucket.org",
    "stackoverflow.com",
    "npmjs.com",
    "facebook.com",
    "twitter.com",
    "x.com",
    "instagram.com",
    "tiktok.com",
    "linkedin.com",
    "reddit.com",
    "pinterest.com",
    "snapchat.com",
    "localhost",
    "127.0.0.1",
    "0.0.0.0",
    "::1",
    "[::1]",
];

/// Why an input was refused. The Display text is the user-facing explanation
/// of the resulting `non pertinent` verdict.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("URL invalide")]
    InvalidUrl,

    #[error("Protocole non supporté : {0}")]
    DisallowedScheme(String),

    #[error("Domaine non pertinent pour l'analyse d'information : {0}")]
    BlockedHost(String),

    #[error("Type de fichier non analysable : {0}")]
    DisallowedExtension(String),

    #[error("Contenu trop court pour être analysé ({chars} caractères)")]
    TooShort { chars: usize },

    #[error("Le contenu ressemble à du code source et non à un article ({:.0} % de lignes de code)", .ratio * 100.0)]
    CodeLike { ratio: f64 },
}

#[derive(Debug, Clone)]
pub struct Gatekeeper {
    blocked_hosts: HashSet<String>,
}

impl Default for Gatekeeper {
    fn default() -> Self {
        Self::new()
    }
}

impl Gatekeeper {
    pub fn new() -> Self {
        Self {
            blocked_hosts: BLOCKED_HOSTS.iter().map(|h| h.to_string()).collect(),
        }
    }

    /// Block an additional host (and its subdomains).
    pub fn block_host(mut self, host: impl Into<String>) -> Self {
        self.blocked_hosts.insert(host.into().to_lowercase());
        self
    }

    /// Check a URL before anything is fetched.
    pub fn validate_url(&self, url: &str) -> Result<(), Rejection> {
        let parsed = url::Url::parse(url.trim()).map_err(|_| Rejection::InvalidUrl)?;

        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(Rejection::DisallowedScheme(parsed.scheme().to_string()));
        }

        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or(Rejection::InvalidUrl)?
            .to_lowercase();

        if self.is_blocked_host(&host) {
            return Err(Rejection::BlockedHost(host));
        }

        let bare_ip = host.trim_start_matches('[').trim_end_matches(']');
        if let Ok(ip) = bare_ip.parse::<IpAddr>() {
            if is_local_ip(&ip) {
                return Err(Rejection::BlockedHost(host));
            }
        }

        let path = parsed.path().to_lowercase();
        if let Some(ext) = DISALLOWED_EXTENSIONS.iter().find(|ext| path.ends_with(*ext)) {
            return Err(Rejection::DisallowedExtension(ext.to_string()));
        }

        Ok(())
    }

    /// Check scraped text before it is scored.
    pub fn validate_content(&self, text: &str) -> Result<(), Rejection> {
        let trimmed = text.trim();
        let chars = trimmed.chars().count();
        if chars < MIN_CONTENT_CHARS {
            return Err(Rejection::TooShort { chars });
        }

        // Blank paragraph separators count toward the total.
        let total_lines = trimmed.lines().count();
        if total_lines > CODE_CHECK_MIN_LINES {
            let code_lines = trimmed
                .lines()
                .map(str::trim)
                .filter(|l| looks_like_code(l))
                .count();
            let ratio = code_lines as f64 / total_lines as f64;
            if ratio > MAX_CODE_LINE_RATIO {
                return Err(Rejection::CodeLike { ratio });
            }
        }

        Ok(())
    }

    fn is_blocked_host(&self, host: &str) -> bool {
        let host = host.strip_prefix("www.").unwrap_or(host);
        self.blocked_hosts
            .iter()
            .any(|blocked| host == blocked || host.ends_with(&format!(".{blocked}")))
    }
}

fn looks_like_code(line: &str) -> bool {
    line.ends_with(';')
        || line.ends_with('{')
        || line.ends_with('}')
        || line.contains("function")
        || line.contains("const ")
        || line.contains("import ")
}

fn is_local_ip(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => {
            v4.is_loopback() || v4.is_private() || v4.is_link_local() || v4.is_unspecified()
        }
        IpAddr::V6(v6) => {
            v6.is_loopback()
                || v6.is_unspecified()
                // fc00::/7 unique local, fe80::/10 link-local
                || (v6.segments()[0] & 0xfe00) == 0xfc00
                || (v6.segments()[0] & 0xffc0) == 0xfe80
        }
    }
}
