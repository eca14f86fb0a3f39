// Plain HTTP page fetcher. Pages are retrieved once with a bounded timeout;
// there is no JS rendering and no retry, a failed fetch is reported as-is.

use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tracing::{info, warn};
use veritas_common::ScrapedPage;

use crate::error::{FetchError, Result};
use crate::readability::{extract_description, extract_title, html_to_text, strip_boilerplate};

pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        info!(timeout_secs = timeout.as_secs(), "HttpPageFetcher initialized");
        Ok(Self { client })
    }

    /// Fetch a page and extract its title, meta description and main text.
    pub async fn fetch(&self, url: &str) -> Result<ScrapedPage> {
        let parsed = url::Url::parse(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(FetchError::UnsupportedScheme(parsed.scheme().to_string()));
        }

        info!(url, fetcher = "http", "Fetching page");

        let resp = self
            .client
            .get(parsed)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            warn!(url, status = status.as_u16(), "Page fetch returned error status");
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_lowercase();
        if !is_html_content_type(&content_type) {
            return Err(FetchError::NotHtml { content_type });
        }

        let html = resp.text().await?;
        let page = parse_page(url, &html);

        info!(
            url,
            fetcher = "http",
            bytes = html.len(),
            text_chars = page.body_text.chars().count(),
            "Fetched successfully"
        );
        Ok(page)
    }
}

/// Build a ScrapedPage from raw HTML.
pub fn parse_page(url: &str, html: &str) -> ScrapedPage {
    let title = extract_title(html);
    let description = extract_description(html);
    let cleaned = strip_boilerplate(html);
    let body_text = html_to_text(&cleaned, Some(url)).trim().to_string();

    ScrapedPage {
        url: url.to_string(),
        title,
        description,
        body_text,
    }
}

/// Servers that omit the header are given the benefit of the doubt.
fn is_html_content_type(content_type: &str) -> bool {
    content_type.is_empty() || content_type.contains("html")
}
