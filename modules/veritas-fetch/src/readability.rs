// HTML -> plain text via spider_transformations Readability, after dropping
// the page furniture that would otherwise pollute lexical heuristics.

use std::sync::LazyLock;

use regex::Regex;
use spider_transformations::transformation::content::{
    transform_content_input, ReturnFormat, TransformConfig, TransformInput,
};

/// Elements removed wholesale before text extraction. Code blocks go too:
/// source listings trip the code-density gate and carry no editorial tone.
const BOILERPLATE_TAGS: &[&str] = &[
    "script", "style", "noscript", "nav", "footer", "header", "aside", "form", "iframe", "svg",
    "pre", "code",
];

static BOILERPLATE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    BOILERPLATE_TAGS
        .iter()
        .map(|tag| Regex::new(&format!(r"(?is)<{tag}\b[^>]*>.*?</{tag}\s*>")).expect("valid regex"))
        .collect()
});
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<title\b[^>]*>(.*?)</title\s*>").expect("valid regex"));
static H1_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1\b[^>]*>(.*?)</h1\s*>").expect("valid regex"));
static META_DESCRIPTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<meta\b[^>]*\bname\s*=\s*["']description["'][^>]*>"#).expect("valid regex")
});
static CONTENT_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)\bcontent\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("valid regex")
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));
static WS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Remove scripts, navigation, footers, code blocks and comments.
pub fn strip_boilerplate(html: &str) -> String {
    let mut cleaned = COMMENT_RE.replace_all(html, " ").into_owned();
    for re in BOILERPLATE_RES.iter() {
        cleaned = re.replace_all(&cleaned, " ").into_owned();
    }
    cleaned
}

/// Page title from `<title>`, falling back to the first `<h1>`.
pub fn extract_title(html: &str) -> String {
    [&*TITLE_RE, &*H1_RE]
        .iter()
        .filter_map(|re| re.captures(html))
        .map(|cap| inline_text(&cap[1]))
        .find(|t| !t.is_empty())
        .unwrap_or_default()
}

/// Content of `<meta name="description">`, empty when absent.
pub fn extract_description(html: &str) -> String {
    META_DESCRIPTION_RE
        .find(html)
        .and_then(|tag| CONTENT_ATTR_RE.captures(tag.as_str()))
        .and_then(|cap| cap.get(1).or_else(|| cap.get(2)))
        .map(|m| inline_text(m.as_str()))
        .unwrap_or_default()
}

/// Convert cleaned HTML into readable plain text using Readability extraction.
pub(crate) fn html_to_text(html: &str, url: Option<&str>) -> String {
    let parsed_url = url.and_then(|u| url::Url::parse(u).ok());
    let config = TransformConfig {
        readability: true,
        main_content: true,
        return_format: ReturnFormat::Text,
        filter_images: true,
        filter_svg: true,
        clean_html: true,
    };
    let input = TransformInput {
        url: parsed_url.as_ref(),
        content: html.as_bytes(),
        screenshot_bytes: None,
        encoding: None,
        selector_config: None,
        ignore_tags: None,
    };

    transform_content_input(input, &config)
}

/// Strip inner tags, decode common entities and collapse whitespace.
fn inline_text(fragment: &str) -> String {
    let text = TAG_RE.replace_all(fragment, " ");
    let text = decode_entities(&text);
    WS_RE.replace_all(&text, " ").trim().to_string()
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#039;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}
