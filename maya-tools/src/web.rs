//! Web tools: web_search and web_fetch

use crate::base::{Result, Tool, ToolError};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 14_7_2) AppleWebKit/537.36";
const MAX_REDIRECTS: usize = 5;
const DEFAULT_FETCH_CHARS: usize = 50000;

static SCRIPT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<script[\s\S]*?</script>").unwrap());
static STYLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<style[\s\S]*?</style>").unwrap());
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());
static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<title>([\s\S]*?)</title>").unwrap());
static BODY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<body[^>]*>([\s\S]*?)</body>").unwrap());
static BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)</(p|div|section|article|li|h[1-6])>|<(br|hr)\s*/?>").unwrap());
static SPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());
static BLANKS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").unwrap());

/// Strip HTML tags and decode the common entities
fn strip_tags(html: &str) -> String {
    let text = SCRIPT_RE.replace_all(html, "");
    let text = STYLE_RE.replace_all(&text, "");
    let text = BREAK_RE.replace_all(&text, "\n");
    let text = TAG_RE.replace_all(&text, "");
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .trim()
        .to_string()
}

/// Collapse runs of spaces and blank lines
fn normalize_whitespace(text: &str) -> String {
    let text = SPACE_RE.replace_all(text, " ");
    let text = BLANKS_RE.replace_all(&text, "\n\n");
    text.trim().to_string()
}

/// Validate that a URL is http or https
fn validate_url(url: &str) -> std::result::Result<(), String> {
    let parsed = reqwest::Url::parse(url).map_err(|e| format!("Invalid URL: {}", e))?;

    match parsed.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(format!("Only http/https allowed, got '{}'", scheme)),
    }
}

/// Extract the readable text from an HTML document, title first
fn extract_readable(html: &str) -> String {
    let title = TITLE_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| strip_tags(m.as_str()))
        .unwrap_or_default();

    let body = BODY_RE
        .captures(html)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or(html);

    let content = normalize_whitespace(&strip_tags(body));

    if title.is_empty() {
        content
    } else {
        format!("# {}\n\n{}", title, content)
    }
}

/// Web search tool using the Brave Search API
pub struct WebSearchTool {
    api_key: Option<String>,
    max_results: usize,
    client: reqwest::Client,
}

impl WebSearchTool {
    /// Create a new web search tool
    pub fn new(api_key: Option<String>, max_results: usize) -> Self {
        Self {
            api_key: api_key
                .filter(|k| !k.trim().is_empty())
                .or_else(|| std::env::var("BRAVE_API_KEY").ok()),
            max_results,
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for WebSearchTool {
    fn default() -> Self {
        Self::new(None, 5)
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web. Returns titles, URLs, and snippets."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Search query"
                },
                "count": {
                    "type": "integer",
                    "description": "Number of results (1-10)",
                    "minimum": 1,
                    "maximum": 10
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, params: Value) -> Result<String> {
        let query = params
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidParams("Missing 'query' parameter".to_string()))?;

        let count = params
            .get("count")
            .and_then(|v| v.as_u64())
            .unwrap_or(self.max_results as u64)
            .clamp(1, 10) as usize;

        let api_key = self.api_key.as_ref().ok_or_else(|| {
            ToolError::ExecutionFailed("BRAVE_API_KEY not configured".to_string())
        })?;

        let count_param = count.to_string();
        let response = self
            .client
            .get("https://api.search.brave.com/res/v1/web/search")
            .query(&[("q", query), ("count", count_param.as_str())])
            .header("Accept", "application/json")
            .header("X-Subscription-Token", api_key)
            .send()
            .await
            .map_err(|e| ToolError::ExecutionFailed(format!("Request failed: {}", e)))?;

        let data: Value = response
            .json()
            .await
            .map_err(|e| ToolError::ExecutionFailed(format!("Failed to parse response: {}", e)))?;

        let results = data
            .get("web")
            .and_then(|w| w.get("results"))
            .and_then(|r| r.as_array())
            .ok_or_else(|| ToolError::ExecutionFailed("No results found".to_string()))?;

        if results.is_empty() {
            return Ok(format!("No results for: {}", query));
        }

        let mut lines = vec![format!("Results for: {}\n", query)];
        for (i, item) in results.iter().take(count).enumerate() {
            let title = item.get("title").and_then(|v| v.as_str()).unwrap_or("");
            let url = item.get("url").and_then(|v| v.as_str()).unwrap_or("");
            lines.push(format!("{}. {}\n   {}", i + 1, title, url));

            if let Some(desc) = item.get("description").and_then(|v| v.as_str()) {
                lines.push(format!("   {}", strip_tags(desc)));
            }
        }

        Ok(lines.join("\n"))
    }
}

/// Web fetch tool to extract readable content from URLs
pub struct WebFetchTool {
    max_chars: usize,
    client: reqwest::Client,
}

impl WebFetchTool {
    /// Create a new web fetch tool
    pub fn new() -> Self {
        Self {
            max_chars: DEFAULT_FETCH_CHARS,
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
        }
    }
}

impl Default for WebFetchTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for WebFetchTool {
    fn name(&self) -> &str {
        "web_fetch"
    }

    fn description(&self) -> &str {
        "Fetch a URL and extract its readable text content."
    }

    fn parameters(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "url": {
                    "type": "string",
                    "description": "URL to fetch"
                },
                "max_chars": {
                    "type": "integer",
                    "minimum": 100,
                    "description": "Maximum characters to return"
                }
            },
            "required": ["url"]
        })
    }

    async fn execute(&self, params: Value) -> Result<String> {
        let url = params
            .get("url")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidParams("Missing 'url' parameter".to_string()))?;

        let max_chars = params
            .get("max_chars")
            .and_then(|v| v.as_u64())
            .unwrap_or(self.max_chars as u64) as usize;

        if let Err(err) = validate_url(url) {
            return Err(ToolError::InvalidParams(err));
        }

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ToolError::ExecutionFailed(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ToolError::ExecutionFailed(format!(
                "{} returned {}",
                url, status
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let raw = response
            .text()
            .await
            .map_err(|e| ToolError::ExecutionFailed(format!("Failed to read response: {}", e)))?;

        let looks_like_html = content_type.contains("text/html")
            || raw.trim_start().to_lowercase().starts_with("<!doctype")
            || raw.trim_start().to_lowercase().starts_with("<html");

        let text = if content_type.contains("application/json") {
            match serde_json::from_str::<Value>(&raw) {
                Ok(value) => serde_json::to_string_pretty(&value).unwrap_or(raw),
                Err(_) => raw,
            }
        } else if looks_like_html {
            extract_readable(&raw)
        } else {
            raw
        };

        if text.len() > max_chars {
            let truncated: String = text.chars().take(max_chars).collect();
            Ok(format!("{}\n\n[truncated]", truncated))
        } else {
            Ok(text)
        }
    }
}
