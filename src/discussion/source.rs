//! Page source: the "HTTP GET with referer" primitive
//!
//! This module handles the network side of reading a discussion:
//! - The `PageSource` trait the fetcher depends on
//! - A reqwest-backed implementation with user agent and referer
//! - Building the URL of a given page of a discussion

use crate::config::{FetchConfig, UserAgentConfig};
use crate::{DiscussionError, SourceError};
use async_trait::async_trait;
use reqwest::{header::REFERER, Client};
use std::time::Duration;
use url::Url;

/// Query parameter pinning the rendering locale
const LOCALE_PARAM: &str = "l";

/// Query parameter selecting a page (1-based)
const PAGE_PARAM: &str = "ctp";

/// Anything that can GET a page body
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetches the body of `url`
    async fn get(&self, url: &Url) -> Result<String, SourceError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `fetch` - The fetch configuration (request timeout)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    fetch: &FetchConfig,
) -> Result<Client, reqwest::Error> {
    // Format: ClientName/Version (+ContactURL)
    let user_agent = format!(
        "{}/{} (+{})",
        user_agent.client_name, user_agent.client_version, user_agent.contact_url
    );

    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(fetch.request_timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// `PageSource` backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
    referer: String,
}

impl HttpPageSource {
    /// Wraps an existing client; every request carries `referer`
    pub fn new(client: Client, referer: impl Into<String>) -> Self {
        Self {
            client,
            referer: referer.into(),
        }
    }

    /// Builds the client from configuration
    pub fn from_config(
        user_agent: &UserAgentConfig,
        fetch: &FetchConfig,
    ) -> Result<Self, DiscussionError> {
        let client = build_http_client(user_agent, fetch)?;
        Ok(Self::new(client, fetch.referer.clone()))
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn get(&self, url: &Url) -> Result<String, SourceError> {
        let response = self
            .client
            .get(url.clone())
            .header(REFERER, &self.referer)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Transport("Request timeout".to_string())
                } else if e.is_connect() {
                    SourceError::Transport("Connection refused".to_string())
                } else {
                    SourceError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| SourceError::Transport(e.to_string()))
    }
}

/// Parses a discussion URL, accepting only absolute http(s) URLs
pub fn parse_discussion_url(discussion_url: &str) -> Result<Url, DiscussionError> {
    let url = Url::parse(discussion_url)
        .map_err(|e| DiscussionError::InvalidUrl(format!("'{}': {}", discussion_url, e)))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(DiscussionError::InvalidUrl(format!(
            "'{}': unsupported scheme '{}'",
            discussion_url, scheme
        ))),
    }
}

/// Builds the URL of page `page` (0-based) of a discussion
///
/// Page 0 only pins the locale; later pages add `ctp=<page + 1>`.
/// Existing query pairs are kept and any fragment is dropped.
pub fn page_url(discussion: &Url, page: usize, locale: &str) -> Url {
    let mut url = discussion.clone();
    url.set_fragment(None);

    {
        let mut query = url.query_pairs_mut();
        query.append_pair(LOCALE_PARAM, locale);
        if page > 0 {
            query.append_pair(PAGE_PARAM, &(page + 1).to_string());
        }
    }

    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn discussion() -> Url {
        Url::parse("https://steamcommunity.com/app/730/discussions/0/1234/").unwrap()
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&UserAgentConfig::default(), &FetchConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_first_page_url() {
        let url = page_url(&discussion(), 0, "en");
        assert_eq!(
            url.as_str(),
            "https://steamcommunity.com/app/730/discussions/0/1234/?l=en"
        );
    }

    #[test]
    fn test_later_page_url_is_one_based() {
        let url = page_url(&discussion(), 2, "en");
        assert_eq!(
            url.as_str(),
            "https://steamcommunity.com/app/730/discussions/0/1234/?l=en&ctp=3"
        );
    }

    #[test]
    fn test_page_url_keeps_query_and_drops_fragment() {
        let base = Url::parse("https://example.com/thread?tscn=1#c42").unwrap();
        let url = page_url(&base, 1, "en");
        assert_eq!(url.as_str(), "https://example.com/thread?tscn=1&l=en&ctp=2");
    }

    #[test]
    fn test_parse_discussion_url() {
        assert!(parse_discussion_url("https://steamcommunity.com/discussions/forum/0/1/").is_ok());
        assert!(matches!(
            parse_discussion_url("ftp://example.com/thread"),
            Err(DiscussionError::InvalidUrl(_))
        ));
        assert!(matches!(
            parse_discussion_url("not a url"),
            Err(DiscussionError::InvalidUrl(_))
        ));
    }
}
