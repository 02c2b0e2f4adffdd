use serde::Deserialize;

/// Main configuration structure for Sumi-Discussions
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the client
    #[serde(rename = "client-name")]
    pub client_name: String,

    /// Version of the client
    #[serde(rename = "client-version")]
    pub client_version: String,

    /// URL with information about the client
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            client_name: "SumiDiscussions".to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/about".to_string(),
        }
    }
}

/// Page fetching behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Locale pinned on every page request (`l` query parameter)
    pub locale: String,

    /// Courtesy delay per page index (milliseconds)
    #[serde(rename = "page-delay-ms")]
    pub page_delay_ms: u64,

    /// Overall timeout for a single GET (seconds)
    #[serde(rename = "request-timeout-secs")]
    pub request_timeout_secs: u64,

    /// Referer header sent with every GET
    pub referer: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            page_delay_ms: 250,
            request_timeout_secs: 30,
            referer: "https://steamcommunity.com/".to_string(),
        }
    }
}
