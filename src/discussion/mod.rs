//! Discussion module: reading comment ranges from paginated threads
//!
//! This module contains the core reading logic, including:
//! - Page document queries over parsed HTML
//! - Range planning (which pages hold the requested comments)
//! - Concurrent, staggered page fetching
//! - Comment extraction and text normalization

mod document;
mod extractor;
mod fetcher;
mod planner;
mod source;
mod timestamp;
mod types;

pub use document::PageDocument;
pub use extractor::{comment_content, extract_comment, extract_comments};
pub use fetcher::DiscussionClient;
pub use planner::{PageFetch, RangePlan};
pub use source::{build_http_client, page_url, parse_discussion_url, HttpPageSource, PageSource};
pub use timestamp::{decode_at, SteamTimeDecoder, TimestampDecoder};
pub use types::{Comment, PagingSummary};

use crate::config::Config;
use crate::DiscussionError;
use std::sync::Arc;

/// Fetches a comment range of a discussion over HTTP
///
/// This is the main entry point. It builds an HTTP page source from the
/// configuration and reads comments `start_index..=end_index` (or through the
/// last comment when `end_index` is `None`).
///
/// # Arguments
///
/// * `config` - User agent and fetch configuration
/// * `discussion_url` - URL of the discussion thread
/// * `start_index` - 0-based index of the first comment
/// * `end_index` - 0-based index of the last comment, `None` for "to the end"
///
/// # Returns
///
/// * `Ok(Vec<Comment>)` - The comments, in ascending index order
/// * `Err(DiscussionError)` - The read failed; no partial result is returned
pub async fn get_discussion_comments(
    config: &Config,
    discussion_url: &str,
    start_index: usize,
    end_index: Option<usize>,
) -> Result<Vec<Comment>, DiscussionError> {
    let source = HttpPageSource::from_config(&config.user_agent, &config.fetch)?;
    let client = DiscussionClient::new(Arc::new(source), &config.fetch);
    client
        .fetch_comment_range(discussion_url, start_index, end_index)
        .await
}
