//! Range fetcher
//!
//! This module drives a complete range read:
//! 1. GET page 0 and read the paging summary
//! 2. Plan the range and the extra pages it spans
//! 3. GET the extra pages concurrently, each after its courtesy delay
//! 4. Extract the comments once every page has arrived
//!
//! The first failure ends the read; pages already fetched are dropped and
//! fetches still in flight are aborted.

use crate::config::FetchConfig;
use crate::discussion::document::PageDocument;
use crate::discussion::extractor::extract_comments;
use crate::discussion::planner::{PageFetch, RangePlan};
use crate::discussion::source::{page_url, parse_discussion_url, PageSource};
use crate::discussion::timestamp::{SteamTimeDecoder, TimestampDecoder};
use crate::discussion::types::Comment;
use crate::{DiscussionError, SourceError};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use url::Url;

/// Reads comment ranges of discussions through a `PageSource`
pub struct DiscussionClient {
    source: Arc<dyn PageSource>,
    decoder: Arc<dyn TimestampDecoder>,
    locale: String,
    page_delay: Duration,
}

impl DiscussionClient {
    /// Creates a client using the default Steam date decoder
    ///
    /// # Arguments
    ///
    /// * `source` - Performs the GET requests
    /// * `config` - Locale and courtesy delay
    pub fn new(source: Arc<dyn PageSource>, config: &FetchConfig) -> Self {
        Self {
            source,
            decoder: Arc::new(SteamTimeDecoder),
            locale: config.locale.clone(),
            page_delay: Duration::from_millis(config.page_delay_ms),
        }
    }

    /// Replaces the date decoder
    pub fn with_decoder(mut self, decoder: Arc<dyn TimestampDecoder>) -> Self {
        self.decoder = decoder;
        self
    }

    /// Fetches comments `start_index..=end_index` of a discussion
    ///
    /// `end_index` of `None` means "through the last comment"; values past
    /// the end are clamped to it.
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<Comment>)` - The comments, in ascending index order
    /// * `Err(DiscussionError::FetchFailed)` - Page 0 could not be loaded
    /// * `Err(DiscussionError::PageFetchFailed)` - A later page could not be loaded
    /// * `Err(DiscussionError::LayoutMismatch)` - The markup was not as expected
    ///
    /// # Example
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use sumi_discussions::config::Config;
    /// use sumi_discussions::{DiscussionClient, HttpPageSource};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let config = Config::default();
    /// let source = HttpPageSource::from_config(&config.user_agent, &config.fetch)?;
    /// let client = DiscussionClient::new(Arc::new(source), &config.fetch);
    ///
    /// let comments = client
    ///     .fetch_comment_range("https://steamcommunity.com/app/730/discussions/0/1234/", 0, Some(9))
    ///     .await?;
    /// println!("Fetched {} comments", comments.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn fetch_comment_range(
        &self,
        discussion_url: &str,
        start_index: usize,
        end_index: Option<usize>,
    ) -> Result<Vec<Comment>, DiscussionError> {
        let discussion = parse_discussion_url(discussion_url)?;

        tracing::info!(
            "Fetching comments {}..={} of {}",
            start_index,
            end_index.map_or_else(|| "end".to_string(), |end| end.to_string()),
            discussion_url
        );

        let first_url = page_url(&discussion, 0, &self.locale);
        let first_body = self.source.get(&first_url).await.map_err(|e| {
            DiscussionError::FetchFailed {
                url: discussion_url.to_string(),
                message: e.to_string(),
            }
        })?;

        // Parsed trees are not Send, so page 0 is parsed again after the awaits below
        let summary = PageDocument::parse(&first_body).paging_summary()?;
        tracing::debug!(
            "Paging: {} comments per page, {} comments total",
            summary.comments_per_page,
            summary.total_comments
        );

        let plan = RangePlan::new(summary, start_index, end_index)?;
        if plan.is_empty() {
            tracing::info!("Requested range is empty, nothing to extract");
            return Ok(Vec::new());
        }

        let fetches = plan.pages_to_fetch(self.page_delay);
        let mut bodies = self
            .fetch_pages(&discussion, discussion_url, &fetches)
            .await?;
        bodies.insert(0, first_body);

        let pages: BTreeMap<usize, PageDocument> = bodies
            .iter()
            .map(|(page, body)| (*page, PageDocument::parse(body)))
            .collect();

        let comments = extract_comments(&pages, &plan, discussion_url, self.decoder.as_ref())?;

        tracing::info!(
            "Fetched {} comments from {} pages",
            comments.len(),
            pages.len()
        );

        Ok(comments)
    }

    /// Fetches the planned pages concurrently
    ///
    /// Every fetch runs as its own task and sleeps for its delay first.
    /// Results land in disjoint keys of the returned map. The first error
    /// returns immediately; dropping the `JoinSet` aborts the rest.
    async fn fetch_pages(
        &self,
        discussion: &Url,
        discussion_url: &str,
        fetches: &[PageFetch],
    ) -> Result<BTreeMap<usize, String>, DiscussionError> {
        let mut tasks = JoinSet::new();

        for fetch in fetches {
            let source = Arc::clone(&self.source);
            let url = page_url(discussion, fetch.page, &self.locale);
            let PageFetch { page, delay } = *fetch;

            tracing::debug!("Scheduling page {} in {:?}", page, delay);

            tasks.spawn(async move {
                tokio::time::sleep(delay).await;
                let result = source.get(&url).await;
                (page, result)
            });
        }

        let mut bodies = BTreeMap::new();

        while let Some(joined) = tasks.join_next().await {
            // A join error does not say which page it belonged to; report the
            // lowest page that never completed.
            let (page, result): (usize, Result<String, SourceError>) =
                joined.map_err(|e| DiscussionError::PageFetchFailed {
                    url: discussion_url.to_string(),
                    page: fetches
                        .iter()
                        .map(|fetch| fetch.page)
                        .find(|page| !bodies.contains_key(page))
                        .unwrap_or_default(),
                    message: format!("fetch task failed: {}", e),
                })?;

            match result {
                Ok(body) => {
                    tracing::debug!("Fetched page {}", page);
                    bodies.insert(page, body);
                }
                Err(e) => {
                    tracing::warn!("Failed to fetch page {} of {}: {}", page, discussion_url, e);
                    return Err(DiscussionError::PageFetchFailed {
                        url: discussion_url.to_string(),
                        page,
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(bodies)
    }
}
