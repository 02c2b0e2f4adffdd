use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single comment of a discussion thread
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    /// Zero-based position of the comment within the whole thread
    pub index: usize,

    /// Bare comment id, without the markup prefix
    pub comment_id: String,

    /// Deep link to this comment (`<discussion url>#c<comment id>`)
    pub comment_link: String,

    /// Profile URL of the author, verbatim from the markup
    pub author_link: String,

    /// When the comment was posted
    pub posted_date: DateTime<Utc>,

    /// Normalized text, with any quoted comment prepended
    pub content: String,
}

/// Paging metadata read from a rendered discussion page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingSummary {
    /// Number of comments rendered per page
    pub comments_per_page: usize,

    /// Number of comments in the whole thread
    pub total_comments: usize,
}
