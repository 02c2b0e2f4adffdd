//! Comment extractor
//!
//! Walks a resolved index range over already-fetched pages and turns each
//! comment container into a [`Comment`]. Extraction is synchronous and
//! purely local; any structural surprise is a `LayoutMismatch`.

use crate::discussion::document::{child_with_class, full_text, own_text, PageDocument};
use crate::discussion::planner::RangePlan;
use crate::discussion::timestamp::TimestampDecoder;
use crate::discussion::types::Comment;
use crate::DiscussionError;
use scraper::ElementRef;
use std::collections::BTreeMap;

/// Prefix of the comment container's `id` attribute
const COMMENT_ID_PREFIX: &str = "comment_";

/// Line placed between a quoted comment and the reply
const QUOTE_SEPARATOR: &str = "\n\n-------\n\n";

const CONTENT_CLASS: &str = "commentthread_comment_content";
const AUTHOR_CLASS: &str = "commentthread_comment_author";
const AUTHOR_LINK_CLASS: &str = "commentthread_author_link";
const TIMESTAMP_CLASS: &str = "commentthread_comment_timestamp";
const TEXT_CLASS: &str = "commentthread_comment_text";
const QUOTE_CLASS: &str = "bb_blockquote";
const QUOTE_AUTHOR_CLASS: &str = "bb_quoteauthor";

/// Extracts every comment of `plan` from the fetched pages, in index order
///
/// # Arguments
///
/// * `pages` - Parsed pages keyed by 0-based page index
/// * `plan` - The resolved range and page size
/// * `discussion_url` - Base of every `comment_link`
/// * `decoder` - Turns the rendered date label into a timestamp
///
/// # Returns
///
/// * `Ok(Vec<Comment>)` - One comment per index of the range
/// * `Err(DiscussionError::LayoutMismatch)` - A page or comment was not where expected
pub fn extract_comments(
    pages: &BTreeMap<usize, PageDocument>,
    plan: &RangePlan,
    discussion_url: &str,
    decoder: &dyn TimestampDecoder,
) -> Result<Vec<Comment>, DiscussionError> {
    plan.indices()
        .map(|index| {
            let page_index = plan.page_of(index);
            let page = pages.get(&page_index).ok_or_else(|| {
                DiscussionError::LayoutMismatch(format!(
                    "page {} holding comment {} was not fetched",
                    page_index, index
                ))
            })?;

            extract_comment(page, index, discussion_url, decoder)
        })
        .collect()
}

/// Extracts the comment at thread position `index` from `page`
pub fn extract_comment(
    page: &PageDocument,
    index: usize,
    discussion_url: &str,
    decoder: &dyn TimestampDecoder,
) -> Result<Comment, DiscussionError> {
    let container = page.find_comment(index + 1).ok_or_else(|| {
        DiscussionError::LayoutMismatch(format!("comment #{} not found on its page", index + 1))
    })?;

    let comment_id = comment_id(&container, index)?;

    let content_node = required_child(&container, CONTENT_CLASS, index)?;
    let author = required_child(&content_node, AUTHOR_CLASS, index)?;
    let author_link_node = required_child(&author, AUTHOR_LINK_CLASS, index)?;
    let text_node = required_child(&content_node, TEXT_CLASS, index)?;

    let author_link = author_link_node
        .value()
        .attr("href")
        .ok_or_else(|| {
            DiscussionError::LayoutMismatch(format!("comment #{} has no author link", index + 1))
        })?
        .to_string();

    let date_label = full_text(&required_child(&author_link_node, TIMESTAMP_CLASS, index)?);
    let posted_date = decoder.decode(&date_label).ok_or_else(|| {
        DiscussionError::LayoutMismatch(format!(
            "comment #{} has an unreadable date '{}'",
            index + 1,
            date_label
        ))
    })?;

    tracing::trace!("Extracted comment {} (id {})", index, comment_id);

    Ok(Comment {
        index,
        comment_link: format!("{}#c{}", discussion_url, comment_id),
        comment_id,
        author_link,
        posted_date,
        content: comment_content(&text_node),
    })
}

/// Builds the normalized text of a comment body
///
/// A quoted comment, if present, comes first as its author line and its
/// text, followed by the separator and then the reply itself. Only the
/// first quote block is read; further quote blocks are dropped.
pub fn comment_content(text_node: &ElementRef<'_>) -> String {
    let mut content = String::new();

    if let Some(quote) = child_with_class(text_node, QUOTE_CLASS) {
        if let Some(quote_author) = child_with_class(&quote, QUOTE_AUTHOR_CLASS) {
            content.push_str(&full_text(&quote_author));
        }
        content.push('\n');
        content.push_str(&own_text(&quote));
        content.push_str(QUOTE_SEPARATOR);
    }

    content.push_str(&own_text(text_node));

    content.trim().to_string()
}

fn comment_id(container: &ElementRef<'_>, index: usize) -> Result<String, DiscussionError> {
    container
        .value()
        .attr("id")
        .and_then(|id| id.strip_prefix(COMMENT_ID_PREFIX))
        .filter(|id| !id.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            DiscussionError::LayoutMismatch(format!(
                "comment #{} has no '{}' id",
                index + 1,
                COMMENT_ID_PREFIX
            ))
        })
}

fn required_child<'a>(
    element: &ElementRef<'a>,
    class: &str,
    index: usize,
) -> Result<ElementRef<'a>, DiscussionError> {
    child_with_class(element, class).ok_or_else(|| {
        DiscussionError::LayoutMismatch(format!("comment #{} has no .{}", index + 1, class))
    })
}
