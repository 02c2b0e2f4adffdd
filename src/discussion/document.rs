//! Page Document: a parsed, queryable discussion page
//!
//! This module wraps a `scraper::Html` tree and exposes the handful of
//! queries the planner and extractor need:
//! - Reading the paging summary (comments per page, total comments)
//! - Locating a comment container by its display ordinal
//! - Walking direct children by class
//! - Collecting the text a node owns, with `<br>` turned into newlines

use crate::discussion::types::PagingSummary;
use crate::DiscussionError;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Selector of the paging summary element
static PAGING_SUMMARY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".forum_paging > .forum_paging_summary").expect("valid paging selector")
});

/// Selector of the per-comment permanent link (`#1`, `#2`, ...)
static PERMLINK_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".forum_comment_permlink").expect("valid permlink selector"));

/// Position of the comments-per-page value among the summary's child elements
///
/// The summary has no semantic markers for these values, only a fixed layout,
/// so both positions are validated when read.
const COMMENTS_PER_PAGE_POSITION: usize = 4;

/// Position of the thread-wide total among the summary's child elements
const TOTAL_COMMENTS_POSITION: usize = 5;

/// One rendered discussion page
pub struct PageDocument {
    html: Html,
}

impl PageDocument {
    /// Parses a raw page body
    ///
    /// HTML parsing is error-tolerant, so this never fails; structural
    /// problems surface later as `LayoutMismatch` when a query finds nothing.
    pub fn parse(body: &str) -> Self {
        Self {
            html: Html::parse_document(body),
        }
    }

    /// Reads the paging summary of this page
    ///
    /// # Returns
    ///
    /// * `Ok(PagingSummary)` - Both values were found and are numeric
    /// * `Err(DiscussionError::LayoutMismatch)` - The summary is absent or malformed
    pub fn paging_summary(&self) -> Result<PagingSummary, DiscussionError> {
        let summary = self.html.select(&PAGING_SUMMARY_SELECTOR).next().ok_or_else(|| {
            DiscussionError::LayoutMismatch("paging summary not found".to_string())
        })?;

        let children: Vec<ElementRef<'_>> = summary.children().filter_map(ElementRef::wrap).collect();

        let comments_per_page = summary_number(&children, COMMENTS_PER_PAGE_POSITION)?;
        let total_comments = summary_number(&children, TOTAL_COMMENTS_POSITION)?;

        if comments_per_page == 0 {
            return Err(DiscussionError::LayoutMismatch(
                "paging summary reports 0 comments per page".to_string(),
            ));
        }

        Ok(PagingSummary {
            comments_per_page,
            total_comments,
        })
    }

    /// Finds the container of the comment displayed as `#ordinal`
    ///
    /// Ordinals are 1-based. The permanent link label must match exactly
    /// (`#1` does not match `#10`).
    pub fn find_comment(&self, ordinal: usize) -> Option<ElementRef<'_>> {
        let label = format!("#{}", ordinal);

        self.html
            .select(&PERMLINK_SELECTOR)
            .find(|permlink| full_text(permlink) == label)
            .and_then(|permlink| permlink.parent())
            .and_then(ElementRef::wrap)
    }
}

/// Reads the integer held by the summary child at `position`
fn summary_number(children: &[ElementRef<'_>], position: usize) -> Result<usize, DiscussionError> {
    let child = children.get(position).ok_or_else(|| {
        DiscussionError::LayoutMismatch(format!(
            "paging summary has {} child elements, expected at least {}",
            children.len(),
            position + 1
        ))
    })?;

    let text = child
        .first_child()
        .and_then(|node| node.value().as_text().map(|t| t.to_string()))
        .ok_or_else(|| {
            DiscussionError::LayoutMismatch(format!(
                "paging summary child {} has no text",
                position
            ))
        })?;

    let digits: String = text.trim().chars().filter(|c| *c != ',').collect();
    digits.parse::<usize>().map_err(|_| {
        DiscussionError::LayoutMismatch(format!(
            "paging summary child {} is not a number: '{}'",
            position,
            text.trim()
        ))
    })
}

/// Returns true if the element carries the given class
pub fn has_class(element: &ElementRef<'_>, class: &str) -> bool {
    element.value().classes().any(|c| c == class)
}

/// Returns the direct child elements carrying the given class
pub fn children_with_class<'a>(element: &ElementRef<'a>, class: &str) -> Vec<ElementRef<'a>> {
    element
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| has_class(child, class))
        .collect()
}

/// Returns the first direct child element carrying the given class
pub fn child_with_class<'a>(element: &ElementRef<'a>, class: &str) -> Option<ElementRef<'a>> {
    children_with_class(element, class).into_iter().next()
}

/// Collects all descendant text of an element, trimmed
pub fn full_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Collects only the text an element owns directly, trimmed
///
/// Direct `<br>` children become `\n`; text inside child elements is skipped.
pub fn own_text(element: &ElementRef<'_>) -> String {
    let mut text = String::new();

    for child in element.children() {
        if let Some(t) = child.value().as_text() {
            text.push_str(t);
        } else if let Some(el) = child.value().as_element() {
            if el.name() == "br" {
                text.push('\n');
            }
        }
    }

    text.trim().to_string()
}
