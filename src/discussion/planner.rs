//! Range planner
//!
//! Maps a requested comment index range onto the pages that hold it.
//! Page `p` holds indices `[p * comments_per_page, (p + 1) * comments_per_page)`,
//! and pages are assumed to be densely numbered from 0.

use crate::discussion::types::PagingSummary;
use crate::DiscussionError;
use std::ops::RangeInclusive;
use std::time::Duration;

/// A page that must be fetched in addition to page 0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageFetch {
    /// 0-based page index
    pub page: usize,

    /// How long to wait before sending the request
    pub delay: Duration,
}

/// Resolved index range and the pages it spans
///
/// Only built through [`RangePlan::new`], which rejects an empty page size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangePlan {
    comments_per_page: usize,
    start_index: usize,
    /// `None` when the resolved range is empty
    end_index: Option<usize>,
}

impl RangePlan {
    /// Resolves a requested range against the thread's paging metadata
    ///
    /// An unspecified `end_index` means "through the last comment", and a
    /// larger one is clamped to it. `Some(0)` is honored as index 0.
    /// The plan is empty if the thread has no comments or `start_index`
    /// lies past the resolved end.
    ///
    /// # Returns
    ///
    /// * `Ok(RangePlan)` - The resolved plan
    /// * `Err(DiscussionError::LayoutMismatch)` - The summary reports 0 comments per page
    pub fn new(
        summary: PagingSummary,
        start_index: usize,
        end_index: Option<usize>,
    ) -> Result<Self, DiscussionError> {
        if summary.comments_per_page == 0 {
            return Err(DiscussionError::LayoutMismatch(
                "cannot plan a range with 0 comments per page".to_string(),
            ));
        }

        let last_comment = summary.total_comments.checked_sub(1);

        let end_index = match (end_index, last_comment) {
            (_, None) => None,
            (None, Some(last)) => Some(last),
            (Some(end), Some(last)) => Some(end.min(last)),
        }
        .filter(|end| start_index <= *end);

        Ok(Self {
            comments_per_page: summary.comments_per_page,
            start_index,
            end_index,
        })
    }

    pub fn comments_per_page(&self) -> usize {
        self.comments_per_page
    }

    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Last index of the range, `None` when the range is empty
    pub fn end_index(&self) -> Option<usize> {
        self.end_index
    }

    /// Returns true if no comment falls in the resolved range
    pub fn is_empty(&self) -> bool {
        self.end_index.is_none()
    }

    /// The resolved comment indices, in ascending order
    pub fn indices(&self) -> RangeInclusive<usize> {
        match self.end_index {
            Some(end) => self.start_index..=end,
            #[allow(clippy::reversed_empty_ranges)]
            None => 1..=0,
        }
    }

    /// Page holding the given comment index
    pub fn page_of(&self, index: usize) -> usize {
        index / self.comments_per_page
    }

    /// First and last page of the range, if it is not empty
    pub fn page_span(&self) -> Option<(usize, usize)> {
        self.end_index
            .map(|end| (self.page_of(self.start_index), self.page_of(end)))
    }

    /// Pages that still have to be fetched, each with its courtesy delay
    ///
    /// Page 0 is always loaded first to read the paging metadata, so it is
    /// never part of this list. Each page waits `page_delay * page` before
    /// its request leaves, saturating at `Duration::MAX`.
    pub fn pages_to_fetch(&self, page_delay: Duration) -> Vec<PageFetch> {
        let Some((first_page, last_page)) = self.page_span() else {
            return Vec::new();
        };

        (first_page..=last_page)
            .filter(|page| *page != 0)
            .map(|page| PageFetch {
                page,
                delay: page_delay.saturating_mul(u32::try_from(page).unwrap_or(u32::MAX)),
            })
            .collect()
    }
}
