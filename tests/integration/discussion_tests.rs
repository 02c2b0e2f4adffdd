//! Integration tests for discussion comment fetching
//!
//! These tests use wiremock to serve rendered discussion pages and exercise
//! the full read: page 0, paging metadata, staggered page fetches and
//! comment extraction.

use std::time::{Duration, Instant};
use sumi_discussions::config::{Config, FetchConfig};
use sumi_discussions::{get_discussion_comments, DiscussionError};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const THREAD_PATH: &str = "/app/730/discussions/0/1234/";
const PER_PAGE: usize = 15;

/// Creates a test configuration with the given stagger
fn create_test_config(page_delay_ms: u64) -> Config {
    Config {
        fetch: FetchConfig {
            page_delay_ms,
            request_timeout_secs: 5,
            ..FetchConfig::default()
        },
        ..Config::default()
    }
}

/// Body of comment `index`; every fifth comment quotes the previous one
fn comment_body(index: usize) -> String {
    if index > 0 && index % 5 == 0 {
        format!(
            r#"<blockquote class="bb_blockquote"><div class="bb_quoteauthor">Originally posted by <b>user{prev}</b>:</div>Comment {prev}</blockquote>Reply {index}<br>second line"#,
            prev = index - 1,
            index = index
        )
    } else {
        format!("Comment {}", index)
    }
}

/// Renders page `page` of a thread with `total` comments
fn render_page(page: usize, total: usize) -> String {
    let first = page * PER_PAGE;
    let last = ((page + 1) * PER_PAGE).min(total);

    let comments: String = (first..last)
        .map(|i| {
            format!(
                r#"<div class="commentthread_comment responsive_body_text" id="comment_{id}">
                    <div class="commentthread_comment_content">
                        <div class="commentthread_comment_author">
                            <a class="hoverunderline commentthread_author_link" href="https://steamcommunity.com/id/user{i}">
                                <bdi>user{i}</bdi>
                                <span class="commentthread_comment_timestamp">14 Mar, 2019 @ 3:52pm</span>
                            </a>
                        </div>
                        <div class="commentthread_comment_text">{body}</div>
                    </div>
                    <a class="forum_comment_permlink">#{ordinal}</a>
                </div>"#,
                id = 500_000 + i,
                i = i,
                body = comment_body(i),
                ordinal = i + 1
            )
        })
        .collect();

    format!(
        r#"<html><body>
        <div class="forum_paging">
            <div class="forum_paging_summary ellipsis">
                Showing <span>{shown_first}</span> - <span>{last}</span> of <span>{total}</span> comments
                <span class="pagestart">{first}</span><span class="pagesize">{per_page}</span><span class="total">{total}</span>
            </div>
        </div>
        <div class="commentthread_comments">{comments}</div>
        </body></html>"#,
        shown_first = first + 1,
        last = last,
        total = total,
        first = first,
        per_page = PER_PAGE,
        comments = comments
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

/// Mounts pages 1.. of the thread (`ctp` = page + 1), then page 0
///
/// Pages listed in `expected_pages` must be requested once per read, the
/// others never. Page mocks are mounted first so they take precedence over
/// the page 0 mock, which matches any query.
async fn mount_thread(server: &MockServer, total: usize, expected_pages: &[usize], reads: u64) {
    let page_count = total.div_ceil(PER_PAGE).max(1);

    for page in 1..page_count {
        let expected: u64 = if expected_pages.contains(&page) { reads } else { 0 };
        Mock::given(method("GET"))
            .and(path(THREAD_PATH))
            .and(query_param("l", "en"))
            .and(query_param("ctp", (page + 1).to_string()))
            .respond_with(html(render_page(page, total)))
            .expect(expected)
            .mount(server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path(THREAD_PATH))
        .and(query_param("l", "en"))
        .respond_with(html(render_page(0, total)))
        .mount(server)
        .await;
}

fn thread_url(server: &MockServer) -> String {
    format!("{}{}", server.uri(), THREAD_PATH)
}

#[tokio::test]
async fn test_range_across_three_pages() {
    let server = MockServer::start().await;
    mount_thread(&server, 100, &[1, 2], 1).await;

    let url = thread_url(&server);
    let comments = get_discussion_comments(&create_test_config(0), &url, 10, Some(40))
        .await
        .expect("Fetch failed");

    assert_eq!(comments.len(), 31);
    for (k, comment) in comments.iter().enumerate() {
        assert_eq!(comment.index, 10 + k);
        assert_eq!(comment.comment_id, (500_010 + k).to_string());
        assert_eq!(comment.comment_link, format!("{}#c{}", url, comment.comment_id));
        assert_eq!(
            comment.author_link,
            format!("https://steamcommunity.com/id/user{}", 10 + k)
        );
    }
}

#[tokio::test]
async fn test_failed_page_fails_whole_range() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(THREAD_PATH))
        .and(query_param("ctp", "2"))
        .respond_with(html(render_page(1, 100)))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(THREAD_PATH))
        .and(query_param("ctp", "3"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(THREAD_PATH))
        .respond_with(html(render_page(0, 100)))
        .mount(&server)
        .await;

    let result =
        get_discussion_comments(&create_test_config(0), &thread_url(&server), 10, Some(40)).await;

    match result {
        Err(DiscussionError::PageFetchFailed { page, message, .. }) => {
            assert_eq!(page, 2);
            assert!(message.contains("500"));
        }
        other => panic!("Expected PageFetchFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_end_zero_returns_single_comment() {
    let server = MockServer::start().await;
    mount_thread(&server, 100, &[], 1).await;

    let comments = get_discussion_comments(&create_test_config(0), &thread_url(&server), 0, Some(0))
        .await
        .expect("Fetch failed");

    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0].index, 0);
    assert_eq!(comments[0].content, "Comment 0");
}

#[tokio::test]
async fn test_unbounded_and_oversized_end_reach_last_comment() {
    let server = MockServer::start().await;
    mount_thread(&server, 20, &[1], 2).await;
    let url = thread_url(&server);
    let config = create_test_config(0);

    let unbounded = get_discussion_comments(&config, &url, 12, None)
        .await
        .expect("Fetch failed");
    let oversized = get_discussion_comments(&config, &url, 12, Some(500))
        .await
        .expect("Fetch failed");

    assert_eq!(unbounded.len(), 8);
    assert_eq!(unbounded.last().map(|c| c.index), Some(19));
    assert_eq!(unbounded, oversized);
}

#[tokio::test]
async fn test_repeated_fetch_is_identical() {
    let server = MockServer::start().await;
    mount_thread(&server, 40, &[1], 2).await;
    let url = thread_url(&server);
    let config = create_test_config(0);

    let first = get_discussion_comments(&config, &url, 3, Some(20))
        .await
        .expect("Fetch failed");
    let second = get_discussion_comments(&config, &url, 3, Some(20))
        .await
        .expect("Fetch failed");

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_quote_and_line_breaks() {
    let server = MockServer::start().await;
    mount_thread(&server, 15, &[], 1).await;

    let comments = get_discussion_comments(&create_test_config(0), &thread_url(&server), 4, Some(6))
        .await
        .expect("Fetch failed");

    assert!(!comments[0].content.contains("-------"));
    assert_eq!(
        comments[1].content,
        "Originally posted by user4:\nComment 4\n\n-------\n\nReply 5\nsecond line"
    );
    assert!(!comments[1].content.contains('<'));
    assert!(!comments[2].content.contains("-------"));
}

#[tokio::test]
async fn test_page_fetches_are_staggered() {
    let server = MockServer::start().await;
    mount_thread(&server, 50, &[1, 2], 1).await;

    let started = Instant::now();
    let comments = get_discussion_comments(&create_test_config(100), &thread_url(&server), 0, Some(44))
        .await
        .expect("Fetch failed");

    assert_eq!(comments.len(), 45);
    // Page 2 waits 2 x 100ms before its request leaves
    assert!(started.elapsed() >= Duration::from_millis(200));
}

#[tokio::test]
async fn test_referer_and_locale_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(THREAD_PATH))
        .and(query_param("l", "en"))
        .and(header("referer", "https://steamcommunity.com/"))
        .respond_with(html(render_page(0, 3)))
        .expect(1)
        .mount(&server)
        .await;

    let comments = get_discussion_comments(&create_test_config(0), &thread_url(&server), 0, None)
        .await
        .expect("Fetch failed");

    assert_eq!(comments.len(), 3);
}

#[tokio::test]
async fn test_missing_paging_summary_is_layout_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(THREAD_PATH))
        .respond_with(html("<html><body><p>Discussion removed</p></body></html>".to_string()))
        .mount(&server)
        .await;

    let result =
        get_discussion_comments(&create_test_config(0), &thread_url(&server), 0, None).await;

    assert!(matches!(result, Err(DiscussionError::LayoutMismatch(_))));
}

#[tokio::test]
async fn test_first_page_failure_is_fetch_failed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(THREAD_PATH))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result =
        get_discussion_comments(&create_test_config(0), &thread_url(&server), 0, None).await;

    match result {
        Err(e @ DiscussionError::FetchFailed { .. }) => {
            assert!(e.to_string().starts_with("Failed to load discussion"));
        }
        other => panic!("Expected FetchFailed, got {:?}", other),
    }
}
