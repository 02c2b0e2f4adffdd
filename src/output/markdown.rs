//! Markdown rendering of comment lists

use crate::discussion::Comment;

/// Formats comments as a markdown document
///
/// Each comment becomes a `## #<ordinal>` section with author, date and link
/// bullets, followed by its content as a block quote.
pub fn format_markdown_comments(comments: &[Comment]) -> String {
    let mut md = String::new();

    md.push_str("# Discussion Comments\n\n");

    if comments.is_empty() {
        md.push_str("_No comments in the requested range._\n");
        return md;
    }

    for comment in comments {
        md.push_str(&format!("## #{}\n\n", comment.index + 1));
        md.push_str(&format!("- **Author**: {}\n", comment.author_link));
        md.push_str(&format!(
            "- **Posted**: {}\n",
            comment.posted_date.format("%Y-%m-%d %H:%M UTC")
        ));
        md.push_str(&format!("- **Link**: {}\n\n", comment.comment_link));

        for line in comment.content.lines() {
            if line.is_empty() {
                md.push_str(">\n");
            } else {
                md.push_str(&format!("> {}\n", line));
            }
        }
        md.push('\n');
    }

    md
}
