//! Output module for rendering fetched comments
//!
//! This module handles:
//! - Rendering comments as pretty-printed JSON
//! - Rendering comments as a human-readable markdown document
//! - Writing the rendered text to a file or stdout

mod markdown;

pub use markdown::format_markdown_comments;

use crate::discussion::Comment;
use crate::DiscussionError;
use std::io::Write;
use std::path::Path;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON array of comment records
    #[default]
    Json,
    /// Markdown document, one section per comment
    Markdown,
}

/// Renders comments in the requested format
///
/// # Returns
///
/// * `Ok(String)` - The rendered document
/// * `Err(DiscussionError)` - Serialization failed
pub fn render_comments(comments: &[Comment], format: OutputFormat) -> Result<String, DiscussionError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(comments)?),
        OutputFormat::Markdown => Ok(format_markdown_comments(comments)),
    }
}

/// Writes rendered output to `path`, or to stdout when no path is given
pub fn write_output(rendered: &str, path: Option<&Path>) -> Result<(), DiscussionError> {
    match path {
        Some(path) => std::fs::write(path, rendered)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(rendered.as_bytes())?;
            if !rendered.ends_with('\n') {
                stdout.write_all(b"\n")?;
            }
        }
    }

    Ok(())
}
