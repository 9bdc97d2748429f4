use anyhow::Result;
use std::path::Path;

use crate::cli::OutputFormat;
use crate::pipeline::BlogPost;

pub mod formatters;

pub use formatters::*;

/// Render a blog post in the requested format
pub fn render(post: &BlogPost, format: &OutputFormat) -> Result<String> {
    let content = match format {
        OutputFormat::Text => format_as_text(post),
        OutputFormat::Markdown => format_as_markdown(post),
        OutputFormat::Json => format_as_json(post)?,
    };
    Ok(content)
}

/// Save blog post to file
pub fn save_to_file(post: &BlogPost, path: &Path, format: &OutputFormat) -> Result<()> {
    let content = render(post, format)?;
    fs_err::write(path, content)?;
    Ok(())
}

/// Print blog post to stdout
pub fn print_to_console(post: &BlogPost, format: &OutputFormat) -> Result<()> {
    let content = render(post, format)?;
    println!("{}", content);
    Ok(())
}
