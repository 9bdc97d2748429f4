use anyhow::{Context, Result};

use crate::pipeline::BlogPost;

/// Plain text: title, subtitle, rule, body, then the image link
pub fn format_as_text(post: &BlogPost) -> String {
    let article = &post.article;
    format!(
        "{}\n{}\n{}\n\n{}\n\nFeatured image: {}\nSource video: {}\n",
        article.title,
        article.subtitle,
        "-".repeat(article.title.chars().count().max(3)),
        article.body.trim_end(),
        post.image,
        post.video.watch_url(),
    )
}

/// Markdown article with the featured image under the headings
pub fn format_as_markdown(post: &BlogPost) -> String {
    let article = &post.article;
    format!(
        "# {}\n\n## {}\n\n![{}]({})\n\n---\n\n{}\n\n*Generated from [{}]({}) on {}.*\n",
        article.title,
        article.subtitle,
        post.image_prompt.replace(['[', ']', '\n'], " ").trim(),
        post.image,
        article.body.trim_end(),
        post.video,
        post.video.watch_url(),
        post.generated_at.format("%Y-%m-%d"),
    )
}

pub fn format_as_json(post: &BlogPost) -> Result<String> {
    serde_json::to_string_pretty(post).context("Failed to serialize blog post")
}
