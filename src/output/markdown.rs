//! HTML to markdown conversion
//!
//! This module renders the readable parts of a documentation page (title,
//! headings, paragraphs, list items and code blocks) as markdown.

use crate::output::traits::ContentConverter;
use crate::HarvestError;
use scraper::{ElementRef, Html, Selector};

const BLOCK_SELECTOR: &str = "h1, h2, h3, h4, h5, h6, p, li, pre";

/// Markdown converter backed by `scraper`
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownConverter;

impl ContentConverter for MarkdownConverter {
    fn to_artifact(&self, raw: &str, url: &str) -> Result<String, HarvestError> {
        Ok(format_markdown(raw, url))
    }
}

/// Formats an HTML page as markdown
///
/// # Arguments
///
/// * `html` - The rendered page
/// * `url` - Canonical URL, recorded as the source line
///
/// # Returns
///
/// A markdown document. Input without any recognised block elements is
/// written verbatim below the source line.
///
/// # Example
///
/// ```
/// use doc_ripple::output::format_markdown;
///
/// let html = "<html><head><title>View</title></head><body><p>A piece of UI.</p></body></html>";
/// let md = format_markdown(html, "https://example.com/docs/view");
/// assert!(md.starts_with("# View\n"));
/// assert!(md.contains("A piece of UI."));
/// ```
pub fn format_markdown(html: &str, url: &str) -> String {
    let document = Html::parse_document(html);
    let mut md = String::new();

    if let Some(title) = extract_title(&document) {
        md.push_str(&format!("# {}\n\n", title));
    }
    md.push_str(&format!("Source: <{}>\n\n", url));

    let blocks = extract_blocks(&document);
    if blocks.is_empty() {
        md.push_str(html.trim());
        md.push('\n');
    } else {
        md.push_str(&blocks.join("\n\n"));
        md.push('\n');
    }

    md
}

fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;
    document
        .select(&selector)
        .next()
        .map(|element| collapse_whitespace(&element.text().collect::<String>()))
        .filter(|s| !s.is_empty())
}

fn extract_blocks(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse(BLOCK_SELECTOR) else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter(|element| !inside_rendered_block(element))
        .filter_map(render_block)
        .collect()
}

/// Text inside `pre` and `li` is already emitted by the enclosing block
fn inside_rendered_block(element: &ElementRef) -> bool {
    element.ancestors().any(|node| {
        node.value()
            .as_element()
            .map(|e| matches!(e.name(), "pre" | "li"))
            .unwrap_or(false)
    })
}

fn render_block(element: ElementRef) -> Option<String> {
    let name = element.value().name();

    if name == "pre" {
        let code = element.text().collect::<String>();
        let code = code.trim_matches('\n');
        if code.trim().is_empty() {
            return None;
        }
        return Some(format!("```\n{}\n```", code));
    }

    let text = collapse_whitespace(&element.text().collect::<String>());
    if text.is_empty() {
        return None;
    }

    match name {
        "li" => Some(format!("- {}", text)),
        "p" => Some(text),
        heading => {
            let level = heading[1..].parse::<usize>().unwrap_or(1);
            Some(format!("{} {}", "#".repeat(level), text))
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
