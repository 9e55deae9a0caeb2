//! Index page parser and app link extraction
//!
//! The Share index wraps every app link in an element whose `class` is exactly
//! the marker token, with the `<a href>` as that element's first child:
//!
//! ```html
//! <div class="nameWrap"><a href="/app/titans-of-space">Titans of Space</a></div>
//! ```
//!
//! Extraction is a depth-first walk over the parsed tree. For each node the
//! marker's link (if any) is collected, then every child is walked in sibling
//! order. Where that link lands in the output, and how often, depends on
//! [`LinkMultiplicity`].

use ego_tree::NodeRef;
use scraper::{Html, Node, Selector};
use serde::Deserialize;
use std::borrow::Cow;

/// How often a marker node's link is emitted
///
/// `PerChild` appends a marker's link after *each* of the marker's children,
/// so a marker with `k` children yields `k` copies. `Once` appends it a single
/// time after the marker's subtree. A marker without children has no link in
/// either mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LinkMultiplicity {
    /// Append the marker's link once, after its children
    #[default]
    Once,
    /// Append the marker's link after every child
    PerChild,
}

/// Extracted information from the index page
#[derive(Debug, Clone)]
pub struct IndexPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// App links in document order (may repeat under `PerChild`)
    pub links: Vec<String>,
}

/// Parses the cached index page and extracts app links
///
/// # Arguments
///
/// * `name` - Cache file name, used in log messages
/// * `bytes` - Raw index page markup
/// * `marker` - Class attribute value wrapping each app link
/// * `mode` - Link multiplicity
///
/// HTML5 parsing accepts any input. Bytes that are not UTF-8 are decoded
/// lossily and an empty page yields no links.
///
/// # Example
///
/// ```
/// use share_ratings::crawler::{parse_index, LinkMultiplicity};
///
/// let html = br#"<div class="nameWrap"><a href="/app/foo">Foo</a></div>"#;
/// let page = parse_index("index.html", html, "nameWrap", LinkMultiplicity::Once);
/// assert_eq!(page.links, vec!["/app/foo".to_string()]);
/// ```
pub fn parse_index(
    name: &str,
    bytes: &[u8],
    marker: &str,
    mode: LinkMultiplicity,
) -> IndexPage {
    let html = String::from_utf8_lossy(bytes);
    if let Cow::Owned(_) = html {
        tracing::warn!("{} is not valid UTF-8, decoding lossily", name);
    }
    if html.trim().is_empty() {
        tracing::warn!("{} is empty", name);
    }

    let document = Html::parse_document(&html);
    let title = extract_title(&document);
    let links = extract_links(&document, marker, mode);

    IndexPage { title, links }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts app links from a whole document, starting at its root node
pub fn extract_links(document: &Html, marker: &str, mode: LinkMultiplicity) -> Vec<String> {
    let mut links = Vec::new();
    collect_links(document.tree.root(), marker, mode, &mut links);
    links
}

/// Extracts app links from the subtree rooted at `node`
pub fn extract_links_from(
    node: NodeRef<'_, Node>,
    marker: &str,
    mode: LinkMultiplicity,
) -> Vec<String> {
    let mut links = Vec::new();
    collect_links(node, marker, mode, &mut links);
    links
}

fn collect_links(
    node: NodeRef<'_, Node>,
    marker: &str,
    mode: LinkMultiplicity,
    out: &mut Vec<String>,
) {
    let local = marker_link(node, marker);

    for child in node.children() {
        collect_links(child, marker, mode, out);
        if mode == LinkMultiplicity::PerChild {
            out.extend(local.iter().cloned());
        }
    }

    if mode == LinkMultiplicity::Once {
        out.extend(local);
    }
}

/// The href of `node`'s first child, when `node` carries the marker class
fn marker_link(node: NodeRef<'_, Node>, marker: &str) -> Option<String> {
    let element = node.value().as_element()?;
    if element.attr("class") != Some(marker) {
        return None;
    }

    node.first_child()?
        .value()
        .as_element()?
        .attr("href")
        .map(str::to_string)
}
