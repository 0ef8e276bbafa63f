//! Rich text (Portable Text) to HTML.
//!
//! The content store returns long-form text (the full biography, project
//! write-ups) as an ordered array of typed blocks. Text blocks hold spans;
//! each span carries a list of marks that are either plain decorators
//! (`strong`, `em`, ...) or keys into the block's `markDefs` (links).
//!
//! ```json
//! [
//!   { "_type": "block", "style": "normal", "markDefs": [
//!       { "_key": "l1", "_type": "link", "href": "https://example.com" } ],
//!     "children": [
//!       { "_type": "span", "text": "Read ", "marks": [] },
//!       { "_type": "span", "text": "this", "marks": ["strong", "l1"] } ] },
//!   { "_type": "image", "asset": { "_ref": "image-ab12-800x600-jpg" }, "alt": "Desk" }
//! ]
//! ```
//!
//! ## Custom rules
//!
//! - **Images** render a `<picture>` with a WebP `<source>` and a fallback
//!   `<img class="responsive__img">`. URLs come from [`ImageUrlBuilder`].
//! - **Links** render `<a class="text-base-normal underline">`. Hrefs that
//!   are not root-relative (do not start with a single `/`) get
//!   `rel="noreferrer noopener"`; root-relative hrefs get no `rel` at all.
//!
//! Everything else follows the usual Portable Text defaults: styles map to
//! `<p>`/`<hN>`/`<blockquote>`, consecutive list items are grouped into
//! `<ul>`/`<ol>` (nested by `level`), decorators map to inline tags. Unknown
//! block types are skipped and unknown marks leave the text unwrapped.
//!
//! All text and attribute values are escaped by maud.

use crate::image_url::ImageUrlBuilder;
use crate::types::AssetRef;
use maud::{Markup, PreEscaped, html};
use serde::{Deserialize, Serialize};

/// A rich text document: an ordered list of blocks.
pub type RichText = Vec<Block>;

/// One top-level block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum Block {
    #[serde(rename = "block")]
    Text(TextBlock),
    #[serde(rename = "image")]
    Image(ImageBlock),
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextBlock {
    pub style: Option<String>,
    pub children: Vec<Span>,
    #[serde(rename = "markDefs")]
    pub mark_defs: Vec<MarkDef>,
    #[serde(rename = "listItem", skip_serializing_if = "Option::is_none")]
    pub list_item: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Span {
    pub text: String,
    pub marks: Vec<String>,
}

/// Annotation referenced from a span's `marks` by key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkDef {
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(rename = "_type")]
    pub kind: String,
    pub href: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageBlock {
    pub asset: AssetRef,
    pub alt: Option<String>,
}

/// Renders rich text for one content-store project/dataset.
pub struct RichTextRenderer {
    images: ImageUrlBuilder,
}

impl RichTextRenderer {
    pub fn new(images: ImageUrlBuilder) -> Self {
        Self { images }
    }

    /// Render a whole document to an HTML string.
    pub fn to_html(&self, blocks: &[Block]) -> String {
        self.render(blocks).into_string()
    }

    /// Render a whole document as maud markup for embedding in page templates.
    pub fn render(&self, blocks: &[Block]) -> Markup {
        let mut out = String::new();
        let mut idx = 0;
        while idx < blocks.len() {
            match &blocks[idx] {
                Block::Text(text) if text.list_item.is_some() => {
                    let end = list_run_end(blocks, idx);
                    out.push_str(&self.render_list(&blocks[idx..end], base_level(&blocks[idx..end])).0);
                    idx = end;
                    continue;
                }
                Block::Text(text) => out.push_str(&self.render_text_block(text).0),
                Block::Image(image) => out.push_str(&self.render_image(image).0),
                Block::Unknown => tracing::debug!("skipping unknown rich text block type"),
            }
            idx += 1;
        }
        PreEscaped(out)
    }

    fn render_text_block(&self, block: &TextBlock) -> Markup {
        let inner = self.render_spans(block);
        match block.style.as_deref().unwrap_or("normal") {
            "h1" => html! { h1 { (inner) } },
            "h2" => html! { h2 { (inner) } },
            "h3" => html! { h3 { (inner) } },
            "h4" => html! { h4 { (inner) } },
            "h5" => html! { h5 { (inner) } },
            "h6" => html! { h6 { (inner) } },
            "blockquote" => html! { blockquote { (inner) } },
            _ => html! { p { (inner) } },
        }
    }

    /// Render a run of list items. Items deeper than `level` nest inside the
    /// preceding item.
    fn render_list(&self, items: &[Block], level: u32) -> Markup {
        let ordered = matches!(
            items.first(),
            Some(Block::Text(TextBlock { list_item: Some(kind), .. })) if kind == "number"
        );

        let mut lis = String::new();
        let mut idx = 0;
        while idx < items.len() {
            let Block::Text(item) = &items[idx] else {
                idx += 1;
                continue;
            };
            // Collect the nested run that belongs to this item.
            let mut end = idx + 1;
            while end < items.len() && item_level(&items[end]) > level {
                end += 1;
            }
            let nested = &items[idx + 1..end];
            let li = html! {
                li {
                    (self.render_spans(item))
                    @if !nested.is_empty() {
                        (self.render_list(nested, base_level(nested)))
                    }
                }
            };
            lis.push_str(&li.0);
            idx = end;
        }

        if ordered {
            html! { ol { (PreEscaped(lis)) } }
        } else {
            html! { ul { (PreEscaped(lis)) } }
        }
    }

    fn render_spans(&self, block: &TextBlock) -> Markup {
        let mut out = String::new();
        for span in &block.children {
            let mut rendered = html! { (span.text) };
            for mark in span.marks.iter().rev() {
                rendered = self.apply_mark(mark, &block.mark_defs, rendered);
            }
            out.push_str(&rendered.0);
        }
        PreEscaped(out)
    }

    fn apply_mark(&self, mark: &str, defs: &[MarkDef], inner: Markup) -> Markup {
        match mark {
            "strong" => html! { strong { (inner) } },
            "em" => html! { em { (inner) } },
            "code" => html! { code { (inner) } },
            "underline" => html! { span style="text-decoration:underline" { (inner) } },
            "strike-through" => html! { del { (inner) } },
            key => match defs.iter().find(|d| d.key == key) {
                Some(def) if def.kind == "link" => {
                    render_link(def.href.as_deref().unwrap_or_default(), inner)
                }
                _ => {
                    tracing::debug!(mark = key, "unknown rich text mark");
                    inner
                }
            },
        }
    }

    fn render_image(&self, image: &ImageBlock) -> Markup {
        let Some(src) = self.images.url(&image.asset) else {
            tracing::debug!("rich text image without a resolvable asset");
            return html! {};
        };
        let webp = self.images.webp_url(&image.asset).unwrap_or_else(|| src.clone());
        let alt = image.alt.as_deref().unwrap_or_default();
        html! {
            picture {
                source srcset=(webp) type="image/webp";
                img.responsive__img src=(src) alt=(alt);
            }
        }
    }
}

/// Render an anchor for a link annotation.
///
/// External hrefs open without leaking the referrer. Protocol-relative
/// `//host` hrefs are external too.
pub fn render_link(href: &str, children: Markup) -> Markup {
    let root_relative = href.starts_with('/') && !href.starts_with("//");
    let rel = (!root_relative).then_some("noreferrer noopener");
    html! {
        a.text-base-normal.underline href=(href) rel=[rel] { (children) }
    }
}

fn item_level(block: &Block) -> u32 {
    match block {
        Block::Text(TextBlock { level, .. }) => level.unwrap_or(1),
        _ => 1,
    }
}

fn base_level(items: &[Block]) -> u32 {
    items.first().map(item_level).unwrap_or(1)
}

/// Index one past the last block of the list run starting at `start`.
///
/// A run continues while blocks are list items and either nest deeper than
/// the first item or share its list kind.
fn list_run_end(blocks: &[Block], start: usize) -> usize {
    let (kind, level) = match &blocks[start] {
        Block::Text(TextBlock { list_item: Some(kind), level, .. }) => (kind, level.unwrap_or(1)),
        _ => return start + 1,
    };
    let mut end = start + 1;
    while let Some(Block::Text(TextBlock { list_item: Some(next), level: next_level, .. })) =
        blocks.get(end)
    {
        let next_level = next_level.unwrap_or(1);
        if next_level > level || (next_level == level && next == kind) {
            end += 1;
        } else {
            break;
        }
    }
    end
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn renderer() -> RichTextRenderer {
        RichTextRenderer::new(ImageUrlBuilder::new("proj1", "production"))
    }

    fn doc(value: serde_json::Value) -> RichText {
        serde_json::from_value(value).unwrap()
    }

    fn link_doc(href: &str) -> RichText {
        doc(json!([{
            "_type": "block",
            "style": "normal",
            "markDefs": [{ "_key": "k1", "_type": "link", "href": href }],
            "children": [{ "_type": "span", "text": "go", "marks": ["k1"] }]
        }]))
    }

    #[test]
    fn root_relative_link_has_no_rel() {
        let html = renderer().to_html(&link_doc("/about"));
        assert!(html.contains(r#"href="/about""#));
        assert!(!html.contains("rel="));
    }

    #[test]
    fn protocol_relative_link_is_external() {
        let html = renderer().to_html(&link_doc("//evil.example/path"));
        assert!(html.contains(r#"href="//evil.example/path""#));
        assert!(html.contains(r#"rel="noreferrer noopener""#));
    }

    #[test]
    fn external_link_gets_noreferrer_noopener() {
        let html = renderer().to_html(&link_doc("https://external.com"));
        assert!(html.contains(r#"href="https://external.com""#));
        assert!(html.contains(r#"rel="noreferrer noopener""#));
        assert!(html.contains(r#"class="text-base-normal underline""#));
    }

    #[test]
    fn image_block_renders_picture_with_webp_source() {
        let blocks = doc(json!([{
            "_type": "image",
            "asset": { "_ref": "image-abc123-800x600-jpg", "_type": "reference" },
            "alt": "My desk"
        }]));
        let html = renderer().to_html(&blocks);
        assert!(html.starts_with("<picture>"));
        assert!(html.contains(r#"type="image/webp""#));
        assert!(html.contains(
            "https://cdn.sanity.io/images/proj1/production/abc123-800x600.jpg?fm=webp"
        ));
        assert!(html.contains(r#"class="responsive__img""#));
        assert!(html.contains(r#"src="https://cdn.sanity.io/images/proj1/production/abc123-800x600.jpg""#));
        assert!(html.contains(r#"alt="My desk""#));
    }

    #[test]
    fn image_without_asset_renders_nothing() {
        let blocks = doc(json!([{ "_type": "image" }]));
        assert_eq!(renderer().to_html(&blocks), "");
    }

    #[test]
    fn styles_map_to_elements() {
        let blocks = doc(json!([
            { "_type": "block", "style": "h2", "children": [{ "text": "Title" }] },
            { "_type": "block", "style": "blockquote", "children": [{ "text": "Quote" }] },
            { "_type": "block", "children": [{ "text": "Body" }] }
        ]));
        assert_eq!(
            renderer().to_html(&blocks),
            "<h2>Title</h2><blockquote>Quote</blockquote><p>Body</p>"
        );
    }

    #[test]
    fn decorators_nest_in_mark_order() {
        let blocks = doc(json!([{
            "_type": "block",
            "children": [
                { "text": "plain " },
                { "text": "both", "marks": ["strong", "em"] }
            ]
        }]));
        assert_eq!(
            renderer().to_html(&blocks),
            "<p>plain <strong><em>both</em></strong></p>"
        );
    }

    #[test]
    fn link_wraps_decorated_text() {
        let blocks = doc(json!([{
            "_type": "block",
            "markDefs": [{ "_key": "a", "_type": "link", "href": "/projects" }],
            "children": [{ "text": "see", "marks": ["a", "strong"] }]
        }]));
        let html = renderer().to_html(&blocks);
        assert!(html.contains(r#"<a class="text-base-normal underline" href="/projects"><strong>see</strong></a>"#));
    }

    #[test]
    fn unknown_mark_leaves_text() {
        let blocks = doc(json!([{
            "_type": "block",
            "children": [{ "text": "hi", "marks": ["highlight"] }]
        }]));
        assert_eq!(renderer().to_html(&blocks), "<p>hi</p>");
    }

    #[test]
    fn unknown_block_type_is_skipped() {
        let blocks = doc(json!([
            { "_type": "codeSandbox", "id": "x" },
            { "_type": "block", "children": [{ "text": "after" }] }
        ]));
        assert_eq!(renderer().to_html(&blocks), "<p>after</p>");
    }

    #[test]
    fn bullet_items_group_into_one_list() {
        let blocks = doc(json!([
            { "_type": "block", "listItem": "bullet", "level": 1, "children": [{ "text": "one" }] },
            { "_type": "block", "listItem": "bullet", "level": 1, "children": [{ "text": "two" }] },
            { "_type": "block", "children": [{ "text": "after" }] }
        ]));
        assert_eq!(
            renderer().to_html(&blocks),
            "<ul><li>one</li><li>two</li></ul><p>after</p>"
        );
    }

    #[test]
    fn numbered_list_with_nested_bullets() {
        let blocks = doc(json!([
            { "_type": "block", "listItem": "number", "level": 1, "children": [{ "text": "first" }] },
            { "_type": "block", "listItem": "bullet", "level": 2, "children": [{ "text": "detail" }] },
            { "_type": "block", "listItem": "number", "level": 1, "children": [{ "text": "second" }] }
        ]));
        assert_eq!(
            renderer().to_html(&blocks),
            "<ol><li>first<ul><li>detail</li></ul></li><li>second</li></ol>"
        );
    }

    #[test]
    fn text_is_escaped() {
        let blocks = doc(json!([{
            "_type": "block",
            "children": [{ "text": "<script>alert(1)</script>" }]
        }]));
        let html = renderer().to_html(&blocks);
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
