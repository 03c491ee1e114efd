//! Application record to XML text
//!
//! This module provides:
//! - Canonical rendering of a whole record (used by `format`)
//! - Format-preserving insertion of one release (used by `add-release`)
//! - Dry-run support for both write paths

use crate::domain::{
    Block, Component, Description, Element, Inline, Node, Release, ScreenshotKind,
};
use crate::error::MetainfoError;
use quick_xml::escape::{escape, partial_escape};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const DEFAULT_INDENT: &str = "  ";

/// Elements whose content is written on one line
const INLINE_CONTAINERS: &[&str] = &["p", "li", "em", "code"];

/// Render a record as a canonical metainfo document
pub fn to_xml(component: &Component) -> String {
    let mut out = String::new();
    out.push_str(XML_DECLARATION);
    out.push('\n');
    render_element(&encode_component(component), "", DEFAULT_INDENT, &mut out);
    out
}

/// Build the element tree for a record
pub fn encode_component(component: &Component) -> Element {
    let mut root = Element::new("component").with_attr("type", component.kind.as_str());

    push_leaf(&mut root, "id", component.id.as_deref());
    push_leaf(
        &mut root,
        "metadata_license",
        component.metadata_license.as_deref(),
    );
    push_leaf(
        &mut root,
        "project_license",
        component.project_license.as_deref(),
    );
    push_leaf(&mut root, "name", component.name.as_deref());
    push_leaf(&mut root, "summary", component.summary.as_deref());

    if let Some(ref description) = component.description {
        root.push(encode_description(description));
    }

    if let Some(ref launchable) = component.launchable {
        root.push(
            Element::new("launchable")
                .with_attr("type", &launchable.kind)
                .with_text(&launchable.value),
        );
    }

    if let Some(ref developer) = component.developer {
        if developer.legacy {
            root.push(Element::new("developer_name").with_text(&developer.name));
        } else {
            let mut el = Element::new("developer");
            if let Some(ref id) = developer.id {
                el = el.with_attr("id", id);
            }
            root.push(el.with_child(Element::new("name").with_text(&developer.name)));
        }
    }

    if !component.categories.is_empty() {
        root.push(leaf_list("categories", "category", &component.categories));
    }
    if !component.keywords.is_empty() {
        root.push(leaf_list("keywords", "keyword", &component.keywords));
    }

    for url in &component.urls {
        root.push(
            Element::new("url")
                .with_attr("type", url.kind.as_str())
                .with_text(&url.value),
        );
    }

    if !component.screenshots.is_empty() {
        let mut screenshots = Element::new("screenshots");
        for shot in &component.screenshots {
            let mut el = Element::new("screenshot");
            if shot.kind == ScreenshotKind::Default {
                el = el.with_attr("type", shot.kind.as_str());
            }
            if let Some(ref caption) = shot.caption {
                el.push(Element::new("caption").with_text(caption));
            }
            for image in &shot.images {
                let mut img = Element::new("image");
                if image.explicit_kind || image.kind != Default::default() {
                    img = img.with_attr("type", image.kind.as_str());
                }
                if let Some(width) = image.width {
                    img = img.with_attr("width", width.to_string());
                }
                if let Some(height) = image.height {
                    img = img.with_attr("height", height.to_string());
                }
                el.push(img.with_text(&image.url));
            }
            screenshots.push(el);
        }
        root.push(screenshots);
    }

    if let Some(ref rating) = component.content_rating {
        let mut el = Element::new("content_rating").with_attr("type", &rating.kind);
        for attr in &rating.attributes {
            el.push(
                Element::new("content_attribute")
                    .with_attr("id", &attr.id)
                    .with_text(&attr.value),
            );
        }
        root.push(el);
    }

    if !component.releases.is_empty() {
        let mut releases = Element::new("releases");
        for release in &component.releases {
            releases.push(encode_release(release));
        }
        root.push(releases);
    }

    if !component.provides.is_empty() {
        let mut provides = Element::new("provides");
        for item in &component.provides {
            provides.push(Element::new(&item.kind).with_text(&item.value));
        }
        root.push(provides);
    }

    push_leaf(
        &mut root,
        "update_contact",
        component.update_contact.as_deref(),
    );

    for extra in &component.extra {
        root.push(extra.clone());
    }

    root
}

fn push_leaf(parent: &mut Element, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        parent.push(Element::new(name).with_text(value));
    }
}

fn leaf_list(name: &str, item: &str, values: &[String]) -> Element {
    let mut el = Element::new(name);
    for value in values {
        el.push(Element::new(item).with_text(value));
    }
    el
}

/// Build the element for one release
pub fn encode_release(release: &Release) -> Element {
    let mut el = Element::new("release").with_attr("version", &release.version);
    if let Some(ref date) = release.date {
        el = el.with_attr("date", date);
    }
    if let Some(ts) = release.timestamp {
        el = el.with_attr("timestamp", ts.to_string());
    }
    if let Some(kind) = release.kind {
        el = el.with_attr("type", kind.as_str());
    }
    if let Some(urgency) = release.urgency {
        el = el.with_attr("urgency", urgency.as_str());
    }
    if let Some(ref description) = release.description {
        el.push(encode_description(description));
    }
    if let Some(ref url) = release.url {
        el.push(Element::new("url").with_attr("type", "details").with_text(url));
    }
    el
}

/// Build a `<description>` element
pub fn encode_description(description: &Description) -> Element {
    let mut el = Element::new("description");
    for block in &description.blocks {
        match block {
            Block::Paragraph(inlines) => el.push(encode_inlines("p", inlines)),
            Block::UnorderedList(items) => el.push(encode_list("ul", items)),
            Block::OrderedList(items) => el.push(encode_list("ol", items)),
        }
    }
    el
}

fn encode_list(name: &str, items: &[Vec<Inline>]) -> Element {
    let mut list = Element::new(name);
    for item in items {
        list.push(encode_inlines("li", item));
    }
    list
}

fn encode_inlines(name: &str, inlines: &[Inline]) -> Element {
    let mut el = Element::new(name);
    for inline in inlines {
        match inline {
            Inline::Text(t) => el.children.push(Node::Text(t.clone())),
            Inline::Emphasis(t) => el.push(Element::new("em").with_text(t)),
            Inline::Code(t) => el.push(Element::new("code").with_text(t)),
        }
    }
    el
}

/// Render an element and its subtree, one element per line
///
/// Elements holding text are written on a single line so that mixed
/// content keeps its exact spacing.
pub fn render_element(element: &Element, prefix: &str, unit: &str, out: &mut String) {
    out.push_str(prefix);
    render_start_tag(element, out);

    if element.children.is_empty() {
        out.push_str("/>\n");
        return;
    }

    if holds_text(element) {
        out.push('>');
        render_inline_content(element, out);
        out.push_str("</");
        out.push_str(&element.name);
        out.push_str(">\n");
        return;
    }

    out.push_str(">\n");
    let child_prefix = format!("{}{}", prefix, unit);
    for child in element.elements() {
        render_element(child, &child_prefix, unit, out);
    }
    out.push_str(prefix);
    out.push_str("</");
    out.push_str(&element.name);
    out.push_str(">\n");
}

fn render_start_tag(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);
    for (key, value) in &element.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape(value.as_str()));
        out.push('"');
    }
}

fn holds_text(element: &Element) -> bool {
    INLINE_CONTAINERS.contains(&element.name.as_str())
        || element
            .children
            .iter()
            .any(|n| matches!(n, Node::Text(t) if !t.trim().is_empty()))
}

fn render_inline_content(element: &Element, out: &mut String) {
    for node in &element.children {
        match node {
            Node::Text(t) => out.push_str(&partial_escape(t.as_str())),
            Node::Element(child) => {
                render_start_tag(child, out);
                if child.children.is_empty() {
                    out.push_str("/>");
                } else {
                    out.push('>');
                    render_inline_content(child, out);
                    out.push_str("</");
                    out.push_str(&child.name);
                    out.push('>');
                }
            }
        }
    }
}

/// Insert a rendered `<release>` as the first child of `<releases>`
///
/// Every other byte of `content` is preserved. When the document has no
/// `<releases>` element one is created just before `</component>`.
pub fn insert_release(content: &str, release: &Release) -> Result<String, MetainfoError> {
    let element = encode_release(release);

    // <releases> or <releases .../>, attributes allowed
    let open_re = Regex::new(r"(?m)^([ \t]*)<releases(\s[^>]*)?/?>").map_err(regex_error)?;
    if let Some(caps) = open_re.captures(content) {
        let whole = caps.get(0).map(|m| m.range()).unwrap_or(0..0);
        let indent = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let unit = detect_indent_unit(content);
        let tag = &content[whole.clone()];

        if let Some(open) = tag.strip_suffix("/>") {
            // Expand the empty element, keeping its attributes
            let mut rendered = String::new();
            render_element(&element, &format!("{}{}", indent, unit), &unit, &mut rendered);

            let mut result = String::with_capacity(content.len() + rendered.len() + 16);
            result.push_str(&content[..whole.start]);
            result.push_str(open.trim_end());
            result.push_str(">\n");
            result.push_str(&rendered);
            result.push_str(indent);
            result.push_str("</releases>");
            result.push_str(&content[whole.end..]);
            return Ok(result);
        }

        // Reuse the indentation of the existing first child
        let child_indent = first_child_indent(&content[whole.end..])
            .unwrap_or_else(|| format!("{}{}", indent, unit));

        let mut rendered = String::new();
        render_element(&element, &child_indent, &unit, &mut rendered);

        let mut result = String::with_capacity(content.len() + rendered.len() + 1);
        result.push_str(&content[..whole.end]);
        result.push('\n');
        result.push_str(rendered.trim_end_matches('\n'));
        result.push_str(&content[whole.end..]);
        return Ok(result);
    }

    // No <releases> at all
    let close_re = Regex::new(r"(?m)^[ \t]*</component\s*>").map_err(regex_error)?;
    let close = close_re.find(content).ok_or_else(|| {
        MetainfoError::invalid_value(
            "document",
            "</component>",
            "closing tag not found on its own line",
        )
    })?;
    let unit = detect_indent_unit(content);
    let indent = component_child_indent(content).unwrap_or_else(|| unit.clone());
    let block = releases_block(&element, &indent, &unit);

    let mut result = String::with_capacity(content.len() + block.len());
    result.push_str(&content[..close.start()]);
    result.push_str(&block);
    result.push_str(&content[close.start()..]);
    Ok(result)
}

fn releases_block(release: &Element, indent: &str, unit: &str) -> String {
    let wrapper = Element::new("releases").with_child(release.clone());
    let mut out = String::new();
    render_element(&wrapper, indent, unit, &mut out);
    out
}

fn regex_error(e: regex::Error) -> MetainfoError {
    MetainfoError::invalid_value("pattern", e.to_string(), "failed to build pattern")
}

/// Indentation of the first line after `<releases>` that opens an element
fn first_child_indent(after_open: &str) -> Option<String> {
    let re = Regex::new(r"^[ \t]*\r?\n([ \t]*)<release[\s>/]").ok()?;
    re.captures(after_open)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Indentation of direct `<component>` children, taken from `<id>`
fn component_child_indent(content: &str) -> Option<String> {
    let re = Regex::new(r"(?m)^([ \t]*)<id>").ok()?;
    re.captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Guess the document's indentation unit from its first indented line
fn detect_indent_unit(content: &str) -> String {
    for line in content.lines() {
        let indent: String = line
            .chars()
            .take_while(|c| *c == ' ' || *c == '\t')
            .collect();
        if indent.is_empty() || line.trim().is_empty() {
            continue;
        }
        if indent.starts_with('\t') {
            return "\t".to_string();
        }
        return indent;
    }
    DEFAULT_INDENT.to_string()
}

/// Result of writing a metainfo file
#[derive(Debug, Clone)]
pub struct WriteResult {
    /// Path to the metainfo file
    pub path: PathBuf,
    /// Content before the change
    pub before: String,
    /// Content after the change
    pub after: String,
    /// Whether the file was actually modified
    pub file_modified: bool,
}

impl WriteResult {
    /// Returns true if the new content differs from the old one
    pub fn has_changes(&self) -> bool {
        self.before != self.after
    }
}

/// Writer for metainfo files
pub struct MetainfoWriter {
    /// Whether to run in dry-run mode (no file modifications)
    dry_run: bool,
}

impl MetainfoWriter {
    /// Create a new MetainfoWriter
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Check if this writer is in dry-run mode
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Rewrite a file in canonical form
    ///
    /// Refused when the file has schema problems, which the canonical form
    /// cannot represent.
    pub fn format_file(&self, path: &Path) -> Result<WriteResult, MetainfoError> {
        let before = read_text(path)?;
        let component = super::parse_metainfo(&before).map_err(|e| e.in_file(path))?;
        if let Some(issue) = component.schema_issues.first() {
            return Err(MetainfoError::invalid_value("document", &issue.tag, &issue.message)
                .in_file(path));
        }
        let after = to_xml(&component);
        self.finish(path, before, after)
    }

    /// Add a release entry to a file, keeping the rest of the text intact
    ///
    /// The release must be newer than every existing release.
    pub fn add_release(&self, path: &Path, release: &Release) -> Result<WriteResult, MetainfoError> {
        let before = read_text(path)?;
        let component = super::parse_metainfo(&before).map_err(|e| e.in_file(path))?;

        if release.parsed_version().is_none() {
            return Err(MetainfoError::invalid_value(
                "release version",
                &release.version,
                "expected dot-separated components",
            ));
        }
        if component.release(&release.version).is_some() {
            return Err(MetainfoError::DuplicateRelease {
                version: release.version.clone(),
            });
        }
        if let Some(latest) = component.latest_release() {
            if release.cmp_version(latest) != std::cmp::Ordering::Greater {
                return Err(MetainfoError::ReleaseNotNewer {
                    version: release.version.clone(),
                    latest: latest.version.clone(),
                });
            }
        }

        let after = insert_release(&before, release)?;

        // The result must still decode, with the new release first and
        // every existing release after it
        let check = super::parse_metainfo(&after).map_err(|e| e.in_file(path))?;
        if check.releases.first().map(|r| r.version.as_str()) != Some(release.version.as_str())
            || check.releases.len() != component.releases.len() + 1
        {
            return Err(MetainfoError::invalid_value(
                "releases",
                &release.version,
                "inserted release is not the first entry",
            ));
        }

        self.finish(path, before, after)
    }

    fn finish(&self, path: &Path, before: String, after: String) -> Result<WriteResult, MetainfoError> {
        let mut result = WriteResult {
            path: path.to_path_buf(),
            before,
            after,
            file_modified: false,
        };

        if result.has_changes() && !self.dry_run {
            fs::write(path, &result.after)
                .map_err(|e| MetainfoError::write_error(path, e))?;
            result.file_modified = true;
        }

        Ok(result)
    }
}

fn read_text(path: &Path) -> Result<String, MetainfoError> {
    if !path.exists() {
        return Err(MetainfoError::not_found(path));
    }
    fs::read_to_string(path).map_err(|e| MetainfoError::read_error(path, e))
}
