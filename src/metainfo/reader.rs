//! Element tree to application record
//!
//! Handles:
//! - required and optional top-level fields
//! - new (`<developer>`) and legacy (`<developer_name>`) developer forms
//! - screenshots with `<image>` children or a bare URL
//! - release lists with descriptions and details URLs
//! - description markup (`<p>`, `<ul>`, `<ol>`, `<li>`, `<em>`, `<code>`)
//!
//! Missing required fields are not errors here; the validator reports them.
//! Neither are invalid markup or attribute values, which are recorded on the
//! record as schema issues. Translated elements (`xml:lang`) are skipped.

use super::tree::{parse_tree, strip_layout_whitespace};
use crate::domain::{
    Block, Component, ComponentKind, ContentAttribute, ContentRating, Description, Developer,
    Element, Image, ImageKind, Inline, Issue, Launchable, Node, Provided, Release, ReleaseKind,
    Screenshot, ScreenshotKind, Url, UrlKind, Urgency,
};
use crate::error::MetainfoError;
use tracing::debug;

const LANG_ATTR: &str = "xml:lang";

/// Parse a metainfo document
pub fn parse_metainfo(content: &str) -> Result<Component, MetainfoError> {
    let root = parse_tree(content)?;
    decode_component(&root)
}

/// Decode a `<component>` element
///
/// Only a wrong root element is an error. Values and markup that break the
/// schema are recorded in `schema_issues` and decoded as far as possible.
pub fn decode_component(root: &Element) -> Result<Component, MetainfoError> {
    if root.name != "component" {
        return Err(MetainfoError::UnexpectedRoot {
            name: root.name.clone(),
        });
    }

    let mut component = Component {
        kind: root
            .attr("type")
            .map(ComponentKind::from_attr)
            .unwrap_or_default(),
        ..Default::default()
    };
    let mut issues = Vec::new();
    let mut seen_releases = false;

    for child in untranslated(root) {
        match child.name.as_str() {
            "id" => component.id = Some(child.trimmed_text()),
            "metadata_license" => component.metadata_license = Some(child.trimmed_text()),
            "project_license" => component.project_license = Some(child.trimmed_text()),
            "name" => component.name = Some(child.trimmed_text()),
            "summary" => component.summary = Some(child.trimmed_text()),
            "description" => {
                component.description = Some(decode_description(child, "description", &mut issues))
            }
            "launchable" => {
                component.launchable = Some(Launchable {
                    kind: child.attr("type").unwrap_or("desktop-id").to_string(),
                    value: child.trimmed_text(),
                })
            }
            "developer" => {
                let name = untranslated(child)
                    .find(|e| e.name == "name")
                    .map(|e| e.trimmed_text())
                    .unwrap_or_default();
                component.developer = Some(Developer {
                    id: child.attr("id").map(str::to_string),
                    name,
                    legacy: false,
                });
            }
            "developer_name" => {
                component.developer = Some(Developer {
                    id: None,
                    name: child.trimmed_text(),
                    legacy: true,
                })
            }
            "url" => component.urls.push(Url {
                kind: UrlKind::from_attr(child.attr("type").unwrap_or("")),
                value: child.trimmed_text(),
            }),
            "categories" => component.categories = leaf_texts(child, "category"),
            "keywords" => component.keywords = leaf_texts(child, "keyword"),
            "screenshots" => component.screenshots = decode_screenshots(child, &mut issues),
            "content_rating" => component.content_rating = Some(decode_content_rating(child)),
            "releases" => {
                if seen_releases {
                    issues.push(Issue::error(
                        "releases-element-duplicate",
                        "more than one <releases> element; their entries were merged",
                    ));
                }
                seen_releases = true;
                component
                    .releases
                    .extend(decode_releases(child, &mut issues));
            }
            "provides" => {
                component.provides = child
                    .elements()
                    .map(|e| Provided {
                        kind: e.name.clone(),
                        value: e.trimmed_text(),
                    })
                    .collect()
            }
            // "updatecontact" is an old misspelling still found in the wild
            "update_contact" | "updatecontact" => {
                component.update_contact = Some(child.trimmed_text())
            }
            other => {
                debug!(tag = other, "keeping unknown element");
                let mut kept = child.clone();
                strip_layout_whitespace(&mut kept);
                component.extra.push(kept);
            }
        }
    }

    if !issues.is_empty() {
        debug!(count = issues.len(), "schema problems while decoding");
    }
    component.schema_issues = issues;
    Ok(component)
}

/// Child elements without an `xml:lang` attribute
fn untranslated(element: &Element) -> impl Iterator<Item = &Element> {
    element.elements().filter(|e| {
        let translated = e.attr(LANG_ATTR).is_some();
        if translated {
            debug!(tag = %e.name, "skipping translated element");
        }
        !translated
    })
}

fn leaf_texts(element: &Element, name: &str) -> Vec<String> {
    untranslated(element)
        .filter(|e| e.name == name)
        .map(|e| e.trimmed_text())
        .collect()
}

fn decode_content_rating(element: &Element) -> ContentRating {
    ContentRating {
        kind: element.attr("type").unwrap_or("oars-1.0").to_string(),
        attributes: element
            .elements()
            .filter(|e| e.name == "content_attribute")
            .map(|e| ContentAttribute {
                id: e.attr("id").unwrap_or_default().to_string(),
                value: e.trimmed_text(),
            })
            .collect(),
    }
}

fn decode_screenshots(element: &Element, issues: &mut Vec<Issue>) -> Vec<Screenshot> {
    let mut screenshots = Vec::new();

    for (index, shot) in element
        .elements()
        .filter(|e| e.name == "screenshot")
        .enumerate()
    {
        let mut screenshot = Screenshot {
            kind: ScreenshotKind::from_attr(shot.attr("type")),
            caption: None,
            images: Vec::new(),
        };

        for child in untranslated(shot) {
            match child.name.as_str() {
                "caption" => screenshot.caption = Some(child.trimmed_text()),
                "image" => screenshot.images.push(Image {
                    kind: ImageKind::from_attr(child.attr("type")),
                    width: parse_dimension(child, "width", index + 1, issues),
                    height: parse_dimension(child, "height", index + 1, issues),
                    url: child.trimmed_text(),
                    explicit_kind: child.attr("type").is_some(),
                }),
                other => debug!(tag = other, "ignoring screenshot child"),
            }
        }

        // Legacy form: <screenshot>https://...</screenshot>
        if screenshot.images.is_empty() {
            let bare = direct_text(shot);
            if !bare.is_empty() {
                screenshot.images.push(Image::new(bare));
            }
        }

        screenshots.push(screenshot);
    }

    screenshots
}

fn parse_dimension(
    element: &Element,
    attr: &str,
    number: usize,
    issues: &mut Vec<Issue>,
) -> Option<u32> {
    let raw = element.attr(attr)?;
    match raw.trim().parse::<u32>() {
        Ok(value) => Some(value),
        Err(_) => {
            issues.push(Issue::error(
                "screenshot-image-size-invalid",
                format!(
                    "screenshot {} image {} '{}' is not a pixel count",
                    number, attr, raw
                ),
            ));
            None
        }
    }
}

/// Text nodes directly under an element, trimmed
fn direct_text(element: &Element) -> String {
    element
        .children
        .iter()
        .filter_map(|n| match n {
            Node::Text(t) => Some(t.as_str()),
            Node::Element(_) => None,
        })
        .collect::<String>()
        .trim()
        .to_string()
}

fn decode_releases(element: &Element, issues: &mut Vec<Issue>) -> Vec<Release> {
    let mut releases = Vec::new();

    for child in element.elements() {
        if child.name != "release" {
            debug!(tag = %child.name, "ignoring non-release element in <releases>");
            continue;
        }
        releases.push(decode_release(child, issues));
    }

    releases
}

fn decode_release(element: &Element, issues: &mut Vec<Issue>) -> Release {
    let mut release = Release::new(element.attr("version").unwrap_or_default().trim());
    release.date = element.attr("date").map(|d| d.trim().to_string());

    if let Some(raw) = element.attr("timestamp") {
        match raw.trim().parse::<i64>() {
            Ok(ts) => release.timestamp = Some(ts),
            Err(_) => issues.push(Issue::error(
                "release-timestamp-invalid",
                format!(
                    "release {} has timestamp '{}', expected seconds since the epoch",
                    release.version, raw
                ),
            )),
        }
    }

    if let Some(raw) = element.attr("type") {
        release.kind = ReleaseKind::from_attr(raw.trim());
        if release.kind.is_none() {
            issues.push(Issue::error(
                "release-type-invalid",
                format!(
                    "release {} has type '{}', expected stable, development or snapshot",
                    release.version, raw
                ),
            ));
        }
    }

    if let Some(raw) = element.attr("urgency") {
        release.urgency = Urgency::from_attr(raw.trim());
        if release.urgency.is_none() {
            issues.push(Issue::error(
                "release-urgency-invalid",
                format!(
                    "release {} has urgency '{}', expected low, medium, high or critical",
                    release.version, raw
                ),
            ));
        }
    }

    for child in untranslated(element) {
        match child.name.as_str() {
            "description" => {
                let context = format!("release {} description", release.version);
                release.description = Some(decode_description(child, &context, issues));
            }
            "url" => release.url = Some(child.trimmed_text()),
            other => debug!(tag = other, version = %release.version, "ignoring release child"),
        }
    }

    release
}

fn markup_issue(context: &str, message: String) -> Issue {
    Issue::error("description-markup-invalid", format!("{}: {}", context, message))
}

/// Decode a `<description>` element into blocks
///
/// Markup outside `<p>`, `<ul>`, `<ol>`, `<li>`, `<em>` and `<code>` is
/// reported as a `description-markup-invalid` issue. Its text is kept as
/// plain paragraph or item content.
pub fn decode_description(element: &Element, context: &str, issues: &mut Vec<Issue>) -> Description {
    let mut blocks = Vec::new();

    for node in &element.children {
        let child = match node {
            Node::Text(t) if t.trim().is_empty() => continue,
            Node::Text(t) => {
                issues.push(markup_issue(
                    context,
                    format!("text '{}' is not inside <p> or <li>", t.trim()),
                ));
                blocks.push(Block::Paragraph(normalize_inlines(vec![Inline::Text(
                    t.clone(),
                )])));
                continue;
            }
            Node::Element(e) => e,
        };
        if child.attr(LANG_ATTR).is_some() {
            continue;
        }

        match child.name.as_str() {
            "p" => blocks.push(Block::Paragraph(decode_inlines(child, context, issues))),
            "ul" => blocks.push(Block::UnorderedList(decode_items(child, context, issues))),
            "ol" => blocks.push(Block::OrderedList(decode_items(child, context, issues))),
            other => {
                issues.push(markup_issue(
                    context,
                    format!("<{}> is not allowed, only <p>, <ul> and <ol>", other),
                ));
                blocks.push(Block::Paragraph(normalize_inlines(vec![Inline::Text(
                    child.text(),
                )])));
            }
        }
    }

    Description::new(blocks)
}

fn decode_items(list: &Element, context: &str, issues: &mut Vec<Issue>) -> Vec<Vec<Inline>> {
    let mut items = Vec::new();
    for node in &list.children {
        match node {
            Node::Text(t) if t.trim().is_empty() => {}
            Node::Text(t) => {
                issues.push(markup_issue(
                    context,
                    format!("text '{}' in <{}> is not inside <li>", t.trim(), list.name),
                ));
                items.push(normalize_inlines(vec![Inline::Text(t.clone())]));
            }
            Node::Element(e) if e.attr(LANG_ATTR).is_some() => {}
            Node::Element(e) if e.name == "li" => items.push(decode_inlines(e, context, issues)),
            Node::Element(e) => {
                issues.push(markup_issue(
                    context,
                    format!("<{}> in <{}> is not allowed, only <li>", e.name, list.name),
                ));
                items.push(normalize_inlines(vec![Inline::Text(e.text())]));
            }
        }
    }
    items
}

fn decode_inlines(element: &Element, context: &str, issues: &mut Vec<Issue>) -> Vec<Inline> {
    let mut raw = Vec::new();
    for node in &element.children {
        match node {
            Node::Text(t) => raw.push(Inline::Text(t.clone())),
            Node::Element(e) if e.name == "em" && e.is_leaf() => raw.push(Inline::Emphasis(e.text())),
            Node::Element(e) if e.name == "code" && e.is_leaf() => raw.push(Inline::Code(e.text())),
            Node::Element(e) => {
                issues.push(markup_issue(
                    context,
                    format!(
                        "<{}> inside <{}> is not allowed, only <em> and <code>",
                        e.name, element.name
                    ),
                ));
                raw.push(Inline::Text(e.text()));
            }
        }
    }
    normalize_inlines(raw)
}

/// Collapse whitespace runs to one space and trim at the block edges
pub fn normalize_inlines(raw: Vec<Inline>) -> Vec<Inline> {
    let mut out: Vec<Inline> = Vec::new();

    for inline in raw {
        let mut text = collapse_whitespace(inline.text());
        let previous_ends_with_space = out.last().is_some_and(|p| p.text().ends_with(' '));
        if previous_ends_with_space && text.starts_with(' ') {
            text.remove(0);
        }
        if text.is_empty() {
            continue;
        }
        let merge = matches!(
            (out.last(), &inline),
            (Some(Inline::Text(_)), Inline::Text(_))
        );
        if merge {
            if let Some(Inline::Text(prev)) = out.last_mut() {
                prev.push_str(&text);
            }
            continue;
        }
        out.push(match inline {
            Inline::Text(_) => Inline::Text(text),
            Inline::Emphasis(_) => Inline::Emphasis(text),
            Inline::Code(_) => Inline::Code(text),
        });
    }

    while let Some(first) = out.first_mut() {
        let trimmed = with_text(first, |t| t.trim_start().to_string());
        if trimmed {
            out.remove(0);
        } else {
            break;
        }
    }
    while let Some(last) = out.last_mut() {
        let trimmed = with_text(last, |t| t.trim_end().to_string());
        if trimmed {
            out.pop();
        } else {
            break;
        }
    }

    out
}

/// Rewrite an inline's text; returns true if it became empty
fn with_text(inline: &mut Inline, f: impl Fn(&str) -> String) -> bool {
    let text = match inline {
        Inline::Text(s) | Inline::Emphasis(s) | Inline::Code(s) => s,
    };
    *text = f(text);
    text.is_empty()
}

fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out
}
