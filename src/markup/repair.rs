//! Markup repair and normalization
//!
//! Raw HTML (possibly malformed) goes through a few string-level fixes, is
//! parsed into a well-formed tree by html5ever via `scraper`, and matched
//! elements are copied into the owned [`Element`] tree with the configured
//! normalization applied.

use super::{Element, Node};
use crate::config::MarkupOptions;
use regex::Regex;
use scraper::{ElementRef, Html, Node as HtmlNode, Selector};
use std::borrow::Cow;
use std::sync::OnceLock;

fn self_closing_iframe() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<iframe ([^>]+?) ?/></iframe>").expect("static iframe pattern is valid")
    })
}

/// String-level fixes applied before parsing.
///
/// `<iframe src="x" /></iframe>` becomes `<iframe src="x"></iframe>`; html5ever
/// would otherwise treat the closing tag as text of an unterminated iframe.
pub fn fix_source(raw: &str) -> Cow<'_, str> {
    self_closing_iframe().replace_all(raw, "<iframe $1></iframe>")
}

/// Parse raw markup into a repaired document.
pub fn parse_document(raw: &str, options: &MarkupOptions) -> Html {
    let html = Html::parse_document(&fix_source(raw));
    if options.pad_empty_iframes {
        log_empty_iframes(&html);
    }
    html
}

fn log_empty_iframes(html: &Html) {
    let selector = match Selector::parse("iframe") {
        Ok(s) => s,
        Err(_) => return,
    };
    for iframe in html.select(&selector) {
        if iframe.children().next().is_none() {
            tracing::info!(src = iframe.value().attr("src").unwrap_or(""), "empty <iframe> padded");
        }
    }
}

/// Copy a matched element and its subtree into an owned [`Element`].
pub fn to_owned_element(element: ElementRef<'_>, options: &MarkupOptions) -> Element {
    let value = element.value();
    let mut owned = Element {
        tag: value.name().to_string(),
        attrs: value
            .attrs()
            .map(|(name, val)| (name.to_string(), val.to_string()))
            .collect(),
        children: Vec::new(),
    };
    append_children(element, &mut owned.children, options);

    if options.pad_empty_iframes && owned.tag == "iframe" && owned.children.is_empty() {
        owned.children.push(Node::Text(" ".to_string()));
    }
    owned
}

fn append_children(element: ElementRef<'_>, out: &mut Vec<Node>, options: &MarkupOptions) {
    for child in element.children() {
        match child.value() {
            HtmlNode::Element(el) => {
                let Some(child_ref) = ElementRef::wrap(child) else {
                    continue;
                };
                if options.drop_font_tags && el.name() == "font" {
                    append_children(child_ref, out, options);
                } else {
                    out.push(Node::Element(to_owned_element(child_ref, options)));
                }
            }
            HtmlNode::Text(text) => {
                // Merge with the previous text node left behind by an unwrapped <font>
                if let Some(Node::Text(prev)) = out.last_mut() {
                    prev.push_str(text);
                } else {
                    out.push(Node::Text(text.to_string()));
                }
            }
            HtmlNode::Comment(comment) if !options.hide_comments => {
                out.push(Node::Comment(comment.to_string()));
            }
            _ => {}
        }
    }
}
