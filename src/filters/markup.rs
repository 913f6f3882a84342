//! Markup filters: text and markup rendering, structural cleanup, attributes
//!
//! Structural filters never edit the element they receive; they clone it and
//! return the edited copy.

use super::{expect_node, expect_text, FilterResult};
use crate::markup::{Element, Node};
use crate::value::Value;

const NBSP: char = '\u{a0}';

/// Node -> text with tags stripped and entities decoded; NBSP becomes a
/// space and the result is trimmed. Scalars get the same cleanup.
pub fn inner_text(value: Value) -> FilterResult {
    let text = match &value {
        Value::Node(el) => el.text(),
        other => expect_text(other)?,
    };
    Ok(Value::Text(text.replace(NBSP, " ").trim().to_string()))
}

/// Node -> serialized markup including its own tags.
pub fn html(value: Value) -> FilterResult {
    Ok(Value::Text(expect_node(&value)?.outer_html()))
}

/// Node -> serialized markup of its children. Bare leading text gets a `<p>`
/// prefix so the fragment starts with a block.
pub fn inner_html(value: Value) -> FilterResult {
    let markup = expect_node(&value)?.inner_html();
    let markup = markup.trim();
    if !markup.is_empty() && !markup.starts_with('<') {
        return Ok(Value::Text(format!("<p>{}", markup)));
    }
    Ok(Value::Text(markup.to_string()))
}

/// `<a><b></b></a>` -> `<b></b>`. Nodes are serialized first.
pub fn remove_root(value: Value) -> FilterResult {
    let markup = match &value {
        Value::Node(el) => el.outer_html(),
        other => expect_text(other)?,
    };
    if markup.trim().is_empty() {
        return Ok(Value::Text(String::new()));
    }
    let Some(open_end) = markup.find('>') else {
        return Err("no root element found".to_string());
    };
    let rest = &markup[open_end + 1..];
    let inner = match rest.rfind('<') {
        Some(close_start) => &rest[..close_start],
        None => "",
    };
    Ok(Value::Text(inner.to_string()))
}

pub fn remove_class(value: Value) -> FilterResult {
    strip_attribute(value, "class")
}

pub fn remove_style(value: Value) -> FilterResult {
    strip_attribute(value, "style")
}

fn strip_attribute(value: Value, name: &str) -> FilterResult {
    edit_copy(&value, |el| {
        el.for_each_descendant_mut(&mut |child: &mut Element| child.remove_attr(name))
    })
}

pub fn remove_h1s(value: Value) -> FilterResult {
    remove_tag(value, "h1")
}

pub fn remove_imgs(value: Value) -> FilterResult {
    remove_tag(value, "img")
}

fn remove_tag(value: Value, tag: &str) -> FilterResult {
    edit_copy(&value, |el| {
        el.retain_descendants(&mut |node: &Node| !is_element(node, tag))
    })
}

pub fn all_nbsp_to_space(value: Value) -> FilterResult {
    edit_copy(&value, |el| {
        replace_nbsp(el);
        el.for_each_descendant_mut(&mut replace_nbsp)
    })
}

fn replace_nbsp(el: &mut Element) {
    for child in &mut el.children {
        if let Node::Text(text) = child {
            if text.contains(NBSP) {
                *text = text.replace(NBSP, " ");
            }
        }
    }
}

/// Drop `<p>` elements that hold nothing but whitespace, possibly wrapped
/// in `<span>`.
pub fn remove_empty_p(value: Value) -> FilterResult {
    edit_copy(&value, |el| {
        el.retain_descendants(&mut |node: &Node| match node {
            Node::Element(p) if p.tag == "p" => !is_blank(p),
            _ => true,
        })
    })
}

fn is_blank(el: &Element) -> bool {
    el.children.iter().all(|child| match child {
        Node::Text(text) => text.chars().all(|c| c.is_whitespace() || c == NBSP),
        Node::Element(span) if span.tag == "span" => is_blank(span),
        Node::Element(_) => false,
        Node::Comment(_) => true,
    })
}

/// Drop `<br>` runs (and the whitespace around them) at the end of every
/// `<p>` and `<div>`.
pub fn remove_unnecessary_br(value: Value) -> FilterResult {
    edit_copy(&value, |el| {
        trim_trailing_br(el);
        el.for_each_descendant_mut(&mut trim_trailing_br)
    })
}

fn trim_trailing_br(el: &mut Element) {
    if el.tag != "p" && el.tag != "div" {
        return;
    }
    let mut end = el.children.len();
    let mut cut = None;
    while end > 0 {
        match &el.children[end - 1] {
            Node::Element(br) if br.tag == "br" => {
                end -= 1;
                cut = Some(end);
            }
            Node::Text(text) if text.trim().is_empty() => end -= 1,
            _ => break,
        }
    }
    let Some(cut) = cut else {
        return;
    };
    el.children.truncate(cut);

    // Whitespace before the first removed <br> goes with it
    let emptied = match el.children.last_mut() {
        Some(Node::Text(text)) => {
            let len = text.trim_end().len();
            text.truncate(len);
            text.is_empty()
        }
        _ => false,
    };
    if emptied {
        el.children.pop();
    }
}

/// Rename every `<div>`, the node itself included, to `<p>`.
pub fn change_div_to_p(value: Value) -> FilterResult {
    fn rename(el: &mut Element) {
        if el.tag == "div" {
            el.tag = "p".to_string();
        }
    }
    edit_copy(&value, |el| {
        rename(el);
        el.for_each_descendant_mut(&mut rename)
    })
}

pub fn attrib_src(value: Value) -> FilterResult {
    attribute(value, "src")
}

pub fn attrib_content(value: Value) -> FilterResult {
    attribute(value, "content")
}

pub fn attrib_alt(value: Value) -> FilterResult {
    attribute(value, "alt")
}

pub fn attrib_href(value: Value) -> FilterResult {
    attribute(value, "href")
}

pub fn attrib_data_href(value: Value) -> FilterResult {
    attribute(value, "data-href")
}

pub fn attrib_title(value: Value) -> FilterResult {
    attribute(value, "title")
}

pub fn attrib_data_description(value: Value) -> FilterResult {
    attribute(value, "data-description")
}

/// Attribute value, empty when the attribute is absent.
fn attribute(value: Value, name: &str) -> FilterResult {
    let el = expect_node(&value)?;
    Ok(Value::Text(el.attr(name).unwrap_or_default().to_string()))
}

fn is_element(node: &Node, tag: &str) -> bool {
    matches!(node, Node::Element(el) if el.tag == tag)
}

/// Clone the node, run `edit` on the copy, return the copy.
fn edit_copy(value: &Value, edit: impl FnOnce(&mut Element)) -> FilterResult {
    let mut copy = expect_node(value)?.clone();
    edit(&mut copy);
    Ok(Value::from(copy))
}
