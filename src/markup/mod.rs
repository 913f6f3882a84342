//! Owned markup tree
//!
//! Elements matched by a selector are copied out of the parsed document into
//! this tree so they can flow through filter chains independently of the
//! document they came from. Values hold elements behind an `Arc`; structural
//! filters clone the element before editing it.

pub mod repair;

/// Elements serialized without a closing tag.
pub const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose text content is serialized without escaping.
const RAW_TEXT_TAGS: &[&str] = &["script", "style"];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style attribute setter, mostly for tests.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    /// Builder-style child appender, mostly for tests.
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(key, _)| key != name);
    }

    pub fn is_void(&self) -> bool {
        VOID_TAGS.contains(&self.tag.as_str())
    }

    /// Concatenated text of every descendant text node, tags stripped.
    pub fn text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                Node::Element(el) => el.collect_text(out),
                Node::Text(text) => out.push_str(text),
                Node::Comment(_) => {}
            }
        }
    }

    /// Serialized markup including this element's own tags.
    pub fn outer_html(&self) -> String {
        let mut out = String::new();
        self.write_outer(&mut out);
        out
    }

    /// Serialized markup of the children only.
    pub fn inner_html(&self) -> String {
        let mut out = String::new();
        self.write_children(&mut out);
        out
    }

    fn write_outer(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
        out.push('>');
        if self.is_void() && self.children.is_empty() {
            return;
        }
        self.write_children(out);
        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }

    fn write_children(&self, out: &mut String) {
        let raw = RAW_TEXT_TAGS.contains(&self.tag.as_str());
        for child in &self.children {
            match child {
                Node::Element(el) => el.write_outer(out),
                Node::Text(text) if raw => out.push_str(text),
                Node::Text(text) => out.push_str(&escape_text(text)),
                Node::Comment(comment) => {
                    out.push_str("<!--");
                    out.push_str(comment);
                    out.push_str("-->");
                }
            }
        }
    }

    /// Visit every descendant element (not `self`), parents before children.
    pub fn for_each_descendant_mut(&mut self, visit: &mut dyn FnMut(&mut Element)) {
        for child in &mut self.children {
            if let Node::Element(el) = child {
                visit(el);
                el.for_each_descendant_mut(visit);
            }
        }
    }

    /// Drop every descendant node for which `keep` returns false.
    /// Children of a dropped node are dropped with it.
    pub fn retain_descendants(&mut self, keep: &mut dyn FnMut(&Node) -> bool) {
        self.children.retain(|child| keep(child));
        for child in &mut self.children {
            if let Node::Element(el) = child {
                el.retain_descendants(keep);
            }
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Node::Text(text.to_string())
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new("div")
            .with_attr("class", "gallery")
            .with_child(Element::new("h1").with_child("Title"))
            .with_child(Element::new("img").with_attr("src", "a.jpg"))
            .with_child(Element::new("p").with_child("Fish & chips"))
    }

    #[test]
    fn test_serialization() {
        let el = sample();
        assert_eq!(
            el.outer_html(),
            r#"<div class="gallery"><h1>Title</h1><img src="a.jpg"><p>Fish &amp; chips</p></div>"#
        );
        assert_eq!(
            el.inner_html(),
            r#"<h1>Title</h1><img src="a.jpg"><p>Fish &amp; chips</p>"#
        );
    }

    #[test]
    fn test_text_strips_tags_and_comments() {
        let el = sample().with_child(Node::Comment("hidden".to_string()));
        assert_eq!(el.text(), "TitleFish & chips");
    }

    #[test]
    fn test_attribute_escaping() {
        let el = Element::new("a").with_attr("title", "say \"hi\"");
        assert_eq!(el.outer_html(), r#"<a title="say &quot;hi&quot;"></a>"#);
    }

    #[test]
    fn test_raw_text_is_not_escaped() {
        let el = Element::new("script").with_child("if (a < b) {}");
        assert_eq!(el.outer_html(), "<script>if (a < b) {}</script>");
    }

    #[test]
    fn test_retain_descendants() {
        let mut el = sample();
        el.retain_descendants(
            &mut |node: &Node| !matches!(node, Node::Element(child) if child.tag == "img"),
        );
        assert_eq!(el.children.len(), 2);
        assert!(!el.outer_html().contains("<img"));
    }

    #[test]
    fn test_for_each_descendant_skips_self() {
        let mut el = sample();
        let mut seen = Vec::new();
        el.for_each_descendant_mut(&mut |child: &mut Element| seen.push(child.tag.clone()));
        assert_eq!(seen, vec!["h1", "img", "p"]);
    }
}
