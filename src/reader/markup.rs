//! Markup reader
//!
//! Paths are CSS selectors:
//! - `h1.title` matches descendants of the `main` element when one is
//!   configured, and anywhere in the document otherwise;
//! - `//h1.title` matches anywhere in the document, ignoring `main`;
//! - `@filename@` yields the input file name as a one-element list.
//!
//! Matches are copied into owned [`Element`](crate::markup::Element) trees
//! with the configured normalization applied.

use super::{decode, Reader};
use crate::config::MarkupOptions;
use crate::error::{ImportError, Result};
use crate::markup::repair::{parse_document, to_owned_element};
use crate::value::Value;
use scraper::{ElementRef, Html, Selector};
use std::path::Path;

/// Path sentinel resolving to the input file name.
pub const FILENAME_PATH: &str = "@filename@";

/// Prefix selecting against the whole document.
const ANYWHERE_PREFIX: &str = "//";

pub struct MarkupReader {
    main: Option<(String, Selector)>,
    options: MarkupOptions,
}

pub struct MarkupDocument {
    html: Html,
    file_name: String,
}

fn parse_selector(path: &str) -> Result<Selector> {
    Selector::parse(path)
        .map_err(|e| ImportError::extraction(path, format!("invalid selector: {}", e)))
}

impl MarkupReader {
    /// `main` is checked for syntax here and for its match count on every parse.
    pub fn new(main: Option<&str>, options: MarkupOptions) -> Result<Self> {
        let main = main
            .map(|path| parse_selector(path).map(|selector| (path.to_string(), selector)))
            .transpose()?;
        Ok(Self { main, options })
    }

    /// The element relative paths are evaluated against, if any. Without
    /// `main` they are evaluated against the whole document.
    fn root<'a>(&self, html: &'a Html) -> Result<Option<ElementRef<'a>>> {
        let Some((path, selector)) = &self.main else {
            return Ok(None);
        };
        let mut matches = html.select(selector);
        match (matches.next(), matches.next()) {
            (Some(root), None) => Ok(Some(root)),
            (None, _) => Err(ImportError::extraction(
                path.as_str(),
                "main selector must match exactly one element, found none",
            )),
            (Some(_), Some(_)) => Err(ImportError::extraction(
                path.as_str(),
                format!(
                    "main selector must match exactly one element, found {}",
                    2 + matches.count()
                ),
            )),
        }
    }
}

impl Reader for MarkupReader {
    type Document = MarkupDocument;

    fn parse(&self, raw: &[u8], source: &Path) -> Result<MarkupDocument> {
        let html = parse_document(&decode(raw), &self.options);
        if !html.errors.is_empty() {
            tracing::debug!(errors = html.errors.len(), "repaired malformed markup");
        }
        self.root(&html)?;
        Ok(MarkupDocument {
            html,
            file_name: source.display().to_string(),
        })
    }

    fn extract(&self, document: &MarkupDocument, path: &str) -> Result<Vec<Value>> {
        if path == FILENAME_PATH {
            return Ok(vec![Value::from(document.file_name.as_str())]);
        }

        let to_value = |el: ElementRef<'_>| Value::from(to_owned_element(el, &self.options));
        let found: Vec<Value> = match path.strip_prefix(ANYWHERE_PREFIX) {
            Some(anywhere) => {
                let selector = parse_selector(anywhere)?;
                document.html.select(&selector).map(to_value).collect()
            }
            None => {
                let selector = parse_selector(path)?;
                match self.root(&document.html)? {
                    Some(root) => root.select(&selector).map(to_value).collect(),
                    None => document.html.select(&selector).map(to_value).collect(),
                }
            }
        };
        tracing::debug!(path, count = found.len(), "selector evaluated");
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head><title>Summer</title></head><body>
        <h1>Site</h1>
        <div id="content">
            <h1>Summer 2016</h1>
            <img src="a.jpg" alt="A"><img src="b.jpg" alt="B">
            <p class="caption">First<p class="caption">Second
        </div>
        <div class="footer"><p>Footer</p></div>
    </body></html>"#;

    fn reader(main: Option<&str>) -> MarkupReader {
        MarkupReader::new(main, MarkupOptions::default()).unwrap()
    }

    fn parse(reader: &MarkupReader, raw: &[u8]) -> Result<MarkupDocument> {
        reader.parse(raw, Path::new("/in/summer.html"))
    }

    fn texts(values: Vec<Value>) -> Vec<String> {
        values.iter().map(Value::to_text).collect()
    }

    #[test]
    fn test_extract_from_document() {
        let reader = reader(None);
        let doc = parse(&reader, PAGE.as_bytes()).unwrap();
        assert_eq!(texts(reader.extract(&doc, "h1").unwrap()), vec!["Site", "Summer 2016"]);
        assert_eq!(reader.extract(&doc, "title").unwrap().len(), 1);
    }

    #[test]
    fn test_without_main_the_document_element_matches() {
        let reader = reader(None);
        let doc = parse(&reader, PAGE.as_bytes()).unwrap();
        assert_eq!(reader.extract(&doc, "html").unwrap().len(), 1);
        assert_eq!(reader.extract(&doc, "html > body > h1").unwrap().len(), 1);
    }

    #[test]
    fn test_main_narrows_relative_paths() {
        let reader = reader(Some("div#content"));
        let doc = parse(&reader, PAGE.as_bytes()).unwrap();
        assert_eq!(texts(reader.extract(&doc, "h1").unwrap()), vec!["Summer 2016"]);
        assert_eq!(
            texts(reader.extract(&doc, "p.caption").unwrap()),
            vec!["First", "Second\n        "]
        );
        assert!(reader.extract(&doc, "div.footer p").unwrap().is_empty());
    }

    #[test]
    fn test_anywhere_prefix_ignores_main() {
        let reader = reader(Some("div#content"));
        let doc = parse(&reader, PAGE.as_bytes()).unwrap();
        assert_eq!(texts(reader.extract(&doc, "//div.footer p").unwrap()), vec!["Footer"]);
        assert_eq!(reader.extract(&doc, "//h1").unwrap().len(), 2);
    }

    #[test]
    fn test_matches_are_nodes() {
        let reader = reader(Some("#content"));
        let doc = parse(&reader, PAGE.as_bytes()).unwrap();
        let images = reader.extract(&doc, "img").unwrap();
        assert_eq!(images.len(), 2);
        match &images[0] {
            Value::Node(el) => assert_eq!(el.attr("src"), Some("a.jpg")),
            other => panic!("expected node, got {:?}", other),
        }
    }

    #[test]
    fn test_no_match_is_empty_list() {
        let reader = reader(None);
        let doc = parse(&reader, PAGE.as_bytes()).unwrap();
        assert!(reader.extract(&doc, "table td").unwrap().is_empty());
    }

    #[test]
    fn test_filename_sentinel() {
        let reader = reader(Some("#content"));
        let doc = parse(&reader, PAGE.as_bytes()).unwrap();
        assert_eq!(
            reader.extract(&doc, FILENAME_PATH).unwrap(),
            vec![Value::from("/in/summer.html")]
        );
    }

    #[test]
    fn test_main_must_match_exactly_one() {
        let err = parse(&reader(Some("div#missing")), PAGE.as_bytes()).err().unwrap();
        assert_eq!(err.kind(), "extraction");
        assert!(err.to_string().contains("found none"));

        let err = parse(&reader(Some("div")), PAGE.as_bytes()).err().unwrap();
        assert!(err.to_string().contains("found 2"));
    }

    #[test]
    fn test_invalid_selector() {
        assert!(MarkupReader::new(Some("div[["), MarkupOptions::default()).is_err());

        let reader = reader(None);
        let doc = parse(&reader, PAGE.as_bytes()).unwrap();
        let err = reader.extract(&doc, "p:::").unwrap_err();
        assert_eq!(err.kind(), "extraction");
        assert!(err.to_string().contains("p:::"));
    }

    #[test]
    fn test_malformed_input_is_repaired() {
        let reader = reader(Some("#box"));
        let doc = parse(
            &reader,
            br#"<div id=box><ul><li>one<li>two</ul><iframe src="v" /></iframe>"#,
        )
        .unwrap();
        assert_eq!(texts(reader.extract(&doc, "li").unwrap()), vec!["one", "two"]);
        let frames = reader.extract(&doc, "iframe").unwrap();
        match &frames[0] {
            Value::Node(el) => assert_eq!(el.outer_html(), r#"<iframe src="v"> </iframe>"#),
            other => panic!("expected node, got {:?}", other),
        }
    }
}
