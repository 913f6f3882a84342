//! Scalar text mappers: numbers, dates, URLs and paths
//!
//! All of these take text; nodes are read as their text content.

use super::{expect_text, FilterResult};
use crate::value::Value;
use chrono::NaiveDate;
use std::path::Path;
use url::Url;

/// Leading numeric prefix as a float, 0 when there is none.
pub fn floatval(value: Value) -> FilterResult {
    match value {
        Value::Int(n) => Ok(Value::Float(n as f64)),
        Value::Float(f) => Ok(Value::Float(f)),
        other => Ok(Value::Float(leading_float(&expect_text(&other)?))),
    }
}

fn leading_float(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;

    if bytes.get(end) == Some(&b'.') {
        let frac_end = digits_from(end + 1);
        if has_digits || frac_end > end + 1 {
            has_digits = true;
            end = frac_end;
        }
    }
    if !has_digits {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+') | Some(b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }

    text[..end].parse().unwrap_or(0.0)
}

/// Insert `<br>` before every line break (`\n`, `\r`, `\r\n`, `\n\r`).
pub fn nl2br(value: Value) -> FilterResult {
    let text = expect_text(&value)?;
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\n' && c != '\r' {
            out.push(c);
            continue;
        }
        out.push_str("<br>");
        out.push(c);
        if let Some(&next) = chars.peek() {
            if (next == '\n' || next == '\r') && next != c {
                out.push(next);
                chars.next();
            }
        }
    }
    Ok(Value::Text(out))
}

/// `23-07-2016` -> `2016-07-23 12:00:00`
pub fn dmy_date(value: Value) -> FilterResult {
    reformat_date(&expect_text(&value)?, "%d-%m-%Y")
}

/// `2016-07-23` -> `2016-07-23 12:00:00`
pub fn ymd_date(value: Value) -> FilterResult {
    reformat_date(&expect_text(&value)?, "%Y-%m-%d")
}

fn reformat_date(text: &str, format: &str) -> FilterResult {
    let date = NaiveDate::parse_from_str(text.trim(), format)
        .map_err(|_| format!("invalid date: {}", text))?;
    Ok(Value::Text(date.format("%Y-%m-%d 12:00:00").to_string()))
}

/// `http://example.com/ex.html?query=123` -> `/ex.html?query=123`
///
/// Path and query are returned as written: no percent-encoding and no `..`
/// resolution. Relative input keeps its path and query, minus the fragment.
pub fn url_path_and_query(value: Value) -> FilterResult {
    let text = expect_text(&value)?;
    let rest = match Url::parse(&text) {
        Ok(_) => after_authority(&text),
        Err(url::ParseError::RelativeUrlWithoutBase) => text.as_str(),
        Err(e) => return Err(format!("invalid url {:?}: {}", text, e)),
    };

    let rest = rest.split_once('#').map_or(rest, |(before, _)| before);
    let out = match rest.split_once('?') {
        Some((path, query)) if !query.is_empty() => format!("{}?{}", path, query),
        Some((path, _)) => path.to_string(),
        None => rest.to_string(),
    };
    Ok(Value::Text(out))
}

/// The part of an absolute URL after `scheme://host:port` (or after
/// `scheme:` when there is no authority).
fn after_authority(text: &str) -> &str {
    if let Some(at) = text.find("://") {
        let after = &text[at + 3..];
        let end = after.find(['/', '?', '#']).unwrap_or(after.len());
        return &after[end..];
    }
    text.find(':').map_or(text, |colon| &text[colon + 1..])
}

pub fn url_remove_dot_dot(value: Value) -> FilterResult {
    Ok(Value::Text(expect_text(&value)?.replace("../", "/")))
}

/// Name of the directory containing the path: `/a/b/c.html` -> `b`
pub fn dirname_one(value: Value) -> FilterResult {
    let text = expect_text(&value)?;
    let name = match Path::new(&text).parent() {
        // a bare file name lives in the current directory
        Some(parent) if parent.as_os_str().is_empty() => ".".to_string(),
        Some(parent) => parent
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        None => String::new(),
    };
    Ok(Value::Text(name))
}

pub fn basename(value: Value) -> FilterResult {
    let text = expect_text(&value)?;
    let name = Path::new(&text)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(Value::Text(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::Element;

    fn text(value: FilterResult) -> String {
        value.unwrap().to_text()
    }

    #[test]
    fn test_floatval() {
        assert_eq!(floatval(Value::from("123 xyz")).unwrap(), Value::Float(123.0));
        assert_eq!(floatval(Value::from("  -1.5e2kg")).unwrap(), Value::Float(-150.0));
        assert_eq!(floatval(Value::from(".5")).unwrap(), Value::Float(0.5));
        assert_eq!(floatval(Value::from("abc")).unwrap(), Value::Float(0.0));
        assert_eq!(floatval(Value::from("7e")).unwrap(), Value::Float(7.0));
        assert_eq!(floatval(Value::Int(3)).unwrap(), Value::Float(3.0));
    }

    #[test]
    fn test_floatval_reads_node_text() {
        let el = Element::new("span").with_child("47.25");
        assert_eq!(floatval(Value::from(el)).unwrap(), Value::Float(47.25));
    }

    #[test]
    fn test_nl2br() {
        assert_eq!(text(nl2br(Value::from("\n"))), "<br>\n");
        assert_eq!(text(nl2br(Value::from("a\r\nb"))), "a<br>\r\nb");
        assert_eq!(text(nl2br(Value::from("a\n\nb"))), "a<br>\n<br>\nb");
        assert_eq!(text(nl2br(Value::from("plain"))), "plain");
    }

    #[test]
    fn test_dates() {
        assert_eq!(text(dmy_date(Value::from("23-07-2016"))), "2016-07-23 12:00:00");
        assert_eq!(text(ymd_date(Value::from("2016-07-23"))), "2016-07-23 12:00:00");
        assert_eq!(text(dmy_date(Value::from(" 3-7-2016 "))), "2016-07-03 12:00:00");
    }

    #[test]
    fn test_dates_reject_other_formats() {
        assert!(dmy_date(Value::from("2016/07/23")).is_err());
        assert!(ymd_date(Value::from("2016/07/23")).is_err());
        assert!(ymd_date(Value::from("2016-02-30")).is_err());
        let err = dmy_date(Value::from("soon")).unwrap_err();
        assert_eq!(err, "invalid date: soon");
    }

    #[test]
    fn test_url_path_and_query() {
        assert_eq!(
            text(url_path_and_query(Value::from("http://example.com/ex.html?query=123"))),
            "/ex.html?query=123"
        );
        assert_eq!(
            text(url_path_and_query(Value::from("https://example.com/a/b"))),
            "/a/b"
        );
        assert_eq!(
            text(url_path_and_query(Value::from("/shop/list.php?page=2#top"))),
            "/shop/list.php?page=2"
        );
    }

    #[test]
    fn test_url_path_and_query_keeps_raw_text() {
        assert_eq!(
            text(url_path_and_query(Value::from("http://example.com/képek/a b.jpg?x=1"))),
            "/képek/a b.jpg?x=1"
        );
        assert_eq!(
            text(url_path_and_query(Value::from("http://example.com/a/../img.jpg"))),
            "/a/../img.jpg"
        );
        assert_eq!(text(url_path_and_query(Value::from("img/a.jpg"))), "img/a.jpg");
        assert_eq!(
            text(url_path_and_query(Value::from("http://example.com:8080?q=1#x"))),
            "?q=1"
        );
        assert_eq!(text(url_path_and_query(Value::from("http://example.com/a?"))), "/a");
    }

    #[test]
    fn test_url_helpers_compose() {
        let path = url_path_and_query(Value::from("http://example.com/a/../img.jpg")).unwrap();
        assert_eq!(text(url_remove_dot_dot(path)), "/a//img.jpg");
    }

    #[test]
    fn test_url_remove_dot_dot() {
        assert_eq!(
            text(url_remove_dot_dot(Value::from("../../img/a.jpg"))),
            "//img/a.jpg"
        );
    }

    #[test]
    fn test_path_helpers() {
        assert_eq!(text(basename(Value::from("/galleries/summer/index.html"))), "index.html");
        assert_eq!(text(dirname_one(Value::from("/galleries/summer/index.html"))), "summer");
        assert_eq!(text(basename(Value::from("/galleries/summer/"))), "summer");
        assert_eq!(text(dirname_one(Value::from("index.html"))), ".");
        assert_eq!(text(dirname_one(Value::from("/index.html"))), "");
        assert_eq!(text(dirname_one(Value::from(""))), "");
    }

    #[test]
    fn test_list_input_rejected() {
        assert!(basename(Value::from(vec!["a"])).is_err());
    }
}
