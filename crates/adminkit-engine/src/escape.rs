//! Output escaping with a tag allowlist.
//!
//! Every render thunk's output passes through [`filter`] before it reaches
//! the host. Tags outside the policy are stripped (their content is kept),
//! attributes outside a tag's allowlist are dropped, and comments are
//! removed. Plain text passes through unchanged.

use std::collections::{BTreeMap, BTreeSet};

/// Allowlist of tags and, per tag, of attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct AllowedTags {
    /// Tag name (lowercase) to allowed attribute names (lowercase).
    tags: BTreeMap<String, BTreeSet<String>>,
}

impl AllowedTags {
    /// An empty policy: every tag is stripped.
    pub fn none() -> Self {
        Self {
            tags: BTreeMap::new(),
        }
    }

    /// Common content tags for descriptive admin copy.
    pub fn base() -> Self {
        let mut tags = Self::none();
        tags.allow("p", &["class"]);
        tags.allow("br", &[]);
        tags.allow("em", &[]);
        tags.allow("strong", &[]);
        tags.allow("b", &[]);
        tags.allow("i", &[]);
        tags.allow("code", &[]);
        tags.allow("span", &["class"]);
        tags.allow("div", &["id", "class"]);
        tags.allow("a", &["href", "title"]);
        tags.allow("h2", &[]);
        tags.allow("h3", &[]);
        tags.allow("ul", &["class"]);
        tags.allow("ol", &["class"]);
        tags.allow("li", &["class"]);
        tags.allow("table", &["class"]);
        tags.allow("tr", &[]);
        tags.allow("th", &["scope"]);
        tags.allow("td", &["class"]);
        tags
    }

    /// Extend a policy with form elements so settings forms always survive
    /// escaping.
    pub fn with_form_tags(mut self) -> Self {
        self.allow("form", &["id", "class", "action", "method"]);
        self.allow("input", &["id", "class", "type", "name", "value", "checked"]);
        self.allow("label", &["for"]);
        self.allow("select", &["id", "class", "name"]);
        self.allow("option", &["value", "selected"]);
        self.allow("textarea", &["id", "class", "name", "rows", "cols"]);
        self
    }

    /// Permit `tag` with exactly the given attributes.
    pub fn allow(&mut self, tag: &str, attrs: &[&str]) {
        self.tags.insert(
            tag.to_ascii_lowercase(),
            attrs.iter().map(|a| a.to_ascii_lowercase()).collect(),
        );
    }

    /// Allowed attributes for `tag`, or `None` when the tag is disallowed.
    fn allows(&self, tag: &str) -> Option<&BTreeSet<String>> {
        self.tags.get(&tag.to_ascii_lowercase())
    }
}

/// Base content tags plus form elements.
impl Default for AllowedTags {
    fn default() -> Self {
        Self::base().with_form_tags()
    }
}

/// Filter `html` against the allowlist.
pub fn filter(html: &str, allowed: &AllowedTags) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(lt) = rest.find('<') {
        out.push_str(&rest[..lt]);
        rest = &rest[lt..];

        if let Some(after_comment) = strip_comment(rest) {
            rest = after_comment;
            continue;
        }

        match parse_tag(rest) {
            Some((tag, consumed)) => {
                emit_tag(&mut out, &tag, allowed);
                rest = &rest[consumed..];
            }
            None => {
                // Not a parseable tag; keep the '<' as literal text.
                out.push('<');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// A parsed tag occurrence.
struct Tag<'a> {
    /// Tag name as written.
    name: &'a str,
    /// Whether this is a closing tag (`</name>`).
    closing: bool,
    /// Whether the tag self-closes (`<br/>`).
    self_closing: bool,
    /// Attribute name/value pairs in source order.
    attrs: Vec<(&'a str, Option<String>)>,
}

/// Skip an HTML comment at the start of `input`, if present.
fn strip_comment(input: &str) -> Option<&str> {
    let body = input.strip_prefix("<!--")?;
    match body.find("-->") {
        Some(end) => Some(&body[end + 3..]),
        // Unterminated comment swallows the remainder.
        None => Some(""),
    }
}

/// Parse a tag at the start of `input` (which begins with '<').
///
/// Returns the tag and the number of bytes consumed, or `None` when the
/// text after '<' is not a tag.
fn parse_tag(input: &str) -> Option<(Tag<'_>, usize)> {
    let bytes = input.as_bytes();
    let mut pos = 1;

    let closing = bytes.get(pos) == Some(&b'/');
    if closing {
        pos += 1;
    }

    let name_start = pos;
    while pos < bytes.len() && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'-') {
        pos += 1;
    }
    if pos == name_start {
        return None;
    }
    let name = &input[name_start..pos];

    let mut attrs = Vec::new();
    let mut self_closing = false;
    loop {
        while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
            pos += 1;
        }
        match bytes.get(pos) {
            None => return None,
            Some(b'>') => {
                pos += 1;
                break;
            }
            Some(b'/') => {
                self_closing = true;
                pos += 1;
            }
            Some(_) => {
                let (attr, consumed) = parse_attr(&input[pos..])?;
                attrs.push(attr);
                pos += consumed;
            }
        }
    }

    Some((
        Tag {
            name,
            closing,
            self_closing,
            attrs,
        },
        pos,
    ))
}

/// Parse one attribute (`name`, `name=bare`, `name="quoted"`).
fn parse_attr(input: &str) -> Option<((&str, Option<String>), usize)> {
    let bytes = input.as_bytes();
    let mut pos = 0;
    while pos < bytes.len()
        && (bytes[pos].is_ascii_alphanumeric() || bytes[pos] == b'-' || bytes[pos] == b'_')
    {
        pos += 1;
    }
    if pos == 0 {
        return None;
    }
    let name = &input[..pos];

    if bytes.get(pos) != Some(&b'=') {
        return Some(((name, None), pos));
    }
    pos += 1;

    match bytes.get(pos) {
        Some(&quote @ (b'"' | b'\'')) => {
            pos += 1;
            let start = pos;
            while pos < bytes.len() && bytes[pos] != quote {
                pos += 1;
            }
            if pos >= bytes.len() {
                return None;
            }
            let value = input[start..pos].to_string();
            Some(((name, Some(value)), pos + 1))
        }
        _ => {
            let start = pos;
            while pos < bytes.len()
                && !bytes[pos].is_ascii_whitespace()
                && bytes[pos] != b'>'
                && bytes[pos] != b'/'
            {
                pos += 1;
            }
            let value = input[start..pos].to_string();
            Some(((name, Some(value)), pos))
        }
    }
}

/// Re-emit `tag` with only its allowed attributes, or nothing when the tag
/// itself is disallowed.
fn emit_tag(out: &mut String, tag: &Tag<'_>, allowed: &AllowedTags) {
    let Some(attr_allowlist) = allowed.allows(tag.name) else {
        return;
    };

    if tag.closing {
        out.push_str("</");
        out.push_str(tag.name);
        out.push('>');
        return;
    }

    out.push('<');
    out.push_str(tag.name);
    for (attr_name, attr_value) in &tag.attrs {
        if !attr_allowlist.contains(&attr_name.to_ascii_lowercase()) {
            continue;
        }
        out.push(' ');
        out.push_str(attr_name);
        if let Some(value) = attr_value {
            out.push_str("=\"");
            out.push_str(&value.replace('"', "&quot;"));
            out.push('"');
        }
    }
    if tag.self_closing {
        out.push_str(" /");
    }
    out.push('>');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disallowed_tag_is_stripped_but_content_kept() {
        let policy = AllowedTags::default();
        let html = "<script>alert(1)</script><p>hello</p>";
        assert_eq!(filter(html, &policy), "alert(1)<p>hello</p>");
    }

    #[test]
    fn disallowed_attributes_are_dropped() {
        let policy = AllowedTags::default();
        let html = r#"<input type="text" name="first" onclick="evil()" value="x">"#;
        assert_eq!(
            filter(html, &policy),
            r#"<input type="text" name="first" value="x">"#
        );
    }

    #[test]
    fn form_tags_pass_the_default_policy() {
        let policy = AllowedTags::default();
        let html = r#"<form id="f" method="post"><label for="a">A</label></form>"#;
        assert_eq!(filter(html, &policy), html);
    }

    #[test]
    fn comments_are_removed() {
        let policy = AllowedTags::default();
        assert_eq!(filter("a<!-- secret -->b", &policy), "ab");
    }

    #[test]
    fn stray_angle_bracket_is_literal_text() {
        let policy = AllowedTags::default();
        assert_eq!(filter("1 < 2", &policy), "1 < 2");
    }

    #[test]
    fn empty_policy_strips_everything() {
        let policy = AllowedTags::none();
        assert_eq!(filter("<p>text</p>", &policy), "text");
    }

    #[test]
    fn self_closing_and_bare_attributes_survive() {
        let policy = AllowedTags::default();
        assert_eq!(filter("<br/>", &policy), "<br />");
        assert_eq!(
            filter("<option value=one selected>one</option>", &policy),
            r#"<option value="one" selected>one</option>"#
        );
    }
}
