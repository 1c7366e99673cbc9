//! Text helpers over article content: search-hit highlighting for
//! listings and the heading outline behind an article's table of contents.

use crate::models::strip_tags;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;

/// A run of text, marked when it matched the search keyword.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub text: String,
    pub hit: bool,
}

impl Fragment {
    fn new(text: &str, hit: bool) -> Self {
        Self {
            text: text.to_string(),
            hit,
        }
    }
}

/// Splits `text` around every case-insensitive occurrence of `keyword`.
/// The keyword is matched literally, so regex metacharacters are safe.
pub fn highlight(text: &str, keyword: &str) -> Vec<Fragment> {
    let keyword = keyword.trim();
    if keyword.is_empty() || text.is_empty() {
        return vec![Fragment::new(text, false)];
    }
    let matcher = match RegexBuilder::new(&regex::escape(keyword))
        .case_insensitive(true)
        .build()
    {
        Ok(matcher) => matcher,
        Err(err) => {
            tracing::debug!("keyword {keyword:?} not highlighted: {err}");
            return vec![Fragment::new(text, false)];
        }
    };

    let mut fragments = Vec::new();
    let mut last = 0;
    for hit in matcher.find_iter(text) {
        if hit.start() > last {
            fragments.push(Fragment::new(&text[last..hit.start()], false));
        }
        fragments.push(Fragment::new(hit.as_str(), true));
        last = hit.end();
    }
    if last < text.len() || fragments.is_empty() {
        fragments.push(Fragment::new(&text[last..], false));
    }
    fragments
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// 1 for `<h1>` through 6 for `<h6>`.
    pub level: u8,
    pub id: String,
    pub text: String,
}

/// Article HTML with an `id` on every heading, plus the headings in
/// document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outline {
    pub html: String,
    pub headings: Vec<Heading>,
}

static HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<h([1-6])(\s[^>]*)?>(.*?)</h[1-6]\s*>").unwrap());
static ID_ATTR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)\bid\s*=\s*["']([^"']*)["']"#).unwrap());

/// Anchor name for a heading: lowercase ASCII words joined by dashes.
pub fn anchor_id(text: &str) -> String {
    let mut id = String::with_capacity(text.len());
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            id.push(c);
        } else if !id.is_empty() && !id.ends_with('-') {
            id.push('-');
        }
    }
    while id.ends_with('-') {
        id.pop();
    }
    id
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// Collects the headings of `html`. Headings without an id get one from
/// their text, or `section-<n>` when the text has no usable characters;
/// repeated ids get a numeric suffix.
pub fn outline(html: &str) -> Outline {
    let mut out = String::with_capacity(html.len());
    let mut headings = Vec::new();
    let mut taken = HashSet::new();
    let mut last = 0;

    for (index, caps) in HEADING.captures_iter(html).enumerate() {
        let (Some(whole), Some(level)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let attrs = caps.get(2).map_or("", |x| x.as_str());
        let text = decode_entities(&strip_tags(caps.get(3).map_or("", |x| x.as_str())));
        let existing = ID_ATTR
            .captures(attrs)
            .and_then(|x| x.get(1))
            .map(|x| x.as_str().to_string())
            .filter(|x| !x.is_empty());

        out.push_str(&html[last..whole.start()]);
        let id = match existing {
            Some(id) => {
                out.push_str(whole.as_str());
                id
            }
            None => {
                let base = Some(anchor_id(&text))
                    .filter(|x| !x.is_empty())
                    .unwrap_or_else(|| format!("section-{index}"));
                let mut id = base.clone();
                let mut n = 2;
                while taken.contains(&id) {
                    id = format!("{base}-{n}");
                    n += 1;
                }
                // `<hN` is three bytes; the id goes right after it.
                let tag_end = whole.start() + 3;
                out.push_str(&html[whole.start()..tag_end]);
                out.push_str(&format!(" id=\"{id}\""));
                out.push_str(&html[tag_end..whole.end()]);
                id
            }
        };
        taken.insert(id.clone());
        headings.push(Heading {
            level: level.as_str().parse().unwrap_or(1),
            id,
            text,
        });
        last = whole.end();
    }
    out.push_str(&html[last..]);

    Outline {
        html: out,
        headings,
    }
}
