//! Study guide extraction from certification pages.
//!
//! Pages are handled as text: sections are located by their h1–h3
//! headings and list items are pulled out with patterns. This is enough
//! for the study guide layout and keeps the page format out of the
//! data model.

use crate::models::StudyResource;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Heading keywords that introduce the skills section.
const SKILLS_KEYWORDS: &[&str] = &["skills measured"];

/// Heading keywords that introduce study resource sections.
const RESOURCE_KEYWORDS: &[&str] = &["study resources", "preparation", "learning path", "training"];

/// Sections pulled from one page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedSections {
    pub skills: Vec<String>,
    pub resources: Vec<StudyResource>,
    pub exam_details: BTreeMap<String, String>,
}

macro_rules! cached_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect("valid regex"))
        }
    };
}

cached_regex!(main_re, r"(?is)<main\b[^>]*>(.*?)</main>");
cached_regex!(heading_re, r"(?is)<h([1-3])\b[^>]*>(.*?)</h[1-3]>");
cached_regex!(li_open_re, r"(?i)<li\b[^>]*>");
cached_regex!(li_stop_re, r"(?i)<li\b|</li>");
cached_regex!(href_re, r#"(?is)<a\b[^>]*?href\s*=\s*["']([^"']*)["']"#);
cached_regex!(duration_re, r"(?i)(\d+)\s*minutes?");
cached_regex!(questions_re, r"(?i)(\d+)[\s-]*(\d+)?\s*questions?");
cached_regex!(passing_re, r"(?i)(\d+)%?\s*pass");

/// Extract skills, resources and exam details from a page.
pub fn extract_sections(html: &str) -> ExtractedSections {
    let content = main_content(html);

    ExtractedSections {
        skills: section_items(content, SKILLS_KEYWORDS)
            .into_iter()
            .map(strip_tags)
            .filter(|text| !text.is_empty())
            .collect(),
        resources: section_items(content, RESOURCE_KEYWORDS)
            .into_iter()
            .map(to_resource)
            .filter(|r| !r.text.is_empty())
            .collect(),
        exam_details: exam_details(&strip_tags(content)),
    }
}

/// The `<main>` element's inner HTML, or the whole page without one.
pub fn main_content(html: &str) -> &str {
    main_re()
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map_or(html, |m| m.as_str())
}

/// Raw `<li>` bodies under every heading whose text contains a keyword,
/// up to the next h1–h3.
fn section_items<'a>(content: &'a str, keywords: &[&str]) -> Vec<&'a str> {
    let headings: Vec<_> = heading_re().captures_iter(content).collect();
    let mut items = Vec::new();

    for (i, caps) in headings.iter().enumerate() {
        let (Some(whole), Some(title)) = (caps.get(0), caps.get(2)) else {
            continue;
        };
        let title = strip_tags(title.as_str()).to_lowercase();
        if !keywords.iter().any(|k| title.contains(k)) {
            continue;
        }

        let end = headings
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map_or(content.len(), |m| m.start());
        let body = &content[whole.end()..end];

        items.extend(list_items(body));
    }

    items
}

/// Own text of every `<li>`, nested ones included.
///
/// An item's text runs to its closing tag or to the first nested `<li>`,
/// whichever comes first, so a parent never swallows its children.
fn list_items(body: &str) -> impl Iterator<Item = &str> {
    li_open_re().find_iter(body).map(move |open| {
        let rest = &body[open.end()..];
        let end = li_stop_re().find(rest).map_or(rest.len(), |m| m.start());
        &rest[..end]
    })
}

fn to_resource(item: &str) -> StudyResource {
    let url = href_re()
        .captures(item)
        .and_then(|caps| caps.get(1))
        .map(|m| decode_entities(m.as_str()))
        .unwrap_or_default();
    StudyResource {
        text: strip_tags(item),
        url,
    }
}

/// Exam facts found anywhere in the page text; the first match of each wins.
pub fn exam_details(text: &str) -> BTreeMap<String, String> {
    [
        ("duration", duration_re()),
        ("questions", questions_re()),
        ("passing_score", passing_re()),
    ]
    .into_iter()
    .filter_map(|(key, re)| re.find(text).map(|m| (key.to_string(), m.as_str().to_string())))
    .collect()
}

/// Drop tags, decode common entities and collapse whitespace.
pub fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut in_tag = false;

    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&decode_entities(&out))
}

fn decode_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "–")
        .replace("&mdash;", "—")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
