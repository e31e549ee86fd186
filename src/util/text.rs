use std::borrow::Cow;
use std::sync::OnceLock;

use regex::Regex;

/// Maximum excerpt length in characters before truncation kicks in.
pub const EXCERPT_MAX_CHARS: usize = 160;
/// Prefix length kept when an excerpt is truncated (room for the ellipsis).
const EXCERPT_CUT_CHARS: usize = 157;
/// Ellipsis appended to truncated excerpts
const ELLIPSIS: &str = "...";

/// HTML entities collapsed to literal characters, applied in order.
///
/// `&amp;` runs after `&nbsp;` so `&amp;nbsp;` ends up as a literal `&nbsp;`
/// and not as a space.
const ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&#160;", " "),
    ("&amp;", "&"),
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&apos;", "'"),
    ("&hellip;", "\u{2026}"),
    ("&#8230;", "\u{2026}"),
];

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("static regex"))
}

fn whitespace_regex() -> &'static Regex {
    static WS: OnceLock<Regex> = OnceLock::new();
    WS.get_or_init(|| Regex::new(r"\s+").expect("static regex"))
}

fn img_src_regex() -> &'static Regex {
    static IMG: OnceLock<Regex> = OnceLock::new();
    IMG.get_or_init(|| {
        Regex::new(r#"(?i)<img[^>]+src=["']([^"']+)["']"#).expect("static regex")
    })
}

/// Replaces the handful of HTML entities feeds commonly leak into text.
///
/// Returns `Cow::Borrowed` when the input has no `&` at all.
pub fn collapse_entities(s: &str) -> Cow<'_, str> {
    if !s.contains('&') {
        return Cow::Borrowed(s);
    }
    let mut out = s.to_owned();
    for (entity, literal) in ENTITIES {
        if out.contains(entity) {
            out = out.replace(entity, literal);
        }
    }
    Cow::Owned(out)
}

/// Converts an HTML fragment to a single line of plain text.
///
/// Tags are removed, entities collapsed, whitespace runs folded into a
/// single space and the result trimmed.
///
/// # Examples
///
/// ```
/// use sports_feeds::util::strip_html;
///
/// assert_eq!(
///     strip_html("<p>Bulldogs&nbsp;win\n\n <b>24&ndash;21</b></p>"),
///     "Bulldogs win 24&ndash;21"
/// );
/// assert_eq!(strip_html("Tom &amp; Jerry"), "Tom & Jerry");
/// ```
pub fn strip_html(html: &str) -> String {
    let without_tags = tag_regex().replace_all(html, "");
    let decoded = collapse_entities(&without_tags);
    whitespace_regex()
        .replace_all(&decoded, " ")
        .trim()
        .to_owned()
}

/// Builds a plain-text excerpt of at most [`EXCERPT_MAX_CHARS`] characters.
///
/// Text that fits is returned as-is. Longer text is cut to 157 characters,
/// then backed off to the start of the last whitespace run in that prefix so
/// no word is split, and `"..."` is appended. A prefix with no whitespace at
/// all is kept whole.
///
/// # Examples
///
/// ```
/// use sports_feeds::util::make_excerpt;
///
/// assert_eq!(make_excerpt("<p>Short story</p>"), "Short story");
///
/// let long = "word ".repeat(60);
/// let excerpt = make_excerpt(&long);
/// assert!(excerpt.ends_with("word..."));
/// assert!(excerpt.chars().count() <= 160);
/// ```
pub fn make_excerpt(html: &str) -> String {
    let clean = strip_html(html);
    if clean.chars().count() <= EXCERPT_MAX_CHARS {
        return clean;
    }

    let prefix_end = clean
        .char_indices()
        .nth(EXCERPT_CUT_CHARS)
        .map(|(idx, _)| idx)
        .unwrap_or(clean.len());
    let prefix = &clean[..prefix_end];

    let cut = last_whitespace_run_start(prefix).unwrap_or(prefix.len());
    format!("{}{}", &prefix[..cut], ELLIPSIS)
}

/// Byte index where the final run of whitespace in `s` begins.
fn last_whitespace_run_start(s: &str) -> Option<usize> {
    let (last_ws, _) = s.char_indices().rev().find(|(_, c)| c.is_whitespace())?;
    let run_start = s[..last_ws]
        .char_indices()
        .rev()
        .take_while(|(_, c)| c.is_whitespace())
        .last()
        .map(|(idx, _)| idx)
        .unwrap_or(last_ws);
    Some(run_start)
}

/// Returns the `src` of the first `<img>` tag in an HTML fragment.
///
/// ```
/// use sports_feeds::util::first_img_src;
///
/// assert_eq!(
///     first_img_src(r#"<p><IMG class="hero" SRC='/a.jpg'></p>"#),
///     Some("/a.jpg")
/// );
/// assert_eq!(first_img_src("<p>no images</p>"), None);
/// ```
pub fn first_img_src(html: &str) -> Option<&str> {
    img_src_regex()
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
