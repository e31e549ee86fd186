use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use quick_xml::escape::resolve_xml_entity;
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::Reader;

use crate::feed::item::{FeedItem, MISSING_LINK, UNTITLED};
use crate::feed::registry::FeedSource;
use crate::util::{collapse_entities, first_img_src, make_excerpt};

/// Layouts seen in the wild that are neither RFC 2822 nor RFC 3339.
/// Interpreted as UTC.
const LOOSE_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%a, %d %b %Y %H:%M:%S",
];

/// Text-bearing child elements of an item that we keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Link,
    /// RSS `description` or Atom `content`
    Description,
    ContentEncoded,
    Summary,
    PubDate,
    Published,
    Updated,
    DcDate,
}

impl Field {
    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Self::Title),
            b"link" => Some(Self::Link),
            b"description" | b"content" => Some(Self::Description),
            b"content:encoded" => Some(Self::ContentEncoded),
            b"summary" => Some(Self::Summary),
            b"pubDate" => Some(Self::PubDate),
            b"published" => Some(Self::Published),
            b"updated" => Some(Self::Updated),
            b"dc:date" => Some(Self::DcDate),
            _ => None,
        }
    }
}

/// Raw values collected for one `<item>`/`<entry>` before normalization.
#[derive(Debug, Default)]
struct RawItem {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    content_encoded: Option<String>,
    summary: Option<String>,
    pub_date: Option<String>,
    published: Option<String>,
    updated: Option<String>,
    dc_date: Option<String>,
    media_content: Option<String>,
    media_thumbnail: Option<String>,
    enclosure_image: Option<String>,
    itunes_image: Option<String>,
}

/// Text being accumulated for a field until its end tag.
struct Capture {
    field: Field,
    depth: usize,
    text: String,
}

impl RawItem {
    fn slot(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Title => &mut self.title,
            Field::Link => &mut self.link,
            Field::Description => &mut self.description,
            Field::ContentEncoded => &mut self.content_encoded,
            Field::Summary => &mut self.summary,
            Field::PubDate => &mut self.pub_date,
            Field::Published => &mut self.published,
            Field::Updated => &mut self.updated,
            Field::DcDate => &mut self.dc_date,
        }
    }

    /// First non-empty value wins; repeated elements are ignored.
    fn fill(&mut self, field: Field, value: String) {
        let slot = self.slot(field);
        if slot.is_none() {
            *slot = non_empty(value);
        }
    }

    /// Records image references carried in attributes. Called for every
    /// element inside the item, so `media:group` wrappers are covered.
    fn absorb_media(&mut self, e: &BytesStart<'_>) {
        match e.name().as_ref() {
            b"media:content" if self.media_content.is_none() => {
                self.media_content = attr_value(e, b"url");
            }
            b"media:thumbnail" if self.media_thumbnail.is_none() => {
                self.media_thumbnail = attr_value(e, b"url");
            }
            b"enclosure" if self.enclosure_image.is_none() => {
                let is_image = attr_value(e, b"type").is_some_and(|t| t.starts_with("image"));
                if is_image {
                    self.enclosure_image = attr_value(e, b"url");
                }
            }
            b"itunes:image" if self.itunes_image.is_none() => {
                self.itunes_image = attr_value(e, b"href");
            }
            _ => {}
        }
    }

    /// Atom links carry the URL in `href`; only `alternate` (or unlabeled)
    /// links point at the article.
    fn absorb_link_href(&mut self, e: &BytesStart<'_>) {
        if self.link.is_some() {
            return;
        }
        let rel = attr_value(e, b"rel");
        if matches!(rel.as_deref(), None | Some("alternate")) {
            self.link = attr_value(e, b"href");
        }
    }

    /// Resolves the image in priority order: media:content, media:thumbnail,
    /// image enclosure, first inline `<img>`, itunes:image.
    fn resolve_image(&self) -> Option<String> {
        self.media_content
            .clone()
            .or_else(|| self.media_thumbnail.clone())
            .or_else(|| self.enclosure_image.clone())
            .or_else(|| {
                self.content_encoded
                    .as_deref()
                    .or(self.description.as_deref())
                    .and_then(first_img_src)
                    .map(str::to_owned)
            })
            .or_else(|| self.itunes_image.clone())
    }

    fn into_feed_item(self, source: &FeedSource, origin: &str, now: DateTime<Utc>) -> FeedItem {
        let image = self.resolve_image();

        let narrative = self
            .description
            .as_deref()
            .or(self.content_encoded.as_deref())
            .or(self.summary.as_deref())
            .unwrap_or("");
        let excerpt = make_excerpt(narrative);

        let published_raw = self
            .pub_date
            .or(self.published)
            .or(self.updated)
            .or(self.dc_date);
        let published_at = published_raw
            .as_deref()
            .and_then(parse_date)
            .unwrap_or(now);

        FeedItem {
            title: self
                .title
                .map(|t| t.trim().to_owned())
                .unwrap_or_else(|| UNTITLED.to_owned()),
            link: self
                .link
                .map(|l| l.trim().to_owned())
                .unwrap_or_else(|| MISSING_LINK.to_owned()),
            published_raw,
            published_at,
            excerpt,
            image,
            source: source.display_label().to_owned(),
            source_origin: origin.to_owned(),
        }
    }
}

/// Extracts every RSS `<item>` and Atom `<entry>` from a feed document.
///
/// Never fails: each field falls back to a default on its own, and a
/// document that turns out to be malformed part-way yields the items that
/// were complete before the error. An item still open at that point is
/// dropped.
///
/// # Arguments
///
/// * `document` - Raw feed bytes (UTF-8 expected; invalid sequences are
///   replaced rather than rejected)
/// * `source` - The feed the document came from, used for provenance
pub fn extract_items(document: &[u8], source: &FeedSource) -> Vec<FeedItem> {
    extract_items_at(document, source, Utc::now())
}

/// Same as [`extract_items`] with an explicit fallback instant for items
/// whose date is missing or unparseable.
pub fn extract_items_at(document: &[u8], source: &FeedSource, now: DateTime<Utc>) -> Vec<FeedItem> {
    // Entity handling: character references, the five XML builtins and a
    // short list of HTML entities are resolved; DOCTYPE entity declarations
    // are never expanded (quick-xml 0.37 does not parse them).
    let mut reader = Reader::from_reader(document);
    reader.config_mut().trim_text(false);
    reader.config_mut().check_end_names = false;

    let origin = source.origin();
    let mut items = Vec::new();
    let mut buf = Vec::new();

    let mut current: Option<RawItem> = None;
    // Element depth below the open item; 0 = directly inside it
    let mut depth: usize = 0;
    let mut capture: Option<Capture> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => match current.as_mut() {
                None => {
                    if is_item_element(e.name().as_ref()) {
                        current = Some(RawItem::default());
                        depth = 0;
                    }
                }
                Some(item) => {
                    depth += 1;
                    item.absorb_media(&e);
                    if let Some(cap) = capture.as_mut() {
                        // Markup nested in a field (Atom xhtml content) is
                        // kept so inline images remain discoverable.
                        cap.text.push('<');
                        cap.text.push_str(&String::from_utf8_lossy(&e));
                        cap.text.push('>');
                    } else if depth == 1 {
                        if e.name().as_ref() == b"link" {
                            item.absorb_link_href(&e);
                        }
                        if let Some(field) = Field::from_name(e.name().as_ref()) {
                            capture = Some(Capture {
                                field,
                                depth,
                                text: String::new(),
                            });
                        }
                    }
                }
            },
            Ok(Event::Empty(e)) => {
                if current.is_none() {
                    if is_item_element(e.name().as_ref()) {
                        items.push(RawItem::default().into_feed_item(source, &origin, now));
                    }
                } else if let Some(item) = current.as_mut() {
                    item.absorb_media(&e);
                    if let Some(cap) = capture.as_mut() {
                        cap.text.push('<');
                        cap.text.push_str(&String::from_utf8_lossy(&e));
                        cap.text.push_str("/>");
                    } else if depth == 0 && e.name().as_ref() == b"link" {
                        item.absorb_link_href(&e);
                    }
                }
            }
            Ok(Event::End(e)) => {
                if let Some(item) = current.as_mut() {
                    let name = e.name();
                    if is_item_element(name.as_ref()) {
                        // Closes the item even when stray unclosed tags left depth > 0
                        if let Some(cap) = capture.take() {
                            item.fill(cap.field, cap.text);
                        }
                        if let Some(item) = current.take() {
                            items.push(item.into_feed_item(source, &origin, now));
                        }
                        depth = 0;
                    } else if let Some(mut cap) = capture.take() {
                        let closes_field = depth > cap.depth
                            && Field::from_name(name.as_ref()) == Some(cap.field);
                        if cap.depth == depth || closes_field {
                            item.fill(cap.field, cap.text);
                            depth = cap.depth - 1;
                        } else {
                            cap.text.push_str("</");
                            cap.text.push_str(&String::from_utf8_lossy(name.as_ref()));
                            cap.text.push('>');
                            capture = Some(cap);
                            depth = depth.saturating_sub(1);
                        }
                    } else {
                        depth = depth.saturating_sub(1);
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(cap) = capture.as_mut() {
                    cap.text.push_str(&text_of(&e));
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(cap) = capture.as_mut() {
                    cap.text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::debug!(
                    feed = %source.name,
                    position = reader.buffer_position(),
                    error = %e,
                    parsed = items.len(),
                    "Stopping feed parse at malformed XML"
                );
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    tracing::debug!(feed = %source.name, items = items.len(), "Extracted feed items");
    items
}

/// Parses a feed date: RFC 2822, RFC 3339, then a few loose layouts.
///
/// ```
/// use sports_feeds::feed::parse_date;
///
/// assert!(parse_date("Sat, 12 Oct 2024 19:30:00 GMT").is_some());
/// assert!(parse_date("2024-10-12T19:30:00-05:00").is_some());
/// assert!(parse_date("last Friday").is_none());
/// ```
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in LOOSE_DATE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn is_item_element(name: &[u8]) -> bool {
    matches!(name, b"item" | b"entry")
}

/// XML builtins plus the HTML entities that commonly leak into feed text.
fn resolve_feed_entity(entity: &str) -> Option<&'static str> {
    if let Some(resolved) = resolve_xml_entity(entity) {
        return Some(resolved);
    }
    let resolved = match entity {
        "nbsp" => " ",
        "hellip" => "\u{2026}",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201C}",
        "rdquo" => "\u{201D}",
        "laquo" => "\u{00AB}",
        "raquo" => "\u{00BB}",
        "middot" => "\u{00B7}",
        "bull" => "\u{2022}",
        "copy" => "\u{00A9}",
        "reg" => "\u{00AE}",
        "trade" => "\u{2122}",
        "eacute" => "\u{00E9}",
        _ => return None,
    };
    Some(resolved)
}

fn text_of(e: &BytesText<'_>) -> String {
    match e.unescape_with(resolve_feed_entity) {
        Ok(text) => text.into_owned(),
        // Unknown entity: keep the text, collapsing what we can
        Err(_) => collapse_entities(&String::from_utf8_lossy(e)).into_owned(),
    }
}

fn attr_value(e: &BytesStart<'_>, key: &[u8]) -> Option<String> {
    let attr = e.try_get_attribute(key).ok().flatten()?;
    let value = match attr.unescape_value_with(resolve_feed_entity) {
        Ok(v) => v.into_owned(),
        Err(_) => String::from_utf8_lossy(&attr.value).into_owned(),
    };
    non_empty(value)
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn source() -> FeedSource {
        FeedSource::new("test", "https://news.example.com/sports/rss", "Example News")
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    fn rss(items: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0"
     xmlns:media="http://search.yahoo.com/mrss/"
     xmlns:content="http://purl.org/rss/1.0/modules/content/"
     xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd"
     xmlns:dc="http://purl.org/dc/elements/1.1/">
<channel>
  <title>Channel title is not an item</title>
  <link>https://news.example.com</link>
  {items}
</channel>
</rss>"#
        )
    }

    fn extract_one(items: &str) -> FeedItem {
        let doc = rss(items);
        let mut extracted = extract_items_at(doc.as_bytes(), &source(), fixed_now());
        assert_eq!(extracted.len(), 1, "expected exactly one item");
        extracted.remove(0)
    }

    #[test]
    fn test_basic_rss_item() {
        let item = extract_one(
            r#"<item>
                <title>  Tupelo wins opener  </title>
                <link>https://news.example.com/tupelo-opener</link>
                <pubDate>Fri, 30 Aug 2024 23:15:00 -0500</pubDate>
                <description>Golden Wave roll 35-7.</description>
            </item>"#,
        );
        assert_eq!(item.title, "Tupelo wins opener");
        assert_eq!(item.link, "https://news.example.com/tupelo-opener");
        assert_eq!(
            item.published_raw.as_deref(),
            Some("Fri, 30 Aug 2024 23:15:00 -0500")
        );
        assert_eq!(
            item.published_at,
            Utc.with_ymd_and_hms(2024, 8, 31, 4, 15, 0).unwrap()
        );
        assert_eq!(item.excerpt, "Golden Wave roll 35-7.");
        assert_eq!(item.image, None);
        assert_eq!(item.source, "Example News");
        assert_eq!(item.source_origin, "https://news.example.com");
    }

    #[test]
    fn test_channel_metadata_ignored() {
        let doc = rss("");
        assert!(extract_items_at(doc.as_bytes(), &source(), fixed_now()).is_empty());
    }

    #[test]
    fn test_empty_and_non_feed_documents_yield_nothing() {
        assert!(extract_items(b"", &source()).is_empty());
        assert!(extract_items(b"<html><body>hi</body></html>", &source()).is_empty());
        assert!(extract_items(b"not xml at all", &source()).is_empty());
    }

    #[test]
    fn test_missing_fields_degrade_to_defaults() {
        let item = extract_one("<item></item>");
        assert_eq!(item.title, UNTITLED);
        assert_eq!(item.link, MISSING_LINK);
        assert_eq!(item.published_raw, None);
        assert_eq!(item.published_at, fixed_now());
        assert_eq!(item.excerpt, "");
        assert_eq!(item.image, None);
    }

    #[test]
    fn test_blank_title_becomes_untitled() {
        let item = extract_one("<item><title>   </title><link>https://x.com/a</link></item>");
        assert_eq!(item.title, UNTITLED);
    }

    #[test]
    fn test_unparseable_date_falls_back_to_now() {
        let item = extract_one("<item><pubDate>sometime last week</pubDate></item>");
        assert_eq!(item.published_raw.as_deref(), Some("sometime last week"));
        assert_eq!(item.published_at, fixed_now());
    }

    #[test]
    fn test_image_priority_media_content_wins() {
        let item = extract_one(
            r#"<item>
                <title>All three</title>
                <enclosure url="https://cdn.example.com/enclosure.jpg" type="image/jpeg" length="1"/>
                <content:encoded><![CDATA[<p><img src="https://cdn.example.com/inline.jpg"></p>]]></content:encoded>
                <media:thumbnail url="https://cdn.example.com/thumb.jpg"/>
                <media:content url="https://cdn.example.com/media.jpg" medium="image"/>
            </item>"#,
        );
        assert_eq!(item.image.as_deref(), Some("https://cdn.example.com/media.jpg"));
    }

    #[test]
    fn test_image_priority_thumbnail_before_enclosure() {
        let item = extract_one(
            r#"<item>
                <enclosure url="https://cdn.example.com/enclosure.jpg" type="image/jpeg"/>
                <media:thumbnail url="https://cdn.example.com/thumb.jpg"/>
            </item>"#,
        );
        assert_eq!(item.image.as_deref(), Some("https://cdn.example.com/thumb.jpg"));
    }

    #[test]
    fn test_non_image_enclosure_skipped() {
        let item = extract_one(
            r#"<item>
                <enclosure url="https://cdn.example.com/episode.mp3" type="audio/mpeg"/>
                <description>&lt;img src="https://cdn.example.com/inline.png"&gt; Podcast</description>
            </item>"#,
        );
        assert_eq!(item.image.as_deref(), Some("https://cdn.example.com/inline.png"));
        assert_eq!(item.excerpt, "Podcast");
    }

    #[test]
    fn test_inline_image_prefers_rich_content() {
        let item = extract_one(
            r#"<item>
                <description><![CDATA[<img src="https://cdn.example.com/desc.png">]]></description>
                <content:encoded><![CDATA[<img src="https://cdn.example.com/rich.png">]]></content:encoded>
            </item>"#,
        );
        assert_eq!(item.image.as_deref(), Some("https://cdn.example.com/rich.png"));
    }

    #[test]
    fn test_media_group_wrapper_supported() {
        let item = extract_one(
            r#"<item>
                <media:group>
                    <media:content url="https://cdn.example.com/grouped.jpg"/>
                </media:group>
            </item>"#,
        );
        assert_eq!(item.image.as_deref(), Some("https://cdn.example.com/grouped.jpg"));
    }

    #[test]
    fn test_itunes_image_is_last_resort() {
        let item = extract_one(
            r#"<item>
                <itunes:image href="https://cdn.example.com/show.jpg"/>
                <description>No pictures here</description>
            </item>"#,
        );
        assert_eq!(item.image.as_deref(), Some("https://cdn.example.com/show.jpg"));

        let item = extract_one(
            r#"<item>
                <itunes:image href="https://cdn.example.com/show.jpg"/>
                <description><![CDATA[<img src="https://cdn.example.com/inline.jpg">]]></description>
            </item>"#,
        );
        assert_eq!(item.image.as_deref(), Some("https://cdn.example.com/inline.jpg"));
    }

    #[test]
    fn test_empty_media_url_falls_through() {
        let item = extract_one(
            r#"<item>
                <media:content url=""/>
                <media:thumbnail url="https://cdn.example.com/thumb.jpg"/>
            </item>"#,
        );
        assert_eq!(item.image.as_deref(), Some("https://cdn.example.com/thumb.jpg"));
    }

    #[test]
    fn test_excerpt_prefers_description_over_rich_content() {
        let item = extract_one(
            r#"<item>
                <content:encoded><![CDATA[<p>Long rich body</p>]]></content:encoded>
                <description><![CDATA[<p>Short&nbsp;snippet &amp; more</p>]]></description>
            </item>"#,
        );
        assert_eq!(item.excerpt, "Short snippet & more");
    }

    #[test]
    fn test_excerpt_falls_back_to_rich_content() {
        let item = extract_one(
            r#"<item><content:encoded><![CDATA[<p>Rich   body</p>]]></content:encoded></item>"#,
        );
        assert_eq!(item.excerpt, "Rich body");
    }

    #[test]
    fn test_long_excerpt_truncated_on_word_boundary() {
        let body = "Starkville ".repeat(30);
        let item = extract_one(&format!("<item><description>{body}</description></item>"));
        assert!(item.excerpt.chars().count() <= 161);
        assert!(item.excerpt.ends_with("Starkville..."));
    }

    #[test]
    fn test_raw_html_entities_do_not_break_text() {
        let item = extract_one(
            "<item><title>Ole&nbsp;Miss &amp; State</title><description>A&nbsp;B</description></item>",
        );
        assert_eq!(item.title, "Ole Miss & State");
        assert_eq!(item.excerpt, "A B");
    }

    #[test]
    fn test_html_and_numeric_entities_resolved_together() {
        let item = extract_one(
            "<item><title>Ole&nbsp;Miss&#8217;s win &#x2014; big&hellip;</title></item>",
        );
        assert_eq!(item.title, "Ole Miss\u{2019}s win \u{2014} big\u{2026}");
    }

    #[test]
    fn test_unknown_entity_keeps_raw_text() {
        let item = extract_one("<item><title>Go &foo; Dawgs &amp; Rebels</title></item>");
        assert_eq!(item.title, "Go &foo; Dawgs & Rebels");
    }

    #[test]
    fn test_stray_unclosed_tag_does_not_swallow_later_items() {
        let doc = rss(
            r#"<item><title>A</title><description>x<br>y</description></item>
               <item><title>B</title><link>https://x.com/b</link></item>"#,
        );
        let items = extract_items_at(doc.as_bytes(), &source(), fixed_now());
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
        assert_eq!(items[0].excerpt, "xy");
        assert_eq!(items[1].link, "https://x.com/b");
    }

    #[test]
    fn test_unclosed_tag_before_item_end_still_closes_item() {
        let doc = rss(
            r#"<item><title>A</title><p>dangling</item>
               <item><title>B</title></item>"#,
        );
        let items = extract_items_at(doc.as_bytes(), &source(), fixed_now());
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B"]);
    }

    #[test]
    fn test_self_closing_item_becomes_placeholder_record() {
        let doc = rss(r#"<item/><item><title>Real</title><link>https://x.com/r</link></item>"#);
        let items = extract_items_at(doc.as_bytes(), &source(), fixed_now());
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, UNTITLED);
        assert_eq!(items[0].link, MISSING_LINK);
        assert_eq!(items[0].published_at, fixed_now());
        assert_eq!(items[1].title, "Real");
    }

    #[test]
    fn test_dc_date_used_when_no_pubdate() {
        let item = extract_one("<item><dc:date>2024-09-06T19:00:00Z</dc:date></item>");
        assert_eq!(
            item.published_at,
            Utc.with_ymd_and_hms(2024, 9, 6, 19, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_multiple_items_in_document_order() {
        let doc = rss(
            r#"<item><title>First</title><link>https://x.com/1</link></item>
               <item><title>Second</title><link>https://x.com/2</link></item>"#,
        );
        let items = extract_items_at(doc.as_bytes(), &source(), fixed_now());
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second"]);
    }

    #[test]
    fn test_truncated_document_keeps_complete_items() {
        let doc = r#"<rss><channel>
            <item><title>Complete</title><link>https://x.com/1</link></item>
            <item><title>Cut off</title><link>https://x.com/2"#;
        let items = extract_items_at(doc.as_bytes(), &source(), fixed_now());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Complete");
    }

    #[test]
    fn test_atom_entry() {
        let doc = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom feed</title>
  <link href="https://blog.example.com/" rel="alternate"/>
  <entry>
    <title type="html">Signing day recap</title>
    <link rel="self" href="https://blog.example.com/entries/1.atom"/>
    <link rel="alternate" href="https://blog.example.com/signing-day"/>
    <updated>2024-12-18T10:00:00Z</updated>
    <published>2024-12-18T08:30:00-06:00</published>
    <summary>Who signed where.</summary>
  </entry>
</feed>"#;
        let items = extract_items_at(doc.as_bytes(), &source(), fixed_now());
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.title, "Signing day recap");
        assert_eq!(item.link, "https://blog.example.com/signing-day");
        assert_eq!(item.published_raw.as_deref(), Some("2024-12-18T08:30:00-06:00"));
        assert_eq!(
            item.published_at,
            Utc.with_ymd_and_hms(2024, 12, 18, 14, 30, 0).unwrap()
        );
        assert_eq!(item.excerpt, "Who signed where.");
    }

    #[test]
    fn test_atom_xhtml_content_inline_image() {
        let doc = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <link href="https://blog.example.com/a"/>
    <content type="xhtml"><div xmlns="http://www.w3.org/1999/xhtml"><p>Photo</p><img src="https://blog.example.com/a.jpg"/></div></content>
  </entry>
</feed>"#;
        let items = extract_items_at(doc.as_bytes(), &source(), fixed_now());
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].link, "https://blog.example.com/a");
        assert_eq!(items[0].image.as_deref(), Some("https://blog.example.com/a.jpg"));
        assert_eq!(items[0].excerpt, "Photo");
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 10, 12, 19, 30, 0).unwrap();
        assert_eq!(parse_date("Sat, 12 Oct 2024 19:30:00 GMT"), Some(expected));
        assert_eq!(parse_date("Sat, 12 Oct 2024 14:30:00 -0500"), Some(expected));
        assert_eq!(parse_date("2024-10-12T19:30:00Z"), Some(expected));
        assert_eq!(parse_date("2024-10-12 19:30:00"), Some(expected));
        assert_eq!(
            parse_date("2024-10-12"),
            Some(Utc.with_ymd_and_hms(2024, 10, 12, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("32/13/2024"), None);
    }
}
