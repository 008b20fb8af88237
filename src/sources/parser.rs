use chrono::{DateTime, Utc};
use feed_rs::parser;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

use crate::domain::{Feed, FeedItem, FeedType};
use crate::errors::{PostError, PostResult};

/// Parse a feed payload into a typed [`Feed`].
///
/// RSS payloads (an `<rss>` or RDF root) are scanned for `item` elements
/// directly so titles and links keep their text exactly as written. Atom
/// and JSON Feed go through `feed-rs`. Anything `feed-rs` rejects is
/// scanned as well.
pub fn parse_feed(bytes: &[u8]) -> PostResult<Feed> {
    if matches!(root_element(bytes).as_deref(), Some("rss") | Some("RDF")) {
        return scan_items(bytes);
    }

    match parser::parse(bytes) {
        Ok(parsed) => Ok(from_feed_rs(parsed)),
        Err(e) => {
            tracing::debug!(error = %e, "feed-rs rejected payload, scanning for items");
            scan_items(bytes)
        }
    }
}

/// Local name of the first element in the payload, if it is XML at all
fn root_element(xml: &[u8]) -> Option<String> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return Some(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Ok(Event::Eof) | Err(_) => return None,
            _ => {}
        }
        buf.clear();
    }
}

fn from_feed_rs(parsed: feed_rs::model::Feed) -> Feed {
    let feed_type = match parsed.feed_type {
        feed_rs::model::FeedType::Atom => FeedType::Atom,
        feed_rs::model::FeedType::JSON => FeedType::Json,
        _ => FeedType::Rss,
    };

    let items = parsed
        .entries
        .into_iter()
        .map(|entry| {
            let title = entry.title.map(|t| t.content);
            let link = entry.links.into_iter().next().map(|l| l.href);
            let published = entry.published.or(entry.updated);

            FeedItem::new(title, link).with_published(published)
        })
        .collect();

    Feed::new(feed_type, parsed.title.map(|t| t.content), items)
}

#[derive(Clone, Copy, PartialEq)]
enum Field {
    FeedTitle,
    Title,
    Link,
    Published,
}

impl Field {
    fn in_item(name: &[u8]) -> Option<Self> {
        match name {
            b"title" => Some(Field::Title),
            b"link" => Some(Field::Link),
            b"pubDate" | b"dc:date" => Some(Field::Published),
            _ => None,
        }
    }
}

#[derive(Default)]
struct ItemBuilder {
    depth: usize,
    title: Option<String>,
    link: Option<String>,
    published: Option<DateTime<Utc>>,
    saw_published: bool,
}

impl ItemBuilder {
    fn is_set(&self, field: Field) -> bool {
        match field {
            Field::Title => self.title.is_some(),
            Field::Link => self.link.is_some(),
            Field::Published => self.saw_published,
            Field::FeedTitle => true,
        }
    }

    fn set(&mut self, field: Field, text: String) {
        match field {
            Field::Title => self.title = Some(text),
            Field::Link => self.link = Some(text),
            Field::Published => {
                self.saw_published = true;
                self.published = parse_date(&text);
            }
            Field::FeedTitle => {}
        }
    }

    fn build(self) -> FeedItem {
        FeedItem::new(self.title, self.link).with_published(self.published)
    }
}

/// RSS 2.0 uses RFC 2822 dates, RSS 1.0 `dc:date` uses ISO 8601
fn parse_date(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    DateTime::parse_from_rfc2822(text)
        .or_else(|_| DateTime::parse_from_rfc3339(text))
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}

/// Collect every `item` element with the text of its first `title` and
/// `link` descendants. Text is kept verbatim apart from entity decoding.
fn scan_items(xml: &[u8]) -> PostResult<Feed> {
    let mut reader = Reader::from_reader(xml);

    let mut items = Vec::new();
    let mut buf = Vec::new();

    let mut depth = 0usize;
    let mut saw_root = false;
    let mut feed_title: Option<String> = None;
    let mut current_item: Option<ItemBuilder> = None;
    let mut capture: Option<(Field, usize, String)> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                depth += 1;
                saw_root = true;
                let name = e.name();

                if capture.is_some() {
                    // nested markup inside a captured field
                } else if let Some(item) = current_item.as_ref() {
                    if let Some(field) = Field::in_item(name.as_ref()) {
                        if !item.is_set(field) {
                            capture = Some((field, depth, String::new()));
                        }
                    }
                } else if name.as_ref() == b"item" {
                    current_item = Some(ItemBuilder {
                        depth,
                        ..ItemBuilder::default()
                    });
                } else if name.as_ref() == b"title" && feed_title.is_none() {
                    capture = Some((Field::FeedTitle, depth, String::new()));
                }
            }
            Ok(Event::Empty(e)) => {
                saw_root = true;
                if let (Some(item), None) = (current_item.as_mut(), capture.as_ref()) {
                    if let Some(field) = Field::in_item(e.name().as_ref()) {
                        if !item.is_set(field) {
                            item.set(field, String::new());
                        }
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if let Some((_, _, text)) = capture.as_mut() {
                    let unescaped = e
                        .unescape()
                        .map_err(|e| PostError::FeedParse(format!("XML parse error: {}", e)))?;
                    text.push_str(&unescaped);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some((_, _, text)) = capture.as_mut() {
                    text.push_str(&String::from_utf8_lossy(&e));
                }
            }
            Ok(Event::End(_)) => {
                if matches!(capture, Some((_, d, _)) if d == depth) {
                    match capture.take() {
                        Some((Field::FeedTitle, _, text)) => feed_title = Some(text),
                        Some((field, _, text)) => {
                            if let Some(item) = current_item.as_mut() {
                                item.set(field, text);
                            }
                        }
                        None => {}
                    }
                }

                if matches!(current_item, Some(ref item) if item.depth == depth) {
                    if let Some(item) = current_item.take() {
                        items.push(item.build());
                    }
                }

                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(PostError::FeedParse(format!("XML parse error: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(PostError::FeedParse("No XML root element".to_string()));
    }

    Ok(Feed::new(FeedType::Rss, feed_title, items))
}
