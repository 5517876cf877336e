//! Minimal RSS/Atom feed parsing shared by the feed-backed adapters.
//!
//! Handles both RSS `<item>` and Atom `<entry>` shapes, including Atom's
//! `<link href="..."/>` form. Only the handful of fields the adapters need
//! are extracted; everything else is skipped.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// One feed entry with the fields the adapters care about.
#[derive(Debug, Default, Clone)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub description: String,
    pub published: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Field {
    Title,
    Link,
    Description,
    Published,
}

fn link_from_attrs(e: &BytesStart<'_>) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == b"href" {
            return Some(String::from_utf8_lossy(&attr.value).into_owned());
        }
    }
    None
}

/// Parse a feed document into its entries. Entries without a title are
/// dropped. Malformed XML yields whatever was parsed up to the error.
pub fn parse_feed(xml: &str) -> Vec<FeedEntry> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut current: Option<FeedEntry> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.local_name().as_ref() {
                b"item" | b"entry" => current = Some(FeedEntry::default()),
                b"title" => field = Some(Field::Title),
                b"link" => {
                    field = Some(Field::Link);
                    if let (Some(cur), Some(href)) = (current.as_mut(), link_from_attrs(&e)) {
                        cur.link = href;
                    }
                }
                b"description" | b"summary" => field = Some(Field::Description),
                b"pubDate" | b"published" | b"updated" => field = Some(Field::Published),
                _ => field = None,
            },
            Ok(Event::Empty(e)) => {
                // Atom link elements are usually self-closing.
                if e.local_name().as_ref() == b"link" {
                    if let (Some(cur), Some(href)) = (current.as_mut(), link_from_attrs(&e)) {
                        if cur.link.is_empty() {
                            cur.link = href;
                        }
                    }
                }
            }
            Ok(Event::Text(t)) => {
                if let (Some(cur), Some(f)) = (current.as_mut(), field) {
                    let text = t.xml_content().unwrap_or_default();
                    append(cur, f, &text);
                }
            }
            Ok(Event::CData(t)) => {
                if let (Some(cur), Some(f)) = (current.as_mut(), field) {
                    let text = String::from_utf8_lossy(&t.into_inner()).into_owned();
                    append(cur, f, &text);
                }
            }
            Ok(Event::End(e)) => match e.local_name().as_ref() {
                b"item" | b"entry" => {
                    if let Some(cur) = current.take() {
                        if !cur.title.is_empty() {
                            entries.push(cur);
                        }
                    }
                }
                _ => field = None,
            },
            Ok(Event::Eof) => break,
            Err(_) => break,
            _ => {}
        }
    }

    entries
}

fn append(entry: &mut FeedEntry, field: Field, text: &str) {
    let slot = match field {
        Field::Title => &mut entry.title,
        Field::Link => &mut entry.link,
        Field::Description => &mut entry.description,
        Field::Published => &mut entry.published,
    };
    slot.push_str(text);
}

/// Flatten an HTML fragment to plain text with collapsed whitespace.
/// Feed descriptions frequently embed markup.
pub fn strip_html(html: &str) -> String {
    let fragment = scraper::Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
