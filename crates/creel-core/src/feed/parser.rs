use serde::Deserialize;

use crate::{Error, Result};

/// An RSS 2.0 document as fetched, before any normalization.
/// Lives only for the duration of one ingest cycle.
#[derive(Debug, Deserialize)]
pub struct RawFeedDocument {
    pub channel: RawChannel,
}

#[derive(Debug, Deserialize)]
pub struct RawChannel {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "item")]
    pub items: Vec<RawItem>,
}

#[derive(Debug, Deserialize)]
pub struct RawItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub description: String,
    /// Kept verbatim; date normalization happens at ingest time
    #[serde(default, rename = "pubDate")]
    pub pub_date: String,
}

/// Parse bytes into the RSS channel/item structure.
///
/// Fails with `FeedParse` if the document is not well-formed RSS. Text
/// fields get a second HTML-entity decoding pass on top of the XML
/// unescaping: feeds commonly double-encode entities.
pub fn parse_document(content: &[u8]) -> Result<RawFeedDocument> {
    let mut document: RawFeedDocument =
        quick_xml::de::from_reader(content).map_err(|e| Error::FeedParse(e.to_string()))?;

    document.channel.title = decode_entities(&document.channel.title);
    document.channel.description = decode_entities(&document.channel.description);
    for item in &mut document.channel.items {
        item.title = decode_entities(&item.title);
        item.description = decode_entities(&item.description);
    }

    Ok(document)
}

fn decode_entities(text: &str) -> String {
    html_escape::decode_html_entities(text).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Boot.dev Blog &amp;amp; News</title>
    <link>https://blog.example.com</link>
    <description>Posts &amp;amp; updates</description>
    <item>
      <title>First &amp;amp; Foremost</title>
      <link>https://blog.example.com/posts/1</link>
      <description>It&amp;#39;s a post</description>
      <pubDate>Mon, 02 Jan 2006 15:04:05 MST</pubDate>
    </item>
    <item>
      <title>Second</title>
      <link>https://blog.example.com/posts/2</link>
      <description><![CDATA[Plain <b>text</b>]]></description>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parses_channel_and_items_in_order() {
        let document = parse_document(SAMPLE_RSS.as_bytes()).unwrap();

        assert_eq!(document.channel.link, "https://blog.example.com");
        assert_eq!(document.channel.items.len(), 2);
        assert_eq!(document.channel.items[0].link, "https://blog.example.com/posts/1");
        assert_eq!(document.channel.items[1].link, "https://blog.example.com/posts/2");
    }

    #[test]
    fn decodes_double_encoded_entities() {
        let document = parse_document(SAMPLE_RSS.as_bytes()).unwrap();

        assert_eq!(document.channel.title, "Boot.dev Blog & News");
        assert_eq!(document.channel.items[0].title, "First & Foremost");
        assert_eq!(document.channel.items[0].description, "It's a post");
    }

    #[test]
    fn keeps_pub_date_verbatim_and_defaults_missing_fields() {
        let document = parse_document(SAMPLE_RSS.as_bytes()).unwrap();

        assert_eq!(
            document.channel.items[0].pub_date,
            "Mon, 02 Jan 2006 15:04:05 MST"
        );
        assert_eq!(document.channel.items[1].pub_date, "");
    }

    #[test]
    fn rejects_malformed_xml() {
        let result = parse_document(b"<rss><channel><title>broken");
        assert!(matches!(result, Err(Error::FeedParse(_))));
    }

    #[test]
    fn rejects_non_rss_documents() {
        let result = parse_document(b"<html><body>not a feed</body></html>");
        assert!(matches!(result, Err(Error::FeedParse(_))));
    }

    #[test]
    fn empty_channel_parses_with_no_items() {
        let document =
            parse_document(b"<rss version=\"2.0\"><channel><title>t</title></channel></rss>")
                .unwrap();
        assert!(document.channel.items.is_empty());
    }
}
