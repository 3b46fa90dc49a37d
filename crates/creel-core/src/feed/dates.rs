use chrono::{DateTime, Utc};

/// Named zones permitted by the RFC 822/1123 date grammar.
const OBSOLETE_ZONES: &[(&str, &str)] = &[
    ("UT", "+0000"),
    ("GMT", "+0000"),
    ("EST", "-0500"),
    ("EDT", "-0400"),
    ("CST", "-0600"),
    ("CDT", "-0500"),
    ("MST", "-0700"),
    ("MDT", "-0600"),
    ("PST", "-0800"),
    ("PDT", "-0700"),
];

/// Parse a feed item's publication date.
///
/// Real-world feeds are inconsistent about date formatting, so this tries an
/// ordered list of accepted formats and returns the first success:
///
/// 1. RFC 1123/2822 with zone, e.g. `Mon, 02 Jan 2006 15:04:05 MST`
/// 2. RFC 3339, e.g. `2006-01-02T15:04:05Z`
/// 3. RFC 822 with zone (two-digit year, no seconds), e.g. `02 Jan 06 15:04 MST`
///
/// A string that matches none of them yields `None`, never an error: the
/// post is stored without a publication date rather than dropped.
pub fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc2822(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    parse_rfc822(raw)
}

/// RFC 822 `02 Jan 06 15:04 MST` form. chrono has no named-zone parsing for
/// custom formats, so the trailing zone token is rewritten to its numeric
/// offset before handing the string to `%d %b %y %H:%M %z`.
fn parse_rfc822(raw: &str) -> Option<DateTime<Utc>> {
    let (stem, zone) = raw.rsplit_once(' ')?;

    let offset = if zone.starts_with('+') || zone.starts_with('-') {
        zone
    } else {
        OBSOLETE_ZONES
            .iter()
            .find(|(name, _)| *name == zone)
            .map(|(_, offset)| *offset)?
    };

    let rebuilt = format!("{} {}", stem, offset);
    DateTime::parse_from_str(&rebuilt, "%d %b %y %H:%M %z")
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn parses_rfc1123_with_named_zone() {
        let parsed = parse_pub_date("Mon, 02 Jan 2006 15:04:05 MST").unwrap();
        // MST is UTC-7
        assert_eq!(parsed, Utc.with_ymd_and_hms(2006, 1, 2, 22, 4, 5).unwrap());
    }

    #[test]
    fn parses_rfc1123_with_numeric_offset() {
        let parsed = parse_pub_date("Wed, 13 May 2020 15:54:02 +0200").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2020, 5, 13, 13, 54, 2).unwrap());
    }

    #[test]
    fn parses_rfc3339() {
        let parsed = parse_pub_date("2006-01-02T15:04:05Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2006, 1, 2, 15, 4, 5).unwrap());
    }

    #[test]
    fn parses_rfc822_short_form() {
        let parsed = parse_pub_date("02 Jan 06 15:04 MST").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2006, 1, 2, 22, 4, 0).unwrap());
    }

    #[test]
    fn parses_rfc822_numeric_offset() {
        let parsed = parse_pub_date("02 Jan 06 15:04 -0700").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2006, 1, 2, 22, 4, 0).unwrap());
    }

    #[test]
    fn garbage_is_not_an_error() {
        assert!(parse_pub_date("garbage").is_none());
        assert!(parse_pub_date("2006-99-99T00:00:00Z").is_none());
    }

    #[test]
    fn blank_input_is_none() {
        assert!(parse_pub_date("").is_none());
        assert!(parse_pub_date("   ").is_none());
    }
}
