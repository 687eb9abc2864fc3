use std::sync::LazyLock;

use regex::Regex;

use super::PlaylistEntry;
use crate::error::ParseError;

/// `key="value"` pairs in an `#EXTINF` header, e.g. `tvg-id="..." group-title="..."`
static ATTRIBUTE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"([\w-]+)="([^"]*)""#).unwrap());

/// Entry being assembled from directive lines until its URL line shows up
#[derive(Default)]
struct Pending {
    entry: PlaylistEntry,
    has_extinf: bool,
}

/// Parses extended M3U text into playlist entries, in source order.
///
/// Every `#EXTINF` produces one entry, even when no URL line follows it. Those
/// entries keep an empty URL and are left for the caller to skip.
///
/// # Errors
/// [`ParseError::MissingHeader`] when the text does not start with `#EXTM3U`
pub fn parse(content: &str) -> Result<Vec<PlaylistEntry>, ParseError> {
    let mut lines = content
        .trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty());

    if !lines.next().is_some_and(|l| l.starts_with("#EXTM3U")) {
        return Err(ParseError::MissingHeader);
    }

    let mut entries = Vec::new();
    let mut pending: Option<Pending> = None;

    for line in lines {
        if let Some(extinf) = line.strip_prefix("#EXTINF:") {
            // Previous #EXTINF never got a URL
            if pending.as_ref().is_some_and(|p| p.has_extinf) {
                entries.extend(pending.take().map(|p| p.entry));
            }
            let current = pending.get_or_insert_with(Pending::default);
            apply_extinf(&mut current.entry, extinf);
            current.has_extinf = true;
            current.entry.raw.push(line.to_string());
        } else if line.starts_with('#') {
            let current = pending.get_or_insert_with(Pending::default);
            if let Some(option) = line.strip_prefix("#EXTVLCOPT:") {
                apply_vlc_option(&mut current.entry, option);
            }
            current.entry.raw.push(line.to_string());
        } else {
            let mut entry = pending.take().map(|p| p.entry).unwrap_or_default();
            entry.url = line.to_string();
            entry.raw.push(line.to_string());
            entries.push(entry);
        }
    }

    if let Some(p) = pending.filter(|p| p.has_extinf) {
        entries.push(p.entry);
    }

    Ok(entries)
}

/// Fills name and attributes from the part after `#EXTINF:`
fn apply_extinf(entry: &mut PlaylistEntry, extinf: &str) {
    let (header, title) = split_title(extinf);

    for caps in ATTRIBUTE_REGEX.captures_iter(header) {
        entry
            .attributes
            .insert(caps[1].to_lowercase(), caps[2].trim().to_string());
    }

    let title = title.trim();
    entry.name = if title.is_empty() {
        entry.attribute("tvg-name").map(ToString::to_string)
    } else {
        Some(title.to_string())
    };
}

/// Splits `-1 group-title="A, B",Title` on the first comma outside of quotes
fn split_title(extinf: &str) -> (&str, &str) {
    let mut quoted = false;
    for (i, c) in extinf.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ',' if !quoted => return (&extinf[..i], &extinf[i + 1..]),
            _ => {}
        }
    }
    (extinf, "")
}

fn apply_vlc_option(entry: &mut PlaylistEntry, option: &str) {
    let Some((key, value)) = option.split_once('=') else {
        return;
    };
    let value = value.trim().to_string();
    match key.trim().to_lowercase().as_str() {
        "http-user-agent" => entry.http.user_agent = Some(value),
        "http-referrer" | "http-referer" => entry.http.referrer = Some(value),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn parses_extinf_attributes() {
        let entries = parse(indoc! {r#"
            #EXTM3U x-tvg-url="http://example.com/epg.xml"
            #EXTINF:-1 tvg-id="cspan.us" tvg-logo="http://example.com/c.png" group-title="Legislative, US",C-SPAN
            http://example.com/cspan.m3u8
        "#})
        .unwrap();

        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.name.as_deref(), Some("C-SPAN"));
        assert_eq!(entry.url, "http://example.com/cspan.m3u8");
        assert_eq!(entry.attribute("tvg-id"), Some("cspan.us"));
        assert_eq!(entry.attribute("group-title"), Some("Legislative, US"));
        assert_eq!(entry.raw.len(), 2);
    }

    #[test]
    fn extinf_without_url_keeps_empty_entry() {
        let entries = parse(indoc! {"
            #EXTM3U
            #EXTINF:-1,Broken
            #EXTINF:-1,Working
            http://example.com/ok.ts
            #EXTINF:-1,Trailing
        "})
        .unwrap();

        let names: Vec<_> = entries.iter().map(|e| e.name.as_deref()).collect();
        assert_eq!(names, [Some("Broken"), Some("Working"), Some("Trailing")]);
        assert!(!entries[0].has_url());
        assert!(entries[1].has_url());
        assert!(!entries[2].has_url());
    }

    #[test]
    fn vlc_options_set_http_hints() {
        let entries = parse(indoc! {"
            #EXTM3U
            #EXTVLCOPT:http-referrer=http://example.com/
            #EXTINF:-1,Radio
            #EXTVLCOPT:http-user-agent=Mozilla/5.0
            http://example.com/radio.mp3
        "})
        .unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].http.referrer.as_deref(), Some("http://example.com/"));
        assert_eq!(entries[0].http.user_agent.as_deref(), Some("Mozilla/5.0"));
        assert_eq!(entries[0].raw.len(), 4);
    }

    #[test]
    fn bare_urls_become_entries() {
        let entries = parse("#EXTM3U\nhttp://a/1.ts\r\nhttp://a/2.ts\n").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].url, "http://a/2.ts");
        assert_eq!(entries[1].name, None);
    }

    #[test]
    fn directives_before_bare_url_survive_rendering() {
        let entries = parse("#EXTM3U\n#EXTGRP:News\nhttp://a/news.ts\n").unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].to_m3u(None), "#EXTGRP:News\nhttp://a/news.ts\n");
    }

    #[test]
    fn title_falls_back_to_tvg_name() {
        let entries = parse("#EXTM3U\n#EXTINF:-1 tvg-name=\"Fallback\",\nhttp://a/1.ts\n").unwrap();
        assert_eq!(entries[0].name.as_deref(), Some("Fallback"));
    }

    #[test]
    fn rejects_missing_header() {
        assert!(matches!(
            parse("http://example.com/a.ts\n"),
            Err(ParseError::MissingHeader)
        ));
        assert!(matches!(parse(""), Err(ParseError::MissingHeader)));
    }

    #[test]
    fn header_only_is_empty() {
        assert!(parse("\u{feff}#EXTM3U\n").unwrap().is_empty());
    }
}
