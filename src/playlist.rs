use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

pub mod parser;
pub mod source;

pub use parser::parse;
pub use source::PlaylistSource;

/// A single stream reference from a playlist
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistEntry {
    /// Display name, the title after the `#EXTINF` comma
    pub name: Option<String>,
    /// Stream URL. Empty when the playlist had an `#EXTINF` without a URL line
    pub url: String,
    /// `#EXTINF` attributes such as `tvg-id` or `group-title`
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub http: HttpHints,
    /// Source lines this entry was parsed from, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub raw: Vec<String>,
}

/// HTTP options some players honour, set through `#EXTVLCOPT`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpHints {
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
}

impl PlaylistEntry {
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn has_url(&self) -> bool {
        !self.url.is_empty()
    }

    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Renders the entry back into playlist lines, terminated by a newline.
    ///
    /// Parsed entries are written with their original lines. A `note` is appended
    /// to the `#EXTINF` line as ` (note)`, or to a new `#EXTINF` line when the
    /// source had none.
    #[must_use]
    pub fn to_m3u(&self, note: Option<&str>) -> String {
        let mut out = String::new();

        if !self.raw.is_empty() {
            if let Some(note) = note.filter(|_| !self.raw.iter().any(|l| l.starts_with("#EXTINF"))) {
                let _ = writeln!(
                    out,
                    "#EXTINF:-1,{} ({note})",
                    self.name.as_deref().unwrap_or_default()
                );
            }
            for line in &self.raw {
                out.push_str(line);
                if let Some(note) = note.filter(|_| line.starts_with("#EXTINF")) {
                    let _ = write!(out, " ({note})");
                }
                out.push('\n');
            }
            return out;
        }

        out.push_str("#EXTINF:-1");
        for (key, value) in &self.attributes {
            let _ = write!(out, " {key}=\"{value}\"");
        }
        let _ = write!(out, ",{}", self.name.as_deref().unwrap_or_default());
        if let Some(note) = note {
            let _ = write!(out, " ({note})");
        }
        out.push('\n');

        if let Some(user_agent) = &self.http.user_agent {
            let _ = writeln!(out, "#EXTVLCOPT:http-user-agent={user_agent}");
        }
        if let Some(referrer) = &self.http.referrer {
            let _ = writeln!(out, "#EXTVLCOPT:http-referrer={referrer}");
        }

        out.push_str(&self.url);
        out.push('\n');
        out
    }
}
