//! Generated note entities

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::value_objects::{ClassLevel, DetailLevel};

const DEFAULT_SOURCE_TITLE: &str = "External Resource";
const DEFAULT_SOURCE_SNIPPET: &str = "Reference link found via Google Search.";

/// A web source the model cited while writing the notes
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    /// Hostname of `url`, e.g. "www.britannica.com"
    pub source: String,
    pub snippet: String,
}

impl SearchResult {
    /// Build a result from a grounding citation (`web.uri`, `web.title`)
    pub fn from_web_citation(uri: impl Into<String>, title: Option<String>) -> Self {
        let url = uri.into();
        let source = hostname_of(&url).unwrap_or_default();
        Self {
            title: title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_SOURCE_TITLE.to_string()),
            url,
            source,
            snippet: DEFAULT_SOURCE_SNIPPET.to_string(),
        }
    }
}

/// Host part of an absolute URL, lowercased; IPv6 literals keep their brackets
fn hostname_of(url: &str) -> Option<String> {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
}

/// Remove sources with a repeated URL, keeping the first occurrence in order
pub fn unique_sources(sources: impl IntoIterator<Item = SearchResult>) -> Vec<SearchResult> {
    let mut seen = std::collections::HashSet::new();
    sources
        .into_iter()
        .filter(|s| seen.insert(s.url.clone()))
        .collect()
}

/// An illustration returned by the image model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    /// Base64 payload without the `data:` prefix
    pub base64_data: String,
}

impl GeneratedImage {
    pub fn jpeg(base64_data: impl Into<String>) -> Self {
        Self {
            mime_type: "image/jpeg".to_string(),
            base64_data: base64_data.into(),
        }
    }

    /// `data:<mime>;base64,<payload>` for direct use in an `<img src>`
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.base64_data)
    }
}

/// Composed study notes for one topic
///
/// Field names serialize in camelCase, matching the stored note format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NoteContent {
    pub html_content: String,
    pub topic_name: String,
    pub subject_name: String,
    pub class_level: ClassLevel,
    #[serde(default)]
    pub detail_level: DetailLevel,
    #[serde(default)]
    pub sources: Vec<SearchResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_image: Option<String>,
}

/// Entry of the saved-notes list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SavedNoteSummary {
    pub key: String,
    pub topic_name: String,
    pub subject_name: String,
    pub class_level: ClassLevel,
    pub detail_level: DetailLevel,
    pub stored_at: DateTime<Utc>,
    pub size_bytes: usize,
    pub has_image: bool,
}

impl SavedNoteSummary {
    pub fn from_note(
        key: impl Into<String>,
        note: &NoteContent,
        stored_at: DateTime<Utc>,
        size_bytes: usize,
    ) -> Self {
        Self {
            key: key.into(),
            topic_name: note.topic_name.clone(),
            subject_name: note.subject_name.clone(),
            class_level: note.class_level,
            detail_level: note.detail_level,
            stored_at,
            size_bytes,
            has_image: note.generated_image.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(url: &str) -> SearchResult {
        SearchResult::from_web_citation(url, Some(format!("title of {url}")))
    }

    #[test]
    fn citation_extracts_hostname() {
        let s = SearchResult::from_web_citation(
            "https://www.britannica.com/science/photosynthesis?x=1",
            Some("Photosynthesis".to_string()),
        );
        assert_eq!(s.source, "www.britannica.com");
        assert_eq!(s.title, "Photosynthesis");
        assert_eq!(s.snippet, DEFAULT_SOURCE_SNIPPET);
    }

    #[test]
    fn citation_defaults_title() {
        let s = SearchResult::from_web_citation("https://example.org", None);
        assert_eq!(s.title, "External Resource");
        assert_eq!(s.source, "example.org");
    }

    #[test]
    fn hostname_handles_ports_and_credentials() {
        assert_eq!(hostname_of("http://user:pw@host.ug:8080/a").as_deref(), Some("host.ug"));
        assert_eq!(hostname_of("not a url"), None);
    }

    #[test]
    fn hostname_is_lowercased() {
        let s = SearchResult::from_web_citation("https://WWW.Britannica.COM/x", None);
        assert_eq!(s.source, "www.britannica.com");
    }

    #[test]
    fn hostname_keeps_ipv6_literal() {
        let s = SearchResult::from_web_citation("http://[2001:db8::1]:8080/x", None);
        assert_eq!(s.source, "[2001:db8::1]");
    }

    #[test]
    fn unparseable_url_has_empty_source() {
        let s = SearchResult::from_web_citation("/relative/path", None);
        assert_eq!(s.source, "");
    }

    #[test]
    fn unique_sources_keeps_first() {
        let a = source("https://a.example");
        let b = source("https://b.example");
        let mut a2 = source("https://a.example");
        a2.title = "second".to_string();

        let out = unique_sources(vec![a.clone(), b.clone(), a2]);
        assert_eq!(out, vec![a, b]);
    }

    #[test]
    fn data_uri_format() {
        let img = GeneratedImage::jpeg("QUJD");
        assert_eq!(img.data_uri(), "data:image/jpeg;base64,QUJD");
    }

    #[test]
    fn note_content_uses_camel_case() {
        let note = NoteContent {
            html_content: "<p>x</p>".to_string(),
            topic_name: "Photosynthesis".to_string(),
            subject_name: "Biology".to_string(),
            class_level: ClassLevel::S2,
            detail_level: DetailLevel::Detailed,
            sources: vec![],
            generated_image: None,
        };
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["htmlContent"], "<p>x</p>");
        assert_eq!(json["classLevel"], "S2");
        assert_eq!(json["detailLevel"], "detailed");
        assert!(json.get("generatedImage").is_none());
    }

    #[test]
    fn note_content_without_detail_defaults_to_concise() {
        let json = r#"{"htmlContent":"h","topicName":"t","subjectName":"s","classLevel":"S1","sources":[]}"#;
        let note: NoteContent = serde_json::from_str(json).unwrap();
        assert_eq!(note.detail_level, DetailLevel::Concise);
    }

    #[test]
    fn summary_reflects_image_presence() {
        let note = NoteContent {
            html_content: String::new(),
            topic_name: "Motion".to_string(),
            subject_name: "Physics".to_string(),
            class_level: ClassLevel::S1,
            detail_level: DetailLevel::Concise,
            sources: vec![],
            generated_image: Some("data:image/jpeg;base64,AA".to_string()),
        };
        let summary = SavedNoteSummary::from_note("k", &note, Utc::now(), 42);
        assert!(summary.has_image);
        assert_eq!(summary.size_bytes, 42);
    }
}
