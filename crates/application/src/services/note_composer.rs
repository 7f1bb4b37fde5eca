//! Note composer - Cache-first generation of study notes
//!
//! On a cache miss the text and image requests run concurrently and are
//! settled independently; a failed illustration never costs the student
//! their notes.

use std::{fmt, sync::Arc, time::Duration};

use domain::{
    GeneratedImage, NoteContent, NoteKey, SavedNoteSummary, unique_sources,
};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{AiGatewayPort, CachePort, CachePortExt, CacheStats, NotesRequest, ttl},
};

/// Token the model emits where the illustration belongs
pub const IMAGE_PLACEHOLDER: &str = "[[IMAGE_PLACEHOLDER]]";

/// Body returned when text generation fails
pub const NOTES_ERROR_HTML: &str =
    r#"<div class="p-4 bg-red-50 text-red-700">Error generating notes. Please try again.</div>"#;

/// Body returned when no API key is configured
pub const MISSING_KEY_HTML: &str =
    "<p class='text-red-500'>API Key is missing. Please configure the API_KEY.</p>";

/// Body returned when the AI service cannot be reached
pub const CONNECTION_ERROR_HTML: &str = r#"<div class="p-6 bg-red-50 text-red-700 rounded-lg border border-red-200">
  <h3 class="font-bold text-lg mb-2">Connection Error</h3>
  <p>We couldn't generate notes for this topic right now. Please check your internet connection and try again.</p>
</div>"#;

/// Composes notes from the AI gateway and keeps them in the cache
pub struct NoteComposer {
    gateway: Arc<dyn AiGatewayPort>,
    cache: Arc<dyn CachePort>,
    note_ttl: Duration,
}

impl fmt::Debug for NoteComposer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NoteComposer")
            .field("cache", &self.cache)
            .field("note_ttl", &self.note_ttl)
            .finish_non_exhaustive()
    }
}

impl NoteComposer {
    pub fn new(gateway: Arc<dyn AiGatewayPort>, cache: Arc<dyn CachePort>) -> Self {
        Self {
            gateway,
            cache,
            note_ttl: ttl::NOTES,
        }
    }

    /// Override how long composed notes stay cached
    #[must_use]
    pub const fn with_ttl(mut self, note_ttl: Duration) -> Self {
        self.note_ttl = note_ttl;
        self
    }

    /// Return notes for a topic, generating them on a cache miss.
    ///
    /// Never fails: generation errors become an HTML error body, and such
    /// results are not cached so the next call retries.
    #[instrument(skip(self, request), fields(
        topic = %request.topic,
        subject = %request.subject,
        class = %request.class_level,
        detail = %request.detail_level
    ))]
    pub async fn compose(&self, request: &NotesRequest) -> NoteContent {
        let key = NoteKey::derive(
            &request.subject,
            request.class_level,
            &request.topic,
            request.detail_level,
        );

        if let Some(cached) = self.cached(&key).await {
            debug!(key = %key, "Serving notes from cache");
            return cached;
        }

        let (text, image) = tokio::join!(
            self.gateway.generate_notes(request),
            self.gateway.generate_image(&request.topic, &request.subject),
        );

        let generated = match text {
            Ok(generated) => generated,
            Err(e) => {
                warn!(error = %e, "Text generation failed");
                return failure_note(request, &e);
            },
        };

        let image = image.unwrap_or_else(|e| {
            warn!(error = %e, "Image generation failed");
            None
        });

        let html = place_image(
            &strip_code_fences(&generated.html),
            image.as_ref(),
            &request.topic,
        );

        let note = NoteContent {
            html_content: html,
            topic_name: request.topic.clone(),
            subject_name: request.subject.clone(),
            class_level: request.class_level,
            detail_level: request.detail_level,
            sources: unique_sources(generated.sources),
            generated_image: image.map(|img| img.data_uri()),
        };

        match self.cache.put_json(key.as_str(), &note, self.note_ttl).await {
            Ok(()) => info!(key = %key, "Cached generated notes"),
            Err(e) => warn!(key = %key, error = %e, "Failed to save notes to cache"),
        }

        note
    }

    /// Cached notes, treating unreadable entries as a miss
    async fn cached(&self, key: &NoteKey) -> Option<NoteContent> {
        match self.cache.get_json::<NoteContent>(key.as_str()).await {
            Ok(Some(note)) if !note.html_content.is_empty() => Some(note),
            Ok(_) => None,
            Err(e) => {
                warn!(key = %key, error = %e, "Ignoring unreadable cache entry");
                None
            },
        }
    }

    /// Saved notes, most recent first; entries that fail to decode are skipped
    #[instrument(skip(self))]
    pub async fn saved_notes(&self) -> Result<Vec<SavedNoteSummary>, ApplicationError> {
        let entries = self.cache.list_entries().await?;

        Ok(entries
            .into_iter()
            .filter(|entry| NoteKey::is_note_key(&entry.key))
            .filter_map(|entry| {
                match serde_json::from_slice::<NoteContent>(&entry.value) {
                    Ok(note) => Some(SavedNoteSummary::from_note(
                        entry.key,
                        &note,
                        entry.stored_at,
                        entry.value.len(),
                    )),
                    Err(e) => {
                        debug!(key = %entry.key, error = %e, "Skipping undecodable saved note");
                        None
                    },
                }
            })
            .collect())
    }

    /// Delete one saved note
    #[instrument(skip(self))]
    pub async fn delete_saved(&self, key: &str) -> Result<(), ApplicationError> {
        let key = NoteKey::from_raw(key)?;
        self.cache.invalidate(key.as_str()).await?;
        info!(key = %key, "Deleted saved notes");
        Ok(())
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

fn failure_note(request: &NotesRequest, error: &ApplicationError) -> NoteContent {
    let html = match error {
        ApplicationError::NotConfigured(_) => MISSING_KEY_HTML,
        ApplicationError::Connection(_) => CONNECTION_ERROR_HTML,
        _ => NOTES_ERROR_HTML,
    };
    NoteContent {
        html_content: html.to_string(),
        topic_name: request.topic.clone(),
        subject_name: request.subject.clone(),
        class_level: request.class_level,
        detail_level: request.detail_level,
        sources: Vec::new(),
        generated_image: None,
    }
}

/// Remove markdown code fences the model sometimes wraps HTML in
pub fn strip_code_fences(html: &str) -> String {
    html.replace("```html", "").replace("```", "").trim().to_string()
}

/// Substitute the image placeholder.
///
/// With an image the first placeholder becomes a captioned figure (or the
/// figure is prepended when the model forgot the placeholder). Every other
/// occurrence is removed.
pub fn place_image(html: &str, image: Option<&GeneratedImage>, topic: &str) -> String {
    let Some(image) = image else {
        return html.replace(IMAGE_PLACEHOLDER, "");
    };

    let figure = figure_block(image, topic);
    match html.find(IMAGE_PLACEHOLDER) {
        Some(pos) => {
            let rest = &html[pos + IMAGE_PLACEHOLDER.len()..];
            format!("{}{figure}{}", &html[..pos], rest.replace(IMAGE_PLACEHOLDER, ""))
        },
        None => format!("{figure}{html}"),
    }
}

fn figure_block(image: &GeneratedImage, topic: &str) -> String {
    let topic = tera::escape_html(topic);
    format!(
        r#"<figure class="my-6"><img src="{}" alt="Illustration of {topic}" class="w-full rounded-lg shadow-md" /><figcaption class="text-sm text-gray-500 text-center mt-2">Illustration: {topic}</figcaption></figure>"#,
        image.data_uri()
    )
}

#[cfg(test)]
mod tests {
    use domain::{ClassLevel, DetailLevel, SearchResult};

    use super::*;
    use crate::{
        ports::{GeneratedNotes, MockAiGatewayPort},
        test_support::{FailingCache, InMemoryCache},
    };

    fn photosynthesis() -> NotesRequest {
        NotesRequest::new("Photosynthesis", "Biology", ClassLevel::S2, DetailLevel::Detailed)
    }

    fn source(url: &str) -> SearchResult {
        SearchResult::from_web_citation(url, Some(url.to_string()))
    }

    fn notes_with_placeholder() -> GeneratedNotes {
        GeneratedNotes {
            html: format!("```html\n<h2>Photosynthesis</h2>{IMAGE_PLACEHOLDER}<p>Light energy.</p>\n```"),
            sources: vec![
                source("https://a.example"),
                source("https://b.example"),
                source("https://a.example"),
            ],
        }
    }

    fn composer(gateway: MockAiGatewayPort, cache: Arc<dyn CachePort>) -> NoteComposer {
        NoteComposer::new(Arc::new(gateway), cache)
    }

    #[tokio::test]
    async fn photosynthesis_scenario_composes_and_caches() {
        let mut gateway = MockAiGatewayPort::new();
        gateway
            .expect_generate_notes()
            .times(1)
            .returning(|_| Ok(notes_with_placeholder()));
        gateway
            .expect_generate_image()
            .times(1)
            .returning(|_, _| Ok(Some(GeneratedImage::jpeg("QUJD"))));

        let cache = Arc::new(InMemoryCache::default());
        let composer = composer(gateway, cache.clone());

        let first = composer.compose(&photosynthesis()).await;

        assert!(!first.html_content.contains(IMAGE_PLACEHOLDER));
        assert!(!first.html_content.contains("```"));
        assert_eq!(first.html_content.matches("<figure").count(), 1);
        assert!(first.html_content.starts_with("<h2>Photosynthesis</h2><figure"));
        assert_eq!(first.sources.len(), 2);
        assert_eq!(first.sources[0].url, "https://a.example");
        assert_eq!(first.sources[1].url, "https://b.example");
        assert_eq!(
            first.generated_image.as_deref(),
            Some("data:image/jpeg;base64,QUJD")
        );
        assert_eq!(first.detail_level, DetailLevel::Detailed);

        // Mock expectations (times(1)) prove the second call is a cache hit.
        let second = composer.compose(&photosynthesis()).await;
        assert_eq!(first, second);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn image_failure_removes_placeholder() {
        let mut gateway = MockAiGatewayPort::new();
        gateway
            .expect_generate_notes()
            .returning(|_| Ok(notes_with_placeholder()));
        gateway
            .expect_generate_image()
            .returning(|_, _| Err(ApplicationError::Generation("quota".into())));

        let composer = composer(gateway, Arc::new(InMemoryCache::default()));
        let note = composer.compose(&photosynthesis()).await;

        assert!(!note.html_content.contains(IMAGE_PLACEHOLDER));
        assert!(!note.html_content.contains("<figure"));
        assert!(note.generated_image.is_none());
    }

    #[tokio::test]
    async fn text_failure_returns_error_fragment_and_skips_cache() {
        let mut gateway = MockAiGatewayPort::new();
        gateway
            .expect_generate_notes()
            .times(2)
            .returning(|_| Err(ApplicationError::Generation("500".into())));
        gateway
            .expect_generate_image()
            .times(2)
            .returning(|_, _| Ok(Some(GeneratedImage::jpeg("QUJD"))));

        let cache = Arc::new(InMemoryCache::default());
        let composer = composer(gateway, cache.clone());

        let note = composer.compose(&photosynthesis()).await;
        assert_eq!(note.html_content, NOTES_ERROR_HTML);
        assert!(note.sources.is_empty());
        assert!(note.generated_image.is_none());
        assert_eq!(cache.len(), 0);

        // Next call misses again and retries the gateway.
        let _ = composer.compose(&photosynthesis()).await;
    }

    #[tokio::test]
    async fn missing_key_returns_static_message() {
        let mut gateway = MockAiGatewayPort::new();
        gateway
            .expect_generate_notes()
            .returning(|_| Err(ApplicationError::NotConfigured("API key".into())));
        gateway
            .expect_generate_image()
            .returning(|_, _| Err(ApplicationError::NotConfigured("API key".into())));

        let composer = composer(gateway, Arc::new(InMemoryCache::default()));
        let note = composer.compose(&photosynthesis()).await;
        assert_eq!(note.html_content, MISSING_KEY_HTML);
    }

    #[tokio::test]
    async fn connection_failure_returns_connection_fragment() {
        let mut gateway = MockAiGatewayPort::new();
        gateway
            .expect_generate_notes()
            .returning(|_| Err(ApplicationError::Connection("refused".into())));
        gateway.expect_generate_image().returning(|_, _| Ok(None));

        let composer = composer(gateway, Arc::new(InMemoryCache::default()));
        let note = composer.compose(&photosynthesis()).await;
        assert!(note.html_content.contains("Connection Error"));
    }

    #[tokio::test]
    async fn cache_write_failure_still_returns_notes() {
        let mut gateway = MockAiGatewayPort::new();
        gateway
            .expect_generate_notes()
            .returning(|_| Ok(notes_with_placeholder()));
        gateway.expect_generate_image().returning(|_, _| Ok(None));

        let composer = composer(gateway, Arc::new(FailingCache));
        let note = composer.compose(&photosynthesis()).await;
        assert!(note.html_content.contains("Light energy."));
    }

    #[tokio::test]
    async fn malformed_cache_entry_is_a_miss() {
        let request = photosynthesis();
        let key = NoteKey::derive(
            &request.subject,
            request.class_level,
            &request.topic,
            request.detail_level,
        );
        let cache = Arc::new(InMemoryCache::default());
        cache
            .set_bytes(key.as_str(), b"{not json".to_vec(), ttl::NOTES)
            .await
            .unwrap();

        let mut gateway = MockAiGatewayPort::new();
        gateway
            .expect_generate_notes()
            .times(1)
            .returning(|_| Ok(notes_with_placeholder()));
        gateway.expect_generate_image().returning(|_, _| Ok(None));

        let composer = composer(gateway, cache);
        let note = composer.compose(&request).await;
        assert!(note.html_content.contains("Photosynthesis"));
    }

    #[tokio::test]
    async fn saved_notes_lists_and_deletes() {
        let mut gateway = MockAiGatewayPort::new();
        gateway
            .expect_generate_notes()
            .returning(|_| Ok(notes_with_placeholder()));
        gateway.expect_generate_image().returning(|_, _| Ok(None));

        let cache = Arc::new(InMemoryCache::default());
        cache
            .set_bytes("unrelated_key", b"{}".to_vec(), ttl::NOTES)
            .await
            .unwrap();
        let composer = composer(gateway, cache.clone());
        composer.compose(&photosynthesis()).await;

        let saved = composer.saved_notes().await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].topic_name, "Photosynthesis");
        assert_eq!(saved[0].class_level, ClassLevel::S2);
        assert!(!saved[0].has_image);

        composer.delete_saved(&saved[0].key).await.unwrap();
        assert!(composer.saved_notes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_rejects_foreign_keys() {
        let composer = composer(MockAiGatewayPort::new(), Arc::new(InMemoryCache::default()));
        let err = composer.delete_saved("../../etc/passwd").await.unwrap_err();
        assert!(matches!(err, ApplicationError::Domain(_)));
    }

    #[test]
    fn placeholder_absent_prepends_figure() {
        let html = place_image("<p>x</p>", Some(&GeneratedImage::jpeg("AA")), "Cells");
        assert!(html.starts_with("<figure"));
        assert!(html.ends_with("<p>x</p>"));
    }

    #[test]
    fn duplicate_placeholders_keep_one_figure() {
        let html = format!("a{IMAGE_PLACEHOLDER}b{IMAGE_PLACEHOLDER}c");
        let out = place_image(&html, Some(&GeneratedImage::jpeg("AA")), "Cells");
        assert_eq!(out.matches("<figure").count(), 1);
        assert!(!out.contains(IMAGE_PLACEHOLDER));
        assert!(out.starts_with("a<figure"));
        assert!(out.ends_with("</figure>bc"));
    }

    #[test]
    fn figure_escapes_topic() {
        let out = place_image("", Some(&GeneratedImage::jpeg("AA")), "Acids <& Bases>");
        assert!(out.contains("Acids &lt;&amp; Bases&gt;"));
        assert!(!out.contains("<& Bases>"));

        let quoted = place_image("", Some(&GeneratedImage::jpeg("AA")), r#"Say "hi""#);
        assert!(quoted.contains(r#"alt="Illustration of Say &quot;hi&quot;""#));
    }

    #[test]
    fn strips_fences() {
        assert_eq!(strip_code_fences("```html\n<p>a</p>\n```"), "<p>a</p>");
        assert_eq!(strip_code_fences("<p>b</p>"), "<p>b</p>");
    }
}
