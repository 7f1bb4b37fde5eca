//! Narration service - Read notes aloud
//!
//! Strips markup from the note body and caps the text before asking the
//! speech model for audio.

use std::sync::Arc;

use domain::SpeechClip;
use scraper::Html;
use tracing::{debug, instrument, warn};

use crate::ports::AiGatewayPort;

/// Longest text sent to the speech model, in characters
pub const MAX_SPEECH_CHARS: usize = 3000;

/// Plain text suitable for narration.
///
/// Markup is removed, whitespace collapsed, and the result cut to at most
/// [`MAX_SPEECH_CHARS`] characters.
pub fn speech_text(input: &str) -> String {
    let fragment = Html::parse_fragment(input);
    let joined = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    let collapsed = joined.split_whitespace().collect::<Vec<_>>().join(" ");

    match collapsed.char_indices().nth(MAX_SPEECH_CHARS) {
        Some((end, _)) => collapsed[..end].to_string(),
        None => collapsed,
    }
}

/// Turns note text into a speech clip
pub struct NarrationService {
    gateway: Arc<dyn AiGatewayPort>,
}

impl std::fmt::Debug for NarrationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarrationService").finish_non_exhaustive()
    }
}

impl NarrationService {
    pub fn new(gateway: Arc<dyn AiGatewayPort>) -> Self {
        Self { gateway }
    }

    /// Audio for `text` (plain or HTML); `None` when nothing can be spoken
    #[instrument(skip(self, text), fields(input_len = text.len()))]
    pub async fn narrate(&self, text: &str) -> Option<SpeechClip> {
        let spoken = speech_text(text);
        if spoken.is_empty() {
            debug!("Nothing to narrate");
            return None;
        }

        match self.gateway.generate_speech(&spoken).await {
            Ok(Some(clip)) if !clip.is_empty() => Some(clip),
            Ok(_) => {
                debug!("Speech model returned no audio");
                None
            },
            Err(e) => {
                warn!(error = %e, "Speech generation failed");
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use super::*;
    use crate::{error::ApplicationError, ports::MockAiGatewayPort};

    #[test]
    fn strips_tags_and_collapses_whitespace() {
        let html = "<h2 class=\"x\">Cells</h2>\n<p>All   living\tthings</p><ul><li>grow</li></ul>";
        assert_eq!(speech_text(html), "Cells All living things grow");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(speech_text("  Hello   world "), "Hello world");
    }

    #[test]
    fn long_text_is_truncated_on_char_boundary() {
        let text = "é".repeat(MAX_SPEECH_CHARS + 50);
        let spoken = speech_text(&text);
        assert_eq!(spoken.chars().count(), MAX_SPEECH_CHARS);
    }

    #[test]
    fn entities_are_decoded() {
        assert_eq!(speech_text("<p>Salt &amp; water</p>"), "Salt & water");
    }

    #[tokio::test]
    async fn narrate_sends_stripped_text() {
        let mut gateway = MockAiGatewayPort::new();
        gateway
            .expect_generate_speech()
            .with(eq("Cells divide"))
            .times(1)
            .returning(|_| Ok(Some(SpeechClip::wav(vec![1, 2, 3], None))));

        let service = NarrationService::new(Arc::new(gateway));
        let clip = service.narrate("<p>Cells <b>divide</b></p>").await;
        assert_eq!(clip.map(|c| c.len()), Some(3));
    }

    #[tokio::test]
    async fn empty_text_skips_gateway() {
        let service = NarrationService::new(Arc::new(MockAiGatewayPort::new()));
        assert!(service.narrate("<p>  </p>").await.is_none());
    }

    #[tokio::test]
    async fn failure_yields_none() {
        let mut gateway = MockAiGatewayPort::new();
        gateway
            .expect_generate_speech()
            .returning(|_| Err(ApplicationError::Connection("down".into())));
        let service = NarrationService::new(Arc::new(gateway));
        assert!(service.narrate("Hello").await.is_none());
    }
}
