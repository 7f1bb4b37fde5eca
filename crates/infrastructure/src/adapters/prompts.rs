//! Prompt templates for the Gemini models

use application::{IMAGE_PLACEHOLDER, ports::NotesRequest};
use domain::{ClassLevel, DetailLevel};
use serde_json::{Value, json};

/// Prompt for grounded HTML study notes
pub fn notes_prompt(request: &NotesRequest) -> String {
    let (depth, subtopics) = match request.detail_level {
        DetailLevel::Concise => (
            "concise yet detailed",
            "Break the main topic into 3-5 distinct subtopics with clear explanations.",
        ),
        DetailLevel::Detailed => (
            "comprehensive, in-depth",
            "Break the main topic into 5-8 distinct subtopics, each explained in depth with \
             worked examples where useful.",
        ),
    };

    format!(
        r#"You are a senior teacher for the Uganda NCDC Competency-Based Curriculum.
Generate {depth} study notes for:
**Subject:** {subject}
**Class:** {class}
**Topic:** {topic}

**OUTPUT RULES:**
1. Return ONLY raw HTML body content. No <html>, <head>, or markdown backticks.
2. Use these Tailwind classes:
   - Headers: <h2 class="text-2xl font-bold text-uganda-dark mt-8 mb-4 border-b border-gray-200 pb-2">
   - Subheaders: <h3 class="text-xl font-semibold text-uganda-green mt-6 mb-3">
   - Paragraphs: <p class="mb-4 leading-relaxed text-gray-800">
   - Lists: <ul class="list-disc pl-5 mb-4 space-y-2 text-gray-800">
   - Key Points Box: <div class="bg-green-50 border-l-4 border-uganda-green p-4 my-6 rounded-r">
   - Activity/Example Box: <div class="bg-yellow-50 border border-yellow-200 rounded-lg p-5 my-6">
3. Insert the exact text {placeholder} once, on its own line, where an illustration of the topic fits best (usually right after the introduction).

**CONTENT STRUCTURE:**
1. **Introduction**: Brief definition/overview.
2. **Key Subtopics**: {subtopics}
3. **Local Relevance**: Cite examples relevant to Uganda/East Africa (e.g., Lake Victoria, Mt. Rwenzori, local crops, common names).
4. **Competency Activity**: A short "Activity of Integration" or practical task.
5. **Summary**: Bullet points of what to remember.

Make it educational, structured, and easy to read on mobile."#,
        subject = request.subject,
        class = request.class_level,
        topic = request.topic,
        placeholder = IMAGE_PLACEHOLDER,
    )
}

/// Prompt for the topic illustration
pub fn image_prompt(topic: &str, subject: &str) -> String {
    format!(
        "Educational illustration or diagram of {topic} related to {subject}. Scientific, clear, \
         high quality, white background preferred."
    )
}

/// Prompt for a five-question practice quiz
pub fn quiz_prompt(topic: &str, subject: &str, class_level: ClassLevel) -> String {
    format!(
        "You are a senior teacher for the Uganda NCDC Competency-Based Curriculum.\n\
         Write exactly 5 multiple-choice questions to test a {class_level} student on \
         \"{topic}\" in {subject}.\n\
         Each question has exactly 4 options, one correct answer given by its zero-based index, \
         and a one or two sentence explanation of why it is correct.\n\
         Prefer questions that check understanding over recall, and use Ugandan contexts where \
         natural."
    )
}

/// Response schema constraining the quiz output
pub fn quiz_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "question": { "type": "STRING" },
                "options": {
                    "type": "ARRAY",
                    "items": { "type": "STRING" }
                },
                "correctAnswerIndex": { "type": "INTEGER" },
                "explanation": { "type": "STRING" }
            },
            "required": ["question", "options", "correctAnswerIndex", "explanation"]
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(detail: DetailLevel) -> NotesRequest {
        NotesRequest::new("Photosynthesis", "Biology", ClassLevel::S2, detail)
    }

    #[test]
    fn notes_prompt_embeds_request() {
        let prompt = notes_prompt(&request(DetailLevel::Concise));
        assert!(prompt.contains("**Subject:** Biology"));
        assert!(prompt.contains("**Class:** S2"));
        assert!(prompt.contains("**Topic:** Photosynthesis"));
        assert!(prompt.contains(IMAGE_PLACEHOLDER));
        assert!(prompt.contains("3-5 distinct subtopics"));
        assert!(prompt.contains("Activity of Integration"));
    }

    #[test]
    fn detailed_prompt_asks_for_more_subtopics() {
        let prompt = notes_prompt(&request(DetailLevel::Detailed));
        assert!(prompt.contains("5-8 distinct subtopics"));
        assert!(!prompt.contains("3-5 distinct subtopics"));
    }

    #[test]
    fn notes_prompt_is_deterministic() {
        let a = notes_prompt(&request(DetailLevel::Detailed));
        let b = notes_prompt(&request(DetailLevel::Detailed));
        assert_eq!(a, b);
    }

    #[test]
    fn image_prompt_mentions_topic_and_subject() {
        let prompt = image_prompt("Volcanoes", "Geography");
        assert!(prompt.starts_with("Educational illustration or diagram of Volcanoes related to Geography."));
    }

    #[test]
    fn quiz_schema_requires_all_fields() {
        let schema = quiz_schema();
        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(schema["items"]["required"].as_array().unwrap().len(), 4);
    }
}
