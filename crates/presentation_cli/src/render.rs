//! Plain-text rendering of catalog, notes and quiz output

use std::io::{self, Write};

use domain::{ClassLevel, NoteContent, QuizQuestion, SavedNoteSummary, Subject, Topic, catalog};

const OPTION_LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

pub fn subjects(out: &mut impl Write, subjects: &[Subject]) -> io::Result<()> {
    for subject in subjects {
        writeln!(out, "{:<10} {:<22} {}", subject.id, subject.name, subject.description)?;
    }
    Ok(())
}

pub fn topics(out: &mut impl Write, subject: &Subject, class_level: ClassLevel, topics: &[Topic]) -> io::Result<()> {
    writeln!(out, "{} {}", subject.name, class_level)?;
    for (i, topic) in topics.iter().enumerate() {
        writeln!(out, "{:>3}. {}", i + 1, topic.name)?;
    }
    Ok(())
}

pub fn search_results(out: &mut impl Write, query: &str, results: &[Topic]) -> io::Result<()> {
    if results.is_empty() {
        return writeln!(out, "No topics match \"{query}\"");
    }
    for topic in results {
        let subject = catalog::subject_by_id(&topic.subject_id).map_or(topic.subject_id.as_str(), |s| s.name);
        writeln!(out, "{subject} | {} | {}", topic.class_level, topic.name)?;
    }
    Ok(())
}

pub fn note(out: &mut impl Write, note: &NoteContent) -> io::Result<()> {
    writeln!(
        out,
        "# {} ({} {}, {})",
        note.topic_name, note.subject_name, note.class_level, note.detail_level
    )?;
    writeln!(out)?;
    writeln!(out, "{}", note.html_content)?;
    if !note.sources.is_empty() {
        writeln!(out)?;
        writeln!(out, "Sources:")?;
        for source in &note.sources {
            writeln!(out, "  - {} <{}>", source.title, source.url)?;
        }
    }
    Ok(())
}

pub fn quiz(out: &mut impl Write, topic: &str, questions: &[QuizQuestion]) -> io::Result<()> {
    if questions.is_empty() {
        return writeln!(out, "No quiz is available for {topic} right now.");
    }
    for (n, question) in questions.iter().enumerate() {
        writeln!(out, "{}. {}", n + 1, question.question)?;
        for (letter, option) in OPTION_LETTERS.iter().zip(&question.options) {
            writeln!(out, "   {letter}) {option}")?;
        }
        let answer = OPTION_LETTERS
            .get(question.correct_answer_index)
            .copied()
            .unwrap_or('?');
        writeln!(out, "   Answer: {answer}. {}", question.explanation)?;
        writeln!(out)?;
    }
    Ok(())
}

pub fn saved_notes(out: &mut impl Write, notes: &[SavedNoteSummary]) -> io::Result<()> {
    if notes.is_empty() {
        return writeln!(out, "No saved notes.");
    }
    for note in notes {
        writeln!(
            out,
            "{}  {} | {} | {} | {}  ({} bytes{})",
            note.stored_at.format("%Y-%m-%d %H:%M"),
            note.subject_name,
            note.class_level,
            note.topic_name,
            note.detail_level,
            note.size_bytes,
            if note.has_image { ", image" } else { "" },
        )?;
        writeln!(out, "    {}", note.key)?;
    }
    Ok(())
}
