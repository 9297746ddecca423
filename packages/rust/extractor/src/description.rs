//! Description resolution.
//!
//! Precedence: `description` meta, `og:description` meta, the first paragraph
//! longer than [`MIN_PARAGRAPH_CHARS`], then the head of the body text.

use crate::document::PageDocument;

/// A paragraph must be strictly longer than this (in characters, trimmed)
/// to stand in for a missing description. Also the body-text excerpt length.
pub const MIN_PARAGRAPH_CHARS: usize = 150;

/// Pick the best textual description. May return an empty string; the
/// assembler substitutes the title in that case.
pub fn resolve(doc: &dyn PageDocument) -> String {
    if let Some(meta) = doc.meta("description").or_else(|| doc.meta("og:description")) {
        return meta.to_string();
    }

    if let Some(paragraph) = doc
        .paragraphs()
        .iter()
        .map(|p| p.trim())
        .find(|p| p.chars().count() > MIN_PARAGRAPH_CHARS)
    {
        return paragraph.to_string();
    }

    let excerpt: String = doc.body_text().chars().take(MIN_PARAGRAPH_CHARS).collect();
    excerpt.trim().to_string()
}
