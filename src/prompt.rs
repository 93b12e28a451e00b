//! Prompt rendering helpers.
//!
//! Every function here is pure: identical inputs always produce identical
//! prompt strings, which is what keeps reruns reproducible before the seeded
//! shuffle. Prompts embed the category and a humanized title but never the
//! raw source path.

use crate::constants::prompt::{
    REFERENCE_HEADER, REFERENCE_INSTRUCTION, SNIPPET_HEADER, SNIPPET_INSTRUCTION,
};
use crate::types::{CategoryName, PromptText, TitleText};

/// Convert a filename stem into a readable title.
///
/// Splits on underscores, hyphens, whitespace, and camel-case boundaries,
/// then title-cases each word. Numeric segments are preserved verbatim
/// (`Array_33_Partition` becomes `Array 33 Partition`); no attempt is made
/// to guess whether a numeral is an ordinal index.
pub fn humanize_title(stem: &str) -> TitleText {
    let mut words: Vec<String> = Vec::new();
    for raw in stem.split(|ch: char| ch == '_' || ch == '-' || ch.is_whitespace()) {
        if raw.is_empty() {
            continue;
        }
        for word in split_camel(raw) {
            words.push(title_case(&word));
        }
    }
    if words.is_empty() {
        return stem.trim().to_string();
    }
    words.join(" ")
}

/// Render the instruction prompt for one snippet.
///
/// The result is never empty and always contains `category`.
pub fn build_prompt(category: &CategoryName, stem: &str) -> PromptText {
    let title = humanize_title(stem);
    let lines = [
        SNIPPET_HEADER.to_string(),
        format!("Category: {category}"),
        format!("Example: {title}"),
        SNIPPET_INSTRUCTION.to_string(),
    ];
    lines.join("\n")
}

/// Render the instruction prompt for one reference CSV row.
pub fn build_reference_prompt(
    element_type: &str,
    name: &str,
    source_file: &str,
    category_path: &str,
) -> PromptText {
    let mut lines = vec![
        REFERENCE_HEADER.to_string(),
        format!("Element Type: {element_type}"),
        format!("Element Name: {name}"),
    ];
    if !source_file.is_empty() {
        lines.push(format!("Source File: {source_file}"));
    }
    if !category_path.is_empty() {
        lines.push(format!("Category Path: {category_path}"));
    }
    lines.push(REFERENCE_INSTRUCTION.to_string());
    lines.join("\n")
}

fn split_camel(token: &str) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut prev: Option<char> = None;
    for ch in token.chars() {
        if let Some(last) = prev
            && ch.is_uppercase()
            && (last.is_lowercase() || last.is_ascii_digit())
        {
            parts.push(std::mem::take(&mut current));
        }
        current.push(ch);
        prev = Some(ch);
    }
    if !current.is_empty() {
        parts.push(current);
    }
    parts
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
