use regex::Regex;
use std::sync::OnceLock;

/// Default upper bound on words per chunk
pub const DEFAULT_MAX_WORDS: usize = 100;

/// A sentence is any run of text up to and including a run of terminal
/// punctuation; a trailing fragment without punctuation is its own unit.
fn sentence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[^.!?]*[.!?]+|[^.!?]+$").expect("sentence pattern is a valid regex")
    })
}

/// Split text into sentence-like units. Concatenating the units yields the
/// input exactly.
pub fn split_sentences(text: &str) -> Vec<&str> {
    sentence_pattern()
        .find_iter(text)
        .map(|m| m.as_str())
        .collect()
}

/// Partition text into ordered chunks of at most `max_words` words.
///
/// Sentences are accumulated greedily; the running chunk is flushed when the
/// next sentence would push it past `max_words`. A single sentence longer
/// than the limit is kept whole as its own chunk.
pub fn segment_text(text: &str, max_words: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for sentence in split_sentences(text) {
        // Counted on the joined text: "one.two" is a single word.
        let merged_words = format!("{}{}", current, sentence)
            .split_whitespace()
            .count();

        if merged_words > max_words && !current.trim().is_empty() {
            chunks.push(current.trim().to_string());
            current = sentence.to_string();
        } else {
            current.push_str(sentence);
        }
    }

    if !current.trim().is_empty() {
        chunks.push(current.trim().to_string());
    }

    chunks
}
