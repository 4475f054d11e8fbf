use once_cell::sync::Lazy;
use regex::Regex;

static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+(?:\s+|$)").expect("valid sentence regex"));

/// Text → "reads like prose" predicate used by the classifier.
pub trait NarrativeHeuristic {
    fn is_narrative(&self, text: &str) -> bool;
}

impl<F> NarrativeHeuristic for F
where
    F: Fn(&str) -> bool,
{
    fn is_narrative(&self, text: &str) -> bool {
        self(text)
    }
}

/// Default predicate built from sentence punctuation, word count and
/// character-class ratios.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentenceShape {
    /// Minimum share of alphabetic characters among non-space characters.
    pub alpha_threshold: f32,
    /// Maximum share of capitalized words in a single-sentence text.
    pub cap_threshold: f32,
    /// Words a sentence needs before it counts.
    pub min_sentence_words: usize,
}

impl Default for SentenceShape {
    fn default() -> Self {
        Self {
            alpha_threshold: 0.5,
            cap_threshold: 0.5,
            min_sentence_words: 3,
        }
    }
}

impl NarrativeHeuristic for SentenceShape {
    fn is_narrative(&self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() || !text.chars().any(char::is_alphabetic) {
            return false;
        }
        if alpha_ratio(text) < self.alpha_threshold {
            return false;
        }
        let sentences = sentence_count(text, self.min_sentence_words);
        if sentences >= 2 {
            return true;
        }
        if cap_ratio(text) > self.cap_threshold {
            return false;
        }
        sentences == 1 && ends_with_terminal(text)
    }
}

fn alpha_ratio(text: &str) -> f32 {
    let mut total = 0usize;
    let mut alpha = 0usize;
    for ch in text.chars().filter(|c| !c.is_whitespace()) {
        total += 1;
        if ch.is_alphabetic() {
            alpha += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    alpha as f32 / total as f32
}

fn words(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
        .filter(|w| w.chars().any(char::is_alphabetic))
}

fn cap_ratio(text: &str) -> f32 {
    let mut total = 0usize;
    let mut capped = 0usize;
    for word in words(text) {
        total += 1;
        if word
            .chars()
            .find(|c| c.is_alphabetic())
            .is_some_and(char::is_uppercase)
        {
            capped += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    capped as f32 / total as f32
}

/// Counts sentences with at least `min_words` words.
pub(crate) fn sentence_count(text: &str, min_words: usize) -> usize {
    SENTENCE_END
        .split(text)
        .filter(|sentence| words(sentence).count() >= min_words)
        .count()
}

fn ends_with_terminal(text: &str) -> bool {
    text.trim_end_matches(['"', '\'', ')', '\u{201D}', '\u{2019}'])
        .ends_with(['.', '!', '?'])
}
