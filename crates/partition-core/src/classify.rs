use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::ElementType;

mod narrative;

pub use narrative::{NarrativeHeuristic, SentenceShape};

const BULLETS: &[char] = &[
    '\u{0095}', '\u{2022}', '\u{2023}', '\u{2043}', '\u{3164}', '\u{204C}', '\u{204D}',
    '\u{2219}', '\u{25CB}', '\u{25CF}', '\u{25D8}', '\u{25E6}', '\u{2619}', '\u{2765}',
    '\u{2767}', '\u{29BE}', '\u{29BF}', '\u{00B7}', '*', '-',
];

// ASCII markers double as ordinary punctuation ("-5", "*emphasis*"), so they
// only count as bullets when followed by whitespace.
const ASCII_BULLETS: &[char] = &['*', '-'];

const US_STATES: &str = concat!(
    "Alabama|Alaska|Arizona|Arkansas|California|Colorado|Connecticut|Delaware|",
    "District of Columbia|Florida|Georgia|Hawaii|Idaho|Illinois|Indiana|Iowa|Kansas|",
    "Kentucky|Louisiana|Maine|Maryland|Massachusetts|Michigan|Minnesota|Mississippi|",
    "Missouri|Montana|Nebraska|Nevada|New Hampshire|New Jersey|New Mexico|New York|",
    "North Carolina|North Dakota|Ohio|Oklahoma|Oregon|Pennsylvania|Rhode Island|",
    "South Carolina|South Dakota|Tennessee|Texas|Utah|Vermont|Virginia|Washington|",
    "West Virginia|Wisconsin|Wyoming|",
    "AL|AK|AZ|AR|CA|CO|CT|DE|DC|FL|GA|HI|ID|IL|IN|IA|KS|KY|LA|ME|MD|MA|MI|MN|MS|MO|",
    "MT|NE|NV|NH|NJ|NM|NY|NC|ND|OH|OK|OR|PA|RI|SC|SD|TN|TX|UT|VT|VA|WA|WV|WI|WY",
);

static US_CITY_STATE_ZIP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?:[A-Z][A-Za-z.'\-]*\s?){{1,5}},\s?(?:{US_STATES}),?\s?\d{{5}}(?:-\d{{4}})?$"
    ))
    .expect("valid city/state/zip regex")
});

static EMAIL_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[a-z0-9._%+\-]+@[a-z0-9.\-]+\.[a-z]{2,}$").expect("valid email regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Suppress,
    Typed {
        element_type: ElementType,
        /// Text to emit; differs from the input only when a bullet prefix was stripped.
        text: String,
    },
}

impl Classification {
    fn typed(element_type: ElementType, text: &str) -> Self {
        Classification::Typed {
            element_type,
            text: text.to_string(),
        }
    }
}

/// Decides the element type of free text that has no structural hint.
pub struct TextClassifier {
    narrative: Box<dyn NarrativeHeuristic + Send + Sync>,
}

impl Default for TextClassifier {
    fn default() -> Self {
        Self::new(SentenceShape::default())
    }
}

impl TextClassifier {
    pub fn new<H>(narrative: H) -> Self
    where
        H: NarrativeHeuristic + Send + Sync + 'static,
    {
        Self {
            narrative: Box::new(narrative),
        }
    }

    pub fn is_narrative(&self, text: &str) -> bool {
        self.narrative.is_narrative(text)
    }

    /// `text` is expected to be normalized already.
    pub fn classify(&self, text: &str) -> Classification {
        let text = text.trim();
        if text.is_empty() || is_bullet_only(text) {
            return Classification::Suppress;
        }
        if let Some(rest) = strip_bullet(text) {
            return if rest.is_empty() {
                Classification::Suppress
            } else {
                Classification::typed(ElementType::ListItem, rest)
            };
        }
        if is_us_city_state_zip(text) {
            return Classification::typed(ElementType::Address, text);
        }
        if is_email_address(text) {
            return Classification::typed(ElementType::EmailAddress, text);
        }
        if text.chars().count() < 2 {
            return Classification::Suppress;
        }
        if self.narrative.is_narrative(text) {
            return Classification::typed(ElementType::NarrativeText, text);
        }
        // Short-paragraph title inference stays off: it mislabelled too many
        // plain paragraphs as headings and broke the element hierarchy.
        Classification::typed(ElementType::Text, text)
    }
}

pub fn is_bullet(ch: char) -> bool {
    BULLETS.contains(&ch)
}

pub fn is_bullet_only(text: &str) -> bool {
    let mut saw_bullet = false;
    for ch in text.chars() {
        if is_bullet(ch) {
            saw_bullet = true;
        } else if !ch.is_whitespace() {
            return false;
        }
    }
    saw_bullet
}

/// Returns the text after a leading bullet marker, or `None` when the text
/// does not start with one. A marker followed by another marker ("--", "**")
/// is not a bullet.
pub fn strip_bullet(text: &str) -> Option<&str> {
    let text = text.trim_start();
    let mut chars = text.chars();
    let first = chars.next()?;
    if !is_bullet(first) {
        return None;
    }
    let rest = chars.as_str();
    match rest.chars().next() {
        Some(next) if is_bullet(next) => None,
        Some(next) if ASCII_BULLETS.contains(&first) && !next.is_whitespace() => None,
        _ => Some(rest.trim()),
    }
}

pub fn is_us_city_state_zip(text: &str) -> bool {
    US_CITY_STATE_ZIP.is_match(text.trim())
}

pub fn is_email_address(text: &str) -> bool {
    EMAIL_ADDRESS.is_match(text.trim())
}
