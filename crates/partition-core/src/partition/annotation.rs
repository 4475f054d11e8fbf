use crate::text::normalize_text;
use crate::types::{Annotation, AnnotationKey, ConsolidatedAnnotation};

/// Emphasis codes in canonical form: sorted and deduplicated, so bold inside
/// italic and italic inside bold are both `"bi"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub(crate) struct Emphasis(String);

impl Emphasis {
    pub(crate) fn with(&self, code: char) -> Self {
        let mut codes: Vec<char> = self.0.chars().collect();
        codes.push(code);
        codes.sort_unstable();
        codes.dedup();
        Emphasis(codes.into_iter().collect())
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Raw (not normalized) text plus the annotation it contributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TextSegment {
    pub(crate) text: String,
    pub(crate) annotation: Annotation,
}

impl TextSegment {
    pub(crate) fn new(text: &str, annotation: Annotation) -> Self {
        Self {
            text: text.to_string(),
            annotation,
        }
    }

    pub(crate) fn plain(text: &str) -> Self {
        Self::new(text, Annotation::new())
    }

    pub(crate) fn emphasized(text: &str, emphasis: &Emphasis) -> Self {
        Self::new(text, emphasis_annotation(text, emphasis))
    }
}

pub(crate) fn emphasis_annotation(text: &str, emphasis: &Emphasis) -> Annotation {
    let mut annotation = Annotation::new();
    let text = normalize_text(text);
    if text.is_empty() || emphasis.is_empty() {
        return annotation;
    }
    annotation.insert(AnnotationKey::EmphasizedTextContents, text);
    annotation.insert(AnnotationKey::EmphasizedTextTags, emphasis.as_str());
    annotation
}

/// Link keys need both a visible label and a target; emphasis keys follow
/// the usual rule.
pub(crate) fn link_annotation(text: &str, href: Option<&str>, emphasis: &Emphasis) -> Annotation {
    let mut annotation = emphasis_annotation(text, emphasis);
    let label = normalize_text(text);
    let href = href.map(str::trim).unwrap_or_default();
    if !label.is_empty() && !href.is_empty() {
        annotation.insert(AnnotationKey::LinkTexts, label);
        annotation.insert(AnnotationKey::LinkUrls, href);
    }
    annotation
}

pub(crate) fn consolidate(segments: &[TextSegment]) -> ConsolidatedAnnotation {
    segments.iter().map(|segment| &segment.annotation).collect()
}
