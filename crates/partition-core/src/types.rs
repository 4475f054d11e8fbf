use std::collections::BTreeMap;

use serde::{ser::SerializeStruct, Serialize, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ElementType {
    Title,
    NarrativeText,
    ListItem,
    Address,
    EmailAddress,
    Text,
    Table,
}

impl ElementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Title => "Title",
            ElementType::NarrativeText => "NarrativeText",
            ElementType::ListItem => "ListItem",
            ElementType::Address => "Address",
            ElementType::EmailAddress => "EmailAddress",
            ElementType::Text => "Text",
            ElementType::Table => "Table",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKey {
    EmphasizedTextContents,
    EmphasizedTextTags,
    LinkTexts,
    LinkUrls,
}

impl AnnotationKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationKey::EmphasizedTextContents => "emphasized_text_contents",
            AnnotationKey::EmphasizedTextTags => "emphasized_text_tags",
            AnnotationKey::LinkTexts => "link_texts",
            AnnotationKey::LinkUrls => "link_urls",
        }
    }
}

/// Single-valued annotation carried by one text segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Annotation {
    values: BTreeMap<AnnotationKey, String>,
}

impl Annotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: AnnotationKey, value: impl Into<String>) {
        self.values.insert(key, value.into());
    }

    pub fn get(&self, key: AnnotationKey) -> Option<&str> {
        self.values.get(&key).map(String::as_str)
    }

    pub fn contains(&self, key: AnnotationKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnnotationKey, &str)> {
        self.values.iter().map(|(k, v)| (*k, v.as_str()))
    }
}

/// Element-level annotation: every segment value grouped by key, in segment order.
///
/// A key is only present when at least one segment contributed a non-empty
/// value for it, so a present key never maps to an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConsolidatedAnnotation {
    values: BTreeMap<AnnotationKey, Vec<String>>,
}

impl ConsolidatedAnnotation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: AnnotationKey, value: &str) {
        if value.is_empty() {
            return;
        }
        self.values.entry(key).or_default().push(value.to_string());
    }

    pub fn get(&self, key: AnnotationKey) -> Option<&[String]> {
        self.values.get(&key).map(Vec::as_slice)
    }

    pub fn contains(&self, key: AnnotationKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = AnnotationKey> + '_ {
        self.values.keys().copied()
    }
}

impl<'a> FromIterator<&'a Annotation> for ConsolidatedAnnotation {
    fn from_iter<I: IntoIterator<Item = &'a Annotation>>(iter: I) -> Self {
        let mut out = ConsolidatedAnnotation::new();
        for annotation in iter {
            for (key, value) in annotation.iter() {
                out.push(key, value);
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub element_type: ElementType,
    pub text: String,
    pub category_depth: Option<usize>,
    pub annotation: ConsolidatedAnnotation,
    /// Structured rendering, only set on `Table` elements.
    pub text_as_html: Option<String>,
}

impl Element {
    pub fn new(element_type: ElementType, text: impl Into<String>) -> Self {
        Self {
            element_type,
            text: text.into(),
            category_depth: None,
            annotation: ConsolidatedAnnotation::new(),
            text_as_html: None,
        }
    }

    pub fn with_category_depth(mut self, depth: Option<usize>) -> Self {
        self.category_depth = depth;
        self
    }

    pub fn with_annotation(mut self, annotation: ConsolidatedAnnotation) -> Self {
        self.annotation = annotation;
        self
    }

    pub fn with_html(mut self, html: String) -> Self {
        self.text_as_html = Some(html);
        self
    }
}

struct Metadata<'a>(&'a Element);

impl Serialize for Metadata<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let el = self.0;
        let mut map = serializer.serialize_map(None)?;
        if let Some(depth) = el.category_depth {
            map.serialize_entry("category_depth", &depth)?;
        }
        for key in el.annotation.keys() {
            map.serialize_entry(key.as_str(), &el.annotation.get(key))?;
        }
        if let Some(html) = &el.text_as_html {
            map.serialize_entry("text_as_html", html)?;
        }
        map.end()
    }
}

impl Serialize for Element {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Element", 3)?;
        state.serialize_field("type", self.element_type.as_str())?;
        state.serialize_field("text", &self.text)?;
        state.serialize_field("metadata", &Metadata(self))?;
        state.end()
    }
}
