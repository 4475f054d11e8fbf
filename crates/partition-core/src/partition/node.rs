use crate::types::ElementType;

/// Role a markup node plays during partitioning, fixed when the node is
/// added to the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Flow,
    Heading(u8),
    ListContainer,
    ListItem,
    Table,
    RemovedBlock,
    Phrasing,
    Bold,
    Italic,
    Anchor,
    LineBreak,
    RemovedPhrasing,
    /// Unknown tag: skipped as a block and as a run, tail preserved either way.
    Default,
}

impl NodeKind {
    pub fn from_tag(tag: &str) -> Self {
        if let Some(level) = heading_level(tag) {
            return NodeKind::Heading(level);
        }
        match tag {
            "html" | "body" | "div" | "p" | "section" | "article" | "main" | "aside"
            | "blockquote" | "address" | "center" | "dd" | "dl" | "dt" | "figcaption"
            | "header" | "footer" | "hgroup" | "pre" | "summary" | "caption" => NodeKind::Flow,

            "ul" | "ol" | "menu" | "dir" => NodeKind::ListContainer,
            "li" => NodeKind::ListItem,
            "table" => NodeKind::Table,

            "head" | "title" | "script" | "style" | "noscript" | "template" | "nav" | "form"
            | "fieldset" | "button" | "select" | "textarea" | "dialog" | "details" | "figure"
            | "hr" | "iframe" | "object" | "embed" | "video" | "audio" | "canvas" | "svg"
            | "math" | "map" => NodeKind::RemovedBlock,

            "b" | "strong" => NodeKind::Bold,
            "i" | "em" => NodeKind::Italic,
            "a" => NodeKind::Anchor,
            "br" => NodeKind::LineBreak,
            "img" | "input" | "meter" | "progress" | "wbr" => NodeKind::RemovedPhrasing,

            "span" | "abbr" | "acronym" | "big" | "bdi" | "bdo" | "cite" | "code" | "data"
            | "del" | "dfn" | "font" | "ins" | "kbd" | "label" | "mark" | "q" | "s" | "samp"
            | "small" | "strike" | "sub" | "sup" | "time" | "tt" | "u" | "var" => {
                NodeKind::Phrasing
            }

            _ => NodeKind::Default,
        }
    }

    /// Inline kinds are drained into the paragraph being assembled at a
    /// text/tail position. `Default` counts: in that role it only yields its tail.
    pub fn is_inline(self) -> bool {
        matches!(
            self,
            NodeKind::Phrasing
                | NodeKind::Bold
                | NodeKind::Italic
                | NodeKind::Anchor
                | NodeKind::LineBreak
                | NodeKind::RemovedPhrasing
                | NodeKind::Default
        )
    }

    pub fn emphasis_code(self) -> Option<char> {
        match self {
            NodeKind::Bold => Some('b'),
            NodeKind::Italic => Some('i'),
            _ => None,
        }
    }

    /// Element type forced on every paragraph the node produces.
    pub fn fixed_type(self) -> Option<ElementType> {
        match self {
            NodeKind::Heading(_) => Some(ElementType::Title),
            NodeKind::ListItem => Some(ElementType::ListItem),
            _ => None,
        }
    }
}

fn heading_level(tag: &str) -> Option<u8> {
    (tag.len() == 2 && tag.starts_with('h'))
        .then(|| tag[1..].parse::<u8>().ok())
        .flatten()
        .filter(|lvl| (1..=6).contains(lvl))
}
