use crate::classify::{strip_bullet, Classification};
use crate::text::normalize_text;
use crate::tree::NodeId;
use crate::types::{Element, ElementType};

use super::annotation::{consolidate, Emphasis, TextSegment};
use super::{ChildCursor, NodeKind, PartitionError, Walk};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockContext {
    /// Nesting depth of the node being walked, root is 0.
    pub(crate) depth: usize,
    /// List containers enclosing the node being walked.
    pub(crate) list_depth: usize,
}

impl BlockContext {
    pub(crate) fn root() -> Self {
        Self {
            depth: 0,
            list_depth: 0,
        }
    }

    fn enter(self, kind: NodeKind) -> Self {
        Self {
            depth: self.depth + 1,
            list_depth: self.list_depth + usize::from(kind == NodeKind::ListContainer),
        }
    }
}

/// What a block imposes on the paragraphs assembled at its text and tail
/// positions.
#[derive(Debug, Clone, Copy)]
struct ParagraphStyle {
    forced: Option<ElementType>,
    heading_level: Option<u8>,
    list_depth: usize,
}

impl ParagraphStyle {
    fn for_kind(kind: NodeKind, list_depth: usize) -> Self {
        let heading_level = match kind {
            NodeKind::Heading(level) => Some(level),
            _ => None,
        };
        Self {
            forced: kind.fixed_type(),
            heading_level,
            list_depth,
        }
    }

    fn plain(list_depth: usize) -> Self {
        Self {
            forced: None,
            heading_level: None,
            list_depth,
        }
    }
}

impl<'t> Walk<'t> {
    pub(crate) fn walk_block(
        &mut self,
        id: NodeId,
        ctx: BlockContext,
    ) -> Result<Vec<Element>, PartitionError> {
        let node = self.node(id)?;
        // Skipped kinds are never descended into, so the limit never applies.
        if matches!(node.kind, NodeKind::RemovedBlock | NodeKind::Default) {
            return Ok(Vec::new());
        }
        if self.exceeds_depth(ctx.depth) {
            let text = self.opaque_text(id, ctx.depth);
            let style = ParagraphStyle::plain(ctx.list_depth);
            return Ok(self
                .paragraph(&[TextSegment::plain(&text)], style)
                .into_iter()
                .collect());
        }
        match node.kind {
            NodeKind::Table => Ok(self.walk_table(id)?.into_iter().collect()),
            kind if kind.is_inline() => {
                // An inline node walked as a block (e.g. the partition root)
                // yields its own content as one paragraph; its tail belongs
                // to whoever walked it.
                let mut segments = Vec::new();
                self.phrasing_content(id, &Emphasis::default(), ctx.depth, &mut segments)?;
                let style = ParagraphStyle::plain(ctx.list_depth);
                Ok(self.paragraph(&segments, style).into_iter().collect())
            }
            kind => self.walk_flow(id, kind, ctx),
        }
    }

    /// Text plus leading inline run, then each block child followed by its
    /// tail and the inline run after it.
    fn walk_flow(
        &mut self,
        id: NodeId,
        kind: NodeKind,
        ctx: BlockContext,
    ) -> Result<Vec<Element>, PartitionError> {
        let node = self.node(id)?;
        let inner = ctx.enter(kind);
        // Text and tails assembled here sit directly in this node, so a list
        // container does not count itself.
        let style = ParagraphStyle::for_kind(kind, ctx.list_depth);
        let mut cursor = ChildCursor::new(&node.children);

        let mut elements = Vec::new();
        elements.extend(self.assemble(&node.text, &mut cursor, style, inner.depth)?);
        while let Some(child) = cursor.next_block(self.tree)? {
            elements.extend(self.walk_block(child, inner)?);
            let tail = &self.node(child)?.tail;
            elements.extend(self.assemble(tail, &mut cursor, style, inner.depth)?);
        }
        Ok(elements)
    }

    fn assemble(
        &mut self,
        text: &str,
        cursor: &mut ChildCursor<'t>,
        style: ParagraphStyle,
        depth: usize,
    ) -> Result<Option<Element>, PartitionError> {
        let mut segments = Vec::new();
        if !text.is_empty() {
            segments.push(TextSegment::plain(text));
        }
        let enclosing = Emphasis::default();
        while let Some(child) = cursor.next_inline(self.tree) {
            self.walk_phrasing(child, &enclosing, depth, &mut segments)?;
        }
        Ok(self.paragraph(&segments, style))
    }

    fn paragraph(&self, segments: &[TextSegment], style: ParagraphStyle) -> Option<Element> {
        let raw: String = segments.iter().map(|s| s.text.as_str()).collect();
        let text = normalize_text(&raw);
        if text.is_empty() {
            return None;
        }

        let (element_type, text) = match style.forced {
            Some(ElementType::ListItem) => {
                let stripped = strip_bullet(&text).map(str::to_string).unwrap_or(text);
                (ElementType::ListItem, stripped)
            }
            Some(forced) => (forced, text),
            None => match self.classifier.classify(&text) {
                Classification::Typed { element_type, text } => (element_type, text),
                Classification::Suppress => {
                    log::trace!("suppressed degenerate text {:?}", text);
                    return None;
                }
            },
        };
        if text.is_empty() {
            return None;
        }

        let category_depth = match (style.heading_level, element_type) {
            (Some(level), _) => Some(usize::from(level.saturating_sub(1))),
            (None, ElementType::ListItem) => Some(style.list_depth),
            _ => None,
        };
        Some(
            Element::new(element_type, text)
                .with_category_depth(category_depth)
                .with_annotation(consolidate(segments)),
        )
    }
}
