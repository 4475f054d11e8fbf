use crate::tree::NodeId;

use super::annotation::{link_annotation, Emphasis, TextSegment};
use super::{NodeKind, PartitionError, Walk};

/// Keeps words on either side of a `<br>` from running together.
const LINE_BREAK: &str = "\n";

impl<'t> Walk<'t> {
    /// Segments for an inline node: its own content, then its tail. The tail
    /// sits outside the node, so it only carries `enclosing` emphasis.
    pub(crate) fn walk_phrasing(
        &mut self,
        id: NodeId,
        enclosing: &Emphasis,
        depth: usize,
        out: &mut Vec<TextSegment>,
    ) -> Result<(), PartitionError> {
        self.phrasing_content(id, enclosing, depth, out)?;
        let tail = &self.node(id)?.tail;
        if !tail.is_empty() {
            out.push(TextSegment::emphasized(tail, enclosing));
        }
        Ok(())
    }

    pub(crate) fn phrasing_content(
        &mut self,
        id: NodeId,
        enclosing: &Emphasis,
        depth: usize,
        out: &mut Vec<TextSegment>,
    ) -> Result<(), PartitionError> {
        let node = self.node(id)?;
        match node.kind {
            NodeKind::Default | NodeKind::RemovedPhrasing | NodeKind::RemovedBlock => {
                return Ok(());
            }
            NodeKind::LineBreak => {
                out.push(TextSegment::plain(LINE_BREAK));
                return Ok(());
            }
            _ => {}
        }
        if self.exceeds_depth(depth) {
            let text = self.opaque_text(id, depth);
            out.push(TextSegment::plain(&text));
            return Ok(());
        }
        match node.kind {
            NodeKind::Anchor => {
                // Link keys go on the anchor's own text only; nested runs keep
                // the surrounding emphasis.
                if !node.text.is_empty() {
                    let annotation = link_annotation(&node.text, node.attr("href"), enclosing);
                    out.push(TextSegment::new(&node.text, annotation));
                }
                for &child in &node.children {
                    self.walk_phrasing(child, enclosing, depth + 1, out)?;
                }
            }
            kind => {
                let inside = match kind.emphasis_code() {
                    Some(code) => enclosing.with(code),
                    None => enclosing.clone(),
                };
                if !node.text.is_empty() {
                    out.push(TextSegment::emphasized(&node.text, &inside));
                }
                for &child in &node.children {
                    self.walk_phrasing(child, &inside, depth + 1, out)?;
                }
            }
        }
        Ok(())
    }
}
