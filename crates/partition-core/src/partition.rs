//! Markup tree → ordered document elements.
//!
//! The walk is split by node role: [`block`] produces elements from flow
//! containers, [`phrasing`] produces annotated text segments from inline runs,
//! and [`table`] flattens a whole table into a single element.

mod annotation;
mod block;
mod error;
mod node;
mod phrasing;
mod table;

#[cfg(test)]
mod tests;

pub use error::PartitionError;
pub use node::NodeKind;
pub use table::matrix_to_html;

use crate::classify::TextClassifier;
use crate::config::PartitionConfig;
use crate::dom::parse_html;
use crate::tree::{MarkupNode, MarkupTree, NodeId};
use crate::types::Element;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partitioned {
    pub elements: Vec<Element>,
    /// Subtrees past the depth limit that were emitted as plain markup text.
    pub truncated_subtrees: usize,
}

impl Partitioned {
    pub fn is_truncated(&self) -> bool {
        self.truncated_subtrees > 0
    }

    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }
}

#[derive(Default)]
pub struct Partitioner {
    config: PartitionConfig,
    classifier: TextClassifier,
}

impl Partitioner {
    pub fn new(config: PartitionConfig) -> Self {
        Self {
            config,
            classifier: TextClassifier::default(),
        }
    }

    pub fn with_classifier(mut self, classifier: TextClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn partition(&self, tree: &MarkupTree) -> Result<Partitioned, PartitionError> {
        let mut walk = Walk {
            tree,
            classifier: &self.classifier,
            max_depth: self.config.max_depth.max(1),
            truncated: 0,
        };
        let elements = walk.walk_block(tree.root(), block::BlockContext::root())?;
        log::debug!(
            "partitioned {} nodes into {} elements ({} truncated subtrees)",
            tree.len(),
            elements.len(),
            walk.truncated
        );
        Ok(Partitioned {
            elements,
            truncated_subtrees: walk.truncated,
        })
    }
}

pub fn partition_html(html: &str) -> Result<Vec<Element>, PartitionError> {
    let tree = parse_html(html);
    Partitioner::default()
        .partition(&tree)
        .map(Partitioned::into_elements)
}

/// State of one partition call; dropped when the call returns.
pub(crate) struct Walk<'t> {
    tree: &'t MarkupTree,
    classifier: &'t TextClassifier,
    max_depth: usize,
    truncated: usize,
}

impl<'t> Walk<'t> {
    fn node(&self, id: NodeId) -> Result<&'t MarkupNode, PartitionError> {
        self.tree.get(id).ok_or(PartitionError::MissingNode(id))
    }

    fn exceeds_depth(&self, depth: usize) -> bool {
        depth >= self.max_depth
    }

    /// Serialized markup standing in for a subtree past the depth limit.
    fn opaque_text(&mut self, id: NodeId, depth: usize) -> String {
        self.truncated += 1;
        let tag = self.tree.get(id).map(|n| n.tag.as_str()).unwrap_or("?");
        log::warn!(
            "nesting depth {} reached limit {}; emitting <{}> subtree as text",
            depth,
            self.max_depth,
            tag
        );
        self.tree.outer_html(id)
    }
}

/// Single cursor over a node's children, shared by the block loop and the
/// inline runs it drains.
pub(crate) struct ChildCursor<'t> {
    children: &'t [NodeId],
    pos: usize,
}

impl<'t> ChildCursor<'t> {
    pub(crate) fn new(children: &'t [NodeId]) -> Self {
        Self { children, pos: 0 }
    }

    /// Next child if it is inline; leaves block children in place.
    pub(crate) fn next_inline(&mut self, tree: &MarkupTree) -> Option<NodeId> {
        let id = *self.children.get(self.pos)?;
        let inline = tree.get(id).is_some_and(|node| node.kind.is_inline());
        if inline {
            self.pos += 1;
            Some(id)
        } else {
            None
        }
    }

    pub(crate) fn next_block(&mut self, tree: &MarkupTree) -> Result<Option<NodeId>, PartitionError> {
        let Some(&id) = self.children.get(self.pos) else {
            return Ok(None);
        };
        let node = tree.get(id).ok_or(PartitionError::MissingNode(id))?;
        if node.kind.is_inline() {
            return Err(PartitionError::InternalInvariant(format!(
                "inline <{}> at block position {} was not drained",
                node.tag, self.pos
            )));
        }
        self.pos += 1;
        Ok(Some(id))
    }
}
