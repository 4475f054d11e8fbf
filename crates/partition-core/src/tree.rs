use std::collections::BTreeMap;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::partition::NodeKind;

const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub struct MarkupNode {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub text: String,
    /// Text after this node's closing tag, still inside the parent.
    pub tail: String,
    pub children: Vec<NodeId>,
    pub kind: NodeKind,
}

impl MarkupNode {
    fn new(tag: &str) -> Self {
        let tag = tag.to_ascii_lowercase();
        let kind = NodeKind::from_tag(&tag);
        Self {
            tag,
            attrs: BTreeMap::new(),
            text: String::new(),
            tail: String::new(),
            children: Vec::new(),
            kind,
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }
}

/// Arena holding one document's markup; node 0 is the root.
#[derive(Debug, Clone)]
pub struct MarkupTree {
    nodes: Vec<MarkupNode>,
}

impl MarkupTree {
    pub fn new(root_tag: &str) -> Self {
        Self {
            nodes: vec![MarkupNode::new(root_tag)],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: NodeId) -> Option<&MarkupNode> {
        self.nodes.get(id.0)
    }

    /// Adds a `tag` element as the last child of `parent`. `None` when
    /// `parent` is not a node of this tree.
    pub fn append_child(&mut self, parent: NodeId, tag: &str) -> Option<NodeId> {
        let id = NodeId(self.nodes.len());
        self.nodes.get_mut(parent.0)?.children.push(id);
        self.nodes.push(MarkupNode::new(tag));
        Some(id)
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.attrs.insert(name.to_string(), value.to_string());
        }
    }

    pub fn push_text(&mut self, id: NodeId, text: &str) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.text.push_str(text);
        }
    }

    pub fn push_tail(&mut self, id: NodeId, text: &str) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.tail.push_str(text);
        }
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id).and_then(|node| node.attr(name))
    }

    /// Serializes the subtree rooted at `id` (without its own tail).
    pub fn outer_html(&self, id: NodeId) -> String {
        enum Step {
            Open(NodeId),
            Close(NodeId),
        }

        let mut out = String::new();
        let mut stack = vec![Step::Open(id)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Open(current) => {
                    let Some(node) = self.get(current) else {
                        continue;
                    };
                    out.push('<');
                    out.push_str(&node.tag);
                    for (name, value) in &node.attrs {
                        out.push(' ');
                        out.push_str(name);
                        out.push_str("=\"");
                        out.push_str(&encode_double_quoted_attribute(value));
                        out.push('"');
                    }
                    out.push('>');
                    out.push_str(&encode_text(&node.text));
                    stack.push(Step::Close(current));
                    stack.extend(node.children.iter().rev().map(|c| Step::Open(*c)));
                }
                Step::Close(current) => {
                    let Some(node) = self.get(current) else {
                        continue;
                    };
                    if !VOID_TAGS.contains(&node.tag.as_str()) {
                        out.push_str("</");
                        out.push_str(&node.tag);
                        out.push('>');
                    }
                    if current != id {
                        out.push_str(&encode_text(&node.tail));
                    }
                }
            }
        }
        out
    }
}
