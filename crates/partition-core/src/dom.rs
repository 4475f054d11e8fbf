use kuchiki::{traits::*, NodeRef};

use crate::tree::{MarkupTree, NodeId};

/// Parses (and repairs) HTML with html5ever and copies the resulting DOM into
/// a [`MarkupTree`] rooted at `<html>`.
pub fn parse_html(html: &str) -> MarkupTree {
    let document = kuchiki::parse_html().one(html.to_string());
    let Some(root) = document.children().find(|n| n.as_element().is_some()) else {
        return MarkupTree::new("html");
    };
    from_dom(&root)
}

/// Copies a kuchiki element subtree. Text nodes become the parent's text until
/// the first element child, and the preceding sibling's tail after that.
pub fn from_dom(root: &NodeRef) -> MarkupTree {
    let mut tree = MarkupTree::new(&element_tag(root).unwrap_or_else(|| "html".into()));
    let root_id = tree.root();
    copy_attributes(root, root_id, &mut tree);

    let mut work: Vec<(NodeRef, NodeId)> = vec![(root.clone(), root_id)];
    let mut dropped = 0usize;
    while let Some((node, id)) = work.pop() {
        let mut last: Option<NodeId> = None;
        for child in node.children() {
            if let Some(tag) = element_tag(&child) {
                let Some(child_id) = tree.append_child(id, &tag) else {
                    continue;
                };
                copy_attributes(&child, child_id, &mut tree);
                work.push((child, child_id));
                last = Some(child_id);
            } else if let Some(text) = child.as_text() {
                let text = text.borrow();
                match last {
                    Some(prev) => tree.push_tail(prev, &text),
                    None => tree.push_text(id, &text),
                }
            } else {
                dropped += 1;
            }
        }
    }
    if dropped > 0 {
        log::debug!("dropped {} comment/doctype nodes while building tree", dropped);
    }
    tree
}

fn element_tag(node: &NodeRef) -> Option<String> {
    node.as_element().map(|el| el.name.local.to_lowercase())
}

fn copy_attributes(node: &NodeRef, id: NodeId, tree: &mut MarkupTree) {
    let Some(el) = node.as_element() else {
        return;
    };
    let attrs = el.attributes.borrow();
    for (name, attr) in attrs.map.iter() {
        tree.set_attr(id, &name.local, &attr.value);
    }
}
