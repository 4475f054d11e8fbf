use crate::classify::TextClassifier;
use crate::config::{PartitionConfig, DEFAULT_MAX_DEPTH};
use crate::dom::parse_html;
use crate::tree::{MarkupTree, NodeId};
use crate::types::{AnnotationKey, Element, ElementType};

use super::annotation::{Emphasis, TextSegment};
use super::{partition_html, ChildCursor, PartitionError, Partitioner, Walk};

fn partition(html: &str) -> Vec<Element> {
    partition_html(html).expect("partition")
}

fn values(el: &Element, key: AnnotationKey) -> Vec<&str> {
    el.annotation
        .get(key)
        .map(|v| v.iter().map(String::as_str).collect())
        .unwrap_or_default()
}

fn find(tree: &MarkupTree, tag: &str) -> Option<NodeId> {
    let mut stack = vec![tree.root()];
    while let Some(id) = stack.pop() {
        let node = tree.get(id)?;
        if node.tag == tag {
            return Some(id);
        }
        stack.extend(node.children.iter().rev().copied());
    }
    None
}

fn phrasing_segments(html: &str, tag: &str) -> Vec<TextSegment> {
    let tree = parse_html(html);
    let id = find(&tree, tag).expect("tag present");
    let classifier = TextClassifier::default();
    let mut walk = Walk {
        tree: &tree,
        classifier: &classifier,
        max_depth: DEFAULT_MAX_DEPTH,
        truncated: 0,
    };
    let mut out = Vec::new();
    walk.walk_phrasing(id, &Emphasis::default(), 0, &mut out)
        .expect("phrasing walk");
    out
}

#[test]
fn preserves_document_order_with_grouped_annotations() {
    let html = r#"
        <div>
          Element text <b>bold</b> and <i>italic</i>
          <p>More <b>bold <i>and italic</i></b> text in the paragraph.</p>
          Tail text <i>italic tail</i>
          <p>Short <b>paragraph</b></p>
          Trailing <a href="https://example.com">link</a>
        </div>
        "#;
    let elements = partition(html);
    assert_eq!(elements.len(), 5);

    let types: Vec<ElementType> = elements.iter().map(|e| e.element_type).collect();
    assert_eq!(
        types,
        vec![
            ElementType::Text,
            ElementType::NarrativeText,
            ElementType::Text,
            ElementType::Text,
            ElementType::Text,
        ]
    );

    assert_eq!(elements[0].text, "Element text bold and italic");
    assert_eq!(
        values(&elements[0], AnnotationKey::EmphasizedTextContents),
        ["bold", "italic"]
    );
    assert_eq!(
        values(&elements[0], AnnotationKey::EmphasizedTextTags),
        ["b", "i"]
    );

    assert_eq!(elements[1].text, "More bold and italic text in the paragraph.");
    assert_eq!(
        values(&elements[1], AnnotationKey::EmphasizedTextContents),
        ["bold", "and italic"]
    );
    assert_eq!(
        values(&elements[1], AnnotationKey::EmphasizedTextTags),
        ["b", "bi"]
    );

    assert_eq!(elements[2].text, "Tail text italic tail");
    assert_eq!(
        values(&elements[2], AnnotationKey::EmphasizedTextContents),
        ["italic tail"]
    );
    assert_eq!(values(&elements[2], AnnotationKey::EmphasizedTextTags), ["i"]);

    assert_eq!(elements[3].text, "Short paragraph");
    assert_eq!(values(&elements[3], AnnotationKey::EmphasizedTextTags), ["b"]);

    assert_eq!(elements[4].text, "Trailing link");
    assert_eq!(values(&elements[4], AnnotationKey::LinkTexts), ["link"]);
    assert_eq!(
        values(&elements[4], AnnotationKey::LinkUrls),
        ["https://example.com"]
    );
    assert!(!elements[4]
        .annotation
        .contains(AnnotationKey::EmphasizedTextContents));

    assert!(elements.iter().all(|e| e.category_depth.is_none()));
}

#[test]
fn emphasis_tags_are_order_independent() {
    let bold_italic = phrasing_segments("<p><b><i>x</i></b></p>", "b");
    let italic_bold = phrasing_segments("<p><i><b>x</b></i></p>", "i");
    for segments in [bold_italic, italic_bold] {
        assert_eq!(segments.len(), 1);
        assert_eq!(
            segments[0].annotation.get(AnnotationKey::EmphasizedTextTags),
            Some("bi")
        );
    }
}

#[test]
fn emphasis_does_not_leak_into_tail() {
    let segments = phrasing_segments("<p><b>bold</b> plain</p>", "b");
    assert_eq!(segments.len(), 2);
    assert_eq!(
        segments[0].annotation.get(AnnotationKey::EmphasizedTextTags),
        Some("b")
    );
    assert_eq!(segments[1].text, " plain");
    assert!(segments[1].annotation.is_empty());
}

#[test]
fn whitespace_only_run_has_empty_annotation() {
    let segments = phrasing_segments("<p>a<span>   </span>b</p>", "span");
    assert_eq!(segments[0], TextSegment::plain("   "));
    assert!(segments.iter().all(|s| s.annotation.is_empty()));
}

#[test]
fn anchor_tail_never_carries_link() {
    let segments = phrasing_segments(r#"<p><b><a href="/x">in bold</a> after</b></p>"#, "b");
    assert_eq!(segments.len(), 2);
    let link = &segments[0].annotation;
    assert_eq!(link.get(AnnotationKey::LinkTexts), Some("in bold"));
    assert_eq!(link.get(AnnotationKey::LinkUrls), Some("/x"));
    assert_eq!(link.get(AnnotationKey::EmphasizedTextTags), Some("b"));

    let tail = &segments[1].annotation;
    assert!(!tail.contains(AnnotationKey::LinkTexts));
    assert!(!tail.contains(AnnotationKey::LinkUrls));
    assert_eq!(tail.get(AnnotationKey::EmphasizedTextContents), Some("after"));
    assert_eq!(tail.get(AnnotationKey::EmphasizedTextTags), Some("b"));
}

#[test]
fn anchor_children_share_anchor_context() {
    let elements = partition(r#"<p>See <a href="/docs">the <i>full</i> docs</a> now</p>"#);
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].text, "See the full docs now");
    assert_eq!(values(&elements[0], AnnotationKey::LinkTexts), ["the"]);
    assert_eq!(values(&elements[0], AnnotationKey::LinkUrls), ["/docs"]);
    assert_eq!(
        values(&elements[0], AnnotationKey::EmphasizedTextContents),
        ["full"]
    );
}

#[test]
fn anchor_without_href_is_plain_text() {
    let elements = partition("<p>Named <a name=\"top\">anchor</a> here</p>");
    assert_eq!(elements[0].text, "Named anchor here");
    assert!(elements[0].annotation.is_empty());
}

#[test]
fn line_break_separates_words() {
    let elements = partition("<p>Line one<br/>Line two</p>");
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].text, "Line one Line two");
}

#[test]
fn flattens_table_into_one_element() {
    let elements =
        partition("<table><tr><td>Fair Value1</td><td>Fair Value2</td></tr></table>");
    assert_eq!(elements.len(), 1);
    let table = &elements[0];
    assert_eq!(table.element_type, ElementType::Table);
    assert_eq!(table.text, "Fair Value1 Fair Value2");
    assert_eq!(
        table.text_as_html.as_deref(),
        Some("<table><tr><td>Fair Value1</td><td>Fair Value2</td></tr></table>")
    );
    assert!(table.category_depth.is_none());
}

#[test]
fn table_sections_and_nested_tables() {
    let html = r#"
        <table>
          <thead><tr><th>Head</th><th>Value</th></tr></thead>
          <tbody>
            <tr><td>Outer <table><tr><td>inner</td></tr></table> after</td><td><b>B</b></td></tr>
          </tbody>
          <tfoot><tr><td>Total</td><td></td></tr></tfoot>
        </table>
        "#;
    let elements = partition(html);
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].text, "Head Value Outer inner after B Total");
    assert_eq!(
        elements[0].text_as_html.as_deref(),
        Some(
            "<table><tr><td>Head</td><td>Value</td></tr>\
             <tr><td>Outer inner after</td><td>B</td></tr>\
             <tr><td>Total</td><td></td></tr></table>"
        )
    );
}

#[test]
fn empty_tables_emit_nothing() {
    assert!(partition("<table></table>").is_empty());
    assert!(partition("<table><tr><td> </td><td></td></tr></table>").is_empty());
}

#[test]
fn heading_depth_follows_level() {
    let elements = partition("<h1>One</h1><h3>Three</h3><h6>Six</h6>");
    let got: Vec<(ElementType, &str, Option<usize>)> = elements
        .iter()
        .map(|e| (e.element_type, e.text.as_str(), e.category_depth))
        .collect();
    assert_eq!(
        got,
        vec![
            (ElementType::Title, "One", Some(0)),
            (ElementType::Title, "Three", Some(2)),
            (ElementType::Title, "Six", Some(5)),
        ]
    );
}

#[test]
fn list_item_depth_counts_list_ancestors() {
    let html = "<ul><li>One</li><li>Item head<ul><li>Nested</li></ul>item tail</li></ul>";
    let elements = partition(html);
    let got: Vec<(ElementType, &str, Option<usize>)> = elements
        .iter()
        .map(|e| (e.element_type, e.text.as_str(), e.category_depth))
        .collect();
    assert_eq!(
        got,
        vec![
            (ElementType::ListItem, "One", Some(1)),
            (ElementType::ListItem, "Item head", Some(1)),
            (ElementType::ListItem, "Nested", Some(2)),
            (ElementType::ListItem, "item tail", Some(1)),
        ]
    );
}

#[test]
fn list_container_text_is_not_nested_in_itself() {
    let elements = partition("<ul>• intro<li>x</li>• outro</ul>");
    let got: Vec<(&str, Option<usize>)> = elements
        .iter()
        .map(|e| (e.text.as_str(), e.category_depth))
        .collect();
    assert_eq!(got, vec![("intro", Some(0)), ("x", Some(1)), ("outro", Some(0))]);
}

#[test]
fn bulleted_paragraph_outside_lists_has_depth_zero() {
    let elements = partition("<p>• Loose bullet</p><li>Stray item</li>");
    assert_eq!(elements.len(), 2);
    assert!(matches!(
        elements[0],
        Element { element_type: ElementType::ListItem, ref text, category_depth: Some(0), .. }
            if text == "Loose bullet"
    ));
    assert_eq!(elements[1].category_depth, Some(0));
}

#[test]
fn list_item_bullets_are_stripped() {
    let elements = partition("<ul><li>• Item</li><li>•</li></ul>");
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].text, "Item");
}

#[test]
fn removed_blocks_are_skipped() {
    let html = r#"
        <div>
          <hr/>
          <figure><img src="x.png"/><figcaption>Caption</figcaption></figure>
          <p>Content we want.</p>
        </div>
        "#;
    let elements = partition(html);
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].element_type, ElementType::NarrativeText);
    assert_eq!(elements[0].text, "Content we want.");
}

#[test]
fn removed_block_tail_survives() {
    let elements = partition("<div><script>var x = 1;</script>Visible tail text here.</div>");
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].text, "Visible tail text here.");
}

#[test]
fn unknown_and_removed_inline_keep_only_tail() {
    let elements = partition("<div>Before <custom-tag>hidden</custom-tag> after</div>");
    assert_eq!(elements[0].text, "Before after");

    let elements = partition("<p>Press <progress>50%</progress> now</p>");
    assert_eq!(elements[0].text, "Press now");
}

#[test]
fn classifies_untagged_text() {
    let elements = partition("<p>Boston, MA 02110</p><p>jane@example.com</p><div>Quarterly Results</div>");
    let types: Vec<ElementType> = elements.iter().map(|e| e.element_type).collect();
    assert_eq!(
        types,
        vec![
            ElementType::Address,
            ElementType::EmailAddress,
            ElementType::Text
        ]
    );
}

#[test]
fn suppresses_degenerate_paragraphs() {
    assert!(partition("<p>*</p><p>   </p><p>x</p><p>• </p>").is_empty());
}

#[test]
fn custom_narrative_predicate() {
    let tree = parse_html("<p>Short text</p>");
    let partitioner =
        Partitioner::default().with_classifier(TextClassifier::new(|_: &str| true));
    let result = partitioner.partition(&tree).expect("partition");
    assert_eq!(result.elements[0].element_type, ElementType::NarrativeText);
}

#[test]
fn depth_limit_turns_subtree_into_text() {
    let tree = parse_html("<div><div><div><p>Deep <b>text</b></p></div></div></div>");
    let partitioner = Partitioner::new(PartitionConfig::new(3));
    let result = partitioner.partition(&tree).expect("partition");
    assert_eq!(result.truncated_subtrees, 1);
    assert!(result.is_truncated());
    assert_eq!(result.elements.len(), 1);
    assert_eq!(result.elements[0].element_type, ElementType::Text);
    assert_eq!(
        result.elements[0].text,
        "<div><div><p>Deep <b>text</b></p></div></div>"
    );
}

#[test]
fn skipped_blocks_at_the_limit_stay_hidden() {
    let tree = parse_html("<div><script>secret_token = 1;</script>Visible text here.</div>");
    let result = Partitioner::new(PartitionConfig::new(3))
        .partition(&tree)
        .expect("partition");
    assert_eq!(result.truncated_subtrees, 0);
    let texts: Vec<&str> = result.elements.iter().map(|e| e.text.as_str()).collect();
    assert_eq!(texts, vec!["Visible text here."]);

    let tree = parse_html("<head><title>Hidden title</title></head><body><p>Shown.</p></body>");
    let result = Partitioner::new(PartitionConfig::new(1))
        .partition(&tree)
        .expect("partition");
    assert_eq!(result.truncated_subtrees, 1);
    assert!(result.elements.iter().all(|e| !e.text.contains("Hidden title")));
    assert!(result.elements.iter().any(|e| e.text.contains("Shown.")));
}

#[test]
fn skipped_inline_nodes_at_the_limit_stay_hidden() {
    let tree = parse_html("<p>Before <progress>50%</progress><br>after</p>");
    let result = Partitioner::new(PartitionConfig::new(3))
        .partition(&tree)
        .expect("partition");
    assert_eq!(result.truncated_subtrees, 0);
    assert_eq!(result.elements[0].text, "Before after");
}

#[test]
fn depth_limit_applies_to_inline_runs() {
    let tree = parse_html("<p>a<span>b<span>c<span>d</span></span></span> end</p>");
    let result = Partitioner::new(PartitionConfig::new(4))
        .partition(&tree)
        .expect("partition");
    assert_eq!(result.truncated_subtrees, 1);
    assert_eq!(
        result.elements[0].text,
        "ab<span>c<span>d</span></span> end"
    );
}

#[test]
fn inline_root_is_walked_as_one_paragraph() {
    let mut tree = MarkupTree::new("b");
    tree.push_text(tree.root(), "Bold root text");
    tree.push_tail(tree.root(), "ignored tail");
    let elements = Partitioner::default()
        .partition(&tree)
        .expect("partition")
        .into_elements();
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].text, "Bold root text");
    assert_eq!(values(&elements[0], AnnotationKey::EmphasizedTextTags), ["b"]);
}

#[test]
fn default_root_yields_nothing() {
    let mut tree = MarkupTree::new("x-widget");
    tree.push_text(tree.root(), "Content nobody asked for.");
    let result = Partitioner::default().partition(&tree).expect("partition");
    assert!(result.elements.is_empty());
}

#[test]
fn undrained_inline_child_is_an_invariant_error() {
    let mut tree = MarkupTree::new("div");
    tree.append_child(tree.root(), "span").expect("span");
    let root = tree.get(tree.root()).expect("root");
    let mut cursor = ChildCursor::new(&root.children);
    assert!(matches!(
        cursor.next_block(&tree),
        Err(PartitionError::InternalInvariant(_))
    ));
    assert!(cursor.next_inline(&tree).is_some());
    assert!(matches!(cursor.next_block(&tree), Ok(None)));
}

#[test]
fn partitioning_leaves_the_tree_reusable() {
    let tree = parse_html("<h2>Title</h2><p>Some body text for the page.</p>");
    let partitioner = Partitioner::default();
    let first = partitioner.partition(&tree).expect("first");
    let second = partitioner.partition(&tree).expect("second");
    assert_eq!(first, second);
    assert_eq!(first.elements.len(), 2);
}
