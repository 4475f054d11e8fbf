use html_escape::encode_text;

use crate::text::normalize_text;
use crate::tree::{MarkupNode, NodeId};
use crate::types::{Element, ElementType};

use super::{PartitionError, Walk};

impl<'t> Walk<'t> {
    /// One `Table` element for the whole table, or nothing when it has no
    /// rows or no text.
    pub(crate) fn walk_table(&self, id: NodeId) -> Result<Option<Element>, PartitionError> {
        let mut matrix: Vec<Vec<String>> = Vec::new();
        for row in self.table_rows(id)? {
            let mut cells = Vec::new();
            for &cell in &self.node(row)?.children {
                if is_cell(self.node(cell)?) {
                    cells.push(self.cell_text(cell)?);
                }
            }
            matrix.push(cells);
        }
        if matrix.is_empty() {
            return Ok(None);
        }

        let text = matrix
            .iter()
            .flatten()
            .filter(|cell| !cell.is_empty())
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ");
        if text.is_empty() {
            return Ok(None);
        }
        Ok(Some(
            Element::new(ElementType::Table, text).with_html(matrix_to_html(&matrix)),
        ))
    }

    fn table_rows(&self, table: NodeId) -> Result<Vec<NodeId>, PartitionError> {
        let mut rows = Vec::new();
        for &child in &self.node(table)?.children {
            let node = self.node(child)?;
            match node.tag.as_str() {
                "tr" => rows.push(child),
                "thead" | "tbody" | "tfoot" => {
                    for &row in &node.children {
                        if self.node(row)?.tag == "tr" {
                            rows.push(row);
                        }
                    }
                }
                _ => {}
            }
        }
        Ok(rows)
    }

    /// Every text fragment below the cell, nested tables included, in
    /// document order.
    fn cell_text(&self, cell: NodeId) -> Result<String, PartitionError> {
        enum Step {
            Enter(NodeId),
            Tail(NodeId),
        }

        let mut fragments: Vec<String> = Vec::new();
        let mut push = |raw: &str| {
            let text = normalize_text(raw);
            if !text.is_empty() {
                fragments.push(text);
            }
        };
        let mut stack = vec![Step::Enter(cell)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Enter(id) => {
                    let node = self.node(id)?;
                    push(&node.text);
                    if id != cell {
                        stack.push(Step::Tail(id));
                    }
                    stack.extend(node.children.iter().rev().map(|c| Step::Enter(*c)));
                }
                Step::Tail(id) => push(&self.node(id)?.tail),
            }
        }
        Ok(fragments.join(" "))
    }
}

fn is_cell(node: &MarkupNode) -> bool {
    matches!(node.tag.as_str(), "td" | "th")
}

/// Renders a row-major matrix of cell texts as an HTML table, padding short
/// rows to the widest one.
pub fn matrix_to_html(rows: &[Vec<String>]) -> String {
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    let mut html = String::from("<table>");
    for row in rows {
        html.push_str("<tr>");
        for col in 0..width {
            html.push_str("<td>");
            if let Some(cell) = row.get(col) {
                html.push_str(&encode_text(cell));
            }
            html.push_str("</td>");
        }
        html.push_str("</tr>");
    }
    html.push_str("</table>");
    html
}
