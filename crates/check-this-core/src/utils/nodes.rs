//! Syntax-tree traversal helpers shared by rules.
//!
//! Traversal is expressed as an iterator with an explicit stack so rules can
//! filter and map over nodes instead of recursing with captured state.

use tree_sitter::Node;

/// Pre-order, depth-first iterator over a node and its named descendants.
///
/// Children are visited in source order. The starting node is yielded first.
pub struct Preorder<'tree> {
    stack: Vec<Node<'tree>>,
}

impl<'tree> Iterator for Preorder<'tree> {
    type Item = Node<'tree>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        let mut cursor = node.walk();
        let children: Vec<Node<'tree>> = node.named_children(&mut cursor).collect();
        self.stack.extend(children.into_iter().rev());
        Some(node)
    }
}

/// Walks `node` and all of its named descendants in pre-order.
#[must_use]
pub fn preorder(node: Node<'_>) -> Preorder<'_> {
    Preorder { stack: vec![node] }
}

/// Named children of `node`, in source order.
#[must_use]
pub fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).collect()
}

/// First named child whose kind is one of `kinds`.
#[must_use]
pub fn first_child_of_kind<'tree>(node: Node<'tree>, kinds: &[&str]) -> Option<Node<'tree>> {
    let mut cursor = node.walk();
    let found = node
        .named_children(&mut cursor)
        .find(|child| kinds.contains(&child.kind()));
    found
}

/// Named children that represent code rather than comments.
#[must_use]
pub fn statements(block: Node<'_>) -> Vec<Node<'_>> {
    named_children(block)
        .into_iter()
        .filter(|child| child.kind() != "comment")
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{Language, TreeProducer, TreeSitterProducer};

    #[test]
    fn preorder_visits_parents_before_children_in_source_order() {
        let src = b"a = 1\nb = 2\n";
        let tree = TreeSitterProducer.parse(Language::Python, src).unwrap();
        let kinds: Vec<&str> = preorder(tree.root_node()).map(|n| n.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                "module",
                "expression_statement",
                "assignment",
                "identifier",
                "integer",
                "expression_statement",
                "assignment",
                "identifier",
                "integer",
            ]
        );
    }

    #[test]
    fn statements_skip_comments() {
        let src = b"try {\n  x();\n} catch (e) {\n  // ignored\n}\n";
        let tree = TreeSitterProducer.parse(Language::JavaScript, src).unwrap();
        let catch = preorder(tree.root_node())
            .find(|n| n.kind() == "catch_clause")
            .unwrap();
        let body = catch.child_by_field_name("body").unwrap();
        assert_eq!(named_children(body).len(), 1);
        assert!(statements(body).is_empty());
        assert_eq!(
            first_child_of_kind(catch, &["statement_block"]).map(|n| n.id()),
            Some(body.id())
        );
    }
}
