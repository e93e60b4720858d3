//! Context handed to rules.

use tree_sitter::Node;

use crate::language::Language;
use crate::rule::RuleError;
use crate::types::{Position, Range};

/// Read-only view of one parsed source file, shared by every rule in a run.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'tree> {
    /// Language the source was parsed as.
    pub language: Language,
    /// Root node of the syntax tree.
    pub root: Node<'tree>,
    /// Raw source bytes the tree was built from.
    pub source: &'tree [u8],
}

impl<'tree> RuleContext<'tree> {
    /// Creates a new rule context.
    #[must_use]
    pub fn new(language: Language, root: Node<'tree>, source: &'tree [u8]) -> Self {
        Self {
            language,
            root,
            source,
        }
    }

    /// Source text covered by `node`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidUtf8`] if the node's bytes are not UTF-8.
    pub fn text(&self, node: Node<'_>) -> Result<&'tree str, RuleError> {
        node.utf8_text(self.source)
            .map_err(|source| RuleError::InvalidUtf8 {
                kind: node.kind(),
                line: node.start_position().row,
                source,
            })
    }

    /// Like [`text`](Self::text) for an optional node; `None` yields `""`.
    ///
    /// # Errors
    ///
    /// Returns [`RuleError::InvalidUtf8`] if the node's bytes are not UTF-8.
    pub fn text_of(&self, node: Option<Node<'_>>) -> Result<&'tree str, RuleError> {
        node.map_or(Ok(""), |n| self.text(n))
    }
}

/// Converts a node's span into a [`Range`].
#[must_use]
pub fn node_range(node: Node<'_>) -> Range {
    let start = node.start_position();
    let end = node.end_position();
    Range::new(
        Position::new(start.row, start.column),
        Position::new(end.row, end.column),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::{TreeProducer, TreeSitterProducer};

    #[test]
    fn text_and_range_follow_node_span() {
        let src = b"x = 1\nfoo(bar)\n";
        let tree = TreeSitterProducer.parse(Language::Python, src).unwrap();
        let ctx = RuleContext::new(Language::Python, tree.root_node(), src);

        let mut cursor = ctx.root.walk();
        let second = ctx.root.named_children(&mut cursor).nth(1).unwrap();
        assert_eq!(ctx.text(second).unwrap(), "foo(bar)");
        assert_eq!(
            node_range(second),
            Range::new(Position::new(1, 0), Position::new(1, 8))
        );
        assert_eq!(ctx.text_of(None).unwrap(), "");
    }

    #[test]
    fn invalid_utf8_is_an_error_not_a_panic() {
        let src: &[u8] = b"x = '\xff'\n";
        let tree = TreeSitterProducer.parse(Language::Python, src).unwrap();
        let ctx = RuleContext::new(Language::Python, tree.root_node(), src);
        let err = ctx.text(ctx.root).unwrap_err();
        assert!(matches!(err, RuleError::InvalidUtf8 { kind: "module", .. }));
    }
}
