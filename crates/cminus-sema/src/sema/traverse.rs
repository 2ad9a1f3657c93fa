//! Generic preorder/postorder tree walker

use crate::ast::Node;

/// Callbacks applied by [`traverse`]; both default to doing nothing
pub trait Visitor {
    fn pre(&mut self, node: &mut Node) {
        let _ = node;
    }

    fn post(&mut self, node: &mut Node) {
        let _ = node;
    }
}

/// Walk `root` depth-first.
///
/// Each node gets `pre` on entry, then every child slot is walked left to
/// right, then `post` runs, then the walk continues with the next sibling.
/// Empty slots and the end of a sibling chain are skipped silently.
pub fn traverse<V: Visitor + ?Sized>(root: Option<&mut Node>, visitor: &mut V) {
    let mut next = root;
    while let Some(node) = next {
        visitor.pre(node);
        for child in &mut node.children {
            traverse(child.as_deref_mut(), visitor);
        }
        visitor.post(node);
        next = node.sibling.as_deref_mut();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinOp, TypeSpec};

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl Visitor for Recorder {
        fn pre(&mut self, node: &mut Node) {
            self.events.push(format!("pre {}", node.lineno));
        }

        fn post(&mut self, node: &mut Node) {
            self.events.push(format!("post {}", node.lineno));
        }
    }

    struct PostOnly(Vec<u32>);

    impl Visitor for PostOnly {
        fn post(&mut self, node: &mut Node) {
            self.0.push(node.lineno);
        }
    }

    #[test]
    fn test_order_children_before_sibling() {
        // 1: op(2, 3), then sibling 4
        let op = Node::op(BinOp::Add, Node::constant(1, 2), Node::constant(2, 3), 1);
        let mut root = Node::chain(vec![op, Node::constant(3, 4)]).unwrap();

        let mut rec = Recorder::default();
        traverse(Some(&mut root), &mut rec);

        assert_eq!(
            rec.events,
            vec!["pre 1", "pre 2", "post 2", "pre 3", "post 3", "post 1", "pre 4", "post 4"]
        );
    }

    #[test]
    fn test_empty_slots_are_skipped() {
        // slot 0 empty, slot 1 filled
        let mut node = Node::compound(Vec::new(), vec![Node::void_return(2)], 1);
        let mut rec = PostOnly(Vec::new());
        traverse(Some(&mut node), &mut rec);
        assert_eq!(rec.0, vec![2, 1]);
    }

    #[test]
    fn test_absent_root() {
        let mut rec = Recorder::default();
        traverse(None, &mut rec);
        assert!(rec.events.is_empty());
    }

    #[test]
    fn test_long_sibling_chain() {
        let decls = (1..=100_000)
            .map(|i| Node::var_decl(&format!("v{i}"), TypeSpec::Int, i))
            .collect();
        let mut root = Node::chain(decls).unwrap();
        let mut rec = PostOnly(Vec::new());
        traverse(Some(&mut root), &mut rec);
        assert_eq!(rec.0.len(), 100_000);
        assert_eq!(rec.0.last(), Some(&100_000));
    }
}
