/*
    This module holds derivation trees and the arena they are built in
*/

use std::collections::VecDeque;
use std::fmt::Display;

use itertools::Itertools;

use crate::grammar::Symbol;

pub type NodeId = usize;

#[derive(Debug, PartialEq, Clone)]
struct TreeNode {
    symbol: Symbol,
    children: Vec<NodeId>
}

// Nonterminal expansions stored flat, root first and the rest in preorder.
// Consumed terminals never get a node. Nothing here walks the tree
// recursively, so a chain of any depth can be dropped, compared and printed
#[derive(Debug, PartialEq, Clone)]
pub struct DerivationTree {
    nodes: Vec<TreeNode>
}

// A borrowed view of one node of a tree
#[derive(Clone, Copy)]
pub struct DerivationNode<'a> {
    tree: &'a DerivationTree,
    id: NodeId
}

impl<'a> DerivationNode<'a> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn symbol(&self) -> Symbol {
        self.tree.nodes[self.id].symbol
    }

    pub fn child_count(&self) -> usize {
        self.tree.nodes[self.id].children.len()
    }

    // Children left to right, in the order of the production
    pub fn children(&self) -> impl Iterator<Item = DerivationNode<'a>> + 'a {
        let tree = self.tree;
        tree.nodes[self.id].children.iter().map(move |id| DerivationNode { tree, id: *id })
    }
}

impl std::fmt::Debug for DerivationNode<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.symbol(), self.id)
    }
}

impl DerivationTree {
    pub fn root(&self) -> DerivationNode<'_> {
        DerivationNode { tree: self, id: 0 }
    }

    pub fn node(&self, id: NodeId) -> Option<DerivationNode<'_>> {
        (id < self.nodes.len()).then_some(DerivationNode { tree: self, id })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // Walks the tree breadth first, never going deeper than `max_depth`.
    // The root is at depth 0
    pub fn levels(&self, max_depth: usize) -> Levels<'_> {
        Levels {
            tree: self,
            queue: VecDeque::from([(0, 0)]),
            max_depth
        }
    }

    // Number of levels in the tree
    pub fn depth(&self) -> usize {
        self.levels(usize::MAX).map(|(depth, _)| depth + 1).max().unwrap_or(0)
    }

    // The text a renderer shows: the title, then one line per level
    pub fn render_levels(&self, title: &str, max_depth: usize) -> String {
        let mut out = String::from(title);
        for (depth, level) in &self.levels(max_depth).chunk_by(|(depth, _)| *depth) {
            let symbols = level.map(|(_, node)| node.symbol()).join(" ");
            out.push_str(&format!("\n  level {}: {}", depth, symbols));
        }
        out
    }
}

pub struct Levels<'a> {
    tree: &'a DerivationTree,
    queue: VecDeque<(usize, NodeId)>,
    max_depth: usize
}

impl<'a> Iterator for Levels<'a> {
    type Item = (usize, DerivationNode<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, id) = self.queue.pop_front()?;
        if depth < self.max_depth {
            self.queue.extend(self.tree.nodes[id].children.iter().map(|child| (depth + 1, *child)));
        }
        Some((depth, DerivationNode { tree: self.tree, id }))
    }
}

impl Display for DerivationTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.nodes[0].symbol)?;

        // `indents` holds the indentation contributed by every ancestor of
        // the node being printed, below the root
        let mut indents: Vec<&str> = Vec::new();
        let mut stack: Vec<(NodeId, usize, bool)> = Vec::new();
        let push_children = |stack: &mut Vec<(NodeId, usize, bool)>, id: NodeId, depth: usize| {
            let children = &self.nodes[id].children;
            for (i, child) in children.iter().enumerate().rev() {
                stack.push((*child, depth, i + 1 == children.len()));
            }
        };
        push_children(&mut stack, 0, 1);

        while let Some((id, depth, last)) = stack.pop() {
            indents.truncate(depth - 1);
            let (branch, indent) = if last { ("└── ", "    ") } else { ("├── ", "│   ") };
            write!(f, "\n{}{}{}", indents.concat(), branch, self.nodes[id].symbol)?;
            indents.push(indent);
            push_children(&mut stack, id, depth + 1);
        }
        Ok(())
    }
}

#[derive(Debug)]
struct ArenaNode {
    symbol: Symbol,
    children: Vec<NodeId>
}

// Collects nodes while a parse runs. Nodes refer to their children by id so
// the parse stack only has to remember the id of the parent to attach to
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<ArenaNode>
}

impl TreeBuilder {
    pub fn new() -> Self {
        TreeBuilder::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // The first node ever added becomes the root. Later nodes are appended to
    // `parent`'s children; a later node without a parent is left detached
    pub fn add(&mut self, symbol: Symbol, parent: Option<NodeId>) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(ArenaNode {
            symbol,
            children: Vec::new()
        });

        if id > 0 {
            if let Some(parent) = parent {
                self.nodes[parent].children.push(id);
            }
        }
        id
    }

    // Copies the nodes reachable from the root into preorder, so trees of the
    // same shape compare equal however they were assembled
    pub fn finish(self) -> Option<DerivationTree> {
        if self.is_empty() {
            return None;
        }

        let mut nodes: Vec<TreeNode> = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<(NodeId, Option<NodeId>)> = vec![(0, None)];
        while let Some((old, parent)) = stack.pop() {
            let id = nodes.len();
            if let Some(parent) = parent {
                nodes[parent].children.push(id);
            }

            let node = &self.nodes[old];
            nodes.push(TreeNode {
                symbol: node.symbol,
                children: Vec::with_capacity(node.children.len())
            });
            stack.extend(node.children.iter().rev().map(|child| (*child, Some(id))));
        }

        Some(DerivationTree { nodes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // S
    // ├── A
    // │   └── C
    // └── B
    fn sample_tree() -> DerivationTree {
        let mut builder = TreeBuilder::new();
        let s = builder.add('S', None);
        let a = builder.add('A', Some(s));
        builder.add('C', Some(a));
        builder.add('B', Some(s));
        builder.finish().unwrap()
    }

    fn chain(depth: usize) -> DerivationTree {
        let mut builder = TreeBuilder::new();
        let mut parent = builder.add('S', None);
        for _ in 1..depth {
            parent = builder.add('S', Some(parent));
        }
        builder.finish().unwrap()
    }

    #[test]
    fn builder_assembles_in_order() {
        let tree = sample_tree();
        let root = tree.root();

        assert_eq!(root.symbol(), 'S');
        assert_eq!(root.children().map(|n| n.symbol()).collect::<String>(), "AB");
        let a = root.children().next().unwrap();
        assert_eq!(a.children().map(|n| n.symbol()).collect::<String>(), "C");
        assert_eq!(tree.node(3).map(|n| n.symbol()), Some('B'));
        assert!(tree.node(4).is_none());
    }

    #[test]
    fn builder_without_nodes() {
        let builder = TreeBuilder::new();
        assert!(builder.is_empty());
        assert_eq!(builder.finish(), None);
    }

    #[test]
    fn builder_drops_detached_nodes() {
        let mut builder = TreeBuilder::new();
        let s = builder.add('S', None);
        builder.add('X', None);
        builder.add('B', Some(s));

        let mut expected = TreeBuilder::new();
        let s = expected.add('S', None);
        expected.add('B', Some(s));

        assert_eq!(builder.finish(), expected.finish());
    }

    #[test]
    fn same_shape_compares_equal() {
        // `B` is added before `A`'s child here, unlike in `sample_tree`
        let mut builder = TreeBuilder::new();
        let s = builder.add('S', None);
        let a = builder.add('A', Some(s));
        builder.add('B', Some(s));
        builder.add('C', Some(a));

        assert_eq!(builder.finish(), Some(sample_tree()));
    }

    #[test]
    fn levels_are_bounded() {
        let tree = sample_tree();
        let walk = |max| tree.levels(max).map(|(d, n)| (d, n.symbol())).collect::<Vec<_>>();

        assert_eq!(walk(0), vec![(0, 'S')]);
        assert_eq!(walk(1), vec![(0, 'S'), (1, 'A'), (1, 'B')]);
        assert_eq!(walk(5), vec![(0, 'S'), (1, 'A'), (1, 'B'), (2, 'C')]);
    }

    #[test]
    fn depth_and_count() {
        let tree = sample_tree();
        assert_eq!(tree.depth(), 3);
        assert_eq!(tree.node_count(), 4);
        assert_eq!(chain(1).depth(), 1);
    }

    #[test]
    fn outline_display() {
        assert_eq!(sample_tree().to_string(), "S\n├── A\n│   └── C\n└── B");
        assert_eq!(chain(3).to_string(), "S\n└── S\n    └── S");
    }

    #[test]
    fn render_levels_respects_depth() {
        let tree = sample_tree();

        assert_eq!(tree.render_levels("Tree", 1), "Tree\n  level 0: S\n  level 1: A B");
        assert_eq!(
            tree.render_levels("Tree", 9),
            "Tree\n  level 0: S\n  level 1: A B\n  level 2: C"
        );
    }

    #[test]
    fn very_deep_chain() {
        let tree = chain(200_000);
        let copy = tree.clone();

        assert_eq!(tree, copy);
        assert_eq!(tree.depth(), 200_000);
        assert!(tree.render_levels("Tree", usize::MAX).ends_with("level 199999: S"));
        drop(copy);
        drop(tree);

        // The outline grows with the square of the depth, so a shallower
        // chain keeps the output small
        let outline = chain(3_000).to_string();
        assert_eq!(outline.lines().count(), 3_000);
        assert!(outline.ends_with(&format!("{}└── S", "    ".repeat(2_998))));
    }
}
