//! Arena-indexed syntax tree
//!
//! Nodes are stored in pre-order in a single `Vec`; each node links to its
//! first child and next sibling. Handles are `Copy` and borrow the tree, so
//! walking is side-effect free.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::kind::NodeKind;
use crate::text::cursor::{slice, TextRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq)]
struct NodeData {
    kind: NodeKind,
    range: TextRange,
    first_child: Option<NodeId>,
    next_sibling: Option<NodeId>,
}

/// Immutable syntax tree; node 0 is the root
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxTree {
    nodes: Vec<NodeData>,
}

impl SyntaxTree {
    /// Root node of the tree
    pub fn root(&self) -> SyntaxNode<'_> {
        SyntaxNode {
            tree: self,
            id: NodeId(0),
        }
    }

    /// Number of nodes, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1 && self.nodes[0].first_child.is_none()
    }

    /// Build a tree from the host's nested representation
    ///
    /// Ranges are checked against the document length and against the parent
    /// node, so the engine can slice text without further checks.
    pub fn from_raw(raw: &RawNode, text_len: usize) -> Result<SyntaxTree, TreeError> {
        if raw.from > raw.to {
            return Err(TreeError::InvertedRange {
                name: raw.name.clone(),
                from: raw.from,
                to: raw.to,
            });
        }
        if raw.to > text_len {
            return Err(TreeError::OutOfBounds {
                name: raw.name.clone(),
                to: raw.to,
                len: text_len,
            });
        }

        let mut builder = TreeBuilder::new();
        push_raw(&mut builder, raw)?;
        Ok(builder.finish())
    }

    /// Nested representation, the inverse of [`SyntaxTree::from_raw`]
    pub fn to_raw(&self) -> RawNode {
        fn convert(node: SyntaxNode<'_>) -> RawNode {
            RawNode {
                name: node.kind().name().to_string(),
                from: node.range().from,
                to: node.range().to,
                children: node.children().map(convert).collect(),
            }
        }
        convert(self.root())
    }
}

fn push_raw(builder: &mut TreeBuilder, raw: &RawNode) -> Result<(), TreeError> {
    let range = TextRange::new(raw.from, raw.to);
    for child in &raw.children {
        if child.from > child.to {
            return Err(TreeError::InvertedRange {
                name: child.name.clone(),
                from: child.from,
                to: child.to,
            });
        }
        if !range.contains_range(TextRange::new(child.from, child.to)) {
            return Err(TreeError::OutsideParent {
                name: child.name.clone(),
                parent: raw.name.clone(),
                from: child.from,
                to: child.to,
            });
        }
    }

    builder.start_node(NodeKind::from_name(&raw.name), raw.from);
    for child in &raw.children {
        push_raw(builder, child)?;
    }
    builder.finish_node(raw.to);
    Ok(())
}

/// Read-only handle to one node
#[derive(Debug, Clone, Copy)]
pub struct SyntaxNode<'t> {
    tree: &'t SyntaxTree,
    id: NodeId,
}

impl<'t> SyntaxNode<'t> {
    fn data(&self) -> &'t NodeData {
        &self.tree.nodes[self.id.index()]
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> &'t NodeKind {
        &self.data().kind
    }

    pub fn range(&self) -> TextRange {
        self.data().range
    }

    pub fn first_child(&self) -> Option<SyntaxNode<'t>> {
        self.data().first_child.map(|id| SyntaxNode { tree: self.tree, id })
    }

    pub fn next_sibling(&self) -> Option<SyntaxNode<'t>> {
        self.data().next_sibling.map(|id| SyntaxNode { tree: self.tree, id })
    }

    /// Independent iterator over the immediate children
    pub fn children(&self) -> Children<'t> {
        Children {
            next: self.first_child(),
        }
    }

    /// Source text covered by this node
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        slice(source, self.range())
    }
}

pub struct Children<'t> {
    next: Option<SyntaxNode<'t>>,
}

impl<'t> Iterator for Children<'t> {
    type Item = SyntaxNode<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.next_sibling();
        Some(current)
    }
}

/// Nested node form exchanged with the host (JSON / JS objects)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawNode {
    pub name: String,
    pub from: usize,
    pub to: usize,
    #[serde(default)]
    pub children: Vec<RawNode>,
}

impl RawNode {
    pub fn new(name: impl Into<String>, from: usize, to: usize) -> Self {
        Self {
            name: name.into(),
            from,
            to,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<RawNode>) -> Self {
        self.children = children;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("node '{name}' has an inverted range {from}..{to}")]
    InvertedRange { name: String, from: usize, to: usize },

    #[error("node '{name}' ends at {to}, past the end of the document ({len} bytes)")]
    OutOfBounds { name: String, to: usize, len: usize },

    #[error("node '{name}' at {from}..{to} lies outside its parent '{parent}'")]
    OutsideParent {
        name: String,
        parent: String,
        from: usize,
        to: usize,
    },
}

/// Incremental pre-order builder
///
/// `start_node`/`finish_node` must be balanced; `leaf` adds a childless node
/// to the innermost open node.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<NodeData>,
    /// Open nodes with the last child attached to each
    stack: Vec<(NodeId, Option<NodeId>)>,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, kind: NodeKind, range: TextRange) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind,
            range,
            first_child: None,
            next_sibling: None,
        });

        if let Some((parent, last)) = self.stack.last_mut() {
            match *last {
                Some(prev) => self.nodes[prev.index()].next_sibling = Some(id),
                None => self.nodes[parent.index()].first_child = Some(id),
            }
            *last = Some(id);
        }
        id
    }

    pub fn start_node(&mut self, kind: NodeKind, from: usize) {
        let id = self.push(kind, TextRange::at(from));
        self.stack.push((id, None));
    }

    pub fn finish_node(&mut self, to: usize) {
        if let Some((id, _)) = self.stack.pop() {
            let data = &mut self.nodes[id.index()];
            data.range.to = to.max(data.range.from);
        }
    }

    pub fn leaf(&mut self, kind: NodeKind, range: TextRange) {
        self.push(kind, range);
    }

    /// Close any nodes left open and return the tree
    pub fn finish(mut self) -> SyntaxTree {
        while let Some((id, last)) = self.stack.pop() {
            let end = last
                .map(|child| self.nodes[child.index()].range.to)
                .unwrap_or(self.nodes[id.index()].range.from);
            let data = &mut self.nodes[id.index()];
            data.range.to = data.range.to.max(end);
        }
        if self.nodes.is_empty() {
            self.nodes.push(NodeData {
                kind: NodeKind::Program,
                range: TextRange::default(),
                first_child: None,
                next_sibling: None,
            });
        }
        SyntaxTree { nodes: self.nodes }
    }
}
