//! Abstract Syntax Tree definitions
//!
//! Nodes live in an arena owned by [`Ast`] and refer to their children by
//! [`NodeId`]. The analyzer annotates nodes in place and rewires child
//! slots through [`Ast::set_child`]; it never aliases a node from two
//! parents.

mod node;
mod dump;

pub use node::{Child, Node, NodeKind};
pub use crate::types::BinaryOp;

use crate::common::{Position, Span};
use crate::types::DataType;

/// Stable index of a node inside its [`Ast`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

/// A parsed program
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node and return its id
    pub fn push(&mut self, kind: NodeKind, position: Option<Position>, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind, position, span));
        id
    }

    /// Add a node that already carries an inferred type
    pub fn push_typed(&mut self, kind: NodeKind, position: Option<Position>, span: Span, ty: DataType) -> NodeId {
        let id = self.push(kind, position, span);
        self.nodes[id.0].node_type = Some(ty);
        id
    }

    pub fn set_root(&mut self, root: NodeId) {
        self.root = Some(root);
    }

    /// Root node; an empty arena has none
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Structural children of `id`, in source order
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        self.kind(id).child_ids()
    }

    /// Replace the child at `position` (an index into [`Ast::children`])
    /// of `parent` with `child`. Returns the previous child, or `None` when
    /// the position is out of range.
    pub fn set_child(&mut self, parent: NodeId, position: usize, child: NodeId) -> Option<NodeId> {
        let mut slots = self.nodes[parent.0].kind.child_slots_mut();
        let slot = slots.get_mut(position)?;
        Some(std::mem::replace(*slot, child))
    }

    /// Whether `id` is the empty statement list used as a placeholder for
    /// an omitted `for` clause
    pub fn is_empty_marker(&self, id: NodeId) -> bool {
        matches!(self.kind(id), NodeKind::StmtList { stmts, program: false } if stmts.is_empty())
    }

    /// Render the tree rooted at the program root, one string per line
    pub fn dump(&self) -> Vec<String> {
        match self.root {
            Some(root) => self.dump_node(root),
            None => Vec::new(),
        }
    }
}

/// Render `ast` as box-drawing lines
pub fn dump(ast: &Ast) -> Vec<String> {
    ast.dump()
}
