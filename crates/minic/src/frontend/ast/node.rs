//! Node kinds and per-node annotations

use super::NodeId;
use crate::common::{Position, Span};
use crate::frontend::sema::IdentDescriptor;
use crate::types::{BinaryOp, DataType};

/// A node in the arena
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    /// Row/column of the token that started the construct
    pub position: Option<Position>,
    pub span: Span,
    /// Inferred type (filled in during semantic analysis)
    pub node_type: Option<DataType>,
    /// Resolved identifier (filled in during semantic analysis)
    pub node_ident: Option<IdentDescriptor>,
}

impl Node {
    pub fn new(kind: NodeKind, position: Option<Position>, span: Span) -> Self {
        Self {
            kind,
            position,
            span,
            node_type: None,
            node_ident: None,
        }
    }
}

/// Node kinds
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Literal in source form: `42`, `7.5`, `"text"`, `true`
    Literal(String),

    /// Identifier reference: `a`
    Ident(String),

    /// Type name in a declaration: `int`
    Type(String),

    /// Binary operation: `a + b`
    BinaryOp {
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    },

    /// Function call: `f(a, b)`
    Call {
        func: NodeId,
        args: Vec<NodeId>,
    },

    /// Implicit conversion inserted by the analyzer
    TypeConvert {
        expr: NodeId,
        target: DataType,
    },

    /// Assignment: `a = expr`
    Assign {
        target: NodeId,
        value: NodeId,
    },

    /// Variable declaration group: `int a, b = 1`
    Vars {
        ty: NodeId,
        vars: Vec<NodeId>,
    },

    /// Return statement: `return expr`
    Return {
        value: NodeId,
    },

    /// If statement: `if (cond) then [else else]`
    If {
        cond: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
    },

    /// For loop: `for (init; cond; step) body`; omitted clauses are empty
    /// statement lists
    For {
        init: NodeId,
        cond: NodeId,
        step: NodeId,
        body: NodeId,
    },

    /// Function parameter: `int a`
    Param {
        ty: NodeId,
        name: NodeId,
    },

    /// Function definition
    Func {
        return_type: NodeId,
        name: NodeId,
        params: Vec<NodeId>,
        body: NodeId,
    },

    /// Statement sequence; `program` marks the translation unit root
    StmtList {
        stmts: Vec<NodeId>,
        program: bool,
    },
}

/// Child entry of the tree dump: a real node, or a labelled group that
/// exists only for display
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Node(NodeId),
    Group { label: String, children: Vec<NodeId> },
}

impl NodeKind {
    /// Expressions show their inferred type in the dump; statements and
    /// type names do not
    pub fn is_annotated(&self) -> bool {
        matches!(
            self,
            NodeKind::Literal(_)
                | NodeKind::Ident(_)
                | NodeKind::BinaryOp { .. }
                | NodeKind::Call { .. }
                | NodeKind::TypeConvert { .. }
                | NodeKind::Assign { .. }
        )
    }

    /// Child ids in source order
    pub fn child_ids(&self) -> Vec<NodeId> {
        match self {
            NodeKind::Literal(_) | NodeKind::Ident(_) | NodeKind::Type(_) => Vec::new(),
            NodeKind::BinaryOp { left, right, .. } => vec![*left, *right],
            NodeKind::Call { func, args } => std::iter::once(*func).chain(args.iter().copied()).collect(),
            NodeKind::TypeConvert { expr, .. } => vec![*expr],
            NodeKind::Assign { target, value } => vec![*target, *value],
            NodeKind::Vars { ty, vars } => std::iter::once(*ty).chain(vars.iter().copied()).collect(),
            NodeKind::Return { value } => vec![*value],
            NodeKind::If { cond, then_branch, else_branch } => {
                let mut ids = vec![*cond, *then_branch];
                ids.extend(else_branch.iter().copied());
                ids
            }
            NodeKind::For { init, cond, step, body } => vec![*init, *cond, *step, *body],
            NodeKind::Param { ty, name } => vec![*ty, *name],
            NodeKind::Func { return_type, name, params, body } => {
                let mut ids = vec![*return_type, *name];
                ids.extend(params.iter().copied());
                ids.push(*body);
                ids
            }
            NodeKind::StmtList { stmts, .. } => stmts.clone(),
        }
    }

    /// Mutable child slots, in the same order as [`NodeKind::child_ids`]
    pub fn child_slots_mut(&mut self) -> Vec<&mut NodeId> {
        match self {
            NodeKind::Literal(_) | NodeKind::Ident(_) | NodeKind::Type(_) => Vec::new(),
            NodeKind::BinaryOp { left, right, .. } => vec![left, right],
            NodeKind::Call { func, args } => std::iter::once(func).chain(args.iter_mut()).collect(),
            NodeKind::TypeConvert { expr, .. } => vec![expr],
            NodeKind::Assign { target, value } => vec![target, value],
            NodeKind::Vars { ty, vars } => std::iter::once(ty).chain(vars.iter_mut()).collect(),
            NodeKind::Return { value } => vec![value],
            NodeKind::If { cond, then_branch, else_branch } => {
                let mut slots = vec![cond, then_branch];
                slots.extend(else_branch.iter_mut());
                slots
            }
            NodeKind::For { init, cond, step, body } => vec![init, cond, step, body],
            NodeKind::Param { ty, name } => vec![ty, name],
            NodeKind::Func { return_type, name, params, body } => {
                let mut slots = vec![return_type, name];
                slots.extend(params.iter_mut());
                slots.push(body);
                slots
            }
            NodeKind::StmtList { stmts, .. } => stmts.iter_mut().collect(),
        }
    }
}
