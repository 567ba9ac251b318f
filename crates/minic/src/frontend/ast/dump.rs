//! Box-drawing tree dump
//!
//! Each node renders as its label on one line; children follow, prefixed
//! with `├ ` (or `└ ` for the last child), and their continuation lines
//! with `│ ` (or two spaces under the last child).

use super::{Ast, Child, NodeId, NodeKind};

impl Ast {
    /// Short label of a node
    pub fn label(&self, id: NodeId) -> String {
        match self.kind(id) {
            NodeKind::Literal(text) => text.clone(),
            NodeKind::Ident(name) | NodeKind::Type(name) => name.clone(),
            NodeKind::BinaryOp { op, .. } => op.as_str().to_string(),
            NodeKind::Call { .. } => "call".to_string(),
            NodeKind::TypeConvert { .. } => "convert".to_string(),
            NodeKind::Assign { .. } => "=".to_string(),
            NodeKind::Vars { ty, .. } | NodeKind::Param { ty, .. } => self.label(*ty),
            NodeKind::Return { .. } => "return".to_string(),
            NodeKind::If { .. } => "if".to_string(),
            NodeKind::For { .. } => "for".to_string(),
            NodeKind::Func { .. } => "function".to_string(),
            NodeKind::StmtList { .. } => "...".to_string(),
        }
    }

    /// Label followed by `" : "` and the resolved identifier, or the
    /// inferred type when no identifier is attached. Statements and type
    /// names are never annotated.
    pub fn full_label(&self, id: NodeId) -> String {
        let node = self.node(id);
        let label = self.label(id);
        if !node.kind.is_annotated() {
            return label;
        }
        match (&node.node_ident, &node.node_type) {
            (Some(ident), _) => format!("{} : {}", label, ident),
            (None, Some(ty)) => format!("{} : {}", label, ty),
            (None, None) => label,
        }
    }

    /// Children as shown in the dump, including display-only groups
    pub fn display_children(&self, id: NodeId) -> Vec<Child> {
        match self.kind(id) {
            NodeKind::TypeConvert { expr, target } => vec![Child::Group {
                label: target.to_string(),
                children: vec![*expr],
            }],
            NodeKind::Func { return_type, name, params, body } => vec![
                Child::Group {
                    label: self.label(*return_type),
                    children: vec![*name],
                },
                Child::Group {
                    label: "params".to_string(),
                    children: params.clone(),
                },
                Child::Node(*body),
            ],
            NodeKind::Vars { vars, .. } => vars.iter().copied().map(Child::Node).collect(),
            NodeKind::Param { name, .. } => vec![Child::Node(*name)],
            kind => kind.child_ids().into_iter().map(Child::Node).collect(),
        }
    }

    /// Render the subtree rooted at `id`
    pub fn dump_node(&self, id: NodeId) -> Vec<String> {
        let mut lines = vec![self.full_label(id)];
        self.dump_children(self.display_children(id), &mut lines);
        lines
    }

    fn dump_child(&self, child: &Child) -> Vec<String> {
        match child {
            Child::Node(id) => self.dump_node(*id),
            Child::Group { label, children } => {
                let mut lines = vec![label.clone()];
                let children = children.iter().copied().map(Child::Node).collect();
                self.dump_children(children, &mut lines);
                lines
            }
        }
    }

    fn dump_children(&self, children: Vec<Child>, lines: &mut Vec<String>) {
        let count = children.len();
        for (i, child) in children.iter().enumerate() {
            let (first, rest) = if i + 1 == count { ("└", " ") } else { ("├", "│") };
            for (j, line) in self.dump_child(child).into_iter().enumerate() {
                let prefix = if j == 0 { first } else { rest };
                lines.push(format!("{} {}", prefix, line));
            }
        }
    }
}
