//! Semantic analyzer - identifier resolution, type checking and implicit
//! conversion

use super::scope::{IdentDescriptor, Scope};
use crate::common::{SemanticError, SemanticErrorKind, SemanticResult};
use crate::frontend::ast::{Ast, NodeId, NodeKind};
use crate::types::{binary_result, can_convert, conversions_from, BinaryOp, DataType, PrimitiveType};

/// Check the tree rooted at `ast.root()` against `scope`.
///
/// A program root reuses `scope` as its working scope, so its globals stay
/// visible to the caller afterwards. The first error aborts the check.
pub fn semantic_check(ast: &mut Ast, scope: &mut Scope) -> SemanticResult<()> {
    SemanticAnalyzer::new(ast, scope).analyze()
}

/// Semantic analyzer for one pass over one tree
pub struct SemanticAnalyzer<'a> {
    ast: &'a mut Ast,
    scope: &'a mut Scope,
}

impl<'a> SemanticAnalyzer<'a> {
    pub fn new(ast: &'a mut Ast, scope: &'a mut Scope) -> Self {
        Self { ast, scope }
    }

    /// Analyze the whole tree
    pub fn analyze(&mut self) -> SemanticResult<()> {
        match self.ast.root() {
            Some(root) => self.check(root).map(|_| ()),
            None => Ok(()),
        }
    }

    fn error(&self, id: NodeId, kind: SemanticErrorKind) -> SemanticError {
        let node = self.ast.node(id);
        SemanticError::new(kind, node.position).with_span(Some(node.span))
    }

    fn set_type(&mut self, id: NodeId, ty: DataType) -> DataType {
        self.ast.node_mut(id).node_type = Some(ty.clone());
        ty
    }

    fn set_void(&mut self, id: NodeId) -> DataType {
        self.set_type(id, DataType::void().clone())
    }

    fn type_of(&self, id: NodeId) -> DataType {
        self.ast
            .node(id)
            .node_type
            .clone()
            .unwrap_or_else(|| DataType::void().clone())
    }

    fn name_of(&self, id: NodeId) -> String {
        match self.ast.kind(id) {
            NodeKind::Ident(name) | NodeKind::Type(name) => name.clone(),
            _ => self.ast.label(id),
        }
    }

    /// Run `f` in a fresh child scope; the scope is popped on every exit
    fn in_child_scope<T>(&mut self, f: impl FnOnce(&mut Self) -> SemanticResult<T>) -> SemanticResult<T> {
        self.scope.push_child();
        let result = f(self);
        self.scope.pop_to_parent();
        result
    }

    fn in_function_scope<T>(
        &mut self,
        return_type: DataType,
        f: impl FnOnce(&mut Self) -> SemanticResult<T>,
    ) -> SemanticResult<T> {
        self.scope.push_function(return_type);
        let result = f(self);
        self.scope.pop_to_parent();
        result
    }

    // =========================================================================
    // Conversions
    // =========================================================================

    /// Wrap `expr` in a conversion to `target`
    fn wrap(&mut self, expr: NodeId, target: DataType) -> NodeId {
        let node = self.ast.node(expr);
        let (position, span) = (node.position, node.span);
        self.ast.push_typed(
            NodeKind::TypeConvert {
                expr,
                target: target.clone(),
            },
            position,
            span,
            target,
        )
    }

    /// Convert a checked expression to `target`.
    ///
    /// Returns `expr` itself when it already has the target type, a new
    /// conversion node when a conversion edge allows it, and `None`
    /// otherwise.
    pub fn type_convert(&mut self, expr: NodeId, target: &DataType) -> Option<NodeId> {
        let from = self.ast.node(expr).node_type.as_ref()?;
        if from == target {
            return Some(expr);
        }
        if !can_convert(from, target) {
            return None;
        }
        Some(self.wrap(expr, target.clone()))
    }

    /// Convert child `position` of `parent` to `target`, rewiring the slot
    fn convert_child(&mut self, parent: NodeId, position: usize, target: &DataType) -> bool {
        let Some(&child) = self.ast.children(parent).get(position) else {
            return false;
        };
        match self.type_convert(child, target) {
            Some(converted) => {
                if converted != child {
                    self.ast.set_child(parent, position, converted);
                }
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Nodes
    // =========================================================================

    /// Check one node and return its inferred type
    pub fn check(&mut self, id: NodeId) -> SemanticResult<DataType> {
        match self.ast.kind(id).clone() {
            NodeKind::Literal(text) => self.check_literal(id, &text),
            NodeKind::Ident(name) => self.check_ident(id, &name),
            NodeKind::Type(name) => match DataType::from_name(&name) {
                Ok(ty) => Ok(self.set_type(id, ty.clone())),
                Err(_) => Err(self.error(id, SemanticErrorKind::UnknownType(name))),
            },
            NodeKind::BinaryOp { op, left, right } => self.check_binary(id, op, left, right),
            NodeKind::Call { func, args } => self.check_call(id, func, &args),
            NodeKind::TypeConvert { target, .. } => Ok(self.set_type(id, target)),
            NodeKind::Assign { target, value } => self.check_assign(id, target, value),
            NodeKind::Vars { ty, vars } => self.check_vars(id, ty, &vars),
            NodeKind::Return { value } => self.check_return(id, value),
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            } => self.check_if(id, cond, then_branch, else_branch),
            NodeKind::For {
                init,
                cond,
                step,
                body,
            } => self.check_for(id, init, cond, step, body),
            NodeKind::Param { ty, name } => self.check_param(id, ty, name),
            NodeKind::Func {
                return_type,
                name,
                params,
                body,
            } => self.check_func(id, return_type, name, &params, body),
            NodeKind::StmtList { stmts, program } => {
                if program {
                    for stmt in stmts {
                        self.check(stmt)?;
                    }
                } else {
                    self.in_child_scope(|a| {
                        for stmt in stmts {
                            a.check(stmt)?;
                        }
                        Ok(())
                    })?;
                }
                Ok(self.set_void(id))
            }
        }
    }

    fn check_literal(&mut self, id: NodeId, text: &str) -> SemanticResult<DataType> {
        match literal_type(text) {
            Some(primitive) => Ok(self.set_type(id, primitive.into())),
            None => Err(self.error(id, SemanticErrorKind::UnrecognizedLiteral(text.to_string()))),
        }
    }

    fn check_ident(&mut self, id: NodeId, name: &str) -> SemanticResult<DataType> {
        let Some(ident) = self.scope.get_ident(name).cloned() else {
            return Err(self.error(id, SemanticErrorKind::UndefinedIdentifier(name.to_string())));
        };
        let ty = ident.ty.clone();
        self.ast.node_mut(id).node_ident = Some(ident);
        Ok(self.set_type(id, ty))
    }

    fn check_binary(
        &mut self,
        id: NodeId,
        op: BinaryOp,
        left: NodeId,
        right: NodeId,
    ) -> SemanticResult<DataType> {
        let left_ty = self.check(left)?;
        let right_ty = self.check(right)?;

        if let (Some(l), Some(r)) = (left_ty.primitive(), right_ty.primitive()) {
            if let Some(result) = binary_result(op, l, r) {
                // Mixed operands: the one that differs from the result is widened
                if l != r && result == r && conversions_from(l).contains(&r) {
                    let converted = self.wrap(left, r.into());
                    self.ast.set_child(id, 0, converted);
                } else if l != r && result == l && conversions_from(r).contains(&l) {
                    let converted = self.wrap(right, l.into());
                    self.ast.set_child(id, 1, converted);
                }
                return Ok(self.set_type(id, result.into()));
            }

            // First table hit wins: right operand conversions before left
            for &target in conversions_from(r) {
                if let Some(result) = binary_result(op, l, target) {
                    let converted = self.wrap(right, target.into());
                    self.ast.set_child(id, 1, converted);
                    return Ok(self.set_type(id, result.into()));
                }
            }
            for &target in conversions_from(l) {
                if let Some(result) = binary_result(op, target, r) {
                    let converted = self.wrap(left, target.into());
                    self.ast.set_child(id, 0, converted);
                    return Ok(self.set_type(id, result.into()));
                }
            }
        }

        Err(self.error(
            id,
            SemanticErrorKind::OperatorNotApplicable {
                op,
                left: left_ty,
                right: right_ty,
            },
        ))
    }

    fn check_call(&mut self, id: NodeId, func: NodeId, args: &[NodeId]) -> SemanticResult<DataType> {
        let name = self.name_of(func);
        let Some(ident) = self.scope.get_ident(&name).cloned() else {
            return Err(self.error(id, SemanticErrorKind::UndefinedIdentifier(name)));
        };
        let DataType::Function { params, return_type } = &ident.ty else {
            return Err(self.error(id, SemanticErrorKind::NotAFunction(name)));
        };
        if params.len() != args.len() {
            return Err(self.error(
                id,
                SemanticErrorKind::ArityMismatch {
                    function: name,
                    expected: params.len(),
                    actual: args.len(),
                },
            ));
        }

        let mut actual = Vec::with_capacity(args.len());
        let mut converted = Vec::with_capacity(args.len());
        let mut failed = Vec::new();
        for (i, (&arg, param)) in args.iter().zip(params).enumerate() {
            actual.push(self.check(arg)?);
            match self.type_convert(arg, param) {
                Some(arg) => converted.push(arg),
                None => failed.push(i),
            }
        }
        if !failed.is_empty() {
            return Err(self.error(
                id,
                SemanticErrorKind::ArgumentTypesMismatch {
                    function: name,
                    expected: params.clone(),
                    actual,
                    failed,
                },
            ));
        }

        for (i, arg) in converted.into_iter().enumerate() {
            self.ast.set_child(id, i + 1, arg);
        }
        let return_type = return_type.as_ref().clone();
        let func_node = self.ast.node_mut(func);
        func_node.node_type = Some(ident.ty.clone());
        func_node.node_ident = Some(ident);
        Ok(self.set_type(id, return_type))
    }

    fn check_assign(&mut self, id: NodeId, target: NodeId, value: NodeId) -> SemanticResult<DataType> {
        let target_ty = self.check(target)?;
        let value_ty = self.check(value)?;
        if !self.convert_child(id, 1, &target_ty) {
            return Err(self.error(
                id,
                SemanticErrorKind::IncompatibleAssignment {
                    from: value_ty,
                    to: target_ty,
                },
            ));
        }
        Ok(self.set_void(id))
    }

    fn check_vars(&mut self, id: NodeId, ty: NodeId, vars: &[NodeId]) -> SemanticResult<DataType> {
        let declared = self.check(ty)?;
        for &var in vars {
            let name_node = match self.ast.kind(var) {
                NodeKind::Assign { target, .. } => *target,
                _ => var,
            };
            let name = self.name_of(name_node);
            self.scope
                .add_ident(IdentDescriptor::new(name, declared.clone()))
                .map_err(|kind| self.error(name_node, kind))?;
            self.check(var)?;
        }
        Ok(self.set_void(id))
    }

    fn check_return(&mut self, id: NodeId, value: NodeId) -> SemanticResult<DataType> {
        let value_ty = self.in_child_scope(|a| a.check(value))?;
        let Some(return_type) = self.scope.current_function().cloned() else {
            return Err(self.error(id, SemanticErrorKind::ReturnOutsideFunction));
        };
        if !self.convert_child(id, 0, &return_type) {
            return Err(self.error(
                id,
                SemanticErrorKind::IncompatibleReturn {
                    from: value_ty,
                    to: return_type,
                },
            ));
        }
        Ok(self.set_void(id))
    }

    /// Convert condition child `position` of `id` to bool
    fn check_condition(&mut self, id: NodeId, position: usize, cond: NodeId) -> SemanticResult<()> {
        let cond_ty = self.check(cond)?;
        if !self.convert_child(id, position, DataType::bool()) {
            return Err(self.error(cond, SemanticErrorKind::ConditionNotBoolConvertible(cond_ty)));
        }
        Ok(())
    }

    fn check_if(
        &mut self,
        id: NodeId,
        cond: NodeId,
        then_branch: NodeId,
        else_branch: Option<NodeId>,
    ) -> SemanticResult<DataType> {
        self.check_condition(id, 0, cond)?;
        self.in_child_scope(|a| a.check(then_branch))?;
        if let Some(else_branch) = else_branch {
            self.in_child_scope(|a| a.check(else_branch))?;
        }
        Ok(self.set_void(id))
    }

    fn check_for(
        &mut self,
        id: NodeId,
        init: NodeId,
        cond: NodeId,
        step: NodeId,
        body: NodeId,
    ) -> SemanticResult<DataType> {
        self.in_child_scope(|a| {
            a.check(init)?;

            let mut cond = cond;
            if a.ast.is_empty_marker(cond) {
                let node = a.ast.node(cond);
                let (position, span) = (node.position, node.span);
                cond = a.ast.push(NodeKind::Literal("true".to_string()), position, span);
                a.ast.set_child(id, 1, cond);
            }
            a.check_condition(id, 1, cond)?;

            a.check(step)?;
            a.in_child_scope(|a| a.check(body))?;
            Ok(())
        })?;
        Ok(self.set_void(id))
    }

    fn check_param(&mut self, id: NodeId, ty: NodeId, name: NodeId) -> SemanticResult<DataType> {
        let declared = self.check(ty)?;
        let param_name = self.name_of(name);
        let ident = self
            .scope
            .add_ident(IdentDescriptor::param(param_name.clone(), declared.clone()))
            .map_err(|_| self.error(name, SemanticErrorKind::DuplicateParameter(param_name)))?;

        let name_node = self.ast.node_mut(name);
        name_node.node_type = Some(declared);
        name_node.node_ident = Some(ident);
        Ok(self.set_void(id))
    }

    fn check_func(
        &mut self,
        id: NodeId,
        return_type: NodeId,
        name: NodeId,
        params: &[NodeId],
        body: NodeId,
    ) -> SemanticResult<DataType> {
        let func_name = self.name_of(name);
        if self.scope.in_function() {
            return Err(self.error(id, SemanticErrorKind::NestedFunctionNotSupported(func_name)));
        }
        let declared_return = self.check(return_type)?;

        self.in_function_scope(declared_return.clone(), |a| {
            let mut param_types = Vec::with_capacity(params.len());
            for &param in params {
                a.check(param)?;
                let NodeKind::Param { ty, .. } = a.ast.kind(param) else {
                    continue;
                };
                param_types.push(a.type_of(*ty));
            }

            let func_ty = DataType::function(param_types, declared_return);
            let ident = a
                .scope
                .with_global(|global| global.add_ident(IdentDescriptor::new(func_name.clone(), func_ty.clone())))
                .map_err(|_| {
                    a.error(
                        name,
                        SemanticErrorKind::DuplicateIdentifier {
                            name: func_name,
                            function: true,
                        },
                    )
                })?;

            let name_node = a.ast.node_mut(name);
            name_node.node_type = Some(func_ty);
            name_node.node_ident = Some(ident);

            a.check(body)?;
            Ok(())
        })?;
        Ok(self.set_void(id))
    }
}

/// Classify a literal by its source text
fn literal_type(text: &str) -> Option<PrimitiveType> {
    if text == "true" || text == "false" {
        return Some(PrimitiveType::Bool);
    }
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') {
        return Some(PrimitiveType::Str);
    }

    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        return Some(PrimitiveType::Int);
    }
    if digits.starts_with(|c: char| c.is_ascii_digit()) && text.parse::<f64>().is_ok() {
        return Some(PrimitiveType::Double);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Span;
    use crate::frontend::parser::parse;
    use pretty_assertions::assert_eq;

    fn check(source: &str) -> SemanticResult<Ast> {
        let mut ast = parse(source).unwrap();
        let mut scope = Scope::new();
        semantic_check(&mut ast, &mut scope)?;
        Ok(ast)
    }

    fn check_err(source: &str) -> SemanticError {
        check(source).unwrap_err()
    }

    #[test]
    fn test_literal_classification() {
        assert_eq!(literal_type("true"), Some(PrimitiveType::Bool));
        assert_eq!(literal_type("false"), Some(PrimitiveType::Bool));
        assert_eq!(literal_type("42"), Some(PrimitiveType::Int));
        assert_eq!(literal_type("-42"), Some(PrimitiveType::Int));
        assert_eq!(literal_type("7.5"), Some(PrimitiveType::Double));
        assert_eq!(literal_type("1e10"), Some(PrimitiveType::Double));
        assert_eq!(literal_type("+2."), Some(PrimitiveType::Double));
        assert_eq!(literal_type(r#""text""#), Some(PrimitiveType::Str));
        assert_eq!(literal_type("inf"), None);
        assert_eq!(literal_type("1.2.3"), None);
    }

    #[test]
    fn test_comparison_converts_int_operand() {
        let ast = check("int a = 5; double b = 7.5; if (a < b) { }").unwrap();

        assert_eq!(
            ast.dump(),
            vec![
                "...",
                "├ int",
                "│ └ = : void",
                "│   ├ a : int, global, 0",
                "│   └ 5 : int",
                "├ double",
                "│ └ = : void",
                "│   ├ b : double, global, 1",
                "│   └ 7.5 : double",
                "└ if",
                "  ├ < : bool",
                "  │ ├ convert : double",
                "  │ │ └ double",
                "  │ │   └ a : int, global, 0",
                "  │ └ b : double, global, 1",
                "  └ ...",
            ]
        );
    }

    #[test]
    fn test_undefined_identifier_reports_position() {
        let err = check_err("int a = 4; int b = 7;\nif (b > a) {\n    a = d;\n}");

        assert_eq!(err.kind, SemanticErrorKind::UndefinedIdentifier("d".to_string()));
        assert_eq!((err.row(), err.col()), (Some(3), Some(9)));
        assert_eq!(err.to_string(), "identifier 'd' is not declared (line: 3, position: 9)");
    }

    #[test]
    fn test_function_indices_and_call_type() {
        let ast = check("int sum(int a, int b) { int s = a + b; return s; }\nint r = sum(4, 5);").unwrap();

        assert_eq!(
            ast.dump(),
            vec![
                "...",
                "├ function",
                "│ ├ int",
                "│ │ └ sum : int (int, int), global, 0",
                "│ ├ params",
                "│ │ ├ int",
                "│ │ │ └ a : int, param, 0",
                "│ │ └ int",
                "│ │   └ b : int, param, 1",
                "│ └ ...",
                "│   ├ int",
                "│   │ └ = : void",
                "│   │   ├ s : int, local, 0",
                "│   │   └ + : int",
                "│   │     ├ a : int, param, 0",
                "│   │     └ b : int, param, 1",
                "│   └ return",
                "│     └ s : int, local, 0",
                "└ int",
                "  └ = : void",
                "    ├ r : int, global, 0",
                "    └ call : int",
                "      ├ sum : int (int, int), global, 0",
                "      ├ 4 : int",
                "      └ 5 : int",
            ]
        );
    }

    #[test]
    fn test_globals_stay_in_caller_scope() {
        let mut ast = parse("int x; int f() { return 1; }").unwrap();
        let mut scope = Scope::new();
        semantic_check(&mut ast, &mut scope).unwrap();

        assert!(scope.is_global());
        assert_eq!(scope.get_ident("x").unwrap().index, 0);
        assert!(scope.get_ident("f").unwrap().ty.is_function());
    }

    #[test]
    fn test_duplicate_function() {
        let err = check_err("int sum(int a) { return a; }\nint sum(int b) { return b; }");

        assert_eq!(
            err.kind,
            SemanticErrorKind::DuplicateIdentifier {
                name: "sum".to_string(),
                function: true,
            }
        );
        assert_eq!(err.row(), Some(2));
    }

    #[test]
    fn test_duplicate_variable() {
        let err = check_err("int a; double a;");
        assert!(matches!(err.kind, SemanticErrorKind::DuplicateIdentifier { function: false, .. }));
    }

    #[test]
    fn test_duplicate_parameter() {
        let err = check_err("int f(int a, double a) { return 1; }");
        assert_eq!(err.kind, SemanticErrorKind::DuplicateParameter("a".to_string()));
        assert_eq!((err.row(), err.col()), (Some(1), Some(21)));
    }

    #[test]
    fn test_local_may_shadow_global() {
        assert!(check("int a; void f() { double a = 1.5; }").is_ok());
        assert!(check("void f(int a) { int a; }").is_err());
    }

    #[test]
    fn test_arity_mismatch() {
        let err = check_err("int f(int a) { return a; }\nf(1, 2);");

        assert_eq!(
            err.kind,
            SemanticErrorKind::ArityMismatch {
                function: "f".to_string(),
                expected: 1,
                actual: 2,
            }
        );
        assert_eq!(
            err.kind.to_string(),
            "wrong number of arguments for 'f' (expected 1, got 2)"
        );
    }

    #[test]
    fn test_argument_mismatch_is_combined() {
        let err = check_err("int f(int a, bool b) { return a; }\nf(\"x\", 1);");

        let SemanticErrorKind::ArgumentTypesMismatch {
            function,
            expected,
            actual,
            failed,
        } = err.kind
        else {
            panic!("expected combined argument error");
        };
        assert_eq!(function, "f");
        assert_eq!(expected, vec![DataType::from(PrimitiveType::Int), PrimitiveType::Bool.into()]);
        assert_eq!(actual, vec![DataType::from(PrimitiveType::Str), PrimitiveType::Int.into()]);
        assert_eq!(failed, vec![0]);
    }

    #[test]
    fn test_call_arguments_are_converted() {
        let ast = check("void g(double x, string s) { }\ng(1, 2.5);").unwrap();
        let lines = ast.dump();

        assert_eq!(
            lines[lines.len() - 8..],
            [
                "└ call : void",
                "  ├ g : void (double, string), global, 0",
                "  ├ convert : double",
                "  │ └ double",
                "  │   └ 1 : int",
                "  └ convert : string",
                "    └ string",
                "      └ 2.5 : double",
            ]
        );
    }

    #[test]
    fn test_call_errors() {
        assert_eq!(
            check_err("g(1);").kind,
            SemanticErrorKind::UndefinedIdentifier("g".to_string())
        );
        assert_eq!(
            check_err("int g; g(1);").kind,
            SemanticErrorKind::NotAFunction("g".to_string())
        );
    }

    #[test]
    fn test_type_convert_is_idempotent() {
        let mut ast = Ast::new();
        let literal = ast.push(NodeKind::Literal("1".to_string()), None, Span::default());
        let mut scope = Scope::new();
        let mut analyzer = SemanticAnalyzer::new(&mut ast, &mut scope);
        analyzer.check(literal).unwrap();

        let int = DataType::from(PrimitiveType::Int);
        assert_eq!(analyzer.type_convert(literal, &int), Some(literal));

        let double = DataType::from(PrimitiveType::Double);
        let converted = analyzer.type_convert(literal, &double).unwrap();
        assert_ne!(converted, literal);
        assert_eq!(analyzer.type_convert(converted, &double), Some(converted));
        assert_eq!(analyzer.type_convert(literal, DataType::void()), None);

        assert!(matches!(ast.kind(converted), NodeKind::TypeConvert { expr, .. } if *expr == literal));
    }

    #[test]
    fn test_mixed_addition_wraps_int_operand() {
        let ast = check("double x = 1 + 2.5; double y = 2.5 + 1;").unwrap();

        assert_eq!(
            ast.dump(),
            vec![
                "...",
                "├ double",
                "│ └ = : void",
                "│   ├ x : double, global, 0",
                "│   └ + : double",
                "│     ├ convert : double",
                "│     │ └ double",
                "│     │   └ 1 : int",
                "│     └ 2.5 : double",
                "└ double",
                "  └ = : void",
                "    ├ y : double, global, 1",
                "    └ + : double",
                "      ├ 2.5 : double",
                "      └ convert : double",
                "        └ double",
                "          └ 1 : int",
            ]
        );
    }

    #[test]
    fn test_string_concatenation_converts_right_operand() {
        let ast = check(r#"string s = "n = " + 5;"#).unwrap();

        assert_eq!(
            ast.dump(),
            vec![
                "...",
                "└ string",
                "  └ = : void",
                "    ├ s : string, global, 0",
                "    └ + : string",
                r#"      ├ "n = " : string"#,
                "      └ convert : string",
                "        └ string",
                "          └ 5 : int",
            ]
        );
    }

    #[test]
    fn test_operator_not_applicable() {
        let err = check_err("bool b = true && 1.5;");
        assert_eq!(
            err.kind,
            SemanticErrorKind::OperatorNotApplicable {
                op: BinaryOp::LogAnd,
                left: PrimitiveType::Bool.into(),
                right: PrimitiveType::Double.into(),
            }
        );
    }

    #[test]
    fn test_function_operand_is_not_applicable() {
        let err = check_err("int f() { return 1; }\nint x = f + 1;");
        assert!(matches!(err.kind, SemanticErrorKind::OperatorNotApplicable { .. }));
    }

    #[test]
    fn test_incompatible_assignment() {
        let err = check_err("int a; a = 1.5;");
        assert_eq!(
            err.kind,
            SemanticErrorKind::IncompatibleAssignment {
                from: PrimitiveType::Double.into(),
                to: PrimitiveType::Int.into(),
            }
        );
        assert_eq!((err.row(), err.col()), (Some(1), Some(8)));
    }

    #[test]
    fn test_return_checks() {
        assert_eq!(check_err("return 1;").kind, SemanticErrorKind::ReturnOutsideFunction);
        assert_eq!(
            check_err("int f() { return \"s\"; }").kind,
            SemanticErrorKind::IncompatibleReturn {
                from: PrimitiveType::Str.into(),
                to: PrimitiveType::Int.into(),
            }
        );
        assert!(check("double f() { return 1; }").is_ok());
    }

    #[test]
    fn test_if_condition_must_convert_to_bool() {
        assert!(check("int a; if (a) a = 1;").is_ok());
        let err = check_err("double d; if (d) d = 1.5;");
        assert_eq!(
            err.kind,
            SemanticErrorKind::ConditionNotBoolConvertible(PrimitiveType::Double.into())
        );
        assert_eq!((err.row(), err.col()), (Some(1), Some(15)));
    }

    #[test]
    fn test_branch_scopes_are_separate() {
        assert!(check("if (true) { int a; } else { int a; }").is_ok());
        assert!(check("if (true) { int a; } a = 1;").is_err());
    }

    #[test]
    fn test_for_defaults_condition_to_true() {
        let ast = check("for (int i = 0; ; i = i + 1) ;").unwrap();

        assert_eq!(
            ast.dump(),
            vec![
                "...",
                "└ for",
                "  ├ int",
                "  │ └ = : void",
                "  │   ├ i : int, global, 0",
                "  │   └ 0 : int",
                "  ├ true : bool",
                "  ├ ...",
                "  │ └ = : void",
                "  │   ├ i : int, global, 0",
                "  │   └ + : int",
                "  │     ├ i : int, global, 0",
                "  │     └ 1 : int",
                "  └ ...",
            ]
        );
    }

    #[test]
    fn test_for_variable_is_scoped_to_loop() {
        assert!(check("for (int i = 0; i < 3; i = i + 1) { } for (int i = 0; i < 3; i = i + 1) { }").is_ok());
        assert!(check("for (int i = 0; i < 3; i = i + 1) { } i = 1;").is_err());
    }

    #[test]
    fn test_nested_function_rejected() {
        let err = check_err("void f() { void g() { } }");
        assert_eq!(err.kind, SemanticErrorKind::NestedFunctionNotSupported("g".to_string()));
    }

    #[test]
    fn test_function_in_block_is_global() {
        let mut ast = parse("{ int f() { return 1; } } int x = f();").unwrap();
        let mut scope = Scope::new();

        assert!(semantic_check(&mut ast, &mut scope).is_ok());
        assert!(scope.get_ident("f").is_some());
    }

    #[test]
    fn test_unknown_type() {
        let err = check_err("integer a;");
        assert_eq!(err.kind, SemanticErrorKind::UnknownType("integer".to_string()));
    }

    #[test]
    fn test_recursive_call() {
        assert!(check("int fact(int n) { if (n < 2) return 1; return n * fact(n - 1); }").is_ok());
    }
}
