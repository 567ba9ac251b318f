//! Recursive descent parser

use crate::common::{CompileError, CompileResult, LineMap, Position, Span};
use crate::frontend::ast::{Ast, BinaryOp, NodeId, NodeKind};
use crate::frontend::lexer::{Lexer, Token, TokenKind};

/// Parse a complete program into an AST whose root is the program
/// statement list
pub fn parse(source: &str) -> CompileResult<Ast> {
    Parser::new(source)?.parse()
}

/// Recursive descent parser
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    /// Span of the last consumed token
    previous: Span,
    lines: LineMap,
    ast: Ast,
}

impl<'a> Parser<'a> {
    /// Create a new parser for the given source
    pub fn new(source: &'a str) -> CompileResult<Self> {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token()?;
        Ok(Self {
            lexer,
            current,
            previous: Span::default(),
            lines: LineMap::new(source),
            ast: Ast::new(),
        })
    }

    /// Parse the whole source as a program
    pub fn parse(mut self) -> CompileResult<Ast> {
        let start = self.current.span;
        let stmts = self.parse_stmt_list(&TokenKind::Eof)?;
        self.expect(TokenKind::Eof)?;

        let root = self.finish(NodeKind::StmtList { stmts, program: true }, start);
        self.ast.set_root(root);
        Ok(self.ast)
    }

    // =========================================================================
    // Helper methods
    // =========================================================================

    fn advance(&mut self) -> CompileResult<Token> {
        let prev = std::mem::replace(&mut self.current, self.lexer.next_token()?);
        self.previous = prev.span;
        Ok(prev)
    }

    fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(kind)
    }

    fn match_token(&mut self, kind: &TokenKind) -> CompileResult<bool> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn expect(&mut self, kind: TokenKind) -> CompileResult<Token> {
        if self.check(&kind) {
            self.advance()
        } else {
            Err(self.unexpected(&kind.to_string()))
        }
    }

    fn unexpected(&self, expected: &str) -> CompileError {
        CompileError::syntax(
            format!("expected {}, found {}", expected, self.current.kind),
            self.current.span,
        )
    }

    fn peek(&mut self) -> CompileResult<&Token> {
        self.lexer.peek()
    }

    fn position(&self, span: Span) -> Option<Position> {
        Some(self.lines.position(span.start))
    }

    /// Push a node started by the token at `start` and ending at the last
    /// consumed token
    fn finish(&mut self, kind: NodeKind, start: Span) -> NodeId {
        let span = start.merge(self.previous);
        let position = self.position(start);
        self.ast.push(kind, position, span)
    }

    fn empty_list(&mut self, at: Span) -> NodeId {
        let position = self.position(at);
        self.ast.push(
            NodeKind::StmtList {
                stmts: Vec::new(),
                program: false,
            },
            position,
            Span::new(at.start, at.start),
        )
    }

    fn expect_identifier(&mut self) -> CompileResult<(String, Span)> {
        match &self.current.kind {
            TokenKind::Identifier(name) => {
                let name = name.clone();
                let token = self.advance()?;
                Ok((name, token.span))
            }
            _ => Err(self.unexpected("identifier")),
        }
    }

    fn parse_ident(&mut self) -> CompileResult<NodeId> {
        let (name, span) = self.expect_identifier()?;
        Ok(self.finish(NodeKind::Ident(name), span))
    }

    fn parse_type(&mut self) -> CompileResult<NodeId> {
        let (name, span) = self.expect_identifier()?;
        Ok(self.finish(NodeKind::Type(name), span))
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Statements up to (not including) `end`; stray semicolons are skipped
    fn parse_stmt_list(&mut self, end: &TokenKind) -> CompileResult<Vec<NodeId>> {
        let mut stmts = Vec::new();
        loop {
            while self.match_token(&TokenKind::Semi)? {}
            if self.check(end) || self.check(&TokenKind::Eof) {
                break;
            }
            stmts.push(self.parse_statement()?);
        }
        Ok(stmts)
    }

    fn parse_statement(&mut self) -> CompileResult<NodeId> {
        match &self.current.kind {
            TokenKind::If => self.parse_if_statement(),
            TokenKind::For => self.parse_for_statement(),
            TokenKind::Return => self.parse_return_statement(),
            TokenKind::LBrace => self.parse_block(),
            TokenKind::Identifier(_) => {
                if matches!(self.peek()?.kind, TokenKind::Identifier(_)) {
                    self.parse_declaration()
                } else {
                    let stmt = self.parse_simple_statement()?;
                    self.expect(TokenKind::Semi)?;
                    Ok(stmt)
                }
            }
            _ => Err(self.unexpected("statement")),
        }
    }

    fn parse_block(&mut self) -> CompileResult<NodeId> {
        let start = self.expect(TokenKind::LBrace)?.span;
        let stmts = self.parse_stmt_list(&TokenKind::RBrace)?;
        self.expect(TokenKind::RBrace)?;
        Ok(self.finish(NodeKind::StmtList { stmts, program: false }, start))
    }

    /// `type name ...`: a function definition or a variable group
    fn parse_declaration(&mut self) -> CompileResult<NodeId> {
        let start = self.current.span;
        let ty = self.parse_type()?;

        if matches!(self.peek()?.kind, TokenKind::LParen) {
            return self.parse_function(start, ty);
        }

        let vars = self.parse_vars_rest(start, ty)?;
        self.expect(TokenKind::Semi)?;
        Ok(vars)
    }

    /// Variables after the declared type: `a, b = 1, c`
    fn parse_vars_rest(&mut self, start: Span, ty: NodeId) -> CompileResult<NodeId> {
        let mut vars = Vec::new();
        loop {
            let name = self.parse_ident()?;
            let var = if self.match_token(&TokenKind::Eq)? {
                let value = self.parse_expression()?;
                let span = self.ast.node(name).span;
                self.finish(NodeKind::Assign { target: name, value }, span)
            } else {
                name
            };
            vars.push(var);

            if !self.match_token(&TokenKind::Comma)? {
                break;
            }
        }
        Ok(self.finish(NodeKind::Vars { ty, vars }, start))
    }

    fn parse_vars(&mut self) -> CompileResult<NodeId> {
        let start = self.current.span;
        let ty = self.parse_type()?;
        self.parse_vars_rest(start, ty)
    }

    fn parse_function(&mut self, start: Span, return_type: NodeId) -> CompileResult<NodeId> {
        let name = self.parse_ident()?;

        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                let param_start = self.current.span;
                let ty = self.parse_type()?;
                let param_name = self.parse_ident()?;
                params.push(self.finish(NodeKind::Param { ty, name: param_name }, param_start));

                if !self.match_token(&TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;

        let body = self.parse_block()?;
        Ok(self.finish(
            NodeKind::Func {
                return_type,
                name,
                params,
                body,
            },
            start,
        ))
    }

    /// Assignment or call, without the trailing `;`
    fn parse_simple_statement(&mut self) -> CompileResult<NodeId> {
        let start = self.current.span;
        let name = self.parse_ident()?;

        match &self.current.kind {
            TokenKind::Eq => {
                self.advance()?;
                let value = self.parse_expression()?;
                Ok(self.finish(NodeKind::Assign { target: name, value }, start))
            }
            TokenKind::LParen => self.parse_call(start, name),
            _ => Err(self.unexpected("'=' or '('")),
        }
    }

    fn parse_if_statement(&mut self) -> CompileResult<NodeId> {
        let start = self.expect(TokenKind::If)?.span;

        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;

        let then_branch = self.parse_statement()?;
        let else_branch = if self.match_token(&TokenKind::Else)? {
            Some(self.parse_statement()?)
        } else {
            None
        };

        Ok(self.finish(
            NodeKind::If {
                cond,
                then_branch,
                else_branch,
            },
            start,
        ))
    }

    fn parse_for_statement(&mut self) -> CompileResult<NodeId> {
        let start = self.expect(TokenKind::For)?.span;
        self.expect(TokenKind::LParen)?;

        let init = self.parse_for_clause(&TokenKind::Semi)?;
        self.expect(TokenKind::Semi)?;

        let cond = if self.check(&TokenKind::Semi) {
            self.empty_list(self.current.span)
        } else {
            self.parse_expression()?
        };
        self.expect(TokenKind::Semi)?;

        let step = self.parse_for_clause(&TokenKind::RParen)?;
        self.expect(TokenKind::RParen)?;

        let body = if self.check(&TokenKind::Semi) {
            let span = self.advance()?.span;
            self.empty_list(span)
        } else {
            self.parse_statement()?
        };

        Ok(self.finish(NodeKind::For { init, cond, step, body }, start))
    }

    /// `for` init/step: a variable group, or a possibly empty
    /// comma-separated list of assignments and calls
    fn parse_for_clause(&mut self, end: &TokenKind) -> CompileResult<NodeId> {
        let start = self.current.span;
        if self.check(end) {
            return Ok(self.empty_list(start));
        }

        if matches!(self.current.kind, TokenKind::Identifier(_))
            && matches!(self.peek()?.kind, TokenKind::Identifier(_))
        {
            return self.parse_vars();
        }

        let mut stmts = vec![self.parse_simple_statement()?];
        while self.match_token(&TokenKind::Comma)? {
            stmts.push(self.parse_simple_statement()?);
        }
        Ok(self.finish(NodeKind::StmtList { stmts, program: false }, start))
    }

    fn parse_return_statement(&mut self) -> CompileResult<NodeId> {
        let start = self.expect(TokenKind::Return)?.span;
        let value = self.parse_expression()?;
        self.match_token(&TokenKind::Semi)?;
        Ok(self.finish(NodeKind::Return { value }, start))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn parse_expression(&mut self) -> CompileResult<NodeId> {
        self.parse_logical_or_expression()
    }

    /// Fold `operand (op operand)*` left to right
    fn parse_binary_level(
        &mut self,
        operand: fn(&mut Self) -> CompileResult<NodeId>,
        operator: fn(&TokenKind) -> Option<BinaryOp>,
    ) -> CompileResult<NodeId> {
        let mut left = operand(self)?;

        while let Some(op) = operator(&self.current.kind) {
            self.advance()?;
            let right = operand(self)?;

            let left_node = self.ast.node(left);
            let span = left_node.span.merge(self.ast.node(right).span);
            let position = left_node.position;
            left = self.ast.push(NodeKind::BinaryOp { op, left, right }, position, span);
        }

        Ok(left)
    }

    fn parse_logical_or_expression(&mut self) -> CompileResult<NodeId> {
        self.parse_binary_level(Self::parse_logical_and_expression, |kind| match kind {
            TokenKind::PipePipe => Some(BinaryOp::LogOr),
            _ => None,
        })
    }

    fn parse_logical_and_expression(&mut self) -> CompileResult<NodeId> {
        self.parse_binary_level(Self::parse_bitwise_or_expression, |kind| match kind {
            TokenKind::AmpAmp => Some(BinaryOp::LogAnd),
            _ => None,
        })
    }

    fn parse_bitwise_or_expression(&mut self) -> CompileResult<NodeId> {
        self.parse_binary_level(Self::parse_bitwise_and_expression, |kind| match kind {
            TokenKind::Pipe => Some(BinaryOp::BitOr),
            _ => None,
        })
    }

    fn parse_bitwise_and_expression(&mut self) -> CompileResult<NodeId> {
        self.parse_binary_level(Self::parse_equality_expression, |kind| match kind {
            TokenKind::Amp => Some(BinaryOp::BitAnd),
            _ => None,
        })
    }

    fn parse_equality_expression(&mut self) -> CompileResult<NodeId> {
        self.parse_binary_level(Self::parse_relational_expression, |kind| match kind {
            TokenKind::EqEq => Some(BinaryOp::Eq),
            TokenKind::NotEq => Some(BinaryOp::Ne),
            _ => None,
        })
    }

    fn parse_relational_expression(&mut self) -> CompileResult<NodeId> {
        self.parse_binary_level(Self::parse_additive_expression, |kind| match kind {
            TokenKind::Lt => Some(BinaryOp::Lt),
            TokenKind::Gt => Some(BinaryOp::Gt),
            TokenKind::LtEq => Some(BinaryOp::Le),
            TokenKind::GtEq => Some(BinaryOp::Ge),
            _ => None,
        })
    }

    fn parse_additive_expression(&mut self) -> CompileResult<NodeId> {
        self.parse_binary_level(Self::parse_multiplicative_expression, |kind| match kind {
            TokenKind::Plus => Some(BinaryOp::Add),
            TokenKind::Minus => Some(BinaryOp::Sub),
            _ => None,
        })
    }

    fn parse_multiplicative_expression(&mut self) -> CompileResult<NodeId> {
        self.parse_binary_level(Self::parse_group_expression, |kind| match kind {
            TokenKind::Star => Some(BinaryOp::Mul),
            TokenKind::Slash => Some(BinaryOp::Div),
            TokenKind::Percent => Some(BinaryOp::Mod),
            _ => None,
        })
    }

    /// Literal, call, identifier or parenthesized expression
    fn parse_group_expression(&mut self) -> CompileResult<NodeId> {
        let start = self.current.span;

        match &self.current.kind {
            kind if kind.is_literal() => {
                let text = kind.literal_text().unwrap_or_default().to_string();
                self.advance()?;
                Ok(self.finish(NodeKind::Literal(text), start))
            }
            TokenKind::Plus | TokenKind::Minus => self.parse_signed_number(),
            TokenKind::Identifier(_) => {
                let name = self.parse_ident()?;
                if self.check(&TokenKind::LParen) {
                    self.parse_call(start, name)
                } else {
                    Ok(name)
                }
            }
            TokenKind::LParen => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// A sign directly followed by a number is part of the literal
    fn parse_signed_number(&mut self) -> CompileResult<NodeId> {
        let sign = self.current.clone();
        let digits = match self.peek()? {
            Token {
                kind: TokenKind::Number(digits),
                span,
            } if span.start == sign.span.end => digits.clone(),
            _ => return Err(self.unexpected("expression")),
        };

        let sign_text = if matches!(sign.kind, TokenKind::Minus) { "-" } else { "+" };
        self.advance()?;
        self.advance()?;
        Ok(self.finish(NodeKind::Literal(format!("{sign_text}{digits}")), sign.span))
    }

    fn parse_call(&mut self, start: Span, func: NodeId) -> CompileResult<NodeId> {
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(&TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        Ok(self.finish(NodeKind::Call { func, args }, start))
    }
}
