//! Lexer implementation using logos

use super::token::{Token, TokenKind};
use crate::common::{CompileError, CompileResult, Span};
use logos::Logos;

/// Lexer over one source text
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    peeked: Option<Token>,
    at_eof: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source code
    pub fn new(source: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(source),
            peeked: None,
            at_eof: false,
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> CompileResult<Token> {
        if let Some(token) = self.peeked.take() {
            return Ok(token);
        }

        if self.at_eof {
            let len = self.inner.source().len();
            return Ok(Token::new(TokenKind::Eof, Span::new(len, len)));
        }

        match self.inner.next() {
            Some(Ok(kind)) => {
                let span = self.inner.span();
                Ok(Token::new(kind, Span::new(span.start, span.end)))
            }
            Some(Err(())) => {
                let span = self.inner.span();
                Err(CompileError::lexer(
                    format!("unexpected character '{}'", self.inner.slice()),
                    Span::new(span.start, span.end),
                ))
            }
            None => {
                self.at_eof = true;
                let len = self.inner.source().len();
                Ok(Token::new(TokenKind::Eof, Span::new(len, len)))
            }
        }
    }

    /// Peek at the next token without consuming it
    pub fn peek(&mut self) -> CompileResult<&Token> {
        let token = match self.peeked.take() {
            Some(token) => token,
            None => self.next_token()?,
        };
        Ok(self.peeked.insert(token))
    }

    /// Tokenize the entire source and return all tokens
    pub fn tokenize_all(mut self) -> CompileResult<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    /// Get the source being lexed
    pub fn source(&self) -> &'a str {
        self.inner.source()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords() {
        let source = "if else for return true false";
        let mut lexer = Lexer::new(source);

        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::If));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Else));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::For));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Return));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::True));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::False));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Eof));
    }

    #[test]
    fn test_type_names_are_identifiers() {
        let source = "int double string bool void";
        let tokens = Lexer::new(source).tokenize_all().unwrap();

        assert!(matches!(&tokens[0].kind, TokenKind::Identifier(s) if s == "int"));
        assert!(matches!(&tokens[2].kind, TokenKind::Identifier(s) if s == "string"));
        assert!(matches!(&tokens[4].kind, TokenKind::Identifier(s) if s == "void"));
    }

    #[test]
    fn test_identifiers() {
        let source = "foo bar_baz _test test123 iffy trueish";
        let mut lexer = Lexer::new(source);

        for expected in ["foo", "bar_baz", "_test", "test123", "iffy", "trueish"] {
            assert!(matches!(
                lexer.next_token().unwrap().kind,
                TokenKind::Identifier(s) if s == expected
            ));
        }
    }

    #[test]
    fn test_numeric_literals() {
        let source = "42 7.5 5. 1e10 2.5E-3";
        let mut lexer = Lexer::new(source);

        for expected in ["42", "7.5", "5.", "1e10", "2.5E-3"] {
            assert!(matches!(
                lexer.next_token().unwrap().kind,
                TokenKind::Number(s) if s == expected
            ));
        }
    }

    #[test]
    fn test_operators() {
        let source = "+ - * / % == != < > <= >= && || & | =";
        let mut lexer = Lexer::new(source);

        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Plus));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Minus));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Star));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Slash));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Percent));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::EqEq));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::NotEq));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Lt));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Gt));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::LtEq));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::GtEq));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::AmpAmp));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::PipePipe));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Amp));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Pipe));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Eq));
    }

    #[test]
    fn test_string_literal_keeps_escapes() {
        let source = r#""hello \"world\"\n""#;
        let mut lexer = Lexer::new(source);

        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::StringLiteral(s) if s == r#""hello \"world\"\n""#
        ));
    }

    #[test]
    fn test_comments() {
        let source = "int // line comment\nx /* block\n comment */ y";
        let mut lexer = Lexer::new(source);

        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "int"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "x"
        ));
        assert!(matches!(
            lexer.next_token().unwrap().kind,
            TokenKind::Identifier(s) if s == "y"
        ));
    }

    #[test]
    fn test_peek_does_not_consume() {
        let mut lexer = Lexer::new("a b");
        assert!(matches!(&lexer.peek().unwrap().kind, TokenKind::Identifier(s) if s == "a"));
        assert!(matches!(&lexer.peek().unwrap().kind, TokenKind::Identifier(s) if s == "a"));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Identifier(s) if s == "a"));
        assert!(matches!(lexer.next_token().unwrap().kind, TokenKind::Identifier(s) if s == "b"));
    }

    #[test]
    fn test_spans() {
        let tokens = Lexer::new("int  sum(").tokenize_all().unwrap();
        assert_eq!(tokens[0].span, Span::new(0, 3));
        assert_eq!(tokens[1].span, Span::new(5, 8));
        assert_eq!(tokens[2].span, Span::new(8, 9));
        assert_eq!(tokens[3].span, Span::new(9, 9));
    }

    #[test]
    fn test_unexpected_character() {
        let mut lexer = Lexer::new("a # b");
        lexer.next_token().unwrap();
        let err = lexer.next_token().unwrap_err();
        assert!(matches!(err, CompileError::Lexer { span, .. } if span.start == 2));
    }
}
