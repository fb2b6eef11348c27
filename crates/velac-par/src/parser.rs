//! Recursive-descent parser.
//!
//! Grounded on `examples/original_source/src/parser.c`'s shape (`current`/
//! `expect`/`advance`/`match` helpers, one rule per grammar production) and
//! `spec.md` §4.2/§6 for the exact precedence ladder and grammar.

use velac_lex::{Token, TokenKind};
use velac_util::{Handler, Span};

use crate::ast::{Ast, BinaryOp, Expression, FunctionDefinition, FunctionSignature, Parameter, Primary, Statement};
use crate::error::SyntaxError;

pub struct Parser<'src> {
    tokens: Vec<Token<'src>>,
    pos: usize,
    handler: &'src Handler,
}

type ParseResult<T> = Result<T, SyntaxError>;

impl<'src> Parser<'src> {
    pub fn new(tokens: Vec<Token<'src>>, handler: &'src Handler) -> Self {
        Self { tokens, pos: 0, handler }
    }

    /// Parses a whole source file: `function_definition*`.
    pub fn parse_program(&mut self) -> ParseResult<Ast<'src>> {
        let mut functions = Vec::new();
        while !self.is_eof() {
            functions.push(self.parse_function_definition()?);
        }
        Ok(Ast { functions })
    }

    fn current(&self) -> Token<'src> {
        self.tokens[self.pos]
    }

    fn is_eof(&self) -> bool {
        matches!(self.current().kind, TokenKind::Eof)
    }

    fn check(&self, kind: &TokenKind<'src>) -> bool {
        std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind)
    }

    fn advance(&mut self) {
        if !self.is_eof() {
            self.pos += 1;
        }
    }

    fn fail(&self, message: impl Into<String>) -> SyntaxError {
        self.handler.error(message, self.current().span);
        SyntaxError
    }

    /// Consumes the current token if it matches `kind`'s discriminant,
    /// otherwise reports `(L:C) ERROR: expected X but got Y` and returns
    /// `Err`, the Rust-idiomatic replacement for the original `match()`'s
    /// direct `exit(EXIT_FAILURE)`.
    fn expect(&mut self, kind: TokenKind<'src>) -> ParseResult<Token<'src>> {
        if self.check(&kind) {
            let token = self.current();
            self.advance();
            Ok(token)
        } else {
            let current = self.current();
            Err(self.fail(format!(
                "expected {} but got '{}'",
                kind.describe(),
                current.lexeme
            )))
        }
    }

    fn expect_identifier(&mut self) -> ParseResult<(&'src str, Span)> {
        let token = self.current();
        match token.kind {
            TokenKind::Identifier(name) => {
                self.advance();
                Ok((name, token.span))
            }
            _ => Err(self.fail(format!(
                "expected an identifier but got '{}'",
                token.lexeme
            ))),
        }
    }

    // ---- expressions -------------------------------------------------

    pub fn parse_expression(&mut self) -> ParseResult<Expression<'src>> {
        self.parse_higher_boolean()
    }

    fn parse_higher_boolean(&mut self) -> ParseResult<Expression<'src>> {
        let span = self.current().span;
        let mut lhs = self.parse_lower_boolean()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Or => BinaryOp::Or,
                TokenKind::And => BinaryOp::And,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_lower_boolean()?;
            lhs = Expression::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs), span };
        }
        Ok(lhs)
    }

    fn parse_lower_boolean(&mut self) -> ParseResult<Expression<'src>> {
        let span = self.current().span;
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Less => BinaryOp::Less,
                TokenKind::Greater => BinaryOp::Greater,
                TokenKind::LessEqual => BinaryOp::LessEqual,
                TokenKind::GreaterEqual => BinaryOp::GreaterEqual,
                TokenKind::EqualEqual => BinaryOp::Equal,
                TokenKind::BangEqual => BinaryOp::NotEqual,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_term()?;
            lhs = Expression::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs), span };
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> ParseResult<Expression<'src>> {
        let span = self.current().span;
        let mut lhs = self.parse_factor()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_factor()?;
            lhs = Expression::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs), span };
        }
        Ok(lhs)
    }

    fn parse_factor(&mut self) -> ParseResult<Expression<'src>> {
        let span = self.current().span;
        let mut lhs = self.parse_primary()?;
        loop {
            let op = match self.current().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                _ => break,
            };
            self.advance();
            let rhs = self.parse_primary()?;
            lhs = Expression::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs), span };
        }
        Ok(lhs)
    }

    fn parse_primary(&mut self) -> ParseResult<Expression<'src>> {
        let token = self.current();
        match token.kind {
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::Identifier(name) => {
                self.advance();
                if self.check(&TokenKind::LParen) {
                    self.advance();
                    let mut arguments = Vec::new();
                    let mut first = true;
                    while !self.is_eof() && !self.check(&TokenKind::RParen) {
                        if !first {
                            self.expect(TokenKind::Comma)?;
                        }
                        arguments.push(self.parse_expression()?);
                        first = false;
                    }
                    self.expect(TokenKind::RParen)?;
                    Ok(Expression::Primary(Primary::Funcall { name, arguments }, token.span))
                } else {
                    Ok(Expression::Primary(Primary::Identifier(name), token.span))
                }
            }
            TokenKind::IntLiteral(value) => {
                self.advance();
                Ok(Expression::Primary(Primary::Integer(value), token.span))
            }
            TokenKind::FloatLiteral(value) => {
                self.advance();
                Ok(Expression::Primary(Primary::Floating(value), token.span))
            }
            TokenKind::True => {
                self.advance();
                Ok(Expression::Primary(Primary::Boolean(true), token.span))
            }
            TokenKind::False => {
                self.advance();
                Ok(Expression::Primary(Primary::Boolean(false), token.span))
            }
            _ => Err(self.fail("expected expression")),
        }
    }

    // ---- statements ----------------------------------------------------

    fn parse_block(&mut self) -> ParseResult<(Vec<Statement<'src>>, Span)> {
        let open = self.expect(TokenKind::LBrace)?;
        let mut statements = Vec::new();
        while !self.is_eof() && !self.check(&TokenKind::RBrace) {
            statements.push(self.parse_statement()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok((statements, open.span))
    }

    fn parse_let_assignment(&mut self) -> ParseResult<Statement<'src>> {
        let span = self.current().span;
        self.expect(TokenKind::Let)?;
        let (name, _) = self.expect_identifier()?;
        self.expect(TokenKind::Equal)?;
        let expr = self.parse_expression()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Statement::LetAssignment { name, expr, span })
    }

    fn parse_return(&mut self) -> ParseResult<Statement<'src>> {
        let span = self.current().span;
        self.expect(TokenKind::Return)?;
        if self.check(&TokenKind::Semicolon) {
            self.advance();
            return Ok(Statement::Return { expr: None, span });
        }
        let expr = self.parse_expression()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Statement::Return { expr: Some(expr), span })
    }

    fn parse_statement(&mut self) -> ParseResult<Statement<'src>> {
        let span = self.current().span;
        match self.current().kind {
            TokenKind::LBrace => {
                let (statements, _) = self.parse_block()?;
                Ok(Statement::Block(statements, span))
            }
            TokenKind::Let => self.parse_let_assignment(),
            TokenKind::Return => self.parse_return(),
            _ => Err(self.fail("expected statement")),
        }
    }

    // ---- functions -------------------------------------------------------

    fn parse_parameter(&mut self) -> ParseResult<Parameter<'src>> {
        let (name, span) = self.expect_identifier()?;
        self.expect(TokenKind::Colon)?;
        let (type_name, _) = self.expect_identifier()?;
        Ok(Parameter { name, type_name, span })
    }

    fn parse_function_signature(&mut self) -> ParseResult<FunctionSignature<'src>> {
        let span = self.current().span;
        self.expect(TokenKind::Def)?;
        let (name, _) = self.expect_identifier()?;
        self.expect(TokenKind::LParen)?;

        let mut parameters = Vec::new();
        let mut first = true;
        while !self.is_eof() && !self.check(&TokenKind::RParen) {
            if !first {
                self.expect(TokenKind::Comma)?;
            }
            parameters.push(self.parse_parameter()?);
            first = false;
        }
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Colon)?;
        let (return_type, _) = self.expect_identifier()?;

        Ok(FunctionSignature { name, parameters, return_type, span })
    }

    fn parse_function_definition(&mut self) -> ParseResult<FunctionDefinition<'src>> {
        let span = self.current().span;
        let signature = self.parse_function_signature()?;
        let (body, _) = self.parse_block()?;
        Ok(FunctionDefinition { signature, body, span })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use velac_lex::Lexer;

    fn parse(source: &str) -> Result<Ast<'_>, SyntaxError> {
        let handler = Box::leak(Box::new(Handler::new()));
        let tokens = Lexer::new(source, handler).tokenize();
        Parser::new(tokens, handler).parse_program()
    }

    #[test]
    fn parses_empty_function() {
        let ast = parse("def f(): void { }").unwrap();
        assert_eq!(ast.functions.len(), 1);
        assert_eq!(ast.functions[0].signature.name, "f");
        assert!(ast.functions[0].body.is_empty());
    }

    #[test]
    fn parses_parameters_and_return() {
        let ast = parse("def sum(a: int, b: int): int { return a + b; }").unwrap();
        let sig = &ast.functions[0].signature;
        assert_eq!(sig.parameters.len(), 2);
        assert_eq!(sig.return_type, "int");
    }

    #[test]
    fn precedence_multiplies_before_adding() {
        let ast = parse("def f(): int { return 1 + 2 * 3; } ").unwrap();
        let Statement::Return { expr: Some(expr), .. } = &ast.functions[0].body[0] else {
            panic!("expected return statement");
        };
        let Expression::Binary { op, rhs, .. } = expr else {
            panic!("expected binary expression");
        };
        assert_eq!(*op, BinaryOp::Add);
        assert!(matches!(**rhs, Expression::Binary { op: BinaryOp::Mul, .. }));
    }

    #[test]
    fn left_associative_chain() {
        let ast = parse("def f(): int { return 1 - 2 - 3; }").unwrap();
        let Statement::Return { expr: Some(Expression::Binary { op: BinaryOp::Sub, lhs, .. }), .. } =
            &ast.functions[0].body[0]
        else {
            panic!("expected subtraction");
        };
        assert!(matches!(**lhs, Expression::Binary { op: BinaryOp::Sub, .. }));
    }

    #[test]
    fn parses_funcall_with_arguments() {
        let ast = parse("def g(): int { return f(1, 2); }").unwrap();
        let Statement::Return { expr: Some(Expression::Primary(Primary::Funcall { name, arguments }, _)), .. } =
            &ast.functions[0].body[0]
        else {
            panic!("expected funcall");
        };
        assert_eq!(*name, "f");
        assert_eq!(arguments.len(), 2);
    }

    #[test]
    fn unexpected_token_is_a_syntax_error() {
        assert!(parse("def f(): void { let = 1; }").is_err());
    }
}
