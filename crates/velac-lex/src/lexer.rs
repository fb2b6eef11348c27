//! Lexer: turns a source buffer into a stream of [`Token`]s.
//!
//! Follows `examples/original_source/src/lexer.c`'s algorithm: interleave
//! whitespace/`#`-comment skipping, longest-match each token kind, and
//! fall back to slurping a run of non-whitespace bytes as a single
//! `GARBAGE` token (with a warning) when nothing else matches.

use velac_util::{Handler, Span};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// Converts a whole source buffer into tokens, reporting lexical warnings
/// to `handler` as it goes. Per `spec.md` §7, lexical errors
/// (`GARBAGE_TOKEN`) are warnings, not fatal — lexing always completes and
/// produces a final `Eof` token.
pub struct Lexer<'a, 'h> {
    cursor: Cursor<'a>,
    handler: &'h Handler,
}

impl<'a, 'h> Lexer<'a, 'h> {
    pub fn new(source: &'a str, handler: &'h Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
        }
    }

    /// Lexes the entire source buffer into tokens, ending with exactly one
    /// `Eof` token.
    pub fn tokenize(mut self) -> Vec<Token<'a>> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = matches!(token.kind, TokenKind::Eof);
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            while !self.cursor.is_at_end() && self.cursor.current().is_ascii_whitespace() {
                self.cursor.advance();
            }
            if self.cursor.current() == b'#' {
                while !self.cursor.is_at_end() && self.cursor.current() != b'\n' {
                    self.cursor.advance();
                }
                continue;
            }
            break;
        }
    }

    fn next_token(&mut self) -> Token<'a> {
        self.skip_whitespace_and_comments();

        let start = self.cursor.position();
        let (line, column) = (self.cursor.line(), self.cursor.column());

        if self.cursor.is_at_end() {
            let span = Span::new(start, start, line, column);
            return Token::new(TokenKind::Eof, "", span);
        }

        let make = |cursor: &Cursor<'a>, kind: TokenKind<'a>| {
            let lexeme = cursor.slice_from(start);
            let span = Span::new(start, cursor.position(), line, column);
            Token::new(kind, lexeme, span)
        };

        match self.cursor.current() {
            b'(' => {
                self.cursor.advance();
                make(&self.cursor, TokenKind::LParen)
            }
            b')' => {
                self.cursor.advance();
                make(&self.cursor, TokenKind::RParen)
            }
            b'{' => {
                self.cursor.advance();
                make(&self.cursor, TokenKind::LBrace)
            }
            b'}' => {
                self.cursor.advance();
                make(&self.cursor, TokenKind::RBrace)
            }
            b':' => {
                self.cursor.advance();
                make(&self.cursor, TokenKind::Colon)
            }
            b',' => {
                self.cursor.advance();
                make(&self.cursor, TokenKind::Comma)
            }
            b';' => {
                self.cursor.advance();
                make(&self.cursor, TokenKind::Semicolon)
            }
            b'+' => {
                self.cursor.advance();
                make(&self.cursor, TokenKind::Plus)
            }
            b'-' => {
                self.cursor.advance();
                make(&self.cursor, TokenKind::Minus)
            }
            b'*' => {
                self.cursor.advance();
                make(&self.cursor, TokenKind::Star)
            }
            b'/' => {
                self.cursor.advance();
                make(&self.cursor, TokenKind::Slash)
            }
            b'=' => {
                self.cursor.advance();
                if self.cursor.current() == b'=' {
                    self.cursor.advance();
                    make(&self.cursor, TokenKind::EqualEqual)
                } else {
                    make(&self.cursor, TokenKind::Equal)
                }
            }
            b'!' => {
                self.cursor.advance();
                if self.cursor.current() == b'=' {
                    self.cursor.advance();
                    make(&self.cursor, TokenKind::BangEqual)
                } else {
                    make(&self.cursor, TokenKind::Bang)
                }
            }
            b'<' => {
                self.cursor.advance();
                if self.cursor.current() == b'=' {
                    self.cursor.advance();
                    make(&self.cursor, TokenKind::LessEqual)
                } else {
                    make(&self.cursor, TokenKind::Less)
                }
            }
            b'>' => {
                self.cursor.advance();
                if self.cursor.current() == b'=' {
                    self.cursor.advance();
                    make(&self.cursor, TokenKind::GreaterEqual)
                } else {
                    make(&self.cursor, TokenKind::Greater)
                }
            }
            b'0'..=b'9' => self.lex_number(start, line, column),
            b'a'..=b'z' | b'A'..=b'Z' | b'_' => self.lex_identifier(start, line, column),
            _ => self.lex_garbage(start, line, column),
        }
    }

    fn lex_number(&mut self, start: usize, line: u32, column: u32) -> Token<'a> {
        while !self.cursor.is_at_end() && self.cursor.current().is_ascii_digit() {
            self.cursor.advance();
        }

        if self.cursor.current() == b'.' {
            self.cursor.advance();
            let mantissa_start = self.cursor.position();
            while !self.cursor.is_at_end() && self.cursor.current().is_ascii_digit() {
                self.cursor.advance();
            }

            let lexeme = self.cursor.slice_from(start);
            let span = Span::new(start, self.cursor.position(), line, column);

            if self.cursor.position() == mantissa_start {
                self.handler.warning(
                    "invalid floating point will result to garbage token",
                    span,
                );
                return Token::new(TokenKind::Garbage, lexeme, span);
            }

            let value: f64 = lexeme.parse().expect("validated float lexeme");
            return Token::new(TokenKind::FloatLiteral(value), lexeme, span);
        }

        let lexeme = self.cursor.slice_from(start);
        let span = Span::new(start, self.cursor.position(), line, column);
        let value: i64 = lexeme.parse().expect("validated integer lexeme");
        Token::new(TokenKind::IntLiteral(value), lexeme, span)
    }

    fn lex_identifier(&mut self, start: usize, line: u32, column: u32) -> Token<'a> {
        while !self.cursor.is_at_end()
            && (self.cursor.current().is_ascii_alphanumeric() || self.cursor.current() == b'_')
        {
            self.cursor.advance();
        }

        let lexeme = self.cursor.slice_from(start);
        let span = Span::new(start, self.cursor.position(), line, column);
        let kind = TokenKind::keyword(lexeme).unwrap_or(TokenKind::Identifier(lexeme));
        Token::new(kind, lexeme, span)
    }

    fn lex_garbage(&mut self, start: usize, line: u32, column: u32) -> Token<'a> {
        while !self.cursor.is_at_end() && !self.cursor.current().is_ascii_whitespace() {
            self.cursor.advance();
        }

        let lexeme = self.cursor.slice_from(start);
        let span = Span::new(start, self.cursor.position(), line, column);
        self.handler
            .warning(format!("garbage token: {lexeme}"), span);
        Token::new(TokenKind::Garbage, lexeme, span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind<'_>> {
        let handler = Handler::new();
        Lexer::new(source, &handler)
            .tokenize()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn lexes_keywords_and_punctuation() {
        let kinds = kinds("def f(): int { return 1; }");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Def,
                TokenKind::Identifier("f"),
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::Colon,
                TokenKind::Identifier("int"),
                TokenKind::LBrace,
                TokenKind::Return,
                TokenKind::IntLiteral(1),
                TokenKind::Semicolon,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn lexes_comments_and_extended_relational_operators() {
        let kinds = kinds("# a comment\nlet x = 1 <= 2 and 3 >= 1;");
        assert!(kinds.contains(&TokenKind::LessEqual));
        assert!(kinds.contains(&TokenKind::GreaterEqual));
        assert!(kinds.contains(&TokenKind::And));
    }

    #[test]
    fn lexes_float_literal() {
        let kinds = kinds("3.14");
        assert_eq!(kinds, vec![TokenKind::FloatLiteral(3.14), TokenKind::Eof]);
    }

    #[test]
    fn malformed_float_becomes_garbage_with_warning() {
        let handler = Handler::new();
        let tokens = Lexer::new("123.", &handler).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Garbage);
        assert_eq!(tokens[0].lexeme, "123.");
        assert!(!handler.has_errors());
        assert_eq!(handler.diagnostics().len(), 1);
    }

    #[test]
    fn unrecognized_run_becomes_single_garbage_token() {
        let handler = Handler::new();
        let tokens = Lexer::new("@@@ let", &handler).tokenize();
        assert_eq!(tokens[0].kind, TokenKind::Garbage);
        assert_eq!(tokens[0].lexeme, "@@@");
        assert_eq!(tokens[1].kind, TokenKind::Let);
    }

    #[test]
    fn tracks_line_and_column_across_newlines() {
        let handler = Handler::new();
        let tokens = Lexer::new("let\nlet", &handler).tokenize();
        assert_eq!((tokens[0].span.line, tokens[0].span.column), (1, 1));
        assert_eq!((tokens[1].span.line, tokens[1].span.column), (2, 1));
    }
}
