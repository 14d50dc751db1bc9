//! Recursive-descent parser for the supported filter grammar.
//!
//! ```text
//! expr     := and-expr ("or" and-expr)*
//! and-expr := factor ("and" factor)*
//! factor   := "not" "(" expr ")" | "(" expr ")" | attr-expr
//! attr-expr:= attr-path "pr" | attr-path compare-op literal
//! literal  := string | number | "true" | "false" | "null"
//! ```
//!
//! Keywords and operators are matched case-insensitively, as the RFC
//! requires. String literals use JSON escaping.

use serde_json::Value;

use super::{AttrPath, CompareOp, FilterExpr};

/// Error produced when a filter expression cannot be parsed.
#[derive(Debug, thiserror::Error)]
#[error("{message} at offset {offset}")]
pub struct FilterParseError {
    /// What went wrong
    pub message: String,
    /// Byte offset into the filter text
    pub offset: usize,
}

impl FilterParseError {
    fn new(message: impl Into<String>, offset: usize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

/// Parse a filter expression into its syntax tree.
pub fn parse(input: &str) -> Result<FilterExpr, FilterParseError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.expr()?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(FilterParseError::new(
            format!("unexpected trailing input '{}'", token.text),
            token.offset,
        )),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum TokenKind {
    Word,
    Str(String),
    Number(f64),
    LParen,
    RParen,
}

#[derive(Debug, Clone)]
struct Token {
    kind: TokenKind,
    text: String,
    offset: usize,
}

fn tokenize(input: &str) -> Result<Vec<Token>, FilterParseError> {
    let mut tokens = Vec::new();
    let bytes = input.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i] as char;
        match c {
            ' ' | '\t' | '\r' | '\n' => i += 1,
            '(' => {
                tokens.push(Token {
                    kind: TokenKind::LParen,
                    text: "(".into(),
                    offset: i,
                });
                i += 1;
            }
            ')' => {
                tokens.push(Token {
                    kind: TokenKind::RParen,
                    text: ")".into(),
                    offset: i,
                });
                i += 1;
            }
            '[' | ']' => {
                return Err(FilterParseError::new(
                    "bracketed value paths are not supported",
                    i,
                ));
            }
            '"' => {
                let start = i;
                let mut end = i + 1;
                while end < bytes.len() {
                    match bytes[end] as char {
                        '\\' => end += 2,
                        '"' => break,
                        _ => end += 1,
                    }
                }
                if end >= bytes.len() {
                    return Err(FilterParseError::new("unterminated string literal", start));
                }
                let raw = &input[start..=end];
                let parsed: String = serde_json::from_str(raw).map_err(|_| {
                    FilterParseError::new("invalid string literal escape", start)
                })?;
                tokens.push(Token {
                    kind: TokenKind::Str(parsed),
                    text: raw.to_string(),
                    offset: start,
                });
                i = end + 1;
            }
            c if c.is_ascii_digit() || c == '-' => {
                let start = i;
                i += 1;
                while i < bytes.len()
                    && matches!(bytes[i] as char, '0'..='9' | '.' | 'e' | 'E' | '+' | '-')
                {
                    i += 1;
                }
                let raw = &input[start..i];
                let number: f64 = raw
                    .parse()
                    .map_err(|_| FilterParseError::new(format!("invalid number '{raw}'"), start))?;
                tokens.push(Token {
                    kind: TokenKind::Number(number),
                    text: raw.to_string(),
                    offset: start,
                });
            }
            c if is_path_char(c) => {
                let start = i;
                while i < bytes.len() && is_path_char(bytes[i] as char) {
                    i += 1;
                }
                tokens.push(Token {
                    kind: TokenKind::Word,
                    text: input[start..i].to_string(),
                    offset: start,
                });
            }
            other => {
                return Err(FilterParseError::new(
                    format!("unexpected character '{other}'"),
                    i,
                ));
            }
        }
    }

    Ok(tokens)
}

fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '$' | ':')
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn peek_word(&self, word: &str) -> bool {
        self.peek()
            .is_some_and(|t| t.kind == TokenKind::Word && t.text.eq_ignore_ascii_case(word))
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, FilterParseError> {
        match self.next() {
            Some(token) if token.kind == kind => Ok(token),
            Some(token) => Err(FilterParseError::new(
                format!("expected {what}, found '{}'", token.text),
                token.offset,
            )),
            None => Err(FilterParseError::new(
                format!("expected {what}, found end of input"),
                self.end_offset(),
            )),
        }
    }

    fn end_offset(&self) -> usize {
        self.tokens
            .last()
            .map(|t| t.offset + t.text.len())
            .unwrap_or(0)
    }

    fn expr(&mut self) -> Result<FilterExpr, FilterParseError> {
        let mut left = self.and_expr()?;
        while self.peek_word("or") {
            self.next();
            let right = self.and_expr()?;
            left = FilterExpr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<FilterExpr, FilterParseError> {
        let mut left = self.factor()?;
        while self.peek_word("and") {
            self.next();
            let right = self.factor()?;
            left = FilterExpr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn factor(&mut self) -> Result<FilterExpr, FilterParseError> {
        if self.peek_word("not") {
            self.next();
            self.expect(TokenKind::LParen, "'('")?;
            let inner = self.expr()?;
            self.expect(TokenKind::RParen, "')'")?;
            return Ok(FilterExpr::Not(Box::new(inner)));
        }
        if self.peek().is_some_and(|t| t.kind == TokenKind::LParen) {
            self.next();
            let inner = self.expr()?;
            self.expect(TokenKind::RParen, "')'")?;
            return Ok(inner);
        }
        self.attr_expr()
    }

    fn attr_expr(&mut self) -> Result<FilterExpr, FilterParseError> {
        let path_token = self.expect(TokenKind::Word, "attribute path")?;
        let path = AttrPath::parse(&path_token.text);

        let op_token = match self.next() {
            Some(token) if token.kind == TokenKind::Word => token,
            Some(token) => {
                return Err(FilterParseError::new(
                    format!("expected operator, found '{}'", token.text),
                    token.offset,
                ));
            }
            None => {
                return Err(FilterParseError::new(
                    "expected operator, found end of input",
                    self.end_offset(),
                ));
            }
        };

        if op_token.text.eq_ignore_ascii_case("pr") {
            return Ok(FilterExpr::Present(path));
        }

        let op = match op_token.text.to_ascii_lowercase().as_str() {
            "eq" => CompareOp::Eq,
            "ne" => CompareOp::Ne,
            "co" => CompareOp::Co,
            "sw" => CompareOp::Sw,
            "ew" => CompareOp::Ew,
            "gt" => CompareOp::Gt,
            "ge" => CompareOp::Ge,
            "lt" => CompareOp::Lt,
            "le" => CompareOp::Le,
            other => {
                return Err(FilterParseError::new(
                    format!("unknown operator '{other}'"),
                    op_token.offset,
                ));
            }
        };

        let value = self.literal()?;
        Ok(FilterExpr::Compare { path, op, value })
    }

    fn literal(&mut self) -> Result<Value, FilterParseError> {
        match self.next() {
            Some(token) => match token.kind {
                TokenKind::Str(s) => Ok(Value::String(s)),
                TokenKind::Number(n) => Ok(serde_json::Number::from_f64(n)
                    .map(Value::Number)
                    .unwrap_or(Value::Null)),
                TokenKind::Word if token.text.eq_ignore_ascii_case("true") => {
                    Ok(Value::Bool(true))
                }
                TokenKind::Word if token.text.eq_ignore_ascii_case("false") => {
                    Ok(Value::Bool(false))
                }
                TokenKind::Word if token.text.eq_ignore_ascii_case("null") => Ok(Value::Null),
                _ => Err(FilterParseError::new(
                    format!("expected literal, found '{}'", token.text),
                    token.offset,
                )),
            },
            None => Err(FilterParseError::new(
                "expected literal, found end of input",
                self.end_offset(),
            )),
        }
    }
}
