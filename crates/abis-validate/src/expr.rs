//! Restricted boolean formulas for row constraints.
//!
//! The language has `or`, `and`, `not`, the comparisons `== != < <= > >=`,
//! membership `in` / `not in`, list literals, numbers, quoted strings,
//! `true`, `false`, `null`, names and parentheses. Nothing else is
//! evaluated: there are no calls, attribute lookups or assignments.
//!
//! Names that resolve to nothing evaluate to null. Ordering comparisons
//! involving null or values of different types are false.
//!
//! The right-hand side of `in` must be a list literal or a name. Literal
//! strings, numbers and keywords are rejected when the formula is parsed;
//! there is no substring membership, and a name that resolves to anything
//! other than a list contains nothing.
//!
//! Nesting of parentheses, lists and `not` is limited to [`MAX_DEPTH`]
//! levels and formulas to [`MAX_TOKENS`] tokens.

use std::cmp::Ordering;

use abis_model::Value;
use serde_json::Value as JsonValue;

use crate::error::ExprError;

pub const MAX_DEPTH: usize = 64;
pub const MAX_TOKENS: usize = 4096;

/// Runtime value of a formula term.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<ExprValue>),
}

impl ExprValue {
    pub fn is_truthy(&self) -> bool {
        match self {
            ExprValue::Null => false,
            ExprValue::Bool(value) => *value,
            ExprValue::Number(value) => *value != 0.0,
            ExprValue::String(text) => !text.is_empty(),
            ExprValue::List(items) => !items.is_empty(),
        }
    }

    /// Objects have no formula representation and become null.
    pub fn from_json(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null | JsonValue::Object(_) => ExprValue::Null,
            JsonValue::Bool(value) => ExprValue::Bool(*value),
            JsonValue::Number(number) => number.as_f64().map_or(ExprValue::Null, ExprValue::Number),
            JsonValue::String(text) => ExprValue::String(text.clone()),
            JsonValue::Array(items) => ExprValue::List(items.iter().map(Self::from_json).collect()),
        }
    }

    /// Temporal and geometry cells are compared by their canonical text.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => ExprValue::Null,
            Value::Boolean(value) => ExprValue::Bool(*value),
            Value::Integer(value) => ExprValue::Number(*value as f64),
            Value::Number(value) => ExprValue::Number(*value),
            Value::String(text) => ExprValue::String(text.clone()),
            Value::List(items) => {
                ExprValue::List(items.iter().cloned().map(ExprValue::String).collect())
            }
            other @ (Value::Timestamp(_) | Value::Geometry(_)) => {
                ExprValue::String(other.to_string())
            }
        }
    }

    fn ordering(&self, other: &ExprValue) -> Option<Ordering> {
        match (self, other) {
            (ExprValue::Number(left), ExprValue::Number(right)) => left.partial_cmp(right),
            (ExprValue::String(left), ExprValue::String(right)) => Some(left.cmp(right)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CompareOp {
    fn apply(self, left: &ExprValue, right: &ExprValue) -> bool {
        match self {
            CompareOp::Eq => left == right,
            CompareOp::Ne => left != right,
            CompareOp::Lt => left.ordering(right) == Some(Ordering::Less),
            CompareOp::Le => matches!(left.ordering(right), Some(Ordering::Less | Ordering::Equal)),
            CompareOp::Gt => left.ordering(right) == Some(Ordering::Greater),
            CompareOp::Ge => matches!(
                left.ordering(right),
                Some(Ordering::Greater | Ordering::Equal)
            ),
        }
    }
}

/// Parsed formula.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(ExprValue),
    Name(String),
    List(Vec<Expr>),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Compare(CompareOp, Box<Expr>, Box<Expr>),
    In {
        item: Box<Expr>,
        collection: Box<Expr>,
        negated: bool,
    },
}

impl Expr {
    pub fn parse(source: &str) -> Result<Self, ExprError> {
        let tokens = tokenize(source)?;
        if tokens.is_empty() {
            return Err(ExprError::new(0, "the formula is empty"));
        }
        if let Some((position, _)) = tokens.get(MAX_TOKENS) {
            return Err(ExprError::new(*position, "formula is too long"));
        }
        let mut parser = Parser {
            tokens,
            pos: 0,
            end: source.len(),
            depth: 0,
        };
        let expr = parser.parse_or()?;
        if parser.pos < parser.tokens.len() {
            return Err(ExprError::new(parser.position(), "unexpected trailing input"));
        }
        Ok(expr)
    }

    /// Evaluate against a name resolver.
    pub fn evaluate<F>(&self, resolve: &F) -> ExprValue
    where
        F: Fn(&str) -> ExprValue,
    {
        match self {
            Expr::Literal(value) => value.clone(),
            Expr::Name(name) => resolve(name),
            Expr::List(items) => {
                ExprValue::List(items.iter().map(|item| item.evaluate(resolve)).collect())
            }
            Expr::Not(inner) => ExprValue::Bool(!inner.evaluate(resolve).is_truthy()),
            Expr::And(left, right) => ExprValue::Bool(
                left.evaluate(resolve).is_truthy() && right.evaluate(resolve).is_truthy(),
            ),
            Expr::Or(left, right) => ExprValue::Bool(
                left.evaluate(resolve).is_truthy() || right.evaluate(resolve).is_truthy(),
            ),
            Expr::Compare(op, left, right) => {
                ExprValue::Bool(op.apply(&left.evaluate(resolve), &right.evaluate(resolve)))
            }
            Expr::In {
                item,
                collection,
                negated,
            } => {
                let item = item.evaluate(resolve);
                let found = match collection.evaluate(resolve) {
                    ExprValue::List(items) => items.contains(&item),
                    _ => false,
                };
                ExprValue::Bool(found != *negated)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Str(String),
    Ident(String),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Minus,
    Op(CompareOp),
}

fn tokenize(source: &str) -> Result<Vec<(usize, Token)>, ExprError> {
    let chars: Vec<(usize, char)> = source.char_indices().collect();
    let next_is = |idx: usize, expected: char| chars.get(idx + 1).is_some_and(|(_, ch)| *ch == expected);
    let mut tokens = Vec::new();
    let mut idx = 0;

    while let Some(&(position, ch)) = chars.get(idx) {
        let token = match ch {
            ch if ch.is_whitespace() => {
                idx += 1;
                continue;
            }
            '(' => Token::LParen,
            ')' => Token::RParen,
            '[' => Token::LBracket,
            ']' => Token::RBracket,
            ',' => Token::Comma,
            '-' => Token::Minus,
            '=' | '!' if next_is(idx, '=') => {
                idx += 1;
                Token::Op(if ch == '=' { CompareOp::Eq } else { CompareOp::Ne })
            }
            '=' => return Err(ExprError::new(position, "expected '=='")),
            '!' => return Err(ExprError::new(position, "expected '!='")),
            '<' | '>' => {
                let inclusive = next_is(idx, '=');
                if inclusive {
                    idx += 1;
                }
                Token::Op(match (ch, inclusive) {
                    ('<', false) => CompareOp::Lt,
                    ('<', true) => CompareOp::Le,
                    (_, false) => CompareOp::Gt,
                    (_, true) => CompareOp::Ge,
                })
            }
            '\'' | '"' => {
                let mut text = String::new();
                let mut closed = false;
                idx += 1;
                while let Some(&(_, inner)) = chars.get(idx) {
                    match inner {
                        '\\' => {
                            idx += 1;
                            if let Some(&(_, escaped)) = chars.get(idx) {
                                text.push(escaped);
                            }
                        }
                        quote if quote == ch => {
                            closed = true;
                            break;
                        }
                        other => text.push(other),
                    }
                    idx += 1;
                }
                if !closed {
                    return Err(ExprError::new(position, "unterminated string"));
                }
                Token::Str(text)
            }
            ch if ch.is_ascii_digit() || (ch == '.' && chars.get(idx + 1).is_some_and(|(_, d)| d.is_ascii_digit())) => {
                let start = idx;
                while chars
                    .get(idx + 1)
                    .is_some_and(|(_, d)| d.is_ascii_digit() || *d == '.')
                {
                    idx += 1;
                }
                let text: String = chars[start..=idx].iter().map(|(_, ch)| ch).collect();
                let value = text
                    .parse::<f64>()
                    .map_err(|_| ExprError::new(position, format!("invalid number \"{text}\"")))?;
                Token::Number(value)
            }
            ch if ch.is_alphabetic() || ch == '_' => {
                let start = idx;
                while chars
                    .get(idx + 1)
                    .is_some_and(|(_, c)| c.is_alphanumeric() || *c == '_')
                {
                    idx += 1;
                }
                Token::Ident(chars[start..=idx].iter().map(|(_, ch)| ch).collect())
            }
            other => {
                return Err(ExprError::new(
                    position,
                    format!("unexpected character '{other}'"),
                ));
            }
        };
        tokens.push((position, token));
        idx += 1;
    }
    Ok(tokens)
}

struct Parser {
    tokens: Vec<(usize, Token)>,
    pos: usize,
    end: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(_, token)| token)
    }

    fn position(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |(position, _)| *position)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).map(|(_, token)| token.clone());
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn is_keyword_at(&self, offset: usize, keyword: &str) -> bool {
        matches!(self.tokens.get(self.pos + offset), Some((_, Token::Ident(name))) if name == keyword)
    }

    fn is_keyword(&self, keyword: &str) -> bool {
        self.is_keyword_at(0, keyword)
    }

    /// Run `parse` one nesting level deeper.
    fn nested<T>(
        &mut self,
        position: usize,
        parse: impl FnOnce(&mut Self) -> Result<T, ExprError>,
    ) -> Result<T, ExprError> {
        if self.depth == MAX_DEPTH {
            return Err(ExprError::new(position, "formula is nested too deeply"));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    fn parse_or(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.parse_and()?;
        while self.is_keyword("or") {
            self.pos += 1;
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ExprError> {
        let mut left = self.parse_not()?;
        while self.is_keyword("and") {
            self.pos += 1;
            let right = self.parse_not()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_not(&mut self) -> Result<Expr, ExprError> {
        if self.is_keyword("not") {
            let position = self.position();
            self.pos += 1;
            let inner = self.nested(position, Self::parse_not)?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Expr, ExprError> {
        let left = self.parse_primary()?;
        if let Some(Token::Op(op)) = self.peek() {
            let op = *op;
            self.pos += 1;
            let right = self.parse_primary()?;
            return Ok(Expr::Compare(op, Box::new(left), Box::new(right)));
        }
        let negated = if self.is_keyword("in") {
            self.pos += 1;
            false
        } else if self.is_keyword("not") && self.is_keyword_at(1, "in") {
            self.pos += 2;
            true
        } else {
            return Ok(left);
        };
        let position = self.position();
        let collection = self.parse_primary()?;
        if matches!(collection, Expr::Literal(_)) {
            return Err(ExprError::new(
                position,
                "'in' needs a list or a name on its right-hand side",
            ));
        }
        Ok(Expr::In {
            item: Box::new(left),
            collection: Box::new(collection),
            negated,
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, ExprError> {
        let position = self.position();
        match self.advance() {
            Some(Token::Number(value)) => Ok(Expr::Literal(ExprValue::Number(value))),
            Some(Token::Minus) => match self.advance() {
                Some(Token::Number(value)) => Ok(Expr::Literal(ExprValue::Number(-value))),
                _ => Err(ExprError::new(position, "expected a number after '-'")),
            },
            Some(Token::Str(text)) => Ok(Expr::Literal(ExprValue::String(text))),
            Some(Token::Ident(name)) => match name.as_str() {
                "true" => Ok(Expr::Literal(ExprValue::Bool(true))),
                "false" => Ok(Expr::Literal(ExprValue::Bool(false))),
                "null" => Ok(Expr::Literal(ExprValue::Null)),
                "and" | "or" | "not" | "in" => Err(ExprError::new(
                    position,
                    format!("unexpected keyword '{name}'"),
                )),
                _ => Ok(Expr::Name(name)),
            },
            Some(Token::LParen) => self.nested(position, |parser| {
                let inner = parser.parse_or()?;
                match parser.advance() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(ExprError::new(position, "unclosed '('")),
                }
            }),
            Some(Token::LBracket) => self.nested(position, |parser| parser.parse_list(position)),
            Some(_) => Err(ExprError::new(position, "unexpected token")),
            None => Err(ExprError::new(position, "unexpected end of formula")),
        }
    }

    fn parse_list(&mut self, position: usize) -> Result<Expr, ExprError> {
        let mut items = Vec::new();
        if self.peek() == Some(&Token::RBracket) {
            self.pos += 1;
            return Ok(Expr::List(items));
        }
        loop {
            items.push(self.parse_or()?);
            match self.advance() {
                Some(Token::Comma) if self.peek() == Some(&Token::RBracket) => {
                    self.pos += 1;
                    break;
                }
                Some(Token::Comma) => {}
                Some(Token::RBracket) => break,
                _ => return Err(ExprError::new(position, "unclosed '['")),
            }
        }
        Ok(Expr::List(items))
    }
}
