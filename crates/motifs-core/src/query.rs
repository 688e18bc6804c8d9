//! Boolean query mini-language.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! or      := and (("OR" | "|" | ",") and)*
//! and     := unary (("AND" | "&" | "+")? unary)*
//! unary   := ("NOT" | "!" | "-") unary | primary
//! primary := WORD | "\"" PHRASE "\"" | "(" or ")"
//! ```
//!
//! Keywords are case-insensitive. Adjacent operands are AND-ed, so
//! `foo bar` means `foo AND bar`. A `-` only negates when it starts a token,
//! which keeps hyphenated identifiers such as `NKX2-1` intact.

use std::fmt;

use crate::defaults::MAX_QUERY_DEPTH;
use crate::error::{Error, Result};

/// Parsed boolean expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BoolExpr {
    Term(String),
    Not(Box<BoolExpr>),
    And(Vec<BoolExpr>),
    Or(Vec<BoolExpr>),
}

impl BoolExpr {
    /// Leaf values in pre-order.
    pub fn terms(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_terms(&mut out);
        out
    }

    fn collect_terms<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            BoolExpr::Term(t) => out.push(t),
            BoolExpr::Not(inner) => inner.collect_terms(out),
            BoolExpr::And(children) | BoolExpr::Or(children) => {
                for child in children {
                    child.collect_terms(out);
                }
            }
        }
    }

    /// Combine operands, flattening nested nodes of the same kind and
    /// collapsing a single operand to itself.
    fn and(children: Vec<BoolExpr>) -> BoolExpr {
        Self::flatten(children, true)
    }

    fn or(children: Vec<BoolExpr>) -> BoolExpr {
        Self::flatten(children, false)
    }

    fn flatten(children: Vec<BoolExpr>, is_and: bool) -> BoolExpr {
        let mut flat = Vec::with_capacity(children.len());
        for child in children {
            match (child, is_and) {
                (BoolExpr::And(inner), true) | (BoolExpr::Or(inner), false) => flat.extend(inner),
                (other, _) => flat.push(other),
            }
        }

        if flat.len() == 1 {
            return flat.remove(0);
        }
        if is_and {
            BoolExpr::And(flat)
        } else {
            BoolExpr::Or(flat)
        }
    }
}

/// Canonical rendering: upper-case operators, parentheses only where
/// precedence needs them, quotes around terms that would not re-parse as a
/// single word.
impl fmt::Display for BoolExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoolExpr::Term(t) => {
                if needs_quotes(t) {
                    write!(f, "\"{}\"", t)
                } else {
                    write!(f, "{}", t)
                }
            }
            BoolExpr::Not(inner) => match inner.as_ref() {
                BoolExpr::And(_) | BoolExpr::Or(_) => write!(f, "NOT ({})", inner),
                _ => write!(f, "NOT {}", inner),
            },
            BoolExpr::And(children) => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" AND ")?;
                    }
                    match child {
                        BoolExpr::Or(_) => write!(f, "({})", child)?,
                        _ => write!(f, "{}", child)?,
                    }
                }
                Ok(())
            }
            BoolExpr::Or(children) => {
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" OR ")?;
                    }
                    write!(f, "{}", child)?;
                }
                Ok(())
            }
        }
    }
}

fn needs_quotes(term: &str) -> bool {
    term.is_empty()
        || term.starts_with(['-', '!'])
        || term.chars().any(|c| c.is_whitespace() || is_symbol(c))
        || keyword(term).is_some()
}

// =============================================================================
// TOKENIZER
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    And,
    Or,
    Not,
    LParen,
    RParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Word(w) => format!("'{}'", w),
            Token::And => "'AND'".to_string(),
            Token::Or => "'OR'".to_string(),
            Token::Not => "'NOT'".to_string(),
            Token::LParen => "'('".to_string(),
            Token::RParen => "')'".to_string(),
        }
    }
}

fn is_symbol(c: char) -> bool {
    matches!(c, '(' | ')' | '"' | '&' | '+' | '|' | ',' | '!')
}

fn keyword(word: &str) -> Option<Token> {
    if word.eq_ignore_ascii_case("and") {
        Some(Token::And)
    } else if word.eq_ignore_ascii_case("or") {
        Some(Token::Or)
    } else if word.eq_ignore_ascii_case("not") {
        Some(Token::Not)
    } else {
        None
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::LParen);
            }
            ')' => {
                chars.next();
                tokens.push(Token::RParen);
            }
            '&' | '+' => {
                chars.next();
                tokens.push(Token::And);
            }
            '|' | ',' => {
                chars.next();
                tokens.push(Token::Or);
            }
            '!' => {
                chars.next();
                tokens.push(Token::Not);
            }
            '"' => {
                chars.next();
                let mut phrase = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '"' {
                        closed = true;
                        break;
                    }
                    phrase.push(c);
                }
                if !closed {
                    return Err(Error::QueryParse("unterminated quote".to_string()));
                }
                let phrase = phrase.trim();
                if phrase.is_empty() {
                    return Err(Error::QueryParse("empty quoted phrase".to_string()));
                }
                tokens.push(Token::Word(phrase.to_string()));
            }
            _ => {
                let mut word = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() || is_symbol(c) {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }

                // Leading '-' negates; a bare '-' is kept as a word.
                if let Some(rest) = word.strip_prefix('-') {
                    if !rest.is_empty() {
                        tokens.push(Token::Not);
                        word = rest.to_string();
                    }
                }

                match keyword(&word) {
                    Some(token) => tokens.push(token),
                    None => tokens.push(Token::Word(word)),
                }
            }
        }
    }

    Ok(tokens)
}

// =============================================================================
// PARSER
// =============================================================================

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// Open parentheses around the current position.
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn parse_or(&mut self) -> Result<BoolExpr> {
        let mut children = vec![self.parse_and()?];
        while self.peek() == Some(&Token::Or) {
            self.advance();
            self.expect_operand("OR")?;
            children.push(self.parse_and()?);
        }
        Ok(BoolExpr::or(children))
    }

    fn parse_and(&mut self) -> Result<BoolExpr> {
        let mut children = vec![self.parse_unary()?];
        loop {
            match self.peek() {
                Some(Token::And) => {
                    self.advance();
                    self.expect_operand("AND")?;
                    children.push(self.parse_unary()?);
                }
                Some(Token::Word(_)) | Some(Token::Not) | Some(Token::LParen) => {
                    children.push(self.parse_unary()?);
                }
                _ => break,
            }
        }
        Ok(BoolExpr::and(children))
    }

    fn expect_operand(&self, op: &str) -> Result<()> {
        match self.peek() {
            None => Err(Error::QueryParse(format!("dangling operator '{}'", op))),
            Some(_) => Ok(()),
        }
    }

    fn parse_unary(&mut self) -> Result<BoolExpr> {
        // A run of NOTs folds to its parity.
        let mut negated = false;
        while self.peek() == Some(&Token::Not) {
            self.advance();
            negated = !negated;
            if self.peek().is_none() {
                return Err(Error::QueryParse("'NOT' without operand".to_string()));
            }
        }

        let inner = self.parse_primary()?;
        if !negated {
            return Ok(inner);
        }
        Ok(match inner {
            BoolExpr::Not(inner) => *inner,
            other => BoolExpr::Not(Box::new(other)),
        })
    }

    fn parse_primary(&mut self) -> Result<BoolExpr> {
        match self.advance() {
            Some(Token::Word(word)) => Ok(BoolExpr::Term(word)),
            Some(Token::LParen) => {
                if self.peek() == Some(&Token::RParen) {
                    return Err(Error::QueryParse("empty parentheses".to_string()));
                }
                if self.peek().is_none() {
                    return Err(Error::QueryParse("unbalanced parentheses".to_string()));
                }
                if self.depth >= MAX_QUERY_DEPTH {
                    return Err(Error::QueryParse("query nested too deeply".to_string()));
                }
                self.depth += 1;
                let inner = self.parse_or()?;
                self.depth -= 1;
                match self.advance() {
                    Some(Token::RParen) => Ok(inner),
                    _ => Err(Error::QueryParse("unbalanced parentheses".to_string())),
                }
            }
            Some(Token::RParen) => Err(Error::QueryParse("unbalanced parentheses".to_string())),
            Some(token) => Err(Error::QueryParse(format!(
                "dangling operator {}",
                token.describe()
            ))),
            None => Err(Error::QueryParse("unexpected end of query".to_string())),
        }
    }
}

/// Parse a boolean query into an expression tree.
///
/// Blank input fails with `EmptyScope`; any syntax problem fails with
/// `QueryParse` and no partial tree is returned.
pub fn parse_bool_query(input: &str) -> Result<BoolExpr> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(Error::EmptyScope("empty boolean query".to_string()));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.parse_or()?;

    if let Some(token) = parser.peek() {
        let msg = match token {
            Token::RParen => "unbalanced parentheses".to_string(),
            other => format!("unexpected {}", other.describe()),
        };
        return Err(Error::QueryParse(msg));
    }

    Ok(expr)
}

/// Strip characters that have no meaning in either search mode.
///
/// Keeps letters, digits, whitespace and `-_.,:;()"'*+|&!/`.
pub fn sanitize_query(input: &str) -> String {
    input
        .chars()
        .filter(|c| {
            c.is_alphanumeric()
                || c.is_whitespace()
                || matches!(
                    c,
                    '-' | '_'
                        | '.'
                        | ','
                        | ':'
                        | ';'
                        | '('
                        | ')'
                        | '"'
                        | '\''
                        | '*'
                        | '+'
                        | '|'
                        | '&'
                        | '!'
                        | '/'
                )
        })
        .collect::<String>()
        .trim()
        .to_string()
}
