// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lofform-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of lofform and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use smol_str::SmolStr;

use crate::model::expr::{Child, ExpressionId, ExpressionNode, ExpressionTree};

/// Characters allowed inside a content run.
///
/// Keep in sync with the content pattern in `highlight`.
pub(crate) fn is_content_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric()
        || matches!(
            ch,
            ' ' | ','
                | '.'
                | '-'
                | '_'
                | '#'
                | '+'
                | '*'
                | '\''
                | '`'
                | '´'
                | '?'
                | '!'
                | '='
                | '/'
                | '&'
                | '%'
                | '§'
                | 'ö'
                | 'Ö'
                | 'ä'
                | 'Ä'
                | '€'
                | '"'
                | '^'
                | '–'
                | '<'
                | '>'
                | '\\'
        )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    /// Byte offset into the input.
    pub offset: usize,
    /// 1-based line.
    pub line: usize,
    /// 1-based column, counted in chars.
    pub column: usize,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Expectation {
    Literal(char),
    Digit,
    Content,
    EndOfInput,
}

impl fmt::Display for Expectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(ch) => write!(f, "\"{ch}\""),
            Self::Digit => f.write_str("digit"),
            Self::Content => f.write_str("content"),
            Self::EndOfInput => f.write_str("end of input"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Found {
    Char(char),
    EndOfInput,
}

impl fmt::Display for Found {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(ch) => write!(f, "\"{ch}\""),
            Self::EndOfInput => f.write_str("end of input"),
        }
    }
}

/// Syntax error raised when the input does not match the bracket grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketParseError {
    message: String,
    expected: Vec<Expectation>,
    found: Found,
    location: SourceLocation,
}

impl BracketParseError {
    fn unexpected(mut expected: Vec<Expectation>, found: Found, location: SourceLocation) -> Self {
        expected.sort();
        expected.dedup();
        let message = build_message(&expected, found);
        Self {
            message,
            expected,
            found,
            location,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn expected(&self) -> &[Expectation] {
        &self.expected
    }

    pub fn found(&self) -> Found {
        self.found
    }

    pub fn location(&self) -> SourceLocation {
        self.location
    }
}

fn build_message(expected: &[Expectation], found: Found) -> String {
    let described = expected.iter().map(ToString::to_string).collect::<Vec<_>>();
    let expected = match described.as_slice() {
        [] => "nothing".to_owned(),
        [only] => only.clone(),
        [init @ .., last] => format!("{}, or {last}", init.join(", ")),
    };
    format!("Expected {expected} but {found} found.")
}

impl fmt::Display for BracketParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "syntax error at {}: {}", self.location, self.message)
    }
}

impl std::error::Error for BracketParseError {}

const ITEM_START: [Expectation; 4] = [
    Expectation::Literal('('),
    Expectation::Literal('$'),
    Expectation::Literal('['),
    Expectation::Content,
];

struct Parser<'a> {
    input: &'a str,
    offset: usize,
    line: usize,
    column: usize,
    next_label: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            offset: 0,
            line: 1,
            column: 1,
            next_label: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.offset..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.offset += ch.len_utf8();
        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(ch)
    }

    fn location(&self) -> SourceLocation {
        SourceLocation {
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }

    fn error(&self, expected: Vec<Expectation>) -> BracketParseError {
        let found = self.peek().map_or(Found::EndOfInput, Found::Char);
        BracketParseError::unexpected(expected, found, self.location())
    }

    fn fresh_label(&mut self) -> ExpressionId {
        let label = ExpressionId::label(format!("_{}", self.next_label));
        self.next_label += 1;
        label
    }

    fn take_content_run(&mut self) -> &'a str {
        let start = self.offset;
        while matches!(self.peek(), Some(ch) if is_content_char(ch)) {
            self.bump();
        }
        let input = self.input;
        &input[start..self.offset]
    }

    fn parse_number(&mut self) -> Result<u32, BracketParseError> {
        let start = self.location();
        let first = self.peek();
        let mut value: Option<u32> = Some(0);
        let mut digits = 0usize;
        while let Some(digit) = self.peek().and_then(|ch| ch.to_digit(10)) {
            value = value
                .and_then(|value| value.checked_mul(10))
                .and_then(|value| value.checked_add(digit));
            digits += 1;
            self.bump();
        }

        if digits == 0 {
            return Err(self.error(vec![Expectation::Digit]));
        }

        value.ok_or_else(|| BracketParseError {
            message: format!("identifier does not fit into {} bits", u32::BITS),
            expected: vec![Expectation::Digit],
            found: first.map_or(Found::EndOfInput, Found::Char),
            location: start,
        })
    }

    fn expect(&mut self, literal: char) -> Result<(), BracketParseError> {
        if self.peek() == Some(literal) {
            self.bump();
            return Ok(());
        }
        Err(self.error(vec![Expectation::Literal(literal)]))
    }

    /// Parses the whole input as the items of the unwritten outer space.
    ///
    /// Open crosses are kept on an explicit stack, so nesting depth is bounded by memory only.
    fn parse_root(&mut self) -> Result<ExpressionNode, BracketParseError> {
        let mut current = OpenSpace::new(self.fresh_label());
        let mut enclosing = Vec::<OpenSpace<'a>>::new();

        loop {
            let nested = !enclosing.is_empty();
            match self.peek() {
                None if nested => {
                    let mut expected = ITEM_START.to_vec();
                    expected.push(Expectation::Literal(')'));
                    return Err(self.error(expected));
                }
                None => break,
                Some(')') if nested => {
                    self.bump();
                    if let Some(parent) = enclosing.pop() {
                        let closed = std::mem::replace(&mut current, parent).close();
                        current.node.push_child(Child::Node(closed));
                    }
                }
                Some('(') => {
                    self.bump();
                    let opened = OpenSpace::new(self.fresh_label());
                    enclosing.push(std::mem::replace(&mut current, opened));
                }
                Some('$') => {
                    self.bump();
                    let space = self.parse_number()?;
                    current.node.set_id(ExpressionId::Space(space));
                }
                Some('[') => {
                    self.bump();
                    let anchor = self.parse_number()?;
                    self.expect(']')?;
                    current.node.push_child(Child::Reference(anchor));
                }
                Some(ch) if is_content_char(ch) => current.runs.push(self.take_content_run()),
                Some(ch) if ch.is_whitespace() => {
                    self.bump();
                }
                Some(_) => {
                    let mut expected = ITEM_START.to_vec();
                    expected.push(if nested {
                        Expectation::Literal(')')
                    } else {
                        Expectation::EndOfInput
                    });
                    return Err(self.error(expected));
                }
            }
        }

        Ok(current.close())
    }
}

/// A space whose closing bracket has not been read yet.
struct OpenSpace<'a> {
    node: ExpressionNode,
    runs: Vec<&'a str>,
}

impl<'a> OpenSpace<'a> {
    fn new(id: ExpressionId) -> Self {
        Self {
            node: ExpressionNode::new(id),
            runs: Vec::new(),
        }
    }

    fn close(self) -> ExpressionNode {
        let Self { mut node, runs } = self;
        let content = runs
            .iter()
            .map(|run| run.trim())
            .filter(|run| !run.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        node.set_content(SmolStr::from(content));
        node
    }
}

/// Parses bracket notation into an expression tree.
///
/// The root is the unwritten outer space at depth 0 (labelled `_0` unless a top-level `$n`
/// makes it a defining node). Every `( … )` opens a nested node one level deeper; nodes without
/// a `$n` are labelled `_<n>` in the order their opening bracket appears. Content runs of one
/// space are trimmed and joined with a single blank.
///
/// An empty input is a valid, empty space.
pub fn parse_form(input: &str) -> Result<ExpressionTree, BracketParseError> {
    let root = Parser::new(input).parse_root()?;
    Ok(ExpressionTree::from_root(root))
}
