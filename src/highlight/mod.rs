// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lofform-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of lofform and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Syntax highlighting for raw bracket notation.
//!
//! The tokenizer is independent of the parser: it accepts any input (including input the
//! parser rejects) and always covers it completely, so an editor can colour text while it is
//! being typed.

use std::sync::OnceLock;

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TokenCategory {
    /// A run of `(` / `)`.
    Cross,
    Content,
    /// `$n`
    SpaceId,
    /// `[n]`
    Reentry,
    /// A single character none of the other categories accepts.
    Error,
}

/// A classified slice of the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenSpan<'a> {
    pub category: TokenCategory,
    pub text: &'a str,
    /// Byte offset of `text` in the classified input.
    pub offset: usize,
}

struct Patterns {
    cross: Regex,
    content: Regex,
    space_id: Regex,
    reentry: Regex,
}

impl Patterns {
    fn compile() -> Self {
        // Content characters must stay in sync with `format::bracket::is_content_char`.
        Self {
            cross: Regex::new(r"^[()]+").expect("cross pattern"),
            content: Regex::new(r##"^[ a-zA-Z0-9,.\-_#+*'`´?!=/&%§öÖäÄ€"^–<>\\]+"##)
                .expect("content pattern"),
            space_id: Regex::new(r"^\$[0-9]+").expect("space id pattern"),
            reentry: Regex::new(r"^\[[0-9]+\]").expect("reentry pattern"),
        }
    }

    /// Tried in this order; the first match wins.
    fn ordered(&self) -> [(TokenCategory, &Regex); 4] {
        [
            (TokenCategory::Cross, &self.cross),
            (TokenCategory::Content, &self.content),
            (TokenCategory::SpaceId, &self.space_id),
            (TokenCategory::Reentry, &self.reentry),
        ]
    }
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(Patterns::compile)
}

/// Splits `text` into classified spans.
///
/// Every step consumes the longest prefix one of the categories accepts, or a single
/// [`TokenCategory::Error`] character. Concatenating the span texts reproduces `text`.
pub fn classify(text: &str) -> Vec<TokenSpan<'_>> {
    let patterns = patterns();
    let mut spans = Vec::new();
    let mut offset = 0usize;
    // Every step consumes at least one char, so this bound is never the limiting one.
    let max_steps = text.chars().count();

    for _ in 0..max_steps {
        let rest = &text[offset..];
        let Some(first) = rest.chars().next() else {
            break;
        };

        let (category, len) = patterns
            .ordered()
            .into_iter()
            .find_map(|(category, regex)| {
                regex
                    .find(rest)
                    .filter(|found| !found.is_empty())
                    .map(|found| (category, found.end()))
            })
            .unwrap_or((TokenCategory::Error, first.len_utf8()));

        spans.push(TokenSpan {
            category,
            text: &rest[..len],
            offset,
        });
        offset += len;
    }

    spans
}

/// Terminal styles per token category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HighlightStyleSheet {
    pub cross: Style,
    pub content: Style,
    pub space_id: Style,
    pub reentry: Style,
    pub error: Style,
}

impl Default for HighlightStyleSheet {
    fn default() -> Self {
        Self {
            // Inherits the surrounding style.
            cross: Style::default(),
            content: Style::default().fg(Color::Rgb(0xA0, 0x6E, 0x3C)),
            space_id: Style::default().fg(Color::Rgb(0x4B, 0x8B, 0x8B)),
            reentry: Style::default().fg(Color::Rgb(0xCA, 0x4A, 0x49)),
            error: Style::default().fg(Color::Rgb(0xCA, 0x4A, 0x49)),
        }
    }
}

impl HighlightStyleSheet {
    pub fn style(&self, category: TokenCategory) -> Style {
        match category {
            TokenCategory::Cross => self.cross,
            TokenCategory::Content => self.content,
            TokenCategory::SpaceId => self.space_id,
            TokenCategory::Reentry => self.reentry,
            TokenCategory::Error => self.error,
        }
    }
}

/// Highlights one line of notation as a styled ratatui [`Line`].
pub fn highlight_line<'a>(text: &'a str, sheet: &HighlightStyleSheet) -> Line<'a> {
    let spans = classify(text)
        .into_iter()
        .map(|span| Span::styled(span.text, sheet.style(span.category)))
        .collect::<Vec<_>>();
    Line::from(spans)
}
