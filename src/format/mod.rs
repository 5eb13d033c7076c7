// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lofform-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of lofform and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Notation parsing.
//!
//! Bracket notation: `(` `)` delimit a cross, `$n` marks the enclosing cross as the defining node
//! of space `n`, and `[n]` re-enters space `n` at that position.

pub mod bracket;

pub use bracket::{parse_form, BracketParseError, Expectation, Found, SourceLocation};
