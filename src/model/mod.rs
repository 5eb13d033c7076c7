// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lofform-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of lofform and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core data model.
//!
//! A form is an immutable expression tree of nested crosses whose nodes either own a reenterable
//! space (numeric id) or carry an opaque label.

pub mod expr;

pub use expr::{Child, ExpressionId, ExpressionNode, ExpressionTree, ExpressionTreeJsonError};
