// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lofform-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of lofform and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Self-referential bracket forms with reentry connectors.
//!
//! A form is written in bracket notation, e.g. `(([0] a)$0)`: crosses nest, `$n` names the
//! enclosing cross as the defining node of space `n`, and `[n]` re-enters that space instead of
//! repeating it. Rendering runs in phases:
//!
//! 1. parse the notation into an [`ExpressionTree`](model::ExpressionTree) ([`format`]);
//! 2. collect references and defining nodes, then resolve them into ordered connectors
//!    ([`reentry`]);
//! 3. measure the crosses on a surface, then assign slots and geometry to every connector
//!    ([`layout`]);
//! 4. paint marks and connectors ([`render`]).
//!
//! [`form::Form`] ties the phases together; [`highlight`] colours raw notation independently
//! of the parser.

pub mod form;
pub mod format;
pub mod highlight;
pub mod layout;
pub mod model;
pub mod reentry;
pub mod render;

pub use form::{Form, FormBuilder};
