// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lofform-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of lofform and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Building forms from their inputs and running render passes over them.

use std::fmt;

use smol_str::SmolStr;
use tracing::error;

use crate::format::{parse_form, BracketParseError};
use crate::layout::{
    assign_connector_layout, teardown_connectors, ConnectorLayout, LayoutOptions, RenderSurface,
};
use crate::model::expr::ExpressionTree;
use crate::reentry::{plan_reentries, ReentryPlan};
use crate::render::{render_form_unicode, CanvasError, RenderOptions};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FormOptions {
    /// Draw the root as a cross even when it is not a defining node.
    pub unwritten_cross: bool,
    pub layout: LayoutOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormBuildError {
    /// Neither a tree nor notation/content was given.
    MissingInput,
    /// A tree was given together with notation or content, or both of the latter.
    ConflictingInputs,
}

impl fmt::Display for FormBuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingInput => f.write_str("a form needs either an expression tree or notation"),
            Self::ConflictingInputs => {
                f.write_str("an expression tree and notation were both given; choose one")
            }
        }
    }
}

impl std::error::Error for FormBuildError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormRenderError {
    Canvas(CanvasError),
}

impl fmt::Display for FormRenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Canvas(err) => write!(f, "failed to paint form: {err}"),
        }
    }
}

impl std::error::Error for FormRenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Canvas(err) => Some(err),
        }
    }
}

impl From<CanvasError> for FormRenderError {
    fn from(value: CanvasError) -> Self {
        Self::Canvas(value)
    }
}

/// Collects the inputs of a [`Form`].
///
/// Exactly one of [`tree`](Self::tree), [`source`](Self::source) or
/// [`content`](Self::content) must be given.
#[derive(Debug, Clone, Default)]
pub struct FormBuilder {
    tree: Option<ExpressionTree>,
    source: Option<String>,
    content: Option<SmolStr>,
    options: FormOptions,
}

impl FormBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A pre-built expression tree, used as is.
    pub fn tree(mut self, tree: ExpressionTree) -> Self {
        self.tree = Some(tree);
        self
    }

    /// Bracket notation, parsed on [`build`](Self::build).
    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Embedded content shown inside a single, unnested space.
    pub fn content(mut self, content: impl Into<SmolStr>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn unwritten_cross(mut self, unwritten_cross: bool) -> Self {
        self.options.unwritten_cross = unwritten_cross;
        self
    }

    pub fn layout_options(mut self, layout: LayoutOptions) -> Self {
        self.options.layout = layout;
        self
    }

    pub fn options(mut self, options: FormOptions) -> Self {
        self.options = options;
        self
    }

    /// Validates the inputs and resolves the form's reentries.
    ///
    /// Notation that fails to parse does not fail the build: the error is logged and kept on
    /// the form, which then renders nothing.
    pub fn build(self) -> Result<Form, FormBuildError> {
        let Self {
            tree,
            source,
            content,
            options,
        } = self;

        let (tree, parse_error) = match (tree, source, content) {
            (None, None, None) => return Err(FormBuildError::MissingInput),
            (Some(tree), None, None) => (Some(tree), None),
            (None, Some(source), None) => match parse_form(&source) {
                Ok(tree) => (Some(tree), None),
                Err(err) => {
                    error!(
                        source = %source,
                        error = %err,
                        "invalid bracket notation; form renders nothing"
                    );
                    (None, Some(err))
                }
            },
            (None, None, Some(content)) => (Some(ExpressionTree::shallow(content)), None),
            _ => return Err(FormBuildError::ConflictingInputs),
        };

        let plan = tree.as_ref().map(plan_reentries).unwrap_or_default();
        Ok(Form {
            tree,
            plan,
            parse_error,
            options,
        })
    }
}

/// An expression tree with its resolved connectors, ready to be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Form {
    tree: Option<ExpressionTree>,
    plan: ReentryPlan,
    parse_error: Option<BracketParseError>,
    options: FormOptions,
}

impl Form {
    pub fn builder() -> FormBuilder {
        FormBuilder::new()
    }

    /// The form's tree; `None` when its notation failed to parse.
    pub fn tree(&self) -> Option<&ExpressionTree> {
        self.tree.as_ref()
    }

    pub fn plan(&self) -> &ReentryPlan {
        &self.plan
    }

    pub fn parse_error(&self) -> Option<&BracketParseError> {
        self.parse_error.as_ref()
    }

    pub fn options(&self) -> &FormOptions {
        &self.options
    }

    /// Whether the root is drawn as a cross: on request, or when it is itself re-entered.
    pub fn draws_outer_cross(&self) -> bool {
        self.options.unwritten_cross
            || self
                .tree
                .as_ref()
                .map_or(false, |tree| tree.root().id().is_space())
    }

    /// Lays the form's connectors out on an already measured `surface`.
    ///
    /// The returned pass removes its slot marks from the surface when dropped.
    pub fn render_pass<'s, S: RenderSurface + ?Sized>(
        &self,
        surface: &'s mut S,
    ) -> RenderPass<'s, S> {
        let layout = match &self.tree {
            Some(tree) => assign_connector_layout(
                tree,
                self.plan.connectors(),
                &mut *surface,
                &self.options.layout,
            ),
            None => ConnectorLayout::default(),
        };
        RenderPass { surface, layout }
    }

    pub fn render_unicode(&self, options: &RenderOptions) -> Result<String, FormRenderError> {
        render_form_unicode(self, options)
    }
}

/// One connector layout applied to a surface.
pub struct RenderPass<'s, S: RenderSurface + ?Sized> {
    surface: &'s mut S,
    layout: ConnectorLayout,
}

impl<'s, S: RenderSurface + ?Sized> RenderPass<'s, S> {
    pub fn layout(&self) -> &ConnectorLayout {
        &self.layout
    }

    pub fn surface(&self) -> &S {
        &*self.surface
    }
}

impl<'s, S: RenderSurface + ?Sized> Drop for RenderPass<'s, S> {
    fn drop(&mut self) {
        teardown_connectors(&self.layout, &mut *self.surface);
    }
}

#[cfg(test)]
mod tests {
    use super::{Form, FormBuildError, FormBuilder};
    use crate::layout::{BoundingBox, LengthUnit, MeasuredSurface, RenderSurface, Slot, StrokeWidth};
    use crate::model::expr::{ExpressionId, ExpressionTree};

    #[test]
    fn build_requires_exactly_one_input() {
        assert_eq!(
            FormBuilder::new().build().expect_err("no input"),
            FormBuildError::MissingInput
        );

        let tree = ExpressionTree::shallow("a");
        assert_eq!(
            FormBuilder::new()
                .tree(tree)
                .source("(a)")
                .build()
                .expect_err("both inputs"),
            FormBuildError::ConflictingInputs
        );
        assert_eq!(
            FormBuilder::new()
                .source("(a)")
                .content("a")
                .build()
                .expect_err("notation and content"),
            FormBuildError::ConflictingInputs
        );
    }

    #[test]
    fn embedded_content_becomes_a_shallow_tree() {
        let form = Form::builder().content("hello").build().expect("form");
        let tree = form.tree().expect("tree");
        assert_eq!(tree.root().id(), &ExpressionId::label("_0"));
        assert_eq!(tree.root().content(), "hello");
        assert!(tree.root().children().is_empty());
        assert!(form.plan().is_empty());
        assert!(!form.draws_outer_cross());
    }

    #[test]
    fn parse_failure_is_kept_and_renders_nothing() {
        let form = Form::builder().source("(a;").build().expect("form");
        assert!(form.tree().is_none());
        let err = form.parse_error().expect("parse error");
        assert_eq!(err.location().column, 3);
        assert!(form.plan().is_empty());
    }

    #[test]
    fn defining_root_is_drawn_as_a_cross() {
        let form = Form::builder().source("$0 a ([0])").build().expect("form");
        assert!(form.draws_outer_cross());
        assert_eq!(form.plan().connectors().len(), 1);
    }

    #[test]
    fn dropping_a_pass_removes_its_slot_marks() {
        let form = Form::builder().source("(([0])$0)").build().expect("form");
        let mut surface = MeasuredSurface::new(StrokeWidth::new(1.0, LengthUnit::Px), 1.0)
            .with_box(ExpressionId::Space(0), BoundingBox::new(0.0, 10.0))
            .with_box(ExpressionId::label("_2"), BoundingBox::new(2.0, 5.0));

        {
            let pass = form.render_pass(&mut surface);
            assert_eq!(pass.layout().placements().len(), 1);
            assert_eq!(pass.surface().slot_mark(&ExpressionId::Space(0)), Some(Slot::Leading));
        }

        assert_eq!(surface.slot_mark(&ExpressionId::Space(0)), None);
        let visuals = surface.visuals().get(&ExpressionId::Space(0)).expect("visuals");
        assert!(visuals.slot(Slot::Leading).is_some_and(|slot| slot.visible));
    }
}
