// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lofform-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of lofform and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use tracing::debug;

use super::text::text_len;
use super::{Canvas, CanvasError, RenderOptions};
use crate::form::{Form, FormRenderError};
use crate::layout::{
    BoundingBox, Direction, LengthUnit, RenderSurface, Slot, SlotVisuals, StrokeWidth,
    VisualProperties,
};
use crate::model::expr::{Child, ExpressionId, ExpressionNode, ExpressionTree};

/// Cell geometry of one measured node.
///
/// All items are bottom-aligned, so every node ends on the form's last row (the baseline)
/// and `height` alone fixes its top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellBox {
    pub left: usize,
    pub width: usize,
    pub height: usize,
    /// Whether the node is drawn as a cross (top bar plus right stroke).
    pub cross: bool,
    content_column: Option<usize>,
}

impl CellBox {
    /// Column of the node's content text, if it has any.
    pub fn content_column(&self) -> Option<usize> {
        self.content_column
    }

    fn stroke_column(&self) -> Option<usize> {
        self.left.checked_add(self.width)?.checked_sub(1)
    }
}

/// A [`RenderSurface`] that lays crosses out on a character grid.
///
/// One cell is the unit of every length, and strokes are one cell wide.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSurface {
    options: RenderOptions,
    /// Boxes in pre-order of the measured tree.
    placed: Vec<CellBox>,
    by_id: BTreeMap<ExpressionId, usize>,
    insets: BTreeMap<ExpressionId, usize>,
    width: usize,
    height: usize,
    visuals: VisualProperties,
}

impl TextSurface {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            options,
            placed: Vec::new(),
            by_id: BTreeMap::new(),
            insets: BTreeMap::new(),
            width: 0,
            height: 0,
            visuals: VisualProperties::default(),
        }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Width of the measured form, without connectors.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height of the measured form, without connectors.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_box(&self, node: &ExpressionId) -> Option<CellBox> {
        self.by_id.get(node).map(|&index| self.placed[index])
    }

    /// Measures every node of `tree`.
    ///
    /// `insets` widen the left padding of the named crosses; fractional insets round up to
    /// whole cells. The root is drawn as a cross only when `outer_cross` is set.
    pub fn measure(
        &mut self,
        tree: &ExpressionTree,
        outer_cross: bool,
        insets: &BTreeMap<ExpressionId, f64>,
    ) {
        self.placed.clear();
        self.by_id.clear();
        self.insets = insets
            .iter()
            .map(|(node, inset)| (node.clone(), inset.max(0.0).ceil() as usize))
            .collect();

        let root = self.measure_root(tree.root(), outer_cross);
        self.width = root.width;
        self.height = root.height;
    }

    /// Measures `root` and its descendants, placing every box in pre-order.
    ///
    /// Open crosses are kept on an explicit stack; lengths saturate instead of overflowing, and
    /// an oversized form is reported when it is painted.
    fn measure_root(&mut self, root: &ExpressionNode, cross: bool) -> CellBox {
        let mut current = self.open_measure(root, 0, cross);
        let mut enclosing = Vec::<OpenMeasure<'_>>::new();

        loop {
            if let Some(child) = current.children.find_map(Child::as_node) {
                if current.items > 0 {
                    current.cursor = current.cursor.saturating_add(self.options.sibling_gap);
                }
                let opened = self.open_measure(child, current.cursor, true);
                enclosing.push(std::mem::replace(&mut current, opened));
                continue;
            }

            let cell_box = self.close_measure(current);
            let Some(parent) = enclosing.pop() else {
                return cell_box;
            };
            current = parent;
            current.cursor = current.cursor.saturating_add(cell_box.width);
            current.inner_height = current.inner_height.max(cell_box.height);
            current.items += 1;
        }
    }

    fn open_measure<'t>(
        &mut self,
        node: &'t ExpressionNode,
        left: usize,
        cross: bool,
    ) -> OpenMeasure<'t> {
        let index = self.placed.len();
        self.placed.push(CellBox::default());
        OpenMeasure {
            node,
            children: node.children().iter(),
            index,
            left,
            cross,
            cursor: left.saturating_add(self.padding_cells(node.id(), cross)),
            inner_height: 0,
            items: 0,
        }
    }

    fn close_measure(&mut self, open: OpenMeasure<'_>) -> CellBox {
        let OpenMeasure {
            node,
            index,
            left,
            cross,
            mut cursor,
            mut inner_height,
            items,
            ..
        } = open;
        let gap = self.options.sibling_gap;

        let content_column = (!node.content().is_empty()).then(|| {
            if items > 0 {
                cursor = cursor.saturating_add(gap);
            }
            let column = cursor;
            cursor = cursor.saturating_add(text_len(node.content()));
            inner_height = inner_height.max(1);
            column
        });

        let cell_box = if cross {
            CellBox {
                left,
                width: cursor.saturating_add(1) - left,
                height: 1 + inner_height.max(1),
                cross,
                content_column,
            }
        } else {
            CellBox {
                left,
                width: cursor - left,
                height: inner_height,
                cross,
                content_column,
            }
        };

        self.placed[index] = cell_box;
        self.by_id.insert(node.id().clone(), index);
        cell_box
    }

    fn padding_cells(&self, node: &ExpressionId, cross: bool) -> usize {
        if !cross {
            return 0;
        }
        let inset = self.insets.get(node).copied().unwrap_or(0);
        self.options.left_padding.saturating_add(inset)
    }

    /// Paints the measured `tree` and every visible connector in the visual-property table.
    ///
    /// `tree` must be the tree passed to the last [`measure`](Self::measure).
    pub fn paint(&self, tree: &ExpressionTree) -> Result<Canvas, CanvasError> {
        let Some(baseline) = self.height.checked_sub(1) else {
            return Canvas::new(0, 0);
        };

        let hooks = self.hooks(baseline)?;
        let width = hooks
            .iter()
            .map(|hook| hook.from.max(hook.to) + 1)
            .fold(self.width, usize::max);
        let height = hooks
            .iter()
            .map(|hook| hook.bottom + 1)
            .fold(self.height, usize::max);
        let mut canvas = Canvas::new(width, height)?;

        for (node, cell_box) in tree.nodes().zip(&self.placed) {
            if cell_box.cross {
                if let Some(stroke) = cell_box.stroke_column() {
                    let top = baseline + 1 - cell_box.height;
                    canvas.draw_hline(cell_box.left, stroke, top)?;
                    canvas.draw_vline(stroke, top, baseline)?;
                }
            }
            if let Some(column) = cell_box.content_column {
                canvas.write_str(column, baseline, node.content())?;
            }
        }

        for hook in &hooks {
            canvas.draw_vline(hook.from, baseline, hook.bottom)?;
            canvas.draw_hline(hook.from, hook.to, hook.bottom)?;
            canvas.draw_vline(hook.to, baseline + 1, hook.bottom)?;
        }

        Ok(canvas)
    }

    fn hooks(&self, baseline: usize) -> Result<Vec<Hook>, CanvasError> {
        let mut hooks = Vec::new();
        for (anchor, visuals) in self.visuals.iter() {
            let Some(from) = self.cell_box(anchor).and_then(|cell_box| cell_box.stroke_column())
            else {
                continue;
            };
            for slot in [Slot::Leading, Slot::Trailing] {
                if let Some(slot_visuals) = visuals.slot(slot).filter(|slot| slot.visible) {
                    hooks.push(self.hook(from, baseline, slot_visuals)?);
                }
            }
        }
        Ok(hooks)
    }

    /// Fails when the hook would end past the last addressable cell.
    fn hook(
        &self,
        from: usize,
        baseline: usize,
        slot: &SlotVisuals,
    ) -> Result<Hook, CanvasError> {
        let reach = slot.extent.max(0.0).floor() as usize;
        let drop = ((slot.offset * self.options.vertical_scale).ceil() as usize).max(1);
        let to = match slot.direction {
            Direction::Forward => Some(from.saturating_sub(reach)),
            Direction::Mirrored => from.checked_add(reach),
        };
        let bottom = baseline.checked_add(drop);

        match (to, bottom) {
            (Some(to), Some(bottom)) if to < usize::MAX && bottom < usize::MAX => {
                Ok(Hook { from, to, bottom })
            }
            _ => Err(CanvasError::AreaOverflow {
                width: from.saturating_add(reach),
                height: baseline.saturating_add(drop),
            }),
        }
    }
}

/// A connector in cells: down from the anchor's stroke, across, and back up.
struct Hook {
    from: usize,
    to: usize,
    bottom: usize,
}

/// A node whose children are still being measured.
struct OpenMeasure<'t> {
    node: &'t ExpressionNode,
    children: std::slice::Iter<'t, Child>,
    index: usize,
    left: usize,
    cross: bool,
    cursor: usize,
    inner_height: usize,
    items: usize,
}

impl RenderSurface for TextSurface {
    fn bounding_box(&self, node: &ExpressionId) -> Option<BoundingBox> {
        self.cell_box(node)
            .map(|cell_box| BoundingBox::new(cell_box.left as f64, cell_box.width as f64))
    }

    fn stroke_width(&self, _node: &ExpressionId) -> StrokeWidth {
        StrokeWidth::new(1.0, LengthUnit::Cell)
    }

    fn left_padding(&self, node: &ExpressionId) -> f64 {
        let cross = self.cell_box(node).map_or(false, |cell_box| cell_box.cross);
        self.padding_cells(node, cross) as f64
    }

    fn visuals(&self) -> &VisualProperties {
        &self.visuals
    }

    fn visuals_mut(&mut self) -> &mut VisualProperties {
        &mut self.visuals
    }
}

/// Renders `form` as Unicode box-drawing text.
///
/// Runs measure, connector layout and paint on a fresh [`TextSurface`]. If the layout asks
/// for left insets (self-loops), the form is measured and laid out once more with the insets
/// applied before painting. A form without a tree renders as an empty string.
pub fn render_form_unicode(
    form: &Form,
    options: &RenderOptions,
) -> Result<String, FormRenderError> {
    let Some(tree) = form.tree() else {
        return Ok(String::new());
    };
    let outer_cross = form.draws_outer_cross();

    let mut surface = TextSurface::new(*options);
    surface.measure(tree, outer_cross, &BTreeMap::new());

    let insets = {
        let pass = form.render_pass(&mut surface);
        let insets = pass.surface().visuals().left_insets();
        if insets.is_empty() {
            let canvas = pass.surface().paint(tree)?;
            return Ok(canvas.to_trimmed_string());
        }
        insets
    };

    debug!(insets = insets.len(), "re-measuring form with self-loop insets");
    surface.measure(tree, outer_cross, &insets);
    let pass = form.render_pass(&mut surface);
    let canvas = pass.surface().paint(tree)?;
    Ok(canvas.to_trimmed_string())
}
