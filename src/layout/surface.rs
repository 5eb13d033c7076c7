// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lofform-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of lofform and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;

use crate::model::expr::ExpressionId;

/// Horizontal extent of a painted node, in surface units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub left: f64,
    pub right: f64,
    pub width: f64,
}

impl BoundingBox {
    pub fn new(left: f64, width: f64) -> Self {
        Self {
            left,
            right: left + width,
            width,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LengthUnit {
    #[default]
    Px,
    Em,
    /// One terminal character cell.
    Cell,
}

impl LengthUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Px => "px",
            Self::Em => "em",
            Self::Cell => "cell",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thickness of a mark's stroke as computed by the surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeWidth {
    pub value: f64,
    pub unit: LengthUnit,
}

impl StrokeWidth {
    pub fn new(value: f64, unit: LengthUnit) -> Self {
        Self { value, unit }
    }
}

/// Connector attachment point of a defining node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    Leading,
    Trailing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// The connector runs left from the anchor's right edge.
    #[default]
    Forward,
    /// The reference overflows past the anchor; the connector runs right.
    Mirrored,
}

/// A single visual property written by the layout engine for the surface to paint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisualProperty {
    Visible(Slot),
    Extent { slot: Slot, value: f64 },
    Offset { slot: Slot, value: f64 },
    /// Direction of the slot's connector; mirrored connectors are shifted right by `shift`.
    Transform { slot: Slot, direction: Direction, shift: f64 },
    /// Offset recorded on the anchor itself; a trailing slot aligns to it.
    AnchorOffset(f64),
    /// Extra left inset on a node's content box (room for a self-loop's closing stroke).
    LeftInset(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SlotVisuals {
    pub visible: bool,
    pub extent: f64,
    pub offset: f64,
    pub direction: Direction,
    pub shift: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NodeVisuals {
    pub slot_mark: Option<Slot>,
    pub leading: Option<SlotVisuals>,
    pub trailing: Option<SlotVisuals>,
    pub anchor_offset: Option<f64>,
    pub left_inset: Option<f64>,
}

impl NodeVisuals {
    pub fn slot(&self, slot: Slot) -> Option<&SlotVisuals> {
        match slot {
            Slot::Leading => self.leading.as_ref(),
            Slot::Trailing => self.trailing.as_ref(),
        }
    }

    fn slot_mut(&mut self, slot: Slot) -> &mut SlotVisuals {
        let entry = match slot {
            Slot::Leading => &mut self.leading,
            Slot::Trailing => &mut self.trailing,
        };
        entry.get_or_insert_with(SlotVisuals::default)
    }

    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Per-node visual properties of one render pass, keyed by node id.
///
/// Surfaces own one of these instead of storing connector state on the tree.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VisualProperties {
    nodes: BTreeMap<ExpressionId, NodeVisuals>,
}

impl VisualProperties {
    pub fn get(&self, node: &ExpressionId) -> Option<&NodeVisuals> {
        self.nodes.get(node)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ExpressionId, &NodeVisuals)> + '_ {
        self.nodes.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn apply(&mut self, node: &ExpressionId, property: VisualProperty) {
        let visuals = self.nodes.entry(node.clone()).or_default();
        match property {
            VisualProperty::Visible(slot) => visuals.slot_mut(slot).visible = true,
            VisualProperty::Extent { slot, value } => visuals.slot_mut(slot).extent = value,
            VisualProperty::Offset { slot, value } => visuals.slot_mut(slot).offset = value,
            VisualProperty::Transform {
                slot,
                direction,
                shift,
            } => {
                let slot = visuals.slot_mut(slot);
                slot.direction = direction;
                slot.shift = shift;
            }
            VisualProperty::AnchorOffset(value) => visuals.anchor_offset = Some(value),
            VisualProperty::LeftInset(value) => visuals.left_inset = Some(value),
        }
    }

    pub fn slot_mark(&self, node: &ExpressionId) -> Option<Slot> {
        self.nodes.get(node).and_then(|visuals| visuals.slot_mark)
    }

    pub fn add_slot_mark(&mut self, node: &ExpressionId, slot: Slot) {
        self.nodes.entry(node.clone()).or_default().slot_mark = Some(slot);
    }

    pub fn remove_slot_mark(&mut self, node: &ExpressionId) {
        if let Some(visuals) = self.nodes.get_mut(node) {
            visuals.slot_mark = None;
            if visuals.is_empty() {
                self.nodes.remove(node);
            }
        }
    }

    /// Drops everything recorded for `node`, including its slot mark.
    pub fn clear(&mut self, node: &ExpressionId) {
        self.nodes.remove(node);
    }

    /// Left insets requested during the pass, by node.
    pub fn left_insets(&self) -> BTreeMap<ExpressionId, f64> {
        self.nodes
            .iter()
            .filter_map(|(node, visuals)| visuals.left_inset.map(|inset| (node.clone(), inset)))
            .collect()
    }
}

/// Geometry and paint capability the connector layout engine runs against.
///
/// Implementations measure nodes that have already been laid out and painted; the engine only
/// reads boxes and writes visual properties back.
pub trait RenderSurface {
    /// Bounding box of a painted node, or `None` if the node is not on the surface.
    fn bounding_box(&self, node: &ExpressionId) -> Option<BoundingBox>;

    fn stroke_width(&self, node: &ExpressionId) -> StrokeWidth;

    fn left_padding(&self, node: &ExpressionId) -> f64;

    fn visuals(&self) -> &VisualProperties;

    fn visuals_mut(&mut self) -> &mut VisualProperties;

    fn set_visual_property(&mut self, node: &ExpressionId, property: VisualProperty) {
        self.visuals_mut().apply(node, property);
    }

    fn slot_mark(&self, node: &ExpressionId) -> Option<Slot> {
        self.visuals().slot_mark(node)
    }

    fn add_slot_mark(&mut self, node: &ExpressionId, slot: Slot) {
        self.visuals_mut().add_slot_mark(node, slot);
    }

    fn remove_slot_mark(&mut self, node: &ExpressionId) {
        self.visuals_mut().remove_slot_mark(node);
    }

    /// Clears stale visual properties of `node` before a new pass writes them.
    fn reset_visuals(&mut self, node: &ExpressionId) {
        self.visuals_mut().clear(node);
    }
}

/// A surface backed by boxes measured elsewhere (e.g. by a host's own layout pass).
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredSurface {
    boxes: BTreeMap<ExpressionId, BoundingBox>,
    stroke_width: StrokeWidth,
    left_padding: f64,
    visuals: VisualProperties,
}

impl MeasuredSurface {
    pub fn new(stroke_width: StrokeWidth, left_padding: f64) -> Self {
        Self {
            boxes: BTreeMap::new(),
            stroke_width,
            left_padding,
            visuals: VisualProperties::default(),
        }
    }

    pub fn insert_box(&mut self, node: ExpressionId, bounding_box: BoundingBox) {
        self.boxes.insert(node, bounding_box);
    }

    pub fn with_box(mut self, node: ExpressionId, bounding_box: BoundingBox) -> Self {
        self.insert_box(node, bounding_box);
        self
    }
}

impl RenderSurface for MeasuredSurface {
    fn bounding_box(&self, node: &ExpressionId) -> Option<BoundingBox> {
        self.boxes.get(node).copied()
    }

    fn stroke_width(&self, _node: &ExpressionId) -> StrokeWidth {
        self.stroke_width
    }

    fn left_padding(&self, _node: &ExpressionId) -> f64 {
        self.left_padding
    }

    fn visuals(&self) -> &VisualProperties {
        &self.visuals
    }

    fn visuals_mut(&mut self) -> &mut VisualProperties {
        &mut self.visuals
    }
}
