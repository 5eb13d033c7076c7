// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lofform-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of lofform and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use smallvec::SmallVec;
use tracing::{debug, warn};

use super::surface::{BoundingBox, Direction, LengthUnit, RenderSurface, Slot, VisualProperty};
use crate::model::expr::{ExpressionId, ExpressionNode, ExpressionTree};
use crate::reentry::ResolvedConnector;

/// Tuning constants of the connector layout, in stroke-width units unless noted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Minimum drop of every connector below its anchor.
    pub base_offset: f64,
    /// Extra drop per level of depth delta.
    pub depth_step: f64,
    /// Extra drop per connector still waiting in the same depth-delta bucket.
    pub bucket_step: f64,
    /// Amount trimmed off a mirrored connector so it ends inside the reference's stroke.
    pub overflow_trim: f64,
    /// Gap past the reference's padding when the reference directly holds an undecorated cross.
    pub undecorated_gap: f64,
    /// Fraction of the reference's left padding kept clear (unitless).
    pub padding_ratio: f64,
    /// Left inset requested on a self-referencing node.
    pub self_loop_inset: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            base_offset: 4.0,
            depth_step: 2.0,
            bucket_step: 1.5,
            overflow_trim: 1.5,
            undecorated_gap: 3.0,
            padding_ratio: 0.33,
            self_loop_inset: 2.0,
        }
    }
}

/// Geometry assigned to one connector.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorPlacement {
    anchor: ExpressionId,
    site: ExpressionId,
    slot: Slot,
    offset: f64,
    extent: f64,
    direction: Direction,
    shift: f64,
    left_inset: Option<f64>,
    unit: LengthUnit,
    anchor_depth: usize,
    subtree_max_depth: usize,
    depth_delta: usize,
}

impl ConnectorPlacement {
    pub fn anchor(&self) -> &ExpressionId {
        &self.anchor
    }

    pub fn site(&self) -> &ExpressionId {
        &self.site
    }

    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Vertical drop below the anchor, in `unit`.
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// Horizontal length of the connector.
    pub fn extent(&self) -> f64 {
        self.extent
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Horizontal shift of a mirrored connector; zero otherwise.
    pub fn shift(&self) -> f64 {
        self.shift
    }

    /// Left inset requested on the site (self-loops only).
    pub fn left_inset(&self) -> Option<f64> {
        self.left_inset
    }

    pub fn unit(&self) -> LengthUnit {
        self.unit
    }

    pub fn depth_delta(&self) -> usize {
        self.depth_delta
    }
}

/// A connector left out of the layout because the surface has no box for one of its ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedConnector {
    pub anchor: ExpressionId,
    pub site: ExpressionId,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConnectorLayout {
    placements: Vec<ConnectorPlacement>,
    skipped: Vec<SkippedConnector>,
    occupants: BTreeMap<ExpressionId, SmallVec<[usize; 2]>>,
}

impl ConnectorLayout {
    /// Placements in processing (canonical) order.
    pub fn placements(&self) -> &[ConnectorPlacement] {
        &self.placements
    }

    pub fn skipped(&self) -> &[SkippedConnector] {
        &self.skipped
    }

    /// Anchors that received at least one connector.
    pub fn anchors(&self) -> impl Iterator<Item = &ExpressionId> + '_ {
        self.occupants.keys()
    }

    /// The connector currently holding `slot` on `anchor`.
    pub fn slot_occupant(&self, anchor: &ExpressionId, slot: Slot) -> Option<&ConnectorPlacement> {
        let slots = self.occupants.get(anchor)?;
        let index = match slot {
            Slot::Leading => slots.first(),
            Slot::Trailing => slots.get(1),
        }?;
        self.placements.get(*index)
    }

    fn occupy(&mut self, anchor: &ExpressionId, index: usize) {
        let slots = self.occupants.entry(anchor.clone()).or_default();
        if slots.len() < 2 {
            slots.push(index);
        } else {
            // A third connector silently replaces the trailing one.
            slots[1] = index;
        }
    }
}

struct Reach {
    extent: f64,
    direction: Direction,
    shift: f64,
}

fn connector_reach(
    anchor: BoundingBox,
    site: BoundingBox,
    padding: f64,
    stroke: f64,
    owns_undecorated_edge: bool,
    options: &LayoutOptions,
) -> Reach {
    if site.right > anchor.right {
        let extent = (site.right - anchor.right) - options.overflow_trim * stroke;
        return Reach {
            extent,
            direction: Direction::Mirrored,
            shift: extent - stroke,
        };
    }

    let extent = if owns_undecorated_edge {
        (anchor.right - site.right) + padding + options.undecorated_gap * stroke
    } else {
        (anchor.right - site.right) + site.width - options.padding_ratio * padding
    };
    Reach {
        extent,
        direction: Direction::Forward,
        shift: 0.0,
    }
}

/// Whether `site` directly holds a nested cross that carries no connector mark yet.
fn owns_undecorated_edge<S: RenderSurface + ?Sized>(
    site: Option<&ExpressionNode>,
    surface: &S,
) -> bool {
    site.map_or(false, |site| {
        site.child_nodes()
            .any(|child| surface.slot_mark(child.id()).is_none())
    })
}

/// Assigns slots and geometry to `connectors` (already in canonical order) and writes the
/// resulting visual properties to `surface`.
///
/// Must run after the surface has measured every node. Visual properties of every node of
/// `tree` are reset first, so running it again on the same surface yields the same result.
///
/// Per connector:
/// - the first connector on an anchor takes the leading slot, later ones the trailing slot
///   (a third overwrites the second);
/// - the drop is `(base + depth_step * delta + bucket_step * remaining) * stroke`, where
///   `remaining` counts non-self connectors of the same depth delta not processed yet;
/// - a trailing slot aligns to the offset its anchor recorded for the leading slot;
/// - if an earlier connector has a *different* anchor depth but the same subtree max depth,
///   its offset is reused instead.
pub fn assign_connector_layout<S: RenderSurface + ?Sized>(
    tree: &ExpressionTree,
    connectors: &[ResolvedConnector],
    surface: &mut S,
    options: &LayoutOptions,
) -> ConnectorLayout {
    let mut nodes = BTreeMap::<&ExpressionId, &ExpressionNode>::new();
    for node in tree.nodes() {
        surface.reset_visuals(node.id());
        nodes.insert(node.id(), node);
    }

    let mut remaining = BTreeMap::<usize, i64>::new();
    for connector in connectors.iter().filter(|connector| !connector.is_self_loop()) {
        *remaining.entry(connector.depth_delta()).or_default() += 1;
    }

    let mut layout = ConnectorLayout::default();
    let mut processed = Vec::<(usize, usize, f64)>::new();

    for connector in connectors {
        let anchor = connector.anchor();
        let site = connector.site();
        let (Some(anchor_box), Some(site_box)) =
            (surface.bounding_box(&anchor), surface.bounding_box(site))
        else {
            warn!(anchor = %anchor, site = %site, "connector endpoint not on surface; skipped");
            layout.skipped.push(SkippedConnector {
                anchor,
                site: site.clone(),
            });
            continue;
        };

        let slot = match surface.slot_mark(&anchor) {
            None => Slot::Leading,
            Some(_) => Slot::Trailing,
        };
        surface.add_slot_mark(&anchor, slot);

        let stroke = surface.stroke_width(site);
        let padding = surface.left_padding(site);
        let owns_edge = owns_undecorated_edge(nodes.get(site).copied(), &*surface);
        let reach = connector_reach(
            anchor_box,
            site_box,
            padding,
            stroke.value,
            owns_edge,
            options,
        );

        surface.set_visual_property(&anchor, VisualProperty::Visible(slot));
        surface.set_visual_property(
            &anchor,
            VisualProperty::Extent {
                slot,
                value: reach.extent,
            },
        );

        let left_inset = connector
            .is_self_loop()
            .then(|| options.self_loop_inset * stroke.value);
        if let Some(inset) = left_inset {
            surface.set_visual_property(site, VisualProperty::LeftInset(inset));
        }

        let delta = connector.depth_delta();
        let waiting = remaining.get(&delta).copied().unwrap_or(0).max(0);
        let stacked = (options.base_offset
            + options.depth_step * delta as f64
            + options.bucket_step * waiting as f64)
            * stroke.value;
        if !connector.is_self_loop() {
            *remaining.entry(delta).or_default() -= 1;
        }

        let shared = processed.iter().find(|(anchor_depth, subtree_max_depth, _)| {
            *anchor_depth != connector.anchor_depth()
                && *subtree_max_depth == connector.subtree_max_depth()
        });
        let recorded = surface.visuals().get(&anchor).copied().unwrap_or_default();
        let (offset, anchor_offset) = match (shared, slot) {
            (Some((_, _, shared_offset)), _) => (*shared_offset, stacked),
            (None, Slot::Trailing) => (
                recorded.leading.map_or(stacked, |leading| leading.offset),
                recorded.anchor_offset.unwrap_or(stacked),
            ),
            (None, Slot::Leading) => (stacked, stacked),
        };

        surface.set_visual_property(&anchor, VisualProperty::Offset { slot, value: offset });
        surface.set_visual_property(&anchor, VisualProperty::AnchorOffset(anchor_offset));
        surface.set_visual_property(
            &anchor,
            VisualProperty::Transform {
                slot,
                direction: reach.direction,
                shift: reach.shift,
            },
        );

        processed.push((connector.anchor_depth(), connector.subtree_max_depth(), offset));
        let index = layout.placements.len();
        layout.placements.push(ConnectorPlacement {
            anchor: anchor.clone(),
            site: site.clone(),
            slot,
            offset,
            extent: reach.extent,
            direction: reach.direction,
            shift: reach.shift,
            left_inset,
            unit: stroke.unit,
            anchor_depth: connector.anchor_depth(),
            subtree_max_depth: connector.subtree_max_depth(),
            depth_delta: delta,
        });
        layout.occupy(&anchor, index);
    }

    debug!(
        placed = layout.placements.len(),
        skipped = layout.skipped.len(),
        anchors = layout.occupants.len(),
        "connector layout assigned"
    );
    layout
}

/// Removes the slot marks `layout` left on its anchors.
pub fn teardown_connectors<S: RenderSurface + ?Sized>(layout: &ConnectorLayout, surface: &mut S) {
    for anchor in layout.anchors() {
        surface.remove_slot_mark(anchor);
    }
}
