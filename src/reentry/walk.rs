// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lofform-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of lofform and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use tracing::debug;

use crate::model::expr::{Child, ExpressionId, ExpressionTree};

/// Defining identifier → depth of its (last) defining node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnchorTable {
    depths: BTreeMap<u32, usize>,
}

impl AnchorTable {
    pub fn depth(&self, space: u32) -> Option<usize> {
        self.depths.get(&space).copied()
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        self.depths.iter().map(|(space, depth)| (*space, *depth))
    }

    /// Records `space` at `depth`, returning the depth it shadows (last writer wins).
    fn record(&mut self, space: u32, depth: usize) -> Option<usize> {
        self.depths.insert(space, depth)
    }
}

/// A reference occurrence that has not been paired with its defining node yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReentryLink {
    anchor_id: u32,
    site: ExpressionId,
    placement_depth: usize,
    subtree_max_depth: usize,
    sibling_index: usize,
}

impl ReentryLink {
    pub(crate) fn new(
        anchor_id: u32,
        site: ExpressionId,
        placement_depth: usize,
        subtree_max_depth: usize,
        sibling_index: usize,
    ) -> Self {
        Self {
            anchor_id,
            site,
            placement_depth,
            subtree_max_depth,
            sibling_index,
        }
    }

    pub fn anchor_id(&self) -> u32 {
        self.anchor_id
    }

    /// Id of the node whose child list holds the reference.
    pub fn site(&self) -> &ExpressionId {
        &self.site
    }

    pub fn placement_depth(&self) -> usize {
        self.placement_depth
    }

    pub fn subtree_max_depth(&self) -> usize {
        self.subtree_max_depth
    }

    pub fn sibling_index(&self) -> usize {
        self.sibling_index
    }
}

/// Output of the first stage: every anchor and every pending reference, in traversal order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LinkCollection {
    anchors: AnchorTable,
    links: Vec<ReentryLink>,
}

impl LinkCollection {
    pub fn anchors(&self) -> &AnchorTable {
        &self.anchors
    }

    pub fn links(&self) -> &[ReentryLink] {
        &self.links
    }
}

/// Walks `tree` in pre-order and collects anchors and pending reentry links.
///
/// References are not paired here: a reference may precede its defining node in traversal
/// order, so pairing waits until the whole anchor table is known.
pub fn collect_links(tree: &ExpressionTree) -> LinkCollection {
    let mut collection = LinkCollection::default();

    for node in tree.nodes() {
        if let Some(space) = node.id().space() {
            if let Some(shadowed) = collection.anchors.record(space, node.depth()) {
                debug!(
                    space,
                    shadowed,
                    depth = node.depth(),
                    "defining identifier repeated; last occurrence wins"
                );
            }
        }

        for (sibling_index, child) in node.children().iter().enumerate() {
            if let Child::Reference(anchor_id) = child {
                collection.links.push(ReentryLink::new(
                    *anchor_id,
                    node.id().clone(),
                    node.depth(),
                    node.subtree_max_depth(),
                    sibling_index,
                ));
            }
        }
    }

    collection
}
