// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lofform-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of lofform and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use tracing::warn;

use super::walk::{collect_links, LinkCollection, ReentryLink};
use crate::model::expr::{ExpressionId, ExpressionTree};

/// A reference paired with the depth of the node it re-enters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConnector {
    link: ReentryLink,
    anchor_depth: usize,
    depth_delta: usize,
}

impl ResolvedConnector {
    pub(crate) fn new(link: ReentryLink, anchor_depth: usize) -> Self {
        let depth_delta = anchor_depth.abs_diff(link.placement_depth());
        Self {
            link,
            anchor_depth,
            depth_delta,
        }
    }

    pub fn link(&self) -> &ReentryLink {
        &self.link
    }

    pub fn anchor_id(&self) -> u32 {
        self.link.anchor_id()
    }

    /// Id of the defining node.
    pub fn anchor(&self) -> ExpressionId {
        ExpressionId::Space(self.link.anchor_id())
    }

    pub fn site(&self) -> &ExpressionId {
        self.link.site()
    }

    pub fn placement_depth(&self) -> usize {
        self.link.placement_depth()
    }

    pub fn subtree_max_depth(&self) -> usize {
        self.link.subtree_max_depth()
    }

    pub fn sibling_index(&self) -> usize {
        self.link.sibling_index()
    }

    pub fn anchor_depth(&self) -> usize {
        self.anchor_depth
    }

    pub fn depth_delta(&self) -> usize {
        self.depth_delta
    }

    /// True when the reference sits directly inside its own defining node.
    pub fn is_self_loop(&self) -> bool {
        self.link.site().space() == Some(self.link.anchor_id())
    }

    fn ordering_key(&self) -> (usize, usize, usize) {
        (self.subtree_max_depth(), self.depth_delta, self.sibling_index())
    }
}

/// A reference whose defining identifier does not occur anywhere in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReentry {
    anchor_id: u32,
    site: ExpressionId,
    sibling_index: usize,
}

impl UnresolvedReentry {
    pub fn anchor_id(&self) -> u32 {
        self.anchor_id
    }

    pub fn site(&self) -> &ExpressionId {
        &self.site
    }

    pub fn sibling_index(&self) -> usize {
        self.sibling_index
    }
}

impl fmt::Display for UnresolvedReentry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "reentry [{}] in {} (child {}) has no defining ${}",
            self.anchor_id, self.site, self.sibling_index, self.anchor_id
        )
    }
}

/// Connectors in drawing order plus the references that could not be paired.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReentryPlan {
    connectors: Vec<ResolvedConnector>,
    unresolved: Vec<UnresolvedReentry>,
}

impl ReentryPlan {
    pub fn connectors(&self) -> &[ResolvedConnector] {
        &self.connectors
    }

    pub fn unresolved(&self) -> &[UnresolvedReentry] {
        &self.unresolved
    }

    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }
}

/// Sorts connectors into drawing order.
///
/// Equivalent to stable-sorting by sibling index, then by depth delta, then by subtree max
/// depth: the result is ordered by `(subtree_max_depth, depth_delta, sibling_index)` and full
/// ties keep their incoming order. Drawing shallow subtrees and short connectors first keeps
/// crossings down.
pub fn canonical_order(connectors: &mut [ResolvedConnector]) {
    connectors.sort_by_key(ResolvedConnector::ordering_key);
}

/// Pairs every collected link with its anchor depth and orders the result.
pub fn resolve_connectors(collection: &LinkCollection) -> ReentryPlan {
    let mut plan = ReentryPlan::default();

    for link in collection.links() {
        match collection.anchors().depth(link.anchor_id()) {
            Some(anchor_depth) => plan
                .connectors
                .push(ResolvedConnector::new(link.clone(), anchor_depth)),
            None => {
                warn!(
                    anchor = link.anchor_id(),
                    site = %link.site(),
                    sibling_index = link.sibling_index(),
                    "unresolved reentry; connector dropped"
                );
                plan.unresolved.push(UnresolvedReentry {
                    anchor_id: link.anchor_id(),
                    site: link.site().clone(),
                    sibling_index: link.sibling_index(),
                });
            }
        }
    }

    canonical_order(&mut plan.connectors);
    plan
}

/// Runs both stages (collect, then resolve) over `tree`.
pub fn plan_reentries(tree: &ExpressionTree) -> ReentryPlan {
    resolve_connectors(&collect_links(tree))
}
