// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lofform-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of lofform and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Reentry resolution.
//!
//! Two stages: [`collect_links`] walks the tree once and records every defining node and every
//! reference occurrence, then [`resolve_connectors`] pairs references with anchors and puts the
//! resulting connectors into drawing order.

pub mod resolve;
pub mod walk;


pub use resolve::{
    canonical_order, plan_reentries, resolve_connectors, ReentryPlan, ResolvedConnector,
    UnresolvedReentry,
};
pub use walk::{collect_links, AnchorTable, LinkCollection, ReentryLink};
