// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lofform-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of lofform and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Connector layout.
//!
//! Runs after a surface has measured the painted form: assigns every resolved connector a slot
//! on its anchor plus a vertical drop, a horizontal extent and a direction, and writes them back
//! to the surface as visual properties.

pub mod connector;
pub mod surface;


pub use connector::{
    assign_connector_layout, teardown_connectors, ConnectorLayout, ConnectorPlacement,
    LayoutOptions, SkippedConnector,
};
pub use surface::{
    BoundingBox, Direction, LengthUnit, MeasuredSurface, NodeVisuals, RenderSurface, Slot,
    SlotVisuals, StrokeWidth, VisualProperties, VisualProperty,
};
