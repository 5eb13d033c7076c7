// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Lofform-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of lofform and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::fmt;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Identity of a node in an expression tree.
///
/// A `Space` id is a *defining identifier*: the node owns a reenterable space that bare
/// references elsewhere in the tree can point at. A `Label` is an opaque name for an ordinary
/// node and can never be the target of a reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpressionId {
    Space(u32),
    Label(SmolStr),
}

impl ExpressionId {
    pub fn label(value: impl Into<SmolStr>) -> Self {
        Self::Label(value.into())
    }

    /// Returns the defining identifier, if this id is one.
    pub fn space(&self) -> Option<u32> {
        match self {
            Self::Space(space) => Some(*space),
            Self::Label(_) => None,
        }
    }

    pub fn is_space(&self) -> bool {
        matches!(self, Self::Space(_))
    }
}

impl fmt::Display for ExpressionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Space(space) => write!(f, "${space}"),
            Self::Label(label) => f.write_str(label),
        }
    }
}

/// One entry of a node's ordered child list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Child {
    /// A bare reference to the defining identifier of another node (`[n]` in notation).
    Reference(u32),
    Node(ExpressionNode),
}

impl Child {
    pub fn as_node(&self) -> Option<&ExpressionNode> {
        match self {
            Self::Node(node) => Some(node),
            Self::Reference(_) => None,
        }
    }

    pub fn as_reference(&self) -> Option<u32> {
        match self {
            Self::Reference(anchor) => Some(*anchor),
            Self::Node(_) => None,
        }
    }
}

/// A node of a parsed form.
///
/// The JSON field names follow the shape produced by the bracket grammar
/// (`id`, `data`, `expressions`, `depth`, `maxDepth`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionNode {
    id: ExpressionId,
    #[serde(rename = "data", default)]
    content: SmolStr,
    #[serde(rename = "expressions", default)]
    children: Vec<Child>,
    #[serde(default)]
    depth: usize,
    #[serde(rename = "maxDepth", default)]
    subtree_max_depth: usize,
}

impl ExpressionNode {
    pub fn new(id: ExpressionId) -> Self {
        Self {
            id,
            content: SmolStr::default(),
            children: Vec::new(),
            depth: 0,
            subtree_max_depth: 0,
        }
    }

    pub fn with_content(mut self, content: impl Into<SmolStr>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_node(mut self, node: ExpressionNode) -> Self {
        self.children.push(Child::Node(node));
        self
    }

    pub fn with_reference(mut self, anchor: u32) -> Self {
        self.children.push(Child::Reference(anchor));
        self
    }

    pub fn id(&self) -> &ExpressionId {
        &self.id
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn children(&self) -> &[Child] {
        &self.children
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn subtree_max_depth(&self) -> usize {
        self.subtree_max_depth
    }

    /// Nested child nodes, skipping bare references.
    pub fn child_nodes(&self) -> impl Iterator<Item = &ExpressionNode> + '_ {
        self.children.iter().filter_map(Child::as_node)
    }

    pub(crate) fn set_id(&mut self, id: ExpressionId) {
        self.id = id;
    }

    pub(crate) fn push_child(&mut self, child: Child) {
        self.children.push(child);
    }

    pub(crate) fn set_content(&mut self, content: impl Into<SmolStr>) {
        self.content = content.into();
    }

    /// Assigns `depth` and `subtree_max_depth` below `self`, which sits at depth 0.
    fn assign_depths(&mut self) {
        // (depth, parent) of every node, in pre-order.
        let mut visited = Vec::<(usize, Option<usize>)>::new();
        let mut pending = vec![(&mut *self, 0, None)];
        while let Some((node, depth, parent)) = pending.pop() {
            let index = visited.len();
            visited.push((depth, parent));
            node.depth = depth;
            for child in node.children.iter_mut().rev() {
                if let Child::Node(child) = child {
                    pending.push((child, depth + 1, Some(index)));
                }
            }
        }

        // Descendants follow their ancestors in pre-order, so a reverse sweep sees every
        // subtree complete before its parent.
        let mut max_depths = visited.iter().map(|&(depth, _)| depth).collect::<Vec<_>>();
        for (index, &(_, parent)) in visited.iter().enumerate().rev() {
            if let Some(parent) = parent {
                max_depths[parent] = max_depths[parent].max(max_depths[index]);
            }
        }

        let mut max_depths = max_depths.into_iter();
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            node.subtree_max_depth = max_depths.next().unwrap_or(node.depth);
            for child in node.children.iter_mut().rev() {
                if let Child::Node(child) = child {
                    pending.push(child);
                }
            }
        }
    }
}

/// An immutable snapshot of a form, rooted at the unwritten outer space (depth 0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpressionTree {
    root: ExpressionNode,
}

impl ExpressionTree {
    /// Builds a tree from `root`, recomputing `depth` and `subtreeMaxDepth` for every node.
    pub fn from_root(mut root: ExpressionNode) -> Self {
        root.assign_depths();
        Self { root }
    }

    /// A single-node tree carrying opaque embedded content.
    pub fn shallow(content: impl Into<SmolStr>) -> Self {
        Self::from_root(ExpressionNode::new(ExpressionId::label("_0")).with_content(content))
    }

    /// Parses the JSON tree shape; recorded depths are taken as given.
    pub fn from_json(json: &str) -> Result<Self, ExpressionTreeJsonError> {
        serde_json::from_str(json).map_err(ExpressionTreeJsonError)
    }

    pub fn to_json(&self) -> Result<String, ExpressionTreeJsonError> {
        serde_json::to_string(self).map_err(ExpressionTreeJsonError)
    }

    pub fn root(&self) -> &ExpressionNode {
        &self.root
    }

    /// Iterates all nodes in pre-order (children in array order).
    pub fn nodes(&self) -> PreOrder<'_> {
        PreOrder {
            stack: vec![&self.root],
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    /// Returns the last node in pre-order carrying `id`.
    pub fn find(&self, id: &ExpressionId) -> Option<&ExpressionNode> {
        self.nodes().filter(|node| node.id() == id).last()
    }
}

pub struct PreOrder<'a> {
    stack: Vec<&'a ExpressionNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a ExpressionNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.child_nodes().collect::<Vec<_>>().into_iter().rev());
        Some(node)
    }
}

#[derive(Debug)]
pub struct ExpressionTreeJsonError(serde_json::Error);

impl fmt::Display for ExpressionTreeJsonError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid expression tree json: {}", self.0)
    }
}

impl std::error::Error for ExpressionTreeJsonError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}
