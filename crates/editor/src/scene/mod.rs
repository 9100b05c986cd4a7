//! Scene graph
//!
//! Nodes live in an arena keyed by [`NodeId`]. A parent exclusively owns its
//! children: removing a node removes its whole subtree. Transforms are local;
//! world matrices are composed from the ancestor chain on every query and are
//! never cached, so there is nothing to go stale between frames.

mod node;

use std::collections::HashMap;

use glam::{Mat4, Vec3};
use shared::{NodeDescription, NodeKind};

pub use node::{Drawable, Material, NodeId, NodeTransform, SceneNode, SceneNodeKind};

/// Errors from structural scene operations
#[derive(Debug, Clone, PartialEq)]
pub enum SceneError {
    /// No node with this handle exists
    UnknownNode(NodeId),
    /// `child` is not a direct child of `parent`
    NotAChild { parent: NodeId, child: NodeId },
    /// Parenting `child` under `parent` would create a cycle
    Cycle { parent: NodeId, child: NodeId },
    /// The root group cannot be moved or removed
    RootImmutable,
    /// Asset description failed validation
    InvalidAsset(String),
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SceneError::UnknownNode(id) => write!(f, "Unknown node {}", id),
            SceneError::NotAChild { parent, child } => {
                write!(f, "Node {} is not a child of {}", child, parent)
            }
            SceneError::Cycle { parent, child } => {
                write!(f, "Cannot parent {} under its own descendant {}", child, parent)
            }
            SceneError::RootImmutable => write!(f, "The scene root cannot be moved or removed"),
            SceneError::InvalidAsset(msg) => write!(f, "Invalid asset: {}", msg),
        }
    }
}

impl std::error::Error for SceneError {}

/// Hierarchical container of groups and meshes
pub struct SceneGraph {
    nodes: HashMap<NodeId, SceneNode>,
    root: NodeId,
}

impl SceneGraph {
    pub fn new() -> Self {
        let root = SceneNode::new("scene", NodeTransform::IDENTITY, SceneNodeKind::Group);
        let root_id = root.id;
        let mut nodes = HashMap::new();
        nodes.insert(root_id, root);
        Self {
            nodes,
            root: root_id,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes including the root
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&id)
    }

    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id)?.parent
    }

    pub fn children_of(&self, id: NodeId) -> &[NodeId] {
        self.nodes.get(&id).map(|n| n.children()).unwrap_or(&[])
    }

    // ── Construction ──────────────────────────────────────────

    /// Create an empty group under `parent`
    pub fn add_group(
        &mut self,
        parent: NodeId,
        name: &str,
        transform: NodeTransform,
    ) -> Result<NodeId, SceneError> {
        self.insert(parent, SceneNode::new(name, transform, SceneNodeKind::Group))
    }

    /// Create a drawable mesh under `parent`
    pub fn add_mesh(
        &mut self,
        parent: NodeId,
        name: &str,
        transform: NodeTransform,
        drawable: Drawable,
    ) -> Result<NodeId, SceneError> {
        self.insert(parent, SceneNode::new(name, transform, SceneNodeKind::Mesh(drawable)))
    }

    fn insert(&mut self, parent: NodeId, mut node: SceneNode) -> Result<NodeId, SceneError> {
        let parent_node = self
            .nodes
            .get_mut(&parent)
            .ok_or(SceneError::UnknownNode(parent))?;
        let id = node.id;
        parent_node.children.push(id);
        node.parent = Some(parent);
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Build a subtree from an asset description.
    ///
    /// The description is validated first; on error nothing is inserted.
    pub fn instantiate(
        &mut self,
        parent: NodeId,
        desc: &NodeDescription,
    ) -> Result<NodeId, SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        desc.validate().map_err(SceneError::InvalidAsset)?;
        self.instantiate_unchecked(parent, desc)
    }

    fn instantiate_unchecked(
        &mut self,
        parent: NodeId,
        desc: &NodeDescription,
    ) -> Result<NodeId, SceneError> {
        let transform = NodeTransform::from(&desc.transform);
        match &desc.kind {
            NodeKind::Group { children } => {
                let id = self.add_group(parent, &desc.name, transform)?;
                for child in children {
                    self.instantiate_unchecked(id, child)?;
                }
                Ok(id)
            }
            NodeKind::Mesh {
                primitive,
                material,
            } => self.add_mesh(
                parent,
                &desc.name,
                transform,
                Drawable::new(primitive.clone(), Material::from(material)),
            ),
        }
    }

    // ── Re-parenting and removal ──────────────────────────────

    /// Move an existing `node` (with its subtree) under `parent`.
    ///
    /// The local transform is kept as-is, so the world placement changes with
    /// the new parent.
    pub fn add_child(&mut self, parent: NodeId, node: NodeId) -> Result<(), SceneError> {
        if node == self.root {
            return Err(SceneError::RootImmutable);
        }
        if !self.contains(node) {
            return Err(SceneError::UnknownNode(node));
        }
        if !self.contains(parent) {
            return Err(SceneError::UnknownNode(parent));
        }
        if parent == node || self.is_ancestor(node, parent) {
            return Err(SceneError::Cycle {
                parent,
                child: node,
            });
        }

        if let Some(old_parent) = self.parent_of(node) {
            if let Some(p) = self.nodes.get_mut(&old_parent) {
                p.children.retain(|c| *c != node);
            }
        }
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(node);
        }
        if let Some(n) = self.nodes.get_mut(&node) {
            n.parent = Some(parent);
        }
        Ok(())
    }

    /// Remove `node` and every descendant. Returns the removed handles in
    /// pre-order.
    pub fn remove_child(&mut self, parent: NodeId, node: NodeId) -> Result<Vec<NodeId>, SceneError> {
        if node == self.root {
            return Err(SceneError::RootImmutable);
        }
        if self.parent_of(node) != Some(parent) {
            if !self.contains(node) {
                return Err(SceneError::UnknownNode(node));
            }
            return Err(SceneError::NotAChild {
                parent,
                child: node,
            });
        }

        let removed = self.descendants(node);
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|c| *c != node);
        }
        for id in &removed {
            self.nodes.remove(id);
        }
        Ok(removed)
    }

    /// True when `ancestor` is a strict ancestor of `node`
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self.parent_of(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent_of(id);
        }
        false
    }

    // ── Queries ───────────────────────────────────────────────

    /// First node named `name` in pre-order, if any.
    ///
    /// Names are not unique; prefer holding on to the [`NodeId`].
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        let mut found = None;
        self.traverse(self.root, |node| {
            if found.is_none() && node.name == name {
                found = Some(node.id);
            }
        });
        found
    }

    /// Visit `start` and all of its descendants in pre-order, each exactly once
    pub fn traverse<F>(&self, start: NodeId, mut visit: F)
    where
        F: FnMut(&SceneNode),
    {
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            visit(node);
            stack.extend(node.children.iter().rev().copied());
        }
    }

    /// `start` and its descendants in pre-order
    pub fn descendants(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.traverse(start, |n| out.push(n.id));
        out
    }

    /// World matrix composed from the root down to `id`
    pub fn world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let mut node = self.nodes.get(&id)?;
        let mut m = node.transform.matrix();
        while let Some(parent) = node.parent {
            node = self.nodes.get(&parent)?;
            m = node.transform.matrix() * m;
        }
        Some(m)
    }

    pub fn world_position(&self, id: NodeId) -> Option<Vec3> {
        self.world_matrix(id).map(|m| m.transform_point3(Vec3::ZERO))
    }

    /// World matrix of the parent of `id` (identity for the root)
    pub fn parent_world_matrix(&self, id: NodeId) -> Option<Mat4> {
        let node = self.nodes.get(&id)?;
        match node.parent {
            Some(parent) => self.world_matrix(parent),
            None => Some(Mat4::IDENTITY),
        }
    }

    // ── Mutation helpers ──────────────────────────────────────

    pub fn set_position(&mut self, id: NodeId, position: Vec3) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(&id).ok_or(SceneError::UnknownNode(id))?;
        node.transform.position = position;
        Ok(())
    }

    /// Snapshot the local position once; later calls return the first snapshot
    pub fn capture_initial_position(&mut self, id: NodeId) -> Option<Vec3> {
        let node = self.nodes.get_mut(&id)?;
        Some(*node.initial_position.get_or_insert(node.transform.position))
    }

    /// Mesh nodes in the subtree of `start`
    pub fn meshes_under(&self, start: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        self.traverse(start, |n| {
            if n.drawable().is_some() {
                out.push(n.id);
            }
        });
        out
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}
