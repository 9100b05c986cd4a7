use crate::scene::{NodeId, SceneGraph};

/// Keeps at most one group highlighted.
#[derive(Debug, Default)]
pub struct SelectionHighlighter {
    group: Option<NodeId>,
    highlighted: Vec<NodeId>,
}

impl SelectionHighlighter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group whose meshes are currently highlighted
    pub fn group(&self) -> Option<NodeId> {
        self.group
    }

    pub fn highlighted(&self) -> &[NodeId] {
        &self.highlighted
    }

    /// Group that owns `node`: its parent, or the node itself when it sits
    /// directly under the root.
    pub fn owning_group(scene: &SceneGraph, node: NodeId) -> Option<NodeId> {
        let parent = scene.parent_of(node)?;
        if parent == scene.root() {
            Some(node)
        } else {
            Some(parent)
        }
    }

    /// Highlight the group owning `node`, clearing any previous group first.
    /// Returns the highlighted group.
    pub fn select(&mut self, scene: &mut SceneGraph, node: NodeId) -> Option<NodeId> {
        self.clear(scene);
        let group = Self::owning_group(scene, node)?;

        let members: Vec<NodeId> = match scene.node(group) {
            Some(g) if g.drawable().is_some() => vec![group],
            Some(g) => g
                .children()
                .iter()
                .copied()
                .filter(|c| scene.node(*c).is_some_and(|n| n.drawable().is_some()))
                .collect(),
            None => return None,
        };

        for id in &members {
            if let Some(d) = scene.node_mut(*id).and_then(|n| n.drawable_mut()) {
                d.material.highlighted = true;
            }
        }
        tracing::debug!("Highlighted group {} ({} meshes)", group, members.len());
        self.group = Some(group);
        self.highlighted = members;
        Some(group)
    }

    /// Clear the highlight if `node` belongs to the highlighted group
    pub fn deselect(&mut self, scene: &mut SceneGraph, node: NodeId) {
        let owns = Some(node) == self.group
            || self.highlighted.contains(&node)
            || Self::owning_group(scene, node) == self.group;
        if self.group.is_some() && owns {
            self.clear(scene);
        }
    }

    /// Remove every highlight. Nodes removed from the scene are skipped.
    pub fn clear(&mut self, scene: &mut SceneGraph) {
        for id in self.highlighted.drain(..) {
            if let Some(d) = scene.node_mut(id).and_then(|n| n.drawable_mut()) {
                d.material.highlighted = false;
            }
        }
        self.group = None;
    }
}
