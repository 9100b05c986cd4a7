use crate::scene::{NodeId, SceneGraph};

/// Interaction mode a candidate set serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionMode {
    /// Handles the drag controller may pick up
    Drag,
    /// Groups that can be selected with the modifier held
    Select,
}

/// What a drag hit moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetPolicy {
    /// The mesh under the pointer
    #[default]
    Hit,
    /// The candidate the mesh belongs to (moves the whole group)
    Candidate,
}

/// Nodes eligible for picking in one mode
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    nodes: Vec<NodeId>,
    pub policy: TargetPolicy,
}

impl CandidateSet {
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(&id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// One candidate set per mode; a node is in at most one of them
#[derive(Debug, Clone, Default)]
pub struct CandidatePool {
    drag: CandidateSet,
    select: CandidateSet,
}

impl CandidatePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, mode: InteractionMode) -> &CandidateSet {
        match mode {
            InteractionMode::Drag => &self.drag,
            InteractionMode::Select => &self.select,
        }
    }

    fn set_mut(&mut self, mode: InteractionMode) -> &mut CandidateSet {
        match mode {
            InteractionMode::Drag => &mut self.drag,
            InteractionMode::Select => &mut self.select,
        }
    }

    fn other(mode: InteractionMode) -> InteractionMode {
        match mode {
            InteractionMode::Drag => InteractionMode::Select,
            InteractionMode::Select => InteractionMode::Drag,
        }
    }

    /// Replace the set for `mode`. The nodes leave the other set.
    pub fn assign(&mut self, mode: InteractionMode, nodes: Vec<NodeId>, policy: TargetPolicy) {
        let mut unique = Vec::with_capacity(nodes.len());
        for n in nodes {
            if !unique.contains(&n) {
                unique.push(n);
            }
        }
        self.set_mut(Self::other(mode))
            .nodes
            .retain(|n| !unique.contains(n));

        let set = self.set_mut(mode);
        set.nodes = unique;
        set.policy = policy;
    }

    /// Add one node to `mode`, moving it out of the other set
    pub fn insert(&mut self, mode: InteractionMode, node: NodeId) {
        self.set_mut(Self::other(mode)).nodes.retain(|n| *n != node);
        let set = self.set_mut(mode);
        if !set.nodes.contains(&node) {
            set.nodes.push(node);
        }
    }

    /// Mode whose set currently holds `node`
    pub fn mode_of(&self, node: NodeId) -> Option<InteractionMode> {
        if self.drag.contains(node) {
            Some(InteractionMode::Drag)
        } else if self.select.contains(node) {
            Some(InteractionMode::Select)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::NodeTransform;

    #[test]
    fn test_assign_moves_node_between_sets() {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let a = scene.add_group(root, "a", NodeTransform::IDENTITY).unwrap();
        let b = scene.add_group(root, "b", NodeTransform::IDENTITY).unwrap();

        let mut pool = CandidatePool::new();
        pool.assign(InteractionMode::Select, vec![a, b], TargetPolicy::Hit);
        pool.assign(InteractionMode::Drag, vec![a], TargetPolicy::Candidate);

        assert_eq!(pool.set(InteractionMode::Drag).nodes(), &[a]);
        assert_eq!(pool.set(InteractionMode::Drag).policy, TargetPolicy::Candidate);
        assert_eq!(pool.set(InteractionMode::Select).nodes(), &[b]);
        assert_eq!(pool.mode_of(a), Some(InteractionMode::Drag));
    }

    #[test]
    fn test_assign_deduplicates() {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let a = scene.add_group(root, "a", NodeTransform::IDENTITY).unwrap();
        let mut pool = CandidatePool::new();
        pool.assign(InteractionMode::Drag, vec![a, a], TargetPolicy::Hit);
        assert_eq!(pool.set(InteractionMode::Drag).nodes().len(), 1);
    }
}
