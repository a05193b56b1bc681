use crate::{Affine, Error, JointId, Path, Style};

/// Handle to a node inside its owning [`Scene`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    Root,
    Group,
    Path {
        path: Path,
        style: Style,
    },
    /// Per-joint pivot created by reparenting. `pose` is applied inside the
    /// anchor's translation, so it rotates content about the pivot.
    Anchor {
        joint: JointId,
        pose: Affine,
    },
}

#[derive(Clone, Debug)]
pub struct SceneNode {
    pub name: Option<String>,
    pub kind: NodeKind,
    pub transform: Affine,
    pub z_index: u32,
    order: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl SceneNode {
    pub fn new(kind: NodeKind, name: Option<String>) -> Self {
        Self {
            name,
            kind,
            transform: Affine::IDENTITY,
            z_index: 0,
            order: 0,
            parent: None,
            children: Vec::new(),
        }
    }

    /// Position of the element in the source document; ties on `z_index`
    /// are broken by this.
    pub fn document_order(&self) -> u32 {
        self.order
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn local_transform(&self) -> Affine {
        match &self.kind {
            NodeKind::Anchor { pose, .. } => self.transform.then_inner(pose),
            _ => self.transform,
        }
    }

    pub fn path(&self) -> Option<(&Path, &Style)> {
        match &self.kind {
            NodeKind::Path { path, style } => Some((path, style)),
            _ => None,
        }
    }

    pub fn anchor_joint(&self) -> Option<JointId> {
        match self.kind {
            NodeKind::Anchor { joint, .. } => Some(joint),
            _ => None,
        }
    }
}

/// Arena of scene nodes. Every reachable node has exactly one parent, so the
/// reachable part is always a tree rooted at [`Scene::root`].
#[derive(Clone, Debug)]
pub struct Scene {
    nodes: Vec<SceneNode>,
    root: NodeId,
}

impl Scene {
    pub fn new(root_name: Option<String>) -> Self {
        Self {
            nodes: vec![SceneNode::new(NodeKind::Root, root_name)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &SceneNode {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut SceneNode {
        &mut self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id.0)
    }

    /// Adds a detached node to the arena. Its document order is its arena
    /// position.
    pub fn create(&mut self, mut node: SceneNode) -> NodeId {
        let id = NodeId(self.nodes.len());
        node.order = u32::try_from(id.0).unwrap_or(u32::MAX);
        node.parent = None;
        node.children.clear();
        self.nodes.push(node);
        id
    }

    pub fn add_child(&mut self, parent: NodeId, node: SceneNode) -> NodeId {
        let id = self.create(node);
        // A fresh node has no descendants, so this cannot close a cycle.
        self.link(parent, id);
        id
    }

    /// Appends `child` (detaching it first if needed) as the last child of
    /// `parent`.
    ///
    /// Fails with [`Error::NodeCycle`] if `parent` is `child` or one of its
    /// descendants; the tree is left unchanged.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Result<(), Error> {
        let mut current = Some(parent);
        while let Some(n) = current {
            if n == child {
                return Err(Error::NodeCycle {
                    node: child.0,
                    parent: parent.0,
                });
            }
            current = self.nodes[n.0].parent;
        }
        self.link(parent, child);
        Ok(())
    }

    fn link(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    pub fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.nodes[id.0].parent.take() {
            self.nodes[parent.0].children.retain(|&c| c != id);
        }
    }

    pub(crate) fn set_root(&mut self, root: NodeId) {
        self.detach(root);
        self.root = root;
    }

    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return true;
            }
            match self.nodes[current.0].parent {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Composition of local transforms from the root down to `id`.
    pub fn world_transform(&self, id: NodeId) -> Affine {
        let mut chain = vec![id];
        let mut current = id;
        while let Some(parent) = self.nodes[current.0].parent {
            chain.push(parent);
            current = parent;
        }
        chain
            .iter()
            .rev()
            .fold(Affine::IDENTITY, |acc, &n| {
                acc.then_inner(&self.nodes[n.0].local_transform())
            })
    }

    /// Composition of local transforms strictly below `ancestor` down to
    /// `id`. If `ancestor` is not on the parent chain this is the full chain.
    pub fn transform_relative_to(&self, id: NodeId, ancestor: NodeId) -> Affine {
        let mut chain = Vec::new();
        let mut current = Some(id);
        while let Some(n) = current {
            if n == ancestor {
                break;
            }
            chain.push(n);
            current = self.nodes[n.0].parent;
        }
        chain
            .iter()
            .rev()
            .fold(Affine::IDENTITY, |acc, &n| {
                acc.then_inner(&self.nodes[n.0].local_transform())
            })
    }

    /// Reachable nodes below (and including) `id`, pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            out.push(n);
            stack.extend(self.nodes[n.0].children.iter().rev().copied());
        }
        out
    }

    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|&n| self.nodes[n.0].name.as_deref() == Some(name))
    }

    /// Number of nodes in the arena, including detached ones.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
