use crate::{
    Affine, Error, JointId, NodeId, NodeKind, ParsedDocument, Point2D, Scene, SceneNode,
    SkeletonTree, Warning,
};
use std::collections::{BTreeMap, HashMap};

/// A document re-homed onto its skeleton.
///
/// Every joint owns an anchor node placed at its parent joint's position;
/// the groups keyed to that joint hang under the anchor with their transforms
/// rebased, so rotating an anchor swings the bone about its parent joint.
#[derive(Clone, Debug)]
pub struct Rig {
    scene: Scene,
    skeleton: SkeletonTree,
    anchors: BTreeMap<JointId, NodeId>,
    warnings: Vec<Warning>,
}

/// One drawable path with its resolved world transform.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DrawItem {
    pub node: NodeId,
    pub world: Affine,
    pub z_index: u32,
}

/// Positions `skeleton` from the document's skeleton path, then reparents.
pub fn build_rig(document: ParsedDocument, mut skeleton: SkeletonTree) -> Result<Rig, Error> {
    let points = document
        .skeleton_points
        .as_deref()
        .ok_or(Error::MissingSkeletonPath)?;
    skeleton.assign_positions(points)?;
    reparent(document, skeleton)
}

/// Moves every keyed group of `document` under the anchor of the joint with
/// the same id.
///
/// Absolute positions and `z_index` values are unchanged by the move. Groups
/// whose key matches no joint are dropped from the tree and reported;
/// unkeyed content stays under the new root.
pub fn reparent(document: ParsedDocument, skeleton: SkeletonTree) -> Result<Rig, Error> {
    for joint in skeleton.pre_order() {
        if joint.position.is_none() {
            return Err(Error::UnpositionedJoint { joint: joint.id() });
        }
    }

    let ParsedDocument {
        mut scene,
        keyed,
        mut warnings,
        ..
    } = document;
    let old_root = scene.root();

    // Rebase against the pre-move tree: nested keyed groups lose their old
    // ancestors once moved.
    let original: HashMap<NodeId, Affine> = keyed
        .values()
        .flatten()
        .map(|&n| (n, scene.transform_relative_to(n, old_root)))
        .collect();

    let (root_name, root_transform) = {
        let root = scene.node(old_root);
        (root.name.clone(), root.transform)
    };
    let mut root_node = SceneNode::new(NodeKind::Root, root_name);
    root_node.transform = root_transform;
    let new_root = scene.create(root_node);

    let mut anchors: BTreeMap<JointId, NodeId> = BTreeMap::new();
    for joint in skeleton.pre_order() {
        let parent = joint.parent_index().and_then(|i| skeleton.get(i));
        let grandparent = parent
            .and_then(|p| p.parent_index())
            .and_then(|i| skeleton.get(i));
        let p = parent.and_then(|j| j.position).unwrap_or(Point2D::ORIGIN);
        let g = grandparent
            .and_then(|j| j.position)
            .unwrap_or(Point2D::ORIGIN);
        let parent_anchor = parent
            .and_then(|j| anchors.get(&j.id()).copied())
            .unwrap_or(new_root);

        let mut anchor = SceneNode::new(
            NodeKind::Anchor {
                joint: joint.id(),
                pose: Affine::IDENTITY,
            },
            None,
        );
        anchor.transform = Affine::translate_by(p - g);
        let anchor_id = scene.add_child(parent_anchor, anchor);
        anchors.insert(joint.id(), anchor_id);

        let rebase = Affine::translate_by(-p);
        for &node in keyed.get(&joint.id().0).into_iter().flatten() {
            scene.attach(anchor_id, node)?;
            let world = original.get(&node).copied().unwrap_or_default();
            scene.node_mut(node).transform = rebase.then_inner(&world);
        }
    }

    for (&key, nodes) in &keyed {
        if skeleton.contains(JointId(key)) {
            continue;
        }
        for &node in nodes {
            scene.detach(node);
            let warning = Warning::UnmatchedNode {
                key,
                name: scene.node(node).name.clone(),
            };
            log::warn!("{warning}");
            warnings.push(warning);
        }
    }

    // Unkeyed content keeps its place relative to the document root.
    for child in scene.node(old_root).children().to_vec() {
        scene.attach(new_root, child)?;
    }
    scene.set_root(new_root);

    log::debug!(
        "reparented {} keyed groups onto {} joints",
        original.len(),
        anchors.len()
    );

    Ok(Rig {
        scene,
        skeleton,
        anchors,
        warnings,
    })
}

impl Rig {
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn skeleton(&self) -> &SkeletonTree {
        &self.skeleton
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    pub fn anchor(&self, joint: JointId) -> Option<NodeId> {
        self.anchors.get(&joint).copied()
    }

    /// Replaces the pose of `joint`'s anchor. The pose is applied about the
    /// parent joint position and carries every descendant joint with it.
    pub fn set_joint_pose(&mut self, joint: JointId, pose: Affine) -> Result<(), Error> {
        let anchor = self.anchor(joint).ok_or(Error::UnknownJoint { joint })?;
        if let NodeKind::Anchor { pose: current, .. } = &mut self.scene.node_mut(anchor).kind {
            *current = pose;
        }
        Ok(())
    }

    pub fn rotate_joint(&mut self, joint: JointId, radians: f64) -> Result<(), Error> {
        self.set_joint_pose(joint, Affine::rotate(radians))
    }

    pub fn reset_pose(&mut self) {
        for &anchor in self.anchors.values() {
            if let NodeKind::Anchor { pose, .. } = &mut self.scene.node_mut(anchor).kind {
                *pose = Affine::IDENTITY;
            }
        }
    }

    /// Current on-screen position of `joint`, with poses applied.
    pub fn joint_world_position(&self, joint: JointId) -> Option<Point2D> {
        let anchor = self.anchor(joint)?;
        let rest = self.skeleton.position(joint)?;
        let pivot = self
            .skeleton
            .parent_of(joint)
            .and_then(|p| p.position)
            .unwrap_or(Point2D::ORIGIN);
        Some(self.scene.world_transform(anchor).apply(rest - pivot))
    }

    /// All reachable paths in draw order: ascending `z_index`, then document
    /// order, regardless of how deep each path sits in the joint hierarchy.
    pub fn draw_list(&self) -> Vec<DrawItem> {
        let mut items = Vec::new();
        let root = self.scene.root();
        let mut stack = vec![(root, self.scene.node(root).local_transform())];
        while let Some((id, world)) = stack.pop() {
            let node = self.scene.node(id);
            if node.path().is_some() {
                items.push((
                    node.document_order(),
                    DrawItem {
                        node: id,
                        world,
                        z_index: node.z_index,
                    },
                ));
            }
            for &child in node.children().iter().rev() {
                let local = self.scene.node(child).local_transform();
                stack.push((child, world.then_inner(&local)));
            }
        }
        items.sort_by_key(|(order, item)| (item.z_index, *order));
        items.into_iter().map(|(_, item)| item).collect()
    }
}
