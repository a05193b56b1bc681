use crate::{Error, Point2D};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Joint identifier. Doubles as the index into the skeleton point list.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct JointId(pub u32);

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u32> for JointId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Nested, by-value joint topology. Cannot express a cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct JointDef {
    pub id: u32,
    pub children: Vec<JointDef>,
}

impl JointDef {
    pub fn new(id: u32, children: Vec<JointDef>) -> Self {
        Self { id, children }
    }

    pub fn leaf(id: u32) -> Self {
        Self::new(id, Vec::new())
    }

    /// A single chain `ids[0] -> ids[1] -> ...`.
    pub fn chain(ids: &[u32]) -> Option<Self> {
        let (&last, rest) = ids.split_last()?;
        Some(
            rest.iter()
                .rev()
                .fold(Self::leaf(last), |child, &id| Self::new(id, vec![child])),
        )
    }
}

#[derive(Clone, Debug)]
pub struct Joint {
    id: JointId,
    parent: Option<usize>,
    children: Vec<usize>,

    pub position: Option<Point2D>,
}

impl Joint {
    pub fn id(&self) -> JointId {
        self.id
    }

    /// Arena index of the parent joint; `None` for the root.
    pub fn parent_index(&self) -> Option<usize> {
        self.parent
    }

    pub fn child_indices(&self) -> &[usize] {
        &self.children
    }
}

/// Joint hierarchy stored as an arena in pre-order; index 0 is the root.
#[derive(Clone, Debug)]
pub struct SkeletonTree {
    joints: Vec<Joint>,
    index: HashMap<JointId, usize>,
}

impl SkeletonTree {
    pub fn new(root: JointDef) -> Result<Self, Error> {
        let mut tree = Self {
            joints: Vec::new(),
            index: HashMap::new(),
        };

        let mut stack: Vec<(&JointDef, Option<usize>)> = vec![(&root, None)];
        while let Some((def, parent)) = stack.pop() {
            let index = tree.insert(JointId(def.id), parent)?;
            stack.extend(def.children.iter().rev().map(|child| (child, Some(index))));
        }

        Ok(tree)
    }

    /// Builds a tree from `(joint, parent)` pairs in any order. Children keep
    /// the relative order in which they appear in `joints`.
    pub fn from_parents(joints: &[(u32, Option<u32>)]) -> Result<Self, Error> {
        let mut seen = HashSet::new();
        for &(id, _) in joints {
            if !seen.insert(id) {
                return Err(Error::DuplicateJoint { joint: JointId(id) });
            }
        }

        let mut roots = Vec::new();
        let mut children: HashMap<u32, Vec<u32>> = HashMap::new();
        for &(id, parent) in joints {
            match parent {
                None => roots.push(id),
                Some(parent) if !seen.contains(&parent) => {
                    return Err(Error::UnknownParentJoint {
                        joint: JointId(id),
                        parent: JointId(parent),
                    });
                }
                Some(parent) => children.entry(parent).or_default().push(id),
            }
        }

        let &[root] = roots.as_slice() else {
            // A non-empty set of joints where every joint has a parent is
            // necessarily cyclic.
            if roots.is_empty() {
                if let Some(&(id, _)) = joints.first() {
                    return Err(Error::JointCycle { joint: JointId(id) });
                }
            }
            return Err(Error::RootCount { count: roots.len() });
        };

        let mut tree = Self {
            joints: Vec::with_capacity(joints.len()),
            index: HashMap::with_capacity(joints.len()),
        };
        let mut stack: Vec<(u32, Option<usize>)> = vec![(root, None)];
        while let Some((id, parent)) = stack.pop() {
            let index = tree.insert(JointId(id), parent)?;
            if let Some(kids) = children.get(&id) {
                stack.extend(kids.iter().rev().map(|&kid| (kid, Some(index))));
            }
        }

        // Anything not reached from the root hangs off a parent cycle.
        if let Some(&(id, _)) = joints
            .iter()
            .find(|(id, _)| !tree.index.contains_key(&JointId(*id)))
        {
            return Err(Error::JointCycle { joint: JointId(id) });
        }

        Ok(tree)
    }

    fn insert(&mut self, id: JointId, parent: Option<usize>) -> Result<usize, Error> {
        if self.index.contains_key(&id) {
            return Err(Error::DuplicateJoint { joint: id });
        }
        let index = self.joints.len();
        self.joints.push(Joint {
            id,
            parent,
            children: Vec::new(),
            position: None,
        });
        self.index.insert(id, index);
        if let Some(parent) = parent {
            self.joints[parent].children.push(index);
        }
        Ok(index)
    }

    /// The 20-joint humanoid rig: 11 is the pelvis root, 10 and 1 run up the
    /// spine to the neck, 0 is the head, 2-9 are the arms and 12-19 the legs.
    pub fn humanoid() -> Self {
        Self::new(humanoid_def()).expect("built-in humanoid rig has unique joint ids")
    }

    pub fn root(&self) -> &Joint {
        &self.joints[0]
    }

    pub fn len(&self) -> usize {
        self.joints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.joints.is_empty()
    }

    /// Joints in pre-order (parents before children, siblings in order).
    pub fn pre_order(&self) -> impl Iterator<Item = &Joint> {
        self.joints.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Joint> {
        self.joints.get(index)
    }

    pub fn index_of(&self, id: JointId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn joint(&self, id: JointId) -> Option<&Joint> {
        self.index_of(id).map(|i| &self.joints[i])
    }

    pub fn parent_of(&self, id: JointId) -> Option<&Joint> {
        let joint = self.joint(id)?;
        joint.parent.map(|p| &self.joints[p])
    }

    pub fn children_of(&self, id: JointId) -> impl Iterator<Item = &Joint> {
        self.joint(id)
            .map(|j| j.children.as_slice())
            .unwrap_or_default()
            .iter()
            .map(move |&i| &self.joints[i])
    }

    pub fn contains(&self, id: JointId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn max_id(&self) -> JointId {
        self.joints
            .iter()
            .map(|j| j.id)
            .max()
            .unwrap_or(JointId(0))
    }

    /// Sets every joint's position to `points[joint.id]`.
    ///
    /// All ids are checked before any position is written, so on error the
    /// tree is left untouched.
    pub fn assign_positions(&mut self, points: &[Point2D]) -> Result<(), Error> {
        if let Some(joint) = self
            .joints
            .iter()
            .find(|j| j.id.0 as usize >= points.len())
        {
            return Err(Error::JointIndexOutOfRange {
                joint: joint.id,
                points: points.len(),
            });
        }
        for joint in &mut self.joints {
            joint.position = Some(points[joint.id.0 as usize]);
        }
        Ok(())
    }

    pub fn position(&self, id: JointId) -> Option<Point2D> {
        self.joint(id).and_then(|j| j.position)
    }
}

fn humanoid_def() -> JointDef {
    let arm = |ids: [u32; 4]| {
        JointDef::new(
            ids[0],
            vec![JointDef::new(
                ids[1],
                vec![JointDef::new(ids[2], vec![JointDef::leaf(ids[3])])],
            )],
        )
    };
    JointDef::new(
        11,
        vec![
            JointDef::new(
                10,
                vec![JointDef::new(
                    1,
                    vec![JointDef::leaf(0), arm([2, 4, 6, 8]), arm([3, 5, 7, 9])],
                )],
            ),
            arm([12, 14, 16, 18]),
            arm([13, 15, 17, 19]),
        ],
    )
}
